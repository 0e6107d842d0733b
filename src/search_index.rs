use std::collections::{HashMap, HashSet};
use std::hash::Hash;

/// Inverted index mapping token suffixes to entity ids.
///
/// Search then costs one map lookup per query token instead of a `contains`
/// scan over every record: each indexed token contributes all of its
/// suffixes as keys (token "premier" registers "premier", "remier", ...,
/// "r"), so a query token hits exactly when it is a tail of some indexed
/// token. Memory is O(token length²) per token, which is fine for a league
/// vocabulary that is small and rebuilt wholesale on every load.
#[derive(Debug, Clone, Default)]
pub struct SearchIndex<T: Eq + Hash + Clone> {
    index: HashMap<String, HashSet<T>>,
}

impl<T: Eq + Hash + Clone> SearchIndex<T> {
    pub fn new() -> Self {
        Self {
            index: HashMap::new(),
        }
    }

    /// Number of distinct suffix entries currently held.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Indexes an entity under every suffix of every token in the given
    /// text fields. `None` fields are skipped.
    pub fn add_entity(&mut self, entity_id: T, text_fields: &[Option<&str>]) {
        for text in text_fields.iter().flatten() {
            let normalized = text.to_lowercase();
            for token in tokenize(&normalized) {
                for (start, _) in token.char_indices() {
                    let suffix = &token[start..];
                    self.index
                        .entry(suffix.to_string())
                        .or_default()
                        .insert(entity_id.clone());
                }
            }
        }
    }

    /// Returns the ids matching *all* query tokens. An empty or
    /// whitespace-only query matches nothing; treating "no filter" as
    /// "show all" is the caller's job.
    pub fn search(&self, query: &str) -> HashSet<T> {
        let normalized = query.to_lowercase();
        let normalized = normalized.trim();
        if normalized.is_empty() {
            return HashSet::new();
        }

        let mut result: Option<HashSet<T>> = None;
        for token in tokenize(normalized) {
            let matching = self.index.get(token);
            match result {
                None => {
                    result = Some(matching.cloned().unwrap_or_default());
                }
                Some(ref mut ids) => match matching {
                    Some(matching) => ids.retain(|id| matching.contains(id)),
                    None => ids.clear(),
                },
            }
            if result.as_ref().is_some_and(|ids| ids.is_empty()) {
                return HashSet::new();
            }
        }
        result.unwrap_or_default()
    }

    /// Removes one entity from every suffix set, dropping entries that
    /// become empty. The primary lifecycle is full-rebuild-on-reload; this
    /// exists for incremental callers.
    pub fn remove_entity(&mut self, entity_id: &T) {
        self.index.retain(|_, ids| {
            ids.remove(entity_id);
            !ids.is_empty()
        });
    }

    pub fn clear(&mut self) {
        self.index.clear();
    }
}

/// Splits on whitespace and common name punctuation, dropping
/// single-character fragments as noise.
fn tokenize(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| {
        c.is_whitespace() || matches!(c, ',' | '.' | '-' | '_' | '/' | '(' | ')')
    })
    .filter(|token| token.chars().count() > 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_index() -> SearchIndex<String> {
        let mut index = SearchIndex::new();
        index.add_entity(
            "4328".to_string(),
            &[Some("English Premier League"), Some("EPL")],
        );
        index.add_entity("4387".to_string(), &[Some("NBA"), None]);
        index.add_entity(
            "4335".to_string(),
            &[Some("Spanish La Liga"), Some("La Liga Primera")],
        );
        index
    }

    #[test]
    fn matches_mid_token_substring() {
        let index = sample_index();
        let hits = index.search("remier");
        assert!(hits.contains("4328"));
        assert_eq!(hits.len(), 1);
    }

    #[test]
    fn search_is_case_insensitive() {
        let index = sample_index();
        assert!(index.search("nba").contains("4387"));
        assert!(index.search("NBA").contains("4387"));
        assert!(index.search("PREMIER").contains("4328"));
    }

    #[test]
    fn matches_alternate_name_field() {
        let index = sample_index();
        let hits = index.search("primera");
        assert_eq!(hits.len(), 1);
        assert!(hits.contains("4335"));
    }

    #[test]
    fn empty_and_whitespace_queries_match_nothing() {
        let index = sample_index();
        assert!(index.search("").is_empty());
        assert!(index.search("   ").is_empty());
    }

    #[test]
    fn multi_token_query_requires_all_tokens() {
        let mut index = SearchIndex::new();
        index.add_entity(1u32, &[Some("National Basketball Association")]);
        index.add_entity(2u32, &[Some("National Football League")]);

        let hits = index.search("national basketball");
        assert_eq!(hits.len(), 1);
        assert!(hits.contains(&1));

        assert_eq!(index.search("national").len(), 2);
    }

    #[test]
    fn unknown_token_empties_the_result() {
        let index = sample_index();
        assert!(index.search("premier zzz_nonexistent").is_empty());
        assert!(index.search("zzz_nonexistent").is_empty());
    }

    #[test]
    fn single_character_tokens_are_noise() {
        let mut index = SearchIndex::new();
        index.add_entity(1u32, &[Some("A B C")]);
        assert_eq!(index.len(), 0);
        assert!(index.search("a").is_empty());
    }

    #[test]
    fn punctuation_splits_tokens() {
        let mut index = SearchIndex::new();
        index.add_entity(1u32, &[Some("Serie-A (Italy), top_flight/calcio")]);
        assert!(index.search("italy").contains(&1));
        assert!(index.search("flight").contains(&1));
        assert!(index.search("calcio").contains(&1));
    }

    #[test]
    fn remove_entity_drops_empty_suffix_sets() {
        let mut index = SearchIndex::new();
        index.add_entity(1u32, &[Some("premier")]);
        index.add_entity(2u32, &[Some("premium")]);
        index.remove_entity(&1);
        assert!(index.search("premier").is_empty());
        assert!(index.search("mium").contains(&2));
        // Suffixes unique to "premier" must be gone entirely.
        assert!(!index.is_empty());
        index.remove_entity(&2);
        assert!(index.is_empty());
    }

    #[test]
    fn clear_empties_the_index() {
        let mut index = sample_index();
        assert!(!index.is_empty());
        index.clear();
        assert!(index.is_empty());
        assert!(index.search("premier").is_empty());
    }
}
