use std::collections::HashMap;

use crate::search_index::SearchIndex;
use crate::state::League;

/// Entity map plus canonical display order, rebuilt together on every full
/// league load. Every id in `order` resolves through `entities` (upstream
/// ids are assumed unique; a duplicate would leave both occurrences in
/// `order` with the later record winning the map slot).
#[derive(Debug, Clone, Default)]
pub struct NormalizedLeagues {
    pub entities: HashMap<String, League>,
    pub order: Vec<String>,
}

pub fn normalize(leagues: Vec<League>) -> NormalizedLeagues {
    let mut entities = HashMap::with_capacity(leagues.len());
    let mut order = Vec::with_capacity(leagues.len());
    for league in leagues {
        order.push(league.id.clone());
        entities.insert(league.id.clone(), league);
    }
    NormalizedLeagues { entities, order }
}

/// Reconstructs records in `order` order, skipping ids no longer present.
pub fn denormalize(order: &[String], entities: &HashMap<String, League>) -> Vec<League> {
    order
        .iter()
        .filter_map(|id| entities.get(id).cloned())
        .collect()
}

/// Builds a fresh index over name + alternate name. Always a full rebuild,
/// so the index can never diverge from the entity map.
pub fn build_index(entities: &HashMap<String, League>, order: &[String]) -> SearchIndex<String> {
    let mut index = SearchIndex::new();
    for id in order {
        if let Some(league) = entities.get(id) {
            index.add_entity(
                id.clone(),
                &[Some(league.name.as_str()), league.alternate_name.as_deref()],
            );
        }
    }
    index
}

/// Applies the text and sport filters, preserving `order`'s original
/// ordering. The index's result set is unordered; ordering is always
/// re-derived from `order`.
pub fn filtered_ids(
    order: &[String],
    entities: &HashMap<String, League>,
    index: &SearchIndex<String>,
    search_query: &str,
    sport: &str,
) -> Vec<String> {
    let query = search_query.trim();

    let candidates: Vec<&String> = if query.is_empty() {
        order.iter().collect()
    } else {
        let matches = index.search(query);
        order.iter().filter(|id| matches.contains(*id)).collect()
    };

    candidates
        .into_iter()
        .filter(|id| {
            if sport.is_empty() {
                return true;
            }
            entities
                .get(*id)
                .is_some_and(|league| league.sport == sport)
        })
        .cloned()
        .collect()
}

/// Distinct sport names, sorted ascending for a stable picker order.
pub fn available_sports(order: &[String], entities: &HashMap<String, League>) -> Vec<String> {
    let mut sports: Vec<String> = order
        .iter()
        .filter_map(|id| entities.get(id))
        .filter(|league| !league.sport.is_empty())
        .map(|league| league.sport.clone())
        .collect();
    sports.sort();
    sports.dedup();
    sports
}

pub fn lookup_by_id<'a>(entities: &'a HashMap<String, League>, id: &str) -> Option<&'a League> {
    entities.get(id)
}
