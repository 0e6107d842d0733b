use std::collections::{HashMap, VecDeque};

use serde::{Deserialize, Serialize};

use crate::badge;
use crate::config;
use crate::fifo_cache::FifoCache;
use crate::search_index::SearchIndex;
use crate::selectors;
use crate::ttl_cache::TtlCache;

const LOG_CAPACITY: usize = 200;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct League {
    pub id: String,
    pub name: String,
    pub sport: String,
    pub alternate_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BadgeCacheEntry {
    pub badge_url: Option<String>,
    pub fetched_at: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveBadge {
    pub league_id: String,
    pub badge_url: Option<String>,
}

/// Single owner of the league catalogue and badge state. The entity map,
/// display order and search index are only ever replaced together via
/// `set_leagues`, never patched piecemeal, so readers cannot observe a
/// half-rebuilt index.
#[derive(Debug, Clone)]
pub struct AppState {
    pub leagues: HashMap<String, League>,
    pub league_order: Vec<String>,
    pub search_index: SearchIndex<String>,
    pub leagues_loading: bool,
    pub leagues_error: Option<String>,

    pub search_query: String,
    pub selected_sport: String,

    pub active_badge: Option<ActiveBadge>,
    pub badge_loading: bool,
    pub badge_error: Option<String>,
    pub pending_badge: Option<String>,
    pub badge_cache: FifoCache<String, BadgeCacheEntry>,

    pub selected: usize,
    pub search_input_active: bool,
    pub help_overlay: bool,
    pub logs: VecDeque<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        let badge_cache = FifoCache::new(config::badge_cache_capacity())
            .expect("badge cache capacity is clamped to at least 1");
        Self {
            leagues: HashMap::new(),
            league_order: Vec::new(),
            search_index: SearchIndex::new(),
            leagues_loading: false,
            leagues_error: None,
            search_query: String::new(),
            selected_sport: String::new(),
            active_badge: None,
            badge_loading: false,
            badge_error: None,
            pending_badge: None,
            badge_cache,
            selected: 0,
            search_input_active: false,
            help_overlay: false,
            logs: VecDeque::with_capacity(LOG_CAPACITY),
        }
    }

    /// Replaces the entity map, display order and search index as one unit.
    pub fn set_leagues(&mut self, leagues: Vec<League>) {
        let normalized = selectors::normalize(leagues);
        let index = selectors::build_index(&normalized.entities, &normalized.order);
        self.leagues = normalized.entities;
        self.league_order = normalized.order;
        self.search_index = index;
        self.clamp_selected();
    }

    pub fn update_search_query(&mut self, query: String) {
        self.search_query = query;
        self.selected = 0;
    }

    pub fn update_selected_sport(&mut self, sport: String) {
        self.selected_sport = sport;
        self.selected = 0;
    }

    pub fn clear_filters(&mut self) {
        self.search_query.clear();
        self.selected_sport.clear();
        self.selected = 0;
    }

    /// Drops the active badge and any interest in an in-flight fetch. The
    /// fetch itself is not cancelled; its cache-population side effect
    /// still lands when the result arrives.
    pub fn clear_active_badge(&mut self) {
        self.active_badge = None;
        self.badge_error = None;
        self.badge_loading = false;
        self.pending_badge = None;
    }

    pub fn filtered_ids(&self) -> Vec<String> {
        selectors::filtered_ids(
            &self.league_order,
            &self.leagues,
            &self.search_index,
            &self.search_query,
            &self.selected_sport,
        )
    }

    pub fn filtered_leagues(&self) -> Vec<League> {
        selectors::denormalize(&self.filtered_ids(), &self.leagues)
    }

    pub fn total_filtered_count(&self) -> usize {
        self.filtered_ids().len()
    }

    pub fn available_sports(&self) -> Vec<String> {
        selectors::available_sports(&self.league_order, &self.leagues)
    }

    pub fn league_by_id(&self, id: &str) -> Option<&League> {
        selectors::lookup_by_id(&self.leagues, id)
    }

    pub fn is_league_selected(&self, league_id: &str) -> bool {
        self.active_badge
            .as_ref()
            .is_some_and(|badge| badge.league_id == league_id)
    }

    pub fn has_active_filters(&self) -> bool {
        !self.search_query.is_empty() || !self.selected_sport.is_empty()
    }

    pub fn selected_league_id(&self) -> Option<String> {
        self.filtered_ids().get(self.selected).cloned()
    }

    pub fn select_next(&mut self) {
        let count = self.total_filtered_count();
        if count > 0 {
            self.selected = (self.selected + 1).min(count - 1);
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Steps the sport filter through "all" plus every known sport.
    pub fn cycle_sport(&mut self) {
        let sports = self.available_sports();
        if sports.is_empty() {
            return;
        }
        let next = match sports.iter().position(|s| *s == self.selected_sport) {
            None => Some(0),
            Some(pos) if pos + 1 < sports.len() => Some(pos + 1),
            Some(_) => None,
        };
        let sport = next.map(|pos| sports[pos].clone()).unwrap_or_default();
        self.update_selected_sport(sport);
    }

    pub fn push_log(&mut self, line: impl Into<String>) {
        if self.logs.len() >= LOG_CAPACITY {
            self.logs.pop_front();
        }
        self.logs.push_back(line.into());
    }

    fn clamp_selected(&mut self) {
        let count = self.total_filtered_count();
        self.selected = self.selected.min(count.saturating_sub(1));
    }
}

#[derive(Debug, Clone)]
pub enum Delta {
    LeaguesLoaded(Vec<League>),
    LeaguesFailed(String),
    BadgeLoaded {
        league_id: String,
        badge_url: Option<String>,
    },
    BadgeFailed {
        league_id: String,
        message: String,
    },
    Log(String),
}

#[derive(Debug, Clone)]
pub enum ProviderCommand {
    FetchLeagues,
    FetchBadge { league_id: String },
}

pub fn apply_delta(state: &mut AppState, ttl: &mut TtlCache, delta: Delta) {
    match delta {
        Delta::LeaguesLoaded(leagues) => {
            state.leagues_loading = false;
            state.leagues_error = None;
            ttl.set(config::LEAGUES_CACHE_KEY, &leagues, config::leagues_ttl());
            let count = leagues.len();
            state.set_leagues(leagues);
            state.push_log(format!("loaded {count} leagues"));
        }
        Delta::LeaguesFailed(message) => {
            state.leagues_loading = false;
            state.push_log(format!("league fetch failed: {message}"));
            state.leagues_error = Some(message);
        }
        Delta::BadgeLoaded {
            league_id,
            badge_url,
        } => {
            badge::store_badge(state, ttl, &league_id, badge_url.clone());
            if state.pending_badge.as_deref() == Some(league_id.as_str()) {
                state.pending_badge = None;
                state.badge_loading = false;
                state.badge_error = None;
                state.active_badge = Some(ActiveBadge {
                    league_id,
                    badge_url,
                });
            }
        }
        Delta::BadgeFailed { league_id, message } => {
            state.push_log(format!("badge fetch failed for {league_id}: {message}"));
            if state.pending_badge.as_deref() == Some(league_id.as_str()) {
                state.pending_badge = None;
                state.badge_loading = false;
                state.badge_error = Some(message);
            }
        }
        Delta::Log(line) => state.push_log(line),
    }
}
