use crate::config;
use crate::state::{ActiveBadge, AppState, BadgeCacheEntry, ProviderCommand};
use crate::ttl_cache::{self, TtlCache};

/// Resolves a badge for one league through the short-circuit chain:
/// in-memory FIFO cache, then the persisted store, then a remote fetch.
/// Returns the provider command to dispatch when both caches miss; cached
/// hits publish the active badge immediately and need no network. Duplicate
/// requests for an id already in flight are not coalesced.
pub fn open_badge(state: &mut AppState, ttl: &mut TtlCache, league_id: &str) -> Option<ProviderCommand> {
    if let Some(entry) = state.badge_cache.get(&league_id.to_string()) {
        let badge_url = entry.badge_url.clone();
        publish(state, league_id, badge_url);
        return None;
    }

    if let Some(entry) = ttl.get::<BadgeCacheEntry>(&config::badge_cache_key(league_id)) {
        store_badge(state, ttl, league_id, entry.badge_url.clone());
        publish(state, league_id, entry.badge_url);
        return None;
    }

    state.badge_loading = true;
    state.badge_error = None;
    state.pending_badge = Some(league_id.to_string());
    Some(ProviderCommand::FetchBadge {
        league_id: league_id.to_string(),
    })
}

/// Writes a badge lookup result into both cache layers. A `None` URL is a
/// valid outcome ("league has no badge") and is cached like any other.
pub fn store_badge(state: &mut AppState, ttl: &mut TtlCache, league_id: &str, badge_url: Option<String>) {
    let entry = BadgeCacheEntry {
        badge_url,
        fetched_at: ttl_cache::now_millis(),
    };
    ttl.set(&config::badge_cache_key(league_id), &entry, config::CACHE_TTL);
    state.badge_cache.put(league_id.to_string(), entry);
}

fn publish(state: &mut AppState, league_id: &str, badge_url: Option<String>) {
    state.badge_loading = false;
    state.badge_error = None;
    state.pending_badge = None;
    state.active_badge = Some(ActiveBadge {
        league_id: league_id.to_string(),
        badge_url,
    });
}
