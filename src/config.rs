use std::time::Duration;

pub const LEAGUES_CACHE_KEY: &str = "league-list:leagues";
pub const BADGE_CACHE_PREFIX: &str = "league-list:badge:";
pub const SEARCH_QUERY_KEY: &str = "league-list:search-query";
pub const SPORT_FILTER_KEY: &str = "league-list:sport-filter";

// Remote payloads go stale after half an hour; remembered filters stick around.
pub const CACHE_TTL: Duration = Duration::from_secs(30 * 60);
pub const FILTER_TTL: Duration = Duration::from_secs(30 * 24 * 60 * 60);

const DEFAULT_BADGE_CACHE_CAPACITY: usize = 50;
const DEFAULT_SEARCH_DEBOUNCE_MS: u64 = 300;

pub fn badge_cache_capacity() -> usize {
    std::env::var("BADGE_CACHE_CAPACITY")
        .ok()
        .and_then(|val| val.parse::<usize>().ok())
        .unwrap_or(DEFAULT_BADGE_CACHE_CAPACITY)
        .clamp(1, 10_000)
}

pub fn search_debounce() -> Duration {
    let ms = std::env::var("SEARCH_DEBOUNCE_MS")
        .ok()
        .and_then(|val| val.parse::<u64>().ok())
        .unwrap_or(DEFAULT_SEARCH_DEBOUNCE_MS)
        .min(5_000);
    Duration::from_millis(ms)
}

pub fn leagues_ttl() -> Duration {
    std::env::var("LEAGUES_TTL_SECS")
        .ok()
        .and_then(|val| val.parse::<u64>().ok())
        .map(Duration::from_secs)
        .unwrap_or(CACHE_TTL)
}

pub fn badge_cache_key(league_id: &str) -> String {
    format!("{BADGE_CACHE_PREFIX}{league_id}")
}
