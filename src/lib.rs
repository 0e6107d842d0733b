pub mod badge;
pub mod config;
pub mod debounce;
pub mod feed;
pub mod fifo_cache;
pub mod http_client;
pub mod leagues_fetch;
pub mod sample_feed;
pub mod search_index;
pub mod selectors;
pub mod state;
pub mod ttl_cache;
