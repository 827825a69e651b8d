pub mod bracket;
pub mod engine;
pub mod http_cache;
pub mod http_client;
pub mod persist;
pub mod projection;
pub mod rankings_fetch;
pub mod state;
