//! Country Cache - A read-through caching proxy for the REST Countries API
//!
//! Lists, searches, compares, and filters countries, reshaping upstream
//! payloads into normalized records and caching each response with a TTL.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod upstream;

pub use api::AppState;
pub use config::Config;
