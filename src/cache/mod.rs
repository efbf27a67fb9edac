//! Cache Module
//!
//! In-memory response cache with lazy TTL expiry and structured keys.

mod clock;
mod entry;
mod key;
mod stats;
mod store;


// Re-export public types
pub use clock::{Clock, ManualClock, SystemClock};
pub use entry::CacheEntry;
pub use key::{CacheKey, Endpoint};
pub use stats::CacheStats;
pub use store::ResponseCache;

// == Public Constants ==
/// Default time-to-live for cached responses, in seconds
pub const DEFAULT_TTL_SECS: u64 = 3600;
