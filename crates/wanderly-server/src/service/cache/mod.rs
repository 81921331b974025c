//! In-memory caches shared by every request.
//!
//! - [`ResponseCache`]: read responses from the external API, keyed per
//!   session and invalidated by tag after mutations.
//! - [`HealthCache`]: reachability of the external API with a short TTL.

mod health_cache;
mod response_cache;

pub use health_cache::HealthCache;
pub use response_cache::{CacheKey, CacheTag, ResponseCache};
