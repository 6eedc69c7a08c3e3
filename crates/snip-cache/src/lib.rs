//! Cache backends for the short code <-> URL mapping.

pub mod moka;
pub mod redis;

use std::time::Duration;

pub use self::moka::{MokaCacheConfig, MokaUrlCache};
pub use self::redis::RedisUrlCache;
pub use snip_core::cache::{Result, UrlCache};
pub use snip_core::CacheError;

/// Default time-to-live of every cache entry.
pub const DEFAULT_TTL: Duration = Duration::from_secs(24 * 60 * 60);
