use async_trait::async_trait;
use moka::future::Cache;
use snip_core::cache::Result;
use snip_core::{ShortCode, UrlCache};
use std::time::Duration;
use tracing::{debug, trace};
use typed_builder::TypedBuilder;

const CODE_PREFIX: &str = "code:";
const URL_PREFIX: &str = "url:";

/// An in-memory cache implementation using Moka.
///
/// Both directions of the mapping share one bounded cache, separated by key
/// prefix. It's ideal for single-node deployments and tests.
#[derive(Debug, Clone)]
pub struct MokaUrlCache {
    cache: Cache<String, String>,
}

impl MokaUrlCache {
    /// Creates a new Moka URL cache with default settings.
    ///
    /// The cache holds at most 10,000 entries, each living for
    /// [`DEFAULT_TTL`](crate::DEFAULT_TTL).
    pub fn new() -> Self {
        MokaCacheConfig::builder().build().into()
    }

    /// Creates a new Moka URL cache with a custom maximum capacity and TTL.
    ///
    /// # Arguments
    ///
    /// * `max_capacity` - Maximum number of entries the cache can hold
    /// * `ttl` - Time-to-live for cache entries
    pub fn with_ttl(max_capacity: u64, ttl: Duration) -> Self {
        MokaCacheConfig::builder()
            .max_capacity(max_capacity)
            .ttl(ttl)
            .build()
            .into()
    }

    /// Returns a builder for creating a custom cache configuration.
    pub fn builder() -> MokaCacheConfigBuilder {
        MokaCacheConfig::builder()
    }

    fn code_key(code: &ShortCode) -> String {
        format!("{CODE_PREFIX}{}", code.as_str())
    }

    fn url_key(original_url: &str) -> String {
        format!("{URL_PREFIX}{original_url}")
    }
}

impl Default for MokaUrlCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UrlCache for MokaUrlCache {
    async fn get_url(&self, code: &ShortCode) -> Result<Option<String>> {
        match self.cache.get(&Self::code_key(code)).await {
            Some(url) => {
                debug!(code = %code, "Cache hit in Moka");
                Ok(Some(url))
            }
            None => {
                trace!(code = %code, "Cache miss in Moka");
                Ok(None)
            }
        }
    }

    async fn get_code(&self, original_url: &str) -> Result<Option<ShortCode>> {
        let code = self
            .cache
            .get(&Self::url_key(original_url))
            .await
            .map(ShortCode::new_unchecked);
        trace!(url = %original_url, hit = code.is_some(), "Reverse lookup in Moka");
        Ok(code)
    }

    async fn set_url(&self, code: &ShortCode, original_url: &str) -> Result<()> {
        self.cache
            .insert(Self::code_key(code), original_url.to_owned())
            .await;
        debug!(code = %code, "Cached URL in Moka");
        Ok(())
    }

    async fn set_code(&self, original_url: &str, code: &ShortCode) -> Result<()> {
        self.cache
            .insert(Self::url_key(original_url), code.as_str().to_owned())
            .await;
        debug!(code = %code, "Cached reverse mapping in Moka");
        Ok(())
    }
}

/// Configuration for creating a MokaUrlCache with custom settings.
#[derive(Debug, TypedBuilder)]
pub struct MokaCacheConfig {
    /// Maximum number of entries the cache can hold.
    #[builder(default = 10_000)]
    max_capacity: u64,
    /// Time-to-live for cache entries.
    #[builder(default = crate::DEFAULT_TTL)]
    ttl: Duration,
}

impl From<MokaCacheConfig> for MokaUrlCache {
    fn from(config: MokaCacheConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(config.max_capacity)
            .time_to_live(config.ttl)
            .build();

        MokaUrlCache { cache }
    }
}
