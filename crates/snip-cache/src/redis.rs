use async_trait::async_trait;
use redis::AsyncCommands;
use snip_core::cache::Result;
use snip_core::{CacheError, ShortCode, UrlCache};
use std::time::Duration;
use tracing::{debug, trace};

/// A Redis-based implementation of [`UrlCache`].
///
/// The forward direction lives under `{prefix}code:{code}` and the reverse
/// direction under `{prefix}url:{original_url}`. Every write sets the
/// configured expiry.
#[derive(Debug, Clone)]
pub struct RedisUrlCache {
    conn: redis::aio::MultiplexedConnection,
    key_prefix: String,
    ttl: Duration,
}

fn map_redis_error(operation: &str, err: redis::RedisError) -> CacheError {
    let message = format!("{operation}: {err}");
    if err.is_timeout() {
        CacheError::Timeout(message)
    } else if err.is_connection_dropped() || err.is_connection_refusal() {
        CacheError::Unavailable(message)
    } else {
        CacheError::Operation(message)
    }
}

impl RedisUrlCache {
    /// Creates a new Redis URL cache.
    ///
    /// # Arguments
    ///
    /// * `conn` - A multiplexed Redis connection
    /// * `ttl` - Expiry applied to every written key
    pub fn new(conn: redis::aio::MultiplexedConnection, ttl: Duration) -> Self {
        Self::with_prefix(conn, "snip:", ttl)
    }

    /// Creates a new Redis URL cache with a custom key prefix.
    pub fn with_prefix(
        conn: redis::aio::MultiplexedConnection,
        key_prefix: impl Into<String>,
        ttl: Duration,
    ) -> Self {
        Self {
            conn,
            key_prefix: key_prefix.into(),
            ttl,
        }
    }

    /// Opens a multiplexed connection to `redis_url` and wraps it.
    pub async fn connect(redis_url: &str, ttl: Duration) -> Result<Self> {
        let client = redis::Client::open(redis_url).map_err(|e| {
            CacheError::Initialization(format!("invalid Redis URL '{redis_url}': {e}"))
        })?;
        let conn = client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| CacheError::Initialization(format!("failed to connect to Redis: {e}")))?;
        debug!("Connected to Redis");
        Ok(Self::new(conn, ttl))
    }

    fn code_key(&self, code: &ShortCode) -> String {
        format!("{}code:{}", self.key_prefix, code.as_str())
    }

    fn url_key(&self, original_url: &str) -> String {
        format!("{}url:{original_url}", self.key_prefix)
    }

    fn ttl_secs(&self) -> u64 {
        // Redis rejects a zero expiry.
        self.ttl.as_secs().max(1)
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.conn.clone();
        match conn.get::<_, Option<String>>(key).await {
            Ok(value) => {
                trace!(key, hit = value.is_some(), "Redis lookup");
                Ok(value)
            }
            Err(e) => {
                debug!(key, error = %e, "Redis error on get");
                Err(map_redis_error("failed to fetch value from Redis", e))
            }
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut conn = self.conn.clone();
        match conn.set_ex::<_, _, ()>(key, value, self.ttl_secs()).await {
            Ok(()) => {
                debug!(key, "Cached value in Redis");
                Ok(())
            }
            Err(e) => {
                debug!(key, error = %e, "Failed to cache value in Redis");
                Err(map_redis_error("failed to write value to Redis", e))
            }
        }
    }
}

#[async_trait]
impl UrlCache for RedisUrlCache {
    async fn get_url(&self, code: &ShortCode) -> Result<Option<String>> {
        self.get(&self.code_key(code)).await
    }

    async fn get_code(&self, original_url: &str) -> Result<Option<ShortCode>> {
        let code = self.get(&self.url_key(original_url)).await?;
        Ok(code.map(ShortCode::new_unchecked))
    }

    async fn set_url(&self, code: &ShortCode, original_url: &str) -> Result<()> {
        self.set(&self.code_key(code), original_url).await
    }

    async fn set_code(&self, original_url: &str, code: &ShortCode) -> Result<()> {
        self.set(&self.url_key(original_url), code.as_str()).await
    }
}
