use crate::error::CacheError;
use crate::shortcode::ShortCode;
use async_trait::async_trait;

/// Type alias for cache results.
pub type Result<T> = std::result::Result<T, CacheError>;

/// A bidirectional cache between short codes and original URLs.
///
/// Both directions live in the same backend under separate key spaces.
/// Entries expire after a fixed time-to-live chosen when the backend is
/// constructed.
#[async_trait]
pub trait UrlCache: Send + Sync + 'static {
    /// Looks up the original URL for a short code.
    ///
    /// Returns `Ok(None)` if the key is not in the cache.
    async fn get_url(&self, code: &ShortCode) -> Result<Option<String>>;

    /// Looks up the short code previously assigned to an original URL.
    async fn get_code(&self, original_url: &str) -> Result<Option<ShortCode>>;

    /// Stores the `code -> original_url` direction.
    async fn set_url(&self, code: &ShortCode, original_url: &str) -> Result<()>;

    /// Stores the `original_url -> code` direction.
    async fn set_code(&self, original_url: &str, code: &ShortCode) -> Result<()>;
}
