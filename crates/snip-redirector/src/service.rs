use std::sync::Arc;

use async_trait::async_trait;
use snip_core::{RedirectError, Redirector, Repository, ShortCode, UrlCache};
use tracing::{debug, trace, warn};

/// Service for handling URL redirects.
///
/// Looks the code up in the cache first and in storage on a miss. Every
/// successful resolution records a click; click and cache-write failures
/// are logged and do not fail the redirect.
pub struct RedirectorService<R: ?Sized, C: ?Sized> {
    repository: Arc<R>,
    cache: Arc<C>,
}

impl<R, C> RedirectorService<R, C>
where
    R: Repository + ?Sized,
    C: UrlCache + ?Sized,
{
    /// Creates a new RedirectorService with the given repository and cache.
    pub fn new(repository: Arc<R>, cache: Arc<C>) -> Self {
        Self { repository, cache }
    }

    async fn cached_url(&self, code: &ShortCode) -> Option<String> {
        match self.cache.get_url(code).await {
            Ok(url) => url,
            Err(e) => {
                warn!(code = %code, error = %e, "Cache lookup failed, falling back to storage");
                None
            }
        }
    }
}

#[async_trait]
impl<R, C> Redirector for RedirectorService<R, C>
where
    R: Repository + ?Sized,
    C: UrlCache + ?Sized,
{
    async fn resolve(&self, code: &str) -> crate::Result<String> {
        let code = code.trim();
        if code.is_empty() {
            return Err(RedirectError::EmptyShortCode);
        }
        let code = ShortCode::new_unchecked(code);
        trace!(code = %code, "resolving short code");

        if let Some(url) = self.cached_url(&code).await {
            debug!(code = %code, "Resolved short code from cache");
            if let Err(e) = self.repository.record_click_by_code(&code).await {
                warn!(code = %code, error = %e, "Failed to record click");
            }
            return Ok(url);
        }

        let Some(record) = self.repository.get(&code).await? else {
            trace!(code = %code, "Short code not found");
            return Err(RedirectError::NotFound(code.to_string()));
        };

        if let Err(e) = self.cache.set_url(&code, &record.original_url).await {
            warn!(code = %code, error = %e, "Failed to cache resolved URL");
        }
        if let Err(e) = self.repository.record_click(record.id).await {
            warn!(code = %code, error = %e, "Failed to record click");
        }

        debug!(code = %code, url = %record.original_url, "Resolved short code");
        Ok(record.original_url)
    }
}
