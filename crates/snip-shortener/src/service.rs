use crate::generator::Generator;
use crate::policy::CodePolicy;
use async_trait::async_trait;
use snip_core::validate::{is_valid_url, MAX_URL_LENGTH};
use snip_core::{
    Analytics, Page, PageRequest, Repository, ShortCode, ShortenParams, Shortened, Shortener,
    ShortenerError, StorageError, UrlCache, UrlRecord,
};
use std::sync::Arc;
use tracing::{debug, trace, warn};

type Result<T> = std::result::Result<T, ShortenerError>;

/// A concrete implementation of the `Shortener` trait.
///
/// This service wraps a `Repository`, a `UrlCache` and a `Generator` to handle:
/// - URL validation
/// - Reuse of codes already assigned to a URL (cache first, then storage)
/// - Custom aliases
/// - Bounded generate-and-check code assignment, see [`CodePolicy`]
///
/// Cache writes are best-effort: failures are logged and never surface to
/// the caller. Cache read failures are treated as misses.
pub struct ShortenerService<R: ?Sized, C: ?Sized, G> {
    repository: Arc<R>,
    cache: Arc<C>,
    generator: G,
    policy: CodePolicy,
}

impl<R, C, G> ShortenerService<R, C, G>
where
    R: Repository + ?Sized,
    C: UrlCache + ?Sized,
    G: Generator,
{
    pub fn new(repository: Arc<R>, cache: Arc<C>, generator: G, policy: CodePolicy) -> Self {
        Self {
            repository,
            cache,
            generator,
            policy,
        }
    }

    fn validate_url(url: &str) -> Result<()> {
        if url.is_empty() {
            return Err(ShortenerError::InvalidUrl(
                "URL cannot be empty".to_string(),
            ));
        }
        if url.len() > MAX_URL_LENGTH {
            return Err(ShortenerError::InvalidUrl(format!(
                "URL exceeds {MAX_URL_LENGTH} bytes"
            )));
        }
        if !is_valid_url(url) {
            return Err(ShortenerError::InvalidUrl(format!(
                "URL must be an absolute http or https URL: {url}"
            )));
        }
        Ok(())
    }

    async fn cached_code(&self, original_url: &str) -> Option<ShortCode> {
        match self.cache.get_code(original_url).await {
            Ok(code) => code,
            Err(e) => {
                warn!(url = %original_url, error = %e, "Cache lookup failed, falling back to storage");
                None
            }
        }
    }

    /// Writes both cache directions, logging instead of failing.
    async fn cache_mapping(&self, code: &ShortCode, original_url: &str) {
        if let Err(e) = self.cache.set_url(code, original_url).await {
            warn!(code = %code, error = %e, "Failed to cache code -> url");
        }
        if let Err(e) = self.cache.set_code(original_url, code).await {
            warn!(code = %code, error = %e, "Failed to cache url -> code");
        }
    }

    async fn shorten_with_alias(&self, original_url: String, alias: String) -> Result<Shortened> {
        let code = ShortCode::custom(alias)?;

        if self.repository.exists(&code).await? {
            return Err(ShortenerError::AliasConflict(code.to_string()));
        }

        let record = UrlRecord::new(code, original_url);
        match self.repository.insert(&record).await {
            Ok(()) => {}
            Err(StorageError::Conflict(code)) => return Err(ShortenerError::AliasConflict(code)),
            Err(e) => return Err(e.into()),
        }

        debug!(code = %record.short_code, "Stored URL under custom alias");
        self.cache_mapping(&record.short_code, &record.original_url)
            .await;
        Ok(record.into())
    }

    async fn shorten_generated(&self, original_url: String) -> Result<Shortened> {
        if let Some(short_code) = self.cached_code(&original_url).await {
            debug!(code = %short_code, "URL already shortened (cache)");
            return Ok(Shortened {
                short_code,
                original_url,
            });
        }

        if let Some(record) = self.repository.find_by_original_url(&original_url).await? {
            debug!(code = %record.short_code, "URL already shortened (storage)");
            self.cache_mapping(&record.short_code, &record.original_url)
                .await;
            return Ok(record.into());
        }

        for (attempt, length) in self.policy.lengths().enumerate() {
            let code = self.generator.generate(&original_url, length);

            if self.repository.exists(&code).await? {
                debug!(code = %code, attempt, "Short code collision");
                continue;
            }

            let record = UrlRecord::new(code, original_url.clone());
            match self.repository.insert(&record).await {
                Ok(()) => {
                    debug!(code = %record.short_code, attempt, "Stored new short code");
                    self.cache_mapping(&record.short_code, &record.original_url)
                        .await;
                    return Ok(record.into());
                }
                Err(StorageError::Conflict(_)) => {
                    debug!(code = %record.short_code, attempt, "Short code taken concurrently");
                }
                Err(e) => return Err(e.into()),
            }
        }

        warn!(url = %original_url, attempts = self.policy.max_attempts(), "No free short code");
        Err(ShortenerError::CodeSpaceExhausted(self.policy.max_attempts()))
    }
}

#[async_trait]
impl<R, C, G> Shortener for ShortenerService<R, C, G>
where
    R: Repository + ?Sized,
    C: UrlCache + ?Sized,
    G: Generator,
{
    async fn shorten(&self, params: ShortenParams) -> Result<Shortened> {
        let ShortenParams {
            original_url,
            custom_alias,
        } = params;
        trace!(url = %original_url, "Shortening URL");

        Self::validate_url(&original_url)?;

        match custom_alias.filter(|alias| !alias.is_empty()) {
            Some(alias) => self.shorten_with_alias(original_url, alias).await,
            None => self.shorten_generated(original_url).await,
        }
    }

    async fn list(&self, page: PageRequest) -> Result<Page<UrlRecord>> {
        let (data, total_count) = self.repository.list(&page).await?;
        trace!(
            page = page.page(),
            returned = data.len(),
            total_count,
            "Listed records"
        );

        Ok(Page {
            data,
            total_count,
            pages: page.pages(total_count),
        })
    }

    async fn analytics(&self, code: &str) -> Result<Analytics> {
        let code = code.trim();
        if code.is_empty() {
            return Err(ShortenerError::InvalidShortCode(
                "short code cannot be empty".to_string(),
            ));
        }

        self.repository
            .get(&ShortCode::new_unchecked(code))
            .await?
            .map(Analytics::from)
            .ok_or_else(|| ShortenerError::NotFound(code.to_string()))
    }
}
