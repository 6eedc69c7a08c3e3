use crate::error::ShortenerError;
use crate::pagination::{Page, PageRequest};
use crate::repository::UrlRecord;
use crate::shortcode::ShortCode;
use async_trait::async_trait;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};

type Result<T> = std::result::Result<T, ShortenerError>;

/// Parameters for creating a shortened URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShortenParams {
    /// The original URL to be shortened.
    pub original_url: String,
    /// Optional custom alias for the shortened URL.
    pub custom_alias: Option<String>,
}

impl ShortenParams {
    pub fn new(original_url: impl Into<String>) -> Self {
        Self {
            original_url: original_url.into(),
            custom_alias: None,
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.custom_alias = Some(alias.into());
        self
    }
}

/// The outcome of a shorten request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Shortened {
    pub short_code: ShortCode,
    pub original_url: String,
}

impl From<UrlRecord> for Shortened {
    fn from(record: UrlRecord) -> Self {
        Self {
            short_code: record.short_code,
            original_url: record.original_url,
        }
    }
}

/// Click analytics for a single short code.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Analytics {
    pub short_code: ShortCode,
    pub original_url: String,
    pub click_count: u64,
    pub last_accessed_at: Timestamp,
}

impl From<UrlRecord> for Analytics {
    fn from(record: UrlRecord) -> Self {
        Self {
            short_code: record.short_code,
            original_url: record.original_url,
            click_count: record.click_count,
            last_accessed_at: record.last_accessed_at,
        }
    }
}

#[async_trait]
pub trait Shortener: Send + Sync + 'static {
    /// Shortens a URL, reusing an existing code for a URL seen before.
    async fn shorten(&self, params: ShortenParams) -> Result<Shortened>;

    /// Lists stored records, newest first.
    async fn list(&self, page: PageRequest) -> Result<Page<UrlRecord>>;

    /// Returns the click analytics of a short code.
    async fn analytics(&self, code: &str) -> Result<Analytics>;
}
