use crate::error::StorageError;
use crate::pagination::PageRequest;
use crate::shortcode::ShortCode;
use async_trait::async_trait;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Type alias for repository results.
pub type Result<T> = std::result::Result<T, StorageError>;

/// A stored URL record in the repository.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UrlRecord {
    pub id: Uuid,
    pub short_code: ShortCode,
    /// The original URL that was shortened.
    pub original_url: String,
    /// Number of successful resolutions.
    pub click_count: u64,
    pub created_at: Timestamp,
    /// Last successful resolution, or the creation time if never resolved.
    pub last_accessed_at: Timestamp,
}

impl UrlRecord {
    /// Creates a fresh record with a new id and zero clicks.
    pub fn new(short_code: ShortCode, original_url: impl Into<String>) -> Self {
        let now = Timestamp::now();
        Self {
            id: Uuid::new_v4(),
            short_code,
            original_url: original_url.into(),
            click_count: 0,
            created_at: now,
            last_accessed_at: now,
        }
    }
}

/// A read-only view of a repository.
///
/// Listing and analytics only need these operations.
#[async_trait]
pub trait ReadRepository: Send + Sync + 'static {
    /// Retrieves the URL record for a given short code.
    /// Returns `None` if the code does not exist.
    async fn get(&self, code: &ShortCode) -> Result<Option<UrlRecord>>;

    /// Checks whether a short code already exists in the repository.
    async fn exists(&self, code: &ShortCode) -> Result<bool>;

    /// Retrieves the earliest record created for `original_url`, if any.
    async fn find_by_original_url(&self, original_url: &str) -> Result<Option<UrlRecord>>;

    /// Lists records ordered by creation time, newest first.
    ///
    /// Returns the requested slice together with the total number of records.
    async fn list(&self, page: &PageRequest) -> Result<(Vec<UrlRecord>, u64)>;
}

#[async_trait]
pub trait Repository: ReadRepository {
    /// Inserts a new URL record. Returns `Err(Conflict)` if the code already exists.
    async fn insert(&self, record: &UrlRecord) -> Result<()>;

    /// Increments the click count of the record with `id` and bumps its
    /// last access time.
    ///
    /// Updating an unknown id is not an error.
    async fn record_click(&self, id: Uuid) -> Result<()>;

    /// Same as [`Repository::record_click`], addressed by short code.
    async fn record_click_by_code(&self, code: &ShortCode) -> Result<()>;
}
