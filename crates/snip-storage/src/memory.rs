use async_trait::async_trait;
use dashmap::mapref::entry::Entry as MapEntry;
use dashmap::DashMap;
use jiff::Timestamp;
use snip_core::repository::{ReadRepository, Repository, Result, UrlRecord};
use snip_core::{PageRequest, ShortCode, StorageError};
use std::cmp::Reverse;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::trace;
use uuid::Uuid;

/// In-memory storage entry for a URL mapping.
#[derive(Debug, Clone)]
struct Entry {
    record: UrlRecord,
    /// Insertion order, breaks ties between equal creation timestamps.
    seq: u64,
}

impl Entry {
    fn touch(&mut self) {
        let now = Timestamp::now();
        self.record.click_count += 1;
        if now > self.record.last_accessed_at {
            self.record.last_accessed_at = now;
        }
    }
}

/// In-memory implementation of the Repository trait using DashMap.
///
/// DashMap provides better concurrency than RwLock<HashMap> because it
/// uses sharded locks, allowing concurrent reads and writes to different
/// buckets without blocking.
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    storage: DashMap<String, Entry>,
    ids: DashMap<Uuid, String>,
    next_seq: AtomicU64,
}

impl InMemoryRepository {
    /// Creates a new in-memory repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new in-memory repository with the specified capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            storage: DashMap::with_capacity(capacity),
            ids: DashMap::with_capacity(capacity),
            next_seq: AtomicU64::new(0),
        }
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    fn touch(&self, code: &str) {
        if let Some(mut entry) = self.storage.get_mut(code) {
            entry.touch();
        }
    }
}

#[async_trait]
impl ReadRepository for InMemoryRepository {
    async fn get(&self, code: &ShortCode) -> Result<Option<UrlRecord>> {
        Ok(self
            .storage
            .get(code.as_str())
            .map(|entry| entry.record.clone()))
    }

    async fn exists(&self, code: &ShortCode) -> Result<bool> {
        Ok(self.storage.contains_key(code.as_str()))
    }

    async fn find_by_original_url(&self, original_url: &str) -> Result<Option<UrlRecord>> {
        let earliest = self
            .storage
            .iter()
            .filter(|entry| entry.record.original_url == original_url)
            .min_by_key(|entry| (entry.record.created_at, entry.seq))
            .map(|entry| entry.record.clone());

        Ok(earliest)
    }

    async fn list(&self, page: &PageRequest) -> Result<(Vec<UrlRecord>, u64)> {
        let mut entries: Vec<Entry> = self.storage.iter().map(|e| e.value().clone()).collect();
        let total = entries.len() as u64;

        entries.sort_by_key(|entry| Reverse((entry.record.created_at, entry.seq)));

        let offset = usize::try_from(page.offset()).unwrap_or(usize::MAX);
        let limit = page
            .limit()
            .map_or(usize::MAX, |limit| usize::try_from(limit).unwrap_or(usize::MAX));

        let records = entries
            .into_iter()
            .skip(offset)
            .take(limit)
            .map(|entry| entry.record)
            .collect();

        Ok((records, total))
    }
}

#[async_trait]
impl Repository for InMemoryRepository {
    async fn insert(&self, record: &UrlRecord) -> Result<()> {
        let key = record.short_code.as_str().to_owned();

        match self.storage.entry(key.clone()) {
            MapEntry::Occupied(_) => Err(StorageError::Conflict(key)),
            MapEntry::Vacant(slot) => {
                let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
                slot.insert(Entry {
                    record: record.clone(),
                    seq,
                });
                self.ids.insert(record.id, key);
                trace!(code = %record.short_code, "Inserted record in memory");
                Ok(())
            }
        }
    }

    async fn record_click(&self, id: Uuid) -> Result<()> {
        let Some(code) = self.ids.get(&id).map(|code| code.value().clone()) else {
            return Ok(());
        };
        self.touch(&code);
        Ok(())
    }

    async fn record_click_by_code(&self, code: &ShortCode) -> Result<()> {
        self.touch(code.as_str());
        Ok(())
    }
}
