use async_trait::async_trait;
use jiff::Timestamp;
use snip_core::repository::{ReadRepository, Repository, Result, UrlRecord};
use snip_core::{PageRequest, ShortCode, StorageError};
use sqlx::mysql::{MySqlPoolOptions, MySqlRow};
use sqlx::{MySqlPool, Row};
use std::time::Duration;
use tracing::{debug, trace};
use uuid::Uuid;

const RECORD_COLUMNS: &str =
    "id, short_code, original_url, click_count, created_at, last_accessed_at";

/// MySQL implementation of the repository contract.
///
/// Timestamps are stored as microseconds since the Unix epoch. Short codes
/// are unique at the storage level, so a concurrent insert that lost the
/// race surfaces as [`StorageError::Conflict`]. Original URLs carry no
/// uniqueness constraint. Rows created in the same microsecond are ordered
/// by the auto-increment `seq` column, i.e. by insertion.
#[derive(Debug, Clone)]
pub struct MySqlRepository {
    pool: MySqlPool,
}

impl MySqlRepository {
    /// Creates a repository from an existing MySQL connection pool.
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Creates a repository by opening a new MySQL connection pool.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = MySqlPoolOptions::new()
            .max_connections(max_connections)
            .max_lifetime(Duration::from_secs(60 * 60))
            .connect(database_url)
            .await
            .map_err(map_sqlx_error)?;
        debug!(max_connections, "Connected to MySQL");
        Ok(Self::new(pool))
    }

    /// Applies the embedded schema migrations.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| StorageError::Query(format!("migration failed: {e}")))
    }

    /// Returns a reference to the underlying pool.
    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }

    /// Closes the pool, waiting for checked-out connections to be returned.
    pub async fn close(&self) {
        self.pool.close().await;
        debug!("Closed MySQL pool");
    }
}

fn to_micros(ts: Timestamp) -> i64 {
    ts.as_microsecond()
}

fn parse_timestamp(column: &str, micros: i64) -> Result<Timestamp> {
    Timestamp::from_microsecond(micros).map_err(|e| {
        StorageError::InvalidData(format!("invalid {column} timestamp '{micros}': {e}"))
    })
}

fn record_from_row(row: &MySqlRow) -> Result<UrlRecord> {
    let id: String = row.try_get("id").map_err(map_sqlx_error)?;
    let short_code: String = row.try_get("short_code").map_err(map_sqlx_error)?;
    let original_url: String = row.try_get("original_url").map_err(map_sqlx_error)?;
    let click_count: u64 = row.try_get("click_count").map_err(map_sqlx_error)?;
    let created_at: i64 = row.try_get("created_at").map_err(map_sqlx_error)?;
    let last_accessed_at: i64 = row.try_get("last_accessed_at").map_err(map_sqlx_error)?;

    let id = Uuid::parse_str(&id)
        .map_err(|e| StorageError::InvalidData(format!("invalid record id '{id}': {e}")))?;

    Ok(UrlRecord {
        id,
        short_code: ShortCode::new_unchecked(short_code),
        original_url,
        click_count,
        created_at: parse_timestamp("created_at", created_at)?,
        last_accessed_at: parse_timestamp("last_accessed_at", last_accessed_at)?,
    })
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .is_some_and(sqlx::error::DatabaseError::is_unique_violation)
}

fn map_sqlx_error(err: sqlx::Error) -> StorageError {
    let message = err.to_string();

    match err {
        sqlx::Error::PoolTimedOut => StorageError::Timeout(message),
        sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_) => StorageError::Unavailable(message),
        sqlx::Error::ColumnIndexOutOfBounds { .. }
        | sqlx::Error::ColumnNotFound(_)
        | sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::TypeNotFound { .. }
        | sqlx::Error::Decode(_)
        | sqlx::Error::RowNotFound => StorageError::InvalidData(message),
        _ => StorageError::Query(message),
    }
}

#[async_trait]
impl ReadRepository for MySqlRepository {
    async fn get(&self, code: &ShortCode) -> Result<Option<UrlRecord>> {
        trace!(code = %code, "Fetching record from MySQL");

        let row = sqlx::query(&format!(
            "SELECT {RECORD_COLUMNS} FROM short_urls WHERE short_code = ? LIMIT 1"
        ))
        .bind(code.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        row.as_ref().map(record_from_row).transpose()
    }

    async fn exists(&self, code: &ShortCode) -> Result<bool> {
        let exists = sqlx::query(
            r#"
            SELECT 1
            FROM short_urls
            WHERE short_code = ?
            LIMIT 1
            "#,
        )
        .bind(code.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?
        .is_some();

        Ok(exists)
    }

    async fn find_by_original_url(&self, original_url: &str) -> Result<Option<UrlRecord>> {
        let row = sqlx::query(&format!(
            "SELECT {RECORD_COLUMNS} FROM short_urls \
             WHERE original_url = ? \
             ORDER BY created_at ASC, seq ASC \
             LIMIT 1"
        ))
        .bind(original_url)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        row.as_ref().map(record_from_row).transpose()
    }

    async fn list(&self, page: &PageRequest) -> Result<(Vec<UrlRecord>, u64)> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM short_urls")
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        let rows = match page.limit() {
            Some(limit) => {
                sqlx::query(&format!(
                    "SELECT {RECORD_COLUMNS} FROM short_urls \
                     ORDER BY created_at DESC, seq DESC \
                     LIMIT ? OFFSET ?"
                ))
                .bind(limit)
                .bind(page.offset())
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query(&format!(
                    "SELECT {RECORD_COLUMNS} FROM short_urls ORDER BY created_at DESC, seq DESC"
                ))
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(map_sqlx_error)?;

        let records = rows
            .iter()
            .map(record_from_row)
            .collect::<Result<Vec<_>>>()?;

        Ok((records, u64::try_from(total).unwrap_or(0)))
    }
}

#[async_trait]
impl Repository for MySqlRepository {
    async fn insert(&self, record: &UrlRecord) -> Result<()> {
        let result = sqlx::query(
            r#"
            INSERT INTO short_urls
                (id, short_code, original_url, click_count, created_at, last_accessed_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(record.id.to_string())
        .bind(record.short_code.as_str())
        .bind(&record.original_url)
        .bind(record.click_count)
        .bind(to_micros(record.created_at))
        .bind(to_micros(record.last_accessed_at))
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(err) if is_unique_violation(&err) => {
                Err(StorageError::Conflict(record.short_code.to_string()))
            }
            Err(err) => Err(map_sqlx_error(err)),
        }
    }

    async fn record_click(&self, id: Uuid) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE short_urls
            SET click_count = click_count + 1,
                last_accessed_at = GREATEST(last_accessed_at, ?)
            WHERE id = ?
            "#,
        )
        .bind(to_micros(Timestamp::now()))
        .bind(id.to_string())
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn record_click_by_code(&self, code: &ShortCode) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE short_urls
            SET click_count = click_count + 1,
                last_accessed_at = GREATEST(last_accessed_at, ?)
            WHERE short_code = ?
            "#,
        )
        .bind(to_micros(Timestamp::now()))
        .bind(code.as_str())
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }
}
