use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use snip_core::{Analytics, UrlRecord};
use uuid::Uuid;

#[derive(Deserialize)]
pub struct ShortenRequest {
    pub original_url: String,
    #[serde(default)]
    pub custom_alias: Option<String>,
}

#[derive(Serialize)]
pub struct ShortenResponse {
    pub original_url: String,
    pub short_url: String,
}

/// Raw listing parameters. Values that are not integers count as 0.
#[derive(Debug, Default, Deserialize)]
pub struct ListUrlsQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
}

fn parse_or_zero(value: Option<&str>) -> i64 {
    value.and_then(|v| v.trim().parse().ok()).unwrap_or(0)
}

impl ListUrlsQuery {
    pub fn page(&self) -> i64 {
        parse_or_zero(self.page.as_deref())
    }

    pub fn limit(&self) -> i64 {
        parse_or_zero(self.limit.as_deref())
    }
}

#[derive(Serialize)]
pub struct UrlResponse {
    pub id: Uuid,
    pub short_code: String,
    pub short_url: String,
    pub original_url: String,
    pub click_count: u64,
    pub created_at: Timestamp,
    pub last_accessed_at: Timestamp,
}

impl UrlResponse {
    pub fn from_record(record: UrlRecord, base_url: &str) -> Self {
        Self {
            id: record.id,
            short_url: record.short_code.to_url(base_url),
            short_code: record.short_code.to_string(),
            original_url: record.original_url,
            click_count: record.click_count,
            created_at: record.created_at,
            last_accessed_at: record.last_accessed_at,
        }
    }
}

#[derive(Serialize)]
pub struct ListUrlsResponse {
    pub data: Vec<UrlResponse>,
    pub total_count: u64,
    pub pages: u64,
}

#[derive(Serialize)]
pub struct AnalyticsResponse {
    pub short_code: String,
    pub original_url: String,
    pub click_count: u64,
    pub last_accessed_at: Timestamp,
}

impl From<Analytics> for AnalyticsResponse {
    fn from(analytics: Analytics) -> Self {
        Self {
            short_code: analytics.short_code.to_string(),
            original_url: analytics.original_url,
            click_count: analytics.click_count,
            last_accessed_at: analytics.last_accessed_at,
        }
    }
}
