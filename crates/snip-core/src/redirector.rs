use crate::error::RedirectError;
use async_trait::async_trait;

#[async_trait]
pub trait Redirector: Send + Sync + 'static {
    /// Resolves a short code to its original URL and records the click.
    async fn resolve(&self, code: &str) -> Result<String, RedirectError>;
}
