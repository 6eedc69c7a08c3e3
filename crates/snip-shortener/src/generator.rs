pub mod hash;
pub mod seq;

use snip_core::ShortCode;

/// Trait for generating short codes.
///
/// Implementations are pure generators that don't interact with storage.
/// Uniqueness is not guaranteed; the service checks every candidate and
/// retries on collision.
pub trait Generator: Send + Sync + 'static {
    /// Produces a candidate code of `length` characters for `original_url`.
    ///
    /// Implementations may return a shorter code when `length` exceeds what
    /// they can produce.
    fn generate(&self, original_url: &str, length: usize) -> ShortCode;
}
