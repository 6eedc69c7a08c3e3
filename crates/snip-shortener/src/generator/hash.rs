use crate::generator::Generator;
use base64::engine::general_purpose::URL_SAFE;
use base64::Engine;
use jiff::Timestamp;
use sha1::{Digest, Sha1};
use snip_core::ShortCode;

/// Longest code a SHA-1 digest yields once the base64 padding is dropped.
pub const MAX_HASH_CODE_LENGTH: usize = 27;

/// Derives codes from a SHA-1 digest of the URL and the current time.
///
/// The input is `"{url}-{unix_nanos}"`, so shortening the same URL twice
/// yields different candidates. The digest is encoded with the URL-safe
/// base64 alphabet and truncated, which keeps every code inside
/// `[A-Za-z0-9_-]`.
#[derive(Debug, Clone, Copy, Default)]
pub struct HashGenerator;

impl HashGenerator {
    pub fn new() -> Self {
        Self
    }

    fn encode(input: &str, length: usize) -> ShortCode {
        let digest = Sha1::digest(input.as_bytes());
        let mut encoded = URL_SAFE.encode(digest);
        encoded.truncate(length.min(MAX_HASH_CODE_LENGTH));
        ShortCode::new_unchecked(encoded)
    }
}

impl Generator for HashGenerator {
    fn generate(&self, original_url: &str, length: usize) -> ShortCode {
        let nanos = Timestamp::now().as_nanosecond();
        Self::encode(&format!("{original_url}-{nanos}"), length)
    }
}
