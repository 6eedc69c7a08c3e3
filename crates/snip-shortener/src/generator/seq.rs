use crate::generator::Generator;
use snip_core::ShortCode;
use std::sync::atomic::{AtomicU64, Ordering};

/// A deterministic generator using a prefix and a sequential counter.
///
/// The counter is zero-padded so the code fills the requested length, e.g.
/// `seq00000`, `seq00001` at length 8. Codes only repeat once the counter
/// overflows the available digits. Useful for tests and reproducible runs.
#[derive(Debug)]
pub struct SeqGenerator {
    counter: AtomicU64,
    prefix: String,
}

impl Clone for SeqGenerator {
    fn clone(&self) -> Self {
        Self {
            counter: AtomicU64::new(self.counter.load(Ordering::SeqCst)),
            prefix: self.prefix.clone(),
        }
    }
}

impl SeqGenerator {
    /// Creates a generator with a custom prefix.
    ///
    /// The prefix should only contain `[A-Za-z0-9_-]`.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self::with_offset(prefix, 0)
    }

    /// Creates a generator starting from a specific counter value.
    pub fn with_offset(prefix: impl Into<String>, offset: u64) -> Self {
        Self {
            counter: AtomicU64::new(offset),
            prefix: prefix.into(),
        }
    }
}

impl Generator for SeqGenerator {
    fn generate(&self, _original_url: &str, length: usize) -> ShortCode {
        let count = self.counter.fetch_add(1, Ordering::SeqCst);
        let width = length.saturating_sub(self.prefix.len()).max(1);
        let mut code = format!("{}{:0width$}", self.prefix, count);
        // Keep the least significant digits when the counter outgrows the width.
        if code.len() > length && length > self.prefix.len() {
            code.replace_range(self.prefix.len()..code.len() - width, "");
        }
        ShortCode::new_unchecked(code)
    }
}
