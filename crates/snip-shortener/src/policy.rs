use std::iter;
use typed_builder::TypedBuilder;

/// Bounds the generate-and-check loop used when assigning a short code.
///
/// The service first tries `attempts` candidates of `length` characters,
/// then `widened_attempts` candidates of `widened_length` characters before
/// giving up with [`ShortenerError::CodeSpaceExhausted`].
///
/// [`ShortenerError::CodeSpaceExhausted`]: snip_core::ShortenerError::CodeSpaceExhausted
#[derive(Debug, Clone, TypedBuilder)]
pub struct CodePolicy {
    #[builder(default = 8)]
    length: usize,
    #[builder(default = 5)]
    attempts: usize,
    #[builder(default = 12)]
    widened_length: usize,
    #[builder(default = 5)]
    widened_attempts: usize,
}

impl Default for CodePolicy {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl CodePolicy {
    /// The code length of every attempt, in order.
    pub fn lengths(&self) -> impl Iterator<Item = usize> + '_ {
        iter::repeat_n(self.length, self.attempts)
            .chain(iter::repeat_n(self.widened_length, self.widened_attempts))
    }

    /// Total number of candidates tried before giving up.
    pub fn max_attempts(&self) -> usize {
        self.attempts + self.widened_attempts
    }

    pub fn length(&self) -> usize {
        self.length
    }
}
