use crate::error::ShortenerError;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// A short code identifying one shortened URL.
///
/// Codes only ever contain URL-safe characters (`[a-zA-Z0-9_-]`). User
/// supplied aliases go through [`ShortCode::custom`], which additionally
/// enforces a 3-32 character length.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShortCode(String);

const MIN_ALIAS_LENGTH: usize = 3;
const MAX_ALIAS_LENGTH: usize = 32;

/// First path segments owned by fixed HTTP routes. An alias equal to one of
/// these could be stored but never resolved.
pub const RESERVED_ALIASES: [&str; 4] = ["analytics", "health", "shorten", "urls"];

impl ShortCode {
    /// Creates a `ShortCode` from a user supplied custom alias.
    ///
    /// Valid aliases are 3-32 characters, contain only `[a-zA-Z0-9_-]` and
    /// are not one of [`RESERVED_ALIASES`].
    pub fn custom(alias: impl Into<String>) -> Result<Self, ShortenerError> {
        let alias = alias.into();
        Self::validate(&alias)?;
        Ok(Self(alias))
    }

    /// Creates a `ShortCode` without validation.
    ///
    /// Use this for codes produced by the generators, for values read back
    /// from storage, and for lookups where an unknown code is simply a miss.
    pub fn new_unchecked(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// Generates the full shortened URL based on the provided base URL.
    pub fn to_url(&self, base_url: &str) -> String {
        format!("{}/{}", base_url.trim_end_matches('/'), self.0)
    }

    /// Returns the short code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the number of characters in the code.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn validate(code: &str) -> Result<(), ShortenerError> {
        if code.len() < MIN_ALIAS_LENGTH || code.len() > MAX_ALIAS_LENGTH {
            return Err(ShortenerError::InvalidShortCode(format!(
                "length must be between {} and {}, got {}",
                MIN_ALIAS_LENGTH,
                MAX_ALIAS_LENGTH,
                code.len()
            )));
        }

        if !code.chars().all(is_code_char) {
            return Err(ShortenerError::InvalidShortCode(format!(
                "must contain only alphanumeric characters, hyphens, or underscores: '{}'",
                code
            )));
        }

        if RESERVED_ALIASES.contains(&code) {
            return Err(ShortenerError::InvalidShortCode(format!(
                "'{code}' is reserved"
            )));
        }

        Ok(())
    }
}

/// Returns `true` for characters allowed in a short code.
pub fn is_code_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

impl Display for ShortCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ShortCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
