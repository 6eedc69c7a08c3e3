//! Short code resolution.
//!
//! The redirector answers "where does this code point to" from the cache
//! when it can, falls back to storage, and records a click on every
//! successful resolution.

pub mod service;

pub use service::RedirectorService;
pub use snip_core::{RedirectError, Redirector};

/// Type alias for redirector results.
pub type Result<T> = std::result::Result<T, RedirectError>;
