//! Core types and traits for the snip URL shortener.
//!
//! This crate provides the domain model shared by the storage, cache,
//! shortener, redirector and gateway crates.

pub mod cache;
pub mod error;
pub mod pagination;
pub mod redirector;
pub mod repository;
pub mod shortcode;
pub mod shortener;
pub mod validate;

pub use cache::UrlCache;
pub use error::{CacheError, RedirectError, ShortenerError, StorageError};
pub use pagination::{Page, PageRequest};
pub use redirector::Redirector;
pub use repository::{ReadRepository, Repository, UrlRecord};
pub use shortcode::ShortCode;
pub use shortener::{Analytics, ShortenParams, Shortened, Shortener};
