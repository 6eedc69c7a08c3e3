//! URL shortener service implementation.
//!
//! This crate provides the short code generators, the collision policy and
//! the service behind shortening, listing and analytics. Core types are
//! re-exported from `snip_core`.

pub mod generator;
pub mod policy;
pub mod service;

pub use generator::hash::HashGenerator;
pub use generator::seq::SeqGenerator;
pub use generator::Generator;
pub use policy::CodePolicy;
pub use service::ShortenerService;
pub use snip_core::{Analytics, ShortenParams, Shortened, Shortener, ShortenerError};
