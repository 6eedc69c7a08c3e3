//! Persistent store accessors for URL records.

pub mod memory;
pub mod mysql;

pub use memory::InMemoryRepository;
pub use mysql::MySqlRepository;
pub use snip_core::repository::{ReadRepository, Repository, Result, UrlRecord};
pub use snip_core::StorageError;
