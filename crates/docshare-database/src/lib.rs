//! # docshare-database
//!
//! Store contracts for documents, versions and the directory, with a
//! PostgreSQL backend (sqlx) and an in-memory backend.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod provider;
pub mod repositories;
pub mod seed;
pub mod store;

pub use connection::connect_pool;
pub use memory::MemoryDocumentStore;
pub use provider::open_store;
pub use repositories::PgDocumentStore;
pub use seed::seed_directory;
pub use store::{Directory, DocumentCatalog, DocumentStore, VersionLedger};
