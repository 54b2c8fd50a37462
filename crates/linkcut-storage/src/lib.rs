//! Storage backends for the linkcut URL shortener.
//!
//! Three interchangeable implementations of the [`linkcut_core::Storage`]
//! contract: a purely in-memory map, a JSON-file-backed store that survives
//! restarts, and a Postgres-backed store for shared deployments.

pub mod file;
pub mod memory;
pub mod postgres;

mod tables;

pub use file::FileStorage;
pub use memory::MemoryStorage;
pub use postgres::PostgresStorage;
