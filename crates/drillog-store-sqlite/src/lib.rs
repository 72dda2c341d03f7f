//! SQLite backend for the drillog composite log.
//!
//! Owns the composite-log table and the three reference catalogs. Access is
//! synchronous through a single [`rusqlite::Connection`]; a [`Session`] holds
//! at most one open store at a time.

mod encode;
mod store;

pub mod error;
pub mod schema;
pub mod session;

pub use error::{Error, Result};
pub use schema::{SchemaDiff, SchemaVariant};
pub use session::{Session, normalize_db_path};
pub use store::SqliteStore;

#[cfg(test)]
mod tests;
