//! Error type for `drillog-store-sqlite`.

use thiserror::Error;

use crate::schema::SchemaDiff;

#[derive(Debug, Error)]
pub enum Error {
  /// Bad database name or no usable store handle.
  #[error("configuration error: {0}")]
  Configuration(String),

  #[error("a store connection already exists")]
  ConnectionExists,

  #[error("no store connection; open or create a database first")]
  NotConnected,

  #[error("storage error: {0}")]
  Storage(#[from] rusqlite::Error),

  /// The live composite-log table does not have the required columns.
  #[error("schema mismatch: {0}")]
  SchemaMismatch(SchemaDiff),

  #[error("date/time parse error: {0}")]
  DateParse(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
