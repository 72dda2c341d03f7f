//! Error types for the drillog worksheet reader.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("worksheet {sheet:?} not found (workbook has {available:?})")]
  SheetNotFound { sheet: String, available: Vec<String> },

  #[error("row {row}: unexpected {field} cell: {value}")]
  UnexpectedCell { row: u32, field: &'static str, value: String },

  #[error("unknown layout version: {0:?}")]
  UnknownLayout(String),

  #[error("workbook error: {0}")]
  Workbook(#[from] calamine::Error),

  #[error("extraction cancelled after {0} rows")]
  Cancelled(usize),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
