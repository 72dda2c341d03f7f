//! Error types for `drillog-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("unknown classification domain: {0:?}")]
  UnknownDomain(String),

  #[error("unknown propagation direction: {0:?}")]
  UnknownDirection(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
