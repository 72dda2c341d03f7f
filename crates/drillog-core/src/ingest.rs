//! Import pipeline: extracted records → store inserts → code propagation.
//!
//! Extraction is drained completely before the first insert, so a bad row
//! anywhere in the sheet leaves the store untouched. Inserts are not fenced as
//! a batch: when one fails, the rows before it stay committed.

use std::collections::BTreeSet;

use thiserror::Error;

use crate::{
  catalog::Domain,
  interval::NewInterval,
  propagate::{Direction, PropagationReport},
  store::LogStore,
};

#[derive(Debug, Error)]
pub enum IngestError<X, S>
where
  X: std::error::Error + 'static,
  S: std::error::Error + 'static,
{
  /// Nothing was inserted.
  #[error("extraction failed: {0}")]
  Extract(#[source] X),

  /// `committed` rows were inserted before the failing one.
  #[error("insert failed after {committed} rows: {source}")]
  Insert {
    committed: usize,
    #[source]
    source:    S,
  },

  /// All rows were inserted; propagation of `domain` failed.
  #[error("{domain} propagation failed: {source}")]
  Propagate {
    domain: Domain,
    #[source]
    source: S,
  },
}

/// Summary of a completed import.
#[derive(Debug, Clone, Default)]
pub struct ImportReport {
  pub inserted:    usize,
  /// Hole ids touched by this import.
  pub holes:       BTreeSet<String>,
  pub propagation: Vec<PropagationReport>,
}

/// Insert every record into `store`, then propagate all domains in
/// `direction` when one is given.
pub fn ingest<S, I, X>(
  store: &S,
  records: I,
  direction: Option<Direction>,
) -> Result<ImportReport, IngestError<X, S::Error>>
where
  S: LogStore,
  I: IntoIterator<Item = Result<NewInterval, X>>,
  X: std::error::Error + 'static,
{
  let records = records
    .into_iter()
    .collect::<Result<Vec<_>, X>>()
    .map_err(IngestError::Extract)?;

  let mut report = ImportReport::default();
  for record in &records {
    store
      .insert(record)
      .map_err(|source| IngestError::Insert { committed: report.inserted, source })?;
    report.inserted += 1;
    report.holes.insert(record.hole_id.clone());
  }

  if let Some(direction) = direction {
    for domain in Domain::ALL {
      let run = store
        .propagate(domain, direction)
        .map_err(|source| IngestError::Propagate { domain, source })?;
      report.propagation.push(run);
    }
  }

  Ok(report)
}
