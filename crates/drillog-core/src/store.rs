//! The `LogStore` trait.
//!
//! Implemented by storage backends (e.g. `drillog-store-sqlite`). The ingest
//! pipeline, the hole directory and the CLI depend on this abstraction, not on
//! a concrete backend.
//!
//! All calls are synchronous and run to completion on the calling thread.

use std::collections::BTreeSet;

use crate::{
  catalog::{CatalogEntry, Domain},
  interval::{LogInterval, NewInterval},
  propagate::{Direction, PropagationReport},
};

/// Abstraction over a composite-log backend.
///
/// Every write is atomic per call: on error the store is left as it was
/// before the call.
pub trait LogStore {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Writes ────────────────────────────────────────────────────────────

  /// Append one interval and return its surrogate key. Never deduplicates.
  fn insert(&self, interval: &NewInterval) -> Result<i64, Self::Error>;

  /// Remove every interval of `hole_id`; returns the number of rows removed.
  fn delete_by_hole_id(&self, hole_id: &str) -> Result<usize, Self::Error>;

  /// Rewrite the target code column of `domain` for every row from the
  /// catalog. See [`crate::propagate`].
  fn propagate(
    &self,
    domain: Domain,
    direction: Direction,
  ) -> Result<PropagationReport, Self::Error>;

  // ── Reads ─────────────────────────────────────────────────────────────

  /// All intervals in insertion order.
  fn scan_all(&self) -> Result<Vec<LogInterval>, Self::Error>;

  /// Intervals whose hole id is in `hole_ids`. An empty set means no filter.
  fn scan_by_hole_ids(
    &self,
    hole_ids: &BTreeSet<String>,
  ) -> Result<Vec<LogInterval>, Self::Error>;

  fn distinct_hole_ids(&self) -> Result<BTreeSet<String>, Self::Error>;

  /// Catalog rows of `domain` in seed order.
  fn catalog(&self, domain: Domain) -> Result<Vec<CatalogEntry>, Self::Error>;
}
