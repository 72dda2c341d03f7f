//! Code propagation — derive one code of a pair from the other through the
//! domain's catalog.
//!
//! The catalog is read into a [`CodeMap`] once; [`plan`] then computes the
//! rewrite for every row. A backend applies the plan atomically. The result
//! for each row depends only on its known code, so applying a plan twice is
//! the same as applying it once.

use std::{
  collections::{BTreeSet, HashMap},
  fmt,
  str::FromStr,
};

use serde::{Deserialize, Serialize};

use crate::{
  Error, Result,
  catalog::{CatalogEntry, Domain},
  interval::CodeSlot,
};

// ─── Direction ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Direction {
  /// Fill the mnemonic column from the descriptive one.
  PrimaryFromSecondary,
  /// Fill the descriptive column from the mnemonic one.
  SecondaryFromPrimary,
}

impl Direction {
  /// The slot that is read.
  pub fn known(self) -> CodeSlot { self.target().other() }

  /// The slot that is overwritten.
  pub fn target(self) -> CodeSlot {
    match self {
      Self::PrimaryFromSecondary => CodeSlot::Primary,
      Self::SecondaryFromPrimary => CodeSlot::Secondary,
    }
  }

  pub fn as_str(self) -> &'static str {
    match self {
      Self::PrimaryFromSecondary => "primary-from-secondary",
      Self::SecondaryFromPrimary => "secondary-from-primary",
    }
  }
}

impl fmt::Display for Direction {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl FromStr for Direction {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    match s {
      "primary-from-secondary" => Ok(Self::PrimaryFromSecondary),
      "secondary-from-primary" => Ok(Self::SecondaryFromPrimary),
      _ => Err(Error::UnknownDirection(s.to_owned())),
    }
  }
}

// ─── CodeMap ─────────────────────────────────────────────────────────────────

/// Lookup from the known code to the target code for one direction.
#[derive(Debug, Clone, Default)]
pub struct CodeMap {
  map:       HashMap<String, String>,
  conflicts: BTreeSet<String>,
}

impl CodeMap {
  /// Build the lookup from catalog rows in seed order. For a key that appears
  /// more than once the first row wins and the key is recorded as a conflict.
  pub fn build(entries: &[CatalogEntry], direction: Direction) -> Self {
    let mut out = Self::default();
    for entry in entries {
      let (key, value) = match direction {
        Direction::PrimaryFromSecondary => (&entry.secondary, &entry.primary),
        Direction::SecondaryFromPrimary => (&entry.primary, &entry.secondary),
      };
      match out.map.get(key) {
        None => {
          out.map.insert(key.clone(), value.clone());
        }
        Some(existing) if existing != value => {
          out.conflicts.insert(key.clone());
        }
        Some(_) => {}
      }
    }
    out
  }

  pub fn lookup(&self, known: Option<&str>) -> Option<&str> {
    known.and_then(|k| self.map.get(k)).map(String::as_str)
  }

  /// Keys that mapped to more than one distinct target.
  pub fn conflicts(&self) -> &BTreeSet<String> { &self.conflicts }

  pub fn len(&self) -> usize { self.map.len() }

  pub fn is_empty(&self) -> bool { self.map.is_empty() }
}

// ─── Planning ────────────────────────────────────────────────────────────────

/// The code pair of one stored row, as read by a backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeRow {
  pub id:        i64,
  pub primary:   Option<String>,
  pub secondary: Option<String>,
}

/// New value for the target column of row `id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeUpdate {
  pub id:    i64,
  pub value: Option<String>,
}

/// Outcome of one propagation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropagationReport {
  pub domain:    Domain,
  pub direction: Direction,
  /// Rows inspected.
  pub scanned:   usize,
  /// Rows whose known code has a catalog entry.
  pub matched:   usize,
  /// Rows left with a null target.
  pub unmatched: usize,
  /// Rows whose stored value actually changed.
  pub rewritten: usize,
}

/// Compute the rewrite of the target column for every row.
///
/// Every row ends up with `target = map.lookup(known)`; only rows whose current
/// value differs appear in the returned update list.
pub fn plan(
  domain: Domain,
  direction: Direction,
  map: &CodeMap,
  rows: impl IntoIterator<Item = CodeRow>,
) -> (Vec<CodeUpdate>, PropagationReport) {
  let mut report = PropagationReport {
    domain,
    direction,
    scanned: 0,
    matched: 0,
    unmatched: 0,
    rewritten: 0,
  };
  let mut updates = Vec::new();

  for row in rows {
    report.scanned += 1;
    let (known, current) = match direction.known() {
      CodeSlot::Primary => (row.primary.as_deref(), row.secondary.as_deref()),
      CodeSlot::Secondary => (row.secondary.as_deref(), row.primary.as_deref()),
    };

    let derived = map.lookup(known);
    if derived.is_some() {
      report.matched += 1;
    } else {
      report.unmatched += 1;
    }

    if derived != current {
      updates.push(CodeUpdate { id: row.id, value: derived.map(str::to_owned) });
    }
  }

  report.rewritten = updates.len();
  (updates, report)
}
