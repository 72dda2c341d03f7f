//! Log intervals — one described depth interval of one drill hole.
//!
//! Intervals enter the store only through the import path and afterwards only
//! their code columns change (via propagation). Everything else is fixed at
//! ingestion time.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::catalog::Domain;

// ─── Code slots ──────────────────────────────────────────────────────────────

/// Which half of a code pair a value occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CodeSlot {
  /// Short mnemonic, e.g. `OVER`.
  Primary,
  /// Descriptive alias, e.g. `Overburden`.
  Secondary,
}

impl CodeSlot {
  pub fn other(self) -> Self {
    match self {
      Self::Primary => Self::Secondary,
      Self::Secondary => Self::Primary,
    }
  }
}

// ─── LogInterval ─────────────────────────────────────────────────────────────

/// A persisted row of the composite log table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogInterval {
  /// Surrogate key; never reused after deletion.
  pub id:            i64,
  pub hole_id:       String,
  pub from_l:        f64,
  pub to_l:          f64,
  pub run_l:         f64,
  pub litho_1:       Option<String>,
  pub litho_2:       Option<String>,
  pub struc_1:       Option<String>,
  pub struc_2:       Option<String>,
  pub alt_1:         Option<String>,
  pub alt_2:         Option<String>,
  pub description:   Option<String>,
  pub logger:        Option<String>,
  /// Only present in the relogged schema variant.
  pub date_relogged: Option<String>,
  pub created_at:    Option<NaiveDateTime>,
  /// Set at creation; later writes do not refresh it.
  pub updated_at:    Option<NaiveDateTime>,
}

impl LogInterval {
  /// The `(primary, secondary)` code pair of `domain`.
  pub fn code_pair(&self, domain: Domain) -> (Option<&str>, Option<&str>) {
    let (primary, secondary) = match domain {
      Domain::Lithology => (&self.litho_1, &self.litho_2),
      Domain::Structure => (&self.struc_1, &self.struc_2),
      Domain::Alteration => (&self.alt_1, &self.alt_2),
    };
    (primary.as_deref(), secondary.as_deref())
  }

  pub fn code(&self, domain: Domain, slot: CodeSlot) -> Option<&str> {
    let (primary, secondary) = self.code_pair(domain);
    match slot {
      CodeSlot::Primary => primary,
      CodeSlot::Secondary => secondary,
    }
  }
}

// ─── NewInterval ─────────────────────────────────────────────────────────────

/// Input to [`crate::store::LogStore::insert`].
/// `id`, `created_at` and `updated_at` are always assigned by the store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewInterval {
  pub hole_id:       String,
  pub from_l:        f64,
  pub to_l:          f64,
  pub run_l:         f64,
  pub litho_1:       Option<String>,
  pub litho_2:       Option<String>,
  pub struc_1:       Option<String>,
  pub struc_2:       Option<String>,
  pub alt_1:         Option<String>,
  pub alt_2:         Option<String>,
  pub description:   Option<String>,
  pub logger:        Option<String>,
  pub date_relogged: Option<String>,
}

impl NewInterval {
  /// Convenience constructor with every optional column left unset.
  pub fn new(hole_id: impl Into<String>, from_l: f64, to_l: f64) -> Self {
    Self {
      hole_id: hole_id.into(),
      from_l,
      to_l,
      run_l: to_l - from_l,
      ..Self::default()
    }
  }

  /// Fill one code column.
  pub fn set_code(&mut self, domain: Domain, slot: CodeSlot, value: Option<String>) {
    let column = match (domain, slot) {
      (Domain::Lithology, CodeSlot::Primary) => &mut self.litho_1,
      (Domain::Lithology, CodeSlot::Secondary) => &mut self.litho_2,
      (Domain::Structure, CodeSlot::Primary) => &mut self.struc_1,
      (Domain::Structure, CodeSlot::Secondary) => &mut self.struc_2,
      (Domain::Alteration, CodeSlot::Primary) => &mut self.alt_1,
      (Domain::Alteration, CodeSlot::Secondary) => &mut self.alt_2,
    };
    *column = value;
  }

  /// Builder-style variant of [`NewInterval::set_code`].
  pub fn with_code(mut self, domain: Domain, slot: CodeSlot, value: &str) -> Self {
    self.set_code(domain, slot, Some(value.to_owned()));
    self
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn set_code_targets_the_right_column() {
    let mut n = NewInterval::new("DDH-001", 0.0, 1.5);
    n.set_code(Domain::Structure, CodeSlot::Secondary, Some("Fault".into()));
    n.set_code(Domain::Alteration, CodeSlot::Primary, Some("SI".into()));

    assert_eq!(n.struc_2.as_deref(), Some("Fault"));
    assert_eq!(n.alt_1.as_deref(), Some("SI"));
    assert!(n.struc_1.is_none());
    assert!(n.litho_1.is_none() && n.litho_2.is_none());
  }

  #[test]
  fn new_derives_run_length() {
    let n = NewInterval::new("DDH-001", 2.0, 5.5);
    assert_eq!(n.run_l, 3.5);
  }
}
