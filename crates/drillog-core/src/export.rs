//! Flat export record — one per interval, with the column headings geologists
//! expect in their spreadsheets.

use serde::Serialize;

use crate::interval::LogInterval;

pub const EXPORT_HEADERS: [&str; 13] = [
  "HOLE_ID",
  "FROM",
  "TO",
  "LENGTH",
  "LITHO_1",
  "LITHO_2",
  "STRUCTURE_1",
  "STRUCTURE_2",
  "ALT_1",
  "ALT_2",
  "REMARKS",
  "DATE_RELOGGED",
  "RELOGGED_BY",
];

/// Field order must match [`EXPORT_HEADERS`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportRecord {
  #[serde(rename = "HOLE_ID")]
  pub hole_id:       String,
  #[serde(rename = "FROM")]
  pub from:          f64,
  #[serde(rename = "TO")]
  pub to:            f64,
  #[serde(rename = "LENGTH")]
  pub length:        f64,
  #[serde(rename = "LITHO_1")]
  pub litho_1:       String,
  #[serde(rename = "LITHO_2")]
  pub litho_2:       String,
  #[serde(rename = "STRUCTURE_1")]
  pub structure_1:   String,
  #[serde(rename = "STRUCTURE_2")]
  pub structure_2:   String,
  #[serde(rename = "ALT_1")]
  pub alt_1:         String,
  #[serde(rename = "ALT_2")]
  pub alt_2:         String,
  #[serde(rename = "REMARKS")]
  pub remarks:       String,
  /// Always empty for now.
  #[serde(rename = "DATE_RELOGGED")]
  pub date_relogged: String,
  /// Always empty for now.
  #[serde(rename = "RELOGGED_BY")]
  pub relogged_by:   String,
}

impl From<&LogInterval> for ExportRecord {
  fn from(i: &LogInterval) -> Self {
    let text = |v: &Option<String>| v.clone().unwrap_or_default();
    Self {
      hole_id:       i.hole_id.clone(),
      from:          i.from_l,
      to:            i.to_l,
      length:        i.run_l,
      litho_1:       text(&i.litho_1),
      litho_2:       text(&i.litho_2),
      structure_1:   text(&i.struc_1),
      structure_2:   text(&i.struc_2),
      alt_1:         text(&i.alt_1),
      alt_2:         text(&i.alt_2),
      remarks:       text(&i.description),
      date_relogged: String::new(),
      relogged_by:   String::new(),
    }
  }
}
