//! Decoding helpers between SQLite rows and drillog domain types.
//!
//! Timestamps are whatever `CURRENT_TIMESTAMP` wrote (`YYYY-MM-DD HH:MM:SS`,
//! UTC, no zone suffix). Depths are numeric; a NULL depth reads as `0.0`, the
//! same default the worksheet reader uses for a blank cell.

use chrono::NaiveDateTime;
use drillog_core::{catalog::CatalogEntry, interval::LogInterval};

use crate::{Error, Result};

/// Column list matching [`RawInterval::from_row`]. `date_relogged` is
/// substituted by the caller (a real column or `NULL`).
pub fn interval_columns(date_relogged: &str) -> String {
  format!(
    "id, hole_id, from_l, to_l, run_l, litho_1, litho_2, struc_1, struc_2, \
     alt_1, alt_2, description, logger, {date_relogged}, created_at, updated_at"
  )
}

// ─── DateTime ────────────────────────────────────────────────────────────────

const SQLITE_TS: &str = "%Y-%m-%d %H:%M:%S";
const SQLITE_TS_FRACTION: &str = "%Y-%m-%d %H:%M:%S%.f";

pub fn decode_ts(s: &str) -> Result<NaiveDateTime> {
  NaiveDateTime::parse_from_str(s, SQLITE_TS)
    .or_else(|_| NaiveDateTime::parse_from_str(s, SQLITE_TS_FRACTION))
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read directly from a composite-log row.
pub struct RawInterval {
  pub id:            i64,
  pub hole_id:       String,
  pub from_l:        Option<f64>,
  pub to_l:          Option<f64>,
  pub run_l:         Option<f64>,
  pub litho_1:       Option<String>,
  pub litho_2:       Option<String>,
  pub struc_1:       Option<String>,
  pub struc_2:       Option<String>,
  pub alt_1:         Option<String>,
  pub alt_2:         Option<String>,
  pub description:   Option<String>,
  pub logger:        Option<String>,
  pub date_relogged: Option<String>,
  pub created_at:    Option<String>,
  pub updated_at:    Option<String>,
}

impl RawInterval {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:            row.get(0)?,
      hole_id:       row.get(1)?,
      from_l:        row.get(2)?,
      to_l:          row.get(3)?,
      run_l:         row.get(4)?,
      litho_1:       row.get(5)?,
      litho_2:       row.get(6)?,
      struc_1:       row.get(7)?,
      struc_2:       row.get(8)?,
      alt_1:         row.get(9)?,
      alt_2:         row.get(10)?,
      description:   row.get(11)?,
      logger:        row.get(12)?,
      date_relogged: row.get(13)?,
      created_at:    row.get(14)?,
      updated_at:    row.get(15)?,
    })
  }

  pub fn into_interval(self) -> Result<LogInterval> {
    Ok(LogInterval {
      id:            self.id,
      hole_id:       self.hole_id,
      from_l:        self.from_l.unwrap_or(0.0),
      to_l:          self.to_l.unwrap_or(0.0),
      run_l:         self.run_l.unwrap_or(0.0),
      litho_1:       self.litho_1,
      litho_2:       self.litho_2,
      struc_1:       self.struc_1,
      struc_2:       self.struc_2,
      alt_1:         self.alt_1,
      alt_2:         self.alt_2,
      description:   self.description,
      logger:        self.logger,
      date_relogged: self.date_relogged,
      created_at:    self.created_at.as_deref().map(decode_ts).transpose()?,
      updated_at:    self.updated_at.as_deref().map(decode_ts).transpose()?,
    })
  }
}

/// A catalog row; NULL cells read as empty strings.
pub fn catalog_entry(row: &rusqlite::Row<'_>) -> rusqlite::Result<CatalogEntry> {
  Ok(CatalogEntry {
    primary:   row.get::<_, Option<String>>(0)?.unwrap_or_default(),
    secondary: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
    remarks:   row.get::<_, Option<String>>(2)?.unwrap_or_default(),
  })
}
