//! SQL schema for the drillog SQLite store.
//!
//! Tables are created with `CREATE TABLE IF NOT EXISTS` and catalogs are only
//! seeded while empty, so [`ensure_schema`] may run against an existing file.
//! There is no migration path: a table with the wrong columns is reported by
//! [`check_schema`] and left alone.

use std::{collections::BTreeSet, fmt};

use drillog_core::catalog::Domain;
use rusqlite::Connection;

use crate::{Error, Result};

pub const LOG_TABLE: &str = "detailedlog_composite";

/// Columns every composite-log table must have.
pub const BASE_COLUMNS: [&str; 15] = [
  "id",
  "hole_id",
  "from_l",
  "to_l",
  "run_l",
  "litho_1",
  "litho_2",
  "struc_1",
  "struc_2",
  "alt_1",
  "alt_2",
  "description",
  "logger",
  "created_at",
  "updated_at",
];

pub const DATE_RELOGGED: &str = "date_relogged";

// ─── Variants ────────────────────────────────────────────────────────────────

/// The two composite-log shapes seen in the field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SchemaVariant {
  /// Provenance is the `logger` column only.
  #[default]
  Standard,
  /// Adds a `date_relogged` column.
  Relogged,
}

impl SchemaVariant {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Standard => "standard",
      Self::Relogged => "relogged",
    }
  }

  pub fn parse(s: &str) -> Result<Self> {
    match s.trim().to_ascii_lowercase().as_str() {
      "standard" => Ok(Self::Standard),
      "relogged" => Ok(Self::Relogged),
      other => Err(Error::Configuration(format!("unknown schema variant: {other:?}"))),
    }
  }

  pub fn required_columns(self) -> BTreeSet<String> {
    let mut cols: BTreeSet<String> = BASE_COLUMNS.iter().map(|c| (*c).to_owned()).collect();
    if self == Self::Relogged {
      cols.insert(DATE_RELOGGED.to_owned());
    }
    cols
  }

  /// Guess the variant of a live table from its column set.
  pub fn detect(columns: &BTreeSet<String>) -> Self {
    if columns.contains(DATE_RELOGGED) { Self::Relogged } else { Self::Standard }
  }

  fn log_table_ddl(self) -> String {
    let relogged = match self {
      Self::Standard => "",
      Self::Relogged => "\n    date_relogged TEXT,",
    };
    format!(
      "CREATE TABLE IF NOT EXISTS {LOG_TABLE} (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    hole_id     TEXT NOT NULL,
    from_l      DECIMAL(7,2),
    to_l        DECIMAL(7,2),
    run_l       DECIMAL(7,2),
    litho_1     TEXT,
    litho_2     TEXT,
    struc_1     TEXT,
    struc_2     TEXT,
    alt_1       TEXT,
    alt_2       TEXT,
    description TEXT,
    logger      TEXT,{relogged}
    created_at  TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
    updated_at  TIMESTAMP DEFAULT CURRENT_TIMESTAMP
);

CREATE INDEX IF NOT EXISTS {LOG_TABLE}_hole_idx ON {LOG_TABLE}(hole_id);"
    )
  }
}

impl fmt::Display for SchemaVariant {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

/// Catalog DDL. Column names differ per catalog; see [`Domain::catalog_columns`].
pub const CATALOG_SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS lithology_ref (
    litho_1 TEXT,
    litho_2 TEXT,
    remarks TEXT
);

CREATE TABLE IF NOT EXISTS alteration_ref (
    alt_1   TEXT,
    alt_2   TEXT,
    remarks TEXT
);

CREATE TABLE IF NOT EXISTS structure_ref (
    structure_1 TEXT,
    structure_2 TEXT,
    remarks     TEXT
);
";

// ─── Creation ────────────────────────────────────────────────────────────────

/// Create the composite-log table and the catalogs if absent, and seed any
/// empty catalog. Runs in one transaction.
pub fn ensure_schema(conn: Option<&Connection>, variant: SchemaVariant) -> Result<()> {
  let conn = conn.ok_or_else(|| {
    Error::Configuration("no writable store handle supplied to schema setup".into())
  })?;

  let tx = conn.unchecked_transaction()?;
  tx.execute_batch(&variant.log_table_ddl())?;
  tx.execute_batch(CATALOG_SCHEMA)?;

  for domain in Domain::ALL {
    let table = domain.catalog_table();
    let (primary, secondary) = domain.catalog_columns();
    let count: i64 = tx.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |r| r.get(0))?;
    if count > 0 {
      continue;
    }

    let mut stmt = tx.prepare(&format!(
      "INSERT INTO {table} ({primary}, {secondary}, remarks) VALUES (?1, ?2, ?3)"
    ))?;
    for (p, s, remarks) in domain.seed() {
      stmt.execute(rusqlite::params![p, s, remarks])?;
    }
    tracing::debug!(table, rows = domain.seed().len(), "seeded catalog");
  }

  tx.commit()?;
  Ok(())
}

// ─── Conformance ─────────────────────────────────────────────────────────────

/// Set difference between a live table's columns and a required set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaDiff {
  /// Required but absent.
  pub missing: BTreeSet<String>,
  /// Present but not required.
  pub extra:   BTreeSet<String>,
}

impl SchemaDiff {
  pub fn between(live: &BTreeSet<String>, required: &BTreeSet<String>) -> Self {
    Self {
      missing: required.difference(live).cloned().collect(),
      extra:   live.difference(required).cloned().collect(),
    }
  }

  pub fn is_conforming(&self) -> bool { self.missing.is_empty() && self.extra.is_empty() }
}

impl fmt::Display for SchemaDiff {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let join = |set: &BTreeSet<String>| set.iter().cloned().collect::<Vec<_>>().join(", ");
    match (self.missing.is_empty(), self.extra.is_empty()) {
      (true, true) => f.write_str("no differences"),
      (false, true) => write!(f, "missing columns: {}", join(&self.missing)),
      (true, false) => write!(f, "extra columns: {}", join(&self.extra)),
      (false, false) => write!(
        f,
        "missing columns: {}; extra columns: {}",
        join(&self.missing),
        join(&self.extra)
      ),
    }
  }
}

/// Column names of the live composite-log table (empty if the table is absent).
pub fn live_columns(conn: &Connection) -> Result<BTreeSet<String>> {
  let mut stmt = conn.prepare(&format!("PRAGMA table_info({LOG_TABLE})"))?;
  let cols = stmt
    .query_map([], |row| row.get::<_, String>(1))?
    .collect::<rusqlite::Result<BTreeSet<_>>>()?;
  Ok(cols)
}

/// Compare the live composite-log table against `required`.
pub fn check_schema(conn: &Connection, required: &BTreeSet<String>) -> Result<SchemaDiff> {
  let live = live_columns(conn)?;
  Ok(SchemaDiff::between(&live, required))
}
