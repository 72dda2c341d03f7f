//! [`SqliteStore`] — the SQLite implementation of [`LogStore`].

use std::{
  collections::BTreeSet,
  path::{Path, PathBuf},
};

use drillog_core::{
  catalog::{CatalogEntry, Domain},
  interval::{CodeSlot, LogInterval, NewInterval},
  propagate::{CodeMap, CodeRow, Direction, PropagationReport, plan},
  store::LogStore,
};
use rusqlite::{Connection, OpenFlags};

use crate::{
  Error, Result,
  encode::{RawInterval, catalog_entry, interval_columns},
  schema::{self, DATE_RELOGGED, LOG_TABLE, SchemaDiff, SchemaVariant},
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A composite log backed by a single SQLite file.
#[derive(Debug)]
pub struct SqliteStore {
  conn:    Connection,
  path:    Option<PathBuf>,
  variant: SchemaVariant,
}

impl SqliteStore {
  /// Create (or reuse) the database at `path`, ensure the schema, and verify
  /// the composite-log table matches `variant`.
  pub fn create(path: impl AsRef<Path>, variant: SchemaVariant) -> Result<Self> {
    let path = path.as_ref();
    let conn = Connection::open(path)?;
    schema::ensure_schema(Some(&conn), variant)?;
    let store = Self { conn, path: Some(path.to_path_buf()), variant };
    store.require_conforming()?;
    tracing::info!(path = %path.display(), %variant, "created store");
    Ok(store)
  }

  /// Attach to an existing database. The schema is checked, never created or
  /// repaired; a mismatch refuses the store.
  pub fn open(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
      | OpenFlags::SQLITE_OPEN_URI
      | OpenFlags::SQLITE_OPEN_NO_MUTEX;
    let conn = Connection::open_with_flags(path, flags)?;
    let variant = SchemaVariant::detect(&schema::live_columns(&conn)?);
    let store = Self { conn, path: Some(path.to_path_buf()), variant };
    store.require_conforming()?;
    tracing::info!(path = %path.display(), %variant, "opened store");
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub fn open_in_memory() -> Result<Self> { Self::open_in_memory_with(SchemaVariant::Standard) }

  pub fn open_in_memory_with(variant: SchemaVariant) -> Result<Self> {
    let conn = Connection::open_in_memory()?;
    schema::ensure_schema(Some(&conn), variant)?;
    Ok(Self { conn, path: None, variant })
  }

  /// File backing this store; `None` for in-memory stores.
  pub fn path(&self) -> Option<&Path> { self.path.as_deref() }

  pub fn variant(&self) -> SchemaVariant { self.variant }

  /// Compare the live composite-log table against `required`.
  pub fn check_schema(&self, required: &BTreeSet<String>) -> Result<SchemaDiff> {
    schema::check_schema(&self.conn, required)
  }

  fn require_conforming(&self) -> Result<()> {
    let diff = self.check_schema(&self.variant.required_columns())?;
    if diff.is_conforming() {
      return Ok(());
    }
    tracing::warn!(%diff, "composite log schema mismatch");
    Err(Error::SchemaMismatch(diff))
  }

  fn select_sql(&self) -> String {
    let date_relogged = match self.variant {
      SchemaVariant::Standard => "NULL",
      SchemaVariant::Relogged => DATE_RELOGGED,
    };
    format!("SELECT {} FROM {LOG_TABLE}", interval_columns(date_relogged))
  }

  fn query_intervals(
    &self,
    sql: &str,
    params: impl rusqlite::Params,
  ) -> Result<Vec<LogInterval>> {
    let mut stmt = self.conn.prepare(sql)?;
    let raws = stmt
      .query_map(params, RawInterval::from_row)?
      .collect::<rusqlite::Result<Vec<_>>>()?;
    raws.into_iter().map(RawInterval::into_interval).collect()
  }
}

fn read_catalog(conn: &Connection, domain: Domain) -> Result<Vec<CatalogEntry>> {
  let (primary, secondary) = domain.catalog_columns();
  let mut stmt = conn.prepare(&format!(
    "SELECT {primary}, {secondary}, remarks FROM {} ORDER BY rowid",
    domain.catalog_table()
  ))?;
  let entries = stmt
    .query_map([], catalog_entry)?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  Ok(entries)
}

// ─── LogStore impl ───────────────────────────────────────────────────────────

impl LogStore for SqliteStore {
  type Error = Error;

  // ── Writes ────────────────────────────────────────────────────────────────

  fn insert(&self, interval: &NewInterval) -> Result<i64> {
    let i = interval;
    match self.variant {
      SchemaVariant::Standard => {
        self.conn.execute(
          &format!(
            "INSERT INTO {LOG_TABLE} (
               hole_id, from_l, to_l, run_l,
               litho_1, litho_2, struc_1, struc_2, alt_1, alt_2,
               description, logger
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)"
          ),
          rusqlite::params![
            i.hole_id, i.from_l, i.to_l, i.run_l,
            i.litho_1, i.litho_2, i.struc_1, i.struc_2, i.alt_1, i.alt_2,
            i.description, i.logger,
          ],
        )?;
      }
      SchemaVariant::Relogged => {
        self.conn.execute(
          &format!(
            "INSERT INTO {LOG_TABLE} (
               hole_id, from_l, to_l, run_l,
               litho_1, litho_2, struc_1, struc_2, alt_1, alt_2,
               description, logger, date_relogged
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)"
          ),
          rusqlite::params![
            i.hole_id, i.from_l, i.to_l, i.run_l,
            i.litho_1, i.litho_2, i.struc_1, i.struc_2, i.alt_1, i.alt_2,
            i.description, i.logger, i.date_relogged,
          ],
        )?;
      }
    }
    Ok(self.conn.last_insert_rowid())
  }

  fn delete_by_hole_id(&self, hole_id: &str) -> Result<usize> {
    let removed = self.conn.execute(
      &format!("DELETE FROM {LOG_TABLE} WHERE hole_id = ?1"),
      rusqlite::params![hole_id],
    )?;
    tracing::info!(hole_id, removed, "deleted hole");
    Ok(removed)
  }

  fn propagate(&self, domain: Domain, direction: Direction) -> Result<PropagationReport> {
    let (primary_col, secondary_col) = domain.log_columns();
    let target_col = match direction.target() {
      CodeSlot::Primary => primary_col,
      CodeSlot::Secondary => secondary_col,
    };

    let tx = self.conn.unchecked_transaction()?;

    let map = CodeMap::build(&read_catalog(&tx, domain)?, direction);
    if !map.conflicts().is_empty() {
      tracing::warn!(
        %domain,
        %direction,
        conflicts = ?map.conflicts(),
        "catalog keys map to several codes; first seeded entry wins"
      );
    }

    let rows = {
      let mut stmt = tx.prepare(&format!(
        "SELECT id, {primary_col}, {secondary_col} FROM {LOG_TABLE} ORDER BY id"
      ))?;
      let rows = stmt
        .query_map([], |row| {
          Ok(CodeRow {
            id:        row.get(0)?,
            primary:   row.get(1)?,
            secondary: row.get(2)?,
          })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;
      rows
    };

    let (updates, report) = plan(domain, direction, &map, rows);
    {
      let mut stmt =
        tx.prepare(&format!("UPDATE {LOG_TABLE} SET {target_col} = ?1 WHERE id = ?2"))?;
      for update in &updates {
        stmt.execute(rusqlite::params![update.value, update.id])?;
      }
    }
    tx.commit()?;

    tracing::info!(
      %domain,
      %direction,
      scanned = report.scanned,
      matched = report.matched,
      rewritten = report.rewritten,
      "propagated codes"
    );
    Ok(report)
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  fn scan_all(&self) -> Result<Vec<LogInterval>> {
    self.query_intervals(&format!("{} ORDER BY id", self.select_sql()), [])
  }

  fn scan_by_hole_ids(&self, hole_ids: &BTreeSet<String>) -> Result<Vec<LogInterval>> {
    if hole_ids.is_empty() {
      return self.scan_all();
    }

    let placeholders = (1..=hole_ids.len())
      .map(|n| format!("?{n}"))
      .collect::<Vec<_>>()
      .join(", ");
    let sql = format!(
      "{} WHERE hole_id IN ({placeholders}) ORDER BY id",
      self.select_sql()
    );
    self.query_intervals(&sql, rusqlite::params_from_iter(hole_ids.iter()))
  }

  fn distinct_hole_ids(&self) -> Result<BTreeSet<String>> {
    let mut stmt = self.conn.prepare(&format!("SELECT DISTINCT hole_id FROM {LOG_TABLE}"))?;
    let ids = stmt
      .query_map([], |row| row.get::<_, String>(0))?
      .collect::<rusqlite::Result<BTreeSet<_>>>()?;
    Ok(ids)
  }

  fn catalog(&self, domain: Domain) -> Result<Vec<CatalogEntry>> {
    read_catalog(&self.conn, domain)
  }
}
