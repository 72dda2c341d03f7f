//! Integration tests for `SqliteStore` against in-memory and temp-file
//! databases.

use std::collections::BTreeSet;

use drillog_core::{
  catalog::Domain,
  directory::HoleDirectory,
  ingest::ingest,
  interval::{CodeSlot, NewInterval},
  propagate::Direction,
  store::LogStore,
};
use rusqlite::Connection;

use crate::{
  Error, Session, SqliteStore, normalize_db_path,
  schema::{self, BASE_COLUMNS, LOG_TABLE, SchemaVariant},
};

fn store() -> SqliteStore { SqliteStore::open_in_memory().expect("in-memory store") }

fn interval(hole: &str, from: f64, to: f64) -> NewInterval { NewInterval::new(hole, from, to) }

fn ids(list: &[&str]) -> BTreeSet<String> { list.iter().map(|s| (*s).to_owned()).collect() }

// ─── Schema ──────────────────────────────────────────────────────────────────

#[test]
fn ensure_schema_without_handle_is_configuration_error() {
  let err = schema::ensure_schema(None, SchemaVariant::Standard).unwrap_err();
  assert!(matches!(err, Error::Configuration(_)));
}

#[test]
fn ensure_schema_seeds_catalogs_once() {
  let conn = Connection::open_in_memory().unwrap();
  schema::ensure_schema(Some(&conn), SchemaVariant::Standard).unwrap();
  schema::ensure_schema(Some(&conn), SchemaVariant::Standard).unwrap();

  for (table, expected) in [("lithology_ref", 18), ("structure_ref", 11), ("alteration_ref", 11)] {
    let n: i64 = conn
      .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |r| r.get(0))
      .unwrap();
    assert_eq!(n, expected, "{table}");
  }
}

#[test]
fn fresh_schema_conforms() {
  let s = store();
  let diff = s.check_schema(&SchemaVariant::Standard.required_columns()).unwrap();
  assert!(diff.is_conforming(), "{diff}");
}

#[test]
fn check_reports_missing_logger() {
  let conn = Connection::open_in_memory().unwrap();
  let cols: Vec<_> = BASE_COLUMNS.iter().filter(|c| **c != "logger").copied().collect();
  conn
    .execute_batch(&format!("CREATE TABLE {LOG_TABLE} ({});", cols.join(", ")))
    .unwrap();

  let diff = schema::check_schema(&conn, &SchemaVariant::Standard.required_columns()).unwrap();
  assert_eq!(diff.missing, ids(&["logger"]));
  assert!(diff.extra.is_empty());
}

#[test]
fn check_reports_extra_columns_both_ways() {
  let s = SqliteStore::open_in_memory_with(SchemaVariant::Relogged).unwrap();
  let diff = s.check_schema(&SchemaVariant::Standard.required_columns()).unwrap();
  assert!(diff.missing.is_empty());
  assert_eq!(diff.extra, ids(&["date_relogged"]));
}

#[test]
fn open_refuses_mismatched_table() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("legacy.db");
  {
    let conn = Connection::open(&path).unwrap();
    conn
      .execute_batch(&format!("CREATE TABLE {LOG_TABLE} (id INTEGER PRIMARY KEY, hole_id TEXT);"))
      .unwrap();
  }

  match SqliteStore::open(&path) {
    Err(Error::SchemaMismatch(diff)) => {
      assert!(diff.missing.contains("logger"));
      assert!(diff.extra.is_empty());
    }
    Err(other) => panic!("unexpected error: {other}"),
    Ok(_) => panic!("mismatched store was accepted"),
  }
}

#[test]
fn open_detects_relogged_variant() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("relog.db");
  drop(SqliteStore::create(&path, SchemaVariant::Relogged).unwrap());

  let s = SqliteStore::open(&path).unwrap();
  assert_eq!(s.variant(), SchemaVariant::Relogged);
}

// ─── Insert & scan ───────────────────────────────────────────────────────────

#[test]
fn insert_and_scan_in_insertion_order() {
  let s = store();
  let a = s.insert(&interval("DDH-002", 0.0, 1.5)).unwrap();
  let b = s.insert(&interval("DDH-001", 0.0, 2.0)).unwrap();
  assert!(b > a);

  let rows = s.scan_all().unwrap();
  assert_eq!(rows.len(), 2);
  assert_eq!(rows[0].id, a);
  assert_eq!(rows[0].hole_id, "DDH-002");
  assert_eq!(rows[1].to_l, 2.0);
  assert!(rows[0].created_at.is_some());
  assert_eq!(rows[0].created_at, rows[0].updated_at);
}

#[test]
fn depths_keep_three_decimals() {
  let s = store();
  s.insert(&interval("DDH-001", 12.346, 13.5)).unwrap();
  let row = &s.scan_all().unwrap()[0];
  assert_eq!(row.from_l, 12.346);
  assert_eq!(row.run_l, 13.5 - 12.346);
}

#[test]
fn ids_are_not_reused_after_delete() {
  let s = store();
  let first = s.insert(&interval("DDH-001", 0.0, 1.0)).unwrap();
  s.delete_by_hole_id("DDH-001").unwrap();
  let second = s.insert(&interval("DDH-001", 0.0, 1.0)).unwrap();
  assert!(second > first);
}

#[test]
fn empty_filter_returns_everything() {
  let s = store();
  for hole in ["A", "B", "B", "C"] {
    s.insert(&interval(hole, 0.0, 1.0)).unwrap();
  }

  let all = s.scan_all().unwrap();
  let unfiltered = s.scan_by_hole_ids(&BTreeSet::new()).unwrap();
  assert_eq!(all, unfiltered);
  assert_eq!(unfiltered.len(), 4);
}

#[test]
fn filter_by_hole_ids() {
  let s = store();
  for hole in ["A", "B", "B", "C"] {
    s.insert(&interval(hole, 0.0, 1.0)).unwrap();
  }

  let rows = s.scan_by_hole_ids(&ids(&["B", "C", "Z"])).unwrap();
  assert_eq!(rows.len(), 3);
  assert!(rows.iter().all(|r| r.hole_id != "A"));
}

#[test]
fn reimport_doubles_rows_per_hole() {
  let s = store();
  let batch = || {
    vec![interval("DDH-001", 0.0, 1.0), interval("DDH-001", 1.0, 2.0), interval("DDH-002", 0.0, 3.0)]
      .into_iter()
      .map(Ok::<_, Error>)
  };

  ingest(&s, batch(), None).unwrap();
  ingest(&s, batch(), None).unwrap();

  assert_eq!(s.scan_by_hole_ids(&ids(&["DDH-001"])).unwrap().len(), 4);
  assert_eq!(s.scan_by_hole_ids(&ids(&["DDH-002"])).unwrap().len(), 2);
}

#[test]
fn relogged_variant_keeps_date_relogged() {
  let s = SqliteStore::open_in_memory_with(SchemaVariant::Relogged).unwrap();
  let mut n = interval("DDH-001", 0.0, 1.0);
  n.logger = Some("JFAL".into());
  n.date_relogged = Some("2024-02-05".into());
  s.insert(&n).unwrap();

  let row = &s.scan_all().unwrap()[0];
  assert_eq!(row.logger.as_deref(), Some("JFAL"));
  assert_eq!(row.date_relogged.as_deref(), Some("2024-02-05"));

  let plain = store();
  plain.insert(&n).unwrap();
  assert!(plain.scan_all().unwrap()[0].date_relogged.is_none());
}

// ─── Delete & directory ──────────────────────────────────────────────────────

#[test]
fn delete_hole_removes_it_from_directory() {
  let s = store();
  s.insert(&interval("DDH-001", 0.0, 1.0)).unwrap();
  s.insert(&interval("DDH-001", 1.0, 2.0)).unwrap();
  s.insert(&interval("DDH-002", 0.0, 1.0)).unwrap();

  assert_eq!(s.distinct_hole_ids().unwrap(), ids(&["DDH-001", "DDH-002"]));

  let removed = s.delete_by_hole_id("DDH-001").unwrap();
  assert_eq!(removed, 2);
  assert_eq!(s.distinct_hole_ids().unwrap(), ids(&["DDH-002"]));
  assert!(s.scan_by_hole_ids(&ids(&["DDH-001"])).unwrap().is_empty());
}

#[test]
fn directory_of_no_store_is_empty() {
  let none: Option<&SqliteStore> = None;
  assert!(HoleDirectory::list(none).unwrap().is_empty());

  let s = store();
  assert!(HoleDirectory::list(Some(&s)).unwrap().is_empty());
  s.insert(&interval("X-1", 0.0, 1.0)).unwrap();
  assert_eq!(HoleDirectory::list(Some(&s)).unwrap(), ids(&["X-1"]));
}

// ─── Catalogs & propagation ──────────────────────────────────────────────────

#[test]
fn catalog_reads_in_seed_order() {
  let s = store();
  let litho = s.catalog(Domain::Lithology).unwrap();
  assert_eq!(litho.len(), 18);
  assert_eq!(litho[0].primary, "OVER");
  assert_eq!(litho[0].secondary, "Overburden");

  let structure = s.catalog(Domain::Structure).unwrap();
  assert_eq!(structure[0].primary, "FLT");
  assert_eq!(structure.last().unwrap().secondary, "Cavity");
}

#[test]
fn propagate_fills_overburden() {
  let s = store();
  let id = s
    .insert(&interval("DDH-001", 0.0, 1.0).with_code(Domain::Lithology, CodeSlot::Primary, "OVER"))
    .unwrap();

  let report = s.propagate(Domain::Lithology, Direction::SecondaryFromPrimary).unwrap();
  assert_eq!(report.matched, 1);
  assert_eq!(report.rewritten, 1);

  let row = s.scan_all().unwrap().into_iter().find(|r| r.id == id).unwrap();
  assert_eq!(row.litho_2.as_deref(), Some("Overburden"));
}

#[test]
fn unmatched_code_leaves_target_null() {
  let s = store();
  s.insert(&interval("DDH-001", 0.0, 1.0).with_code(Domain::Lithology, CodeSlot::Primary, "XXXX"))
    .unwrap();
  s.insert(&interval("DDH-001", 1.0, 2.0)).unwrap();

  let report = s.propagate(Domain::Lithology, Direction::SecondaryFromPrimary).unwrap();
  assert_eq!(report.unmatched, 2);
  assert!(s.scan_all().unwrap().iter().all(|r| r.litho_2.is_none()));
}

#[test]
fn propagation_is_idempotent() {
  let s = store();
  for code in ["OVER", "DIO", "nope", "LMS"] {
    s.insert(&interval("DDH-001", 0.0, 1.0).with_code(Domain::Lithology, CodeSlot::Primary, code))
      .unwrap();
  }

  s.propagate(Domain::Lithology, Direction::SecondaryFromPrimary).unwrap();
  let once = s.scan_all().unwrap();
  let again = s.propagate(Domain::Lithology, Direction::SecondaryFromPrimary).unwrap();
  let twice = s.scan_all().unwrap();

  assert_eq!(once, twice);
  assert_eq!(again.rewritten, 0);
}

#[test]
fn propagation_touches_only_its_code_pair() {
  let s = store();
  let mut n = interval("DDH-001", 0.0, 1.0)
    .with_code(Domain::Structure, CodeSlot::Secondary, "Fault")
    .with_code(Domain::Lithology, CodeSlot::Secondary, "Tuff");
  n.description = Some("sheared tuff".into());
  s.insert(&n).unwrap();
  let before = s.scan_all().unwrap().remove(0);

  s.propagate(Domain::Structure, Direction::PrimaryFromSecondary).unwrap();
  let after = s.scan_all().unwrap().remove(0);

  assert_eq!(after.struc_1.as_deref(), Some("FLT"));
  assert_eq!(after.litho_1, before.litho_1);
  assert_eq!(after.litho_2, before.litho_2);
  assert_eq!(after.description, before.description);
  assert_eq!(after.updated_at, before.updated_at);
}

#[test]
fn shared_descriptive_alteration_picks_first_seeded() {
  let s = store();
  s.insert(&interval("DDH-001", 0.0, 1.0).with_code(Domain::Alteration, CodeSlot::Secondary, "Argillic"))
    .unwrap();

  s.propagate(Domain::Alteration, Direction::PrimaryFromSecondary).unwrap();
  assert_eq!(s.scan_all().unwrap()[0].alt_1.as_deref(), Some("AA"));
}

#[test]
fn ingest_then_propagate_completes_pairs() {
  let s = store();
  let records = vec![
    interval("DDH-001", 0.0, 1.0)
      .with_code(Domain::Lithology, CodeSlot::Secondary, "Overburden")
      .with_code(Domain::Structure, CodeSlot::Secondary, "Joint")
      .with_code(Domain::Alteration, CodeSlot::Secondary, "Oxidized"),
  ];

  let report = ingest(
    &s,
    records.into_iter().map(Ok::<_, Error>),
    Some(Direction::PrimaryFromSecondary),
  )
  .unwrap();
  assert_eq!(report.inserted, 1);
  assert_eq!(report.propagation.len(), 3);

  let row = &s.scan_all().unwrap()[0];
  assert_eq!(row.litho_1.as_deref(), Some("OVER"));
  assert_eq!(row.struc_1.as_deref(), Some("JNT"));
  assert_eq!(row.alt_1.as_deref(), Some("OX"));
}

// ─── Session ─────────────────────────────────────────────────────────────────

#[test]
fn normalize_appends_db_extension() {
  assert_eq!(normalize_db_path("core").unwrap().to_str(), Some("core.db"));
  assert_eq!(normalize_db_path("core.db").unwrap().to_str(), Some("core.db"));
  assert_eq!(normalize_db_path("core.SQLITE").unwrap().to_str(), Some("core.SQLITE"));
  assert!(matches!(normalize_db_path("  "), Err(Error::Configuration(_))));
}

#[test]
fn session_holds_one_connection() {
  let dir = tempfile::tempdir().unwrap();
  let name = dir.path().join("balabag");
  let name = name.to_str().unwrap();

  let mut session = Session::new();
  assert!(matches!(session.store(), Err(Error::NotConnected)));
  assert!(matches!(session.close(), Err(Error::NotConnected)));

  let store = session.create(name, SchemaVariant::Standard).unwrap();
  assert!(store.path().unwrap().ends_with("balabag.db"));
  assert!(matches!(session.create(name, SchemaVariant::Standard), Err(Error::ConnectionExists)));
  assert!(matches!(session.open(format!("{name}.db")), Err(Error::ConnectionExists)));

  session.store().unwrap().insert(&interval("DDH-001", 0.0, 1.0)).unwrap();
  session.close().unwrap();
  assert!(!session.is_open());

  let reopened = session.open(format!("{name}.db")).unwrap();
  assert_eq!(reopened.scan_all().unwrap().len(), 1);
}

#[test]
fn open_missing_file_is_storage_error() {
  let dir = tempfile::tempdir().unwrap();
  let mut session = Session::new();
  let err = session.open(dir.path().join("absent.db")).unwrap_err();
  assert!(matches!(err, Error::Storage(_)));
  assert!(!session.is_open());
}
