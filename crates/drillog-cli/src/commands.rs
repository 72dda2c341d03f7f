//! Subcommand bodies. Each takes the open store and an output sink so the
//! binary only handles argument parsing and setup.

use std::{
  collections::BTreeSet,
  fs::File,
  io::Write,
  path::{Path, PathBuf},
};

use anyhow::{Context as _, Result};
use drillog_core::{
  catalog::Domain,
  directory::HoleDirectory,
  export::{EXPORT_HEADERS, ExportRecord},
  ingest::{ImportReport, ingest},
  interval::LogInterval,
  propagate::{Direction, PropagationReport},
  store::LogStore,
};
use drillog_store_sqlite::SqliteStore;
use drillog_xlsx::{Extractor, LayoutVersion, Sheet, open_log_sheet};
use indicatif::{ProgressBar, ProgressStyle};
use rust_xlsxwriter::Workbook;

// ─── Import ──────────────────────────────────────────────────────────────────

pub fn import(
  store: &SqliteStore,
  path: &Path,
  layout: LayoutVersion,
  direction: Option<Direction>,
) -> Result<ImportReport> {
  let sheet = open_log_sheet(path, layout)
    .with_context(|| format!("failed to read {}", path.display()))?;

  let bar = ProgressBar::new(0);
  bar.set_style(
    ProgressStyle::with_template("{spinner} [{bar:40}] {pos}/{len} rows")
      .context("invalid progress template")?
      .progress_chars("=> "),
  );

  let report = import_sheet(store, &sheet, layout, direction, &bar);
  bar.finish_and_clear();
  let report = report?;

  tracing::info!(
    file = %path.display(),
    %layout,
    inserted = report.inserted,
    holes = report.holes.len(),
    "imported workbook"
  );
  Ok(report)
}

/// Extract every row of a loaded sheet and ingest it, reporting progress on
/// `bar`.
pub fn import_sheet(
  store: &SqliteStore,
  sheet: &Sheet,
  layout: LayoutVersion,
  direction: Option<Direction>,
  bar: &ProgressBar,
) -> Result<ImportReport> {
  let ticker = bar.clone();
  let rows = Extractor::new(sheet, layout)
    .on_progress(move |p| {
      ticker.set_length(p.total as u64);
      ticker.set_position(p.consumed as u64);
    });
  bar.set_length(rows.total() as u64);

  let report = ingest(store, rows, direction).context("import failed")?;
  Ok(report)
}

// ─── Propagation ─────────────────────────────────────────────────────────────

/// `all` or a single domain name.
pub fn parse_domains(arg: &str) -> Result<Vec<Domain>> {
  if arg.eq_ignore_ascii_case("all") {
    return Ok(Domain::ALL.to_vec());
  }
  Ok(vec![arg.parse()?])
}

pub fn propagate(
  store: &SqliteStore,
  domains: &[Domain],
  direction: Direction,
  out: &mut impl Write,
) -> Result<Vec<PropagationReport>> {
  let mut reports = Vec::with_capacity(domains.len());
  for &domain in domains {
    let report = store
      .propagate(domain, direction)
      .with_context(|| format!("failed to propagate {domain}"))?;
    writeln!(
      out,
      "{domain}: {} rows, {} matched, {} unmatched, {} rewritten",
      report.scanned, report.matched, report.unmatched, report.rewritten
    )?;
    reports.push(report);
  }
  Ok(reports)
}

// ─── Reads ───────────────────────────────────────────────────────────────────

pub fn holes(store: &SqliteStore, out: &mut impl Write) -> Result<()> {
  for hole in HoleDirectory::list(Some(store))? {
    writeln!(out, "{hole}")?;
  }
  Ok(())
}

pub fn show(
  store: &SqliteStore,
  holes: &BTreeSet<String>,
  json: bool,
  out: &mut impl Write,
) -> Result<()> {
  let rows = store.scan_by_hole_ids(holes)?;
  if json {
    serde_json::to_writer_pretty(&mut *out, &rows)?;
    writeln!(out)?;
    return Ok(());
  }

  for row in &rows {
    writeln!(out, "{}", format_row(row))?;
  }
  Ok(())
}

fn format_row(row: &LogInterval) -> String {
  let code = |v: &Option<String>| v.as_deref().unwrap_or("-").to_owned();
  format!(
    "{:>6}  {:<12} {:>9.3} {:>9.3} {:>8.3}  {}/{}  {}/{}  {}/{}  {}",
    row.id,
    row.hole_id,
    row.from_l,
    row.to_l,
    row.run_l,
    code(&row.litho_1),
    code(&row.litho_2),
    code(&row.struc_1),
    code(&row.struc_2),
    code(&row.alt_1),
    code(&row.alt_2),
    row.description.as_deref().unwrap_or(""),
  )
}

pub fn catalog(store: &SqliteStore, domain: Domain, out: &mut impl Write) -> Result<()> {
  for entry in store.catalog(domain)? {
    writeln!(out, "{:<6} {:<32} {}", entry.primary, entry.secondary, entry.remarks)?;
  }
  Ok(())
}

// ─── Export ──────────────────────────────────────────────────────────────────

/// Sheet name used for workbook exports.
pub const EXPORT_SHEET: &str = "Sheet1";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
  Xlsx,
  Csv,
}

impl ExportFormat {
  /// Pick the format from the file extension. A path ending in neither
  /// `.xlsx` nor `.csv` gets `.xlsx` appended.
  pub fn resolve(path: &Path) -> (PathBuf, Self) {
    match path.extension().and_then(|ext| ext.to_str()) {
      Some(ext) if ext.eq_ignore_ascii_case("csv") => (path.to_path_buf(), Self::Csv),
      Some(ext) if ext.eq_ignore_ascii_case("xlsx") => (path.to_path_buf(), Self::Xlsx),
      _ => {
        let mut name = path.as_os_str().to_owned();
        name.push(".xlsx");
        (PathBuf::from(name), Self::Xlsx)
      }
    }
  }
}

/// Write the selected intervals to `path`; returns the path actually written
/// and the number of intervals.
pub fn export(
  store: &SqliteStore,
  holes: &BTreeSet<String>,
  path: &Path,
) -> Result<(PathBuf, usize)> {
  let (path, format) = ExportFormat::resolve(path);
  let records: Vec<ExportRecord> =
    store.scan_by_hole_ids(holes)?.iter().map(ExportRecord::from).collect();

  match format {
    ExportFormat::Csv => {
      let file =
        File::create(&path).with_context(|| format!("failed to create {}", path.display()))?;
      write_csv(&records, file)?;
    }
    ExportFormat::Xlsx => write_xlsx(&records, &path)?,
  }

  tracing::info!(file = %path.display(), ?format, rows = records.len(), "exported intervals");
  Ok((path, records.len()))
}

/// CSV with the header row always written, even with no records.
pub fn write_csv(records: &[ExportRecord], out: impl Write) -> Result<()> {
  let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(out);
  writer.write_record(EXPORT_HEADERS)?;
  for record in records {
    writer.serialize(record)?;
  }
  writer.flush()?;
  Ok(())
}

/// Single-sheet workbook; header row first, empty text left as blank cells.
pub fn write_xlsx(records: &[ExportRecord], path: &Path) -> Result<()> {
  let mut workbook = Workbook::new();
  let sheet = workbook.add_worksheet();
  sheet.set_name(EXPORT_SHEET)?;

  for (col, header) in EXPORT_HEADERS.iter().enumerate() {
    sheet.write_string(0, col as u16, *header)?;
  }

  for (i, r) in records.iter().enumerate() {
    let row = i as u32 + 1;
    sheet.write_string(row, 0, &r.hole_id)?;
    sheet.write_number(row, 1, r.from)?;
    sheet.write_number(row, 2, r.to)?;
    sheet.write_number(row, 3, r.length)?;

    let text = [
      &r.litho_1,
      &r.litho_2,
      &r.structure_1,
      &r.structure_2,
      &r.alt_1,
      &r.alt_2,
      &r.remarks,
      &r.date_relogged,
      &r.relogged_by,
    ];
    for (offset, value) in text.into_iter().enumerate() {
      if !value.is_empty() {
        sheet.write_string(row, 4 + offset as u16, value)?;
      }
    }
  }

  workbook
    .save(path)
    .with_context(|| format!("failed to write {}", path.display()))?;
  Ok(())
}
