//! `drillog` — import drill-core log workbooks into a SQLite composite log.
//!
//! # Usage
//!
//! ```
//! drillog init
//! drillog import DDH-001.xlsx
//! drillog show --hole DDH-001
//! drillog export composite.xlsx
//! ```
//!
//! Settings come from `drillog.toml` (or `--config`), then `DRILLOG_*`
//! environment variables, then flags.

mod commands;
mod settings;

use std::{collections::BTreeSet, io, path::PathBuf};

use anyhow::{Context as _, Result, bail};
use clap::{Parser, Subcommand};
use drillog_core::{catalog::Domain, propagate::Direction, store::LogStore};
use drillog_store_sqlite::{Error as StoreError, Session, SqliteStore, normalize_db_path};
use drillog_xlsx::LayoutVersion;
use settings::Settings;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(author, version, about = "Drill-core composite log tool")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "drillog.toml")]
  config: PathBuf,

  /// Database name or path (overrides the `database` setting).
  #[arg(short, long)]
  database: Option<String>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  /// Create the database, its tables and the seeded catalogs.
  Init,
  /// Verify the composite-log table has exactly the expected columns.
  Check,
  /// Read the `Log1` sheet of a workbook and append its intervals.
  Import {
    file:         PathBuf,
    /// Workbook layout version (overrides the `layout` setting).
    #[arg(long)]
    layout:       Option<LayoutVersion>,
    /// Skip completing code pairs after the insert.
    #[arg(long)]
    no_propagate: bool,
  },
  /// Recompute one code of each pair from the other via the catalog.
  Propagate {
    /// `lithology`, `structure`, `alteration` or `all`.
    domain:    String,
    /// `primary-from-secondary` or `secondary-from-primary`; defaults to the
    /// direction implied by the configured layout.
    #[arg(long)]
    direction: Option<Direction>,
  },
  /// List the distinct hole ids in the store.
  Holes,
  /// Print stored intervals.
  Show {
    /// Restrict to these holes; all holes when omitted.
    #[arg(long = "hole", value_name = "ID")]
    holes: Vec<String>,
    #[arg(long)]
    json:  bool,
  },
  /// Remove every interval of a hole.
  Delete { hole: String },
  /// Write intervals to a workbook, or to CSV when the file ends in `.csv`.
  /// A name without either extension gets `.xlsx`.
  Export {
    file:  PathBuf,
    #[arg(long = "hole", value_name = "ID")]
    holes: Vec<String>,
  },
  /// Print a code catalog.
  Catalog { domain: Domain },
}

// ─── Entry point ──────────────────────────────────────────────────────────────

fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_writer(io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let mut settings = Settings::load(&cli.config)?;
  if let Some(database) = cli.database {
    settings.database = database;
  }

  let mut session = Session::new();
  let mut out = io::stdout().lock();

  match cli.command {
    Command::Init => {
      let store = session
        .create(&settings.database, settings.variant()?)
        .with_context(|| format!("failed to create database {:?}", settings.database))?;
      if let Some(path) = store.path() {
        println!("initialised {} ({} schema)", path.display(), store.variant());
      }
    }
    Command::Check => {
      let path = normalize_db_path(&settings.database)?;
      match SqliteStore::open(&path) {
        Ok(store) => println!("{}: conforms ({} schema)", path.display(), store.variant()),
        Err(StoreError::SchemaMismatch(diff)) => bail!("{}: {diff}", path.display()),
        Err(e) => return Err(e).with_context(|| format!("failed to open {}", path.display())),
      }
    }
    Command::Import { file, layout, no_propagate } => {
      let store = open(&mut session, &settings)?;
      let layout = match layout {
        Some(layout) => layout,
        None => settings.layout()?,
      };
      let direction = (!no_propagate).then(|| layout.propagation_direction());
      let report = commands::import(store, &file, layout, direction)?;
      println!(
        "imported {} intervals from {} ({} holes)",
        report.inserted,
        file.display(),
        report.holes.len()
      );
    }
    Command::Propagate { domain, direction } => {
      let store = open(&mut session, &settings)?;
      let direction = match direction {
        Some(direction) => direction,
        None => settings.layout()?.propagation_direction(),
      };
      let domains = commands::parse_domains(&domain)?;
      commands::propagate(store, &domains, direction, &mut out)?;
    }
    Command::Holes => commands::holes(open(&mut session, &settings)?, &mut out)?,
    Command::Show { holes, json } => {
      let holes: BTreeSet<String> = holes.into_iter().collect();
      commands::show(open(&mut session, &settings)?, &holes, json, &mut out)?;
    }
    Command::Delete { hole } => {
      let removed = open(&mut session, &settings)?.delete_by_hole_id(&hole)?;
      println!("removed {removed} intervals of {hole}");
    }
    Command::Export { file, holes } => {
      let store = open(&mut session, &settings)?;
      let holes: BTreeSet<String> = holes.into_iter().collect();
      let (path, written) = commands::export(store, &holes, &file)?;
      println!("wrote {written} intervals to {}", path.display());
    }
    Command::Catalog { domain } => {
      commands::catalog(open(&mut session, &settings)?, domain, &mut out)?
    }
  }

  if session.is_open() {
    session.close()?;
  }
  Ok(())
}

fn open<'s>(session: &'s mut Session, settings: &Settings) -> Result<&'s SqliteStore> {
  let path = normalize_db_path(&settings.database)?;
  session
    .open(&path)
    .with_context(|| format!("failed to open database {}", path.display()))
}
