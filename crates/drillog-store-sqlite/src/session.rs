//! A session owns at most one open store at a time.
//!
//! Every core operation takes the store handle explicitly; the session only
//! enforces the single-connection rule of the surrounding application.

use std::path::{Path, PathBuf};

use crate::{Error, Result, SchemaVariant, SqliteStore};

/// Turn a user-entered database name into a file path. Names without a
/// `.db` or `.sqlite` extension get `.db` appended.
pub fn normalize_db_path(name: &str) -> Result<PathBuf> {
  let name = name.trim();
  if name.is_empty() {
    return Err(Error::Configuration("database name is empty".into()));
  }

  let has_ext = Path::new(name)
    .extension()
    .and_then(|ext| ext.to_str())
    .is_some_and(|ext| ext.eq_ignore_ascii_case("db") || ext.eq_ignore_ascii_case("sqlite"));

  Ok(if has_ext { PathBuf::from(name) } else { PathBuf::from(format!("{name}.db")) })
}

#[derive(Default)]
pub struct Session {
  store: Option<SqliteStore>,
}

impl Session {
  pub fn new() -> Self { Self::default() }

  /// Create a database from a user-entered name and attach to it.
  pub fn create(&mut self, name: &str, variant: SchemaVariant) -> Result<&SqliteStore> {
    if self.store.is_some() {
      return Err(Error::ConnectionExists);
    }
    let path = normalize_db_path(name)?;
    Ok(&*self.store.insert(SqliteStore::create(path, variant)?))
  }

  /// Attach to an existing database; refused on schema mismatch.
  pub fn open(&mut self, path: impl AsRef<Path>) -> Result<&SqliteStore> {
    if self.store.is_some() {
      return Err(Error::ConnectionExists);
    }
    Ok(&*self.store.insert(SqliteStore::open(path)?))
  }

  /// Detach and drop the open store.
  pub fn close(&mut self) -> Result<()> {
    let store = self.store.take().ok_or(Error::NotConnected)?;
    if let Some(path) = store.path() {
      tracing::info!(path = %path.display(), "closed store");
    }
    Ok(())
  }

  /// The open store, for operations that require one.
  pub fn store(&self) -> Result<&SqliteStore> { self.store.as_ref().ok_or(Error::NotConnected) }

  /// The open store, if any.
  pub fn current(&self) -> Option<&SqliteStore> { self.store.as_ref() }

  pub fn is_open(&self) -> bool { self.store.is_some() }
}
