//! Layered settings: optional TOML file, then `DRILLOG_*` environment
//! variables. Command-line flags are applied on top by the caller.

use std::path::Path;

use anyhow::Context as _;
use drillog_store_sqlite::SchemaVariant;
use drillog_xlsx::LayoutVersion;
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
  /// Database name or path; `.db` is appended when no extension is given.
  pub database: String,
  /// Workbook layout version used by `import`.
  pub layout:   String,
  /// Composite-log shape created by `init`.
  pub variant:  String,
}

impl Default for Settings {
  fn default() -> Self {
    Self {
      database: "drillog.db".to_string(),
      layout:   LayoutVersion::default().as_str().to_string(),
      variant:  SchemaVariant::default().as_str().to_string(),
    }
  }
}

impl Settings {
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    let settings = config::Config::builder()
      .add_source(config::File::from(path.to_path_buf()).required(false))
      .add_source(config::Environment::with_prefix("DRILLOG"))
      .build()
      .with_context(|| format!("failed to read config file {}", path.display()))?;

    settings
      .try_deserialize()
      .context("failed to deserialise settings")
  }

  pub fn layout(&self) -> anyhow::Result<LayoutVersion> {
    self
      .layout
      .parse()
      .with_context(|| format!("invalid `layout` setting {:?}", self.layout))
  }

  pub fn variant(&self) -> anyhow::Result<SchemaVariant> {
    SchemaVariant::parse(&self.variant)
      .with_context(|| format!("invalid `variant` setting {:?}", self.variant))
  }
}
