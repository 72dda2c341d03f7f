//! Versioned fixed-column layouts of the drill-log workbook.
//!
//! A layout names the worksheet, where the data block starts, and which column
//! offset (counted from the first data column) holds each logical field.

use std::{fmt, str::FromStr};

use drillog_core::{catalog::Domain, interval::CodeSlot, propagate::Direction};

use crate::{Error, Result};

// ─── Fields ──────────────────────────────────────────────────────────────────

/// A logical field read from a worksheet row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
  HoleId,
  FromL,
  ToL,
  RunL,
  Code(Domain, CodeSlot),
  Description,
}

/// How a field's cell is converted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
  Depth,
  Text,
}

impl Field {
  /// Composite-log column the field lands in.
  pub fn name(self) -> &'static str {
    match self {
      Self::HoleId => "hole_id",
      Self::FromL => "from_l",
      Self::ToL => "to_l",
      Self::RunL => "run_l",
      Self::Code(domain, CodeSlot::Primary) => domain.log_columns().0,
      Self::Code(domain, CodeSlot::Secondary) => domain.log_columns().1,
      Self::Description => "description",
    }
  }

  pub fn kind(self) -> FieldKind {
    match self {
      Self::FromL | Self::ToL | Self::RunL => FieldKind::Depth,
      _ => FieldKind::Text,
    }
  }
}

// ─── Layout versions ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LayoutVersion {
  /// Historical layout: mnemonic codes in offsets 4–6, remarks in 7.
  V1_0,
  /// Current layout (Feb 2024, 50 columns): descriptive codes in offsets
  /// 7, 8 and 22, remarks in 47.
  #[default]
  V1_1,
}

const V1_0_COLUMNS: &[(Field, u32)] = &[
  (Field::HoleId, 0),
  (Field::FromL, 1),
  (Field::ToL, 2),
  (Field::RunL, 3),
  (Field::Code(Domain::Lithology, CodeSlot::Primary), 4),
  (Field::Code(Domain::Structure, CodeSlot::Primary), 5),
  (Field::Code(Domain::Alteration, CodeSlot::Primary), 6),
  (Field::Description, 7),
];

const V1_1_COLUMNS: &[(Field, u32)] = &[
  (Field::HoleId, 0),
  (Field::FromL, 1),
  (Field::ToL, 2),
  (Field::RunL, 3),
  (Field::Code(Domain::Structure, CodeSlot::Secondary), 7),
  (Field::Code(Domain::Lithology, CodeSlot::Secondary), 8),
  (Field::Code(Domain::Alteration, CodeSlot::Secondary), 22),
  (Field::Description, 47),
];

impl LayoutVersion {
  pub const ALL: [LayoutVersion; 2] = [LayoutVersion::V1_0, LayoutVersion::V1_1];

  pub fn as_str(self) -> &'static str {
    match self {
      Self::V1_0 => "1.0",
      Self::V1_1 => "1.1",
    }
  }

  /// Worksheet holding the log.
  pub fn sheet(self) -> &'static str { "Log1" }

  /// 0-based absolute row of the first data row (sheet row 6).
  pub fn start_row(self) -> u32 { 5 }

  /// 0-based absolute column that offset 0 refers to (sheet column B).
  pub fn start_col(self) -> u32 { 1 }

  /// `(field, offset)` pairs read from every row.
  pub fn columns(self) -> &'static [(Field, u32)] {
    match self {
      Self::V1_0 => V1_0_COLUMNS,
      Self::V1_1 => V1_1_COLUMNS,
    }
  }

  pub fn offset(self, field: Field) -> Option<u32> {
    self
      .columns()
      .iter()
      .find(|(f, _)| *f == field)
      .map(|(_, offset)| *offset)
  }

  /// The code-pair slot this layout's spreadsheet columns fill.
  pub fn filled_slot(self) -> CodeSlot {
    match self {
      Self::V1_0 => CodeSlot::Primary,
      Self::V1_1 => CodeSlot::Secondary,
    }
  }

  /// Direction that completes the pairs after an import with this layout.
  pub fn propagation_direction(self) -> Direction {
    match self.filled_slot() {
      CodeSlot::Primary => Direction::SecondaryFromPrimary,
      CodeSlot::Secondary => Direction::PrimaryFromSecondary,
    }
  }
}

impl fmt::Display for LayoutVersion {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl FromStr for LayoutVersion {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    let trimmed = s.trim();
    let bare = trimmed
      .strip_prefix('v')
      .or_else(|| trimmed.strip_prefix('V'))
      .unwrap_or(trimmed);
    LayoutVersion::ALL
      .into_iter()
      .find(|v| v.as_str() == bare)
      .ok_or_else(|| Error::UnknownLayout(s.to_owned()))
  }
}
