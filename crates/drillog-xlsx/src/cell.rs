//! Cell conversion — one function per field kind, each with a fixed default
//! for absent or empty cells.

use calamine::Data;

use crate::{Error, Result};

/// Fractional digits kept for depth values.
pub const DEPTH_DECIMALS: i32 = 3;

pub fn round_depth(v: f64) -> f64 {
  let scale = 10f64.powi(DEPTH_DECIMALS);
  (v * scale).round() / scale
}

/// Absent, empty, or whitespace-only.
pub fn is_blank(cell: Option<&Data>) -> bool {
  match cell {
    None | Some(Data::Empty) => true,
    Some(Data::String(s)) => s.trim().is_empty(),
    Some(_) => false,
  }
}

/// Depth in metres, rounded once here. Blank → `0.0`.
pub fn depth(cell: Option<&Data>, row: u32, field: &'static str) -> Result<f64> {
  let raw = match cell {
    None | Some(Data::Empty) => return Ok(0.0),
    Some(Data::Float(v)) => *v,
    Some(Data::Int(v)) => *v as f64,
    Some(Data::String(s)) if s.trim().is_empty() => return Ok(0.0),
    Some(Data::String(s)) => s.trim().parse::<f64>().map_err(|_| Error::UnexpectedCell {
      row,
      field,
      value: s.clone(),
    })?,
    Some(other) => {
      return Err(Error::UnexpectedCell { row, field, value: format!("{other:?}") });
    }
  };
  Ok(round_depth(raw))
}

/// Text as written in the sheet. Blank → `""`. Every cell type has a text
/// rendering, so a text field never rejects a row.
pub fn text(cell: Option<&Data>) -> String {
  match cell {
    None | Some(Data::Empty) => String::new(),
    Some(Data::String(s)) | Some(Data::DateTimeIso(s)) | Some(Data::DurationIso(s)) => s.clone(),
    // Integral floats are how spreadsheets hand back typed-in numbers.
    Some(Data::Float(v)) if v.fract() == 0.0 && v.abs() < 1e15 => format!("{}", *v as i64),
    Some(Data::Float(v)) => v.to_string(),
    Some(Data::Int(v)) => v.to_string(),
    Some(Data::Bool(b)) => b.to_string(),
    Some(Data::DateTime(dt)) => {
      dt.as_datetime().map_or_else(|| dt.as_f64().to_string(), |d| d.to_string())
    }
    // Error cells keep their sheet text, e.g. `#N/A`.
    Some(other) => other.to_string(),
  }
}
