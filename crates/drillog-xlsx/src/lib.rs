//! Drill-log workbook reader for drillog.
//!
//! Reads the `Log1` worksheet of a core-log export under a fixed
//! [`LayoutVersion`] and yields [`drillog_core::interval::NewInterval`]s.
//! Pure synchronous; no database dependencies.
//!
//! # Quick start
//!
//! ```no_run
//! use drillog_xlsx::{Extractor, LayoutVersion, open_log_sheet};
//!
//! let sheet = open_log_sheet("DDH-001.xlsx", LayoutVersion::V1_1).unwrap();
//! for row in Extractor::new(&sheet, LayoutVersion::V1_1) {
//!   println!("{:?}", row.unwrap());
//! }
//! ```

mod cell;
pub mod error;
mod extract;
pub mod layout;

use std::path::Path;

use calamine::{Range, Reader, open_workbook_auto};

pub use calamine::Data;
pub use cell::{DEPTH_DECIMALS, round_depth};
pub use error::{Error, Result};
pub use extract::{Extractor, Progress};
pub use layout::{Field, LayoutVersion};

/// A loaded worksheet.
pub type Sheet = Range<Data>;

/// Open the workbook at `path` and load the layout's worksheet.
///
/// Fails with [`Error::SheetNotFound`] when the workbook has no such sheet; no
/// rows are read in that case.
pub fn open_log_sheet(path: impl AsRef<Path>, layout: LayoutVersion) -> Result<Sheet> {
  let path = path.as_ref();
  let mut workbook = open_workbook_auto(path)?;

  let available = workbook.sheet_names();
  if !available.iter().any(|name| name == layout.sheet()) {
    return Err(Error::SheetNotFound { sheet: layout.sheet().to_owned(), available });
  }

  let range = workbook.worksheet_range(layout.sheet())?;
  tracing::debug!(
    path = %path.display(),
    sheet = layout.sheet(),
    end = ?range.end(),
    "loaded worksheet"
  );
  Ok(range)
}

#[cfg(test)]
mod tests {
  use rust_xlsxwriter::Workbook;

  use super::*;

  /// Write a workbook with one sheet named `sheet` holding two v1.1 rows.
  fn write_workbook(path: &Path, sheet: &str) {
    let layout = LayoutVersion::V1_1;
    let row = layout.start_row();
    let col = |offset: u32| (layout.start_col() + offset) as u16;

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet).unwrap();
    worksheet.write_string(0, 1, "DETAILED CORE LOG").unwrap();
    for i in 0..2u32 {
      let r = row + i;
      worksheet.write_string(r, col(0), "DDH-001").unwrap();
      worksheet.write_number(r, col(1), f64::from(i) * 3.0).unwrap();
      worksheet.write_number(r, col(2), f64::from(i) * 3.0 + 3.0).unwrap();
      worksheet.write_number(r, col(3), 3.0).unwrap();
      worksheet.write_string(r, col(8), "Andesite").unwrap();
    }
    workbook.save(path).unwrap();
  }

  #[test]
  fn missing_log_sheet_is_a_layout_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("summary.xlsx");
    write_workbook(&path, "Summary");

    match open_log_sheet(&path, LayoutVersion::V1_1) {
      Err(Error::SheetNotFound { sheet, available }) => {
        assert_eq!(sheet, "Log1");
        assert_eq!(available, vec!["Summary".to_string()]);
      }
      Err(other) => panic!("unexpected error: {other}"),
      Ok(_) => panic!("sheet without Log1 was accepted"),
    }
  }

  #[test]
  fn reads_rows_from_a_log_workbook() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("DDH-001.xlsx");
    write_workbook(&path, "Log1");

    let sheet = open_log_sheet(&path, LayoutVersion::V1_1).unwrap();
    let rows: Vec<_> = Extractor::new(&sheet, LayoutVersion::V1_1)
      .collect::<Result<_>>()
      .unwrap();

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1].hole_id, "DDH-001");
    assert_eq!(rows[1].from_l, 3.0);
    assert_eq!(rows[1].to_l, 6.0);
    assert_eq!(rows[0].litho_2.as_deref(), Some("Andesite"));
  }
}
