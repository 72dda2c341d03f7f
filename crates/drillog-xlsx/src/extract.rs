//! Lazy row extraction over a loaded worksheet.

use std::sync::{
  Arc,
  atomic::{AtomicBool, Ordering},
};

use drillog_core::interval::NewInterval;

use crate::{
  Data, Error, Result, Sheet, cell,
  layout::{Field, FieldKind, LayoutVersion},
};

/// Rows consumed so far out of the candidate rows below the header block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
  pub consumed: usize,
  pub total:    usize,
}

/// Yields one [`NewInterval`] per sheet row, starting at the layout's first
/// data row and stopping at the first row with a blank hole id.
///
/// After an error the iterator is fused and yields nothing more.
pub struct Extractor<'a> {
  sheet:    &'a Sheet,
  layout:   LayoutVersion,
  next_row: u32,
  last_row: Option<u32>,
  total:    usize,
  consumed: usize,
  done:     bool,
  progress: Option<Box<dyn FnMut(Progress) + 'a>>,
  cancel:   Option<Arc<AtomicBool>>,
}

impl<'a> Extractor<'a> {
  pub fn new(sheet: &'a Sheet, layout: LayoutVersion) -> Self {
    let start = layout.start_row();
    let last_row = sheet.end().map(|(row, _)| row);
    let total = match last_row {
      Some(last) if last >= start => (last - start + 1) as usize,
      _ => 0,
    };

    Self {
      sheet,
      layout,
      next_row: start,
      last_row,
      total,
      consumed: 0,
      done: false,
      progress: None,
      cancel: None,
    }
  }

  /// Called after every yielded row.
  pub fn on_progress(mut self, f: impl FnMut(Progress) + 'a) -> Self {
    self.progress = Some(Box::new(f));
    self
  }

  /// Checked once per row; once set, the next call yields
  /// [`Error::Cancelled`].
  pub fn cancel_on(mut self, flag: Arc<AtomicBool>) -> Self {
    self.cancel = Some(flag);
    self
  }

  /// Candidate rows between the first data row and the last used row.
  pub fn total(&self) -> usize { self.total }

  pub fn layout(&self) -> LayoutVersion { self.layout }

  fn cell(&self, row: u32, offset: u32) -> Option<&'a Data> {
    self.sheet.get_value((row, self.layout.start_col() + offset))
  }

  fn read_row(&self, row: u32) -> Result<NewInterval> {
    let mut interval = NewInterval::default();
    // Sheet rows are 1-based in messages.
    let display_row = row + 1;

    for &(field, offset) in self.layout.columns() {
      let cell = self.cell(row, offset);
      match field.kind() {
        FieldKind::Depth => {
          let value = cell::depth(cell, display_row, field.name())?;
          match field {
            Field::FromL => interval.from_l = value,
            Field::ToL => interval.to_l = value,
            _ => interval.run_l = value,
          }
        }
        FieldKind::Text => {
          let value = cell::text(cell);
          match field {
            Field::HoleId => interval.hole_id = value,
            Field::Code(domain, slot) => interval.set_code(domain, slot, Some(value)),
            _ => interval.description = Some(value),
          }
        }
      }
    }

    Ok(interval)
  }
}

impl Iterator for Extractor<'_> {
  type Item = Result<NewInterval>;

  fn next(&mut self) -> Option<Self::Item> {
    if self.done {
      return None;
    }

    if let Some(flag) = &self.cancel
      && flag.load(Ordering::Relaxed)
    {
      self.done = true;
      tracing::info!(consumed = self.consumed, "extraction cancelled");
      return Some(Err(Error::Cancelled(self.consumed)));
    }

    let row = self.next_row;
    let past_end = self.last_row.is_none_or(|last| row > last);
    let hole_offset = self.layout.offset(Field::HoleId).unwrap_or(0);
    if past_end || cell::is_blank(self.cell(row, hole_offset)) {
      self.done = true;
      tracing::debug!(rows = self.consumed, "end of log data");
      return None;
    }

    let item = self.read_row(row);
    if item.is_err() {
      self.done = true;
      return Some(item);
    }

    self.next_row += 1;
    self.consumed += 1;
    let progress = Progress { consumed: self.consumed, total: self.total };
    if let Some(f) = self.progress.as_mut() {
      f(progress);
    }
    Some(item)
  }
}
