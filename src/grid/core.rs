//! Numbered shelf grid geometry.
//!
//! Positions are numbered row-major from `start_number`:
//! `number(row, col) = start_number + row * columns + col`. The grid is a
//! pure value; nothing here mutates after construction.
//!
//! # Example
//! ```
//! use shelf_slots::GridModel;
//!
//! let grid = GridModel::new(2, 5, 1, "A")?;
//! assert_eq!(grid.slot_number_at(1, 0), 6);
//! assert_eq!(grid.label(2, 2), "A2-A3");
//! # Ok::<(), shelf_slots::SlotError>(())
//! ```

use crate::error::{Result, SlotError};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GridModel {
    rows: u16,
    columns: u16,
    start_number: i64,
    prefix: String,
}

impl GridModel {
    /// Build a grid; both dimensions must be non-zero and every slot number
    /// must fit in an `i64`.
    pub fn new(rows: u16, columns: u16, start_number: i64, prefix: impl Into<String>) -> Result<Self> {
        if rows == 0 || columns == 0 {
            return Err(SlotError::InvalidGrid { rows, columns });
        }
        let last_offset = rows as i64 * columns as i64 - 1;
        if start_number.checked_add(last_offset).is_none() {
            return Err(SlotError::SlotNumberOutOfRange(start_number));
        }
        Ok(Self {
            rows,
            columns,
            start_number,
            prefix: prefix.into(),
        })
    }

    pub fn rows(&self) -> u16 {
        self.rows
    }

    pub fn columns(&self) -> u16 {
        self.columns
    }

    pub fn start_number(&self) -> i64 {
        self.start_number
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn cell_count(&self) -> usize {
        self.rows as usize * self.columns as usize
    }

    /// Highest slot number on the grid.
    pub fn last_number(&self) -> i64 {
        self.start_number + self.cell_count() as i64 - 1
    }

    pub fn contains(&self, row: u16, col: u16) -> bool {
        row < self.rows && col < self.columns
    }

    /// Fail with `InvalidPosition` unless `(row, col)` lies on the grid.
    pub fn check_position(&self, row: u16, col: u16) -> Result<()> {
        if self.contains(row, col) {
            Ok(())
        } else {
            Err(SlotError::InvalidPosition { row, col })
        }
    }

    pub fn cell_index(&self, row: u16, col: u16) -> usize {
        row as usize * self.columns as usize + col as usize
    }

    pub fn slot_number_at(&self, row: u16, col: u16) -> i64 {
        self.start_number + self.cell_index(row, col) as i64
    }

    /// Inverse of [`slot_number_at`](Self::slot_number_at).
    pub fn position_of(&self, number: i64) -> Option<(u16, u16)> {
        let offset = number.checked_sub(self.start_number)?;
        if offset < 0 || offset >= self.cell_count() as i64 {
            return None;
        }
        let columns = self.columns as i64;
        Some(((offset / columns) as u16, (offset % columns) as u16))
    }

    pub fn format_number(&self, number: i64) -> String {
        format!("{}{}", self.prefix, number)
    }

    /// Display label for a slot anchored at `number`: `A4`, or `A2-A3` when merged.
    pub fn label(&self, number: i64, span: u16) -> String {
        if span > 1 {
            format!(
                "{}-{}",
                self.format_number(number),
                self.format_number(number.saturating_add(span as i64 - 1))
            )
        } else {
            self.format_number(number)
        }
    }
}
