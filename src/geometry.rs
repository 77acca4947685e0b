use std::ops::Range;

/// Horizontal run of cells within a single grid row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Footprint {
    pub row: u16,
    pub col: u16,
    pub span: u16,
}

impl Footprint {
    pub const fn new(row: u16, col: u16, span: u16) -> Self {
        Self { row, col, span }
    }

    /// Column one past the last covered cell.
    pub fn end_col(&self) -> u16 {
        self.col.saturating_add(self.span)
    }

    pub fn columns(&self) -> Range<u16> {
        self.col..self.end_col()
    }

    pub fn contains(&self, row: u16, col: u16) -> bool {
        self.row == row && self.columns().contains(&col)
    }

    pub fn intersects(&self, other: &Footprint) -> bool {
        self.row == other.row && self.col < other.end_col() && other.col < self.end_col()
    }

    /// Iterate the `(row, col)` pairs covered, left to right.
    pub fn cells(&self) -> impl Iterator<Item = (u16, u16)> + '_ {
        self.columns().map(move |col| (self.row, col))
    }
}
