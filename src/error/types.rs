use thiserror::Error;

use crate::registry::SlotId;

/// Unified result type for slot layout operations.
pub type Result<T> = std::result::Result<T, SlotError>;

/// Result type for shelf document handling.
pub type ShelfResult<T> = std::result::Result<T, ShelfError>;

/// Validation failures raised by the layout engine.
///
/// All of them are synchronous and final: an operation that returns one of
/// these has not touched the registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SlotError {
    #[error("grid must have at least one row and one column (got {rows}x{columns})")]
    InvalidGrid { rows: u16, columns: u16 },
    #[error("position ({row}, {col}) is outside the grid")]
    InvalidPosition { row: u16, col: u16 },
    #[error("cell ({row}, {col}) is already occupied")]
    PositionOccupied { row: u16, col: u16 },
    #[error("slot {slot_num} with span {span} crosses the row edge at column {columns}")]
    RowBoundaryExceeded { slot_num: i64, span: u16, columns: u16 },
    #[error("{0} already has span 1")]
    NothingToShrink(SlotId),
    #[error("{slot} would only partially absorb {neighbor}")]
    MergeBoundaryMismatch { slot: SlotId, neighbor: SlotId },
    #[error("{0} not found")]
    SlotNotFound(SlotId),
    #[error("slot number {0} is outside the grid")]
    SlotNumberOutOfRange(i64),
    #[error("merge starting at {start_slot} has invalid span {span}")]
    InvalidSpan { start_slot: i64, span: u16 },
    #[error("layout invariant violated: {0}")]
    InvariantViolated(String),
}

/// Errors surfaced while reading or writing shelf documents.
#[derive(Debug, Error)]
pub enum ShelfError {
    #[error("slot layout error: {0}")]
    Slot(#[from] SlotError),
    #[error("invalid shelf: {0}")]
    InvalidShelf(String),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
