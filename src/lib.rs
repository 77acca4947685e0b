//! Slot layout engine for storage shelves.
//!
//! A shelf is a grid of numbered positions. Adjacent positions in a row can
//! be merged into wider slots, and slots can be moved, swapped, expanded,
//! shrunk or resized while the grid stays fully partitioned: every cell is
//! owned by exactly one slot and no slot crosses a row edge.
//!
//! Shelves are persisted in a compact form, a list of merges; every other
//! position is an implicit single-column slot. [`codec`] converts between
//! that form and the working [`SlotRegistry`].
//!
//! ```
//! use shelf_slots::{GridModel, MergedSlot, SlotRegistry};
//!
//! let grid = GridModel::new(2, 5, 1, "A")?;
//! let mut registry = SlotRegistry::initialize(grid, &[MergedSlot::new(2, 2)])?;
//! let merged = registry.slot_by_number(2).map(|slot| slot.id()).unwrap();
//!
//! registry.move_slot(merged, 1, 0)?;
//! assert_eq!(registry.merged_slots(), vec![MergedSlot::new(6, 2)]);
//! # Ok::<(), shelf_slots::SlotError>(())
//! ```

pub mod codec;
pub mod editor;
pub mod error;
pub mod geometry;
pub mod grid;
pub mod layout;
pub mod logging;
pub mod metrics;
pub mod registry;
pub mod shelf;

pub use codec::{MergedSlot, compress, decompress};
pub use editor::{
    DropTarget, EditorConfig, Gesture, InteractionState, ShelfEditor, SlotInteraction,
};
pub use error::{Result, ShelfError, ShelfResult, SlotError};
pub use geometry::Footprint;
pub use grid::GridModel;
pub use layout::{AbsorbPolicy, LayoutChange, LayoutOp};
pub use logging::{
    LogEvent, LogFields, LogLevel, LogSink, Logger, LoggingError, LoggingResult, MemorySink,
    WriterSink,
};
pub use metrics::{EditorMetrics, MetricSnapshot};
pub use registry::{Slot, SlotId, SlotRegistry};
pub use shelf::{LegacySlotsConfig, MultiShelfConfig, ShelfConfig, SlotCapacity};
