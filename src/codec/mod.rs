//! Conversion between the working registry and the persisted merge list.
//!
//! Only merged slots (span > 1) are persisted; every other position is an
//! implicit span-1 default derivable from the grid dimensions. For any
//! non-overlapping, in-row merge list `m` with spans of at least 2,
//! `compress(&decompress(grid, m)?)` yields the same set of entries.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::grid::GridModel;
use crate::registry::SlotRegistry;

/// One persisted merge: `span` columns starting at slot number `start_slot`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergedSlot {
    pub start_slot: i64,
    pub span: u16,
}

impl MergedSlot {
    pub const fn new(start_slot: i64, span: u16) -> Self {
        Self { start_slot, span }
    }
}

/// Minimal merge list for `registry`, ascending by start slot.
pub fn compress(registry: &SlotRegistry) -> Vec<MergedSlot> {
    registry
        .slots()
        .filter(|slot| slot.is_merged())
        .map(|slot| MergedSlot::new(slot.slot_num(), slot.span()))
        .collect()
}

/// Rebuild the working registry from a persisted merge list.
pub fn decompress(grid: &GridModel, merges: &[MergedSlot]) -> Result<SlotRegistry> {
    SlotRegistry::initialize(grid.clone(), merges)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> GridModel {
        GridModel::new(3, 4, 10, "C").unwrap()
    }

    #[test]
    fn empty_merge_list_means_unmerged_grid() {
        let registry = decompress(&grid(), &[]).unwrap();
        assert_eq!(registry.len(), 12);
        assert!(compress(&registry).is_empty());
    }

    #[test]
    fn compress_orders_by_start_slot() {
        let merges = [MergedSlot::new(19, 2), MergedSlot::new(10, 4)];
        let registry = decompress(&grid(), &merges).unwrap();
        assert_eq!(
            compress(&registry),
            vec![MergedSlot::new(10, 4), MergedSlot::new(19, 2)]
        );
    }

    #[test]
    fn single_column_entries_vanish_on_encode() {
        let registry = decompress(&grid(), &[MergedSlot::new(12, 1)]).unwrap();
        assert!(compress(&registry).is_empty());
    }

    #[test]
    fn serde_uses_persisted_field_names() {
        let json = serde_json::to_string(&MergedSlot::new(2, 2)).unwrap();
        assert_eq!(json, r#"{"startSlot":2,"span":2}"#);
        let parsed: MergedSlot = serde_json::from_str(r#"{"startSlot":7,"span":3}"#).unwrap();
        assert_eq!(parsed, MergedSlot::new(7, 3));
    }
}
