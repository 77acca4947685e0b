use std::collections::BTreeMap;
use std::fmt;

use crate::codec::{self, MergedSlot};
use crate::error::{Result, SlotError};
use crate::geometry::Footprint;
use crate::grid::GridModel;
use crate::layout::AbsorbPolicy;

/// Opaque identity of a slot, stable while the slot lives in its registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SlotId(u64);

impl SlotId {
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "slot-{}", self.0)
    }
}

/// A numbered storage location spanning one or more columns of a row.
///
/// Fields are read-only outside the crate: `slot_num` is always derived from
/// the anchor cell and is never assigned independently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot {
    id: SlotId,
    slot_num: i64,
    footprint: Footprint,
}

impl Slot {
    pub fn id(&self) -> SlotId {
        self.id
    }

    pub fn slot_num(&self) -> i64 {
        self.slot_num
    }

    pub fn row(&self) -> u16 {
        self.footprint.row
    }

    pub fn col(&self) -> u16 {
        self.footprint.col
    }

    pub fn span(&self) -> u16 {
        self.footprint.span
    }

    pub fn footprint(&self) -> Footprint {
        self.footprint
    }

    pub fn end_col(&self) -> u16 {
        self.footprint.end_col()
    }

    pub fn is_merged(&self) -> bool {
        self.footprint.span > 1
    }

    pub fn covers(&self, row: u16, col: u16) -> bool {
        self.footprint.contains(row, col)
    }
}

/// Fully expanded slot set for one shelf: every grid cell is owned by
/// exactly one slot.
///
/// Ownership queries go through a per-cell index that every mutation keeps
/// current, so lookups never scan the slot list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotRegistry {
    grid: GridModel,
    slots: BTreeMap<SlotId, Slot>,
    cells: Vec<Option<SlotId>>,
    next_id: u64,
    absorb_policy: AbsorbPolicy,
}

impl SlotRegistry {
    /// Expand a compact merge list into working form.
    ///
    /// Cells are visited row-major; an anchor named by a merge entry gets a
    /// slot of that span, every other uncovered cell a span-1 slot.
    pub fn initialize(grid: GridModel, merges: &[MergedSlot]) -> Result<Self> {
        let mut anchors: Vec<Option<u16>> = vec![None; grid.cell_count()];
        let mut covered = vec![false; grid.cell_count()];

        for merge in merges {
            if merge.span == 0 {
                return Err(SlotError::InvalidSpan {
                    start_slot: merge.start_slot,
                    span: merge.span,
                });
            }
            let (row, col) = grid
                .position_of(merge.start_slot)
                .ok_or(SlotError::SlotNumberOutOfRange(merge.start_slot))?;
            let footprint = Footprint::new(row, col, merge.span);
            if footprint.end_col() > grid.columns() {
                return Err(SlotError::RowBoundaryExceeded {
                    slot_num: merge.start_slot,
                    span: merge.span,
                    columns: grid.columns(),
                });
            }
            for (r, c) in footprint.cells() {
                let idx = grid.cell_index(r, c);
                if covered[idx] {
                    return Err(SlotError::PositionOccupied { row: r, col: c });
                }
                covered[idx] = true;
            }
            anchors[grid.cell_index(row, col)] = Some(merge.span);
        }

        let mut registry = Self::empty(grid);
        for row in 0..registry.grid.rows() {
            let mut col = 0;
            while col < registry.grid.columns() {
                let span = anchors[registry.grid.cell_index(row, col)].unwrap_or(1);
                registry.insert(Footprint::new(row, col, span));
                col += span;
            }
        }
        Ok(registry)
    }

    fn empty(grid: GridModel) -> Self {
        let cells = vec![None; grid.cell_count()];
        Self {
            grid,
            slots: BTreeMap::new(),
            cells,
            next_id: 1,
            absorb_policy: AbsorbPolicy::default(),
        }
    }

    pub fn with_absorb_policy(mut self, policy: AbsorbPolicy) -> Self {
        self.absorb_policy = policy;
        self
    }

    pub fn set_absorb_policy(&mut self, policy: AbsorbPolicy) {
        self.absorb_policy = policy;
    }

    pub fn absorb_policy(&self) -> AbsorbPolicy {
        self.absorb_policy
    }

    pub fn grid(&self) -> &GridModel {
        &self.grid
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn get(&self, id: SlotId) -> Option<&Slot> {
        self.slots.get(&id)
    }

    /// Like [`get`](Self::get) but fails with `SlotNotFound`.
    pub fn slot(&self, id: SlotId) -> Result<&Slot> {
        self.slots.get(&id).ok_or(SlotError::SlotNotFound(id))
    }

    /// Slots in ascending `slot_num` (row-major anchor) order.
    pub fn slots(&self) -> impl Iterator<Item = &Slot> + '_ {
        self.cells.iter().enumerate().filter_map(move |(idx, owner)| {
            let slot = self.slots.get(owner.as_ref()?)?;
            (self.grid.cell_index(slot.row(), slot.col()) == idx).then_some(slot)
        })
    }

    pub fn slot_at(&self, row: u16, col: u16) -> Option<&Slot> {
        self.owner_at(row, col).and_then(|id| self.slots.get(&id))
    }

    /// Slot covering the grid position numbered `number`, if any.
    pub fn slot_by_number(&self, number: i64) -> Option<&Slot> {
        let (row, col) = self.grid.position_of(number)?;
        self.slot_at(row, col)
    }

    /// True iff the cell is on the grid and owned by nobody but `excluding`.
    pub fn is_cell_available(&self, row: u16, col: u16, excluding: Option<SlotId>) -> bool {
        if !self.grid.contains(row, col) {
            return false;
        }
        match self.owner_at(row, col) {
            None => true,
            Some(owner) => Some(owner) == excluding,
        }
    }

    /// True iff a relocation may land on the cell: it is on the grid and owned
    /// by nobody, by `excluding`, or by an unmerged default slot.
    pub fn is_cell_vacant(&self, row: u16, col: u16, excluding: Option<SlotId>) -> bool {
        if self.is_cell_available(row, col, excluding) {
            return true;
        }
        self.slot_at(row, col).is_some_and(|slot| !slot.is_merged())
    }

    /// Compact form of the current layout.
    pub fn merged_slots(&self) -> Vec<MergedSlot> {
        codec::compress(self)
    }

    /// `(slot_num, footprint)` for every slot in row-major order; ids are
    /// left out so two registries with the same partition compare equal.
    pub fn layout_signature(&self) -> Vec<(i64, Footprint)> {
        self.slots()
            .map(|slot| (slot.slot_num(), slot.footprint()))
            .collect()
    }

    /// Content hash of the grid geometry and compact form.
    pub fn fingerprint(&self) -> blake3::Hash {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&self.grid.rows().to_le_bytes());
        hasher.update(&self.grid.columns().to_le_bytes());
        hasher.update(&self.grid.start_number().to_le_bytes());
        hasher.update(self.grid.prefix().as_bytes());
        for merge in self.merged_slots() {
            hasher.update(&merge.start_slot.to_le_bytes());
            hasher.update(&merge.span.to_le_bytes());
        }
        hasher.finalize()
    }

    /// Full structural check: bounds, numbering, no overlap, every cell owned.
    pub fn check_invariants(&self) -> Result<()> {
        let violation = |msg: String| Err(SlotError::InvariantViolated(msg));
        let mut seen: Vec<Option<SlotId>> = vec![None; self.grid.cell_count()];

        for slot in self.slots.values() {
            if slot.span() == 0 {
                return violation(format!("{} has span 0", slot.id));
            }
            if slot.row() >= self.grid.rows() || slot.end_col() > self.grid.columns() {
                return violation(format!("{} exceeds the grid bounds", slot.id));
            }
            let expected = self.grid.slot_number_at(slot.row(), slot.col());
            if slot.slot_num != expected {
                return violation(format!(
                    "{} numbered {} but anchored at {}",
                    slot.id, slot.slot_num, expected
                ));
            }
            for (row, col) in slot.footprint.cells() {
                let idx = self.grid.cell_index(row, col);
                if let Some(other) = seen[idx] {
                    return violation(format!("{} overlaps {} at ({row}, {col})", slot.id, other));
                }
                seen[idx] = Some(slot.id);
            }
        }

        for (idx, (owner, indexed)) in seen.iter().zip(&self.cells).enumerate() {
            if owner.is_none() {
                return violation(format!("cell {idx} has no owner"));
            }
            if owner != indexed {
                return violation(format!("cell {idx} index is stale"));
            }
        }
        Ok(())
    }

    /// Panicking form of [`check_invariants`](Self::check_invariants).
    pub fn assert_invariants(&self) {
        if let Err(err) = self.check_invariants() {
            panic!("{err}");
        }
    }

    pub(crate) fn owner_at(&self, row: u16, col: u16) -> Option<SlotId> {
        if !self.grid.contains(row, col) {
            return None;
        }
        self.cells[self.grid.cell_index(row, col)]
    }

    /// Create a slot over cells the caller has already cleared.
    pub(crate) fn insert(&mut self, footprint: Footprint) -> SlotId {
        let id = SlotId(self.next_id);
        self.next_id += 1;
        let slot = Slot {
            id,
            slot_num: self.grid.slot_number_at(footprint.row, footprint.col),
            footprint,
        };
        self.slots.insert(id, slot);
        self.claim(id, footprint);
        id
    }

    pub(crate) fn remove(&mut self, id: SlotId) -> Option<Slot> {
        let slot = self.slots.remove(&id)?;
        self.release(slot.footprint);
        Some(slot)
    }

    /// Clear the cells owned by `id` while keeping the slot record.
    pub(crate) fn detach(&mut self, id: SlotId) {
        if let Some(footprint) = self.slots.get(&id).map(Slot::footprint) {
            self.release(footprint);
        }
    }

    /// Place a (detached) slot at `footprint`, renumbering it from the new anchor.
    pub(crate) fn attach(&mut self, id: SlotId, footprint: Footprint) {
        let slot_num = self.grid.slot_number_at(footprint.row, footprint.col);
        if let Some(slot) = self.slots.get_mut(&id) {
            slot.footprint = footprint;
            slot.slot_num = slot_num;
            self.claim(id, footprint);
        }
    }

    /// Materialize a span-1 slot on every unowned cell, row-major.
    pub(crate) fn fill_gaps(&mut self) -> Vec<SlotId> {
        let mut created = Vec::new();
        for row in 0..self.grid.rows() {
            for col in 0..self.grid.columns() {
                if self.owner_at(row, col).is_none() {
                    created.push(self.insert(Footprint::new(row, col, 1)));
                }
            }
        }
        created
    }

    fn claim(&mut self, id: SlotId, footprint: Footprint) {
        for (row, col) in footprint.cells() {
            let idx = self.grid.cell_index(row, col);
            self.cells[idx] = Some(id);
        }
    }

    fn release(&mut self, footprint: Footprint) {
        for (row, col) in footprint.cells() {
            let idx = self.grid.cell_index(row, col);
            self.cells[idx] = None;
        }
    }
}
