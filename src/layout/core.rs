use crate::error::{Result, SlotError};
use crate::geometry::Footprint;
use crate::registry::{Slot, SlotId, SlotRegistry};

/// How an expanding slot treats a neighbour that reaches past its new edge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AbsorbPolicy {
    /// Refuse the operation with `MergeBoundaryMismatch`.
    #[default]
    Reject,
    /// Keep growing until the neighbour is covered completely.
    Extend,
}

/// Kind of committed layout operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutOp {
    Move,
    Swap,
    Expand,
    Shrink,
    Resize,
}

impl LayoutOp {
    pub fn as_str(self) -> &'static str {
        match self {
            LayoutOp::Move => "move",
            LayoutOp::Swap => "swap",
            LayoutOp::Expand => "expand",
            LayoutOp::Shrink => "shrink",
            LayoutOp::Resize => "resize",
        }
    }
}

/// Record of what a committed operation did to the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutChange {
    pub op: LayoutOp,
    /// Slot the operation acted on.
    pub slot: SlotId,
    /// Swap partner.
    pub other: Option<SlotId>,
    /// Slots absorbed by a merge or displaced by a relocation.
    pub removed: Vec<SlotId>,
    /// Default slots materialized on vacated cells.
    pub created: Vec<SlotId>,
    /// The request matched the current layout; nothing was touched.
    pub noop: bool,
}

impl LayoutChange {
    fn new(op: LayoutOp, slot: SlotId) -> Self {
        Self {
            op,
            slot,
            other: None,
            removed: Vec::new(),
            created: Vec::new(),
            noop: false,
        }
    }

    fn unchanged(op: LayoutOp, slot: SlotId) -> Self {
        Self {
            noop: true,
            ..Self::new(op, slot)
        }
    }
}

impl SlotRegistry {
    /// Relocate `id` so its anchor sits at `(target_row, target_col)`.
    ///
    /// Target cells may belong to unmerged default slots, which are
    /// displaced; cells the slot leaves behind become fresh span-1 slots.
    pub fn move_slot(&mut self, id: SlotId, target_row: u16, target_col: u16) -> Result<LayoutChange> {
        self.commit(|staged| {
            let slot = staged.slot(id)?.footprint();
            if (slot.row, slot.col) == (target_row, target_col) {
                return Ok(LayoutChange::unchanged(LayoutOp::Move, id));
            }
            let mut change = LayoutChange::new(LayoutOp::Move, id);
            let target = Footprint::new(target_row, target_col, slot.span);
            (change.removed, change.created) = staged.relocate(&[(id, target)])?;
            Ok(change)
        })
    }

    /// Exchange the anchors of two slots. Equal spans always succeed; unequal
    /// spans are validated like a move.
    pub fn swap_slots(&mut self, a: SlotId, b: SlotId) -> Result<LayoutChange> {
        self.commit(|staged| {
            let first = staged.slot(a)?.footprint();
            let second = staged.slot(b)?.footprint();
            let mut change = if a == b {
                LayoutChange::unchanged(LayoutOp::Swap, a)
            } else {
                LayoutChange::new(LayoutOp::Swap, a)
            };
            change.other = Some(b);
            if change.noop {
                return Ok(change);
            }
            let moves = [
                (a, Footprint::new(second.row, second.col, first.span)),
                (b, Footprint::new(first.row, first.col, second.span)),
            ];
            (change.removed, change.created) = staged.relocate(&moves)?;
            Ok(change)
        })
    }

    /// Grow `id` by one column, absorbing whatever owns that column.
    pub fn expand_slot(&mut self, id: SlotId) -> Result<LayoutChange> {
        let slot = self.slot(id)?;
        let columns = self.grid().columns();
        if slot.end_col() >= columns {
            return Err(SlotError::RowBoundaryExceeded {
                slot_num: slot.slot_num(),
                span: slot.span() + 1,
                columns,
            });
        }
        let span = slot.span() + 1;
        self.commit(|staged| staged.grow(id, span, LayoutOp::Expand))
    }

    /// Split the trailing column of `id` off into a new span-1 slot.
    pub fn shrink_slot(&mut self, id: SlotId) -> Result<LayoutChange> {
        let span = self.slot(id)?.span();
        if span <= 1 {
            return Err(SlotError::NothingToShrink(id));
        }
        self.commit(|staged| staged.shrink_to(id, span - 1, LayoutOp::Shrink))
    }

    /// Set the span of `id`, clamped to `1..=columns - col`.
    ///
    /// Growing absorbs every slot in the newly covered columns; shrinking
    /// leaves one span-1 slot per relinquished column.
    pub fn resize(&mut self, id: SlotId, desired_span: u16) -> Result<LayoutChange> {
        let slot = self.slot(id)?;
        let span = desired_span.clamp(1, self.grid().columns() - slot.col());
        let current = slot.span();
        if span > current {
            self.commit(|staged| staged.grow(id, span, LayoutOp::Resize))
        } else if span < current {
            self.commit(|staged| staged.shrink_to(id, span, LayoutOp::Resize))
        } else {
            Ok(LayoutChange::unchanged(LayoutOp::Resize, id))
        }
    }

    /// Dry run of [`move_slot`](Self::move_slot).
    pub fn can_move_to(&self, id: SlotId, target_row: u16, target_col: u16) -> bool {
        let Some(slot) = self.get(id) else {
            return false;
        };
        let target = Footprint::new(target_row, target_col, slot.span());
        if !self.grid().contains(target_row, target_col) || target.end_col() > self.grid().columns() {
            return false;
        }
        target
            .cells()
            .all(|(row, col)| self.is_cell_vacant(row, col, Some(id)))
    }

    /// Widest span `id` could be resized to.
    pub fn max_span(&self, id: SlotId) -> Result<u16> {
        let slot = self.slot(id)?;
        Ok(self.grid().columns() - slot.col())
    }

    /// Slots a resize of `id` to `span` columns would absorb, left to right.
    pub fn absorption_preview(&self, id: SlotId, span: u16) -> Result<Vec<SlotId>> {
        let slot = self.slot(id)?;
        Ok(self.neighbours_within(slot, slot.col().saturating_add(span)))
    }

    fn commit<F>(&mut self, apply: F) -> Result<LayoutChange>
    where
        F: FnOnce(&mut SlotRegistry) -> Result<LayoutChange>,
    {
        let mut staged = self.clone();
        let change = apply(&mut staged)?;
        staged.check_invariants()?;
        *self = staged;
        Ok(change)
    }

    fn neighbours_within(&self, slot: &Slot, end: u16) -> Vec<SlotId> {
        let end = end.min(self.grid().columns());
        let mut found = Vec::new();
        for col in slot.end_col()..end {
            if let Some(owner) = self.owner_at(slot.row(), col) {
                if owner != slot.id() && !found.contains(&owner) {
                    found.push(owner);
                }
            }
        }
        found
    }

    fn grow(&mut self, id: SlotId, span: u16, op: LayoutOp) -> Result<LayoutChange> {
        let slot = self.slot(id)?.clone();
        let mut end = slot.col() + span;
        let absorbed = self.neighbours_within(&slot, end);

        for &neighbour in &absorbed {
            let neighbour_end = self.slot(neighbour)?.end_col();
            if neighbour_end > end {
                match self.absorb_policy() {
                    AbsorbPolicy::Reject => {
                        return Err(SlotError::MergeBoundaryMismatch { slot: id, neighbor: neighbour });
                    }
                    AbsorbPolicy::Extend => end = neighbour_end,
                }
            }
        }

        for &neighbour in &absorbed {
            self.remove(neighbour);
        }
        self.detach(id);
        self.attach(id, Footprint::new(slot.row(), slot.col(), end - slot.col()));

        let mut change = LayoutChange::new(op, id);
        change.removed = absorbed;
        Ok(change)
    }

    fn shrink_to(&mut self, id: SlotId, span: u16, op: LayoutOp) -> Result<LayoutChange> {
        let slot = self.slot(id)?.footprint();
        self.detach(id);
        self.attach(id, Footprint::new(slot.row, slot.col, span));

        let mut change = LayoutChange::new(op, id);
        change.created = self.fill_gaps();
        Ok(change)
    }

    /// Detach every moving slot, displace default slots under the targets,
    /// then attach and refill. Returns `(displaced, created)`.
    fn relocate(&mut self, moves: &[(SlotId, Footprint)]) -> Result<(Vec<SlotId>, Vec<SlotId>)> {
        for &(id, _) in moves {
            self.slot(id)?;
            self.detach(id);
        }

        let grid = self.grid();
        for (idx, &(_, target)) in moves.iter().enumerate() {
            if !grid.contains(target.row, target.col) || target.end_col() > grid.columns() {
                return Err(SlotError::InvalidPosition {
                    row: target.row,
                    col: target.col,
                });
            }
            if let Some(&(_, earlier)) = moves[..idx].iter().find(|(_, other)| other.intersects(&target)) {
                return Err(SlotError::PositionOccupied {
                    row: target.row,
                    col: target.col.max(earlier.col),
                });
            }
        }

        let mut displaced = Vec::new();
        for &(_, target) in moves {
            for (row, col) in target.cells() {
                let Some(owner) = self.owner_at(row, col) else {
                    continue;
                };
                if self.slot(owner)?.is_merged() {
                    return Err(SlotError::PositionOccupied { row, col });
                }
                self.remove(owner);
                displaced.push(owner);
            }
        }

        for &(id, target) in moves {
            self.attach(id, target);
        }
        Ok((displaced, self.fill_gaps()))
    }
}
