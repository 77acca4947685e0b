//! Pointer gesture lifecycle for the slot editor.
//!
//! ```text
//! Idle -> PendingDrag -> Idle            (drop yields Move / Swap / nothing)
//! Idle -> PendingResize -> ResizingLive -> Idle   (release yields Resize)
//!                \______________\_______-> Idle   (cancel, no gesture)
//! ```
//!
//! The machine only tracks preview state. It never touches the registry;
//! gestures it yields are committed through [`ShelfEditor::apply`](super::ShelfEditor::apply).

use crate::error::Result;
use crate::registry::{SlotId, SlotRegistry};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InteractionState {
    #[default]
    Idle,
    PendingDrag {
        slot: SlotId,
    },
    PendingResize {
        slot: SlotId,
        span: u16,
        max_span: u16,
    },
    ResizingLive {
        slot: SlotId,
        span: u16,
        max_span: u16,
        preview: u16,
    },
}

/// Where a dragged slot was released.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropTarget {
    Cell { row: u16, col: u16 },
    Slot(SlotId),
}

/// Committable outcome of a finished gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gesture {
    Move { slot: SlotId, row: u16, col: u16 },
    Swap { a: SlotId, b: SlotId },
    Resize { slot: SlotId, span: u16 },
}

#[derive(Debug, Clone, Default)]
pub struct SlotInteraction {
    state: InteractionState,
}

impl SlotInteraction {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> InteractionState {
        self.state
    }

    pub fn is_idle(&self) -> bool {
        self.state == InteractionState::Idle
    }

    /// Start dragging `slot`. Ignored unless idle.
    pub fn begin_drag(&mut self, slot: SlotId) -> bool {
        if !self.is_idle() {
            return false;
        }
        self.state = InteractionState::PendingDrag { slot };
        true
    }

    /// Finish a drag. Dropping on an empty cell moves, on another slot swaps.
    pub fn drop_on(&mut self, target: DropTarget) -> Option<Gesture> {
        let InteractionState::PendingDrag { slot } = self.state else {
            return None;
        };
        self.state = InteractionState::Idle;
        match target {
            DropTarget::Cell { row, col } => Some(Gesture::Move { slot, row, col }),
            DropTarget::Slot(other) if other != slot => Some(Gesture::Swap { a: slot, b: other }),
            DropTarget::Slot(_) => None,
        }
    }

    /// Grab the resize handle of `slot`. Ignored unless idle.
    pub fn begin_resize(&mut self, registry: &SlotRegistry, slot: SlotId) -> Result<bool> {
        let span = registry.slot(slot)?.span();
        let max_span = registry.max_span(slot)?;
        if !self.is_idle() {
            return Ok(false);
        }
        self.state = InteractionState::PendingResize { slot, span, max_span };
        Ok(true)
    }

    /// Track the pointer; returns the clamped preview span.
    pub fn update_resize(&mut self, requested: u16) -> Option<u16> {
        let (slot, original, max_span) = match self.state {
            InteractionState::PendingResize { slot, span, max_span }
            | InteractionState::ResizingLive { slot, span, max_span, .. } => (slot, span, max_span),
            _ => return None,
        };
        let preview = requested.clamp(1, max_span);
        self.state = InteractionState::ResizingLive {
            slot,
            span: original,
            max_span,
            preview,
        };
        Some(preview)
    }

    pub fn preview(&self) -> Option<(SlotId, u16)> {
        match self.state {
            InteractionState::ResizingLive { slot, preview, .. } => Some((slot, preview)),
            _ => None,
        }
    }

    /// Release the resize handle. Yields a gesture only if the span changed.
    pub fn release(&mut self) -> Option<Gesture> {
        let state = std::mem::take(&mut self.state);
        match state {
            InteractionState::ResizingLive { slot, span, preview, .. } if preview != span => {
                Some(Gesture::Resize { slot, span: preview })
            }
            InteractionState::PendingDrag { .. } => {
                self.state = state;
                None
            }
            _ => None,
        }
    }

    /// Abandon whatever is in flight.
    pub fn cancel(&mut self) {
        self.state = InteractionState::Idle;
    }
}
