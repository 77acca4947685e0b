//! Editing session over one shelf.
//!
//! `ShelfEditor` owns the working registry for a single shelf and is the
//! surface an interaction layer drives: it forwards to the layout operations,
//! reports outcomes to the configured logger and metrics, and tracks whether
//! the layout differs from what was last saved.

mod config;
pub mod interaction;

pub use config::{DEFAULT_LOG_TARGET, EditorConfig};
pub use interaction::{DropTarget, Gesture, InteractionState, SlotInteraction};

use serde_json::Value;

use crate::codec::MergedSlot;
use crate::error::{Result, ShelfResult};
use crate::grid::GridModel;
use crate::layout::{LayoutChange, LayoutOp};
use crate::logging::{LogLevel, event_with_fields, json_kv};
use crate::metrics::{EditorMetrics, MetricSnapshot};
use crate::registry::{SlotId, SlotRegistry};
use crate::shelf::ShelfConfig;

pub struct ShelfEditor {
    registry: SlotRegistry,
    config: EditorConfig,
    metrics: EditorMetrics,
    saved: blake3::Hash,
}

impl ShelfEditor {
    pub fn new(grid: GridModel, merges: &[MergedSlot], config: EditorConfig) -> Result<Self> {
        let registry = SlotRegistry::initialize(grid, merges)?;
        Ok(Self::with_registry(registry, config))
    }

    pub fn from_shelf(shelf: &ShelfConfig, config: EditorConfig) -> ShelfResult<Self> {
        let editor = Self::with_registry(shelf.decode()?, config);
        editor.log(
            LogLevel::Debug,
            "shelf_loaded",
            [
                json_kv("shelf", shelf.id.as_str()),
                json_kv("slots", editor.registry.len()),
                json_kv("merges", shelf.merged_slots.len()),
            ],
        );
        Ok(editor)
    }

    /// Take over an existing registry; its current layout counts as saved.
    pub fn with_registry(mut registry: SlotRegistry, config: EditorConfig) -> Self {
        registry.set_absorb_policy(config.absorb_policy);
        let saved = registry.fingerprint();
        Self {
            registry,
            config,
            metrics: EditorMetrics::new(),
            saved,
        }
    }

    pub fn registry(&self) -> &SlotRegistry {
        &self.registry
    }

    pub fn into_registry(self) -> SlotRegistry {
        self.registry
    }

    pub fn grid(&self) -> &GridModel {
        self.registry.grid()
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn merged_slots(&self) -> Vec<MergedSlot> {
        self.registry.merged_slots()
    }

    pub fn label(&self, id: SlotId) -> Option<String> {
        let slot = self.registry.get(id)?;
        Some(self.grid().label(slot.slot_num(), slot.span()))
    }

    /// True when the compact form differs from the last saved one.
    pub fn is_dirty(&self) -> bool {
        self.registry.fingerprint() != self.saved
    }

    pub fn mark_saved(&mut self) {
        self.saved = self.registry.fingerprint();
    }

    /// Write the current layout into a copy of `shelf` and mark it saved.
    pub fn save_into(&mut self, shelf: &ShelfConfig) -> ShelfConfig {
        let saved = shelf.encode(&self.registry);
        self.mark_saved();
        self.log(
            LogLevel::Debug,
            "shelf_encoded",
            [
                json_kv("shelf", saved.id.as_str()),
                json_kv("merges", saved.merged_slots.len()),
            ],
        );
        saved
    }

    pub fn move_slot(&mut self, id: SlotId, row: u16, col: u16) -> Result<LayoutChange> {
        let result = self.registry.move_slot(id, row, col);
        self.observe(LayoutOp::Move, id, result)
    }

    pub fn swap_slots(&mut self, a: SlotId, b: SlotId) -> Result<LayoutChange> {
        let result = self.registry.swap_slots(a, b);
        self.observe(LayoutOp::Swap, a, result)
    }

    pub fn expand_slot(&mut self, id: SlotId) -> Result<LayoutChange> {
        let result = self.registry.expand_slot(id);
        self.observe(LayoutOp::Expand, id, result)
    }

    pub fn shrink_slot(&mut self, id: SlotId) -> Result<LayoutChange> {
        let result = self.registry.shrink_slot(id);
        self.observe(LayoutOp::Shrink, id, result)
    }

    pub fn resize(&mut self, id: SlotId, span: u16) -> Result<LayoutChange> {
        let result = self.registry.resize(id, span);
        self.observe(LayoutOp::Resize, id, result)
    }

    /// Commit a gesture produced by [`SlotInteraction`].
    pub fn apply(&mut self, gesture: Gesture) -> Result<LayoutChange> {
        match gesture {
            Gesture::Move { slot, row, col } => self.move_slot(slot, row, col),
            Gesture::Swap { a, b } => self.swap_slots(a, b),
            Gesture::Resize { slot, span } => self.resize(slot, span),
        }
    }

    pub fn metrics(&self) -> MetricSnapshot {
        self.metrics.snapshot()
    }

    pub fn emit_metrics(&self) {
        if let Some(logger) = self.config.logger.as_ref() {
            let event = self.metrics.snapshot().to_log_event(&self.config.log_target);
            let _ = logger.log_event(event);
        }
    }

    fn observe(&mut self, op: LayoutOp, id: SlotId, result: Result<LayoutChange>) -> Result<LayoutChange> {
        match &result {
            Ok(change) if change.noop => {
                if self.config.metrics_enabled {
                    self.metrics.record_change(change);
                }
                self.log(
                    LogLevel::Debug,
                    "operation_noop",
                    [json_kv("op", op.as_str()), json_kv("slot", id.to_string())],
                );
            }
            Ok(change) => {
                if self.config.metrics_enabled {
                    self.metrics.record_change(change);
                }
                let label = self.label(change.slot).unwrap_or_default();
                let mut fields = vec![
                    json_kv("slot", change.slot.to_string()),
                    json_kv("label", label),
                    json_kv("removed", change.removed.len()),
                    json_kv("created", change.created.len()),
                ];
                if let Some(other) = change.other {
                    fields.push(json_kv("other", other.to_string()));
                }
                self.log(LogLevel::Info, committed_message(op), fields);
            }
            Err(err) => {
                if self.config.metrics_enabled {
                    self.metrics.record_rejection();
                }
                self.log(
                    LogLevel::Warn,
                    "operation_rejected",
                    [
                        json_kv("op", op.as_str()),
                        json_kv("slot", id.to_string()),
                        json_kv("error", err.to_string()),
                    ],
                );
            }
        }
        result
    }

    fn log(&self, level: LogLevel, message: &str, fields: impl IntoIterator<Item = (String, Value)>) {
        if let Some(logger) = self.config.logger.as_ref() {
            let event = event_with_fields(level, &self.config.log_target, message, fields);
            let _ = logger.log_event(event);
        }
    }
}

fn committed_message(op: LayoutOp) -> &'static str {
    match op {
        LayoutOp::Move => "slot_moved",
        LayoutOp::Swap => "slots_swapped",
        LayoutOp::Expand => "slot_expanded",
        LayoutOp::Shrink => "slot_shrunk",
        LayoutOp::Resize => "slot_resized",
    }
}
