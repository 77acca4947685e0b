use crate::layout::{LayoutChange, LayoutOp};
use crate::logging::{LogEvent, LogFields, LogLevel};
use serde_json::json;

/// Running counters for one editing session.
#[derive(Debug, Default, Clone)]
pub struct EditorMetrics {
    moves: u64,
    swaps: u64,
    expands: u64,
    shrinks: u64,
    resizes: u64,
    noops: u64,
    rejections: u64,
    slots_removed: u64,
    slots_created: u64,
}

impl EditorMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count a committed change; requests that left the layout as it was only
    /// bump `noops`.
    pub fn record_change(&mut self, change: &LayoutChange) {
        if change.noop {
            self.noops = self.noops.saturating_add(1);
            return;
        }
        let counter = match change.op {
            LayoutOp::Move => &mut self.moves,
            LayoutOp::Swap => &mut self.swaps,
            LayoutOp::Expand => &mut self.expands,
            LayoutOp::Shrink => &mut self.shrinks,
            LayoutOp::Resize => &mut self.resizes,
        };
        *counter = counter.saturating_add(1);
        self.slots_removed = self.slots_removed.saturating_add(change.removed.len() as u64);
        self.slots_created = self.slots_created.saturating_add(change.created.len() as u64);
    }

    pub fn record_rejection(&mut self) {
        self.rejections = self.rejections.saturating_add(1);
    }

    pub fn snapshot(&self) -> MetricSnapshot {
        MetricSnapshot {
            commits: self.moves + self.swaps + self.expands + self.shrinks + self.resizes,
            moves: self.moves,
            swaps: self.swaps,
            expands: self.expands,
            shrinks: self.shrinks,
            resizes: self.resizes,
            noops: self.noops,
            rejections: self.rejections,
            slots_removed: self.slots_removed,
            slots_created: self.slots_created,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricSnapshot {
    pub commits: u64,
    pub moves: u64,
    pub swaps: u64,
    pub expands: u64,
    pub shrinks: u64,
    pub resizes: u64,
    pub noops: u64,
    pub rejections: u64,
    pub slots_removed: u64,
    pub slots_created: u64,
}

impl MetricSnapshot {
    pub fn as_fields(&self) -> LogFields {
        let mut map = LogFields::new();
        map.insert("commits".to_string(), json!(self.commits));
        map.insert("moves".to_string(), json!(self.moves));
        map.insert("swaps".to_string(), json!(self.swaps));
        map.insert("expands".to_string(), json!(self.expands));
        map.insert("shrinks".to_string(), json!(self.shrinks));
        map.insert("resizes".to_string(), json!(self.resizes));
        map.insert("noops".to_string(), json!(self.noops));
        map.insert("rejections".to_string(), json!(self.rejections));
        map.insert("slots_removed".to_string(), json!(self.slots_removed));
        map.insert("slots_created".to_string(), json!(self.slots_created));
        map
    }

    pub fn to_log_event(&self, target: &str) -> LogEvent {
        let mut event = LogEvent::new(LogLevel::Info, target, "editor_metrics");
        event.fields = self.as_fields();
        event
    }
}
