use crate::layout::AbsorbPolicy;
use crate::logging::Logger;

pub const DEFAULT_LOG_TARGET: &str = "shelf::editor";

/// Configuration knobs for an editing session.
#[derive(Clone, Debug)]
pub struct EditorConfig {
    /// Optional structured logger; committed and rejected operations are reported to it.
    pub logger: Option<Logger>,
    /// Target field stamped on every emitted event.
    pub log_target: String,
    /// What expand/resize does with a neighbour reaching past the new edge.
    pub absorb_policy: AbsorbPolicy,
    /// Count operations into [`EditorMetrics`](crate::EditorMetrics).
    pub metrics_enabled: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            logger: None,
            log_target: DEFAULT_LOG_TARGET.to_string(),
            absorb_policy: AbsorbPolicy::default(),
            metrics_enabled: true,
        }
    }
}

impl EditorConfig {
    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = Some(logger);
        self
    }

    pub fn with_absorb_policy(mut self, policy: AbsorbPolicy) -> Self {
        self.absorb_policy = policy;
        self
    }

    pub fn with_log_target(mut self, target: impl Into<String>) -> Self {
        self.log_target = target.into();
        self
    }

    pub fn disable_metrics(mut self) -> Self {
        self.metrics_enabled = false;
        self
    }
}
