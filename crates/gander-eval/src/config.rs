//! Engine configuration.
//!
//! Configuration specifies limits only; the machine enforces them.

/// Default maximum number of outstanding user-defined calls.
pub const DEFAULT_MAX_CALL_DEPTH: usize = 256;

/// Execution limits for a [`Machine`](crate::Machine).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Maximum call-stack depth (recursion limit).
    pub max_call_depth: usize,

    /// Maximum number of executed instructions; `None` runs to completion.
    pub step_limit: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
            step_limit: None,
        }
    }
}

impl EngineConfig {
    /// Create a configuration with default limits.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_call_depth(mut self, depth: usize) -> Self {
        self.max_call_depth = depth;
        self
    }

    pub fn with_step_limit(mut self, steps: u64) -> Self {
        self.step_limit = Some(steps);
        self
    }
}
