//! Hook invocation configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Settings applied by callers when they build a hook invocation context.
///
/// The hook registry itself never enforces a deadline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HooksConfig {
    /// Deadline attached to each invocation context, in milliseconds.
    /// `0` disables the deadline.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl HooksConfig {
    /// Returns the configured deadline, if any.
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_ms > 0).then(|| Duration::from_millis(self.timeout_ms))
    }
}

impl Default for HooksConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
        }
    }
}

fn default_timeout_ms() -> u64 {
    5_000
}
