//! Runtime configuration

use crate::error::{Result, RuntimeError};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default wait when the mailbox is empty
pub const DEFAULT_IDLE_INTERVAL_MS: u64 = 10;

/// Longest accepted idle wait. A stopped loop only notices `stop()` once its
/// wait ends, and a restarted loop waits for it.
pub const MAX_IDLE_INTERVAL_MS: u64 = 60_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Upper bound on how long the dispatch loop waits on an empty mailbox
    /// before re-checking its running state. Zero means yield to the
    /// scheduler and poll again.
    pub idle_interval_ms: u64,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            idle_interval_ms: DEFAULT_IDLE_INTERVAL_MS,
        }
    }
}

impl RuntimeConfig {
    pub fn with_idle_interval(idle: Duration) -> Self {
        Self {
            idle_interval_ms: idle.as_millis() as u64,
        }
    }

    pub fn idle_interval(&self) -> Duration {
        Duration::from_millis(self.idle_interval_ms)
    }

    pub fn validate(&self) -> Result<()> {
        if self.idle_interval_ms > MAX_IDLE_INTERVAL_MS {
            return Err(RuntimeError::configuration(
                format!("idle interval must be at most {}ms", MAX_IDLE_INTERVAL_MS),
                Some("idle_interval_ms"),
            ));
        }
        Ok(())
    }
}
