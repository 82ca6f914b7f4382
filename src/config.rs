//! Bus configuration.
//!
//! Loaded once at composition time, either from defaults or from a TOML
//! document such as:
//!
//! ```toml
//! inbox_capacity = 256
//! poll_interval_ms = 16
//! deferred_warn_threshold = 512
//! blocking_timeout_ms = 2000
//! ```

use crate::error::BusError;
use serde::Deserialize;
use std::time::Duration;

/// Configuration shared by the commutator and consumer threads.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BusConfig {
    /// Inbox capacity per thread. `None` means unbounded.
    pub inbox_capacity: Option<usize>,
    /// How long a consumer thread waits on its inbox before re-checking shutdown.
    pub poll_interval_ms: u64,
    /// Log a warning once this many GL-dependent messages are waiting for a context.
    pub deferred_warn_threshold: usize,
    /// Upper bound for `post_blocking` waits. `None` waits forever.
    pub blocking_timeout_ms: Option<u64>,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            inbox_capacity: None,
            poll_interval_ms: 16,
            deferred_warn_threshold: 1024,
            blocking_timeout_ms: None,
        }
    }
}

impl BusConfig {
    /// Parse a configuration from TOML. Missing keys take their defaults.
    pub fn from_toml_str(source: &str) -> Result<Self, BusError> {
        Ok(toml::from_str(source)?)
    }

    /// Consumer poll interval.
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Configured blocking timeout, if any.
    pub fn blocking_timeout(&self) -> Option<Duration> {
        self.blocking_timeout_ms.map(Duration::from_millis)
    }
}
