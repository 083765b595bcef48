//! Per-call completion settings and the shared timeout budget.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::time::Instant;

use crate::error::{A2AError, A2AResult};
use crate::utils::constants::{DEFAULT_POLL_INTERVAL_MS, DEFAULT_TOTAL_TIMEOUT_MS};

/// How long a single send may take end to end, and how often a task is
/// re-queried while it is still running.
///
/// Serialized as `{"totalTimeoutMs": 60000, "pollIntervalMs": 500}`;
/// `pollIntervalMs` may be omitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionSettings {
    /// Budget shared by the first-response wait and the polling phase.
    #[serde(rename = "totalTimeoutMs", with = "duration_ms")]
    pub total_timeout: Duration,

    /// Delay between two `tasks/get` queries.
    #[serde(
        rename = "pollIntervalMs",
        with = "duration_ms",
        default = "default_poll_interval"
    )]
    pub poll_interval: Duration,
}

fn default_poll_interval() -> Duration {
    Duration::from_millis(DEFAULT_POLL_INTERVAL_MS)
}

impl Default for CompletionSettings {
    fn default() -> Self {
        Self {
            total_timeout: Duration::from_millis(DEFAULT_TOTAL_TIMEOUT_MS),
            poll_interval: default_poll_interval(),
        }
    }
}

impl CompletionSettings {
    /// Build validated settings.
    ///
    /// # Errors
    ///
    /// Returns [`A2AError::Configuration`] if either duration is zero.
    pub fn new(total_timeout: Duration, poll_interval: Duration) -> A2AResult<Self> {
        let settings = Self {
            total_timeout,
            poll_interval,
        };
        settings.validate()?;
        Ok(settings)
    }

    /// Settings with the given total timeout and the default poll interval.
    pub fn with_total_timeout(total_timeout: Duration) -> A2AResult<Self> {
        Self::new(total_timeout, default_poll_interval())
    }

    /// Check both durations are strictly positive.
    pub fn validate(&self) -> A2AResult<()> {
        if self.total_timeout.is_zero() {
            return Err(A2AError::configuration("total timeout must be positive"));
        }
        if self.poll_interval.is_zero() {
            return Err(A2AError::configuration("poll interval must be positive"));
        }
        Ok(())
    }
}

/// Tracks how much of the total timeout is left since a fixed start instant.
#[derive(Debug, Clone, Copy)]
pub struct TimeoutBudget {
    started: Instant,
    total: Duration,
}

impl TimeoutBudget {
    /// Start a budget of `total` at `started`.
    pub fn start(started: Instant, total: Duration) -> Self {
        Self { started, total }
    }

    /// The instant the budget started.
    pub fn started(&self) -> Instant {
        self.started
    }

    /// Time consumed as of `now`.
    pub fn elapsed(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.started)
    }

    /// Time left as of `now`, or `None` once the budget is spent.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.total
            .checked_sub(self.elapsed(now))
            .filter(|left| !left.is_zero())
    }
}

pub(crate) fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

mod duration_ms {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(super::millis(*value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
