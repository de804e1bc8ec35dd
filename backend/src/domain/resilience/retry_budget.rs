//! Sliding-window retry budget shared by all callers of a given adapter.

use std::time::Duration;

use chrono::{DateTime, Utc};

/// Tuning for a retry budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryBudgetConfig {
    pub window: Duration,
    pub max_retries: u32,
}

impl RetryBudgetConfig {
    pub const DEFAULT: Self = Self {
        window: Duration::from_secs(60),
        max_retries: 10,
    };
}

impl Default for RetryBudgetConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Tracks retry attempts within a rolling window, approximated as a
/// fixed window that resets once it elapses (consistent with the circuit
/// breaker's window semantics).
#[derive(Debug, Clone)]
pub struct RetryBudget {
    config: RetryBudgetConfig,
    window_start: DateTime<Utc>,
    retries_used: u32,
}

impl RetryBudget {
    pub fn new(config: RetryBudgetConfig, now: DateTime<Utc>) -> Self {
        Self {
            config,
            window_start: now,
            retries_used: 0,
        }
    }

    fn reset_if_elapsed(&mut self, now: DateTime<Utc>) {
        let Ok(window) = chrono::Duration::from_std(self.config.window) else {
            return;
        };
        if now >= self.window_start + window {
            self.window_start = now;
            self.retries_used = 0;
        }
    }

    /// Whether another retry attempt is permitted right now.
    pub fn can_retry(&mut self, now: DateTime<Utc>) -> bool {
        self.reset_if_elapsed(now);
        self.retries_used < self.config.max_retries
    }

    /// Record that a retry attempt was made.
    pub fn record_retry(&mut self, now: DateTime<Utc>) {
        self.reset_if_elapsed(now);
        self.retries_used = self.retries_used.saturating_add(1);
    }
}
