//! Three-state circuit breaker shared by every outbound adapter.
//!
//! Adapter-agnostic policy logic only; callers own locking and clock access.

use std::time::Duration;

use chrono::{DateTime, Utc};

/// Per-adapter circuit breaker tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CircuitBreakerConfig {
    /// Width of the sliding window used to count failures.
    pub window: Duration,
    /// Failures within the window required to trip the breaker.
    pub failure_threshold: u32,
    /// Calls within the window required before the threshold can trip it,
    /// so a handful of early failures cannot open the breaker prematurely.
    pub min_calls: u32,
    /// Cooldown an open breaker waits before allowing a half-open probe.
    pub timeout: Duration,
}

impl CircuitBreakerConfig {
    /// Defaults per `spec.md` §4.5: window 60s, threshold 5, timeout 60s,
    /// min_calls 10.
    pub const DEFAULT: Self = Self {
        window: Duration::from_secs(60),
        failure_threshold: 5,
        min_calls: 10,
        timeout: Duration::from_secs(60),
    };

    /// The cache adapter tolerates a higher failure threshold: cache misses
    /// degrade to the record store rather than failing the request.
    pub const CACHE: Self = Self {
        failure_threshold: 20,
        min_calls: 20,
        ..Self::DEFAULT
    };
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Observable breaker state, exposed for readiness reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircuitBreakerState {
    Closed,
    Open,
    HalfOpen,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Internal {
    Closed {
        window_start: DateTime<Utc>,
        total_calls: u32,
        failures: u32,
    },
    Open {
        opened_at: DateTime<Utc>,
    },
    HalfOpen,
}

/// Whether a call may proceed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    Allowed,
    Rejected,
}

/// A circuit breaker for a single adapter.
///
/// Not internally synchronized: callers hold this behind a `Mutex` (or
/// equivalent) and must never call an adapter while holding that lock, per
/// the shared-resource discipline in `spec.md` §5.
#[derive(Debug, Clone)]
pub struct CircuitBreaker {
    config: CircuitBreakerConfig,
    state: Internal,
}

impl CircuitBreaker {
    pub fn new(config: CircuitBreakerConfig, now: DateTime<Utc>) -> Self {
        Self {
            config,
            state: Internal::Closed {
                window_start: now,
                total_calls: 0,
                failures: 0,
            },
        }
    }

    /// Decide whether a call may proceed, transitioning `open -> half_open`
    /// when the timeout has elapsed.
    pub fn admit(&mut self, now: DateTime<Utc>) -> Admission {
        match self.state {
            Internal::Closed { .. } => Admission::Allowed,
            Internal::Open { opened_at } => {
                if elapsed_at_least(opened_at, now, self.config.timeout) {
                    self.state = Internal::HalfOpen;
                    Admission::Allowed
                } else {
                    Admission::Rejected
                }
            }
            Internal::HalfOpen => Admission::Rejected,
        }
    }

    /// Record a successful call.
    pub fn record_success(&mut self, now: DateTime<Utc>) {
        self.state = Internal::Closed {
            window_start: now,
            total_calls: 0,
            failures: 0,
        };
    }

    /// Record a failed call, tripping the breaker once the window's failure
    /// count and call count both clear their thresholds.
    pub fn record_failure(&mut self, now: DateTime<Utc>) {
        self.state = match self.state {
            Internal::Closed {
                window_start,
                total_calls,
                failures,
            } => {
                let (window_start, total_calls, failures) =
                    if elapsed_at_least(window_start, now, self.config.window) {
                        (now, 0, 0)
                    } else {
                        (window_start, total_calls, failures)
                    };
                let total_calls = total_calls.saturating_add(1);
                let failures = failures.saturating_add(1);
                if failures >= self.config.failure_threshold && total_calls >= self.config.min_calls
                {
                    Internal::Open { opened_at: now }
                } else {
                    Internal::Closed {
                        window_start,
                        total_calls,
                        failures,
                    }
                }
            }
            Internal::HalfOpen | Internal::Open { .. } => Internal::Open { opened_at: now },
        };
    }

    pub fn state(&self) -> CircuitBreakerState {
        match self.state {
            Internal::Closed { .. } => CircuitBreakerState::Closed,
            Internal::Open { .. } => CircuitBreakerState::Open,
            Internal::HalfOpen => CircuitBreakerState::HalfOpen,
        }
    }
}

fn elapsed_at_least(start: DateTime<Utc>, now: DateTime<Utc>, duration: Duration) -> bool {
    let Ok(duration) = chrono::Duration::from_std(duration) else {
        return true;
    };
    now >= start + duration
}
