//! The Resilience Kernel: circuit breaker, retry budget, bulkhead, and
//! graceful drainer, composed behind a single entry point every adapter call
//! goes through in the order drain gate -> bulkhead -> circuit breaker ->
//! (call) -> retry-budget-checked retry.

pub mod bulkhead;
pub mod circuit_breaker;
pub mod drainer;
pub mod retry_budget;

use std::sync::Mutex;

use mockable::Clock;

pub use bulkhead::{Bulkhead, BulkheadFull, OperationClass};
pub use circuit_breaker::{CircuitBreaker, CircuitBreakerConfig, CircuitBreakerState};
pub use drainer::{Drainer, Draining, InFlightGuard};
pub use retry_budget::{RetryBudget, RetryBudgetConfig};

use crate::domain::{Error, ErrorCode};

/// Whether a failed call is eligible for a resilience-kernel-managed retry.
///
/// Only adapter errors classified as transient are retried; validation,
/// not-found, and conflict outcomes are terminal and must never be retried.
pub fn is_retryable(code: ErrorCode) -> bool {
    matches!(code, ErrorCode::ServiceUnavailable)
}

/// One adapter's share of the kernel: its own breaker and retry budget,
/// drawing from the process-wide bulkhead and drainer.
pub struct AdapterResilience {
    name: &'static str,
    class: OperationClass,
    breaker: Mutex<CircuitBreaker>,
    retry_budget: Mutex<RetryBudget>,
}

impl AdapterResilience {
    pub fn new(
        name: &'static str,
        class: OperationClass,
        breaker_config: CircuitBreakerConfig,
        retry_config: RetryBudgetConfig,
        clock: &impl Clock,
    ) -> Self {
        let now = clock.utc();
        Self {
            name,
            class,
            breaker: Mutex::new(CircuitBreaker::new(breaker_config, now)),
            retry_budget: Mutex::new(RetryBudget::new(retry_config, now)),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Current breaker state, for readiness reporting.
    pub fn breaker_state(&self) -> CircuitBreakerState {
        self.breaker
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .state()
    }

    /// Execute `call`, wrapped by drainer admission, the bulkhead, the
    /// circuit breaker, and a retry-budget-checked retry loop on transient
    /// failures. `call` is invoked at most `1 + max_retries` times.
    ///
    /// # Errors
    /// Returns [`ErrorCode::ServiceUnavailable`] if the drainer is draining,
    /// the bulkhead is full, or the breaker is open; otherwise whatever
    /// `call` returns (after exhausting retries, if eligible).
    pub async fn call<T, F, Fut>(
        &self,
        drainer: &Drainer,
        bulkhead: &Bulkhead,
        clock: &impl Clock,
        mut call: F,
    ) -> Result<T, Error>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<T, Error>>,
    {
        let _drain_guard = drainer.enter().map_err(|Draining| {
            Error::service_unavailable(format!("{} is draining", self.name))
        })?;
        let _bulkhead_permit = bulkhead.acquire(self.class).await.map_err(|err| {
            Error::service_unavailable(format!("{} bulkhead is full: {err}", self.name))
        })?;

        loop {
            let now = clock.utc();
            if matches!(
                self.breaker
                    .lock()
                    .unwrap_or_else(std::sync::PoisonError::into_inner)
                    .admit(now),
                circuit_breaker::Admission::Rejected
            ) {
                return Err(Error::service_unavailable(format!(
                    "{} circuit breaker is open",
                    self.name
                )));
            }

            let outcome = call().await;
            let now = clock.utc();
            match &outcome {
                Ok(_) => {
                    self.breaker
                        .lock()
                        .unwrap_or_else(std::sync::PoisonError::into_inner)
                        .record_success(now);
                    return outcome;
                }
                Err(error) => {
                    self.breaker
                        .lock()
                        .unwrap_or_else(std::sync::PoisonError::into_inner)
                        .record_failure(now);

                    if !is_retryable(error.code()) {
                        return outcome;
                    }

                    let mut budget = self
                        .retry_budget
                        .lock()
                        .unwrap_or_else(std::sync::PoisonError::into_inner);
                    if !budget.can_retry(now) {
                        return Err(Error::service_unavailable(format!(
                            "{} retry budget exceeded; original error: {}",
                            self.name,
                            error.message()
                        )));
                    }
                    budget.record_retry(now);
                    drop(budget);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockable::DefaultClock;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn succeeds_on_first_try() {
        let resilience = AdapterResilience::new(
            "test",
            OperationClass::Read,
            CircuitBreakerConfig::DEFAULT,
            RetryBudgetConfig::DEFAULT,
            &DefaultClock,
        );
        let drainer = Drainer::new();
        let bulkhead = Bulkhead::new(4, 4, 4);

        let result: Result<u32, Error> = resilience
            .call(&drainer, &bulkhead, &DefaultClock, || async { Ok(7) })
            .await;
        assert_eq!(result, Ok(7));
    }

    #[tokio::test]
    async fn retries_transient_failures_until_success() {
        let resilience = AdapterResilience::new(
            "test",
            OperationClass::Read,
            CircuitBreakerConfig {
                failure_threshold: 100,
                min_calls: 100,
                ..CircuitBreakerConfig::DEFAULT
            },
            RetryBudgetConfig::DEFAULT,
            &DefaultClock,
        );
        let drainer = Drainer::new();
        let bulkhead = Bulkhead::new(4, 4, 4);
        let attempts = AtomicU32::new(0);

        let result: Result<u32, Error> = resilience
            .call(&drainer, &bulkhead, &DefaultClock, || {
                let attempt = attempts.fetch_add(1, Ordering::SeqCst);
                async move {
                    if attempt < 2 {
                        Err(Error::service_unavailable("transient"))
                    } else {
                        Ok(99)
                    }
                }
            })
            .await;
        assert_eq!(result, Ok(99));
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn never_retries_non_transient_errors() {
        let resilience = AdapterResilience::new(
            "test",
            OperationClass::Write,
            CircuitBreakerConfig::DEFAULT,
            RetryBudgetConfig::DEFAULT,
            &DefaultClock,
        );
        let drainer = Drainer::new();
        let bulkhead = Bulkhead::new(4, 4, 4);
        let attempts = AtomicU32::new(0);

        let result: Result<u32, Error> = resilience
            .call(&drainer, &bulkhead, &DefaultClock, || {
                attempts.fetch_add(1, Ordering::SeqCst);
                async { Err(Error::conflict("url mismatch")) }
            })
            .await;
        assert!(result.is_err());
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn draining_rejects_before_calling() {
        let resilience = AdapterResilience::new(
            "test",
            OperationClass::Read,
            CircuitBreakerConfig::DEFAULT,
            RetryBudgetConfig::DEFAULT,
            &DefaultClock,
        );
        let drainer = Drainer::new();
        drainer.start_draining();
        let bulkhead = Bulkhead::new(4, 4, 4);

        let result: Result<u32, Error> = resilience
            .call(&drainer, &bulkhead, &DefaultClock, || async {
                panic!("must not be called while draining")
            })
            .await;
        assert_eq!(result.unwrap_err().code(), ErrorCode::ServiceUnavailable);
    }
}
