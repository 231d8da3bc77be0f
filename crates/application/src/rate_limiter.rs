//! Fixed-window attempt counting against per-dimension ceilings.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

use bruteguard_core::{AppError, AppResult};

use crate::store::CounterStore;

/// Outcome of a successful counter update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateCheck {
    /// Post-increment attempt count for the key.
    pub count: i64,
    /// Whether the count is still at or under the ceiling. The ceiling-th
    /// attempt is allowed; the one after it is denied.
    pub allowed: bool,
}

/// Faults a counter update can hit. The two variants let callers tell
/// "not counted at all" apart from "counted, but the window TTL is missing".
#[derive(Debug, Error)]
pub enum RateCheckFault {
    /// The increment itself failed; nothing was recorded.
    #[error("counter increment failed: {0}")]
    StoreUnavailable(AppError),

    /// The increment succeeded but setting the window TTL did not. The
    /// recorded count stays in place; there is no compensating decrement.
    #[error("counter recorded at {count} but window expiry was not set: {source}")]
    ExpiryNotSet {
        /// Post-increment count that was durably recorded.
        count: i64,
        /// Underlying store error from the expiry call.
        source: AppError,
    },
}

impl From<RateCheckFault> for AppError {
    fn from(fault: RateCheckFault) -> Self {
        match fault {
            RateCheckFault::StoreUnavailable(error) => error,
            RateCheckFault::ExpiryNotSet { count, source } => Self::Store(format!(
                "attempt counted ({count}) but expiry was not set: {source}"
            )),
        }
    }
}

/// Fixed-window rate limiter over the counter store.
#[derive(Clone)]
pub struct RateLimiter {
    store: Arc<dyn CounterStore>,
    window: Duration,
}

impl RateLimiter {
    /// Creates a limiter with the given counter window.
    #[must_use]
    pub fn new(store: Arc<dyn CounterStore>, window: Duration) -> Self {
        Self { store, window }
    }

    /// Counts one attempt against `key` and compares it to `ceiling`.
    ///
    /// Every call increments the counter, denied attempts included. The
    /// window TTL is set only when this call created the counter (the
    /// store reported a post-increment value of 1) and is never extended
    /// afterwards.
    pub async fn check_and_increment(
        &self,
        key: &str,
        ceiling: i64,
    ) -> Result<RateCheck, RateCheckFault> {
        let count = self
            .store
            .increment(key)
            .await
            .map_err(RateCheckFault::StoreUnavailable)?;

        if count == 1 {
            if let Err(source) = self.store.set_expiry(key, self.window).await {
                return Err(RateCheckFault::ExpiryNotSet { count, source });
            }
        }

        tracing::debug!(key, count, ceiling, "attempt counted");

        Ok(RateCheck {
            count,
            allowed: count <= ceiling,
        })
    }

    /// Deletes the named counters, starting a fresh window for each key.
    /// Absent keys are ignored.
    pub async fn reset(&self, keys: &[String]) -> AppResult<()> {
        self.store.delete(keys).await
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;
    use tokio::sync::Mutex;

    use bruteguard_core::{AppError, AppResult};

    use crate::store::CounterStore;

    use super::{RateCheckFault, RateLimiter};

    #[derive(Default)]
    struct FakeCounterStore {
        counters: Mutex<HashMap<String, i64>>,
        expiries: Mutex<HashMap<String, Duration>>,
        fail_increment: bool,
        fail_expiry: bool,
    }

    #[async_trait]
    impl CounterStore for FakeCounterStore {
        async fn increment(&self, key: &str) -> AppResult<i64> {
            if self.fail_increment {
                return Err(AppError::Store("increment unavailable".to_owned()));
            }

            let mut counters = self.counters.lock().await;
            let count = counters.entry(key.to_owned()).or_insert(0);
            *count += 1;
            Ok(*count)
        }

        async fn set_expiry(&self, key: &str, window: Duration) -> AppResult<()> {
            if self.fail_expiry {
                return Err(AppError::Store("expiry unavailable".to_owned()));
            }

            self.expiries.lock().await.insert(key.to_owned(), window);
            Ok(())
        }

        async fn members(&self, _set_name: &str) -> AppResult<Vec<String>> {
            Ok(Vec::new())
        }

        async fn add_member(&self, _set_name: &str, _value: &str) -> AppResult<()> {
            Ok(())
        }

        async fn remove_member(&self, _set_name: &str, _value: &str) -> AppResult<()> {
            Ok(())
        }

        async fn delete(&self, keys: &[String]) -> AppResult<()> {
            let mut counters = self.counters.lock().await;
            for key in keys {
                counters.remove(key);
            }
            Ok(())
        }
    }

    fn limiter_with(store: Arc<FakeCounterStore>) -> RateLimiter {
        RateLimiter::new(store, Duration::from_secs(60))
    }

    #[tokio::test]
    async fn allows_up_to_ceiling_then_denies() {
        let store = Arc::new(FakeCounterStore::default());
        let limiter = limiter_with(store);

        for attempt in 1..=3 {
            let check = limiter
                .check_and_increment("login:alice", 3)
                .await
                .unwrap_or_else(|fault| panic!("attempt {attempt} faulted: {fault}"));
            assert!(check.allowed, "attempt {attempt} should be allowed");
        }

        let denied = limiter
            .check_and_increment("login:alice", 3)
            .await
            .unwrap_or_else(|fault| panic!("denied attempt faulted: {fault}"));
        assert!(!denied.allowed);
        assert_eq!(denied.count, 4);
    }

    #[tokio::test]
    async fn denied_attempts_keep_counting() {
        let store = Arc::new(FakeCounterStore::default());
        let limiter = limiter_with(store.clone());

        for _ in 0..5 {
            let _ = limiter.check_and_increment("login:alice", 1).await;
        }

        let counters = store.counters.lock().await;
        assert_eq!(counters.get("login:alice"), Some(&5));
    }

    #[tokio::test]
    async fn expiry_set_only_on_creation() {
        let store = Arc::new(FakeCounterStore::default());
        let limiter = limiter_with(store.clone());

        for _ in 0..3 {
            let _ = limiter.check_and_increment("address:10.0.0.1", 10).await;
        }

        let expiries = store.expiries.lock().await;
        assert_eq!(
            expiries.get("address:10.0.0.1"),
            Some(&Duration::from_secs(60))
        );
        assert_eq!(expiries.len(), 1);
    }

    #[tokio::test]
    async fn increment_failure_is_store_unavailable() {
        let store = Arc::new(FakeCounterStore {
            fail_increment: true,
            ..FakeCounterStore::default()
        });
        let limiter = limiter_with(store);

        let fault = limiter.check_and_increment("login:alice", 3).await;
        assert!(matches!(fault, Err(RateCheckFault::StoreUnavailable(_))));
    }

    #[tokio::test]
    async fn expiry_failure_keeps_the_recorded_count() {
        let store = Arc::new(FakeCounterStore {
            fail_expiry: true,
            ..FakeCounterStore::default()
        });
        let limiter = limiter_with(store.clone());

        let fault = limiter.check_and_increment("login:alice", 3).await;
        match fault {
            Err(RateCheckFault::ExpiryNotSet { count, .. }) => assert_eq!(count, 1),
            other => panic!("expected ExpiryNotSet, got {other:?}"),
        }

        let counters = store.counters.lock().await;
        assert_eq!(counters.get("login:alice"), Some(&1));
    }

    #[tokio::test]
    async fn reset_restores_fresh_key_behavior() {
        let store = Arc::new(FakeCounterStore::default());
        let limiter = limiter_with(store);

        for _ in 0..4 {
            let _ = limiter.check_and_increment("login:alice", 3).await;
        }

        limiter
            .reset(&["login:alice".to_owned()])
            .await
            .unwrap_or_else(|error| panic!("reset failed: {error}"));

        let check = limiter
            .check_and_increment("login:alice", 3)
            .await
            .unwrap_or_else(|fault| panic!("post-reset attempt faulted: {fault}"));
        assert!(check.allowed);
        assert_eq!(check.count, 1);
    }

    #[tokio::test]
    async fn reset_of_absent_keys_is_ok() {
        let store = Arc::new(FakeCounterStore::default());
        let limiter = limiter_with(store);

        let result = limiter.reset(&["login:nobody".to_owned()]).await;
        assert!(result.is_ok());
    }
}
