//! In-memory counter/set store for deterministic tests and local runs.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::Mutex;

use bruteguard_application::CounterStore;
use bruteguard_core::{AppError, AppResult};

#[derive(Debug, Clone, Copy)]
struct CounterEntry {
    count: i64,
    expires_at: Option<Instant>,
}

impl CounterEntry {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|deadline| deadline <= now)
    }
}

/// In-memory adapter for the counter store port.
///
/// Expiry is evaluated lazily on access, which matches the observable
/// behavior of TTL eviction in the real store. `induce_fault` flips every
/// operation into a store error so callers' fault paths can be exercised.
#[derive(Default)]
pub struct InMemoryCounterStore {
    counters: Mutex<HashMap<String, CounterEntry>>,
    sets: Mutex<HashMap<String, HashSet<String>>>,
    faulted: AtomicBool,
}

impl InMemoryCounterStore {
    /// Creates an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent operation fail with a store error.
    pub fn induce_fault(&self, faulted: bool) {
        self.faulted.store(faulted, Ordering::SeqCst);
    }

    fn check_fault(&self) -> AppResult<()> {
        if self.faulted.load(Ordering::SeqCst) {
            return Err(AppError::Store("in-memory store fault induced".to_owned()));
        }
        Ok(())
    }
}

#[async_trait]
impl CounterStore for InMemoryCounterStore {
    async fn increment(&self, key: &str) -> AppResult<i64> {
        self.check_fault()?;

        let now = Instant::now();
        let mut counters = self.counters.lock().await;
        let entry = counters
            .entry(key.to_owned())
            .and_modify(|entry| {
                if entry.is_expired(now) {
                    entry.count = 0;
                    entry.expires_at = None;
                }
            })
            .or_insert(CounterEntry {
                count: 0,
                expires_at: None,
            });

        entry.count += 1;
        Ok(entry.count)
    }

    async fn set_expiry(&self, key: &str, window: Duration) -> AppResult<()> {
        self.check_fault()?;

        let mut counters = self.counters.lock().await;
        if let Some(entry) = counters.get_mut(key) {
            entry.expires_at = Instant::now().checked_add(window);
        }

        Ok(())
    }

    async fn members(&self, set_name: &str) -> AppResult<Vec<String>> {
        self.check_fault()?;

        let sets = self.sets.lock().await;
        Ok(sets
            .get(set_name)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default())
    }

    async fn add_member(&self, set_name: &str, value: &str) -> AppResult<()> {
        self.check_fault()?;

        let mut sets = self.sets.lock().await;
        sets.entry(set_name.to_owned())
            .or_default()
            .insert(value.to_owned());

        Ok(())
    }

    async fn remove_member(&self, set_name: &str, value: &str) -> AppResult<()> {
        self.check_fault()?;

        let mut sets = self.sets.lock().await;
        if let Some(set) = sets.get_mut(set_name) {
            set.remove(value);
        }

        Ok(())
    }

    async fn delete(&self, keys: &[String]) -> AppResult<()> {
        self.check_fault()?;

        let mut counters = self.counters.lock().await;
        for key in keys {
            counters.remove(key);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use bruteguard_application::CounterStore;

    use super::InMemoryCounterStore;

    #[tokio::test]
    async fn increments_are_sequential_per_key() {
        let store = InMemoryCounterStore::new();

        for expected in 1..=5 {
            let count = store
                .increment("login:alice")
                .await
                .unwrap_or_else(|error| panic!("increment failed: {error}"));
            assert_eq!(count, expected);
        }

        let other = store
            .increment("address:10.0.0.1")
            .await
            .unwrap_or_else(|error| panic!("increment failed: {error}"));
        assert_eq!(other, 1, "counters are independent per key");
    }

    #[tokio::test]
    async fn concurrent_increments_lose_no_updates() {
        let store = Arc::new(InMemoryCounterStore::new());
        let mut handles = Vec::new();

        for _ in 0..64 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store.increment("login:alice").await
            }));
        }

        for handle in handles {
            let result = handle
                .await
                .unwrap_or_else(|error| panic!("task panicked: {error}"));
            assert!(result.is_ok());
        }

        let final_count = store
            .increment("login:alice")
            .await
            .unwrap_or_else(|error| panic!("increment failed: {error}"));
        assert_eq!(final_count, 65);
    }

    #[tokio::test]
    async fn expired_counter_restarts_from_one() {
        let store = InMemoryCounterStore::new();

        let _ = store.increment("login:alice").await;
        let set = store
            .set_expiry("login:alice", Duration::from_millis(20))
            .await;
        assert!(set.is_ok());

        tokio::time::sleep(Duration::from_millis(40)).await;

        let count = store
            .increment("login:alice")
            .await
            .unwrap_or_else(|error| panic!("increment failed: {error}"));
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn delete_removes_only_named_keys() {
        let store = InMemoryCounterStore::new();
        let _ = store.increment("login:alice").await;
        let _ = store.increment("address:10.0.0.1").await;

        let deleted = store.delete(&["login:alice".to_owned()]).await;
        assert!(deleted.is_ok());

        let alice = store
            .increment("login:alice")
            .await
            .unwrap_or_else(|error| panic!("increment failed: {error}"));
        let address = store
            .increment("address:10.0.0.1")
            .await
            .unwrap_or_else(|error| panic!("increment failed: {error}"));
        assert_eq!(alice, 1);
        assert_eq!(address, 2);
    }

    #[tokio::test]
    async fn set_membership_round_trip() {
        let store = InMemoryCounterStore::new();

        let added = store.add_member("blacklist", "10.0.0.0/8").await;
        assert!(added.is_ok());

        let members = store
            .members("blacklist")
            .await
            .unwrap_or_else(|error| panic!("members failed: {error}"));
        assert_eq!(members, vec!["10.0.0.0/8".to_owned()]);

        let removed = store.remove_member("blacklist", "10.0.0.0/8").await;
        assert!(removed.is_ok());

        let members = store
            .members("blacklist")
            .await
            .unwrap_or_else(|error| panic!("members failed: {error}"));
        assert!(members.is_empty());
    }

    #[tokio::test]
    async fn induced_fault_fails_every_operation() {
        let store = InMemoryCounterStore::new();
        store.induce_fault(true);

        assert!(store.increment("login:alice").await.is_err());
        assert!(store.members("whitelist").await.is_err());

        store.induce_fault(false);
        assert!(store.increment("login:alice").await.is_ok());
    }
}
