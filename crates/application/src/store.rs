use std::time::Duration;

use async_trait::async_trait;

use bruteguard_core::AppResult;

/// Port for the external atomic counter/set store.
///
/// All mutable state of the service lives behind this trait; the engine
/// itself is stateless. Correctness of the ceiling comparison depends on
/// `increment` being atomic and returning the post-increment value.
#[async_trait]
pub trait CounterStore: Send + Sync {
    /// Atomically increments the counter for `key`, creating it at 1 if
    /// absent, and returns the new value.
    async fn increment(&self, key: &str) -> AppResult<i64>;

    /// Sets the time-to-live for an existing key.
    async fn set_expiry(&self, key: &str, window: Duration) -> AppResult<()>;

    /// Returns all members of the named set.
    async fn members(&self, set_name: &str) -> AppResult<Vec<String>>;

    /// Adds a member to the named set. Adding an existing member is a no-op.
    async fn add_member(&self, set_name: &str, value: &str) -> AppResult<()>;

    /// Removes a member from the named set by exact value.
    async fn remove_member(&self, set_name: &str, value: &str) -> AppResult<()>;

    /// Deletes the given keys. Absent keys are ignored.
    async fn delete(&self, keys: &[String]) -> AppResult<()>;
}
