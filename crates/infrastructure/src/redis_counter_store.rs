//! Redis-backed counter/set store.

use std::time::Duration;

use async_trait::async_trait;
use redis::AsyncCommands;

use bruteguard_application::CounterStore;
use bruteguard_core::{AppError, AppResult};

/// Redis implementation of the counter store port.
///
/// Counter atomicity comes from `INCR`; window expiry from `EXPIRE`; access
/// lists are plain Redis sets.
#[derive(Clone)]
pub struct RedisCounterStore {
    client: redis::Client,
    key_prefix: String,
}

impl RedisCounterStore {
    /// Creates a store with a configured Redis client and key prefix.
    #[must_use]
    pub fn new(client: redis::Client, key_prefix: impl Into<String>) -> Self {
        Self {
            client,
            key_prefix: key_prefix.into(),
        }
    }

    fn key_for(&self, key: &str) -> String {
        format!("{}:{key}", self.key_prefix)
    }

    async fn connection(&self) -> AppResult<redis::aio::MultiplexedConnection> {
        self.client
            .get_multiplexed_async_connection()
            .await
            .map_err(|error| AppError::Store(format!("failed to connect to redis: {error}")))
    }
}

#[async_trait]
impl CounterStore for RedisCounterStore {
    async fn increment(&self, key: &str) -> AppResult<i64> {
        let mut connection = self.connection().await?;
        let count: i64 = connection
            .incr(self.key_for(key), 1)
            .await
            .map_err(|error| AppError::Store(format!("failed to increment '{key}': {error}")))?;

        Ok(count)
    }

    async fn set_expiry(&self, key: &str, window: Duration) -> AppResult<()> {
        let seconds = i64::try_from(window.as_secs())
            .map_err(|error| AppError::Internal(format!("invalid window duration: {error}")))?;

        let mut connection = self.connection().await?;
        let _: () = connection
            .expire(self.key_for(key), seconds)
            .await
            .map_err(|error| {
                AppError::Store(format!("failed to set expiry on '{key}': {error}"))
            })?;

        Ok(())
    }

    async fn members(&self, set_name: &str) -> AppResult<Vec<String>> {
        let mut connection = self.connection().await?;
        let members: Vec<String> = connection
            .smembers(self.key_for(set_name))
            .await
            .map_err(|error| {
                AppError::Store(format!("failed to read set '{set_name}': {error}"))
            })?;

        Ok(members)
    }

    async fn add_member(&self, set_name: &str, value: &str) -> AppResult<()> {
        let mut connection = self.connection().await?;
        let _: () = connection
            .sadd(self.key_for(set_name), value)
            .await
            .map_err(|error| {
                AppError::Store(format!("failed to add to set '{set_name}': {error}"))
            })?;

        Ok(())
    }

    async fn remove_member(&self, set_name: &str, value: &str) -> AppResult<()> {
        let mut connection = self.connection().await?;
        let _: () = connection
            .srem(self.key_for(set_name), value)
            .await
            .map_err(|error| {
                AppError::Store(format!("failed to remove from set '{set_name}': {error}"))
            })?;

        Ok(())
    }

    async fn delete(&self, keys: &[String]) -> AppResult<()> {
        if keys.is_empty() {
            return Ok(());
        }

        let prefixed: Vec<String> = keys.iter().map(|key| self.key_for(key)).collect();
        let mut connection = self.connection().await?;
        let _: () = connection
            .del(prefixed)
            .await
            .map_err(|error| AppError::Store(format!("failed to delete counters: {error}")))?;

        Ok(())
    }
}
