//! Store adapters for the Bruteguard application ports.

#![forbid(unsafe_code)]

mod in_memory_counter_store;
mod redis_counter_store;

pub use in_memory_counter_store::InMemoryCounterStore;
pub use redis_counter_store::RedisCounterStore;
