//! Application services: the authorization decision engine and its ports.

#![forbid(unsafe_code)]

mod access_list;
mod decision;
mod rate_limiter;
mod store;

pub use access_list::AccessListEvaluator;
pub use decision::{DecisionEngine, LimitConfig};
pub use rate_limiter::{RateCheck, RateCheckFault, RateLimiter};
pub use store::CounterStore;
