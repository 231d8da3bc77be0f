//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod attempt;
mod list;
mod verdict;

pub use attempt::{Attempt, Credential, Dimension};
pub use list::AccessList;
pub use verdict::{DecisionReason, Verdict};
