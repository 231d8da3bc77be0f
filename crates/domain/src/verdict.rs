use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::Dimension;

/// Why the engine allowed or denied an attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionReason {
    /// No list matched and every dimension stayed at or under its ceiling.
    Allowed,
    /// The address is a whitelist member; rate limits were bypassed.
    Whitelisted,
    /// The named dimension exceeded its ceiling inside the current window.
    RateLimited(Dimension),
    /// The address is a blacklist member.
    Blacklisted,
}

impl Display for DecisionReason {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Allowed => formatter.write_str("allowed"),
            Self::Whitelisted => formatter.write_str("address is whitelisted"),
            Self::RateLimited(dimension) => {
                write!(formatter, "{} attempt limit exceeded", dimension.as_str())
            }
            Self::Blacklisted => formatter.write_str("address is blacklisted"),
        }
    }
}

/// The single allow/deny outcome of a decision, with its diagnostic reason.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    /// Whether the attempt may proceed.
    pub allowed: bool,
    /// Diagnostic reason backing the outcome.
    pub reason: DecisionReason,
}

impl Verdict {
    /// An allow verdict with the given reason.
    #[must_use]
    pub fn allow(reason: DecisionReason) -> Self {
        Self {
            allowed: true,
            reason,
        }
    }

    /// A deny verdict with the given reason.
    #[must_use]
    pub fn deny(reason: DecisionReason) -> Self {
        Self {
            allowed: false,
            reason,
        }
    }
}
