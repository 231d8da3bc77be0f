use serde::{Deserialize, Serialize};

/// The two named access lists an address can belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessList {
    /// Addresses allowed regardless of rate-limit state.
    Whitelist,
    /// Addresses denied regardless of rate-limit state.
    Blacklist,
}

impl AccessList {
    /// Returns the name of the backing set for this list.
    #[must_use]
    pub fn set_name(&self) -> &'static str {
        match self {
            Self::Whitelist => "whitelist",
            Self::Blacklist => "blacklist",
        }
    }
}
