use std::fmt::{Debug, Formatter};
use std::net::IpAddr;

use bruteguard_core::{AppError, AppResult, NonEmptyString};
use serde::{Deserialize, Serialize};

/// One of the three independently rate-limited axes of a login attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    /// The account identifier being logged into.
    Login,
    /// The password (or other secret) presented with the attempt.
    Credential,
    /// The network address the attempt originates from.
    Address,
}

impl Dimension {
    /// Returns a stable storage tag for this dimension.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::Credential => "credential",
            Self::Address => "address",
        }
    }

    /// Builds the counter key for a value along this dimension.
    #[must_use]
    pub fn counter_key(&self, value: &str) -> String {
        format!("{}:{value}", self.as_str())
    }
}

/// A presented secret, treated as opaque. Redacted from debug output so it
/// never reaches logs in clear.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Credential(NonEmptyString);

impl Credential {
    /// Creates a validated credential.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = NonEmptyString::new(value)
            .map_err(|_| AppError::Validation("credential must not be empty".to_owned()))?;
        Ok(Self(value))
    }

    /// Exposes the secret value for keying the credential counter.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl Debug for Credential {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str("Credential(<redacted>)")
    }
}

/// A validated login attempt: the identity triplet the engine decides on.
#[derive(Debug, Clone)]
pub struct Attempt {
    login: NonEmptyString,
    credential: Credential,
    address: IpAddr,
}

impl Attempt {
    /// Validates the raw triplet received from the transport layer.
    ///
    /// Any empty field or an unparseable address is a validation failure;
    /// no counter is touched for an invalid attempt.
    pub fn new(login: &str, credential: &str, address: &str) -> AppResult<Self> {
        let login = NonEmptyString::new(login)
            .map_err(|_| AppError::Validation("login must not be empty".to_owned()))?;
        let credential = Credential::new(credential)?;
        let address = address.parse::<IpAddr>().map_err(|_| {
            AppError::Validation(format!("'{address}' is not a valid IP address"))
        })?;

        Ok(Self {
            login,
            credential,
            address,
        })
    }

    /// Returns the account identifier.
    #[must_use]
    pub fn login(&self) -> &str {
        self.login.as_str()
    }

    /// Returns the presented credential.
    #[must_use]
    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    /// Returns the originating network address.
    #[must_use]
    pub fn address(&self) -> IpAddr {
        self.address
    }

    /// Builds the counter key for the given dimension of this attempt.
    #[must_use]
    pub fn counter_key(&self, dimension: Dimension) -> String {
        match dimension {
            Dimension::Login => dimension.counter_key(self.login()),
            Dimension::Credential => dimension.counter_key(self.credential.expose()),
            Dimension::Address => dimension.counter_key(&self.address.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Attempt, Credential, Dimension};

    #[test]
    fn rejects_empty_login() {
        assert!(Attempt::new("", "hunter2", "10.0.0.1").is_err());
    }

    #[test]
    fn rejects_whitespace_credential() {
        assert!(Attempt::new("alice", "   ", "10.0.0.1").is_err());
    }

    #[test]
    fn rejects_malformed_address() {
        assert!(Attempt::new("alice", "hunter2", "not-an-ip").is_err());
        assert!(Attempt::new("alice", "hunter2", "10.0.0.0/8").is_err());
    }

    #[test]
    fn accepts_ipv6_address() {
        let attempt = Attempt::new("alice", "hunter2", "2001:db8::1");
        assert!(attempt.is_ok());
    }

    #[test]
    fn counter_keys_are_dimension_prefixed() {
        let attempt = match Attempt::new("alice", "hunter2", "10.0.0.1") {
            Ok(attempt) => attempt,
            Err(error) => panic!("attempt should validate: {error}"),
        };

        assert_eq!(attempt.counter_key(Dimension::Login), "login:alice");
        assert_eq!(
            attempt.counter_key(Dimension::Credential),
            "credential:hunter2"
        );
        assert_eq!(attempt.counter_key(Dimension::Address), "address:10.0.0.1");
    }

    #[test]
    fn credential_debug_is_redacted() {
        let credential = match Credential::new("hunter2") {
            Ok(credential) => credential,
            Err(error) => panic!("credential should validate: {error}"),
        };

        let rendered = format!("{credential:?}");
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("redacted"));
    }
}
