//! Transport payloads for the Bruteguard HTTP API.

use serde::{Deserialize, Serialize};

/// Health check payload.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Fixed "ok" marker.
    pub status: &'static str,
}

/// Login attempt submitted by the authentication front-end.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckAuthRequest {
    /// Account identifier.
    pub login: String,
    /// Presented secret; never echoed back or logged.
    pub password: String,
    /// Originating IPv4/IPv6 address literal.
    pub ip: String,
}

/// Decision for a login attempt.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct CheckAuthResponse {
    /// Whether the attempt may proceed.
    pub ok: bool,
    /// Diagnostic reason when the attempt is denied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Administrative reset of the login- and address-dimension counters.
#[derive(Debug, Clone, Deserialize)]
pub struct ResetBucketRequest {
    /// Account identifier whose counter is reset.
    pub login: String,
    /// Address whose counter is reset.
    pub ip: String,
}

/// Access list mutation: a single address or subnet in CIDR form.
#[derive(Debug, Clone, Deserialize)]
pub struct ListEntryRequest {
    /// CIDR entry, e.g. `10.0.0.0/8` or `10.0.0.1/32`.
    pub ip: String,
}

/// Status flag returned by administrative operations.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatusResponse {
    /// True when the operation was applied.
    pub status: bool,
}
