//! The authorization decision engine.
//!
//! Composes the rate limiter and the access list evaluator into a single
//! allow/deny verdict per attempt. Evaluation order: blacklist, whitelist,
//! then the credential, login and address rate checks with short-circuit
//! on the first denial. An explicit list decision is reached before any
//! counter is touched, so list-decided attempts leave no counter trace.


use std::sync::Arc;
use std::time::Duration;

use bruteguard_core::{AppError, AppResult};
use bruteguard_domain::{AccessList, Attempt, DecisionReason, Dimension, Verdict};

use crate::access_list::AccessListEvaluator;
use crate::rate_limiter::RateLimiter;
use crate::store::CounterStore;

/// Process-wide attempt ceilings and the counter window, read once at
/// startup. Changing them requires a restart.
///
/// Only constructible through [`LimitConfig::new`], which guarantees every
/// ceiling and the window are positive.
#[derive(Debug, Clone, Copy)]
pub struct LimitConfig {
    login_ceiling: i64,
    credential_ceiling: i64,
    address_ceiling: i64,
    window: Duration,
}

impl LimitConfig {
    /// Validates that every ceiling and the window are positive.
    pub fn new(
        login_ceiling: i64,
        credential_ceiling: i64,
        address_ceiling: i64,
        window: Duration,
    ) -> AppResult<Self> {
        for (name, ceiling) in [
            ("login", login_ceiling),
            ("credential", credential_ceiling),
            ("address", address_ceiling),
        ] {
            if ceiling < 1 {
                return Err(AppError::Validation(format!(
                    "{name} ceiling must be at least 1, got {ceiling}"
                )));
            }
        }

        if window.is_zero() {
            return Err(AppError::Validation(
                "counter window must be a positive duration".to_owned(),
            ));
        }

        Ok(Self {
            login_ceiling,
            credential_ceiling,
            address_ceiling,
            window,
        })
    }

    /// Ceiling for attempts against one login within a window.
    #[must_use]
    pub fn login_ceiling(&self) -> i64 {
        self.login_ceiling
    }

    /// Ceiling for attempts presenting one credential within a window.
    #[must_use]
    pub fn credential_ceiling(&self) -> i64 {
        self.credential_ceiling
    }

    /// Ceiling for attempts from one address within a window.
    #[must_use]
    pub fn address_ceiling(&self) -> i64 {
        self.address_ceiling
    }

    /// Fixed window after which a counter expires.
    #[must_use]
    pub fn window(&self) -> Duration {
        self.window
    }

    fn ceiling_for(&self, dimension: Dimension) -> i64 {
        match dimension {
            Dimension::Login => self.login_ceiling,
            Dimension::Credential => self.credential_ceiling,
            Dimension::Address => self.address_ceiling,
        }
    }
}

/// Stateless decision engine; all mutable state lives in the store.
#[derive(Clone)]
pub struct DecisionEngine {
    rate_limiter: RateLimiter,
    access_lists: AccessListEvaluator,
    config: LimitConfig,
}

impl DecisionEngine {
    /// Checked dimensions, in evaluation order.
    const RATE_CHECK_ORDER: [Dimension; 3] =
        [Dimension::Credential, Dimension::Login, Dimension::Address];

    /// Builds the engine over an injected store capability.
    #[must_use]
    pub fn new(store: Arc<dyn CounterStore>, config: LimitConfig) -> Self {
        Self {
            rate_limiter: RateLimiter::new(store.clone(), config.window),
            access_lists: AccessListEvaluator::new(store),
            config,
        }
    }

    /// Returns the access list evaluator sharing this engine's store.
    #[must_use]
    pub fn access_lists(&self) -> &AccessListEvaluator {
        &self.access_lists
    }

    /// Decides whether a validated attempt may proceed.
    ///
    /// A store fault aborts the decision with an error rather than a deny,
    /// so callers can tell "over limit" from "undecidable".
    pub async fn decide(&self, attempt: &Attempt) -> AppResult<Verdict> {
        // Blacklist first: an explicit deny can never be overridden by a
        // looser allow rule.
        if self
            .access_lists
            .is_member(attempt.address(), AccessList::Blacklist)
            .await?
        {
            tracing::info!(address = %attempt.address(), "attempt denied by blacklist");
            return Ok(Verdict::deny(DecisionReason::Blacklisted));
        }

        if self
            .access_lists
            .is_member(attempt.address(), AccessList::Whitelist)
            .await?
        {
            tracing::debug!(address = %attempt.address(), "attempt allowed by whitelist");
            return Ok(Verdict::allow(DecisionReason::Whitelisted));
        }

        // Rate checks short-circuit: once a dimension denies, later
        // dimensions are neither checked nor incremented.
        for dimension in Self::RATE_CHECK_ORDER {
            let key = attempt.counter_key(dimension);
            let check = self
                .rate_limiter
                .check_and_increment(&key, self.config.ceiling_for(dimension))
                .await?;

            if !check.allowed {
                tracing::info!(
                    login = attempt.login(),
                    address = %attempt.address(),
                    dimension = dimension.as_str(),
                    count = check.count,
                    "attempt denied by rate limit"
                );
                return Ok(Verdict::deny(DecisionReason::RateLimited(dimension)));
            }
        }

        tracing::debug!(
            login = attempt.login(),
            address = %attempt.address(),
            "attempt allowed"
        );
        Ok(Verdict::allow(DecisionReason::Allowed))
    }

    /// Administrative reset: deletes the login- and address-dimension
    /// counters. The credential counter stays, since the credential is not
    /// known to the administrative caller. Idempotent.
    pub async fn reset(&self, login: &str, address: &str) -> AppResult<()> {
        let keys = [
            Dimension::Login.counter_key(login),
            Dimension::Address.counter_key(address),
        ];
        self.rate_limiter.reset(&keys).await?;
        tracing::info!(login, address, "attempt counters reset");
        Ok(())
    }
}
