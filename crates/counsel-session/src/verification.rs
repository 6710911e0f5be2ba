//! Trust/reject decisions for failed `/auth/me` checks.
//!
//! A verification ends in one of three outcomes:
//!
//! - `AcceptFresh`: the backend returned an identity
//! - `TrustCache`: the check failed, but the session was confirmed recently,
//!   a cached identity exists, and the failure streak is under the limit
//! - `Reject`: anything else; the caller gets `None`, the cache is kept

use crate::ApiError;

use counsel_config::SessionConfig;

use std::fmt;
use std::time::Duration;

use serde::Serialize;

/// Tolerances for failed verifications.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionPolicy {
    pub grace_period: Duration,
    pub max_consecutive_failures: u32,
    /// How long an accepted verification is reused (zero disables reuse)
    pub verify_cache: Duration,
    /// Lowercase substrings that mark a 400 response as an auth failure
    pub auth_error_markers: Vec<String>,
}

impl Default for SessionPolicy {
    fn default() -> Self {
        Self::from(&SessionConfig::default())
    }
}

impl From<&SessionConfig> for SessionPolicy {
    fn from(config: &SessionConfig) -> Self {
        Self {
            grace_period: config.grace_period(),
            max_consecutive_failures: config.max_consecutive_failures,
            verify_cache: config.verify_cache(),
            auth_error_markers: config
                .auth_error_markers
                .iter()
                .map(|marker| marker.to_lowercase())
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VerificationOutcome {
    AcceptFresh,
    TrustCache,
    Reject,
}

impl fmt::Display for VerificationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::AcceptFresh => "ACCEPT_FRESH",
            Self::TrustCache => "TRUST_CACHE",
            Self::Reject => "REJECT",
        };
        f.write_str(name)
    }
}

/// Why a verification failed. Logged only; every kind feeds the same decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// HTTP 401
    Unauthorized,
    /// HTTP 400 whose message contains an auth marker
    AuthLikeBadRequest,
    /// Successful response without a user, or with `error: true`
    NoUser,
    /// 5xx, other 4xx, network, decode
    Other,
}

impl FailureKind {
    pub fn classify(err: &ApiError, markers: &[String]) -> Self {
        match err.status_code() {
            Some(401) => Self::Unauthorized,
            Some(400) if is_auth_like(&err.user_message(), markers) => Self::AuthLikeBadRequest,
            _ => Self::Other,
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Unauthorized => "401",
            Self::AuthLikeBadRequest => "400-auth",
            Self::NoUser => "no-user",
            Self::Other => "other",
        };
        f.write_str(name)
    }
}

/// Case-insensitive substring match against the marker list.
pub fn is_auth_like(message: &str, markers: &[String]) -> bool {
    let message = message.to_lowercase();
    markers
        .iter()
        .any(|marker| !marker.is_empty() && message.contains(marker.as_str()))
}

/// Last-success timestamp and failure streak.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FailureTracker {
    last_success_millis: Option<u64>,
    consecutive_failures: u32,
}

impl FailureTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_success(&mut self, now_millis: u64) {
        self.last_success_millis = Some(now_millis);
        self.consecutive_failures = 0;
    }

    /// Count a failure and decide between `TrustCache` and `Reject`.
    pub fn record_failure(
        &mut self,
        now_millis: u64,
        has_cached: bool,
        policy: &SessionPolicy,
    ) -> VerificationOutcome {
        let recently = self.recently_authenticated(now_millis, policy.grace_period);
        self.consecutive_failures = self.consecutive_failures.saturating_add(1);

        if recently && has_cached && self.consecutive_failures < policy.max_consecutive_failures {
            VerificationOutcome::TrustCache
        } else {
            VerificationOutcome::Reject
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn recently_authenticated(&self, now_millis: u64, grace_period: Duration) -> bool {
        self.last_success_millis
            .is_some_and(|at| u128::from(now_millis.saturating_sub(at)) < grace_period.as_millis())
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }

    pub fn last_success_millis(&self) -> Option<u64> {
        self.last_success_millis
    }
}
