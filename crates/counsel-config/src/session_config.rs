use crate::{
    ConfigError, ConfigErrorResult, DEFAULT_AUTH_ERROR_MARKERS, DEFAULT_GRACE_PERIOD_SECS,
    DEFAULT_MAX_CONSECUTIVE_FAILURES, DEFAULT_VERIFY_CACHE_SECS, MAX_GRACE_PERIOD_SECS,
    MAX_MAX_CONSECUTIVE_FAILURES, MAX_VERIFY_CACHE_SECS, MIN_MAX_CONSECUTIVE_FAILURES,
};

use std::time::Duration;

use serde::Deserialize;

/// Session verification tolerances.
///
/// Failed `/auth/me` checks are tolerated (the cached identity is returned) while
/// the last successful authentication is younger than the grace period and fewer
/// than `max_consecutive_failures` checks have failed in a row.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub grace_period_secs: u64,
    pub max_consecutive_failures: u32,
    /// Reuse a fresh verification result for this long (0 = always verify)
    pub verify_cache_secs: u64,
    /// Lowercase substrings that make a 400 response count as an auth failure
    pub auth_error_markers: Vec<String>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            grace_period_secs: DEFAULT_GRACE_PERIOD_SECS,
            max_consecutive_failures: DEFAULT_MAX_CONSECUTIVE_FAILURES,
            verify_cache_secs: DEFAULT_VERIFY_CACHE_SECS,
            auth_error_markers: DEFAULT_AUTH_ERROR_MARKERS
                .iter()
                .map(|m| m.to_string())
                .collect(),
        }
    }
}

impl SessionConfig {
    pub fn grace_period(&self) -> Duration {
        Duration::from_secs(self.grace_period_secs)
    }

    pub fn verify_cache(&self) -> Duration {
        Duration::from_secs(self.verify_cache_secs)
    }

    pub fn validate(&self) -> ConfigErrorResult<()> {
        if self.grace_period_secs > MAX_GRACE_PERIOD_SECS {
            return Err(ConfigError::session(format!(
                "session.grace_period_secs must be 0-{}, got {}",
                MAX_GRACE_PERIOD_SECS, self.grace_period_secs
            )));
        }

        if self.max_consecutive_failures < MIN_MAX_CONSECUTIVE_FAILURES
            || self.max_consecutive_failures > MAX_MAX_CONSECUTIVE_FAILURES
        {
            return Err(ConfigError::session(format!(
                "session.max_consecutive_failures must be {}-{}, got {}",
                MIN_MAX_CONSECUTIVE_FAILURES,
                MAX_MAX_CONSECUTIVE_FAILURES,
                self.max_consecutive_failures
            )));
        }

        if self.verify_cache_secs > MAX_VERIFY_CACHE_SECS {
            return Err(ConfigError::session(format!(
                "session.verify_cache_secs must be 0-{}, got {}",
                MAX_VERIFY_CACHE_SECS, self.verify_cache_secs
            )));
        }

        if self
            .auth_error_markers
            .iter()
            .any(|marker| marker.trim().is_empty())
        {
            return Err(ConfigError::session(
                "session.auth_error_markers cannot contain empty entries",
            ));
        }

        Ok(())
    }
}
