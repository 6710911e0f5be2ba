use crate::tests::{EnvGuard, setup_config_dir};
use crate::{Config, SessionConfig};

use std::time::Duration;

use googletest::assert_that;
use googletest::prelude::{anything, err, ok};
use serial_test::serial;

// =========================================================================
// Validation Tests - Session
// =========================================================================

#[test]
#[serial]
fn given_zero_max_failures_when_validate_then_error() {
    // Given
    let (_temp, _guard) = setup_config_dir();
    let _failures = EnvGuard::set("COUNSEL_SESSION_MAX_CONSECUTIVE_FAILURES", "0");

    // When
    let config = Config::load().unwrap();
    let result = config.validate();

    // Then
    assert_that!(result, err(anything()));
}

#[test]
#[serial]
fn given_grace_period_over_max_when_validate_then_error() {
    // Given
    let (_temp, _guard) = setup_config_dir();
    let _grace = EnvGuard::set("COUNSEL_SESSION_GRACE_PERIOD_SECS", "90000");

    // When
    let config = Config::load().unwrap();
    let result = config.validate();

    // Then
    assert_that!(result, err(anything()));
}

#[test]
#[serial]
fn given_zero_grace_period_when_validate_then_ok() {
    // Given
    let (_temp, _guard) = setup_config_dir();
    let _grace = EnvGuard::set("COUNSEL_SESSION_GRACE_PERIOD_SECS", "0");

    // When
    let config = Config::load().unwrap();
    let result = config.validate();

    // Then
    assert_that!(result, ok(anything()));
}

#[test]
fn given_empty_marker_when_validate_then_error() {
    let config = SessionConfig {
        auth_error_markers: vec!["token".to_string(), "  ".to_string()],
        ..Default::default()
    };

    assert_that!(config.validate(), err(anything()));
}

#[test]
fn given_verify_cache_over_max_when_validate_then_error() {
    let config = SessionConfig {
        verify_cache_secs: 301,
        ..Default::default()
    };

    assert_that!(config.validate(), err(anything()));
}

#[test]
fn test_default_durations() {
    let config = SessionConfig::default();
    assert_eq!(config.grace_period(), Duration::from_secs(30 * 60));
    assert_eq!(config.verify_cache(), Duration::from_secs(10));
    assert_eq!(
        config.auth_error_markers,
        vec!["unauthorized", "access denied", "token"]
    );
}
