use lms_gateway::{AppConfig, config::Env};
use serial_test::serial;
use std::{env, panic, time::Duration};

const CONFIG_VARS: [&str; 6] = [
    "APP_ENV",
    "BIND_ADDR",
    "GRAPHQL_API_URL",
    "SESSION_COOKIE_NAME",
    "IDENTITY_TIMEOUT_SECS",
    "DEV_IDENTITY_ROLE",
];

// --- Setup/Teardown Utilities ---

/// Runs `test` with the given variables set (everything else in CONFIG_VARS
/// removed) and restores the original environment afterwards, even on panic.
fn run_with_env<T, R>(vars: &[(&str, &str)], test: T) -> R
where
    T: FnOnce() -> R + panic::UnwindSafe,
{
    let originals: Vec<(&str, Option<String>)> = CONFIG_VARS
        .iter()
        .map(|&var| (var, env::var(var).ok()))
        .collect();

    unsafe {
        for var in CONFIG_VARS {
            env::remove_var(var);
        }
        for (key, value) in vars {
            env::set_var(key, value);
        }
    }

    let result = panic::catch_unwind(test);

    for (key, original_value) in originals {
        unsafe {
            match original_value {
                Some(val) => env::set_var(key, val),
                None => env::remove_var(key),
            }
        }
    }

    match result {
        Ok(value) => value,
        Err(e) => panic::resume_unwind(e),
    }
}

// --- Tests ---

#[test]
#[serial]
fn test_local_defaults() {
    let config = run_with_env(&[], AppConfig::load);

    assert_eq!(config.env, Env::Local);
    assert_eq!(config.bind_addr, "0.0.0.0:3000");
    assert_eq!(config.graphql_url, None);
    assert_eq!(config.session_cookie, "session_token");
    assert_eq!(config.identity_timeout, Duration::from_secs(5));
    assert_eq!(config.dev_identity_role, None);
}

#[test]
#[serial]
fn test_production_requires_graphql_url() {
    let result = panic::catch_unwind(|| run_with_env(&[("APP_ENV", "production")], AppConfig::load));
    assert!(result.is_err(), "AppConfig::load should fail fast without GRAPHQL_API_URL");
}

#[test]
#[serial]
fn test_production_config() {
    let config = run_with_env(
        &[
            ("APP_ENV", "production"),
            ("GRAPHQL_API_URL", "https://api.example.com/graphql"),
            ("SESSION_COOKIE_NAME", "lms_sid"),
            ("IDENTITY_TIMEOUT_SECS", "2"),
            ("DEV_IDENTITY_ROLE", "business"),
        ],
        AppConfig::load,
    );

    assert_eq!(config.env, Env::Production);
    assert_eq!(
        config.graphql_url.as_deref(),
        Some("https://api.example.com/graphql")
    );
    assert_eq!(config.session_cookie, "lms_sid");
    assert_eq!(config.identity_timeout, Duration::from_secs(2));
    // The development identity never leaks into production.
    assert_eq!(config.dev_identity_role, None);
}

#[test]
#[serial]
fn test_local_dev_identity_role() {
    let config = run_with_env(
        &[("DEV_IDENTITY_ROLE", "student"), ("BIND_ADDR", "127.0.0.1:8080")],
        AppConfig::load,
    );

    assert_eq!(config.dev_identity_role.as_deref(), Some("student"));
    assert_eq!(config.bind_addr, "127.0.0.1:8080");
}

#[test]
#[serial]
fn test_invalid_timeout_fails_fast() {
    let result = panic::catch_unwind(|| {
        run_with_env(&[("IDENTITY_TIMEOUT_SECS", "soon")], AppConfig::load)
    });
    assert!(result.is_err());
}
