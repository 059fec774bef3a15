use std::{env, time::Duration};

use crate::session::SESSION_COOKIE;

/// AppConfig
///
/// Immutable configuration loaded once at startup and shared through `AppState`
/// (pulled out with `FromRef` where a handler or extractor needs it).
#[derive(Clone, Debug)]
pub struct AppConfig {
    // Runtime environment marker. Controls the development bypasses.
    pub env: Env,
    // Socket address the HTTP server binds to.
    pub bind_addr: String,
    // GraphQL endpoint resolving the signed-in identity. Optional only in local.
    pub graphql_url: Option<String>,
    // Name of the cookie carrying the session credential.
    pub session_cookie: String,
    // Upper bound for one identity query.
    pub identity_timeout: Duration,
    // Local only: role served by the static identity provider when no GraphQL URL is set.
    pub dev_identity_role: Option<String>,
}

/// Env
///
/// Runtime context: local development or production.
#[derive(Clone, PartialEq, Debug)]
pub enum Env {
    Local,
    Production,
}

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_IDENTITY_TIMEOUT_SECS: u64 = 5;

impl Default for AppConfig {
    /// Safe, non-panicking values for test setup.
    fn default() -> Self {
        Self {
            env: Env::Local,
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            graphql_url: None,
            session_cookie: SESSION_COOKIE.to_string(),
            identity_timeout: Duration::from_secs(DEFAULT_IDENTITY_TIMEOUT_SECS),
            dev_identity_role: None,
        }
    }
}

impl AppConfig {
    /// load
    ///
    /// Reads the configuration from the environment, failing fast.
    ///
    /// # Panics
    /// Panics when `GRAPHQL_API_URL` is missing in production, or when
    /// `IDENTITY_TIMEOUT_SECS` is set but not a whole number of seconds.
    pub fn load() -> Self {
        let env_str = env::var("APP_ENV").unwrap_or_else(|_| "local".to_string());
        let env = match env_str.as_str() {
            "production" => Env::Production,
            _ => Env::Local,
        };

        let graphql_url = match env {
            Env::Production => Some(
                env::var("GRAPHQL_API_URL")
                    .expect("FATAL: GRAPHQL_API_URL must be set in production."),
            ),
            Env::Local => env::var("GRAPHQL_API_URL").ok(),
        };

        let identity_timeout = env::var("IDENTITY_TIMEOUT_SECS")
            .ok()
            .map(|raw| {
                raw.parse::<u64>()
                    .expect("FATAL: IDENTITY_TIMEOUT_SECS must be a whole number of seconds.")
            })
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(DEFAULT_IDENTITY_TIMEOUT_SECS));

        // The static identity is a development convenience only.
        let dev_identity_role = match env {
            Env::Local => env::var("DEV_IDENTITY_ROLE").ok(),
            Env::Production => None,
        };

        Self {
            env,
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string()),
            graphql_url,
            session_cookie: env::var("SESSION_COOKIE_NAME")
                .unwrap_or_else(|_| SESSION_COOKIE.to_string()),
            identity_timeout,
            dev_identity_role,
        }
    }
}
