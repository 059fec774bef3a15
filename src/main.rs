use std::sync::Arc;

use lms_gateway::{
    AppState,
    config::{AppConfig, Env},
    create_router,
    identity::{GraphqlIdentityClient, Identity, IdentityState, StaticIdentityProvider},
    roles::Role,
};
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// main
///
/// Loads configuration, sets up logging, picks the identity provider and
/// serves the gateway.
#[tokio::main]
async fn main() {
    // 1. Configuration (fail-fast)
    dotenv::dotenv().ok();
    let config = AppConfig::load();

    // 2. Logging: RUST_LOG wins, otherwise sensible local defaults.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "lms_gateway=debug,tower_http=info".into());

    match config.env {
        Env::Local => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
        Env::Production => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
    }

    tracing::info!("Gateway starting in {:?} mode", config.env);

    // 3. Identity provider
    let identity = identity_provider(&config);

    // 4. Router and server
    let bind_addr = config.bind_addr.clone();
    let app = create_router(AppState { config, identity });

    let listener = TcpListener::bind(&bind_addr)
        .await
        .expect("FATAL: Failed to bind the HTTP listener. Check BIND_ADDR.");

    tracing::info!("Listening on {}", bind_addr);
    tracing::info!("API Documentation (Swagger UI) available at /swagger-ui");

    axum::serve(listener, app)
        .await
        .expect("FATAL: HTTP server terminated unexpectedly.");
}

/// identity_provider
///
/// The GraphQL client when an endpoint is configured. Locally, without one, a
/// static identity carrying `DEV_IDENTITY_ROLE` (or no user at all).
fn identity_provider(config: &AppConfig) -> IdentityState {
    match &config.graphql_url {
        Some(url) => {
            let client = GraphqlIdentityClient::new(
                url.as_str(),
                config.session_cookie.as_str(),
                config.identity_timeout,
            )
            .expect("FATAL: Failed to build the identity HTTP client.");
            Arc::new(client)
        }
        None => {
            let role = config.dev_identity_role.as_deref().and_then(Role::parse);
            tracing::warn!(
                ?role,
                "GRAPHQL_API_URL not set, serving a static development identity"
            );
            match role {
                Some(role) => Arc::new(StaticIdentityProvider::new(Identity::with_role(role))),
                None => Arc::new(StaticIdentityProvider::anonymous()),
            }
        }
    }
}
