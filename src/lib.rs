use axum::{Router, extract::FromRef, http::HeaderName};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

// Session reading, guarding and role steering.
pub mod session;
pub mod guard;
pub mod roles;

// Identity query boundary, configuration, response models and handlers.
pub mod identity;
pub mod config;
pub mod models;
pub mod handlers;

// Route tables, one per application surface.
pub mod routes;

// --- Public Re-exports ---

pub use config::AppConfig;
pub use identity::{IdentityProvider, IdentityState};

/// ApiDoc
///
/// OpenAPI document for the JSON endpoints every application exposes under its
/// prefix. Served at `/api-docs/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    paths(handlers::role_check, handlers::navigation),
    components(
        schemas(
            models::AppKind, models::PageView, models::NavItem, models::Navigation,
            models::IdentityPhase, models::RoleCheck, identity::Identity, roles::Role,
        )
    ),
    tags(
        (name = "lms-gateway", description = "Session-gated routing for the admin, business and web apps")
    )
)]
struct ApiDoc;

/// AppState
///
/// Shared, immutable state handed to every request.
#[derive(Clone)]
pub struct AppState {
    /// Configuration loaded at startup.
    pub config: AppConfig,
    /// Resolves the signed-in identity for role checks.
    pub identity: IdentityState,
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> AppConfig {
        app_state.config.clone()
    }
}

impl FromRef<AppState> for IdentityState {
    fn from_ref(app_state: &AppState) -> IdentityState {
        app_state.identity.clone()
    }
}

/// create_router
///
/// Mounts every application surface, the public routes and the API docs, then
/// wraps everything in the observability and CORS layers.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    let x_request_id = HeaderName::from_static("x-request-id");

    let mut base_router: Router<AppState> = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(routes::public::public_routes());

    for app in routes::applications(&state.config) {
        base_router = base_router.merge(routes::bootstrap(app, &state.config));
    }

    base_router
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                // Request ID generation, tracing span, then echo the ID back to the client.
                .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                .layer(PropagateRequestIdLayer::new(x_request_id)),
        )
        .layer(cors)
}

/// trace_span_logger
///
/// Span for one request, correlated by the `x-request-id` set above.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = %request.uri().path(),
        req_id = %request_id,
    )
}
