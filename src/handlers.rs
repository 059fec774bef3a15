use std::{collections::BTreeMap, sync::Arc};

use axum::{
    Extension, Json,
    extract::{RawPathParams, State},
    http::HeaderMap,
    routing::{MethodRouter, get},
};

use crate::{
    AppState,
    config::{AppConfig, Env},
    guard::SessionContext,
    identity::{Identity, IdentityState},
    models::{AppKind, IdentityPhase, Navigation, PageView, RoleCheck},
    roles::{IdentityStatus, role_redirect},
    routes::{AppContext, LayoutStack},
};

/// Local-only header overriding the role reported by the identity API.
pub const DEV_ROLE_HEADER: &str = "x-user-role";

/// page
///
/// Builds the GET handler for an opaque page render target. The handler only
/// runs once every guard above it has let the request through.
pub fn page(name: &'static str) -> MethodRouter<AppState> {
    get(
        move |Extension(app): Extension<Arc<AppContext>>,
              session: Option<Extension<SessionContext>>,
              layouts: Option<Extension<LayoutStack>>,
              params: RawPathParams| async move {
            Json(render_page(
                app.kind,
                name,
                session.map(|Extension(session)| session),
                layouts.map(|Extension(layouts)| layouts),
                &params,
            ))
        },
    )
}

fn render_page(
    app: AppKind,
    page: &str,
    session: Option<SessionContext>,
    layouts: Option<LayoutStack>,
    params: &RawPathParams,
) -> PageView {
    PageView {
        app,
        page: page.to_string(),
        layouts: layouts
            .map(|stack| stack.names().iter().map(|name| name.to_string()).collect())
            .unwrap_or_default(),
        params: params
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect::<BTreeMap<_, _>>(),
        authenticated: session.is_some_and(|session| session.authenticated),
    }
}

/// role_check
///
/// [Guarded Route] Resolves the signed-in identity and tells the client whether
/// it belongs on another application surface. Served under each application's
/// prefix (`/_app/role-check`, `/business/_app/role-check`, `/admin/_app/role-check`).
///
/// Identity failures are never surfaced as errors: the answer is `unavailable`
/// with no redirect, and the current application keeps rendering.
#[utoipa::path(
    get,
    path = "/_app/role-check",
    responses(
        (status = 200, description = "Role decision", body = RoleCheck),
        (status = 302, description = "No session, redirected to /login")
    )
)]
pub async fn role_check(
    State(identity): State<IdentityState>,
    State(config): State<AppConfig>,
    Extension(app): Extension<Arc<AppContext>>,
    Extension(session): Extension<SessionContext>,
    headers: HeaderMap,
) -> Json<RoleCheck> {
    let mut status = match session.token {
        Some(token) => match identity.current_identity(&token).await {
            Ok(Some(identity)) => IdentityStatus::Resolved(identity),
            Ok(None) => IdentityStatus::Unavailable,
            Err(e) => {
                tracing::warn!(error = %e, app = ?app.kind, "identity lookup failed");
                IdentityStatus::Unavailable
            }
        },
        None => IdentityStatus::Unavailable,
    };

    // Local development bypass: pretend the identity carries the given role.
    if config.env == Env::Local {
        if let Some(role) = headers.get(DEV_ROLE_HEADER).and_then(|v| v.to_str().ok()) {
            let mut identity = match status {
                IdentityStatus::Resolved(identity) => identity,
                _ => Identity::default(),
            };
            identity.role = Some(role.to_string());
            status = IdentityStatus::Resolved(identity);
        }
    }

    let redirect = role_redirect(status.role(), app.expected_role, &app.role_map)
        .map(str::to_string);

    if let Some(target) = &redirect {
        tracing::debug!(app = ?app.kind, %target, "role redirect");
    }

    Json(match status {
        IdentityStatus::Resolved(identity) => RoleCheck {
            status: IdentityPhase::Resolved,
            role: identity.role,
            redirect,
        },
        IdentityStatus::Loading => RoleCheck {
            status: IdentityPhase::Loading,
            role: None,
            redirect: None,
        },
        IdentityStatus::Unavailable => RoleCheck {
            status: IdentityPhase::Unavailable,
            role: None,
            redirect: None,
        },
    })
}

/// navigation
///
/// [Guarded Route] Main and secondary sidebar trees of the current application.
#[utoipa::path(
    get,
    path = "/_app/navigation",
    responses((status = 200, description = "Sidebar navigation", body = Navigation))
)]
pub async fn navigation(Extension(app): Extension<Arc<AppContext>>) -> Json<Navigation> {
    Json(app.navigation.clone())
}
