use axum::{
    extract::{Request, State},
    http::{StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::session::{CookieJar, SessionToken};

/// Where unauthenticated visitors are sent.
pub const LOGIN_PATH: &str = "/login";

/// Trigger
///
/// Which session state makes a guard redirect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// Protects a route: no session means redirect.
    WhenAbsent,
    /// Login, signup and invite routes: an existing session means redirect away.
    WhenPresent,
}

/// GuardPolicy
///
/// The single authorization predicate shared by every route declaration,
/// parameterized by cookie name, polarity and redirect target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardPolicy {
    pub cookie_name: String,
    pub trigger: Trigger,
    pub redirect_to: String,
}

/// SessionContext
///
/// Minimal context handed to a page once its guards let the request through.
#[derive(Debug, Clone)]
pub struct SessionContext {
    pub authenticated: bool,
    pub token: Option<SessionToken>,
}

/// GuardOutcome
///
/// Result of one guard evaluation for one navigation. Never persisted.
#[derive(Debug, Clone)]
pub enum GuardOutcome {
    Proceed(SessionContext),
    Redirect(String),
}

impl GuardPolicy {
    pub fn new(
        cookie_name: impl Into<String>,
        trigger: Trigger,
        redirect_to: impl Into<String>,
    ) -> Self {
        Self {
            cookie_name: cookie_name.into(),
            trigger,
            redirect_to: redirect_to.into(),
        }
    }

    /// Redirects to `/login` when the session cookie is missing.
    pub fn require_session(cookie_name: impl Into<String>) -> Self {
        Self::new(cookie_name, Trigger::WhenAbsent, LOGIN_PATH)
    }

    /// Redirects already signed-in visitors to the application root.
    pub fn redirect_signed_in(cookie_name: impl Into<String>, root: impl Into<String>) -> Self {
        Self::new(cookie_name, Trigger::WhenPresent, root)
    }

    /// evaluate
    ///
    /// Pure decision over the parsed jar. Anything short of a non-empty token
    /// counts as "absent", so parse problems can only ever cost a re-login.
    pub fn evaluate(&self, jar: &CookieJar) -> GuardOutcome {
        let token = jar.session_token(&self.cookie_name);

        match (self.trigger, token) {
            (Trigger::WhenAbsent, None) => GuardOutcome::Redirect(self.redirect_to.clone()),
            (Trigger::WhenPresent, Some(_)) => GuardOutcome::Redirect(self.redirect_to.clone()),
            (_, token) => GuardOutcome::Proceed(SessionContext {
                authenticated: token.is_some(),
                token,
            }),
        }
    }
}

impl GuardOutcome {
    pub fn is_redirect(&self) -> bool {
        matches!(self, GuardOutcome::Redirect(_))
    }

    pub fn redirect_target(&self) -> Option<&str> {
        match self {
            GuardOutcome::Redirect(target) => Some(target),
            GuardOutcome::Proceed(_) => None,
        }
    }
}

/// Redirect outcomes become a `302 Found`. A proceed outcome on its own has
/// nothing to render, so it maps to an empty `204`.
impl IntoResponse for GuardOutcome {
    fn into_response(self) -> Response {
        match self {
            GuardOutcome::Redirect(target) => {
                (StatusCode::FOUND, [(header::LOCATION, target)]).into_response()
            }
            GuardOutcome::Proceed(_) => StatusCode::NO_CONTENT.into_response(),
        }
    }
}

/// guard_middleware
///
/// Route layer running a `GuardPolicy` before the wrapped routes.
///
/// On redirect the inner service is never called: nested guards, layouts and the
/// page body stay untouched. On proceed the `SessionContext` is stored in the
/// request extensions for the page to pick up.
pub async fn guard_middleware(
    State(policy): State<GuardPolicy>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    match policy.evaluate(&jar) {
        GuardOutcome::Proceed(context) => {
            request.extensions_mut().insert(context);
            next.run(request).await
        }
        outcome @ GuardOutcome::Redirect(_) => {
            tracing::debug!(
                path = %request.uri().path(),
                target = ?outcome.redirect_target(),
                trigger = ?policy.trigger,
                "guard redirect"
            );
            outcome.into_response()
        }
    }
}
