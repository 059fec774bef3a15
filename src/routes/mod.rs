//! Route Table Module Index
//!
//! Every application surface is a configuration value (`Application`) fed to a
//! single `bootstrap` function. The tables themselves are declarative
//! `RouteNode` trees of (guard, layout, page).

/// Routes open to anyone (health).
pub mod public;

/// Learner-facing web app, mounted at `/`.
pub mod web;

/// Business (B2B) portal, mounted at `/business`.
pub mod business;

/// Admin console, mounted at `/admin`.
pub mod admin;

use std::sync::Arc;

use axum::{
    Extension, Router,
    extract::{Request, State},
    middleware::{self, Next},
    response::Response,
    routing::{MethodRouter, get},
};

use crate::{
    AppState,
    config::AppConfig,
    guard::{GuardPolicy, guard_middleware},
    handlers,
    models::{AppKind, Navigation},
    roles::{Role, RoleMap},
};

/// LayoutStack
///
/// Names of the layouts wrapping the matched page, outermost first.
#[derive(Debug, Clone, Default)]
pub struct LayoutStack(Vec<&'static str>);

impl LayoutStack {
    pub fn names(&self) -> &[&'static str] {
        &self.0
    }
}

#[derive(Debug, Clone, Copy)]
struct Layout(&'static str);

async fn layout_middleware(
    State(Layout(name)): State<Layout>,
    mut request: Request,
    next: Next,
) -> Response {
    match request.extensions_mut().get_mut::<LayoutStack>() {
        Some(stack) => stack.0.push(name),
        None => {
            request.extensions_mut().insert(LayoutStack(vec![name]));
        }
    }
    next.run(request).await
}

/// RouteNode
///
/// One node of a route table: a path segment (may contain `{param}` captures),
/// an optional guard, an optional layout, an optional index handler and child nodes.
///
/// A node's effective guard is the conjunction of its ancestors' guards and its
/// own. Ancestors run first; the first redirect ends the navigation.
pub struct RouteNode {
    path: String,
    guard: Option<GuardPolicy>,
    layout: Option<&'static str>,
    index: Option<MethodRouter<AppState>>,
    children: Vec<RouteNode>,
}

impl RouteNode {
    /// A grouping node with no layout of its own.
    pub fn group(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            guard: None,
            layout: None,
            index: None,
            children: Vec::new(),
        }
    }

    pub fn layout(path: impl Into<String>, layout: &'static str) -> Self {
        Self {
            layout: Some(layout),
            ..Self::group(path)
        }
    }

    /// A leaf rendering the named page.
    pub fn page(path: impl Into<String>, page: &'static str) -> Self {
        Self::handler(path, handlers::page(page))
    }

    /// A leaf served by an arbitrary handler.
    pub fn handler(path: impl Into<String>, handler: MethodRouter<AppState>) -> Self {
        Self::group(path).index(handler)
    }

    pub fn guarded(mut self, policy: GuardPolicy) -> Self {
        self.guard = Some(policy);
        self
    }

    pub fn index(mut self, handler: MethodRouter<AppState>) -> Self {
        self.index = Some(handler);
        self
    }

    pub fn child(mut self, node: RouteNode) -> Self {
        self.children.push(node);
        self
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// into_router
    ///
    /// Compiles the tree into an axum router relative to this node's own path
    /// (the caller decides where to mount it).
    pub fn into_router(self) -> Router<AppState> {
        self.build().unwrap_or_default()
    }

    // `None` for subtrees without any route: axum refuses route layers on empty routers.
    fn build(self) -> Option<Router<AppState>> {
        let mut router = Router::new();
        let mut has_routes = false;

        if let Some(index) = self.index {
            router = router.route("/", index);
            has_routes = true;
        }

        for child in self.children {
            let path = child.path.clone();
            if let Some(child_router) = child.build() {
                router = mount(router, &path, child_router);
                has_routes = true;
            }
        }

        if !has_routes {
            return None;
        }

        // Layers added later wrap earlier ones, so the guard ends up outermost
        // and runs before the layout and before every descendant.
        if let Some(layout) = self.layout {
            router = router.route_layer(middleware::from_fn_with_state(
                Layout(layout),
                layout_middleware,
            ));
        }
        if let Some(policy) = self.guard {
            router = router.route_layer(middleware::from_fn_with_state(policy, guard_middleware));
        }

        Some(router)
    }
}

/// Nests `child` under `path`, or merges it when `path` is the root.
fn mount(router: Router<AppState>, path: &str, child: Router<AppState>) -> Router<AppState> {
    match normalize(path) {
        Some(prefix) => router.nest(&prefix, child),
        None => router.merge(child),
    }
}

fn normalize(path: &str) -> Option<String> {
    let trimmed = path.trim_matches('/');
    (!trimmed.is_empty()).then(|| format!("/{trimmed}"))
}

/// Application
///
/// Everything that distinguishes one application surface from another.
pub struct Application {
    pub kind: AppKind,
    pub prefix: &'static str,
    pub expected_role: Role,
    pub role_map: RoleMap,
    pub routes: RouteNode,
    pub navigation: Navigation,
}

/// AppContext
///
/// Per-application values made available to every handler of that application.
#[derive(Debug, Clone)]
pub struct AppContext {
    pub kind: AppKind,
    pub expected_role: Role,
    pub role_map: RoleMap,
    pub navigation: Navigation,
}

/// bootstrap
///
/// Turns an `Application` into a router mounted at its prefix. Adds the
/// session-guarded `_app/role-check` and `_app/navigation` endpoints and
/// exposes the `AppContext` to all of the application's handlers.
pub fn bootstrap(app: Application, config: &AppConfig) -> Router<AppState> {
    let Application {
        kind,
        prefix,
        expected_role,
        role_map,
        routes,
        navigation,
    } = app;

    let routes = routes.child(
        RouteNode::group("_app")
            .guarded(GuardPolicy::require_session(config.session_cookie.as_str()))
            .child(RouteNode::handler("role-check", get(handlers::role_check)))
            .child(RouteNode::handler("navigation", get(handlers::navigation))),
    );

    let context = AppContext {
        kind,
        expected_role,
        role_map,
        navigation,
    };

    let router = routes.into_router().route_layer(Extension(Arc::new(context)));

    tracing::debug!(app = ?kind, prefix, expected_role = %expected_role, "application mounted");

    mount(Router::new(), prefix, router)
}

/// All application surfaces served by this process.
pub fn applications(config: &AppConfig) -> Vec<Application> {
    vec![
        web::application(config),
        business::application(config),
        admin::application(config),
    ]
}
