use crate::{
    config::AppConfig,
    guard::GuardPolicy,
    handlers,
    models::{AppKind, NavItem, Navigation},
    roles::{Role, RoleMap},
};

use super::{Application, RouteNode};

/// Learner-facing web app.
///
/// Sign-in style routes are guarded the other way round: an existing session
/// sends the visitor to `/`. Everything inside `learner_shell` needs a session.
pub fn application(config: &AppConfig) -> Application {
    let cookie = config.session_cookie.as_str();
    let signed_out_only = || GuardPolicy::redirect_signed_in(cookie, "/");

    let routes = RouteNode::group("/")
        .child(RouteNode::page("login", "login").guarded(signed_out_only()))
        .child(RouteNode::page("signup", "signup").guarded(signed_out_only()))
        .child(RouteNode::page("invite/{invite_code}", "accept_invite").guarded(signed_out_only()))
        .child(
            RouteNode::layout("/", "learner_shell")
                .guarded(GuardPolicy::require_session(cookie))
                .index(handlers::page("home"))
                .child(RouteNode::page("dashboard", "dashboard"))
                .child(RouteNode::page("courses", "course_catalog"))
                .child(
                    RouteNode::layout("courses/{course_id}", "course_layout")
                        .index(handlers::page("course_overview"))
                        .child(RouteNode::page("curriculum", "course_curriculum"))
                        .child(RouteNode::page("lessons/{lesson_id}", "lesson")),
                )
                .child(RouteNode::page("checkout/{course_id}", "checkout"))
                .child(RouteNode::page("profile", "profile")),
        );

    Application {
        kind: AppKind::Web,
        prefix: "/",
        expected_role: Role::Student,
        role_map: RoleMap::default(),
        routes,
        navigation: Navigation {
            main: vec![
                NavItem::new("Dashboard", "/dashboard"),
                NavItem::new("Courses", "/courses"),
            ],
            secondary: vec![NavItem::new("Profile", "/profile")],
        },
    }
}
