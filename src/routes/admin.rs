use crate::{
    config::AppConfig,
    guard::GuardPolicy,
    handlers,
    models::{AppKind, NavItem, Navigation},
    roles::{Role, RoleMap},
};

use super::{Application, RouteNode};

/// Admin console. Admins have no entry in the role map, so they are never
/// steered away from here; business and student accounts are.
pub fn application(config: &AppConfig) -> Application {
    let routes = RouteNode::layout("/", "admin_shell")
        .guarded(GuardPolicy::require_session(config.session_cookie.as_str()))
        .index(handlers::page("admin_dashboard"))
        .child(RouteNode::page("courses", "admin_courses"))
        .child(
            RouteNode::layout("courses/{course_id}", "course_editor")
                .index(handlers::page("admin_course"))
                .child(RouteNode::page("edit", "admin_course_edit")),
        )
        .child(RouteNode::page("companies", "companies"))
        .child(RouteNode::page("companies/{company_id}", "company"))
        .child(RouteNode::page("users", "users"));

    Application {
        kind: AppKind::Admin,
        prefix: "/admin",
        expected_role: Role::Admin,
        role_map: RoleMap::default(),
        routes,
        navigation: Navigation {
            main: vec![
                NavItem::new("Dashboard", "/admin"),
                NavItem::new("Courses", "/admin/courses"),
                NavItem::new("Companies", "/admin/companies"),
                NavItem::new("Users", "/admin/users"),
            ],
            secondary: Vec::new(),
        },
    }
}
