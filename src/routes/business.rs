use crate::{
    config::AppConfig,
    guard::GuardPolicy,
    handlers,
    models::{AppKind, NavItem, Navigation},
    roles::{Role, RoleMap},
};

use super::{Application, RouteNode};

/// Business portal: license and employee management for company accounts.
pub fn application(config: &AppConfig) -> Application {
    let routes = RouteNode::layout("/", "business_shell")
        .guarded(GuardPolicy::require_session(config.session_cookie.as_str()))
        .index(handlers::page("business_dashboard"))
        .child(RouteNode::page("employees", "employees"))
        .child(RouteNode::page("licenses", "licenses"))
        .child(RouteNode::page("courses", "business_courses"))
        .child(RouteNode::page("courses/{course_id}", "business_course"))
        .child(RouteNode::page("checkout", "business_checkout"))
        .child(RouteNode::page("profile", "business_profile"));

    Application {
        kind: AppKind::Business,
        prefix: "/business",
        expected_role: Role::Business,
        role_map: RoleMap::default(),
        routes,
        navigation: Navigation {
            main: vec![
                NavItem::new("Dashboard", "/business"),
                NavItem::new("Employees", "/business/employees"),
                NavItem::new("Licenses", "/business/licenses"),
                NavItem::new("Courses", "/business/courses"),
            ],
            secondary: vec![NavItem::new("Profile", "/business/profile")],
        },
    }
}
