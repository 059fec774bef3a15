use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use utoipa::ToSchema;

/// AppKind
///
/// The three application surfaces served by the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum AppKind {
    Admin,
    Business,
    Web,
}

/// PageView
///
/// What a matched page renders to. The front-end picks the component by `page`
/// and wraps it in `layouts` (outermost first).
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct PageView {
    pub app: AppKind,
    pub page: String,
    pub layouts: Vec<String>,
    // Route parameters captured by the matched path, e.g. `course_id`.
    pub params: BTreeMap<String, String>,
    pub authenticated: bool,
}

/// NavItem
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct NavItem {
    pub label: String,
    pub path: String,
}

impl NavItem {
    pub fn new(label: &str, path: &str) -> Self {
        Self {
            label: label.to_string(),
            path: path.to_string(),
        }
    }
}

/// Navigation
///
/// Sidebar trees handed to the chrome. Order is display order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct Navigation {
    pub main: Vec<NavItem>,
    pub secondary: Vec<NavItem>,
}

/// IdentityPhase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum IdentityPhase {
    Loading,
    Resolved,
    Unavailable,
}

/// RoleCheck
///
/// Answer of the role-check endpoint. `redirect` is set only when the resolved
/// role belongs to another application surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct RoleCheck {
    pub status: IdentityPhase,
    pub role: Option<String>,
    pub redirect: Option<String>,
}
