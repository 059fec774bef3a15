use std::{collections::BTreeMap, fmt};

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use utoipa::ToSchema;

use crate::identity::Identity;

/// Role
///
/// Closed set of audiences. Each application surface declares the one it expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum Role {
    Admin,
    Business,
    Student,
}

impl Role {
    /// parse
    ///
    /// ASCII case-insensitive, since the API reports roles in either case.
    /// Anything outside the closed set is `None` ("no opinion").
    pub fn parse(raw: &str) -> Option<Role> {
        let raw = raw.trim();
        [Role::Admin, Role::Business, Role::Student]
            .into_iter()
            .find(|role| role.as_str().eq_ignore_ascii_case(raw))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Business => "business",
            Role::Student => "student",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// RoleMap
///
/// Non-default roles mapped to the root of the application meant for them.
/// Admin has no entry: it is the default context and never gets steered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleMap {
    routes: BTreeMap<Role, String>,
}

impl RoleMap {
    pub fn empty() -> Self {
        Self {
            routes: BTreeMap::new(),
        }
    }

    pub fn with(mut self, role: Role, path: impl Into<String>) -> Self {
        self.routes.insert(role, path.into());
        self
    }

    pub fn path_for(&self, role: Role) -> Option<&str> {
        self.routes.get(&role).map(String::as_str)
    }
}

impl Default for RoleMap {
    fn default() -> Self {
        Self::empty()
            .with(Role::Business, "/business")
            .with(Role::Student, "/dashboard")
    }
}

/// role_redirect
///
/// Pure decision behind the role redirector:
/// - no role, or a role without a mapping: `None`
/// - mapped role equal to the expected one: `None`
/// - mapped role differing from the expected one: the mapped path
pub fn role_redirect(role: Option<Role>, expected: Role, map: &RoleMap) -> Option<&str> {
    let role = role?;
    let target = map.path_for(role)?;
    (role != expected).then_some(target)
}

/// IdentityStatus
///
/// What the data-fetching layer currently knows about the signed-in user.
#[derive(Debug, Clone)]
pub enum IdentityStatus {
    Loading,
    Resolved(Identity),
    Unavailable,
}

impl IdentityStatus {
    pub fn role(&self) -> Option<Role> {
        match self {
            IdentityStatus::Resolved(identity) => identity.parsed_role(),
            _ => None,
        }
    }
}

/// RoleRedirector
///
/// Stateful wrapper for hosts that re-run the check on every identity update.
/// It stays silent until the identity resolves and emits each target at most
/// once while the (role, expected role) pair is unchanged.
#[derive(Debug, Clone)]
pub struct RoleRedirector {
    expected: Role,
    map: RoleMap,
    issued: Option<String>,
}

impl RoleRedirector {
    pub fn new(expected: Role, map: RoleMap) -> Self {
        Self {
            expected,
            map,
            issued: None,
        }
    }

    pub fn expected(&self) -> Role {
        self.expected
    }

    /// observe
    ///
    /// Returns the navigation to perform for this update, if any.
    pub fn observe(&mut self, status: &IdentityStatus) -> Option<String> {
        let IdentityStatus::Resolved(_) = status else {
            return None;
        };

        match role_redirect(status.role(), self.expected, &self.map) {
            Some(target) if self.issued.as_deref() == Some(target) => None,
            Some(target) => {
                self.issued = Some(target.to_string());
                self.issued.clone()
            }
            None => {
                self.issued = None;
                None
            }
        }
    }
}
