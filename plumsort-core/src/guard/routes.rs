//! Route declarations
//!
//! Each route declares, once, whether it is public or which requirement
//! protects it. Patterns are matched segment by segment:
//!
//! - `/farms` matches exactly
//! - `/farms/:id` captures one segment as `id`
//! - `/docs/*` matches `/docs` and anything below it
//!
//! Query strings, fragments and trailing slashes are ignored. The first
//! matching declaration wins.

use super::requirement::AccessRequirement;
use crate::rbac::{Permission, Role};
use std::collections::BTreeMap;
use std::fmt;

/// How a route is reached
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteAccess {
    /// Rendered without consulting the session (login, register, ...)
    Public,
    /// Rendered only when the guard allows it
    Protected(AccessRequirement),
}

/// A path pattern with its access rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteDeclaration {
    /// View identifier handed to the rendering layer
    pub name: String,
    pub pattern: String,
    pub access: RouteAccess,
}

impl RouteDeclaration {
    pub fn public(name: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self { name: name.into(), pattern: pattern.into(), access: RouteAccess::Public }
    }

    pub fn protected(
        name: impl Into<String>,
        pattern: impl Into<String>,
        requirement: impl Into<AccessRequirement>,
    ) -> Self {
        Self {
            name: name.into(),
            pattern: pattern.into(),
            access: RouteAccess::Protected(requirement.into()),
        }
    }

    /// Requirement for protected routes; `None` for public ones
    pub fn requirement(&self) -> Option<&AccessRequirement> {
        match &self.access {
            RouteAccess::Protected(requirement) => Some(requirement),
            RouteAccess::Public => None,
        }
    }

    pub fn is_public(&self) -> bool {
        matches!(self.access, RouteAccess::Public)
    }

    /// Match `path`, returning captured parameters
    pub fn matches(&self, path: &str) -> Option<BTreeMap<String, String>> {
        let pattern = segments(&self.pattern);
        let path = segments(path);
        let mut params = BTreeMap::new();

        for (i, part) in pattern.iter().enumerate() {
            if *part == "*" && i + 1 == pattern.len() {
                return Some(params);
            }
            let actual = path.get(i)?;
            if let Some(name) = part.strip_prefix(':') {
                params.insert(name.to_string(), urlencoding::decode(actual).ok()?.into_owned());
            } else if part != actual {
                return None;
            }
        }

        (pattern.len() == path.len()).then_some(params)
    }
}

impl fmt::Display for RouteDeclaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.access {
            RouteAccess::Public => write!(f, "{} (public)", self.pattern),
            RouteAccess::Protected(requirement) => write!(f, "{} ({})", self.pattern, requirement),
        }
    }
}

/// Path without query or fragment, trailing slashes removed
pub fn normalize_path(path: &str) -> String {
    format!("/{}", segments(path).join("/"))
}

fn segments(path: &str) -> Vec<&str> {
    let bare = path.split(['?', '#']).next().unwrap_or_default();
    bare.split('/').filter(|s| !s.is_empty()).collect()
}

/// A resolved route
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch<'a> {
    pub route: &'a RouteDeclaration,
    pub params: BTreeMap<String, String>,
}

impl RouteMatch<'_> {
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }
}

/// Ordered set of route declarations
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: Vec<RouteDeclaration>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_route(mut self, route: RouteDeclaration) -> Self {
        self.routes.push(route);
        self
    }

    pub fn public(self, name: &str, pattern: &str) -> Self {
        self.with_route(RouteDeclaration::public(name, pattern))
    }

    pub fn protected(
        self,
        name: &str,
        pattern: &str,
        requirement: impl Into<AccessRequirement>,
    ) -> Self {
        self.with_route(RouteDeclaration::protected(name, pattern, requirement))
    }

    pub fn routes(&self) -> &[RouteDeclaration] {
        &self.routes
    }

    /// First declaration matching `path`
    pub fn resolve(&self, path: &str) -> Option<RouteMatch<'_>> {
        self.routes
            .iter()
            .find_map(|route| route.matches(path).map(|params| RouteMatch { route, params }))
    }

    /// The dashboards' route tree
    pub fn standard() -> Self {
        use Permission::*;

        Self::new()
            .public("login", "/login")
            .public("register", "/register")
            .public("forgot-password", "/forgot-password")
            .public("reset-password", "/reset-password")
            .protected("home", "/", AccessRequirement::NoneRequired)
            .protected("dashboard", "/dashboard", AccessRequirement::NoneRequired)
            .protected("farmer-dashboard", "/farmer-dashboard", Role::Farmer)
            .protected("technician-dashboard", "/technician-dashboard", Role::Technician)
            .protected("admin-dashboard", "/admin-dashboard", Role::Admin)
            .protected("farms", "/farms", ViewFarms)
            .protected("farm-create", "/farms/new", CreateFarm)
            .protected("farm-edit", "/farms/:id/edit", EditFarm)
            .protected("farm-detail", "/farms/:id", ViewFarms)
            .protected("batches", "/batches", ViewBatches)
            .protected("batch-create", "/batches/new", CreateBatch)
            .protected("batch-edit", "/batches/:id/edit", EditBatch)
            .protected("batch-detail", "/batches/:id", ViewBatches)
            .protected("classify", "/classify", ClassifyImages)
            .protected("results", "/results", ViewResults)
            .protected("result-detail", "/results/:id", ViewResults)
            .protected("reports", "/reports", ViewReports)
            .protected("notifications", "/notifications", ViewNotifications)
            .protected("users", "/users", ManageUsers)
            .protected("user-invite", "/users/invite", InviteUsers)
            .protected("system-logs", "/system-logs", ViewSystemLogs)
            .protected("settings", "/settings", ManageSettings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn params_and_trailing_slash() {
        let table = RouteTable::standard();
        let hit = table.resolve("/farms/42/?tab=batches").unwrap();
        assert_eq!(hit.route.name, "farm-detail");
        assert_eq!(hit.param("id"), Some("42"));
    }

    #[test]
    fn literal_segments_win_when_declared_first() {
        let table = RouteTable::standard();
        assert_eq!(table.resolve("/farms/new").unwrap().route.name, "farm-create");
        assert_eq!(table.resolve("/farms/7/edit").unwrap().route.name, "farm-edit");
    }

    #[test]
    fn wildcard_matches_prefix_by_segment() {
        let route = RouteDeclaration::protected("docs", "/docs/*", AccessRequirement::NoneRequired);
        assert!(route.matches("/docs").is_some());
        assert!(route.matches("/docs/guide/intro").is_some());
        assert!(route.matches("/docsearch").is_none());
    }

    #[test]
    fn params_are_percent_decoded() {
        let route = RouteDeclaration::protected("farm", "/farms/:id", Permission::ViewFarms);
        let params = route.matches("/farms/north%20orchard").unwrap();
        assert_eq!(params["id"], "north orchard");
    }

    #[test]
    fn unknown_paths_do_not_resolve() {
        let table = RouteTable::standard();
        assert!(table.resolve("/billing").is_none());
        assert!(table.resolve("/farms/1/edit/extra").is_none());
    }

    #[test]
    fn auth_pages_are_public_and_users_needs_manage_users() {
        let table = RouteTable::standard();
        for path in ["/login", "/register", "/forgot-password", "/reset-password?token=x"] {
            assert!(table.resolve(path).unwrap().route.is_public(), "{}", path);
        }
        assert_eq!(
            table.resolve("/users").unwrap().route.requirement(),
            Some(&AccessRequirement::RequirePermission(Permission::ManageUsers))
        );
    }

    #[test]
    fn normalizes_paths() {
        assert_eq!(normalize_path("/farms//3/?x=1"), "/farms/3");
        assert_eq!(normalize_path("/"), "/");
        assert_eq!(normalize_path(""), "/");
    }
}
