//! Navigation: resolve a path, then guard it

use super::access::AccessGuard;
use super::decision::{GuardOutcome, Redirect};
use super::routes::{normalize_path, RouteMatch, RouteTable};

/// What the rendering layer should show for a navigation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationOutcome<'a> {
    /// Render this route's view
    Render(RouteMatch<'a>),
    /// Session still resolving
    Loading,
    Redirect(Redirect),
    NotFound,
}

impl NavigationOutcome<'_> {
    /// Route name for `Render`, e.g. `"farm-detail"`
    pub fn rendered(&self) -> Option<&str> {
        match self {
            NavigationOutcome::Render(hit) => Some(hit.route.name.as_str()),
            _ => None,
        }
    }

    pub fn redirect(&self) -> Option<&Redirect> {
        match self {
            NavigationOutcome::Redirect(r) => Some(r),
            _ => None,
        }
    }
}

/// Wraps every protected route in the guard
pub struct Navigator {
    routes: RouteTable,
    guard: AccessGuard,
}

impl Navigator {
    pub fn new(routes: RouteTable, guard: AccessGuard) -> Self {
        Self { routes, guard }
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    pub fn guard(&self) -> &AccessGuard {
        &self.guard
    }

    /// Decide what to show for `path`
    ///
    /// Public routes render without looking at the session. The guard is
    /// consulted on every call, never cached.
    pub fn navigate(&self, path: &str) -> NavigationOutcome<'_> {
        let hit = match self.routes.resolve(path) {
            Some(hit) => hit,
            None => {
                log::debug!("No route for {}", normalize_path(path));
                return NavigationOutcome::NotFound;
            }
        };

        let requirement = match hit.route.requirement() {
            Some(requirement) => requirement,
            None => return NavigationOutcome::Render(hit),
        };

        match self.guard.check(requirement, Some(path)) {
            GuardOutcome::Allow => NavigationOutcome::Render(hit),
            GuardOutcome::Loading => NavigationOutcome::Loading,
            GuardOutcome::Redirect(redirect) => NavigationOutcome::Redirect(redirect),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rbac::{standard_table, User};
    use crate::session::SessionState;
    use std::sync::Arc;

    fn navigator(state: SessionState) -> Navigator {
        let guard = AccessGuard::new(Arc::new(state), Arc::new(standard_table()));
        Navigator::new(RouteTable::standard(), guard)
    }

    #[test]
    fn public_routes_render_while_loading() {
        let nav = navigator(SessionState::Unresolved);
        assert_eq!(nav.navigate("/login").rendered(), Some("login"));
        assert_eq!(nav.navigate("/farms"), NavigationOutcome::Loading);
    }

    #[test]
    fn signed_out_user_is_sent_to_login_with_return_path() {
        let nav = navigator(SessionState::Unauthenticated);
        let outcome = nav.navigate("/farms/12");
        assert_eq!(outcome.redirect().unwrap().location(), "/login?redirect=%2Ffarms%2F12");
    }

    #[test]
    fn technician_cannot_reach_user_management() {
        let tech = User::new("t1", "tech@example.com", "Tech", "technician");
        let nav = navigator(SessionState::Authenticated(tech));

        assert_eq!(nav.navigate("/users").redirect().unwrap().target, "/technician-dashboard");
        assert_eq!(nav.navigate("/farms/3").rendered(), Some("farm-detail"));
        assert_eq!(nav.navigate("/farms/new").redirect().unwrap().target, "/technician-dashboard");
    }

    #[test]
    fn unknown_path_is_not_found() {
        let nav = navigator(SessionState::Unauthenticated);
        assert_eq!(nav.navigate("/nowhere"), NavigationOutcome::NotFound);
    }
}
