//! Access evaluation and the session-aware guard

use super::decision::{is_safe_return_path, AccessDecision, GuardOutcome, Redirect};
use super::requirement::AccessRequirement;
use crate::audit::AccessAudit;
use crate::config::RbacConfig;
use crate::error::RbacError;
use crate::rbac::{role_home, PermissionChecker, PermissionTable, User};
use crate::session::{SessionState, SessionView};
use std::sync::Arc;

/// Decide whether `user` may see a route with `requirement`
///
/// Checks run in a fixed order: missing user, role set, permission. A user
/// record with a blank id counts as missing. Denied users are sent to their
/// role's home; unknown roles go to the generic dashboard.
pub fn evaluate(
    user: Option<&User>,
    requirement: &AccessRequirement,
    checker: &dyn PermissionChecker,
) -> AccessDecision {
    evaluate_for_path(user, requirement, checker, None)
}

/// `evaluate`, carrying `attempted_path` on login redirects when it is safe
pub fn evaluate_for_path(
    user: Option<&User>,
    requirement: &AccessRequirement,
    checker: &dyn PermissionChecker,
    attempted_path: Option<&str>,
) -> AccessDecision {
    let user = match user.filter(|u| u.is_identified()) {
        Some(user) => user,
        None => {
            let return_to = attempted_path.filter(|p| is_safe_return_path(p)).map(str::to_string);
            return AccessDecision::Redirect(Redirect::to_login(return_to));
        }
    };

    let satisfied = match requirement {
        AccessRequirement::NoneRequired => true,
        AccessRequirement::RequireRole(roles) => {
            user.known_role().is_some_and(|role| roles.contains(&role))
        }
        AccessRequirement::RequirePermission(permission) => {
            checker.has_permission(&user.role, *permission)
        }
    };

    if satisfied {
        AccessDecision::Allow
    } else {
        AccessDecision::Redirect(Redirect::forbidden(role_home(&user.role)))
    }
}

/// Route guard bound to a session and a permission source
///
/// Only reads the session. Calling `check` twice with the same session
/// state gives the same outcome.
#[derive(Clone)]
pub struct AccessGuard {
    session: Arc<dyn SessionView>,
    checker: Arc<dyn PermissionChecker>,
    audit: Option<Arc<AccessAudit>>,
    carry_return_path: bool,
}

impl AccessGuard {
    pub fn new(session: Arc<dyn SessionView>, checker: Arc<dyn PermissionChecker>) -> Self {
        Self { session, checker, audit: None, carry_return_path: true }
    }

    /// Guard over the configured permission table, with auditing if enabled
    pub fn from_config(
        session: Arc<dyn SessionView>,
        config: &RbacConfig,
    ) -> Result<Self, RbacError> {
        let table = PermissionTable::from_config(config)?;
        let mut guard =
            Self::new(session, Arc::new(table)).with_return_path(config.carry_return_path);
        if let Some(audit) = AccessAudit::from_config(config) {
            guard = guard.with_audit(Arc::new(audit));
        }
        Ok(guard)
    }

    pub fn with_audit(mut self, audit: Arc<AccessAudit>) -> Self {
        self.audit = Some(audit);
        self
    }

    /// Whether login redirects carry `?redirect=<attempted path>`
    pub fn with_return_path(mut self, enabled: bool) -> Self {
        self.carry_return_path = enabled;
        self
    }

    pub fn audit(&self) -> Option<&Arc<AccessAudit>> {
        self.audit.as_ref()
    }

    pub fn checker(&self) -> &Arc<dyn PermissionChecker> {
        &self.checker
    }

    /// Gate a protected route
    ///
    /// `Loading` while the session is unresolved; nothing redirects until
    /// the persisted credential has been checked.
    pub fn check(
        &self,
        requirement: &AccessRequirement,
        attempted_path: Option<&str>,
    ) -> GuardOutcome {
        let state = self.session.session_state();
        let user = match &state {
            SessionState::Unresolved => return GuardOutcome::Loading,
            other => other.user(),
        };

        let carried = attempted_path.filter(|_| self.carry_return_path);
        let decision = evaluate_for_path(user, requirement, self.checker.as_ref(), carried);

        if let AccessDecision::Redirect(redirect) = &decision {
            log::debug!(
                "Access denied ({}) to {} requiring {}; redirecting to {}",
                redirect.reason,
                attempted_path.unwrap_or("<unknown>"),
                requirement,
                redirect.target
            );
            if let Some(audit) = &self.audit {
                audit.record_denial(
                    user.filter(|u| u.is_identified()),
                    attempted_path,
                    requirement.to_string(),
                    redirect,
                );
            }
        }

        decision.into()
    }

    /// Whether role-conditional content should show for the current user
    ///
    /// Hidden while the session is unresolved. Not a security boundary.
    pub fn is_visible(&self, requirement: &AccessRequirement) -> bool {
        let state = self.session.session_state();
        super::visibility::is_visible(state.user(), requirement, self.checker.as_ref())
    }

    /// `content` when visible, otherwise the caller's `fallback`
    pub fn render_if<T>(&self, requirement: &AccessRequirement, content: T, fallback: T) -> T {
        if self.is_visible(requirement) {
            content
        } else {
            fallback
        }
    }

    /// Lazy form of `render_if`; only the chosen branch is built
    pub fn render_with<T>(
        &self,
        requirement: &AccessRequirement,
        content: impl FnOnce() -> T,
        fallback: impl FnOnce() -> T,
    ) -> T {
        if self.is_visible(requirement) {
            content()
        } else {
            fallback()
        }
    }
}
