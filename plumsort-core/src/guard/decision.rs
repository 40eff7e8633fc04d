//! Guard outcomes

use serde::Serialize;
use std::fmt;

/// Where unauthenticated users are sent
pub const LOGIN_PATH: &str = "/login";

/// Query parameter carrying the attempted path on login redirects
pub const RETURN_PARAM: &str = "redirect";

/// Why a navigation was turned away; logged and audited, never shown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DenialReason {
    /// No signed-in user
    Unauthenticated,
    /// Signed in, but the role or its permissions do not satisfy the route
    Forbidden,
}

impl fmt::Display for DenialReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DenialReason::Unauthenticated => f.write_str("unauthenticated"),
            DenialReason::Forbidden => f.write_str("forbidden"),
        }
    }
}

/// A redirect issued by the guard
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    /// Path to navigate to
    pub target: String,
    pub reason: DenialReason,
    /// Attempted path, carried on login redirects so sign-in can return there
    pub return_to: Option<String>,
}

impl Redirect {
    pub fn to_login(return_to: Option<String>) -> Self {
        Self { target: LOGIN_PATH.to_string(), reason: DenialReason::Unauthenticated, return_to }
    }

    pub fn forbidden(home: &str) -> Self {
        Self { target: home.to_string(), reason: DenialReason::Forbidden, return_to: None }
    }

    /// Full location, e.g. `/login?redirect=%2Ffarms%2F12`
    pub fn location(&self) -> String {
        match &self.return_to {
            Some(path) => {
                format!("{}?{}={}", self.target, RETURN_PARAM, urlencoding::encode(path))
            }
            None => self.target.clone(),
        }
    }
}

/// Result of evaluating a requirement against a resolved session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessDecision {
    Allow,
    Redirect(Redirect),
}

impl AccessDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, AccessDecision::Allow)
    }

    pub fn redirect(&self) -> Option<&Redirect> {
        match self {
            AccessDecision::Redirect(r) => Some(r),
            AccessDecision::Allow => None,
        }
    }
}

/// What the route layer should do with a protected route
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardOutcome {
    /// Session still resolving; show a neutral loading state
    Loading,
    Allow,
    Redirect(Redirect),
}

impl GuardOutcome {
    pub fn is_allowed(&self) -> bool {
        matches!(self, GuardOutcome::Allow)
    }

    pub fn redirect(&self) -> Option<&Redirect> {
        match self {
            GuardOutcome::Redirect(r) => Some(r),
            _ => None,
        }
    }
}

impl From<AccessDecision> for GuardOutcome {
    fn from(decision: AccessDecision) -> Self {
        match decision {
            AccessDecision::Allow => GuardOutcome::Allow,
            AccessDecision::Redirect(r) => GuardOutcome::Redirect(r),
        }
    }
}

/// Whether `path` may be carried back through the login page
///
/// Only same-origin absolute paths without control characters qualify, and
/// never the login page itself.
pub fn is_safe_return_path(path: &str) -> bool {
    let bare = path.split(['?', '#']).next().unwrap_or_default();
    path.starts_with('/')
        && !path.starts_with("//")
        && !path.contains('\\')
        && !path.chars().any(|c| c.is_ascii_control())
        && bare.trim_end_matches('/') != LOGIN_PATH
}
