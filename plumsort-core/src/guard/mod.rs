//! Route protection
//!
//! The guard turns `(session, route requirement)` into one of three
//! outcomes: keep waiting, render, or redirect. Unauthenticated users go to
//! `/login`; signed-in users who lack access go to their role's home page.
//!
//! # Example
//! ```rust,ignore
//! use plumsort_core::guard::{AccessGuard, AccessRequirement, GuardOutcome};
//! use plumsort_core::rbac::{standard_table, Role, User};
//! use plumsort_core::session::SessionState;
//! use std::sync::Arc;
//!
//! let farmer = User::new("u1", "grower@example.com", "Grower", "farmer");
//! let guard = AccessGuard::new(
//!     Arc::new(SessionState::Authenticated(farmer)),
//!     Arc::new(standard_table()),
//! );
//! let outcome = guard.check(&AccessRequirement::role(Role::Admin), Some("/users"));
//! assert_eq!(outcome.redirect().unwrap().target, "/farmer-dashboard");
//! ```

mod access;
mod decision;
mod navigator;
mod requirement;
mod routes;
mod visibility;

pub use access::{evaluate, evaluate_for_path, AccessGuard};
pub use decision::{
    is_safe_return_path, AccessDecision, DenialReason, GuardOutcome, Redirect, LOGIN_PATH,
    RETURN_PARAM,
};
pub use navigator::{NavigationOutcome, Navigator};
pub use requirement::AccessRequirement;
pub use routes::{normalize_path, RouteAccess, RouteDeclaration, RouteMatch, RouteTable};
pub use visibility::{is_visible, render_if};
