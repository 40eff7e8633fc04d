//! PlumSort - Core
//!
//! Role-based access control and route protection for the PlumSort
//! plum-sorting dashboards.
//!
//! # Overview
//!
//! Farmers, technicians and administrators share one dashboard shell. This
//! crate decides who may see which page: it holds the static role ->
//! permission table, the single authoritative session, and the guard every
//! protected route goes through.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use plumsort_core::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let app = PlumsortApp::builder()
//!         .with_config(PlumsortConfig::load()?)
//!         .start(None)
//!         .await?;
//!
//!     match app.navigator().navigate("/farms/12") {
//!         NavigationOutcome::Render(route) => println!("render {}", route.route.name),
//!         NavigationOutcome::Redirect(r) => println!("go to {}", r.location()),
//!         NavigationOutcome::Loading => println!("loading"),
//!         NavigationOutcome::NotFound => println!("404"),
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! Leaves first:
//!
//! - [`rbac`] - Roles, permissions, the permission table and menus
//! - [`session`] - Session provider, stores and identity providers
//! - [`guard`] - Access evaluation, the route guard and the navigator
//! - [`audit`] - In-memory log of denied navigations
//! - [`app`] - Wires the above from a [`config::PlumsortConfig`]
//!
//! Ambient: [`config`] (TOML + `PLUMSORT_*` env vars), [`logging`] (the
//! `log` facade with human, JSON and logfmt output) and [`error`].

pub mod app;
pub mod audit;
pub mod config; // Configuration system with TOML support
pub mod error;
pub mod guard; // Route protection
pub mod logging; // Declarative logging system with standard log crate integration
pub mod rbac; // Role-Based Access Control system
pub mod session; // Session provider and stores

// Prelude module for convenient imports
pub mod prelude;

// Re-exports of main types and traits
pub use app::{PlumsortApp, PlumsortAppBuilder};
pub use audit::{AccessAudit, DenialRecord};
pub use config::PlumsortConfig;
pub use error::{AuthError, AuthResult, PasswordError, RbacError};
pub use guard::{
    evaluate, AccessDecision, AccessGuard, AccessRequirement, GuardOutcome, NavigationOutcome,
    Navigator, Redirect, RouteTable,
};
pub use rbac::{
    role_home, standard_table, Permission, PermissionChecker, PermissionTable, Role, User,
};
pub use session::{SessionProvider, SessionState, SessionView};
