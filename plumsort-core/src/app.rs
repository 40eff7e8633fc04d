//! PlumSort access layer - one object wiring sessions, guard and routes
//!
//! `PlumsortApp` owns the pieces a dashboard shell needs:
//! - the session store and identity provider
//! - the single `SessionProvider`
//! - an `AccessGuard` over the configured permission table
//! - a `Navigator` over the route table
//!
//! # Example
//!
//! ```no_run
//! use plumsort_core::app::PlumsortApp;
//! use plumsort_core::config::PlumsortConfig;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let app = PlumsortApp::builder()
//!     .with_config(PlumsortConfig::load()?)
//!     .start(None)
//!     .await?;
//!
//! let outcome = app.navigator().navigate("/farms");
//! # Ok(())
//! # }
//! ```

use crate::audit::AccessAudit;
use crate::config::PlumsortConfig;
use crate::guard::{AccessGuard, Navigator, RouteTable};
use crate::logging::init_logging;
use crate::rbac::PermissionTable;
use crate::session::{
    open_store, IdentityProvider, InMemoryIdentityProvider, SessionManager, SessionManagerConfig,
    SessionProvider, SessionStore, SessionView,
};
use anyhow::{Context, Result};
use std::sync::Arc;

/// Builder for `PlumsortApp`
pub struct PlumsortAppBuilder {
    config: PlumsortConfig,
    store: Option<Arc<dyn SessionStore>>,
    identity: Option<Arc<dyn IdentityProvider>>,
    routes: Option<RouteTable>,
    init_logging: bool,
}

impl Default for PlumsortAppBuilder {
    fn default() -> Self {
        Self {
            config: PlumsortConfig::default(),
            store: None,
            identity: None,
            routes: None,
            init_logging: true,
        }
    }
}

impl PlumsortAppBuilder {
    pub fn with_config(mut self, config: PlumsortConfig) -> Self {
        self.config = config;
        self
    }

    /// Use this store instead of the one named in `[sessions] store`
    pub fn with_store(mut self, store: Arc<dyn SessionStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn with_identity(mut self, identity: Arc<dyn IdentityProvider>) -> Self {
        self.identity = Some(identity);
        self
    }

    /// Replace the standard route table
    pub fn with_routes(mut self, routes: RouteTable) -> Self {
        self.routes = Some(routes);
        self
    }

    /// Skip installing the global logger in `start`
    pub fn without_logging(mut self) -> Self {
        self.init_logging = false;
        self
    }

    /// Wire everything up without touching the runtime
    ///
    /// No cleanup task runs and the session stays `Unresolved`.
    pub fn build(self) -> Result<PlumsortApp> {
        let config = self.config;
        config.validate()?;

        let store = match self.store {
            Some(store) => store,
            None => open_store(&config.sessions).context("Failed to open session store")?,
        };
        let identity = self
            .identity
            .unwrap_or_else(|| Arc::new(InMemoryIdentityProvider::from_config(&config.sessions)));

        let session = Arc::new(SessionProvider::from_config(
            Arc::clone(&store),
            identity,
            &config.sessions,
        ));

        let table = PermissionTable::from_config(&config.rbac)?;
        let mut guard = AccessGuard::new(
            Arc::clone(&session) as Arc<dyn SessionView>,
            Arc::new(table),
        )
        .with_return_path(config.rbac.carry_return_path);
        if let Some(audit) = AccessAudit::from_config(&config.rbac) {
            guard = guard.with_audit(Arc::new(audit));
        }

        let navigator =
            Navigator::new(self.routes.unwrap_or_else(RouteTable::standard), guard.clone());

        Ok(PlumsortApp { config, store, session, guard, navigator, cleanup: None })
    }

    /// Build, start the expired-session cleanup and restore the session
    pub async fn start(self, token: Option<&str>) -> Result<PlumsortApp> {
        if self.init_logging {
            init_logging(&self.config.logging.to_logging_config()?)?;
        }

        let mut app = self.build()?;
        let manager_config = SessionManagerConfig::from_sessions_config(&app.config.sessions);
        app.cleanup = Some(SessionManager::with_config(Arc::clone(&app.store), manager_config));

        let state = app.session.restore(token).await;
        log::info!(
            "PlumSort access layer started ({} routes, session {})",
            app.navigator.routes().routes().len(),
            if state.user().is_some() { "restored" } else { "signed out" }
        );
        Ok(app)
    }
}

/// The assembled access layer
pub struct PlumsortApp {
    config: PlumsortConfig,
    store: Arc<dyn SessionStore>,
    session: Arc<SessionProvider>,
    guard: AccessGuard,
    navigator: Navigator,
    cleanup: Option<SessionManager<Arc<dyn SessionStore>>>,
}

impl PlumsortApp {
    pub fn builder() -> PlumsortAppBuilder {
        PlumsortAppBuilder::default()
    }

    pub fn config(&self) -> &PlumsortConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<dyn SessionStore> {
        &self.store
    }

    pub fn session(&self) -> &Arc<SessionProvider> {
        &self.session
    }

    pub fn guard(&self) -> &AccessGuard {
        &self.guard
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn audit(&self) -> Option<&Arc<AccessAudit>> {
        self.guard.audit()
    }

    /// Whether the background cleanup task is running
    pub fn has_cleanup_task(&self) -> bool {
        self.cleanup.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::guard::NavigationOutcome;
    use crate::rbac::{Role, User};
    use crate::session::{MemorySessionStore, NewAccount, SessionState};

    #[tokio::test]
    async fn navigation_follows_sign_in_and_out() {
        let identity = Arc::new(InMemoryIdentityProvider::new());
        identity
            .register(NewAccount {
                email: "admin@example.com".into(),
                name: "Admin".into(),
                password: "orchard-admin".into(),
                role: Role::Admin,
            })
            .await
            .unwrap();

        let app = PlumsortApp::builder()
            .with_identity(identity)
            .without_logging()
            .start(None)
            .await
            .unwrap();
        assert!(app.has_cleanup_task());

        assert!(app.navigator().navigate("/users").redirect().is_some());

        app.session().login("admin@example.com", "orchard-admin").await.unwrap();
        assert_eq!(app.navigator().navigate("/users").rendered(), Some("users"));

        app.session().logout().await.unwrap();
        let outcome = app.navigator().navigate("/users");
        assert_eq!(outcome.redirect().unwrap().location(), "/login?redirect=%2Fusers");
        assert_eq!(app.audit().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn built_app_waits_for_restore() {
        let app = PlumsortApp::builder().build().unwrap();
        assert!(!app.has_cleanup_task());
        assert_eq!(app.navigator().navigate("/dashboard"), NavigationOutcome::Loading);

        app.session().restore(Some("unknown-token")).await;
        assert_eq!(app.session().state(), SessionState::Unauthenticated);
    }

    #[tokio::test]
    async fn restores_from_supplied_store() {
        let store = Arc::new(MemorySessionStore::new());
        let user = User::new("f1", "grower@example.com", "Grower", "farmer");
        let session = crate::session::Session::issue(user, chrono::Duration::hours(1));
        store.set(session.clone()).await.unwrap();

        let app = PlumsortApp::builder()
            .with_store(store)
            .without_logging()
            .start(Some(&session.id))
            .await
            .unwrap();

        assert_eq!(app.navigator().navigate("/farms/new").rendered(), Some("farm-create"));
        let denied = app.navigator().navigate("/admin-dashboard");
        assert_eq!(denied.redirect().unwrap().target, "/farmer-dashboard");
    }

    #[test]
    fn invalid_override_fails_build() {
        let mut config = PlumsortConfig::default();
        config.rbac.roles.insert("grower".into(), vec!["view_farms".into()]);
        assert!(PlumsortApp::builder().with_config(config).build().is_err());
    }
}
