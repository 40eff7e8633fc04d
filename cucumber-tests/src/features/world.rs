use cucumber::World as CucumberWorld;
use plumsort_core::audit::AccessAudit;
use plumsort_core::config::PlumsortConfig;
use plumsort_core::guard::{AccessGuard, GuardOutcome, NavigationOutcome, Navigator, RouteTable};
use plumsort_core::rbac::{PermissionTable, User};
use plumsort_core::session::{
    InMemoryIdentityProvider, MemorySessionStore, SessionProvider, SessionState, SessionView,
};
use std::sync::Arc;

/// What the last guard check or navigation produced, detached from the
/// route table it borrowed from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Allow,
    Render(String),
    Loading,
    Redirect { location: String, reason: String },
    NotFound,
}

impl From<GuardOutcome> for Outcome {
    fn from(outcome: GuardOutcome) -> Self {
        match outcome {
            GuardOutcome::Allow => Outcome::Allow,
            GuardOutcome::Loading => Outcome::Loading,
            GuardOutcome::Redirect(r) => {
                Outcome::Redirect { location: r.location(), reason: r.reason.to_string() }
            }
        }
    }
}

impl From<NavigationOutcome<'_>> for Outcome {
    fn from(outcome: NavigationOutcome<'_>) -> Self {
        match outcome {
            NavigationOutcome::Render(hit) => Outcome::Render(hit.route.name.clone()),
            NavigationOutcome::Loading => Outcome::Loading,
            NavigationOutcome::Redirect(r) => {
                Outcome::Redirect { location: r.location(), reason: r.reason.to_string() }
            }
            NavigationOutcome::NotFound => Outcome::NotFound,
        }
    }
}

#[derive(CucumberWorld)]
pub struct PlumsortWorld {
    pub config: PlumsortConfig,
    /// Fixed session used when no live provider is running
    pub session_state: SessionState,
    pub store: Arc<MemorySessionStore>,
    pub identity: Arc<InMemoryIdentityProvider>,
    /// Live provider for sign-in scenarios
    pub provider: Option<Arc<SessionProvider>>,
    pub audit: Arc<AccessAudit>,
    pub outcomes: Vec<Outcome>,
    pub saved_token: Option<String>,
    pub last_error: Option<String>,
}

impl std::fmt::Debug for PlumsortWorld {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlumsortWorld")
            .field("session_state", &self.session_state)
            .field("provider", &self.provider.as_ref().map(|p| p.state()))
            .field("outcomes", &self.outcomes)
            .field("saved_token", &self.saved_token)
            .field("last_error", &self.last_error)
            .finish()
    }
}

impl Default for PlumsortWorld {
    fn default() -> Self {
        Self {
            config: PlumsortConfig::default(),
            session_state: SessionState::Unresolved,
            store: Arc::new(MemorySessionStore::new()),
            identity: Arc::new(InMemoryIdentityProvider::new()),
            provider: None,
            audit: Arc::new(AccessAudit::new(64)),
            outcomes: Vec::new(),
            saved_token: None,
            last_error: None,
        }
    }
}

impl PlumsortWorld {
    /// Guard over the live provider if one is running, else the fixed state
    pub fn guard(&self) -> AccessGuard {
        let session: Arc<dyn SessionView> = match &self.provider {
            Some(provider) => provider.clone(),
            None => Arc::new(self.session_state.clone()),
        };
        let table =
            PermissionTable::from_config(&self.config.rbac).expect("Invalid RBAC override in scenario");
        AccessGuard::new(session, Arc::new(table))
            .with_audit(self.audit.clone())
            .with_return_path(self.config.rbac.carry_return_path)
    }

    pub fn navigator(&self) -> Navigator {
        Navigator::new(RouteTable::standard(), self.guard())
    }

    /// Start a fresh provider on the shared store, as an app restart would
    pub fn start_provider(&mut self) -> Arc<SessionProvider> {
        let provider = Arc::new(SessionProvider::new(self.store.clone(), self.identity.clone()));
        self.provider = Some(provider.clone());
        provider
    }

    pub fn provider(&self) -> Arc<SessionProvider> {
        self.provider.clone().expect("No session provider started in this scenario")
    }

    pub fn sign_in_fixed(&mut self, id: &str, role: &str) {
        let user = User::new(id, format!("{}@plumsort.test", role), "Scenario User", role);
        self.session_state = SessionState::Authenticated(user);
    }

    pub fn last_outcome(&self) -> &Outcome {
        self.outcomes.last().expect("No guard check or navigation happened yet")
    }
}
