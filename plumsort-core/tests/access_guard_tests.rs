//! Access guard tests
//!
//! These tests pin down the guard's observable behavior across every role,
//! permission and session state the dashboards can produce.

use plumsort_core::guard::{
    evaluate, AccessDecision, AccessGuard, AccessRequirement, DenialReason, GuardOutcome,
    NavigationOutcome, Navigator, RouteTable,
};
use plumsort_core::rbac::{role_home, standard_table, Permission, PermissionChecker, Role, User};
use plumsort_core::session::{
    IdentityProvider, InMemoryIdentityProvider, MemorySessionStore, NewAccount, SessionProvider,
    SessionState,
};
use std::collections::HashSet;
use std::sync::Arc;

fn user(role: &str) -> User {
    User::new(format!("id-{}", role), format!("{}@plumsort.test", role), "Test User", role)
}

fn guard(state: SessionState) -> AccessGuard {
    AccessGuard::new(Arc::new(state), Arc::new(standard_table()))
}

fn every_requirement() -> Vec<AccessRequirement> {
    let mut all = vec![AccessRequirement::NoneRequired];
    all.extend(Role::ALL.iter().map(|r| AccessRequirement::role(*r)));
    all.push(AccessRequirement::any_role([Role::Technician, Role::Admin]));
    all.extend(Permission::ALL.iter().map(|p| AccessRequirement::permission(*p)));
    all
}

/// Fake permission source granting exactly one permission to one role
struct SingleGrant(&'static str, Permission);

impl PermissionChecker for SingleGrant {
    fn has_permission(&self, role: &str, permission: Permission) -> bool {
        role == self.0 && permission == self.1
    }
}

#[test]
fn anonymous_user_is_sent_to_login_for_every_requirement() {
    for requirement in every_requirement() {
        let decision = evaluate(None, &requirement, standard_table());
        let redirect = decision.redirect().expect("anonymous access must redirect");
        assert_eq!(redirect.target, "/login", "{}", requirement);
        assert_eq!(redirect.reason, DenialReason::Unauthenticated);
    }
}

#[test]
fn admin_with_admin_role_requirement_is_allowed() {
    let decision =
        evaluate(Some(&user("admin")), &AccessRequirement::role(Role::Admin), standard_table());
    assert_eq!(decision, AccessDecision::Allow);
}

#[test]
fn farmer_with_admin_role_requirement_goes_to_farmer_dashboard() {
    let decision =
        evaluate(Some(&user("farmer")), &AccessRequirement::role(Role::Admin), standard_table());
    let redirect = decision.redirect().unwrap();
    assert_eq!(redirect.location(), "/farmer-dashboard");
    assert_eq!(redirect.reason, DenialReason::Forbidden);
}

#[test]
fn permissions_outside_the_table_are_never_granted() {
    let table = standard_table();
    for role in Role::ALL {
        let granted = table.permissions_for(role.as_str());
        let u = user(role.as_str());
        for permission in Permission::ALL {
            if !granted.contains(&permission) {
                assert!(!table.has_permission(Some(&u), permission), "{} {}", role, permission);
                let decision =
                    evaluate(Some(&u), &AccessRequirement::permission(permission), table);
                assert_eq!(decision.redirect().unwrap().target, role.home_path());
            }
        }
    }
}

#[test]
fn technician_cannot_manage_users() {
    let decision = evaluate(
        Some(&user("technician")),
        &AccessRequirement::permission(Permission::ManageUsers),
        standard_table(),
    );
    assert_eq!(decision.redirect().unwrap().target, "/technician-dashboard");
}

#[test]
fn admin_can_manage_users() {
    let decision = evaluate(
        Some(&user("admin")),
        &AccessRequirement::permission(Permission::ManageUsers),
        standard_table(),
    );
    assert!(decision.is_allowed());
}

#[test]
fn guard_is_idempotent() {
    let states = [
        SessionState::Unauthenticated,
        SessionState::Authenticated(user("farmer")),
        SessionState::Authenticated(user("technician")),
        SessionState::Authenticated(user("admin")),
        SessionState::Authenticated(user("intern")),
    ];
    for state in states {
        let g = guard(state);
        for requirement in every_requirement() {
            let first = g.check(&requirement, Some("/somewhere"));
            let second = g.check(&requirement, Some("/somewhere"));
            assert_eq!(first, second);
        }
    }
}

#[test]
fn unresolved_session_never_redirects() {
    let g = guard(SessionState::Unresolved);
    for requirement in every_requirement() {
        assert_eq!(g.check(&requirement, Some("/farms")), GuardOutcome::Loading);
    }

    let nav = Navigator::new(RouteTable::standard(), g);
    for route in RouteTable::standard().routes() {
        let outcome = nav.navigate(&route.pattern.replace(":id", "1"));
        assert!(outcome.redirect().is_none(), "{}", route);
    }
}

#[test]
fn unknown_roles_land_on_generic_dashboard() {
    assert_eq!(role_home("grower"), "/dashboard");
    assert_eq!(role_home(""), "/dashboard");

    let decision = evaluate(
        Some(&user("grower")),
        &AccessRequirement::permission(Permission::ViewDashboard),
        standard_table(),
    );
    assert_eq!(decision.redirect().unwrap().target, "/dashboard");
}

#[test]
fn redirect_targets_are_always_absolute_paths() {
    let roles = ["farmer", "technician", "admin", "", "ADMIN", "root", "  farmer  "];
    for role in roles {
        let u = user(role);
        for requirement in every_requirement() {
            if let AccessDecision::Redirect(r) = evaluate(Some(&u), &requirement, standard_table()) {
                assert!(r.target.starts_with('/'), "{:?}", r);
            }
        }
    }
}

#[test]
fn guard_consults_only_the_injected_checker() {
    let checker = SingleGrant("technician", Permission::ManageUsers);
    let requirement = AccessRequirement::permission(Permission::ManageUsers);

    assert!(evaluate(Some(&user("technician")), &requirement, &checker).is_allowed());
    assert!(!evaluate(Some(&user("admin")), &requirement, &checker).is_allowed());
}

#[test]
fn menus_only_link_to_routes_the_role_can_open() {
    let table = standard_table();
    let routes = RouteTable::standard();
    for role in Role::ALL {
        let state = SessionState::Authenticated(user(role.as_str()));
        let nav = Navigator::new(routes.clone(), guard(state));
        for item in table.menu_items_for(role.as_str()) {
            let outcome = nav.navigate(&item.path);
            assert!(
                matches!(outcome, NavigationOutcome::Render(_)),
                "{} menu item {} -> {:?}",
                role,
                item.path,
                outcome
            );
        }
    }
}

#[test]
fn menu_ids_are_unique_per_role() {
    for role in Role::ALL {
        let items = standard_table().menu_items_for(role.as_str());
        let ids: HashSet<_> = items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids.len(), items.len());
    }
}

#[tokio::test]
async fn guard_tracks_the_live_session() {
    let identity = Arc::new(InMemoryIdentityProvider::new());
    identity.add_account(user("farmer"), "windfall-plums").unwrap();
    identity
        .register(NewAccount {
            email: "ops@plumsort.test".into(),
            name: "Ops".into(),
            password: "sorting-line".into(),
            role: Role::Admin,
        })
        .await
        .unwrap();

    let provider = Arc::new(SessionProvider::new(Arc::new(MemorySessionStore::new()), identity));
    let g = AccessGuard::new(provider.clone(), Arc::new(standard_table()));
    let logs = AccessRequirement::permission(Permission::ViewSystemLogs);

    assert_eq!(g.check(&logs, Some("/system-logs")), GuardOutcome::Loading);

    provider.restore(None).await;
    assert_eq!(
        g.check(&logs, Some("/system-logs")).redirect().unwrap().location(),
        "/login?redirect=%2Fsystem-logs"
    );

    provider.login("farmer@plumsort.test", "windfall-plums").await.unwrap();
    assert_eq!(g.check(&logs, None).redirect().unwrap().target, "/farmer-dashboard");

    provider.logout().await.unwrap();
    provider.login("ops@plumsort.test", "sorting-line").await.unwrap();
    assert!(g.check(&logs, None).is_allowed());
}
