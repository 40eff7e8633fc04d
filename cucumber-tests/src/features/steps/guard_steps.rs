use crate::features::world::{Outcome, PlumsortWorld};
use cucumber::{given, then, when};
use plumsort_core::guard::AccessRequirement;
use plumsort_core::rbac::{Permission, Role};
use plumsort_core::session::SessionState;

fn parse_roles(list: &str) -> Vec<Role> {
    list.split(',')
        .map(|name| Role::parse(name).unwrap_or_else(|| panic!("Unknown role in scenario: {}", name)))
        .collect()
}

fn parse_permission(identifier: &str) -> Permission {
    Permission::parse(identifier)
        .unwrap_or_else(|| panic!("Unknown permission in scenario: {}", identifier))
}

// ==================== GIVEN ====================

#[given(expr = "no user is signed in")]
fn given_signed_out(world: &mut PlumsortWorld) {
    world.session_state = SessionState::Unauthenticated;
}

#[given(expr = "the session is still being restored")]
fn given_unresolved(world: &mut PlumsortWorld) {
    world.session_state = SessionState::Unresolved;
}

#[given(expr = "a signed-in user with role {string}")]
fn given_signed_in(world: &mut PlumsortWorld, role: String) {
    world.sign_in_fixed("bdd-user", &role);
}

#[given(expr = "a signed-in user with a blank id and role {string}")]
fn given_blank_user(world: &mut PlumsortWorld, role: String) {
    world.sign_in_fixed("", &role);
}

#[given(expr = "the {string} role is overridden to grant {string}")]
fn given_override(world: &mut PlumsortWorld, role: String, grants: String) {
    let identifiers = grants.split(',').map(|s| s.trim().to_string()).collect();
    world.config.rbac.roles.insert(role, identifiers);
}

#[given(expr = "return paths are not carried to the login page")]
fn given_no_return_path(world: &mut PlumsortWorld) {
    world.config.rbac.carry_return_path = false;
}

// ==================== WHEN ====================

#[when(expr = "the guard checks the role requirement {string}")]
fn when_check_roles(world: &mut PlumsortWorld, roles: String) {
    let requirement = AccessRequirement::any_role(parse_roles(&roles));
    let outcome = world.guard().check(&requirement, None);
    world.outcomes.push(outcome.into());
}

#[when(expr = "the guard checks the permission {string}")]
fn when_check_permission(world: &mut PlumsortWorld, permission: String) {
    let requirement = AccessRequirement::permission(parse_permission(&permission));
    let outcome = world.guard().check(&requirement, None);
    world.outcomes.push(outcome.into());
}

#[when(expr = "the guard checks the permission {string} {int} times")]
fn when_check_permission_repeatedly(world: &mut PlumsortWorld, permission: String, times: usize) {
    let requirement = AccessRequirement::permission(parse_permission(&permission));
    let guard = world.guard();
    for _ in 0..times {
        world.outcomes.push(guard.check(&requirement, None).into());
    }
}

#[when(expr = "the user opens {string}")]
fn when_open(world: &mut PlumsortWorld, path: String) {
    let navigator = world.navigator();
    let outcome: Outcome = navigator.navigate(&path).into();
    world.outcomes.push(outcome);
}

// ==================== THEN ====================

#[then(expr = "access is allowed")]
fn then_allowed(world: &mut PlumsortWorld) {
    assert_eq!(world.last_outcome(), &Outcome::Allow);
}

#[then(expr = "the user is redirected to {string}")]
fn then_redirected(world: &mut PlumsortWorld, expected: String) {
    match world.last_outcome() {
        Outcome::Redirect { location, .. } => assert_eq!(location, &expected),
        other => panic!("Expected a redirect to {}, got {:?}", expected, other),
    }
}

#[then(expr = "the denial reason is {string}")]
fn then_reason(world: &mut PlumsortWorld, expected: String) {
    match world.last_outcome() {
        Outcome::Redirect { reason, .. } => assert_eq!(reason, &expected),
        other => panic!("Expected a redirect, got {:?}", other),
    }
}

#[then(expr = "the page {string} is rendered")]
fn then_rendered(world: &mut PlumsortWorld, name: String) {
    assert_eq!(world.last_outcome(), &Outcome::Render(name));
}

#[then(expr = "the page is not found")]
fn then_not_found(world: &mut PlumsortWorld) {
    assert_eq!(world.last_outcome(), &Outcome::NotFound);
}

#[then(expr = "a loading state is shown")]
fn then_loading(world: &mut PlumsortWorld) {
    assert_eq!(world.last_outcome(), &Outcome::Loading);
}

#[then(expr = "no redirect was issued")]
fn then_no_redirect(world: &mut PlumsortWorld) {
    assert!(
        !world.outcomes.iter().any(|o| matches!(o, Outcome::Redirect { .. })),
        "Unexpected redirect in {:?}",
        world.outcomes
    );
}

#[then(expr = "every outcome is the same")]
fn then_all_same(world: &mut PlumsortWorld) {
    let first = world.outcomes.first().expect("No outcomes recorded");
    assert!(world.outcomes.iter().all(|o| o == first), "{:?}", world.outcomes);
}

#[then(expr = "{int} denial(s) is/are recorded")]
fn then_denials(world: &mut PlumsortWorld, count: usize) {
    assert_eq!(world.audit.len(), count, "{:?}", world.audit.records());
}
