use crate::features::world::PlumsortWorld;
use cucumber::{given, then, when};
use plumsort_core::rbac::User;

// ==================== GIVEN ====================

#[given(expr = "an account {string} with password {string} and role {string}")]
fn given_account(world: &mut PlumsortWorld, email: String, password: String, role: String) {
    let id = format!("user-{}", world.identity.account_count() + 1);
    let user = User::new(id, email.clone(), "Scenario Account", role);
    world.identity.add_account(user, &password).expect("Failed to seed account");
}

#[given(expr = "the app has started without a saved session")]
async fn given_started(world: &mut PlumsortWorld) {
    let provider = world.start_provider();
    provider.restore(None).await;
}

// ==================== WHEN ====================

#[when(expr = "the user signs in as {string} with password {string}")]
async fn when_sign_in(world: &mut PlumsortWorld, email: String, password: String) {
    match world.provider().login(&email, &password).await {
        Ok(session) => {
            world.saved_token = Some(session.id);
            world.last_error = None;
        }
        Err(e) => world.last_error = Some(e.to_string()),
    }
}

#[when(expr = "the user signs out")]
async fn when_sign_out(world: &mut PlumsortWorld) {
    if let Err(e) = world.provider().logout().await {
        world.last_error = Some(e.to_string());
    }
}

#[when(expr = "the app restarts and restores the saved token")]
async fn when_restart(world: &mut PlumsortWorld) {
    let token = world.saved_token.clone();
    let provider = world.start_provider();
    provider.restore(token.as_deref()).await;
}

// ==================== THEN ====================

#[then(expr = "the sign-in fails with {string}")]
fn then_sign_in_failed(world: &mut PlumsortWorld, message: String) {
    let error = world.last_error.as_deref().expect("Sign-in unexpectedly succeeded");
    assert!(error.contains(&message), "{}", error);
}

#[then(expr = "the signed-in user has role {string}")]
fn then_user_role(world: &mut PlumsortWorld, role: String) {
    let user = world.provider().current_user().expect("No user signed in");
    assert_eq!(user.role, role);
}

#[then(expr = "nobody is signed in")]
fn then_signed_out(world: &mut PlumsortWorld) {
    let provider = world.provider();
    assert!(provider.is_resolved());
    assert!(provider.current_user().is_none());
}
