//! Role-conditional rendering
//!
//! Buttons, panels and menu links that only some roles should see go
//! through one predicate, the same one the route guard applies. Hiding
//! content is cosmetic; the routes behind it are guarded separately.

use super::access::evaluate;
use super::requirement::AccessRequirement;
use crate::rbac::{PermissionChecker, User};

/// Whether content gated by `requirement` should show for `user`
pub fn is_visible(
    user: Option<&User>,
    requirement: &AccessRequirement,
    checker: &dyn PermissionChecker,
) -> bool {
    evaluate(user, requirement, checker).is_allowed()
}

/// `content` when visible for `user`, otherwise `fallback`
pub fn render_if<T>(
    user: Option<&User>,
    requirement: &AccessRequirement,
    checker: &dyn PermissionChecker,
    content: T,
    fallback: T,
) -> T {
    if is_visible(user, requirement, checker) {
        content
    } else {
        fallback
    }
}
