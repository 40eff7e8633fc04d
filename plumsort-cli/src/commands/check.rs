use std::io::Write;
use std::sync::Arc;

use plumsort_core::config::PlumsortConfig;
use plumsort_core::guard::{AccessGuard, NavigationOutcome, Navigator, RouteTable};
use plumsort_core::rbac::{Role, User};
use plumsort_core::session::SessionState;

use super::write_err;

/// Run the guard for `path` as a user with `role` (or signed out).
pub fn run(
    config: &PlumsortConfig,
    path: &str,
    role: Option<&str>,
    out: &mut dyn Write,
) -> Result<(), String> {
    let state = match role {
        Some(role) => {
            // Operator input is lenient; unknown names pass through as stored roles
            let stored = Role::parse(role).map_or(role, |r| r.as_str());
            SessionState::Authenticated(User::new("cli", "cli@plumsort.local", "CLI", stored))
        }
        None => SessionState::Unauthenticated,
    };

    let guard = AccessGuard::from_config(Arc::new(state), &config.rbac)
        .map_err(|e| format!("invalid [rbac] configuration: {}", e))?;
    let navigator = Navigator::new(RouteTable::standard(), guard);

    let line = match navigator.navigate(path) {
        NavigationOutcome::Render(hit) => {
            let mut line = format!("allow     {} ({})", hit.route.name, hit.route.pattern);
            for (name, value) in &hit.params {
                line.push_str(&format!(" {}={}", name, value));
            }
            line
        }
        NavigationOutcome::Redirect(redirect) => {
            format!("redirect  {} [{}]", redirect.location(), redirect.reason)
        }
        NavigationOutcome::Loading => "loading".to_string(),
        NavigationOutcome::NotFound => format!("not found {}", path),
    };

    writeln!(out, "{}", line).map_err(write_err)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(path: &str, role: Option<&str>) -> String {
        let mut out: Vec<u8> = Vec::new();
        run(&PlumsortConfig::default(), path, role, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn technician_is_bounced_from_users() {
        assert_eq!(
            check("/users", Some("technician")),
            "redirect  /technician-dashboard [forbidden]\n"
        );
    }

    #[test]
    fn visitor_goes_to_login_with_return_path() {
        assert_eq!(
            check("/farms/9", None),
            "redirect  /login?redirect=%2Ffarms%2F9 [unauthenticated]\n"
        );
    }

    #[test]
    fn allowed_route_shows_params() {
        assert_eq!(
            check("/farms/9", Some("farmer")),
            "allow     farm-detail (/farms/:id) id=9\n"
        );
    }

    #[test]
    fn role_flag_ignores_case_but_unknown_roles_stay_unknown() {
        assert!(check("/users", Some("ADMIN")).starts_with("allow     users"));
        assert_eq!(check("/users", Some("grower")), "redirect  /dashboard [forbidden]\n");
    }

    #[test]
    fn public_and_unknown_paths() {
        assert!(check("/login", None).starts_with("allow     login"));
        assert_eq!(check("/nope", Some("admin")), "not found /nope\n");
    }
}
