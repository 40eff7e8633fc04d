use crate::features::world::PlumsortWorld;
use cucumber::then;
use plumsort_core::rbac::PermissionTable;

fn menu_paths(world: &PlumsortWorld, role: &str) -> Vec<String> {
    let table =
        PermissionTable::from_config(&world.config.rbac).expect("Invalid RBAC override in scenario");
    table.menu_items_for(role).iter().map(|item| item.path.clone()).collect()
}

#[then(expr = "the menu for {string} links to {string}")]
fn then_menu_links(world: &mut PlumsortWorld, role: String, path: String) {
    let paths = menu_paths(world, &role);
    assert!(paths.contains(&path), "{} menu {:?} lacks {}", role, paths, path);
}

#[then(expr = "the menu for {string} does not link to {string}")]
fn then_menu_omits(world: &mut PlumsortWorld, role: String, path: String) {
    let paths = menu_paths(world, &role);
    assert!(!paths.contains(&path), "{} menu {:?} should not list {}", role, paths, path);
}

#[then(expr = "the menu for {string} is empty")]
fn then_menu_empty(world: &mut PlumsortWorld, role: String) {
    assert!(menu_paths(world, &role).is_empty());
}

#[then(expr = "the menu for {string} starts with {string}")]
fn then_menu_first(world: &mut PlumsortWorld, role: String, path: String) {
    assert_eq!(menu_paths(world, &role).first(), Some(&path));
}
