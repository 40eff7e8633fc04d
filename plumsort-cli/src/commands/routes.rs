use std::io::Write;

use plumsort_core::guard::{RouteAccess, RouteTable};

use super::write_err;

/// Print the route table in match order.
pub fn run(out: &mut dyn Write) -> Result<(), String> {
    for route in RouteTable::standard().routes() {
        let access = match &route.access {
            RouteAccess::Public => "public".to_string(),
            RouteAccess::Protected(requirement) => requirement.to_string(),
        };
        writeln!(out, "{:<24} {:<22} {}", route.pattern, route.name, access).map_err(write_err)?;
    }
    Ok(())
}
