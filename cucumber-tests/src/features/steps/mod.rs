pub mod guard_steps;
pub mod menu_steps;
pub mod session_steps;
