//! Category policy table: the fixed set of problem categories and the
//! label, icon, color, severity and deadline window each one implies.

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
