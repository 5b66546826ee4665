pub mod auth;
pub mod categories;
pub mod reports;
pub mod users;
