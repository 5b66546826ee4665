pub mod clients;
pub mod dtos;
pub mod guards;
pub mod handlers;
pub mod routes;
pub mod services;

pub use clients::{AuthProvider, HttpAuthProvider, LocalAuthProvider};
pub use services::AuthService;
