mod auth_provider;

pub use auth_provider::{AuthProvider, HttpAuthProvider, LocalAuthProvider};
#[cfg(test)]
pub use auth_provider::AuthToken;
