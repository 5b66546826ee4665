use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use utoipa::ToSchema;
use uuid::Uuid;

/// Role a profile acts under; fixed at registration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Citizen,
    Municipality,
    Hospital,
}

impl UserRole {
    pub fn display_name(self) -> &'static str {
        match self {
            UserRole::Citizen => "Citizen",
            UserRole::Municipality => "Municipality Representative",
            UserRole::Hospital => "Hospital Representative",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            UserRole::Citizen => "person.fill",
            UserRole::Municipality => "building.2.fill",
            UserRole::Hospital => "cross.case.fill",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserRole::Citizen => write!(f, "citizen"),
            UserRole::Municipality => write!(f, "municipality"),
            UserRole::Hospital => write!(f, "hospital"),
        }
    }
}

/// Locally cached identity. The credential is a SHA-256 digest of the
/// password, never the password itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: Uuid,
    pub email: String,
    pub credential: String,
    pub name: String,
    pub role: UserRole,
}

/// Hex-encoded SHA-256 of a password
pub fn credential_digest(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}

impl Profile {
    pub fn new(email: &str, password: &str, name: &str, role: UserRole) -> Self {
        Self {
            id: Uuid::new_v4(),
            email: email.trim().to_string(),
            credential: credential_digest(password),
            name: name.trim().to_string(),
            role,
        }
    }

    pub fn email_matches(&self, email: &str) -> bool {
        self.email.to_lowercase() == email.trim().to_lowercase()
    }

    pub fn password_matches(&self, password: &str) -> bool {
        self.credential == credential_digest(password)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credential_is_not_the_password() {
        let profile = Profile::new("a@b.ro", "secret1", "A", UserRole::Citizen);
        assert_ne!(profile.credential, "secret1");
        assert_eq!(profile.credential.len(), 64);
        assert!(profile.password_matches("secret1"));
        assert!(!profile.password_matches("Secret1"));
    }

    #[test]
    fn test_email_match_ignores_case_and_padding() {
        let profile = Profile::new(" Ana@Oras.ro ", "secret1", "Ana", UserRole::Citizen);
        assert_eq!(profile.email, "Ana@Oras.ro");
        assert!(profile.email_matches("ana@oras.ro"));
        assert!(profile.email_matches("ANA@ORAS.RO "));
        assert!(!profile.email_matches("ana@oras.com"));
    }

    #[test]
    fn test_role_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&UserRole::Municipality).unwrap(),
            "\"municipality\""
        );
        assert_eq!(UserRole::Hospital.display_name(), "Hospital Representative");
    }
}
