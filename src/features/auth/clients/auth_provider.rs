use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::config::AuthProviderConfig;
use crate::core::error::{AppError, Result};

/// Opaque session token handed back to the client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthToken {
    pub token: String,
}

/// External identity service that owns credentials
#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthToken>;

    async fn sign_up(&self, email: &str, password: &str, name: &str) -> Result<AuthToken>;

    /// Whether `sign_in` actually checks the password. When it does not,
    /// the local credential digest is the only check.
    fn verifies_credentials(&self) -> bool {
        true
    }
}

#[derive(Debug, Serialize)]
struct SignInRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct SignUpRequest<'a> {
    email: &'a str,
    password: &'a str,
    name: &'a str,
}

#[derive(Debug, Deserialize)]
struct ProviderErrorResponse {
    #[serde(default)]
    message: String,
}

/// Identity service reached over HTTP. Expects `POST {url}/sign-in` and
/// `POST {url}/sign-up` answering `{"token": "..."}`.
pub struct HttpAuthProvider {
    base_url: String,
    api_key: Option<String>,
    http_client: reqwest::Client,
}

impl HttpAuthProvider {
    pub fn new(base_url: String, api_key: Option<String>, timeout: Duration) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            base_url,
            api_key,
            http_client,
        })
    }

    pub fn from_config(config: &AuthProviderConfig) -> Result<Option<Self>> {
        config
            .url
            .clone()
            .map(|url| Self::new(url, config.api_key.clone(), config.timeout))
            .transpose()
    }

    async fn post<B: Serialize + Sync>(&self, path: &str, body: &B, email: &str) -> Result<AuthToken> {
        let url = format!("{}/{}", self.base_url, path);

        let mut request = self.http_client.post(&url).json(body);
        if let Some(api_key) = &self.api_key {
            request = request.header("x-api-key", api_key);
        }

        let response = request.send().await.map_err(|e| {
            tracing::error!("Identity provider unreachable at {}: {}", url, e);
            AppError::ExternalServiceError(format!("Identity provider unreachable: {}", e))
        })?;

        let status = response.status();
        if status.is_success() {
            return response.json::<AuthToken>().await.map_err(|e| {
                tracing::error!("Failed to parse identity provider response: {}", e);
                AppError::ExternalServiceError(format!("Invalid identity provider response: {}", e))
            });
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ProviderErrorResponse>(&body)
            .map(|e| e.message)
            .unwrap_or_default();

        match status.as_u16() {
            400 | 401 | 403 => Err(AppError::Unauthorized("Invalid credentials".to_string())),
            409 => Err(AppError::DuplicateEmail(email.to_string())),
            422 => Err(AppError::Validation(if message.is_empty() {
                "Rejected by identity provider".to_string()
            } else {
                message
            })),
            _ => {
                tracing::error!("Identity provider error: HTTP {} - {}", status, body);
                Err(AppError::ExternalServiceError(format!(
                    "Identity provider error: HTTP {}",
                    status
                )))
            }
        }
    }
}

#[async_trait]
impl AuthProvider for HttpAuthProvider {
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthToken> {
        tracing::debug!("Signing in {} with identity provider", email);
        self.post("sign-in", &SignInRequest { email, password }, email)
            .await
    }

    async fn sign_up(&self, email: &str, password: &str, name: &str) -> Result<AuthToken> {
        tracing::debug!("Signing up {} with identity provider", email);
        self.post(
            "sign-up",
            &SignUpRequest {
                email,
                password,
                name,
            },
            email,
        )
        .await
    }
}

/// Stand-in for development: every request succeeds with a fresh token
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalAuthProvider;

#[async_trait]
impl AuthProvider for LocalAuthProvider {
    async fn sign_in(&self, _email: &str, _password: &str) -> Result<AuthToken> {
        Ok(AuthToken {
            token: format!("local-{}", Uuid::new_v4()),
        })
    }

    async fn sign_up(&self, _email: &str, _password: &str, _name: &str) -> Result<AuthToken> {
        Ok(AuthToken {
            token: format!("local-{}", Uuid::new_v4()),
        })
    }

    fn verifies_credentials(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_local_tokens_are_unique() {
        let provider = LocalAuthProvider;
        let first = provider.sign_in("a@b.ro", "secret1").await.unwrap();
        let second = provider.sign_up("a@b.ro", "secret1", "A").await.unwrap();

        assert!(first.token.starts_with("local-"));
        assert_ne!(first, second);
        assert!(!provider.verifies_credentials());
    }

    #[test]
    fn test_http_provider_only_when_configured() {
        let mut config = AuthProviderConfig {
            url: None,
            api_key: None,
            timeout: Duration::from_secs(1),
        };
        assert!(HttpAuthProvider::from_config(&config).unwrap().is_none());

        config.url = Some("http://127.0.0.1:9".to_string());
        let provider = HttpAuthProvider::from_config(&config).unwrap().unwrap();
        assert!(provider.verifies_credentials());
    }

    #[tokio::test]
    async fn test_unreachable_provider_is_external_error() {
        let provider =
            HttpAuthProvider::new("http://127.0.0.1:9".to_string(), None, Duration::from_secs(1))
                .unwrap();
        let result = provider.sign_in("a@b.ro", "secret1").await;
        assert!(matches!(result, Err(AppError::ExternalServiceError(_))));
    }
}
