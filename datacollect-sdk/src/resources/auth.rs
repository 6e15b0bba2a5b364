//! Token endpoint client

use crate::client::HttpClient;
use crate::error::SdkResult;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Client for the token endpoint
#[derive(Debug, Clone)]
pub struct AuthClient {
    client: Arc<HttpClient>,
}

impl AuthClient {
    /// Create a new auth client
    pub fn new(client: Arc<HttpClient>) -> Self {
        Self { client }
    }

    /// Exchange a login and password for a bearer token
    pub async fn token(&self, login: &str, password: &str) -> SdkResult<TokenResponse> {
        let request = TokenRequest {
            login: login.to_string(),
            password: password.to_string(),
        };
        self.client.post("/api/auth/token", request).await
    }
}

/// Credentials sent to the token endpoint
#[derive(Clone, Serialize)]
pub struct TokenRequest {
    pub login: String,
    pub password: String,
}

impl std::fmt::Debug for TokenRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenRequest")
            .field("login", &self.login)
            .field("password", &"***")
            .finish()
    }
}

/// Issued token
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub access_token: String,
    /// Lifetime in seconds
    #[serde(default)]
    pub expires_in: Option<u64>,
}
