use std::collections::HashMap;

use datacollect_sdk::DataCollectClient;
use tokio::sync::OnceCell;
use tracing::info;

use crate::config::Credentials;
use crate::error::{HarnessError, HarnessResult};
use crate::fixtures::Role;

/// Access tokens per role, requested at most once per process.
///
/// Tokens are plain strings, so one fixture can serve tests running on
/// different runtimes. The client used for the token request is supplied by
/// the caller.
#[derive(Debug)]
pub struct TokenFixture {
    credentials: HashMap<Role, Credentials>,
    tokens: HashMap<Role, OnceCell<String>>,
}

impl TokenFixture {
    pub fn new(credentials: HashMap<Role, Credentials>) -> Self {
        let tokens = Role::ALL.into_iter().map(|role| (role, OnceCell::new())).collect();
        Self {
            credentials,
            tokens,
        }
    }

    pub fn has_credentials(&self, role: Role) -> bool {
        self.credentials.contains_key(&role)
    }

    /// The token for `role`, requesting it through `client` on first use.
    pub async fn token(&self, client: &DataCollectClient, role: Role) -> HarnessResult<String> {
        let cell = self
            .tokens
            .get(&role)
            .ok_or(HarnessError::MissingCredentials(role))?;

        cell.get_or_try_init(|| self.request(client, role))
            .await
            .cloned()
    }

    /// Request tokens for every role that has credentials.
    pub async fn warm_up(&self, client: &DataCollectClient) -> HarnessResult<()> {
        for role in Role::ALL {
            if self.has_credentials(role) {
                self.token(client, role).await?;
            }
        }
        Ok(())
    }

    async fn request(&self, client: &DataCollectClient, role: Role) -> HarnessResult<String> {
        let credentials = self
            .credentials
            .get(&role)
            .ok_or(HarnessError::MissingCredentials(role))?;

        info!(role = %role, login = %credentials.login, "Requesting access token");
        let response = client
            .auth()
            .token(&credentials.login, &credentials.password)
            .await
            .map_err(|source| HarnessError::Token { role, source })?;

        Ok(response.access_token)
    }
}
