use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::OnceCell;
use tracing::{info, warn};

use crate::config::SuiteConfig;
use crate::error::HarnessResult;
use crate::fixtures::{Role, ServiceFixture, TokenFixture};
use crate::scenario::{ApiScenario, CreateScenario, PutScenario};
use crate::telemetry;

static SUITE: OnceCell<SuiteFixture> = OnceCell::const_new();

/// Everything set up once for the whole test binary.
///
/// Every `#[tokio::test]` runs on its own runtime, so the suite only keeps
/// runtime-independent state. Clients are built fresh for each scenario.
#[derive(Debug)]
pub struct SuiteFixture {
    config: SuiteConfig,
    service: ServiceFixture,
    tokens: Arc<TokenFixture>,
}

impl SuiteFixture {
    /// The shared suite, set up by the first test that asks for it.
    pub async fn global() -> HarnessResult<&'static SuiteFixture> {
        SUITE
            .get_or_try_init(|| async {
                telemetry::init();
                let config = SuiteConfig::load()?;
                Self::start(config).await
            })
            .await
    }

    /// Bring the service up and prepare token caching for `config`.
    pub async fn start(config: SuiteConfig) -> HarnessResult<Self> {
        let client = config.client()?;
        info!(url = %client.base_url(), "Starting acceptance suite");

        let service = ServiceFixture::start(config.service.clone(), &client).await?;

        let credentials: HashMap<Role, _> = config
            .credentials
            .iter()
            .filter_map(|(name, credentials)| match name.parse::<Role>() {
                Ok(role) => Some((role, credentials.clone())),
                Err(e) => {
                    warn!(error = %e, "Ignoring credentials");
                    None
                }
            })
            .collect();

        for role in Role::ALL {
            if !credentials.contains_key(&role) {
                warn!(role = %role, "No credentials configured");
            }
        }

        Ok(Self {
            tokens: Arc::new(TokenFixture::new(credentials)),
            service,
            config,
        })
    }

    pub fn config(&self) -> &SuiteConfig {
        &self.config
    }

    pub fn service(&self) -> &ServiceFixture {
        &self.service
    }

    pub fn tokens(&self) -> &Arc<TokenFixture> {
        &self.tokens
    }

    /// Request helpers bound to a fresh client.
    pub fn scenario(&self) -> HarnessResult<ApiScenario> {
        Ok(ApiScenario::new(
            self.config.client()?,
            Arc::clone(&self.tokens),
        ))
    }

    pub fn put_scenario(&self) -> HarnessResult<PutScenario> {
        Ok(PutScenario::new(self.scenario()?))
    }

    pub fn create_scenario(&self) -> HarnessResult<CreateScenario> {
        Ok(CreateScenario::new(self.scenario()?))
    }

    /// Stop a service this suite launched.
    pub async fn shutdown(&self) -> HarnessResult<()> {
        self.service.shutdown().await
    }
}
