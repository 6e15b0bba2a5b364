use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config as ConfigLoader, Environment, File};
use datacollect_sdk::{DataCollectClient, SdkConfig};
use serde::Deserialize;

use crate::error::HarnessResult;
use crate::fixtures::Role;

/// Environment variable pointing at a directory with `acceptance.toml`.
pub const CONFIG_DIR_ENV: &str = "DATACOLLECT_CONFIG_DIR";

const ENV_PREFIX: &str = "DATACOLLECT";

/// Settings of one acceptance run.
///
/// Sources, lowest priority first: `acceptance.toml`, `acceptance.local.toml`,
/// then `DATACOLLECT__SECTION__KEY` environment variables.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SuiteConfig {
    #[serde(default)]
    pub api: ApiSettings,
    /// Keyed by role name (`admin`, `editor`, `viewer`, `no_access`).
    #[serde(default)]
    pub credentials: HashMap<String, Credentials>,
    #[serde(default)]
    pub service: ServiceSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Log request and response bodies at debug level.
    #[serde(default)]
    pub log_bodies: bool,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            log_bodies: false,
        }
    }
}

#[derive(Clone, Deserialize)]
pub struct Credentials {
    pub login: String,
    pub password: String,
}

impl Credentials {
    pub fn new(login: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            login: login.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("login", &self.login)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// How the service under test is hosted.
///
/// Without `start_command` the suite attaches to an already running
/// instance and only waits for its health endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceSettings {
    #[serde(default)]
    pub start_command: Option<String>,
    #[serde(default)]
    pub start_args: Vec<String>,
    #[serde(default)]
    pub working_dir: Option<PathBuf>,
    #[serde(default = "default_health_path")]
    pub health_path: String,
    #[serde(default = "default_startup_timeout_secs")]
    pub startup_timeout_secs: u64,
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    #[serde(default)]
    pub stop_command: Option<String>,
    #[serde(default)]
    pub stop_args: Vec<String>,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            start_command: None,
            start_args: Vec::new(),
            working_dir: None,
            health_path: default_health_path(),
            startup_timeout_secs: default_startup_timeout_secs(),
            poll_interval_ms: default_poll_interval_ms(),
            stop_command: None,
            stop_args: Vec::new(),
        }
    }
}

impl ServiceSettings {
    pub fn startup_timeout(&self) -> Duration {
        Duration::from_secs(self.startup_timeout_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

fn default_base_url() -> String {
    "http://localhost:5000".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_health_path() -> String {
    "/health".to_string()
}

fn default_startup_timeout_secs() -> u64 {
    60
}

fn default_poll_interval_ms() -> u64 {
    500
}

impl SuiteConfig {
    /// Load from the directory named by `DATACOLLECT_CONFIG_DIR`, falling
    /// back to this crate's `config/` directory.
    pub fn load() -> HarnessResult<Self> {
        let dir = std::env::var_os(CONFIG_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| Path::new(env!("CARGO_MANIFEST_DIR")).join("config"));
        Self::load_from(&dir)
    }

    /// Load from `dir`. Missing files are skipped, so an empty directory
    /// yields the defaults plus whatever the environment sets.
    pub fn load_from(dir: &Path) -> HarnessResult<Self> {
        let config = ConfigLoader::builder()
            .add_source(File::from(dir.join("acceptance.toml")).required(false))
            .add_source(File::from(dir.join("acceptance.local.toml")).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?;

        Ok(config.try_deserialize()?)
    }

    /// A configuration for the given base URL with everything else defaulted.
    pub fn for_base_url(base_url: impl Into<String>) -> Self {
        Self {
            api: ApiSettings {
                base_url: base_url.into(),
                ..ApiSettings::default()
            },
            ..Self::default()
        }
    }

    pub fn with_credentials(mut self, role: Role, credentials: Credentials) -> Self {
        self.credentials.insert(role.as_str().to_string(), credentials);
        self
    }

    pub fn credentials_for(&self, role: Role) -> Option<&Credentials> {
        self.credentials.get(role.as_str())
    }

    pub fn sdk_config(&self) -> SdkConfig {
        SdkConfig::new(self.api.base_url.clone())
            .with_timeout(Duration::from_secs(self.api.timeout_secs))
            .with_logging(self.api.log_bodies)
    }

    /// An anonymous client for the configured service.
    pub fn client(&self) -> HarnessResult<DataCollectClient> {
        Ok(DataCollectClient::new(self.sdk_config())?)
    }
}
