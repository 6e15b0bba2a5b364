//! Connection settings for a DataCollect deployment.

use std::fmt;
use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::error::{SdkError, SdkResult};

/// How the client reaches and authenticates against the service.
#[derive(Debug, Clone)]
pub struct SdkConfig {
    /// Root of the deployment, e.g. `http://localhost:5000`. Resource paths
    /// are appended to it.
    pub base_url: String,
    pub auth: AuthConfig,
    pub timeout: Duration,
    pub connect_timeout: Duration,
    /// Extra attempts after a transport failure or a 5xx answer.
    pub max_retries: u32,
    pub retry_initial_backoff: Duration,
    pub retry_max_backoff: Duration,
    pub user_agent: String,
    /// Log request and response bodies at debug level.
    pub enable_logging: bool,
    pub custom_headers: Vec<(String, String)>,
}

impl Default for SdkConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            auth: AuthConfig::None,
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            // Failures must surface as they happen during verification
            max_retries: 0,
            retry_initial_backoff: Duration::from_millis(100),
            retry_max_backoff: Duration::from_secs(5),
            user_agent: format!("datacollect-sdk/{}", env!("CARGO_PKG_VERSION")),
            enable_logging: false,
            custom_headers: Vec::new(),
        }
    }
}

impl SdkConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    pub fn with_auth(mut self, auth: AuthConfig) -> Self {
        self.auth = auth;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Backoff doubles after each retry, starting at `initial` and capped at
    /// `max`.
    pub fn with_retry_backoff(mut self, initial: Duration, max: Duration) -> Self {
        self.retry_initial_backoff = initial;
        self.retry_max_backoff = max;
        self
    }

    pub fn with_logging(mut self, enable: bool) -> Self {
        self.enable_logging = enable;
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.custom_headers.push((name.into(), value.into()));
        self
    }

    /// Reject settings the HTTP client cannot work with.
    pub fn validate(&self) -> SdkResult<()> {
        if self.base_url.is_empty() {
            return Err(SdkError::Configuration("Base URL cannot be empty".to_string()));
        }
        let url = url::Url::parse(&self.base_url)?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(SdkError::Configuration(format!(
                "Unsupported scheme in base URL: {}",
                url.scheme()
            )));
        }
        if self.timeout.is_zero() {
            return Err(SdkError::Configuration("Timeout cannot be zero".to_string()));
        }
        Ok(())
    }
}

/// Credentials sent with every request.
#[derive(Clone, Default, PartialEq, Eq)]
pub enum AuthConfig {
    #[default]
    None,
    /// Token issued by `/api/auth/token`.
    BearerToken(String),
    /// Login and password sent directly, for deployments behind basic auth.
    Basic { login: String, password: String },
}

impl AuthConfig {
    pub fn bearer(token: impl Into<String>) -> Self {
        Self::BearerToken(token.into())
    }

    pub fn basic(login: impl Into<String>, password: impl Into<String>) -> Self {
        Self::Basic {
            login: login.into(),
            password: password.into(),
        }
    }

    /// Value of the `Authorization` header, if any.
    pub fn authorization_header(&self) -> Option<String> {
        match self {
            Self::None => None,
            Self::BearerToken(token) => Some(format!("Bearer {}", token)),
            Self::Basic { login, password } => Some(format!(
                "Basic {}",
                STANDARD.encode(format!("{}:{}", login, password))
            )),
        }
    }

    pub fn is_configured(&self) -> bool {
        !matches!(self, Self::None)
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "None"),
            Self::BearerToken(_) => write!(f, "BearerToken(***)"),
            Self::Basic { login, .. } => write!(f, "Basic {{ login: {:?}, password: *** }}", login),
        }
    }
}
