//! DataCollect SDK
//!
//! A thin, typed client for the DataCollect data-management API: dimensions,
//! measure groups, calendars and their elements.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use datacollect_sdk::{DataCollectClient, SdkConfig};
//! use datacollect_core::{SearchRequest, SimpleFilter};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = DataCollectClient::new(SdkConfig::new("http://localhost:5000"))?;
//!
//!     let token = client.auth().token("admin", "secret").await?;
//!     let admin = client.with_token(token.access_token);
//!
//!     let request = SearchRequest::new().filter(SimpleFilter::equal("Код", "77"));
//!     let elements = admin.dimensions().search_elements(12, &request).await?;
//!     println!("Found {} elements", elements.len());
//!
//!     Ok(())
//! }
//! ```
//!
//! # Error Handling
//!
//! Non-2xx responses become [`SdkError`] variants that keep the messages the
//! service reported:
//!
//! ```rust,no_run
//! use datacollect_sdk::{DataCollectClient, SdkError};
//! use datacollect_core::UpdateElementDto;
//!
//! async fn rename(client: &DataCollectClient) {
//!     let update = [UpdateElementDto::new(5).rename("Москва")];
//!     match client.dimensions().update_elements(12, &update).await {
//!         Ok(result) => println!("Updated {}", result.updated_count),
//!         Err(SdkError::Forbidden(msg)) => eprintln!("Access denied: {}", msg),
//!         Err(e) if e.mentions("уникальным") => eprintln!("Duplicate name"),
//!         Err(e) => eprintln!("Other error: {}", e),
//!     }
//! }
//! ```

#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]

pub mod client;
pub mod config;
pub mod error;
pub mod resources;

pub use client::{HttpClient, RawResponse};
pub use config::{AuthConfig, SdkConfig};
pub use error::{SdkError, SdkResult};

pub use resources::auth::{AuthClient, TokenRequest, TokenResponse};
pub use resources::calendars::CalendarsClient;
pub use resources::dimensions::{DeleteRequest, DimensionsClient};
pub use resources::measure_groups::MeasureGroupsClient;

pub use reqwest::{Method, StatusCode};

use std::sync::Arc;

/// The main client for the DataCollect API.
///
/// Resource clients share one underlying [`HttpClient`]. Use
/// [`DataCollectClient::with_token`] to act as a different user.
#[derive(Debug, Clone)]
pub struct DataCollectClient {
    http_client: Arc<HttpClient>,
    auth: AuthClient,
    dimensions: DimensionsClient,
    measure_groups: MeasureGroupsClient,
    calendars: CalendarsClient,
}

impl DataCollectClient {
    /// Create a new client with the given configuration.
    pub fn new(config: SdkConfig) -> SdkResult<Self> {
        Ok(Self::from_http(HttpClient::new(config)?))
    }

    /// Create a new client using a builder pattern.
    ///
    /// ```rust,no_run
    /// use datacollect_sdk::DataCollectClient;
    /// use std::time::Duration;
    ///
    /// let client = DataCollectClient::builder("http://localhost:5000")
    ///     .with_timeout(Duration::from_secs(30))
    ///     .build()?;
    /// # Ok::<(), datacollect_sdk::SdkError>(())
    /// ```
    pub fn builder(base_url: impl Into<String>) -> ClientBuilder {
        ClientBuilder::new(base_url)
    }

    fn from_http(http_client: HttpClient) -> Self {
        let http_client = Arc::new(http_client);
        Self {
            auth: AuthClient::new(Arc::clone(&http_client)),
            dimensions: DimensionsClient::new(Arc::clone(&http_client)),
            measure_groups: MeasureGroupsClient::new(Arc::clone(&http_client)),
            calendars: CalendarsClient::new(Arc::clone(&http_client)),
            http_client,
        }
    }

    /// A client acting under the given bearer token.
    pub fn with_token(&self, token: impl Into<String>) -> Self {
        self.with_auth(AuthConfig::bearer(token))
    }

    /// A client acting under the given credentials.
    pub fn with_auth(&self, auth: AuthConfig) -> Self {
        Self::from_http(self.http_client.with_auth(auth))
    }

    /// Get the token endpoint client.
    pub fn auth(&self) -> &AuthClient {
        &self.auth
    }

    /// Get the dimensions client.
    pub fn dimensions(&self) -> &DimensionsClient {
        &self.dimensions
    }

    /// Get the measure groups client.
    pub fn measure_groups(&self) -> &MeasureGroupsClient {
        &self.measure_groups
    }

    /// Get the calendars client.
    pub fn calendars(&self) -> &CalendarsClient {
        &self.calendars
    }

    /// Get a reference to the underlying HTTP client.
    ///
    /// This is useful for requests not covered by the resource clients and
    /// for asserting on raw statuses.
    pub fn http_client(&self) -> &HttpClient {
        &self.http_client
    }

    /// Get the base URL of the API.
    pub fn base_url(&self) -> &str {
        &self.http_client.config().base_url
    }
}

/// Builder for creating a DataCollectClient with fluent configuration.
#[derive(Debug)]
pub struct ClientBuilder {
    config: SdkConfig,
}

impl ClientBuilder {
    /// Create a new client builder with the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            config: SdkConfig::new(base_url),
        }
    }

    /// Set the authentication configuration.
    pub fn with_auth(mut self, auth: AuthConfig) -> Self {
        self.config = self.config.with_auth(auth);
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: std::time::Duration) -> Self {
        self.config = self.config.with_timeout(timeout);
        self
    }

    /// Set the maximum number of retries.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.config = self.config.with_max_retries(max_retries);
        self
    }

    /// Enable or disable request/response logging.
    pub fn with_logging(mut self, enable: bool) -> Self {
        self.config = self.config.with_logging(enable);
        self
    }

    /// Add a custom header to all requests.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.config = self.config.with_header(name, value);
        self
    }

    /// Build the client.
    pub fn build(self) -> SdkResult<DataCollectClient> {
        DataCollectClient::new(self.config)
    }
}
