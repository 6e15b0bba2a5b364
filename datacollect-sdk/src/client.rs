//! HTTP client implementation
//!
//! This module provides the core HTTP client for the SDK with
//! optional retries, role switching and request/response logging.

use crate::config::{AuthConfig, SdkConfig};
use crate::error::{SdkError, SdkResult};
use reqwest::{header, Client, Method, RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// The HTTP client for making API requests
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    config: Arc<SdkConfig>,
}

/// A response whose status has not been interpreted.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: StatusCode,
    pub body: String,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Deserialize the body regardless of status.
    pub fn json<T: DeserializeOwned>(&self) -> SdkResult<T> {
        serde_json::from_str(&self.body).map_err(SdkError::Serialization)
    }

    /// Convert into the typed error the SDK would have returned.
    pub fn into_error(self) -> SdkError {
        SdkError::from_response(self.status.as_u16(), &self.body)
    }
}

impl HttpClient {
    /// Create a new HTTP client with the given configuration
    pub fn new(config: SdkConfig) -> SdkResult<Self> {
        config.validate()?;

        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json; charset=utf-8"),
        );

        for (name, value) in &config.custom_headers {
            let name = header::HeaderName::try_from(name.as_str())
                .map_err(|e| SdkError::Configuration(format!("Invalid header name: {}", e)))?;
            let value = header::HeaderValue::try_from(value.as_str())
                .map_err(|e| SdkError::Configuration(format!("Invalid header value: {}", e)))?;
            headers.insert(name, value);
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(&config.user_agent)
            .default_headers(headers)
            .gzip(true)
            .brotli(true)
            .build()
            .map_err(SdkError::Network)?;

        Ok(Self {
            client,
            config: Arc::new(config),
        })
    }

    /// Get a reference to the configuration
    pub fn config(&self) -> &SdkConfig {
        &self.config
    }

    /// A client sharing this client's connection pool but authenticating
    /// with `auth`.
    pub fn with_auth(&self, auth: AuthConfig) -> Self {
        let mut config = (*self.config).clone();
        config.auth = auth;
        Self {
            client: self.client.clone(),
            config: Arc::new(config),
        }
    }

    /// Build the full URL for an endpoint
    pub fn url(&self, path: &str) -> String {
        let base = self.config.base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{}/{}", base, path)
    }

    /// Make a GET request
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> SdkResult<T> {
        self.request(Method::GET, path, Option::<()>::None).await
    }

    /// Make a POST request
    pub async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: B,
    ) -> SdkResult<T> {
        self.request(Method::POST, path, Some(body)).await
    }

    /// Make a PUT request
    pub async fn put<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: B,
    ) -> SdkResult<T> {
        self.request(Method::PUT, path, Some(body)).await
    }

    /// Make a DELETE request carrying a JSON body
    pub async fn delete_with_body<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: B,
    ) -> SdkResult<T> {
        self.request(Method::DELETE, path, Some(body)).await
    }

    /// Send a request and return status and body as they are.
    ///
    /// Non-2xx statuses are not errors here; only transport failures are.
    pub async fn send_raw<B: Serialize>(
        &self,
        method: Method,
        path: &str,
        body: Option<B>,
    ) -> SdkResult<RawResponse> {
        let response = self.execute_with_retry(method, path, body).await?;
        let status = response.status();
        let body = response.text().await.map_err(SdkError::Network)?;

        if self.config.enable_logging {
            debug!(status = %status, "Response body: {}", body);
        }

        Ok(RawResponse { status, body })
    }

    /// Make a request with optional body
    async fn request<T: DeserializeOwned, B: Serialize>(
        &self,
        method: Method,
        path: &str,
        body: Option<B>,
    ) -> SdkResult<T> {
        let raw = self.send_raw(method, path, body).await?;

        if raw.is_success() {
            raw.json()
        } else {
            Err(raw.into_error())
        }
    }

    /// Execute a request, retrying failures that [`SdkError::is_retryable`]
    /// accepts up to `max_retries` times.
    async fn execute_with_retry<B: Serialize>(
        &self,
        method: Method,
        path: &str,
        body: Option<B>,
    ) -> SdkResult<Response> {
        let url = self.url(path);
        let body_json = body.as_ref().map(serde_json::to_string).transpose()?;

        let mut attempts = 0;
        let mut backoff = self.config.retry_initial_backoff;

        loop {
            if attempts > 0 {
                info!(
                    "Retrying request (attempt {}/{}), waiting {:?}",
                    attempts, self.config.max_retries, backoff
                );
                tokio::time::sleep(backoff).await;
                backoff = std::cmp::min(backoff * 2, self.config.retry_max_backoff);
            }

            let mut request = self.add_auth(self.client.request(method.clone(), &url));
            if let Some(ref body_str) = body_json {
                request = request.body(body_str.clone());
            }

            if self.config.enable_logging {
                debug!("Request: {} {}", method, url);
                if let Some(ref body_str) = body_json {
                    debug!("Request body: {}", body_str);
                }
            }

            let retries_left = attempts < self.config.max_retries;
            let failure = match request.send().await {
                Ok(response) if response.status().is_server_error() && retries_left => {
                    let status = response.status();
                    let text = response.text().await.unwrap_or_default();
                    SdkError::from_response(status.as_u16(), &text)
                }
                Ok(response) => return Ok(response),
                Err(e) if e.is_timeout() => SdkError::Timeout(self.config.timeout.as_secs()),
                Err(e) => SdkError::Network(e),
            };

            if !retries_left || !failure.is_retryable() {
                error!("Request {} {} failed: {}", method, url, failure);
                return Err(failure);
            }
            warn!("Request {} {} failed, will retry: {}", method, url, failure);
            attempts += 1;
        }
    }

    fn add_auth(&self, request: RequestBuilder) -> RequestBuilder {
        match self.config.auth.authorization_header() {
            Some(value) => request.header(header::AUTHORIZATION, value),
            None => request,
        }
    }
}
