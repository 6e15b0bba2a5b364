use std::sync::Arc;

use datacollect_core::ApiErrorBody;
use datacollect_sdk::{DataCollectClient, Method, RawResponse, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

use crate::error::{HarnessError, HarnessResult};
use crate::fixtures::{Role, TokenFixture};
use crate::scenario::{PathParams, UrlTemplate};

/// Who a request is sent as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Caller {
    Anonymous,
    As(Role),
}

impl From<Role> for Caller {
    fn from(role: Role) -> Self {
        Caller::As(role)
    }
}

/// Calls against literal URL templates with status and message checks.
#[derive(Debug, Clone)]
pub struct ApiScenario {
    client: DataCollectClient,
    tokens: Arc<TokenFixture>,
}

impl ApiScenario {
    pub fn new(client: DataCollectClient, tokens: Arc<TokenFixture>) -> Self {
        Self { client, tokens }
    }

    /// The client without credentials.
    pub fn anonymous(&self) -> &DataCollectClient {
        &self.client
    }

    /// A client authenticated as `role`.
    pub async fn client_as(&self, role: Role) -> HarnessResult<DataCollectClient> {
        let token = self.tokens.token(&self.client, role).await?;
        Ok(self.client.with_token(token))
    }

    async fn client_for(&self, caller: Caller) -> HarnessResult<DataCollectClient> {
        match caller {
            Caller::Anonymous => Ok(self.client.clone()),
            Caller::As(role) => self.client_as(role).await,
        }
    }

    /// Send a request and return the response whatever its status.
    pub async fn call<B: Serialize>(
        &self,
        caller: impl Into<Caller>,
        method: Method,
        template: &UrlTemplate,
        params: &PathParams,
        body: Option<B>,
    ) -> HarnessResult<RawResponse> {
        let caller = caller.into();
        let path = template.render(params)?;
        let client = self.client_for(caller).await?;

        debug!(?caller, %method, path = %path, "Calling service");
        let response = client.http_client().send_raw(method, &path, body).await?;
        debug!(status = %response.status, "Service answered");
        Ok(response)
    }

    /// GET without a body.
    pub async fn get(
        &self,
        caller: impl Into<Caller>,
        template: &UrlTemplate,
        params: &PathParams,
    ) -> HarnessResult<RawResponse> {
        self.call(caller, Method::GET, template, params, None::<()>)
            .await
    }

    /// Send a request that must succeed and decode its body.
    pub async fn call_json<T: DeserializeOwned, B: Serialize>(
        &self,
        caller: impl Into<Caller>,
        method: Method,
        template: &UrlTemplate,
        params: &PathParams,
        body: Option<B>,
    ) -> HarnessResult<T> {
        let response = self.call(caller, method, template, params, body).await?;
        if !response.is_success() {
            return Err(HarnessError::UnexpectedStatus {
                expected: "2xx".to_string(),
                actual: response.status.as_u16(),
                body: response.body,
            });
        }
        Ok(response.json()?)
    }

    /// Send a request that must answer with exactly `expected`.
    pub async fn expect_status<B: Serialize>(
        &self,
        caller: impl Into<Caller>,
        method: Method,
        template: &UrlTemplate,
        params: &PathParams,
        body: Option<B>,
        expected: StatusCode,
    ) -> HarnessResult<RawResponse> {
        let response = self.call(caller, method, template, params, body).await?;
        check_status(response, expected)
    }

    /// Send a request that must fail with `expected` and report a message
    /// containing `fragment`.
    #[allow(clippy::too_many_arguments)]
    pub async fn expect_error<B: Serialize>(
        &self,
        caller: impl Into<Caller>,
        method: Method,
        template: &UrlTemplate,
        params: &PathParams,
        body: Option<B>,
        expected: StatusCode,
        fragment: &str,
    ) -> HarnessResult<ApiErrorBody> {
        let response = self
            .expect_status(caller, method, template, params, body, expected)
            .await?;
        check_error_message(&response, fragment)
    }
}

fn check_status(response: RawResponse, expected: StatusCode) -> HarnessResult<RawResponse> {
    if response.status == expected {
        Ok(response)
    } else {
        Err(HarnessError::UnexpectedStatus {
            expected: expected.as_u16().to_string(),
            actual: response.status.as_u16(),
            body: response.body,
        })
    }
}

/// Error bodies that are not the JSON envelope count as one plain message,
/// the same way `SdkError` reads them.
fn check_error_message(response: &RawResponse, fragment: &str) -> HarnessResult<ApiErrorBody> {
    let body = ApiErrorBody::from_body(&response.body);

    if body.mentions(fragment) {
        Ok(body)
    } else {
        Err(HarnessError::MissingErrorMessage {
            fragment: fragment.to_string(),
            reported: body.all_messages().into_iter().map(str::to_string).collect(),
        })
    }
}
