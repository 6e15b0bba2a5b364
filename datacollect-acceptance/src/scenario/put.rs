use datacollect_core::{
    DimensionElementDto, DimensionElementsVerifier, HasErrors, OperationError, SearchRequest,
    SimpleFilter, UpdateElementDto, UpdateResult, Verification, VerifyOptions,
};
use tracing::{info, warn};

use crate::error::{HarnessError, HarnessResult};
use crate::fixtures::Role;
use crate::scenario::ApiScenario;

/// Update dimension elements, then read them back and compare.
///
/// Updates change the seeded database, so every mutating helper here has a
/// variant that puts the touched elements back afterwards.
#[derive(Debug, Clone)]
pub struct PutScenario {
    api: ApiScenario,
}

impl PutScenario {
    pub fn new(api: ApiScenario) -> Self {
        Self { api }
    }

    pub fn api(&self) -> &ApiScenario {
        &self.api
    }

    /// Current state of the given elements.
    pub async fn snapshot(
        &self,
        role: Role,
        dimension_id: i64,
        ids: &[i64],
    ) -> HarnessResult<Vec<DimensionElementDto>> {
        let request = SearchRequest::new().filter(SimpleFilter::one_of("id", ids.iter().copied()));
        let client = self.api.client_as(role).await?;
        Ok(client.dimensions().search_elements(dimension_id, &request).await?)
    }

    /// Apply `updates` as `role`, then search with `search` and verify the
    /// result against `expected`.
    pub async fn update_and_verify(
        &self,
        role: Role,
        dimension_id: i64,
        updates: &[UpdateElementDto],
        search: &SearchRequest,
        expected: &[DimensionElementDto],
        options: VerifyOptions,
    ) -> HarnessResult<Verification> {
        search.validate()?;
        let client = self.api.client_as(role).await?;

        let result = client.dimensions().update_elements(dimension_id, updates).await?;
        info!(
            dimension_id,
            updated = result.updated_count,
            errors = result.errors.len(),
            "Elements updated"
        );
        ensure_success(&result)?;

        let actual = client.dimensions().search_elements(dimension_id, search).await?;
        Ok(DimensionElementsVerifier::new(options).verify(&actual, expected))
    }

    /// Like [`update_and_verify`](Self::update_and_verify), restoring the
    /// updated elements as admin whatever the outcome.
    pub async fn update_verify_restore(
        &self,
        role: Role,
        dimension_id: i64,
        updates: &[UpdateElementDto],
        search: &SearchRequest,
        expected: &[DimensionElementDto],
        options: VerifyOptions,
    ) -> HarnessResult<Verification> {
        let ids: Vec<i64> = updates.iter().map(|u| u.id).collect();
        let snapshot = self.snapshot(Role::Admin, dimension_id, &ids).await?;

        let outcome = self
            .update_and_verify(role, dimension_id, updates, search, expected, options)
            .await;

        if let Err(e) = self.restore(dimension_id, &snapshot).await {
            warn!(error = %e, dimension_id, "Failed to restore elements");
            outcome?;
            return Err(e);
        }
        outcome
    }

    /// Put elements back into the state captured by [`snapshot`](Self::snapshot).
    pub async fn restore(
        &self,
        dimension_id: i64,
        snapshot: &[DimensionElementDto],
    ) -> HarnessResult<()> {
        if snapshot.is_empty() {
            return Ok(());
        }
        let updates: Vec<UpdateElementDto> = snapshot.iter().map(UpdateElementDto::from).collect();
        let client = self.api.client_as(Role::Admin).await?;

        let result = client.dimensions().update_elements(dimension_id, &updates).await?;
        info!(dimension_id, restored = result.updated_count, "Elements restored");
        ensure_success(&result)
    }

    /// Apply `updates` expecting the service to reject them with a message
    /// containing `fragment`.
    ///
    /// A rejection may come as a 2xx result listing errors or as an error
    /// status; both are folded into an [`UpdateResult`].
    pub async fn update_expecting_error(
        &self,
        role: Role,
        dimension_id: i64,
        updates: &[UpdateElementDto],
        fragment: &str,
    ) -> HarnessResult<UpdateResult> {
        let client = self.api.client_as(role).await?;

        let result = match client.dimensions().update_elements(dimension_id, updates).await {
            Ok(result) => result,
            Err(e) if e.status_code().is_some() => UpdateResult {
                updated_count: 0,
                errors: e.messages().into_iter().map(OperationError::new).collect(),
            },
            Err(e) => return Err(e.into()),
        };

        if result.has_error(fragment) {
            Ok(result)
        } else {
            Err(HarnessError::MissingErrorMessage {
                fragment: fragment.to_string(),
                reported: owned_messages(&result),
            })
        }
    }
}

pub(crate) fn ensure_success(result: &impl HasErrors) -> HarnessResult<()> {
    if result.is_success() {
        Ok(())
    } else {
        Err(HarnessError::OperationFailed(owned_messages(result)))
    }
}

fn owned_messages(result: &impl HasErrors) -> Vec<String> {
    result.error_messages().into_iter().map(str::to_string).collect()
}
