use std::collections::BTreeSet;

use datacollect_core::{
    CreateElementDto, CreateResult, DimensionElementDto, DimensionElementsVerifier, SearchRequest,
    SimpleFilter, Verification, VerifyOptions,
};
use tracing::{debug, info, warn};

use crate::error::HarnessResult;
use crate::fixtures::Role;
use crate::scenario::put::ensure_success;
use crate::scenario::ApiScenario;

/// Create dimension elements, read them back and delete them again.
#[derive(Debug, Clone)]
pub struct CreateScenario {
    api: ApiScenario,
}

impl CreateScenario {
    pub fn new(api: ApiScenario) -> Self {
        Self { api }
    }

    pub fn api(&self) -> &ApiScenario {
        &self.api
    }

    /// Create `elements` as `role` and verify what was stored against
    /// `expected`, matching by full path since ids are assigned by the
    /// service.
    ///
    /// Folders along each `parent_path` that did not exist before are created
    /// by the service. They are looked up afterwards and verified together
    /// with the created elements, so `expected` has to list them too. Created
    /// elements and new folders are removed before returning.
    pub async fn create_verify_cleanup(
        &self,
        role: Role,
        dimension_id: i64,
        elements: &[CreateElementDto],
        expected: &[DimensionElementDto],
    ) -> HarnessResult<Verification> {
        let folder_paths = implied_folders(elements);
        let existing: BTreeSet<i64> = self
            .find_folders(dimension_id, &folder_paths)
            .await?
            .iter()
            .map(|folder| folder.id)
            .collect();

        let client = self.api.client_as(role).await?;
        let result = client.dimensions().create_elements(dimension_id, elements).await?;
        info!(
            dimension_id,
            created = result.created_ids.len(),
            errors = result.errors.len(),
            "Elements created"
        );

        let (new_folders, lookup) = match self.find_folders(dimension_id, &folder_paths).await {
            Ok(found) => {
                let new: Vec<_> = found
                    .into_iter()
                    .filter(|f| !existing.contains(&f.id) && !result.created_ids.contains(&f.id))
                    .collect();
                (new, Ok(()))
            }
            Err(e) => (Vec::new(), Err(e)),
        };
        if !new_folders.is_empty() {
            debug!(
                folders = ?new_folders.iter().map(DimensionElementDto::full_path).collect::<Vec<_>>(),
                "Folders created by the service"
            );
        }

        let outcome = match lookup {
            Ok(()) => {
                self.verify_created(role, dimension_id, &result, &new_folders, expected)
                    .await
            }
            Err(e) => Err(e),
        };

        if let Err(e) = self
            .cleanup_created(dimension_id, &result.created_ids, &new_folders)
            .await
        {
            warn!(error = %e, dimension_id, ids = ?result.created_ids, "Failed to delete created elements");
            outcome?;
            return Err(e);
        }
        outcome
    }

    async fn verify_created(
        &self,
        role: Role,
        dimension_id: i64,
        result: &CreateResult,
        new_folders: &[DimensionElementDto],
        expected: &[DimensionElementDto],
    ) -> HarnessResult<Verification> {
        ensure_success(result)?;

        let request = SearchRequest::new().filter(SimpleFilter::one_of(
            "id",
            result.created_ids.iter().copied(),
        ));
        let client = self.api.client_as(role).await?;
        let mut actual = client.dimensions().search_elements(dimension_id, &request).await?;
        actual.extend(new_folders.iter().cloned());

        Ok(DimensionElementsVerifier::new(VerifyOptions::created()).verify(&actual, expected))
    }

    /// Folders whose full path is one of `paths`, read as admin.
    async fn find_folders(
        &self,
        dimension_id: i64,
        paths: &BTreeSet<Vec<String>>,
    ) -> HarnessResult<Vec<DimensionElementDto>> {
        let names: BTreeSet<&str> = paths
            .iter()
            .filter_map(|path| path.last().map(String::as_str))
            .collect();
        if names.is_empty() {
            return Ok(Vec::new());
        }

        let request = SearchRequest::new().filter(SimpleFilter::one_of("name", names));
        let client = self.api.client_as(Role::Admin).await?;
        let found = client.dimensions().search_elements(dimension_id, &request).await?;

        Ok(found
            .into_iter()
            .filter(|element| element.is_folder && paths.contains(&folder_key(element)))
            .collect())
    }

    /// Delete created elements, then the folders the service added for
    /// them, deepest first.
    async fn cleanup_created(
        &self,
        dimension_id: i64,
        created_ids: &[i64],
        new_folders: &[DimensionElementDto],
    ) -> HarnessResult<()> {
        self.cleanup(dimension_id, created_ids).await?;

        let mut folders: Vec<&DimensionElementDto> = new_folders.iter().collect();
        folders.sort_by(|a, b| b.path.len().cmp(&a.path.len()));
        let folder_ids: Vec<i64> = folders.iter().map(|folder| folder.id).collect();
        self.cleanup(dimension_id, &folder_ids).await
    }

    /// Delete elements as admin.
    pub async fn cleanup(&self, dimension_id: i64, ids: &[i64]) -> HarnessResult<()> {
        if ids.is_empty() {
            return Ok(());
        }
        let client = self.api.client_as(Role::Admin).await?;
        let result = client.dimensions().delete_elements(dimension_id, ids).await?;
        info!(dimension_id, deleted = result.deleted_count, "Created elements removed");
        ensure_success(&result)
    }
}

/// Every folder path named by the elements' parent paths, ancestors included.
fn implied_folders(elements: &[CreateElementDto]) -> BTreeSet<Vec<String>> {
    elements
        .iter()
        .flat_map(|element| {
            (1..=element.parent_path.len()).map(move |depth| element.parent_path[..depth].to_vec())
        })
        .collect()
}

fn folder_key(element: &DimensionElementDto) -> Vec<String> {
    let mut key = element.path.clone();
    key.push(element.name.clone());
    key
}
