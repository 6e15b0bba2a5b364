//! Measure groups resource client

use crate::client::HttpClient;
use crate::error::SdkResult;
use datacollect_core::{
    CreateMeasureElementDto, CreateResult, MeasureElementDto, MeasureGroupDto, SearchRequest,
    UpdateMeasureElementDto, UpdateResult,
};
use std::sync::Arc;

/// Client for measure group operations
#[derive(Debug, Clone)]
pub struct MeasureGroupsClient {
    client: Arc<HttpClient>,
}

impl MeasureGroupsClient {
    /// Create a new measure groups client
    pub fn new(client: Arc<HttpClient>) -> Self {
        Self { client }
    }

    /// Get a measure group with its dimensions and measures
    pub async fn get(&self, measure_group_id: i64) -> SdkResult<MeasureGroupDto> {
        self.client
            .get(&format!("/api/measuregroups/{}", measure_group_id))
            .await
    }

    /// Search rows of a measure group
    pub async fn search_elements(
        &self,
        measure_group_id: i64,
        request: &SearchRequest,
    ) -> SdkResult<Vec<MeasureElementDto>> {
        self.client
            .post(
                &format!("/api/measuregroups/{}/elements/search", measure_group_id),
                request,
            )
            .await
    }

    /// Create rows
    pub async fn create_elements(
        &self,
        measure_group_id: i64,
        elements: &[CreateMeasureElementDto],
    ) -> SdkResult<CreateResult> {
        self.client
            .post(
                &format!("/api/measuregroups/{}/elements", measure_group_id),
                elements,
            )
            .await
    }

    /// Update measure values of existing rows
    pub async fn update_elements(
        &self,
        measure_group_id: i64,
        elements: &[UpdateMeasureElementDto],
    ) -> SdkResult<UpdateResult> {
        self.client
            .put(
                &format!("/api/measuregroups/{}/elements", measure_group_id),
                elements,
            )
            .await
    }
}
