//! Dimensions resource client
//!
//! This module provides methods for reading dimensions and for searching,
//! creating, updating and deleting their elements.

use crate::client::HttpClient;
use crate::error::SdkResult;
use datacollect_core::{
    CreateElementDto, CreateResult, DeleteResult, DimensionDto, DimensionElementDto,
    SearchRequest, UpdateElementDto, UpdateResult,
};
use serde::Serialize;
use std::sync::Arc;

/// Client for dimension operations
#[derive(Debug, Clone)]
pub struct DimensionsClient {
    client: Arc<HttpClient>,
}

impl DimensionsClient {
    /// Create a new dimensions client
    pub fn new(client: Arc<HttpClient>) -> Self {
        Self { client }
    }

    /// List all dimensions visible to the caller
    pub async fn list(&self) -> SdkResult<Vec<DimensionDto>> {
        self.client.get("/api/dimensions").await
    }

    /// Get a dimension with its attribute descriptors
    pub async fn get(&self, dimension_id: i64) -> SdkResult<DimensionDto> {
        self.client
            .get(&format!("/api/dimensions/{}", dimension_id))
            .await
    }

    /// Search elements of a dimension
    pub async fn search_elements(
        &self,
        dimension_id: i64,
        request: &SearchRequest,
    ) -> SdkResult<Vec<DimensionElementDto>> {
        self.client
            .post(&elements_path(dimension_id, "/search"), request)
            .await
    }

    /// Create elements; folders in each element's parent path are created
    /// or reused by the service
    pub async fn create_elements(
        &self,
        dimension_id: i64,
        elements: &[CreateElementDto],
    ) -> SdkResult<CreateResult> {
        self.client
            .post(&elements_path(dimension_id, ""), elements)
            .await
    }

    /// Update elements
    pub async fn update_elements(
        &self,
        dimension_id: i64,
        elements: &[UpdateElementDto],
    ) -> SdkResult<UpdateResult> {
        self.client
            .put(&elements_path(dimension_id, ""), elements)
            .await
    }

    /// Delete elements by id
    pub async fn delete_elements(&self, dimension_id: i64, ids: &[i64]) -> SdkResult<DeleteResult> {
        self.client
            .delete_with_body(&elements_path(dimension_id, ""), DeleteRequest { ids })
            .await
    }
}

fn elements_path(dimension_id: i64, suffix: &str) -> String {
    format!("/api/dimensions/{}/elements{}", dimension_id, suffix)
}

/// Body of a delete request
#[derive(Debug, Clone, Serialize)]
pub struct DeleteRequest<'a> {
    pub ids: &'a [i64],
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_elements_path() {
        assert_eq!(elements_path(12, ""), "/api/dimensions/12/elements");
        assert_eq!(elements_path(12, "/search"), "/api/dimensions/12/elements/search");
    }

    #[test]
    fn test_delete_request_body() {
        let body = serde_json::to_value(DeleteRequest { ids: &[1, 2] }).unwrap();
        assert_eq!(body, serde_json::json!({ "ids": [1, 2] }));
    }
}
