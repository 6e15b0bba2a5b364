//! Calendars resource client

use crate::client::HttpClient;
use crate::error::SdkResult;
use datacollect_core::{CalendarDto, SearchRequest};
use std::sync::Arc;

/// Client for calendar dimensions
#[derive(Debug, Clone)]
pub struct CalendarsClient {
    client: Arc<HttpClient>,
}

impl CalendarsClient {
    /// Create a new calendars client
    pub fn new(client: Arc<HttpClient>) -> Self {
        Self { client }
    }

    /// Search elements of a calendar
    pub async fn search(
        &self,
        calendar_id: i64,
        request: &SearchRequest,
    ) -> SdkResult<Vec<CalendarDto>> {
        self.client
            .post(
                &format!("/api/calendars/{}/elements/search", calendar_id),
                request,
            )
            .await
    }
}
