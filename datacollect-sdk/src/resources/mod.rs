//! SDK resource modules
//!
//! This module contains resource-specific clients for interacting with
//! different API endpoints.

pub mod auth;
pub mod dimensions;
pub mod measure_groups;
pub mod calendars;

pub use auth::AuthClient;
pub use dimensions::DimensionsClient;
pub use measure_groups::MeasureGroupsClient;
pub use calendars::CalendarsClient;
