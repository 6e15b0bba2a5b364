//! Acceptance harness for a running DataCollect service.
//!
//! The harness owns everything a test needs before it can talk to the
//! service: configuration, logging, a hosted service process, cached access
//! tokens per role and request helpers that turn literal URL templates into
//! calls. Test files under `tests/` hold the literal cases.
//!
//! ```rust,no_run
//! use datacollect_acceptance::{data, Role, SuiteFixture};
//! use datacollect_core::{SearchRequest, SimpleFilter};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let suite = SuiteFixture::global().await?;
//! let admin = suite.scenario()?.client_as(Role::Admin).await?;
//!
//! let request = SearchRequest::new().filter(SimpleFilter::equal("Код", "77"));
//! let found = admin
//!     .dimensions()
//!     .search_elements(data::REGIONS_DIMENSION_ID, &request)
//!     .await?;
//! assert_eq!(found.len(), 1);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod data;
pub mod error;
pub mod fixtures;
pub mod scenario;
pub mod telemetry;

pub use config::{ApiSettings, Credentials, ServiceSettings, SuiteConfig};
pub use error::{HarnessError, HarnessResult};
pub use fixtures::{Role, ServiceFixture, SuiteFixture, TokenFixture};
pub use scenario::{ApiScenario, CreateScenario, PathParams, PutScenario, UrlTemplate};
