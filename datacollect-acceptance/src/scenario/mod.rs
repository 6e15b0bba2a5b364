//! Request helpers shared by the test files.

mod api;
mod create;
mod put;
mod template;

pub use api::{ApiScenario, Caller};
pub use create::CreateScenario;
pub use put::PutScenario;
pub use template::{routes, PathParams, UrlTemplate};
