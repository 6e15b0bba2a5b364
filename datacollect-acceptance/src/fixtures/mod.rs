//! Process-wide fixtures: the hosted service, access tokens and the suite
//! bundle every test starts from.

mod role;
mod service;
mod suite;
mod tokens;

pub use role::Role;
pub use service::ServiceFixture;
pub use suite::SuiteFixture;
pub use tokens::TokenFixture;
