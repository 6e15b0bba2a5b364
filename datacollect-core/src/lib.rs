//! DTOs, search DSL and verifiers for the DataCollect acceptance suite.

pub mod domain;
pub mod error;
pub mod verify;

pub use domain::*;
pub use error::*;
pub use verify::*;
