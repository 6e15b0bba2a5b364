use std::time::Duration;

use datacollect_core::CoreError;
use datacollect_sdk::SdkError;
use thiserror::Error;

use crate::fixtures::Role;

/// Errors raised by the harness itself, as opposed to assertion failures.
#[derive(Error, Debug)]
pub enum HarnessError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error(transparent)]
    Sdk(#[from] SdkError),

    #[error("Invalid request: {0}")]
    Request(#[from] CoreError),

    #[error("No credentials configured for role '{0}'")]
    MissingCredentials(Role),

    #[error("Token request for role '{role}' failed: {source}")]
    Token {
        role: Role,
        #[source]
        source: SdkError,
    },

    #[error("Failed to run service command: {0}")]
    Process(#[from] std::io::Error),

    #[error("Service did not become healthy within {0:?}")]
    StartupTimeout(Duration),

    #[error("Template '{template}' has no value for '{placeholder}'")]
    UnboundPlaceholder {
        template: String,
        placeholder: String,
    },

    #[error("Template '{0}' is malformed")]
    MalformedTemplate(String),

    #[error("Expected status {expected} but was {actual}: {body}")]
    UnexpectedStatus {
        expected: String,
        actual: u16,
        body: String,
    },

    #[error("No error message contains '{fragment}'; reported: {reported:?}")]
    MissingErrorMessage {
        fragment: String,
        reported: Vec<String>,
    },

    #[error("Operation reported errors: {0:?}")]
    OperationFailed(Vec<String>),
}

pub type HarnessResult<T> = Result<T, HarnessError>;
