//! Behavior engine errors

use thiserror::Error;

/// Errors surfaced while wiring up or validating an agent
#[derive(Debug, Error)]
pub enum AiError {
    /// A configuration value is out of range or inconsistent
    #[error("invalid agent configuration: {0}")]
    InvalidConfig(String),

    /// A collaborator the configuration requires was not provided
    #[error("missing collaborator: {0}")]
    MissingCollaborator(&'static str),
}
