//! Domain layer error definitions.

use thiserror::Error;

use super::entity::SessionState;

/// Errors related to Value Objects validation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueObjectError {
    /// DisplayName validation error
    #[error("DisplayName cannot be empty")]
    DisplayNameEmpty,

    /// DisplayName contains whitespace
    #[error("DisplayName cannot contain whitespace (got: '{0}')")]
    DisplayNameContainsWhitespace(String),
}

/// Errors returned by the session registry
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// Requested name failed validation
    #[error("invalid display name '{name}': {source}")]
    InvalidName {
        name: String,
        source: ValueObjectError,
    },

    /// Requested name is held by another session
    #[error("display name '{0}' is already in use")]
    NameTaken(String),
}

/// Illegal session lifecycle transition
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("session cannot move from {from:?} to {to:?}")]
pub struct SessionStateError {
    pub from: SessionState,
    pub to: SessionState,
}
