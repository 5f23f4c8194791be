//! UseCase 層のエラー定義

use thiserror::Error;

use crate::domain::{RegistryError, SessionStateError, ValueObjectError};

/// Errors while bringing a new connection into the registry
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConnectError {
    /// Every generated default name was already claimed
    #[error("no free default name after {attempts} attempts")]
    NoAvailableName { attempts: usize },

    /// The default name factory produced an invalid name
    #[error("invalid default name: {0}")]
    InvalidDefaultName(#[from] ValueObjectError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    State(#[from] SessionStateError),
}

/// Errors while changing a session's display name
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ChangeUserNameError {
    #[error("invalid display name '{requested}': {reason}")]
    InvalidName {
        requested: String,
        reason: ValueObjectError,
    },

    #[error("display name '{0}' is already in use")]
    NameTaken(String),

    /// The session is connecting or closing
    #[error("session is not active")]
    SessionNotActive,
}

impl From<RegistryError> for ChangeUserNameError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::InvalidName { name, source } => Self::InvalidName {
                requested: name,
                reason: source,
            },
            RegistryError::NameTaken(name) => Self::NameTaken(name),
        }
    }
}

/// Errors while routing a private message
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SendPrivateMessageError {
    #[error("user not found: {0}")]
    UserNotFound(String),
}
