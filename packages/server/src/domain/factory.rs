//! Domain factories for creating domain entities and value objects.

use std::sync::atomic::{AtomicU64, Ordering};

use super::{DisplayName, SessionId, error::ValueObjectError};

/// Prefix of generated default display names.
pub const DEFAULT_NAME_PREFIX: &str = "Usuario";

/// Factory for generating SessionId instances.
///
/// This factory encapsulates the logic for generating new session
/// identifiers, separating the generation concern from SessionId itself.
pub struct SessionIdFactory;

impl SessionIdFactory {
    /// Generate a new SessionId with a random UUID v4.
    pub fn generate() -> SessionId {
        SessionId::from_uuid(uuid::Uuid::new_v4())
    }
}

/// Factory for the `Usuario<N>` names given to freshly accepted sessions.
///
/// N starts at 1 and increases on every call; a number is never handed out
/// twice by the same factory.
#[derive(Debug)]
pub struct DefaultNameFactory {
    next: AtomicU64,
}

impl DefaultNameFactory {
    pub fn new() -> Self {
        Self {
            next: AtomicU64::new(1),
        }
    }

    /// Generate the next default name.
    ///
    /// # Errors
    ///
    /// A prefix followed by digits always validates; the Result keeps the
    /// factory consistent with the domain error handling pattern.
    pub fn generate(&self) -> Result<DisplayName, ValueObjectError> {
        let n = self.next.fetch_add(1, Ordering::Relaxed);
        DisplayName::new(format!("{DEFAULT_NAME_PREFIX}{n}"))
    }
}

impl Default for DefaultNameFactory {
    fn default() -> Self {
        Self::new()
    }
}
