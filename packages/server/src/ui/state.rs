//! Server state shared by every connection.

use std::sync::Arc;

use crate::{
    domain::{DefaultNameFactory, SessionRegistry},
    infrastructure::repository::InMemorySessionRegistry,
};

/// Shared application state
pub struct AppState {
    /// Repository（データアクセス層の抽象化）
    pub registry: Arc<dyn SessionRegistry>,
    /// Default name generator; numbers are never reused while the server runs
    pub names: Arc<DefaultNameFactory>,
}

impl AppState {
    pub fn new(registry: Arc<dyn SessionRegistry>) -> Self {
        Self {
            registry,
            names: Arc::new(DefaultNameFactory::new()),
        }
    }

    /// State backed by the in-memory registry
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemorySessionRegistry::new()))
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::in_memory()
    }
}
