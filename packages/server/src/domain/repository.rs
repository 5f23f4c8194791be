//! Repository trait for the session registry.
//!
//! The registry is the single source of truth for who is connected and under
//! which display name. The domain layer defines the trait; implementations
//! live in the infrastructure layer.

use async_trait::async_trait;

use super::{
    entity::OutboundChannel,
    error::RegistryError,
    value_object::{DisplayName, SessionId},
};

/// Name → outbound channel mapping shared by every session.
///
/// Every method is atomic with respect to every other: no caller can observe
/// a half-applied rename, and at most one entry exists per name.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionRegistry: Send + Sync {
    /// Bind `name` to `channel`.
    ///
    /// Succeeds if the name is free, or already bound to the same channel.
    ///
    /// # Errors
    ///
    /// `RegistryError::NameTaken` if another channel holds the name.
    async fn claim(&self, name: DisplayName, channel: OutboundChannel)
    -> Result<(), RegistryError>;

    /// Remove the binding for `name`. Returns whether an entry was removed.
    async fn release(&self, name: &DisplayName) -> bool;

    /// Atomically move `channel` from `old_name` to `new_name`.
    ///
    /// # Errors
    ///
    /// `RegistryError::InvalidName` if `new_name` is empty or contains
    /// whitespace, `RegistryError::NameTaken` if it is bound to another
    /// channel. The registry is unchanged on error.
    async fn rename(
        &self,
        old_name: &DisplayName,
        new_name: &str,
        channel: OutboundChannel,
    ) -> Result<DisplayName, RegistryError>;

    /// Channel currently bound to `name`, if any.
    async fn lookup(&self, name: &str) -> Option<OutboundChannel>;

    /// Point-in-time copy of every channel except the one owned by
    /// `session_id`.
    async fn snapshot_channels_except(&self, session_id: &SessionId) -> Vec<OutboundChannel>;

    /// Claimed names, sorted.
    async fn names(&self) -> Vec<DisplayName>;

    /// Number of claimed names.
    async fn count(&self) -> usize;
}
