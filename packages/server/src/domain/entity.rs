//! Core domain models for the chat server.

use tokio::sync::mpsc::{Sender, error::TrySendError};

use super::{
    error::SessionStateError,
    value_object::{DisplayName, SessionId, Timestamp},
};

/// Lifecycle of one connected client.
///
/// Transitions only move forward: `Connecting -> Active -> Closing -> Closed`,
/// with `Connecting -> Closing` allowed for connections that drop before
/// their name claim completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Stream accepted, default name generated, not yet registered
    Connecting,
    /// Name claimed; frames are being dispatched
    Active,
    /// Teardown in progress
    Closing,
    /// Stream released; terminal
    Closed,
}

impl SessionState {
    fn can_transition_to(self, next: SessionState) -> bool {
        matches!(
            (self, next),
            (Self::Connecting, Self::Active)
                | (Self::Connecting, Self::Closing)
                | (Self::Active, Self::Closing)
                | (Self::Closing, Self::Closed)
        )
    }
}

/// Messages that may wait for one client's writer before new ones are dropped
pub const OUTBOUND_QUEUE_CAPACITY: usize = 256;

/// Outbound half of a client's connection.
///
/// Each queued item is one whole message and the session's writer task is
/// the only consumer, so writes to one client never interleave. The queue is
/// bounded: a client that stops reading loses messages instead of growing
/// server memory. Cloning yields another handle to the same channel.
#[derive(Debug, Clone)]
pub struct OutboundChannel {
    session_id: SessionId,
    sender: Sender<String>,
}

impl OutboundChannel {
    /// Create a channel handle owned by `session_id`
    pub fn new(session_id: SessionId, sender: Sender<String>) -> Self {
        Self { session_id, sender }
    }

    /// Session that owns this channel
    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    /// Whether both handles point to the same session's channel
    pub fn is_same_channel(&self, other: &OutboundChannel) -> bool {
        self.session_id == other.session_id
    }

    /// Queue one message for delivery without waiting.
    ///
    /// Returns `false` and drops the message when the owning session has shut
    /// its writer down, or when its queue is full because the client is not
    /// reading.
    pub fn deliver(&self, text: impl Into<String>) -> bool {
        match self.sender.try_send(text.into()) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                tracing::debug!(session = %self.session_id, "outbound queue full, message dropped");
                false
            }
            Err(TrySendError::Closed(_)) => false,
        }
    }

    /// Resolve once the owning session's writer has gone away
    pub async fn closed(&self) {
        self.sender.closed().await
    }
}

/// Represents one connected client on the server
#[derive(Debug, Clone)]
pub struct Session {
    /// Stable identifier of this connection
    pub id: SessionId,
    /// Name currently claimed in the registry
    pub display_name: DisplayName,
    /// Timestamp when the connection was accepted
    pub connected_at: Timestamp,
    state: SessionState,
}

impl Session {
    /// Create a session in the `Connecting` state
    pub fn new(id: SessionId, display_name: DisplayName, connected_at: Timestamp) -> Self {
        Self {
            id,
            display_name,
            connected_at,
            state: SessionState::Connecting,
        }
    }

    /// Current lifecycle state
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Whether the session is past `Connecting` and not yet closing
    pub fn is_active(&self) -> bool {
        self.state == SessionState::Active
    }

    /// Move to `next`.
    ///
    /// # Errors
    ///
    /// Returns `SessionStateError` for any backwards or skipping transition.
    pub fn transition(&mut self, next: SessionState) -> Result<(), SessionStateError> {
        if !self.state.can_transition_to(next) {
            return Err(SessionStateError {
                from: self.state,
                to: next,
            });
        }
        self.state = next;
        Ok(())
    }

    /// Enter `Closing` if not already there.
    ///
    /// Returns `true` only for the call that performed the transition, so
    /// teardown guarded by it runs exactly once.
    pub fn begin_closing(&mut self) -> bool {
        self.transition(SessionState::Closing).is_ok()
    }

    /// Record a successful rename
    pub fn rename(&mut self, display_name: DisplayName) {
        self.display_name = display_name;
    }
}
