//! Domain layer for the chat server.
//!
//! This module contains the session and registry model, independent of
//! the wire format and of the TCP transport.

pub mod entity;
pub mod error;
pub mod factory;
pub mod repository;
pub mod value_object;

pub use entity::{OUTBOUND_QUEUE_CAPACITY, OutboundChannel, Session, SessionState};
pub use error::{RegistryError, SessionStateError, ValueObjectError};
pub use factory::{DefaultNameFactory, SessionIdFactory};
pub use repository::SessionRegistry;
pub use value_object::{DisplayName, SessionId, Timestamp};
