//! Line-oriented TCP chat server library.
//!
//! Clients connect over TCP, receive a unique `Usuario<N>` display name, and
//! exchange private and broadcast text messages. The crate is split into
//! layers:
//!
//! - [`domain`]: sessions, display names, the registry trait.
//! - [`infrastructure`]: the in-memory registry and the notice texts.
//! - [`usecase`]: one use case per server-side command.
//! - [`ui`]: the accept loop, per-connection dispatcher and command
//!   interpreter.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

pub mod error;

// Re-export entry points
pub use error::ServerError;
pub use ui::{AppState, Server};
