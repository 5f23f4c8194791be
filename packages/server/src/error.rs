//! Server-level error definitions.

use std::io;

use thiserror::Error;

/// Errors that stop the server itself. Per-session failures never surface
/// here.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to bind {addr}: {source}")]
    Bind { addr: String, source: io::Error },

    #[error("failed to read local address: {0}")]
    LocalAddr(#[source] io::Error),
}
