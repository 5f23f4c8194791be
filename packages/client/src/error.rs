//! Client-side error definitions.

use std::io;

use rustyline::error::ReadlineError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("could not connect to {address}: {source}")]
    Connect {
        address: String,
        #[source]
        source: io::Error,
    },

    #[error("not connected")]
    NotConnected,

    #[error("line editor failed: {0}")]
    Readline(#[from] ReadlineError),

    #[error("failed to start async runtime: {0}")]
    Runtime(#[source] io::Error),
}
