//! Interactive command-line client for the Tertulia chat server.

pub mod action;
pub mod connection;
pub mod error;
pub mod shell;

pub use action::{ShellAction, plan};
pub use connection::{Connection, ServerEvent};
pub use error::ClientError;
pub use shell::Shell;
