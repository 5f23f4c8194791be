//! Shared library for the Tertulia chat server and client.
//!
//! Holds the pieces both binaries agree on: the text command grammar, the
//! line framing used on the wire, and logging/time helpers.

pub mod logger;
pub mod protocol;
pub mod time;
pub mod transport;

pub use protocol::{Command, DEFAULT_PORT, ParseError};
pub use transport::{FramedLines, TransportError, frame, read_message, write_message};
