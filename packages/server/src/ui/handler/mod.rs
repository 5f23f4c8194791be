//! Handler modules for accepted connections and the commands they send.

pub mod command;
pub mod connection;

pub use command::{CommandInterpreter, Flow};
pub use connection::handle_connection;
