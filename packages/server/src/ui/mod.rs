//! TCP chat server implementation.

mod handler;
mod server;
mod signal;
pub mod state;

pub use handler::{CommandInterpreter, Flow, handle_connection};
pub use server::Server;
pub use signal::shutdown_signal;
pub use state::AppState;
