//! Interactive chat client.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin tertulia-client
//! ```
//! then type `start-conection 127.0.0.1` at the prompt.

use tertulia_client::Shell;
use tertulia_shared::logger::setup_logger;

fn main() {
    // Only warnings, so log lines don't clutter the prompt
    setup_logger(env!("CARGO_BIN_NAME"), "warn");

    if let Err(e) = Shell::new().and_then(Shell::run) {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
