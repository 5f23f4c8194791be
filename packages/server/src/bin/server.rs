//! Line-oriented TCP chat server.
//!
//! Every client gets a `Usuario<N>` name on connect and can then rename
//! itself, message one user privately or message everyone.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin tertulia-server -- --port 8080
//! ```

use clap::Parser;
use tertulia_server::Server;
use tertulia_shared::{DEFAULT_PORT, logger::setup_logger};

#[derive(Parser, Debug)]
#[command(name = "tertulia-server", version, about, long_about = None)]
struct Args {
    /// Address to listen on
    #[arg(long, env = "TERTULIA_HOST", default_value = "0.0.0.0")]
    host: String,

    /// Port to listen on
    #[arg(long, env = "TERTULIA_PORT", default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Default log filter when RUST_LOG is unset
    #[arg(long, env = "TERTULIA_LOG", default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), &args.log_level);

    let addr = format!("{}:{}", args.host, args.port);
    let result = match Server::bind(addr.as_str()).await {
        Ok(server) => server.run().await,
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
