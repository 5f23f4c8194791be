//! Tracing subscriber setup shared by the server and client binaries.

use std::fmt;

use tracing_subscriber::{
    EnvFilter,
    fmt::{format::Writer, time::FormatTime},
};

use crate::time::now_jst;

/// Log timestamps in JST with millisecond precision.
struct JstTimer;

impl FormatTime for JstTimer {
    fn format_time(&self, w: &mut Writer<'_>) -> fmt::Result {
        write!(w, "{}", now_jst().format("%Y-%m-%dT%H:%M:%S%.3f%:z"))
    }
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence; otherwise `default_level` is used as the
/// filter directive. Logs go to stderr so they never mix with the client
/// shell's stdout. Calling this twice is harmless.
pub fn setup_logger(name: &str, default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(JstTimer)
        .with_ansi(true)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init();

    if installed.is_ok() {
        tracing::debug!(name, default_level, "logger initialized");
    }
}
