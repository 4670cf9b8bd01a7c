//! Tracing subscriber setup shared by both binaries.

use tracing_subscriber::{EnvFilter, fmt};

pub const DEFAULT_FILTER: &str = "data_tools_mcp=info,warn";

/// Installs a JSON subscriber on stderr; stdout carries the protocol.
/// `RUST_LOG` overrides [`DEFAULT_FILTER`].
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .json()
        .init();
}
