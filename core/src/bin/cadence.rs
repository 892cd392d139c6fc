//! Cadence CLI
//!
//! Encodes and decodes radio payloads and runs the simulated send sequence on
//! the step engine. Set RUST_LOG=cadence_core=trace to watch every frame event.

use cadence_core::cli;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Err(e) = cli::run_cli() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
