//! CLI entry point for the Gramps XML translator.

use tracing_subscriber::EnvFilter;
use wtfamily_gramps_etl::cli;

fn main() {
    // WARN by default, respecting RUST_LOG; diagnostics stay on stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = cli::run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
