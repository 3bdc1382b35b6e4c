//! CLI entry point for the fact checker.

use truthtrace::cli;
use tracing_subscriber::EnvFilter;

fn main() {
    // API keys and endpoints may come from a .env file in the working directory
    dotenv::dotenv().ok();

    // Initialize tracing with WARN level by default, respecting RUST_LOG
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
