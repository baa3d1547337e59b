//! Traceability CLI Entry Point
//!
//! Configuration is loaded from environment variables (via .env file).
//! Command-line arguments override environment variables.
//!
//! Usage:
//!   trace serve       - Start the traceability API server
//!   trace health      - Check service health
//!   trace stats       - Show service statistics
//!   trace dashboard   - Show the role-scoped dashboard
//!   trace query       - Query entities and the audit trail
//!   trace transition  - Move an entity through its workflow
//!   trace kyc         - Submit or review KYC profiles
//!   trace config      - Show resolved configuration

use clap::Parser;
use trace_cli::{handler, Cli};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Load .env file (ignore if not found)
    dotenvy::dotenv().ok();

    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging if verbose
    if cli.verbose {
        init_logging();
    }

    // Run the CLI
    if let Err(e) = handler::run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(e.exit_code());
    }
}

/// Initialize logging with tracing
fn init_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "trace_cli=debug,trace_api=debug,trace_store=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
