//! Traceability CLI - Command Line Interface
//!
//! Command-line interface for the coffee traceability platform.
//!
//! # Features
//!
//! - Run the API server (`trace serve`)
//! - Query farms, harvests, batches, lots and consignments
//! - Move entities through their status workflows
//! - Submit and review KYC profiles
//! - Inspect the audit trail
//!
//! # Usage
//!
//! ```text
//! trace [OPTIONS] <COMMAND>
//!
//! Commands:
//!   serve       Start the traceability API server
//!   health      Check service health
//!   stats       Show service statistics
//!   dashboard   Show the role-scoped dashboard
//!   query       Query entities and the audit trail
//!   transition  Move an entity through its workflow
//!   kyc         Submit or review KYC profiles
//!   config      Show resolved configuration
//!
//! Options:
//!   -a, --api-url <URL>    API endpoint URL [default: http://localhost:3000]
//!   -t, --token <TOKEN>    Bearer token for authenticated requests
//!   -f, --format <FORMAT>  Output format (json, table, plain) [default: table]
//!   -v, --verbose          Enable verbose output
//! ```
//!
//! # Examples
//!
//! ## Check health
//! ```text
//! trace health
//! ```
//!
//! ## Receive a batch as a processor
//! ```text
//! trace --token s3cret transition batch batch:42 received \
//!   --bags 8 --weight 480
//! ```
//!
//! ## Inspect legal next moves
//! ```text
//! trace query actions lot lot:7
//! ```

pub mod client;
pub mod commands;
pub mod error;
pub mod handler;
pub mod output;

pub use client::TraceClient;
pub use commands::{Cli, Commands, OutputFormat};
pub use error::{CliError, CliResult};

/// Traceability CLI version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
