//! KYC Commands
//!
//! Submit and review KYC profiles.

use clap::Subcommand;

/// KYC subcommands
#[derive(Subcommand, Debug)]
pub enum KycCommands {
    /// Submit a KYC profile for the signed-in user
    Submit {
        /// Display name
        #[arg(long)]
        name: String,
        /// Requested role (farmer, processor, exporter)
        #[arg(long)]
        role: String,
    },

    /// Review a pending submission (extension worker)
    Review {
        /// User id to review
        user_id: String,
        /// Outcome: verified or rejected
        status: String,
    },
}
