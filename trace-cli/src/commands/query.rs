//! Query Commands
//!
//! Read-only queries against the traceability API.

use clap::Subcommand;

/// Query subcommands
#[derive(Subcommand, Debug)]
pub enum QueryCommands {
    /// List entities of one kind (farm, harvest, batch, lot, consignment)
    List {
        /// Entity kind
        kind: String,
    },

    /// Fetch one entity by id
    Get {
        /// Entity kind
        kind: String,
        /// Entity id
        id: String,
    },

    /// Legal next statuses for an entity as the acting role
    Actions {
        /// Entity kind
        kind: String,
        /// Entity id
        id: String,
    },

    /// Recent audit records, newest first
    Audit {
        /// Maximum number of records
        #[arg(short, long, default_value = "50")]
        limit: usize,
    },

    /// The signed-in user's profile
    Me,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Harness {
        #[command(subcommand)]
        cmd: QueryCommands,
    }

    #[test]
    fn test_parse_list() {
        let h = Harness::try_parse_from(["q", "list", "batch"]).unwrap();
        match h.cmd {
            QueryCommands::List { kind } => assert_eq!(kind, "batch"),
            _ => panic!("expected list"),
        }
    }

    #[test]
    fn test_parse_audit_default_limit() {
        let h = Harness::try_parse_from(["q", "audit"]).unwrap();
        match h.cmd {
            QueryCommands::Audit { limit } => assert_eq!(limit, 50),
            _ => panic!("expected audit"),
        }
    }
}
