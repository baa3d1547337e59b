//! Config Command
//!
//! Shows the configuration the CLI resolved from flags and environment.

use clap::Subcommand;

/// Default configuration values
pub mod defaults {
    /// Default API URL
    pub const API_URL: &str = "http://localhost:3000";
    /// Default output format
    pub const OUTPUT_FORMAT: &str = "table";
    /// Default request timeout in seconds
    pub const TIMEOUT: u64 = 30;
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show resolved configuration
    Show,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        assert_eq!(defaults::API_URL, "http://localhost:3000");
        assert_eq!(defaults::TIMEOUT, 30);
    }
}
