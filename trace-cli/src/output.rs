//! Output Formatting
//!
//! Utilities for formatting CLI output in various formats.

use crate::client::{HealthResponse, StatsResponse};
use crate::commands::OutputFormat;
use serde::Serialize;

/// Format and print data based on output format
pub fn print_output<T: Serialize>(data: &T, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(data),
        OutputFormat::Table | OutputFormat::Plain => print_json(data),
    }
}

/// Print as JSON
fn print_json<T: Serialize>(data: &T) {
    match serde_json::to_string_pretty(data) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error formatting JSON: {}", e),
    }
}

/// Print health response
pub fn print_health(health: &HealthResponse, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(health),
        OutputFormat::Table | OutputFormat::Plain => {
            println!("Traceability Service Health");
            println!("===========================");
            println!("Status:  {}", health.status);
            println!("Version: {}", health.version);
            println!("Uptime:  {}s", health.uptime_secs);
        }
    }
}

/// Print stats response
pub fn print_stats(stats: &StatsResponse, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(stats),
        OutputFormat::Table | OutputFormat::Plain => {
            println!("Service Statistics");
            println!("==================");
            println!("Total Requests:  {}", stats.total_requests);
            println!("Uptime:          {}s", stats.uptime_secs);
            println!("Audit Verified:  {}", stats.audit_records_verified);
        }
    }
}

/// Print info message
pub fn print_info(message: &str) {
    println!("{}", message);
}

/// Print a table row
pub fn print_row(key: &str, value: &str) {
    println!("{:<20} {}", key, value);
}
