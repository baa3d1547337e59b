//! Command Handlers
//!
//! Handler functions for CLI commands.

use crate::client::{TraceClient, TransitionRequest};
use crate::commands::{
    config::{defaults, ConfigCommands},
    kyc::KycCommands,
    query::QueryCommands,
    transition::TransitionArgs,
    Cli, Commands, OutputFormat,
};
use crate::error::{CliError, CliResult};
use crate::output;
use trace_core::types::EntityKind;

/// Run the CLI with parsed arguments
pub async fn run(cli: Cli) -> CliResult<()> {
    match &cli.command {
        Commands::Serve { host, port } => handle_serve(host.clone(), *port).await,
        Commands::Config(cmd) => handle_config(&cli, cmd),
        _ => {
            let client = TraceClient::new(&cli.api_url, cli.token.clone())?;
            match cli.command {
                Commands::Health => handle_health(&client, cli.format).await,
                Commands::Stats => handle_stats(&client, cli.format).await,
                Commands::Dashboard => handle_dashboard(&client, cli.format).await,
                Commands::Query(cmd) => handle_query(&client, cmd, cli.format).await,
                Commands::Transition(args) => handle_transition(&client, args, cli.format).await,
                Commands::Kyc(cmd) => handle_kyc(&client, cmd, cli.format).await,
                Commands::Serve { .. } | Commands::Config(_) => unreachable!(),
            }
        }
    }
}

fn parse_kind(name: &str) -> CliResult<EntityKind> {
    EntityKind::parse(name)
        .ok_or_else(|| CliError::invalid_arg(format!("Unknown entity kind: {}", name)))
}

/// Handle starting the API server
async fn handle_serve(host: String, port: u16) -> CliResult<()> {
    let metrics_config = trace_api::MetricsConfig::from_env();
    trace_api::init_metrics(&metrics_config).map_err(CliError::server)?;

    let api_config = trace_api::ApiConfig {
        listen_addr: format!("{}:{}", host, port),
        ..trace_api::ApiConfig::from_env()
    };
    let auth_config = trace_api::AuthConfig::from_env();

    println!("Starting traceability API server...");
    println!("  Listen:  {}", api_config.listen_addr);
    println!("  CORS:    {}", api_config.enable_cors);
    println!("  Auth:    {}", auth_config.enabled);

    let state = trace_api::AppState::with_config(api_config).with_auth(auth_config);

    trace_api::start_server(state)
        .await
        .map_err(|e| CliError::server(format!("Server error: {}", e)))?;

    Ok(())
}

/// Handle health check command
async fn handle_health(client: &TraceClient, format: OutputFormat) -> CliResult<()> {
    let health = client.health().await?;
    output::print_health(&health, format);
    Ok(())
}

/// Handle stats command
async fn handle_stats(client: &TraceClient, format: OutputFormat) -> CliResult<()> {
    let stats = client.stats().await?;
    output::print_stats(&stats, format);
    Ok(())
}

/// Handle dashboard command
async fn handle_dashboard(client: &TraceClient, format: OutputFormat) -> CliResult<()> {
    let dashboard = client.dashboard().await?;
    output::print_output(&dashboard, format);
    Ok(())
}

/// Handle query commands
async fn handle_query(
    client: &TraceClient,
    cmd: QueryCommands,
    format: OutputFormat,
) -> CliResult<()> {
    match cmd {
        QueryCommands::List { kind } => {
            let result = client.list(parse_kind(&kind)?).await?;
            output::print_output(&result, format);
        }
        QueryCommands::Get { kind, id } => {
            let result = client.get(parse_kind(&kind)?, &id).await?;
            output::print_output(&result, format);
        }
        QueryCommands::Actions { kind, id } => {
            let result = client.actions(parse_kind(&kind)?, &id).await?;
            output::print_output(&result, format);
        }
        QueryCommands::Audit { limit } => {
            let result = client.audit(limit).await?;
            output::print_output(&result, format);
        }
        QueryCommands::Me => {
            let result = client.me().await?;
            output::print_output(&result, format);
        }
    }
    Ok(())
}

/// Handle the transition command
async fn handle_transition(
    client: &TraceClient,
    args: TransitionArgs,
    format: OutputFormat,
) -> CliResult<()> {
    let kind = parse_kind(&args.kind)?;
    if args.bags.is_some() != args.weight.is_some() {
        return Err(CliError::invalid_arg(
            "A receipt needs both --bags and --weight",
        ));
    }
    let request = TransitionRequest {
        status: args.status,
        number_of_bags_received: args.bags,
        received_weight_kg: args.weight,
    };

    let result = client.transition(kind, &args.id, &request).await?;
    output::print_output(&result, format);
    Ok(())
}

/// Handle KYC commands
async fn handle_kyc(
    client: &TraceClient,
    cmd: KycCommands,
    format: OutputFormat,
) -> CliResult<()> {
    match cmd {
        KycCommands::Submit { name, role } => {
            let result = client.submit_kyc(&name, &role).await?;
            output::print_output(&result, format);
        }
        KycCommands::Review { user_id, status } => {
            let result = client.review_kyc(&user_id, &status).await?;
            output::print_output(&result, format);
        }
    }
    Ok(())
}

/// Handle config commands
fn handle_config(cli: &Cli, cmd: &ConfigCommands) -> CliResult<()> {
    match cmd {
        ConfigCommands::Show => {
            output::print_info("Current Configuration:");
            output::print_row("API URL:", &cli.api_url);
            output::print_row(
                "Token:",
                if cli.token.is_some() { "set" } else { "unset" },
            );
            output::print_row("Default URL:", defaults::API_URL);
            output::print_row("Timeout:", &format!("{}s", defaults::TIMEOUT));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_kind_accepts_known_kinds() {
        assert_eq!(parse_kind("batch").unwrap(), EntityKind::Batch);
        assert_eq!(parse_kind("consignment").unwrap(), EntityKind::Consignment);
    }

    #[test]
    fn test_parse_kind_fails_closed() {
        let err = parse_kind("shipment").unwrap_err();
        assert!(matches!(err, CliError::InvalidArgument { .. }));
    }
}
