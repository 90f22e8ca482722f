// CareLink - Inter-hospital patient transfer service
// Copyright (c) 2025 CareLink Contributors
// Licensed under the MIT License

use carelink::cli::commands::EXIT_FATAL;
use carelink::cli::{Cli, Commands};
use carelink::config::LoggingConfig;
use carelink::logging::init_logging;
use clap::Parser;
use std::process;

#[tokio::main]
async fn main() {
    // A missing .env file is not an error
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Console-only logging for the CLI
    let log_level = cli.log_level.as_deref().unwrap_or("info");
    let _guard = match init_logging(log_level, &LoggingConfig::default()) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            process::exit(EXIT_FATAL);
        }
    };

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "CareLink - inter-hospital patient transfers"
    );

    let exit_code = match execute_command(&cli).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "Command execution failed");
            eprintln!("Error: {e}");
            EXIT_FATAL
        }
    };

    process::exit(exit_code);
}

/// Execute the CLI command
async fn execute_command(cli: &Cli) -> anyhow::Result<i32> {
    match &cli.command {
        Commands::Init(args) => args.execute().await,
        Commands::ValidateConfig(args) => args.execute(&cli.config).await,
        Commands::Migrate(args) => args.execute(&cli.config).await,
        Commands::Transfer(args) => args.execute(&cli.config, cli.request_context()).await,
        Commands::Connections(args) => args.execute(&cli.config, cli.request_context()).await,
        Commands::Rank(args) => args.execute(&cli.config, cli.hospital.as_ref()).await,
    }
}
