//! Validate config command implementation

use super::{EXIT_CONFIG, EXIT_OK};
use crate::config::load_config;
use crate::config::schema::DatabaseTarget;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    ///
    /// Loading already validates; this reports the result and a summary.
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Configuration validation failed");
                println!("   Error: {e}");
                println!();
                return Ok(EXIT_CONFIG);
            }
        };

        println!("✅ Configuration is valid");
        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!("  Store: {}", config.database_target);

        match config.database_target {
            DatabaseTarget::PostgreSQL => {
                if let Some(ref pg_config) = config.postgresql {
                    println!("  PostgreSQL Server: {}", pg_config.connection_string.server());
                    println!("  Max Connections: {}", pg_config.max_connections);
                    println!(
                        "  Statement Timeout: {}s",
                        pg_config.statement_timeout_seconds
                    );
                }
            }
            DatabaseTarget::Memory => {
                println!(
                    "  Fixture: {}",
                    config.memory.fixture_path.as_deref().unwrap_or("(empty store)")
                );
            }
        }

        println!(
            "  Enforce Source Scope: {}",
            config.transfer.enforce_source_scope
        );
        println!(
            "  Score Precision: {}",
            config.scoring.display_precision
        );
        if config.logging.local_enabled {
            println!(
                "  Log File: {} ({})",
                config.logging.local_path, config.logging.local_rotation
            );
        }
        println!();
        Ok(EXIT_OK)
    }
}
