//! Migrate command implementation
//!
//! Applies the bundled PostgreSQL schema. Every statement is idempotent, so
//! running it against an initialized database is a no-op.

use super::{report_error, EXIT_CONFIG, EXIT_OK};
use crate::adapters::database::create_postgresql_client;
use crate::config::load_config;
use crate::config::schema::DatabaseTarget;
use clap::Args;

/// Arguments for the migrate command
#[derive(Args, Debug)]
pub struct MigrateArgs {
    /// Print the schema instead of applying it
    #[arg(long)]
    pub print: bool,
}

impl MigrateArgs {
    /// Execute the migrate command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        if self.print {
            print!("{}", crate::adapters::postgresql::client::INITIAL_SCHEMA);
            return Ok(EXIT_OK);
        }

        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => return Ok(report_error("Failed to load configuration file", &e)),
        };

        if config.database_target != DatabaseTarget::PostgreSQL {
            println!("❌ migrate requires database_target = \"postgresql\"");
            println!("   Current store: {}", config.database_target);
            return Ok(EXIT_CONFIG);
        }

        println!("🗄️  Applying PostgreSQL schema");

        let client = match create_postgresql_client(&config).await {
            Ok(client) => client,
            Err(e) => return Ok(report_error("Failed to connect to PostgreSQL", &e)),
        };

        if let Err(e) = client.test_connection().await {
            return Ok(report_error("Failed to connect to PostgreSQL", &e));
        }
        println!("✅ Connected to {}", client.connection_string_safe());

        match client.run_migrations().await {
            Ok(()) => {
                println!("✅ Schema is up to date");
                Ok(EXIT_OK)
            }
            Err(e) => Ok(report_error("Schema migration failed", &e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn test_migrate_rejects_memory_target() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"database_target = \"memory\"\n").unwrap();
        file.flush().unwrap();

        let args = MigrateArgs { print: false };
        let code = args.execute(&file.path().to_string_lossy()).await.unwrap();
        assert_eq!(code, EXIT_CONFIG);
    }

    #[tokio::test]
    async fn test_migrate_print_needs_no_config() {
        let args = MigrateArgs { print: true };
        assert_eq!(args.execute("/nonexistent.toml").await.unwrap(), EXIT_OK);
    }
}
