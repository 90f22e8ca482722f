//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use super::{EXIT_CONFIG, EXIT_FATAL, EXIT_OK};
use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "carelink.toml")]
    pub output: String,

    /// Generate a PostgreSQL configuration with every option commented
    #[arg(long)]
    pub with_examples: bool,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing CareLink configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(EXIT_CONFIG);
        }

        let config_content = if self.with_examples {
            Self::generate_config_with_examples()
        } else {
            Self::generate_minimal_config()
        };

        match fs::write(&self.output, config_content) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your settings", self.output);
                println!("  2. Set database_target to 'postgresql' or 'memory'");
                println!("  3. For PostgreSQL, export CARELINK_PG_URL (or put it in .env)");
                println!("     and run: carelink migrate");
                println!("  4. Validate configuration: carelink validate-config");
                println!("  5. Rank destinations: carelink --hospital H1 rank --department 1");
                println!();
                Ok(EXIT_OK)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {}", e);
                Ok(EXIT_FATAL)
            }
        }
    }

    /// Generate minimal configuration
    fn generate_minimal_config() -> String {
        r#"# CareLink Configuration File

database_target = "memory"

[application]
log_level = "info"

[memory]
# fixture_path = "demos/fixture.json"

[transfer]
enforce_source_scope = true

[scoring]
display_precision = 4
"#
        .to_string()
    }

    /// Generate configuration with examples and comments
    fn generate_config_with_examples() -> String {
        r#"# CareLink Configuration File
# Inter-hospital patient transfers with integrity verification

# Store backend: "postgresql" or "memory"
database_target = "postgresql"

[application]
# trace, debug, info, warn, error
log_level = "info"

[postgresql]
# Substituted from the environment when the file is loaded
connection_string = "${CARELINK_PG_URL}"
max_connections = 10
connection_timeout_seconds = 30
statement_timeout_seconds = 60

[memory]
# JSON fixture seeding the in-process store
# fixture_path = "demos/fixture.json"

[transfer]
# Only the patient's current hospital may initiate a transfer
enforce_source_scope = true

[scoring]
# Decimal places shown for destination scores (0-12)
display_precision = 4

[logging]
# Console logging is always on; this adds a rolling file
local_enabled = false
local_path = "./logs"
# daily, hourly or never
local_rotation = "daily"
"#
        .to_string()
    }
}
