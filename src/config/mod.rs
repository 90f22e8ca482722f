//! Configuration management for CareLink.
//!
//! This module provides TOML-based configuration loading, parsing, and validation.
//!
//! # Overview
//!
//! CareLink uses TOML configuration files with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `CARELINK_*` environment overrides
//! - Default values for optional settings
//! - Validation with descriptive messages
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use carelink::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("carelink.toml")?;
//!
//! println!("Store: {}", config.database_target);
//! println!("Score precision: {}", config.scoring.display_precision);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - Application settings (log level)
//! - [`PostgreSQLConfig`] - PostgreSQL connection pool
//! - [`MemoryConfig`] - In-process store fixture
//! - [`TransferConfig`] - Transfer lifecycle rules
//! - [`ScoringConfig`] - Destination ranking display
//! - [`LoggingConfig`] - Logging configuration
//!
//! # Example Configuration
//!
//! ```toml
//! database_target = "postgresql"
//!
//! [application]
//! log_level = "info"
//!
//! [postgresql]
//! connection_string = "${CARELINK_PG_URL}"
//! max_connections = 10
//!
//! [transfer]
//! enforce_source_scope = true
//!
//! [scoring]
//! display_precision = 4
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use loader::{load_config, parse_config};
pub use schema::{
    ApplicationConfig, CareLinkConfig, DatabaseTarget, LoggingConfig, MemoryConfig,
    PostgreSQLConfig, ScoringConfig, TransferConfig,
};
pub use secret::ConnectionString;
