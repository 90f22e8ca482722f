//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::{CareLinkConfig, DatabaseTarget, PostgreSQLConfig};
use super::secret::ConnectionString;
use crate::domain::errors::CareLinkError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into CareLinkConfig
/// 4. Applies environment variable overrides (CARELINK_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if:
/// - File cannot be read
/// - TOML parsing fails
/// - A referenced environment variable is not set
/// - Configuration validation fails
///
/// # Examples
///
/// ```no_run
/// use carelink::config::loader::load_config;
///
/// let config = load_config("carelink.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<CareLinkConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(CareLinkError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        CareLinkError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    parse_config(&contents)
}

/// Parses, overrides and validates configuration from TOML text
pub fn parse_config(contents: &str) -> Result<CareLinkConfig> {
    let contents = substitute_env_vars(contents)?;

    let mut config: CareLinkConfig = toml::from_str(&contents)
        .map_err(|e| CareLinkError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    apply_env_overrides(&mut config)?;

    config.validate().map_err(|e| {
        CareLinkError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are left untouched.
///
/// # Errors
///
/// Returns an error naming every referenced variable that is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| CareLinkError::Configuration(format!("Invalid substitution pattern: {e}")))?;
    let mut result = String::new();
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{}}}", var_name);
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(CareLinkError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

fn parse_env<T: std::str::FromStr>(name: &str, value: &str) -> Result<T> {
    value.parse().map_err(|_| {
        CareLinkError::Configuration(format!("Invalid value for {}: '{}'", name, value))
    })
}

/// Applies environment variable overrides using the CARELINK_* prefix
///
/// Environment variables follow the pattern CARELINK_<SECTION>_<KEY>, for
/// example CARELINK_POSTGRESQL_CONNECTION_STRING.
fn apply_env_overrides(config: &mut CareLinkConfig) -> Result<()> {
    if let Ok(val) = std::env::var("CARELINK_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    if let Ok(val) = std::env::var("CARELINK_DATABASE_TARGET") {
        config.database_target = match val.to_lowercase().as_str() {
            "postgresql" => DatabaseTarget::PostgreSQL,
            "memory" => DatabaseTarget::Memory,
            other => {
                return Err(CareLinkError::Configuration(format!(
                    "Invalid CARELINK_DATABASE_TARGET '{}'. Must be postgresql or memory",
                    other
                )))
            }
        };
    }

    // A connection string alone is enough to create the section
    if let Ok(val) = std::env::var("CARELINK_POSTGRESQL_CONNECTION_STRING") {
        match config.postgresql {
            Some(ref mut pg) => pg.connection_string = ConnectionString::new(val),
            None => {
                config.postgresql = Some(PostgreSQLConfig {
                    connection_string: ConnectionString::new(val),
                    max_connections: 10,
                    connection_timeout_seconds: 30,
                    statement_timeout_seconds: 60,
                })
            }
        }
    }
    if let Some(ref mut pg) = config.postgresql {
        if let Ok(val) = std::env::var("CARELINK_POSTGRESQL_MAX_CONNECTIONS") {
            pg.max_connections = parse_env("CARELINK_POSTGRESQL_MAX_CONNECTIONS", &val)?;
        }
        if let Ok(val) = std::env::var("CARELINK_POSTGRESQL_CONNECTION_TIMEOUT_SECONDS") {
            pg.connection_timeout_seconds =
                parse_env("CARELINK_POSTGRESQL_CONNECTION_TIMEOUT_SECONDS", &val)?;
        }
        if let Ok(val) = std::env::var("CARELINK_POSTGRESQL_STATEMENT_TIMEOUT_SECONDS") {
            pg.statement_timeout_seconds =
                parse_env("CARELINK_POSTGRESQL_STATEMENT_TIMEOUT_SECONDS", &val)?;
        }
    }

    if let Ok(val) = std::env::var("CARELINK_MEMORY_FIXTURE_PATH") {
        config.memory.fixture_path = Some(val);
    }

    if let Ok(val) = std::env::var("CARELINK_TRANSFER_ENFORCE_SOURCE_SCOPE") {
        config.transfer.enforce_source_scope =
            parse_env("CARELINK_TRANSFER_ENFORCE_SOURCE_SCOPE", &val)?;
    }

    if let Ok(val) = std::env::var("CARELINK_SCORING_DISPLAY_PRECISION") {
        config.scoring.display_precision = parse_env("CARELINK_SCORING_DISPLAY_PRECISION", &val)?;
    }

    if let Ok(val) = std::env::var("CARELINK_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = parse_env("CARELINK_LOGGING_LOCAL_ENABLED", &val)?;
    }
    if let Ok(val) = std::env::var("CARELINK_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
    if let Ok(val) = std::env::var("CARELINK_LOGGING_LOCAL_ROTATION") {
        config.logging.local_rotation = val;
    }

    Ok(())
}
