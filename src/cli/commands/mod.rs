//! CLI command implementations
//!
//! Every command returns an exit code:
//! 0 success, 1 negative business outcome, 2 configuration error,
//! 3 validation error, 4 store connection error, 5 fatal error.

pub mod connections;
pub mod init;
pub mod migrate;
pub mod rank;
pub mod transfer;
pub mod validate;

use crate::adapters::database::{create_store, CareStore};
use crate::config::{load_config, CareLinkConfig};
use crate::domain::errors::{CareLinkError, PersistenceError};
use crate::log_error_with_context;
use std::sync::Arc;

pub const EXIT_OK: i32 = 0;
pub const EXIT_REJECTED: i32 = 1;
pub const EXIT_CONFIG: i32 = 2;
pub const EXIT_VALIDATION: i32 = 3;
pub const EXIT_CONNECTION: i32 = 4;
pub const EXIT_FATAL: i32 = 5;

/// Map an error to the exit code the CLI reports
pub fn exit_code_for(error: &CareLinkError) -> i32 {
    match error {
        CareLinkError::Configuration(_) => EXIT_CONFIG,
        CareLinkError::Persistence(PersistenceError::ConnectionFailed(_)) => EXIT_CONNECTION,
        e if e.is_client_error() => EXIT_VALIDATION,
        _ => EXIT_FATAL,
    }
}

/// Print an error the way every command reports failures
pub(crate) fn report_error(action: &str, error: &CareLinkError) -> i32 {
    log_error_with_context!(error, action);
    println!("❌ {action}");
    println!("   Error: {error}");
    exit_code_for(error)
}

/// Load the configuration and build the configured store
///
/// On failure the error is printed and the exit code is returned.
pub(crate) async fn open_store(
    config_path: &str,
) -> Result<(CareLinkConfig, Arc<dyn CareStore>), i32> {
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(e) => return Err(report_error("Failed to load configuration file", &e)),
    };

    let store = match create_store(&config).await {
        Ok(s) => s,
        Err(e) => return Err(report_error("Failed to open store", &e)),
    };

    Ok((config, store))
}
