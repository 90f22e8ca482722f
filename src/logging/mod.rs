//! Logging and observability
//!
//! This module provides structured logging with support for:
//! - JSON-formatted file logs
//! - Configurable log levels
//! - Local file logging with rotation
//!
//! # Example
//!
//! ```no_run
//! use carelink::logging::init_logging;
//! use carelink::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard};

/// Log a transfer status change
///
/// # Example
///
/// ```no_run
/// use carelink::log_transfer_transition;
/// use carelink::domain::{TransferId, TransferStatus};
///
/// let id = TransferId::new(7);
/// log_transfer_transition!(id, TransferStatus::Pending, TransferStatus::Verified);
/// ```
#[macro_export]
macro_rules! log_transfer_transition {
    ($transfer_id:expr, $from:expr, $to:expr) => {
        tracing::info!(
            transfer_id = %$transfer_id,
            from = %$from,
            to = %$to,
            "Transfer status changed"
        );
    };
}

/// Log the comparison of two payload digests
///
/// Only the first 12 hex characters of each digest are logged.
///
/// # Example
///
/// ```no_run
/// use carelink::log_checksum_comparison;
/// use carelink::domain::{Checksum, TransferId};
///
/// let original = Checksum::new("a".repeat(64)).unwrap();
/// let verified = Checksum::new("a".repeat(64)).unwrap();
/// log_checksum_comparison!(TransferId::new(7), &original, &verified);
/// ```
#[macro_export]
macro_rules! log_checksum_comparison {
    ($transfer_id:expr, $original:expr, $verified:expr) => {
        if $original == $verified {
            tracing::info!(
                transfer_id = %$transfer_id,
                checksum = $original.short(),
                "Checksums match"
            );
        } else {
            tracing::warn!(
                transfer_id = %$transfer_id,
                original = $original.short(),
                verified = $verified.short(),
                "Checksum mismatch, record drifted since initiation"
            );
        }
    };
}

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use carelink::log_error_with_context;
/// use carelink::domain::CareLinkError;
///
/// let error = CareLinkError::Configuration("Invalid config".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}
