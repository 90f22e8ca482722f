//! Domain error types
//!
//! This module defines the error hierarchy for CareLink.
//! All errors are domain-specific and don't expose third-party types.
//!
//! A failed checksum comparison is deliberately absent here: it is a
//! legitimate business outcome recorded as `TransferStatus::Failed`,
//! not an error.

use crate::domain::ids::{ConnectionId, HospitalId, TransferId};
use crate::domain::transfer::TransferStatus;
use thiserror::Error;

/// Main CareLink error type
///
/// This is the primary error type used throughout the application.
/// It wraps specific error types and provides context for error handling.
#[derive(Debug, Error)]
pub enum CareLinkError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Missing or invalid patient, department or hospital.
    /// Always raised before any mutation.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Transfer lifecycle errors
    #[error("Transfer error: {0}")]
    Transfer(#[from] TransferError),

    /// Hospital graph invariant errors
    #[error("Hospital network error: {0}")]
    Graph(#[from] GraphError),

    /// Store failures; the operation in progress was rolled back
    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),
}

impl CareLinkError {
    /// Returns true for errors caused by caller input rather than the system
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            CareLinkError::Validation(_)
                | CareLinkError::Graph(_)
                | CareLinkError::Transfer(TransferError::NotFound(_))
                | CareLinkError::Transfer(TransferError::InvalidTransition { .. })
        )
    }
}

/// Transfer lifecycle errors
#[derive(Debug, Error)]
pub enum TransferError {
    /// Transfer does not exist
    #[error("Transfer not found: {0}")]
    NotFound(TransferId),

    /// Requested status change is not in the transition table
    #[error("Transfer {transfer_id} cannot move from {from} to {to}")]
    InvalidTransition {
        transfer_id: TransferId,
        from: TransferStatus,
        to: TransferStatus,
    },

    /// Stored transfer has no source checksum to compare against
    #[error("Transfer {0} has no original checksum")]
    MissingOriginalChecksum(TransferId),
}

/// Hospital graph errors
#[derive(Debug, Error)]
pub enum GraphError {
    /// A hospital cannot link to itself
    #[error("A hospital cannot connect to itself: {0}")]
    SelfConnection(HospitalId),

    /// The exact ordered pair already exists
    #[error("Connection already exists: {from} -> {to}")]
    DuplicateConnection { from: HospitalId, to: HospitalId },

    /// No connection row with this id
    #[error("Connection not found: {0}")]
    ConnectionNotFound(ConnectionId),

    /// Cost, latency or reliability out of range
    #[error("Invalid connection metrics: {0}")]
    InvalidMetrics(String),
}

/// Store-specific errors
///
/// These errors don't expose third-party driver types.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// Failed to reach the store
    #[error("Failed to connect to store: {0}")]
    ConnectionFailed(String),

    /// Read query failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Write failed; the transaction was rolled back
    #[error("Write failed: {0}")]
    WriteFailed(String),

    /// Transaction could not be opened or committed
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    /// Row changed underneath the caller
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Stored row could not be mapped to a domain type
    #[error("Corrupt row: {0}")]
    CorruptRow(String),

    /// Schema migration failed
    #[error("Migration failed: {0}")]
    MigrationFailed(String),
}

// Conversion from std::io::Error
impl From<std::io::Error> for CareLinkError {
    fn from(err: std::io::Error) -> Self {
        CareLinkError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for CareLinkError {
    fn from(err: serde_json::Error) -> Self {
        CareLinkError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for CareLinkError {
    fn from(err: toml::de::Error) -> Self {
        CareLinkError::Configuration(format!("TOML parse error: {err}"))
    }
}
