//! Domain models and types for CareLink.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Strongly-typed identifiers** ([`PatientId`], [`HospitalId`], [`TransferId`], ...)
//! - **Reference records** read from the CRUD side ([`Patient`], [`TreatmentSession`], ...)
//! - **Core entities** written by this crate ([`Transfer`], [`HospitalConnection`], [`AccessGrant`])
//! - **Error types** ([`CareLinkError`], [`TransferError`], [`GraphError`], [`PersistenceError`])
//! - **Result type alias** ([`Result`])
//!
//! # Type Safety
//!
//! Identifiers are newtypes, so a hospital id can never be passed where a
//! patient id is expected:
//!
//! ```rust
//! use carelink::domain::{HospitalId, PatientId};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let patient = PatientId::new("7d44b88c-4199-4bad-97dc-d78268e01398")?;
//! let hospital = HospitalId::new("st-mary")?;
//!
//! // This won't compile
//! // let wrong: PatientId = hospital;
//! # Ok(())
//! # }
//! ```

pub mod access;
pub mod connection;
pub mod errors;
pub mod ids;
pub mod records;
pub mod request;
pub mod result;
pub mod transfer;

// Re-export commonly used types for convenience
pub use access::{AccessGrant, NewAccessGrant};
pub use connection::{ConnectionPair, HospitalConnection, LinkMetrics, NewConnection};
pub use errors::{CareLinkError, GraphError, PersistenceError, TransferError};
pub use ids::{
    AdminId, ConnectionId, DepartmentId, DeviceId, DoctorId, GrantId, HospitalId, PatientId,
    SessionId, TransferId, TreatmentId,
};
pub use records::{Department, Hospital, Patient, TreatmentSession};
pub use request::RequestContext;
pub use result::Result;
pub use transfer::{Checksum, NewTransfer, Transfer, TransferOutcome, TransferStatus};
