//! Per-request caller identity
//!
//! The request/auth layer resolves who is calling and on behalf of which
//! hospital, then hands that to every core operation as a plain value.
//! The core trusts it and never re-authenticates.

use crate::domain::ids::{AdminId, HospitalId};
use serde::{Deserialize, Serialize};

/// Identity and hospital scope of the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestContext {
    /// Administrator performing the operation
    pub principal: AdminId,
    /// Hospital the administrator acts for
    pub hospital_id: HospitalId,
}

impl RequestContext {
    pub fn new(principal: AdminId, hospital_id: HospitalId) -> Self {
        Self {
            principal,
            hospital_id,
        }
    }
}
