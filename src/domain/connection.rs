//! Directed hospital-to-hospital links

use crate::domain::errors::GraphError;
use crate::domain::ids::{ConnectionId, HospitalId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Quality metrics of one directed link
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinkMetrics {
    /// Transfer cost, non-negative
    pub cost: f64,
    /// Latency in minutes, non-negative
    pub latency: f64,
    /// Probability of a successful hand-off, in [0, 1]
    pub reliability: f64,
}

impl LinkMetrics {
    /// Builds metrics, rejecting negative or non-finite values and
    /// reliability outside [0, 1]
    pub fn new(cost: f64, latency: f64, reliability: f64) -> Result<Self, GraphError> {
        let metrics = Self {
            cost,
            latency,
            reliability,
        };
        metrics.validate()?;
        Ok(metrics)
    }

    pub fn validate(&self) -> Result<(), GraphError> {
        if !self.cost.is_finite() || self.cost < 0.0 {
            return Err(GraphError::InvalidMetrics(format!(
                "cost must be a non-negative number, got {}",
                self.cost
            )));
        }
        if !self.latency.is_finite() || self.latency < 0.0 {
            return Err(GraphError::InvalidMetrics(format!(
                "latency must be a non-negative number, got {}",
                self.latency
            )));
        }
        if !(0.0..=1.0).contains(&self.reliability) {
            return Err(GraphError::InvalidMetrics(format!(
                "reliability must be between 0 and 1, got {}",
                self.reliability
            )));
        }
        Ok(())
    }
}

/// A stored directed connection row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HospitalConnection {
    pub connection_id: ConnectionId,
    pub from: HospitalId,
    pub to: HospitalId,
    pub metrics: LinkMetrics,
    pub created_at: DateTime<Utc>,
}

/// A connection request before the store assigns ids
#[derive(Debug, Clone, PartialEq)]
pub struct NewConnection {
    pub from: HospitalId,
    pub to: HospitalId,
    pub metrics: LinkMetrics,
}

impl NewConnection {
    /// The same link pointing the other way
    pub fn reversed(&self) -> Self {
        Self {
            from: self.to.clone(),
            to: self.from.clone(),
            metrics: self.metrics,
        }
    }
}

/// Rows written by one symmetric-pair insert
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionPair {
    pub forward: HospitalConnection,
    /// None when a reverse row already existed and was left untouched
    pub reverse: Option<HospitalConnection>,
}
