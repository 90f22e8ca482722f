//! Administrative management of hospital links

use crate::adapters::database::traits::CareStore;
use crate::domain::connection::{ConnectionPair, HospitalConnection, LinkMetrics, NewConnection};
use crate::domain::errors::{CareLinkError, GraphError};
use crate::domain::ids::{ConnectionId, HospitalId};
use crate::domain::request::RequestContext;
use crate::domain::Result;
use std::sync::Arc;

/// Creates, lists and removes connection rows
pub struct ConnectionManager {
    store: Arc<dyn CareStore>,
}

impl ConnectionManager {
    pub fn new(store: Arc<dyn CareStore>) -> Self {
        Self { store }
    }

    /// Link two hospitals in both directions with the same metrics
    ///
    /// The reverse row is only created when it does not already exist. Both
    /// rows are written in one atomic store operation.
    ///
    /// # Errors
    ///
    /// - `GraphError::SelfConnection` if `from == to`
    /// - `GraphError::InvalidMetrics` for out-of-range metrics
    /// - `CareLinkError::Validation` if either hospital does not exist
    /// - `GraphError::DuplicateConnection` if `from -> to` already exists
    pub async fn add_connection(
        &self,
        ctx: &RequestContext,
        from: &HospitalId,
        to: &HospitalId,
        metrics: LinkMetrics,
    ) -> Result<ConnectionPair> {
        if from == to {
            return Err(GraphError::SelfConnection(from.clone()).into());
        }
        metrics.validate()?;

        for hospital in [from, to] {
            if self.store.hospital(hospital).await?.is_none() {
                return Err(CareLinkError::Validation(format!(
                    "Hospital not found: {hospital}"
                )));
            }
        }

        let pair = self
            .store
            .insert_connection_pair(NewConnection {
                from: from.clone(),
                to: to.clone(),
                metrics,
            })
            .await?;

        tracing::info!(
            from = %from,
            to = %to,
            cost = metrics.cost,
            latency = metrics.latency,
            reliability = metrics.reliability,
            reverse_created = pair.reverse.is_some(),
            principal = %ctx.principal,
            "Hospital connection added"
        );

        Ok(pair)
    }

    /// Every directed row, ordered by id
    pub async fn list_connections(&self) -> Result<Vec<HospitalConnection>> {
        self.store.connections().await
    }

    /// Delete one directed row; the reverse row is left alone
    ///
    /// # Errors
    ///
    /// Returns `GraphError::ConnectionNotFound` for an unknown id.
    pub async fn remove_connection(
        &self,
        ctx: &RequestContext,
        connection_id: ConnectionId,
    ) -> Result<()> {
        if !self.store.delete_connection(connection_id).await? {
            return Err(GraphError::ConnectionNotFound(connection_id).into());
        }

        tracing::info!(
            connection_id = %connection_id,
            principal = %ctx.principal,
            "Hospital connection removed"
        );
        Ok(())
    }
}
