//! Directed weighted graph of hospital links
//!
//! Built fresh from the connection rows for every computation, so it always
//! reflects the current edge set.

use crate::adapters::database::traits::CareStore;
use crate::domain::connection::{HospitalConnection, LinkMetrics};
use crate::domain::ids::HospitalId;
use crate::domain::Result;
use std::collections::HashMap;

/// One outgoing link
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub to: HospitalId,
    pub metrics: LinkMetrics,
}

/// Adjacency map keyed by the `from` hospital
#[derive(Debug, Clone, Default)]
pub struct HospitalGraph {
    adjacency: HashMap<HospitalId, Vec<Edge>>,
}

impl HospitalGraph {
    /// Build the graph from connection rows
    ///
    /// Rows keep their input order within each adjacency list.
    pub fn from_connections<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = HospitalConnection>,
    {
        let mut adjacency: HashMap<HospitalId, Vec<Edge>> = HashMap::new();
        for row in rows {
            adjacency.entry(row.from).or_default().push(Edge {
                to: row.to,
                metrics: row.metrics,
            });
        }
        Self { adjacency }
    }

    /// Load every connection row from the store
    pub async fn load<S: CareStore + ?Sized>(store: &S) -> Result<Self> {
        let rows = store.connections().await?;
        let graph = Self::from_connections(rows);
        tracing::debug!(
            hospitals = graph.adjacency.len(),
            edges = graph.edge_count(),
            "Loaded hospital graph"
        );
        Ok(graph)
    }

    /// Outgoing links of a hospital
    pub fn edges_from(&self, from: &HospitalId) -> &[Edge] {
        self.adjacency.get(from).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The direct link `from -> to`, if any
    pub fn edge(&self, from: &HospitalId, to: &HospitalId) -> Option<&Edge> {
        self.edges_from(from).iter().find(|e| &e.to == to)
    }

    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(Vec::len).sum()
    }
}
