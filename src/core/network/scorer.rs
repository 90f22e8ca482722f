//! Destination ranking
//!
//! A candidate's score is `reliability / (1 + cost + latency)` of the direct
//! link from the source. Candidates without a direct link score 0.

use crate::adapters::database::traits::CareStore;
use crate::core::network::graph::HospitalGraph;
use crate::domain::connection::LinkMetrics;
use crate::domain::errors::CareLinkError;
use crate::domain::ids::{DepartmentId, HospitalId};
use crate::domain::records::Hospital;
use crate::domain::Result;
use serde::Serialize;
use std::sync::Arc;

/// Score of one directed link
///
/// # Examples
///
/// ```
/// use carelink::core::network::scorer::score_edge;
/// use carelink::domain::LinkMetrics;
///
/// let metrics = LinkMetrics::new(10.0, 5.0, 0.9).unwrap();
/// assert!((score_edge(&metrics) - 0.05625).abs() < 1e-12);
/// ```
pub fn score_edge(metrics: &LinkMetrics) -> f64 {
    metrics.reliability / (1.0 + metrics.cost + metrics.latency)
}

/// Round a score for display
pub fn round_score(score: f64, precision: u32) -> f64 {
    let factor = 10f64.powi(precision as i32);
    (score * factor).round() / factor
}

/// One ranked candidate
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedDestination {
    pub hospital: Hospital,
    /// Exact score used for ordering
    pub score: f64,
    /// Score rounded for presentation
    pub display_score: f64,
    /// The direct link from the source, if one exists
    pub link: Option<LinkMetrics>,
}

/// Rank candidates against a graph
///
/// Sorting is stable, so equal scores keep the candidate order. The source
/// hospital is never ranked.
pub fn rank(
    graph: &HospitalGraph,
    source: &HospitalId,
    candidates: Vec<Hospital>,
    display_precision: u32,
) -> Vec<RankedDestination> {
    let mut ranked: Vec<RankedDestination> = candidates
        .into_iter()
        .filter(|h| &h.hospital_id != source)
        .map(|hospital| {
            let link = graph
                .edge(source, &hospital.hospital_id)
                .map(|edge| edge.metrics);
            let score = link.as_ref().map(score_edge).unwrap_or(0.0);
            RankedDestination {
                hospital,
                score,
                display_score: round_score(score, display_precision),
                link,
            }
        })
        .collect();

    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
    ranked
}

/// Ranks hospitals offering a department by link quality from a source
pub struct DestinationScorer {
    store: Arc<dyn CareStore>,
    display_precision: u32,
}

impl DestinationScorer {
    pub fn new(store: Arc<dyn CareStore>, display_precision: u32) -> Self {
        Self {
            store,
            display_precision,
        }
    }

    /// Rank every hospital offering `department_id`, best first
    ///
    /// # Errors
    ///
    /// Returns `CareLinkError::Validation` if the source hospital or the
    /// department does not exist.
    pub async fn rank_destinations(
        &self,
        source: &HospitalId,
        department_id: DepartmentId,
    ) -> Result<Vec<RankedDestination>> {
        if self.store.hospital(source).await?.is_none() {
            return Err(CareLinkError::Validation(format!(
                "Source hospital not found: {source}"
            )));
        }
        if self.store.department(department_id).await?.is_none() {
            return Err(CareLinkError::Validation(format!(
                "Department not found: {department_id}"
            )));
        }

        let candidates = self.store.hospitals_with_department(department_id).await?;
        let graph = HospitalGraph::load(self.store.as_ref()).await?;
        let ranked = rank(&graph, source, candidates, self.display_precision);

        tracing::info!(
            source = %source,
            department_id = %department_id,
            candidates = ranked.len(),
            best = ranked.first().map(|r| r.hospital.hospital_id.as_str()),
            "Ranked destinations"
        );

        Ok(ranked)
    }
}
