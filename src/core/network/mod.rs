//! Hospital network: link graph, destination ranking and link administration

pub mod connections;
pub mod graph;
pub mod scorer;

pub use connections::ConnectionManager;
pub use graph::{Edge, HospitalGraph};
pub use scorer::{rank, score_edge, DestinationScorer, RankedDestination};
