//! Store abstraction layer
//!
//! This module provides a trait-based abstraction over the store, allowing
//! CareLink to run against PostgreSQL or the in-process store.

pub mod factory;
pub mod traits;

pub use factory::{create_postgresql_client, create_store};
pub use traits::{CareStore, RecordSource};
