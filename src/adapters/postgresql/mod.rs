//! PostgreSQL store backend
//!
//! Reads the reference tables and writes transfers, access grants and
//! hospital connections through a pooled connection.

pub mod adapter;
pub mod client;
pub mod models;

pub use adapter::PostgreSQLStore;
pub use client::PostgreSQLClient;
