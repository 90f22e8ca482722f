//! Store integrations for CareLink.
//!
//! - [`database`] - Store traits and the backend factory
//! - [`postgresql`] - PostgreSQL implementation
//! - [`memory`] - In-process implementation for tests and fixture runs
//!
//! # Design Pattern
//!
//! Adapters follow the **Adapter Pattern** to isolate the driver from the
//! core. The core only sees `Arc<dyn CareStore>`.
//!
//! ```rust,no_run
//! use carelink::adapters::database::create_store;
//! use carelink::config::load_config;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("carelink.toml")?;
//! let store = create_store(&config).await?;
//! store.test_connection().await?;
//! # Ok(())
//! # }
//! ```

pub mod database;
pub mod memory;
pub mod postgresql;
