// CareLink - Inter-hospital patient transfer service
// Copyright (c) 2025 CareLink Contributors
// Licensed under the MIT License

//! # CareLink - inter-hospital patient transfers
//!
//! CareLink moves a patient's care record between hospitals and proves the
//! record arrived unchanged. The source hospital hashes a canonical payload
//! of the patient and their treatment history when it initiates a transfer;
//! the destination re-hashes the same payload and only gains access to the
//! patient when both digests match.
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Transfer lifecycle, checksums, destination ranking
//! - [`adapters`] - Store backends (PostgreSQL, in-process)
//! - [`domain`] - Core domain types and errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use carelink::adapters::database::create_store;
//! use carelink::config::load_config;
//! use carelink::core::transfer::TransferManager;
//! use carelink::domain::{AdminId, DepartmentId, HospitalId, PatientId, RequestContext};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("carelink.toml")?;
//! let store = create_store(&config).await?;
//! let manager = TransferManager::new(store, config.transfer.clone());
//!
//! let ctx = RequestContext::new(AdminId::new(1), HospitalId::new("H1")?);
//! let patient = PatientId::new("0b7f3c1e-8a51-4f3e-9d0c-2d5c7a1e9f10")?;
//! let transfer = manager
//!     .initiate(&ctx, &patient, DepartmentId::new(3), &HospitalId::new("H2")?)
//!     .await?;
//!
//! // Later, at the destination
//! let result = manager.verify(&ctx, transfer.transfer_id).await?;
//! println!("{}", result.report.format_summary());
//! # Ok(())
//! # }
//! ```
//!
//! ## Destination ranking
//!
//! Hospitals are linked by directed connections carrying cost, latency and
//! reliability. A destination offering the needed department scores
//! `reliability / (1 + cost + latency)` over its direct link from the
//! source, and 0 without one.
//!
//! ```rust,no_run
//! use carelink::core::network::DestinationScorer;
//! use carelink::domain::{DepartmentId, HospitalId};
//! # use std::sync::Arc;
//! # use carelink::adapters::database::CareStore;
//!
//! # async fn example(store: Arc<dyn CareStore>) -> Result<(), Box<dyn std::error::Error>> {
//! let scorer = DestinationScorer::new(store, 4);
//! for candidate in scorer.rank_destinations(&HospitalId::new("H1")?, DepartmentId::new(3)).await? {
//!     println!("{} {}", candidate.hospital.name, candidate.display_score);
//! }
//! # Ok(())
//! # }
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
