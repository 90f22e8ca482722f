//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for CareLink using clap.

pub mod commands;

use crate::domain::ids::{AdminId, HospitalId};
use crate::domain::request::RequestContext;
use clap::{Parser, Subcommand};

/// CareLink - inter-hospital patient transfers
#[derive(Parser, Debug)]
#[command(name = "carelink")]
#[command(version, about, long_about = None)]
#[command(author = "CareLink Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "carelink.toml", env = "CARELINK_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "CARELINK_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Administrator performing the operation
    #[arg(long, global = true, env = "CARELINK_ADMIN_ID")]
    pub admin_id: Option<AdminId>,

    /// Hospital the administrator acts for
    #[arg(long, global = true, env = "CARELINK_HOSPITAL")]
    pub hospital: Option<HospitalId>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Caller identity for commands that act on behalf of a hospital
    pub fn request_context(&self) -> Result<RequestContext, String> {
        match (self.admin_id, &self.hospital) {
            (Some(admin), Some(hospital)) => Ok(RequestContext::new(admin, hospital.clone())),
            (None, _) => Err("--admin-id (or CARELINK_ADMIN_ID) is required".to_string()),
            (_, None) => Err("--hospital (or CARELINK_HOSPITAL) is required".to_string()),
        }
    }
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a new configuration file
    Init(commands::init::InitArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Create the PostgreSQL schema
    Migrate(commands::migrate::MigrateArgs),

    /// Initiate, verify, reject and inspect transfers
    Transfer(commands::transfer::TransferArgs),

    /// Manage links between hospitals
    Connections(commands::connections::ConnectionsArgs),

    /// Rank destination hospitals for a department
    Rank(commands::rank::RankArgs),
}
