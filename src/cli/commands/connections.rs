//! Connections command implementation

use super::{open_store, report_error, EXIT_OK, EXIT_VALIDATION};
use crate::core::network::ConnectionManager;
use crate::domain::connection::{HospitalConnection, LinkMetrics};
use crate::domain::ids::{ConnectionId, HospitalId};
use crate::domain::request::RequestContext;
use clap::{Args, Subcommand};

/// Arguments for the connections command
#[derive(Args, Debug)]
pub struct ConnectionsArgs {
    #[command(subcommand)]
    pub command: ConnectionsCommand,
}

/// Connections subcommands
#[derive(Subcommand, Debug)]
pub enum ConnectionsCommand {
    /// Link two hospitals in both directions
    Add {
        from: HospitalId,
        to: HospitalId,

        /// Transfer cost, non-negative
        #[arg(long)]
        cost: f64,

        /// Transfer latency, non-negative
        #[arg(long)]
        latency: f64,

        /// Link reliability in [0, 1]
        #[arg(long)]
        reliability: f64,
    },

    /// List every directed link
    List,

    /// Remove one directed link
    Remove { connection_id: ConnectionId },
}

impl ConnectionsArgs {
    /// Execute the connections command
    pub async fn execute(
        &self,
        config_path: &str,
        context: Result<RequestContext, String>,
    ) -> anyhow::Result<i32> {
        let ctx = match (&self.command, context) {
            (ConnectionsCommand::List, ctx) => ctx.ok(),
            (_, Ok(ctx)) => Some(ctx),
            (_, Err(e)) => {
                println!("❌ Missing caller identity");
                println!("   Error: {e}");
                return Ok(EXIT_VALIDATION);
            }
        };

        let (_, store) = match open_store(config_path).await {
            Ok(opened) => opened,
            Err(code) => return Ok(code),
        };
        let manager = ConnectionManager::new(store);

        match (&self.command, ctx) {
            (
                ConnectionsCommand::Add {
                    from,
                    to,
                    cost,
                    latency,
                    reliability,
                },
                Some(ctx),
            ) => {
                let metrics = LinkMetrics {
                    cost: *cost,
                    latency: *latency,
                    reliability: *reliability,
                };
                match manager.add_connection(&ctx, from, to, metrics).await {
                    Ok(pair) => {
                        println!("✅ Connection added");
                        print_connection(&pair.forward);
                        match &pair.reverse {
                            Some(reverse) => print_connection(reverse),
                            None => println!("  Reverse link {to} -> {from} already existed"),
                        }
                        Ok(EXIT_OK)
                    }
                    Err(e) => Ok(report_error("Connection could not be added", &e)),
                }
            }
            (ConnectionsCommand::List, _) => match manager.list_connections().await {
                Ok(connections) if connections.is_empty() => {
                    println!("No hospital connections configured");
                    Ok(EXIT_OK)
                }
                Ok(connections) => {
                    println!("🔗 {} directed link(s)", connections.len());
                    println!();
                    for connection in &connections {
                        print_connection(connection);
                    }
                    Ok(EXIT_OK)
                }
                Err(e) => Ok(report_error("Failed to list connections", &e)),
            },
            (ConnectionsCommand::Remove { connection_id }, Some(ctx)) => {
                match manager.remove_connection(&ctx, *connection_id).await {
                    Ok(()) => {
                        println!("🗑️  Connection {connection_id} removed");
                        Ok(EXIT_OK)
                    }
                    Err(e) => Ok(report_error("Connection could not be removed", &e)),
                }
            }
            (_, None) => Ok(EXIT_VALIDATION),
        }
    }
}

fn print_connection(connection: &HospitalConnection) {
    println!(
        "  #{:<5} {} -> {}  cost {}  latency {}  reliability {}",
        connection.connection_id.value(),
        connection.from,
        connection.to,
        connection.metrics.cost,
        connection.metrics.latency,
        connection.metrics.reliability
    );
}
