//! Transfer command implementation
//!
//! `transfer initiate|verify|reject|show|list|grants` drive the transfer
//! lifecycle against the configured store.

use super::{open_store, report_error, EXIT_OK, EXIT_REJECTED, EXIT_VALIDATION};
use crate::core::transfer::TransferManager;
use crate::domain::ids::{DepartmentId, HospitalId, PatientId, TransferId};
use crate::domain::request::RequestContext;
use crate::domain::transfer::Transfer;
use clap::{Args, Subcommand};

/// Arguments for the transfer command
#[derive(Args, Debug)]
pub struct TransferArgs {
    #[command(subcommand)]
    pub command: TransferCommand,
}

/// Transfer subcommands
#[derive(Subcommand, Debug)]
pub enum TransferCommand {
    /// Start a transfer from the patient's current hospital
    Initiate {
        /// Patient to transfer
        #[arg(long)]
        patient: PatientId,

        /// Department the patient is referred to
        #[arg(long)]
        department: DepartmentId,

        /// Destination hospital
        #[arg(long)]
        target: HospitalId,
    },

    /// Re-hash the patient record and settle a pending transfer
    Verify {
        transfer_id: TransferId,

        /// Print the full verification report
        #[arg(long)]
        report: bool,
    },

    /// Reject a pending transfer
    Reject { transfer_id: TransferId },

    /// Show a single transfer
    Show { transfer_id: TransferId },

    /// List transfers, optionally those touching one hospital
    List {
        #[arg(long)]
        hospital: Option<HospitalId>,
    },

    /// List access grants held for a patient
    Grants { patient: PatientId },
}

impl TransferCommand {
    fn needs_context(&self) -> bool {
        matches!(
            self,
            TransferCommand::Initiate { .. }
                | TransferCommand::Verify { .. }
                | TransferCommand::Reject { .. }
        )
    }
}

impl TransferArgs {
    /// Execute the transfer command
    pub async fn execute(
        &self,
        config_path: &str,
        context: Result<RequestContext, String>,
    ) -> anyhow::Result<i32> {
        let ctx = match (self.command.needs_context(), context) {
            (true, Err(e)) => {
                println!("❌ Missing caller identity");
                println!("   Error: {e}");
                return Ok(EXIT_VALIDATION);
            }
            (_, ctx) => ctx.ok(),
        };

        let (config, store) = match open_store(config_path).await {
            Ok(opened) => opened,
            Err(code) => return Ok(code),
        };
        let manager = TransferManager::new(store, config.transfer.clone());

        match (&self.command, ctx) {
            (
                TransferCommand::Initiate {
                    patient,
                    department,
                    target,
                },
                Some(ctx),
            ) => {
                println!("🚑 Initiating transfer of patient {patient} to {target}");
                match manager.initiate(&ctx, patient, *department, target).await {
                    Ok(transfer) => {
                        println!("✅ Transfer {} created", transfer.transfer_id);
                        print_transfer(&transfer);
                        Ok(EXIT_OK)
                    }
                    Err(e) => Ok(report_error("Transfer could not be initiated", &e)),
                }
            }
            (TransferCommand::Verify { transfer_id, report }, Some(ctx)) => {
                println!("🔍 Verifying transfer {transfer_id}");
                match manager.verify(&ctx, *transfer_id).await {
                    Ok(result) => {
                        if *report {
                            println!();
                            print!("{}", result.report.format_summary());
                            println!();
                        }
                        print_transfer(&result.transfer);
                        if let Some(grant) = &result.grant {
                            println!(
                                "🔓 Access granted to {} ({})",
                                grant.hospital_id, grant.reason
                            );
                        }
                        if result.outcome.is_success() {
                            println!("✅ {}", result.outcome.message());
                            Ok(EXIT_OK)
                        } else {
                            println!("❌ {}", result.outcome.message());
                            Ok(EXIT_REJECTED)
                        }
                    }
                    Err(e) => Ok(report_error("Transfer could not be verified", &e)),
                }
            }
            (TransferCommand::Reject { transfer_id }, Some(ctx)) => {
                match manager.reject(&ctx, *transfer_id).await {
                    Ok(transfer) => {
                        println!("🛑 Transfer {} rejected", transfer.transfer_id);
                        print_transfer(&transfer);
                        Ok(EXIT_OK)
                    }
                    Err(e) => Ok(report_error("Transfer could not be rejected", &e)),
                }
            }
            (TransferCommand::Show { transfer_id }, _) => match manager.get(*transfer_id).await {
                Ok(transfer) => {
                    print_transfer(&transfer);
                    Ok(EXIT_OK)
                }
                Err(e) => Ok(report_error("Failed to load transfer", &e)),
            },
            (TransferCommand::List { hospital }, _) => {
                match manager.list(hospital.as_ref()).await {
                    Ok(transfers) if transfers.is_empty() => {
                        println!("No transfers found");
                        Ok(EXIT_OK)
                    }
                    Ok(transfers) => {
                        println!("📋 {} transfer(s)", transfers.len());
                        println!();
                        for transfer in &transfers {
                            println!(
                                "  #{:<6} {:<9} {} -> {}  patient {}  dept {}",
                                transfer.transfer_id.value(),
                                transfer.status.as_str(),
                                transfer.source_hospital,
                                transfer.target_hospital,
                                transfer.patient_id,
                                transfer.department_id
                            );
                        }
                        Ok(EXIT_OK)
                    }
                    Err(e) => Ok(report_error("Failed to list transfers", &e)),
                }
            }
            (TransferCommand::Grants { patient }, _) => {
                match manager.access_grants(patient).await {
                    Ok(grants) if grants.is_empty() => {
                        println!("No access grants for patient {patient}");
                        Ok(EXIT_OK)
                    }
                    Ok(grants) => {
                        println!("🔓 Access grants for patient {patient}");
                        for grant in &grants {
                            let via = grant
                                .transfer_id
                                .map(|id| format!(" via transfer {id}"))
                                .unwrap_or_default();
                            println!(
                                "  {} {}  {}{}",
                                grant.granted_at.format("%Y-%m-%d %H:%M:%S"),
                                grant.hospital_id,
                                grant.reason,
                                via
                            );
                        }
                        Ok(EXIT_OK)
                    }
                    Err(e) => Ok(report_error("Failed to list access grants", &e)),
                }
            }
            // needs_context() guarantees a context for the mutating commands
            (_, None) => Ok(EXIT_VALIDATION),
        }
    }
}

fn print_transfer(transfer: &Transfer) {
    println!("  Transfer: {}", transfer.transfer_id);
    println!("  Status: {}", transfer.status);
    println!("  Patient: {}", transfer.patient_id);
    println!(
        "  Route: {} -> {}",
        transfer.source_hospital, transfer.target_hospital
    );
    println!("  Department: {}", transfer.department_id);
    println!("  Initiated by: {}", transfer.initiated_by);
    println!("  Transferred at: {}", transfer.transferred_at.to_rfc3339());
    if let Some(original) = &transfer.checksum_original {
        println!("  Original checksum: {original}");
    }
    if let Some(verified) = &transfer.checksum_verified {
        println!("  Verified checksum: {verified}");
    }
}
