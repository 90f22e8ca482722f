//! Rank command implementation
//!
//! Prints the hospitals offering a department, best link first.

use super::{open_store, report_error, EXIT_OK, EXIT_VALIDATION};
use crate::core::network::{DestinationScorer, RankedDestination};
use crate::domain::ids::{DepartmentId, HospitalId};
use clap::Args;

/// Arguments for the rank command
#[derive(Args, Debug)]
pub struct RankArgs {
    /// Department the patient needs
    #[arg(long)]
    pub department: DepartmentId,

    /// Source hospital; defaults to --hospital
    #[arg(long)]
    pub from: Option<HospitalId>,

    /// Print the ranking as JSON
    #[arg(long)]
    pub json: bool,
}

impl RankArgs {
    /// Execute the rank command
    pub async fn execute(
        &self,
        config_path: &str,
        acting_hospital: Option<&HospitalId>,
    ) -> anyhow::Result<i32> {
        let Some(source) = self.from.as_ref().or(acting_hospital) else {
            println!("❌ No source hospital");
            println!("   Pass --from or --hospital");
            return Ok(EXIT_VALIDATION);
        };

        let (config, store) = match open_store(config_path).await {
            Ok(opened) => opened,
            Err(code) => return Ok(code),
        };
        let scorer = DestinationScorer::new(store, config.scoring.display_precision);

        let ranked = match scorer.rank_destinations(source, self.department).await {
            Ok(ranked) => ranked,
            Err(e) => return Ok(report_error("Destinations could not be ranked", &e)),
        };

        if self.json {
            println!("{}", serde_json::to_string_pretty(&ranked)?);
            return Ok(EXIT_OK);
        }

        if ranked.is_empty() {
            println!(
                "No other hospital offers department {}",
                self.department
            );
            return Ok(EXIT_OK);
        }

        println!(
            "🏥 Destinations from {} for department {}",
            source, self.department
        );
        println!();
        for (position, destination) in ranked.iter().enumerate() {
            println!("{}", format_row(position + 1, destination));
        }
        Ok(EXIT_OK)
    }
}

fn format_row(position: usize, destination: &RankedDestination) -> String {
    let link = match &destination.link {
        Some(m) => format!(
            "cost {} latency {} reliability {}",
            m.cost, m.latency, m.reliability
        ),
        None => "no direct link".to_string(),
    };
    format!(
        "  {:>2}. {:<12} {:<28} score {}  ({})",
        position,
        destination.hospital.hospital_id.as_str(),
        destination.hospital.name,
        destination.display_score,
        link
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::connection::LinkMetrics;
    use crate::domain::records::Hospital;

    #[test]
    fn test_format_row_without_link() {
        let destination = RankedDestination {
            hospital: Hospital {
                hospital_id: HospitalId::new("H3").unwrap(),
                name: "Harbor General".to_string(),
                location: "Port".to_string(),
            },
            score: 0.0,
            display_score: 0.0,
            link: None,
        };
        let row = format_row(2, &destination);
        assert!(row.contains("H3"));
        assert!(row.contains("no direct link"));
    }

    #[test]
    fn test_format_row_with_link() {
        let destination = RankedDestination {
            hospital: Hospital {
                hospital_id: HospitalId::new("H2").unwrap(),
                name: "Riverside".to_string(),
                location: "North".to_string(),
            },
            score: 0.05625,
            display_score: 0.0563,
            link: Some(LinkMetrics::new(10.0, 5.0, 0.9).unwrap()),
        };
        assert!(format_row(1, &destination).contains("score 0.0563"));
    }

    #[tokio::test]
    async fn test_rank_without_source_is_validation_error() {
        let args = RankArgs {
            department: DepartmentId::new(1),
            from: None,
            json: false,
        };
        let code = args.execute("carelink.toml", None).await.unwrap();
        assert_eq!(code, EXIT_VALIDATION);
    }
}
