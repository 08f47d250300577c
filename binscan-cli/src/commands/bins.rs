//! Bin registry browsing commands.

use binscan::bins::{BinStatus, FleetSummary, Severity};
use binscan::proximity::{nearby, sort_by_distance};
use binscan::registry::BinRegistry;
use clap::Subcommand;
use console::style;

use super::common::{bin_row, location_from_args, styled_severity};
use crate::error::CliError;
use crate::runner::CliRunner;

/// Bins subcommands.
#[derive(Debug, Subcommand)]
pub enum BinsCommands {
    /// List registered bins, optionally only those near a location
    List {
        /// Latitude of the reference point
        #[arg(long, allow_hyphen_values = true)]
        lat: Option<f64>,

        /// Longitude of the reference point
        #[arg(long, allow_hyphen_values = true)]
        lng: Option<f64>,

        /// Search radius in km (defaults to proximity.discovery_radius_km)
        #[arg(long, requires = "lat")]
        radius: Option<f64>,
    },

    /// Show fleet-wide status and fill counts
    Summary,
}

/// Run a bins subcommand.
pub async fn run(runner: &CliRunner, command: BinsCommands) -> Result<(), CliError> {
    match command {
        BinsCommands::List { lat, lng, radius } => run_list(runner, lat, lng, radius).await,
        BinsCommands::Summary => run_summary(runner).await,
    }
}

async fn run_list(
    runner: &CliRunner,
    lat: Option<f64>,
    lng: Option<f64>,
    radius: Option<f64>,
) -> Result<(), CliError> {
    let location = location_from_args(lat, lng)?;
    let config = runner.config();
    let bins = runner.registry()?.fetch_bins().await?;
    let thresholds = config.capacity;

    let Some(location) = location else {
        println!("{} registered bins", bins.len());
        println!();
        for bin in &bins {
            println!("{}", bin_row(bin, &thresholds));
        }
        return Ok(());
    };

    let radius_km = radius.unwrap_or(config.proximity.discovery_radius_km);
    if !(radius_km.is_finite() && radius_km > 0.0) {
        return Err(CliError::InvalidArgument(
            "--radius must be a positive number".to_string(),
        ));
    }

    let mut found = nearby(&bins, &location, radius_km);
    sort_by_distance(&mut found);

    println!(
        "{} of {} bins within {} km of {}",
        found.len(),
        bins.len(),
        radius_km,
        location
    );
    println!();

    let scan_radius_km = config.proximity.scan_radius_km;
    for annotated in &found {
        let marker = if annotated.distance_km <= scan_radius_km {
            style("●").green().to_string()
        } else {
            style("○").dim().to_string()
        };
        println!(
            "{} {:>8}  {}",
            marker,
            format!("{}m", annotated.distance_meters()),
            bin_row(&annotated.bin, &thresholds)
        );
    }

    if !found.is_empty() {
        println!();
        println!(
            "{} within scanning range ({:.0} m)",
            style("●").green(),
            config.proximity.scan_radius_meters()
        );
    }

    Ok(())
}

async fn run_summary(runner: &CliRunner) -> Result<(), CliError> {
    let bins = runner.registry()?.fetch_bins().await?;
    let summary = FleetSummary::from_bins(&bins, &runner.config().capacity);

    println!("Bin Fleet Summary");
    println!("=================");
    println!();
    println!("  Total bins:  {}", summary.total);
    println!(
        "  Collected:   {:.1} / {:.1} kg",
        summary.total_current_kg, summary.total_max_kg
    );
    println!();
    println!("  By status:");
    for status in BinStatus::ALL {
        println!("    {:<10} {}", status.as_str(), summary.status_count(status));
    }
    println!();
    println!("  By fill level:");
    for severity in [Severity::Critical, Severity::Warning, Severity::Normal] {
        println!(
            "    {:<10} {}",
            styled_severity(severity),
            summary.severity_count(severity)
        );
    }

    Ok(())
}
