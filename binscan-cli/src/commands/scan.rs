//! Scan an item at a nearby bin.

use std::path::PathBuf;
use std::sync::Arc;

use binscan::classifier::ImagePayload;
use binscan::outcome::{ScanOutcome, DEFAULT_TOP_PREDICTIONS};
use binscan::scan::{
    FixedLocation, LocationProvider, ScanError, ScanWorkflow, UnsupportedLocation,
};
use clap::Args;
use console::style;

use super::common::{location_from_args, stars};
use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for `binscan scan`.
#[derive(Debug, Args)]
pub struct ScanArgs {
    /// Photo of the item to deposit
    #[arg(long)]
    pub image: PathBuf,

    /// Your current latitude
    #[arg(long, allow_hyphen_values = true)]
    pub lat: Option<f64>,

    /// Your current longitude
    #[arg(long, allow_hyphen_values = true)]
    pub lng: Option<f64>,

    /// Bin to deposit into (defaults to the nearest one in range)
    #[arg(long)]
    pub bin: Option<String>,
}

/// Run a scan.
pub async fn run(runner: &CliRunner, args: ScanArgs) -> Result<(), CliError> {
    let bytes = std::fs::read(&args.image).map_err(|source| CliError::Io {
        path: args.image.clone(),
        source,
    })?;
    let file_name = args
        .image
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload".to_string());
    let image = ImagePayload::new(bytes, file_name);

    let location: Arc<dyn LocationProvider> = match location_from_args(args.lat, args.lng)? {
        Some(coord) => Arc::new(FixedLocation(coord)),
        None => Arc::new(UnsupportedLocation),
    };

    let workflow = ScanWorkflow::new(
        runner.config().scan_config(),
        location,
        Arc::new(runner.registry()?),
        Arc::new(runner.classifier()?),
        runner.user(),
    );

    if let Err(e) = workflow.locate().await {
        if let ScanError::NoBinInRange(_) = e {
            print_nearby(&workflow);
        }
        return Err(e.into());
    }

    if let Some(bin_id) = &args.bin {
        workflow.select_bin(bin_id)?;
    }
    workflow.attach_image(image)?;

    let session = workflow.snapshot();
    if let Some(selected) = session.selected_bin() {
        println!("Scanning at {}", style(selected.picker_label()).cyan());
    }

    let outcome = workflow.submit().await?;
    print_outcome(&outcome);
    Ok(())
}

fn print_nearby(workflow: &ScanWorkflow) {
    let session = workflow.snapshot();
    let mut discovered = session.eligible_bins().to_vec();
    if discovered.is_empty() {
        return;
    }
    binscan::proximity::sort_by_distance(&mut discovered);
    eprintln!("Nearby bins:");
    for annotated in discovered.iter().take(5) {
        eprintln!("  {}", annotated.picker_label());
    }
}

fn print_outcome(outcome: &ScanOutcome) {
    let classification = outcome.classification();
    println!();
    println!(
        "{} {} ({:.1}% confidence, {})",
        style("Detected:").bold(),
        classification.label,
        classification.confidence * 100.0,
        classification.confidence_level.as_str()
    );

    let top = classification.predictions.top(DEFAULT_TOP_PREDICTIONS);
    if top.len() > 1 {
        for (label, score) in top {
            println!("    {:<24} {:>5.1}%", label, score * 100.0);
        }
    }

    match outcome {
        ScanOutcome::Denied(denial) => {
            println!();
            println!("{} {}", style("Not accepted:").red().bold(), denial.message);
            println!("  Reason: {}", denial.reason);
        }
        ScanOutcome::Accepted(acceptance) => {
            let reward = &acceptance.reward;
            println!("  Category:      {}", reward.waste_category);
            println!("  Weight:        {:.2} kg", reward.estimated_weight_kg);
            println!("  Recyclability: {}", reward.recyclability.label());
            println!(
                "  Rating:        {} ({})",
                stars(reward.rating),
                reward.rating_band.as_str()
            );
            println!();
            println!("{}", acceptance.message);
            println!(
                "{} +{} stars (total {}), +{} credits",
                style("Reward:").green().bold(),
                reward.stars_awarded,
                reward.new_total_stars,
                reward.credits_earned
            );
        }
    }
}
