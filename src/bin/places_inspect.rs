//! places_inspect - fetch a PLACES release and print what it contains
//!
//! Useful for checking connectivity, tokens and the measures a release
//! carries before using the library.

use anyhow::{bail, Context};
use clap::Parser;
use tracing::{error, info};

use places_client::config::Args;
use places_client::{init_tracing, log_timed_operation, Category, Config, PlacesClient, Release};

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = Config::from_args(&args).map_err(|e| {
        eprintln!("Configuration error: {}", e);
        e
    })?;
    config.validate().context("invalid configuration")?;

    init_tracing(&config.log_level);
    info!("Starting places_inspect v{}", env!("CARGO_PKG_VERSION"));

    let release: Release = args.release.parse()?;
    let client = PlacesClient::new(&config)?;

    let table = client.fetch_release(release).map_err(|e| {
        error!("Failed to fetch release {}: {}", release, e);
        e
    })?;

    println!("=== RELEASE {} ({}) ===", release, release.dataset_id());
    println!("Records: {}", table.len());
    println!("Fetched at: {}", table.fetched_at().to_rfc3339());

    for category in Category::ALL {
        let count = table
            .records()
            .iter()
            .filter(|r| r.category == category)
            .count();
        println!("  {}: {}", category, count);
    }

    println!("\nMeasures:");
    for measure in table.list_measures() {
        match table.summarize_measure(&measure) {
            Ok(summary) => println!(
                "  {:<40} n={:<6} mean={:>7.2} min={:>7.2} max={:>7.2}",
                measure, summary.count, summary.mean, summary.min, summary.max
            ),
            Err(e) => println!("  {:<40} {}", measure, e),
        }
    }

    if let Some(pair) = &args.correlate {
        if pair.len() != 2 {
            bail!("--correlate takes exactly two measures, got {}", pair.len());
        }
        let result = log_timed_operation("correlation", || table.correlation(&pair[0], &pair[1]))
            .with_context(|| format!("correlating {} and {}", pair[0], pair[1]))?;
        println!(
            "\nCorrelation {} ~ {}: r={:.4} (n={}, mean_x={:.2}, mean_y={:.2})",
            pair[0], pair[1], result.coefficient, result.sample_size, result.mean_x, result.mean_y
        );
    }

    Ok(())
}
