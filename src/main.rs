//! # Tide Estimator Command Line
//!
//! Runs one estimate plus its diagnostic report for a position and time.
//!
//! ```text
//! tide-estimator --lat 34.6937 --lon 135.5023 [--at 2025-07-24T06:00:00Z]
//!                [--id rec-1] [--json] [--chart] [--config tide-config.toml]
//! ```
//!
//! Without `--at` the current time is used; without `--lat/--lon` the
//! estimate runs in degraded mode at the reference point.

use anyhow::{bail, Context};
use chrono::Utc;
use std::env;
use tide_estimator_lib::{
    config::Config, logging, renderer::draw_ascii, Coordinate, DateInput, DiagnosticRecord,
    TideEngine,
};

#[derive(Debug, Default)]
struct Args {
    latitude: Option<f64>,
    longitude: Option<f64>,
    at: Option<String>,
    id: Option<String>,
    config: Option<String>,
    json: bool,
    chart: bool,
}

fn parse_args() -> anyhow::Result<Args> {
    let mut args = Args::default();
    let mut iter = env::args().skip(1);
    while let Some(arg) = iter.next() {
        let mut value = |name: &str| {
            iter.next()
                .with_context(|| format!("{name} requires a value"))
        };
        match arg.as_str() {
            "--lat" => args.latitude = Some(value("--lat")?.parse().context("--lat")?),
            "--lon" => args.longitude = Some(value("--lon")?.parse().context("--lon")?),
            "--at" => args.at = Some(value("--at")?),
            "--id" => args.id = Some(value("--id")?),
            "--config" => args.config = Some(value("--config")?),
            "--json" => args.json = true,
            "--chart" => args.chart = true,
            "--help" | "-h" => {
                println!(
                    "usage: tide-estimator --lat <deg> --lon <deg> [--at <time>] [--id <id>] \
                     [--json] [--chart] [--config <path>]"
                );
                std::process::exit(0);
            }
            other => bail!("unknown argument: {other}"),
        }
    }
    Ok(args)
}

/// Main application entry point.
fn main() -> anyhow::Result<()> {
    logging::init();
    let args = parse_args()?;

    let config = match &args.config {
        Some(path) => Config::load_from_path(path),
        None => Config::load(),
    };
    let engine = TideEngine::new(config);

    let coordinate = match (args.latitude, args.longitude) {
        (Some(lat), Some(lon)) => Some(Coordinate::new(lat, lon)),
        (None, None) => None,
        _ => bail!("--lat and --lon must be given together"),
    };

    // The estimate needs a concrete instant; the diagnostics record keeps the
    // raw text so an unparsable value shows up as an integrity issue.
    let date_input = args
        .at
        .as_deref()
        .map(DateInput::from)
        .unwrap_or_else(|| DateInput::Timestamp(Utc::now()));
    let query = date_input.normalize().unwrap_or_else(|e| {
        tracing::warn!("{}; using the current time", e);
        Utc::now()
    });

    let estimate = engine.estimate_tide(coordinate.as_ref(), query);
    let record = DiagnosticRecord {
        id: Some(args.id.unwrap_or_else(|| "cli".to_string())),
        coordinates: coordinate,
        date: Some(date_input),
    };
    let report = engine.collect_diagnostics(&record);

    if args.json {
        let out = serde_json::json!({
            "estimate": estimate,
            "diagnostics": report,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!("Tide estimate for {}", query.format("%Y-%m-%d %H:%M UTC"));
    println!("  type           {}", estimate.tide_type);
    println!(
        "  moon           {} ({})",
        estimate.moon_phase.label_ja(),
        estimate.moon_phase
    );
    println!("  current height {:+.2}", estimate.current_height);
    println!("  range (24h)    {:.2}", estimate.tide_range);
    match (estimate.next_high_tide, estimate.next_low_tide) {
        (Some(high), Some(low)) => {
            println!(
                "  next high      {} ({:+.2})",
                high.time.format("%m/%d %H:%M"),
                high.height
            );
            println!(
                "  next low       {} ({:+.2})",
                low.time.format("%m/%d %H:%M"),
                low.height
            );
        }
        _ => println!("  next high/low  unavailable"),
    }

    println!();
    println!("Diagnostics");
    println!("  integrity      {}", report.quality.data_integrity);
    println!("  accuracy       {:.2}", report.quality.calculation_accuracy);
    println!(
        "  distance       {:.1} km",
        report.calculation.coordinate_factors.distance_from_reference
    );
    println!(
        "  solar factor   {:.3}",
        report.calculation.seasonal_factors.solar_correction_factor
    );
    for warning in &report.quality.warnings {
        println!("  ⚠ {}", warning);
    }

    if args.chart {
        println!();
        draw_ascii(&estimate.curve);
    }

    Ok(())
}
