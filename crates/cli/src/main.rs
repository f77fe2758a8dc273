//! planoblique CLI - plan-oblique relief shearing for DEMs

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use planoblique_algorithms::terrain::{plan_oblique, PlanObliqueParams};
use planoblique_core::io::{read_geotiff, write_geotiff, GeoTiffOptions, ReadOptions, SrsSource};
use planoblique_core::Raster;

// ─── CLI structure ──────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "planoblique")]
#[command(author, version, about = "Plan-oblique relief shearing for DEMs", long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show information about a raster file
    Info {
        /// Input raster file
        input: PathBuf,
        /// Spatial reference source: auto, epsg, geokeys
        #[arg(short, long, default_value = "auto")]
        srs_source: String,
    },
    /// Shear a DEM into a plan-oblique relief grid
    Shear {
        /// Input DEM file
        input: PathBuf,
        /// Output file
        output: PathBuf,
        /// Inclination angle in degrees, in (0, 90]; smaller shears more
        #[arg(short, long, default_value = "45")]
        angle: f64,
        /// Spatial reference source: auto, epsg, geokeys
        #[arg(short, long, default_value = "auto")]
        srs_source: String,
    },
}

// ─── Helpers ────────────────────────────────────────────────────────────

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");
}

fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

fn parse_srs_source(s: &str) -> Result<SrsSource> {
    match s.to_lowercase().as_str() {
        "auto" | "a" => Ok(SrsSource::Auto),
        "epsg" | "e" => Ok(SrsSource::Epsg),
        "geokeys" | "g" => Ok(SrsSource::GeoKeys),
        _ => anyhow::bail!("Unknown SRS source: {}. Use auto, epsg, or geokeys.", s),
    }
}

fn read_dem(path: &PathBuf, srs_source: SrsSource) -> Result<Raster<f64>> {
    let pb = spinner("Reading raster...");
    let options = ReadOptions {
        srs_source,
        ..Default::default()
    };
    let raster: Raster<f64> =
        read_geotiff(path, Some(options)).context("Failed to read raster")?;
    pb.finish_and_clear();
    info!("Input: {} x {}", raster.cols(), raster.rows());
    Ok(raster)
}

fn write_result(raster: &Raster<f64>, path: &PathBuf) -> Result<()> {
    let pb = spinner("Writing output...");
    write_geotiff(raster, path, Some(GeoTiffOptions::default()))
        .context("Failed to write output")?;
    pb.finish_and_clear();
    Ok(())
}

fn done(name: &str, path: &PathBuf, elapsed: std::time::Duration) {
    println!("{} saved to: {}", name, path.display());
    println!("  Processing time: {:.2?}", elapsed);
}

// ─── Main ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    match cli.command {
        // ── Info ─────────────────────────────────────────────────────
        Commands::Info { input, srs_source } => {
            let srs_source = parse_srs_source(&srs_source)?;
            let raster = read_dem(&input, srs_source)?;
            let (rows, cols) = raster.shape();
            let bounds = raster.bounds();
            let stats = raster.statistics();

            println!("File: {}", input.display());
            println!("Dimensions: {} x {} ({} cells)", cols, rows, raster.len());
            println!("Cell size: {}", raster.cell_size());
            println!(
                "Bounds: ({:.6}, {:.6}) - ({:.6}, {:.6})",
                bounds.0, bounds.1, bounds.2, bounds.3
            );
            if let Some(crs) = raster.crs() {
                println!("CRS: {}", crs);
            }
            if let Some(nodata) = raster.nodata() {
                println!("NoData: {}", nodata);
            }
            println!("\nStatistics:");
            if let Some(min) = stats.min {
                println!("  Min: {:.4}", min);
            }
            if let Some(max) = stats.max {
                println!("  Max: {:.4}", max);
            }
            if let Some(mean) = stats.mean {
                println!("  Mean: {:.4}", mean);
            }
            println!(
                "  Valid cells: {} ({:.1}%)",
                stats.valid_count,
                100.0 * stats.valid_count as f64 / raster.len() as f64
            );
        }

        // ── Shear ────────────────────────────────────────────────────
        Commands::Shear {
            input,
            output,
            angle,
            srs_source,
        } => {
            let srs_source = parse_srs_source(&srs_source)?;
            let dem = read_dem(&input, srs_source)?;

            let pb = spinner("Shearing terrain...");
            let start = Instant::now();
            let result = plan_oblique(&dem, PlanObliqueParams { angle })
                .context("Failed to shear DEM")?;
            let elapsed = start.elapsed();
            pb.finish_and_clear();

            info!(
                "Sheared {} rows into a {}-row relief band",
                dem.rows(),
                result.rows()
            );
            write_result(&result, &output)?;
            done("Plan-oblique relief", &output, elapsed);
        }
    }

    Ok(())
}
