//! Command-line interface for the parkscout scoring engine.
//!
//! Reads three JSON arrays of flat entity records (sites, stops,
//! venues), projects them onto a shared planar grid, runs the scoring
//! pipeline, and writes the ranked selection plus summary statistics as
//! JSON to stdout. All scoring parameters are flags with the reference
//! deployment's defaults.

#![forbid(unsafe_code)]

use clap::Parser;
use geo::Coord;
use parkscout_core::{
    ProjectionError, Projector, SiteCategory, SiteRecord, StopRecord, VenueRecord,
    geographic_midpoint, project_sites, project_stops, project_venues,
};
use parkscout_scorer::{Pipeline, PipelineError, RankedSelection, ScoringConfig};
use serde::de::DeserializeOwned;
use std::collections::BTreeSet;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors surfaced by the CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// An input file could not be read.
    #[error("failed to read {path}")]
    ReadInput {
        /// Path of the unreadable file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// An input file did not contain the expected JSON array.
    #[error("failed to parse records from {path}")]
    ParseInput {
        /// Path of the malformed file.
        path: PathBuf,
        /// Decoder error from `serde_json`.
        #[source]
        source: serde_json::Error,
    },
    /// The projection origin could not be constructed.
    #[error(transparent)]
    Projection(#[from] ProjectionError),
    /// The pipeline rejected the configuration or stage order.
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
    /// The selection could not be written to stdout.
    #[error("failed to write results")]
    WriteOutput {
        /// Encoder or I/O error from `serde_json`.
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Parser)]
#[command(
    name = "parkscout",
    about = "Rank candidate park locations by transit accessibility and social activity",
    version
)]
struct Cli {
    /// JSON file holding the candidate site records.
    #[arg(long, value_name = "path")]
    sites: PathBuf,
    /// JSON file holding the transit stop records.
    #[arg(long, value_name = "path")]
    stops: PathBuf,
    /// JSON file holding the rated venue records.
    #[arg(long, value_name = "path")]
    venues: PathBuf,
    /// Minimum site area in acres.
    #[arg(long, default_value_t = 5.0)]
    min_park_area: f64,
    /// Site categories to exclude from scoring; repeatable.
    #[arg(long = "exclude-category", value_name = "category")]
    exclude_category: Vec<SiteCategory>,
    /// Maximum walking distance to the nearest stop, in metres.
    #[arg(long, default_value_t = 500.0)]
    max_park_distance: f64,
    /// Radius in which qualifying venues are counted, in metres.
    #[arg(long, default_value_t = 500.0)]
    restaurant_radius: f64,
    /// Worst acceptable venue inspection score (lower is better).
    #[arg(long, default_value_t = 20.0)]
    max_restaurant_score: f64,
    /// Number of sites to keep per borough.
    #[arg(long, default_value_t = 3)]
    top_n_per_borough: usize,
}

impl Cli {
    fn config(&self) -> ScoringConfig {
        ScoringConfig {
            min_park_area: self.min_park_area,
            excluded_categories: self.exclude_category.iter().copied().collect::<BTreeSet<_>>(),
            max_park_distance: self.max_park_distance,
            restaurant_radius: self.restaurant_radius,
            max_restaurant_score: self.max_restaurant_score,
            top_n_per_borough: self.top_n_per_borough,
        }
    }
}

/// Run the CLI with the current process arguments.
///
/// # Errors
/// Returns [`CliError`] when input files cannot be read or parsed, the
/// configuration fails validation, or the results cannot be written.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::parse();
    let site_records: Vec<SiteRecord> = load_records(&cli.sites)?;
    let stop_records: Vec<StopRecord> = load_records(&cli.stops)?;
    let venue_records: Vec<VenueRecord> = load_records(&cli.venues)?;

    // One projection per run, centred on the site collection so planar
    // distances are accurate where the candidates actually are.
    let origin = geographic_midpoint(site_records.iter().filter_map(SiteRecord::coordinate))
        .unwrap_or(Coord { x: 0.0, y: 0.0 });
    let projector = Projector::centered_on(origin)?;

    let sites = project_sites(&projector, site_records);
    let stops = project_stops(&projector, stop_records);
    let venues = project_venues(&projector, venue_records);

    let pipeline = Pipeline::new(cli.config(), sites, stops, venues)?;
    let selection = pipeline.run()?;
    log::info!("selected {} sites", selection.sites().len());

    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    write_selection(&mut handle, &selection)
}

fn write_selection(writer: &mut impl Write, selection: &RankedSelection) -> Result<(), CliError> {
    serde_json::to_writer_pretty(&mut *writer, selection)
        .map_err(|source| CliError::WriteOutput { source })?;
    writer
        .write_all(b"\n")
        .map_err(|source| CliError::WriteOutput {
            source: serde_json::Error::io(source),
        })?;
    Ok(())
}

fn load_records<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, CliError> {
    let bytes = std::fs::read(path).map_err(|source| CliError::ReadInput {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_slice(&bytes).map_err(|source| CliError::ParseInput {
        path: path.to_path_buf(),
        source,
    })
}
