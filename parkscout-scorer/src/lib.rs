//! Scoring pipeline for candidate park locations.
//!
//! The pipeline combines two independently computed spatial metrics,
//! transit accessibility and nearby social-activity density, into a
//! single comparable score per site, then selects a borough-balanced
//! top-N result set with a rendered justification per result.
//!
//! Scores are **batch-relative**: each is normalised against the
//! extremes observed among the sites surviving the current run's
//! filters, not against a fixed scale. Identical absolute distances can
//! therefore yield different scores under different filter parameters;
//! callers must not compare scores across configurations.
//!
//! # Examples
//!
//! ```no_run
//! use parkscout_core::{Site, Stop, Venue};
//! use parkscout_scorer::{Pipeline, ScoringConfig};
//!
//! # fn main() -> Result<(), parkscout_scorer::PipelineError> {
//! # let (sites, stops, venues): (Vec<Site>, Vec<Stop>, Vec<Venue>) =
//! #     (vec![], vec![], vec![]);
//! let pipeline = Pipeline::new(ScoringConfig::default(), sites, stops, venues)?;
//! let selection = pipeline.run()?;
//! for site in selection.sites() {
//!     println!("{}: {}", site.site.name, site.justification);
//! }
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

mod accessibility;
mod activity;
mod balance;
mod error;
mod justify;
mod pipeline;
mod types;

pub use balance::top_k_by_group;
pub use error::{ConfigError, PipelineError, Stage};
pub use pipeline::{Pipeline, RankedSelection};
pub use types::{ScoredSite, ScoringConfig, Summary};
