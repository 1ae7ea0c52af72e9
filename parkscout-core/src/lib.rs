//! Core domain types for the parkscout engine.
//!
//! The engine evaluates candidate park sites against transit stops and
//! rated venues. This crate defines the projected entities those
//! evaluations run over, the raw records they are ingested from, the
//! coordinate projection that turns degrees into metres, and the spatial
//! index used for nearest-neighbour and radius queries.
//!
//! Constructors return `Result` to surface invalid input early; entities
//! are immutable once built.

#![forbid(unsafe_code)]

use geo::Coord;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

mod index;
mod projection;
mod record;

pub use index::{NearestPoint, PointIndex};
pub use projection::{ProjectionError, Projector, geographic_midpoint};
pub use record::{SiteRecord, StopRecord, VenueRecord, project_sites, project_stops, project_venues};

/// Classification of a candidate park site.
///
/// Categories mirror the open-data feed the sites are sourced from and
/// drive the exclusion filter applied before scoring.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum SiteCategory {
    /// A general-purpose park.
    #[default]
    Standard,
    /// A playground; typically excluded from event hosting.
    Playground,
    /// Land held by the parks department but not developed.
    Undeveloped,
    /// A paved public plaza.
    Plaza,
}

impl fmt::Display for SiteCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Standard => "standard",
            Self::Playground => "playground",
            Self::Undeveloped => "undeveloped",
            Self::Plaza => "plaza",
        };
        f.write_str(name)
    }
}

/// Error returned when parsing a [`SiteCategory`] from text.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown site category {value:?}; expected standard, playground, undeveloped, or plaza")]
pub struct ParseSiteCategoryError {
    /// The text that failed to parse.
    pub value: String,
}

impl FromStr for SiteCategory {
    type Err = ParseSiteCategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "standard" => Ok(Self::Standard),
            "playground" => Ok(Self::Playground),
            "undeveloped" => Ok(Self::Undeveloped),
            "plaza" => Ok(Self::Plaza),
            _ => Err(ParseSiteCategoryError {
                value: s.to_owned(),
            }),
        }
    }
}

/// A candidate park location on the projected plane.
///
/// # Examples
///
/// ```
/// use geo::Coord;
/// use parkscout_core::{Site, SiteCategory};
///
/// # fn main() -> Result<(), parkscout_core::SiteError> {
/// let site = Site::new(
///     "p1",
///     "Astoria Park",
///     "Queens",
///     58.0,
///     SiteCategory::Standard,
///     Coord { x: 120.0, y: -340.0 },
/// )?;
/// assert_eq!(site.borough, "Queens");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Site {
    /// Unique identifier; comparisons on it break scoring ties.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Geographic grouping key for balanced selection.
    pub borough: String,
    /// Surface area in acres.
    pub area: f64,
    /// Site classification.
    pub category: SiteCategory,
    /// Position in metres on the shared projected plane.
    pub position: Coord,
}

/// Errors returned by [`Site::new`].
#[derive(Debug, Error, PartialEq)]
pub enum SiteError {
    /// The borough grouping key was empty.
    #[error("site {id} has an empty borough")]
    EmptyBorough {
        /// Identifier of the offending site.
        id: String,
    },
    /// The area was negative or not finite.
    #[error("site {id} has invalid area {area}")]
    InvalidArea {
        /// Identifier of the offending site.
        id: String,
        /// The rejected area value.
        area: f64,
    },
}

impl Site {
    /// Validates and constructs a [`Site`].
    ///
    /// # Errors
    /// Returns [`SiteError`] when the borough is empty or the area is
    /// negative or non-finite.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        borough: impl Into<String>,
        area: f64,
        category: SiteCategory,
        position: Coord,
    ) -> Result<Self, SiteError> {
        let id = id.into();
        let borough = borough.into();
        if borough.trim().is_empty() {
            return Err(SiteError::EmptyBorough { id });
        }
        if !area.is_finite() || area < 0.0 {
            return Err(SiteError::InvalidArea { id, area });
        }
        Ok(Self {
            id,
            name: name.into(),
            borough,
            area,
            category,
            position,
        })
    }
}

/// A transit stop on the projected plane.
#[derive(Debug, Clone, PartialEq)]
pub struct Stop {
    /// Unique identifier.
    pub id: String,
    /// Station name, used verbatim in justifications.
    pub name: String,
    /// Route identifiers served by the stop.
    pub routes: BTreeSet<String>,
    /// Average daily ridership, when the feed provides it.
    pub daily_ridership: Option<u64>,
    /// Position in metres on the shared projected plane.
    pub position: Coord,
}

impl Stop {
    /// Constructs a [`Stop`].
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        routes: BTreeSet<String>,
        daily_ridership: Option<u64>,
        position: Coord,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            routes,
            daily_ridership,
            position,
        }
    }
}

/// A rated venue (e.g. a restaurant) on the projected plane.
///
/// Quality scores follow the source inspection data: lower is better.
/// `None` means the venue is unrated and can never qualify towards
/// social-activity density.
#[derive(Debug, Clone, PartialEq)]
pub struct Venue {
    /// Unique identifier.
    pub id: String,
    /// Venue name.
    pub name: String,
    /// Free-form category label (cuisine, venue type).
    pub category: String,
    /// Inspection score; lower is better, absent when unrated.
    pub quality_score: Option<f64>,
    /// Position in metres on the shared projected plane.
    pub position: Coord,
}

/// Errors returned by [`Venue::new`].
#[derive(Debug, Error, PartialEq)]
pub enum VenueError {
    /// A quality score was present but not finite.
    #[error("venue {id} has non-finite quality score {value}")]
    NonFiniteQualityScore {
        /// Identifier of the offending venue.
        id: String,
        /// The rejected score.
        value: f64,
    },
}

impl Venue {
    /// Validates and constructs a [`Venue`].
    ///
    /// # Errors
    /// Returns [`VenueError`] when a quality score is present but not
    /// finite.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        category: impl Into<String>,
        quality_score: Option<f64>,
        position: Coord,
    ) -> Result<Self, VenueError> {
        let id = id.into();
        if let Some(value) = quality_score
            && !value.is_finite()
        {
            return Err(VenueError::NonFiniteQualityScore { id, value });
        }
        Ok(Self {
            id,
            name: name.into(),
            category: category.into(),
            quality_score,
            position,
        })
    }
}
