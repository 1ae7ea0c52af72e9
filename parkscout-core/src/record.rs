//! Raw entity records and their projection into domain entities.
//!
//! Records mirror the flat tabular shape produced by the upstream data
//! collaborators. Longitude and latitude are optional because the
//! source feeds routinely omit them; such records are dropped during
//! projection rather than treated as errors.

use geo::Coord;
use serde::Deserialize;
use std::collections::BTreeSet;

use crate::projection::Projector;
use crate::{Site, SiteCategory, Stop, Venue};

/// A candidate park record as delivered by the data collaborator.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SiteRecord {
    /// Unique identifier.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Geographic grouping key.
    pub borough: String,
    /// Surface area in acres; feeds without the column report zero.
    #[serde(default)]
    pub area: f64,
    /// Site classification.
    #[serde(default)]
    pub category: SiteCategory,
    /// Longitude in degrees, when present.
    pub longitude: Option<f64>,
    /// Latitude in degrees, when present.
    pub latitude: Option<f64>,
}

/// A transit stop record as delivered by the data collaborator.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StopRecord {
    /// Unique identifier.
    pub id: String,
    /// Station name.
    pub name: String,
    /// Route identifiers served by the stop.
    #[serde(default)]
    pub routes: BTreeSet<String>,
    /// Average daily ridership, when the feed provides it.
    #[serde(default)]
    pub daily_ridership: Option<u64>,
    /// Longitude in degrees, when present.
    pub longitude: Option<f64>,
    /// Latitude in degrees, when present.
    pub latitude: Option<f64>,
}

/// A rated venue record as delivered by the data collaborator.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct VenueRecord {
    /// Unique identifier.
    pub id: String,
    /// Venue name.
    pub name: String,
    /// Free-form category label.
    #[serde(default)]
    pub category: String,
    /// Inspection score; lower is better, absent when unrated.
    #[serde(default)]
    pub quality_score: Option<f64>,
    /// Longitude in degrees, when present.
    pub longitude: Option<f64>,
    /// Latitude in degrees, when present.
    pub latitude: Option<f64>,
}

impl SiteRecord {
    /// The record's geographic coordinate, when both components are
    /// present.
    #[must_use]
    pub const fn coordinate(&self) -> Option<Coord> {
        match (self.longitude, self.latitude) {
            (Some(x), Some(y)) => Some(Coord { x, y }),
            _ => None,
        }
    }
}

impl StopRecord {
    /// The record's geographic coordinate, when both components are
    /// present.
    #[must_use]
    pub const fn coordinate(&self) -> Option<Coord> {
        match (self.longitude, self.latitude) {
            (Some(x), Some(y)) => Some(Coord { x, y }),
            _ => None,
        }
    }
}

impl VenueRecord {
    /// The record's geographic coordinate, when both components are
    /// present.
    #[must_use]
    pub const fn coordinate(&self) -> Option<Coord> {
        match (self.longitude, self.latitude) {
            (Some(x), Some(y)) => Some(Coord { x, y }),
            _ => None,
        }
    }
}

/// Project site records onto the planar grid, dropping records with
/// missing or non-finite coordinates or invalid attributes.
#[must_use]
pub fn project_sites(projector: &Projector, records: Vec<SiteRecord>) -> Vec<Site> {
    let total = records.len();
    let sites: Vec<Site> = records
        .into_iter()
        .filter_map(|record| {
            let position = projector.project(record.coordinate()?)?;
            Site::new(
                record.id,
                record.name,
                record.borough,
                record.area,
                record.category,
                position,
            )
            .ok()
        })
        .collect();
    log_dropped("site", total, sites.len());
    sites
}

/// Project stop records onto the planar grid, dropping records with
/// missing or non-finite coordinates.
#[must_use]
pub fn project_stops(projector: &Projector, records: Vec<StopRecord>) -> Vec<Stop> {
    let total = records.len();
    let stops: Vec<Stop> = records
        .into_iter()
        .filter_map(|record| {
            let position = projector.project(record.coordinate()?)?;
            Some(Stop::new(
                record.id,
                record.name,
                record.routes,
                record.daily_ridership,
                position,
            ))
        })
        .collect();
    log_dropped("stop", total, stops.len());
    stops
}

/// Project venue records onto the planar grid, dropping records with
/// missing or non-finite coordinates or invalid attributes.
#[must_use]
pub fn project_venues(projector: &Projector, records: Vec<VenueRecord>) -> Vec<Venue> {
    let total = records.len();
    let venues: Vec<Venue> = records
        .into_iter()
        .filter_map(|record| {
            let position = projector.project(record.coordinate()?)?;
            Venue::new(
                record.id,
                record.name,
                record.category,
                record.quality_score,
                position,
            )
            .ok()
        })
        .collect();
    log_dropped("venue", total, venues.len());
    venues
}

fn log_dropped(kind: &str, total: usize, kept: usize) {
    let dropped = total - kept;
    if dropped > 0 {
        log::debug!("dropped {dropped} of {total} {kind} records during projection");
    }
}
