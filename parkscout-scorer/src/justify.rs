//! Justification rendering for selected sites.
//!
//! A justification is a pure function of a fully scored site plus the
//! stop and venue lookups; rendering the same selection twice yields
//! byte-identical text.

#![forbid(unsafe_code)]

use parkscout_core::{Stop, Venue};
use std::collections::BTreeMap;

use crate::types::ScoredSite;

/// Render a justification string onto every site in the selection.
pub(crate) fn annotate(
    working: &mut [ScoredSite],
    stops: &BTreeMap<String, Stop>,
    venues: &BTreeMap<String, Venue>,
) {
    for site in working {
        site.justification = render(site, stops, venues);
    }
}

fn render(
    site: &ScoredSite,
    stops: &BTreeMap<String, Stop>,
    venues: &BTreeMap<String, Venue>,
) -> String {
    let stop_name = stops
        .get(&site.nearest_stop_id)
        .map_or("an unnamed stop", |stop| stop.name.as_str());
    let mean_quality = mean_venue_quality(site, venues);
    format!(
        "{distance:.0} m from {stop_name} ({stops} stops within walking distance); \
         {venues} quality venues nearby with an average inspection score of \
         {mean_quality:.1}; combined score {combined:.1}/100",
        distance = site.distance_to_nearest_stop_m,
        stops = site.stop_count_in_radius,
        venues = site.venue_count_in_radius,
        combined = site.combined_score,
    )
}

/// Mean quality score of the qualifying venues near a site, zero when
/// none are nearby.
#[expect(
    clippy::float_arithmetic,
    clippy::cast_precision_loss,
    reason = "the mean is computed over a bounded venue count"
)]
fn mean_venue_quality(site: &ScoredSite, venues: &BTreeMap<String, Venue>) -> f64 {
    let scores: Vec<f64> = site
        .nearby_venue_ids
        .iter()
        .filter_map(|id| venues.get(id).and_then(|venue| venue.quality_score))
        .collect();
    if scores.is_empty() {
        return 0.0;
    }
    scores.iter().sum::<f64>() / scores.len() as f64
}
