//! Transit accessibility scoring.
//!
//! Filters the candidate sites, attaches nearest-stop and stop-count
//! metrics from the stop index, and derives a batch-relative score.
//! The normalisation denominator is the maximum nearest-stop distance
//! observed among the surviving sites of this run, so widening the
//! filters can change every score even when no site moved. That
//! behaviour is intentional; see [`crate::ScoringConfig`].

#![forbid(unsafe_code)]

use parkscout_core::{PointIndex, Site};
use std::collections::BTreeSet;

use crate::types::{ScoredSite, ScoringConfig};

/// Filter and score sites for transit accessibility.
///
/// Sites below the minimum area, in an excluded category, or without a
/// stop within `max_park_distance` are silently dropped. The returned
/// working set carries zeroed social-activity fields; the social
/// activity stage fills them in.
pub(crate) fn score(
    sites: &[Site],
    stops: &PointIndex,
    config: &ScoringConfig,
) -> Vec<ScoredSite> {
    let mut working: Vec<ScoredSite> = sites
        .iter()
        .filter(|site| {
            site.area >= config.min_park_area
                && !config.excluded_categories.contains(&site.category)
        })
        .filter_map(|site| {
            let nearest = stops.nearest(site.position, config.max_park_distance)?;
            let nearby_stop_ids = stops.within_radius(site.position, config.max_park_distance);
            Some(ScoredSite {
                site: site.clone(),
                nearest_stop_id: nearest.id,
                distance_to_nearest_stop_m: nearest.distance_m,
                stop_count_in_radius: nearby_stop_ids.len(),
                nearby_stop_ids,
                accessibility_score: 0.0,
                venue_count_in_radius: 0,
                nearby_venue_ids: BTreeSet::new(),
                social_activity_score: 0.0,
                combined_score: 0.0,
                justification: String::new(),
            })
        })
        .collect();

    normalise(&mut working);
    log::debug!(
        "accessibility stage kept {} of {} sites",
        working.len(),
        sites.len()
    );
    working
}

/// Second pass: turn raw distances into scores relative to the batch
/// maximum. A lone survivor defines its own batch and scores 100
/// whatever its distance, as does every site when the batch maximum is
/// zero.
#[expect(
    clippy::float_arithmetic,
    reason = "scores are normalised against the batch maximum distance"
)]
fn normalise(working: &mut [ScoredSite]) {
    if let [only] = working {
        only.accessibility_score = 100.0;
        return;
    }
    let max_distance = working
        .iter()
        .map(|site| site.distance_to_nearest_stop_m)
        .fold(0.0_f64, f64::max);
    for site in working {
        site.accessibility_score = if max_distance > 0.0 {
            (100.0 * (1.0 - site.distance_to_nearest_stop_m / max_distance)).clamp(0.0, 100.0)
        } else {
            100.0
        };
    }
}
