//! Configuration and derived result types for the scoring pipeline.
#![forbid(unsafe_code)]

use parkscout_core::{Site, SiteCategory};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::error::ConfigError;

/// Caller-supplied scoring parameters, validated at pipeline start.
///
/// Defaults match the reference deployment: parks of at least five
/// acres, a 500 m walkshed for both transit and venues, inspection
/// scores of 20 or better, and three parks per borough.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Minimum site area in acres; smaller sites are filtered out.
    pub min_park_area: f64,
    /// Site categories removed before scoring. May be empty.
    pub excluded_categories: BTreeSet<SiteCategory>,
    /// Maximum distance to the nearest transit stop, in metres. Sites
    /// without a stop inside this limit are excluded entirely.
    pub max_park_distance: f64,
    /// Radius around each site in which qualifying venues are counted,
    /// in metres.
    pub restaurant_radius: f64,
    /// Worst acceptable venue quality score (lower is better).
    pub max_restaurant_score: f64,
    /// Number of sites selected per borough.
    pub top_n_per_borough: usize,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            min_park_area: 5.0,
            excluded_categories: BTreeSet::new(),
            max_park_distance: 500.0,
            restaurant_radius: 500.0,
            max_restaurant_score: 20.0,
            top_n_per_borough: 3,
        }
    }
}

impl ScoringConfig {
    /// Check every parameter against its documented range.
    ///
    /// # Errors
    /// Returns the [`ConfigError`] for the first out-of-range parameter.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.min_park_area.is_finite() || self.min_park_area <= 0.0 {
            return Err(ConfigError::MinParkArea {
                value: self.min_park_area,
            });
        }
        if !self.max_park_distance.is_finite() || self.max_park_distance <= 0.0 {
            return Err(ConfigError::MaxParkDistance {
                value: self.max_park_distance,
            });
        }
        if !self.restaurant_radius.is_finite() || self.restaurant_radius <= 0.0 {
            return Err(ConfigError::RestaurantRadius {
                value: self.restaurant_radius,
            });
        }
        if !self.max_restaurant_score.is_finite() || self.max_restaurant_score < 0.0 {
            return Err(ConfigError::MaxRestaurantScore {
                value: self.max_restaurant_score,
            });
        }
        if self.top_n_per_borough == 0 {
            return Err(ConfigError::TopNPerBorough);
        }
        Ok(())
    }
}

/// A site enriched with the metrics computed by the pipeline stages.
///
/// A `ScoredSite` only exists for a site that passed the area and
/// category filters and has a transit stop within the configured
/// distance limit; exclusion of other sites is silent. Scores are
/// relative to the surviving batch of the current run and are not
/// comparable across runs with different parameters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredSite {
    /// The underlying site.
    #[serde(flatten)]
    pub site: Site,
    /// Identifier of the nearest transit stop.
    pub nearest_stop_id: String,
    /// Distance to the nearest transit stop, in metres.
    pub distance_to_nearest_stop_m: f64,
    /// Number of transit stops within the accessibility radius.
    pub stop_count_in_radius: usize,
    /// Ids of the stops counted by `stop_count_in_radius`; always
    /// contains `nearest_stop_id`.
    pub nearby_stop_ids: BTreeSet<String>,
    /// Batch-relative accessibility score in `[0, 100]`.
    pub accessibility_score: f64,
    /// Number of qualifying venues within the venue radius.
    pub venue_count_in_radius: usize,
    /// Ids of the venues counted by `venue_count_in_radius`.
    pub nearby_venue_ids: BTreeSet<String>,
    /// Batch-relative social-activity score in `[0, 100]`.
    pub social_activity_score: f64,
    /// Arithmetic mean of the two scores, in `[0, 100]`.
    pub combined_score: f64,
    /// Human-readable explanation; empty until the full pipeline has
    /// run.
    pub justification: String,
}

/// Aggregate statistics over a final selection.
///
/// Mirrors the figures the presentation layer renders alongside the
/// ranked list. All means are zero for an empty selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    /// Number of selected sites.
    pub selected: usize,
    /// Number of distinct boroughs represented.
    pub boroughs: usize,
    /// Mean accessibility score of the selection.
    pub mean_accessibility_score: f64,
    /// Mean social-activity score of the selection.
    pub mean_social_activity_score: f64,
    /// Mean distance to the nearest stop, in metres.
    pub mean_distance_to_nearest_stop_m: f64,
    /// Mean number of qualifying venues per site.
    pub mean_venue_count_in_radius: f64,
}

impl Summary {
    /// Compute summary statistics for a selection.
    #[expect(
        clippy::float_arithmetic,
        clippy::cast_precision_loss,
        reason = "summary statistics are means over bounded counts"
    )]
    #[must_use]
    pub fn of(sites: &[ScoredSite]) -> Self {
        if sites.is_empty() {
            return Self {
                selected: 0,
                boroughs: 0,
                mean_accessibility_score: 0.0,
                mean_social_activity_score: 0.0,
                mean_distance_to_nearest_stop_m: 0.0,
                mean_venue_count_in_radius: 0.0,
            };
        }
        let count = sites.len() as f64;
        let boroughs: BTreeSet<&str> = sites.iter().map(|s| s.site.borough.as_str()).collect();
        let sum = |value: fn(&ScoredSite) -> f64| sites.iter().map(value).sum::<f64>();
        Self {
            selected: sites.len(),
            boroughs: boroughs.len(),
            mean_accessibility_score: sum(|s| s.accessibility_score) / count,
            mean_social_activity_score: sum(|s| s.social_activity_score) / count,
            mean_distance_to_nearest_stop_m: sum(|s| s.distance_to_nearest_stop_m) / count,
            mean_venue_count_in_radius: sum(|s| s.venue_count_in_radius as f64) / count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn default_config_is_valid() {
        assert_eq!(ScoringConfig::default().validate(), Ok(()));
    }

    #[rstest]
    #[case(0.0)]
    #[case(-5.0)]
    #[case(f64::NAN)]
    fn rejects_bad_min_area(#[case] value: f64) {
        let config = ScoringConfig {
            min_park_area: value,
            ..ScoringConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MinParkArea { .. })
        ));
    }

    #[rstest]
    fn rejects_non_positive_distances() {
        let config = ScoringConfig {
            max_park_distance: 0.0,
            ..ScoringConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MaxParkDistance { .. })
        ));

        let config = ScoringConfig {
            restaurant_radius: -1.0,
            ..ScoringConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::RestaurantRadius { .. })
        ));
    }

    #[rstest]
    fn rejects_negative_quality_threshold() {
        let config = ScoringConfig {
            max_restaurant_score: -0.5,
            ..ScoringConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MaxRestaurantScore { .. })
        ));
    }

    #[rstest]
    fn accepts_zero_quality_threshold() {
        let config = ScoringConfig {
            max_restaurant_score: 0.0,
            ..ScoringConfig::default()
        };
        assert_eq!(config.validate(), Ok(()));
    }

    #[rstest]
    fn rejects_zero_top_n() {
        let config = ScoringConfig {
            top_n_per_borough: 0,
            ..ScoringConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::TopNPerBorough));
    }

    #[rstest]
    fn empty_summary_is_all_zero() {
        let summary = Summary::of(&[]);
        assert_eq!(summary.selected, 0);
        assert_eq!(summary.boroughs, 0);
        assert_eq!(summary.mean_accessibility_score, 0.0);
        assert_eq!(summary.mean_venue_count_in_radius, 0.0);
    }
}
