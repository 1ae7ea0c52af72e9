//! Social-activity density scoring.
//!
//! Counts qualifying venues around each surviving site and derives a
//! batch-relative score. The venue index handed to this stage already
//! contains only qualifying venues (quality score at or below the
//! configured threshold); unrated venues never qualify.

#![forbid(unsafe_code)]

use parkscout_core::PointIndex;

use crate::types::ScoredSite;

/// Count qualifying venues around each site and score the batch.
///
/// Unlike the accessibility stage, a batch where no site has any
/// qualifying venue nearby scores zero across the board: the absence of
/// venues is not rewarded.
pub(crate) fn score(working: &mut [ScoredSite], venues: &PointIndex, radius_m: f64) {
    for site in working.iter_mut() {
        let nearby = venues.within_radius(site.site.position, radius_m);
        site.venue_count_in_radius = nearby.len();
        site.nearby_venue_ids = nearby;
    }
    normalise(working);
    log::debug!("social activity stage scored {} sites", working.len());
}

#[expect(
    clippy::float_arithmetic,
    clippy::cast_precision_loss,
    reason = "scores are normalised against the batch maximum venue count"
)]
fn normalise(working: &mut [ScoredSite]) {
    let max_count = working
        .iter()
        .map(|site| site.venue_count_in_radius)
        .max()
        .unwrap_or(0);
    for site in working {
        site.social_activity_score = if max_count > 0 {
            (100.0 * site.venue_count_in_radius as f64 / max_count as f64).clamp(0.0, 100.0)
        } else {
            0.0
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::Coord;
    use parkscout_core::{Site, SiteCategory};
    use rstest::rstest;
    use std::collections::BTreeSet;

    fn scored_site(id: &str, x: f64, y: f64) -> ScoredSite {
        ScoredSite {
            site: Site::new(id, id, "Queens", 10.0, SiteCategory::Standard, Coord { x, y })
                .expect("valid site"),
            nearest_stop_id: "s1".to_owned(),
            distance_to_nearest_stop_m: 100.0,
            stop_count_in_radius: 1,
            nearby_stop_ids: ["s1".to_owned()].into_iter().collect(),
            accessibility_score: 50.0,
            venue_count_in_radius: 0,
            nearby_venue_ids: BTreeSet::new(),
            social_activity_score: 0.0,
            combined_score: 0.0,
            justification: String::new(),
        }
    }

    fn venue_index(entries: &[(&str, f64, f64)]) -> PointIndex {
        PointIndex::build(
            entries
                .iter()
                .map(|(id, x, y)| ((*id).to_owned(), Coord { x: *x, y: *y })),
        )
    }

    #[rstest]
    fn counts_and_ids_stay_in_step() {
        let mut working = vec![scored_site("p1", 0.0, 0.0)];
        let venues = venue_index(&[("v1", 100.0, 0.0), ("v2", 0.0, 200.0), ("v3", 900.0, 0.0)]);

        score(&mut working, &venues, 500.0);

        let site = working.first().expect("one site");
        assert_eq!(site.venue_count_in_radius, 2);
        assert_eq!(site.nearby_venue_ids.len(), site.venue_count_in_radius);
        assert!(site.nearby_venue_ids.contains("v1"));
        assert!(site.nearby_venue_ids.contains("v2"));
    }

    #[rstest]
    fn busiest_site_scores_100_and_others_scale() {
        let mut working = vec![
            scored_site("p1", 0.0, 0.0),
            scored_site("p2", 10_000.0, 0.0),
        ];
        let venues = venue_index(&[
            ("v1", 100.0, 0.0),
            ("v2", 0.0, 100.0),
            ("v3", 10_100.0, 0.0),
        ]);

        score(&mut working, &venues, 500.0);

        let p1 = working.iter().find(|s| s.site.id == "p1").expect("p1");
        let p2 = working.iter().find(|s| s.site.id == "p2").expect("p2");
        assert_eq!(p1.social_activity_score, 100.0);
        assert_eq!(p2.social_activity_score, 50.0);
    }

    #[rstest]
    fn no_venues_anywhere_scores_zero_not_perfect() {
        let mut working = vec![scored_site("p1", 0.0, 0.0), scored_site("p2", 50.0, 0.0)];
        let venues = venue_index(&[]);

        score(&mut working, &venues, 500.0);

        assert!(working.iter().all(|s| s.social_activity_score == 0.0));
    }

    #[rstest]
    fn empty_working_set_is_a_no_op() {
        let mut working: Vec<ScoredSite> = Vec::new();
        score(&mut working, &venue_index(&[]), 500.0);
        assert!(working.is_empty());
    }
}
