//! Borough-balanced top-N selection.
//!
//! Combines the two stage scores into one and keeps the best N sites
//! per borough. The grouping itself is a generic group/sort/truncate
//! utility so other grouping keys can reuse it.

#![forbid(unsafe_code)]

use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::types::ScoredSite;

/// Group `items` by `key`, order each group with `order`, and keep the
/// first `k` of each.
///
/// Groups are emitted in ascending key order; groups with fewer than
/// `k` items are returned whole. There is no ordering guarantee across
/// groups beyond that.
#[must_use]
pub fn top_k_by_group<T, K, KeyFn, OrderFn>(
    items: Vec<T>,
    k: usize,
    key: KeyFn,
    order: OrderFn,
) -> Vec<T>
where
    K: Ord,
    KeyFn: Fn(&T) -> K,
    OrderFn: Fn(&T, &T) -> Ordering,
{
    let mut groups: BTreeMap<K, Vec<T>> = BTreeMap::new();
    for item in items {
        groups.entry(key(&item)).or_default().push(item);
    }
    groups
        .into_values()
        .flat_map(|mut group| {
            group.sort_by(&order);
            group.truncate(k);
            group
        })
        .collect()
}

/// Compute combined scores and select the top `top_n` sites per
/// borough.
///
/// Within a borough, sites rank by combined score descending with ties
/// resolved towards the smaller site id, so the selection is
/// deterministic across runs.
pub(crate) fn select(mut working: Vec<ScoredSite>, top_n: usize) -> Vec<ScoredSite> {
    for site in &mut working {
        site.combined_score = combined(site);
    }
    let selected = top_k_by_group(
        working,
        top_n,
        |site| site.site.borough.clone(),
        |a, b| {
            b.combined_score
                .total_cmp(&a.combined_score)
                .then_with(|| a.site.id.cmp(&b.site.id))
        },
    );
    log::debug!("balance stage selected {} sites", selected.len());
    selected
}

#[expect(
    clippy::float_arithmetic,
    reason = "the combined score is the arithmetic mean of the two stage scores"
)]
fn combined(site: &ScoredSite) -> f64 {
    (site.accessibility_score + site.social_activity_score) / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::Coord;
    use parkscout_core::{Site, SiteCategory};
    use rstest::rstest;
    use std::collections::BTreeSet;

    fn scored(id: &str, borough: &str, accessibility: f64, social: f64) -> ScoredSite {
        ScoredSite {
            site: Site::new(
                id,
                id,
                borough,
                10.0,
                SiteCategory::Standard,
                Coord { x: 0.0, y: 0.0 },
            )
            .expect("valid site"),
            nearest_stop_id: "s1".to_owned(),
            distance_to_nearest_stop_m: 100.0,
            stop_count_in_radius: 1,
            nearby_stop_ids: ["s1".to_owned()].into_iter().collect(),
            accessibility_score: accessibility,
            venue_count_in_radius: 0,
            nearby_venue_ids: BTreeSet::new(),
            social_activity_score: social,
            combined_score: 0.0,
            justification: String::new(),
        }
    }

    #[rstest]
    fn keeps_the_top_two_per_borough_in_order() {
        let working = vec![
            scored("p-low", "Bronx", 30.0, 30.0),
            scored("p-high", "Bronx", 90.0, 90.0),
            scored("p-mid", "Bronx", 60.0, 60.0),
        ];
        let selected = select(working, 2);
        let ids: Vec<&str> = selected.iter().map(|s| s.site.id.as_str()).collect();
        assert_eq!(ids, vec!["p-high", "p-mid"]);
        assert_eq!(
            selected.iter().map(|s| s.combined_score).collect::<Vec<_>>(),
            vec![90.0, 60.0]
        );
    }

    #[rstest]
    fn combined_score_is_the_mean_of_both_scores() {
        let selected = select(vec![scored("p1", "Bronx", 80.0, 40.0)], 1);
        assert_eq!(selected.first().map(|s| s.combined_score), Some(60.0));
    }

    #[rstest]
    fn short_groups_are_returned_whole() {
        let working = vec![
            scored("p1", "Bronx", 50.0, 50.0),
            scored("p2", "Queens", 70.0, 70.0),
        ];
        let selected = select(working, 3);
        assert_eq!(selected.len(), 2);
    }

    #[rstest]
    fn never_returns_more_than_n_per_borough() {
        let working = (0..10)
            .map(|i| scored(&format!("p{i}"), "Brooklyn", 10.0, 10.0))
            .collect();
        let selected = select(working, 4);
        assert_eq!(selected.len(), 4);
    }

    #[rstest]
    fn ties_resolve_to_the_smaller_id() {
        let working = vec![
            scored("pb", "Bronx", 50.0, 50.0),
            scored("pa", "Bronx", 50.0, 50.0),
        ];
        let selected = select(working, 1);
        assert_eq!(selected.first().map(|s| s.site.id.as_str()), Some("pa"));
    }

    #[rstest]
    fn selected_scores_dominate_rejected_ones() {
        let working = vec![
            scored("p1", "Bronx", 90.0, 90.0),
            scored("p2", "Bronx", 60.0, 60.0),
            scored("p3", "Bronx", 30.0, 30.0),
            scored("p4", "Bronx", 20.0, 20.0),
        ];
        let selected = select(working, 2);
        let minimum_selected = selected
            .iter()
            .map(|s| s.combined_score)
            .fold(f64::INFINITY, f64::min);
        assert!(minimum_selected >= 60.0);
    }

    #[rstest]
    fn generic_utility_groups_sorts_and_truncates() {
        let items = vec![(1, "b"), (2, "a"), (1, "a"), (2, "c"), (1, "c")];
        let result = top_k_by_group(items, 2, |item| item.0, |a, b| a.1.cmp(b.1));
        assert_eq!(result, vec![(1, "a"), (1, "b"), (2, "a"), (2, "c")]);
    }

    #[rstest]
    fn empty_input_selects_nothing() {
        assert!(select(Vec::new(), 3).is_empty());
    }
}
