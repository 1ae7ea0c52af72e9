//! Pipeline orchestration.
//!
//! The [`Pipeline`] owns the working set and sequences the four stages:
//! accessibility → social activity → balance → justify. Each stage can
//! be driven individually (the working set is threaded through as an
//! explicit value) or all at once via [`Pipeline::run`]. Invoking a
//! stage before its prerequisite is an ordering error and leaves the
//! working set untouched; re-running an earlier stage discards every
//! downstream result, because scores are batch-relative and stale
//! values would be silently wrong.

#![forbid(unsafe_code)]

use parkscout_core::{PointIndex, Site, Stop, Venue};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

use crate::error::{PipelineError, Stage};
use crate::types::{ScoredSite, ScoringConfig, Summary};
use crate::{accessibility, activity, balance, justify};

/// The scoring pipeline over one immutable snapshot of input entities.
///
/// # Examples
///
/// ```
/// use parkscout_scorer::{Pipeline, ScoringConfig};
///
/// # fn main() -> Result<(), parkscout_scorer::PipelineError> {
/// let pipeline = Pipeline::new(ScoringConfig::default(), vec![], vec![], vec![])?;
/// let selection = pipeline.run()?;
/// assert!(selection.sites().is_empty());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Pipeline {
    config: ScoringConfig,
    sites: Vec<Site>,
    stops: BTreeMap<String, Stop>,
    venues: BTreeMap<String, Venue>,
    stop_index: PointIndex,
    venue_index: PointIndex,
    working: Option<Vec<ScoredSite>>,
    activity_done: bool,
    balanced: bool,
}

impl Pipeline {
    /// Build a pipeline over the supplied entity snapshot.
    ///
    /// The stop index covers every stop; the venue index covers only
    /// qualifying venues (quality score at or below
    /// `max_restaurant_score`), while the raw venue collection is kept
    /// for justification lookups.
    ///
    /// # Errors
    /// Returns [`PipelineError::Config`] when the configuration fails
    /// validation.
    pub fn new(
        config: ScoringConfig,
        sites: Vec<Site>,
        stops: Vec<Stop>,
        venues: Vec<Venue>,
    ) -> Result<Self, PipelineError> {
        config.validate()?;
        let stop_index = PointIndex::build(stops.iter().map(|s| (s.id.clone(), s.position)));
        let venue_index = PointIndex::build(venues.iter().filter_map(|venue| {
            let quality = venue.quality_score?;
            (quality <= config.max_restaurant_score).then(|| (venue.id.clone(), venue.position))
        }));
        log::info!(
            "pipeline over {} sites, {} stops, {} venues ({} qualifying)",
            sites.len(),
            stops.len(),
            venues.len(),
            venue_index.len()
        );
        Ok(Self {
            config,
            sites,
            stops: stops.into_iter().map(|s| (s.id.clone(), s)).collect(),
            venues: venues.into_iter().map(|v| (v.id.clone(), v)).collect(),
            stop_index,
            venue_index,
            working: None,
            activity_done: false,
            balanced: false,
        })
    }

    /// Run the accessibility stage, replacing any previous working set.
    ///
    /// Downstream stage results are discarded; they must be recomputed
    /// against the new batch.
    pub fn score_accessibility(&mut self) -> &[ScoredSite] {
        let scored = accessibility::score(&self.sites, &self.stop_index, &self.config);
        self.activity_done = false;
        self.balanced = false;
        self.working.insert(scored).as_slice()
    }

    /// Run the social-activity stage over the current working set.
    ///
    /// # Errors
    /// Returns [`PipelineError::StageOrder`] when the accessibility
    /// stage has not produced a working set yet.
    pub fn score_social_activity(&mut self) -> Result<&[ScoredSite], PipelineError> {
        let Some(working) = self.working.as_mut() else {
            return Err(PipelineError::StageOrder {
                required: Stage::Accessibility,
                attempted: Stage::SocialActivity,
            });
        };
        activity::score(working, &self.venue_index, self.config.restaurant_radius);
        self.activity_done = true;
        self.balanced = false;
        Ok(working.as_slice())
    }

    /// Run the borough-balancing stage, shrinking the working set to
    /// the selected sites.
    ///
    /// # Errors
    /// Returns [`PipelineError::StageOrder`] when the social-activity
    /// stage has not run against the current working set.
    pub fn balance(&mut self) -> Result<&[ScoredSite], PipelineError> {
        if !self.activity_done {
            return Err(PipelineError::StageOrder {
                required: Stage::SocialActivity,
                attempted: Stage::Balance,
            });
        }
        let working = self.working.take().unwrap_or_default();
        let selected = balance::select(working, self.config.top_n_per_borough);
        self.balanced = true;
        Ok(self.working.insert(selected).as_slice())
    }

    /// Render justifications onto the balanced selection.
    ///
    /// # Errors
    /// Returns [`PipelineError::StageOrder`] when the balance stage has
    /// not run against the current working set.
    pub fn justify(&mut self) -> Result<&[ScoredSite], PipelineError> {
        if !self.balanced {
            return Err(PipelineError::StageOrder {
                required: Stage::Balance,
                attempted: Stage::Justify,
            });
        }
        let working = self.working.get_or_insert_with(Vec::new);
        justify::annotate(working, &self.stops, &self.venues);
        Ok(working.as_slice())
    }

    /// Run all four stages and consume the pipeline.
    ///
    /// # Errors
    /// Returns [`PipelineError`] if any stage fails; with a validated
    /// configuration the internal ordering makes that unreachable in
    /// practice.
    pub fn run(mut self) -> Result<RankedSelection, PipelineError> {
        self.score_accessibility();
        self.score_social_activity()?;
        self.balance()?;
        self.justify()?;
        let sites = self.working.unwrap_or_default();
        let summary = Summary::of(&sites);
        Ok(RankedSelection { sites, summary })
    }
}

/// The final, justified selection produced by a full pipeline run.
///
/// Sites are ordered by borough group with each group internally
/// ranked; [`RankedSelection::into_ranked`] flattens that into a single
/// globally ranked list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedSelection {
    sites: Vec<ScoredSite>,
    summary: Summary,
}

impl RankedSelection {
    /// The selected sites, grouped by borough.
    #[must_use]
    pub fn sites(&self) -> &[ScoredSite] {
        &self.sites
    }

    /// Aggregate statistics over the selection.
    #[must_use]
    pub const fn summary(&self) -> &Summary {
        &self.summary
    }

    /// Flatten the selection into one list ranked by combined score
    /// descending, ties towards the smaller id.
    #[must_use]
    pub fn into_ranked(self) -> Vec<ScoredSite> {
        let mut sites = self.sites;
        sites.sort_by(|a, b| {
            b.combined_score
                .total_cmp(&a.combined_score)
                .then_with(|| a.site.id.cmp(&b.site.id))
        });
        sites
    }

    /// Union of the nearby stop ids across the selection, for context
    /// rendering by presentation collaborators.
    #[must_use]
    pub fn nearby_stop_ids(&self) -> BTreeSet<String> {
        self.sites
            .iter()
            .flat_map(|site| site.nearby_stop_ids.iter().cloned())
            .collect()
    }

    /// Union of the nearby qualifying venue ids across the selection.
    #[must_use]
    pub fn nearby_venue_ids(&self) -> BTreeSet<String> {
        self.sites
            .iter()
            .flat_map(|site| site.nearby_venue_ids.iter().cloned())
            .collect()
    }
}
