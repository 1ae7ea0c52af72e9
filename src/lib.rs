//! Facade crate for the parkscout park-ranking engine.
//!
//! Re-exports the domain types, spatial primitives, and scoring
//! pipeline so downstream consumers depend on a single crate.

#![forbid(unsafe_code)]

pub use parkscout_core::{
    NearestPoint, ParseSiteCategoryError, PointIndex, ProjectionError, Projector, Site,
    SiteCategory, SiteError, SiteRecord, Stop, StopRecord, Venue, VenueError, VenueRecord,
    geographic_midpoint, project_sites, project_stops, project_venues,
};

pub use parkscout_scorer::{
    ConfigError, Pipeline, PipelineError, RankedSelection, ScoredSite, ScoringConfig, Stage,
    Summary, top_k_by_group,
};
