//! Error types raised by the scoring pipeline.
#![forbid(unsafe_code)]

use std::fmt;
use thiserror::Error;

/// Errors raised while validating a scoring configuration.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    /// `min_park_area` must be positive and finite.
    #[error("min_park_area must be a positive, finite number of acres, got {value}")]
    MinParkArea {
        /// The rejected value.
        value: f64,
    },
    /// `max_park_distance` must be positive and finite.
    #[error("max_park_distance must be a positive, finite number of metres, got {value}")]
    MaxParkDistance {
        /// The rejected value.
        value: f64,
    },
    /// `restaurant_radius` must be positive and finite.
    #[error("restaurant_radius must be a positive, finite number of metres, got {value}")]
    RestaurantRadius {
        /// The rejected value.
        value: f64,
    },
    /// `max_restaurant_score` must be non-negative and finite.
    #[error("max_restaurant_score must be a non-negative, finite score, got {value}")]
    MaxRestaurantScore {
        /// The rejected value.
        value: f64,
    },
    /// `top_n_per_borough` must be at least one.
    #[error("top_n_per_borough must be at least 1")]
    TopNPerBorough,
}

/// Pipeline stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Transit accessibility scoring.
    Accessibility,
    /// Social-activity density scoring.
    SocialActivity,
    /// Borough-balanced top-N selection.
    Balance,
    /// Justification rendering.
    Justify,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Accessibility => "accessibility",
            Self::SocialActivity => "social activity",
            Self::Balance => "balance",
            Self::Justify => "justify",
        };
        f.write_str(name)
    }
}

/// Errors raised while running the scoring pipeline.
#[derive(Debug, Error, PartialEq)]
pub enum PipelineError {
    /// The supplied configuration failed validation.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// A stage was invoked before its prerequisite stage had produced a
    /// working set. The working set is left untouched.
    #[error("the {attempted} stage requires the {required} stage to run first")]
    StageOrder {
        /// Stage that must complete first.
        required: Stage,
        /// Stage that was invoked out of order.
        attempted: Stage,
    },
}
