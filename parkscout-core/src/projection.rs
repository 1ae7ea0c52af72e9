//! Planar projection of geographic coordinates.
//!
//! Every entity in a scoring run shares one equirectangular projection
//! centred on a regional reference point, so Euclidean distance between
//! any two projected positions approximates ground distance in metres.
//! The approximation holds well at metropolitan scale, which is the
//! operating range of the engine.

use geo::Coord;
use thiserror::Error;

/// Mean Earth radius in metres, as used by the haversine family of
/// formulas.
const EARTH_RADIUS_M: f64 = 6_371_008.8;

/// Errors returned when constructing a [`Projector`].
#[derive(Debug, Error, PartialEq)]
pub enum ProjectionError {
    /// The reference origin contained a non-finite component.
    #[error("projection origin has non-finite coordinates ({x}, {y})")]
    NonFiniteOrigin {
        /// Longitude component of the rejected origin.
        x: f64,
        /// Latitude component of the rejected origin.
        y: f64,
    },
    /// The reference origin was outside the valid geographic range.
    #[error("projection origin ({x}, {y}) is outside lon [-180, 180] / lat [-90, 90]")]
    OriginOutOfRange {
        /// Longitude component of the rejected origin.
        x: f64,
        /// Latitude component of the rejected origin.
        y: f64,
    },
}

/// Projects WGS84 degree coordinates onto a shared planar metre grid.
///
/// The projection is fixed for the lifetime of the value; projecting two
/// points with the same `Projector` always yields positions whose
/// Euclidean distance is comparable.
///
/// # Examples
///
/// ```
/// use geo::Coord;
/// use parkscout_core::Projector;
///
/// # fn main() -> Result<(), parkscout_core::ProjectionError> {
/// let projector = Projector::centered_on(Coord { x: -74.0, y: 40.7 })?;
/// let origin = projector.project(Coord { x: -74.0, y: 40.7 });
/// assert_eq!(origin, Some(Coord { x: 0.0, y: 0.0 }));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Projector {
    origin: Coord,
    metres_per_lon_degree: f64,
    metres_per_lat_degree: f64,
}

impl Projector {
    /// Build a projector centred on the given geographic origin.
    ///
    /// # Errors
    /// Returns [`ProjectionError`] when the origin is non-finite or
    /// outside the valid longitude/latitude range.
    pub fn centered_on(origin: Coord) -> Result<Self, ProjectionError> {
        if !origin.x.is_finite() || !origin.y.is_finite() {
            return Err(ProjectionError::NonFiniteOrigin {
                x: origin.x,
                y: origin.y,
            });
        }
        if origin.x.abs() > 180.0 || origin.y.abs() > 90.0 {
            return Err(ProjectionError::OriginOutOfRange {
                x: origin.x,
                y: origin.y,
            });
        }
        let metres_per_lat_degree = EARTH_RADIUS_M.to_radians();
        Ok(Self {
            origin,
            metres_per_lon_degree: metres_per_lat_degree * origin.y.to_radians().cos(),
            metres_per_lat_degree,
        })
    }

    /// Project a geographic coordinate (degrees) to planar metres.
    ///
    /// Returns `None` when either component is non-finite; callers drop
    /// such entities rather than coercing them.
    #[must_use]
    pub fn project(&self, geographic: Coord) -> Option<Coord> {
        if !geographic.x.is_finite() || !geographic.y.is_finite() {
            return None;
        }
        Some(Coord {
            x: (geographic.x - self.origin.x) * self.metres_per_lon_degree,
            y: (geographic.y - self.origin.y) * self.metres_per_lat_degree,
        })
    }

    /// The geographic origin this projector is centred on.
    #[must_use]
    pub const fn origin(&self) -> Coord {
        self.origin
    }
}

/// Arithmetic midpoint of the finite coordinates in `coords`.
///
/// Convenient for picking a projection origin from the raw entity
/// collections; returns `None` when no finite coordinate is present.
#[must_use]
pub fn geographic_midpoint(coords: impl IntoIterator<Item = Coord>) -> Option<Coord> {
    let mut count = 0.0_f64;
    let mut sum = Coord { x: 0.0, y: 0.0 };
    for coord in coords {
        if coord.x.is_finite() && coord.y.is_finite() {
            sum.x += coord.x;
            sum.y += coord.y;
            count += 1.0;
        }
    }
    if count == 0.0 {
        return None;
    }
    Some(Coord {
        x: sum.x / count,
        y: sum.y / count,
    })
}
