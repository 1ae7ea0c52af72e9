//! R-tree point index with deterministic query semantics.
//!
//! The index answers the two queries the scoring pipeline needs:
//! nearest point within a limit, and all points within a radius. Both
//! treat distance as Euclidean on the projected plane. Boundary and
//! tie-break rules live in this wrapper rather than in the tree so that
//! results match a linear scan exactly: radius tests are closed-disk
//! (`distance <= radius`) and equidistant nearest candidates resolve to
//! the lexicographically smaller id.

use geo::Coord;
use rstar::{AABB, PointDistance, RTree, RTreeObject};
use std::collections::BTreeSet;

#[derive(Debug, Clone)]
struct IndexedPoint {
    id: String,
    position: [f64; 2],
}

impl RTreeObject for IndexedPoint {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.position)
    }
}

impl PointDistance for IndexedPoint {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.position[0] - point[0];
        let dy = self.position[1] - point[1];
        dx * dx + dy * dy
    }
}

/// The nearest indexed point to a query position.
#[derive(Debug, Clone, PartialEq)]
pub struct NearestPoint {
    /// Identifier of the nearest point.
    pub id: String,
    /// Euclidean distance from the query position, in metres.
    pub distance_m: f64,
}

/// Immutable spatial index over identified points on the projected
/// plane.
///
/// Built once per entity collection and shared read-only across
/// queries.
///
/// # Examples
///
/// ```
/// use geo::Coord;
/// use parkscout_core::PointIndex;
///
/// let index = PointIndex::build([
///     ("a".to_owned(), Coord { x: 0.0, y: 0.0 }),
///     ("b".to_owned(), Coord { x: 300.0, y: 400.0 }),
/// ]);
/// let nearest = index.nearest(Coord { x: 10.0, y: 0.0 }, 100.0).unwrap();
/// assert_eq!(nearest.id, "a");
/// assert_eq!(nearest.distance_m, 10.0);
/// ```
#[derive(Debug)]
pub struct PointIndex {
    tree: RTree<IndexedPoint>,
}

impl PointIndex {
    /// Bulk-load an index from `(id, position)` pairs.
    #[must_use]
    pub fn build(entries: impl IntoIterator<Item = (String, Coord)>) -> Self {
        let points = entries
            .into_iter()
            .map(|(id, position)| IndexedPoint {
                id,
                position: [position.x, position.y],
            })
            .collect();
        Self {
            tree: RTree::bulk_load(points),
        }
    }

    /// Number of indexed points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    /// Whether the index holds no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// The closest point within `limit_m` metres of `position`, if any.
    ///
    /// The limit is inclusive. When several points share the minimal
    /// distance the lexicographically smallest id wins, so repeated
    /// queries are deterministic across runs and tree shapes.
    #[must_use]
    pub fn nearest(&self, position: Coord, limit_m: f64) -> Option<NearestPoint> {
        if limit_m < 0.0 {
            return None;
        }
        let query = [position.x, position.y];
        let mut candidates = self.tree.nearest_neighbor_iter_with_distance_2(&query);
        let (mut best, best_distance_2) = candidates.next()?;
        if best_distance_2 > limit_m * limit_m {
            return None;
        }
        // The iterator yields in ascending distance order, so ties with
        // the head are contiguous.
        for (candidate, distance_2) in candidates {
            if distance_2 > best_distance_2 {
                break;
            }
            if candidate.id < best.id {
                best = candidate;
            }
        }
        Some(NearestPoint {
            id: best.id.clone(),
            distance_m: best_distance_2.sqrt(),
        })
    }

    /// Ids of all points within `radius_m` metres of `position`.
    ///
    /// The boundary is inclusive: a point exactly `radius_m` away is
    /// returned. The result is ordered by id.
    #[must_use]
    pub fn within_radius(&self, position: Coord, radius_m: f64) -> BTreeSet<String> {
        if radius_m < 0.0 {
            return BTreeSet::new();
        }
        let envelope = AABB::from_corners(
            [position.x - radius_m, position.y - radius_m],
            [position.x + radius_m, position.y + radius_m],
        );
        let query = [position.x, position.y];
        let radius_2 = radius_m * radius_m;
        self.tree
            .locate_in_envelope_intersecting(&envelope)
            .filter(|point| point.distance_2(&query) <= radius_2)
            .map(|point| point.id.clone())
            .collect()
    }
}
