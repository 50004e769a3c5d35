use crate::bounds::BoundingBox;

/// Distance function used for both leaf scans and branch pruning.
///
/// [`box_distance`](Self::box_distance) must be a lower bound on
/// [`distance`](Self::distance) from `query` to *any* point inside the box.
/// Traversal prunes whole subtrees on that bound, so an overestimate would
/// silently drop valid results.
pub trait DistanceMetric<const D: usize> {
    /// Distance between two points, in the metric's own units.
    fn distance(&self, a: &[f64; D], b: &[f64; D]) -> f64;

    /// Lower bound on the distance from `query` to any point in `bounds`.
    fn box_distance(&self, query: &[f64; D], bounds: &BoundingBox<D>) -> f64;
}

/// Squared Euclidean (L2) distance. Skipping the square root keeps leaf
/// scans cheap; callers compare or `sqrt()` as needed.
#[derive(Clone, Copy, Debug, Default)]
pub struct SquaredEuclidean;

impl<const D: usize> DistanceMetric<D> for SquaredEuclidean {
    #[inline]
    fn distance(&self, a: &[f64; D], b: &[f64; D]) -> f64 {
        let mut sum = 0.0;
        for d in 0..D {
            let diff = a[d] - b[d];
            sum += diff * diff;
        }
        sum
    }

    #[inline]
    fn box_distance(&self, query: &[f64; D], bounds: &BoundingBox<D>) -> f64 {
        // Per-axis excess outside the box; zero if the query is inside.
        let mut sum = 0.0;
        for d in 0..D {
            let v = query[d];
            if v < bounds.min[d] {
                let diff = bounds.min[d] - v;
                sum += diff * diff;
            } else if v > bounds.max[d] {
                let diff = v - bounds.max[d];
                sum += diff * diff;
            }
        }
        sum
    }
}

/// Manhattan (L1) distance.
#[derive(Clone, Copy, Debug, Default)]
pub struct Manhattan;

impl<const D: usize> DistanceMetric<D> for Manhattan {
    #[inline]
    fn distance(&self, a: &[f64; D], b: &[f64; D]) -> f64 {
        let mut sum = 0.0;
        for d in 0..D {
            sum += (a[d] - b[d]).abs();
        }
        sum
    }

    #[inline]
    fn box_distance(&self, query: &[f64; D], bounds: &BoundingBox<D>) -> f64 {
        let mut sum = 0.0;
        for d in 0..D {
            let v = query[d];
            if v < bounds.min[d] {
                sum += bounds.min[d] - v;
            } else if v > bounds.max[d] {
                sum += v - bounds.max[d];
            }
        }
        sum
    }
}
