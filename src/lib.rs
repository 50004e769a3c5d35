//! # kdforest
//!
//! `kdforest` is a dynamic KD-tree spatial index over an external point
//! cloud. It supports incremental insertion, logical removal and exact
//! nearest-neighbor queries without rebuilding the whole index per
//! mutation, which suits robotics, graphics and point-cloud pipelines
//! where the point set grows and shrinks over time.
//!
//! ## How it works
//!
//! - **Binary-counter forest**: each insertion batch becomes one balanced
//!   static subtree; equal-capacity subtrees merge like binary-counter
//!   carries, so at most O(log n) subtrees are live and insertion is
//!   amortized O(log n) per point.
//! - **Lazy removal**: deleted points are tombstoned and skipped during
//!   traversal; a threshold-triggered compaction rebuilds the forest over
//!   the live set.
//! - **Branch-and-bound queries**: KNN and fixed-radius searches prune
//!   subtrees by bounding-box distance under a pluggable
//!   [`DistanceMetric`].
//!
//! ## Example
//!
//! ```
//! use kdforest::{DynamicKdForest, FlatPointCloud, KdForestParams, SquaredEuclidean};
//!
//! let mut cloud = FlatPointCloud::<3>::new();
//! for i in 0..100 {
//!     let v = i as f64 / 100.0;
//!     cloud.push([v, v * v, 1.0 - v]);
//! }
//!
//! let mut index = DynamicKdForest::new(&cloud, SquaredEuclidean, KdForestParams::default());
//! index.add_points(0, 99).unwrap();
//! index.remove_point(42);
//!
//! let nearest = index.find_knn(&[0.5, 0.25, 0.5], 5);
//! assert_eq!(nearest.len(), 5);
//! ```

mod bounds;
mod cloud;
mod forest;
mod metric;
mod query;
mod result;
mod subtree;

pub use bounds::BoundingBox;
pub use cloud::FlatPointCloud;
pub use cloud::PointCloud;
pub use forest::DynamicKdForest;
pub use forest::ForestError;
pub use forest::ForestStats;
pub use forest::KdForestParams;
pub use metric::DistanceMetric;
pub use metric::Manhattan;
pub use metric::SquaredEuclidean;
pub use result::KnnResultSet;
pub use result::Neighbor;
pub use result::RadiusResultSet;
pub use result::ResultSet;
