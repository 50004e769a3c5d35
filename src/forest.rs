use std::collections::HashMap;

use thiserror::Error;
use tracing::debug;

use crate::cloud::PointCloud;
use crate::metric::DistanceMetric;
use crate::query;
use crate::result::{KnnResultSet, Neighbor, RadiusResultSet, ResultSet};
use crate::subtree::Subtree;

/// Errors reported by forest mutation. Construction and insertion abort
/// without mutating state; queries on an empty forest are not errors.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum ForestError {
    #[error("empty insertion range: first index {first} is past last index {last}")]
    EmptyRange { first: usize, last: usize },
    #[error("insertion range ends at {last} but the cloud holds {size} points")]
    RangeOutOfBounds { last: usize, size: usize },
    #[error("point index {index} is already part of the forest")]
    AlreadyInserted { index: usize },
}

/// Tuning knobs, fixed at construction.
#[derive(Clone, Copy, Debug)]
pub struct KdForestParams {
    /// Maximum number of points a leaf may hold before it is split.
    pub max_leaf_size: usize,
    /// Fraction of tombstoned points (removed / total) that triggers a
    /// full compaction. Must be in (0, 1].
    pub removal_threshold: f64,
}

impl Default for KdForestParams {
    fn default() -> Self {
        Self {
            max_leaf_size: 10,
            removal_threshold: 0.5,
        }
    }
}

/// Lifecycle of one point index within the forest.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum PointState {
    /// Never inserted, or reclaimed by compaction.
    Absent,
    Live,
    /// Tombstoned: still present in subtree structures, excluded from
    /// every query until compaction drops it.
    Removed,
}

/// Point/subtree counters, the resource-accounting view a host process can
/// poll for diagnostics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ForestStats {
    pub subtrees: usize,
    pub total_points: usize,
    pub live_points: usize,
    pub removed_points: usize,
    /// Approximate heap usage of nodes, permutations and the state table.
    pub heap_bytes: usize,
}

/// Dynamic KD-tree forest over an external point cloud.
///
/// A static KD-tree is build-once query-many; this makes it dynamic with
/// the logarithmic (binary-counter) method. Each insertion batch becomes
/// one balanced subtree whose capacity is a power of two, and whenever two
/// subtrees collide on capacity they are rebuilt into a single subtree of
/// double capacity. The collision chain mirrors a binary-counter carry, so
/// at most ⌈log2(n)⌉ + 1 subtrees are ever live and insertion cost is
/// amortized O(log n) per point.
///
/// Removal tombstones an index; traversals skip tombstones and a full
/// rebuild over the live set reclaims them once the removed fraction
/// reaches [`KdForestParams::removal_threshold`].
///
/// Coordinates are borrowed from the cloud, never copied; only index
/// permutations are stored. The cloud must stay index-stable for the
/// forest's lifetime. Single-threaded: callers serialize mutation against
/// queries.
pub struct DynamicKdForest<'a, C, M, const D: usize>
where
    C: PointCloud,
    M: DistanceMetric<D>,
{
    cloud: &'a C,
    metric: M,
    params: KdForestParams,
    trees: Vec<Subtree<D>>,
    /// Indexed by point index; grows with insertion, doubles as the
    /// tombstone bitset consulted during leaf scans.
    states: Vec<PointState>,
    live: usize,
    removed: usize,
}

impl<'a, C, M, const D: usize> DynamicKdForest<'a, C, M, D>
where
    C: PointCloud,
    M: DistanceMetric<D>,
{
    /// An empty forest bound to `cloud`. Points become visible only through
    /// [`add_points`](Self::add_points).
    pub fn new(cloud: &'a C, metric: M, params: KdForestParams) -> Self {
        Self {
            cloud,
            metric,
            params: KdForestParams {
                max_leaf_size: params.max_leaf_size.max(1),
                removal_threshold: params.removal_threshold.clamp(f64::MIN_POSITIVE, 1.0),
            },
            trees: Vec::new(),
            states: Vec::new(),
            live: 0,
            removed: 0,
        }
    }

    /// Incorporate the inclusive index range `[first, last]` of newly
    /// available cloud points.
    ///
    /// The whole range is validated up front; on error nothing is
    /// committed. Builds one subtree over the batch, then carry-merges
    /// until all subtree capacities are distinct.
    pub fn add_points(&mut self, first: usize, last: usize) -> Result<(), ForestError> {
        if first > last {
            return Err(ForestError::EmptyRange { first, last });
        }
        if last >= self.cloud.size() {
            return Err(ForestError::RangeOutOfBounds {
                last,
                size: self.cloud.size(),
            });
        }
        for index in first..=last {
            if self.states.get(index).is_some_and(|s| *s != PointState::Absent) {
                return Err(ForestError::AlreadyInserted { index });
            }
        }

        let indices: Vec<usize> = (first..=last).collect();
        let count = indices.len();
        let capacity = count.next_power_of_two();
        let tree = Subtree::build(self.cloud, indices, capacity, self.params.max_leaf_size);
        self.trees.push(tree);

        if self.states.len() <= last {
            self.states.resize(last + 1, PointState::Absent);
        }
        for state in &mut self.states[first..=last] {
            *state = PointState::Live;
        }
        self.live += count;

        self.carry_merge();
        Ok(())
    }

    /// Logically delete one point. Returns `true` if a live point was
    /// tombstoned; removing an unknown or already-removed index is an
    /// idempotent no-op returning `false`.
    ///
    /// May trigger a compaction, the only call whose latency is
    /// proportional to the live point count.
    pub fn remove_point(&mut self, index: usize) -> bool {
        match self.states.get(index) {
            Some(PointState::Live) => {}
            _ => return false,
        }
        self.states[index] = PointState::Removed;
        self.live -= 1;
        self.removed += 1;

        let total = self.live + self.removed;
        if total > 0 && self.removed as f64 / total as f64 >= self.params.removal_threshold {
            self.compact();
        }
        true
    }

    /// Rebuild the forest over exactly the live points, dropping every
    /// tombstone. Runs automatically at the removal threshold; exposed so
    /// callers can also reclaim space at a moment of their choosing.
    pub fn compact(&mut self) {
        let alive: Vec<usize> = self
            .states
            .iter()
            .enumerate()
            .filter(|(_, s)| **s == PointState::Live)
            .map(|(i, _)| i)
            .collect();

        debug!(
            live = alive.len(),
            dropped = self.removed,
            subtrees = self.trees.len(),
            "compacting forest"
        );

        self.trees.clear();
        for state in &mut self.states {
            if *state == PointState::Removed {
                *state = PointState::Absent;
            }
        }
        self.removed = 0;

        // Minimal subtree set: one tree of capacity 2^b per set bit of the
        // live count, largest chunk first.
        let n = alive.len();
        let mut offset = 0;
        for bit in (0..usize::BITS).rev() {
            let size = 1usize << bit;
            if n & size != 0 {
                let chunk = alive[offset..offset + size].to_vec();
                self.trees
                    .push(Subtree::build(self.cloud, chunk, size, self.params.max_leaf_size));
                offset += size;
            }
        }
    }

    /// Collapse capacity collisions: rebuild any two equal-capacity
    /// subtrees into one of double capacity, repeating until capacities
    /// are unique.
    fn carry_merge(&mut self) {
        loop {
            let mut by_capacity: HashMap<usize, usize> = HashMap::new();
            let mut collision = None;
            for (pos, tree) in self.trees.iter().enumerate() {
                if let Some(&prev) = by_capacity.get(&tree.capacity()) {
                    collision = Some((prev, pos));
                    break;
                }
                let _ = by_capacity.insert(tree.capacity(), pos);
            }
            let Some((a, b)) = collision else { break };

            // b > a, so removing b first leaves a in place.
            let second = self.trees.swap_remove(b);
            let first = self.trees.swap_remove(a);
            let capacity = first.capacity() * 2;
            debug!(
                capacity,
                points = first.len() + second.len(),
                "carry-merging equal-capacity subtrees"
            );

            let mut indices = first.into_indices();
            indices.extend(second.into_indices());
            self.trees
                .push(Subtree::build(self.cloud, indices, capacity, self.params.max_leaf_size));
        }
    }

    /// Exact k nearest live points, ascending by distance. Returns fewer
    /// than `k` entries when fewer live points exist; an empty forest or
    /// `k == 0` yields an empty vec.
    pub fn find_knn(&self, query: &[f64; D], k: usize) -> Vec<Neighbor> {
        let mut results = KnnResultSet::new(k);
        if k > 0 {
            self.find_into(query, &mut results);
        }
        results.into_sorted_vec()
    }

    /// All live points with distance ≤ `radius`, in the metric's units
    /// (squared units for [`SquaredEuclidean`](crate::SquaredEuclidean)).
    /// The returned set is unordered; see [`RadiusResultSet::worst_item`].
    pub fn find_radius(&self, query: &[f64; D], radius: f64) -> RadiusResultSet {
        let mut results = RadiusResultSet::new(radius);
        self.find_into(query, &mut results);
        results
    }

    /// Drive a traversal over every live subtree into a caller-supplied
    /// result set.
    pub fn find_into<R: ResultSet>(&self, query: &[f64; D], out: &mut R) {
        for tree in &self.trees {
            query::search(tree, self.cloud, &self.metric, &self.states, query, out);
        }
    }

    /// Number of live (queryable) points.
    pub fn live_points(&self) -> usize {
        self.live
    }

    /// Number of points physically present in subtrees, tombstoned or not.
    pub fn total_points(&self) -> usize {
        self.live + self.removed
    }

    /// Number of live subtrees; bounded by ⌈log2(total)⌉ + 1.
    pub fn subtree_count(&self) -> usize {
        self.trees.len()
    }

    /// Counters and approximate heap usage for host-side diagnostics.
    pub fn stats(&self) -> ForestStats {
        let tree_bytes: usize = self.trees.iter().map(Subtree::heap_bytes).sum();
        ForestStats {
            subtrees: self.trees.len(),
            total_points: self.total_points(),
            live_points: self.live,
            removed_points: self.removed,
            heap_bytes: tree_bytes
                + self.states.capacity() * std::mem::size_of::<PointState>(),
        }
    }
}
