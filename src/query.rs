//! Branch-and-bound traversal of one subtree into a shared result set.
//!
//! Stateless: each call is a pure function of the tree, the cloud, the
//! tombstone table and the query. The forest drives this over every live
//! subtree so the result set sees all candidates.

use crate::cloud::{PointCloud, point_of};
use crate::forest::PointState;
use crate::metric::DistanceMetric;
use crate::result::ResultSet;
use crate::subtree::Subtree;

pub(crate) fn search<C, M, R, const D: usize>(
    tree: &Subtree<D>,
    cloud: &C,
    metric: &M,
    states: &[PointState],
    query: &[f64; D],
    out: &mut R,
) where
    C: PointCloud,
    M: DistanceMetric<D>,
    R: ResultSet,
{
    search_node(tree, tree.root(), cloud, metric, states, query, out);
}

fn search_node<C, M, R, const D: usize>(
    tree: &Subtree<D>,
    id: u32,
    cloud: &C,
    metric: &M,
    states: &[PointState],
    query: &[f64; D],
    out: &mut R,
) where
    C: PointCloud,
    M: DistanceMetric<D>,
    R: ResultSet,
{
    let node = tree.node(id);

    if node.is_leaf() {
        for &index in tree.leaf_indices(node) {
            if states[index] != PointState::Live {
                continue;
            }
            let point = point_of::<C, D>(cloud, index);
            out.push(index, metric.distance(query, &point));
        }
        return;
    }

    // Visit the query's side of the split plane first so the bound
    // tightens before the far side is considered.
    let diff = query[node.split_dim as usize] - node.split_value;
    let (first, second) = if diff <= 0.0 {
        (node.left, node.right)
    } else {
        (node.right, node.left)
    };

    if metric.box_distance(query, &tree.node(first).bounds) <= out.worst_dist() {
        search_node(tree, first, cloud, metric, states, query, out);
    }
    if metric.box_distance(query, &tree.node(second).bounds) <= out.worst_dist() {
        search_node(tree, second, cloud, metric, states, query, out);
    }
}
