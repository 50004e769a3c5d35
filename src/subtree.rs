use crate::bounds::BoundingBox;
use crate::cloud::{PointCloud, point_of};

/// Sentinel child id marking a leaf node.
pub(crate) const NO_CHILD: u32 = u32::MAX;

#[derive(Clone, Copy, Debug)]
pub(crate) struct Node<const D: usize> {
    pub bounds: BoundingBox<D>,
    pub left: u32, // NO_CHILD if leaf
    pub right: u32,
    // Leaf data: indices[start..end]
    pub start: u32,
    pub end: u32,
    // Internal node data
    pub split_value: f64,
    pub split_dim: u8,
}

impl<const D: usize> Node<D> {
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.left == NO_CHILD
    }
}

/// One static balanced KD-tree over a private permutation of point indices.
///
/// Nodes live in a flat arena and reference ranges of `indices`; the root is
/// the last node pushed by the recursive build. `capacity` is the forest's
/// binary-counter slot for this tree (a power of two), not the point count.
pub(crate) struct Subtree<const D: usize> {
    nodes: Vec<Node<D>>,
    indices: Vec<usize>,
    capacity: usize,
}

impl<const D: usize> Subtree<D> {
    /// Build a balanced tree over `indices` by recursive median splits on
    /// the widest dimension.
    ///
    /// Precondition: `indices` is non-empty and `max_leaf >= 1`; the public
    /// forest API validates ranges before calling in here.
    pub fn build<C: PointCloud>(
        cloud: &C,
        indices: Vec<usize>,
        capacity: usize,
        max_leaf: usize,
    ) -> Self {
        debug_assert!(!indices.is_empty(), "subtree build over empty index set");
        debug_assert!(max_leaf >= 1, "leaf size must be at least 1");

        let count = indices.len();
        let mut tree = Subtree {
            nodes: Vec::with_capacity(2 * count / max_leaf + 1),
            indices,
            capacity,
        };
        tree.build_recursive(0, count, cloud, max_leaf);
        tree
    }

    fn build_recursive<C: PointCloud>(
        &mut self,
        start: usize,
        end: usize,
        cloud: &C,
        max_leaf: usize,
    ) -> u32 {
        let count = end - start;

        let mut bounds = BoundingBox::empty();
        for i in start..end {
            bounds.include(&point_of::<C, D>(cloud, self.indices[i]));
        }

        if count <= max_leaf {
            let node_id = self.nodes.len() as u32;
            self.nodes.push(Node {
                bounds,
                left: NO_CHILD,
                right: NO_CHILD,
                start: start as u32,
                end: end as u32,
                split_value: 0.0,
                split_dim: 0,
            });
            return node_id;
        }

        let dim = bounds.widest_dim();

        // Median split; coordinate ties fall back to index order so the
        // partition is deterministic regardless of the incoming permutation.
        let mid = count / 2;
        let _ = self.indices[start..end].select_nth_unstable_by(mid, |&a, &b| {
            let va = cloud.coord(a, dim);
            let vb = cloud.coord(b, dim);
            va.partial_cmp(&vb)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.cmp(&b))
        });
        let split_value = cloud.coord(self.indices[start + mid], dim);

        let left = self.build_recursive(start, start + mid, cloud, max_leaf);
        let right = self.build_recursive(start + mid, end, cloud, max_leaf);

        let node_id = self.nodes.len() as u32;
        self.nodes.push(Node {
            bounds,
            left,
            right,
            start: 0,
            end: 0,
            split_value,
            split_dim: dim as u8,
        });
        node_id
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of points assigned to this tree (live or tombstoned).
    #[inline]
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    #[inline]
    pub fn root(&self) -> u32 {
        (self.nodes.len() - 1) as u32
    }

    #[inline]
    pub fn node(&self, id: u32) -> &Node<D> {
        &self.nodes[id as usize]
    }

    /// The point indices held by a leaf node.
    #[inline]
    pub fn leaf_indices(&self, node: &Node<D>) -> &[usize] {
        &self.indices[node.start as usize..node.end as usize]
    }

    /// Reclaim the permutation for a carry-merge rebuild.
    pub fn into_indices(self) -> Vec<usize> {
        self.indices
    }

    /// Approximate heap usage in bytes.
    pub fn heap_bytes(&self) -> usize {
        self.nodes.capacity() * std::mem::size_of::<Node<D>>()
            + self.indices.capacity() * std::mem::size_of::<usize>()
    }
}
