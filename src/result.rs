use std::collections::BinaryHeap;

/// One query result: a point index and its distance to the query, in the
/// units of the metric that produced it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Neighbor {
    pub index: usize,
    pub dist: f64,
}

impl Eq for Neighbor {}

impl Ord for Neighbor {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // Distance ties fall back to index so the order is total.
        self.dist
            .partial_cmp(&other.dist)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(self.index.cmp(&other.index))
    }
}

impl PartialOrd for Neighbor {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// Sink for candidate points found during traversal.
///
/// `worst_dist` doubles as the pruning bound: subtrees whose box distance
/// exceeds it are skipped entirely.
pub trait ResultSet {
    /// Offer a candidate; the set decides whether to keep it.
    fn push(&mut self, index: usize, dist: f64);

    /// Largest distance the set still accepts.
    fn worst_dist(&self) -> f64;
}

/// Bounded max-heap holding the k nearest candidates seen so far.
///
/// While the heap is not yet full every candidate is accepted and the
/// pruning bound stays infinite; once full, the k-th smallest distance
/// shrinks the bound monotonically.
#[derive(Debug)]
pub struct KnnResultSet {
    capacity: usize,
    heap: BinaryHeap<Neighbor>,
}

impl KnnResultSet {
    pub fn new(k: usize) -> Self {
        Self {
            capacity: k,
            heap: BinaryHeap::with_capacity(k),
        }
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.heap.len() >= self.capacity
    }

    /// Consume the heap into a vec sorted ascending by distance.
    pub fn into_sorted_vec(self) -> Vec<Neighbor> {
        self.heap.into_sorted_vec()
    }
}

impl ResultSet for KnnResultSet {
    fn push(&mut self, index: usize, dist: f64) {
        if self.capacity == 0 {
            return;
        }
        if self.heap.len() < self.capacity {
            self.heap.push(Neighbor { index, dist });
        } else if let Some(worst) = self.heap.peek() {
            if dist < worst.dist {
                let _ = self.heap.pop();
                self.heap.push(Neighbor { index, dist });
            }
        }
    }

    fn worst_dist(&self) -> f64 {
        if self.is_full() {
            self.heap.peek().map_or(f64::INFINITY, |n| n.dist)
        } else {
            f64::INFINITY
        }
    }
}

/// Unsorted accumulator of every point within a fixed radius.
///
/// Radius queries have no fixed cardinality, so no heap is maintained;
/// [`worst_item`](Self::worst_item) is an on-demand linear scan instead.
#[derive(Debug)]
pub struct RadiusResultSet {
    radius: f64,
    items: Vec<Neighbor>,
}

impl RadiusResultSet {
    pub fn new(radius: f64) -> Self {
        Self {
            radius,
            items: Vec::new(),
        }
    }

    /// The query radius this set was built with, in metric units.
    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Accumulated results, in traversal order.
    pub fn items(&self) -> &[Neighbor] {
        &self.items
    }

    /// The farthest accumulated result, if any.
    pub fn worst_item(&self) -> Option<Neighbor> {
        self.items.iter().copied().max()
    }

    pub fn into_vec(self) -> Vec<Neighbor> {
        self.items
    }

    /// Consume into a vec sorted ascending by distance.
    pub fn into_sorted_vec(self) -> Vec<Neighbor> {
        let mut items = self.items;
        items.sort_unstable();
        items
    }
}

impl ResultSet for RadiusResultSet {
    fn push(&mut self, index: usize, dist: f64) {
        if dist <= self.radius {
            self.items.push(Neighbor { index, dist });
        }
    }

    fn worst_dist(&self) -> f64 {
        // Fixed bound: the radius never shrinks as results accumulate.
        self.radius
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_knn_keeps_k_smallest() {
        let mut set = KnnResultSet::new(3);
        for (i, d) in [5.0, 1.0, 4.0, 2.0, 3.0].iter().enumerate() {
            set.push(i, *d);
        }
        let out = set.into_sorted_vec();
        assert_eq!(out.len(), 3);
        assert_eq!(out[0].dist, 1.0);
        assert_eq!(out[1].dist, 2.0);
        assert_eq!(out[2].dist, 3.0);
    }

    #[test]
    fn test_knn_bound_tightens_when_full() {
        let mut set = KnnResultSet::new(2);
        assert_eq!(set.worst_dist(), f64::INFINITY);
        set.push(0, 3.0);
        assert_eq!(set.worst_dist(), f64::INFINITY);
        set.push(1, 1.0);
        assert_eq!(set.worst_dist(), 3.0);
        set.push(2, 2.0);
        assert_eq!(set.worst_dist(), 2.0);
    }

    #[test]
    fn test_knn_zero_capacity_accepts_nothing() {
        let mut set = KnnResultSet::new(0);
        set.push(0, 1.0);
        assert!(set.into_sorted_vec().is_empty());
    }

    #[test]
    fn test_radius_rejects_beyond_bound() {
        let mut set = RadiusResultSet::new(2.0);
        set.push(0, 1.5);
        set.push(1, 2.0); // inclusive
        set.push(2, 2.1);
        assert_eq!(set.len(), 2);
        assert_eq!(set.worst_item().unwrap().index, 1);
    }

    #[test]
    fn test_radius_empty_has_no_worst() {
        let set = RadiusResultSet::new(1.0);
        assert!(set.worst_item().is_none());
    }
}
