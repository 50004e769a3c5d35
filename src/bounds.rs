/// Axis-aligned bounding box for D-dimensional space.
#[derive(Clone, Copy, Debug)]
pub struct BoundingBox<const D: usize> {
    pub min: [f64; D],
    pub max: [f64; D],
}

impl<const D: usize> BoundingBox<D> {
    pub fn new(min: [f64; D], max: [f64; D]) -> Self {
        Self { min, max }
    }

    /// An inverted box that any point extends; the identity element of
    /// [`include`](Self::include).
    pub fn empty() -> Self {
        Self {
            min: [f64::INFINITY; D],
            max: [f64::NEG_INFINITY; D],
        }
    }

    /// Grow the box to cover `point`.
    pub fn include(&mut self, point: &[f64; D]) {
        for d in 0..D {
            if point[d] < self.min[d] {
                self.min[d] = point[d];
            }
            if point[d] > self.max[d] {
                self.max[d] = point[d];
            }
        }
    }

    /// The dimension with the largest extent.
    pub fn widest_dim(&self) -> usize {
        let mut dim = 0;
        let mut spread = self.max[0] - self.min[0];
        for d in 1..D {
            let s = self.max[d] - self.min[d];
            if s > spread {
                spread = s;
                dim = d;
            }
        }
        dim
    }
}
