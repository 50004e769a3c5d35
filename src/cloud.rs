/// Read-only accessor over an external point set.
///
/// The index stores point *indices* only; coordinates are fetched through
/// this trait on demand. The backing storage must stay valid and
/// index-stable for the lifetime of any forest built over it: indices must
/// not be reused and points must not move.
pub trait PointCloud {
    /// Number of points currently available in the cloud.
    fn size(&self) -> usize;

    /// Coordinate of point `index` along dimension `dim`.
    fn coord(&self, index: usize, dim: usize) -> f64;
}

/// Gather the coordinates of one point into a stack array.
#[inline]
pub(crate) fn point_of<C: PointCloud, const D: usize>(cloud: &C, index: usize) -> [f64; D] {
    std::array::from_fn(|d| cloud.coord(index, d))
}

/// A point cloud backed by a flat interleaved coordinate buffer
/// (`[x0, y0, z0, x1, y1, z1, ...]` for D = 3).
#[derive(Clone, Debug, Default)]
pub struct FlatPointCloud<const D: usize> {
    coords: Vec<f64>,
}

impl<const D: usize> FlatPointCloud<D> {
    pub fn new() -> Self {
        Self { coords: Vec::new() }
    }

    pub fn with_capacity(points: usize) -> Self {
        Self {
            coords: Vec::with_capacity(points * D),
        }
    }

    /// Append one point, returning its index.
    pub fn push(&mut self, point: [f64; D]) -> usize {
        let index = self.coords.len() / D;
        self.coords.extend_from_slice(&point);
        index
    }

    pub fn point(&self, index: usize) -> [f64; D] {
        std::array::from_fn(|d| self.coords[index * D + d])
    }
}

impl<const D: usize> PointCloud for FlatPointCloud<D> {
    fn size(&self) -> usize {
        self.coords.len() / D
    }

    #[inline]
    fn coord(&self, index: usize, dim: usize) -> f64 {
        self.coords[index * D + dim]
    }
}
