//! Dense 3D voxel grid.
//!
//! Cells are stored in C order (`[x][y][z]`, z fastest). A point belongs to
//! the voxel `floor((p - origin) / voxel_size)`; points outside the grid
//! extent are dropped, never clamped.

use crate::core::Point3;

/// Grid geometry: origin, voxel edge length, cell counts per axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridSpec {
    /// Lower corner of voxel (0, 0, 0)
    pub origin: Point3,
    /// Voxel edge length (meters)
    pub voxel_size: f32,
    /// Cells along x, y, z
    pub dims: [usize; 3],
}

impl GridSpec {
    /// Total number of cells
    #[inline]
    pub fn len(&self) -> usize {
        self.dims[0] * self.dims[1] * self.dims[2]
    }

    /// True when an axis has no cells
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Voxel containing `p`, or `None` if it lies outside the grid.
    pub fn voxel_of(&self, p: Point3) -> Option<[usize; 3]> {
        let rel = (p - self.origin).to_array();
        let mut index = [0usize; 3];
        for axis in 0..3 {
            let cell = (rel[axis] / self.voxel_size).floor();
            if !(cell >= 0.0 && cell < self.dims[axis] as f32) {
                return None;
            }
            index[axis] = cell as usize;
        }
        Some(index)
    }

    /// Flat C-order index of a voxel
    #[inline]
    pub fn flat_index(&self, index: [usize; 3]) -> usize {
        (index[0] * self.dims[1] + index[1]) * self.dims[2] + index[2]
    }

    /// World position of a voxel center
    pub fn voxel_center(&self, index: [usize; 3]) -> Point3 {
        let half = self.voxel_size / 2.0;
        Point3::new(
            self.origin.x + index[0] as f32 * self.voxel_size + half,
            self.origin.y + index[1] as f32 * self.voxel_size + half,
            self.origin.z + index[2] as f32 * self.voxel_size + half,
        )
    }
}

/// Dense f32 volume over a [`GridSpec`].
#[derive(Clone, Debug, PartialEq)]
pub struct VoxelGrid {
    spec: GridSpec,
    data: Vec<f32>,
}

impl VoxelGrid {
    /// Zero-filled grid
    pub fn new(spec: GridSpec) -> Self {
        Self {
            spec,
            data: vec![0.0; spec.len()],
        }
    }

    /// Grid geometry
    pub fn spec(&self) -> &GridSpec {
        &self.spec
    }

    /// Cells along x, y, z
    pub fn dims(&self) -> [usize; 3] {
        self.spec.dims
    }

    /// Flat C-order cell values
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Value of one cell
    #[inline]
    pub fn get(&self, index: [usize; 3]) -> f32 {
        self.data[self.spec.flat_index(index)]
    }

    /// Number of nonzero cells
    pub fn count_nonzero(&self) -> usize {
        self.data.iter().filter(|&&v| v != 0.0).count()
    }

    /// Sum of all cells
    pub fn sum(&self) -> f64 {
        self.data.iter().map(|&v| v as f64).sum()
    }

    /// Binary occupancy of `points`: 1 for every voxel holding at least one point.
    pub fn occupancy(spec: GridSpec, points: impl IntoIterator<Item = Point3>) -> Self {
        let mut grid = Self::new(spec);
        for p in points {
            if let Some(index) = spec.voxel_of(p) {
                let flat = spec.flat_index(index);
                grid.data[flat] = 1.0;
            }
        }
        grid
    }

    /// Add `kernel` centered on the voxel containing `seed`.
    ///
    /// Seeds outside the grid are dropped; kernel cells falling outside are
    /// clipped. Returns whether the seed landed in the grid.
    pub fn splat(&mut self, seed: Point3, kernel: &GaussianKernel) -> bool {
        let Some(center) = self.spec.voxel_of(seed) else {
            return false;
        };

        let r = kernel.radius as isize;
        let side = kernel.side();
        for dx in -r..=r {
            let Some(x) = offset(center[0], dx, self.spec.dims[0]) else {
                continue;
            };
            for dy in -r..=r {
                let Some(y) = offset(center[1], dy, self.spec.dims[1]) else {
                    continue;
                };
                for dz in -r..=r {
                    let Some(z) = offset(center[2], dz, self.spec.dims[2]) else {
                        continue;
                    };
                    let k = (((dx + r) as usize * side) + (dy + r) as usize) * side + (dz + r) as usize;
                    let flat = self.spec.flat_index([x, y, z]);
                    self.data[flat] += kernel.weights[k];
                }
            }
        }
        true
    }
}

#[inline]
fn offset(base: usize, delta: isize, len: usize) -> Option<usize> {
    let v = base as isize + delta;
    (v >= 0 && (v as usize) < len).then_some(v as usize)
}

/// Isotropic Gaussian `exp(-d² / 2σ²)` sampled on voxel offsets, peak 1.
///
/// Support is the cube of half-width `ceil(truncate · σ)` voxels.
#[derive(Clone, Debug, PartialEq)]
pub struct GaussianKernel {
    radius: usize,
    weights: Vec<f32>,
}

impl GaussianKernel {
    /// Build a kernel with `sigma` and support in voxel units.
    pub fn new(sigma: f32, truncate: f32) -> Self {
        let radius = (truncate * sigma).ceil().max(0.0) as usize;
        let side = 2 * radius + 1;
        let r = radius as isize;
        let denom = 2.0 * (sigma as f64) * (sigma as f64);

        let mut weights = Vec::with_capacity(side * side * side);
        for dx in -r..=r {
            for dy in -r..=r {
                for dz in -r..=r {
                    let d2 = (dx * dx + dy * dy + dz * dz) as f64;
                    weights.push((-d2 / denom).exp() as f32);
                }
            }
        }
        Self { radius, weights }
    }

    /// Half-width in voxels
    pub fn radius(&self) -> usize {
        self.radius
    }

    /// Cells per axis
    #[inline]
    fn side(&self) -> usize {
        2 * self.radius + 1
    }
}
