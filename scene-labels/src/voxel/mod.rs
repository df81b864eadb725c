//! Voxelizer: occupancy grid and Gaussian center/corner heatmaps.
//!
//! All three volumes share one [`GridSpec`]. Heatmaps accumulate by
//! summation, and seeds are visited in instance order and fixed corner order,
//! so identical inputs give bit-identical grids.
//!
//! Corner seeds are deduplicated by exact coordinates before splatting
//! (adjacent boxes frequently share corners).

mod grid;

pub use grid::{GaussianKernel, GridSpec, VoxelGrid};

use std::collections::HashSet;

use log::debug;

use crate::config::VoxelSection;
use crate::core::Point3;
use crate::geometry::OrientedBox;

/// The three voxel outputs of one scene.
#[derive(Clone, Debug, PartialEq)]
pub struct VoxelLabels {
    /// 1 where at least one point falls
    pub occupancy: VoxelGrid,
    /// Gaussian density seeded at box centers
    pub center_heat: VoxelGrid,
    /// Gaussian density seeded at distinct box corners
    pub corner_heat: VoxelGrid,
}

impl VoxelLabels {
    /// Voxelize `points` and splat the centers and corners of `boxes`.
    pub fn build(
        section: &VoxelSection,
        points: impl IntoIterator<Item = Point3>,
        boxes: &[OrientedBox],
    ) -> Self {
        let spec = section.to_grid_spec();
        let occupancy = VoxelGrid::occupancy(spec, points);

        let center_kernel = GaussianKernel::new(section.center_sigma, section.truncate);
        let mut center_heat = VoxelGrid::new(spec);
        let mut centers_in_grid = 0;
        for bx in boxes {
            if center_heat.splat(bx.center, &center_kernel) {
                centers_in_grid += 1;
            }
        }

        let corner_kernel = GaussianKernel::new(section.corner_sigma, section.truncate);
        let mut corner_heat = VoxelGrid::new(spec);
        let corners = distinct_corners(boxes);
        let mut corners_in_grid = 0;
        for &corner in &corners {
            if corner_heat.splat(corner, &corner_kernel) {
                corners_in_grid += 1;
            }
        }

        debug!(
            "[Voxel] {} occupied cells, {}/{} centers and {}/{} corners inside grid",
            occupancy.count_nonzero(),
            centers_in_grid,
            boxes.len(),
            corners_in_grid,
            corners.len()
        );

        Self {
            occupancy,
            center_heat,
            corner_heat,
        }
    }

    /// Grid geometry shared by all three volumes
    pub fn spec(&self) -> &GridSpec {
        self.occupancy.spec()
    }
}

/// Corners of all boxes in first-seen order with exact duplicates removed.
pub fn distinct_corners(boxes: &[OrientedBox]) -> Vec<Point3> {
    let mut seen = HashSet::new();
    let mut corners = Vec::with_capacity(boxes.len() * 8);
    for bx in boxes {
        for corner in bx.corners() {
            // +0.0 folds -0.0 into 0.0
            let key = (corner + Point3::ZERO).to_array().map(f32::to_bits);
            if seen.insert(key) {
                corners.push(corner);
            }
        }
    }
    corners
}
