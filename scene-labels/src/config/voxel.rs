//! Voxel grid section.

use serde::{Deserialize, Serialize};

use crate::core::Point3;
use crate::voxel::GridSpec;

use super::defaults;

/// Voxel grid configuration section
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VoxelSection {
    /// Voxel edge length (meters)
    #[serde(default = "defaults::voxel_size")]
    pub size: f32,

    /// Lower grid corner (meters)
    #[serde(default = "defaults::voxel_min")]
    pub min: [f32; 3],

    /// Upper grid corner (meters)
    #[serde(default = "defaults::voxel_max")]
    pub max: [f32; 3],

    /// Gaussian standard deviation for center seeds (voxels)
    #[serde(default = "defaults::center_sigma")]
    pub center_sigma: f32,

    /// Gaussian standard deviation for corner seeds (voxels)
    #[serde(default = "defaults::corner_sigma")]
    pub corner_sigma: f32,

    /// Kernel support radius in standard deviations
    #[serde(default = "defaults::truncate")]
    pub truncate: f32,
}

impl Default for VoxelSection {
    fn default() -> Self {
        Self {
            size: 0.06,
            min: defaults::voxel_min(),
            max: defaults::voxel_max(),
            center_sigma: 2.0,
            corner_sigma: 1.0,
            truncate: 4.0,
        }
    }
}

impl VoxelSection {
    /// Convert to a GridSpec
    pub fn to_grid_spec(&self) -> GridSpec {
        let min = Point3::from_array(self.min);
        let extent = Point3::from_array(self.max) - min;
        let cells = |len: f32| ((len / self.size).round().max(0.0)) as usize;

        GridSpec {
            origin: min,
            voxel_size: self.size,
            dims: [cells(extent.x), cells(extent.y), cells(extent.z)],
        }
    }
}
