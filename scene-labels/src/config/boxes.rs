//! Box label section.

use serde::{Deserialize, Serialize};

use super::defaults;

/// How box headings are treated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoxMode {
    /// Boxes carry a heading; rotation augmentation adds to it
    Oriented,
    /// Headings are forced to zero; rotation re-fits axis-aligned extents
    #[default]
    AxisAligned,
}

/// Box and plane label section
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BoxSection {
    /// Heading treatment
    #[serde(default)]
    pub mode: BoxMode,

    /// Box slots per bundle (K)
    #[serde(default = "defaults::max_instances")]
    pub max_instances: usize,

    /// Heading sectors over (-π, π]
    #[serde(default = "defaults::num_heading_bins")]
    pub num_heading_bins: usize,

    /// Minimum points for a plane patch to receive plane labels
    #[serde(default = "defaults::min_plane_points")]
    pub min_plane_points: usize,
}

impl Default for BoxSection {
    fn default() -> Self {
        Self {
            mode: BoxMode::AxisAligned,
            max_instances: 64,
            num_heading_bins: 1,
            min_plane_points: 10,
        }
    }
}
