//! Point sampling and point feature sections.

use serde::{Deserialize, Serialize};

use super::defaults;

/// Point subsampling configuration section
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SamplingSection {
    /// Points per output bundle (N)
    #[serde(default = "defaults::num_points")]
    pub num_points: usize,

    /// Rejection-sampling attempts before giving up
    #[serde(default = "defaults::max_attempts")]
    pub max_attempts: usize,
}

impl Default for SamplingSection {
    fn default() -> Self {
        Self {
            num_points: 20_000,
            max_attempts: 1_000,
        }
    }
}

/// Extra per-point feature channels
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FeatureSection {
    /// Keep the three color channels following xyz
    #[serde(default)]
    pub use_color: bool,

    /// Append height above the estimated floor
    #[serde(default)]
    pub use_height: bool,

    /// Per-channel color mean subtracted before scaling
    #[serde(default = "defaults::color_mean")]
    pub color_mean: [f32; 3],

    /// Color divisor
    #[serde(default = "defaults::color_scale")]
    pub color_scale: f32,

    /// Floor height percentile of z, in percent
    #[serde(default = "defaults::floor_percentile")]
    pub floor_percentile: f32,
}

impl Default for FeatureSection {
    fn default() -> Self {
        Self {
            use_color: false,
            use_height: false,
            color_mean: defaults::color_mean(),
            color_scale: 256.0,
            floor_percentile: 0.99,
        }
    }
}

impl FeatureSection {
    /// Number of channels after xyz in the output point cloud
    pub fn extra_channels(&self) -> usize {
        let mut channels = 0;
        if self.use_color {
            channels += 3;
        }
        if self.use_height {
            channels += 1;
        }
        channels
    }
}
