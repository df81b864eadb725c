//! Augmentation section.

use serde::{Deserialize, Serialize};

use super::defaults;

/// Random flip/rotation augmentation
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AugmentSection {
    /// Apply augmentation at all
    #[serde(default)]
    pub enabled: bool,

    /// Probability of each independent axis reflection (x and y)
    #[serde(default = "defaults::flip_probability")]
    pub flip_probability: f32,

    /// Rotation about +Z is drawn uniformly from [-max_rotation, max_rotation] (radians)
    #[serde(default = "defaults::max_rotation")]
    pub max_rotation: f32,
}

impl Default for AugmentSection {
    fn default() -> Self {
        Self {
            enabled: false,
            flip_probability: 0.5,
            max_rotation: defaults::max_rotation(),
        }
    }
}
