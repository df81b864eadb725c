//! Main LabelConfig and validation.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{LabelError, Result};
use crate::geometry::PlaneFitConfig;

use super::augment::AugmentSection;
use super::boxes::BoxSection;
use super::classes::ClassTable;
use super::error::ConfigLoadError;
use super::sampling::{FeatureSection, SamplingSection};
use super::voxel::VoxelSection;

/// Full label synthesis configuration loaded from YAML
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct LabelConfig {
    /// Point subsampling
    #[serde(default)]
    pub sampling: SamplingSection,

    /// Extra point feature channels
    #[serde(default)]
    pub features: FeatureSection,

    /// Flip/rotation augmentation
    #[serde(default)]
    pub augment: AugmentSection,

    /// Box slots, heading bins, plane support
    #[serde(default)]
    pub boxes: BoxSection,

    /// Voxel grid and heatmap kernels
    #[serde(default)]
    pub voxel: VoxelSection,

    /// Supervised classes (ScanNet detection classes by default)
    #[serde(default)]
    pub classes: ClassTable,

    /// Face plane solver
    #[serde(default)]
    pub plane_fit: PlaneFitConfig,
}

impl LabelConfig {
    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> std::result::Result<Self, ConfigLoadError> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigLoadError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_yaml(&contents)
    }

    /// Load from default config path (configs/labels.yaml)
    pub fn load_default() -> std::result::Result<Self, ConfigLoadError> {
        let path = Path::new("configs/labels.yaml");
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse from YAML string
    pub fn from_yaml(yaml: &str) -> std::result::Result<Self, ConfigLoadError> {
        serde_yaml::from_str(yaml).map_err(|e| ConfigLoadError::Parse(e.to_string()))
    }

    /// Reject values the synthesizer cannot work with.
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| -> Result<()> { Err(LabelError::InvalidConfig(msg)) };

        if self.sampling.num_points == 0 {
            return invalid("sampling.num_points must be positive".into());
        }
        if self.sampling.max_attempts == 0 {
            return invalid("sampling.max_attempts must be positive".into());
        }
        if !(self.features.color_scale.is_finite() && self.features.color_scale != 0.0) {
            return invalid("features.color_scale must be finite and nonzero".into());
        }
        if !(0.0..=100.0).contains(&self.features.floor_percentile) {
            return invalid(format!(
                "features.floor_percentile {} outside [0, 100]",
                self.features.floor_percentile
            ));
        }
        if !(0.0..=1.0).contains(&self.augment.flip_probability) {
            return invalid(format!(
                "augment.flip_probability {} outside [0, 1]",
                self.augment.flip_probability
            ));
        }
        if !(self.augment.max_rotation >= 0.0 && self.augment.max_rotation.is_finite()) {
            return invalid("augment.max_rotation must be finite and non-negative".into());
        }
        if self.boxes.max_instances == 0 {
            return invalid("boxes.max_instances must be positive".into());
        }
        if self.boxes.num_heading_bins == 0 {
            return invalid("boxes.num_heading_bins must be positive".into());
        }

        let voxel = &self.voxel;
        if !(voxel.size > 0.0 && voxel.size.is_finite()) {
            return invalid("voxel.size must be positive".into());
        }
        if (0..3).any(|k| voxel.max[k] <= voxel.min[k]) {
            return invalid("voxel.max must exceed voxel.min on every axis".into());
        }
        if voxel.to_grid_spec().dims.contains(&0) {
            return invalid("voxel grid has an empty axis".into());
        }
        if !(voxel.center_sigma > 0.0 && voxel.corner_sigma > 0.0 && voxel.truncate > 0.0) {
            return invalid("voxel sigmas and truncate must be positive".into());
        }

        self.classes.validate().map_err(LabelError::InvalidConfig)
    }
}
