//! Configuration loading for label synthesis.
//!
//! Loads all configuration from a single YAML file. Every field has a
//! default, so a partial file (or none at all) is valid.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use scene_labels::config::LabelConfig;
//!
//! // Load from default path (configs/labels.yaml), or built-in defaults
//! let config = LabelConfig::load_default()?;
//! config.validate()?;
//! ```
//!
//! ## Configuration Sections
//!
//! | Section | Description |
//! |---------|-------------|
//! | [`SamplingSection`] | Target point count, rejection-sampling budget |
//! | [`FeatureSection`] | Color and height channels |
//! | [`AugmentSection`] | Axis flips, rotation range |
//! | [`BoxSection`] | Box mode, instance cap, heading bins, plane support |
//! | [`VoxelSection`] | Grid bounds, voxel size, Gaussian kernels |
//! | [`ClassTable`] | Supervised classes and mean sizes |
//! | [`PlaneFitConfig`](crate::geometry::PlaneFitConfig) | Face plane solver |
//!
//! ## Example YAML
//!
//! ```yaml
//! sampling:
//!   num_points: 40000
//! features:
//!   use_height: true
//! augment:
//!   enabled: true
//!   max_rotation: 0.0873   # ±5°
//! boxes:
//!   mode: oriented
//!   num_heading_bins: 12
//! voxel:
//!   size: 0.06
//!   center_sigma: 2.0      # voxels
//! ```
//!
//! Per-class mean sizes can be re-estimated from a dataset with
//! [`MeanSizeAccumulator`].

mod augment;
mod boxes;
mod classes;
pub(crate) mod defaults;
mod error;
mod labels;
mod mean_size;
mod sampling;
mod voxel;

// Re-export main types
pub use error::ConfigLoadError;
pub use labels::LabelConfig;

// Re-export section types
pub use augment::AugmentSection;
pub use boxes::{BoxMode, BoxSection};
pub use classes::{ClassEntry, ClassTable};
pub use mean_size::MeanSizeAccumulator;
pub use sampling::{FeatureSection, SamplingSection};
pub use voxel::VoxelSection;
