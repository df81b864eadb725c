//! # scene-labels
//!
//! Dense training-label synthesis for 3D box detection on scanned indoor
//! scenes.
//!
//! ## Overview
//!
//! Given one annotated scene (points with per-point instance, semantic and
//! plane-patch ids plus per-point object metadata), produce one fixed-shape
//! [`LabelBundle`]:
//!
//! - **Votes**: per-point displacement to the object center and to the
//!   nearest oriented-box corner
//! - **Boxes**: per-slot center, discretized heading and size
//! - **Face planes**: six plane equations per object, broadcast to the points
//!   of each supported plane patch
//! - **Voxels**: occupancy plus Gaussian heatmaps of box centers and corners
//!
//! ## Pipeline
//!
//! ```text
//! Scene ─► subsample (keeps every instance id)
//!       ─► resolve instances + plane groups
//!       ─► point features (color, height)
//!       ─► augment (flip x, flip y, rotate z)
//!       ─► votes + face planes ─► voxel heatmaps ─► box slots ─► LabelBundle
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use scene_labels::{LabelConfig, LabelSynthesizer};
//!
//! let synthesizer = LabelSynthesizer::new(LabelConfig::load_default()?)?;
//!
//! // Same scene and seed always give the same bundle
//! let bundle = synthesizer.synthesize(&scene, 42)?;
//! println!("{} boxes, {} dropped", bundle.boxes.count(), bundle.dropped_instances);
//!
//! // Many scenes in parallel, seed = base_seed + index
//! let bundles = synthesizer.synthesize_batch(&scenes, 1000);
//! ```
//!
//! ## Coordinate System
//!
//! - Z: Up
//! - Heading: rotation about +Z in radians, CCW positive from +X, in (-π, π]

#![warn(missing_docs)]

// Core types
pub mod core;

// Error types
pub mod error;

// Unified configuration
pub mod config;

// Boxes, planes, distances, binning
pub mod geometry;

// Instance table
pub mod resolver;

// Point features
pub mod features;

// Flips, rotation, subsampling
pub mod augment;

// Votes and face planes
pub mod synthesis;

// Occupancy and heatmaps
pub mod voxel;

// Output record
pub mod bundle;

// Debug sinks
pub mod io;

use log::{debug, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

pub use augment::AugmentationRecord;
pub use bundle::{BoxLabels, FaceTargets, LabelBundle, LabelStats, PlaneLabels};
pub use config::{BoxMode, ClassTable, ConfigLoadError, LabelConfig, MeanSizeAccumulator};
pub use crate::core::{Mat3, ObjectRow, Point3, PointCloud, Scene};
pub use error::{LabelError, Result};
pub use geometry::{Face, HeadingBins, OrientedBox};
pub use io::{LabelSink, PlyVoteSink};
pub use voxel::{GridSpec, VoxelGrid, VoxelLabels};

use augment::subsample;
use features::{build_point_features, floor_height};
use resolver::InstanceTable;
use synthesis::synthesize_point_labels;

/// Turns scenes into label bundles under one validated configuration.
#[derive(Clone, Debug)]
pub struct LabelSynthesizer {
    config: LabelConfig,
    bins: HeadingBins,
}

impl LabelSynthesizer {
    /// Create a synthesizer. Fails if the configuration is invalid.
    pub fn new(config: LabelConfig) -> Result<Self> {
        config.validate()?;
        let bins = HeadingBins::new(config.boxes.num_heading_bins);
        Ok(Self { config, bins })
    }

    /// Create from `configs/labels.yaml`, or defaults if it does not exist
    pub fn from_default_config() -> Result<Self> {
        Self::new(LabelConfig::load_default()?)
    }

    /// Get the configuration
    pub fn config(&self) -> &LabelConfig {
        &self.config
    }

    /// Heading discretization in use
    pub fn heading_bins(&self) -> HeadingBins {
        self.bins
    }

    /// Synthesize labels with a deterministic seed.
    pub fn synthesize(&self, scene: &Scene, seed: u64) -> Result<LabelBundle> {
        let mut rng = StdRng::seed_from_u64(seed);
        self.synthesize_with_rng(scene, &mut rng)
    }

    /// Synthesize labels drawing randomness from `rng`.
    ///
    /// Subsampling draws first, then augmentation.
    pub fn synthesize_with_rng<R: Rng + ?Sized>(
        &self,
        scene: &Scene,
        rng: &mut R,
    ) -> Result<LabelBundle> {
        let config = &self.config;
        scene.validate()?;

        let sample = subsample(
            &scene.instance_ids,
            config.sampling.num_points,
            config.sampling.max_attempts,
            rng,
        )?;
        let sampled = scene.select(&sample.indices);

        let mut table =
            InstanceTable::resolve(&sampled, &config.classes, config.boxes.min_plane_points)?;
        if config.boxes.mode == BoxMode::AxisAligned {
            table.zero_headings();
        }

        let floor = if config.features.use_height {
            floor_height(&scene.points, &config.features)
        } else {
            None
        };
        let mut points = build_point_features(&sampled.points, &config.features, floor)?;
        let mut plane_vectors = sampled.plane_vectors;

        let augmentation = AugmentationRecord::sample(&config.augment, rng);
        augmentation.apply(&mut points, &mut plane_vectors, &mut table, config.boxes.mode);

        let point_labels = synthesize_point_labels(&points, &table, &config.plane_fit);

        let boxes: Vec<OrientedBox> = table.instances().iter().map(|inst| inst.bbox).collect();
        let voxels = VoxelLabels::build(&config.voxel, points.iter_xyz(), &boxes);

        let (box_labels, dropped) = BoxLabels::from_instances(
            table.instances(),
            &config.classes,
            self.bins,
            config.boxes.max_instances,
        );
        if dropped > 0 {
            warn!(
                "[Synthesizer] {}: {} instances exceed {} box slots, dropped {}",
                scene.name,
                table.len(),
                config.boxes.max_instances,
                dropped
            );
        }

        let stats = LabelStats {
            sampling_attempts: sample.attempts,
            retained_instances: table.len(),
            excluded_instances: table.excluded().len(),
            plane_groups: point_labels.labelled_plane_groups,
            small_plane_groups: table.small_plane_groups(),
            degenerate_plane_groups: point_labels.degenerate_plane_groups,
            unvoted_points: point_labels.unvoted_points,
        };

        debug!(
            "[Synthesizer] {}: {} points, {} instances, {} plane groups, {} attempts, augmentation {:?}",
            scene.name,
            points.len(),
            stats.retained_instances,
            stats.plane_groups,
            stats.sampling_attempts,
            augmentation
        );

        Ok(LabelBundle::assemble(
            scene.name.clone(),
            points,
            &plane_vectors,
            point_labels,
            box_labels,
            voxels,
            augmentation,
            dropped,
            stats,
        ))
    }

    /// Synthesize many scenes in parallel. Scene `i` uses seed `base_seed + i`.
    pub fn synthesize_batch(&self, scenes: &[Scene], base_seed: u64) -> Vec<Result<LabelBundle>> {
        scenes
            .par_iter()
            .enumerate()
            .map(|(i, scene)| self.synthesize(scene, base_seed.wrapping_add(i as u64)))
            .collect()
    }

    /// Synthesize one scene and hand the bundle to `sink`.
    pub fn synthesize_into<S: LabelSink + ?Sized>(
        &self,
        scene: &Scene,
        seed: u64,
        sink: &mut S,
    ) -> Result<LabelBundle> {
        let bundle = self.synthesize(scene, seed)?;
        sink.consume(&bundle)?;
        Ok(bundle)
    }
}
