//! Default value functions for serde deserialization.

// Sampling

pub fn num_points() -> usize {
    20_000
}

pub fn max_attempts() -> usize {
    1_000
}

// Point features

pub fn color_mean() -> [f32; 3] {
    [109.8, 97.2, 83.8]
}

pub fn color_scale() -> f32 {
    256.0
}

/// Percent units: 0.99 is the 0.99th percentile, not the 99th.
pub fn floor_percentile() -> f32 {
    0.99
}

// Augmentation

pub fn flip_probability() -> f32 {
    0.5
}

pub fn max_rotation() -> f32 {
    std::f32::consts::PI / 36.0
}

// Boxes

pub fn max_instances() -> usize {
    64
}

pub fn num_heading_bins() -> usize {
    1
}

pub fn min_plane_points() -> usize {
    10
}

// Voxel grid

pub fn voxel_size() -> f32 {
    0.06
}

pub fn voxel_min() -> [f32; 3] {
    [-3.84, -3.84, -0.2]
}

pub fn voxel_max() -> [f32; 3] {
    [3.84, 3.84, 2.68]
}

pub fn center_sigma() -> f32 {
    2.0
}

pub fn corner_sigma() -> f32 {
    1.0
}

pub fn truncate() -> f32 {
    4.0
}

// Plane fitting

pub fn plane_max_iterations() -> usize {
    100
}

pub fn plane_tolerance() -> f64 {
    1e-20
}

pub fn plane_initial_lambda() -> f64 {
    1e-3
}

pub fn plane_lambda_factor() -> f64 {
    10.0
}

pub fn plane_max_lambda() -> f64 {
    1e10
}

// Mean size estimation

pub fn ignored_semantic_ids() -> Vec<u32> {
    vec![0, 38, 39, 40]
}
