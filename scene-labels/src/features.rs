//! Point feature channels appended after xyz.
//!
//! Output row layout: `x y z [r g b] [h]`, where color is
//! `(rgb - color_mean) / color_scale` and `h` is the height above the floor
//! estimate `percentile(z, floor_percentile)` of the full scene.

use crate::config::FeatureSection;
use crate::core::{PointCloud, percentile};
use crate::error::{LabelError, Result};

/// Input channels expected when color is used (xyz + rgb)
const XYZ_RGB: usize = 6;

/// Floor height of a cloud: the configured percentile of its z values.
pub fn floor_height(cloud: &PointCloud, section: &FeatureSection) -> Option<f32> {
    let z: Vec<f32> = cloud.iter_xyz().map(|p| p.z).collect();
    percentile(&z, section.floor_percentile)
}

/// Build the output feature cloud from raw `xyz[rgb...]` rows.
///
/// `floor` is required when `use_height` is set.
pub fn build_point_features(
    cloud: &PointCloud,
    section: &FeatureSection,
    floor: Option<f32>,
) -> Result<PointCloud> {
    if section.use_color && cloud.channels() < XYZ_RGB {
        return Err(LabelError::ShapeMismatch {
            field: "point color channels",
            expected: XYZ_RGB,
            actual: cloud.channels(),
        });
    }

    let channels = PointCloud::XYZ + section.extra_channels();
    let mut out = PointCloud::with_capacity(channels, cloud.len());
    let mut row = Vec::with_capacity(channels);

    for i in 0..cloud.len() {
        let src = cloud.row(i);
        row.clear();
        row.extend_from_slice(&src[..PointCloud::XYZ]);

        if section.use_color {
            for (c, mean) in src[3..6].iter().zip(section.color_mean) {
                row.push((c - mean) / section.color_scale);
            }
        }
        if section.use_height {
            row.push(src[2] - floor.unwrap_or(0.0));
        }
        out.push_row(&row)?;
    }

    Ok(out)
}
