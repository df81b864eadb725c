//! Row-major point cloud with xyz plus optional feature channels.

use crate::error::{LabelError, Result};

use super::point::Point3;

/// Point cloud stored as N rows of `channels` floats.
///
/// The first three channels of every row are x, y, z. Remaining channels
/// (color, height) are opaque to the geometry code and travel with the row.
#[derive(Clone, Debug, PartialEq)]
pub struct PointCloud {
    data: Vec<f32>,
    channels: usize,
}

impl PointCloud {
    /// Number of spatial channels at the start of every row
    pub const XYZ: usize = 3;

    /// Wrap flat row-major data.
    pub fn new(data: Vec<f32>, channels: usize) -> Result<Self> {
        if channels < Self::XYZ {
            return Err(LabelError::InvalidConfig(format!(
                "point cloud needs at least 3 channels, got {}",
                channels
            )));
        }
        if data.len() % channels != 0 {
            return Err(LabelError::ShapeMismatch {
                field: "points",
                expected: (data.len() / channels + 1) * channels,
                actual: data.len(),
            });
        }
        Ok(Self { data, channels })
    }

    /// Build an xyz-only cloud from points.
    pub fn from_points(points: &[Point3]) -> Self {
        let mut data = Vec::with_capacity(points.len() * Self::XYZ);
        for p in points {
            data.extend_from_slice(&[p.x, p.y, p.z]);
        }
        Self {
            data,
            channels: Self::XYZ,
        }
    }

    /// Empty cloud with the given channel count and reserved capacity.
    pub fn with_capacity(channels: usize, rows: usize) -> Self {
        Self {
            data: Vec::with_capacity(rows * channels.max(Self::XYZ)),
            channels: channels.max(Self::XYZ),
        }
    }

    /// Number of points
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len() / self.channels
    }

    /// True when the cloud has no points
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Floats per row
    #[inline]
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Raw row-major data
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Row `i` (all channels)
    #[inline]
    pub fn row(&self, i: usize) -> &[f32] {
        &self.data[i * self.channels..(i + 1) * self.channels]
    }

    /// Spatial coordinates of point `i`
    #[inline]
    pub fn xyz(&self, i: usize) -> Point3 {
        let base = i * self.channels;
        Point3::new(self.data[base], self.data[base + 1], self.data[base + 2])
    }

    /// Overwrite the spatial coordinates of point `i`
    #[inline]
    pub fn set_xyz(&mut self, i: usize, p: Point3) {
        let base = i * self.channels;
        self.data[base] = p.x;
        self.data[base + 1] = p.y;
        self.data[base + 2] = p.z;
    }

    /// Append a row of exactly `channels` values.
    pub fn push_row(&mut self, row: &[f32]) -> Result<()> {
        if row.len() != self.channels {
            return Err(LabelError::ShapeMismatch {
                field: "point row",
                expected: self.channels,
                actual: row.len(),
            });
        }
        self.data.extend_from_slice(row);
        Ok(())
    }

    /// Iterate over the spatial coordinates of every point
    pub fn iter_xyz(&self) -> impl Iterator<Item = Point3> + '_ {
        self.data
            .chunks_exact(self.channels)
            .map(|r| Point3::new(r[0], r[1], r[2]))
    }

    /// Gather rows by index (indices may repeat).
    pub fn select(&self, indices: &[usize]) -> Self {
        let mut data = Vec::with_capacity(indices.len() * self.channels);
        for &i in indices {
            data.extend_from_slice(self.row(i));
        }
        Self {
            data,
            channels: self.channels,
        }
    }
}
