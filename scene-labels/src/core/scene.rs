//! Per-scene input arrays as handed over by an external loader.

use serde::{Deserialize, Serialize};

use crate::error::{LabelError, Result};

use super::cloud::PointCloud;
use super::point::Point3;

/// Canonical object metadata row attached to every point.
///
/// Rows are redundant across the members of one instance; the resolver
/// collapses them into one entry per instance.
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct ObjectRow {
    /// Box center
    pub center: Point3,
    /// Box extents along its local axes (before rotation)
    pub size: Point3,
    /// Heading about the z axis (radians)
    pub heading: f32,
    /// Instance id (0 = background)
    pub instance_id: u32,
    /// Raw semantic id (e.g. NYU40)
    pub semantic_id: u32,
}

impl ObjectRow {
    /// Parse a 9-float row: center(3), size(3), heading, instance id, semantic id.
    pub fn from_slice(row: &[f32]) -> Option<Self> {
        if row.len() < 9 {
            return None;
        }
        Some(Self {
            center: Point3::new(row[0], row[1], row[2]),
            size: Point3::new(row[3], row[4], row[5]),
            heading: row[6],
            instance_id: row[7] as u32,
            semantic_id: row[8] as u32,
        })
    }

    /// Bitwise equality of the box parameters (center, size, heading)
    pub fn same_box(&self, other: &ObjectRow) -> bool {
        self.center.to_array().map(f32::to_bits) == other.center.to_array().map(f32::to_bits)
            && self.size.to_array().map(f32::to_bits) == other.size.to_array().map(f32::to_bits)
            && self.heading.to_bits() == other.heading.to_bits()
    }
}

/// One scanned scene: a point cloud with per-point annotations.
#[derive(Clone, Debug)]
pub struct Scene {
    /// Scene identifier (used for sinks and logging)
    pub name: String,
    /// N x (3 + C) points
    pub points: PointCloud,
    /// Per-point instance id (0 = background)
    pub instance_ids: Vec<u32>,
    /// Per-point semantic id
    pub semantic_ids: Vec<u32>,
    /// Per-point plane patch id (0 = none)
    pub plane_patch_ids: Vec<u32>,
    /// Per-point plane-equation estimate `(a, b, c, d)`
    pub plane_vectors: Vec<[f32; 4]>,
    /// Per-point canonical object metadata
    pub objects: Vec<ObjectRow>,
}

impl Scene {
    /// Number of points
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True when the scene has no points
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Check that every per-point array matches the point count.
    pub fn validate(&self) -> Result<()> {
        let n = self.points.len();
        if n == 0 {
            return Err(LabelError::EmptyScene);
        }

        let lengths = [
            ("instance_ids", self.instance_ids.len()),
            ("semantic_ids", self.semantic_ids.len()),
            ("plane_patch_ids", self.plane_patch_ids.len()),
            ("plane_vectors", self.plane_vectors.len()),
            ("objects", self.objects.len()),
        ];
        for (field, actual) in lengths {
            if actual != n {
                return Err(LabelError::ShapeMismatch {
                    field,
                    expected: n,
                    actual,
                });
            }
        }
        Ok(())
    }

    /// Gather every per-point array by index.
    pub fn select(&self, indices: &[usize]) -> Scene {
        Scene {
            name: self.name.clone(),
            points: self.points.select(indices),
            instance_ids: indices.iter().map(|&i| self.instance_ids[i]).collect(),
            semantic_ids: indices.iter().map(|&i| self.semantic_ids[i]).collect(),
            plane_patch_ids: indices.iter().map(|&i| self.plane_patch_ids[i]).collect(),
            plane_vectors: indices.iter().map(|&i| self.plane_vectors[i]).collect(),
            objects: indices.iter().map(|&i| self.objects[i]).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_point_scene() -> Scene {
        Scene {
            name: "scene0000_00".to_string(),
            points: PointCloud::from_points(&[Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 1.0)]),
            instance_ids: vec![0, 3],
            semantic_ids: vec![1, 5],
            plane_patch_ids: vec![0, 2],
            plane_vectors: vec![[0.0; 4], [0.0, 0.0, 1.0, -1.0]],
            objects: vec![ObjectRow::default(); 2],
        }
    }

    #[test]
    fn test_validate() {
        let mut scene = two_point_scene();
        assert!(scene.validate().is_ok());

        scene.semantic_ids.pop();
        assert!(matches!(
            scene.validate(),
            Err(LabelError::ShapeMismatch {
                field: "semantic_ids",
                expected: 2,
                actual: 1
            })
        ));
    }

    #[test]
    fn test_select() {
        let scene = two_point_scene();
        let picked = scene.select(&[1]);
        assert_eq!(picked.len(), 1);
        assert_eq!(picked.instance_ids, vec![3]);
        assert_eq!(picked.plane_vectors[0], [0.0, 0.0, 1.0, -1.0]);
    }

    #[test]
    fn test_object_row_from_slice() {
        let row = ObjectRow::from_slice(&[1.0, 2.0, 3.0, 0.5, 0.6, 0.7, 0.1, 4.0, 5.0]).unwrap();
        assert_eq!(row.center, Point3::new(1.0, 2.0, 3.0));
        assert_eq!(row.instance_id, 4);
        assert_eq!(row.semantic_id, 5);
        assert!(ObjectRow::from_slice(&[0.0; 8]).is_none());
    }
}
