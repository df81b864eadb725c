//! Scene augmentation and subsampling.
//!
//! An [`AugmentationRecord`] is one draw of (x-flip, y-flip, rotation about
//! +Z). It is applied to every array that carries geometry, in the same
//! order, so point/instance correspondence survives:
//!
//! | Array | x-flip | y-flip | rotation |
//! |-------|--------|--------|----------|
//! | point xyz | negate x | negate y | `R · p` |
//! | plane vector `(a, b, c, d)` | negate a | negate b | `R · (a, b, c)` |
//! | box center | negate x | negate y | `R · c` |
//! | box heading | negate | negate | `+ angle` (oriented) |
//! | box extents | - | - | hull of rotated footprint (axis-aligned) |
//!
//! Headings are re-normalized into (-π, π] after the transform.

mod sampling;

pub use sampling::{Subsample, subsample};

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::{AugmentSection, BoxMode};
use crate::core::{Mat3, Point3, PointCloud, normalize_angle};
use crate::geometry::OrientedBox;
use crate::resolver::InstanceTable;

/// The augmentation applied to one scene.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AugmentationRecord {
    /// Reflected across x = 0
    pub flip_x: bool,
    /// Reflected across y = 0
    pub flip_y: bool,
    /// Rotation angle about +Z (radians)
    pub angle: f32,
    /// Rotation matrix for `angle`
    pub rotation: Mat3,
}

impl Default for AugmentationRecord {
    fn default() -> Self {
        Self::identity()
    }
}

impl AugmentationRecord {
    /// No flips, no rotation
    pub fn identity() -> Self {
        Self {
            flip_x: false,
            flip_y: false,
            angle: 0.0,
            rotation: Mat3::IDENTITY,
        }
    }

    /// Explicit flips and rotation angle
    pub fn new(flip_x: bool, flip_y: bool, angle: f32) -> Self {
        Self {
            flip_x,
            flip_y,
            angle,
            rotation: Mat3::rotation_z(angle),
        }
    }

    /// Draw an augmentation. Returns the identity when disabled.
    ///
    /// When enabled exactly three values are drawn from `rng` (x-flip,
    /// y-flip, angle), whatever their outcome.
    pub fn sample<R: Rng + ?Sized>(section: &AugmentSection, rng: &mut R) -> Self {
        if !section.enabled {
            return Self::identity();
        }
        let flip_x = rng.random::<f32>() < section.flip_probability;
        let flip_y = rng.random::<f32>() < section.flip_probability;
        let angle = (rng.random::<f32>() * 2.0 - 1.0) * section.max_rotation;
        Self::new(flip_x, flip_y, angle)
    }

    /// True when the record changes nothing
    pub fn is_identity(&self) -> bool {
        !self.flip_x && !self.flip_y && self.angle == 0.0
    }

    #[inline]
    fn flip(&self, p: Point3) -> Point3 {
        Point3::new(
            if self.flip_x { -p.x } else { p.x },
            if self.flip_y { -p.y } else { p.y },
            p.z,
        )
    }

    /// Map a scene-frame point into the augmented frame.
    #[inline]
    pub fn apply_point(&self, p: Point3) -> Point3 {
        self.rotation.transform(self.flip(p))
    }

    /// Map an augmented-frame point back into the scene frame.
    #[inline]
    pub fn invert_point(&self, p: Point3) -> Point3 {
        self.flip(self.rotation.transpose().transform(p))
    }

    /// Transform a plane vector `(a, b, c, d)`; the offset is unchanged.
    pub fn apply_plane_vector(&self, v: [f32; 4]) -> [f32; 4] {
        let n = self.apply_point(Point3::new(v[0], v[1], v[2]));
        [n.x, n.y, n.z, v[3]]
    }

    /// Transform a box.
    pub fn apply_box(&self, bx: &OrientedBox, mode: BoxMode) -> OrientedBox {
        let mut heading = bx.heading;
        if self.flip_x {
            heading = -heading;
        }
        if self.flip_y {
            heading = -heading;
        }
        let flipped = OrientedBox::new(self.flip(bx.center), bx.size, heading);

        match mode {
            BoxMode::Oriented => OrientedBox::new(
                self.rotation.transform(flipped.center),
                flipped.size,
                normalize_angle(flipped.heading + self.angle),
            ),
            BoxMode::AxisAligned => flipped.rotate_axis_aligned(&self.rotation),
        }
    }

    /// Apply to every geometric array of a scene in place.
    pub fn apply(
        &self,
        points: &mut PointCloud,
        plane_vectors: &mut [[f32; 4]],
        table: &mut InstanceTable,
        mode: BoxMode,
    ) {
        if self.is_identity() {
            return;
        }
        for i in 0..points.len() {
            let p = self.apply_point(points.xyz(i));
            points.set_xyz(i, p);
        }
        for v in plane_vectors.iter_mut() {
            *v = self.apply_plane_vector(*v);
        }
        for inst in table.iter_mut() {
            inst.bbox = self.apply_box(&inst.bbox, mode);
        }
    }
}
