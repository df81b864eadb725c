//! Oriented boxes, their eight corners and the six faces.
//!
//! Corner `i` is the sign combination of the three half-extents given by the
//! bits of `i`: bit 2 selects +x, bit 1 selects +y, bit 0 selects +z.
//!
//! ```text
//! 0: (-x, -y, -z)   4: (+x, -y, -z)
//! 1: (-x, -y, +z)   5: (+x, -y, +z)
//! 2: (-x, +y, -z)   6: (+x, +y, -z)
//! 3: (-x, +y, +z)   7: (+x, +y, +z)
//! ```
//!
//! The x/y axes are box-local and rotated by the heading about +Z; the z axis
//! is never rotated.

use serde::{Deserialize, Serialize};

use crate::core::{Mat3, Point3};

/// Number of box corners
pub const CORNER_COUNT: usize = 8;

/// One of the six faces of an oriented box.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Face {
    /// Local -y face
    Front,
    /// Local +y face
    Back,
    /// Local -x face
    Left,
    /// Local +x face
    Right,
    /// +z face
    Upper,
    /// -z face
    Lower,
}

impl Face {
    /// All faces in output order
    pub const ALL: [Face; 6] = [
        Face::Front,
        Face::Back,
        Face::Left,
        Face::Right,
        Face::Upper,
        Face::Lower,
    ];

    /// Position of this face in [`Face::ALL`]
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Lowercase name used in output field names
    pub fn name(self) -> &'static str {
        match self {
            Face::Front => "front",
            Face::Back => "back",
            Face::Left => "left",
            Face::Right => "right",
            Face::Upper => "upper",
            Face::Lower => "lower",
        }
    }

    /// Corner indices bounding this face
    pub fn corners(self) -> [usize; 4] {
        match self {
            Face::Front => [0, 1, 4, 5],
            Face::Back => [2, 3, 6, 7],
            Face::Left => [0, 1, 2, 3],
            Face::Right => [4, 5, 6, 7],
            Face::Upper => [1, 3, 5, 7],
            Face::Lower => [0, 2, 4, 6],
        }
    }

    /// The geometrically parallel face
    pub fn opposite(self) -> Face {
        match self {
            Face::Front => Face::Back,
            Face::Back => Face::Front,
            Face::Left => Face::Right,
            Face::Right => Face::Left,
            Face::Upper => Face::Lower,
            Face::Lower => Face::Upper,
        }
    }
}

/// Oriented box: center, extents and heading about +Z.
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct OrientedBox {
    /// Box center
    pub center: Point3,
    /// Full extents along local x, y and z
    pub size: Point3,
    /// Heading (radians, expected in (-π, π])
    pub heading: f32,
}

impl OrientedBox {
    /// Create a new box
    pub fn new(center: Point3, size: Point3, heading: f32) -> Self {
        Self {
            center,
            size,
            heading,
        }
    }

    /// The eight corners in the fixed bit order
    pub fn corners(&self) -> [Point3; CORNER_COUNT] {
        box_to_corners(
            self.center,
            self.size.x,
            self.size.y,
            self.size.z,
            self.heading,
        )
    }

    /// Corners of a single face
    pub fn face_corners(&self, face: Face) -> [Point3; 4] {
        let corners = self.corners();
        face.corners().map(|i| corners[i])
    }

    /// Rotate an axis-aligned box about the origin and re-fit an
    /// axis-aligned box around the result.
    ///
    /// The center rotates; the extents grow to the xy hull of the rotated
    /// footprint. The heading stays zero.
    pub fn rotate_axis_aligned(&self, rotation: &Mat3) -> OrientedBox {
        let half = self.size.abs() * 0.5;
        let mut extent = Point3::ZERO;
        for (sx, sy) in [(-1.0, -1.0), (-1.0, 1.0), (1.0, -1.0), (1.0, 1.0)] {
            let offset = rotation.transform(Point3::new(sx * half.x, sy * half.y, 0.0));
            extent = extent.max(&offset.abs());
        }

        OrientedBox {
            center: rotation.transform(self.center),
            size: Point3::new(2.0 * extent.x, 2.0 * extent.y, self.size.z.abs()),
            heading: 0.0,
        }
    }
}

/// Build the eight corners of a box.
///
/// Extents are taken by absolute value. The heading is not normalized.
pub fn box_to_corners(
    center: Point3,
    size_x: f32,
    size_y: f32,
    size_z: f32,
    heading: f32,
) -> [Point3; CORNER_COUNT] {
    let (sin, cos) = heading.sin_cos();
    let vx = Point3::new(cos, sin, 0.0) * (size_x.abs() / 2.0);
    let vy = Point3::new(-sin, cos, 0.0) * (size_y.abs() / 2.0);
    let vz = Point3::new(0.0, 0.0, size_z.abs() / 2.0);

    std::array::from_fn(|i| {
        let x = if i & 0b100 != 0 { vx } else { -vx };
        let y = if i & 0b010 != 0 { vy } else { -vy };
        let z = if i & 0b001 != 0 { vz } else { -vz };
        center + x + y + z
    })
}
