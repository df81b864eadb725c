//! Core types for scene label synthesis.
//!
//! Coordinates are right-handed with +Z up. Headings rotate counter-clockwise
//! about +Z, measured from +X, and live in (-π, π].
//!
//! ## Type Categories
//!
//! - [`Point3`]: point or displacement in meters
//! - [`Mat3`]: rotation about the up axis (augmentation)
//! - [`PointCloud`]: N rows of xyz plus feature channels
//! - [`Scene`]: point cloud with per-point instance, semantic, plane and object annotations
//! - [`ObjectRow`]: the canonical per-point object metadata row

mod cloud;
mod math;
mod point;
mod scene;

pub use cloud::PointCloud;
pub use math::{Mat3, normalize_angle, percentile};
pub use point::Point3;
pub use scene::{ObjectRow, Scene};
