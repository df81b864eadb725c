//! Heading and size discretization.
//!
//! Headings in (-π, π] are split into `num_bins` equal sectors. The class is
//! the sector containing the angle and the residual is the signed offset from
//! the sector center, so `class_to_angle(angle_to_class(a)) == a` up to
//! rounding.

use std::f64::consts::{PI, TAU};

use crate::core::Point3;

/// Equal-width heading sectors over (-π, π].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HeadingBins {
    num_bins: usize,
    sector: f64,
}

impl HeadingBins {
    /// Create `num_bins` sectors (at least one).
    pub fn new(num_bins: usize) -> Self {
        let num_bins = num_bins.max(1);
        Self {
            num_bins,
            sector: TAU / num_bins as f64,
        }
    }

    /// Number of sectors
    pub fn num_bins(&self) -> usize {
        self.num_bins
    }

    /// Angular width of one sector
    pub fn sector_width(&self) -> f64 {
        self.sector
    }

    /// Center angle of a sector, measured on the shifted range (0, 2π]
    #[inline]
    fn shifted_center(&self, class: usize) -> f64 {
        class as f64 * self.sector + self.sector / 2.0
    }

    /// Discretize an angle in (-π, π] into `(class, residual)`.
    pub fn angle_to_class(&self, angle: f64) -> (usize, f64) {
        let shifted = angle + PI;
        let class = ((shifted / self.sector).floor().max(0.0) as usize).min(self.num_bins - 1);
        (class, shifted - self.shifted_center(class))
    }

    /// Inverse of [`angle_to_class`](Self::angle_to_class).
    pub fn class_to_angle(&self, class: usize, residual: f64) -> f64 {
        self.shifted_center(class) + residual - PI
    }
}

/// Discretize `angle` into `num_bins` sectors.
pub fn angle_to_class_residual(angle: f64, num_bins: usize) -> (usize, f64) {
    HeadingBins::new(num_bins).angle_to_class(angle)
}

/// Recover the angle from a sector and residual.
pub fn class_residual_to_angle(class: usize, residual: f64, num_bins: usize) -> f64 {
    HeadingBins::new(num_bins).class_to_angle(class, residual)
}

/// Size residual relative to a class mean size.
#[inline]
pub fn size_residual(size: Point3, mean_size: Point3) -> Point3 {
    size - mean_size
}

/// Recover the size from a class mean and residual.
#[inline]
pub fn residual_to_size(residual: Point3, mean_size: Point3) -> Point3 {
    mean_size + residual
}
