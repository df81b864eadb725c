//! Plane equations and per-face plane fitting.
//!
//! A plane is `a·x + b·y + c·z + d = 0`. Face planes are fit with a
//! Levenberg-Marquardt solver on the orthogonal point-to-plane residual
//!
//! ```text
//! r_i(a, b, c, d) = (a·x_i + b·y_i + c·z_i + d) / ‖(a, b, c)‖
//! ```
//!
//! seeded from an axis-aligned guess per face. Only one face of each parallel
//! pair is fit; the opposite face reuses its normal and gets a fresh offset,
//! so paired faces are exactly parallel.

use serde::{Deserialize, Serialize};

use crate::core::Point3;

use super::boxes::{CORNER_COUNT, Face};

/// Plane `normal · p + offset = 0`.
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct Plane {
    /// Normal `(a, b, c)`
    pub normal: [f64; 3],
    /// Offset `d`
    pub offset: f64,
}

impl Plane {
    /// Create a plane from its four coefficients
    pub fn new(a: f64, b: f64, c: f64, d: f64) -> Self {
        Self {
            normal: [a, b, c],
            offset: d,
        }
    }

    /// Coefficients `[a, b, c, d]`
    pub fn coefficients(&self) -> [f64; 4] {
        [self.normal[0], self.normal[1], self.normal[2], self.offset]
    }

    /// Length of the normal vector
    pub fn normal_norm(&self) -> f64 {
        dot3(&self.normal, &self.normal).sqrt()
    }

    /// Signed orthogonal distance from `p` to the plane
    pub fn signed_distance(&self, p: Point3) -> f64 {
        (dot3(&self.normal, &p.to_f64()) + self.offset) / self.normal_norm()
    }

    /// Rescale so the normal has unit length. `None` if the normal vanishes.
    pub fn normalized(&self) -> Option<Plane> {
        let norm = self.normal_norm();
        if !norm.is_finite() || norm < f64::EPSILON {
            return None;
        }
        Some(Plane {
            normal: self.normal.map(|v| v / norm),
            offset: self.offset / norm,
        })
    }

    /// Parallel plane through `points`, sharing this plane's normal.
    pub fn parallel_through(&self, points: &[Point3]) -> Plane {
        Plane {
            normal: self.normal,
            offset: opposite_face_offset(self.normal, points),
        }
    }

    /// Normal narrowed to f32
    pub fn normal_f32(&self) -> [f32; 3] {
        self.normal.map(|v| v as f32)
    }
}

/// Offset of the plane with `normal` through the given points:
/// `d = -mean(normal · p)`.
pub fn opposite_face_offset(normal: [f64; 3], points: &[Point3]) -> f64 {
    if points.is_empty() {
        return 0.0;
    }
    let sum: f64 = points.iter().map(|p| dot3(&normal, &p.to_f64())).sum();
    -sum / points.len() as f64
}

/// Configuration for the Levenberg-Marquardt plane fit.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PlaneFitConfig {
    /// Maximum number of iterations.
    /// Default: 100
    #[serde(default = "crate::config::defaults::plane_max_iterations")]
    pub max_iterations: usize,

    /// Stop when the squared step norm or the cost drops below this.
    /// Default: 1e-20
    #[serde(default = "crate::config::defaults::plane_tolerance")]
    pub tolerance: f64,

    /// Initial damping factor (λ).
    /// Default: 1e-3
    #[serde(default = "crate::config::defaults::plane_initial_lambda")]
    pub initial_lambda: f64,

    /// Factor to scale λ up (rejected step) or down (accepted step).
    /// Default: 10.0
    #[serde(default = "crate::config::defaults::plane_lambda_factor")]
    pub lambda_factor: f64,

    /// Give up once λ exceeds this.
    /// Default: 1e10
    #[serde(default = "crate::config::defaults::plane_max_lambda")]
    pub max_lambda: f64,
}

impl Default for PlaneFitConfig {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            tolerance: 1e-20,
            initial_lambda: 1e-3,
            lambda_factor: 10.0,
            max_lambda: 1e10,
        }
    }
}

/// Result of a plane fit.
#[derive(Clone, Copy, Debug)]
pub struct PlaneFit {
    /// Fitted plane, normalized to a unit normal
    pub plane: Plane,
    /// Iterations performed
    pub iterations: usize,
    /// RMS orthogonal residual
    pub residual: f64,
    /// Whether a stopping tolerance was reached
    pub converged: bool,
}

/// Fit a plane to `points` by nonlinear least squares, starting from `seed`.
///
/// Returns `None` if fewer than 4 points are given, the normal collapses, or
/// the result is not finite. Collinear inputs are not detected; the fit may
/// then be poorly conditioned.
pub fn fit_plane(points: &[Point3], seed: Plane, config: &PlaneFitConfig) -> Option<PlaneFit> {
    if points.len() < 4 {
        return None;
    }

    let pts: Vec<[f64; 3]> = points.iter().map(|p| p.to_f64()).collect();
    let mut params = seed.coefficients();
    let mut cost = sum_squared_residuals(&pts, &params)?;
    let mut lambda = config.initial_lambda;
    let mut converged = cost < config.tolerance;
    let mut iterations = 0;

    while !converged && iterations < config.max_iterations {
        iterations += 1;

        let (h, g) = build_normal_equations(&pts, &params)?;

        // Damped step: (H + λ·diag(H)) δ = -g, retried with growing λ
        let mut accepted = false;
        while lambda <= config.max_lambda {
            let mut damped = h;
            for (i, row) in damped.iter_mut().enumerate() {
                row[i] += lambda * (h[i][i] + 1e-12);
            }
            let rhs = g.map(|v| -v);

            let Some(delta) = solve_4x4(&damped, &rhs) else {
                lambda *= config.lambda_factor;
                continue;
            };

            let candidate: [f64; 4] = std::array::from_fn(|i| params[i] + delta[i]);
            match sum_squared_residuals(&pts, &candidate) {
                Some(new_cost) if new_cost < cost => {
                    // The residual is scale invariant; keep the normal at unit length
                    params = unit_scaled(&candidate);
                    lambda = (lambda / config.lambda_factor).max(1e-15);

                    let step_sq: f64 = delta.iter().map(|d| d * d).sum();
                    converged = step_sq < config.tolerance
                        || new_cost < config.tolerance
                        || cost - new_cost <= 1e-12 * cost;
                    cost = new_cost;
                    accepted = true;
                    break;
                }
                _ => lambda *= config.lambda_factor,
            }
        }

        if !accepted {
            // No descent direction left
            converged = true;
        }
    }

    let plane = Plane::new(params[0], params[1], params[2], params[3]).normalized()?;
    if !plane.offset.is_finite() || plane.normal.iter().any(|v| !v.is_finite()) {
        return None;
    }

    Some(PlaneFit {
        plane,
        iterations,
        residual: (cost / pts.len() as f64).sqrt(),
        converged,
    })
}

/// Sum of squared orthogonal residuals. `None` if the normal vanishes.
fn sum_squared_residuals(points: &[[f64; 3]], params: &[f64; 4]) -> Option<f64> {
    let n = [params[0], params[1], params[2]];
    let norm = dot3(&n, &n).sqrt();
    if !norm.is_finite() || norm < f64::EPSILON {
        return None;
    }
    Some(
        points
            .iter()
            .map(|p| {
                let r = (dot3(&n, p) + params[3]) / norm;
                r * r
            })
            .sum(),
    )
}

/// Rescale parameters so the normal part has unit length.
fn unit_scaled(params: &[f64; 4]) -> [f64; 4] {
    let norm = dot3(&[params[0], params[1], params[2]], &[params[0], params[1], params[2]]).sqrt();
    params.map(|v| v / norm)
}

/// Build `H = JᵀJ` and `g = Jᵀr` for the current parameters.
fn build_normal_equations(
    points: &[[f64; 3]],
    params: &[f64; 4],
) -> Option<([[f64; 4]; 4], [f64; 4])> {
    let n = [params[0], params[1], params[2]];
    let norm_sq = dot3(&n, &n);
    let norm = norm_sq.sqrt();
    if !norm.is_finite() || norm < f64::EPSILON {
        return None;
    }
    let norm_cubed = norm_sq * norm;

    let mut h = [[0.0f64; 4]; 4];
    let mut g = [0.0f64; 4];

    for p in points {
        let raw = dot3(&n, p) + params[3];
        let residual = raw / norm;

        // ∂r/∂n_k = p_k/‖n‖ - raw·n_k/‖n‖³, ∂r/∂d = 1/‖n‖
        let jacobian = [
            p[0] / norm - raw * n[0] / norm_cubed,
            p[1] / norm - raw * n[1] / norm_cubed,
            p[2] / norm - raw * n[2] / norm_cubed,
            1.0 / norm,
        ];

        for i in 0..4 {
            for j in 0..4 {
                h[i][j] += jacobian[i] * jacobian[j];
            }
            g[i] += jacobian[i] * residual;
        }
    }

    Some((h, g))
}

/// Solve a 4x4 linear system by Gaussian elimination with partial pivoting.
fn solve_4x4(a: &[[f64; 4]; 4], b: &[f64; 4]) -> Option<[f64; 4]> {
    let mut m = *a;
    let mut rhs = *b;

    for col in 0..4 {
        let pivot = (col..4).max_by(|&i, &j| m[i][col].abs().total_cmp(&m[j][col].abs()))?;
        if m[pivot][col].abs() < 1e-300 {
            return None;
        }
        m.swap(col, pivot);
        rhs.swap(col, pivot);

        for row in col + 1..4 {
            let factor = m[row][col] / m[col][col];
            for k in col..4 {
                m[row][k] -= factor * m[col][k];
            }
            rhs[row] -= factor * rhs[col];
        }
    }

    let mut x = [0.0f64; 4];
    for row in (0..4).rev() {
        let tail: f64 = (row + 1..4).map(|k| m[row][k] * x[k]).sum();
        x[row] = (rhs[row] - tail) / m[row][row];
    }

    x.iter().all(|v| v.is_finite()).then_some(x)
}

#[inline]
fn dot3(a: &[f64; 3], b: &[f64; 3]) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

/// The six face planes of one box, indexed by [`Face`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FacePlanes {
    planes: [Plane; 6],
}

impl FacePlanes {
    /// Faces that are fit directly, with their seed planes.
    /// Their opposites are derived by offset only.
    pub const FITTED: [(Face, [f64; 4]); 3] = [
        (Face::Lower, [0.0, 0.0, 1.0, 0.0]),
        (Face::Left, [1.0, 0.0, 0.0, 0.0]),
        (Face::Front, [0.0, 1.0, 0.0, 0.0]),
    ];

    /// Fit all six face planes from the box corners.
    ///
    /// Returns `None` if any of the three fitted faces is degenerate.
    pub fn fit(corners: &[Point3; CORNER_COUNT], config: &PlaneFitConfig) -> Option<FacePlanes> {
        let mut planes = [Plane::default(); 6];

        for (face, seed) in Self::FITTED {
            let face_points = face.corners().map(|i| corners[i]);
            let seed = Plane::new(seed[0], seed[1], seed[2], seed[3]);
            let fit = fit_plane(&face_points, seed, config)?;

            let opposite = face.opposite();
            let opposite_points = opposite.corners().map(|i| corners[i]);

            planes[face.index()] = fit.plane;
            planes[opposite.index()] = fit.plane.parallel_through(&opposite_points);
        }

        Some(FacePlanes { planes })
    }

    /// Plane of one face
    #[inline]
    pub fn get(&self, face: Face) -> &Plane {
        &self.planes[face.index()]
    }
}
