//! Geometry kernel for label synthesis.
//!
//! Total functions over their documented domains: none of these raise for a
//! semantically valid instance. The one fallible operation, plane fitting,
//! reports degeneracy with `None` instead of producing NaN.
//!
//! ## Modules
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`boxes`] | [`OrientedBox`], [`box_to_corners`], [`Face`] corner quadruples |
//! | [`plane`] | [`Plane`], Levenberg-Marquardt [`fit_plane`], [`FacePlanes`] |
//! | [`distance`] | [`pairwise_squared_distance`], first-argmin assignment |
//! | [`bins`] | [`HeadingBins`], size residuals |

pub mod bins;
pub mod boxes;
pub mod distance;
pub mod plane;

pub use bins::{
    HeadingBins, angle_to_class_residual, class_residual_to_angle, residual_to_size,
    size_residual,
};
pub use boxes::{CORNER_COUNT, Face, OrientedBox, box_to_corners};
pub use distance::{DistanceMatrix, first_argmin, pairwise_squared_distance};
pub use plane::{FacePlanes, Plane, PlaneFit, PlaneFitConfig, fit_plane, opposite_face_offset};
