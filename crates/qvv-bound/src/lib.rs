#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]
//!
//! # QVV error bounds
//!
//! A QVV transform stores a rotation (quaternion), a translation (vector) and a
//! per-axis scale (vector), applied scale, then rotate, then translate. When a
//! "raw" transform is approximated by a "lossy" one (after quantization, for
//! instance), every point of the unit sphere moves by some amount. This crate
//! computes the largest such displacement analytically, together with a point
//! that attains it, without sampling the domain.
//!
//! ## Solvers
//!
//! - [`analytic_bound`]: uniform scale on both sides, exact, O(1).
//! - [`scaled_circle_max`]: one transform against the identity on the unit
//!   circle with non-uniform scale, exact, O(1).
//! - [`planar_affine_max`]: any 2x2 linear map plus offset on the unit circle, exact.
//! - [`conservative_bound`]: non-uniform scale in 3D, an upper bound only.
//!
//! [`ErrorProblem`] picks the right solver for a raw/lossy pair.
//!
//! ## Example
//!
//! ```rust
//! use qvv_bound::{estimate_error, Domain, Transform};
//!
//! let raw = Transform::from_axis_angle_deg(0.0, 0.0, 20.0, [0.0; 3], [1.0; 3]);
//! let lossy = Transform::from_axis_angle_deg(0.0, 0.0, 20.5, [0.0, 0.01, 0.0], [1.0; 3]);
//!
//! let estimate = estimate_error(&raw, &lossy, Domain::Sphere)?;
//! assert!(estimate.bound > 0.0);
//! # Ok::<(), qvv_bound::BoundError>(())
//! ```

mod analytic;
mod conservative;
mod delta;
mod error;
mod planar;
mod point_error;
mod problem;
mod scaled_circle;
mod tolerance;
mod transform;

pub mod polynomial;
pub mod sampling;

pub use analytic::{analytic_bound, analytic_bound_with, ErrorBound};
pub use conservative::{conservative_bound, conservative_bound_with};
pub use delta::{compose_delta, compose_delta_with, error_plane_normal, DeltaTransform};
pub use error::{BoundError, TransformSide, UnsupportedScaleError};
pub use planar::{planar_affine_max, planar_affine_max_with, planar_pair_max, PlanarBound};
pub use point_error::{displacement_error, point_error, point_error_delta};
pub use problem::{estimate_error, BoundKind, Domain, ErrorEstimate, ErrorProblem};
pub use scaled_circle::{scaled_circle_max, scaled_circle_max_with};
pub use tolerance::BoundTolerances;
pub use transform::Transform;

pub use glam::{DMat2, DQuat, DVec2, DVec3};
