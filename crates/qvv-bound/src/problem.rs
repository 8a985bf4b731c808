use glam::{DVec2, DVec3};

use crate::planar::planar_pair_linear;
use crate::{
    analytic_bound_with, compose_delta_with, conservative_bound_with, planar_affine_max_with,
    scaled_circle_max_with, BoundError, BoundTolerances, DeltaTransform, Transform, TransformSide,
};

/// The set of points the error is maximized over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Domain {
    /// The unit circle in the XY plane. Both transforms must be planar.
    Circle,
    /// The unit sphere.
    #[default]
    Sphere,
}

/// Whether a bound is attained or only an upper limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundKind {
    /// The bound is the maximum error over the domain.
    Exact,
    /// The bound is at least the maximum error over the domain.
    Conservative,
}

/// The result of [`ErrorProblem::solve`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ErrorEstimate {
    /// Maximum error, or an upper bound on it.
    pub bound: f64,
    /// Domain point reaching `bound` when it is exact, an indicative point otherwise.
    pub point: DVec3,
    /// How `bound` relates to the true maximum.
    pub kind: BoundKind,
}

impl ErrorEstimate {
    /// Whether the bound is attained.
    pub fn is_exact(&self) -> bool {
        self.kind == BoundKind::Exact
    }
}

/// A raw/lossy pair sorted by the solver that handles it.
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorProblem {
    /// Uniform scales on both sides; solved exactly on the delta.
    ///
    /// On the sphere a pair with one non-uniform scale composes to a delta too, but
    /// is classified as [`ErrorProblem::NonUniformScale3DConservative`].
    RotationTranslationUniformScale(DeltaTransform),
    /// Planar transforms on the unit circle without a common uniform scale; solved
    /// exactly.
    NonUniformScale2D {
        /// Reference transform.
        raw: Transform,
        /// Approximated transform.
        lossy: Transform,
    },
    /// Non-uniform scales on the unit sphere; only bounded.
    NonUniformScale3DConservative {
        /// Reference transform.
        raw: Transform,
        /// Approximated transform.
        lossy: Transform,
    },
}

impl ErrorProblem {
    /// Pick the solver for a raw/lossy pair over `domain`.
    ///
    /// To bound the displacement of a single transform, pass [`Transform::IDENTITY`]
    /// as `raw`.
    ///
    /// # Errors
    ///
    /// - [`BoundError::NonFiniteInput`] if either transform has NaN or infinite components.
    /// - [`BoundError::NonPlanarTransform`] if `domain` is [`Domain::Circle`] and either
    ///   transform leaves the XY plane.
    pub fn classify(
        raw: &Transform,
        lossy: &Transform,
        domain: Domain,
        tolerances: &BoundTolerances,
    ) -> Result<Self, BoundError> {
        for (which, transform) in [(TransformSide::Raw, raw), (TransformSide::Lossy, lossy)] {
            if !transform.is_finite() {
                return Err(BoundError::NonFiniteInput { which });
            }
        }

        let problem = match domain {
            Domain::Sphere => match compose_delta_with(raw, lossy, tolerances) {
                Ok(delta) if delta.uniform_scales(tolerances.scale).is_some() => {
                    Self::RotationTranslationUniformScale(delta)
                }
                Ok(_) => {
                    log::debug!("one scale is non-uniform, falling back to the conservative bound");
                    Self::NonUniformScale3DConservative {
                        raw: *raw,
                        lossy: *lossy,
                    }
                }
                Err(err) => {
                    log::debug!("{err}, falling back to the conservative bound");
                    Self::NonUniformScale3DConservative {
                        raw: *raw,
                        lossy: *lossy,
                    }
                }
            },
            Domain::Circle => {
                for (which, transform) in
                    [(TransformSide::Raw, raw), (TransformSide::Lossy, lossy)]
                {
                    if !transform.is_planar(tolerances.planar) {
                        return Err(BoundError::NonPlanarTransform { which });
                    }
                }

                // the Z scale never acts on the circle
                match (
                    planar_uniform_scale(raw, tolerances.scale),
                    planar_uniform_scale(lossy, tolerances.scale),
                ) {
                    (Some(raw_scale), Some(lossy_scale))
                        if (raw_scale - lossy_scale).abs() <= tolerances.scale =>
                    {
                        let delta = compose_delta_with(
                            &with_scale(raw, raw_scale),
                            &with_scale(lossy, lossy_scale),
                            tolerances,
                        )?;
                        Self::RotationTranslationUniformScale(delta)
                    }
                    _ => Self::NonUniformScale2D {
                        raw: *raw,
                        lossy: *lossy,
                    },
                }
            }
        };

        log::debug!("{domain:?} error problem classified as {}", problem.mode_name());
        Ok(problem)
    }

    /// Compute the bound and its witness point.
    pub fn solve(&self, tolerances: &BoundTolerances) -> ErrorEstimate {
        match self {
            Self::RotationTranslationUniformScale(delta) => {
                let result = analytic_bound_with(delta, tolerances);
                ErrorEstimate {
                    bound: result.bound,
                    point: result.point,
                    kind: BoundKind::Exact,
                }
            }
            Self::NonUniformScale2D { raw, lossy } => {
                let (linear, offset) = planar_pair_linear(raw, lossy);
                let raw_scale = raw.planar_scale();

                let result = if offset == DVec2::ZERO
                    && raw_scale.x == raw_scale.y
                    && raw_scale.x != 0.0
                {
                    // lossy scale relative to a uniform raw scale
                    let mut result = scaled_circle_max_with(
                        lossy.planar_angle() - raw.planar_angle(),
                        lossy.scale.x / raw_scale.x,
                        lossy.scale.y / raw_scale.x,
                        tolerances,
                    );
                    result.bound *= raw_scale.x.abs();
                    result
                } else {
                    planar_affine_max_with(linear, offset, tolerances)
                };

                ErrorEstimate {
                    bound: result.bound,
                    point: result.point.extend(0.0),
                    kind: BoundKind::Exact,
                }
            }
            Self::NonUniformScale3DConservative { raw, lossy } => {
                let result = conservative_bound_with(raw, lossy, tolerances);
                ErrorEstimate {
                    bound: result.bound,
                    point: result.point,
                    kind: BoundKind::Conservative,
                }
            }
        }
    }

    fn mode_name(&self) -> &'static str {
        match self {
            Self::RotationTranslationUniformScale(_) => "rotation/translation with uniform scale",
            Self::NonUniformScale2D { .. } => "planar non-uniform scale",
            Self::NonUniformScale3DConservative { .. } => "conservative non-uniform scale",
        }
    }
}

/// Maximum error between `raw` and `lossy` over `domain`, with default tolerances.
///
/// Example:
///
/// ```
/// use qvv_bound::{estimate_error, BoundKind, Domain, Transform};
///
/// let raw = Transform::planar(0.0, [0.0, 0.0], [1.0, 1.0]);
/// let lossy = Transform::planar(-90.0, [0.0, 0.0], [3.0, 1.0]);
/// let estimate = estimate_error(&raw, &lossy, Domain::Circle)?;
/// assert_eq!(estimate.kind, BoundKind::Exact);
/// assert!((estimate.bound - (1.0 + 5f64.sqrt())).abs() < 1e-9);
/// # Ok::<(), qvv_bound::BoundError>(())
/// ```
///
/// # Errors
///
/// See [`ErrorProblem::classify`].
pub fn estimate_error(
    raw: &Transform,
    lossy: &Transform,
    domain: Domain,
) -> Result<ErrorEstimate, BoundError> {
    let tolerances = BoundTolerances::default();
    Ok(ErrorProblem::classify(raw, lossy, domain, &tolerances)?.solve(&tolerances))
}

fn planar_uniform_scale(transform: &Transform, tolerance: f64) -> Option<f64> {
    let scale = transform.planar_scale();
    ((scale.x - scale.y).abs() <= tolerance).then(|| 0.5 * (scale.x + scale.y))
}

fn with_scale(transform: &Transform, scale: f64) -> Transform {
    Transform {
        scale: DVec3::splat(scale),
        ..*transform
    }
}
