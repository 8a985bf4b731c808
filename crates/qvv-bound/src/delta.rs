use glam::{DQuat, DVec3};

use crate::transform::uniform_component;
use crate::{BoundTolerances, Transform, UnsupportedScaleError};

/// The lossy transform expressed in the frame of the raw transform.
///
/// The error of a point `p` only depends on this delta:
/// `|rotation * (lossy_scale * p) + translation - raw_scale * p|`, scales applied
/// per axis. The closed-form solvers need both scales uniform, see
/// [`DeltaTransform::uniform_scales`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeltaTransform {
    /// `conjugate(raw.rotation) * lossy.rotation`.
    pub rotation: DQuat,
    /// Lossy minus raw translation, rotated into the raw frame.
    pub translation: DVec3,
    /// Per-axis scale of the raw transform.
    pub raw_scale: DVec3,
    /// Per-axis scale of the lossy transform.
    pub lossy_scale: DVec3,
}

impl DeltaTransform {
    /// A delta with unit scale on both sides.
    pub fn from_rotation_translation(rotation: DQuat, translation: DVec3) -> Self {
        Self {
            rotation: rotation.normalize(),
            translation,
            raw_scale: DVec3::ONE,
            lossy_scale: DVec3::ONE,
        }
    }

    /// Same as [`DeltaTransform::from_rotation_translation`] with uniform scales.
    pub fn with_uniform_scales(
        rotation: DQuat,
        translation: DVec3,
        raw_scale: f64,
        lossy_scale: f64,
    ) -> Self {
        Self {
            raw_scale: DVec3::splat(raw_scale),
            lossy_scale: DVec3::splat(lossy_scale),
            ..Self::from_rotation_translation(rotation, translation)
        }
    }

    /// The raw and lossy scale factors, if both scales are uniform within `tolerance`.
    pub fn uniform_scales(&self, tolerance: f64) -> Option<(f64, f64)> {
        Some((
            uniform_component(self.raw_scale, tolerance)?,
            uniform_component(self.lossy_scale, tolerance)?,
        ))
    }

    /// The full rotation angle in radians, in `[0, 2π]`.
    #[inline]
    pub fn angle(&self) -> f64 {
        2.0 * self.rotation.w.clamp(-1.0, 1.0).acos()
    }

    /// Unit normal of the plane the delta rotation acts in.
    ///
    /// `None` when the delta rotation is the identity within `tolerance`.
    pub fn error_plane_normal(&self, tolerance: f64) -> Option<DVec3> {
        let axis = self.rotation.xyz();
        let length = axis.length();
        (length > tolerance).then(|| axis / length)
    }

    /// Where the raw point `point` lands under the lossy transform, in the raw frame.
    #[inline]
    pub fn transform_point(&self, point: DVec3) -> DVec3 {
        self.rotation * (self.lossy_scale * point) + self.translation
    }
}

/// Compose the delta between a raw and a lossy transform.
///
/// Succeeds when at least one of the two scales is uniform, or when both scales
/// match. Uniform scales may differ from each other and from one.
///
/// # Errors
///
/// [`UnsupportedScaleError`] when both scales are non-uniform and differ.
pub fn compose_delta(
    raw: &Transform,
    lossy: &Transform,
) -> Result<DeltaTransform, UnsupportedScaleError> {
    compose_delta_with(raw, lossy, &BoundTolerances::default())
}

/// [`compose_delta`] with explicit tolerances.
pub fn compose_delta_with(
    raw: &Transform,
    lossy: &Transform,
    tolerances: &BoundTolerances,
) -> Result<DeltaTransform, UnsupportedScaleError> {
    let tolerance = tolerances.scale;
    let one_side_uniform =
        raw.uniform_scale(tolerance).is_some() || lossy.uniform_scale(tolerance).is_some();
    let matching = (raw.scale - lossy.scale).abs().max_element() <= tolerance;
    if !one_side_uniform && !matching {
        return Err(UnsupportedScaleError {
            raw: raw.scale.to_array(),
            lossy: lossy.scale.to_array(),
        });
    }

    Ok(delta_between(raw, lossy))
}

/// The delta of any pair, without checking the scales.
pub(crate) fn delta_between(raw: &Transform, lossy: &Transform) -> DeltaTransform {
    let inv_raw_rotation = raw.rotation.conjugate();

    DeltaTransform {
        rotation: (inv_raw_rotation * lossy.rotation).normalize(),
        translation: inv_raw_rotation * (lossy.translation - raw.translation),
        raw_scale: raw.scale,
        lossy_scale: lossy.scale,
    }
}

/// Normal of the plane in which the raw and lossy rotations disagree.
///
/// Swapping the two transforms flips the normal. `None` when both rotations match.
pub fn error_plane_normal(raw: &Transform, lossy: &Transform) -> Option<DVec3> {
    let delta = raw.rotation.conjugate() * lossy.rotation;
    let axis = delta.xyz();
    let length = axis.length();
    (length > BoundTolerances::default().axis).then(|| axis / length)
}
