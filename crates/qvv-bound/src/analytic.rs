use glam::{DMat2, DQuat, DVec2, DVec3};

use crate::conservative::conservative_bound_delta_with;
use crate::{planar_affine_max_with, BoundTolerances, DeltaTransform};

/// Maximum error over the unit sphere and the point reaching it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ErrorBound {
    /// Largest distance between the raw and lossy images of a unit point.
    pub bound: f64,
    /// A unit point at which the distance equals (or closely approaches) `bound`.
    pub point: DVec3,
}

/// Exact maximum error of a delta transform over the unit sphere.
///
/// With equal scales `s` the rotation moves a point of the error plane along a chord
/// of length `2 |s| sin(θ / 2)`, which adds to the in-plane part of the translation.
/// The part of the translation along the plane normal is orthogonal to both, so
///
/// ```text
/// bound = sqrt(along^2 + (in_plane + chord)^2)
/// ```
///
/// The witness is the plane point whose chord is parallel to the in-plane
/// translation. When the in-plane part is negligible next to the translation every
/// plane point is a maximizer and a fixed fallback direction is used instead.
///
/// With different uniform scales the problem splits into the normal axis and one
/// plane direction and is solved exactly with [`crate::planar_affine_max`].
///
/// A delta whose scales are not both uniform has no closed form here; it gets the
/// upper bound of [`crate::conservative_bound`] instead.
///
/// NaN components in the delta propagate to the result.
///
/// Example:
///
/// ```
/// use qvv_bound::{analytic_bound, DQuat, DVec3, DeltaTransform};
///
/// let delta = DeltaTransform::from_rotation_translation(
///     DQuat::from_rotation_z(90f64.to_radians()),
///     DVec3::ZERO,
/// );
/// let result = analytic_bound(&delta);
/// assert!((result.bound - 2f64.sqrt()).abs() < 1e-12);
/// ```
pub fn analytic_bound(delta: &DeltaTransform) -> ErrorBound {
    analytic_bound_with(delta, &BoundTolerances::default())
}

/// [`analytic_bound`] with explicit tolerances.
pub fn analytic_bound_with(delta: &DeltaTransform, tolerances: &BoundTolerances) -> ErrorBound {
    let Some((raw_scale, lossy_scale)) = delta.uniform_scales(tolerances.scale) else {
        log::debug!("delta scales are not uniform, using the conservative bound");
        return conservative_bound_delta_with(delta, tolerances);
    };
    uniform_scale_bound(
        delta,
        UniformScales {
            raw: raw_scale,
            lossy: lossy_scale,
        },
        tolerances,
    )
}

/// [`analytic_bound`] of the rotation and translation of `delta`, with the scales
/// in `scales` in place of its own.
pub(crate) fn uniform_scale_bound(
    delta: &DeltaTransform,
    scales: UniformScales,
    tolerances: &BoundTolerances,
) -> ErrorBound {
    // an identity delta has no error plane; any plane through the origin works
    let normal = delta
        .error_plane_normal(tolerances.axis)
        .unwrap_or_else(|| {
            log::debug!("delta rotation is the identity, using +Z as the error plane normal");
            DVec3::Z
        });

    if (scales.lossy - scales.raw).abs() <= tolerances.scale {
        equal_scale_bound(delta, scales, normal, tolerances)
    } else {
        differing_scale_bound(delta, scales, normal, tolerances)
    }
}

/// Uniform raw and lossy scale factors.
#[derive(Debug, Clone, Copy)]
pub(crate) struct UniformScales {
    pub(crate) raw: f64,
    pub(crate) lossy: f64,
}

/// Chord swept by a point at `radius` under a rotation with scalar part `w`.
#[inline]
fn rotation_chord(w: f64, radius: f64) -> f64 {
    2.0 * (radius * radius - (w * radius).powi(2)).max(0.0).sqrt()
}

/// Unit direction of an in-plane vector, `None` when it is negligible next to the
/// translation it was taken from.
fn in_plane_direction(
    vector: DVec3,
    translation: DVec3,
    tolerances: &BoundTolerances,
) -> Option<DVec3> {
    let direction = vector.normalize_or_zero();
    let negligible = vector.length() <= tolerances.axis * translation.length()
        || direction.length_squared() < tolerances.degenerate_point;
    (!negligible).then_some(direction)
}

fn equal_scale_bound(
    delta: &DeltaTransform,
    scales: UniformScales,
    normal: DVec3,
    tolerances: &BoundTolerances,
) -> ErrorBound {
    let radius = scales.lossy.abs().max(scales.raw.abs());
    let chord = rotation_chord(delta.rotation.w, radius);

    let translation = delta.translation;
    let along = translation.dot(normal);
    let in_plane = (translation.length_squared() - along * along).max(0.0).sqrt();
    let inner = in_plane + chord;
    let bound = (along * along + inner * inner).sqrt();

    // t x n is the in-plane translation turned by -90 degrees; turning it back by
    // half the rotation angle lines its chord up with the translation
    let direction = in_plane_direction(translation.cross(normal), translation, tolerances)
        .unwrap_or_else(|| {
            log::debug!(
                "translation is parallel to the error plane normal, using fallback witness"
            );
            fallback_in_plane(normal)
        });
    let half_turn = DQuat::from_axis_angle(normal, -0.5 * delta.angle());
    let mut point = half_turn * direction;

    // a negative scale mirrors the sphere through the origin
    if scales.lossy < 0.0 {
        point = -point;
    }

    ErrorBound { bound, point }
}

fn differing_scale_bound(
    delta: &DeltaTransform,
    scales: UniformScales,
    normal: DVec3,
    tolerances: &BoundTolerances,
) -> ErrorBound {
    let (sin_theta, cos_theta) = delta.angle().sin_cos();

    // a plane direction u maps to gain * (u turned by phase) about the normal
    let rotated = DVec2::new(
        scales.lossy * cos_theta - scales.raw,
        scales.lossy * sin_theta,
    );
    let gain = rotated.length();
    let phase = rotated.y.atan2(rotated.x);
    let normal_gain = scales.lossy - scales.raw;

    let translation = delta.translation;
    let along = translation.dot(normal);
    let in_plane_vec = translation - along * normal;
    let in_plane = in_plane_vec.length();

    // p = cos(psi) u + sin(psi) n with u chosen to align with the in-plane translation
    let reduced = planar_affine_max_with(
        DMat2::from_diagonal(DVec2::new(gain, normal_gain)),
        DVec2::new(in_plane, along),
        tolerances,
    );

    let in_plane_dir = in_plane_direction(in_plane_vec, translation, tolerances)
        .unwrap_or_else(|| {
            log::debug!("translation has no in-plane part, using fallback witness");
            fallback_in_plane(normal)
        });
    let direction = DQuat::from_axis_angle(normal, -phase) * in_plane_dir;

    let (cos_psi, sin_psi) = (reduced.point.x.abs(), reduced.point.y);
    ErrorBound {
        bound: reduced.bound,
        point: cos_psi * direction + sin_psi * normal,
    }
}

/// A fixed unit vector in the plane orthogonal to `normal`.
fn fallback_in_plane(normal: DVec3) -> DVec3 {
    let mut candidate = DVec3::new(0.2, 0.0, 0.7).normalize();
    if candidate.dot(normal).abs() > 0.9 {
        candidate = DVec3::new(0.0, 0.7, 0.3).normalize();
    }
    (candidate - candidate.dot(normal) * normal).normalize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampling::fibonacci_sphere;
    use crate::{compose_delta, point_error_delta, Transform};
    use approx::assert_relative_eq;

    fn delta_of(
        axis: DVec3,
        angle_deg: f64,
        translation: DVec3,
        raw_scale: f64,
        lossy_scale: f64,
    ) -> DeltaTransform {
        DeltaTransform::with_uniform_scales(
            DQuat::from_axis_angle(axis.normalize(), angle_deg.to_radians()),
            translation,
            raw_scale,
            lossy_scale,
        )
    }

    fn sampled_max(delta: &DeltaTransform, n: usize) -> f64 {
        fibonacci_sphere(n)
            .into_iter()
            .map(|p| point_error_delta(p, delta))
            .fold(0.0, f64::max)
    }

    #[test]
    fn test_rotation_only_reduction() {
        let delta = delta_of(DVec3::Y, 90.0, DVec3::ZERO, 1.0, 1.0);
        let result = analytic_bound(&delta);
        let w = delta.rotation.w;
        assert_relative_eq!(result.bound, 2.0 * (1.0 - w * w).sqrt(), epsilon = 1e-6);
        assert_relative_eq!(result.bound, 1.4142135, epsilon = 1e-6);
        assert_relative_eq!(result.point.length(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(point_error_delta(result.point, &delta), result.bound, epsilon = 1e-9);
    }

    #[test]
    fn test_rotation_only_scaled() {
        let delta = delta_of(DVec3::new(1.0, 2.0, -0.5), 40.0, DVec3::ZERO, 2.5, 2.5);
        let result = analytic_bound(&delta);
        assert_relative_eq!(
            result.bound,
            2.0 * 2.5 * 20f64.to_radians().sin(),
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_translation_only_reduction() {
        let translation = DVec3::new(0.3, -1.2, 2.0);
        let delta = DeltaTransform::from_rotation_translation(DQuat::IDENTITY, translation);
        let result = analytic_bound(&delta);
        assert_relative_eq!(result.bound, translation.length(), epsilon = 1e-12);
        assert!(result.point.is_finite());
        assert_relative_eq!(result.point.length(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_witness_consistency() {
        let cases = [
            delta_of(DVec3::Z, 30.0, DVec3::new(1.0, 0.5, 0.0), 1.0, 1.0),
            delta_of(DVec3::new(0.3, 1.0, 0.2), 128.6, DVec3::new(2.0, 5.0, 0.0), 1.0, 1.0),
            delta_of(DVec3::new(-1.0, 0.2, 0.7), 200.0, DVec3::new(0.1, 0.2, 0.3), 1.7, 1.7),
            delta_of(DVec3::X, 10.0, DVec3::new(0.5, 0.5, -0.25), -2.0, -2.0),
        ];
        for delta in cases.iter() {
            let result = analytic_bound(delta);
            assert_relative_eq!(result.point.length(), 1.0, epsilon = 1e-9);
            assert_relative_eq!(
                point_error_delta(result.point, delta),
                result.bound,
                epsilon = 1e-4
            );
        }
    }

    #[test]
    fn test_bound_matches_dense_sampling() {
        let cases = [
            delta_of(DVec3::new(0.3, 1.0, 0.2), 128.6, DVec3::new(2.0, 5.0, 0.0), 1.0, 1.0),
            delta_of(DVec3::new(1.0, -1.0, 0.4), 75.0, DVec3::new(0.0, 0.4, 1.0), 0.5, 0.5),
        ];
        for delta in cases.iter() {
            let result = analytic_bound(delta);
            let sampled = sampled_max(delta, 100_000);
            assert!(result.bound >= sampled - 1e-9);
            assert_relative_eq!(result.bound, sampled, max_relative = 1e-3);
        }
    }

    #[test]
    fn test_translation_along_normal_is_degenerate() {
        // chord and translation are orthogonal, every plane point is a maximizer
        let delta = delta_of(DVec3::Z, 60.0, DVec3::new(0.0, 0.0, 3.0), 1.0, 1.0);
        let result = analytic_bound(&delta);
        assert_relative_eq!(result.bound, (9.0f64 + 1.0).sqrt(), epsilon = 1e-9);
        assert_relative_eq!(result.point.z, 0.0, epsilon = 1e-12);
        assert_relative_eq!(point_error_delta(result.point, &delta), result.bound, epsilon = 1e-9);
    }

    #[test]
    fn test_witness_with_small_in_plane_translation() {
        // a quarter turn about Z with a translation of 0.009 along X
        let delta = delta_of(DVec3::Z, 90.0, DVec3::new(0.009, 0.0, 0.0), 1.0, 1.0);
        let result = analytic_bound(&delta);
        assert_relative_eq!(result.bound, 2f64.sqrt() + 0.009, epsilon = 1e-12);
        assert_relative_eq!(point_error_delta(result.point, &delta), result.bound, epsilon = 1e-9);

        for in_plane in [1e-4, 1e-3, 3e-3, 1e-2] {
            let cases = [
                delta_of(DVec3::Z, 90.0, DVec3::new(0.0, in_plane, 0.5), 1.0, 1.0),
                delta_of(DVec3::new(1.0, 1.0, 0.0), 45.0, DVec3::new(0.0, 0.0, in_plane), 2.0, 2.0),
                delta_of(DVec3::Z, 120.0, DVec3::new(in_plane, 0.0, 0.0), 1.0, 1.5),
            ];
            for delta in cases.iter() {
                let result = analytic_bound(delta);
                assert_relative_eq!(
                    point_error_delta(result.point, delta),
                    result.bound,
                    epsilon = 1e-9
                );
            }
        }
    }

    #[test]
    fn test_non_uniform_delta_is_bounded() {
        let delta = DeltaTransform {
            lossy_scale: DVec3::new(1.0, 2.0, 1.0),
            ..delta_of(DVec3::Z, 30.0, DVec3::new(0.2, 0.0, 0.1), 1.0, 1.0)
        };
        let result = analytic_bound(&delta);
        assert!(result.bound >= sampled_max(&delta, 20_000));
        assert_relative_eq!(result.point.length(), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_deterministic() {
        let delta = delta_of(DVec3::new(0.2, 0.4, 1.0), 33.0, DVec3::new(1.0, 2.0, 3.0), 1.0, 1.0);
        assert_eq!(analytic_bound(&delta), analytic_bound(&delta));

        let degenerate = delta_of(DVec3::Z, 0.0, DVec3::ZERO, 1.0, 1.0);
        let first = analytic_bound(&degenerate);
        assert_eq!(first, analytic_bound(&degenerate));
        assert_eq!(first.bound, 0.0);
        assert!(first.point.is_finite());
    }

    #[test]
    fn test_differing_scales() {
        let cases = [
            delta_of(DVec3::Z, 0.0, DVec3::ZERO, 1.0, 2.0),
            delta_of(DVec3::new(0.3, 1.0, 0.2), 50.0, DVec3::new(0.5, -0.2, 0.1), 1.0, 1.5),
            delta_of(DVec3::new(1.0, 0.0, 1.0), 160.0, DVec3::new(0.0, 2.0, 0.0), 2.0, -0.5),
            delta_of(DVec3::Y, 90.0, DVec3::new(0.0, 0.0, 0.0), 1.0, 0.0),
        ];
        for delta in cases.iter() {
            let result = analytic_bound(delta);
            let sampled = sampled_max(delta, 100_000);
            assert!(result.bound >= sampled - 1e-9);
            assert_relative_eq!(result.bound, sampled, max_relative = 1e-3);
            assert_relative_eq!(result.point.length(), 1.0, epsilon = 1e-9);
            assert_relative_eq!(
                point_error_delta(result.point, delta),
                result.bound,
                epsilon = 1e-6
            );
        }
    }

    #[test]
    fn test_pure_scale_difference() {
        let delta = delta_of(DVec3::Z, 0.0, DVec3::ZERO, 1.0, 3.0);
        assert_relative_eq!(analytic_bound(&delta).bound, 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_composed_from_transforms() -> Result<(), Box<dyn std::error::Error>> {
        let raw = Transform::from_axis_angle_deg(0.0, 0.0, 20.0, [0.0; 3], [1.0; 3]);
        let lossy = Transform::from_axis_angle_deg(61.4, 0.0, 128.6, [2.0, 5.0, 0.0], [1.0; 3]);
        let delta = compose_delta(&raw, &lossy)?;
        let result = analytic_bound(&delta);
        assert_relative_eq!(
            crate::point_error(result.point, &raw, &lossy),
            result.bound,
            epsilon = 1e-4
        );
        Ok(())
    }
}
