use glam::DVec3;

use crate::{DeltaTransform, Transform};

/// Distance between the images of `point` under two transforms.
///
/// NaN components in the inputs propagate to the result.
#[inline]
pub fn point_error(point: DVec3, transform_a: &Transform, transform_b: &Transform) -> f64 {
    transform_a
        .transform_point(point)
        .distance(transform_b.transform_point(point))
}

/// Distance between the raw and lossy images of `point`, through a composed delta.
///
/// Equal to [`point_error`] on the transforms the delta was composed from.
#[inline]
pub fn point_error_delta(point: DVec3, delta: &DeltaTransform) -> f64 {
    delta
        .transform_point(point)
        .distance(delta.raw_scale * point)
}

/// Distance a point travels under a single transform.
#[inline]
pub fn displacement_error(point: DVec3, transform: &Transform) -> f64 {
    transform.transform_point(point).distance(point)
}
