use crate::analytic::{uniform_scale_bound, UniformScales};
use crate::delta::delta_between;
use crate::{point_error_delta, BoundTolerances, DeltaTransform, ErrorBound, Transform};

/// Upper bound on the error of two transforms with arbitrary 3D scales.
///
/// In the raw frame the error is at most `|R S_l p - S_l p + t| + |(S_l - S_r) p|`.
/// `S_l p` lies inside the sphere whose radius is the largest absolute scale
/// component of either side, so the first term is at most the rigid bound on that
/// sphere. The second is at most the largest scale component difference. The bound
/// is their sum.
///
/// The bound is never below the true maximum but is usually not tight; the returned
/// point is the witness of the rigid part and does not reach `bound` in general.
/// With equal uniform scales it equals [`crate::analytic_bound`].
pub fn conservative_bound(raw: &Transform, lossy: &Transform) -> ErrorBound {
    conservative_bound_with(raw, lossy, &BoundTolerances::default())
}

/// [`conservative_bound`] with explicit tolerances.
pub fn conservative_bound_with(
    raw: &Transform,
    lossy: &Transform,
    tolerances: &BoundTolerances,
) -> ErrorBound {
    conservative_bound_delta_with(&delta_between(raw, lossy), tolerances)
}

/// [`conservative_bound`] on a delta with any scales.
pub(crate) fn conservative_bound_delta_with(
    delta: &DeltaTransform,
    tolerances: &BoundTolerances,
) -> ErrorBound {
    let radius = delta
        .raw_scale
        .abs()
        .max_element()
        .max(delta.lossy_scale.abs().max_element());
    let rigid = UniformScales {
        raw: radius,
        lossy: radius,
    };

    let rigid_bound = uniform_scale_bound(delta, rigid, tolerances);
    let scale_gap = (delta.lossy_scale - delta.raw_scale).abs().max_element();
    log::debug!(
        "conservative bound: radius={radius} rigid={} scale_gap={scale_gap}",
        rigid_bound.bound
    );

    // the rigid witness ignores the scales, keep it or its antipode, whichever errs more
    let point = rigid_bound.point;
    let point = if point_error_delta(-point, delta) > point_error_delta(point, delta) {
        -point
    } else {
        point
    };

    ErrorBound {
        bound: rigid_bound.bound + scale_gap,
        point,
    }
}
