use thiserror::Error;

/// A single delta transform cannot represent the pair because of its scales.
///
/// This is a limitation of the QVV representation rather than a failure: with two
/// different non-uniform scales, neither `raw⁻¹ · lossy` nor `lossy⁻¹ · raw` has a
/// diagonal scale. Compare the two transforms point by point with
/// [`crate::point_error`], or bound them with [`crate::conservative_bound`].
#[derive(Debug, Clone, PartialEq, Error)]
#[error("cannot compose a delta from different non-uniform scales: raw {raw:?}, lossy {lossy:?}")]
pub struct UnsupportedScaleError {
    /// Scale of the raw transform.
    pub raw: [f64; 3],
    /// Scale of the lossy transform.
    pub lossy: [f64; 3],
}

/// Which transform of a raw/lossy pair an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformSide {
    /// The reference transform.
    Raw,
    /// The approximated transform.
    Lossy,
}

/// An error type for the bound dispatcher.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BoundError {
    /// The scales of the pair cannot be composed.
    #[error(transparent)]
    UnsupportedScale(#[from] UnsupportedScaleError),

    /// A circle domain was requested for a transform that leaves the XY plane.
    #[error("{which:?} transform is not planar: it must rotate about Z and not translate along Z")]
    NonPlanarTransform {
        /// The offending transform.
        which: TransformSide,
    },

    /// A transform carries NaN or infinite components.
    #[error("{which:?} transform has non-finite components")]
    NonFiniteInput {
        /// The offending transform.
        which: TransformSide,
    },
}
