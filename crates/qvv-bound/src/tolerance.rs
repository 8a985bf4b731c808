/// Numeric tolerances used by the bound solvers.
///
/// Every solver has a `*_with` variant taking these explicitly; the plain entry
/// points use [`BoundTolerances::default`].
#[derive(Debug, Clone)]
pub struct BoundTolerances {
    /// Largest component spread for a scale vector to count as uniform, and for two
    /// uniform scales to count as equal.
    pub scale: f64,
    /// Smallest length of a delta rotation's vector part for its axis to define an
    /// error plane. Also the fraction of the translation length under which its
    /// in-plane part has no direction.
    pub axis: f64,
    /// Squared length under which a normalized witness direction is treated as
    /// degenerate.
    pub degenerate_point: f64,
    /// Relative threshold under which a solver denominator is treated as zero.
    pub singularity: f64,
    /// Largest rotation x/y component and z translation for a transform to be planar.
    pub planar: f64,
}

impl Default for BoundTolerances {
    fn default() -> Self {
        Self {
            scale: 1e-6,
            axis: 1e-12,
            degenerate_point: 1e-4,
            singularity: 1e-12,
            planar: 1e-9,
        }
    }
}
