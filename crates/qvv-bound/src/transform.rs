use glam::{DQuat, DVec2, DVec3};

/// A QVV transform: scale, then rotate, then translate.
///
/// The scale is a per-axis multiplier and may be negative (reflection) or zero
/// (degenerate). The rotation is kept normalized.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// Unit quaternion.
    pub rotation: DQuat,
    /// Translation applied last.
    pub translation: DVec3,
    /// Per-axis scale applied first.
    pub scale: DVec3,
}

impl Transform {
    /// The identity transform.
    pub const IDENTITY: Self = Self {
        rotation: DQuat::IDENTITY,
        translation: DVec3::ZERO,
        scale: DVec3::ONE,
    };

    /// Create a transform, renormalizing the rotation.
    ///
    /// A zero-length quaternion carries no rotation and is replaced by the identity.
    /// A non-finite one is kept as is, so that [`Transform::is_finite`] reports it.
    pub fn new(rotation: DQuat, translation: DVec3, scale: DVec3) -> Self {
        let rotation = if !rotation.is_finite() {
            rotation
        } else if rotation.length() == 0.0 {
            log::debug!("zero-length rotation replaced by identity");
            DQuat::IDENTITY
        } else {
            rotation.normalize()
        };

        Self {
            rotation,
            translation,
            scale,
        }
    }

    /// Create a transform from an axis given by two angles and a rotation angle.
    ///
    /// The rotation axis is +Z turned by `axis_yaw_deg` about Y, then by
    /// `axis_pitch_deg` about X. All angles are in degrees.
    ///
    /// # Arguments
    ///
    /// * `axis_yaw_deg` - Yaw of the rotation axis.
    /// * `axis_pitch_deg` - Pitch of the rotation axis.
    /// * `angle_deg` - Rotation angle about the axis.
    /// * `translation` - Translation.
    /// * `scale` - Per-axis scale.
    ///
    /// Example:
    ///
    /// ```
    /// use qvv_bound::Transform;
    ///
    /// let t = Transform::from_axis_angle_deg(0.0, 0.0, 90.0, [1.0, 0.0, 0.0], [1.0; 3]);
    /// assert!((t.transform_point([1.0, 0.0, 0.0].into()).y - 1.0).abs() < 1e-12);
    /// ```
    pub fn from_axis_angle_deg(
        axis_yaw_deg: f64,
        axis_pitch_deg: f64,
        angle_deg: f64,
        translation: [f64; 3],
        scale: [f64; 3],
    ) -> Self {
        let (sin_yaw, cos_yaw) = axis_yaw_deg.to_radians().sin_cos();
        let (sin_pitch, cos_pitch) = axis_pitch_deg.to_radians().sin_cos();
        let axis = DVec3::new(sin_yaw, -cos_yaw * sin_pitch, cos_yaw * cos_pitch);

        Self::new(
            DQuat::from_axis_angle(axis, angle_deg.to_radians()),
            DVec3::from_array(translation),
            DVec3::from_array(scale),
        )
    }

    /// Create a transform of the XY plane: rotation about Z, no Z translation, unit Z scale.
    pub fn planar(angle_deg: f64, translation: [f64; 2], scale: [f64; 2]) -> Self {
        Self::new(
            DQuat::from_rotation_z(angle_deg.to_radians()),
            DVec3::new(translation[0], translation[1], 0.0),
            DVec3::new(scale[0], scale[1], 1.0),
        )
    }

    /// Apply the transform to a point.
    #[inline]
    pub fn transform_point(&self, point: DVec3) -> DVec3 {
        self.rotation * (point * self.scale) + self.translation
    }

    /// The common scale factor, if all three components agree within `tolerance`.
    pub fn uniform_scale(&self, tolerance: f64) -> Option<f64> {
        uniform_component(self.scale, tolerance)
    }

    /// Largest absolute scale component.
    #[inline]
    pub fn max_abs_scale(&self) -> f64 {
        self.scale.abs().max_element()
    }

    /// Whether the transform maps the XY plane onto itself.
    pub fn is_planar(&self, tolerance: f64) -> bool {
        self.rotation.x.abs() <= tolerance
            && self.rotation.y.abs() <= tolerance
            && self.translation.z.abs() <= tolerance
    }

    /// Rotation angle about +Z in radians. Only meaningful for planar transforms.
    #[inline]
    pub fn planar_angle(&self) -> f64 {
        2.0 * self.rotation.z.atan2(self.rotation.w)
    }

    /// XY components of the scale.
    #[inline]
    pub fn planar_scale(&self) -> DVec2 {
        self.scale.truncate()
    }

    /// Whether every component is finite.
    pub fn is_finite(&self) -> bool {
        self.rotation.is_finite() && self.translation.is_finite() && self.scale.is_finite()
    }
}

/// Mean of `scale` when its components agree within `tolerance`.
pub(crate) fn uniform_component(scale: DVec3, tolerance: f64) -> Option<f64> {
    let spread = scale.max_element() - scale.min_element();
    (spread <= tolerance).then(|| scale.element_sum() / 3.0)
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_new_renormalizes() {
        let t = Transform::new(DQuat::from_xyzw(0.0, 0.0, 2.0, 2.0), DVec3::ZERO, DVec3::ONE);
        assert_relative_eq!(t.rotation.length(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(t.planar_angle(), std::f64::consts::FRAC_PI_2, epsilon = 1e-12);
    }

    #[test]
    fn test_new_zero_quaternion() {
        let t = Transform::new(DQuat::from_xyzw(0.0, 0.0, 0.0, 0.0), DVec3::ZERO, DVec3::ONE);
        assert_eq!(t.rotation, DQuat::IDENTITY);
    }

    #[test]
    fn test_new_keeps_non_finite_quaternion() {
        let t = Transform::from_axis_angle_deg(0.0, 0.0, f64::NAN, [0.0; 3], [1.0; 3]);
        assert!(!t.rotation.is_finite());
        assert!(!t.is_finite());

        let t = Transform::new(
            DQuat::from_xyzw(0.0, f64::INFINITY, 0.0, 1.0),
            DVec3::ZERO,
            DVec3::ONE,
        );
        assert!(!t.is_finite());
    }

    #[test]
    fn test_axis_from_yaw_pitch() {
        // yaw 90 turns +Z onto +X
        let t = Transform::from_axis_angle_deg(90.0, 0.0, 90.0, [0.0; 3], [1.0; 3]);
        let p = t.transform_point(DVec3::Y);
        assert_relative_eq!(p.x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(p.y, 0.0, epsilon = 1e-12);
        assert_relative_eq!(p.z, 1.0, epsilon = 1e-12);

        // pitch 90 turns +Z onto -Y
        let t = Transform::from_axis_angle_deg(0.0, 90.0, 90.0, [0.0; 3], [1.0; 3]);
        let p = t.transform_point(DVec3::Z);
        assert_relative_eq!(p.x, -1.0, epsilon = 1e-12);
        assert_relative_eq!(p.y, 0.0, epsilon = 1e-12);
        assert_relative_eq!(p.z, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_transform_point_order() {
        // scale, then rotate, then translate
        let t = Transform::planar(90.0, [1.0, 2.0], [3.0, 1.0]);
        let p = t.transform_point(DVec3::X);
        assert_relative_eq!(p.x, 1.0, epsilon = 1e-12);
        assert_relative_eq!(p.y, 5.0, epsilon = 1e-12);
        assert_relative_eq!(p.z, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_uniform_scale() {
        let t = Transform::new(DQuat::IDENTITY, DVec3::ZERO, DVec3::splat(-2.0));
        assert_eq!(t.uniform_scale(1e-6), Some(-2.0));
        assert_eq!(t.max_abs_scale(), 2.0);

        let t = Transform::new(DQuat::IDENTITY, DVec3::ZERO, DVec3::new(1.0, 1.0, 1.1));
        assert_eq!(t.uniform_scale(1e-6), None);
    }

    #[test]
    fn test_planar() {
        let t = Transform::planar(-30.0, [1.0, 0.5], [2.0, 0.5]);
        assert!(t.is_planar(1e-12));
        assert_relative_eq!(t.planar_angle(), -30f64.to_radians(), epsilon = 1e-12);
        assert_eq!(t.planar_scale(), DVec2::new(2.0, 0.5));

        let t = Transform::from_axis_angle_deg(10.0, 0.0, 45.0, [0.0; 3], [1.0; 3]);
        assert!(!t.is_planar(1e-9));
    }

    #[test]
    fn test_is_finite() {
        let mut t = Transform::IDENTITY;
        assert!(t.is_finite());
        t.translation.x = f64::NAN;
        assert!(!t.is_finite());
    }
}
