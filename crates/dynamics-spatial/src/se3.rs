//! Defines the **special Euclidean group** SE(3) and the frame-tagged [`Transform3D`]
//! built on top of it.
//!
//! [`RawTransform`] is the frame-anonymous rotation+translation engine (ported from the
//! underlying isometry math); [`Transform3D`] pairs it with the `from`/`to` frames the
//! rest of the crate checks against each other.

use std::fmt::Display;

use crate::{
    frame::{assert_same_frame, CartesianFrame3D},
    motion::{SpatialMotion, SpatialRotation},
    so3::SO3,
    vector3d::Vector3D,
};
use nalgebra::{IsometryMatrix3, Matrix3, Matrix6, Translation3};

/// Frame-anonymous rotation + translation pair.
#[derive(Clone, Debug, Copy, PartialEq, Default)]
pub struct RawTransform(pub(crate) IsometryMatrix3<f64>);

impl RawTransform {
    /// Creates a new transform from a rotation (given as axis-angle) and a translation.
    #[must_use]
    pub fn new(translation: Vector3D, axis_angle: Vector3D) -> Self {
        let rotation = SpatialRotation::from_axis_angle(&axis_angle, axis_angle.norm());
        RawTransform::from_parts(translation, rotation)
    }

    /// Creates a new transform from a rotation and a translation.
    #[must_use]
    pub fn from_parts(translation: Vector3D, rotation: SpatialRotation) -> Self {
        RawTransform(IsometryMatrix3::from_parts(
            Translation3::from(translation.0),
            rotation.0,
        ))
    }

    /// Identity transform, with $R = I_3$ and $t = 0_3$.
    #[must_use]
    pub fn identity() -> Self {
        RawTransform(IsometryMatrix3::identity())
    }

    /// Returns the inverse transform.
    #[must_use]
    pub fn inverse(&self) -> Self {
        RawTransform(self.0.inverse())
    }

    /// Returns the translation component.
    #[must_use]
    pub fn translation(&self) -> Vector3D {
        Vector3D(self.0.translation.vector)
    }

    /// Returns the rotation component.
    #[must_use]
    pub fn rotation(&self) -> SpatialRotation {
        SpatialRotation(self.0.rotation)
    }

    /// Computes the motion action matrix:
    /// $$\begin{bmatrix}R & [t]_X R \\\\ 0 & R\end{bmatrix}$$
    #[must_use]
    pub fn action_matrix(&self) -> Matrix6<f64> {
        let r = self.rotation().matrix();
        let t = self.translation().0;
        let mut action_matrix = Matrix6::zeros();
        action_matrix
            .fixed_view_mut::<3, 3>(0, 0)
            .copy_from(&r.transpose());
        action_matrix
            .fixed_view_mut::<3, 3>(3, 3)
            .copy_from(&r.transpose());

        let skew_t = Matrix3::new(0.0, -t[2], t[1], t[2], 0.0, -t[0], -t[1], t[0], 0.0);

        action_matrix
            .fixed_view_mut::<3, 3>(3, 0)
            .copy_from(&(skew_t * r).transpose());
        action_matrix
    }

    /// Computes the dual (force) action matrix:
    /// $$\begin{bmatrix}R & 0 \\\\ [t]_X R & R\end{bmatrix}$$
    #[must_use]
    pub fn dual_matrix(&self) -> Matrix6<f64> {
        let r = self.rotation().matrix();
        let t = self.translation().0;
        let mut action_matrix = Matrix6::zeros();
        action_matrix
            .fixed_view_mut::<3, 3>(0, 0)
            .copy_from(&r.transpose());
        action_matrix
            .fixed_view_mut::<3, 3>(3, 3)
            .copy_from(&r.transpose());

        let skew_t = Matrix3::new(0.0, -t[2], t[1], t[2], 0.0, -t[0], -t[1], t[0], 0.0);

        action_matrix
            .fixed_view_mut::<3, 3>(0, 3)
            .copy_from(&(skew_t * r).transpose());
        action_matrix
    }
}

impl RawTransform {
    /// The SE(3) exponential map: the transform reached by flowing along the constant
    /// body-frame twist `xi` for unit time (Murray, Li & Sastry, eq. 2.36).
    #[must_use]
    pub fn exp(xi: &SpatialMotion) -> Self {
        let w = xi.rotation();
        let v = xi.translation();
        let theta = w.norm();
        let w_hat = SO3::from_vector3d(&w).0;

        let (a, b, c) = if theta < 1e-10 {
            (1.0 - theta * theta / 6.0, 0.5 - theta * theta / 24.0, 1.0 / 6.0 - theta * theta / 120.0)
        } else {
            (theta.sin() / theta, (1.0 - theta.cos()) / (theta * theta), (theta - theta.sin()) / theta.powi(3))
        };

        let rotation_matrix = Matrix3::identity() + a * w_hat + b * (w_hat * w_hat);
        let v_matrix = Matrix3::identity() + b * w_hat + c * (w_hat * w_hat);
        let translation = Vector3D(v_matrix * v.0);

        RawTransform(IsometryMatrix3::from_parts(
            Translation3::from(translation.0),
            nalgebra::Rotation3::from_matrix_unchecked(rotation_matrix),
        ))
    }

    /// The SE(3) logarithm map, inverse of [`RawTransform::exp`]: the constant
    /// body-frame twist that, flowed for unit time from the identity, reaches `self`.
    #[must_use]
    pub fn log(&self) -> SpatialMotion {
        let r = self.rotation().matrix();
        let p = self.translation();

        let cos_theta = ((r.trace() - 1.0) / 2.0).clamp(-1.0, 1.0);
        let theta = cos_theta.acos();

        let (w, v_inv_p) = if theta < 1e-10 {
            let w_hat = (r - r.transpose()) * 0.5;
            (Vector3D::new(w_hat[(2, 1)], w_hat[(0, 2)], w_hat[(1, 0)]), p)
        } else {
            let w_hat = (r - r.transpose()) * (theta / (2.0 * theta.sin()));
            let w = Vector3D::new(w_hat[(2, 1)], w_hat[(0, 2)], w_hat[(1, 0)]);
            let coeff = 1.0 / (theta * theta) - (1.0 + theta.cos()) / (2.0 * theta * theta.sin());
            let v_inv = Matrix3::identity() - 0.5 * w_hat + coeff * (w_hat * w_hat);
            (w, Vector3D(v_inv * p.0))
        };

        SpatialMotion::from_parts(v_inv_p, w)
    }
}

impl std::ops::Mul for RawTransform {
    type Output = RawTransform;

    fn mul(self, rhs: Self) -> Self::Output {
        RawTransform(self.0 * rhs.0)
    }
}

impl std::ops::Mul<&RawTransform> for &RawTransform {
    type Output = RawTransform;

    fn mul(self, rhs: &RawTransform) -> Self::Output {
        RawTransform(self.0 * rhs.0)
    }
}

impl Display for RawTransform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let r = self.0.rotation.matrix();

        writeln!(f, "SE3: R=┌                            ┐  t=┌          ┐")?;
        for i in 0..3 {
            writeln!(
                f,
                "       │ {:>+8.5} {:>+8.5} {:>+8.5} │    │ {:>+8.5} │",
                r[(i, 0)],
                r[(i, 1)],
                r[(i, 2)],
                self.0.translation.vector[i]
            )?;
        }
        writeln!(f, "       └                            ┘    └          ┘")?;
        Ok(())
    }
}

/// Trait for quantities an [`RawTransform`] can act on (via the adjoint representation).
pub trait ActSE3 {
    /// Applies the transform to the object, re-expressing it in the transform's target frame.
    fn act(&self, t: &RawTransform) -> Self;

    /// Applies the inverse transform.
    fn act_inv(&self, t: &RawTransform) -> Self;
}

impl RawTransform {
    pub fn act<T: ActSE3>(&self, obj: &T) -> T {
        obj.act(self)
    }

    pub fn act_inv<T: ActSE3>(&self, obj: &T) -> T {
        obj.act_inv(self)
    }
}

/// A rigid transform between two [`CartesianFrame3D`]s: `to = self * from`.
///
/// Composing two transforms requires the inner frame of the left operand to match the
/// outer frame of the right operand (checked via [`assert_same_frame`]).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform3D {
    from: CartesianFrame3D,
    to: CartesianFrame3D,
    raw: RawTransform,
}

impl Transform3D {
    /// Builds a transform expressing points/vectors given in `from` into `to`.
    #[must_use]
    pub fn new(from: CartesianFrame3D, to: CartesianFrame3D, translation: Vector3D, rotation: SpatialRotation) -> Self {
        Self {
            from,
            to,
            raw: RawTransform::from_parts(translation, rotation),
        }
    }

    /// The identity transform from a frame to itself.
    #[must_use]
    pub fn identity(frame: CartesianFrame3D) -> Self {
        Self {
            from: frame,
            to: frame,
            raw: RawTransform::identity(),
        }
    }

    #[must_use]
    pub fn from_frame(&self) -> CartesianFrame3D {
        self.from
    }

    #[must_use]
    pub fn to_frame(&self) -> CartesianFrame3D {
        self.to
    }

    #[must_use]
    pub fn translation(&self) -> Vector3D {
        self.raw.translation()
    }

    #[must_use]
    pub fn rotation(&self) -> SpatialRotation {
        self.raw.rotation()
    }

    #[must_use]
    pub fn raw(&self) -> &RawTransform {
        &self.raw
    }

    /// Returns the inverse transform, from `to` back to `from`.
    #[must_use]
    pub fn inverse(&self) -> Self {
        Self {
            from: self.to,
            to: self.from,
            raw: self.raw.inverse(),
        }
    }

    /// Composes `self` (from -> to) with `rhs` (rhs.to -> self.from), giving `rhs.from -> self.to`.
    #[must_use]
    pub fn compose(&self, rhs: &Transform3D) -> Transform3D {
        assert_same_frame(self.from, rhs.to);
        Transform3D {
            from: rhs.from,
            to: self.to,
            raw: self.raw * rhs.raw,
        }
    }
}

impl std::ops::Mul<&Transform3D> for &Transform3D {
    type Output = Transform3D;

    fn mul(self, rhs: &Transform3D) -> Self::Output {
        self.compose(rhs)
    }
}

impl Display for Transform3D {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Transform3D({} -> {}): {}", self.from, self.to, self.raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn exp_log_roundtrip() {
        let xi = SpatialMotion::from_parts(Vector3D::new(0.3, -0.1, 0.2), Vector3D::new(0.4, 0.5, -0.6));
        let t = RawTransform::exp(&xi);
        let back = t.log();
        assert_relative_eq!(back.as_slice()[..], xi.as_slice()[..], epsilon = 1e-9);
    }

    #[test]
    fn exp_zero_is_identity() {
        let t = RawTransform::exp(&SpatialMotion::zero());
        assert_relative_eq!(t.translation().0, Vector3D::zeros().0, epsilon = 1e-12);
        assert_relative_eq!(t.rotation().matrix(), Matrix3::identity(), epsilon = 1e-12);
    }

    #[test]
    fn log_identity_is_zero() {
        let m = RawTransform::identity().log();
        assert_relative_eq!(m.as_slice()[..], [0.0; 6][..], epsilon = 1e-12);
    }

    #[test]
    fn identity_roundtrip() {
        let a = CartesianFrame3D::world();
        let b = CartesianFrame3D::new_unique();
        let t = Transform3D::new(
            a,
            b,
            Vector3D::new(1.0, 2.0, 3.0),
            SpatialRotation::from_axis_angle(&Vector3D::z(), 0.3),
        );
        let round = t.inverse().compose(&t);
        assert_eq!(round.from_frame(), a);
        assert_eq!(round.to_frame(), a);
    }

    #[test]
    #[should_panic(expected = "frame mismatch")]
    fn compose_checks_frames() {
        let a = CartesianFrame3D::new_unique();
        let b = CartesianFrame3D::new_unique();
        let c = CartesianFrame3D::new_unique();
        let d = CartesianFrame3D::new_unique();
        let t1 = Transform3D::identity(a);
        let t2 = Transform3D::new(c, d, Vector3D::zeros(), SpatialRotation::identity());
        let _ = t1.compose(&t2);
        let _ = b;
    }
}
