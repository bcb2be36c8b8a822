//! Structures to represent the spatial inertia of a rigid body.

use dynamics_spatial::{
    frame::{assert_same_frame, CartesianFrame3D},
    motion::SpatialMotion,
    se3::Transform3D,
    symmetric3::Symmetric3,
    twist::{SpatialAcceleration, Twist},
    vector3d::Vector3D,
    wrench::Wrench,
};
use std::ops::{Add, Mul};

/// The spatial inertia of a rigid body about the origin of `frame`.
///
/// `inertia` is always the rotational inertia tensor *about the center of mass*,
/// expressed in `frame`'s axes; `com` is the center of mass position relative to
/// `frame`'s origin, also expressed in `frame`'s axes.
#[derive(Clone, Debug, PartialEq)]
pub struct SpatialInertia {
    frame: CartesianFrame3D,
    pub mass: f64,
    pub com: Vector3D,
    pub inertia: Symmetric3,
}

impl SpatialInertia {
    /// Creates a new `SpatialInertia` with the given parameters.
    #[must_use]
    pub fn new(frame: CartesianFrame3D, mass: f64, com: Vector3D, inertia: Symmetric3) -> Self {
        Self { frame, mass, com, inertia }
    }

    /// Zero inertia (massless), expressed in `frame`.
    #[must_use]
    pub fn zeros(frame: CartesianFrame3D) -> Self {
        Self {
            frame,
            mass: 0.0,
            com: Vector3D::zeros(),
            inertia: Symmetric3::zeros(),
        }
    }

    #[must_use]
    pub fn frame(&self) -> CartesianFrame3D {
        self.frame
    }

    /// A uniform-density ellipsoid, centered at `frame`'s origin, with the given mass
    /// and semi-axis lengths.
    pub fn from_ellipsoid(frame: CartesianFrame3D, mass: f64, x: f64, y: f64, z: f64) -> Result<Self, InertiaError> {
        if mass <= 0.0 {
            return Err(InertiaError::InvalidParameter("mass".to_string()));
        }
        if x <= 0.0 {
            return Err(InertiaError::InvalidParameter("x".to_string()));
        }
        if y <= 0.0 {
            return Err(InertiaError::InvalidParameter("y".to_string()));
        }
        if z <= 0.0 {
            return Err(InertiaError::InvalidParameter("z".to_string()));
        }

        let a = mass * (y.powi(2) + z.powi(2)) / 5.0;
        let b = mass * (x.powi(2) + z.powi(2)) / 5.0;
        let c = mass * (x.powi(2) + y.powi(2)) / 5.0;
        let inertia_matrix = Symmetric3::new(a, b, c, 0.0, 0.0, 0.0);
        Ok(Self::new(frame, mass, Vector3D::zeros(), inertia_matrix))
    }

    /// A uniform-density sphere, centered at `frame`'s origin, with the given mass and radius.
    pub fn from_sphere(frame: CartesianFrame3D, mass: f64, radius: f64) -> Result<Self, InertiaError> {
        SpatialInertia::from_ellipsoid(frame, mass, radius, radius, radius)
    }

    /// Re-expresses this inertia under a rigid transform, moving the reference point
    /// from `frame` to `t.to_frame()`. Because `inertia` is always about the center of
    /// mass, only `com` translates; both `com` and `inertia` rotate with `t`.
    #[must_use]
    pub fn transform(&self, t: &Transform3D) -> SpatialInertia {
        assert_same_frame(self.frame, t.from_frame());
        let r = t.rotation();
        let new_com = r * &self.com + t.translation();
        let new_inertia = self.inertia.rotate(&r.matrix());
        SpatialInertia {
            frame: t.to_frame(),
            mass: self.mass,
            com: new_com,
            inertia: new_inertia,
        }
    }

    /// Computes the Newton-Euler force law: the wrench required to produce
    /// acceleration `accel` on a body with velocity `twist` and this inertia.
    /// `self.frame`, `twist.frame()` and `accel.frame()` must all match.
    #[must_use]
    pub fn newton_euler(&self, twist: &Twist, accel: &SpatialAcceleration) -> Wrench {
        assert_same_frame(self.frame, twist.frame());
        assert_same_frame(self.frame, accel.frame());
        let momentum = self * twist.motion();
        let inertial = self * accel.motion();
        let bias = twist.motion().cross_star(&momentum);
        Wrench::new(twist.body_frame(), self.frame, inertial + bias)
    }
}

impl Mul<&SpatialMotion> for &SpatialInertia {
    type Output = SpatialMotion;

    /// The spatial momentum (or, applied to an acceleration, the inertial force)
    /// `I * v`, per Featherstone eq. 2.66.
    fn mul(self, rhs: &SpatialMotion) -> Self::Output {
        let linear = self.mass * (rhs.translation() + rhs.rotation().cross(&self.com));
        let angular = &self.inertia * &rhs.rotation() + self.com.cross(&linear);
        SpatialMotion::from_parts(linear, angular)
    }
}

impl Add for SpatialInertia {
    type Output = SpatialInertia;

    /// Combines two inertias expressed about the same origin into the inertia of
    /// their union (Steiner's/parallel-axis composition of mass-center representations).
    fn add(self, rhs: Self) -> Self::Output {
        assert_same_frame(self.frame, rhs.frame);
        let mass = self.mass + rhs.mass;
        if mass == 0.0 {
            return SpatialInertia::zeros(self.frame);
        }
        let com = (self.com * self.mass + rhs.com * rhs.mass) * (1.0 / mass);

        let shift = |inertia: &Symmetric3, body_com: Vector3D, body_mass: f64, new_com: Vector3D| {
            let d = body_com - new_com;
            let dx = d.as_slice()[0];
            let dy = d.as_slice()[1];
            let dz = d.as_slice()[2];
            let parallel = Symmetric3::new(
                body_mass * (dy * dy + dz * dz),
                body_mass * (dx * dx + dz * dz),
                body_mass * (dx * dx + dy * dy),
                -body_mass * dx * dy,
                -body_mass * dx * dz,
                -body_mass * dy * dz,
            );
            *inertia + parallel
        };

        let inertia = shift(&self.inertia, self.com, self.mass, com) + shift(&rhs.inertia, rhs.com, rhs.mass, com);
        SpatialInertia { frame: self.frame, mass, com, inertia }
    }
}

/// An error type for [`SpatialInertia`] construction.
pub enum InertiaError {
    InvalidParameter(String),
}

impl std::fmt::Display for InertiaError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InertiaError::InvalidParameter(param) => {
                write!(f, "invalid parameter: '{param}' must be positive")
            }
        }
    }
}

impl std::fmt::Debug for InertiaError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self}")
    }
}

impl std::error::Error for InertiaError {}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn sphere_rejects_nonpositive_mass() {
        let f = CartesianFrame3D::world();
        assert!(SpatialInertia::from_sphere(f, 0.0, 1.0).is_err());
    }

    #[test]
    fn sphere_inertia_is_isotropic() {
        let f = CartesianFrame3D::world();
        let i = SpatialInertia::from_sphere(f, 2.0, 0.5).unwrap();
        let m = i.inertia.matrix();
        assert_relative_eq!(m[(0, 0)], m[(1, 1)], epsilon = 1e-12);
        assert_relative_eq!(m[(1, 1)], m[(2, 2)], epsilon = 1e-12);
    }

    #[test]
    fn rest_momentum_is_zero() {
        let f = CartesianFrame3D::world();
        let i = SpatialInertia::from_sphere(f, 2.0, 0.5).unwrap();
        let h = &i * &SpatialMotion::zero();
        assert_relative_eq!(h.as_slice(), &[0.0; 6][..]);
    }

    #[test]
    fn adding_zero_inertia_is_identity() {
        let f = CartesianFrame3D::world();
        let i = SpatialInertia::from_sphere(f, 2.0, 0.5).unwrap();
        let z = SpatialInertia::zeros(f);
        let sum = i.clone() + z;
        assert_relative_eq!(sum.mass, i.mass);
    }
}
