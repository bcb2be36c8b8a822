//! Defines frame-tagged **wrenches** (spatial forces).

use std::ops::{Add, Mul};

use crate::{
    frame::{assert_same_frame, CartesianFrame3D},
    motion::SpatialMotion,
    se3::Transform3D,
    vector3d::Vector3D,
};

/// A force/torque pair acting on `body`, expressed in `frame`.
#[derive(Clone, Debug, PartialEq)]
pub struct Wrench {
    body: CartesianFrame3D,
    frame: CartesianFrame3D,
    force: SpatialMotion,
}

impl Wrench {
    #[must_use]
    pub fn new(body: CartesianFrame3D, frame: CartesianFrame3D, force: SpatialMotion) -> Self {
        Self { body, frame, force }
    }

    #[must_use]
    pub fn zero(body: CartesianFrame3D, frame: CartesianFrame3D) -> Self {
        Self::new(body, frame, SpatialMotion::zero())
    }

    #[must_use]
    pub fn from_parts(body: CartesianFrame3D, frame: CartesianFrame3D, linear: Vector3D, angular: Vector3D) -> Self {
        Self::new(body, frame, SpatialMotion::from_parts(linear, angular))
    }

    #[must_use]
    pub fn body_frame(&self) -> CartesianFrame3D {
        self.body
    }

    #[must_use]
    pub fn frame(&self) -> CartesianFrame3D {
        self.frame
    }

    #[must_use]
    pub fn force(&self) -> &SpatialMotion {
        &self.force
    }

    #[must_use]
    pub fn linear(&self) -> Vector3D {
        self.force.translation()
    }

    #[must_use]
    pub fn angular(&self) -> Vector3D {
        self.force.rotation()
    }

    /// The instantaneous power this wrench delivers against a twist of the same body,
    /// expressed in the same frame: `f . v`.
    #[must_use]
    pub fn dot(&self, twist: &crate::twist::Twist) -> f64 {
        assert_same_frame(self.frame, twist.frame());
        assert_same_frame(self.body, twist.body_frame());
        self.force.inner(twist.motion())
    }

    /// Re-expresses this wrench in a different frame via the dual action of `t`.
    #[must_use]
    pub fn transform_to(&self, t: &Transform3D) -> Wrench {
        assert_same_frame(self.frame, t.from_frame());
        let dual = t.raw().dual_matrix();
        Wrench {
            body: self.body,
            frame: t.to_frame(),
            force: SpatialMotion::from_vector6d(crate::vector6d::Vector6D(dual * self.force.0)),
        }
    }
}

impl Add for Wrench {
    type Output = Wrench;

    fn add(self, rhs: Self) -> Self::Output {
        assert_same_frame(self.body, rhs.body);
        assert_same_frame(self.frame, rhs.frame);
        Wrench {
            body: self.body,
            frame: self.frame,
            force: self.force + rhs.force,
        }
    }
}

impl Add<&Wrench> for Wrench {
    type Output = Wrench;

    fn add(self, rhs: &Wrench) -> Self::Output {
        assert_same_frame(self.body, rhs.body);
        assert_same_frame(self.frame, rhs.frame);
        Wrench {
            body: self.body,
            frame: self.frame,
            force: self.force + &rhs.force,
        }
    }
}

impl Mul<f64> for Wrench {
    type Output = Wrench;

    fn mul(self, rhs: f64) -> Self::Output {
        Wrench {
            body: self.body,
            frame: self.frame,
            force: self.force * rhs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_wrench_adds_identity() {
        let f = CartesianFrame3D::world();
        let a = Wrench::zero(f, f);
        let b = Wrench::from_parts(f, f, Vector3D::new(1.0, 0.0, 0.0), Vector3D::zeros());
        let sum = a + b.clone();
        assert_eq!(sum.linear().as_slice(), b.linear().as_slice());
    }
}
