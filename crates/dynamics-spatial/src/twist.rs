//! Defines frame-tagged **twists** and **spatial accelerations**.
//!
//! Both wrap [`SpatialMotion`] with the triple of frames the spec requires: the `body`
//! frame whose motion is being described, the `base` frame it is measured relative to,
//! and the `frame` the six numbers are actually expressed in. Adding two twists (or two
//! accelerations) requires all three to match.

use std::ops::{Add, Mul};

use crate::{
    frame::{assert_same_frame, CartesianFrame3D},
    motion::SpatialMotion,
    se3::{ActSE3, Transform3D},
    vector3d::Vector3D,
};

/// The velocity of `body` relative to `base`, expressed in `frame`.
#[derive(Clone, Debug, PartialEq)]
pub struct Twist {
    body: CartesianFrame3D,
    base: CartesianFrame3D,
    frame: CartesianFrame3D,
    motion: SpatialMotion,
}

impl Twist {
    #[must_use]
    pub fn new(body: CartesianFrame3D, base: CartesianFrame3D, frame: CartesianFrame3D, motion: SpatialMotion) -> Self {
        Self { body, base, frame, motion }
    }

    #[must_use]
    pub fn zero(body: CartesianFrame3D, base: CartesianFrame3D, frame: CartesianFrame3D) -> Self {
        Self::new(body, base, frame, SpatialMotion::zero())
    }

    #[must_use]
    pub fn body_frame(&self) -> CartesianFrame3D {
        self.body
    }

    #[must_use]
    pub fn base_frame(&self) -> CartesianFrame3D {
        self.base
    }

    #[must_use]
    pub fn frame(&self) -> CartesianFrame3D {
        self.frame
    }

    #[must_use]
    pub fn motion(&self) -> &SpatialMotion {
        &self.motion
    }

    #[must_use]
    pub fn angular(&self) -> Vector3D {
        self.motion.rotation()
    }

    #[must_use]
    pub fn linear(&self) -> Vector3D {
        self.motion.translation()
    }

    /// Re-expresses this twist in a different frame via `t`, which must map `t.from_frame()
    /// == self.frame()` to `t.to_frame()`.
    #[must_use]
    pub fn transform_to(&self, t: &Transform3D) -> Twist {
        assert_same_frame(self.frame, t.from_frame());
        Twist {
            body: self.body,
            base: self.base,
            frame: t.to_frame(),
            motion: self.motion.act(t.raw()),
        }
    }

    /// The spatial motion cross product `self x other`, used to build bias terms; both
    /// twists must share the same expression frame.
    #[must_use]
    pub fn cross(&self, other: &Twist) -> SpatialMotion {
        assert_same_frame(self.frame, other.frame);
        self.motion.cross(&other.motion)
    }
}

impl Add for Twist {
    type Output = Twist;

    /// Composes two twists of the same body measured relative to a common, shared
    /// intermediate frame: `self` is `body` relative to `self.base`, and `rhs` is
    /// `self.base` relative to `rhs.base` — both must already be expressed in the same
    /// frame, which is the standard situation when accumulating twists down a tree.
    fn add(self, rhs: Self) -> Self::Output {
        assert_same_frame(self.frame, rhs.frame);
        assert_same_frame(self.base, rhs.body);
        Twist {
            body: self.body,
            base: rhs.base,
            frame: self.frame,
            motion: self.motion + rhs.motion,
        }
    }
}

/// The acceleration of `body` relative to `base`, expressed in `frame`.
#[derive(Clone, Debug, PartialEq)]
pub struct SpatialAcceleration {
    body: CartesianFrame3D,
    base: CartesianFrame3D,
    frame: CartesianFrame3D,
    motion: SpatialMotion,
}

impl SpatialAcceleration {
    #[must_use]
    pub fn new(body: CartesianFrame3D, base: CartesianFrame3D, frame: CartesianFrame3D, motion: SpatialMotion) -> Self {
        Self { body, base, frame, motion }
    }

    #[must_use]
    pub fn zero(body: CartesianFrame3D, base: CartesianFrame3D, frame: CartesianFrame3D) -> Self {
        Self::new(body, base, frame, SpatialMotion::zero())
    }

    #[must_use]
    pub fn body_frame(&self) -> CartesianFrame3D {
        self.body
    }

    #[must_use]
    pub fn base_frame(&self) -> CartesianFrame3D {
        self.base
    }

    #[must_use]
    pub fn frame(&self) -> CartesianFrame3D {
        self.frame
    }

    #[must_use]
    pub fn motion(&self) -> &SpatialMotion {
        &self.motion
    }

    #[must_use]
    pub fn transform_to(&self, t: &Transform3D) -> SpatialAcceleration {
        assert_same_frame(self.frame, t.from_frame());
        SpatialAcceleration {
            body: self.body,
            base: self.base,
            frame: t.to_frame(),
            motion: self.motion.act(t.raw()),
        }
    }
}

impl Add for SpatialAcceleration {
    type Output = SpatialAcceleration;

    fn add(self, rhs: Self) -> Self::Output {
        assert_same_frame(self.frame, rhs.frame);
        assert_same_frame(self.base, rhs.body);
        SpatialAcceleration {
            body: self.body,
            base: rhs.base,
            frame: self.frame,
            motion: self.motion + rhs.motion,
        }
    }
}

impl Mul<f64> for SpatialAcceleration {
    type Output = SpatialAcceleration;

    fn mul(self, rhs: f64) -> Self::Output {
        SpatialAcceleration {
            body: self.body,
            base: self.base,
            frame: self.frame,
            motion: self.motion * rhs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_twist_has_zero_motion() {
        let f = CartesianFrame3D::world();
        let t = Twist::zero(f, f, f);
        assert_eq!(t.motion().as_slice(), &[0.0; 6]);
    }

    #[test]
    #[should_panic(expected = "frame mismatch")]
    fn add_checks_chain() {
        let a = CartesianFrame3D::new_unique();
        let b = CartesianFrame3D::new_unique();
        let c = CartesianFrame3D::new_unique();
        let world = CartesianFrame3D::world();
        let t1 = Twist::zero(a, b, world);
        let t2 = Twist::zero(c, c, world);
        let _ = t1 + t2;
    }
}
