//! A joint connecting two frames in a mechanism.

use dynamics_joint::joint::{JointModel, JointWrapper};
use dynamics_spatial::frame::CartesianFrame3D;

/// A joint: a name, the two frames it connects, and the closed-set joint kind that
/// determines the allowed relative motion between them.
///
/// `frame_before` is attached to the joint's predecessor body, `frame_after` to its
/// successor body: the joint's placement gives the transform from `frame_after` to
/// `frame_before`.
#[derive(Clone, Debug)]
pub struct Joint {
    name: String,
    frame_before: CartesianFrame3D,
    frame_after: CartesianFrame3D,
    model: JointWrapper,
}

impl Joint {
    #[must_use]
    pub fn new(name: impl Into<String>, frame_before: CartesianFrame3D, frame_after: CartesianFrame3D, model: JointWrapper) -> Self {
        Self { name: name.into(), frame_before, frame_after, model }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn frame_before(&self) -> CartesianFrame3D {
        self.frame_before
    }

    #[must_use]
    pub fn frame_after(&self) -> CartesianFrame3D {
        self.frame_after
    }

    #[must_use]
    pub fn model(&self) -> &JointWrapper {
        &self.model
    }

    #[must_use]
    pub fn nq(&self) -> usize {
        self.model.nq()
    }

    #[must_use]
    pub fn nv(&self) -> usize {
        self.model.nv()
    }

    /// Reverses the joint's notion of predecessor/successor, used when re-rooting a
    /// subtree at one of its own descendants. The underlying joint kind's preferred
    /// axis is flipped along with it.
    #[must_use]
    pub fn reversed(&self, name: impl Into<String>) -> Joint {
        Joint {
            name: name.into(),
            frame_before: self.frame_after,
            frame_after: self.frame_before,
            model: self.model.flip_direction(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dynamics_joint::{fixed::JointModelFixed, revolute::JointModelRevolute};
    use dynamics_spatial::vector3d::Vector3D;

    #[test]
    fn reversed_swaps_frames() {
        let a = CartesianFrame3D::new_unique();
        let b = CartesianFrame3D::new_unique();
        let joint = Joint::new("j", a, b, JointWrapper::fixed(JointModelFixed::new()));
        let rev = joint.reversed("j_rev");
        assert_eq!(rev.frame_before(), b);
        assert_eq!(rev.frame_after(), a);
    }

    #[test]
    fn reversed_flips_revolute_axis() {
        let a = CartesianFrame3D::new_unique();
        let b = CartesianFrame3D::new_unique();
        let joint = Joint::new("j", a, b, JointWrapper::revolute(JointModelRevolute::new_rz()));
        let rev = joint.reversed("j_rev");
        let axis = rev.model().get_axis()[0].rotation();
        assert_eq!(axis.as_slice()[2], -1.0);
        let _ = Vector3D::z();
    }
}
