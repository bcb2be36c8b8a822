//! Revolute joint: one rotational degree of freedom about a body-fixed axis.

use crate::{
    joint::{orthonormal_complement_of_axis, JointModel, JointType, JointWrapper},
    joint_data::{JointData, JointDataWrapper},
    limits::JointLimits,
};
use dynamics_spatial::{
    configuration::Configuration,
    motion::{SpatialMotion, SpatialRotation},
    se3::RawTransform,
    vector3d::Vector3D,
};
use rand::rngs::ThreadRng;

/// Model of a revolute joint: a Rodrigues rotation about a fixed, unit, body-frame axis.
#[derive(Clone, Debug)]
pub struct JointModelRevolute {
    /// The axis of rotation, expressed in `frame_after`. Must be unit-length.
    pub axis: Vector3D,
    pub limits: JointLimits,
}

impl JointModelRevolute {
    #[must_use]
    pub fn new(axis: Vector3D) -> Self {
        let axis = axis.normalize().expect("revolute axis must be nonzero");
        JointModelRevolute { axis, limits: JointLimits::new_unbounded(1) }
    }

    #[must_use]
    pub fn with_limits(axis: Vector3D, limits: JointLimits) -> Self {
        let axis = axis.normalize().expect("revolute axis must be nonzero");
        JointModelRevolute { axis, limits }
    }

    #[must_use]
    pub fn new_rx() -> Self {
        Self::new(Vector3D::x())
    }

    #[must_use]
    pub fn new_ry() -> Self {
        Self::new(Vector3D::y())
    }

    #[must_use]
    pub fn new_rz() -> Self {
        Self::new(Vector3D::z())
    }

    /// Negates the rotation axis, used when a subtree is re-rooted and the joint's
    /// direction of traversal flips.
    #[must_use]
    pub fn flip_direction(&self) -> Self {
        JointModelRevolute { axis: self.axis * -1.0, limits: self.limits.clone() }
    }
}

impl JointModel for JointModelRevolute {
    fn get_joint_type(&self) -> JointType {
        JointType::Revolute
    }

    fn nq(&self) -> usize {
        1
    }

    fn nv(&self) -> usize {
        1
    }

    fn neutral(&self) -> Configuration {
        Configuration::zeros(1)
    }

    fn create_joint_data(&self) -> JointDataWrapper {
        JointDataWrapper::revolute(JointDataRevolute::new())
    }

    fn random_configuration(&self, rng: &mut ThreadRng) -> Configuration {
        Configuration::random_between(rng, &self.limits.min_configuration, &self.limits.max_configuration)
    }

    fn get_axis(&self) -> Vec<SpatialMotion> {
        vec![SpatialMotion::from_rotational_axis(&self.axis)]
    }

    fn subspace(&self, v: &Configuration) -> SpatialMotion {
        debug_assert_eq!(v.len(), 1, "revolute joint expects a single velocity coordinate");
        SpatialMotion::from_rotational_axis(&self.axis) * v[0]
    }

    fn subspace_dual(&self, f: &SpatialMotion) -> Configuration {
        Configuration::from_row_slice(&[self.axis.dot(&f.rotation())])
    }

    fn bias(&self) -> SpatialMotion {
        SpatialMotion::zero()
    }

    fn integrate(&self, q: &Configuration, v: &Configuration, dt: f64) -> Configuration {
        debug_assert_eq!(q.len(), 1, "revolute joint expects a single angle");
        Configuration::from_row_slice(&[q[0] + v[0] * dt])
    }

    fn limits(&self) -> &JointLimits {
        &self.limits
    }

    fn constraint_subspace(&self) -> Vec<SpatialMotion> {
        let (u, w) = orthonormal_complement_of_axis(&self.axis);
        vec![
            SpatialMotion::from_rotational_axis(&u),
            SpatialMotion::from_rotational_axis(&w),
            SpatialMotion::from_translational_axis(&Vector3D::x()),
            SpatialMotion::from_translational_axis(&Vector3D::y()),
            SpatialMotion::from_translational_axis(&Vector3D::z()),
        ]
    }

    fn local_coordinates(&self, q0: &Configuration, q: &Configuration, v: &Configuration) -> (Configuration, Configuration) {
        (Configuration::from_row_slice(&[q[0] - q0[0]]), v.clone())
    }

    fn global_coordinates(&self, q0: &Configuration, phi: &Configuration) -> Configuration {
        Configuration::from_row_slice(&[q0[0] + phi[0]])
    }
}

/// Mutable data of a revolute joint: current angle, angular rate, and cached placement.
#[derive(Debug, Clone)]
pub struct JointDataRevolute {
    joint_q: Configuration,
    joint_v: Configuration,
    placement: RawTransform,
    joint_velocity: SpatialMotion,
}

impl JointDataRevolute {
    #[must_use]
    pub fn new() -> Self {
        JointDataRevolute {
            joint_q: Configuration::zeros(1),
            joint_v: Configuration::zeros(1),
            placement: RawTransform::identity(),
            joint_velocity: SpatialMotion::zero(),
        }
    }
}

impl Default for JointDataRevolute {
    fn default() -> Self {
        Self::new()
    }
}

impl JointData for JointDataRevolute {
    fn get_joint_q(&self) -> &Configuration {
        &self.joint_q
    }

    fn get_joint_v(&self) -> &Configuration {
        &self.joint_v
    }

    fn get_joint_placement(&self) -> RawTransform {
        self.placement
    }

    fn update(&mut self, joint_model: &JointWrapper, joint_q: &Configuration, joint_v: Option<&Configuration>) {
        debug_assert_eq!(joint_q.len(), 1, "revolute joint expects a single angle");
        self.joint_q = joint_q.clone();

        let axis = joint_model.get_axis()[0].rotation();
        self.placement = RawTransform::from_parts(Vector3D::zeros(), SpatialRotation::from_axis_angle(&axis, self.joint_q[0]));

        if let Some(joint_v) = joint_v {
            self.joint_v = joint_v.clone();
            self.joint_velocity = joint_model.subspace(joint_v);
        }
    }

    fn get_joint_velocity(&self) -> &SpatialMotion {
        &self.joint_velocity
    }
}
