//! Prismatic joint: one translational degree of freedom along a body-fixed axis.

use crate::{
    joint::{orthonormal_complement_of_axis, JointModel, JointType, JointWrapper},
    joint_data::{JointData, JointDataWrapper},
    limits::JointLimits,
};
use dynamics_spatial::{configuration::Configuration, motion::SpatialMotion, se3::RawTransform, vector3d::Vector3D};
use rand::rngs::ThreadRng;

/// Model of a prismatic joint: pure translation along a fixed, unit, body-frame axis.
#[derive(Clone, Debug)]
pub struct JointModelPrismatic {
    /// The axis of translation, expressed in `frame_after`. Must be unit-length.
    pub axis: Vector3D,
    pub limits: JointLimits,
}

impl JointModelPrismatic {
    #[must_use]
    pub fn new(axis: Vector3D) -> Self {
        let axis = axis.normalize().expect("prismatic axis must be nonzero");
        JointModelPrismatic { axis, limits: JointLimits::new_unbounded(1) }
    }

    #[must_use]
    pub fn with_limits(axis: Vector3D, limits: JointLimits) -> Self {
        let axis = axis.normalize().expect("prismatic axis must be nonzero");
        JointModelPrismatic { axis, limits }
    }

    #[must_use]
    pub fn new_px() -> Self {
        Self::new(Vector3D::x())
    }

    #[must_use]
    pub fn new_py() -> Self {
        Self::new(Vector3D::y())
    }

    #[must_use]
    pub fn new_pz() -> Self {
        Self::new(Vector3D::z())
    }

    /// Negates the translation axis, used when a subtree is re-rooted.
    #[must_use]
    pub fn flip_direction(&self) -> Self {
        JointModelPrismatic { axis: self.axis * -1.0, limits: self.limits.clone() }
    }
}

impl JointModel for JointModelPrismatic {
    fn get_joint_type(&self) -> JointType {
        JointType::Prismatic
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
        JointDataWrapper::prismatic(JointDataPrismatic::new())
    }

    fn random_configuration(&self, rng: &mut ThreadRng) -> Configuration {
        Configuration::random_between(rng, &self.limits.min_configuration, &self.limits.max_configuration)
    }

    fn get_axis(&self) -> Vec<SpatialMotion> {
        vec![SpatialMotion::from_translational_axis(&self.axis)]
    }

    fn subspace(&self, v: &Configuration) -> SpatialMotion {
        debug_assert_eq!(v.len(), 1, "prismatic joint expects a single velocity coordinate");
        SpatialMotion::from_translational_axis(&self.axis) * v[0]
    }

    fn subspace_dual(&self, f: &SpatialMotion) -> Configuration {
        Configuration::from_row_slice(&[self.axis.dot(&f.translation())])
    }

    fn bias(&self) -> SpatialMotion {
        SpatialMotion::zero()
    }

    fn integrate(&self, q: &Configuration, v: &Configuration, dt: f64) -> Configuration {
        debug_assert_eq!(q.len(), 1, "prismatic joint expects a single offset");
        Configuration::from_row_slice(&[q[0] + v[0] * dt])
    }

    fn limits(&self) -> &JointLimits {
        &self.limits
    }

    fn constraint_subspace(&self) -> Vec<SpatialMotion> {
        let (u, w) = orthonormal_complement_of_axis(&self.axis);
        vec![
            SpatialMotion::from_rotational_axis(&Vector3D::x()),
            SpatialMotion::from_rotational_axis(&Vector3D::y()),
            SpatialMotion::from_rotational_axis(&Vector3D::z()),
            SpatialMotion::from_translational_axis(&u),
            SpatialMotion::from_translational_axis(&w),
        ]
    }

    fn local_coordinates(&self, q0: &Configuration, q: &Configuration, v: &Configuration) -> (Configuration, Configuration) {
        (Configuration::from_row_slice(&[q[0] - q0[0]]), v.clone())
    }

    fn global_coordinates(&self, q0: &Configuration, phi: &Configuration) -> Configuration {
        Configuration::from_row_slice(&[q0[0] + phi[0]])
    }
}

/// Mutable data of a prismatic joint: current offset, rate, and cached placement.
#[derive(Debug, Clone)]
pub struct JointDataPrismatic {
    joint_q: Configuration,
    joint_v: Configuration,
    placement: RawTransform,
    joint_velocity: SpatialMotion,
}

impl JointDataPrismatic {
    #[must_use]
    pub fn new() -> Self {
        JointDataPrismatic {
            joint_q: Configuration::zeros(1),
            joint_v: Configuration::zeros(1),
            placement: RawTransform::identity(),
            joint_velocity: SpatialMotion::zero(),
        }
    }
}

impl Default for JointDataPrismatic {
    fn default() -> Self {
        Self::new()
    }
}

impl JointData for JointDataPrismatic {
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
        debug_assert_eq!(joint_q.len(), 1, "prismatic joint expects a single offset");
        self.joint_q = joint_q.clone();

        let axis = joint_model.get_axis()[0].translation();
        self.placement = RawTransform::from_parts(axis * self.joint_q[0], dynamics_spatial::motion::SpatialRotation::identity());

        if let Some(joint_v) = joint_v {
            self.joint_v = joint_v.clone();
            self.joint_velocity = joint_model.subspace(joint_v);
        }
    }

    fn get_joint_velocity(&self) -> &SpatialMotion {
        &self.joint_velocity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn prismatic_has_single_dof() {
        let joint = JointModelPrismatic::new_pz();
        assert_eq!(joint.nq(), 1);
        assert_eq!(joint.nv(), 1);
        assert_eq!(joint.get_joint_type(), JointType::Prismatic);
    }

    #[test]
    fn update_translates_along_axis() {
        let model = JointModelPrismatic::new_pz();
        let wrapper = JointWrapper::prismatic(model.clone());
        let mut data = JointDataPrismatic::new();
        let q = Configuration::from_row_slice(&[2.5]);
        data.update(&wrapper, &q, None);
        assert_relative_eq!(data.get_joint_placement().translation().as_slice()[..], [0.0, 0.0, 2.5][..], epsilon = 1e-12);
    }

    #[test]
    fn subspace_dual_extracts_axis_component() {
        let model = JointModelPrismatic::new_pz();
        let f = SpatialMotion::from_parts(Vector3D::new(0.0, 0.0, 4.0), Vector3D::zeros());
        let tau = model.subspace_dual(&f);
        assert_relative_eq!(tau[0], 4.0, epsilon = 1e-12);
    }
}
