//! Fixed joint, without any degree of freedom.

use crate::{
    joint::{JointModel, JointType, JointWrapper},
    joint_data::{JointData, JointDataWrapper},
    limits::JointLimits,
};
use dynamics_spatial::{configuration::Configuration, motion::SpatialMotion, se3::RawTransform, vector3d::Vector3D};
use rand::rngs::ThreadRng;

/// Model of a fixed joint: identity transform, no velocity coordinates.
#[derive(Clone, Debug, Default)]
pub struct JointModelFixed {
    limits: JointLimits,
}

impl JointModelFixed {
    #[must_use]
    pub fn new() -> Self {
        Self { limits: JointLimits::new_unbounded(0) }
    }

    /// No-op: a fixed joint has no axis to flip.
    #[must_use]
    pub fn flip_direction(&self) -> Self {
        self.clone()
    }
}

impl JointModel for JointModelFixed {
    fn get_joint_type(&self) -> JointType {
        JointType::Fixed
    }

    fn nq(&self) -> usize {
        0
    }

    fn nv(&self) -> usize {
        0
    }

    fn neutral(&self) -> Configuration {
        Configuration::zeros(0)
    }

    fn create_joint_data(&self) -> JointDataWrapper {
        JointDataWrapper::fixed(JointDataFixed::new())
    }

    fn random_configuration(&self, _rng: &mut ThreadRng) -> Configuration {
        Configuration::zeros(0)
    }

    fn get_axis(&self) -> Vec<SpatialMotion> {
        Vec::new()
    }

    fn subspace(&self, v: &Configuration) -> SpatialMotion {
        debug_assert_eq!(v.len(), 0, "fixed joint expects no velocity");
        SpatialMotion::zero()
    }

    fn subspace_dual(&self, _f: &SpatialMotion) -> Configuration {
        Configuration::zeros(0)
    }

    fn bias(&self) -> SpatialMotion {
        SpatialMotion::zero()
    }

    fn integrate(&self, q: &Configuration, _v: &Configuration, _dt: f64) -> Configuration {
        debug_assert_eq!(q.len(), 0, "fixed joint expects no configuration");
        Configuration::zeros(0)
    }

    fn limits(&self) -> &JointLimits {
        &self.limits
    }

    fn constraint_subspace(&self) -> Vec<SpatialMotion> {
        vec![
            SpatialMotion::from_rotational_axis(&Vector3D::x()),
            SpatialMotion::from_rotational_axis(&Vector3D::y()),
            SpatialMotion::from_rotational_axis(&Vector3D::z()),
            SpatialMotion::from_translational_axis(&Vector3D::x()),
            SpatialMotion::from_translational_axis(&Vector3D::y()),
            SpatialMotion::from_translational_axis(&Vector3D::z()),
        ]
    }

    fn local_coordinates(&self, _q0: &Configuration, _q: &Configuration, _v: &Configuration) -> (Configuration, Configuration) {
        (Configuration::zeros(0), Configuration::zeros(0))
    }

    fn global_coordinates(&self, _q0: &Configuration, _phi: &Configuration) -> Configuration {
        Configuration::zeros(0)
    }
}

impl Default for JointLimits {
    fn default() -> Self {
        JointLimits::new_unbounded(0)
    }
}

/// Mutable data of a fixed joint: always the identity transform, no velocity.
#[derive(Debug, Clone)]
pub struct JointDataFixed {
    joint_q: Configuration,
    joint_v: Configuration,
    placement: RawTransform,
    joint_velocity: SpatialMotion,
}

impl JointDataFixed {
    #[must_use]
    pub fn new() -> Self {
        JointDataFixed {
            joint_q: Configuration::zeros(0),
            joint_v: Configuration::zeros(0),
            placement: RawTransform::identity(),
            joint_velocity: SpatialMotion::zero(),
        }
    }
}

impl Default for JointDataFixed {
    fn default() -> Self {
        Self::new()
    }
}

impl JointData for JointDataFixed {
    fn get_joint_q(&self) -> &Configuration {
        &self.joint_q
    }

    fn get_joint_v(&self) -> &Configuration {
        &self.joint_v
    }

    fn get_joint_placement(&self) -> RawTransform {
        self.placement
    }

    fn update(&mut self, _joint_model: &JointWrapper, _joint_q: &Configuration, _joint_v: Option<&Configuration>) {}

    fn get_joint_velocity(&self) -> &SpatialMotion {
        &self.joint_velocity
    }
}
