//! Floating joint: unrestricted 6-DoF motion, parametrized by a unit quaternion and a
//! translation. The only joint kind whose configuration manifold is not a vector space.

use crate::{
    joint::{JointModel, JointType, JointWrapper},
    joint_data::{JointData, JointDataWrapper},
    limits::JointLimits,
};
use dynamics_spatial::{
    configuration::Configuration,
    motion::{SpatialMotion, SpatialRotation},
    se3::RawTransform,
    vector3d::Vector3D,
    vector6d::Vector6D,
};
use nalgebra::{Quaternion, Rotation3, UnitQuaternion};
use rand::{rngs::ThreadRng, Rng};

/// Converts a unit quaternion into the crate's axis-angle-backed rotation type.
/// Falls back to the identity when the rotation angle is too small to extract a stable axis.
fn spatial_rotation_of(quat: &UnitQuaternion<f64>) -> SpatialRotation {
    match quat.axis_angle() {
        Some((axis, angle)) => SpatialRotation::from_axis_angle(&Vector3D::new(axis.x, axis.y, axis.z), angle),
        None => SpatialRotation::identity(),
    }
}

/// Model of a floating joint.
///
/// `q = (w, x, y, z, px, py, pz)`: a unit quaternion followed by a translation.
/// `v = (omega_body, v_body)`: body-frame angular velocity followed by body-frame
/// linear velocity. The motion subspace is the identity, partitioned angular/linear.
#[derive(Clone, Debug, Default)]
pub struct JointModelFloating {
    pub limits: JointLimits,
}

impl JointModelFloating {
    #[must_use]
    pub fn new() -> Self {
        Self { limits: JointLimits::new_unbounded(7) }
    }

    #[must_use]
    pub fn with_limits(limits: JointLimits) -> Self {
        Self { limits }
    }

    /// No-op: a floating joint has no preferred direction to flip.
    #[must_use]
    pub fn flip_direction(&self) -> Self {
        self.clone()
    }
}

fn quaternion_of(q: &Configuration) -> UnitQuaternion<f64> {
    UnitQuaternion::new_normalize(Quaternion::new(q[0], q[1], q[2], q[3]))
}

fn translation_of(q: &Configuration) -> Vector3D {
    Vector3D::new(q[4], q[5], q[6])
}

fn transform_of(q: &Configuration) -> RawTransform {
    RawTransform::from_parts(translation_of(q), spatial_rotation_of(&quaternion_of(q)))
}

fn configuration_of(t: &RawTransform) -> Configuration {
    let rotation_matrix = Rotation3::from_matrix_unchecked(t.rotation().matrix());
    let quat = UnitQuaternion::from_rotation_matrix(&rotation_matrix);
    let translation = t.translation();
    Configuration::from_row_slice(&[quat.w, quat.i, quat.j, quat.k, translation.as_slice()[0], translation.as_slice()[1], translation.as_slice()[2]])
}

impl JointModel for JointModelFloating {
    fn get_joint_type(&self) -> JointType {
        JointType::Floating
    }

    fn nq(&self) -> usize {
        7
    }

    fn nv(&self) -> usize {
        6
    }

    fn neutral(&self) -> Configuration {
        Configuration::from_row_slice(&[1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0])
    }

    fn create_joint_data(&self) -> JointDataWrapper {
        JointDataWrapper::floating(JointDataFloating::new())
    }

    fn random_configuration(&self, rng: &mut ThreadRng) -> Configuration {
        let raw = Quaternion::new(
            rng.random_range(-1.0..1.0),
            rng.random_range(-1.0..1.0),
            rng.random_range(-1.0..1.0),
            rng.random_range(-1.0..1.0),
        );
        let quat = UnitQuaternion::new_normalize(raw);

        let min_t = self.limits.min_configuration.rows(4, 3);
        let max_t = self.limits.max_configuration.rows(4, 3);
        let translation = Configuration::random_between(rng, &min_t, &max_t);

        Configuration::from_row_slice(&[
            quat.w,
            quat.i,
            quat.j,
            quat.k,
            translation[0],
            translation[1],
            translation[2],
        ])
    }

    fn get_axis(&self) -> Vec<SpatialMotion> {
        vec![
            SpatialMotion::from_rotational_axis(&Vector3D::x()),
            SpatialMotion::from_rotational_axis(&Vector3D::y()),
            SpatialMotion::from_rotational_axis(&Vector3D::z()),
            SpatialMotion::from_translational_axis(&Vector3D::x()),
            SpatialMotion::from_translational_axis(&Vector3D::y()),
            SpatialMotion::from_translational_axis(&Vector3D::z()),
        ]
    }

    fn subspace(&self, v: &Configuration) -> SpatialMotion {
        debug_assert_eq!(v.len(), 6, "floating joint expects 6 velocity coordinates");
        let angular = Vector3D::new(v[0], v[1], v[2]);
        let linear = Vector3D::new(v[3], v[4], v[5]);
        SpatialMotion::from_parts(linear, angular)
    }

    fn subspace_dual(&self, f: &SpatialMotion) -> Configuration {
        let angular = f.rotation();
        let linear = f.translation();
        Configuration::from_row_slice(&[
            angular.as_slice()[0],
            angular.as_slice()[1],
            angular.as_slice()[2],
            linear.as_slice()[0],
            linear.as_slice()[1],
            linear.as_slice()[2],
        ])
    }

    fn bias(&self) -> SpatialMotion {
        SpatialMotion::zero()
    }

    fn integrate(&self, q: &Configuration, v: &Configuration, dt: f64) -> Configuration {
        debug_assert_eq!(q.len(), 7, "floating joint expects a quaternion and a translation");
        debug_assert_eq!(v.len(), 6, "floating joint expects 6 velocity coordinates");

        let quat = quaternion_of(q);
        let omega = Quaternion::new(0.0, v[0], v[1], v[2]);
        let quat_dot = quat.into_inner() * omega * 0.5;
        let quat_next = UnitQuaternion::new_normalize(quat.into_inner() + quat_dot * dt);

        let v_body = Vector3D::new(v[3], v[4], v[5]);
        let world_velocity = spatial_rotation_of(&quat) * &v_body;
        let translation_next = translation_of(q) + world_velocity * dt;

        Configuration::from_row_slice(&[
            quat_next.w,
            quat_next.i,
            quat_next.j,
            quat_next.k,
            translation_next.as_slice()[0],
            translation_next.as_slice()[1],
            translation_next.as_slice()[2],
        ])
    }

    fn limits(&self) -> &JointLimits {
        &self.limits
    }

    fn constraint_subspace(&self) -> Vec<SpatialMotion> {
        Vec::new()
    }

    fn local_coordinates(&self, q0: &Configuration, q: &Configuration, v: &Configuration) -> (Configuration, Configuration) {
        let relative = transform_of(q0).inverse() * transform_of(q);
        (Configuration::from_row_slice(relative.log().as_slice()), v.clone())
    }

    fn global_coordinates(&self, q0: &Configuration, phi: &Configuration) -> Configuration {
        let motion = SpatialMotion::from_vector6d(Vector6D::new(phi[0], phi[1], phi[2], phi[3], phi[4], phi[5]));
        let t_rel = RawTransform::exp(&motion);
        configuration_of(&(transform_of(q0) * t_rel))
    }
}

/// Mutable data of a floating joint: current pose and cached body-frame velocity.
#[derive(Debug, Clone)]
pub struct JointDataFloating {
    joint_q: Configuration,
    joint_v: Configuration,
    placement: RawTransform,
    joint_velocity: SpatialMotion,
}

impl JointDataFloating {
    #[must_use]
    pub fn new() -> Self {
        JointDataFloating {
            joint_q: Configuration::from_row_slice(&[1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]),
            joint_v: Configuration::zeros(6),
            placement: RawTransform::identity(),
            joint_velocity: SpatialMotion::zero(),
        }
    }
}

impl Default for JointDataFloating {
    fn default() -> Self {
        Self::new()
    }
}

impl JointData for JointDataFloating {
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
        debug_assert_eq!(joint_q.len(), 7, "floating joint expects a quaternion and a translation");
        self.joint_q = joint_q.clone();

        let quat = quaternion_of(joint_q);
        let rotation = spatial_rotation_of(&quat);
        self.placement = RawTransform::from_parts(translation_of(joint_q), rotation);

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
    fn floating_has_six_dofs_seven_coordinates() {
        let joint = JointModelFloating::new();
        assert_eq!(joint.nq(), 7);
        assert_eq!(joint.nv(), 6);
        assert_eq!(joint.get_joint_type(), JointType::Floating);
    }

    #[test]
    fn neutral_is_identity_transform() {
        let model = JointModelFloating::new();
        let wrapper = JointWrapper::floating(model.clone());
        let mut data = JointDataFloating::new();
        data.update(&wrapper, &model.neutral(), None);
        assert_relative_eq!(data.get_joint_placement().translation().as_slice()[..], [0.0; 3][..], epsilon = 1e-12);
        assert_relative_eq!(data.get_joint_placement().rotation().angle(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn random_configuration_has_unit_quaternion() {
        let model = JointModelFloating::new();
        let mut rng = rand::rng();
        let q = model.random_configuration(&mut rng);
        let norm_sq = q[0] * q[0] + q[1] * q[1] + q[2] * q[2] + q[3] * q[3];
        assert_relative_eq!(norm_sq, 1.0, epsilon = 1e-10);
    }

    #[test]
    fn integrate_keeps_quaternion_normalized() {
        let model = JointModelFloating::new();
        let q = model.neutral();
        let v = Configuration::from_row_slice(&[0.1, 0.2, -0.1, 1.0, 0.0, 0.0]);
        let next = model.integrate(&q, &v, 0.01);
        let norm_sq = next[0] * next[0] + next[1] * next[1] + next[2] * next[2] + next[3] * next[3];
        assert_relative_eq!(norm_sq, 1.0, epsilon = 1e-10);
    }

    #[test]
    fn subspace_dual_reorders_angular_then_linear() {
        let model = JointModelFloating::new();
        let f = SpatialMotion::from_parts(Vector3D::new(4.0, 5.0, 6.0), Vector3D::new(1.0, 2.0, 3.0));
        let tau = model.subspace_dual(&f);
        assert_relative_eq!(tau.as_slice()[..], [1.0, 2.0, 3.0, 4.0, 5.0, 6.0][..], epsilon = 1e-12);
    }
}
