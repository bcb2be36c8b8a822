//! Per-configuration, per-velocity cache of the spatial quantities the algorithms in
//! this crate read over and over: transforms to root, twists, bias accelerations,
//! motion subspaces and composite-rigid-body inertias, all expressed in world.
//!
//! Two dirty bits gate recomputation: `kinematics_dirty` covers everything that only
//! depends on `q` (transforms, motion subspaces, CRB inertias); `velocity_dirty`
//! additionally covers the quantities that need `v` (twists, bias accelerations).
//! `set_configuration` sets both; `set_velocity` sets only the latter.

use dynamics_inertia::inertia::SpatialInertia;
use dynamics_joint::{
    joint_data::{JointData, JointDataWrapper},
    limits::JointLimits,
};
use dynamics_spatial::{
    configuration::Configuration,
    frame::CartesianFrame3D,
    motion::SpatialMotion,
    se3::{ActSE3, Transform3D},
    twist::{SpatialAcceleration, Twist},
};

use crate::{errors::DynamicsError, mechanism::Mechanism};

/// The mutable state of a mechanism: its configuration, velocity, and the caches
/// derived from them.
pub struct MechanismState {
    q: Configuration,
    v: Configuration,
    joint_data: Vec<Option<JointDataWrapper>>,

    transform_to_root: Vec<Transform3D>,
    motion_subspace_in_world: Vec<Vec<SpatialMotion>>,
    crb_inertia: Vec<SpatialInertia>,
    kinematics_dirty: bool,

    twist_wrt_world: Vec<Twist>,
    bias_wrt_world: Vec<SpatialAcceleration>,
    velocity_dirty: bool,
}

impl MechanismState {
    /// Creates a state for `mechanism`, with every joint at its neutral configuration
    /// and zero velocity.
    #[must_use]
    pub fn new(mechanism: &Mechanism) -> Self {
        let nbodies = mechanism.nbodies();
        let world = mechanism.body(0).default_frame();

        let mut joint_data = Vec::with_capacity(nbodies);
        let mut neutrals = Vec::with_capacity(nbodies - 1);
        joint_data.push(None);
        for i in 1..nbodies {
            let model = mechanism.parent_joint(i).expect("non-root body has a parent joint").joint.model();
            joint_data.push(Some(model.create_joint_data()));
            neutrals.push(model.neutral());
        }

        let mut state = MechanismState {
            q: Configuration::concat(&neutrals),
            v: Configuration::zeros(mechanism.nv()),
            joint_data,
            transform_to_root: vec![Transform3D::identity(world); nbodies],
            motion_subspace_in_world: vec![Vec::new(); nbodies],
            crb_inertia: vec![SpatialInertia::zeros(world); nbodies],
            kinematics_dirty: true,
            twist_wrt_world: vec![Twist::zero(world, world, world); nbodies],
            bias_wrt_world: vec![SpatialAcceleration::zero(world, world, world); nbodies],
            velocity_dirty: true,
        };
        state.ensure_velocity(mechanism);
        state
    }

    #[must_use]
    pub fn configuration(&self) -> &Configuration {
        &self.q
    }

    #[must_use]
    pub fn velocity(&self) -> &Configuration {
        &self.v
    }

    /// Draws a random configuration within every joint's limits and applies it.
    pub fn set_random_configuration(&mut self, mechanism: &Mechanism, rng: &mut rand::rngs::ThreadRng) -> Result<(), DynamicsError> {
        let mut parts = Vec::with_capacity(mechanism.nbodies() - 1);
        for i in 1..mechanism.nbodies() {
            let model = mechanism.parent_joint(i).expect("non-root body has a parent joint").joint.model();
            parts.push(model.random_configuration(rng));
        }
        self.set_configuration(mechanism, Configuration::concat(&parts))
    }

    pub fn set_configuration(&mut self, mechanism: &Mechanism, q: Configuration) -> Result<(), DynamicsError> {
        q.check_size("q", mechanism.nq())?;
        self.q = q;
        self.kinematics_dirty = true;
        self.velocity_dirty = true;
        Ok(())
    }

    pub fn set_velocity(&mut self, mechanism: &Mechanism, v: Configuration) -> Result<(), DynamicsError> {
        v.check_size("v", mechanism.nv())?;
        self.v = v;
        self.velocity_dirty = true;
        Ok(())
    }

    /// This joint's configuration slice, read out of the flattened `q`.
    #[must_use]
    pub fn joint_q(&self, mechanism: &Mechanism, body: usize) -> Configuration {
        let nq = mechanism.parent_joint(body).expect("non-root body has a parent joint").joint.nq();
        self.q.rows(mechanism.q_offset(body), nq)
    }

    /// This joint's velocity slice, read out of the flattened `v`.
    #[must_use]
    pub fn joint_v(&self, mechanism: &Mechanism, body: usize) -> Configuration {
        let nv = mechanism.parent_joint(body).expect("non-root body has a parent joint").joint.nv();
        self.v.rows(mechanism.v_offset(body), nv)
    }

    #[must_use]
    pub fn joint_limits(&self, mechanism: &Mechanism, body: usize) -> &JointLimits {
        mechanism.parent_joint(body).expect("non-root body has a parent joint").joint.model().limits()
    }

    pub fn transform_to_root(&mut self, mechanism: &Mechanism, body: usize) -> &Transform3D {
        self.ensure_kinematics(mechanism);
        &self.transform_to_root[body]
    }

    pub fn motion_subspace_in_world(&mut self, mechanism: &Mechanism, body: usize) -> &[SpatialMotion] {
        self.ensure_kinematics(mechanism);
        &self.motion_subspace_in_world[body]
    }

    pub fn crb_inertia(&mut self, mechanism: &Mechanism, body: usize) -> &SpatialInertia {
        self.ensure_kinematics(mechanism);
        &self.crb_inertia[body]
    }

    pub fn twist_wrt_world(&mut self, mechanism: &Mechanism, body: usize) -> &Twist {
        self.ensure_velocity(mechanism);
        &self.twist_wrt_world[body]
    }

    pub fn bias_acceleration(&mut self, mechanism: &Mechanism, body: usize) -> &SpatialAcceleration {
        self.ensure_velocity(mechanism);
        &self.bias_wrt_world[body]
    }

    /// This joint's own velocity, as a spatial motion expressed in its `frame_after`.
    pub fn joint_velocity(&mut self, mechanism: &Mechanism, body: usize) -> SpatialMotion {
        self.ensure_velocity(mechanism);
        self.joint_data[body].as_ref().expect("non-root body has joint data").get_joint_velocity().clone()
    }

    fn ensure_kinematics(&mut self, mechanism: &Mechanism) {
        if !self.kinematics_dirty {
            return;
        }

        for i in 1..mechanism.nbodies() {
            let pj = mechanism.parent_joint(i).expect("non-root body has a parent joint");
            let joint_q = self.q.rows(mechanism.q_offset(i), pj.joint.nq());
            self.joint_data[i].as_mut().expect("non-root body has joint data").update(pj.joint.model(), &joint_q, None);
        }

        for i in 1..mechanism.nbodies() {
            let pj = mechanism.parent_joint(i).expect("non-root body has a parent joint");
            let placement = self.joint_data[i].as_ref().expect("non-root body has joint data").get_joint_placement();
            let placement_transform =
                Transform3D::new(pj.joint.frame_after(), pj.joint.frame_before(), placement.translation(), placement.rotation());
            let body_to_parent = pj.joint_to_parent.compose(&placement_transform);
            self.transform_to_root[i] = self.transform_to_root[pj.parent_index].compose(&body_to_parent);
        }

        for i in 1..mechanism.nbodies() {
            let pj = mechanism.parent_joint(i).expect("non-root body has a parent joint");
            let raw = self.transform_to_root[i].raw();
            self.motion_subspace_in_world[i] = pj.joint.model().get_axis().iter().map(|axis| axis.act(raw)).collect();
        }

        let world = mechanism.body(0).default_frame();
        for i in 0..mechanism.nbodies() {
            self.crb_inertia[i] = match mechanism.body(i).inertia() {
                Some(inertia) => inertia.transform(&self.transform_to_root[i]),
                None => SpatialInertia::zeros(world),
            };
        }
        for i in (1..mechanism.nbodies()).rev() {
            let parent = mechanism.parent_index(i).expect("non-root body has a parent");
            self.crb_inertia[parent] = self.crb_inertia[parent].clone() + self.crb_inertia[i].clone();
        }

        self.kinematics_dirty = false;
    }

    fn ensure_velocity(&mut self, mechanism: &Mechanism) {
        self.ensure_kinematics(mechanism);
        if !self.velocity_dirty {
            return;
        }

        let world = mechanism.body(0).default_frame();
        for i in 1..mechanism.nbodies() {
            let pj = mechanism.parent_joint(i).expect("non-root body has a parent joint");
            let joint_q = self.q.rows(mechanism.q_offset(i), pj.joint.nq());
            let joint_v = self.v.rows(mechanism.v_offset(i), pj.joint.nv());
            self.joint_data[i].as_mut().expect("non-root body has joint data").update(pj.joint.model(), &joint_q, Some(&joint_v));
        }

        for i in 1..mechanism.nbodies() {
            let pj = mechanism.parent_joint(i).expect("non-root body has a parent joint");
            let parent = pj.parent_index;
            let body_frame = mechanism.body(i).default_frame();
            let parent_frame = mechanism.body(parent).default_frame();
            let raw = self.transform_to_root[i].raw();

            let local_velocity = self.joint_data[i].as_ref().unwrap().get_joint_velocity().clone();
            let joint_twist_world = Twist::new(body_frame, parent_frame, world, local_velocity.act(raw));

            let local_bias = pj.joint.model().bias().act(raw);
            let coriolis = self.twist_wrt_world[parent].cross(&joint_twist_world);
            let joint_accel_world = SpatialAcceleration::new(body_frame, parent_frame, world, coriolis + local_bias);

            self.twist_wrt_world[i] = joint_twist_world + self.twist_wrt_world[parent].clone();
            self.bias_wrt_world[i] = joint_accel_world + self.bias_wrt_world[parent].clone();
        }

        self.velocity_dirty = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use dynamics_joint::{joint::JointWrapper, revolute::JointModelRevolute};
    use dynamics_spatial::{motion::SpatialRotation, vector3d::Vector3D};

    use crate::{body::RigidBody, mechanism::standard_gravity};

    fn pendulum() -> Mechanism {
        let mut m = Mechanism::new("pendulum", standard_gravity());
        let world_frame = m.body(0).default_frame();
        let before = CartesianFrame3D::new_unique();
        let link_frame = CartesianFrame3D::new_unique();
        let inertia = SpatialInertia::from_sphere(link_frame, 1.0, 0.1).unwrap();
        let link = RigidBody::new("link", inertia);
        let joint = crate::joint::Joint::new("j", before, link_frame, JointWrapper::revolute(JointModelRevolute::new_rz()));
        let t = Transform3D::new(before, world_frame, Vector3D::zeros(), SpatialRotation::identity());
        m.attach(0, joint, t, link, None).unwrap();
        m
    }

    #[test]
    fn new_state_is_at_rest() {
        let m = pendulum();
        let mut state = MechanismState::new(&m);
        let twist = state.twist_wrt_world(&m, 1);
        assert_relative_eq!(twist.motion().as_slice()[..], [0.0; 6][..], epsilon = 1e-12);
    }

    #[test]
    fn setting_velocity_updates_twist_without_redoing_kinematics() {
        let m = pendulum();
        let mut state = MechanismState::new(&m);
        let t0 = state.transform_to_root(&m, 1).clone();
        state.set_velocity(&m, Configuration::from_row_slice(&[1.0])).unwrap();
        let t1 = state.transform_to_root(&m, 1).clone();
        assert_eq!(t0, t1);
        let twist = state.twist_wrt_world(&m, 1);
        assert_relative_eq!(twist.angular().as_slice()[2], 1.0, epsilon = 1e-12);
    }
}
