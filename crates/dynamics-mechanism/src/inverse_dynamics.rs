//! Recursive Newton-Euler inverse dynamics, tree topologies only.
//!
//! Two passes over the mechanism: a forward pass computes every body's world-frame
//! spatial acceleration from the requested joint accelerations, and a backward pass
//! accumulates the wrench each joint must transmit to produce it, projecting that
//! wrench onto the joint's motion subspace to recover the generalized torque.

use dynamics_spatial::{
    configuration::Configuration,
    motion::SpatialMotion,
    twist::SpatialAcceleration,
    vector3d::Vector3D,
    wrench::Wrench,
};

use crate::{errors::DynamicsError, kinematics, mechanism::Mechanism, state::MechanismState};

/// Writes generalized torque into `tau`, and (for callers that want them) the
/// per-body world-frame accelerations and joint reaction wrenches into
/// `accelerations`/`joint_wrenches`. `external_wrenches`, if given, is one wrench per
/// body (world frame) already acting on it — e.g. contact forces — subtracted from the
/// Newton-Euler law before the backward pass.
///
/// Fails with [`DynamicsError::UnsupportedTopology`] if `mechanism` has loop joints:
/// the recursion below assumes a single parent per body.
pub fn inverse_dynamics(
    mechanism: &Mechanism,
    state: &mut MechanismState,
    vdot: &Configuration,
    external_wrenches: Option<&[Wrench]>,
    accelerations: &mut [SpatialAcceleration],
    joint_wrenches: &mut [Wrench],
    tau: &mut Configuration,
) -> Result<(), DynamicsError> {
    if !mechanism.loop_joints().is_empty() {
        return Err(DynamicsError::UnsupportedTopology(
            "inverse dynamics only supports tree mechanisms; this one has loop joints".to_string(),
        ));
    }

    let nbodies = mechanism.nbodies();
    debug_assert_eq!(accelerations.len(), nbodies);
    debug_assert_eq!(joint_wrenches.len(), nbodies);
    debug_assert_eq!(tau.len(), mechanism.nv());

    let world = mechanism.body(0).default_frame();
    let gravity_term = SpatialMotion::from_parts(mechanism.gravity() * -1.0, Vector3D::zeros());

    accelerations[0] = SpatialAcceleration::new(world, world, world, gravity_term.clone());
    for i in 1..nbodies {
        let body_frame = mechanism.body(i).default_frame();
        let relative = kinematics::relative_acceleration(mechanism, state, i, 0, vdot);
        accelerations[i] = SpatialAcceleration::new(body_frame, world, world, relative.motion().clone() + gravity_term.clone());
    }

    let mut wrench_accum: Vec<SpatialMotion> = vec![SpatialMotion::zero(); nbodies];
    for i in 1..nbodies {
        let twist_i = state.twist_wrt_world(mechanism, i).clone();
        let net = match mechanism.body(i).inertia() {
            Some(inertia) => {
                let inertia_world = inertia.transform(state.transform_to_root(mechanism, i));
                inertia_world.newton_euler(&twist_i, &accelerations[i]).force().clone()
            }
            None => SpatialMotion::zero(),
        };
        wrench_accum[i] = match external_wrenches {
            Some(ext) => net + &(ext[i].force().clone() * -1.0),
            None => net,
        };
    }

    for i in (1..nbodies).rev() {
        let parent = mechanism.parent_index(i).expect("non-root body has a parent");
        let contribution = wrench_accum[i].clone();
        wrench_accum[parent] += contribution;
    }

    for i in 1..nbodies {
        let body_frame = mechanism.body(i).default_frame();
        joint_wrenches[i] = Wrench::new(body_frame, world, wrench_accum[i].clone());

        let local_wrench = joint_wrenches[i].transform_to(&state.transform_to_root(mechanism, i).inverse());
        let pj = mechanism.parent_joint(i).expect("non-root body has a parent joint");
        let tau_i = pj.joint.model().subspace_dual(local_wrench.force());
        tau.update_rows(mechanism.v_offset(i), &tau_i);
    }
    joint_wrenches[0] = Wrench::zero(world, world);

    Ok(())
}

/// Allocates scratch for [`inverse_dynamics`] and calls it, returning only the
/// generalized torque.
#[must_use]
pub fn inverse_dynamics_alloc(
    mechanism: &Mechanism,
    state: &mut MechanismState,
    vdot: &Configuration,
    external_wrenches: Option<&[Wrench]>,
) -> Configuration {
    let world = mechanism.body(0).default_frame();
    let mut accelerations = vec![SpatialAcceleration::zero(world, world, world); mechanism.nbodies()];
    let mut joint_wrenches = vec![Wrench::zero(world, world); mechanism.nbodies()];
    let mut tau = Configuration::zeros(mechanism.nv());
    inverse_dynamics(mechanism, state, vdot, external_wrenches, &mut accelerations, &mut joint_wrenches, &mut tau)
        .expect("tree mechanism");
    tau
}

/// The dynamics bias c(q, v, w_ext): generalized torque with every joint acceleration
/// held at zero. `M(q)v̇ + c(q, v, w_ext) = tau` is the equation of motion this bias
/// feeds into [`crate::dynamics::dynamics_solve`].
pub fn dynamics_bias(
    mechanism: &Mechanism,
    state: &mut MechanismState,
    external_wrenches: Option<&[Wrench]>,
    accelerations: &mut [SpatialAcceleration],
    joint_wrenches: &mut [Wrench],
    bias: &mut Configuration,
) -> Result<(), DynamicsError> {
    let zero_vdot = Configuration::zeros(mechanism.nv());
    inverse_dynamics(mechanism, state, &zero_vdot, external_wrenches, accelerations, joint_wrenches, bias)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use dynamics_inertia::inertia::SpatialInertia;
    use dynamics_joint::{joint::JointWrapper, revolute::JointModelRevolute};
    use dynamics_spatial::{frame::CartesianFrame3D, motion::SpatialRotation, se3::Transform3D, symmetric3::Symmetric3};

    use crate::{body::RigidBody, joint::Joint, mass_matrix::mass_matrix_alloc, mechanism::standard_gravity};

    fn single_pendulum(mass: f64, length: f64) -> Mechanism {
        let mut m = Mechanism::new("pendulum", standard_gravity());
        let world_frame = m.body(0).default_frame();
        let before = CartesianFrame3D::new_unique();
        let link_frame = CartesianFrame3D::new_unique();
        let inertia = SpatialInertia::new(link_frame, mass, Vector3D::new(length, 0.0, 0.0), Symmetric3::zeros());
        let link = RigidBody::new("link", inertia);
        let joint = Joint::new("j", before, link_frame, JointWrapper::revolute(JointModelRevolute::new_ry()));
        let t = Transform3D::new(before, world_frame, Vector3D::zeros(), SpatialRotation::identity());
        m.attach(0, joint, t, link, None).unwrap();
        m
    }

    #[test]
    fn resting_pendulum_bias_is_gravity_torque() {
        let m = single_pendulum(2.0, 0.5);
        let mut state = MechanismState::new(&m);
        let world = m.body(0).default_frame();
        let mut accel = vec![SpatialAcceleration::zero(world, world, world); m.nbodies()];
        let mut wrenches = vec![Wrench::zero(world, world); m.nbodies()];
        let mut bias = Configuration::zeros(m.nv());
        dynamics_bias(&m, &mut state, None, &mut accel, &mut wrenches, &mut bias).unwrap();
        // pendulum horizontal at rest about the y-hinge: the torque needed to hold it
        // there against gravity is -m*g*length (negative, opposing the fall).
        assert_relative_eq!(bias[0], -2.0 * 9.81 * 0.5, epsilon = 1e-9);
    }

    #[test]
    fn inverse_dynamics_of_mass_matrix_times_vdot_has_no_bias() {
        let m = single_pendulum(1.0, 1.0);
        let mut state = MechanismState::new(&m);
        state.set_velocity(&m, Configuration::zeros(m.nv())).unwrap();
        let mm = mass_matrix_alloc(&m, &mut state);

        let vdot = Configuration::from_row_slice(&[1.0]);
        let world = m.body(0).default_frame();
        let mut accel = vec![SpatialAcceleration::zero(world, world, world); m.nbodies()];
        let mut wrenches = vec![Wrench::zero(world, world); m.nbodies()];
        let mut bias = Configuration::zeros(m.nv());
        dynamics_bias(&m, &mut state, None, &mut accel, &mut wrenches, &mut bias).unwrap();

        let mut tau = Configuration::zeros(m.nv());
        let mut accel2 = vec![SpatialAcceleration::zero(world, world, world); m.nbodies()];
        let mut wrenches2 = vec![Wrench::zero(world, world); m.nbodies()];
        inverse_dynamics(&m, &mut state, &vdot, None, &mut accel2, &mut wrenches2, &mut tau).unwrap();

        assert_relative_eq!(tau[0], mm[(0, 0)] * vdot[0] + bias[0], epsilon = 1e-9);
    }

    #[test]
    fn loop_mechanism_is_rejected() {
        let mut m = single_pendulum(1.0, 1.0);
        let link_frame = m.body(1).default_frame();
        let world_frame = m.body(0).default_frame();
        let joint = Joint::new(
            "loop",
            link_frame,
            world_frame,
            JointWrapper::revolute(JointModelRevolute::new_rz()),
        );
        let t_pred = Transform3D::identity(link_frame);
        let t_succ = Transform3D::identity(world_frame);
        m.close_loop(joint, 1, t_pred, 0, t_succ).unwrap();

        let mut state = MechanismState::new(&m);
        let world = m.body(0).default_frame();
        let mut accel = vec![SpatialAcceleration::zero(world, world, world); m.nbodies()];
        let mut wrenches = vec![Wrench::zero(world, world); m.nbodies()];
        let mut tau = Configuration::zeros(m.nv());
        let vdot = Configuration::zeros(m.nv());
        assert!(inverse_dynamics(&m, &mut state, &vdot, None, &mut accel, &mut wrenches, &mut tau).is_err());
    }
}
