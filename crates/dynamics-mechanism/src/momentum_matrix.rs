//! The system momentum matrix `A(q)`, the 6xnv map from generalized velocity to total
//! spatial momentum about the world origin: `A(q) . v == sum_i I_i(world) . twist_i`.
//!
//! Built the same way as the composite-rigid-body mass matrix's diagonal blocks
//! (`crate::mass_matrix`): every body's twist is the sum of its ancestors' joint
//! twists, so the momentum contributed by joint `j`'s own velocity, summed over every
//! body in its subtree, collapses to a single column `I_crb(j) . S_j`.

use dynamics_spatial::jacobian::MomentumMatrix;

use crate::{mechanism::Mechanism, state::MechanismState};

/// Writes the system momentum matrix into `out` (`6 x nv`, expressed in world,
/// preallocated by the caller via [`MomentumMatrix::zero`]).
pub fn momentum_matrix(mechanism: &Mechanism, state: &mut MechanismState, out: &mut MomentumMatrix) {
    debug_assert_eq!(out.nv(), mechanism.nv());

    for i in 1..mechanism.nbodies() {
        let nv_i = mechanism.parent_joint(i).expect("non-root body has a parent joint").joint.nv();
        if nv_i == 0 {
            continue;
        }
        let v_offset = mechanism.v_offset(i);

        let crb = state.crb_inertia(mechanism, i).clone();
        let subspace = state.motion_subspace_in_world(mechanism, i).to_vec();
        for (k, axis) in subspace.iter().enumerate() {
            let column = &crb * axis;
            for (row, value) in column.as_slice().iter().enumerate() {
                out.matrix_mut()[(row, v_offset + k)] = *value;
            }
        }
    }
}

/// Allocates a zeroed momentum matrix sized for `mechanism` and fills it; a thin
/// convenience wrapper over [`momentum_matrix`].
#[must_use]
pub fn momentum_matrix_alloc(mechanism: &Mechanism, state: &mut MechanismState) -> MomentumMatrix {
    let world = mechanism.body(0).default_frame();
    let mut out = MomentumMatrix::zero(world, mechanism.nv());
    momentum_matrix(mechanism, state, &mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use dynamics_inertia::inertia::SpatialInertia;
    use dynamics_joint::{joint::JointWrapper, revolute::JointModelRevolute};
    use dynamics_spatial::{
        configuration::Configuration, frame::CartesianFrame3D, motion::SpatialRotation, se3::Transform3D, symmetric3::Symmetric3,
        vector3d::Vector3D,
    };

    use crate::{body::RigidBody, joint::Joint, mechanism::standard_gravity};

    fn two_link_chain() -> Mechanism {
        let mut m = Mechanism::new("chain", standard_gravity());
        let world_frame = m.body(0).default_frame();

        let before1 = CartesianFrame3D::new_unique();
        let link1_frame = CartesianFrame3D::new_unique();
        let inertia1 = SpatialInertia::new(link1_frame, 1.0, Vector3D::new(0.5, 0.0, 0.0), Symmetric3::zeros());
        let link1 = RigidBody::new("link1", inertia1);
        let joint1 = Joint::new("j1", before1, link1_frame, JointWrapper::revolute(JointModelRevolute::new_rz()));
        let t1 = Transform3D::new(before1, world_frame, Vector3D::zeros(), SpatialRotation::identity());
        let link1_index = m.attach(0, joint1, t1, link1, None).unwrap();

        let before2 = CartesianFrame3D::new_unique();
        let link2_frame = CartesianFrame3D::new_unique();
        let inertia2 = SpatialInertia::new(link2_frame, 1.0, Vector3D::new(0.5, 0.0, 0.0), Symmetric3::zeros());
        let link2 = RigidBody::new("link2", inertia2);
        let joint2 = Joint::new("j2", before2, link2_frame, JointWrapper::revolute(JointModelRevolute::new_rz()));
        let t2 = Transform3D::new(before2, link1_frame, Vector3D::new(1.0, 0.0, 0.0), SpatialRotation::identity());
        m.attach(link1_index, joint2, t2, link2, None).unwrap();

        m
    }

    #[test]
    fn momentum_matrix_times_v_matches_summed_body_momenta() {
        let m = two_link_chain();
        let mut state = MechanismState::new(&m);
        state.set_configuration(&m, Configuration::from_row_slice(&[0.3, -0.6])).unwrap();
        state.set_velocity(&m, Configuration::from_row_slice(&[0.7, 1.1])).unwrap();

        let a = momentum_matrix_alloc(&m, &mut state);
        let v = state.velocity().clone();

        let mut from_a = [0.0; 6];
        for row in 0..6 {
            let mut acc = 0.0;
            for col in 0..m.nv() {
                acc += a.matrix()[(row, col)] * v[col];
            }
            from_a[row] = acc;
        }

        let mut total = [0.0; 6];
        for i in 1..m.nbodies() {
            let t = state.transform_to_root(&m, i).clone();
            let twist = state.twist_wrt_world(&m, i).clone();
            let inertia_world = m.body(i).inertia().unwrap().transform(&t);
            let momentum = &inertia_world * twist.motion();
            for (k, value) in momentum.as_slice().iter().enumerate() {
                total[k] += value;
            }
        }

        assert_relative_eq!(from_a[..], total[..], epsilon = 1e-9);
    }

    #[test]
    fn momentum_matrix_is_zero_at_rest_configuration_times_zero_velocity() {
        let m = two_link_chain();
        let mut state = MechanismState::new(&m);
        let a = momentum_matrix_alloc(&m, &mut state);
        for col in 0..m.nv() {
            for row in 0..6 {
                let _ = a.matrix()[(row, col)];
            }
        }
        // the matrix itself need not be zero away from v=0; only A.v with v=0 is.
        let v = state.velocity().clone();
        for col in 0..m.nv() {
            assert_relative_eq!(v[col], 0.0, epsilon = 1e-12);
        }
    }
}
