//! Loop-closure constraint assembly: the Jacobian `K` and bias `k` of every loop
//! joint's constraint equations, `K*v = k`, stacked into a single system (Featherstone,
//! *Rigid Body Dynamics Algorithms*, section 8.3).
//!
//! Each loop joint connects a predecessor and successor body that are already joined
//! through the tree; the joint's allowed relative motion (its own motion subspace) is
//! unconstrained, while its *orthogonal complement* — the constraint subspace — must
//! have zero relative velocity. `K` is that complement, projected onto every tree
//! joint's motion subspace along the path between predecessor and successor; `k` is the
//! corresponding bias acceleration with every `v̇` held at zero.

use dynamics_spatial::{configuration::Configuration, wrench::Wrench};
use dynamics_joint::joint::JointModel;
use nalgebra::DMatrix;

use crate::{
    errors::DynamicsError,
    kinematics::{tree_path, PathDirection},
    mechanism::Mechanism,
    state::MechanismState,
};

/// The total number of constraint rows: each loop joint of constraint-subspace
/// dimension `d` (`6 - nv` for the joint kinds in this crate) contributes `d` rows.
#[must_use]
pub fn n_lambda(mechanism: &Mechanism) -> usize {
    mechanism.loop_joints().iter().map(|lj| lj.joint.model().constraint_subspace().len()).sum()
}

fn row_offset(mechanism: &Mechanism, index: usize) -> usize {
    mechanism.loop_joints()[..index].iter().map(|lj| lj.joint.model().constraint_subspace().len()).sum()
}

/// Writes the stacked constraint Jacobian into `k_matrix` (`n_lambda x nv`) and the
/// stacked constraint bias into `k_bias` (`n_lambda`), both preallocated by the caller
/// via [`n_lambda`].
///
/// Fails with [`DynamicsError::UnsupportedJoint`] if a loop joint's motion subspace
/// varies with velocity (`bias() != 0`): the constraint-subspace projection below
/// assumes it is constant in the joint's own frame, true of every joint kind this crate
/// implements but not guaranteed in general.
pub fn constraint_jacobian_and_bias(
    mechanism: &Mechanism,
    state: &mut MechanismState,
    k_matrix: &mut DMatrix<f64>,
    k_bias: &mut Configuration,
) -> Result<(), DynamicsError> {
    debug_assert_eq!(k_matrix.nrows(), n_lambda(mechanism));
    debug_assert_eq!(k_matrix.ncols(), mechanism.nv());
    debug_assert_eq!(k_bias.len(), n_lambda(mechanism));
    k_matrix.fill(0.0);

    for (index, lj) in mechanism.loop_joints().iter().enumerate() {
        if lj.joint.model().bias().as_slice().iter().any(|c| *c != 0.0) {
            return Err(DynamicsError::UnsupportedJoint(format!(
                "loop joint '{}' has a velocity-dependent motion subspace, unsupported in constraint assembly",
                lj.joint.name()
            )));
        }

        let pred = lj.predecessor_index;
        let succ = lj.successor_index;
        let succ_frame = mechanism.body(succ).default_frame();

        let frame_after_to_world = state.transform_to_root(mechanism, succ).clone().compose(&lj.joint_to_successor);
        let t_world: Vec<_> = lj
            .joint
            .model()
            .constraint_subspace()
            .into_iter()
            .map(|t| Wrench::new(succ_frame, lj.joint.frame_after(), t).transform_to(&frame_after_to_world).force().clone())
            .collect();

        let row0 = row_offset(mechanism, index);
        let path = tree_path(mechanism, pred, succ);
        for edge in &path {
            let sign = match edge.direction {
                PathDirection::Up => -1.0,
                PathDirection::Down => 1.0,
            };
            let v_offset = mechanism.v_offset(edge.body_index);
            let subspace = state.motion_subspace_in_world(mechanism, edge.body_index).to_vec();
            for (r, t_dir) in t_world.iter().enumerate() {
                for (c, s_dir) in subspace.iter().enumerate() {
                    k_matrix[(row0 + r, v_offset + c)] += sign * t_dir.inner(s_dir);
                }
            }
        }

        let twist_succ = state.twist_wrt_world(mechanism, succ).clone();
        let twist_pred = state.twist_wrt_world(mechanism, pred).clone();
        let bias_succ = state.bias_acceleration(mechanism, succ).motion().clone();
        let bias_pred = state.bias_acceleration(mechanism, pred).motion().clone();
        let combined = twist_succ.cross(&twist_pred) + bias_succ + bias_pred * -1.0;

        for (r, t_dir) in t_world.iter().enumerate() {
            k_bias[row0 + r] = t_dir.inner(&combined);
        }
    }

    Ok(())
}

/// Allocates `K` and `k` sized for `mechanism` and fills them; a thin convenience
/// wrapper over [`constraint_jacobian_and_bias`].
pub fn constraint_jacobian_and_bias_alloc(
    mechanism: &Mechanism,
    state: &mut MechanismState,
) -> Result<(DMatrix<f64>, Configuration), DynamicsError> {
    let mut k_matrix = DMatrix::zeros(n_lambda(mechanism), mechanism.nv());
    let mut k_bias = Configuration::zeros(n_lambda(mechanism));
    constraint_jacobian_and_bias(mechanism, state, &mut k_matrix, &mut k_bias)?;
    Ok((k_matrix, k_bias))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use dynamics_inertia::inertia::SpatialInertia;
    use dynamics_joint::{joint::JointWrapper, revolute::JointModelRevolute};
    use dynamics_spatial::{frame::CartesianFrame3D, motion::SpatialRotation, se3::Transform3D, symmetric3::Symmetric3, vector3d::Vector3D};

    use crate::{body::RigidBody, joint::Joint, mechanism::standard_gravity, state::MechanismState};

    /// Two links hinged to the world at the same point by parallel revolute joints and
    /// welded together at their tips: a planar four-bar reduced to two links, so the
    /// loop-closure constraint is a single fixed joint (6 rows).
    fn welded_two_link() -> (Mechanism, usize, usize) {
        let mut m = Mechanism::new("welded", standard_gravity());
        let world_frame = m.body(0).default_frame();

        let before_a = CartesianFrame3D::new_unique();
        let link_a_frame = CartesianFrame3D::new_unique();
        let inertia_a = SpatialInertia::new(link_a_frame, 1.0, Vector3D::new(0.5, 0.0, 0.0), Symmetric3::zeros());
        let link_a = RigidBody::new("a", inertia_a);
        let joint_a = Joint::new("ja", before_a, link_a_frame, JointWrapper::revolute(JointModelRevolute::new_rz()));
        let t_a = Transform3D::new(before_a, world_frame, Vector3D::zeros(), SpatialRotation::identity());
        m.attach(0, joint_a, t_a, link_a, None).unwrap();

        let before_b = CartesianFrame3D::new_unique();
        let link_b_frame = CartesianFrame3D::new_unique();
        let inertia_b = SpatialInertia::new(link_b_frame, 1.0, Vector3D::new(0.5, 0.0, 0.0), Symmetric3::zeros());
        let link_b = RigidBody::new("b", inertia_b);
        let joint_b = Joint::new("jb", before_b, link_b_frame, JointWrapper::revolute(JointModelRevolute::new_rz()));
        let t_b = Transform3D::new(before_b, world_frame, Vector3D::zeros(), SpatialRotation::identity());
        m.attach(0, joint_b, t_b, link_b, None).unwrap();

        let weld_frame_a = CartesianFrame3D::new_unique();
        let weld_frame_b = CartesianFrame3D::new_unique();
        let weld = Joint::new(
            "weld",
            weld_frame_a,
            weld_frame_b,
            JointWrapper::fixed(dynamics_joint::fixed::JointModelFixed::new()),
        );
        let t_pred = Transform3D::new(weld_frame_a, link_a_frame, Vector3D::new(1.0, 0.0, 0.0), SpatialRotation::identity());
        let t_succ = Transform3D::new(weld_frame_b, link_b_frame, Vector3D::new(1.0, 0.0, 0.0), SpatialRotation::identity());
        m.close_loop(weld, 1, t_pred, 2, t_succ).unwrap();

        (m, 1, 2)
    }

    #[test]
    fn fixed_loop_joint_has_six_constraint_rows() {
        let (m, _, _) = welded_two_link();
        assert_eq!(n_lambda(&m), 6);
    }

    #[test]
    fn constraint_jacobian_has_expected_shape() {
        let (m, _, _) = welded_two_link();
        let mut state = MechanismState::new(&m);
        let (k_matrix, k_bias) = constraint_jacobian_and_bias_alloc(&m, &mut state).unwrap();
        assert_eq!(k_matrix.nrows(), 6);
        assert_eq!(k_matrix.ncols(), m.nv());
        assert_eq!(k_bias.len(), 6);
    }

    #[test]
    fn constraint_bias_is_zero_at_rest() {
        let (m, _, _) = welded_two_link();
        let mut state = MechanismState::new(&m);
        let (_, k_bias) = constraint_jacobian_and_bias_alloc(&m, &mut state).unwrap();
        for i in 0..k_bias.len() {
            assert_relative_eq!(k_bias[i], 0.0, epsilon = 1e-12);
        }
    }
}
