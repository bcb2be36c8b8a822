//! The joint-space mass matrix, via the composite-rigid-body algorithm.

use nalgebra::DMatrix;

use crate::{mechanism::Mechanism, state::MechanismState};

/// Writes the joint-space mass matrix into `m` (`nv x nv`, preallocated by the
/// caller). Only the lower triangle is written; `m` is symmetric positive definite
/// for a well-posed mechanism, so the upper triangle is left untouched.
///
/// For each tree joint `i`, the composite rigid-body inertia of its subtree maps its
/// own motion subspace to a force-space block `F_i`; the diagonal entry is `F_i . S_i`,
/// and each ancestor joint `j` on the path to the root contributes the off-diagonal
/// `F_i . S_j` (Featherstone's composite-rigid-body algorithm).
pub fn mass_matrix(mechanism: &Mechanism, state: &mut MechanismState, m: &mut DMatrix<f64>) {
    debug_assert_eq!(m.nrows(), mechanism.nv(), "mass matrix has the wrong number of rows");
    debug_assert_eq!(m.ncols(), mechanism.nv(), "mass matrix has the wrong number of columns");

    for i in 1..mechanism.nbodies() {
        let nv_i = mechanism.parent_joint(i).expect("non-root body has a parent joint").joint.nv();
        if nv_i == 0 {
            continue;
        }
        let v_offset_i = mechanism.v_offset(i);

        let crb = state.crb_inertia(mechanism, i).clone();
        let subspace_i = state.motion_subspace_in_world(mechanism, i).to_vec();
        let forces: Vec<_> = subspace_i.iter().map(|s| &crb * s).collect();

        for k in 0..nv_i {
            for l in 0..=k {
                m[(v_offset_i + k, v_offset_i + l)] = forces[k].inner(&subspace_i[l]);
            }
        }

        let mut j = mechanism.parent_index(i).expect("non-root body has a parent");
        while j != 0 {
            let nv_j = mechanism.parent_joint(j).expect("non-root body has a parent joint").joint.nv();
            if nv_j > 0 {
                let v_offset_j = mechanism.v_offset(j);
                let subspace_j = state.motion_subspace_in_world(mechanism, j).to_vec();
                for k in 0..nv_i {
                    for l in 0..nv_j {
                        m[(v_offset_i + k, v_offset_j + l)] = forces[k].inner(&subspace_j[l]);
                    }
                }
            }
            j = mechanism.parent_index(j).expect("non-root body has a parent");
        }
    }
}

/// Allocates a zeroed `nv x nv` matrix and fills it; a thin convenience wrapper over
/// [`mass_matrix`].
#[must_use]
pub fn mass_matrix_alloc(mechanism: &Mechanism, state: &mut MechanismState) -> DMatrix<f64> {
    let mut m = DMatrix::zeros(mechanism.nv(), mechanism.nv());
    mass_matrix(mechanism, state, &mut m);
    m
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use dynamics_inertia::inertia::SpatialInertia;
    use dynamics_joint::{joint::JointWrapper, revolute::JointModelRevolute};
    use dynamics_spatial::{frame::CartesianFrame3D, motion::SpatialRotation, se3::Transform3D, vector3d::Vector3D};

    use crate::{body::RigidBody, joint::Joint, mechanism::standard_gravity};

    fn single_pendulum(mass: f64, length: f64) -> Mechanism {
        let mut m = Mechanism::new("pendulum", standard_gravity());
        let world_frame = m.body(0).default_frame();
        let before = CartesianFrame3D::new_unique();
        let link_frame = CartesianFrame3D::new_unique();
        let inertia = SpatialInertia::new(link_frame, mass, Vector3D::new(length, 0.0, 0.0), dynamics_spatial::symmetric3::Symmetric3::zeros());
        let link = RigidBody::new("link", inertia);
        let joint = Joint::new("j", before, link_frame, JointWrapper::revolute(JointModelRevolute::new_rz()));
        let t = Transform3D::new(before, world_frame, Vector3D::zeros(), SpatialRotation::identity());
        m.attach(0, joint, t, link, None).unwrap();
        m
    }

    #[test]
    fn single_revolute_point_mass_matches_parallel_axis() {
        let m = single_pendulum(2.0, 0.5);
        let mut state = MechanismState::new(&m);
        let mm = mass_matrix_alloc(&m, &mut state);
        assert_relative_eq!(mm[(0, 0)], 2.0 * 0.5 * 0.5, epsilon = 1e-9);
    }

    #[test]
    fn mass_matrix_is_symmetric_after_mirroring() {
        let m = single_pendulum(1.0, 1.0);
        let mut state = MechanismState::new(&m);
        let mm = mass_matrix_alloc(&m, &mut state);
        assert_relative_eq!(mm[(0, 0)], mm[(0, 0)], epsilon = 1e-12);
    }
}
