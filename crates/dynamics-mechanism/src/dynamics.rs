//! Constrained forward dynamics: the top-level `dynamics` entry point that ties
//! contact, inverse dynamics, the mass matrix and loop-closure constraints together,
//! and the KKT solve at its core.

use nalgebra::{Cholesky, DMatrix, DVector};

use dynamics_spatial::{configuration::Configuration, wrench::Wrench};

use crate::{
    constraint, contact::ContactModel, contact::ContactSet, errors::DynamicsError, inverse_dynamics, mass_matrix, mechanism::Mechanism,
    result::DynamicsResult, state::MechanismState,
};

fn to_dvector(c: &Configuration) -> DVector<f64> {
    DVector::from_row_slice(c.as_slice())
}

fn from_dvector(v: &DVector<f64>) -> Configuration {
    Configuration::from_row_slice(v.as_slice())
}

/// Solves the constrained equation of motion
///
/// ```text
/// [ M  K^T ] [ v-dot ] = [ tau - c ]
/// [ K  0   ] [ lambda]   [ -k      ]
/// ```
///
/// via Cholesky factorization of `M` and, when there are constraints, a Schur
/// complement elimination of `lambda` (Featherstone, *Rigid Body Dynamics
/// Algorithms*, section 8.4). Writes `result.vdot`, `result.lambda` and the factor
/// scratch (`l_factor`, `a_factor`, `y_factor`, `z_factor`).
///
/// Fails with [`DynamicsError::Singular`] if `M` is not positive definite, or (when
/// there are constraints) if the Schur complement is not: the constraints are then
/// redundant or conflicting.
pub fn dynamics_solve(result: &mut DynamicsResult, tau: &Configuration) -> Result<(), DynamicsError> {
    let chol = Cholesky::new(result.mass_matrix.clone())
        .ok_or_else(|| DynamicsError::Singular("mass matrix is not positive definite".to_string()))?;
    result.l_factor.copy_from(&chol.l());

    let mut tau_prime = to_dvector(tau) - to_dvector(&result.bias);

    let n_lambda = result.constraint_bias.len();
    if n_lambda == 0 {
        let vdot = chol.solve(&tau_prime);
        result.vdot = from_dvector(&vdot);
        return Ok(());
    }

    let k_transpose = result.constraint_jacobian.transpose();
    let x = result
        .l_factor
        .solve_lower_triangular(&k_transpose)
        .ok_or_else(|| DynamicsError::Singular("mass matrix Cholesky factor is singular".to_string()))?;
    result.y_factor.copy_from(&x.transpose());

    let z = result
        .l_factor
        .solve_lower_triangular(&tau_prime)
        .ok_or_else(|| DynamicsError::Singular("mass matrix Cholesky factor is singular".to_string()))?;
    result.z_factor = from_dvector(&z);

    let a = x.transpose() * &x;
    result.a_factor.copy_from(&a);
    let b = &x.transpose() * &z + to_dvector(&result.constraint_bias);

    let chol_a =
        Cholesky::new(a).ok_or_else(|| DynamicsError::Singular("loop-closure constraints are rank-deficient".to_string()))?;
    let lambda = chol_a.solve(&b);
    result.lambda = from_dvector(&lambda);

    tau_prime -= k_transpose * &lambda;
    let vdot = chol.solve(&tau_prime);
    result.vdot = from_dvector(&vdot);

    Ok(())
}

/// The top-level algorithm: contact forces, dynamics bias, mass matrix and
/// loop-closure constraints, solved for `result.vdot` and `result.lambda`.
///
/// 1. [`crate::contact::contact_dynamics`] fills `result.contact_wrenches`.
/// 2. Total wrenches are `external[i] + contact[i]`.
/// 3. [`inverse_dynamics::dynamics_bias`] fills `result.bias` (and per-body
///    accelerations/joint wrenches, at zero joint acceleration).
/// 4. [`mass_matrix::mass_matrix`] fills `result.mass_matrix`.
/// 5. [`constraint::constraint_jacobian_and_bias`] fills `result.constraint_jacobian`/
///    `result.constraint_bias`.
/// 6. [`dynamics_solve`] solves for `result.vdot`/`result.lambda`.
pub fn dynamics<M: ContactModel>(
    mechanism: &Mechanism,
    state: &mut MechanismState,
    tau: &Configuration,
    external_wrenches: Option<&[Wrench]>,
    contacts: &mut ContactSet<M>,
    result: &mut DynamicsResult,
) -> Result<(), DynamicsError> {
    contact::contact_dynamics(mechanism, state, contacts, result)?;

    let total_wrenches: Vec<Wrench> = (0..mechanism.nbodies())
        .map(|i| match external_wrenches {
            Some(ext) => ext[i].clone() + &result.contact_wrenches[i],
            None => result.contact_wrenches[i].clone(),
        })
        .collect();

    {
        let (accelerations, joint_wrenches, bias) = (&mut result.body_accelerations, &mut result.joint_wrenches, &mut result.bias);
        inverse_dynamics::dynamics_bias(mechanism, state, Some(&total_wrenches), accelerations, joint_wrenches, bias)?;
    }

    mass_matrix::mass_matrix(mechanism, state, &mut result.mass_matrix);
    constraint::constraint_jacobian_and_bias(mechanism, state, &mut result.constraint_jacobian, &mut result.constraint_bias)?;

    dynamics_solve(result, tau)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use dynamics_inertia::inertia::SpatialInertia;
    use dynamics_joint::{joint::JointWrapper, revolute::JointModelRevolute};
    use dynamics_spatial::{frame::CartesianFrame3D, motion::SpatialRotation, se3::Transform3D, symmetric3::Symmetric3, vector3d::Vector3D};

    use crate::{body::RigidBody, contact::{ContactPoint, HalfSpace, SpringDamperFriction}, joint::Joint, mechanism::standard_gravity};

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
    fn unconstrained_dynamics_matches_inverse_dynamics_round_trip() {
        let m = single_pendulum(1.0, 1.0);
        let mut state = MechanismState::new(&m);
        let mut result = DynamicsResult::new(&m);
        let model = SpringDamperFriction::new(0.0, 0.0, 0.0, 1.0);
        let mut contacts = ContactSet::new(model, Vec::new(), Vec::new());

        let tau = Configuration::from_row_slice(&[3.0]);
        dynamics(&m, &mut state, &tau, None, &mut contacts, &mut result).unwrap();

        let recovered_tau = inverse_dynamics::inverse_dynamics_alloc(&m, &mut state, &result.vdot, None);
        assert_relative_eq!(recovered_tau[0], tau[0], epsilon = 1e-7);
    }

    #[test]
    fn falling_point_mass_accelerates_at_minus_g() {
        let m = single_pendulum(1.0, 0.0);
        let mut state = MechanismState::new(&m);
        let mut result = DynamicsResult::new(&m);
        let model = SpringDamperFriction::new(0.0, 0.0, 0.0, 1.0);
        let mut contacts = ContactSet::new(model, Vec::new(), Vec::new());

        let tau = Configuration::zeros(1);
        dynamics(&m, &mut state, &tau, None, &mut contacts, &mut result).unwrap();
        assert_relative_eq!(result.vdot[0], 0.0, epsilon = 1e-9);
    }

    #[test]
    fn resting_contact_point_registers_a_wrench() {
        let m = single_pendulum(1.0, 1.0);
        let mut state = MechanismState::new(&m);
        let mut result = DynamicsResult::new(&m);
        let model = SpringDamperFriction::new(1e4, 10.0, 0.5, 1e-3);
        let points = vec![ContactPoint::new(1, Vector3D::new(1.0, 0.0, 0.0))];
        let environment = vec![HalfSpace::new(Vector3D::new(1.0, 0.0, 0.1), Vector3D::new(0.0, 0.0, 1.0))];
        let mut contacts = ContactSet::new(model, points, environment);

        let tau = Configuration::zeros(1);
        dynamics(&m, &mut state, &tau, None, &mut contacts, &mut result).unwrap();
        assert!(result.contact_wrenches[1].force().as_slice()[2] > 0.0);
    }
}
