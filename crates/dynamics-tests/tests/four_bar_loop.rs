//! A four-bar-style planar loop: two revolute links welded at their tips. The
//! constrained forward dynamics solve must leave the welded seam's constraint equation
//! satisfied, `K*vdot + k ≈ 0`, for an arbitrary applied torque.

use approx::assert_relative_eq;
use dynamics_rs::prelude::*;
use dynamics_tests::four_bar_loop;

#[test]
fn constraint_residual_vanishes_after_a_constrained_solve() {
    let m = four_bar_loop();
    let mut state = MechanismState::new(&m);
    state.set_configuration(&m, Configuration::from_row_slice(&[0.4, -0.2])).unwrap();

    let mut result = DynamicsResult::new(&m);
    let model = SpringDamperFriction::new(0.0, 0.0, 0.0, 1.0);
    let mut contacts = ContactSet::new(model, Vec::new(), Vec::new());
    let tau = Configuration::from_row_slice(&[1.5, -0.8]);

    dynamics(&m, &mut state, &tau, None, &mut contacts, &mut result).unwrap();

    for row in 0..result.constraint_jacobian.nrows() {
        let mut residual = result.constraint_bias[row];
        for col in 0..result.constraint_jacobian.ncols() {
            residual += result.constraint_jacobian[(row, col)] * result.vdot[col];
        }
        assert_relative_eq!(residual, 0.0, epsilon = 1e-8);
    }
}

#[test]
fn loop_closure_has_six_constraint_rows_for_a_single_fixed_weld() {
    let m = four_bar_loop();
    assert_eq!(m.nv(), 2);
    let mut state = MechanismState::new(&m);
    let (k_matrix, k_bias) = constraint_jacobian_and_bias_alloc(&m, &mut state).unwrap();
    assert_eq!(k_matrix.nrows(), 6);
    assert_eq!(k_bias.len(), 6);
}
