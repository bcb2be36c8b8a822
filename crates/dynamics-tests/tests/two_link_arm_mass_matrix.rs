//! Cross-checks the composite-rigid-body mass matrix of a two-link planar arm against
//! a central finite difference of inverse dynamics with respect to joint acceleration,
//! at rest (`v = 0`, so the Coriolis/centrifugal term in the bias drops out and
//! `tau(vdot) = M*vdot + c(q, 0)` is exactly linear in `vdot`).

use approx::assert_relative_eq;
use dynamics_rs::prelude::*;
use dynamics_tests::two_link_arm;

fn tau_at(m: &Mechanism, state: &mut MechanismState, vdot: &Configuration) -> Configuration {
    inverse_dynamics_alloc(m, state, vdot, None)
}

#[test]
fn mass_matrix_matches_finite_difference_of_inverse_dynamics() {
    let m = two_link_arm();
    let q = Configuration::from_row_slice(&[0.3, -0.6]);
    let mut state = MechanismState::new(&m);
    state.set_configuration(&m, q).unwrap();

    let mm = mass_matrix_alloc(&m, &mut state);
    let eps = 1e-6;

    for j in 0..m.nv() {
        let mut vdot_plus = Configuration::zeros(m.nv());
        let mut vdot_minus = Configuration::zeros(m.nv());
        vdot_plus[j] = eps;
        vdot_minus[j] = -eps;

        let tau_plus = tau_at(&m, &mut state, &vdot_plus);
        let tau_minus = tau_at(&m, &mut state, &vdot_minus);

        for i in 0..m.nv() {
            let finite_difference = (tau_plus[i] - tau_minus[i]) / (2.0 * eps);
            // only the lower triangle of `mm` is filled; mirror for the comparison.
            let entry = if i >= j { mm[(i, j)] } else { mm[(j, i)] };
            assert_relative_eq!(finite_difference, entry, epsilon = 1e-6);
        }
    }
}

#[test]
fn mass_matrix_is_positive_definite() {
    // only the lower triangle is filled; mirror it before checking positive-definiteness.
    let m = two_link_arm();
    let q = Configuration::from_row_slice(&[0.7, 1.1]);
    let mut state = MechanismState::new(&m);
    state.set_configuration(&m, q).unwrap();

    let mm = mass_matrix_alloc(&m, &mut state);
    assert!(mm[(0, 0)] > 0.0);
    let off_diagonal = mm[(1, 0)];
    let det = mm[(0, 0)] * mm[(1, 1)] - off_diagonal * off_diagonal;
    assert!(det > 0.0);
}
