//! A single free-floating body under gravity, with no contact and no applied wrench:
//! every linear-velocity component falls at exactly `-g` along the gravity axis, and
//! orientation is unaffected since a uniform force field produces no net torque about
//! the center of mass.

use approx::assert_relative_eq;
use dynamics_rs::prelude::*;
use dynamics_tests::floating_body;

#[test]
fn free_floating_sphere_falls_straight_down() {
    let m = floating_body(3.0, 0.2);
    let mut state = MechanismState::new(&m);

    let mut result = DynamicsResult::new(&m);
    let model = SpringDamperFriction::new(0.0, 0.0, 0.0, 1.0);
    let mut contacts = ContactSet::new(model, Vec::new(), Vec::new());
    let tau = Configuration::zeros(m.nv());

    dynamics(&m, &mut state, &tau, None, &mut contacts, &mut result).unwrap();

    // floating joint velocity layout is angular-then-linear; the linear z-acceleration
    // is the 6th (index 5) generalized coordinate.
    for i in 0..3 {
        assert_relative_eq!(result.vdot[i], 0.0, epsilon = 1e-9);
    }
    assert_relative_eq!(result.vdot[3], 0.0, epsilon = 1e-9);
    assert_relative_eq!(result.vdot[4], 0.0, epsilon = 1e-9);
    assert_relative_eq!(result.vdot[5], -9.81, epsilon = 1e-9);
}

#[test]
fn free_floating_sphere_mass_matrix_is_block_diagonal_at_rest() {
    let m = floating_body(3.0, 0.2);
    let mut state = MechanismState::new(&m);
    let mm = mass_matrix_alloc(&m, &mut state);

    // no angular/linear coupling for a body hinged to the world at its own center of
    // mass: the off-diagonal 3x3 block is zero.
    for row in 3..6 {
        for col in 0..3 {
            assert_relative_eq!(mm[(row, col)], 0.0, epsilon = 1e-9);
        }
    }
    for i in 0..3 {
        assert_relative_eq!(mm[(i + 3, i + 3)], 3.0, epsilon = 1e-9);
    }
}
