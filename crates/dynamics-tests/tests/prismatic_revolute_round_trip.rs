//! A prismatic-then-revolute chain: inverse dynamics at an arbitrary acceleration,
//! followed by forward dynamics driven by the resulting torque, must recover the same
//! acceleration.

use approx::assert_relative_eq;
use dynamics_rs::prelude::*;
use dynamics_tests::prismatic_revolute_chain;

#[test]
fn inverse_then_forward_dynamics_round_trips_the_acceleration() {
    let m = prismatic_revolute_chain();
    let mut state = MechanismState::new(&m);
    state.set_configuration(&m, Configuration::from_row_slice(&[0.2, 0.9])).unwrap();
    state.set_velocity(&m, Configuration::from_row_slice(&[-0.3, 0.4])).unwrap();

    let vdot = Configuration::from_row_slice(&[1.7, -2.3]);
    let tau = inverse_dynamics_alloc(&m, &mut state, &vdot, None);

    let mut result = DynamicsResult::new(&m);
    let model = SpringDamperFriction::new(0.0, 0.0, 0.0, 1.0);
    let mut contacts = ContactSet::new(model, Vec::new(), Vec::new());
    dynamics(&m, &mut state, &tau, None, &mut contacts, &mut result).unwrap();

    assert_relative_eq!(result.vdot[0], vdot[0], epsilon = 1e-9);
    assert_relative_eq!(result.vdot[1], vdot[1], epsilon = 1e-9);
}

#[test]
fn joint_space_velocity_configuration_round_trip_through_local_coordinates() {
    let m = prismatic_revolute_chain();
    let q0 = Configuration::from_row_slice(&[0.2, 0.9]);
    let v = Configuration::from_row_slice(&[0.5, -0.2]);
    let dt = 1e-4;
    let q1 = integrate_configuration(&m, &q0, &v, dt);

    // for prismatic/revolute joints q is a vector space, so local/global coordinates
    // coincide with the subtraction/addition used for their own q-dot map.
    assert_relative_eq!((q1[0] - q0[0]) / dt, v[0], epsilon = 1e-6);
    assert_relative_eq!((q1[1] - q0[1]) / dt, v[1], epsilon = 1e-6);
}
