use criterion::{black_box, criterion_group, criterion_main, Criterion};
use dynamics_rs::prelude::*;
use dynamics_tests::revolute_chain;

fn bench_dynamics(c: &mut Criterion) {
    let m = revolute_chain(12);
    let mut state = MechanismState::new(&m);
    let mut result = DynamicsResult::new(&m);
    let model = SpringDamperFriction::new(0.0, 0.0, 0.0, 1.0);
    let mut contacts = ContactSet::new(model, Vec::new(), Vec::new());
    let tau = Configuration::zeros(m.nv());

    c.bench_function("dynamics_revolute_chain_12", |b| {
        b.iter(|| {
            dynamics(&m, &mut state, black_box(&tau), None, &mut contacts, &mut result).unwrap();
        });
    });
}

fn bench_inverse_dynamics(c: &mut Criterion) {
    let m = revolute_chain(12);
    let mut state = MechanismState::new(&m);
    let world = m.body(0).default_frame();
    let mut accel = vec![SpatialAcceleration::zero(world, world, world); m.nbodies()];
    let mut wrenches = vec![Wrench::zero(world, world); m.nbodies()];
    let mut tau = Configuration::zeros(m.nv());
    let vdot = Configuration::from_element(m.nv(), 1.0);

    c.bench_function("inverse_dynamics_revolute_chain_12", |b| {
        b.iter(|| {
            inverse_dynamics(&m, &mut state, black_box(&vdot), None, &mut accel, &mut wrenches, &mut tau).unwrap();
        });
    });
}

criterion_group!(benches, bench_dynamics, bench_inverse_dynamics);
criterion_main!(benches);
