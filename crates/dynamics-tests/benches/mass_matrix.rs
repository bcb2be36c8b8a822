use criterion::{black_box, criterion_group, criterion_main, Criterion};
use dynamics_rs::prelude::*;
use dynamics_tests::{revolute_chain, two_link_arm};

fn bench_mass_matrix_chain(c: &mut Criterion) {
    let m = revolute_chain(12);
    let mut state = MechanismState::new(&m);

    c.bench_function("mass_matrix_revolute_chain_12", |b| {
        b.iter(|| black_box(mass_matrix_alloc(&m, &mut state)));
    });
}

fn bench_mass_matrix_two_link_arm(c: &mut Criterion) {
    let m = two_link_arm();
    let mut state = MechanismState::new(&m);

    c.bench_function("mass_matrix_two_link_arm", |b| {
        b.iter(|| black_box(mass_matrix_alloc(&m, &mut state)));
    });
}

criterion_group!(benches, bench_mass_matrix_chain, bench_mass_matrix_two_link_arm);
criterion_main!(benches);
