use dynamics_rs::prelude::*;
use dynamics_rs::spatial::{motion::SpatialRotation, vector3d::Vector3D};

fn single_pendulum(mass: f64, length: f64) -> Mechanism {
    let mut m = Mechanism::new("pendulum", standard_gravity());
    let world_frame = m.body(0).default_frame();
    let before = CartesianFrame3D::new_unique();
    let link_frame = CartesianFrame3D::new_unique();
    let inertia = SpatialInertia::from_sphere(link_frame, mass, length.max(0.01) * 0.1).unwrap();
    let link = RigidBody::new("link", inertia);
    let joint = Joint::new("hinge", before, link_frame, JointWrapper::revolute(JointModelRevolute::new_rz()));
    let t = Transform3D::new(before, world_frame, Vector3D::zeros(), SpatialRotation::identity());
    m.attach(0, joint, t, link, None).unwrap();
    m
}

fn main() {
    let m = single_pendulum(2.0, 0.5);
    let mut state = MechanismState::new(&m);
    state.set_configuration(&m, Configuration::from_row_slice(&[std::f64::consts::FRAC_PI_2])).unwrap();

    let mut result = DynamicsResult::new(&m);
    let model = SpringDamperFriction::new(0.0, 0.0, 0.0, 1.0);
    let mut contacts = ContactSet::new(model, Vec::new(), Vec::new());
    let tau = Configuration::zeros(m.nv());

    dynamics(&m, &mut state, &tau, None, &mut contacts, &mut result).expect("well-posed mechanism");
    println!("joint accelerations under gravity alone: {:?}", result.vdot.as_slice());
}
