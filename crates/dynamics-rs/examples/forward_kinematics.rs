use dynamics_rs::prelude::*;
use dynamics_rs::spatial::{motion::SpatialRotation, vector3d::Vector3D};

fn main() {
    // A two-link planar arm: two revolute joints about z, each link 1m long.
    let mut m = Mechanism::new("planar_arm", standard_gravity());
    let world_frame = m.body(0).default_frame();

    let before1 = CartesianFrame3D::new_unique();
    let link1_frame = CartesianFrame3D::new_unique();
    let inertia1 = SpatialInertia::from_sphere(link1_frame, 1.0, 0.05).unwrap();
    let link1 = RigidBody::new("link1", inertia1);
    let joint1 = Joint::new("shoulder", before1, link1_frame, JointWrapper::revolute(JointModelRevolute::new_rz()));
    let t1 = Transform3D::new(before1, world_frame, Vector3D::zeros(), SpatialRotation::identity());
    let link1_index = m.attach(0, joint1, t1, link1, None).unwrap();

    let before2 = CartesianFrame3D::new_unique();
    let link2_frame = CartesianFrame3D::new_unique();
    let inertia2 = SpatialInertia::from_sphere(link2_frame, 1.0, 0.05).unwrap();
    let link2 = RigidBody::new("link2", inertia2);
    let joint2 = Joint::new("elbow", before2, link2_frame, JointWrapper::revolute(JointModelRevolute::new_rz()));
    let t2 = Transform3D::new(before2, link1_frame, Vector3D::new(1.0, 0.0, 0.0), SpatialRotation::identity());
    m.attach(link1_index, joint2, t2, link2, None).unwrap();

    let mut state = MechanismState::new(&m);
    state.set_configuration(&m, Configuration::from_row_slice(&[0.3, -0.6])).unwrap();

    for i in 1..m.nbodies() {
        let t = state.transform_to_root(&m, i);
        println!("body {i} translation: {:?}", t.translation().as_slice());
    }

    let com = center_of_mass(&m, &mut state, &m.descendants(0)).unwrap();
    println!("center of mass: {:?}", com.as_slice());
}
