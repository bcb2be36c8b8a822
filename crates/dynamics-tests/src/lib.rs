//! Mechanism fixtures shared between the integration tests and the benchmarks in this
//! crate, kept out of `dynamics-mechanism` itself so its heavier dev-dependencies
//! (`criterion`) don't leak into consumers of the library crates.

use dynamics_inertia::inertia::SpatialInertia;
use dynamics_joint::{
    fixed::JointModelFixed, floating::JointModelFloating, joint::JointWrapper, prismatic::JointModelPrismatic, revolute::JointModelRevolute,
};
use dynamics_mechanism::{body::RigidBody, joint::Joint, mechanism::standard_gravity, mechanism::Mechanism};
use dynamics_spatial::{frame::CartesianFrame3D, motion::SpatialRotation, se3::Transform3D, symmetric3::Symmetric3, vector3d::Vector3D};

/// A single revolute pendulum: a point mass at `(length, 0, 0)` in the link frame,
/// hinged to the world about the `y` axis, so gravity (along `-z`) produces a nonzero
/// torque about the hinge whenever the arm is off the vertical.
#[must_use]
pub fn single_pendulum(mass: f64, length: f64) -> Mechanism {
    let mut m = Mechanism::new("pendulum", standard_gravity());
    let world_frame = m.body(0).default_frame();
    let before = CartesianFrame3D::new_unique();
    let link_frame = CartesianFrame3D::new_unique();
    let inertia = SpatialInertia::new(link_frame, mass, Vector3D::new(length, 0.0, 0.0), Symmetric3::zeros());
    let link = RigidBody::new("link", inertia);
    let joint = Joint::new("hinge", before, link_frame, JointWrapper::revolute(JointModelRevolute::new_ry()));
    let t = Transform3D::new(before, world_frame, Vector3D::zeros(), SpatialRotation::identity());
    m.attach(0, joint, t, link, None).unwrap();
    m
}

/// A single free-floating body: a uniform sphere hinged to the world by a 6-DoF
/// floating joint, with no other constraint.
#[must_use]
pub fn floating_body(mass: f64, radius: f64) -> Mechanism {
    let mut m = Mechanism::new("floating", standard_gravity());
    let world_frame = m.body(0).default_frame();
    let link_frame = CartesianFrame3D::new_unique();
    let inertia = SpatialInertia::from_sphere(link_frame, mass, radius).unwrap();
    let body = RigidBody::new("body", inertia);
    let joint = Joint::new("floating", world_frame, link_frame, JointWrapper::floating(JointModelFloating::new()));
    let t = Transform3D::identity(world_frame);
    m.attach(0, joint, t, body, None).unwrap();
    m
}

/// A two-link planar arm, both joints revolute about `z`, unit masses, unit link
/// lengths.
#[must_use]
pub fn two_link_arm() -> Mechanism {
    let mut m = Mechanism::new("two_link_arm", standard_gravity());
    let world_frame = m.body(0).default_frame();

    let before1 = CartesianFrame3D::new_unique();
    let link1_frame = CartesianFrame3D::new_unique();
    let inertia1 = SpatialInertia::new(link1_frame, 1.0, Vector3D::new(0.5, 0.0, 0.0), Symmetric3::new(0.01, 0.02, 0.02, 0.0, 0.0, 0.0));
    let link1 = RigidBody::new("link1", inertia1);
    let joint1 = Joint::new("shoulder", before1, link1_frame, JointWrapper::revolute(JointModelRevolute::new_rz()));
    let t1 = Transform3D::new(before1, world_frame, Vector3D::zeros(), SpatialRotation::identity());
    let link1_index = m.attach(0, joint1, t1, link1, None).unwrap();

    let before2 = CartesianFrame3D::new_unique();
    let link2_frame = CartesianFrame3D::new_unique();
    let inertia2 = SpatialInertia::new(link2_frame, 1.0, Vector3D::new(0.5, 0.0, 0.0), Symmetric3::new(0.01, 0.02, 0.02, 0.0, 0.0, 0.0));
    let link2 = RigidBody::new("link2", inertia2);
    let joint2 = Joint::new("elbow", before2, link2_frame, JointWrapper::revolute(JointModelRevolute::new_rz()));
    let t2 = Transform3D::new(before2, link1_frame, Vector3D::new(1.0, 0.0, 0.0), SpatialRotation::identity());
    m.attach(link1_index, joint2, t2, link2, None).unwrap();

    m
}

/// A prismatic-then-revolute chain: a slider along `x`, followed by a hinge about `z`.
#[must_use]
pub fn prismatic_revolute_chain() -> Mechanism {
    let mut m = Mechanism::new("prismatic_revolute", standard_gravity());
    let world_frame = m.body(0).default_frame();

    let before1 = CartesianFrame3D::new_unique();
    let slider_frame = CartesianFrame3D::new_unique();
    let inertia1 = SpatialInertia::from_sphere(slider_frame, 1.5, 0.08).unwrap();
    let slider = RigidBody::new("slider", inertia1);
    let joint1 = Joint::new("slide", before1, slider_frame, JointWrapper::prismatic(JointModelPrismatic::new_px()));
    let t1 = Transform3D::new(before1, world_frame, Vector3D::zeros(), SpatialRotation::identity());
    let slider_index = m.attach(0, joint1, t1, slider, None).unwrap();

    let before2 = CartesianFrame3D::new_unique();
    let link_frame = CartesianFrame3D::new_unique();
    let inertia2 = SpatialInertia::new(link_frame, 0.8, Vector3D::new(0.3, 0.0, 0.0), Symmetric3::zeros());
    let link = RigidBody::new("link", inertia2);
    let joint2 = Joint::new("hinge", before2, link_frame, JointWrapper::revolute(JointModelRevolute::new_rz()));
    let t2 = Transform3D::new(before2, slider_frame, Vector3D::zeros(), SpatialRotation::identity());
    m.attach(slider_index, joint2, t2, link, None).unwrap();

    m
}

/// A four-bar-style planar loop: two links hinged to the world at the same point and
/// welded together at their tips via a fixed (6-DoF constraint) loop joint.
#[must_use]
pub fn four_bar_loop() -> Mechanism {
    let mut m = Mechanism::new("four_bar", standard_gravity());
    let world_frame = m.body(0).default_frame();

    let before_a = CartesianFrame3D::new_unique();
    let link_a_frame = CartesianFrame3D::new_unique();
    let inertia_a = SpatialInertia::new(link_a_frame, 1.0, Vector3D::new(0.5, 0.0, 0.0), Symmetric3::zeros());
    let link_a = RigidBody::new("a", inertia_a);
    let joint_a = Joint::new("ja", before_a, link_a_frame, JointWrapper::revolute(JointModelRevolute::new_rz()));
    let t_a = Transform3D::new(before_a, world_frame, Vector3D::zeros(), SpatialRotation::identity());
    m.attach(0, joint_a, t_a, link_a, None).unwrap();

    let before_b = CartesianFrame3D::new_unique();
    let link_b_frame = CartesianFrame3D::new_unique();
    let inertia_b = SpatialInertia::new(link_b_frame, 1.0, Vector3D::new(0.5, 0.0, 0.0), Symmetric3::zeros());
    let link_b = RigidBody::new("b", inertia_b);
    let joint_b = Joint::new("jb", before_b, link_b_frame, JointWrapper::revolute(JointModelRevolute::new_rz()));
    let t_b = Transform3D::new(before_b, world_frame, Vector3D::zeros(), SpatialRotation::identity());
    m.attach(0, joint_b, t_b, link_b, None).unwrap();

    let weld_frame_a = CartesianFrame3D::new_unique();
    let weld_frame_b = CartesianFrame3D::new_unique();
    let weld = Joint::new("weld", weld_frame_a, weld_frame_b, JointWrapper::fixed(JointModelFixed::new()));
    let t_pred = Transform3D::new(weld_frame_a, link_a_frame, Vector3D::new(1.0, 0.0, 0.0), SpatialRotation::identity());
    let t_succ = Transform3D::new(weld_frame_b, link_b_frame, Vector3D::new(1.0, 0.0, 0.0), SpatialRotation::identity());
    m.close_loop(weld, 1, t_pred, 2, t_succ).unwrap();

    m
}

/// A chain of `n` identical revolute links about alternating axes, for benchmarking.
#[must_use]
pub fn revolute_chain(n: usize) -> Mechanism {
    let mut m = Mechanism::new("chain", standard_gravity());
    let world_frame = m.body(0).default_frame();
    let mut parent_index = 0;
    let mut parent_frame = world_frame;

    for i in 0..n {
        let before = CartesianFrame3D::new_unique();
        let link_frame = CartesianFrame3D::new_unique();
        let inertia = SpatialInertia::new(link_frame, 1.0, Vector3D::new(0.5, 0.0, 0.0), Symmetric3::new(0.01, 0.02, 0.02, 0.0, 0.0, 0.0));
        let link = RigidBody::new(format!("link{i}"), inertia);
        let axis = if i % 2 == 0 { JointModelRevolute::new_rz() } else { JointModelRevolute::new_ry() };
        let joint = Joint::new(format!("joint{i}"), before, link_frame, JointWrapper::revolute(axis));
        let offset = if i == 0 { Vector3D::zeros() } else { Vector3D::new(1.0, 0.0, 0.0) };
        let t = Transform3D::new(before, parent_frame, offset, SpatialRotation::identity());
        parent_index = m.attach(parent_index, joint, t, link, None).unwrap();
        parent_frame = link_frame;
    }

    m
}
