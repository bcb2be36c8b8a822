//! # **`dynamics`**: the core of a rigid-body dynamics engine
//!
//! `dynamics` computes forward kinematics, geometric Jacobians, the joint-space mass
//! matrix, inverse dynamics and constrained forward dynamics for a kinematic tree of
//! rigid bodies connected by joints, with optional loop-closure constraints and
//! environment contact.
//!
//! The spatial-algebra formulation follows Roy Featherstone's ["Rigid Body Dynamics
//! Algorithms"](https://link.springer.com/book/10.1007/978-1-4899-7560-7); the crate
//! layout and API shape are inspired by [Pinocchio](https://github.com/stack-of-tasks/pinocchio/).
//!
//! ## Crates
//! - [`dynamics-spatial`](https://docs.rs/crate/dynamics-spatial/latest): spatial algebra (frames, transforms, twists, wrenches, Jacobians).
//! - [`dynamics-inertia`](https://docs.rs/crate/dynamics-inertia/latest): spatial inertia and the Newton-Euler force law.
//! - [`dynamics-joint`](https://docs.rs/crate/dynamics-joint/latest): joint kinds and their motion subspaces.
//! - [`dynamics-mechanism`](https://docs.rs/crate/dynamics-mechanism/latest): mechanisms, state caching, and the dynamics algorithms.

pub use dynamics_inertia as inertia;
pub use dynamics_joint as joint;
pub use dynamics_mechanism as mechanism;
pub use dynamics_spatial as spatial;

pub mod prelude;
