//! Re-exports of the types and functions most call sites need, so a caller can get by
//! with a single `use dynamics_rs::prelude::*;`.

// Mechanism
pub use crate::mechanism::body::RigidBody;
pub use crate::mechanism::joint::Joint;
pub use crate::mechanism::mechanism::{standard_gravity, Mechanism};
pub use crate::mechanism::state::MechanismState;

// Algorithms
pub use crate::mechanism::dynamics::{dynamics, dynamics_solve};
pub use crate::mechanism::inverse_dynamics::{dynamics_bias, inverse_dynamics, inverse_dynamics_alloc};
pub use crate::mechanism::kinematics::{center_of_mass, geometric_jacobian_alloc, integrate_configuration, relative_acceleration, tree_path};
pub use crate::mechanism::mass_matrix::{mass_matrix, mass_matrix_alloc};
pub use crate::mechanism::momentum_matrix::{momentum_matrix, momentum_matrix_alloc};
pub use crate::mechanism::constraint::{constraint_jacobian_and_bias, constraint_jacobian_and_bias_alloc};

// Contact
pub use crate::mechanism::contact::{ContactModel, ContactPoint, ContactSet, HalfSpace, SpringDamperFriction};

// Results and errors
pub use crate::mechanism::errors::{DynamicsError, MechanismError};
pub use crate::mechanism::result::DynamicsResult;

// Joints
pub use crate::joint::fixed::JointModelFixed;
pub use crate::joint::floating::JointModelFloating;
pub use crate::joint::joint::JointWrapper;
pub use crate::joint::prismatic::JointModelPrismatic;
pub use crate::joint::revolute::JointModelRevolute;

// Inertia
pub use crate::inertia::inertia::SpatialInertia;

// Spatial
pub use crate::spatial::configuration::Configuration;
pub use crate::spatial::frame::CartesianFrame3D;
pub use crate::spatial::se3::Transform3D;
pub use crate::spatial::twist::{SpatialAcceleration, Twist};
pub use crate::spatial::wrench::Wrench;
