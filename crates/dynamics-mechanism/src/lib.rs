//! Kinematic trees of rigid bodies connected by joints, and the algorithms that operate
//! on them: forward/inverse kinematics, the composite-rigid-body mass matrix,
//! Newton-Euler inverse dynamics, loop-closure constraints, constrained forward
//! dynamics, and half-space contact.

pub mod body;
pub mod constraint;
pub mod contact;
pub mod dynamics;
pub mod errors;
pub mod inverse_dynamics;
pub mod joint;
pub mod kinematics;
pub mod mass_matrix;
pub mod mechanism;
pub mod momentum_matrix;
pub mod result;
pub mod state;
