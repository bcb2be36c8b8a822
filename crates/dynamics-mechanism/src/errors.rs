//! Error types returned by mechanism construction and the dynamics algorithms.

use dynamics_spatial::configuration::ConfigurationError;
use std::fmt;

/// Errors that can occur while assembling a [`crate::mechanism::Mechanism`].
#[derive(Debug)]
pub enum MechanismError {
    /// Referenced a body index that does not exist in the mechanism.
    BodyDoesNotExist(usize),
    /// Two transforms that should share a frame did not.
    FrameMismatch { expected: String, got: String },
    /// A body's default frame was not among its own frame definitions.
    MissingDefaultFrame(String),
    /// A name collision between two joints or two bodies.
    NameAlreadyUsed(String),
    /// [`crate::mechanism::Mechanism::reattach`] was asked to re-root at a body that
    /// is not a descendant of `old_root`, or to graft onto a body within the subtree
    /// being moved.
    InvalidReattachment(String),
}

impl fmt::Display for MechanismError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MechanismError::BodyDoesNotExist(index) => write!(f, "body index {index} does not exist"),
            MechanismError::FrameMismatch { expected, got } => {
                write!(f, "frame mismatch: expected {expected}, got {got}")
            }
            MechanismError::MissingDefaultFrame(name) => {
                write!(f, "body '{name}' does not define its own default frame")
            }
            MechanismError::NameAlreadyUsed(name) => write!(f, "name '{name}' is already used in this mechanism"),
            MechanismError::InvalidReattachment(msg) => write!(f, "invalid reattachment: {msg}"),
        }
    }
}

impl std::error::Error for MechanismError {}

/// Errors returned by the kinematics and dynamics algorithms.
#[derive(Debug)]
pub enum DynamicsError {
    /// A configuration or velocity vector had the wrong size.
    DimensionMismatch(ConfigurationError),
    /// The mechanism's topology is not supported by the requested algorithm (e.g. a
    /// loop joint where a tree-only algorithm was called).
    UnsupportedTopology(String),
    /// The mechanism references a joint kind an algorithm does not implement.
    UnsupportedJoint(String),
    /// A matrix expected to be positive definite (the mass matrix, the constrained
    /// system's Schur complement) was numerically singular.
    Singular(String),
    /// A body involved in a dynamics computation has zero mass where positive mass
    /// was required (e.g. center-of-mass of an unweighted subtree).
    ZeroMass(String),
}

impl fmt::Display for DynamicsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DynamicsError::DimensionMismatch(inner) => write!(f, "dimension mismatch: {inner}"),
            DynamicsError::UnsupportedTopology(msg) => write!(f, "unsupported topology: {msg}"),
            DynamicsError::UnsupportedJoint(msg) => write!(f, "unsupported joint: {msg}"),
            DynamicsError::Singular(msg) => write!(f, "singular system: {msg}"),
            DynamicsError::ZeroMass(msg) => write!(f, "zero mass: {msg}"),
        }
    }
}

impl std::error::Error for DynamicsError {}

impl From<ConfigurationError> for DynamicsError {
    fn from(e: ConfigurationError) -> Self {
        DynamicsError::DimensionMismatch(e)
    }
}
