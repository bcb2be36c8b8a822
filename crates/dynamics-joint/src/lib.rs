//! This crate is part of the `dynamics` ecosystem, and is not intended for direct use.
//!
//! Structures and traits representing joints: the closed set of kinds a mechanism's
//! joints can take, and the mutable per-joint data computed from a configuration.

pub mod joint;
pub mod joint_data;
pub mod limits;

pub mod fixed;
pub mod floating;
pub mod prismatic;
pub mod revolute;
