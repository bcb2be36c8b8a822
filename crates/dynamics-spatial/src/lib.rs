//! Spatial algebra: frames, transforms, twists, wrenches, Jacobians.

pub mod configuration;
pub mod frame;
pub mod jacobian;
pub mod motion;
pub mod se3;
pub mod so3;
pub mod symmetric3;
pub mod twist;
pub mod vector3d;
pub mod vector6d;
pub mod wrench;
