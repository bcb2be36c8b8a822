//! Defines a generic joint model trait and a struct to wrap different joint types.
//!
//! This module provides both:
//! * The `JointModel` trait, which defines the common interface for different joint types.
//! * The `JointWrapper` struct, which encapsulates different joint model implementations and
//!   dispatches to them by matching on a closed tag, avoiding a vtable.

use crate::{
    fixed::JointModelFixed, floating::JointModelFloating, joint_data::JointDataWrapper,
    limits::JointLimits, prismatic::JointModelPrismatic, revolute::JointModelRevolute,
};
use dynamics_spatial::{configuration::Configuration, motion::SpatialMotion, vector3d::Vector3D};
use rand::rngs::ThreadRng;

/// Two unit vectors orthogonal to each other and to `axis`, used to build the
/// constraint-subspace basis of a 1-DoF joint (the 5 directions it doesn't move in).
pub(crate) fn orthonormal_complement_of_axis(axis: &Vector3D) -> (Vector3D, Vector3D) {
    let seed = if axis.dot(&Vector3D::x()).abs() < 0.9 { Vector3D::x() } else { Vector3D::y() };
    let u = axis.cross(&seed).normalize().expect("axis is unit-length, seed is not parallel to it");
    let w = axis.cross(&u);
    (u, w)
}

#[derive(Clone, Debug)]
enum JointModelImpl {
    Fixed(JointModelFixed),
    Revolute(JointModelRevolute),
    Prismatic(JointModelPrismatic),
    Floating(JointModelFloating),
}

/// Wrapper around the closed set of joint model implementations.
///
/// This is the type users and the rest of the crate interact with; the underlying
/// variant is reached only through the [`JointModel`] trait.
#[derive(Clone, Debug)]
pub struct JointWrapper {
    inner: JointModelImpl,
}

impl JointWrapper {
    #[must_use]
    pub fn fixed(joint: JointModelFixed) -> Self {
        JointWrapper { inner: JointModelImpl::Fixed(joint) }
    }

    #[must_use]
    pub fn revolute(joint: JointModelRevolute) -> Self {
        JointWrapper { inner: JointModelImpl::Revolute(joint) }
    }

    #[must_use]
    pub fn prismatic(joint: JointModelPrismatic) -> Self {
        JointWrapper { inner: JointModelImpl::Prismatic(joint) }
    }

    #[must_use]
    pub fn floating(joint: JointModelFloating) -> Self {
        JointWrapper { inner: JointModelImpl::Floating(joint) }
    }

    /// Reverses this joint's preferred direction of motion: negates the axis of a
    /// revolute or prismatic joint, no-op for fixed and floating joints. Used when a
    /// subtree is re-rooted and a joint's parent/child roles swap.
    #[must_use]
    pub fn flip_direction(&self) -> Self {
        match &self.inner {
            JointModelImpl::Fixed(joint) => JointWrapper::fixed(joint.flip_direction()),
            JointModelImpl::Revolute(joint) => JointWrapper::revolute(joint.flip_direction()),
            JointModelImpl::Prismatic(joint) => JointWrapper::prismatic(joint.flip_direction()),
            JointModelImpl::Floating(joint) => JointWrapper::floating(joint.flip_direction()),
        }
    }
}

macro_rules! dispatch {
    ($self:ident, $method:ident $(, $arg:expr)*) => {
        match &$self.inner {
            JointModelImpl::Fixed(joint) => joint.$method($($arg),*),
            JointModelImpl::Revolute(joint) => joint.$method($($arg),*),
            JointModelImpl::Prismatic(joint) => joint.$method($($arg),*),
            JointModelImpl::Floating(joint) => joint.$method($($arg),*),
        }
    };
}

impl JointModel for JointWrapper {
    fn get_joint_type(&self) -> JointType {
        dispatch!(self, get_joint_type)
    }

    fn nq(&self) -> usize {
        dispatch!(self, nq)
    }

    fn nv(&self) -> usize {
        dispatch!(self, nv)
    }

    fn neutral(&self) -> Configuration {
        dispatch!(self, neutral)
    }

    fn create_joint_data(&self) -> JointDataWrapper {
        dispatch!(self, create_joint_data)
    }

    fn random_configuration(&self, rng: &mut ThreadRng) -> Configuration {
        dispatch!(self, random_configuration, rng)
    }

    fn get_axis(&self) -> Vec<SpatialMotion> {
        dispatch!(self, get_axis)
    }

    fn subspace(&self, v: &Configuration) -> SpatialMotion {
        dispatch!(self, subspace, v)
    }

    fn subspace_dual(&self, f: &SpatialMotion) -> Configuration {
        dispatch!(self, subspace_dual, f)
    }

    fn bias(&self) -> SpatialMotion {
        dispatch!(self, bias)
    }

    fn integrate(&self, q: &Configuration, v: &Configuration, dt: f64) -> Configuration {
        dispatch!(self, integrate, q, v, dt)
    }

    fn limits(&self) -> &JointLimits {
        dispatch!(self, limits)
    }

    fn constraint_subspace(&self) -> Vec<SpatialMotion> {
        dispatch!(self, constraint_subspace)
    }

    fn local_coordinates(&self, q0: &Configuration, q: &Configuration, v: &Configuration) -> (Configuration, Configuration) {
        dispatch!(self, local_coordinates, q0, q, v)
    }

    fn global_coordinates(&self, q0: &Configuration, phi: &Configuration) -> Configuration {
        dispatch!(self, global_coordinates, q0, phi)
    }
}

/// Common interface for the closed set of joint kinds.
pub trait JointModel {
    /// Returns the joint type tag.
    fn get_joint_type(&self) -> JointType;

    /// Number of position coordinates.
    fn nq(&self) -> usize;

    /// Number of velocity coordinates.
    fn nv(&self) -> usize;

    /// The neutral (identity-transform) configuration.
    fn neutral(&self) -> Configuration;

    /// Creates the mutable per-joint data for this joint.
    fn create_joint_data(&self) -> JointDataWrapper;

    /// Draws a configuration uniformly within this joint's limits.
    fn random_configuration(&self, rng: &mut ThreadRng) -> Configuration;

    /// The basis of the motion subspace, one spatial motion per velocity coordinate,
    /// expressed in the joint's local (`frame_after`) frame.
    fn get_axis(&self) -> Vec<SpatialMotion>;

    /// Applies the motion subspace to a velocity vector: `S * v`.
    fn subspace(&self, v: &Configuration) -> SpatialMotion;

    /// Applies the transpose of the motion subspace to a force: `S^T * f`.
    fn subspace_dual(&self, f: &SpatialMotion) -> Configuration;

    /// The bias term `dS/dt * v` for a stationary-subspace joint; zero for every kind
    /// implemented here (the subspace is constant in the joint's own frame).
    fn bias(&self) -> SpatialMotion;

    /// Integrates `q` forward by `v * dt`, respecting the joint's configuration manifold
    /// (trivial addition for 1-DoF joints, SE(3) exponential update for the floating joint).
    fn integrate(&self, q: &Configuration, v: &Configuration, dt: f64) -> Configuration;

    /// This joint's limits.
    fn limits(&self) -> &JointLimits;

    /// A basis for the orthogonal complement of the motion subspace within the full
    /// 6-dimensional spatial vector space, expressed in the joint's local (`frame_after`)
    /// frame. These are the directions a loop joint of this kind constrains.
    fn constraint_subspace(&self) -> Vec<SpatialMotion>;

    /// Local coordinates `(phi, phi_dot)` of `q` relative to a reference `q0`: `phi` is
    /// zero when `q == q0` and varies smoothly with `q` near `q0`, living in the vector
    /// space `Configuration`s of size `nv` live in (rather than `q`'s own, possibly
    /// non-vector-space, manifold).
    fn local_coordinates(&self, q0: &Configuration, q: &Configuration, v: &Configuration) -> (Configuration, Configuration);

    /// Recovers a configuration from `q0` and local coordinates `phi`, the inverse of
    /// [`JointModel::local_coordinates`]'s first component.
    fn global_coordinates(&self, q0: &Configuration, phi: &Configuration) -> Configuration;
}

/// Tag identifying a joint's kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JointType {
    Fixed,
    Revolute,
    Prismatic,
    Floating,
}

/// A joint bias: Coriolis/centrifugal contribution of a time-varying motion subspace.
pub type JointBias = SpatialMotion;
