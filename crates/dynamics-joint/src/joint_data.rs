//! Structure containing the mutable properties of a joint.

use crate::{
    fixed::JointDataFixed, floating::JointDataFloating, joint::JointWrapper,
    prismatic::JointDataPrismatic, revolute::JointDataRevolute,
};
use dynamics_spatial::{configuration::Configuration, motion::SpatialMotion, se3::RawTransform};

#[derive(Clone, Debug)]
enum JointDataImpl {
    Fixed(JointDataFixed),
    Revolute(JointDataRevolute),
    Prismatic(JointDataPrismatic),
    Floating(JointDataFloating),
}

/// Wrapper around the closed set of joint data implementations.
#[derive(Clone, Debug)]
pub struct JointDataWrapper {
    inner: JointDataImpl,
}

/// Mutable, per-joint quantities derived from the current configuration and velocity.
pub trait JointData {
    /// The joint's own configuration slice.
    fn get_joint_q(&self) -> &Configuration;

    /// The joint's own velocity slice.
    fn get_joint_v(&self) -> &Configuration;

    /// The placement of `frame_after` relative to `frame_before`.
    fn get_joint_placement(&self) -> RawTransform;

    /// Recomputes placement and, if `joint_v` is given, velocity from the current
    /// configuration and velocity slices.
    fn update(&mut self, joint_model: &JointWrapper, joint_q: &Configuration, joint_v: Option<&Configuration>);

    /// The joint's own velocity, as a spatial motion expressed in `frame_after`.
    fn get_joint_velocity(&self) -> &SpatialMotion;
}

impl JointDataWrapper {
    #[must_use]
    pub fn fixed(data: JointDataFixed) -> Self {
        JointDataWrapper { inner: JointDataImpl::Fixed(data) }
    }

    #[must_use]
    pub fn revolute(data: JointDataRevolute) -> Self {
        JointDataWrapper { inner: JointDataImpl::Revolute(data) }
    }

    #[must_use]
    pub fn prismatic(data: JointDataPrismatic) -> Self {
        JointDataWrapper { inner: JointDataImpl::Prismatic(data) }
    }

    #[must_use]
    pub fn floating(data: JointDataFloating) -> Self {
        JointDataWrapper { inner: JointDataImpl::Floating(data) }
    }
}

impl JointData for JointDataWrapper {
    fn get_joint_q(&self) -> &Configuration {
        match &self.inner {
            JointDataImpl::Fixed(data) => data.get_joint_q(),
            JointDataImpl::Revolute(data) => data.get_joint_q(),
            JointDataImpl::Prismatic(data) => data.get_joint_q(),
            JointDataImpl::Floating(data) => data.get_joint_q(),
        }
    }

    fn get_joint_v(&self) -> &Configuration {
        match &self.inner {
            JointDataImpl::Fixed(data) => data.get_joint_v(),
            JointDataImpl::Revolute(data) => data.get_joint_v(),
            JointDataImpl::Prismatic(data) => data.get_joint_v(),
            JointDataImpl::Floating(data) => data.get_joint_v(),
        }
    }

    fn get_joint_placement(&self) -> RawTransform {
        match &self.inner {
            JointDataImpl::Fixed(data) => data.get_joint_placement(),
            JointDataImpl::Revolute(data) => data.get_joint_placement(),
            JointDataImpl::Prismatic(data) => data.get_joint_placement(),
            JointDataImpl::Floating(data) => data.get_joint_placement(),
        }
    }

    fn update(&mut self, joint_model: &JointWrapper, joint_q: &Configuration, joint_v: Option<&Configuration>) {
        match &mut self.inner {
            JointDataImpl::Fixed(data) => data.update(joint_model, joint_q, joint_v),
            JointDataImpl::Revolute(data) => data.update(joint_model, joint_q, joint_v),
            JointDataImpl::Prismatic(data) => data.update(joint_model, joint_q, joint_v),
            JointDataImpl::Floating(data) => data.update(joint_model, joint_q, joint_v),
        }
    }

    fn get_joint_velocity(&self) -> &SpatialMotion {
        match &self.inner {
            JointDataImpl::Fixed(data) => data.get_joint_velocity(),
            JointDataImpl::Revolute(data) => data.get_joint_velocity(),
            JointDataImpl::Prismatic(data) => data.get_joint_velocity(),
            JointDataImpl::Floating(data) => data.get_joint_velocity(),
        }
    }
}
