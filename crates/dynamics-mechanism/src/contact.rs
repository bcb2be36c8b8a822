//! Per-contact-point dynamics against environment half-spaces.
//!
//! A contact point is fixed in a body's default frame; the environment is a set of
//! half-spaces. Every step, each point is tested against every half-space: if it has
//! penetrated, the contact model is invoked with the penetration depth, the point's
//! world velocity and the half-space normal, and accumulates a wrench on the point's
//! body; otherwise the model is reset.
//!
//! The contact model itself is opaque to this module, exposed only through the
//! [`ContactModel`] capability set (`reset`, `zero_derivative`, `step`): state machines
//! like stick/slip friction or an integrator-like normal-force law are a model concern,
//! not a mechanism concern. [`SpringDamperFriction`] is the one concrete model this
//! crate ships.

use dynamics_spatial::{vector3d::Vector3D, wrench::Wrench};

use crate::{errors::DynamicsError, mechanism::Mechanism, result::DynamicsResult, state::MechanismState};

/// A half-space primitive in world coordinates: the solid side is where
/// `normal . (p - point) <= 0`.
#[derive(Clone, Debug)]
pub struct HalfSpace {
    pub point: Vector3D,
    pub normal: Vector3D,
}

impl HalfSpace {
    #[must_use]
    pub fn new(point: Vector3D, normal: Vector3D) -> Self {
        Self { point, normal }
    }

    /// Signed distance from `p` to the half-space's boundary plane; negative means `p`
    /// has penetrated.
    #[must_use]
    pub fn separation(&self, p: &Vector3D) -> f64 {
        self.normal.dot(&(*p - self.point))
    }
}

/// A point fixed in `body`'s default frame, tested against every registered half-space.
#[derive(Clone, Debug)]
pub struct ContactPoint {
    pub body: usize,
    pub location: Vector3D,
}

impl ContactPoint {
    #[must_use]
    pub fn new(body: usize, location: Vector3D) -> Self {
        Self { body, location }
    }
}

/// The capability set a contact force law must implement. The core mechanism code
/// never inspects `State`/`Derivative`; it only resets, zeros and steps them.
pub trait ContactModel {
    /// Per-(point, half-space) persistent state, e.g. a filtered normal force.
    type State: Clone + Default;
    /// The time-derivative of `State`, integrated by the external time-stepper, not
    /// by this crate (see the module-level docs of [`contact_dynamics`]).
    type Derivative: Clone + Default;

    /// Resets `state` to rest, called every step a point is not penetrating.
    fn reset(&self, state: &mut Self::State);

    /// The derivative corresponding to a point not being stepped this tick.
    fn zero_derivative(&self) -> Self::Derivative;

    /// Given the penetration depth (positive), the point's world velocity and the
    /// half-space's outward normal, updates `state` and returns the contact force
    /// (world frame) together with the state's derivative.
    fn step(&self, state: &mut Self::State, depth: f64, velocity: &Vector3D, normal: &Vector3D) -> (Vector3D, Self::Derivative);
}

/// A linear normal spring-damper with regularized Coulomb tangential friction: the one
/// concrete contact model this crate ships, with no persistent state of its own (the
/// force is a pure function of depth, velocity and normal each step).
#[derive(Clone, Debug)]
pub struct SpringDamperFriction {
    /// Normal spring stiffness, `N/m`.
    pub normal_stiffness: f64,
    /// Normal damping coefficient, `N*s/m`.
    pub normal_damping: f64,
    /// Coulomb friction coefficient.
    pub friction_coefficient: f64,
    /// Velocity below which tangential friction is smoothly ramped to zero instead of
    /// discontinuously flipping direction, avoiding a division by (near-)zero.
    pub friction_regularization: f64,
}

impl SpringDamperFriction {
    #[must_use]
    pub fn new(normal_stiffness: f64, normal_damping: f64, friction_coefficient: f64, friction_regularization: f64) -> Self {
        Self { normal_stiffness, normal_damping, friction_coefficient, friction_regularization }
    }
}

impl ContactModel for SpringDamperFriction {
    type State = ();
    type Derivative = ();

    fn reset(&self, _state: &mut Self::State) {}

    fn zero_derivative(&self) -> Self::Derivative {}

    fn step(&self, _state: &mut Self::State, depth: f64, velocity: &Vector3D, normal: &Vector3D) -> (Vector3D, Self::Derivative) {
        let normal_velocity = velocity.dot(normal);
        let normal_magnitude = (self.normal_stiffness * depth - self.normal_damping * normal_velocity).max(0.0);

        let tangential_velocity = *velocity - *normal * normal_velocity;
        let speed = tangential_velocity.norm();
        let friction_direction = tangential_velocity * (-1.0 / (speed + self.friction_regularization));
        let friction = friction_direction * (self.friction_coefficient * normal_magnitude);

        (*normal * normal_magnitude + friction, ())
    }
}

/// The points and environment a mechanism's bodies may contact, together with the
/// model evaluated at each (point, half-space) pair and its persistent state.
pub struct ContactSet<M: ContactModel> {
    pub model: M,
    pub points: Vec<ContactPoint>,
    pub environment: Vec<HalfSpace>,
    states: Vec<M::State>,
    derivatives: Vec<M::Derivative>,
}

impl<M: ContactModel> ContactSet<M> {
    #[must_use]
    pub fn new(model: M, points: Vec<ContactPoint>, environment: Vec<HalfSpace>) -> Self {
        let n = points.len() * environment.len();
        let states = vec![M::State::default(); n];
        let derivatives = vec![M::Derivative::default(); n];
        Self { model, points, environment, states, derivatives }
    }

    /// The derivative produced for `points[point_index]` against
    /// `environment[half_space_index]` at the last [`contact_dynamics`] call.
    #[must_use]
    pub fn derivative(&self, point_index: usize, half_space_index: usize) -> &M::Derivative {
        &self.derivatives[point_index * self.environment.len() + half_space_index]
    }
}

/// Evaluates every contact point against every half-space and writes the accumulated
/// per-body wrench into `result.contact_wrenches`.
pub fn contact_dynamics<M: ContactModel>(
    mechanism: &Mechanism,
    state: &mut MechanismState,
    contacts: &mut ContactSet<M>,
    result: &mut DynamicsResult,
) -> Result<(), DynamicsError> {
    let world = mechanism.body(0).default_frame();
    let nbodies = mechanism.nbodies();
    for i in 0..nbodies {
        result.contact_wrenches[i] = Wrench::zero(mechanism.body(i).default_frame(), world);
    }

    let n_env = contacts.environment.len();
    if n_env == 0 {
        return Ok(());
    }

    for point_index in 0..contacts.points.len() {
        let body = contacts.points[point_index].body;
        if body >= nbodies {
            return Err(DynamicsError::UnsupportedTopology(format!("contact point references body index {body} out of range")));
        }
        let location = contacts.points[point_index].location;

        let t = state.transform_to_root(mechanism, body).clone();
        let twist = state.twist_wrt_world(mechanism, body).clone();
        let world_point = t.rotation() * &location + t.translation();
        let offset = world_point - t.translation();
        let point_velocity = twist.linear() + twist.angular().cross(&offset);

        for half_space_index in 0..n_env {
            let index = point_index * n_env + half_space_index;
            let separation = contacts.environment[half_space_index].separation(&world_point);

            if separation <= 0.0 {
                let normal = contacts.environment[half_space_index].normal;
                let (force, derivative) = contacts.model.step(&mut contacts.states[index], -separation, &point_velocity, &normal);
                contacts.derivatives[index] = derivative;

                let torque = offset.cross(&force);
                let contribution = Wrench::from_parts(mechanism.body(body).default_frame(), world, force, torque);
                result.contact_wrenches[body] = result.contact_wrenches[body].clone() + contribution;
            } else {
                contacts.model.reset(&mut contacts.states[index]);
                contacts.derivatives[index] = contacts.model.zero_derivative();
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spring_damper_pushes_out_of_penetration() {
        let model = SpringDamperFriction::new(1000.0, 10.0, 0.5, 1e-4);
        let mut state = ();
        let (force, _) = model.step(&mut state, 0.01, &Vector3D::new(0.0, 0.0, -1.0), &Vector3D::new(0.0, 0.0, 1.0));
        assert!(force.as_slice()[2] > 0.0);
    }

    #[test]
    fn spring_damper_friction_opposes_tangential_motion() {
        let model = SpringDamperFriction::new(1000.0, 10.0, 0.5, 1e-4);
        let mut state = ();
        let (force, _) = model.step(&mut state, 0.01, &Vector3D::new(1.0, 0.0, 0.0), &Vector3D::new(0.0, 0.0, 1.0));
        assert!(force.as_slice()[0] < 0.0);
    }

    #[test]
    fn half_space_separation_sign() {
        let hs = HalfSpace::new(Vector3D::zeros(), Vector3D::new(0.0, 0.0, 1.0));
        assert!(hs.separation(&Vector3D::new(0.0, 0.0, 1.0)) > 0.0);
        assert!(hs.separation(&Vector3D::new(0.0, 0.0, -1.0)) < 0.0);
    }
}
