//! Kinematics algorithms built on top of the [`crate::state::MechanismState`] cache:
//! center of mass, tree paths and geometric Jacobians, relative acceleration, and
//! configuration integration.

use dynamics_spatial::{
    configuration::Configuration,
    frame::CartesianFrame3D,
    jacobian::GeometricJacobian,
    motion::SpatialMotion,
    twist::SpatialAcceleration,
    vector3d::Vector3D,
};

use crate::{errors::DynamicsError, mechanism::Mechanism, state::MechanismState};

/// Which way an edge of a [`tree_path`] is traversed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PathDirection {
    /// From the body toward its parent.
    Up,
    /// From the parent toward the body.
    Down,
}

/// One edge of a tree path: the non-root body whose parent joint is being crossed,
/// and the direction of travel.
#[derive(Clone, Copy, Debug)]
pub struct PathEdge {
    pub body_index: usize,
    pub direction: PathDirection,
}

/// The sequence of tree-joint edges from `from` to `to`, via their lowest common
/// ancestor. Each body's topological index is strictly greater than its parent's, so
/// repeatedly advancing whichever of the two walking pointers currently holds the
/// larger index is guaranteed to converge on the true LCA: a pointer can never need to
/// pass below an already-visited index on the other side.
#[must_use]
pub fn tree_path(mechanism: &Mechanism, from: usize, to: usize) -> Vec<PathEdge> {
    let mut up_from = Vec::new();
    let mut up_to = Vec::new();
    let mut a = from;
    let mut b = to;
    while a != b {
        if a > b {
            up_from.push(a);
            a = mechanism.parent_index(a).expect("non-root body has a parent");
        } else {
            up_to.push(b);
            b = mechanism.parent_index(b).expect("non-root body has a parent");
        }
    }

    let mut path = Vec::with_capacity(up_from.len() + up_to.len());
    for body_index in up_from {
        path.push(PathEdge { body_index, direction: PathDirection::Up });
    }
    for body_index in up_to.into_iter().rev() {
        path.push(PathEdge { body_index, direction: PathDirection::Down });
    }
    path
}

/// Total velocity-coordinate width of a path, the number of columns a Jacobian over
/// it must have.
#[must_use]
pub fn path_nv(mechanism: &Mechanism, path: &[PathEdge]) -> usize {
    path.iter()
        .map(|edge| mechanism.parent_joint(edge.body_index).expect("non-root body has a parent joint").joint.nv())
        .sum()
}

/// Writes the geometric Jacobian of `path` (a source-to-target body traversal) into
/// `out`, whose columns are expressed in `out`'s own frame.
///
/// For each edge, the joint's motion subspace (cached in world by
/// [`MechanismState::motion_subspace_in_world`]) is negated when the edge is traversed
/// `Up`, re-expressed in `out`'s frame via `transform_fn`, and written into the
/// velocity-index range of that edge's joint.
pub fn geometric_jacobian(
    mechanism: &Mechanism,
    state: &mut MechanismState,
    path: &[PathEdge],
    transform_fn: impl Fn(&SpatialMotion) -> SpatialMotion,
    out: &mut GeometricJacobian,
) {
    for edge in path {
        let sign = match edge.direction {
            PathDirection::Up => -1.0,
            PathDirection::Down => 1.0,
        };
        let v_offset = mechanism.v_offset(edge.body_index);
        let subspace = state.motion_subspace_in_world(mechanism, edge.body_index).to_vec();
        for (k, axis) in subspace.iter().enumerate() {
            let column = transform_fn(axis) * sign;
            out.add_to_column(v_offset + k, column.as_slice());
        }
    }
}

/// Allocates a zeroed Jacobian sized for `path` and fills it; a thin convenience
/// wrapper over [`geometric_jacobian`].
#[must_use]
pub fn geometric_jacobian_alloc(
    mechanism: &Mechanism,
    state: &mut MechanismState,
    path: &[PathEdge],
    body: CartesianFrame3D,
    base: CartesianFrame3D,
    frame: CartesianFrame3D,
    transform_fn: impl Fn(&SpatialMotion) -> SpatialMotion,
) -> GeometricJacobian {
    let mut out = GeometricJacobian::zero(body, base, frame, mechanism.nv());
    geometric_jacobian(mechanism, state, path, transform_fn, &mut out);
    out
}

/// The center of mass of the bodies in `subset`, weighted by mass, expressed in the
/// world frame. `subset` is typically [`Mechanism::descendants`] of the root. Fails if
/// the total mass of the subset is zero.
pub fn center_of_mass(mechanism: &Mechanism, state: &mut MechanismState, subset: &[usize]) -> Result<Vector3D, DynamicsError> {
    let mut total_mass = 0.0;
    let mut weighted = Vector3D::zeros();
    for &body in subset {
        let Some(inertia) = mechanism.body(body).inertia() else {
            continue;
        };
        let t = state.transform_to_root(mechanism, body).clone();
        let world_inertia = inertia.transform(&t);
        total_mass += world_inertia.mass;
        weighted = weighted + world_inertia.com * world_inertia.mass;
    }

    if total_mass <= 0.0 {
        return Err(DynamicsError::ZeroMass("center of mass requested over a massless subset".to_string()));
    }
    Ok(weighted * (1.0 / total_mass))
}

/// The acceleration of `body` relative to `base`, expressed in world, given a
/// generalized acceleration vector `vdot`.
///
/// Splits into the part driven directly by `vdot` along the tree path between the two
/// bodies, and the part already captured by each body's cached bias acceleration
/// (which itself recursively folds in every ancestor joint's Coriolis contribution).
pub fn relative_acceleration(mechanism: &Mechanism, state: &mut MechanismState, body: usize, base: usize, vdot: &Configuration) -> SpatialAcceleration {
    let path = tree_path(mechanism, base, body);
    let world = mechanism.body(0).default_frame();

    let mut vdot_term = SpatialMotion::zero();
    for edge in &path {
        let sign = match edge.direction {
            PathDirection::Up => -1.0,
            PathDirection::Down => 1.0,
        };
        let v_offset = mechanism.v_offset(edge.body_index);
        let subspace = state.motion_subspace_in_world(mechanism, edge.body_index).to_vec();
        for (k, axis) in subspace.iter().enumerate() {
            vdot_term += axis.clone() * (sign * vdot[v_offset + k]);
        }
    }

    let bias_body = state.bias_acceleration(mechanism, body).motion().clone();
    let bias_base = state.bias_acceleration(mechanism, base).motion().clone();
    let body_frame = mechanism.body(body).default_frame();
    let base_frame = mechanism.body(base).default_frame();
    SpatialAcceleration::new(body_frame, base_frame, world, vdot_term + bias_body + bias_base * -1.0)
}

/// Integrates every joint's configuration forward by `dt` using its own q-dot map.
#[must_use]
pub fn integrate_configuration(mechanism: &Mechanism, q: &Configuration, v: &Configuration, dt: f64) -> Configuration {
    let mut parts = Vec::with_capacity(mechanism.nbodies() - 1);
    for i in 1..mechanism.nbodies() {
        let pj = mechanism.parent_joint(i).expect("non-root body has a parent joint");
        let qi = q.rows(mechanism.q_offset(i), pj.joint.nq());
        let vi = v.rows(mechanism.v_offset(i), pj.joint.nv());
        parts.push(pj.joint.model().integrate(&qi, &vi, dt));
    }
    Configuration::concat(&parts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use dynamics_inertia::inertia::SpatialInertia;
    use dynamics_joint::{joint::JointWrapper, revolute::JointModelRevolute};
    use dynamics_spatial::{motion::SpatialRotation, se3::Transform3D};

    use crate::{body::RigidBody, joint::Joint, mechanism::standard_gravity};

    fn two_link_chain() -> Mechanism {
        let mut m = Mechanism::new("chain", standard_gravity());
        let world_frame = m.body(0).default_frame();

        let before1 = CartesianFrame3D::new_unique();
        let link1_frame = CartesianFrame3D::new_unique();
        let inertia1 = SpatialInertia::from_sphere(link1_frame, 1.0, 0.1).unwrap();
        let link1 = RigidBody::new("link1", inertia1);
        let joint1 = Joint::new("j1", before1, link1_frame, JointWrapper::revolute(JointModelRevolute::new_rz()));
        let t1 = Transform3D::new(before1, world_frame, Vector3D::zeros(), SpatialRotation::identity());
        let link1_index = m.attach(0, joint1, t1, link1, None).unwrap();

        let before2 = CartesianFrame3D::new_unique();
        let link2_frame = CartesianFrame3D::new_unique();
        let inertia2 = SpatialInertia::from_sphere(link2_frame, 1.0, 0.1).unwrap();
        let link2 = RigidBody::new("link2", inertia2);
        let joint2 = Joint::new("j2", before2, link2_frame, JointWrapper::revolute(JointModelRevolute::new_rz()));
        let t2 = Transform3D::new(before2, link1_frame, Vector3D::new(1.0, 0.0, 0.0), SpatialRotation::identity());
        m.attach(link1_index, joint2, t2, link2, None).unwrap();

        m
    }

    #[test]
    fn tree_path_from_root_descends_only() {
        let m = two_link_chain();
        let path = tree_path(&m, 0, 2);
        assert!(path.iter().all(|e| e.direction == PathDirection::Down));
        assert_eq!(path.len(), 2);
    }

    #[test]
    fn tree_path_between_siblings_goes_up_then_down() {
        let m = two_link_chain();
        let path = tree_path(&m, 2, 1);
        assert_eq!(path.len(), 1);
        assert_eq!(path[0].direction, PathDirection::Up);
        assert_eq!(path[0].body_index, 2);
    }

    #[test]
    fn center_of_mass_of_two_equal_masses_is_their_midpoint() {
        let m = two_link_chain();
        let mut state = MechanismState::new(&m);
        let com = center_of_mass(&m, &mut state, &m.descendants(0)).unwrap();
        assert_relative_eq!(com.as_slice()[1], 0.0, epsilon = 1e-9);
    }

    #[test]
    fn center_of_mass_of_empty_subset_is_zero_mass() {
        let m = two_link_chain();
        let mut state = MechanismState::new(&m);
        assert!(center_of_mass(&m, &mut state, &[]).is_err());
    }

    #[test]
    fn integrate_configuration_advances_each_joint() {
        let m = two_link_chain();
        let q = Configuration::from_row_slice(&[0.0, 0.0]);
        let v = Configuration::from_row_slice(&[1.0, -1.0]);
        let next = integrate_configuration(&m, &q, &v, 0.5);
        assert_relative_eq!(next.as_slice()[..], [0.5, -0.5][..], epsilon = 1e-12);
    }
}
