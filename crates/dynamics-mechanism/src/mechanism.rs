//! The kinematic tree: rigid bodies connected by joints, indexed in topological order.

use std::collections::{HashMap, HashSet, VecDeque};

use dynamics_spatial::{frame::CartesianFrame3D, motion::SpatialRotation, se3::Transform3D, vector3d::Vector3D};

use crate::{body::RigidBody, errors::MechanismError, joint::Joint};

/// The joint connecting a body to its unique predecessor in the tree.
#[derive(Clone, Debug)]
pub struct ParentJoint {
    pub joint: Joint,
    pub parent_index: usize,
    /// The transform from `joint.frame_before()` to the parent body's default frame.
    pub joint_to_parent: Transform3D,
}

/// An additional, non-tree joint closing a kinematic loop between two bodies that are
/// already connected through the tree.
#[derive(Clone, Debug)]
pub struct LoopJoint {
    pub joint: Joint,
    pub predecessor_index: usize,
    pub successor_index: usize,
    pub joint_to_predecessor: Transform3D,
    pub joint_to_successor: Transform3D,
}

/// A tree of rigid bodies connected by joints, rooted at a fixed "world" body at
/// index 0. Bodies are stored in a topological order: every body's parent has a
/// strictly smaller index, so iterating `0..nbodies()` is always a valid
/// forward-pass traversal order.
#[derive(Clone, Debug)]
pub struct Mechanism {
    name: String,
    bodies: Vec<RigidBody>,
    parent_joints: Vec<Option<ParentJoint>>,
    loop_joints: Vec<LoopJoint>,
    q_offsets: Vec<usize>,
    v_offsets: Vec<usize>,
    nq: usize,
    nv: usize,
    gravity: Vector3D,
    names: HashMap<String, ()>,
}

/// Standard Earth surface gravity, in the world frame's `z` axis.
#[must_use]
pub fn standard_gravity() -> Vector3D {
    Vector3D::new(0.0, 0.0, -9.81)
}

impl Mechanism {
    /// Creates an empty mechanism with just the world body at index 0.
    #[must_use]
    pub fn new(name: impl Into<String>, gravity: Vector3D) -> Self {
        Self {
            name: name.into(),
            bodies: vec![RigidBody::world()],
            parent_joints: vec![None],
            loop_joints: Vec::new(),
            q_offsets: vec![0],
            v_offsets: vec![0],
            nq: 0,
            nv: 0,
            gravity,
            names: HashMap::new(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn root_index(&self) -> usize {
        0
    }

    #[must_use]
    pub fn nbodies(&self) -> usize {
        self.bodies.len()
    }

    #[must_use]
    pub fn nq(&self) -> usize {
        self.nq
    }

    #[must_use]
    pub fn nv(&self) -> usize {
        self.nv
    }

    #[must_use]
    pub fn gravity(&self) -> Vector3D {
        self.gravity
    }

    #[must_use]
    pub fn bodies(&self) -> &[RigidBody] {
        &self.bodies
    }

    #[must_use]
    pub fn body(&self, index: usize) -> &RigidBody {
        &self.bodies[index]
    }

    #[must_use]
    pub fn body_index(&self, name: &str) -> Option<usize> {
        self.bodies.iter().position(|b| b.name() == name)
    }

    #[must_use]
    pub fn parent_index(&self, index: usize) -> Option<usize> {
        self.parent_joints[index].as_ref().map(|pj| pj.parent_index)
    }

    #[must_use]
    pub fn parent_joint(&self, index: usize) -> Option<&ParentJoint> {
        self.parent_joints[index].as_ref()
    }

    #[must_use]
    pub fn loop_joints(&self) -> &[LoopJoint] {
        &self.loop_joints
    }

    #[must_use]
    pub fn q_offset(&self, index: usize) -> usize {
        self.q_offsets[index]
    }

    #[must_use]
    pub fn v_offset(&self, index: usize) -> usize {
        self.v_offsets[index]
    }

    /// Every body that is a descendant of `root` (not including `root` itself),
    /// in increasing index order.
    #[must_use]
    pub fn descendants(&self, root: usize) -> Vec<usize> {
        let mut is_descendant = vec![false; self.bodies.len()];
        let mut out = Vec::new();
        for i in (root + 1)..self.bodies.len() {
            let parent = self.parent_index(i).expect("non-root body always has a parent joint");
            if parent == root || is_descendant[parent] {
                is_descendant[i] = true;
                out.push(i);
            }
        }
        out
    }

    fn register_name(&mut self, name: &str) -> Result<(), MechanismError> {
        if self.names.contains_key(name) {
            return Err(MechanismError::NameAlreadyUsed(name.to_string()));
        }
        self.names.insert(name.to_string(), ());
        Ok(())
    }

    /// Attaches `child` to `parent_index` via `joint`.
    ///
    /// `joint_to_parent` must carry `joint.frame_before()` to the parent's default
    /// frame. `child_to_joint`, if given, carries `joint.frame_after()` to `child`'s
    /// current default frame, and `child` is reframed so that `joint.frame_after()`
    /// becomes its new default frame; if omitted, `joint.frame_after()` must already
    /// be `child`'s default frame.
    pub fn attach(
        &mut self,
        parent_index: usize,
        joint: Joint,
        joint_to_parent: Transform3D,
        mut child: RigidBody,
        child_to_joint: Option<Transform3D>,
    ) -> Result<usize, MechanismError> {
        if parent_index >= self.bodies.len() {
            return Err(MechanismError::BodyDoesNotExist(parent_index));
        }
        let parent_frame = self.bodies[parent_index].default_frame();
        if joint_to_parent.from_frame() != joint.frame_before() || joint_to_parent.to_frame() != parent_frame {
            return Err(MechanismError::FrameMismatch {
                expected: format!("{} -> {}", joint.frame_before(), parent_frame),
                got: format!("{} -> {}", joint_to_parent.from_frame(), joint_to_parent.to_frame()),
            });
        }

        match child_to_joint {
            Some(t) => {
                if t.from_frame() != joint.frame_after() || t.to_frame() != child.default_frame() {
                    return Err(MechanismError::FrameMismatch {
                        expected: format!("{} -> {}", joint.frame_after(), child.default_frame()),
                        got: format!("{} -> {}", t.from_frame(), t.to_frame()),
                    });
                }
                child.add_frame(joint.frame_after(), t);
                child.set_default_frame(joint.frame_after());
            }
            None if child.default_frame() != joint.frame_after() => {
                return Err(MechanismError::FrameMismatch {
                    expected: joint.frame_after().to_string(),
                    got: child.default_frame().to_string(),
                });
            }
            None => {}
        }

        self.register_name(joint.name())?;
        self.register_name(child.name())?;

        let index = self.bodies.len();
        self.q_offsets.push(self.nq);
        self.v_offsets.push(self.nv);
        self.nq += joint.nq();
        self.nv += joint.nv();
        self.parent_joints.push(Some(ParentJoint { joint, parent_index, joint_to_parent }));
        self.bodies.push(child);
        Ok(index)
    }

    /// Grafts `submechanism` onto `parent_index` via `joint`: `submechanism`'s root
    /// (its body index 1, since index 0 is always a placeholder world body) becomes
    /// the attachment point, and the rest of its tree (and its loop joints) is
    /// appended with indices remapped. Returns the new indices of every body the
    /// submechanism contributed, in its own original order.
    pub fn attach_submechanism(
        &mut self,
        parent_index: usize,
        joint: Joint,
        joint_to_parent: Transform3D,
        child_to_joint: Option<Transform3D>,
        submechanism: Mechanism,
    ) -> Result<Vec<usize>, MechanismError> {
        assert!(submechanism.nbodies() >= 2, "submechanism must have at least one real body besides its placeholder world");

        let sub_root = submechanism.bodies[1].clone();
        let new_root_index = self.attach(parent_index, joint, joint_to_parent, sub_root, child_to_joint)?;

        let offset = new_root_index - 1; // submechanism index i (i >= 1) maps to offset + i
        let remap = |old: usize| if old == 0 { new_root_index } else { offset + old };

        let mut new_indices = vec![new_root_index];
        for i in 2..submechanism.nbodies() {
            let body = submechanism.bodies[i].clone();
            let pj = submechanism.parent_joints[i].clone().expect("non-root submechanism body has a parent joint");
            self.register_name(pj.joint.name())?;
            self.register_name(body.name())?;

            let index = self.bodies.len();
            self.q_offsets.push(self.nq);
            self.v_offsets.push(self.nv);
            self.nq += pj.joint.nq();
            self.nv += pj.joint.nv();
            self.parent_joints.push(Some(ParentJoint {
                joint: pj.joint,
                parent_index: remap(pj.parent_index),
                joint_to_parent: pj.joint_to_parent,
            }));
            self.bodies.push(body);
            new_indices.push(index);
        }

        for lj in submechanism.loop_joints {
            self.loop_joints.push(LoopJoint {
                joint: lj.joint,
                predecessor_index: remap(lj.predecessor_index),
                successor_index: remap(lj.successor_index),
                joint_to_predecessor: lj.joint_to_predecessor,
                joint_to_successor: lj.joint_to_successor,
            });
        }

        Ok(new_indices)
    }

    /// Extracts the subtree rooted at `root` as a standalone [`Mechanism`], whose
    /// body index 1 is `root`'s own body (with no parent joint of its own, ready to
    /// be grafted elsewhere via [`Mechanism::attach_submechanism`]). Loop joints
    /// entirely contained within the subtree are carried along; others are dropped.
    #[must_use]
    pub fn submechanism(&self, root: usize) -> Mechanism {
        let descendants = self.descendants(root);
        let mut old_to_new = HashMap::new();
        old_to_new.insert(root, 1usize);
        for (k, &old) in descendants.iter().enumerate() {
            old_to_new.insert(old, 2 + k);
        }

        let mut out = Mechanism::new(format!("{}-sub", self.name), self.gravity);
        out.bodies.push(self.bodies[root].clone());
        out.parent_joints.push(None);
        out.q_offsets.push(0);
        out.v_offsets.push(0);

        for &old in &descendants {
            let pj = self.parent_joints[old].clone().expect("descendant always has a parent joint");
            let new_parent = old_to_new[&pj.parent_index];
            out.q_offsets.push(out.nq);
            out.v_offsets.push(out.nv);
            out.nq += pj.joint.nq();
            out.nv += pj.joint.nv();
            out.parent_joints.push(Some(ParentJoint {
                joint: pj.joint,
                parent_index: new_parent,
                joint_to_parent: pj.joint_to_parent,
            }));
            out.bodies.push(self.bodies[old].clone());
        }

        for lj in &self.loop_joints {
            if let (Some(&p), Some(&s)) = (old_to_new.get(&lj.predecessor_index), old_to_new.get(&lj.successor_index)) {
                out.loop_joints.push(LoopJoint {
                    joint: lj.joint.clone(),
                    predecessor_index: p,
                    successor_index: s,
                    joint_to_predecessor: lj.joint_to_predecessor,
                    joint_to_successor: lj.joint_to_successor,
                });
            }
        }

        out
    }

    /// Closes a kinematic loop between two bodies already present in the tree.
    pub fn close_loop(
        &mut self,
        joint: Joint,
        predecessor_index: usize,
        joint_to_predecessor: Transform3D,
        successor_index: usize,
        joint_to_successor: Transform3D,
    ) -> Result<(), MechanismError> {
        if predecessor_index >= self.bodies.len() {
            return Err(MechanismError::BodyDoesNotExist(predecessor_index));
        }
        if successor_index >= self.bodies.len() {
            return Err(MechanismError::BodyDoesNotExist(successor_index));
        }
        let pred_frame = self.bodies[predecessor_index].default_frame();
        let succ_frame = self.bodies[successor_index].default_frame();
        if joint_to_predecessor.from_frame() != joint.frame_before() || joint_to_predecessor.to_frame() != pred_frame {
            return Err(MechanismError::FrameMismatch {
                expected: format!("{} -> {}", joint.frame_before(), pred_frame),
                got: format!("{} -> {}", joint_to_predecessor.from_frame(), joint_to_predecessor.to_frame()),
            });
        }
        if joint_to_successor.from_frame() != joint.frame_after() || joint_to_successor.to_frame() != succ_frame {
            return Err(MechanismError::FrameMismatch {
                expected: format!("{} -> {}", joint.frame_after(), succ_frame),
                got: format!("{} -> {}", joint_to_successor.from_frame(), joint_to_successor.to_frame()),
            });
        }
        self.register_name(joint.name())?;
        self.loop_joints.push(LoopJoint { joint, predecessor_index, joint_to_predecessor, successor_index, joint_to_successor });
        Ok(())
    }

    /// Re-roots the subtree under `old_root` so that `new_root` — `old_root` itself,
    /// or one of its descendants — becomes the attachment point instead, then grafts
    /// the result onto `new_parent` via `joint`/`joint_to_new_parent` exactly as
    /// [`Mechanism::attach`] would.
    ///
    /// Every joint on the path from `old_root` down to `new_root` is reversed (see
    /// [`Joint::reversed`]), reframing each body on that path (other than `new_root`)
    /// to the reversed joint's successor frame — the same reframing [`attach`] does
    /// via its own `child_to_joint`. Any other branch hanging off a reframed body is
    /// bridged through the fixed transform that reframing introduced, so its geometry
    /// is unchanged. `new_root_child_to_joint` plays the role of `attach`'s own
    /// `child_to_joint` for `new_root` itself.
    ///
    /// [`attach`]: Mechanism::attach
    pub fn reattach(
        &self,
        old_root: usize,
        new_parent: usize,
        joint: Joint,
        joint_to_new_parent: Transform3D,
        new_root: usize,
        new_root_child_to_joint: Option<Transform3D>,
    ) -> Result<Mechanism, MechanismError> {
        if old_root >= self.bodies.len() {
            return Err(MechanismError::BodyDoesNotExist(old_root));
        }
        if new_root >= self.bodies.len() {
            return Err(MechanismError::BodyDoesNotExist(new_root));
        }
        if new_parent >= self.bodies.len() {
            return Err(MechanismError::BodyDoesNotExist(new_parent));
        }

        let subtree: HashSet<usize> = std::iter::once(old_root).chain(self.descendants(old_root)).collect();
        if !subtree.contains(&new_root) {
            return Err(MechanismError::InvalidReattachment(format!(
                "body {new_root} is not old_root {old_root} or one of its descendants"
            )));
        }
        if subtree.contains(&new_parent) {
            return Err(MechanismError::InvalidReattachment(format!(
                "new_parent {new_parent} lies within the subtree rooted at {old_root}, which would create a cycle"
            )));
        }

        // path[0] == old_root, path[path.len() - 1] == new_root; every body in
        // between is strictly on the chain being reversed.
        let mut path = vec![new_root];
        while *path.last().expect("path is never empty") != old_root {
            let parent = self.parent_index(*path.last().unwrap()).expect("body in old_root's subtree has a parent");
            path.push(parent);
        }
        path.reverse();

        // path[k] (k < path.len() - 1) is reframed onto the reversed joint's
        // frame_before; `bridge[path[k]]` carries any of its other children's
        // original `joint_to_parent` into that new default frame.
        let mut bridge: HashMap<usize, Transform3D> = HashMap::new();
        for k in 0..path.len().saturating_sub(1) {
            let child_pj = self.parent_joints[path[k + 1]].as_ref().expect("path body has a parent joint");
            bridge.insert(path[k], child_pj.joint_to_parent.inverse());
        }
        let reframed: HashSet<usize> = path[..path.len().saturating_sub(1)].iter().copied().collect();

        struct Edge {
            parent: usize,
            joint: Joint,
            joint_to_parent: Transform3D,
            child_to_joint: Option<Transform3D>,
        }
        let mut edges: HashMap<usize, Edge> = HashMap::new();

        for i in 1..self.bodies.len() {
            if i == new_root {
                edges.insert(
                    i,
                    Edge {
                        parent: new_parent,
                        joint: joint.clone(),
                        joint_to_parent: joint_to_new_parent.clone(),
                        child_to_joint: new_root_child_to_joint.clone(),
                    },
                );
                continue;
            }
            if let Some(k) = path.iter().position(|&b| b == i) {
                // The edge being reversed connects path[k] (i, the old parent) to
                // path[k + 1] (the old child) — i.e. path[k + 1]'s own parent joint.
                let parent = path[k + 1];
                let original = self.parent_joints[path[k + 1]].as_ref().expect("path body has a parent joint");
                let reversed = original.joint.reversed(format!("{}_rev", original.joint.name()));
                // `parent` keeps its ORIGINAL default frame only if it is `new_root`
                // (never reframed); otherwise it was itself reframed by the edge
                // above it on the path, and `bridge` carries that change along.
                let joint_to_parent = bridge.get(&parent).cloned().unwrap_or_else(|| Transform3D::identity(reversed.frame_before()));
                edges.insert(
                    i,
                    Edge { parent, joint: reversed, joint_to_parent, child_to_joint: Some(original.joint_to_parent.clone()) },
                );
                continue;
            }
            let original = self.parent_joints[i].as_ref().expect("non-root body has a parent joint");
            let parent = original.parent_index;
            let joint_to_parent = match bridge.get(&parent) {
                Some(b) => b.compose(&original.joint_to_parent),
                None => original.joint_to_parent.clone(),
            };
            edges.insert(i, Edge { parent, joint: original.joint.clone(), joint_to_parent, child_to_joint: None });
        }

        let mut children_of: HashMap<usize, Vec<usize>> = HashMap::new();
        for (&child, edge) in &edges {
            children_of.entry(edge.parent).or_default().push(child);
        }
        for list in children_of.values_mut() {
            list.sort_unstable();
        }

        // Rebuilt via BFS from the world body so every parent is placed (and
        // assigned its new index) before its children, however indices were shuffled.
        let mut out = Mechanism::new(format!("{}-reattached", self.name), self.gravity);
        let mut old_to_new: HashMap<usize, usize> = HashMap::new();
        old_to_new.insert(0, 0);
        let mut queue = VecDeque::new();
        queue.push_back(0usize);
        while let Some(old_parent) = queue.pop_front() {
            let Some(kids) = children_of.get(&old_parent) else { continue };
            for &old_child in kids {
                let edge = &edges[&old_child];
                let new_parent_index = old_to_new[&edge.parent];
                let body = self.bodies[old_child].clone();
                let new_index =
                    out.attach(new_parent_index, edge.joint.clone(), edge.joint_to_parent.clone(), body, edge.child_to_joint.clone())?;
                old_to_new.insert(old_child, new_index);
                queue.push_back(old_child);
            }
        }

        for lj in &self.loop_joints {
            let remap_endpoint = |idx: usize, t: &Transform3D| match bridge.get(&idx) {
                Some(b) if reframed.contains(&idx) => b.compose(t),
                _ => t.clone(),
            };
            out.loop_joints.push(LoopJoint {
                joint: lj.joint.clone(),
                predecessor_index: old_to_new[&lj.predecessor_index],
                successor_index: old_to_new[&lj.successor_index],
                joint_to_predecessor: remap_endpoint(lj.predecessor_index, &lj.joint_to_predecessor),
                joint_to_successor: remap_endpoint(lj.successor_index, &lj.joint_to_successor),
            });
        }

        Ok(out)
    }

    /// Returns an equivalent mechanism with every fixed joint collapsed: each body
    /// attached to its parent by a fixed joint is removed, its inertia folded into
    /// its nearest surviving ancestor, and its own children reparented to that
    /// ancestor with composed transforms.
    #[must_use]
    pub fn remove_fixed_joints(&self) -> Mechanism {
        let identity_bridge = |from: CartesianFrame3D, to: CartesianFrame3D| Transform3D::new(from, to, Vector3D::zeros(), SpatialRotation::identity());

        let n = self.bodies.len();
        let mut survives = vec![true; n];
        let mut ancestor_index = vec![0usize; n];
        let mut to_ancestor: Vec<Transform3D> = vec![Transform3D::identity(CartesianFrame3D::world()); n];

        for i in 1..n {
            let pj = self.parent_joints[i].as_ref().expect("non-root body has a parent joint");
            let is_fixed = pj.joint.nv() == 0 && pj.joint.nq() == 0;
            if is_fixed {
                survives[i] = false;
                let p = pj.parent_index;
                let bridge = identity_bridge(self.bodies[i].default_frame(), pj.joint.frame_before());
                let to_parent = pj.joint_to_parent.compose(&bridge);
                ancestor_index[i] = ancestor_index[p];
                to_ancestor[i] = to_ancestor[p].compose(&to_parent);
            } else {
                survives[i] = true;
                ancestor_index[i] = i;
                to_ancestor[i] = Transform3D::identity(self.bodies[i].default_frame());
            }
        }

        let mut old_to_new = HashMap::new();
        let mut out = Mechanism::new(self.name.clone(), self.gravity);
        old_to_new.insert(0, 0usize);

        for i in 1..n {
            if !survives[i] {
                continue;
            }
            let mut body = self.bodies[i].clone();
            for j in 1..n {
                if !survives[j] && ancestor_index[j] == i {
                    if let Some(removed_inertia) = self.bodies[j].inertia() {
                        let folded = removed_inertia.transform(&to_ancestor[j]);
                        body = match body.inertia().cloned() {
                            Some(existing) => {
                                let mut b = body.clone();
                                b.replace_inertia(existing + folded);
                                b
                            }
                            None => {
                                let mut b = body.clone();
                                b.replace_inertia(folded);
                                b
                            }
                        };
                    }
                }
            }

            let pj = self.parent_joints[i].as_ref().unwrap();
            let parent_old = pj.parent_index;
            let new_parent = old_to_new[&ancestor_index[parent_old]];
            let new_joint_to_parent = to_ancestor[parent_old].compose(&pj.joint_to_parent);

            let new_index = out.bodies.len();
            out.q_offsets.push(out.nq);
            out.v_offsets.push(out.nv);
            out.nq += pj.joint.nq();
            out.nv += pj.joint.nv();
            out.parent_joints.push(Some(ParentJoint { joint: pj.joint.clone(), parent_index: new_parent, joint_to_parent: new_joint_to_parent }));
            out.bodies.push(body);
            old_to_new.insert(i, new_index);
        }

        for lj in &self.loop_joints {
            let remap_endpoint = |idx: usize| -> (usize, Transform3D) {
                if idx == 0 {
                    (0, Transform3D::identity(CartesianFrame3D::world()))
                } else if survives[idx] {
                    (old_to_new[&idx], Transform3D::identity(self.bodies[idx].default_frame()))
                } else {
                    (old_to_new[&ancestor_index[idx]], to_ancestor[idx].clone())
                }
            };
            let (p, p_bridge) = remap_endpoint(lj.predecessor_index);
            let (s, s_bridge) = remap_endpoint(lj.successor_index);
            out.loop_joints.push(LoopJoint {
                joint: lj.joint.clone(),
                predecessor_index: p,
                successor_index: s,
                joint_to_predecessor: p_bridge.compose(&lj.joint_to_predecessor),
                joint_to_successor: s_bridge.compose(&lj.joint_to_successor),
            });
        }

        out
    }
}
