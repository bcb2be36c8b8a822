//! Rigid bodies: an identity, an optional spatial inertia, and the body-fixed frames
//! attached to it.

use dynamics_inertia::inertia::SpatialInertia;
use dynamics_spatial::{frame::CartesianFrame3D, se3::Transform3D};

/// A body-fixed frame and its placement relative to the body's default frame.
#[derive(Clone, Debug)]
pub struct FrameDefinition {
    frame: CartesianFrame3D,
    to_default: Transform3D,
}

impl FrameDefinition {
    #[must_use]
    pub fn frame(&self) -> CartesianFrame3D {
        self.frame
    }

    /// The transform from this frame to the body's default frame, at the time this
    /// definition was recorded.
    #[must_use]
    pub fn to_default(&self) -> &Transform3D {
        &self.to_default
    }
}

/// A single rigid body in a mechanism: a name, an optional spatial inertia (the root
/// body of a fixed-base mechanism carries none), and a set of body-fixed frame
/// definitions.
///
/// Invariant: the default frame is always among the frame definitions, with a
/// self-identity transform. When an inertia is present, it is expressed in the
/// default frame.
#[derive(Clone, Debug)]
pub struct RigidBody {
    name: String,
    default_frame: CartesianFrame3D,
    inertia: Option<SpatialInertia>,
    frame_defs: Vec<FrameDefinition>,
}

impl RigidBody {
    /// Creates a body with a fresh default frame and the given inertia, expressed in
    /// that frame.
    #[must_use]
    pub fn new(name: impl Into<String>, inertia: SpatialInertia) -> Self {
        let default_frame = inertia.frame();
        Self {
            name: name.into(),
            default_frame,
            inertia: Some(inertia),
            frame_defs: vec![FrameDefinition { frame: default_frame, to_default: Transform3D::identity(default_frame) }],
        }
    }

    /// Creates a massless body with a fresh default frame, for linkages whose mass is
    /// carried entirely by other bodies (e.g. massless intermediate links).
    #[must_use]
    pub fn new_massless(name: impl Into<String>) -> Self {
        let default_frame = CartesianFrame3D::new_unique();
        Self {
            name: name.into(),
            default_frame,
            inertia: None,
            frame_defs: vec![FrameDefinition { frame: default_frame, to_default: Transform3D::identity(default_frame) }],
        }
    }

    /// Creates the distinguished root body of a mechanism, anchored at the world frame
    /// and always massless.
    #[must_use]
    pub fn world() -> Self {
        let default_frame = CartesianFrame3D::world();
        Self {
            name: "world".to_string(),
            default_frame,
            inertia: None,
            frame_defs: vec![FrameDefinition { frame: default_frame, to_default: Transform3D::identity(default_frame) }],
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn default_frame(&self) -> CartesianFrame3D {
        self.default_frame
    }

    #[must_use]
    pub fn inertia(&self) -> Option<&SpatialInertia> {
        self.inertia.as_ref()
    }

    /// Replaces this body's inertia. The replacement must be expressed in the body's
    /// current default frame.
    pub fn replace_inertia(&mut self, inertia: SpatialInertia) {
        debug_assert_eq!(inertia.frame(), self.default_frame, "inertia must be expressed in the body's default frame");
        self.inertia = Some(inertia);
    }

    #[must_use]
    pub fn has_mass(&self) -> bool {
        self.inertia.as_ref().is_some_and(|i| i.mass > 0.0)
    }

    #[must_use]
    pub fn frame_definitions(&self) -> &[FrameDefinition] {
        &self.frame_defs
    }

    /// Adds a new body-fixed frame, given its placement relative to the current
    /// default frame. Panics if `frame` is already defined on this body.
    pub fn add_frame(&mut self, frame: CartesianFrame3D, to_default: Transform3D) {
        assert_eq!(to_default.from_frame(), frame, "frame definition must originate at the new frame");
        assert_eq!(to_default.to_frame(), self.default_frame, "frame definition must target the current default frame");
        assert!(
            !self.frame_defs.iter().any(|d| d.frame == frame),
            "frame {frame} is already defined on body '{}'",
            self.name
        );
        self.frame_defs.push(FrameDefinition { frame, to_default });
    }

    /// Looks up the transform from `frame` to this body's default frame.
    #[must_use]
    pub fn frame_to_default(&self, frame: CartesianFrame3D) -> Option<&Transform3D> {
        self.frame_defs.iter().find(|d| d.frame == frame).map(|d| &d.to_default)
    }

    /// Changes which body-fixed frame is treated as the default, re-expressing every
    /// other frame definition and the inertia (if any) relative to it. `new_default`
    /// must already be one of this body's frame definitions.
    pub fn set_default_frame(&mut self, new_default: CartesianFrame3D) {
        if new_default == self.default_frame {
            return;
        }
        let new_to_old = self
            .frame_defs
            .iter()
            .find(|d| d.frame == new_default)
            .unwrap_or_else(|| panic!("frame {new_default} is not defined on body '{}'", self.name))
            .to_default
            .clone();
        let old_to_new = new_to_old.inverse();

        for def in &mut self.frame_defs {
            def.to_default = old_to_new.compose(&def.to_default);
        }
        if let Some(inertia) = &self.inertia {
            self.inertia = Some(inertia.transform(&old_to_new));
        }
        self.default_frame = new_default;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use dynamics_spatial::vector3d::Vector3D;

    #[test]
    fn world_body_has_no_inertia() {
        let world = RigidBody::world();
        assert!(world.inertia().is_none());
        assert_eq!(world.default_frame(), CartesianFrame3D::world());
    }

    #[test]
    fn new_body_records_default_frame_as_self_identity() {
        let inertia = SpatialInertia::from_sphere(CartesianFrame3D::new_unique(), 1.0, 0.1).unwrap();
        let body = RigidBody::new("link", inertia);
        let def = body.frame_definitions().first().unwrap();
        assert_eq!(def.frame(), body.default_frame());
        assert_relative_eq!(def.to_default().translation().as_slice()[..], [0.0; 3][..], epsilon = 1e-12);
    }

    #[test]
    fn set_default_frame_keeps_mass_constant() {
        let inertia = SpatialInertia::from_sphere(CartesianFrame3D::new_unique(), 2.0, 0.1).unwrap();
        let mut body = RigidBody::new("link", inertia.clone());
        let new_frame = CartesianFrame3D::new_unique();
        let offset = Transform3D::new(new_frame, body.default_frame(), Vector3D::new(1.0, 0.0, 0.0), dynamics_spatial::motion::SpatialRotation::identity());
        body.add_frame(new_frame, offset);
        body.set_default_frame(new_frame);
        assert_eq!(body.default_frame(), new_frame);
        assert_relative_eq!(body.inertia().unwrap().mass, inertia.mass, epsilon = 1e-12);
    }
}
