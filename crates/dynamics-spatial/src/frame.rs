//! Defines **Cartesian frames**, the opaque identities every spatial quantity is tagged with.

use std::fmt::Display;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_FRAME_ID: AtomicU64 = AtomicU64::new(1);

/// An opaque, comparable identity for a Cartesian coordinate frame.
///
/// Frames are never decomposed; the only operation defined on them is equality.
/// Every spatial quantity (transform, twist, wrench, inertia, Jacobian) carries the
/// frame(s) it is expressed in, and combining two quantities whose frames don't match
/// is a programming error (checked by [`assert_same_frame`] under `debug_assertions`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CartesianFrame3D(u64);

impl CartesianFrame3D {
    /// The distinguished world (root) frame, identifier 0.
    #[must_use]
    pub const fn world() -> Self {
        CartesianFrame3D(0)
    }

    /// Allocates a fresh frame identity, guaranteed distinct from every other
    /// frame allocated so far (including [`CartesianFrame3D::world`]).
    #[must_use]
    pub fn new_unique() -> Self {
        CartesianFrame3D(NEXT_FRAME_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl Display for CartesianFrame3D {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.0 == 0 {
            write!(f, "frame(world)")
        } else {
            write!(f, "frame({})", self.0)
        }
    }
}

/// Panics (in debug builds) if the two frames differ.
///
/// This is the checked precondition the spec calls "frame consistency": violating it
/// is always a programming error, never a runtime condition a caller should recover from.
/// In release builds the check is elided, matching the allocation-free, branch-free
/// hot path the algorithms are meant to run on.
#[inline]
pub fn assert_same_frame(a: CartesianFrame3D, b: CartesianFrame3D) {
    debug_assert_eq!(a, b, "frame mismatch: spatial quantities expressed in different frames");
}
