//! Defines the **geometric Jacobian**, **momentum matrix** and **wrench matrix**: the
//! $6 \times n_v$ matrices sharing the same column-per-velocity-coordinate layout that
//! map generalized velocities to a twist, a momentum, or a wrench respectively.

use nalgebra::{DMatrix, Matrix6};

use crate::{
    frame::{assert_same_frame, CartesianFrame3D},
    se3::Transform3D,
};

/// Widens a fixed $6 \times 6$ action/dual matrix into the dynamically-sized form
/// needed to multiply it against a $6 \times n_v$ block of columns.
fn widen(m: Matrix6<f64>) -> DMatrix<f64> {
    DMatrix::from_column_slice(6, 6, m.as_slice())
}

/// A $6 \times n_v$ matrix, one column per generalized velocity coordinate, relating
/// `body`'s twist with respect to `base` to the full system velocity vector `v`:
/// `twist.motion() == J * v`. Every column is expressed in `frame`.
#[derive(Debug, Clone, PartialEq)]
pub struct GeometricJacobian {
    body: CartesianFrame3D,
    base: CartesianFrame3D,
    frame: CartesianFrame3D,
    columns: DMatrix<f64>,
}

impl GeometricJacobian {
    #[must_use]
    pub fn zero(body: CartesianFrame3D, base: CartesianFrame3D, frame: CartesianFrame3D, nv: usize) -> Self {
        Self {
            body,
            base,
            frame,
            columns: DMatrix::zeros(6, nv),
        }
    }

    #[must_use]
    pub fn body_frame(&self) -> CartesianFrame3D {
        self.body
    }

    #[must_use]
    pub fn base_frame(&self) -> CartesianFrame3D {
        self.base
    }

    #[must_use]
    pub fn frame(&self) -> CartesianFrame3D {
        self.frame
    }

    #[must_use]
    pub fn matrix(&self) -> &DMatrix<f64> {
        &self.columns
    }

    pub fn set_column(&mut self, v_offset: usize, column_data: &[f64; 6]) {
        self.columns
            .fixed_columns_mut::<1>(v_offset)
            .copy_from(&DMatrix::from_column_slice(6, 1, column_data));
    }

    pub fn add_to_column(&mut self, v_offset: usize, column_data: &[f64; 6]) {
        for (row, value) in column_data.iter().enumerate() {
            self.columns[(row, v_offset)] += value;
        }
    }

    #[must_use]
    pub fn nv(&self) -> usize {
        self.columns.ncols()
    }

    /// Re-expresses every column in a different frame via `t`.
    #[must_use]
    pub fn transform_to(&self, t: &Transform3D) -> GeometricJacobian {
        assert_same_frame(self.frame, t.from_frame());
        GeometricJacobian {
            body: self.body,
            base: self.base,
            frame: t.to_frame(),
            columns: widen(t.raw().action_matrix()) * &self.columns,
        }
    }
}

/// A $6 \times n_v$ matrix mapping the system's generalized velocity to the total
/// spatial momentum of a body or subtree, expressed in `frame`. Momentum is a
/// force-space quantity and so transforms dually, like [`crate::wrench::Wrench`].
#[derive(Debug, Clone, PartialEq)]
pub struct MomentumMatrix {
    frame: CartesianFrame3D,
    columns: DMatrix<f64>,
}

impl MomentumMatrix {
    #[must_use]
    pub fn zero(frame: CartesianFrame3D, nv: usize) -> Self {
        Self { frame, columns: DMatrix::zeros(6, nv) }
    }

    #[must_use]
    pub fn frame(&self) -> CartesianFrame3D {
        self.frame
    }

    #[must_use]
    pub fn matrix(&self) -> &DMatrix<f64> {
        &self.columns
    }

    #[must_use]
    pub fn matrix_mut(&mut self) -> &mut DMatrix<f64> {
        &mut self.columns
    }

    #[must_use]
    pub fn nv(&self) -> usize {
        self.columns.ncols()
    }

    #[must_use]
    pub fn transform_to(&self, t: &Transform3D) -> MomentumMatrix {
        assert_same_frame(self.frame, t.from_frame());
        MomentumMatrix {
            frame: t.to_frame(),
            columns: widen(t.raw().dual_matrix()) * &self.columns,
        }
    }
}

/// A $6 \times n_\lambda$ matrix whose columns are the wrench-space basis of a
/// constraint's action (e.g. the complement of a loop joint's motion subspace),
/// expressed in `frame`.
#[derive(Debug, Clone, PartialEq)]
pub struct WrenchMatrix {
    frame: CartesianFrame3D,
    columns: DMatrix<f64>,
}

impl WrenchMatrix {
    #[must_use]
    pub fn zero(frame: CartesianFrame3D, n: usize) -> Self {
        Self { frame, columns: DMatrix::zeros(6, n) }
    }

    #[must_use]
    pub fn from_columns(frame: CartesianFrame3D, columns: DMatrix<f64>) -> Self {
        debug_assert_eq!(columns.nrows(), 6);
        Self { frame, columns }
    }

    #[must_use]
    pub fn frame(&self) -> CartesianFrame3D {
        self.frame
    }

    #[must_use]
    pub fn matrix(&self) -> &DMatrix<f64> {
        &self.columns
    }

    #[must_use]
    pub fn n(&self) -> usize {
        self.columns.ncols()
    }

    #[must_use]
    pub fn transform_to(&self, t: &Transform3D) -> WrenchMatrix {
        assert_same_frame(self.frame, t.from_frame());
        WrenchMatrix {
            frame: t.to_frame(),
            columns: widen(t.raw().dual_matrix()) * &self.columns,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_has_right_shape() {
        let f = CartesianFrame3D::world();
        let j = GeometricJacobian::zero(f, f, f, 4);
        assert_eq!(j.matrix().nrows(), 6);
        assert_eq!(j.matrix().ncols(), 4);
    }

    #[test]
    fn set_column_writes_values() {
        let f = CartesianFrame3D::world();
        let mut j = GeometricJacobian::zero(f, f, f, 2);
        j.set_column(1, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert_eq!(j.matrix()[(0, 1)], 1.0);
        assert_eq!(j.matrix()[(5, 1)], 6.0);
        assert_eq!(j.matrix()[(0, 0)], 0.0);
    }

    #[test]
    fn transform_to_identity_is_noop() {
        let f = CartesianFrame3D::world();
        let mut j = GeometricJacobian::zero(f, f, f, 1);
        j.set_column(0, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let t = crate::se3::Transform3D::identity(f);
        let j2 = j.transform_to(&t);
        assert_eq!(j2.matrix(), j.matrix());
    }
}
