//! Caller-owned scratch and outputs for the dynamics algorithms of this crate,
//! sized once in [`DynamicsResult::new`] so that a simulation loop calling
//! [`crate::dynamics::dynamics`] every step never allocates in steady state.

use nalgebra::DMatrix;

use dynamics_spatial::{configuration::Configuration, frame::CartesianFrame3D, twist::SpatialAcceleration, wrench::Wrench};

use crate::{constraint, mechanism::Mechanism};

/// Every buffer [`crate::dynamics::dynamics`] and the algorithms it composes read from
/// or write into.
pub struct DynamicsResult {
    /// Joint-space acceleration: the primary output of a forward dynamics solve.
    pub vdot: Configuration,
    /// Loop-closure constraint multipliers, one group of rows per loop joint.
    pub lambda: Configuration,

    /// The joint-space mass matrix, lower-triangular storage only.
    pub mass_matrix: DMatrix<f64>,
    /// The dynamics bias `c(q, v, w_ext)`.
    pub bias: Configuration,
    /// The stacked loop-closure constraint Jacobian, `n_lambda x nv`.
    pub constraint_jacobian: DMatrix<f64>,
    /// The stacked loop-closure constraint bias, `n_lambda`.
    pub constraint_bias: Configuration,

    /// World-frame spatial acceleration of every body; index 0 is the fixed world body.
    pub body_accelerations: Vec<SpatialAcceleration>,
    /// World-frame reaction wrench transmitted through every body's parent joint.
    pub joint_wrenches: Vec<Wrench>,
    /// World-frame contact wrench accumulated on every body.
    pub contact_wrenches: Vec<Wrench>,

    /// Cholesky factor `L` of the mass matrix, `M = L L^T`.
    pub l_factor: DMatrix<f64>,
    /// Schur complement `K M^-1 K^T` of the constrained system.
    pub a_factor: DMatrix<f64>,
    /// `K L^-T`, used to build `a_factor` and the constraint right-hand side.
    pub y_factor: DMatrix<f64>,
    /// `L^-1 (tau - c)`, the forward-substitution half of the unconstrained solve.
    pub z_factor: Configuration,
}

impl DynamicsResult {
    /// Allocates every buffer at the size `mechanism` requires.
    #[must_use]
    pub fn new(mechanism: &Mechanism) -> Self {
        let nv = mechanism.nv();
        let n_lambda = constraint::n_lambda(mechanism);
        let nbodies = mechanism.nbodies();
        let world = mechanism.body(0).default_frame();

        DynamicsResult {
            vdot: Configuration::zeros(nv),
            lambda: Configuration::zeros(n_lambda),
            mass_matrix: DMatrix::zeros(nv, nv),
            bias: Configuration::zeros(nv),
            constraint_jacobian: DMatrix::zeros(n_lambda, nv),
            constraint_bias: Configuration::zeros(n_lambda),
            body_accelerations: zero_accelerations(mechanism, world, nbodies),
            joint_wrenches: zero_wrenches(mechanism, world, nbodies),
            contact_wrenches: zero_wrenches(mechanism, world, nbodies),
            l_factor: DMatrix::zeros(nv, nv),
            a_factor: DMatrix::zeros(n_lambda, n_lambda),
            y_factor: DMatrix::zeros(n_lambda, nv),
            z_factor: Configuration::zeros(nv),
        }
    }
}

fn zero_accelerations(mechanism: &Mechanism, world: CartesianFrame3D, nbodies: usize) -> Vec<SpatialAcceleration> {
    (0..nbodies).map(|i| SpatialAcceleration::zero(mechanism.body(i).default_frame(), world, world)).collect()
}

fn zero_wrenches(mechanism: &Mechanism, world: CartesianFrame3D, nbodies: usize) -> Vec<Wrench> {
    (0..nbodies).map(|i| Wrench::zero(mechanism.body(i).default_frame(), world)).collect()
}
