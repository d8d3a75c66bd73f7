//! derivatives::types — shared numeric aliases and named constants.
//!
//! Purpose
//! -------
//! Centralize the core numeric types used by the differentiation engine.
//! By defining these in one place, the rest of the code can stay agnostic
//! to `ndarray` and can more easily evolve if the backend changes.
//!
//! Key behaviors
//! -------------
//! - Define canonical aliases for evaluation points, gradients, objective
//!   output vectors, and Jacobians (`Point`, `Gradient`, `Output`,
//!   `Jacobian`).
//! - Pin the numerical constants of the engine: the Richardson weight base
//!   and the default perturbation/iteration settings.
//!
//! Invariants & assumptions
//! ------------------------
//! - All engine vectors and matrices are represented as `ndarray`
//!   containers over `f64`.
//! - `Jacobian` is oriented with one **row per output component**:
//!   shape `m × n` for `n = point.len()` and `m = reference.len()`.
//!
//! Conventions
//! -----------
//! - `Point` and `Gradient` are treated conceptually as column vectors with
//!   length equal to the number of parameters.
//! - `Output` matches the output dimensionality of a vector-valued
//!   objective and is always pre-sized by the caller of the objective.
//! - This module defines no runtime behavior beyond what `ndarray`
//!   requires when these types are instantiated elsewhere.
//!
//! Downstream usage
//! ----------------
//! - Engine modules import these aliases instead of referring directly to
//!   `ndarray` generics.
//! - [`crate::derivatives::gradient::gradient`] and
//!   [`crate::derivatives::jacobian::jacobian`] use them as their public
//!   input/output types.
//!
//! Testing notes
//! -------------
//! - This module only defines type aliases and constants; there are no
//!   dedicated unit tests. Correctness is exercised by the modules that
//!   instantiate them.
use ndarray::{Array1, Array2};

/// Evaluation point for differentiation.
///
/// Alias for `ndarray::Array1<f64>`, used as the canonical parameter type
/// throughout the engine.
pub type Point = Array1<f64>;

/// Gradient vector `∇f(x)` of a scalar objective.
///
/// Alias for `ndarray::Array1<f64>`, matching the shape of `Point`.
pub type Gradient = Array1<f64>;

/// Output vector of a vector-valued objective.
///
/// Alias for `ndarray::Array1<f64>`; length `m` is fixed by the caller's
/// reference vector.
pub type Output = Array1<f64>;

/// Dense Jacobian matrix of a vector-valued objective.
///
/// Alias for `ndarray::Array2<f64>`; `m × n` with entry `(i, j)` holding
/// `∂f[i]/∂x[j]`, so row `i` is the gradient of output component `i`.
pub type Jacobian = Array2<f64>;

/// Weight base for the Richardson reduction.
///
/// Halving the step scales the leading `O(offset²)` error term of a
/// central difference by 4, which this base cancels order by order. The
/// same base is applied to forward differences as well, whose leading
/// `O(offset)` term only scales by 2 under halving, so the forward path
/// retains a first-order residual that the reduction does not fully
/// cancel.
pub const RICHARDSON_BASE: f64 = 4.0;

/// Default relative perturbation used to seed per-dimension step sizes.
pub const DEFAULT_EPS: f64 = 1e-4;

/// Default number of step-halving refinement rounds.
pub const DEFAULT_ITERATIONS: usize = 2;
