//! derivatives — finite-difference gradients and Jacobians for black-box objectives.
//!
//! Purpose
//! -------
//! Provide derivative estimates for objectives that expose nothing but
//! evaluation: scalar fit functions get a **parallel, retrying gradient**
//! via [`gradient()`], vector-valued maps get a **sequential Jacobian** via
//! [`jacobian()`]. Both share the same difference formulas, step-size rule,
//! and Richardson refinement; they differ deliberately in dispatch and
//! failure handling.
//!
//! Key behaviors
//! -------------
//! - Select the Forward or Central formula once per call from
//!   [`DiffAlgorithm`] and pass it down monomorphically ([`stencils`]).
//! - Refine raw difference quotients with base-4 Richardson extrapolation
//!   ([`refine`]), so `iterations` rounds buy roughly two orders of
//!   accuracy each on smooth objectives.
//! - On the gradient path, retry non-finite estimates with halved steps
//!   without consuming refinement slots, and skip evaluation entirely once
//!   the step falls to machine epsilon ([`refine`]).
//! - Fan gradient work out across workers with private parameter copies
//!   and a worker-identity protocol ([`gradient()`]); keep the Jacobian
//!   walk strictly sequential with a fixed evaluation schedule
//!   ([`jacobian()`]).
//! - Reject bad configuration with fatal [`NumDiffError`] values before
//!   any objective evaluation ([`validation`]).
//!
//! Invariants & assumptions
//! ------------------------
//! - Objectives are treated as black boxes: no smoothness is verified, and
//!   a non-finite value is a recoverable condition on the gradient path and
//!   ordinary data on the Jacobian path.
//! - The caller's point is never mutated; perturbation happens on private
//!   copies and each perturbed coordinate is restored bit-identically.
//! - Outputs are bit-for-bit independent of the worker count and repeat
//!   calls with identical inputs reproduce identical results.
//! - Configuration types are validated on construction **and** re-checked
//!   at the entry points, since the option fields are public.
//!
//! Conventions
//! -----------
//! - Vectors and matrices use the canonical aliases [`Point`],
//!   [`Gradient`], [`Output`], and [`Jacobian`] from [`types`]; Jacobians
//!   are row-per-output-component (`m x n`).
//! - The initial step for dimension `dim` is
//!   `max(|point[dim] * eps|, eps)`, then halves once per refinement round.
//! - Reference values (`ref_fit`, `reference`) are supplied by the caller,
//!   never recomputed here.
//! - Fallible entry points return [`NumDiffResult<T>`]; submodules never
//!   intentionally panic and use no `unsafe`.
//!
//! Downstream usage
//! ----------------
//! - Optimizers call [`gradient()`] inside their iteration loop, passing the
//!   fit value they already computed at the current point and an objective
//!   that routes the worker identity to per-worker model state.
//! - Standard-error and constraint machinery call [`jacobian()`] on
//!   vector-valued maps and consume the row-per-component layout directly.
//! - Front-ends are expected to interact only with the re-exported
//!   surface: [`gradient()`], [`jacobian()`], [`DiffAlgorithm`],
//!   [`NumDiffOptions`], the objective traits, and the aliases from
//!   [`types`].
//!
//! Testing notes
//! -------------
//! - Unit tests in submodules cover:
//!   - step arithmetic and coordinate restoration in [`stencils`],
//!   - retry, the epsilon floor, and Richardson weights in [`refine`],
//!   - parallel dispatch, determinism, and the identity protocol in
//!     [`mod@gradient`],
//!   - sequential scheduling and NaN flow-through in [`mod@jacobian`],
//!   - option parsing and validation in [`traits`] and [`validation`].
//! - Integration tests exercise the two entry points end to end on
//!   analytic objectives, checking convergence order and the concrete
//!   accuracy scenarios.

pub mod errors;
pub mod gradient;
pub mod jacobian;
pub mod refine;
pub mod stencils;
pub mod traits;
pub mod types;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::errors::{NumDiffError, NumDiffResult};
pub use self::gradient::gradient;
pub use self::jacobian::jacobian;
pub use self::traits::{DiffAlgorithm, NumDiffOptions, ScalarObjective, VectorObjective};
pub use self::types::{DEFAULT_EPS, DEFAULT_ITERATIONS, Gradient, Jacobian, Output, Point};

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use rust_numdiff::derivatives::prelude::*;
//
// to import the main derivative surface in a single line.

pub mod prelude {
    pub use super::errors::{NumDiffError, NumDiffResult};
    pub use super::gradient::gradient;
    pub use super::jacobian::jacobian;
    pub use super::traits::{DiffAlgorithm, NumDiffOptions, ScalarObjective, VectorObjective};
    pub use super::types::{Gradient, Jacobian, Output, Point};
}
