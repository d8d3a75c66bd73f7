//! rust_numdiff — finite-difference derivatives for black-box objectives.
//!
//! Purpose
//! -------
//! Serve as the crate root for a small numerical-differentiation library:
//! gradient estimation for scalar objectives and Jacobian estimation for
//! vector-valued maps, built from forward/central difference quotients and
//! Richardson extrapolation. The crate targets objectives that expose
//! nothing but evaluation, such as log-likelihoods and fit functions whose
//! analytic derivatives are unavailable.
//!
//! Key behaviors
//! -------------
//! - Expose the full derivative surface through the [`derivatives`] module:
//!   the parallel gradient entry point, the sequential Jacobian entry
//!   point, the objective traits, and the configuration types.
//! - Keep numerical semantics reproducible: identical inputs produce
//!   bit-identical outputs regardless of the configured worker count.
//!
//! Invariants & assumptions
//! ------------------------
//! - All numerical work lives in [`derivatives`]; this file is only the
//!   crate surface.
//! - Objectives are assumed cheap to call relative to the cost of a missed
//!   derivative; every estimate is bought with repeated evaluations.
//!
//! Conventions
//! -----------
//! - Parameter vectors, gradients, and Jacobians use `ndarray`-based
//!   aliases declared in [`derivatives::types`].
//! - Fallible entry points return `NumDiffResult<T>`; the crate never
//!   intentionally panics and uses no `unsafe`.
//!
//! Downstream usage
//! ----------------
//! - Optimizers and estimators call `derivatives::gradient` /
//!   `derivatives::jacobian` directly, or import the curated surface via
//!   `derivatives::prelude::*`.
//!
//! Testing notes
//! -------------
//! - Unit tests live beside each submodule; integration tests under
//!   `tests/` exercise the two entry points end to end on analytic
//!   objectives with known derivatives.

pub mod derivatives;
