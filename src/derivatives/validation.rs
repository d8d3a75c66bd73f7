//! Validation helpers for differentiation configuration.
//!
//! This module centralizes the consistency checks applied to engine
//! options:
//!
//! - **Perturbation checks**: [`verify_eps`] ensures the relative
//!   perturbation is finite and strictly positive.
//! - **Iteration checks**: [`verify_iterations`] ensures at least one
//!   refinement round is requested.
//! - **Worker checks**: [`verify_workers`] ensures at least one worker.
//! - **Whole-option checks**: [`validate_options`] runs all of the above
//!   against a [`NumDiffOptions`] value, and is re-run by the public entry
//!   points so that a hand-built options literal still fails before any
//!   objective evaluation.
//!
//! These helpers standardize error reporting by returning domain-specific
//! [`NumDiffError`] variants, making higher-level code more uniform.
use crate::derivatives::{
    errors::{NumDiffError, NumDiffResult},
    traits::NumDiffOptions,
};

/// Validate the relative perturbation tolerance.
///
/// The value seeds every per-dimension step size as
/// `max(|point[dim] * eps|, eps)`, so it must be **finite** and
/// **strictly positive**.
///
/// # Errors
/// Returns [`NumDiffError::InvalidEps`] if the value is non-finite or ≤ 0.0.
pub fn verify_eps(eps: f64) -> NumDiffResult<()> {
    if !eps.is_finite() {
        return Err(NumDiffError::InvalidEps { eps, reason: "Perturbation must be finite." });
    }
    if eps <= 0.0 {
        return Err(NumDiffError::InvalidEps { eps, reason: "Perturbation must be positive." });
    }
    Ok(())
}

/// Validate the number of step-halving refinement rounds.
///
/// At least one round is required; the Richardson reduction reads the
/// first raw estimate even when no extrapolation is performed.
///
/// # Errors
/// Returns [`NumDiffError::InvalidIterations`] if the count is zero.
pub fn verify_iterations(iterations: usize) -> NumDiffResult<()> {
    if iterations == 0 {
        return Err(NumDiffError::InvalidIterations {
            iterations,
            reason: "At least one refinement round is required.",
        });
    }
    Ok(())
}

/// Validate the maximum worker count for the gradient path.
///
/// The count is clamped to the number of dimensions at entry, but must be
/// at least 1 to begin with.
///
/// # Errors
/// Returns [`NumDiffError::InvalidWorkers`] if the count is zero.
pub fn verify_workers(workers: usize) -> NumDiffResult<()> {
    if workers == 0 {
        return Err(NumDiffError::InvalidWorkers {
            workers,
            reason: "At least one worker is required.",
        });
    }
    Ok(())
}

/// Validate a full set of engine options.
///
/// Runs [`verify_eps`], [`verify_iterations`], and [`verify_workers`] in
/// that order and surfaces the first failure.
///
/// # Errors
/// Propagates the corresponding [`NumDiffError`] variant for the first
/// invalid field.
pub fn validate_options(opts: &NumDiffOptions) -> NumDiffResult<()> {
    verify_eps(opts.eps)?;
    verify_iterations(opts.iterations)?;
    verify_workers(opts.workers)?;
    Ok(())
}
