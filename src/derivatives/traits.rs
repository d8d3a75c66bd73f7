//! Public API surface for finite-difference differentiation.
//!
//! - [`ScalarObjective`]: contract for scalar objectives on the gradient path.
//! - [`VectorObjective`]: contract for vector-valued objectives on the
//!   Jacobian path.
//! - [`DiffAlgorithm`]: choice of difference formula.
//! - [`NumDiffOptions`]: configuration for both entry points.
//!
//! Convention: the engine never evaluates an objective at the unperturbed
//! point. The reference value `f(x)` (scalar) or `f(x)` as a vector is
//! supplied by the caller, which lets callers reuse a fit value they have
//! already computed.
use crate::derivatives::{
    errors::{NumDiffError, NumDiffResult},
    types::{DEFAULT_EPS, DEFAULT_ITERATIONS, Output, Point},
    validation::{verify_eps, verify_iterations, verify_workers},
};
use std::str::FromStr;

/// Scalar objective evaluated on the gradient path.
///
/// The engine calls `value` with a perturbed copy of the evaluation point
/// and the identity of the worker making the call. Implementations must be
/// callable concurrently from multiple workers (`Sync`); the worker
/// identity exists so an objective can key per-worker resources (e.g.
/// evaluation scratch or caches) without cross-worker interference.
///
/// Worker identity:
/// - `None` — a single worker is running and no partitioning is needed.
/// - `Some(w)` — partition index `w`; at most one in-flight call carries a
///   given index at any time.
///
/// Returning a non-finite value is tolerated transiently: the gradient
/// path discards the estimate and retries at a smaller step. An objective
/// that is non-finite for *every* step near the point makes the retry loop
/// run forever, so callers must ensure the objective is defined in a
/// neighborhood of the evaluation point.
pub trait ScalarObjective: Sync {
    fn value(&self, point: &Point, worker: Option<usize>) -> f64;
}

impl<F> ScalarObjective for F
where
    F: Fn(&Point, Option<usize>) -> f64 + Sync,
{
    fn value(&self, point: &Point, worker: Option<usize>) -> f64 {
        self(point, worker)
    }
}

/// Vector-valued objective evaluated on the Jacobian path.
///
/// The engine calls `eval_into` with a perturbed copy of the evaluation
/// point and an output buffer pre-sized to the caller's reference vector;
/// implementations fill the buffer in place. This path is sequential, so
/// there is no worker identity and no `Sync` requirement.
///
/// Non-finite components are **not** retried on this path; they propagate
/// into the Jacobian for caller-side validation.
pub trait VectorObjective {
    fn eval_into(&self, point: &Point, out: &mut Output);
}

impl<F> VectorObjective for F
where
    F: Fn(&Point, &mut Output),
{
    fn eval_into(&self, point: &Point, out: &mut Output) {
        self(point, out)
    }
}

/// Choice of difference formula used for every dimension of a call.
///
/// Variants:
/// - `Forward`: one evaluation per step, `O(offset)` truncation error.
/// - `Central`: two evaluations per step, `O(offset²)` truncation error.
///
/// Parsing:
/// This enum implements `FromStr` and accepts case-insensitive names
/// (`"Forward"`, `"Central"`). Unknown names return
/// `NumDiffError::InvalidAlgorithm`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffAlgorithm {
    Forward,
    Central,
}

impl FromStr for DiffAlgorithm {
    type Err = NumDiffError;

    /// Parse an algorithm choice from a string (case-insensitive).
    ///
    /// Accepts:
    /// - `"Forward"`
    /// - `"Central"`
    /// - Any case variant (e.g., `"forward"`, `"CENTRAL"`).
    ///
    /// Any other value returns `NumDiffError::InvalidAlgorithm` with a
    /// helpful message.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "forward" => Ok(DiffAlgorithm::Forward),
            "central" => Ok(DiffAlgorithm::Central),
            _ => Err(NumDiffError::InvalidAlgorithm {
                name: s.to_string(),
                reason: "Valid options are case insensitive 'Forward' or 'Central'.",
            }),
        }
    }
}

/// Engine-level configuration consumed by both entry points.
///
/// Fields:
/// - `algorithm: DiffAlgorithm` — difference formula for every dimension.
/// - `iterations: usize` — number of step-halving refinement rounds;
///   controls the Richardson extrapolation order (`iterations - 1`).
/// - `eps: f64` — relative perturbation tolerance and absolute step floor.
/// - `workers: usize` — maximum parallel workers on the gradient path
///   (ignored on the Jacobian path, which is sequential).
///
/// Constructor:
/// - `new(algorithm, iterations, eps, workers) -> NumDiffResult<Self>` —
///   validates the numeric fields via [`crate::derivatives::validation`].
///
/// Default:
/// - `algorithm`: `Central`
/// - `iterations`: `2`
/// - `eps`: `1e-4`
/// - `workers`: `1`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumDiffOptions {
    pub algorithm: DiffAlgorithm,
    pub iterations: usize,
    pub eps: f64,
    pub workers: usize,
}

impl NumDiffOptions {
    /// Create a validated set of engine options.
    ///
    /// # Rules
    /// - `eps` must be **finite and strictly positive**.
    /// - `iterations` must be `>= 1`.
    /// - `workers` must be `>= 1` (clamped to the dimension count later, at
    ///   entry).
    ///
    /// # Errors
    /// - [`NumDiffError::InvalidEps`] for a non-finite or non-positive `eps`.
    /// - [`NumDiffError::InvalidIterations`] if `iterations == 0`.
    /// - [`NumDiffError::InvalidWorkers`] if `workers == 0`.
    pub fn new(
        algorithm: DiffAlgorithm, iterations: usize, eps: f64, workers: usize,
    ) -> NumDiffResult<Self> {
        verify_eps(eps)?;
        verify_iterations(iterations)?;
        verify_workers(workers)?;
        Ok(Self { algorithm, iterations, eps, workers })
    }
}

impl Default for NumDiffOptions {
    fn default() -> Self {
        Self {
            algorithm: DiffAlgorithm::Central,
            iterations: DEFAULT_ITERATIONS,
            eps: DEFAULT_EPS,
            workers: 1,
        }
    }
}
