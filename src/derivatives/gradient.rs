//! derivatives::gradient — parallel gradient assembly and entry point.
//!
//! Purpose
//! -------
//! Fan the per-dimension refinement pipeline (iteration driver followed by
//! Richardson reduction) out across all parameter dimensions concurrently,
//! each worker owning a private copy of the evaluation point, and collect
//! the refined partials into the output gradient.
//!
//! Key behaviors
//! -------------
//! - [`gradient`] validates the options, selects the difference formula
//!   once, and dispatches to the assembler; the fatal configuration error
//!   precedes any objective evaluation.
//! - The worker count is clamped to the dimension count at entry; one
//!   rayon task is spawned per worker, so the requested count bounds
//!   concurrency without constructing a thread pool per call. Callers
//!   wanting a dedicated pool wrap the call in `ThreadPool::install`.
//! - Worker `w` owns scratch copy `w` (allocated before dispatch, never
//!   aliased) and processes the strided dimension set `{w, w+workers, …}`,
//!   passing its identity to the objective on every call.
//!
//! Invariants & assumptions
//! ------------------------
//! - The caller's point is never mutated; each worker perturbs only its
//!   private copy and the driver restores the coordinate it perturbed.
//! - Worker identity is `None` exactly when one worker is running (no
//!   partitioning needed) and `Some(w)` otherwise; at most one in-flight
//!   objective call carries a given identity.
//! - Each dimension's arithmetic depends only on the shared read-only
//!   inputs, so the output is bit-for-bit independent of the worker count
//!   and of completion order.
//!
//! Conventions
//! -----------
//! - The initial offset for dimension `dim` is
//!   `max(|point[dim] * eps|, eps)`, computed from the caller's pristine
//!   point rather than the scratch copy.
//! - Each output slot is written exactly once, after all tasks join.
//!
//! Downstream usage
//! ----------------
//! - Optimizers and statistical estimators call [`gradient`] with a fit
//!   value they have already computed at the unperturbed point.
//! - The Jacobian path does not share this assembler; it is sequential by
//!   contract (see [`crate::derivatives::jacobian()`]).
//!
//! Testing notes
//! -------------
//! - Unit tests pin the concrete accuracy scenarios, determinism across
//!   worker counts, the worker-identity protocol, the exact zero-coordinate
//!   initial step, and the fatal path performing zero evaluations.
//! - Integration tests add convergence-order and restoration properties on
//!   top of these.
use crate::derivatives::{
    errors::NumDiffResult,
    refine::{collect_estimates, richardson_reduce},
    stencils::{CentralDifference, ForwardDifference, ScalarStencil},
    traits::{DiffAlgorithm, NumDiffOptions, ScalarObjective},
    types::{Gradient, Point},
    validation::validate_options,
};
use ndarray::Array1;
use rayon::iter::{IndexedParallelIterator, IntoParallelIterator, ParallelIterator};

/// Estimate the gradient of a scalar objective at `point`.
///
/// # Behavior
/// - Validates `opts` and reports a fatal configuration error **before**
///   any objective evaluation.
/// - Selects the Forward or Central formula once from `opts.algorithm` and
///   passes it down monomorphically.
/// - Clamps `opts.workers` to the number of dimensions, allocates one
///   private copy of `point` per worker, and assembles the per-dimension
///   refined partials on the ambient rayon pool.
///
/// # Parameters
/// - `f`: the scalar objective; see [`ScalarObjective`] for the worker
///   identity and finiteness contract.
/// - `ref_fit`: the objective's value at the unperturbed `point`, supplied
///   by the caller (the forward formula consumes it; the central formula
///   does not).
/// - `point`: evaluation point; returned to the caller bit-identical.
/// - `opts`: algorithm, refinement rounds, relative perturbation, and the
///   worker bound.
///
/// # Returns
/// The length-`n` gradient, each slot holding the Richardson-refined
/// partial for that dimension.
///
/// # Errors
/// - Propagates [`crate::derivatives::validation::validate_options`]
///   failures; past validation the numeric pipeline is infallible. A
///   persistently non-finite objective near `point` does not error, it
///   makes the retry loop run forever (see [`ScalarObjective`]).
///
/// # Example
/// ```rust
/// use ndarray::array;
/// use rust_numdiff::derivatives::{DiffAlgorithm, NumDiffOptions, gradient};
///
/// let f = |x: &ndarray::Array1<f64>, _worker: Option<usize>| x[0] * x[0] + 3.0 * x[1];
/// let point = array![2.0, 1.0];
/// let ref_fit = f(&point, None);
///
/// let opts = NumDiffOptions::new(DiffAlgorithm::Central, 4, 1e-4, 1)?;
/// let grad = gradient(&f, ref_fit, &point, &opts)?;
///
/// assert!((grad[0] - 4.0).abs() < 1e-6);
/// assert!((grad[1] - 3.0).abs() < 1e-6);
/// # Ok::<(), rust_numdiff::derivatives::NumDiffError>(())
/// ```
pub fn gradient<F: ScalarObjective>(
    f: &F, ref_fit: f64, point: &Point, opts: &NumDiffOptions,
) -> NumDiffResult<Gradient> {
    validate_options(opts)?;
    match opts.algorithm {
        DiffAlgorithm::Forward => Ok(assemble(ForwardDifference, f, ref_fit, point, opts)),
        DiffAlgorithm::Central => Ok(assemble(CentralDifference, f, ref_fit, point, opts)),
    }
}

/// Partition the dimensions across workers and collect refined partials.
fn assemble<F, S>(stencil: S, f: &F, ref_fit: f64, point: &Point, opts: &NumDiffOptions) -> Gradient
where
    F: ScalarObjective,
    S: ScalarStencil,
{
    let n = point.len();
    let workers = opts.workers.min(n).max(1);
    let scratch: Vec<Point> = (0..workers).map(|_| point.clone()).collect();

    let per_worker: Vec<Vec<(usize, f64)>> = scratch
        .into_par_iter()
        .enumerate()
        .map(|(w, mut local)| {
            let worker = if workers == 1 { None } else { Some(w) };
            (w..n)
                .step_by(workers)
                .map(|dim| {
                    let offset = (point[dim] * opts.eps).abs().max(opts.eps);
                    let refined = refine_dimension(
                        stencil,
                        f,
                        ref_fit,
                        worker,
                        &mut local,
                        dim,
                        offset,
                        opts.iterations,
                    );
                    (dim, refined)
                })
                .collect()
        })
        .collect();

    let mut grad = Gradient::zeros(n);
    for (dim, value) in per_worker.into_iter().flatten() {
        grad[dim] = value;
    }
    grad
}

/// Run the iteration driver then the Richardson reducer for one dimension.
fn refine_dimension<F, S>(
    stencil: S, f: &F, ref_fit: f64, worker: Option<usize>, scratch: &mut Point, dim: usize,
    offset: f64, iterations: usize,
) -> f64
where
    F: ScalarObjective,
    S: ScalarStencil,
{
    let mut raw = Array1::<f64>::zeros(iterations);
    collect_estimates(stencil, f, ref_fit, worker, scratch, dim, offset, &mut raw);
    richardson_reduce(raw.view_mut());
    raw[0]
}
