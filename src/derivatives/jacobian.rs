//! derivatives::jacobian — sequential Jacobian assembly and entry point.
//!
//! Purpose
//! -------
//! Walk the parameter dimensions one at a time, let the vector stencil run
//! its fixed iteration schedule for each, reduce every output component's
//! estimate sequence in place, and write the refined column into the output
//! matrix for that dimension.
//!
//! Key behaviors
//! -------------
//! - [`jacobian`] validates the options, selects the difference formula
//!   once, and dispatches to the assembler; the fatal configuration error
//!   precedes any objective evaluation.
//! - Dimensions are processed strictly in order on the calling thread. The
//!   `workers` option plays no role here and vector objectives receive no
//!   worker identity.
//! - The iteration schedule is fixed: no step floor, no finiteness check,
//!   no retry. Non-finite estimates flow into the output unchanged.
//! - One scratch point and one raw-estimate matrix are allocated per call
//!   and reused across dimensions.
//!
//! Invariants & assumptions
//! ------------------------
//! - The caller's point is never mutated; the stencil restores the scratch
//!   coordinate after each dimension's schedule.
//! - Output orientation is the standard one: the matrix is `m x n` for an
//!   `n`-dimensional point and an `m`-dimensional output, with
//!   `out[[i, j]] = d f[i] / d x[j]`. Column `j` is the refined partial
//!   vector for dimension `j`.
//!
//! Conventions
//! -----------
//! - The initial offset for dimension `dim` is
//!   `max(|point[dim] * eps|, eps)`, the same rule the gradient path uses.
//! - Every raw column is rewritten for each dimension, so reusing the
//!   matrix across dimensions leaves no stale values behind.
//!
//! Downstream usage
//! ----------------
//! - Constraint handling and standard-error machinery consume the standard
//!   row-per-component layout directly.
//!
//! Testing notes
//! -------------
//! - Unit tests pin the concrete accuracy scenario and orientation, the
//!   exact evaluation count with non-finite values flowing through, the
//!   strict dimension ordering with `workers` set above one, and the fatal
//!   path performing zero evaluations.
use crate::derivatives::{
    errors::NumDiffResult,
    refine::richardson_reduce,
    stencils::{CentralDifference, ForwardDifference, VectorStencil},
    traits::{DiffAlgorithm, NumDiffOptions, VectorObjective},
    types::{Jacobian, Output, Point},
    validation::validate_options,
};
use ndarray::Array2;

/// Estimate the Jacobian of a vector objective at `point`.
///
/// # Behavior
/// - Validates `opts` and reports a fatal configuration error **before**
///   any objective evaluation.
/// - Selects the Forward or Central formula once from `opts.algorithm` and
///   passes it down monomorphically.
/// - Processes dimensions sequentially on the calling thread; `opts.workers`
///   is accepted but has no effect on this path.
///
/// # Parameters
/// - `f`: the vector objective; see [`VectorObjective`] for the
///   write-into-buffer contract.
/// - `reference`: the objective's output at the unperturbed `point`,
///   supplied by the caller (the forward formula consumes it; the central
///   formula does not). Its length fixes the output row count.
/// - `point`: evaluation point; returned to the caller bit-identical.
/// - `opts`: algorithm, refinement rounds, and relative perturbation.
///
/// # Returns
/// The `m x n` Jacobian with `out[[i, j]]` holding the Richardson-refined
/// partial `d f[i] / d x[j]`.
///
/// # Errors
/// - Propagates [`crate::derivatives::validation::validate_options`]
///   failures; past validation the numeric pipeline is infallible.
///   Non-finite objective output lands in the corresponding entries rather
///   than erroring or retrying.
///
/// # Example
/// ```rust
/// use ndarray::array;
/// use rust_numdiff::derivatives::{DiffAlgorithm, NumDiffOptions, jacobian};
///
/// let f = |x: &ndarray::Array1<f64>, out: &mut ndarray::Array1<f64>| {
///     out[0] = x[0] * x[1];
///     out[1] = x[0] + x[1];
/// };
/// let point = array![2.0, 3.0];
/// let mut reference = array![0.0, 0.0];
/// f(&point, &mut reference);
///
/// let opts = NumDiffOptions::new(DiffAlgorithm::Central, 4, 1e-4, 1)?;
/// let jac = jacobian(&f, &reference, &point, &opts)?;
///
/// assert!((jac[[0, 0]] - 3.0).abs() < 1e-6);
/// assert!((jac[[0, 1]] - 2.0).abs() < 1e-6);
/// # Ok::<(), rust_numdiff::derivatives::NumDiffError>(())
/// ```
pub fn jacobian<F: VectorObjective>(
    f: &F, reference: &Output, point: &Point, opts: &NumDiffOptions,
) -> NumDiffResult<Jacobian> {
    validate_options(opts)?;
    match opts.algorithm {
        DiffAlgorithm::Forward => Ok(assemble(ForwardDifference, f, reference, point, opts)),
        DiffAlgorithm::Central => Ok(assemble(CentralDifference, f, reference, point, opts)),
    }
}

/// Refine one dimension at a time and fill the output columns in order.
fn assemble<F, S>(
    stencil: S, f: &F, reference: &Output, point: &Point, opts: &NumDiffOptions,
) -> Jacobian
where
    F: VectorObjective,
    S: VectorStencil,
{
    let n = point.len();
    let m = reference.len();
    let mut out = Jacobian::zeros((m, n));
    let mut scratch = point.clone();
    let mut raw = Array2::<f64>::zeros((m, opts.iterations));

    for dim in 0..n {
        let offset = (point[dim] * opts.eps).abs().max(opts.eps);
        stencil.fill_estimates(f, reference, &mut scratch, dim, offset, &mut raw);
        for component in 0..m {
            richardson_reduce(raw.row_mut(component));
        }
        out.column_mut(dim).assign(&raw.column(0));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::derivatives::errors::NumDiffError;
    use ndarray::array;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - The concrete accuracy scenario and the row-per-component orientation.
    // - The fixed evaluation schedule: exact counts, with non-finite output
    //   flowing into the result instead of triggering retries.
    // - Strict sequential dimension ordering even when `workers` is above one.
    // - The fatal configuration path performing zero objective evaluations.
    //
    // They intentionally DO NOT cover:
    // - Step-halving arithmetic inside a single dimension (stencil tests).
    // - Richardson weights (refine tests).
    // -------------------------------------------------------------------------

    fn product_sum(x: &Point, out: &mut Output) {
        out[0] = x[0] * x[1];
        out[1] = x[0] + x[1];
    }

    #[test]
    // Purpose
    // -------
    // Pin the concrete scenario and the output orientation: entry (i, j)
    // holds the partial of component i with respect to x[j].
    //
    // Given
    // -----
    // - f(x) = [x0·x1, x0 + x1] at [2, 3], eps = 1e-4, iterations = 4,
    //   Central.
    //
    // Expect
    // ------
    // - The 2x2 result is within 1e-6 of [[3, 2], [1, 1]] read row by row,
    //   and the caller's point is untouched.
    fn central_scenario_matches_analytic_jacobian() {
        // Arrange
        let point: Point = array![2.0, 3.0];
        let mut reference: Output = array![0.0, 0.0];
        product_sum(&point, &mut reference);
        let opts = NumDiffOptions::new(DiffAlgorithm::Central, 4, 1e-4, 1)
            .expect("Options should validate");

        // Act
        let jac = jacobian(&product_sum, &reference, &point, &opts)
            .expect("Jacobian call should succeed");

        // Assert
        assert_eq!(jac.dim(), (2, 2));
        let expected = [[3.0, 2.0], [1.0, 1.0]];
        for component in 0..2 {
            for dim in 0..2 {
                assert!(
                    (jac[[component, dim]] - expected[component][dim]).abs() < 1e-6,
                    "Entry ({component}, {dim}) should be {}, got {}",
                    expected[component][dim],
                    jac[[component, dim]]
                );
            }
        }
        assert_eq!(point, array![2.0, 3.0], "Caller's point must be untouched");
    }

    #[test]
    // Purpose
    // -------
    // Verify the fixed schedule: non-finite output neither retries nor
    // errors, and the evaluation count stays exact.
    //
    // Given
    // -----
    // - A one-dimensional point and a two-component objective whose second
    //   component is NaN at every perturbed input; Forward, iterations = 3.
    //
    // Expect
    // ------
    // - Exactly 3 evaluations, a finite first component, and NaN in the
    //   second.
    fn non_finite_output_flows_through_without_retry() {
        // Arrange
        let evals = AtomicUsize::new(0);
        let f = |x: &Point, out: &mut Output| {
            evals.fetch_add(1, Ordering::Relaxed);
            out[0] = x[0] * x[0];
            out[1] = if x[0] == 2.0 { 4.0 } else { f64::NAN };
        };
        let point: Point = array![2.0];
        let reference: Output = array![4.0, 4.0];
        let opts = NumDiffOptions::new(DiffAlgorithm::Forward, 3, 1e-4, 1)
            .expect("Options should validate");

        // Act
        let jac = jacobian(&f, &reference, &point, &opts).expect("Jacobian call should succeed");

        // Assert
        assert_eq!(
            evals.load(Ordering::Relaxed),
            3,
            "Forward runs exactly one evaluation per iteration"
        );
        assert_eq!(jac.dim(), (2, 1));
        assert!(
            (jac[[0, 0]] - 4.0).abs() < 1e-2,
            "First component should differentiate cleanly, got {}",
            jac[[0, 0]]
        );
        assert!(jac[[1, 0]].is_nan(), "NaN must propagate into the result, got {}", jac[[1, 0]]);
    }

    #[test]
    // Purpose
    // -------
    // Verify dimensions are processed strictly in order on one thread, with
    // the workers option having no effect.
    //
    // Given
    // -----
    // - A recording objective over 2 dimensions, Forward with 2 iterations
    //   and workers = 4; each call notes which coordinate is perturbed.
    //
    // Expect
    // ------
    // - The perturbed-dimension sequence is [0, 0, 1, 1]: every call for
    //   dimension 0 precedes every call for dimension 1.
    fn dimensions_are_processed_sequentially_in_order() {
        // Arrange
        let base: Point = array![1.0, 5.0];
        let perturbed_dims = Mutex::new(Vec::new());
        let f = |x: &Point, out: &mut Output| {
            let dim = (0..x.len())
                .find(|&i| x[i] != [1.0, 5.0][i])
                .expect("Each call should perturb one coordinate");
            perturbed_dims.lock().expect("Recording mutex should not be poisoned").push(dim);
            out[0] = x.sum();
        };
        let reference: Output = array![6.0];
        let opts = NumDiffOptions::new(DiffAlgorithm::Forward, 2, 1e-4, 4)
            .expect("Options should validate");

        // Act
        jacobian(&f, &reference, &base, &opts).expect("Jacobian call should succeed");

        // Assert
        let seen = perturbed_dims.lock().expect("Recording mutex should not be poisoned");
        assert_eq!(*seen, vec![0, 0, 1, 1], "Dimension schedules must run back to back, in order");
    }

    #[test]
    // Purpose
    // -------
    // Verify the fatal configuration path: invalid options fail before any
    // objective evaluation.
    //
    // Given
    // -----
    // - An options literal with iterations = 0 (bypassing the validating
    //   constructor) and a counting objective.
    //
    // Expect
    // ------
    // - `jacobian` returns `InvalidIterations` and the counter stays at zero.
    fn invalid_options_fail_before_any_evaluation() {
        // Arrange
        let evals = AtomicUsize::new(0);
        let f = |x: &Point, out: &mut Output| {
            evals.fetch_add(1, Ordering::Relaxed);
            out[0] = x[0];
        };
        let point: Point = array![1.0];
        let reference: Output = array![1.0];
        let opts =
            NumDiffOptions { algorithm: DiffAlgorithm::Central, iterations: 0, eps: 1e-4, workers: 1 };

        // Act
        let result = jacobian(&f, &reference, &point, &opts);

        // Assert
        let err = result.expect_err("Zero iterations should be rejected at entry");
        assert!(
            matches!(err, NumDiffError::InvalidIterations { .. }),
            "Expected InvalidIterations, got {err:?}"
        );
        assert_eq!(evals.load(Ordering::Relaxed), 0, "No evaluation may precede validation");
    }
}
