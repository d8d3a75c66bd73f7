//! derivatives::refine — per-dimension iteration driver and Richardson reducer.
//!
//! Purpose
//! -------
//! Drive repeated shrinking-step evaluations of a difference formula for
//! one parameter dimension, handling non-finite results by retrying at a
//! smaller step, and reduce the resulting raw-estimate sequence to a
//! single higher-order-accurate value by Richardson extrapolation.
//!
//! Key behaviors
//! -------------
//! - [`collect_estimates`] produces exactly `raw.len()` finite raw
//!   estimates at successively halved step sizes, retrying non-finite
//!   estimates without consuming an iteration slot, and restores the
//!   perturbed coordinate before returning.
//! - Once the offset is at or below machine epsilon the objective is not
//!   evaluated and the estimate is recorded as zero, still consuming the
//!   iteration; this stops the retry loop from shrinking the step forever.
//! - [`richardson_reduce`] combines adjacent estimates in place, one
//!   extrapolation order per pass, leaving the refined value in slot 0.
//!
//! Invariants & assumptions
//! ------------------------
//! - The offset is halved after **every** attempt, accepted or not.
//! - A non-finite raw estimate is the only retry condition; the retry
//!   count is unbounded, so an objective that never returns a finite value
//!   near the point makes [`collect_estimates`] loop forever. Callers
//!   guard against that by ensuring the objective is defined in a
//!   neighborhood of the evaluation point.
//! - The reduction weight follows [`RICHARDSON_BASE`] for both formulas;
//!   see the note on that constant for the forward-difference residual.
//!
//! Conventions
//! -----------
//! - Raw sequences are indexed with slot 0 holding the largest-step
//!   estimate; each reduction pass shrinks the usable prefix by one.
//! - Each retry emits one `log::debug!` line carrying the dimension index
//!   and the next offset; this is the engine's only diagnostic output.
//!
//! Downstream usage
//! ----------------
//! - [`crate::derivatives::gradient()`] runs both stages per dimension, in
//!   parallel across dimensions.
//! - [`crate::derivatives::jacobian()`] reuses [`richardson_reduce`]
//!   component-wise on its raw-estimate matrix; its step schedule has no
//!   retry and lives with the vector stencils instead.
//!
//! Testing notes
//! -------------
//! - Unit tests pin the retry loop (evaluation counts, restoration), the
//!   degenerate-step shortcut, and exactness of the reduction on
//!   sequences with a pure `4^-k` error term.
use crate::derivatives::{
    stencils::ScalarStencil,
    traits::ScalarObjective,
    types::{Point, RICHARDSON_BASE},
};
use ndarray::{Array1, ArrayViewMut1};

/// Collect `raw.len()` finite raw derivative estimates for one dimension.
///
/// Runs the scalar stencil at successively halved offsets starting from
/// `offset`. Attempts with a non-finite result are discarded and retried
/// at the next smaller offset without advancing the slot index; attempts
/// with the offset at or below machine epsilon record zero without
/// evaluating the objective. `scratch[dim]` is restored to its original
/// value before returning no matter how many retries occurred.
pub fn collect_estimates<F, S>(
    stencil: S, f: &F, ref_fit: f64, worker: Option<usize>, scratch: &mut Point, dim: usize,
    mut offset: f64, raw: &mut Array1<f64>,
) where
    F: ScalarObjective,
    S: ScalarStencil,
{
    let orig = scratch[dim];
    let mut k = 0;
    while k < raw.len() {
        let mut estimate = 0.0;
        if offset > f64::EPSILON {
            estimate = stencil.estimate(f, scratch, orig, dim, offset, ref_fit, worker);
        }
        offset *= 0.5;
        if !estimate.is_finite() {
            log::debug!("gradient[{dim}]: non-finite estimate, retrying with offset {offset:.4e}");
            continue;
        }
        raw[k] = estimate;
        k += 1;
    }
    scratch[dim] = orig;
}

/// Reduce a raw estimate sequence in place by Richardson extrapolation.
///
/// For extrapolation order `m = 1 .. len-1` and each remaining index
/// `k = 0 .. len-m-1`:
///
/// ```text
/// seq[k] <- (seq[k+1] * 4^m - seq[k]) / (4^m - 1)
/// ```
///
/// After all passes `seq[0]` holds the refined estimate. Length-0 and
/// length-1 sequences run zero passes and come back unchanged. The weights
/// `4, 16, 64, …` are accumulated multiplicatively and are exact in `f64`.
pub fn richardson_reduce(mut seq: ArrayViewMut1<'_, f64>) {
    let rounds = seq.len();
    let mut weight = 1.0;
    for order in 1..rounds {
        weight *= RICHARDSON_BASE;
        for k in 0..(rounds - order) {
            seq[k] = (seq[k + 1] * weight - seq[k]) / (weight - 1.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::derivatives::stencils::{CentralDifference, ForwardDifference};
    use ndarray::array;
    use std::sync::atomic::{AtomicUsize, Ordering};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Evaluation counts, restoration, and exact estimates in the driver's
    //   happy path.
    // - The retry-on-non-finite loop, including that retries do not consume
    //   iteration slots.
    // - The machine-epsilon shortcut recording zeros without evaluations.
    // - In-place Richardson reduction: no-op on length 1, exact cancellation
    //   of a pure 4^-k error term, and the pairwise formula itself.
    //
    // They intentionally DO NOT cover:
    // - Parallel dispatch and worker identities (see `gradient`).
    // - The Jacobian schedule, which has no retry (see `stencils`/`jacobian`).
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Verify the driver collects the requested number of estimates with the
    // expected evaluation count and restores the coordinate.
    //
    // Given
    // -----
    // - f(x) = x0² with evaluation counting, point [1.5], ref unused.
    // - Central stencil, 3 iterations, initial offset 0.5.
    //
    // Expect
    // ------
    // - raw = [3, 3, 3] exactly (central is exact on quadratics at dyadic
    //   offsets).
    // - 6 evaluations (two per accepted estimate), scratch restored.
    fn collect_estimates_happy_path_counts_and_restores() {
        // Arrange
        let evals = AtomicUsize::new(0);
        let f = |x: &Point, _w: Option<usize>| {
            evals.fetch_add(1, Ordering::Relaxed);
            x[0] * x[0]
        };
        let mut scratch: Point = array![1.5];
        let mut raw = Array1::<f64>::zeros(3);

        // Act
        collect_estimates(CentralDifference, &f, f64::NAN, None, &mut scratch, 0, 0.5, &mut raw);

        // Assert
        assert_eq!(raw, array![3.0, 3.0, 3.0], "Central estimates should be exact on x²");
        assert_eq!(evals.load(Ordering::Relaxed), 6, "Two evaluations per accepted estimate");
        assert_eq!(scratch[0], 1.5, "Coordinate must be restored after collection");
    }

    #[test]
    // Purpose
    // -------
    // Ensure non-finite estimates are retried at smaller offsets without
    // consuming iteration slots, and the final estimates are unaffected.
    //
    // Given
    // -----
    // - f(x) = 3·x0 but NaN whenever the perturbation exceeds 0.1.
    // - Forward stencil, ref_fit = f at the unperturbed point [2.0].
    // - 2 iterations, initial offset 0.5 (so attempts at 0.5, 0.25, 0.125
    //   fail before 0.0625 and 0.03125 succeed).
    //
    // Expect
    // ------
    // - raw = [3, 3] exactly.
    // - Exactly 5 evaluations: 3 rejected, 2 accepted.
    // - scratch restored.
    fn collect_estimates_retries_non_finite_without_consuming_slots() {
        // Arrange
        let evals = AtomicUsize::new(0);
        let f = |x: &Point, _w: Option<usize>| {
            evals.fetch_add(1, Ordering::Relaxed);
            if (x[0] - 2.0).abs() > 0.1 { f64::NAN } else { 3.0 * x[0] }
        };
        let mut scratch: Point = array![2.0];
        let mut raw = Array1::<f64>::zeros(2);

        // Act
        collect_estimates(ForwardDifference, &f, 6.0, None, &mut scratch, 0, 0.5, &mut raw);

        // Assert
        assert_eq!(raw, array![3.0, 3.0], "Estimates after retries should be exact on a line");
        assert_eq!(evals.load(Ordering::Relaxed), 5, "Three rejected attempts plus two accepted");
        assert_eq!(scratch[0], 2.0, "Coordinate must be restored after retries");
    }

    #[test]
    // Purpose
    // -------
    // Confirm the degenerate-step shortcut: offsets at or below machine
    // epsilon record zero estimates without evaluating the objective.
    //
    // Given
    // -----
    // - An objective that panics if called.
    // - Initial offset exactly f64::EPSILON (not strictly above it).
    //
    // Expect
    // ------
    // - raw = [0, 0], zero evaluations, scratch untouched.
    fn collect_estimates_skips_evaluation_below_machine_epsilon() {
        // Arrange
        let f = |_x: &Point, _w: Option<usize>| -> f64 {
            panic!("Objective must not be evaluated at degenerate offsets")
        };
        let mut scratch: Point = array![7.0];
        let mut raw = Array1::<f64>::from_elem(2, f64::NAN);

        // Act
        collect_estimates(ForwardDifference, &f, 0.0, None, &mut scratch, 0, f64::EPSILON, &mut raw);

        // Assert
        assert_eq!(raw, array![0.0, 0.0], "Degenerate offsets should record zero estimates");
        assert_eq!(scratch[0], 7.0);
    }

    #[test]
    // Purpose
    // -------
    // Verify a length-1 sequence passes through the reducer unchanged.
    //
    // Given
    // -----
    // - seq = [42.0].
    //
    // Expect
    // ------
    // - seq = [42.0] afterwards.
    fn richardson_reduce_is_noop_on_single_estimate() {
        // Arrange
        let mut seq = array![42.0];

        // Act
        richardson_reduce(seq.view_mut());

        // Assert
        assert_eq!(seq[0], 42.0);
    }

    #[test]
    // Purpose
    // -------
    // Verify the reduction cancels a pure 4^-k error term exactly.
    //
    // Given
    // -----
    // - seq[k] = 1 + 0.75 / 4^k for k = 0..3, i.e. a limit of 1.0 with the
    //   error scaling the reduction assumes. All values are dyadic, so the
    //   arithmetic is exact.
    //
    // Expect
    // ------
    // - seq[0] == 1.0 exactly after reduction.
    fn richardson_reduce_cancels_fourth_order_error_exactly() {
        // Arrange
        let mut seq = array![1.75, 1.1875, 1.046875];

        // Act
        richardson_reduce(seq.view_mut());

        // Assert
        assert_eq!(seq[0], 1.0, "A pure 4^-k error term should cancel exactly");
    }

    #[test]
    // Purpose
    // -------
    // Pin the pairwise formula on a two-element sequence.
    //
    // Given
    // -----
    // - seq = [2.0, 1.0]; one pass with weight 4.
    //
    // Expect
    // ------
    // - seq[0] == (1·4 − 2) / 3 == 2/3.
    fn richardson_reduce_applies_pairwise_formula() {
        // Arrange
        let mut seq = array![2.0, 1.0];

        // Act
        richardson_reduce(seq.view_mut());

        // Assert
        assert_eq!(seq[0], 2.0 / 3.0);
    }
}
