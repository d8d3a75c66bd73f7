//! derivatives::stencils — forward and central difference formulas.
//!
//! Purpose
//! -------
//! Provide the two pure numerical rules for estimating a one-dimensional
//! partial derivative from perturbed objective evaluations, as zero-sized
//! strategy types selected once per call and passed down monomorphically.
//!
//! Key behaviors
//! -------------
//! - [`ForwardDifference`]: one evaluation per step,
//!   `(f(x + h) - ref) / h`, truncation error `O(h)`.
//! - [`CentralDifference`]: two evaluations per step,
//!   `(f(x + h) - f(x - h)) / (2h)`, truncation error `O(h²)`.
//! - The scalar seam ([`ScalarStencil`]) produces one raw estimate per
//!   call; the vector seam ([`VectorStencil`]) runs the whole fixed
//!   per-dimension step schedule and fills a raw-estimate matrix, one
//!   column per step.
//!
//! Invariants & assumptions
//! ------------------------
//! - `offset` is strictly positive on every call.
//! - Scalar estimates leave the perturbed coordinate at the last evaluated
//!   offset; final restoration belongs to the iteration driver. Vector
//!   fills restore the coordinate themselves before returning, since they
//!   own the whole schedule.
//! - The raw-estimate matrix passed to [`VectorStencil::fill_estimates`]
//!   has shape `m × iterations` for `m = reference.len()`.
//!
//! Conventions
//! -----------
//! - The coordinate under perturbation is addressed by index into a
//!   mutable scratch copy of the evaluation point; callers never hand the
//!   engine their own storage.
//! - The step is halved after every vector step, matching the schedule the
//!   driver applies on the scalar path.
//!
//! Downstream usage
//! ----------------
//! - [`crate::derivatives::refine`] drives [`ScalarStencil`] inside the
//!   retry loop of the gradient path.
//! - [`crate::derivatives::jacobian()`] invokes [`VectorStencil`] once per
//!   dimension on the sequential path.
//!
//! Testing notes
//! -------------
//! - Unit tests pin the formulas on functions where they are exact in
//!   floating point (linear for forward, quadratic for central) and check
//!   the documented side effects on the scratch coordinate.
use crate::derivatives::{
    traits::{ScalarObjective, VectorObjective},
    types::{Output, Point},
};
use ndarray::Array2;

/// One-sided formula: perturb above the point only.
#[derive(Debug, Clone, Copy)]
pub struct ForwardDifference;

/// Symmetric formula: perturb above and below the point.
#[derive(Debug, Clone, Copy)]
pub struct CentralDifference;

/// One raw scalar derivative estimate at a single step size.
///
/// Implementations write the perturbed coordinate into `scratch[dim]`,
/// evaluate the objective through it, and return the difference quotient.
/// `scratch[dim]` is left at the last evaluated offset.
pub trait ScalarStencil: Copy + Send + Sync {
    fn estimate<F: ScalarObjective>(
        &self, f: &F, scratch: &mut Point, orig: f64, dim: usize, offset: f64, ref_fit: f64,
        worker: Option<usize>,
    ) -> f64;
}

impl ScalarStencil for ForwardDifference {
    /// `(f(x + offset) - ref_fit) / offset`; one objective evaluation.
    fn estimate<F: ScalarObjective>(
        &self, f: &F, scratch: &mut Point, orig: f64, dim: usize, offset: f64, ref_fit: f64,
        worker: Option<usize>,
    ) -> f64 {
        scratch[dim] = orig + offset;
        let above = f.value(scratch, worker);
        (above - ref_fit) / offset
    }
}

impl ScalarStencil for CentralDifference {
    /// `(f(x + offset) - f(x - offset)) / (2 * offset)`; two evaluations.
    fn estimate<F: ScalarObjective>(
        &self, f: &F, scratch: &mut Point, orig: f64, dim: usize, offset: f64, _ref_fit: f64,
        worker: Option<usize>,
    ) -> f64 {
        scratch[dim] = orig + offset;
        let above = f.value(scratch, worker);
        scratch[dim] = orig - offset;
        let below = f.value(scratch, worker);
        (above - below) / (2.0 * offset)
    }
}

/// The full fixed step schedule for one dimension of a Jacobian.
///
/// Implementations run `raw.ncols()` steps, filling column `k` with the
/// `m`-vector difference quotient at the `k`-th halved offset, and restore
/// `scratch[dim]` before returning. There is no validity checking and no
/// retry on this path; non-finite components propagate into `raw`.
pub trait VectorStencil: Copy {
    fn fill_estimates<F: VectorObjective>(
        &self, f: &F, reference: &Output, scratch: &mut Point, dim: usize, offset: f64,
        raw: &mut Array2<f64>,
    );
}

impl VectorStencil for ForwardDifference {
    fn fill_estimates<F: VectorObjective>(
        &self, f: &F, reference: &Output, scratch: &mut Point, dim: usize, mut offset: f64,
        raw: &mut Array2<f64>,
    ) {
        let orig = scratch[dim];
        let mut above = Output::zeros(reference.len());
        for k in 0..raw.ncols() {
            scratch[dim] = orig + offset;
            f.eval_into(scratch, &mut above);
            raw.column_mut(k).assign(&((&above - reference) / offset));
            offset *= 0.5;
        }
        scratch[dim] = orig;
    }
}

impl VectorStencil for CentralDifference {
    fn fill_estimates<F: VectorObjective>(
        &self, f: &F, reference: &Output, scratch: &mut Point, dim: usize, mut offset: f64,
        raw: &mut Array2<f64>,
    ) {
        let orig = scratch[dim];
        let mut above = Output::zeros(reference.len());
        let mut below = Output::zeros(reference.len());
        for k in 0..raw.ncols() {
            scratch[dim] = orig + offset;
            f.eval_into(scratch, &mut above);
            scratch[dim] = orig - offset;
            f.eval_into(scratch, &mut below);
            raw.column_mut(k).assign(&((&above - &below) / (2.0 * offset)));
            offset *= 0.5;
        }
        scratch[dim] = orig;
    }
}
