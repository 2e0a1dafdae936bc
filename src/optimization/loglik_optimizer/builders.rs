//! loglik_optimizer::builders — L-BFGS solver construction.
//!
//! Purpose
//! -------
//! Turn an [`MLEOptions`] into a ready-to-run Argmin L-BFGS solver. The
//! builders pick the line search, the history size, and the gradient /
//! cost-change tolerances; the initial point and the iteration cap are left to
//! the runner (`run::run_lbfgs`), which owns the executor.
//!
//! Conventions
//! -----------
//! - History size is `opts.lbfgs_mem` or [`DEFAULT_LBFGS_MEM`].
//! - Both line searches are bounded by [`LINE_SEARCH_MAX_STEP`].
//! - `scale` is the factor the cost is divided by (see
//!   [`ArgMinAdapter`](super::adapter::ArgMinAdapter)). Tolerances are given
//!   on the unscaled objective and divided by `scale` here, so a run stops at
//!   the same `‖∇ℓ‖` whatever the scale.
//! - A tolerance set to `None` keeps Argmin's default for that criterion.
//! - Argmin rejects bad tolerances with its own error; that error is mapped
//!   into [`OptError`](crate::optimization::errors::OptError) through
//!   `From<argmin::core::Error>`.
use argmin::solver::quasinewton::LBFGS;

use crate::optimization::{
    errors::OptResult,
    loglik_optimizer::{
        traits::MLEOptions,
        types::{
            Cost, DEFAULT_LBFGS_MEM, Grad, HagerZhangLS, LINE_SEARCH_MAX_STEP, LbfgsHagerZhang,
            LbfgsMoreThuente, MoreThuenteLS, Theta,
        },
    },
};

/// L-BFGS with a Hager–Zhang line search, configured from `opts` for a cost
/// divided by `scale`.
///
/// # Errors
/// Propagates Argmin's rejection of the step bounds or of a tolerance (see
/// [`configure_lbfgs`]).
pub fn build_optimizer_hager_zhang(opts: &MLEOptions, scale: f64) -> OptResult<LbfgsHagerZhang> {
    let linesearch = HagerZhangLS::new().with_bounds(f64::EPSILON, LINE_SEARCH_MAX_STEP)?;
    configure_lbfgs(LBFGS::new(linesearch, history_size(opts)), opts, scale)
}

/// L-BFGS with a More–Thuente line search, configured from `opts` for a cost
/// divided by `scale`.
///
/// # Errors
/// Propagates Argmin's rejection of the step bounds or of a tolerance (see
/// [`configure_lbfgs`]).
pub fn build_optimizer_more_thuente(
    opts: &MLEOptions, scale: f64,
) -> OptResult<LbfgsMoreThuente> {
    let linesearch = MoreThuenteLS::new().with_bounds(f64::EPSILON.sqrt(), LINE_SEARCH_MAX_STEP)?;
    configure_lbfgs(LBFGS::new(linesearch, history_size(opts)), opts, scale)
}

/// Apply the optional gradient-norm and cost-change tolerances to any L-BFGS
/// solver, whatever its line search, dividing both by `scale`.
///
/// # Errors
/// `OptError` converted from Argmin when `with_tolerance_grad` or
/// `with_tolerance_cost` refuses the value.
pub fn configure_lbfgs<L>(
    mut solver: LBFGS<L, Theta, Grad, Cost>, opts: &MLEOptions, scale: f64,
) -> OptResult<LBFGS<L, Theta, Grad, Cost>> {
    if let Some(g) = opts.tols.tol_grad {
        solver = solver.with_tolerance_grad(g / scale)?;
    }
    if let Some(c) = opts.tols.tol_cost {
        solver = solver.with_tolerance_cost(c / scale)?;
    }
    Ok(solver)
}

fn history_size(opts: &MLEOptions) -> usize {
    opts.lbfgs_mem.unwrap_or(DEFAULT_LBFGS_MEM)
}
