//! Execution helper that runs an `argmin` solver on a log-likelihood problem and
//! returns a crate-friendly [`OptimOutcome`].
use crate::optimization::{
    errors::{OptError, OptResult},
    loglik_optimizer::{
        Grad, LogLikelihood, MLEOptions, OptimOutcome, Theta, adapter::ArgMinAdapter,
    },
};
#[cfg(feature = "obs_slog")]
use argmin::core::{CostFunction, Gradient};
use argmin::core::{Executor, State, TerminationReason, TerminationStatus};
#[cfg(feature = "obs_slog")]
use argmin_math::ArgminL2Norm;

/// Run an `argmin` optimization for a log-likelihood problem.
///
/// Shared runner for both line-search variants. It seeds the executor with
/// `theta0`, applies `max_iter` when set, attaches the slog observer when the
/// `obs_slog` feature is on and `opts.verbose` is set, runs the solver, and
/// converts the final state into an [`OptimOutcome`]. The value is reported as
/// `ℓ(θ̂) = -c(θ̂) · scale` and the gradient norm on the same unscaled footing.
///
/// # Type Parameters
/// - `F`: the objective implementing [`LogLikelihood`].
/// - `S`: any `argmin` solver over `ArgMinAdapter<'a, F>` whose `IterState`
///   uses [`Theta`] parameters, [`Grad`] gradients, and `f64` floats.
///
/// # Errors
/// - Any `argmin` runtime error (solver failures, errors raised inside
///   cost/gradient evaluation) via `From<argmin::core::Error>`.
/// - [`OptError::SolverExit`] when L-BFGS gave up because its line search
///   failed; argmin reports this as a termination rather than an error.
/// - Validation errors from [`OptimOutcome::new`].
///
/// # Examples
/// ```ignore
/// let unscaled = ArgMinAdapter::new(&model, &data);
/// let scale    = unscaled.gradient_scale(&theta0)?;
/// let problem  = unscaled.with_scale(scale);
/// let solver   = build_optimizer_hager_zhang(&opts, scale)?;
/// let out     = run_lbfgs(theta0.clone(), &opts, problem, solver)?;
/// println!("done in {} iters, status: {}", out.iterations, out.status);
/// ```
pub fn run_lbfgs<'a, F, S>(
    theta0: Theta, opts: &MLEOptions, problem: ArgMinAdapter<'a, F>, solver: S,
) -> OptResult<OptimOutcome>
where
    F: LogLikelihood + ?Sized,
    S: argmin::core::Solver<
            ArgMinAdapter<'a, F>,
            argmin::core::IterState<Theta, Grad, (), (), (), f64>,
        > + Send
        + 'static,
{
    let scale = problem.scale;
    log::debug!(
        "starting L-BFGS: dim = {}, line search = {:?}, max_iter = {:?}, cost scale = {:.3e}",
        theta0.len(),
        opts.line_searcher,
        opts.tols.max_iter,
        scale
    );
    #[cfg(feature = "obs_slog")]
    if opts.verbose {
        log_initial_state(&theta0, &problem)?;
    }
    let mut optimizer = Executor::new(problem, solver);
    optimizer = optimizer.configure(|state| state.param(theta0));
    #[cfg(feature = "obs_slog")]
    if opts.verbose {
        let observer = argmin_observer_slog::SlogLogger::term_noblock();
        optimizer = optimizer.add_observer(observer, argmin::core::observers::ObserverMode::Always);
    }
    if let Some(max_iter) = opts.tols.max_iter {
        optimizer = optimizer.configure(|state| state.max_iters(max_iter as u64));
    }

    let mut result = optimizer.run()?.state().clone();
    let iterations = result.get_iter();
    let function_counts = result.get_func_counts().clone();
    let termination = result.get_termination_status().clone();
    if let TerminationStatus::Terminated(TerminationReason::SolverExit(reason)) = &termination {
        log::warn!("L-BFGS exited after {iterations} iterations: {reason}");
        return Err(OptError::SolverExit { reason: reason.clone() });
    }
    let grad = result.take_gradient().map(|g| g * scale);
    let outcome = OptimOutcome::new(
        result.take_best_param(),
        -result.get_best_cost() * scale,
        termination,
        iterations,
        function_counts,
        grad,
    )?;
    log::debug!(
        "L-BFGS finished after {} iterations: {} (value = {:.6})",
        outcome.iterations,
        outcome.status,
        outcome.value
    );
    if !outcome.converged {
        log::warn!("L-BFGS stopped without converging: {}", outcome.status);
    }
    Ok(outcome)
}

// ---- Helper Methods ----

#[cfg(feature = "obs_slog")]
fn log_initial_state<F>(theta0: &Theta, problem: &ArgMinAdapter<'_, F>) -> OptResult<()>
where
    F: LogLikelihood + ?Sized,
{
    let ll0 = -problem.cost(theta0)? * problem.scale;
    let g0n = problem.gradient(theta0).ok().map(|g| g.l2_norm() * problem.scale);
    log::info!(
        "init: ell(theta0) = {:.6}{}",
        ll0,
        g0n.map(|n| format!(", ||grad|| = {:.6}", n)).unwrap_or_default()
    );
    Ok(())
}
