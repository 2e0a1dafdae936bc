//! High-level entry points for maximizing an objective with L-BFGS.
//!
//! - [`maximize`]: stateless `LogLikelihood` + explicit start `θ₀` + data.
//! - [`maximize_optimizable`]: stateful [`Optimizable`]; the start is read
//!   from the object and the optimum is written back into it.
//!
//! Both wrap the objective in an `ArgMinAdapter` (which *minimizes* `-ℓ(θ)`),
//! pick a line search from the options, and delegate to `run_lbfgs`.
use crate::optimization::{
    errors::{OptError, OptResult},
    loglik_optimizer::{
        OptimOutcome, Theta,
        adapter::ArgMinAdapter,
        builders::{build_optimizer_hager_zhang, build_optimizer_more_thuente},
        run::run_lbfgs,
        stateful::StatefulObjective,
        traits::{LineSearcher, LogLikelihood, MLEOptions, Optimizable},
    },
};

/// Maximize a log-likelihood `ℓ(θ)` using L-BFGS with the chosen line search.
///
/// # Behavior
/// - Validates the initial guess via `f.check(theta0, data)`.
/// - Builds an L-BFGS solver with either **Hager–Zhang** or **More–Thuente**
///   line search based on `opts.line_searcher`.
/// - Runs it on `c(θ) = -ℓ(θ) / s` with `s = max(1, ‖∇ℓ(θ₀)‖)` and returns
///   ℓ-space diagnostics. Tolerances keep their meaning on `ℓ`.
///
/// # Errors
/// - Propagates any error from `f.check`.
/// - Propagates builder errors from `build_optimizer_*`.
/// - Propagates errors from evaluating the gradient at `theta0`.
/// - Propagates runtime errors from `run_lbfgs` (e.g., line search failures,
///   non-finite costs, errors raised by `value`/`grad`).
///
/// # Example
/// ```no_run
/// use ndarray::array;
/// use poisson_regression::optimization::errors::{OptError, OptResult};
/// use poisson_regression::optimization::loglik_optimizer::{
///     maximize, LogLikelihood, MLEOptions, Theta,
/// };
///
/// struct Bowl;
/// impl LogLikelihood for Bowl {
///     type Data = ();
///     fn value(&self, theta: &Theta, _: &()) -> OptResult<f64> {
///         Ok(-theta.dot(theta))
///     }
///     fn check(&self, _: &Theta, _: &()) -> OptResult<()> {
///         Ok(())
///     }
/// }
///
/// let out = maximize(&Bowl, array![0.1, -0.2, 0.3], &(), &MLEOptions::default())?;
/// println!("θ̂ = {:?}", out.theta_hat);
/// # Ok::<(), OptError>(())
/// ```
pub fn maximize<F: LogLikelihood>(
    f: &F, theta0: Theta, data: &F::Data, opts: &MLEOptions,
) -> OptResult<OptimOutcome> {
    f.check(&theta0, data)?;
    let unscaled = ArgMinAdapter::new(f, data);
    let scale = unscaled.gradient_scale(&theta0)?;
    let problem = unscaled.with_scale(scale);
    match opts.line_searcher {
        LineSearcher::MoreThuente => {
            let solver = build_optimizer_more_thuente(opts, scale)?;
            run_lbfgs(theta0, opts, problem, solver)
        }
        LineSearcher::HagerZhang => {
            let solver = build_optimizer_hager_zhang(opts, scale)?;
            run_lbfgs(theta0, opts, problem, solver)
        }
    }
}

/// Maximize a stateful [`Optimizable`] in place.
///
/// # Behavior
/// - The starting point is the object's current parameter vector.
/// - Trial points are written into the object before each evaluation.
/// - On success the object's parameters are set to `theta_hat` (even when the
///   run stopped on the iteration cap; check `converged`).
/// - On error the parameters hold the last trial point the solver wrote.
///
/// # Errors
/// - [`OptError::EmptyParameterVector`] for an object with no parameters.
/// - Any accessor error from the object.
/// - Everything [`maximize`] can return.
pub fn maximize_optimizable<O: Optimizable + ?Sized>(
    objective: &mut O, opts: &MLEOptions,
) -> OptResult<OptimOutcome> {
    let dim = objective.parameter_count();
    if dim == 0 {
        return Err(OptError::EmptyParameterVector);
    }
    let mut start = vec![0.0; dim];
    objective.parameters(&mut start)?;

    let outcome = {
        let wrapper = StatefulObjective::new(&mut *objective);
        maximize(&wrapper, Theta::from(start), &(), opts)?
    };
    match outcome.theta_hat.as_slice() {
        Some(slice) => objective.set_parameters(slice)?,
        None => objective.set_parameters(&outcome.theta_hat.to_vec())?,
    }
    Ok(outcome)
}
