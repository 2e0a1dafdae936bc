//! Public API surface for log-likelihood maximization.
//!
//! - [`LogLikelihood`]: stateless trait, `ℓ(θ)` evaluated at an explicit `θ`.
//! - [`Optimizable`]: stateful capability trait; the object owns its parameter
//!   buffer and the solver reads/writes it through accessors.
//! - [`MLEOptions`] and [`Tolerances`]: configuration for the optimizer.
//! - [`LineSearcher`]: choice of line search used by L-BFGS.
//! - [`OptimOutcome`]: normalized result returned by the high-level `maximize` API.
//!
//! Convention: we *maximize* a user log-likelihood `ℓ(θ)` by minimizing the cost
//! `c(θ) = -ℓ(θ)`. If an analytic gradient is provided, it should be the gradient
//! of the log-likelihood (`∇ℓ(θ)`); the adapter flips the sign as needed.
use crate::optimization::{
    errors::{OptError, OptResult},
    loglik_optimizer::{
        Cost, FnEvalMap, Grad, Theta,
        validation::{validate_theta_hat, validate_value, verify_tol_cost, verify_tol_grad},
    },
};
use argmin::core::{TerminationReason, TerminationStatus};
use argmin_math::ArgminL2Norm;
use std::str::FromStr;

/// User-implemented log-likelihood interface.
///
/// You maximize `ℓ(θ)`; internally we minimize the cost `c(θ) = -ℓ(θ)`.
/// If you provide an analytic gradient, return the gradient of the
/// log-likelihood `∇ℓ(θ)` (the adapter flips the sign to match the cost).
///
/// - `type Data`: per-model data carried into `value`/`grad`/`check`.
///
/// Required:
/// - `value(&Theta, &Data) -> OptResult<Cost>`: evaluate `ℓ(θ)`.
///   - Errors: return a descriptive `OptError` for invalid inputs or model failures.
/// - `check(&Theta, &Data) -> OptResult<()>`: validation hook to reject
///   obviously invalid `θ`/`data` pairs. Called once before optimization.
///
/// Optional:
/// - `grad(&Theta, &Data) -> OptResult<Grad>`: analytic gradient `∇ℓ(θ)`.
///   If not implemented, robust finite differences are used automatically.
pub trait LogLikelihood {
    type Data: 'static;

    // Required methods
    fn value(&self, theta: &Theta, data: &Self::Data) -> OptResult<Cost>;
    fn check(&self, theta: &Theta, data: &Self::Data) -> OptResult<()>;

    // Optional methods
    fn grad(&self, _theta: &Theta, _data: &Self::Data) -> OptResult<Grad> {
        Err(OptError::GradientNotImplemented)
    }
}

/// Stateful objective interface driven by a gradient-based maximizer.
///
/// The implementor owns its parameter vector. A solver moves through parameter
/// space by writing trial points with [`set_parameters`](Self::set_parameters)
/// (or [`set_parameter`](Self::set_parameter)) and then querying
/// [`value`](Self::value) / [`gradient`](Self::gradient), which must always be
/// evaluated at the parameters **currently set**.
///
/// Sign convention: `value` is an objective to **maximize** (a log-likelihood,
/// possibly penalized) and `gradient` is its gradient. Solvers that minimize
/// must negate both; [`maximize_optimizable`](super::api::maximize_optimizable)
/// does this via the Argmin adapter.
///
/// The trait is object-safe so drivers can take `&mut dyn Optimizable`.
///
/// Required:
/// - `parameter_count`, single and bulk getters/setters, `value`.
///
/// Optional:
/// - `gradient(&mut [f64])`: analytic gradient. The default returns
///   [`OptError::GradientNotImplemented`], which makes the driver fall back to
///   finite differences.
pub trait Optimizable {
    /// Number of free parameters `d`.
    fn parameter_count(&self) -> usize;

    /// Read parameter `index`.
    ///
    /// # Errors
    /// [`OptError::ParameterIndexOutOfRange`] when `index >= d`.
    fn parameter(&self, index: usize) -> OptResult<f64>;

    /// Overwrite parameter `index`.
    ///
    /// # Errors
    /// [`OptError::ParameterIndexOutOfRange`] when `index >= d`.
    fn set_parameter(&mut self, index: usize, value: f64) -> OptResult<()>;

    /// Copy all parameters into `buffer`.
    ///
    /// # Errors
    /// [`OptError::ParameterBufferMismatch`] when `buffer.len() != d`.
    fn parameters(&self, buffer: &mut [f64]) -> OptResult<()>;

    /// Overwrite all parameters from `buffer`.
    ///
    /// # Errors
    /// [`OptError::ParameterBufferMismatch`] when `buffer.len() != d`.
    fn set_parameters(&mut self, buffer: &[f64]) -> OptResult<()>;

    /// Objective at the current parameters.
    fn value(&self) -> OptResult<f64>;

    /// Fill `buffer` with the objective gradient at the current parameters.
    fn gradient(&self, _buffer: &mut [f64]) -> OptResult<()> {
        Err(OptError::GradientNotImplemented)
    }
}

/// Choice of line search used inside the L-BFGS solver.
///
/// Variants:
/// - `MoreThuente`: More–Thuente line search.
/// - `HagerZhang`: Hager–Zhang line search.
///
/// Parsing:
/// This enum implements `FromStr` and accepts case-insensitive names
/// (`"MoreThuente"`, `"HagerZhang"`). Unknown names return
/// `OptError::InvalidLineSearch`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineSearcher {
    MoreThuente,
    HagerZhang,
}

impl FromStr for LineSearcher {
    type Err = OptError;

    /// Parse a line-search choice from a string (case-insensitive).
    ///
    /// Accepts:
    /// - `"MoreThuente"`
    /// - `"HagerZhang"`
    /// - Any case variant (e.g., `"morethuente"`, `"HAGERZHANG"`).
    ///
    /// Any other value returns `OptError::InvalidLineSearch` with a helpful message.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "morethuente" => Ok(LineSearcher::MoreThuente),
            "hagerzhang" => Ok(LineSearcher::HagerZhang),
            _ => Err(OptError::InvalidLineSearch {
                name: s.to_string(),
                reason: "Valid options are case insensitive 'MoreThuente' or 'HagerZhang'.",
            }),
        }
    }
}

/// Optimizer-level configuration.
///
/// Fields:
/// - `tols: Tolerances` — numerical tolerances and iteration limits.
/// - `line_searcher: LineSearcher` — line-search algorithm used by L-BFGS.
/// - `verbose: bool` — if `true`, attaches an observer (behind the `obs_slog`
///   feature) and prints progress.
/// - `lbfgs_mem: Option<usize>` — L-BFGS history size; `None` uses
///   [`DEFAULT_LBFGS_MEM`](super::types::DEFAULT_LBFGS_MEM).
///
/// Constructor:
/// - `new(tols, line_searcher, verbose, lbfgs_mem) -> OptResult<Self>` — builds
///   options; numeric tolerances are validated in `Tolerances::new`, the
///   memory size here.
///
/// Default:
/// - `tols`: `tol_grad = 1e-6`, `tol_cost = None`, `max_iter = 300`
/// - `line_searcher`: `MoreThuente`
/// - `verbose`: `false`
/// - `lbfgs_mem`: `None` (uses default of 7)
#[derive(Debug, Clone, PartialEq)]
pub struct MLEOptions {
    pub tols: Tolerances,
    pub line_searcher: LineSearcher,
    pub verbose: bool,
    pub lbfgs_mem: Option<usize>,
}

impl MLEOptions {
    /// Create a new set of optimizer options.
    ///
    /// This constructor does not mutate values; validation of numeric fields is
    /// performed inside [`Tolerances::new`].
    pub fn new(
        tols: Tolerances, line_searcher: LineSearcher, verbose: bool, lbfgs_mem: Option<usize>,
    ) -> OptResult<Self> {
        if let Some(m) = lbfgs_mem {
            if m == 0 {
                return Err(OptError::InvalidLBFGSMem {
                    mem: m,
                    reason: "L-BFGS memory must be greater than zero.",
                });
            }
        }
        Ok(Self { tols, line_searcher, verbose, lbfgs_mem })
    }
}

impl Default for MLEOptions {
    fn default() -> Self {
        Self {
            tols: Tolerances { tol_grad: Some(1e-6), tol_cost: None, max_iter: Some(300) },
            line_searcher: LineSearcher::MoreThuente,
            verbose: false,
            lbfgs_mem: None,
        }
    }
}

/// Numerical tolerances and iteration limits used by the optimizer.
///
/// - `tol_grad`: terminate when the gradient norm falls below this threshold.
/// - `tol_cost`: terminate when the change in cost falls below this threshold.
/// - `max_iter`: hard cap on the number of iterations.
///
/// Any field can be `None` but **at least one** of the three must be provided
/// (see [`Tolerances::new`]).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerances {
    pub tol_grad: Option<f64>,
    pub tol_cost: Option<f64>,
    pub max_iter: Option<usize>,
}

impl Tolerances {
    /// Construct validated tolerances.
    ///
    /// # Rules
    /// - At least one of `tol_grad`, `tol_cost`, or `max_iter` must be `Some`.
    /// - If provided, tolerances must be **finite and strictly positive**.
    /// - If provided, `max_iter` must be `> 0`.
    ///
    /// # Errors
    /// - [`OptError::NoTolerancesProvided`] if all three are `None`.
    /// - [`OptError::InvalidTolGrad`] / [`OptError::InvalidTolCost`] for non-finite or non-positive tolerances.
    /// - `OptError::InvalidMaxIter` if `max_iter == 0`.
    pub fn new(
        tol_grad: Option<f64>, tol_cost: Option<f64>, max_iter: Option<usize>,
    ) -> OptResult<Self> {
        if tol_grad.is_none() && tol_cost.is_none() && max_iter.is_none() {
            return Err(OptError::NoTolerancesProvided);
        }
        verify_tol_cost(tol_cost)?;
        verify_tol_grad(tol_grad)?;
        if let Some(max_iter) = max_iter {
            if max_iter == 0 {
                return Err(OptError::InvalidMaxIter {
                    max_iter,
                    reason: "Maximum iterations must be greater than zero.",
                });
            }
        }
        Ok(Self { tol_grad, tol_cost, max_iter })
    }
}

/// Canonical result returned by `maximize`.
///
/// - `theta_hat`: best parameter vector found.
/// - `value`: best **log-likelihood** value `ℓ(θ)` (not the cost).
/// - `converged`: `true` if the solver stopped on its own convergence test
///   (or reached a target cost); `false` when it ran out of iterations or
///   never terminated.
/// - `status`: human-readable termination status string.
/// - `iterations`: number of optimizer iterations performed.
/// - `fn_evals`: function-evaluation counters reported by `argmin`.
/// - Keys follow argmin’s counters, e.g., cost_count, gradient_count, etc.
/// - `grad_norm`: norm of the last available gradient, if present.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimOutcome {
    pub theta_hat: Theta,
    pub value: f64,
    pub converged: bool,
    pub status: String,
    pub iterations: usize,
    pub fn_evals: FnEvalMap,
    pub grad_norm: Option<f64>,
}

impl OptimOutcome {
    /// Build a validated [`OptimOutcome`] from raw solver state.
    ///
    /// Performs:
    /// - `theta_hat` check via `validate_theta_hat` (present and all finite).
    /// - `value` check via `validate_value` (finite).
    /// - Maps `TerminationStatus` into `(converged, status)`; only
    ///   `SolverConverged` and `TargetCostReached` count as converged.
    /// - Computes `grad_norm` if a gradient was provided.
    ///
    /// # Errors
    /// - Propagates any validation errors for `theta_hat` or `value`.
    pub fn new(
        theta_hat_opt: Option<Theta>, value: f64, converged: TerminationStatus, iterations: u64,
        fn_evals: FnEvalMap, grad: Option<Grad>,
    ) -> OptResult<Self> {
        let theta_hat = validate_theta_hat(theta_hat_opt)?;
        validate_value(value)?;
        let status: String;
        let converged = match converged {
            TerminationStatus::NotTerminated => {
                status = "Not terminated".to_string();
                false
            }
            TerminationStatus::Terminated(reason) => {
                let done = matches!(
                    reason,
                    TerminationReason::SolverConverged | TerminationReason::TargetCostReached
                );
                status = format!("{reason:?}");
                done
            }
        };
        let iterations = iterations as usize;
        let grad_norm = grad.map(|g| g.l2_norm());
        Ok(Self { theta_hat, value, converged, status, iterations, fn_evals, grad_norm })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Parsing of `LineSearcher` names.
    // - Validation rules of `Tolerances::new` and `MLEOptions::new`.
    // - Mapping of Argmin termination states into `OptimOutcome`.
    // - The default `Optimizable::gradient` hook.
    //
    // They intentionally DO NOT cover:
    // - Running a solver (see `api` and the integration tests).
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Line-search names are case-insensitive; unknown names are rejected.
    fn line_searcher_parses_case_insensitively() {
        assert_eq!("morethuente".parse::<LineSearcher>(), Ok(LineSearcher::MoreThuente));
        assert_eq!("HagerZhang".parse::<LineSearcher>(), Ok(LineSearcher::HagerZhang));
        assert!(matches!(
            "backtracking".parse::<LineSearcher>(),
            Err(OptError::InvalidLineSearch { .. })
        ));
    }

    #[test]
    // Purpose
    // -------
    // At least one stopping rule is required and each must be sane.
    fn tolerances_new_enforces_rules() {
        assert_eq!(Tolerances::new(None, None, None), Err(OptError::NoTolerancesProvided));
        assert!(matches!(
            Tolerances::new(Some(-1.0), None, None),
            Err(OptError::InvalidTolGrad { .. })
        ));
        assert!(matches!(
            Tolerances::new(None, None, Some(0)),
            Err(OptError::InvalidMaxIter { .. })
        ));
        assert!(Tolerances::new(None, Some(1e-9), None).is_ok());
    }

    #[test]
    // Purpose
    // -------
    // An L-BFGS memory of zero is rejected; `None` and positive values pass.
    fn mle_options_rejects_zero_memory() {
        let tols = Tolerances::new(Some(1e-6), None, Some(10)).expect("valid tolerances");

        assert!(matches!(
            MLEOptions::new(tols, LineSearcher::MoreThuente, false, Some(0)),
            Err(OptError::InvalidLBFGSMem { .. })
        ));
        assert!(MLEOptions::new(tols, LineSearcher::MoreThuente, false, None).is_ok());
        assert!(MLEOptions::new(tols, LineSearcher::HagerZhang, true, Some(3)).is_ok());
    }

    #[test]
    // Purpose
    // -------
    // The default options match the documented configuration.
    fn mle_options_default_values() {
        let opts = MLEOptions::default();

        assert_eq!(opts.tols.tol_grad, Some(1e-6));
        assert_eq!(opts.tols.tol_cost, None);
        assert_eq!(opts.tols.max_iter, Some(300));
        assert_eq!(opts.line_searcher, LineSearcher::MoreThuente);
        assert!(!opts.verbose);
        assert_eq!(opts.lbfgs_mem, None);
    }

    #[test]
    // Purpose
    // -------
    // Solver convergence counts as converged, hitting the iteration cap does not.
    //
    // Given
    // -----
    // - Identical raw states differing only in the termination reason.
    //
    // Expect
    // ------
    // - `SolverConverged` -> `converged == true`.
    // - `MaxItersReached` -> `converged == false`, status names the reason.
    // - `grad_norm` is the L2 norm of the supplied gradient.
    fn optim_outcome_maps_termination_reasons() {
        let converged = OptimOutcome::new(
            Some(array![1.0, 2.0]),
            -3.5,
            TerminationStatus::Terminated(TerminationReason::SolverConverged),
            12,
            FnEvalMap::new(),
            Some(array![3.0, 4.0]),
        )
        .expect("finite outcome should validate");
        let capped = OptimOutcome::new(
            Some(array![1.0, 2.0]),
            -3.5,
            TerminationStatus::Terminated(TerminationReason::MaxItersReached),
            300,
            FnEvalMap::new(),
            None,
        )
        .expect("finite outcome should validate");

        assert!(converged.converged);
        assert_eq!(converged.iterations, 12);
        assert_eq!(converged.grad_norm, Some(5.0));
        assert!(!capped.converged);
        assert!(capped.status.contains("MaxItersReached"));
        assert_eq!(capped.grad_norm, None);
    }

    #[test]
    // Purpose
    // -------
    // Non-finite objective values never produce an outcome.
    fn optim_outcome_rejects_non_finite_value() {
        let result = OptimOutcome::new(
            Some(array![0.0]),
            f64::NAN,
            TerminationStatus::NotTerminated,
            0,
            FnEvalMap::new(),
            None,
        );

        assert!(matches!(result, Err(OptError::NonFiniteCost { .. })));
    }

    struct Constant {
        theta: Vec<f64>,
    }

    impl Optimizable for Constant {
        fn parameter_count(&self) -> usize {
            self.theta.len()
        }
        fn parameter(&self, index: usize) -> OptResult<f64> {
            self.theta.get(index).copied().ok_or(OptError::ParameterIndexOutOfRange {
                index,
                len: self.theta.len(),
            })
        }
        fn set_parameter(&mut self, index: usize, value: f64) -> OptResult<()> {
            let len = self.theta.len();
            let slot = self
                .theta
                .get_mut(index)
                .ok_or(OptError::ParameterIndexOutOfRange { index, len })?;
            *slot = value;
            Ok(())
        }
        fn parameters(&self, buffer: &mut [f64]) -> OptResult<()> {
            buffer.copy_from_slice(&self.theta);
            Ok(())
        }
        fn set_parameters(&mut self, buffer: &[f64]) -> OptResult<()> {
            self.theta.copy_from_slice(buffer);
            Ok(())
        }
        fn value(&self) -> OptResult<f64> {
            Ok(1.0)
        }
    }

    #[test]
    // Purpose
    // -------
    // Implementors that skip `gradient` advertise it via
    // `GradientNotImplemented`, and the trait is usable as a trait object.
    fn optimizable_default_gradient_is_not_implemented() {
        let mut c = Constant { theta: vec![0.0, 0.0] };
        let obj: &mut dyn Optimizable = &mut c;
        let mut buf = [0.0; 2];

        obj.set_parameter(1, 4.0).expect("index 1 is in range");

        assert_eq!(obj.gradient(&mut buf), Err(OptError::GradientNotImplemented));
        assert_eq!(obj.parameter(1), Ok(4.0));
        assert!(obj.set_parameter(2, 1.0).is_err());
    }
}
