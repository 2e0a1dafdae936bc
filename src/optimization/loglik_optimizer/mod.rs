//! loglik_optimizer — argmin-powered maximization of log-likelihoods.
//!
//! Purpose
//! -------
//! Provide the optimization layer the regression models fit through. An
//! objective is described either statelessly ([`LogLikelihood`]: `ℓ(θ)` at an
//! explicit `θ`) or statefully ([`Optimizable`]: the object owns `θ`), and is
//! maximized with L-BFGS under a configurable line search, tolerances, and
//! finite-difference fallbacks.
//!
//! Key behaviors
//! -------------
//! - Convert log-likelihoods `ℓ(θ)` into Argmin cost functions
//!   `c(θ) = -ℓ(θ)` via [`adapter::ArgMinAdapter`].
//! - [`maximize`] validates the start with [`LogLikelihood::check`], selects a
//!   solver via [`builders`], runs it via [`run::run_lbfgs`], and normalizes
//!   results into an [`OptimOutcome`].
//! - [`maximize_optimizable`] drives a stateful object through the same path
//!   using [`stateful::StatefulObjective`], writing the optimum back.
//! - [`finite_diff`] supplies gradients when none are implemented and a
//!   gradient checker ([`check_gradient`]) for analytic ones.
//! - Configuration ([`Tolerances`], [`MLEOptions`]) and state checks
//!   ([`validation`]) are centralized so downstream code can assume finite,
//!   well-shaped inputs.
//!
//! Invariants & assumptions
//! ------------------------
//! - The optimizer **always maximizes** by minimizing `c(θ) = -ℓ(θ)`; user
//!   code implements `ℓ(θ)` and `∇ℓ(θ)`, **never** the cost.
//! - Objective errors are recoverable [`OptError`] values, not panics.
//! - Configuration types are validated on construction.
//!
//! Conventions
//! -----------
//! - Parameters live in an unconstrained space as [`Theta`] (`Array1<f64>`).
//! - User-facing diagnostics, including [`OptimOutcome::value`], are in terms
//!   of `ℓ`.
//! - Errors bubble up as [`OptResult<T>`] / [`OptError`]; nothing here panics
//!   or uses `unsafe`.
//!
//! Testing notes
//! -------------
//! - Unit tests in submodules cover sign conventions ([`adapter`]), solver
//!   wiring ([`builders`]), differencing and gradient checks
//!   ([`finite_diff`]), the stateful bridge ([`stateful`]), option and
//!   outcome invariants ([`traits`]), and end-to-end runs on toy objectives
//!   ([`api`]).
//!
//! [`OptError`]: crate::optimization::errors::OptError
//! [`OptResult<T>`]: crate::optimization::errors::OptResult

pub mod adapter;
pub mod api;
pub mod builders;
pub mod finite_diff;
pub mod run;
pub mod stateful;
pub mod traits;
pub mod types;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::api::{maximize, maximize_optimizable};
pub use self::finite_diff::{GradientCheck, check_gradient};
pub use self::traits::{
    LineSearcher, LogLikelihood, MLEOptions, Optimizable, OptimOutcome, Tolerances,
};
pub use self::types::{Cost, DEFAULT_LBFGS_MEM, FnEvalMap, Grad, Theta};

pub mod prelude {
    pub use super::api::{maximize, maximize_optimizable};
    pub use super::finite_diff::check_gradient;
    pub use super::traits::{
        LineSearcher, LogLikelihood, MLEOptions, Optimizable, OptimOutcome, Tolerances,
    };
    pub use super::types::{Cost, Grad, Theta};
}
