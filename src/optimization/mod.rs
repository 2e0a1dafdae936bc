//! optimization — L-BFGS driver, numerical guards, and the optimizer error
//! surface.
//!
//! Purpose
//! -------
//! Provide everything a model needs to be fitted by maximum (penalized)
//! likelihood without touching backend solver details: an Argmin-backed
//! maximizer, overflow guards for the log link, and a single error/result
//! type.
//!
//! Key behaviors
//! -------------
//! - `loglik_optimizer`: maximize a [`LogLikelihood`](loglik_optimizer::LogLikelihood)
//!   or a stateful [`Optimizable`](loglik_optimizer::Optimizable) with L-BFGS,
//!   including solver configuration, stopping criteria, finite-difference
//!   fallbacks, and gradient checking.
//! - `numerical_stability`: exponent ceilings that keep `exp(β · x)` finite.
//! - `errors`: configuration problems, numerical failures, backend solver
//!   errors, and model-level input errors normalized into
//!   [`OptError`](errors::OptError) / [`OptResult<T>`](errors::OptResult).
//!
//! Conventions
//! -----------
//! - Solvers maximize `ℓ(θ)` by minimizing `c(θ) = -ℓ(θ)`; every user-facing
//!   value is expressed in terms of `ℓ`.
//! - Parameters and gradients are `ndarray` vectors (`Theta`, `Grad`).
//! - Progress is reported through the `log` facade at `debug` level; the
//!   slog terminal observer is available behind the `obs_slog` feature.
//!
//! Testing notes
//! -------------
//! - Unit tests live next to the code: solver wiring and toy maximizations
//!   in `loglik_optimizer`, bit-exactness below the ceiling in
//!   `numerical_stability`, and error conversions in `errors`.

pub mod errors;
pub mod loglik_optimizer;
pub mod numerical_stability;

pub mod prelude {
    pub use super::errors::{OptError, OptResult};
    pub use super::loglik_optimizer::prelude::*;
    pub use super::numerical_stability::prelude::*;
}
