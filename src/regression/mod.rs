//! regression — penalized-likelihood Poisson regression.
//!
//! Purpose
//! -------
//! Fit log-linear count models `E[y | x] = exp(β · x)` by maximizing the
//! ridge-penalized Poisson log-likelihood. The workflow has two stages:
//!
//! 1. Collect weighted observations in a [`PoissonRegression`] accumulator.
//! 2. Freeze them into a [`PoissonModel`] with `make_model`, call
//!    `fit(λ)`, then read `betas()` or call `predict`.
//!
//! Key behaviors
//! -------------
//! - The accumulator enforces a fixed covariate dimension and finite values;
//!   a rejected row is never stored.
//! - Models are deep-copied snapshots; appending more rows never changes an
//!   existing model.
//! - Fitting goes through the crate's L-BFGS driver
//!   (`optimization::loglik_optimizer::maximize_optimizable`).
//!
//! Conventions
//! -----------
//! - Bias terms, interactions, and offsets are encoded by the caller in the
//!   covariate vector.
//! - Input errors are [`RegressionError`]; solver errors surface as
//!   `OptError` from `fit`.
//!
//! Testing notes
//! -------------
//! - Unit tests in `core` and `models`; end-to-end pipelines (simulate, fit,
//!   predict) live in `tests/`.

pub mod core;
pub mod errors;
pub mod models;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::core::{DesignData, EtaGuard, Observation, PoissonOptions, PoissonRegression};
pub use self::errors::{RegressionError, RegressionResult};
pub use self::models::PoissonModel;

pub mod prelude {
    pub use super::core::prelude::*;
    pub use super::errors::{RegressionError, RegressionResult};
    pub use super::models::prelude::*;
}
