//! Poisson options — optimizer configuration plus the exponent guard.
//!
//! Purpose
//! -------
//! Bundle everything a [`PoissonModel`](crate::regression::models::PoissonModel)
//! needs besides its data: the L-BFGS settings ([`MLEOptions`]) and the
//! ceiling applied to the linear predictor before exponentiation
//! ([`EtaGuard`]).
//!
//! Invariants & assumptions
//! ------------------------
//! - [`EtaGuard::new`] only accepts finite, strictly positive ceilings.
//! - [`PoissonOptions`] adds no cross-field checks; each component is
//!   validated by its own constructor.
//!
//! Testing notes
//! -------------
//! - Unit tests cover guard validation and the defaults.
use crate::{
    optimization::{loglik_optimizer::MLEOptions, numerical_stability::DEFAULT_MAX_ETA},
    regression::errors::{RegressionError, RegressionResult},
};

/// EtaGuard — ceiling on `η = β · x` inside `exp(η)`.
///
/// Values of `η` at or below `max_eta` are exponentiated unchanged; larger
/// values follow the tangent of `exp` at `max_eta` inside the objective and
/// its gradient. The default, [`DEFAULT_MAX_ETA`], sits just under the `f64`
/// overflow point. Predictions are not guarded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EtaGuard {
    /// Ceiling for the linear predictor (finite, > 0).
    pub max_eta: f64,
}

impl EtaGuard {
    /// Construct a validated guard.
    ///
    /// # Errors
    /// [`RegressionError::InvalidEtaGuard`] when `max_eta` is non-finite or
    /// not strictly positive.
    pub fn new(max_eta: f64) -> RegressionResult<Self> {
        if !max_eta.is_finite() {
            return Err(RegressionError::InvalidEtaGuard {
                value: max_eta,
                reason: "Exponent guard must be finite.",
            });
        }
        if max_eta <= 0.0 {
            return Err(RegressionError::InvalidEtaGuard {
                value: max_eta,
                reason: "Exponent guard must be strictly positive.",
            });
        }
        Ok(Self { max_eta })
    }
}

impl Default for EtaGuard {
    fn default() -> Self {
        Self { max_eta: DEFAULT_MAX_ETA }
    }
}

/// PoissonOptions — estimation-time configuration for Poisson models.
///
/// Fields
/// ------
/// - `mle_opts`: [`MLEOptions`]
///   Tolerances, iteration cap, line search, and L-BFGS memory.
/// - `eta_guard`: [`EtaGuard`]
///   Exponent ceiling used by the objective and its gradient.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PoissonOptions {
    pub mle_opts: MLEOptions,
    pub eta_guard: EtaGuard,
}

impl PoissonOptions {
    /// Bundle already-validated components.
    pub fn new(mle_opts: MLEOptions, eta_guard: EtaGuard) -> Self {
        Self { mle_opts, eta_guard }
    }
}
