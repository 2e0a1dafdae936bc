//! Numerical stability utilities for the log link.
//!
//! The Poisson mean under the log link is `exp(η)` with `η = β · x`. For
//! `f64`, `exp` overflows to `+∞` once `η` exceeds `ln(f64::MAX) ≈ 709.78`,
//! after which the objective and its gradient turn into `∞ - ∞ = NaN` and the
//! line search stalls. Above a ceiling `M` the helpers here replace `exp` by
//! its tangent line at `M`, so the objective stays finite and continuously
//! differentiable while every value below the ceiling is bit-for-bit
//! identical to the naïve formula.
//!
//! # Provided items
//! - [`DEFAULT_MAX_ETA`]: default exponent ceiling (700.0).
//! - [`EXP_OVERFLOW_ETA`]: the point where `f64::exp` overflows.
//! - [`guarded_exp(eta, max_eta)`]: `exp(eta)` below the ceiling,
//!   `exp(M) · (1 + eta - M)` above it.
//! - [`guarded_exp_slope(eta, max_eta)`]: derivative of [`guarded_exp`],
//!   `exp(min(eta, M))`.

/// Default ceiling applied to the linear predictor before exponentiation.
///
/// `exp(700) ≈ 1.01e304`, which leaves a couple of orders of magnitude of
/// head-room for the multiplications by weights and covariates that follow.
pub const DEFAULT_MAX_ETA: f64 = 700.0;

/// Largest `η` for which `f64::exp(η)` is still finite.
pub const EXP_OVERFLOW_ETA: f64 = 709.782_712_893_384;

/// Overflow-guarded exponential.
///
/// - For `eta <= max_eta` this is exactly `eta.exp()`.
/// - For larger `eta` it continues along the tangent at the ceiling,
///   `exp(max_eta) · (1 + eta - max_eta)`, so value and slope are continuous.
/// - `NaN` input propagates as `NaN`.
///
/// # Parameters
/// - `eta`: linear predictor.
/// - `max_eta`: finite, positive ceiling (see `EtaGuard`).
#[inline]
pub fn guarded_exp(eta: f64, max_eta: f64) -> f64 {
    if eta > max_eta { max_eta.exp() * (1.0 + (eta - max_eta)) } else { eta.exp() }
}

/// Derivative of [`guarded_exp`] with respect to `eta`: `exp(min(eta, max_eta))`.
#[inline]
pub fn guarded_exp_slope(eta: f64, max_eta: f64) -> f64 {
    if eta > max_eta { max_eta.exp() } else { eta.exp() }
}
