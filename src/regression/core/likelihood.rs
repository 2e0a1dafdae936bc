//! Poisson log-likelihood, its ridge-penalized form, and the gradient.
//!
//! Purpose
//! -------
//! Evaluate, for a design `(X, y, w)` and coefficients `β`:
//!
//! - penalized objective
//!   `Σ_i w_i (y_i μ_i − exp μ_i) − (λ/2) β·β`, with `μ_i = β · x_i`,
//! - its gradient `Σ_i w_i x_i (y_i − exp μ_i) − λ β`,
//! - the full log-likelihood `Σ_i w_i (y_i μ_i − exp μ_i − ln Γ(1 + y_i))`.
//!
//! The objective drops `ln Γ(1 + y_i)` because it does not depend on `β`.
//!
//! Invariants & assumptions
//! ------------------------
//! - `β.len() == design.dim()`; callers (the model) guarantee this.
//! - `exp(μ)` always goes through the exponent guard, and the gradient uses
//!   the guard's slope, so the gradient is the exact derivative of the value
//!   everywhere. Below the ceiling both are identical to the plain formulas;
//!   above it a `warn` record reports how many rows crossed it.
//! - `ln Γ(1 + y)` is only meaningful for `y > -1`; outside that range the full
//!   log-likelihood is NaN.
use ndarray::Array1;
use statrs::function::gamma::ln_gamma;

use crate::{
    optimization::numerical_stability::{guarded_exp, guarded_exp_slope},
    regression::core::{design::DesignData, options::EtaGuard},
};

/// Linear predictor `μ = X β` and the guarded means `exp(μ)`.
///
/// Logs a warning when any row crossed the exponent ceiling.
pub fn linear_predictor_and_means(
    design: &DesignData, beta: &Array1<f64>, guard: &EtaGuard,
) -> (Array1<f64>, Array1<f64>) {
    let mu = linear_predictor(design, beta, guard);
    let means = mu.mapv(|eta| guarded_exp(eta, guard.max_eta));
    (mu, means)
}

/// Penalized objective at `beta` with ridge strength `lambda`.
pub fn penalized_loglik(
    design: &DesignData, beta: &Array1<f64>, lambda: f64, guard: &EtaGuard,
) -> f64 {
    let (mu, means) = linear_predictor_and_means(design, beta, guard);
    let fit: f64 = design
        .w
        .iter()
        .zip(design.y.iter())
        .zip(mu.iter().zip(means.iter()))
        .map(|((&w, &y), (&m, &e))| w * (y * m - e))
        .sum();
    fit - 0.5 * lambda * beta.dot(beta)
}

/// Gradient of [`penalized_loglik`] with respect to `beta`.
pub fn penalized_grad(
    design: &DesignData, beta: &Array1<f64>, lambda: f64, guard: &EtaGuard,
) -> Array1<f64> {
    let slopes =
        linear_predictor(design, beta, guard).mapv(|eta| guarded_exp_slope(eta, guard.max_eta));
    let residuals = &design.w * &(&design.y - &slopes);
    design.x.t().dot(&residuals) - lambda * beta
}

/// Full (unpenalized) Poisson log-likelihood including `−ln Γ(1 + y_i)`.
pub fn poisson_loglik(design: &DesignData, beta: &Array1<f64>, guard: &EtaGuard) -> f64 {
    let (mu, means) = linear_predictor_and_means(design, beta, guard);
    design
        .w
        .iter()
        .zip(design.y.iter())
        .zip(mu.iter().zip(means.iter()))
        .map(|((&w, &y), (&m, &e))| w * (y * m - e - ln_gamma(1.0 + y)))
        .sum()
}

// ---- Helper methods ----

fn linear_predictor(design: &DesignData, beta: &Array1<f64>, guard: &EtaGuard) -> Array1<f64> {
    let mu = design.x.dot(beta);
    let crossed = mu.iter().filter(|&&eta| eta > guard.max_eta).count();
    if crossed > 0 {
        log::warn!(
            "exponent guard engaged on {crossed} of {} rows (max_eta = {})",
            design.n_obs(),
            guard.max_eta
        );
    }
    mu
}
