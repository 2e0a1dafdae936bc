//! Validation helpers for log-likelihood optimization.
//!
//! This module centralizes common consistency checks used across the
//! optimizer interface:
//!
//! - **Tolerance checks**: [`verify_tol_grad`], [`verify_tol_cost`] ensure
//!   numeric tolerances are finite and strictly positive when provided.
//! - **Gradient validation**: [`validate_grad`] enforces correct dimension
//!   and finite entries.
//! - **Parameter estimates**: [`validate_theta_hat`] ensures a candidate
//!   `theta_hat` exists and contains only finite values.
//! - **Objective values**: [`validate_value`] checks log-likelihood outputs
//!   for finiteness.
//! - **Optimizer interface**: [`validate_theta_input`],
//!   [`validate_param_buffer`], and [`validate_param_index`] guard the
//!   parameter accessors of an [`Optimizable`](super::traits::Optimizable).
//!
//! These helpers standardize error reporting by returning domain-specific
//! [`OptError`] variants, making higher-level code more uniform and easier
//! to debug.
use crate::optimization::{
    errors::{OptError, OptResult},
    loglik_optimizer::{Grad, Theta},
};

/// Validate the optional gradient‐norm tolerance.
///
/// - Accepts `None` (no stopping rule on gradient).
/// - If `Some`, the value must be **finite** and **strictly positive**.
///
/// # Errors
/// Returns [`OptError::InvalidTolGrad`] if the value is non-finite or ≤ 0.0.
pub fn verify_tol_grad(tol: Option<f64>) -> OptResult<()> {
    if let Some(tol) = tol {
        if !tol.is_finite() {
            return Err(OptError::InvalidTolGrad { tol, reason: "Tolerance must be finite." });
        }
        if tol <= 0.0 {
            return Err(OptError::InvalidTolGrad { tol, reason: "Tolerance must be positive." });
        }
    }
    Ok(())
}

/// Validate the optional cost‐change tolerance (for convergence).
///
/// - Accepts `None` (no stopping rule on cost change).
/// - If `Some`, the value must be **finite** and **strictly positive**.
///
/// # Errors
/// Returns [`OptError::InvalidTolCost`] if the value is non-finite or ≤ 0.0.
pub fn verify_tol_cost(tol: Option<f64>) -> OptResult<()> {
    if let Some(tol) = tol {
        if !tol.is_finite() {
            return Err(OptError::InvalidTolCost { tol, reason: "Tolerance must be finite." });
        }
        if tol <= 0.0 {
            return Err(OptError::InvalidTolCost { tol, reason: "Tolerance must be positive." });
        }
    }
    Ok(())
}

/// Validate a gradient vector against dimension and finiteness.
///
/// Checks:
/// - `grad.len() == dim`
/// - every element is finite (`NaN` or `±∞` are rejected)
///
/// # Errors
/// - [`OptError::GradientDimMismatch`] if length does not match `dim`.
/// - [`OptError::InvalidGradient`] with the index/value/reason of the first
///   offending element.
pub fn validate_grad(grad: &Grad, dim: usize) -> OptResult<()> {
    if grad.len() != dim {
        return Err(OptError::GradientDimMismatch { expected: dim, found: grad.len() });
    }
    for (index, &value) in grad.iter().enumerate() {
        if !value.is_finite() {
            return Err(OptError::InvalidGradient {
                index,
                value,
                reason: "Gradient elements must be finite.",
            });
        }
    }
    Ok(())
}

/// Validate and unwrap an estimated parameter vector (`theta_hat`).
///
/// Accepts only a present vector with all **finite** entries.
///
/// # Returns
/// The owned `Theta` if valid.
///
/// # Errors
/// - [`OptError::MissingThetaHat`] if no vector was provided.
/// - [`OptError::InvalidThetaHat`] if any element is non-finite.
pub fn validate_theta_hat(theta_hat: Option<Theta>) -> OptResult<Theta> {
    match theta_hat {
        Some(t) => {
            for (index, &value) in t.iter().enumerate() {
                if !value.is_finite() {
                    return Err(OptError::InvalidThetaHat {
                        index,
                        value,
                        reason: "Parameter estimates must be finite.",
                    });
                }
            }
            Ok(t)
        }
        None => Err(OptError::MissingThetaHat),
    }
}

/// Validate that a scalar log-likelihood value is finite.
///
/// Negative values are fine as long as they are finite.
///
/// # Errors
/// Returns [`OptError::NonFiniteCost`] if the value is `NaN` or infinite.
pub fn validate_value(value: f64) -> OptResult<()> {
    if !value.is_finite() {
        return Err(OptError::NonFiniteCost { value });
    }
    Ok(())
}

/// Validate a trial parameter vector before it reaches the objective.
///
/// Checks:
/// - `theta.len() == dim` and `dim > 0`
/// - every element is finite
///
/// # Errors
/// - [`OptError::EmptyParameterVector`] if `dim == 0`.
/// - [`OptError::ParameterBufferMismatch`] if the length does not match `dim`.
/// - [`OptError::InvalidThetaInput`] for the first non-finite entry.
pub fn validate_theta_input(theta: &[f64], dim: usize) -> OptResult<()> {
    if dim == 0 {
        return Err(OptError::EmptyParameterVector);
    }
    validate_param_buffer(theta.len(), dim)?;
    for (index, &value) in theta.iter().enumerate() {
        if !value.is_finite() {
            return Err(OptError::InvalidThetaInput { index, value });
        }
    }
    Ok(())
}

/// Validate the length of a bulk parameter/gradient buffer.
///
/// # Errors
/// Returns [`OptError::ParameterBufferMismatch`] when `found != expected`.
pub fn validate_param_buffer(found: usize, expected: usize) -> OptResult<()> {
    if found != expected {
        return Err(OptError::ParameterBufferMismatch { expected, found });
    }
    Ok(())
}

/// Validate a single-parameter index.
///
/// # Errors
/// Returns [`OptError::ParameterIndexOutOfRange`] when `index >= len`.
pub fn validate_param_index(index: usize, len: usize) -> OptResult<()> {
    if index >= len {
        return Err(OptError::ParameterIndexOutOfRange { index, len });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Tolerance validation (sign and finiteness).
    // - Gradient and theta-hat validation.
    // - Optimizer-interface buffer/index checks.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Tolerances must be finite and strictly positive; `None` is accepted.
    fn verify_tolerances_reject_non_positive_and_non_finite() {
        assert!(verify_tol_grad(None).is_ok());
        assert!(verify_tol_grad(Some(1e-8)).is_ok());
        assert!(matches!(verify_tol_grad(Some(0.0)), Err(OptError::InvalidTolGrad { .. })));
        assert!(matches!(verify_tol_cost(Some(f64::NAN)), Err(OptError::InvalidTolCost { .. })));
        assert!(matches!(verify_tol_cost(Some(-1.0)), Err(OptError::InvalidTolCost { .. })));
    }

    #[test]
    // Purpose
    // -------
    // `validate_grad` reports dimension mismatches before finiteness problems
    // and points at the first offending index.
    fn validate_grad_reports_dimension_then_first_bad_entry() {
        let g = array![1.0, f64::INFINITY, f64::NAN];

        assert_eq!(
            validate_grad(&g, 2),
            Err(OptError::GradientDimMismatch { expected: 2, found: 3 })
        );
        match validate_grad(&g, 3) {
            Err(OptError::InvalidGradient { index, .. }) => assert_eq!(index, 1),
            other => panic!("Expected InvalidGradient, got {other:?}"),
        }
    }

    #[test]
    // Purpose
    // -------
    // A missing or non-finite theta-hat is rejected; a finite one passes through.
    fn validate_theta_hat_unwraps_finite_vector() {
        assert_eq!(validate_theta_hat(None), Err(OptError::MissingThetaHat));
        assert!(matches!(
            validate_theta_hat(Some(array![0.0, f64::NAN])),
            Err(OptError::InvalidThetaHat { index: 1, .. })
        ));
        assert_eq!(validate_theta_hat(Some(array![0.5, -0.5])), Ok(array![0.5, -0.5]));
    }

    #[test]
    // Purpose
    // -------
    // Trial inputs are checked for emptiness, length, and finiteness.
    fn validate_theta_input_checks_all_invariants() {
        assert_eq!(validate_theta_input(&[], 0), Err(OptError::EmptyParameterVector));
        assert_eq!(
            validate_theta_input(&[1.0], 2),
            Err(OptError::ParameterBufferMismatch { expected: 2, found: 1 })
        );
        assert!(matches!(
            validate_theta_input(&[1.0, f64::NEG_INFINITY], 2),
            Err(OptError::InvalidThetaInput { index: 1, .. })
        ));
        assert!(validate_theta_input(&[1.0, 2.0], 2).is_ok());
    }

    #[test]
    // Purpose
    // -------
    // Index checks accept `0..len` and reject everything else.
    fn validate_param_index_bounds() {
        assert!(validate_param_index(0, 1).is_ok());
        assert_eq!(
            validate_param_index(1, 1),
            Err(OptError::ParameterIndexOutOfRange { index: 1, len: 1 })
        );
    }
}
