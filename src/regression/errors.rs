//! Errors for Poisson regression (accumulator input checks, model options, and
//! prediction inputs).
//!
//! This module defines the model error type, [`RegressionError`], used by the
//! accumulator, the frozen model, and the Python-facing API. It implements
//! `Display`/`Error`, lifts into the optimizer error surface via
//! `From<RegressionError> for OptError`, and converts to `PyErr` when the
//! `python-bindings` feature is enabled.
//!
//! ## Conventions
//! - **Indices are 0-based** (match Rust/NumPy).
//! - A rejected observation is never appended; the accumulator is unchanged
//!   after any error.
//! - Optimizer/backend failures are *not* represented here; they surface as
//!   [`OptError`](crate::optimization::errors::OptError) from `fit`.
#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};

/// Result alias for regression operations that may produce [`RegressionError`].
pub type RegressionResult<T> = Result<T, RegressionError>;

/// Unified error type for the regression layer.
#[derive(Debug, Clone, PartialEq)]
pub enum RegressionError {
    // ---- Input/data validation ----
    /// Covariate vector length differs from the dimension fixed by the first
    /// observation (or from the model's parameter count in `predict`).
    DimensionMismatch { expected: usize, found: usize },

    /// Covariate vectors must have at least one component.
    EmptyCovariates,

    /// Weight, outcome, or a covariate is NaN/±inf. `index` is the covariate
    /// position when `field == "covariate"`.
    NonFiniteEntry { field: &'static str, index: Option<usize>, value: f64 },

    /// ndarray refused to assemble the design matrix.
    ShapeError { text: String },

    // ---- Options validation ----
    /// Regularization strength must be finite and >= 0.
    InvalidRegularization { value: f64, reason: &'static str },

    /// Exponent guard must be finite and > 0.
    InvalidEtaGuard { value: f64, reason: &'static str },
}

impl std::error::Error for RegressionError {}

impl std::fmt::Display for RegressionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Input/data validation ----
            RegressionError::DimensionMismatch { expected, found } => {
                write!(f, "Covariate dimension mismatch: expected {expected}, found {found}")
            }
            RegressionError::EmptyCovariates => {
                write!(f, "Covariate vector must have at least one component")
            }
            RegressionError::NonFiniteEntry { field, index: Some(i), value } => {
                write!(f, "Non-finite {field} at index {i}: {value}")
            }
            RegressionError::NonFiniteEntry { field, index: None, value } => {
                write!(f, "Non-finite {field}: {value}")
            }
            RegressionError::ShapeError { text } => {
                write!(f, "Could not assemble design matrix: {text}")
            }

            // ---- Options validation ----
            RegressionError::InvalidRegularization { value, reason } => {
                write!(f, "Invalid regularization strength {value}: {reason}")
            }
            RegressionError::InvalidEtaGuard { value, reason } => {
                write!(f, "Invalid exponent guard {value}: {reason}")
            }
        }
    }
}

impl From<ndarray::ShapeError> for RegressionError {
    fn from(err: ndarray::ShapeError) -> Self {
        RegressionError::ShapeError { text: err.to_string() }
    }
}

/// Convert a [`RegressionError`] into a Python `ValueError` with the error
/// message.
#[cfg(feature = "python-bindings")]
impl From<RegressionError> for PyErr {
    fn from(err: RegressionError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}
