//! Errors for the optimization layer (configuration, objective evaluation,
//! optimizer-interface misuse, and `argmin` backend failures).
//!
//! [`OptError`] is the single error surface returned by the log-likelihood
//! optimizer. Model-level errors ([`RegressionError`]) are mirrored here via
//! `From` so that `?` works across the regression/optimizer boundary.
//!
//! ## Conventions
//! - **Indices are 0-based**.
//! - Backend errors coming out of `argmin` are unpacked into the matching
//!   variant when they are an [`ArgminError`]; any other boxed error (including
//!   an `OptError` raised from inside a cost/gradient closure) is recovered by
//!   downcasting before falling back to [`OptError::BackendError`].
use argmin::core::{ArgminError, Error};
#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};

use crate::regression::errors::RegressionError;

/// Crate-wide result alias for optimizer operations.
pub type OptResult<T> = Result<T, OptError>;

#[derive(Debug, Clone, PartialEq)]
pub enum OptError {
    // ---- Gradient ----
    /// Implies that FD should be used
    GradientNotImplemented,

    /// Gradient dimensions do not match parameter dimensions.
    GradientDimMismatch {
        expected: usize,
        found: usize,
    },

    /// Gradient elements need to be finite
    InvalidGradient {
        index: usize,
        value: f64,
        reason: &'static str,
    },

    // ---- MLEOptions ----
    /// Gradient tolerance needs to be positive and finite.
    InvalidTolGrad {
        tol: f64,
        reason: &'static str,
    },
    /// Cost change tolerance needs to be positive and finite.
    InvalidTolCost {
        tol: f64,
        reason: &'static str,
    },
    /// Maximum iterations needs to be positive.
    InvalidMaxIter {
        max_iter: usize,
        reason: &'static str,
    },
    /// At least one tolerance must be provided.
    NoTolerancesProvided,

    /// Invalid line searcher name.
    InvalidLineSearch {
        name: String,
        reason: &'static str,
    },

    /// lbfgs_mem needs to be at least 1.
    InvalidLBFGSMem {
        mem: usize,
        reason: &'static str,
    },

    // ---- Cost function ----
    /// Cost function returned a non-finite value.
    NonFiniteCost {
        value: f64,
    },

    // ---- Optimizer interface ----
    /// Single-index parameter access outside `0..len`.
    ParameterIndexOutOfRange {
        index: usize,
        len: usize,
    },

    /// Bulk parameter buffer has the wrong length.
    ParameterBufferMismatch {
        expected: usize,
        found: usize,
    },

    /// Nothing to optimize.
    EmptyParameterVector,

    /// Trial parameters handed to the objective must be finite.
    InvalidThetaInput {
        index: usize,
        value: f64,
    },

    // ---- Optimizer outcome ----
    /// Estimated parameters must be finite.
    InvalidThetaHat {
        index: usize,
        value: f64,
        reason: &'static str,
    },

    /// Theta hat is missing
    MissingThetaHat,

    /// The solver gave up before its stopping rule was met (line-search
    /// failure reported by argmin as `SolverExit`).
    SolverExit {
        reason: String,
    },

    // ---- Argmin ---
    /// Wrapper for argmin::InvalidParameter
    InvalidParameter {
        text: String,
    },
    /// Wrapper for argmin::NotImplemented
    NotImplemented {
        text: String,
    },
    /// Wrapper for argmin::NotInitialized
    NotInitialized {
        text: String,
    },
    /// Wrapper for argmin::ConditionViolated
    ConditionViolated {
        text: String,
    },
    /// Wrapper for argmin::CheckPointNotFound
    CheckPointNotFound {
        text: String,
    },
    /// Wrapper for argmin::PotentialBug
    PotentialBug {
        text: String,
    },
    /// Wrapper for argmin::ImpossibleError
    ImpossibleError {
        text: String,
    },
    /// Wrapper for other argmin::Error types
    BackendError {
        text: String,
    },

    // ---- Regression errors ----
    /// Covariate vector length differs from the fixed dimension.
    DimensionMismatch {
        expected: usize,
        found: usize,
    },

    /// Regularization strength must be finite and >= 0.
    InvalidRegularization {
        value: f64,
        reason: &'static str,
    },

    /// Exponent guard must be finite and > 0.
    InvalidEtaGuard {
        value: f64,
        reason: &'static str,
    },

    /// Any other model-side input error, carried as text.
    InvalidModelInput {
        text: String,
    },

    // ---- Fallback ----
    UnknownError,
}

impl std::error::Error for OptError {}

impl std::fmt::Display for OptError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Gradient ----
            OptError::GradientNotImplemented => {
                write!(f, "Gradient optimization not implemented")
            }
            OptError::GradientDimMismatch { expected, found } => {
                write!(f, "Gradient dimension mismatch: expected {expected}, found {found}")
            }
            OptError::InvalidGradient { index, value, reason } => {
                write!(f, "Invalid gradient at index {index}: {value}: {reason}")
            }

            // ---- MLEOptions ----
            OptError::InvalidTolGrad { tol, reason } => {
                write!(f, "Invalid gradient tolerance {tol}: {reason}")
            }
            OptError::InvalidTolCost { tol, reason } => {
                write!(f, "Invalid cost function change tolerance {tol}: {reason}")
            }
            OptError::InvalidMaxIter { max_iter, reason } => {
                write!(f, "Invalid maximum iterations {max_iter}: {reason}")
            }
            OptError::NoTolerancesProvided => {
                write!(f, "No tolerances provided")
            }
            OptError::InvalidLineSearch { name, reason } => {
                write!(f, "Invalid line searcher '{name}': {reason}")
            }
            OptError::InvalidLBFGSMem { mem, reason } => {
                write!(f, "Invalid L-BFGS memory {mem}: {reason}")
            }

            // ---- Cost function ----
            OptError::NonFiniteCost { value } => {
                write!(f, "Non-finite cost value: {value}")
            }

            // ---- Optimizer interface ----
            OptError::ParameterIndexOutOfRange { index, len } => {
                write!(f, "Parameter index {index} out of range for {len} parameters")
            }
            OptError::ParameterBufferMismatch { expected, found } => {
                write!(f, "Parameter buffer length mismatch: expected {expected}, found {found}")
            }
            OptError::EmptyParameterVector => {
                write!(f, "Cannot optimize an objective with zero parameters")
            }
            OptError::InvalidThetaInput { index, value } => {
                write!(f, "Invalid theta input at index {index}: {value}, must be finite")
            }

            // ---- Optimizer outcome ----
            OptError::InvalidThetaHat { index, value, reason } => {
                write!(f, "Invalid estimated parameter at index {index}: {value}: {reason}")
            }
            OptError::MissingThetaHat => {
                write!(f, "Missing estimated parameters (theta hat)")
            }
            OptError::SolverExit { reason } => {
                write!(f, "Solver exited early: {reason}")
            }

            // ---- Argmin ----
            OptError::InvalidParameter { text } => {
                write!(f, "Invalid parameter: {text}")
            }
            OptError::NotImplemented { text } => {
                write!(f, "Not implemented: {text}")
            }
            OptError::NotInitialized { text } => {
                write!(f, "Not initialized: {text}")
            }
            OptError::ConditionViolated { text } => {
                write!(f, "Condition violated: {text}")
            }
            OptError::CheckPointNotFound { text } => {
                write!(f, "Checkpoint not found: {text}")
            }
            OptError::PotentialBug { text } => {
                write!(f, "Potential bug: {text}")
            }
            OptError::ImpossibleError { text } => {
                write!(f, "Impossible error: {text}")
            }
            OptError::BackendError { text } => {
                write!(f, "Backend error: {text}")
            }

            // ---- Regression errors ----
            OptError::DimensionMismatch { expected, found } => {
                write!(f, "Covariate dimension mismatch: expected {expected}, found {found}")
            }
            OptError::InvalidRegularization { value, reason } => {
                write!(f, "Invalid regularization strength {value}: {reason}")
            }
            OptError::InvalidEtaGuard { value, reason } => {
                write!(f, "Invalid exponent guard {value}: {reason}")
            }
            OptError::InvalidModelInput { text } => {
                write!(f, "Invalid model input: {text}")
            }

            // ---- Fallback ----
            OptError::UnknownError => {
                write!(f, "Unknown error")
            }
        }
    }
}

impl From<Error> for OptError {
    fn from(original_err: Error) -> Self {
        let original_err = match original_err.downcast::<OptError>() {
            Ok(opt_err) => return opt_err,
            Err(err) => err,
        };
        match original_err.downcast() {
            Ok(argmin_err) => match argmin_err {
                ArgminError::InvalidParameter { text } => OptError::InvalidParameter { text },
                ArgminError::NotImplemented { text } => OptError::NotImplemented { text },
                ArgminError::NotInitialized { text } => OptError::NotInitialized { text },
                ArgminError::ConditionViolated { text } => OptError::ConditionViolated { text },
                ArgminError::CheckpointNotFound { text } => OptError::CheckPointNotFound { text },
                ArgminError::PotentialBug { text } => OptError::PotentialBug { text },
                ArgminError::ImpossibleError { text } => OptError::ImpossibleError { text },
                _ => OptError::UnknownError,
            },
            Err(err) => OptError::BackendError { text: err.to_string() },
        }
    }
}

impl From<RegressionError> for OptError {
    fn from(err: RegressionError) -> Self {
        match err {
            RegressionError::DimensionMismatch { expected, found } => {
                OptError::DimensionMismatch { expected, found }
            }
            RegressionError::InvalidRegularization { value, reason } => {
                OptError::InvalidRegularization { value, reason }
            }
            RegressionError::InvalidEtaGuard { value, reason } => {
                OptError::InvalidEtaGuard { value, reason }
            }
            other => OptError::InvalidModelInput { text: other.to_string() },
        }
    }
}

/// Convert an [`OptError`] into a Python `ValueError` with the error message.
#[cfg(feature = "python-bindings")]
impl From<OptError> for PyErr {
    fn from(err: OptError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}
