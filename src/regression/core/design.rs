//! Frozen design data for a fitted Poisson model.
//!
//! Purpose
//! -------
//! Hold the immutable `(X, y, w)` snapshot a model is fitted on. The snapshot
//! is a deep copy of the accumulator's rows at one point in time; later
//! appends to the accumulator never reach it.
//!
//! Invariants & assumptions
//! ------------------------
//! - `x` is `n × d`, row `i` holds observation `i`'s covariates.
//! - `y.len() == w.len() == n`.
//! - Every entry is finite (enforced by the accumulator on append).
//!
//! Conventions
//! -----------
//! - Row-major assembly from the accumulator's flat covariate buffer.
use ndarray::{Array1, Array2};

use crate::regression::errors::RegressionResult;

/// DesignData — immutable `(X, y, w)` table.
///
/// Fields
/// ------
/// - `x`: `Array2<f64>` covariate matrix, `n × d`.
/// - `y`: `Array1<f64>` outcomes.
/// - `w`: `Array1<f64>` case weights.
#[derive(Debug, Clone, PartialEq)]
pub struct DesignData {
    pub x: Array2<f64>,
    pub y: Array1<f64>,
    pub w: Array1<f64>,
}

impl DesignData {
    /// Assemble a design from row-major covariates.
    ///
    /// # Errors
    /// [`RegressionError::ShapeError`](crate::regression::errors::RegressionError::ShapeError)
    /// if `covariates.len() != outcomes.len() * dim`.
    pub fn from_rows(
        covariates: Vec<f64>, outcomes: Vec<f64>, weights: Vec<f64>, dim: usize,
    ) -> RegressionResult<Self> {
        let x = Array2::from_shape_vec((outcomes.len(), dim), covariates)?;
        Ok(Self { x, y: Array1::from(outcomes), w: Array1::from(weights) })
    }

    /// Number of rows `n`.
    pub fn n_obs(&self) -> usize {
        self.x.nrows()
    }

    /// Covariate dimension `d`.
    pub fn dim(&self) -> usize {
        self.x.ncols()
    }
}
