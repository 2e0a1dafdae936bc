//! Dataset accumulator for Poisson regression.
//!
//! Purpose
//! -------
//! Collect weighted observations `(w, y, x)` into a growable table and hand
//! out frozen [`PoissonModel`] snapshots of it. This is the mutable half of the
//! two-stage design; the model is the immutable half.
//!
//! Key behaviors
//! -------------
//! - The first observation fixes the covariate dimension `d`; every later
//!   covariate vector must have exactly `d` components.
//! - Rows are validated before anything is written, so a rejected row leaves
//!   the table untouched.
//! - [`PoissonRegression::make_model`] deep-copies the rows; the accumulator
//!   can keep growing without affecting models already built.
//!
//! Invariants & assumptions
//! ------------------------
//! - `covariates.len() == len() * dim()` at all times (flat row-major buffer).
//! - All stored values are finite. Weight and outcome signs are not checked;
//!   callers encode counts and case weights as they see fit.
//! - Rows are never removed.
//!
//! Conventions
//! -----------
//! - Bias terms, interactions and offsets are encoded by the caller in `x`.
//!
//! Testing notes
//! -------------
//! - Unit tests cover dimension fixing and rejection, finiteness checks,
//!   snapshot independence, and the unit-weight shorthand.
use crate::regression::{
    core::{design::DesignData, options::PoissonOptions},
    errors::{RegressionError, RegressionResult},
    models::poisson::PoissonModel,
};

/// One row of the dataset: case weight, count outcome, covariates.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub weight: f64,
    pub outcome: f64,
    pub covariates: Vec<f64>,
}

impl Observation {
    /// Unit-weight observation.
    pub fn new(outcome: f64, covariates: Vec<f64>) -> Self {
        Self { weight: 1.0, outcome, covariates }
    }

    /// Observation carrying an explicit case weight.
    pub fn weighted(weight: f64, outcome: f64, covariates: Vec<f64>) -> Self {
        Self { weight, outcome, covariates }
    }
}

/// PoissonRegression — append-only table of weighted observations.
///
/// Fields are private; the table grows only through the `add_*` methods,
/// which enforce the dimension and finiteness invariants.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PoissonRegression {
    weights: Vec<f64>,
    outcomes: Vec<f64>,
    covariates: Vec<f64>,
    dim: usize,
}

impl PoissonRegression {
    /// Empty accumulator with no dimension fixed yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a unit-weight row; same as `add_weighted_entry(1.0, ..)`.
    ///
    /// # Errors
    /// See [`add_weighted_entry`](Self::add_weighted_entry).
    pub fn add_entry(&mut self, outcome: f64, covariates: &[f64]) -> RegressionResult<()> {
        self.add_weighted_entry(1.0, outcome, covariates)
    }

    /// Append a row with an explicit case weight.
    ///
    /// The first successful call fixes `d = covariates.len()`.
    ///
    /// # Errors
    /// - [`RegressionError::EmptyCovariates`] for a zero-length covariate vector.
    /// - [`RegressionError::DimensionMismatch`] when `d` is fixed and
    ///   `covariates.len() != d`.
    /// - [`RegressionError::NonFiniteEntry`] for a NaN/±inf weight, outcome, or
    ///   covariate.
    pub fn add_weighted_entry(
        &mut self, weight: f64, outcome: f64, covariates: &[f64],
    ) -> RegressionResult<()> {
        self.validate_row(weight, outcome, covariates)?;
        if self.dim == 0 {
            self.dim = covariates.len();
        }
        self.weights.push(weight);
        self.outcomes.push(outcome);
        self.covariates.extend_from_slice(covariates);
        Ok(())
    }

    /// Append a pre-built [`Observation`].
    ///
    /// # Errors
    /// See [`add_weighted_entry`](Self::add_weighted_entry).
    pub fn add_observation(&mut self, observation: Observation) -> RegressionResult<()> {
        self.add_weighted_entry(observation.weight, observation.outcome, &observation.covariates)
    }

    /// Freeze the current rows into a model with default options.
    ///
    /// # Errors
    /// [`RegressionError::ShapeError`] only if the internal buffers were
    /// inconsistent, which the `add_*` methods rule out.
    pub fn make_model(&self) -> RegressionResult<PoissonModel> {
        self.make_model_with_options(PoissonOptions::default())
    }

    /// Freeze the current rows into a model with explicit options.
    ///
    /// # Errors
    /// As [`make_model`](Self::make_model).
    pub fn make_model_with_options(&self, opts: PoissonOptions) -> RegressionResult<PoissonModel> {
        let design = DesignData::from_rows(
            self.covariates.clone(),
            self.outcomes.clone(),
            self.weights.clone(),
            self.dim,
        )?;
        log::debug!("snapshot taken: {} rows, {} covariates", design.n_obs(), design.dim());
        Ok(PoissonModel::new(design, opts))
    }

    /// Number of rows appended so far.
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    /// `true` before the first row is appended.
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Covariate dimension `d`; `0` until the first row fixes it.
    pub fn dim(&self) -> usize {
        self.dim
    }

    // ---- Helper methods ----

    fn validate_row(&self, weight: f64, outcome: f64, covariates: &[f64]) -> RegressionResult<()> {
        if covariates.is_empty() {
            return Err(RegressionError::EmptyCovariates);
        }
        if self.dim != 0 && covariates.len() != self.dim {
            return Err(RegressionError::DimensionMismatch {
                expected: self.dim,
                found: covariates.len(),
            });
        }
        if !weight.is_finite() {
            return Err(RegressionError::NonFiniteEntry {
                field: "weight",
                index: None,
                value: weight,
            });
        }
        if !outcome.is_finite() {
            return Err(RegressionError::NonFiniteEntry {
                field: "outcome",
                index: None,
                value: outcome,
            });
        }
        if let Some((i, &v)) = covariates.iter().enumerate().find(|(_, v)| !v.is_finite()) {
            return Err(RegressionError::NonFiniteEntry {
                field: "covariate",
                index: Some(i),
                value: v,
            });
        }
        Ok(())
    }
}
