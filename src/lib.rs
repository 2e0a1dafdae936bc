//! poisson_regression — penalized-likelihood Poisson regression with an
//! argmin-backed L-BFGS driver and optional Python bindings.
//!
//! Purpose
//! -------
//! Serve as the crate root for Rust callers and as the PyO3 bridge that exposes
//! the regression API to Python via the `_poisson_regression` extension
//! module. When the `python-bindings` feature is enabled, this module defines
//! the Python-facing classes.
//!
//! Key behaviors
//! -------------
//! - Re-export the core Rust modules (`regression` and `optimization`) as the
//!   public crate surface.
//! - Define `#[pyclass]` wrappers for the accumulator, the model, and the
//!   optimization outcome, plus the `#[pymodule]` initializer.
//!
//! Invariants & assumptions
//! ------------------------
//! - All numerical work lives in the inner Rust modules; this file performs
//!   only FFI glue, input conversion, and error mapping.
//! - Errors from core Rust code are converted to Python `ValueError`s at the
//!   PyO3 boundary.
//!
//! Downstream usage
//! ----------------
//! ```no_run
//! use poisson_regression::regression::PoissonRegression;
//!
//! let mut acc = PoissonRegression::new();
//! acc.add_entry(2.0, &[1.0, 0.3])?;
//! acc.add_weighted_entry(3.0, 5.0, &[1.0, 1.2])?;
//! let mut model = acc.make_model()?;
//! model.fit(0.1)?;
//! let mean = model.predict(&[1.0, 0.8])?;
//! # let _ = mean;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! Testing notes
//! -------------
//! - Core behavior is covered by unit tests in the inner modules and by the
//!   integration tests under `tests/`.

pub mod optimization;
pub mod regression;
#[cfg(feature = "python-bindings")]
pub mod utils;

#[cfg(feature = "python-bindings")]
use pyo3::prelude::*;

#[cfg(feature = "python-bindings")]
use crate::{
    optimization::loglik_optimizer::OptimOutcome,
    regression::{PoissonModel, PoissonRegression},
    utils::{build_poisson_options, extract_f64_vec},
};

/// PoissonRegression — Python-facing accumulator of weighted observations.
///
/// Constructed from Python via `PoissonRegression()`; rows are appended with
/// `add_entry(outcome, covariates, weight=1.0)` and frozen with
/// `make_model(...)`.
#[cfg(feature = "python-bindings")]
#[pyclass(name = "PoissonRegression", module = "poisson_regression")]
pub struct PyPoissonRegression {
    inner: PoissonRegression,
}

#[cfg(feature = "python-bindings")]
impl Default for PyPoissonRegression {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl PyPoissonRegression {
    #[new]
    pub fn new() -> Self {
        PyPoissonRegression { inner: PoissonRegression::new() }
    }

    #[pyo3(
        signature = (outcome, covariates, weight = None),
        text_signature = "(self, outcome, covariates, /, weight=1.0)"
    )]
    pub fn add_entry<'py>(
        &mut self, py: Python<'py>, outcome: f64, covariates: &Bound<'py, PyAny>,
        weight: Option<f64>,
    ) -> PyResult<()> {
        let x = extract_f64_vec(py, covariates)?;
        self.inner.add_weighted_entry(weight.unwrap_or(1.0), outcome, &x)?;
        Ok(())
    }

    #[pyo3(
        signature = (
            tol_grad = None,
            tol_cost = None,
            max_iter = None,
            line_searcher = None,
            lbfgs_mem = None,
            max_eta = None,
            verbose = None,
        ),
        text_signature = "(self, /, tol_grad=None, tol_cost=None, max_iter=None, \
                          line_searcher=None, lbfgs_mem=None, max_eta=None, verbose=False)"
    )]
    #[allow(clippy::too_many_arguments)]
    pub fn make_model(
        &self, tol_grad: Option<f64>, tol_cost: Option<f64>, max_iter: Option<usize>,
        line_searcher: Option<&str>, lbfgs_mem: Option<usize>, max_eta: Option<f64>,
        verbose: Option<bool>,
    ) -> PyResult<PyPoissonModel> {
        let opts = build_poisson_options(
            tol_grad,
            tol_cost,
            max_iter,
            line_searcher,
            lbfgs_mem,
            max_eta,
            verbose.unwrap_or(false),
        )?;
        Ok(PyPoissonModel { inner: self.inner.make_model_with_options(opts)? })
    }

    #[getter]
    pub fn dim(&self) -> usize {
        self.inner.dim()
    }

    pub fn __len__(&self) -> usize {
        self.inner.len()
    }
}

/// PoissonModel — Python-facing frozen snapshot that can be fitted.
///
/// Instances come from `PoissonRegression.make_model`; all heavy work is
/// delegated to [`PoissonModel`].
#[cfg(feature = "python-bindings")]
#[pyclass(name = "PoissonModel", module = "poisson_regression")]
pub struct PyPoissonModel {
    inner: PoissonModel,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl PyPoissonModel {
    #[pyo3(signature = (regularization = 0.0), text_signature = "(self, /, regularization=0.0)")]
    pub fn fit(&mut self, regularization: f64) -> PyResult<()> {
        self.inner.fit(regularization)?;
        Ok(())
    }

    pub fn predict<'py>(&self, py: Python<'py>, covariates: &Bound<'py, PyAny>) -> PyResult<f64> {
        let x = extract_f64_vec(py, covariates)?;
        Ok(self.inner.predict(&x)?)
    }

    #[getter]
    pub fn betas(&self) -> Vec<f64> {
        self.inner.betas().to_vec()
    }

    #[getter]
    pub fn is_fitted(&self) -> bool {
        self.inner.is_fitted()
    }

    #[getter]
    pub fn regularization(&self) -> f64 {
        self.inner.regularization()
    }

    pub fn log_likelihood(&self) -> f64 {
        self.inner.log_likelihood()
    }

    #[getter]
    pub fn results(&self) -> Option<PyOptimOutcome> {
        self.inner.results().map(|outcome| PyOptimOutcome { inner: outcome.clone() })
    }
}

/// OptimOutcome — read-only view of the solver report of the latest fit.
#[cfg(feature = "python-bindings")]
#[pyclass(name = "OptimOutcome", module = "poisson_regression")]
pub struct PyOptimOutcome {
    inner: OptimOutcome,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl PyOptimOutcome {
    #[getter]
    pub fn theta_hat(&self) -> Vec<f64> {
        self.inner.theta_hat.to_vec()
    }

    #[getter]
    pub fn value(&self) -> f64 {
        self.inner.value
    }

    #[getter]
    pub fn converged(&self) -> bool {
        self.inner.converged
    }

    #[getter]
    pub fn status(&self) -> String {
        self.inner.status.clone()
    }

    #[getter]
    pub fn iterations(&self) -> usize {
        self.inner.iterations
    }

    #[getter]
    pub fn grad_norm(&self) -> Option<f64> {
        self.inner.grad_norm
    }

    #[getter]
    pub fn fn_evals(&self) -> Vec<(String, u64)> {
        self.inner.fn_evals.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }
}

/// _poisson_regression — PyO3 module initializer for the Python extension.
#[cfg(feature = "python-bindings")]
#[pymodule]
fn _poisson_regression(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyPoissonRegression>()?;
    m.add_class::<PyPoissonModel>()?;
    m.add_class::<PyOptimOutcome>()?;
    Ok(())
}
