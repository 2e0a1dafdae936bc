//! Python-boundary helpers: array extraction and option assembly.
//!
//! Only compiled with the `python-bindings` feature.
use std::str::FromStr;

use numpy::{
    IntoPyArray,    // Vec → PyArray
    PyArrayMethods, // .readonly()
    PyReadonlyArray1,
};
use pyo3::{exceptions::PyTypeError, prelude::*, types::PyAny};

use crate::{
    optimization::loglik_optimizer::{LineSearcher, MLEOptions, Tolerances},
    regression::core::options::{EtaGuard, PoissonOptions},
};

/// Accept a contiguous 1-D float64 ndarray, a pandas Series (via
/// `to_numpy`), or any Python sequence of floats.
///
/// # Errors
/// `TypeError` when the object is none of the above.
#[inline]
pub fn extract_f64_array<'py>(
    py: Python<'py>, raw_data: &Bound<'py, PyAny>,
) -> PyResult<PyReadonlyArray1<'py, f64>> {
    if let Ok(arr_ro) = raw_data.extract::<PyReadonlyArray1<f64>>() {
        if arr_ro.as_slice().is_ok() {
            return Ok(arr_ro);
        }
    }

    if let Ok(obj) = raw_data.call_method("to_numpy", (false,), None) {
        if let Ok(series_ro) = obj.extract::<PyReadonlyArray1<f64>>() {
            if series_ro.as_slice().is_ok() {
                return Ok(series_ro);
            }
        }
    }

    let vec: Vec<f64> = raw_data.extract().map_err(|_| {
        PyTypeError::new_err("expected a 1-D numpy.ndarray, pandas.Series, or sequence of float64")
    })?;
    Ok(vec.into_pyarray_bound(py).readonly())
}

/// Copy an array-like into an owned `Vec<f64>`.
///
/// # Errors
/// As [`extract_f64_array`], plus `TypeError` for non-contiguous input.
pub fn extract_f64_vec<'py>(py: Python<'py>, raw_data: &Bound<'py, PyAny>) -> PyResult<Vec<f64>> {
    let arr = extract_f64_array(py, raw_data)?;
    let slice = arr.as_slice().map_err(|_| {
        PyTypeError::new_err("expected a 1-D contiguous float64 array or sequence")
    })?;
    Ok(slice.to_vec())
}

/// Build [`PoissonOptions`] from optional Python keyword arguments.
///
/// Unset tolerances fall back to the `MLEOptions` defaults; the exponent guard
/// falls back to `EtaGuard::default()`. `verbose` turns on per-iteration
/// solver logging.
///
/// # Errors
/// `ValueError` from the option validators.
pub fn build_poisson_options(
    tol_grad: Option<f64>, tol_cost: Option<f64>, max_iter: Option<usize>,
    line_searcher: Option<&str>, lbfgs_mem: Option<usize>, max_eta: Option<f64>, verbose: bool,
) -> PyResult<PoissonOptions> {
    let defaults = MLEOptions::default();
    let tols = if tol_grad.is_none() && tol_cost.is_none() && max_iter.is_none() {
        defaults.tols
    } else {
        Tolerances::new(tol_grad, tol_cost, max_iter)?
    };
    let ls = match line_searcher {
        Some(name) => LineSearcher::from_str(name)?,
        None => defaults.line_searcher,
    };
    let mle_opts = MLEOptions::new(tols, ls, verbose, lbfgs_mem)?;
    let eta_guard = match max_eta {
        Some(v) => EtaGuard::new(v)?,
        None => EtaGuard::default(),
    };
    Ok(PoissonOptions::new(mle_opts, eta_guard))
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Keyword-argument assembly in `build_poisson_options`.
    //
    // They intentionally DO NOT cover:
    // - Array extraction, which needs a live interpreter.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // `verbose` reaches `MLEOptions` and unset arguments keep the defaults.
    fn build_poisson_options_forwards_verbose() {
        // Act
        let quiet = build_poisson_options(None, None, None, None, None, None, false)
            .expect("defaults are valid");
        let loud = build_poisson_options(None, None, None, Some("HagerZhang"), None, None, true)
            .expect("valid options");

        // Assert
        assert_eq!(quiet, PoissonOptions::default());
        assert!(loud.mle_opts.verbose);
        assert_eq!(loud.mle_opts.line_searcher, LineSearcher::HagerZhang);
        assert_eq!(loud.eta_guard, EtaGuard::default());
    }
}
