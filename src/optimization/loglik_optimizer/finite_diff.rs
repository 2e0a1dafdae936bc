//! loglik_optimizer::finite_diff — finite-difference gradients and checks.
//!
//! Purpose
//! -------
//! Provide the numerical-derivative paths the optimizer needs when an
//! objective has no analytic gradient, and a gradient checker that compares an
//! analytic [`Optimizable::gradient`] against central differences of
//! [`Optimizable::value`].
//!
//! Key behaviors
//! -------------
//! - [`fd_gradient`]: central differences first, forward differences as the
//!   fallback when the central pass hit an evaluation error or produced a
//!   non-finite gradient.
//! - [`run_fd_diff`]: the forward-difference pass with error capture and
//!   post-hoc validation.
//! - [`check_gradient`]: evaluate an `Optimizable` at a given point, compute
//!   both gradients, and report the worst absolute and relative discrepancy.
//!
//! Invariants & assumptions
//! ------------------------
//! - Evaluation closures cannot return `Result`, so any error raised while
//!   differencing is parked in a shared `RefCell<Option<Error>>` and the
//!   closure returns `NaN`; the first parked error wins.
//! - Gradients returned from this module always pass [`validate_grad`].
//! - [`check_gradient`] restores the object's original parameters before
//!   returning, including on the error path.
//!
//! Conventions
//! -----------
//! - Differences are taken with respect to the raw parameter vector; no
//!   reparameterization happens here.
//! - Domain errors are reported as [`OptError`]; Argmin's [`Error`] is only
//!   used for the parked closure errors.
//!
//! Testing notes
//! -------------
//! - Unit tests cover the forward pass with and without closure errors, the
//!   central→forward fallback, and the gradient checker on a correct and on a
//!   deliberately wrong gradient.
use crate::optimization::{
    errors::{OptError, OptResult},
    loglik_optimizer::{
        Grad, Theta,
        traits::Optimizable,
        validation::{validate_grad, validate_param_buffer},
    },
};
use argmin::core::Error;
use finitediff::FiniteDiff;
use std::cell::RefCell;

/// Forward-difference gradient of `func` at `theta`, with error capture.
///
/// Clears `closure_err`, runs `forward_diff`, then surfaces any error that
/// `func` parked in `closure_err` before validating the result.
///
/// # Errors
/// - The parked closure error, converted through `From<Error> for OptError`.
/// - [`OptError::GradientDimMismatch`] / [`OptError::InvalidGradient`] from
///   [`validate_grad`].
pub fn run_fd_diff<G: Fn(&Theta) -> f64>(
    theta: &Theta, func: &G, closure_err: &RefCell<Option<Error>>,
) -> OptResult<Grad> {
    closure_err.replace(None);
    let fd_grad = theta.forward_diff(func);
    if let Some(err) = closure_err.take() {
        return Err(err.into());
    }
    validate_grad(&fd_grad, theta.len())?;
    Ok(fd_grad)
}

/// Finite-difference gradient with a central → forward fallback.
///
/// 1. Central differences of `func` at `theta`.
/// 2. If `func` parked an error, or the central gradient fails validation,
///    redo the computation with [`run_fd_diff`] and return its verdict.
///
/// # Errors
/// Whatever the forward pass reports; the central-pass failure itself is
/// discarded.
pub fn fd_gradient<G: Fn(&Theta) -> f64>(
    theta: &Theta, func: &G, closure_err: &RefCell<Option<Error>>,
) -> OptResult<Grad> {
    let central = theta.central_diff(func);
    let central_failed = closure_err.borrow().is_some();
    if !central_failed && validate_grad(&central, theta.len()).is_ok() {
        return Ok(central);
    }
    run_fd_diff(theta, func, closure_err)
}

/// Worst-case discrepancy between an analytic and a numerical gradient.
///
/// - `analytic`: gradient reported by [`Optimizable::gradient`].
/// - `numeric`: central-difference gradient of [`Optimizable::value`].
/// - `max_abs_err`: `max_i |analytic_i - numeric_i|`.
/// - `max_rel_err`: `max_i |analytic_i - numeric_i| / max(1, |numeric_i|)`.
#[derive(Debug, Clone, PartialEq)]
pub struct GradientCheck {
    pub analytic: Grad,
    pub numeric: Grad,
    pub max_abs_err: f64,
    pub max_rel_err: f64,
}

impl GradientCheck {
    /// `true` when `max_rel_err <= tol`.
    pub fn passes(&self, tol: f64) -> bool {
        self.max_rel_err <= tol
    }
}

/// Compare the analytic gradient of `objective` with central differences of
/// its value at `at`.
///
/// The object's parameters are moved to `at` for the duration of the check
/// and restored afterwards.
///
/// # Errors
/// - [`OptError::ParameterBufferMismatch`] if `at.len()` differs from the
///   parameter count.
/// - Any error from the object's accessors, `value`, or `gradient` (including
///   [`OptError::GradientNotImplemented`]).
/// - Validation errors if either gradient is non-finite.
pub fn check_gradient<O: Optimizable + ?Sized>(
    objective: &mut O, at: &[f64],
) -> OptResult<GradientCheck> {
    let dim = objective.parameter_count();
    validate_param_buffer(at.len(), dim)?;
    let mut saved = vec![0.0; dim];
    objective.parameters(&mut saved)?;

    let outcome = compare_at(objective, at, dim);
    objective.set_parameters(&saved)?;
    outcome
}

// ---- Helper methods ----

fn compare_at<O: Optimizable + ?Sized>(
    objective: &mut O, at: &[f64], dim: usize,
) -> OptResult<GradientCheck> {
    objective.set_parameters(at)?;
    let mut analytic = vec![0.0; dim];
    objective.gradient(&mut analytic)?;
    let analytic = Grad::from(analytic);
    validate_grad(&analytic, dim)?;

    // `central_diff` needs `Fn`, so the mutable object goes behind a RefCell.
    let cell = RefCell::new(objective);
    let closure_err: RefCell<Option<OptError>> = RefCell::new(None);
    let value_at = |theta: &Theta| -> f64 {
        let mut obj = cell.borrow_mut();
        let evaluated = match theta.as_slice() {
            Some(slice) => obj.set_parameters(slice),
            None => obj.set_parameters(&theta.to_vec()),
        }
        .and_then(|_| obj.value());
        match evaluated {
            Ok(v) => v,
            Err(e) => {
                closure_err.borrow_mut().get_or_insert(e);
                f64::NAN
            }
        }
    };
    let numeric = Theta::from(at.to_vec()).central_diff(&value_at);
    if let Some(err) = closure_err.into_inner() {
        return Err(err);
    }
    validate_grad(&numeric, dim)?;

    let (max_abs_err, max_rel_err) = analytic.iter().zip(numeric.iter()).fold(
        (0.0_f64, 0.0_f64),
        |(abs_acc, rel_acc), (&a, &n)| {
            let diff = (a - n).abs();
            (abs_acc.max(diff), rel_acc.max(diff / n.abs().max(1.0)))
        },
    );
    Ok(GradientCheck { analytic, numeric, max_abs_err, max_rel_err })
}
