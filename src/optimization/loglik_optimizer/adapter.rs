//! Adapter that exposes a `LogLikelihood` as an `argmin` problem.
//!
//! Argmin minimizes, the models in this crate are maximized. The adapter
//! defines the cost as `c(θ) = -ℓ(θ)` and hands Argmin `∇c(θ) = -∇ℓ(θ)`.
//! Getting this sign wrong would silently turn the fit into a likelihood
//! *minimization*, so the flip lives in exactly one place: here.
//!
//! When the objective has no analytic gradient, the **cost** closure is
//! finite-differenced instead, which already carries the right sign.
//!
//! The cost may additionally be divided by a positive `scale`. Argmin's
//! L-BFGS takes its first step along the raw gradient, so on large data sets
//! an unscaled objective sends the first trial point far outside the region
//! where `exp(η)` is finite. Dividing by `max(1, ‖∇ℓ(θ₀)‖)` makes that first
//! direction unit length without moving the optimum.
use std::cell::RefCell;

use crate::optimization::{
    errors::OptError,
    loglik_optimizer::{
        finite_diff::fd_gradient,
        traits::LogLikelihood,
        types::{Cost, Grad, Theta},
        validation::validate_grad,
    },
};
use argmin::core::{CostFunction, Error, Gradient};

/// Bridges a `LogLikelihood` and its data to Argmin's `CostFunction` and
/// `Gradient` traits.
///
/// - `cost(θ)` returns `-ℓ(θ) / scale`, rejecting non-finite values.
/// - `gradient(θ)` returns `-∇ℓ(θ) / scale` when an analytic gradient exists
///   and a finite-difference gradient of the cost otherwise.
#[derive(Debug)]
pub struct ArgMinAdapter<'a, F: LogLikelihood + ?Sized> {
    pub f: &'a F,
    pub data: &'a F::Data,
    pub scale: f64,
}

impl<'a, F: LogLikelihood + ?Sized> ArgMinAdapter<'a, F> {
    /// Wrap an objective and its data payload (unit scale).
    pub fn new(f: &'a F, data: &'a F::Data) -> Self {
        Self { f, data, scale: 1.0 }
    }

    /// Divide cost and gradient by `scale`, which must be finite and > 0.
    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    /// `max(1, ‖∇ℓ(θ)‖)`, the scale that gives the steepest-descent
    /// direction at `theta` at most unit length.
    ///
    /// # Errors
    /// Anything [`Gradient::gradient`] can return at `theta`.
    pub fn gradient_scale(&self, theta: &Theta) -> Result<f64, Error> {
        let g = self.gradient(theta)?;
        Ok((g.dot(&g).sqrt() * self.scale).max(1.0))
    }

    /// Cost closure for finite differencing: errors are parked in `slot` and
    /// reported as `NaN` to the differencing routine.
    fn parked_cost<'s>(&'s self, slot: &'s RefCell<Option<Error>>) -> impl Fn(&Theta) -> f64 + 's {
        move |theta: &Theta| match self.cost(theta) {
            Ok(c) => c,
            Err(e) => {
                slot.borrow_mut().get_or_insert(e);
                f64::NAN
            }
        }
    }
}

impl<'a, F: LogLikelihood + ?Sized> CostFunction for ArgMinAdapter<'a, F> {
    type Param = Theta;
    type Output = Cost;

    /// `c(θ) = -ℓ(θ) / scale`.
    ///
    /// # Errors
    /// - Any `OptError` raised by `value`.
    /// - `OptError::NonFiniteCost` when `ℓ(θ)` is NaN or infinite.
    fn cost(&self, theta: &Self::Param) -> Result<Self::Output, Error> {
        let loglik = self.f.value(theta, self.data)?;
        if !loglik.is_finite() {
            return Err(OptError::NonFiniteCost { value: loglik }.into());
        }
        Ok(-loglik / self.scale)
    }
}

impl<'a, F: LogLikelihood + ?Sized> Gradient for ArgMinAdapter<'a, F> {
    type Param = Theta;
    type Gradient = Grad;

    /// `∇c(θ)`.
    ///
    /// - Analytic path: validate `∇ℓ(θ)` (length and finiteness), negate.
    /// - `GradientNotImplemented`: finite differences of the cost via
    ///   [`fd_gradient`] (central first, forward as fallback).
    ///
    /// # Errors
    /// - Any other `OptError` from `grad`.
    /// - Errors raised by cost evaluations during differencing.
    /// - Validation errors for wrong-length or non-finite gradients.
    fn gradient(&self, theta: &Self::Param) -> Result<Self::Gradient, Error> {
        match self.f.grad(theta, self.data) {
            Ok(g) => {
                validate_grad(&g, theta.len())?;
                Ok(-g / self.scale)
            }
            Err(OptError::GradientNotImplemented) => {
                let slot: RefCell<Option<Error>> = RefCell::new(None);
                let cost_fn = self.parked_cost(&slot);
                Ok(fd_gradient(theta, &cost_fn, &slot)?)
            }
            Err(e) => Err(e.into()),
        }
    }
}
