//! loglik_optimizer::stateful — drive an [`Optimizable`] through the
//! `LogLikelihood` pipeline.
//!
//! Purpose
//! -------
//! The L-BFGS runner speaks `LogLikelihood`: `ℓ(θ)` at an explicit `θ`. A
//! stateful objective instead owns its parameters and evaluates at whatever is
//! currently set. [`StatefulObjective`] closes that gap by writing every trial
//! point into the wrapped object before asking for a value or gradient.
//!
//! Invariants & assumptions
//! ------------------------
//! - Every `value`/`grad` call first writes `θ` into the object, so the object
//!   always holds the most recent trial point once the solver returns.
//! - `LogLikelihood` methods take `&self`, so the mutable borrow of the object
//!   lives behind a `RefCell`. Evaluation is single-threaded and never
//!   re-entrant, which keeps the borrow checks from failing.
//! - `Data` is `()`: the object carries its own data.
use std::cell::RefCell;

use crate::optimization::{
    errors::OptResult,
    loglik_optimizer::{
        traits::{LogLikelihood, Optimizable},
        types::{Cost, Grad, Theta},
        validation::validate_theta_input,
    },
};

/// `LogLikelihood` view of a mutably borrowed [`Optimizable`].
pub struct StatefulObjective<'a, O: Optimizable + ?Sized> {
    inner: RefCell<&'a mut O>,
    dim: usize,
}

impl<'a, O: Optimizable + ?Sized> StatefulObjective<'a, O> {
    /// Borrow `objective` for the duration of one optimization run.
    pub fn new(objective: &'a mut O) -> Self {
        let dim = objective.parameter_count();
        Self { inner: RefCell::new(objective), dim }
    }

    fn load(&self, theta: &Theta) -> OptResult<()> {
        let mut obj = self.inner.borrow_mut();
        match theta.as_slice() {
            Some(slice) => obj.set_parameters(slice),
            None => obj.set_parameters(&theta.to_vec()),
        }
    }
}

impl<'a, O: Optimizable + ?Sized> LogLikelihood for StatefulObjective<'a, O> {
    type Data = ();

    fn value(&self, theta: &Theta, _data: &()) -> OptResult<Cost> {
        self.load(theta)?;
        self.inner.borrow().value()
    }

    fn check(&self, theta: &Theta, _data: &()) -> OptResult<()> {
        match theta.as_slice() {
            Some(slice) => validate_theta_input(slice, self.dim),
            None => validate_theta_input(&theta.to_vec(), self.dim),
        }
    }

    fn grad(&self, theta: &Theta, _data: &()) -> OptResult<Grad> {
        self.load(theta)?;
        let mut buffer = vec![0.0; self.dim];
        self.inner.borrow().gradient(&mut buffer)?;
        Ok(Grad::from(buffer))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::{
        errors::OptError,
        loglik_optimizer::validation::{validate_param_buffer, validate_param_index},
    };
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Trial points being written into the wrapped object.
    // - Value/gradient forwarding and the finite-difference signal.
    // - Input checks performed by `check`.
    // -------------------------------------------------------------------------

    /// ℓ(θ) = -Σ (θ_i - i)², analytic gradient optional.
    struct Shifted {
        theta: Vec<f64>,
        analytic: bool,
    }

    impl Optimizable for Shifted {
        fn parameter_count(&self) -> usize {
            self.theta.len()
        }
        fn parameter(&self, index: usize) -> OptResult<f64> {
            validate_param_index(index, self.theta.len())?;
            Ok(self.theta[index])
        }
        fn set_parameter(&mut self, index: usize, value: f64) -> OptResult<()> {
            validate_param_index(index, self.theta.len())?;
            self.theta[index] = value;
            Ok(())
        }
        fn parameters(&self, buffer: &mut [f64]) -> OptResult<()> {
            validate_param_buffer(buffer.len(), self.theta.len())?;
            buffer.copy_from_slice(&self.theta);
            Ok(())
        }
        fn set_parameters(&mut self, buffer: &[f64]) -> OptResult<()> {
            validate_param_buffer(buffer.len(), self.theta.len())?;
            self.theta.copy_from_slice(buffer);
            Ok(())
        }
        fn value(&self) -> OptResult<f64> {
            Ok(-self.theta.iter().enumerate().map(|(i, t)| (t - i as f64).powi(2)).sum::<f64>())
        }
        fn gradient(&self, buffer: &mut [f64]) -> OptResult<()> {
            if !self.analytic {
                return Err(OptError::GradientNotImplemented);
            }
            validate_param_buffer(buffer.len(), self.theta.len())?;
            for (i, (g, t)) in buffer.iter_mut().zip(&self.theta).enumerate() {
                *g = -2.0 * (t - i as f64);
            }
            Ok(())
        }
    }

    #[test]
    // Purpose
    // -------
    // Evaluating the wrapper moves the object to the trial point and returns
    // the object's own value and gradient there.
    fn value_and_grad_are_evaluated_at_the_trial_point() {
        // Arrange
        let mut obj = Shifted { theta: vec![0.0, 0.0], analytic: true };

        // Act
        let (value, grad) = {
            let wrapper = StatefulObjective::new(&mut obj);
            let theta = array![1.0, 3.0];
            (wrapper.value(&theta, &()).unwrap(), wrapper.grad(&theta, &()).unwrap())
        };

        // Assert
        assert_eq!(value, -(1.0 + 4.0));
        assert_eq!(grad, array![-2.0, -4.0]);
        assert_eq!(obj.theta, vec![1.0, 3.0]);
    }

    #[test]
    // Purpose
    // -------
    // Without an analytic gradient the wrapper forwards the
    // `GradientNotImplemented` signal so the adapter can difference instead.
    fn missing_gradient_is_forwarded() {
        let mut obj = Shifted { theta: vec![0.5], analytic: false };
        let wrapper = StatefulObjective::new(&mut obj);

        let err = wrapper.grad(&array![0.25], &()).unwrap_err();

        assert_eq!(err, OptError::GradientNotImplemented);
    }

    #[test]
    // Purpose
    // -------
    // `check` rejects wrong-length and non-finite starting points.
    fn check_rejects_bad_inputs() {
        let mut obj = Shifted { theta: vec![0.0, 0.0], analytic: true };
        let wrapper = StatefulObjective::new(&mut obj);

        assert!(wrapper.check(&array![0.0, 1.0], &()).is_ok());
        assert_eq!(
            wrapper.check(&array![0.0], &()),
            Err(OptError::ParameterBufferMismatch { expected: 2, found: 1 })
        );
        assert_eq!(
            wrapper.check(&array![0.0, f64::NAN], &()).map_err(|e| matches!(
                e,
                OptError::InvalidThetaInput { index: 1, .. }
            )),
            Err(true)
        );
    }
}
