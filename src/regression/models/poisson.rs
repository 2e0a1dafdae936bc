//! Poisson regression model: penalized objective, analytic gradient, fitting,
//! and prediction.
//!
//! This module wires a frozen [`DesignData`] snapshot to the stateful
//! [`Optimizable`] trait. The model owns its coefficient vector `β`; the
//! optimizer moves it through parameter space via the trait's setters and
//! reads the objective
//! `Σ_i w_i (y_i μ_i − exp μ_i) − (λ/2) β·β`, `μ_i = β · x_i`,
//! and its gradient `Σ_i w_i x_i (y_i − exp μ_i) − λ β` at whatever `β` is
//! currently set.
//!
//! Key ideas:
//! - Unfitted → fitted is the only state transition; a second `fit` restarts
//!   L-BFGS from the current `β` and the model stays fitted.
//! - `predict` is defined before fitting: `β = 0` predicts a mean of `1.0`.
//! - Every `exp(μ)` inside the objective and its gradient goes through the
//!   configured [`EtaGuard`](crate::regression::core::options::EtaGuard);
//!   predictions use the plain exponential.
use ndarray::{Array1, Array2};

use crate::{
    optimization::{
        errors::OptResult,
        loglik_optimizer::{
            OptimOutcome, maximize_optimizable,
            traits::Optimizable,
            validation::{validate_param_buffer, validate_param_index},
        },
    },
    regression::{
        core::{
            design::DesignData,
            likelihood::{penalized_grad, penalized_loglik, poisson_loglik},
            options::PoissonOptions,
        },
        errors::{RegressionError, RegressionResult},
    },
};

/// Poisson regression model with a ridge penalty.
///
/// Encapsulates the frozen design (`design`), the coefficient vector (`beta`),
/// the ridge strength of the latest `fit` (`lambda`), run-time options, and
/// the last optimization outcome.
///
/// # Notes
/// - `X`, `y`, `w` never change after construction; only `β`, `λ`, the fitted
///   flag, and the cached outcome do, and only through `&mut self`.
/// - Implements [`Optimizable`] so it plugs directly into
///   [`maximize_optimizable`] or any other driver of that trait.
#[derive(Debug, Clone, PartialEq)]
pub struct PoissonModel {
    design: DesignData,
    beta: Array1<f64>,
    lambda: f64,
    fitted: bool,
    options: PoissonOptions,
    results: Option<OptimOutcome>,
}

impl PoissonModel {
    /// Construct an unfitted model over `design` with `β = 0` and `λ = 0`.
    pub fn new(design: DesignData, options: PoissonOptions) -> Self {
        let beta = Array1::zeros(design.dim());
        Self { design, beta, lambda: 0.0, fitted: false, options, results: None }
    }

    /// Fit by maximizing the penalized log-likelihood with ridge strength
    /// `regularization`.
    ///
    /// ## Steps
    /// 1. Validate `λ` (finite, `>= 0`) and store it.
    /// 2. Run L-BFGS per `options.mle_opts`, starting from the current `β`.
    /// 3. Write `θ̂` into `β`, cache the outcome, and mark the model fitted.
    ///
    /// A run that stops on the iteration cap still counts as a completed fit;
    /// inspect [`results`](Self::results) for the termination status.
    ///
    /// ## Errors
    /// - `OptError::InvalidRegularization` for a negative or non-finite `λ`
    ///   (nothing is changed).
    /// - `OptError::EmptyParameterVector` for a model built from an empty
    ///   accumulator.
    /// - Solver failures (`OptError::SolverExit` when the line search gives
    ///   up, non-finite objective). The fitted flag is then left as it was and
    ///   `β` holds the last trial point.
    pub fn fit(&mut self, regularization: f64) -> OptResult<()> {
        validate_regularization(regularization)?;
        self.lambda = regularization;
        log::debug!(
            "fitting Poisson model: {} rows, {} params, lambda = {}",
            self.design.n_obs(),
            self.design.dim(),
            regularization
        );

        let mle_opts = self.options.mle_opts.clone();
        let objective: &mut dyn Optimizable = &mut *self;
        let outcome = maximize_optimizable(objective, &mle_opts)?;

        log::debug!(
            "fit finished: {} after {} iterations, objective = {:.6}",
            outcome.status,
            outcome.iterations,
            outcome.value
        );
        self.results = Some(outcome);
        self.fitted = true;
        Ok(())
    }

    /// Current coefficient vector (zeros before the first fit).
    pub fn betas(&self) -> &Array1<f64> {
        &self.beta
    }

    /// Whether a `fit` call has completed.
    pub fn is_fitted(&self) -> bool {
        self.fitted
    }

    /// Predicted mean `exp(β · v)`.
    ///
    /// # Errors
    /// [`RegressionError::DimensionMismatch`] when `v.len() != d`.
    pub fn predict(&self, v: &[f64]) -> RegressionResult<f64> {
        Ok(self.linear_predictor(v)?.exp())
    }

    /// Predicted means for each row of `x`.
    ///
    /// # Errors
    /// [`RegressionError::DimensionMismatch`] when `x.ncols() != d`.
    pub fn predict_many(&self, x: &Array2<f64>) -> RegressionResult<Array1<f64>> {
        if x.ncols() != self.beta.len() {
            return Err(RegressionError::DimensionMismatch {
                expected: self.beta.len(),
                found: x.ncols(),
            });
        }
        Ok(x.dot(&self.beta).mapv(f64::exp))
    }

    /// Linear predictor `β · v`, the log of the predicted mean.
    ///
    /// # Errors
    /// [`RegressionError::DimensionMismatch`] when `v.len() != d`.
    pub fn linear_predictor(&self, v: &[f64]) -> RegressionResult<f64> {
        if v.len() != self.beta.len() {
            return Err(RegressionError::DimensionMismatch {
                expected: self.beta.len(),
                found: v.len(),
            });
        }
        Ok(self.beta.iter().zip(v).map(|(b, x)| b * x).sum())
    }

    /// Full Poisson log-likelihood at the current `β`, including
    /// `−Σ w_i ln Γ(1 + y_i)` and excluding the penalty.
    pub fn log_likelihood(&self) -> f64 {
        poisson_loglik(&self.design, &self.beta, &self.options.eta_guard)
    }

    /// Penalized objective at the current `β` and `λ`.
    pub fn penalized_value(&self) -> f64 {
        penalized_loglik(&self.design, &self.beta, self.lambda, &self.options.eta_guard)
    }

    /// Ridge strength of the latest `fit` (`0.0` before any fit).
    pub fn regularization(&self) -> f64 {
        self.lambda
    }

    /// Number of rows in the snapshot.
    pub fn n_obs(&self) -> usize {
        self.design.n_obs()
    }

    /// Number of coefficients `d`.
    pub fn n_params(&self) -> usize {
        self.beta.len()
    }

    /// The frozen `(X, y, w)` snapshot.
    pub fn design(&self) -> &DesignData {
        &self.design
    }

    /// Outcome of the latest successful `fit`, if any.
    pub fn results(&self) -> Option<&OptimOutcome> {
        self.results.as_ref()
    }
}

impl Optimizable for PoissonModel {
    fn parameter_count(&self) -> usize {
        self.beta.len()
    }

    fn parameter(&self, index: usize) -> OptResult<f64> {
        validate_param_index(index, self.beta.len())?;
        Ok(self.beta[index])
    }

    fn set_parameter(&mut self, index: usize, value: f64) -> OptResult<()> {
        validate_param_index(index, self.beta.len())?;
        self.beta[index] = value;
        Ok(())
    }

    fn parameters(&self, buffer: &mut [f64]) -> OptResult<()> {
        validate_param_buffer(buffer.len(), self.beta.len())?;
        buffer.iter_mut().zip(self.beta.iter()).for_each(|(dst, &b)| *dst = b);
        Ok(())
    }

    fn set_parameters(&mut self, buffer: &[f64]) -> OptResult<()> {
        validate_param_buffer(buffer.len(), self.beta.len())?;
        self.beta.iter_mut().zip(buffer).for_each(|(b, &src)| *b = src);
        Ok(())
    }

    /// Penalized log-likelihood at the current `β`.
    fn value(&self) -> OptResult<f64> {
        Ok(self.penalized_value())
    }

    /// Analytic gradient of the penalized log-likelihood at the current `β`.
    fn gradient(&self, buffer: &mut [f64]) -> OptResult<()> {
        validate_param_buffer(buffer.len(), self.beta.len())?;
        let grad =
            penalized_grad(&self.design, &self.beta, self.lambda, &self.options.eta_guard);
        buffer.iter_mut().zip(grad.iter()).for_each(|(dst, &g)| *dst = g);
        Ok(())
    }
}

// ---- Helper methods ----

fn validate_regularization(lambda: f64) -> RegressionResult<()> {
    if !lambda.is_finite() {
        return Err(RegressionError::InvalidRegularization {
            value: lambda,
            reason: "Regularization strength must be finite.",
        });
    }
    if lambda < 0.0 {
        return Err(RegressionError::InvalidRegularization {
            value: lambda,
            reason: "Regularization strength must be non-negative.",
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        optimization::{
            errors::OptError,
            loglik_optimizer::{
                LineSearcher, MLEOptions, adapter::ArgMinAdapter, check_gradient,
                stateful::StatefulObjective,
            },
        },
        regression::core::{accumulator::PoissonRegression, options::EtaGuard},
    };
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use argmin::core::{CostFunction, Gradient};
    use ndarray::array;
    use rand::{Rng, SeedableRng, rngs::StdRng};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - The unfitted state (zero betas, unit prediction).
    // - Analytic gradient vs. central differences on random data.
    // - The maximize/minimize sign contract through the Argmin adapter.
    // - Fitting: intercept-only optimum under both line searches, a few
    //   thousand rows with default options, ridge shrinkage, case weights,
    //   warm starts, and λ validation.
    // - Gradient consistency past the exponent ceiling and unguarded predict.
    // - Optimizable accessor bounds and predict dimension checks.
    //
    // They intentionally DO NOT cover:
    // - Recovery of simulated coefficients (see tests/).
    // -------------------------------------------------------------------------

    fn intercept_only(outcomes: &[f64]) -> PoissonModel {
        intercept_only_with(outcomes, PoissonOptions::default())
    }

    fn intercept_only_with(outcomes: &[f64], options: PoissonOptions) -> PoissonModel {
        let mut acc = PoissonRegression::new();
        for &y in outcomes {
            acc.add_entry(y, &[1.0]).expect("valid row");
        }
        acc.make_model_with_options(options).expect("snapshot should build")
    }

    fn options_with(line_searcher: LineSearcher) -> PoissonOptions {
        let defaults = MLEOptions::default();
        let mle = MLEOptions::new(defaults.tols, line_searcher, false, None)
            .expect("MLEOptions should be valid");
        PoissonOptions::new(mle, EtaGuard::default())
    }

    fn random_model(rng: &mut StdRng, rows: usize, dim: usize) -> PoissonModel {
        let mut acc = PoissonRegression::new();
        for _ in 0..rows {
            let x: Vec<f64> = (0..dim).map(|_| rng.gen_range(-1.0..1.0)).collect();
            let y = rng.gen_range(0..6) as f64;
            let w = rng.gen_range(0.5..2.0);
            acc.add_weighted_entry(w, y, &x).expect("valid row");
        }
        acc.make_model().expect("snapshot should build")
    }

    #[test]
    // Purpose
    // -------
    // Before fitting, β is the zero vector of length d and every prediction
    // is exp(0) = 1.
    fn unfitted_model_has_zero_betas_and_unit_predictions() {
        // Arrange
        let mut acc = PoissonRegression::new();
        acc.add_entry(3.0, &[1.0, 2.0, -1.0]).expect("valid row");

        // Act
        let model = acc.make_model().expect("snapshot should build");

        // Assert
        assert!(!model.is_fitted());
        assert_eq!(model.betas(), &array![0.0, 0.0, 0.0]);
        assert_eq!(model.predict(&[4.0, -7.0, 0.5]), Ok(1.0));
        assert_eq!(model.results(), None);
    }

    #[test]
    // Purpose
    // -------
    // The analytic gradient agrees with central differences of the objective.
    //
    // Given
    // -----
    // - Three random datasets (20 rows, 3 covariates) and, for each, several
    //   random β and λ values.
    //
    // Expect
    // ------
    // - Relative discrepancy ≤ 1e-4 everywhere; β restored afterwards.
    fn gradient_matches_finite_differences() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..3 {
            let mut model = random_model(&mut rng, 20, 3);
            for _ in 0..4 {
                // Arrange
                let beta: Vec<f64> = (0..3).map(|_| rng.gen_range(-0.8..0.8)).collect();
                model.lambda = rng.gen_range(0.0..2.0);

                // Act
                let check = check_gradient(&mut model, &beta).expect("gradient check runs");

                // Assert
                assert!(check.passes(1e-4), "max rel err {}", check.max_rel_err);
                assert_eq!(model.betas(), &array![0.0, 0.0, 0.0]);
            }
        }
    }

    #[test]
    // Purpose
    // -------
    // The quantity handed to Argmin is the negated objective, and its gradient
    // the negated analytic gradient.
    fn argmin_cost_is_negated_objective() {
        // Arrange
        let mut rng = StdRng::seed_from_u64(11);
        let mut model = random_model(&mut rng, 15, 2);
        model.lambda = 0.3;
        let theta = array![0.25, -0.4];
        model.set_parameters(&[0.25, -0.4]).expect("buffer has length d");
        let value = model.value().expect("finite objective");
        let mut grad = [0.0; 2];
        model.gradient(&mut grad).expect("analytic gradient");

        // Act
        let wrapper = StatefulObjective::new(&mut model);
        let adapter = ArgMinAdapter::new(&wrapper, &());
        let cost = adapter.cost(&theta).expect("cost evaluates");
        let cost_grad = adapter.gradient(&theta).expect("gradient evaluates");

        // Assert
        assert_eq!(cost, -value);
        assert_eq!(cost_grad, array![-grad[0], -grad[1]]);
    }

    #[test]
    // Purpose
    // -------
    // Intercept-only fit on y = {2, 4, 6} lands on β = ln(mean) = ln 4 with
    // either line search.
    //
    // Expect
    // ------
    // - β ≈ 1.3863, predict([1]) ≈ 4, fitted flag set, converged outcome
    //   cached and reported on the unscaled objective.
    fn intercept_only_fit_recovers_log_mean() {
        for ls in [LineSearcher::MoreThuente, LineSearcher::HagerZhang] {
            // Arrange
            let mut model = intercept_only_with(&[2.0, 4.0, 6.0], options_with(ls));

            // Act
            model.fit(0.0).expect("fit should succeed");

            // Assert
            assert!(model.is_fitted());
            assert_abs_diff_eq!(model.betas()[0], 4.0_f64.ln(), epsilon = 1e-5);
            assert_abs_diff_eq!(model.predict(&[1.0]).expect("d = 1"), 4.0, epsilon = 1e-4);
            let outcome = model.results().expect("outcome cached");
            assert!(outcome.converged, "{ls:?}: {}", outcome.status);
            assert_eq!(outcome.theta_hat, *model.betas());
            assert_relative_eq!(outcome.value, model.penalized_value(), max_relative = 1e-12);
        }
    }

    #[test]
    // Purpose
    // -------
    // With default options a fit on a few thousand rows moves well away from
    // β = 0 and converges, for both line searches.
    //
    // Given
    // -----
    // - 3000 rows, x = (1, u), u on a grid in [-1, 1], y = round(exp(1 + u)).
    //
    // Expect
    // ------
    // - Converged, ‖∇‖ below the default tolerance, intercept near 1 and slope
    //   near 1 (rounding of y only perturbs them slightly).
    fn fit_on_thousands_of_rows_converges_with_defaults() {
        // Arrange
        let mut acc = PoissonRegression::new();
        for i in 0..3000 {
            let u = -1.0 + 2.0 * (i as f64) / 2999.0;
            acc.add_entry((1.0 + u).exp().round(), &[1.0, u]).expect("valid row");
        }

        for ls in [LineSearcher::MoreThuente, LineSearcher::HagerZhang] {
            let mut model = acc.make_model_with_options(options_with(ls)).expect("snapshot");

            // Act
            model.fit(0.0).expect("fit should succeed");

            // Assert
            let outcome = model.results().expect("outcome cached");
            assert!(outcome.converged, "{ls:?}: {}", outcome.status);
            assert!(outcome.iterations > 0);
            let mut grad = [0.0; 2];
            model.gradient(&mut grad).expect("analytic gradient");
            assert!(grad.iter().map(|g| g * g).sum::<f64>().sqrt() < 1e-4, "{grad:?}");
            assert_abs_diff_eq!(model.betas()[0], 1.0, epsilon = 0.1);
            assert_abs_diff_eq!(model.betas()[1], 1.0, epsilon = 0.1);
        }
    }

    #[test]
    // Purpose
    // -------
    // The analytic gradient stays the derivative of the objective when the
    // linear predictor is past the exponent ceiling.
    //
    // Given
    // -----
    // - A single row x = 1, y = 3 and β = 702 (> 700).
    //
    // Expect
    // ------
    // - `check_gradient` passes at relative tolerance 1e-4.
    fn gradient_matches_finite_differences_past_exponent_ceiling() {
        let mut model = intercept_only(&[3.0]);

        let check = check_gradient(&mut model, &[702.0]).expect("gradient check runs");

        assert!(check.analytic[0].is_finite());
        assert!(check.passes(1e-4), "{check:?}");
    }

    #[test]
    // Purpose
    // -------
    // Predictions are the plain exponential, also for linear predictors
    // between the exponent ceiling and the overflow point.
    fn predict_is_not_clamped_by_exponent_guard() {
        let mut model = intercept_only(&[1.0]);
        model.set_parameter(0, 705.0).expect("index in range");

        assert_eq!(model.predict(&[1.0]), Ok(705.0_f64.exp()));
        assert_eq!(model.predict_many(&array![[1.0]]).expect("d = 1")[0], 705.0_f64.exp());
    }

    #[test]
    // Purpose
    // -------
    // At the intercept-only optimum the full log-likelihood matches the
    // closed form Σ (y ln 4 − 4 − ln y!).
    fn log_likelihood_includes_normalizer() {
        let mut model = intercept_only(&[2.0, 4.0, 6.0]);
        model.fit(0.0).expect("fit should succeed");

        let expected = 12.0 * 4.0_f64.ln() - 12.0 - (2.0_f64.ln() + 24.0_f64.ln() + 720.0_f64.ln());

        assert_abs_diff_eq!(model.log_likelihood(), expected, epsilon = 1e-6);
    }

    #[test]
    // Purpose
    // -------
    // Larger ridge strength never increases ‖β̂‖.
    fn coefficient_norm_shrinks_with_regularization() {
        // Arrange
        let mut rng = StdRng::seed_from_u64(3);
        let base = random_model(&mut rng, 40, 3);

        // Act
        let norms: Vec<f64> = [0.0, 0.1, 1.0, 10.0, 100.0]
            .iter()
            .map(|&lambda| {
                let mut model = base.clone();
                model.fit(lambda).expect("fit should succeed");
                model.betas().dot(model.betas()).sqrt()
            })
            .collect();

        // Assert
        for pair in norms.windows(2) {
            assert!(pair[1] <= pair[0] + 1e-6, "norms not monotone: {norms:?}");
        }
    }

    #[test]
    // Purpose
    // -------
    // A row with weight 2 is the same as that row entered twice.
    fn case_weights_equal_duplicated_rows() {
        // Arrange
        let rows = [(1.0, [1.0, 0.2]), (3.0, [1.0, -0.5]), (0.0, [1.0, 1.1])];
        let mut weighted = PoissonRegression::new();
        let mut duplicated = PoissonRegression::new();
        for (y, x) in rows {
            weighted.add_weighted_entry(2.0, y, &x).expect("valid row");
            duplicated.add_entry(y, &x).expect("valid row");
            duplicated.add_entry(y, &x).expect("valid row");
        }
        let mut a = weighted.make_model().expect("snapshot should build");
        let mut b = duplicated.make_model().expect("snapshot should build");

        // Act
        a.fit(0.5).expect("fit should succeed");
        b.fit(0.5).expect("fit should succeed");

        // Assert
        assert_abs_diff_eq!(a.betas()[0], b.betas()[0], epsilon = 1e-5);
        assert_abs_diff_eq!(a.betas()[1], b.betas()[1], epsilon = 1e-5);
        assert_relative_eq!(a.penalized_value(), b.penalized_value(), max_relative = 1e-8);
    }

    #[test]
    // Purpose
    // -------
    // A second fit starts from the fitted β, so it needs no more iterations
    // than the first and lands in the same place.
    fn second_fit_warm_starts_from_current_betas() {
        // Arrange
        let mut rng = StdRng::seed_from_u64(5);
        let mut model = random_model(&mut rng, 30, 2);
        model.fit(1.0).expect("first fit should succeed");
        let first_beta = model.betas().clone();
        let first_iters = model.results().expect("outcome cached").iterations;

        // Act
        model.fit(1.0).expect("second fit should succeed");

        // Assert
        assert!(model.is_fitted());
        assert!(model.results().expect("outcome cached").iterations <= first_iters);
        assert_abs_diff_eq!(model.betas()[0], first_beta[0], epsilon = 1e-5);
        assert_abs_diff_eq!(model.betas()[1], first_beta[1], epsilon = 1e-5);
    }

    #[test]
    // Purpose
    // -------
    // Negative or non-finite λ is rejected before anything changes.
    fn invalid_regularization_is_rejected() {
        let mut model = intercept_only(&[1.0, 2.0]);

        for bad in [-0.1, f64::NAN, f64::INFINITY] {
            let err = model.fit(bad).unwrap_err();
            assert!(matches!(err, OptError::InvalidRegularization { .. }), "got {err:?}");
        }
        assert!(!model.is_fitted());
        assert_eq!(model.regularization(), 0.0);
        assert_eq!(model.betas(), &array![0.0]);
    }

    #[test]
    // Purpose
    // -------
    // A model over an empty accumulator has nothing to fit.
    fn empty_model_cannot_be_fitted() {
        let mut model = PoissonRegression::new().make_model().expect("empty snapshot builds");

        assert_eq!(model.fit(0.0), Err(OptError::EmptyParameterVector));
        assert!(!model.is_fitted());
    }

    #[test]
    // Purpose
    // -------
    // Optimizer accessors enforce index and buffer bounds.
    fn optimizable_accessors_check_bounds() {
        let mut model = intercept_only(&[1.0]);
        let mut short = [0.0; 0];

        assert_eq!(
            model.parameter(1),
            Err(OptError::ParameterIndexOutOfRange { index: 1, len: 1 })
        );
        assert_eq!(
            model.set_parameter(3, 1.0),
            Err(OptError::ParameterIndexOutOfRange { index: 3, len: 1 })
        );
        assert_eq!(
            model.parameters(&mut short),
            Err(OptError::ParameterBufferMismatch { expected: 1, found: 0 })
        );
        assert_eq!(
            model.set_parameters(&[1.0, 2.0]),
            Err(OptError::ParameterBufferMismatch { expected: 1, found: 2 })
        );
        model.set_parameter(0, 0.5).expect("index in range");
        assert_eq!(model.parameter(0), Ok(0.5));
    }

    #[test]
    // Purpose
    // -------
    // Prediction inputs of the wrong length are errors; matrix prediction
    // agrees with row-by-row prediction.
    fn predict_checks_dimension_and_matches_rows() {
        // Arrange
        let mut model = intercept_only(&[1.0]);
        model.set_parameter(0, 0.7).expect("index in range");
        let x = array![[1.0], [2.0], [-1.0]];

        // Act
        let many = model.predict_many(&x).expect("d = 1");

        // Assert
        assert_eq!(
            model.predict(&[1.0, 2.0]),
            Err(RegressionError::DimensionMismatch { expected: 1, found: 2 })
        );
        assert!(model.predict_many(&array![[1.0, 2.0]]).is_err());
        for (row, &m) in x.rows().into_iter().zip(many.iter()) {
            assert_eq!(model.predict(&[row[0]]), Ok(m));
        }
        assert_eq!(model.linear_predictor(&[2.0]), Ok(1.4));
    }
}
