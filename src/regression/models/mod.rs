//! regression::models — fittable models.
//!
//! [`PoissonModel`] is the frozen, fittable half of the accumulator/model
//! pair: it owns `β`, exposes the penalized objective through
//! [`Optimizable`](crate::optimization::loglik_optimizer::Optimizable), and
//! predicts once fitted.

pub mod poisson;

pub use self::poisson::PoissonModel;

pub mod prelude {
    pub use super::poisson::PoissonModel;
}
