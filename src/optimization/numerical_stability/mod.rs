//! numerical_stability — overflow guards for the log-link exponential.
//!
//! Purpose
//! -------
//! Keep the `exp(η)` evaluations inside the Poisson objective in a finite
//! `f64` regime. The objective and its gradient both route exponentiation
//! through this module so the ceiling is applied consistently and the
//! gradient stays the exact derivative of the objective.
//!
//! Key behaviors
//! -------------
//! - Provide [`guarded_exp`], an exponential that continues linearly past a
//!   configurable ceiling instead of overflowing to `+∞`, and its derivative
//!   [`guarded_exp_slope`].
//! - Centralize the default ceiling [`DEFAULT_MAX_ETA`] and the overflow point
//!   [`EXP_OVERFLOW_ETA`].
//!
//! Invariants & assumptions
//! ------------------------
//! - Below the ceiling the guarded exponential is bit-identical to `f64::exp`,
//!   so results for well-posed problems do not depend on the guard.
//! - The ceiling itself is validated upstream (`EtaGuard::new`); these helpers
//!   assume it is finite and positive.
//!
//! Conventions
//! -----------
//! - Pure scalar functions with no I/O, logging, or allocation.
//!
//! Testing notes
//! -------------
//! - Unit tests in [`transformations`] check agreement with `f64::exp` on a
//!   safe grid, linear growth past the overflow point, continuity of the slope
//!   at the ceiling, and NaN propagation.

pub mod transformations;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::transformations::{
    DEFAULT_MAX_ETA, EXP_OVERFLOW_ETA, guarded_exp, guarded_exp_slope,
};

// ---- Optional convenience prelude for downstream crates -------------------

pub mod prelude {
    pub use super::transformations::{DEFAULT_MAX_ETA, guarded_exp, guarded_exp_slope};
}
