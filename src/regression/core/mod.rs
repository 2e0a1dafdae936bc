//! regression::core — data, options, and likelihood building blocks.
//!
//! Purpose
//! -------
//! Hold everything the Poisson model is assembled from: the mutable
//! accumulator that collects observations, the frozen design snapshot, the
//! estimation options, and the pure likelihood/gradient functions.
//!
//! Key behaviors
//! -------------
//! - [`PoissonRegression`] validates and appends `(w, y, x)` rows and freezes
//!   them into models.
//! - [`DesignData`] is the immutable `(X, y, w)` table a model owns.
//! - [`PoissonOptions`] / [`EtaGuard`] configure the optimizer and the
//!   exponent ceiling.
//! - [`likelihood`] evaluates the penalized objective, its gradient, and the
//!   full log-likelihood for a given `β`.
//!
//! Invariants & assumptions
//! ------------------------
//! - Stored values are finite and every row has the same dimension `d`.
//! - Likelihood functions are pure: they read a design and a `β` and never
//!   mutate either.
//!
//! Testing notes
//! -------------
//! - Unit tests live in each submodule; fitting behavior is tested in
//!   `models::poisson` and in the integration tests.

pub mod accumulator;
pub mod design;
pub mod likelihood;
pub mod options;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::accumulator::{Observation, PoissonRegression};
pub use self::design::DesignData;
pub use self::likelihood::{penalized_grad, penalized_loglik, poisson_loglik};
pub use self::options::{EtaGuard, PoissonOptions};

pub mod prelude {
    pub use super::accumulator::{Observation, PoissonRegression};
    pub use super::design::DesignData;
    pub use super::options::{EtaGuard, PoissonOptions};
}
