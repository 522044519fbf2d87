//! Gradient-based solvers for scalar inverse problems.
//!
//! The plume inversion optimises a single parameter (the log emission rate),
//! so the solver collection is deliberately small: one Adam-style
//! moment-based solver with the loop hygiene an ill-conditioned inverse
//! problem demands (warm-up, plateau learning-rate decay, NaN recovery,
//! relative-change convergence, cooperative deadlines).
//!
//! ## Example
//!
//! ```
//! use plume_core::math::solvers::{AdamConfig, AdamSolver};
//!
//! // Minimise (x - 3)²
//! let objective = |x: f64| ((x - 3.0) * (x - 3.0), 2.0 * (x - 3.0));
//!
//! let solver = AdamSolver::new(AdamConfig::fast());
//! let result = solver.solve(objective, 0.0).unwrap();
//!
//! assert!(result.converged);
//! assert!((result.param - 3.0).abs() < 1e-2);
//! ```

mod adam;

// Re-export public types at module level
pub use adam::{AdamConfig, AdamResult, AdamSolver, StopReason};
