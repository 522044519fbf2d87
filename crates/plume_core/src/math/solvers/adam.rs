//! Adam-style moment-based solver for scalar inverse problems.
//!
//! This module provides the [`AdamSolver`] used by the inversion engine to
//! fit the log emission rate to observed concentrations.
//!
//! # Algorithm
//!
//! Classic Adam first/second-moment updates on a single parameter:
//!
//! ```text
//! m_t = β₁ m_{t-1} + (1 − β₁) g_t
//! v_t = β₂ v_{t-1} + (1 − β₂) g_t²
//! x_t = x_{t-1} − η · m̂_t / (√v̂_t + ε)
//! ```
//!
//! wrapped in the loop hygiene an ill-conditioned inverse problem needs:
//!
//! - a warm-up phase during which convergence is never declared, so an
//!   unlucky first step cannot stop the solve early;
//! - a *relative* loss-change convergence criterion, robust across
//!   observation scales where absolute thresholds fail;
//! - plateau-triggered learning-rate halving when the best-seen loss stops
//!   improving;
//! - a per-iteration NaN/Inf guard that aborts the offending step, falls
//!   back to the best-seen parameter, and terminates with a diagnostic stop
//!   reason after repeated hits, so NaN never reaches the caller;
//! - a per-iteration cooperative deadline check so a pathological objective
//!   cannot hang a worker;
//! - best-seen (not last) parameter reporting when the iteration cap hits.

use std::fmt;
use std::time::Instant;

use crate::types::SolverError;

/// Configuration for the Adam solver.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AdamConfig {
    /// Initial learning rate. Large enough by default (0.1) to escape a poor
    /// initial guess; a 0.01-class rate is a known stuck-at-initial-guess
    /// failure mode for this problem.
    pub learning_rate: f64,
    /// Hard iteration cap.
    pub max_iterations: usize,
    /// Iterations to run before any convergence check is permitted.
    pub warmup_iterations: usize,
    /// Convergence threshold on the relative change in loss.
    pub rel_tolerance: f64,
    /// Consecutive non-improving iterations before the rate is shrunk.
    pub plateau_patience: usize,
    /// Multiplier applied to the learning rate on a plateau (and after an
    /// unstable step).
    pub plateau_shrink: f64,
    /// Learning-rate floor.
    pub min_learning_rate: f64,
    /// First-moment decay.
    pub beta1: f64,
    /// Second-moment decay.
    pub beta2: f64,
    /// Denominator fuzz.
    pub epsilon: f64,
    /// Unstable steps tolerated before the solve is abandoned.
    pub max_instability_events: usize,
}

impl Default for AdamConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.1,
            max_iterations: 2000,
            warmup_iterations: 200,
            rel_tolerance: 1e-5,
            plateau_patience: 50,
            plateau_shrink: 0.5,
            min_learning_rate: 1e-5,
            beta1: 0.9,
            beta2: 0.999,
            epsilon: 1e-8,
            max_instability_events: 5,
        }
    }
}

impl AdamConfig {
    /// Create a new configuration with specified tolerance and iteration cap.
    pub fn new(rel_tolerance: f64, max_iterations: usize) -> Self {
        Self {
            rel_tolerance,
            max_iterations,
            ..Default::default()
        }
    }

    /// Create a fast configuration with a short warm-up and relaxed tolerance.
    pub fn fast() -> Self {
        Self {
            max_iterations: 500,
            warmup_iterations: 50,
            rel_tolerance: 1e-4,
            ..Default::default()
        }
    }

    /// Create a high precision configuration.
    pub fn high_precision() -> Self {
        Self {
            max_iterations: 10_000,
            warmup_iterations: 500,
            rel_tolerance: 1e-7,
            ..Default::default()
        }
    }

    fn validate(&self) -> Result<(), SolverError> {
        if !self.learning_rate.is_finite() || self.learning_rate <= 0.0 {
            return Err(SolverError::InvalidConfiguration(format!(
                "learning rate must be positive, got {}",
                self.learning_rate
            )));
        }
        if self.max_iterations == 0 {
            return Err(SolverError::InvalidConfiguration(
                "max_iterations must be at least 1".to_string(),
            ));
        }
        if !self.rel_tolerance.is_finite() || self.rel_tolerance <= 0.0 {
            return Err(SolverError::InvalidConfiguration(format!(
                "rel_tolerance must be positive, got {}",
                self.rel_tolerance
            )));
        }
        if !(0.0..1.0).contains(&self.beta1) || !(0.0..1.0).contains(&self.beta2) {
            return Err(SolverError::InvalidConfiguration(format!(
                "moment decays must lie in [0, 1), got beta1={}, beta2={}",
                self.beta1, self.beta2
            )));
        }
        if !(0.0..=1.0).contains(&self.plateau_shrink) || self.plateau_shrink == 0.0 {
            return Err(SolverError::InvalidConfiguration(format!(
                "plateau_shrink must lie in (0, 1], got {}",
                self.plateau_shrink
            )));
        }
        Ok(())
    }
}

/// Why the solver stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StopReason {
    /// Relative loss change fell below tolerance after warm-up.
    Converged,
    /// Iteration cap reached without convergence.
    IterationCap,
    /// The caller's wall-clock budget expired.
    BudgetExhausted,
    /// Repeated NaN/Inf iterations; best stable parameter returned.
    NumericalInstability,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StopReason::Converged => "converged",
            StopReason::IterationCap => "iteration cap",
            StopReason::BudgetExhausted => "budget exhausted",
            StopReason::NumericalInstability => "numerical instability",
        };
        f.write_str(s)
    }
}

/// Result of an Adam solve.
///
/// `param` and `loss` always refer to the *best-seen* iterate, which on a
/// capped or unstable run is not necessarily the last one.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AdamResult {
    /// Best-seen parameter value.
    pub param: f64,
    /// Loss at the best-seen parameter.
    pub loss: f64,
    /// Iterations performed.
    pub iterations: usize,
    /// Whether the relative-change criterion was satisfied.
    pub converged: bool,
    /// Why the loop stopped.
    pub stop_reason: StopReason,
    /// Number of NaN/Inf steps that were recovered or aborted.
    pub instability_events: usize,
    /// Learning rate at the end of the solve.
    pub final_learning_rate: f64,
}

/// Mutable per-run optimiser state.
///
/// Constructed fresh inside every [`AdamSolver::solve`] call and discarded
/// when it returns; nothing here is shared across runs, so independent
/// inversions can be dispatched across threads freely.
struct SolverState {
    param: f64,
    m: f64,
    v: f64,
    learning_rate: f64,
    iterations: usize,
    best_param: f64,
    best_loss: f64,
    plateau_count: usize,
    instability_events: usize,
}

impl SolverState {
    fn new(param: f64, learning_rate: f64, initial_loss: f64) -> Self {
        Self {
            param,
            m: 0.0,
            v: 0.0,
            learning_rate,
            iterations: 0,
            best_param: param,
            best_loss: initial_loss,
            plateau_count: 0,
            instability_events: 0,
        }
    }

    fn shrink_rate(&mut self, shrink: f64, floor: f64) {
        self.learning_rate = (self.learning_rate * shrink).max(floor);
    }
}

/// Adam-style solver for a scalar parameter.
///
/// Minimises a loss supplied as a closure returning `(loss, gradient)` at a
/// parameter value. The gradient is expected in closed form; the plume
/// equation is linear in the emission rate, so no finite differences are
/// ever needed.
///
/// # Example
///
/// ```
/// use plume_core::math::solvers::{AdamConfig, AdamSolver, StopReason};
///
/// // Minimise (x − 2)² starting from the optimum: the gradient is zero, so
/// // the solver converges as soon as the warm-up allows it to say so.
/// let objective = |x: f64| ((x - 2.0) * (x - 2.0), 2.0 * (x - 2.0));
/// let solver = AdamSolver::new(AdamConfig::fast());
/// let result = solver.solve(objective, 2.0).unwrap();
///
/// assert!(result.converged);
/// assert_eq!(result.stop_reason, StopReason::Converged);
/// assert_eq!(result.param, 2.0);
/// ```
#[derive(Debug, Clone)]
pub struct AdamSolver {
    config: AdamConfig,
}

impl AdamSolver {
    /// Create a new solver with the given configuration.
    pub fn new(config: AdamConfig) -> Self {
        Self { config }
    }

    /// Create a solver with default configuration.
    pub fn with_defaults() -> Self {
        Self {
            config: AdamConfig::default(),
        }
    }

    /// Get the solver configuration.
    pub fn config(&self) -> &AdamConfig {
        &self.config
    }

    /// Minimise the objective starting from `initial_param`.
    ///
    /// # Arguments
    ///
    /// * `objective` - Closure returning `(loss, gradient)` at a parameter
    /// * `initial_param` - Starting point
    ///
    /// # Returns
    ///
    /// * `Ok(AdamResult)` - Best-seen parameter with diagnostics; a capped or
    ///   unstable run is still `Ok`, flagged via `converged`/`stop_reason`
    /// * `Err(SolverError)` - Configuration unusable, or the objective was
    ///   already non-finite at the starting point
    pub fn solve<F>(&self, objective: F, initial_param: f64) -> Result<AdamResult, SolverError>
    where
        F: Fn(f64) -> (f64, f64),
    {
        self.solve_with_deadline(objective, initial_param, None)
    }

    /// Minimise with a cooperative wall-clock deadline.
    ///
    /// The deadline is checked every iteration, not only at convergence
    /// checks, so a non-converging objective cannot hang the caller. An
    /// expired deadline stops the loop with [`StopReason::BudgetExhausted`]
    /// and the best-seen parameter so far.
    pub fn solve_with_deadline<F>(
        &self,
        objective: F,
        initial_param: f64,
        deadline: Option<Instant>,
    ) -> Result<AdamResult, SolverError>
    where
        F: Fn(f64) -> (f64, f64),
    {
        self.config.validate()?;
        if !initial_param.is_finite() {
            return Err(SolverError::NumericalInstability(format!(
                "initial parameter is not finite: {}",
                initial_param
            )));
        }

        let (initial_loss, initial_grad) = objective(initial_param);
        if !initial_loss.is_finite() || !initial_grad.is_finite() {
            return Err(SolverError::NumericalInstability(format!(
                "objective non-finite at start (loss: {}, grad: {})",
                initial_loss, initial_grad
            )));
        }

        let c = &self.config;
        let mut state = SolverState::new(initial_param, c.learning_rate, initial_loss);
        let mut grad = initial_grad;
        let mut prev_loss = initial_loss;
        let mut stop_reason = StopReason::IterationCap;

        while state.iterations < c.max_iterations {
            if let Some(d) = deadline {
                if Instant::now() >= d {
                    stop_reason = StopReason::BudgetExhausted;
                    break;
                }
            }

            state.iterations += 1;

            // Bias-corrected Adam step
            state.m = c.beta1 * state.m + (1.0 - c.beta1) * grad;
            state.v = c.beta2 * state.v + (1.0 - c.beta2) * grad * grad;
            let t = state.iterations as i32;
            let m_hat = state.m / (1.0 - c.beta1.powi(t));
            let v_hat = state.v / (1.0 - c.beta2.powi(t));
            state.param -= state.learning_rate * m_hat / (v_hat.sqrt() + c.epsilon);

            let (loss, new_grad) = objective(state.param);

            if !state.param.is_finite() || !loss.is_finite() || !new_grad.is_finite() {
                // Abort this step: fall back to the best stable parameter
                // with fresh moments and a smaller rate.
                state.instability_events += 1;
                if state.instability_events > c.max_instability_events {
                    stop_reason = StopReason::NumericalInstability;
                    break;
                }
                state.param = state.best_param;
                state.m = 0.0;
                state.v = 0.0;
                state.shrink_rate(c.plateau_shrink, c.min_learning_rate);
                let (stable_loss, stable_grad) = objective(state.param);
                prev_loss = stable_loss;
                grad = stable_grad;
                continue;
            }

            // Best-seen tracking drives the plateau schedule
            if loss < state.best_loss {
                state.best_loss = loss;
                state.best_param = state.param;
                state.plateau_count = 0;
            } else {
                state.plateau_count += 1;
                if state.plateau_count >= c.plateau_patience {
                    state.shrink_rate(c.plateau_shrink, c.min_learning_rate);
                    state.plateau_count = 0;
                }
            }

            let rel_change = (prev_loss - loss).abs() / loss.abs().max(f64::MIN_POSITIVE);
            prev_loss = loss;
            grad = new_grad;

            // Convergence may only be declared once warm-up has passed
            if state.iterations >= c.warmup_iterations && rel_change < c.rel_tolerance {
                stop_reason = StopReason::Converged;
                break;
            }
        }

        Ok(AdamResult {
            param: state.best_param,
            loss: state.best_loss,
            iterations: state.iterations,
            converged: stop_reason == StopReason::Converged,
            stop_reason,
            instability_events: state.instability_events,
            final_learning_rate: state.learning_rate,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn quadratic(center: f64) -> impl Fn(f64) -> (f64, f64) {
        move |x: f64| ((x - center) * (x - center), 2.0 * (x - center))
    }

    // ========================================
    // AdamConfig Tests
    // ========================================

    #[test]
    fn test_config_default() {
        let config = AdamConfig::default();
        assert!((config.learning_rate - 0.1).abs() < 1e-15);
        assert_eq!(config.max_iterations, 2000);
        assert!(config.warmup_iterations >= 100);
    }

    #[test]
    fn test_config_new() {
        let config = AdamConfig::new(1e-6, 300);
        assert!((config.rel_tolerance - 1e-6).abs() < 1e-18);
        assert_eq!(config.max_iterations, 300);
    }

    #[test]
    fn test_config_fast() {
        let config = AdamConfig::fast();
        assert!(config.max_iterations <= 500);
        assert!(config.warmup_iterations <= 50);
    }

    #[test]
    fn test_config_high_precision() {
        let config = AdamConfig::high_precision();
        assert!(config.rel_tolerance <= 1e-6);
        assert!(config.max_iterations >= 10_000);
    }

    #[test]
    fn test_config_rejects_zero_learning_rate() {
        let config = AdamConfig {
            learning_rate: 0.0,
            ..Default::default()
        };
        let solver = AdamSolver::new(config);
        assert!(matches!(
            solver.solve(quadratic(0.0), 1.0),
            Err(SolverError::InvalidConfiguration(_))
        ));
    }

    // ========================================
    // Convergence Tests
    // ========================================

    #[test]
    fn test_solve_quadratic() {
        let solver = AdamSolver::new(AdamConfig::fast());
        let result = solver.solve(quadratic(3.0), 0.0).unwrap();

        assert!(result.converged);
        assert_eq!(result.stop_reason, StopReason::Converged);
        assert!((result.param - 3.0).abs() < 5e-2);
        assert!(result.loss < 1e-2);
    }

    #[test]
    fn test_solve_from_optimum_waits_for_warmup() {
        // Zero gradient at the start: nothing moves, but convergence may not
        // be declared before the warm-up has elapsed.
        let solver = AdamSolver::new(AdamConfig::fast());
        let result = solver.solve(quadratic(2.0), 2.0).unwrap();

        assert!(result.converged);
        assert_eq!(result.param, 2.0);
        assert!(result.iterations >= solver.config().warmup_iterations);
    }

    #[test]
    fn test_solve_escapes_distant_initial_guess() {
        // A large learning rate must cover ground; the loop should not stall
        // at the initial guess.
        let solver = AdamSolver::with_defaults();
        let result = solver.solve(quadratic(10.0), 0.0).unwrap();

        assert!((result.param - 10.0).abs() < 0.2);
    }

    #[test]
    fn test_plateau_shrinks_learning_rate() {
        // A flat objective never improves on the best-seen loss, so every
        // `plateau_patience` iterations the rate must halve until warm-up
        // ends and the zero relative change converges the solve.
        let solver = AdamSolver::with_defaults();
        let result = solver.solve(|_| (1.0, 0.0), 0.0).unwrap();

        assert!(result.converged);
        assert_eq!(result.iterations, solver.config().warmup_iterations);
        assert!(result.final_learning_rate < solver.config().learning_rate);
    }

    // ========================================
    // Cap / Budget / Instability Tests
    // ========================================

    #[test]
    fn test_iteration_cap_returns_best_seen() {
        // Cap below warm-up: convergence can never be declared.
        let config = AdamConfig {
            max_iterations: 10,
            warmup_iterations: 50,
            ..Default::default()
        };
        let solver = AdamSolver::new(config);
        let result = solver.solve(quadratic(100.0), 0.0).unwrap();

        assert!(!result.converged);
        assert_eq!(result.stop_reason, StopReason::IterationCap);
        assert_eq!(result.iterations, 10);
        assert!(result.param.is_finite());
        assert!(result.loss <= quadratic(100.0)(0.0).0);
    }

    #[test]
    fn test_expired_deadline_stops_immediately() {
        let solver = AdamSolver::with_defaults();
        let deadline = Instant::now() - Duration::from_millis(1);
        let result = solver
            .solve_with_deadline(quadratic(3.0), 0.0, Some(deadline))
            .unwrap();

        assert!(!result.converged);
        assert_eq!(result.stop_reason, StopReason::BudgetExhausted);
        assert_eq!(result.iterations, 0);
        assert_eq!(result.param, 0.0);
    }

    #[test]
    fn test_nan_objective_at_start_is_error() {
        let solver = AdamSolver::with_defaults();
        let result = solver.solve(|_| (f64::NAN, f64::NAN), 1.0);
        assert!(matches!(
            result,
            Err(SolverError::NumericalInstability(_))
        ));
    }

    #[test]
    fn test_nan_during_iteration_recovers_to_best() {
        // Finite only at the starting point; every step lands in NaN
        // territory, so the solver must abort steps and eventually stop with
        // an instability flag while reporting the stable parameter.
        let objective = |x: f64| {
            if (x - 1.0).abs() < 1e-12 {
                (1.0, 1.0)
            } else {
                (f64::NAN, f64::NAN)
            }
        };
        let solver = AdamSolver::with_defaults();
        let result = solver.solve(objective, 1.0).unwrap();

        assert!(!result.converged);
        assert_eq!(result.stop_reason, StopReason::NumericalInstability);
        assert_eq!(result.param, 1.0);
        assert!(result.instability_events > 0);
        assert!(result.param.is_finite() && result.loss.is_finite());
    }

    #[test]
    fn test_non_finite_initial_param_is_error() {
        let solver = AdamSolver::with_defaults();
        assert!(solver.solve(quadratic(0.0), f64::NAN).is_err());
    }

    // ========================================
    // Reproducibility Tests
    // ========================================

    #[test]
    fn test_solve_is_deterministic() {
        let solver = AdamSolver::with_defaults();
        let a = solver.solve(quadratic(4.0), 0.5).unwrap();
        let b = solver.solve(quadratic(4.0), 0.5).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_stop_reason_display() {
        assert_eq!(format!("{}", StopReason::Converged), "converged");
        assert_eq!(
            format!("{}", StopReason::NumericalInstability),
            "numerical instability"
        );
    }
}
