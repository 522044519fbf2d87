//! Inversion result types.

use plume_core::math::solvers::StopReason;
use plume_core::types::StabilityClass;

/// Outcome of one emission-rate inversion.
///
/// A result is produced even when the solve was capped or ran out of
/// budget; `converged` and the diagnostics say how much to trust it, and a
/// non-converged estimate carries a widened confidence interval.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InversionResult {
    /// Estimated emission rate (kg/hr). Best-seen, not last-iterate.
    pub q_kg_hr: f64,
    /// 95 % confidence interval on the rate, `(lower, upper)` in kg/hr.
    pub confidence_interval: (f64, f64),
    /// Whether the solver met its convergence criterion.
    pub converged: bool,
    /// Solver iterations performed.
    pub iterations_used: usize,
    /// Interval half-width relative to the estimate; a quick quality score
    /// for downstream consumers.
    pub relative_error_estimate: f64,
    /// Per-run diagnostics for operators and logs.
    pub diagnostics: InversionDiagnostics,
}

impl InversionResult {
    /// Estimated emission rate in kg/s.
    #[inline]
    pub fn q_kg_s(&self) -> f64 {
        self.q_kg_hr / 3600.0
    }

    /// Interval width in kg/hr.
    #[inline]
    pub fn interval_width_kg_hr(&self) -> f64 {
        self.confidence_interval.1 - self.confidence_interval.0
    }

    /// Result for a scene with no measured signal: the only rate consistent
    /// with all-zero observations is zero, reported without running the
    /// solver (the log parameterisation cannot represent it).
    pub(crate) fn zero_emission(class: StabilityClass, learning_rate: f64) -> Self {
        Self {
            q_kg_hr: 0.0,
            confidence_interval: (0.0, 0.0),
            converged: true,
            iterations_used: 0,
            relative_error_estimate: 0.0,
            diagnostics: InversionDiagnostics {
                final_loss: 0.0,
                stop_reason: StopReason::Converged,
                instability_events: 0,
                initial_guess_kg_hr: 0.0,
                stability_class: class,
                final_learning_rate: learning_rate,
            },
        }
    }
}

/// Diagnostics attached to every inversion result.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InversionDiagnostics {
    /// Loss at the reported parameter, in scaled observation units.
    pub final_loss: f64,
    /// Why the solver stopped.
    pub stop_reason: StopReason,
    /// NaN/Inf steps the solver recovered from.
    pub instability_events: usize,
    /// Adaptive initial guess the solve started from (kg/hr).
    pub initial_guess_kg_hr: f64,
    /// Stability class the run was dispersed with, whether supplied or
    /// classified from wind speed.
    pub stability_class: StabilityClass,
    /// Learning rate at the end of the solve.
    pub final_learning_rate: f64,
}
