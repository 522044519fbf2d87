//! Inverter configuration.

use std::time::Duration;

use plume_core::math::solvers::AdamConfig;
use plume_core::types::SolverError;

/// Configuration for a [`PlumeInverter`](super::PlumeInverter).
///
/// The solver settings are carried verbatim from `plume_core`; the fields
/// here govern the statistical layer around the solve.
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use plume_optimiser::InverterConfig;
///
/// let config = InverterConfig::default()
///     .with_time_budget(Duration::from_millis(200));
/// assert_eq!(config.confidence_z, 1.96);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InverterConfig {
    /// Solver settings for the log-rate fit.
    pub solver: AdamConfig,
    /// Normal quantile for the confidence interval (1.96 for 95 %).
    pub confidence_z: f64,
    /// Interval half-width cap as a multiplicative factor: the reported
    /// bounds never stray beyond `[Q / f, Q * f]`, keeping a degenerate
    /// residual structure from producing an absurd band.
    pub interval_clamp_factor: f64,
    /// Multiplier applied to the reported wind speed before the forward
    /// model sees it. The speed enters the plume equation only through the
    /// `1/u` prefactor, which is degenerate with Q, so this cannot be fitted
    /// from concentration data; it is a fixed site-calibration knob.
    pub wind_speed_factor: f64,
    /// Optional wall-clock budget for one inversion, enforced cooperatively
    /// by the solver every iteration.
    pub time_budget: Option<Duration>,
}

impl Default for InverterConfig {
    fn default() -> Self {
        Self {
            solver: AdamConfig::default(),
            confidence_z: 1.96,
            interval_clamp_factor: 10.0,
            wind_speed_factor: 1.0,
            time_budget: None,
        }
    }
}

impl InverterConfig {
    /// Configuration tuned for interactive latency.
    pub fn fast() -> Self {
        Self {
            solver: AdamConfig::fast(),
            ..Default::default()
        }
    }

    /// Configuration tuned for offline reprocessing accuracy.
    pub fn high_precision() -> Self {
        Self {
            solver: AdamConfig::high_precision(),
            ..Default::default()
        }
    }

    /// Sets the wall-clock budget.
    pub fn with_time_budget(mut self, budget: Duration) -> Self {
        self.time_budget = Some(budget);
        self
    }

    /// Sets the wind-speed calibration factor.
    pub fn with_wind_speed_factor(mut self, factor: f64) -> Self {
        self.wind_speed_factor = factor;
        self
    }

    /// Replaces the solver settings.
    pub fn with_solver(mut self, solver: AdamConfig) -> Self {
        self.solver = solver;
        self
    }

    pub(crate) fn validate(&self) -> Result<(), SolverError> {
        if !self.confidence_z.is_finite() || self.confidence_z <= 0.0 {
            return Err(SolverError::InvalidConfiguration(format!(
                "confidence_z must be positive, got {}",
                self.confidence_z
            )));
        }
        if !self.interval_clamp_factor.is_finite() || self.interval_clamp_factor <= 1.0 {
            return Err(SolverError::InvalidConfiguration(format!(
                "interval_clamp_factor must exceed 1, got {}",
                self.interval_clamp_factor
            )));
        }
        if !self.wind_speed_factor.is_finite() || self.wind_speed_factor <= 0.0 {
            return Err(SolverError::InvalidConfiguration(format!(
                "wind_speed_factor must be positive, got {}",
                self.wind_speed_factor
            )));
        }
        Ok(())
    }
}
