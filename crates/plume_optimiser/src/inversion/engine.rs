//! The emission-rate inversion engine.
//!
//! ## Pipeline
//!
//! 1. Resolve the stability class (supplied with the wind, or classified
//!    from wind speed).
//! 2. Build the forward model and precompute the unit concentration at
//!    every receptor; the plume equation is linear in Q, so this is the
//!    whole Jacobian.
//! 3. Short-circuit degenerate scenes: no downwind receptor is an error,
//!    an all-zero observation set is a zero-rate result.
//! 4. Scale observations by their peak so the loss is well conditioned
//!    across sites whose concentrations span orders of magnitude.
//! 5. Fit θ = ln Q with Adam from an adaptive initial guess obtained by
//!    inverting the forward formula at the strongest receptor.
//! 6. Attach a Gauss-Newton confidence interval, widened when the solve
//!    did not converge.

use std::time::Instant;

use tracing::{debug, warn};

use plume_core::math::solvers::AdamSolver;
use plume_core::types::{ObservationSet, SourceGeometry, WindData};
use plume_models::{GaussianPlumeModel, StabilityClassifier};

use super::confidence::ConfidenceEstimator;
use super::config::InverterConfig;
use super::error::InversionError;
use super::result::{InversionDiagnostics, InversionResult};

const SECONDS_PER_HOUR: f64 = 3600.0;

/// One batch item: the inputs for a single independent inversion.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InversionRun {
    /// Observed concentrations in the wind-aligned frame.
    pub observations: ObservationSet,
    /// Meteorology at the observation time.
    pub wind: WindData,
    /// Source geometry.
    pub geometry: SourceGeometry,
}

/// Emission-rate inversion engine.
///
/// Stateless between runs: one inverter can serve sequential or parallel
/// call sites without interference.
///
/// # Examples
/// ```
/// use plume_core::types::{SourceGeometry, StabilityClass, WindData};
/// use plume_models::observation::SyntheticSceneConfig;
/// use plume_optimiser::PlumeInverter;
///
/// let scene = SyntheticSceneConfig::default().noiseless().generate().unwrap();
/// let wind = WindData::new(3.0, 270.0).unwrap().with_stability(StabilityClass::D);
/// let geometry = SourceGeometry::new(5.0).unwrap();
///
/// let result = PlumeInverter::with_defaults()
///     .invert(&scene.observations, &wind, &geometry)
///     .unwrap();
/// assert!(result.converged);
/// ```
#[derive(Debug, Clone)]
pub struct PlumeInverter {
    config: InverterConfig,
}

impl PlumeInverter {
    /// Creates an inverter with the given configuration.
    pub fn new(config: InverterConfig) -> Self {
        Self { config }
    }

    /// Creates an inverter with default configuration.
    pub fn with_defaults() -> Self {
        Self {
            config: InverterConfig::default(),
        }
    }

    /// The active configuration.
    pub fn config(&self) -> &InverterConfig {
        &self.config
    }

    /// Estimates the emission rate for one observation set.
    ///
    /// # Errors
    /// - [`InversionError::InvalidInput`] if wind, geometry, or observations
    ///   fail validation
    /// - [`InversionError::NoDownwindReceptor`] if the forward model predicts
    ///   zero at every receptor
    /// - [`InversionError::Solver`] if the configuration is unusable or the
    ///   objective is non-finite at the starting point
    pub fn invert(
        &self,
        observations: &ObservationSet,
        wind: &WindData,
        geometry: &SourceGeometry,
    ) -> Result<InversionResult, InversionError> {
        self.config.validate()?;

        let class = match wind.stability_class() {
            Some(class) => class,
            None => StabilityClassifier::default().classify(wind.speed_ms(), None)?,
        };
        let speed = wind.speed_ms() * self.config.wind_speed_factor;
        let model = GaussianPlumeModel::new(geometry.clone(), speed, class)?;

        let unit = model.unit_concentrations(observations.receptors());
        if unit.iter().all(|&k| k <= 0.0) {
            return Err(InversionError::NoDownwindReceptor);
        }

        let (_, peak_obs) = observations.peak();
        if peak_obs <= 0.0 {
            debug!(stability = %class, "all observations zero, reporting zero rate");
            return Ok(InversionResult::zero_emission(
                class,
                self.config.solver.learning_rate,
            ));
        }

        let scale = 1.0 / peak_obs;
        let scaled_obs: Vec<f64> = observations
            .concentrations()
            .iter()
            .map(|&o| o * scale)
            .collect();

        let q0 = initial_guess_kg_s(&unit, observations.concentrations(), peak_obs);
        let theta0 = q0.ln();
        debug!(
            initial_guess_kg_hr = q0 * SECONDS_PER_HOUR,
            stability = %class,
            receptors = observations.len(),
            "starting inversion"
        );

        // Mean squared residual over scaled observations. ∂C/∂θ = C under
        // the log parameterisation, so the gradient is a residual-weighted
        // sum of the predictions themselves.
        let n = scaled_obs.len() as f64;
        let objective = |theta: f64| {
            let q = theta.exp();
            let mut loss = 0.0;
            let mut grad = 0.0;
            for (&k, &o) in unit.iter().zip(&scaled_obs) {
                let c = q * k * scale;
                let r = c - o;
                loss += r * r;
                grad += r * c;
            }
            (loss / n, 2.0 * grad / n)
        };

        let deadline = self.config.time_budget.map(|budget| Instant::now() + budget);
        let solver = AdamSolver::new(self.config.solver);
        let fit = solver.solve_with_deadline(objective, theta0, deadline)?;

        if fit.instability_events > 0 {
            warn!(
                events = fit.instability_events,
                "recovered from unstable solver steps"
            );
        }
        if !fit.converged {
            warn!(stop_reason = %fit.stop_reason, "inversion did not converge");
        }

        let q_kg_s = fit.param.exp();
        let q_kg_hr = q_kg_s * SECONDS_PER_HOUR;

        let predictions: Vec<f64> = unit.iter().map(|&k| q_kg_s * k * scale).collect();
        let band = ConfidenceEstimator::new(
            self.config.confidence_z,
            self.config.interval_clamp_factor,
        )
        .interval(q_kg_hr, &predictions, &scaled_obs, fit.converged);

        debug!(
            q_kg_hr,
            converged = fit.converged,
            iterations = fit.iterations,
            "inversion finished"
        );

        Ok(InversionResult {
            q_kg_hr,
            confidence_interval: (band.lower_kg_hr, band.upper_kg_hr),
            converged: fit.converged,
            iterations_used: fit.iterations,
            relative_error_estimate: band.relative_error,
            diagnostics: InversionDiagnostics {
                final_loss: fit.loss,
                stop_reason: fit.stop_reason,
                instability_events: fit.instability_events,
                initial_guess_kg_hr: q0 * SECONDS_PER_HOUR,
                stability_class: class,
                final_learning_rate: fit.final_learning_rate,
            },
        })
    }

    /// Runs a batch of independent inversions, results aligned with the
    /// input ordering. With the `parallel` feature the batch is dispatched
    /// across the rayon pool; each run is already self-contained.
    #[cfg(feature = "parallel")]
    pub fn invert_batch(
        &self,
        runs: &[InversionRun],
    ) -> Vec<Result<InversionResult, InversionError>> {
        use rayon::prelude::*;
        runs.par_iter()
            .map(|run| self.invert(&run.observations, &run.wind, &run.geometry))
            .collect()
    }

    /// Runs a batch of independent inversions, results aligned with the
    /// input ordering.
    #[cfg(not(feature = "parallel"))]
    pub fn invert_batch(
        &self,
        runs: &[InversionRun],
    ) -> Vec<Result<InversionResult, InversionError>> {
        runs.iter()
            .map(|run| self.invert(&run.observations, &run.wind, &run.geometry))
            .collect()
    }
}

/// Inverts the forward formula at the strongest receptor the model can see.
///
/// Starting near the answer instead of at an arbitrary constant keeps the
/// solve out of the flat far tail of the loss, where a fixed guess several
/// orders of magnitude off is known to stall.
fn initial_guess_kg_s(unit: &[f64], observations: &[f64], peak_obs: f64) -> f64 {
    let mut best: Option<(f64, f64)> = None;
    let mut k_max = 0.0_f64;
    for (&k, &o) in unit.iter().zip(observations) {
        if k > 0.0 {
            k_max = k_max.max(k);
            if best.map_or(true, |(bo, _)| o > bo) {
                best = Some((o, k));
            }
        }
    }
    match best {
        Some((o, k)) if o > 0.0 => o / k,
        // Signal only at upwind receptors: start from what the overall peak
        // would imply at the most sensitive downwind receptor.
        _ => peak_obs / k_max,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use plume_core::math::solvers::{AdamConfig, StopReason};
    use plume_core::types::{Receptor, StabilityClass};

    fn scene(q_kg_s: f64) -> (ObservationSet, WindData, SourceGeometry) {
        let geometry = SourceGeometry::new(5.0).unwrap();
        let model =
            GaussianPlumeModel::new(geometry.clone(), 3.0, StabilityClass::D).unwrap();
        let receptors: Vec<Receptor> = [200.0, 500.0, 900.0, 1500.0, 2400.0]
            .iter()
            .flat_map(|&x| {
                [-120.0, 0.0, 150.0]
                    .iter()
                    .map(move |&y| Receptor::at_ground(x, y))
            })
            .collect();
        let concentrations = model.concentrations(&receptors, q_kg_s);
        let observations = ObservationSet::new(receptors, concentrations).unwrap();
        let wind = WindData::new(3.0, 270.0)
            .unwrap()
            .with_stability(StabilityClass::D);
        (observations, wind, geometry)
    }

    // ========================================
    // Recovery Tests
    // ========================================

    #[test]
    fn test_recovers_known_rate_from_consistent_observations() {
        let true_q = 0.014;
        let (observations, wind, geometry) = scene(true_q);
        let result = PlumeInverter::with_defaults()
            .invert(&observations, &wind, &geometry)
            .unwrap();

        assert!(result.converged);
        let rel = (result.q_kg_s() - true_q).abs() / true_q;
        assert!(rel < 0.05, "relative error {} too large", rel);
        assert!(result.confidence_interval.0 <= result.q_kg_hr);
        assert!(result.q_kg_hr <= result.confidence_interval.1);
    }

    #[test]
    fn test_initial_guess_lands_near_truth() {
        let true_q = 0.014;
        let (observations, wind, geometry) = scene(true_q);
        let result = PlumeInverter::with_defaults()
            .invert(&observations, &wind, &geometry)
            .unwrap();

        let guess_kg_s = result.diagnostics.initial_guess_kg_hr / SECONDS_PER_HOUR;
        let rel = (guess_kg_s - true_q).abs() / true_q;
        assert!(rel < 1e-9, "guess off by {}", rel);
    }

    #[test]
    fn test_invert_is_deterministic() {
        let (observations, wind, geometry) = scene(0.02);
        let inverter = PlumeInverter::with_defaults();
        let a = inverter.invert(&observations, &wind, &geometry).unwrap();
        let b = inverter.invert(&observations, &wind, &geometry).unwrap();
        assert_eq!(a, b);
    }

    // ========================================
    // Degenerate Scene Tests
    // ========================================

    #[test]
    fn test_all_zero_observations_report_zero_rate() {
        let (observations, wind, geometry) = scene(0.014);
        let zeros =
            ObservationSet::new(observations.receptors().to_vec(), vec![0.0; observations.len()])
                .unwrap();
        let result = PlumeInverter::with_defaults()
            .invert(&zeros, &wind, &geometry)
            .unwrap();

        assert_eq!(result.q_kg_hr, 0.0);
        assert!(result.converged);
        assert_eq!(result.iterations_used, 0);
        assert_eq!(result.confidence_interval, (0.0, 0.0));
    }

    #[test]
    fn test_all_upwind_receptors_is_an_error() {
        let receptors = vec![
            Receptor::at_ground(-500.0, 0.0),
            Receptor::at_ground(-100.0, 50.0),
        ];
        let observations = ObservationSet::new(receptors, vec![1e-6, 2e-6]).unwrap();
        let wind = WindData::new(3.0, 270.0)
            .unwrap()
            .with_stability(StabilityClass::D);
        let geometry = SourceGeometry::new(5.0).unwrap();

        let err = PlumeInverter::with_defaults()
            .invert(&observations, &wind, &geometry)
            .unwrap_err();
        assert_eq!(err, InversionError::NoDownwindReceptor);
    }

    // ========================================
    // Stability Resolution Tests
    // ========================================

    #[test]
    fn test_classifies_from_wind_when_no_class_supplied() {
        let (observations, _, geometry) = scene(0.014);
        let wind = WindData::new(3.0, 270.0).unwrap();
        let result = PlumeInverter::with_defaults()
            .invert(&observations, &wind, &geometry)
            .unwrap();

        // Wind-only mapping puts 3 m/s in class C.
        assert_eq!(result.diagnostics.stability_class, StabilityClass::C);
    }

    #[test]
    fn test_supplied_class_wins_over_classifier() {
        let (observations, wind, geometry) = scene(0.014);
        let result = PlumeInverter::with_defaults()
            .invert(&observations, &wind, &geometry)
            .unwrap();
        assert_eq!(result.diagnostics.stability_class, StabilityClass::D);
    }

    // ========================================
    // Budget / Cap Tests
    // ========================================

    #[test]
    fn test_zero_time_budget_returns_best_seen() {
        let (observations, wind, geometry) = scene(0.014);
        let config = InverterConfig::default().with_time_budget(Duration::ZERO);
        let result = PlumeInverter::new(config)
            .invert(&observations, &wind, &geometry)
            .unwrap();

        assert!(!result.converged);
        assert_eq!(result.diagnostics.stop_reason, StopReason::BudgetExhausted);
        assert_eq!(result.iterations_used, 0);
        assert!(result.q_kg_hr.is_finite() && result.q_kg_hr > 0.0);
    }

    #[test]
    fn test_iteration_cap_flags_non_convergence() {
        // Cap below warm-up: the criterion can never fire, so the run must
        // come back flagged with a usable best-seen estimate.
        let (observations, wind, geometry) = scene(0.014);
        let config = InverterConfig::default().with_solver(AdamConfig {
            max_iterations: 10,
            warmup_iterations: 50,
            ..Default::default()
        });
        let result = PlumeInverter::new(config)
            .invert(&observations, &wind, &geometry)
            .unwrap();

        assert!(!result.converged);
        assert_eq!(result.diagnostics.stop_reason, StopReason::IterationCap);
        assert_eq!(result.iterations_used, 10);
        assert!(result.q_kg_hr.is_finite() && result.q_kg_hr > 0.0);
        assert!(result.relative_error_estimate > 0.0 || result.diagnostics.final_loss == 0.0);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let (observations, wind, geometry) = scene(0.014);
        let config = InverterConfig::default().with_wind_speed_factor(0.0);
        let err = PlumeInverter::new(config)
            .invert(&observations, &wind, &geometry)
            .unwrap_err();
        assert!(matches!(err, InversionError::Solver(_)));
    }

    // ========================================
    // Batch Tests
    // ========================================

    #[test]
    fn test_batch_matches_serial() {
        let (observations, wind, geometry) = scene(0.014);
        let runs = vec![
            InversionRun {
                observations: observations.clone(),
                wind: wind.clone(),
                geometry: geometry.clone(),
            },
            InversionRun {
                observations: observations.clone(),
                wind: wind.clone(),
                geometry: geometry.clone(),
            },
        ];
        let inverter = PlumeInverter::with_defaults();
        let batch = inverter.invert_batch(&runs);
        let serial = inverter.invert(&observations, &wind, &geometry).unwrap();

        assert_eq!(batch.len(), 2);
        for item in batch {
            assert_eq!(item.unwrap(), serial);
        }
    }

    // ========================================
    // Initial Guess Tests
    // ========================================

    #[test]
    fn test_initial_guess_prefers_strongest_downwind_receptor() {
        let unit = [0.0, 2.0, 4.0];
        let obs = [9.0, 6.0, 1.0];
        // Receptor 0 has the overall peak but no model sensitivity; the
        // guess must come from receptor 1.
        assert_eq!(initial_guess_kg_s(&unit, &obs, 9.0), 3.0);
    }

    #[test]
    fn test_initial_guess_falls_back_to_most_sensitive() {
        let unit = [0.0, 2.0, 4.0];
        let obs = [9.0, 0.0, 0.0];
        assert_eq!(initial_guess_kg_s(&unit, &obs, 9.0), 9.0 / 4.0);
    }
}
