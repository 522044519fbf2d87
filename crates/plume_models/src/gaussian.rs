//! Steady-state Gaussian plume forward model.
//!
//! ## Mathematical Formula
//!
//! ```text
//! C(x,y,z) = Q / (2π u σ_y σ_z) · exp(−y²/(2σ_y²))
//!            · [exp(−(z−H)²/(2σ_z²)) + exp(−(z+H)²/(2σ_z²))]
//! ```
//!
//! Where:
//! - `Q` = emission rate (kg/s)
//! - `u` = wind speed along the downwind axis (m/s)
//! - `σ_y`, `σ_z` = dispersion coefficients (m) at downwind distance x
//! - `H` = effective source height (m)
//!
//! The second vertical term reflects the plume off the ground. The formula
//! is linear in `Q`, which makes `∂C/∂Q = C/Q` exact; the inversion never
//! needs finite differences or an autodiff layer.

use std::f64::consts::PI;

use plume_core::types::{InputError, Receptor, SourceGeometry, StabilityClass};

use crate::dispersion::DispersionModel;

/// Gaussian plume forward model for one inversion run.
///
/// Holds the source geometry, transport wind speed, and the dispersion
/// model for the resolved stability class. Receptors strictly upwind of the
/// source (non-positive downwind distance) predict exactly zero; the
/// dispersion power law is never evaluated there.
///
/// # Examples
/// ```
/// use plume_core::types::{Receptor, SourceGeometry, StabilityClass};
/// use plume_models::GaussianPlumeModel;
///
/// let geometry = SourceGeometry::new(5.0).unwrap();
/// let model = GaussianPlumeModel::new(geometry, 3.0, StabilityClass::D).unwrap();
///
/// let downwind = Receptor::at_ground(500.0, 0.0);
/// let upwind = Receptor::at_ground(-500.0, 0.0);
///
/// assert!(model.concentration(&downwind, 0.014) > 0.0);
/// assert_eq!(model.concentration(&upwind, 0.014), 0.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GaussianPlumeModel {
    geometry: SourceGeometry,
    wind_speed_ms: f64,
    dispersion: DispersionModel,
}

impl GaussianPlumeModel {
    /// Transport speed floor (m/s). Near-calm air still advects a plume; the
    /// formula diverges as u → 0, so the effective speed is floored here.
    pub const MIN_WIND_SPEED_MS: f64 = 0.5;

    /// Creates a forward model.
    ///
    /// # Arguments
    /// * `geometry` - Validated source geometry
    /// * `wind_speed_ms` - Wind speed along the downwind axis (finite, >= 0)
    /// * `class` - Stability class driving the dispersion coefficients
    ///
    /// # Errors
    /// - `InputError::NonFiniteWind` / `InputError::NegativeWindSpeed` on a
    ///   bad wind speed
    pub fn new(
        geometry: SourceGeometry,
        wind_speed_ms: f64,
        class: StabilityClass,
    ) -> Result<Self, InputError> {
        if !wind_speed_ms.is_finite() {
            return Err(InputError::NonFiniteWind {
                value: wind_speed_ms,
            });
        }
        if wind_speed_ms < 0.0 {
            return Err(InputError::NegativeWindSpeed {
                speed: wind_speed_ms,
            });
        }

        Ok(Self {
            geometry,
            wind_speed_ms,
            dispersion: DispersionModel::new(class),
        })
    }

    /// The source geometry.
    #[inline]
    pub fn geometry(&self) -> &SourceGeometry {
        &self.geometry
    }

    /// The dispersion model in use.
    #[inline]
    pub fn dispersion(&self) -> &DispersionModel {
        &self.dispersion
    }

    /// Effective transport speed after flooring (m/s).
    #[inline]
    pub fn effective_wind_speed_ms(&self) -> f64 {
        self.wind_speed_ms.max(Self::MIN_WIND_SPEED_MS)
    }

    /// Predicted concentration (kg/m³) at one receptor for emission rate
    /// `q_kg_s`.
    ///
    /// Exactly zero when the receptor is at or upwind of the source.
    pub fn concentration(&self, receptor: &Receptor, q_kg_s: f64) -> f64 {
        q_kg_s * self.unit_concentration(receptor)
    }

    /// Predicted concentration per unit emission rate (s/m³).
    ///
    /// The plume equation is linear in Q, so a full prediction is
    /// `q * unit_concentration(r)`; the optimiser precomputes these unit
    /// values once per run.
    pub fn unit_concentration(&self, receptor: &Receptor) -> f64 {
        let dx = receptor.downwind_m - self.geometry.origin_x_m();
        if dx <= 0.0 {
            return 0.0;
        }

        let dy = receptor.crosswind_m
            - self.geometry.origin_y_m()
            - self.geometry.centerline_offset_m();
        let z = receptor.height_m;
        let h = self.geometry.stack_height_m();

        let sy = self.dispersion.sigma_y(dx);
        let sz = self.dispersion.sigma_z(dx);
        let u = self.effective_wind_speed_ms();

        let lateral = (-dy * dy / (2.0 * sy * sy)).exp();
        let vertical = (-(z - h) * (z - h) / (2.0 * sz * sz)).exp()
            + (-(z + h) * (z + h) / (2.0 * sz * sz)).exp();

        lateral * vertical / (2.0 * PI * u * sy * sz)
    }

    /// Predicted concentrations for a full receptor vector, aligned with the
    /// input ordering.
    pub fn concentrations(&self, receptors: &[Receptor], q_kg_s: f64) -> Vec<f64> {
        receptors
            .iter()
            .map(|r| self.concentration(r, q_kg_s))
            .collect()
    }

    /// Unit concentrations (Q = 1 kg/s) for a full receptor vector.
    pub fn unit_concentrations(&self, receptors: &[Receptor]) -> Vec<f64> {
        receptors.iter().map(|r| self.unit_concentration(r)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    fn model(speed: f64, class: StabilityClass) -> GaussianPlumeModel {
        let geometry = SourceGeometry::new(5.0).unwrap();
        GaussianPlumeModel::new(geometry, speed, class).unwrap()
    }

    // ========================================
    // Guard Tests
    // ========================================

    #[test]
    fn test_upwind_receptor_is_exactly_zero() {
        let m = model(3.0, StabilityClass::D);
        assert_eq!(m.concentration(&Receptor::at_ground(0.0, 0.0), 1.0), 0.0);
        assert_eq!(m.concentration(&Receptor::at_ground(-100.0, 0.0), 1.0), 0.0);
    }

    #[test]
    fn test_denormal_downwind_distance_stays_finite() {
        // Positive but denormal dx must not reach the σ power law as a zero
        // and produce 0/0; the prediction stays finite and non-negative, and
        // a zero-sensitivity upwind check never sees NaN.
        let m = model(3.0, StabilityClass::D);
        let c = m.unit_concentration(&Receptor::at_ground(1e-321, 0.0));
        assert!(c.is_finite());
        assert!(c >= 0.0);
    }

    #[test]
    fn test_rejects_invalid_wind() {
        let geometry = SourceGeometry::new(5.0).unwrap();
        assert!(GaussianPlumeModel::new(geometry.clone(), -1.0, StabilityClass::D).is_err());
        assert!(GaussianPlumeModel::new(geometry, f64::NAN, StabilityClass::D).is_err());
    }

    #[test]
    fn test_wind_speed_floor() {
        // Near-calm air uses the floored transport speed.
        let calm = model(0.0, StabilityClass::D);
        let floor = model(GaussianPlumeModel::MIN_WIND_SPEED_MS, StabilityClass::D);
        let r = Receptor::at_ground(500.0, 10.0);
        assert_relative_eq!(
            calm.concentration(&r, 0.01),
            floor.concentration(&r, 0.01),
            max_relative = 1e-12
        );
    }

    // ========================================
    // Formula Tests
    // ========================================

    #[test]
    fn test_known_centerline_value() {
        // Hand-computed: u=3, class D, H=5, x=1000 m, y=0, z=0.
        // sy=80, sz=60, prefactor = 1/(2π·3·80·60),
        // vertical = 2·exp(−25/7200), lateral = 1.
        let m = model(3.0, StabilityClass::D);
        let r = Receptor::at_ground(1000.0, 0.0);
        let expected = 2.0 * (-25.0_f64 / 7200.0).exp()
            / (2.0 * std::f64::consts::PI * 3.0 * 80.0 * 60.0);
        assert_relative_eq!(m.unit_concentration(&r), expected, max_relative = 1e-12);
    }

    #[test]
    fn test_linearity_in_q() {
        let m = model(3.0, StabilityClass::D);
        let r = Receptor::at_ground(750.0, 40.0);
        let c1 = m.concentration(&r, 0.01);
        let c2 = m.concentration(&r, 0.02);
        assert_relative_eq!(c2, 2.0 * c1, max_relative = 1e-12);
    }

    #[test]
    fn test_crosswind_symmetry() {
        let m = model(3.0, StabilityClass::C);
        let left = Receptor::at_ground(600.0, -35.0);
        let right = Receptor::at_ground(600.0, 35.0);
        assert_relative_eq!(
            m.unit_concentration(&left),
            m.unit_concentration(&right),
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_centerline_offset_shifts_peak() {
        let geometry = SourceGeometry::new(5.0).unwrap().with_centerline_offset(50.0);
        let m = GaussianPlumeModel::new(geometry, 3.0, StabilityClass::D).unwrap();
        let on_axis = m.unit_concentration(&Receptor::at_ground(600.0, 50.0));
        let off_axis = m.unit_concentration(&Receptor::at_ground(600.0, 0.0));
        assert!(on_axis > off_axis);
    }

    #[test]
    fn test_batch_alignment() {
        let m = model(3.0, StabilityClass::D);
        let receptors = vec![
            Receptor::at_ground(-100.0, 0.0),
            Receptor::at_ground(500.0, 0.0),
            Receptor::at_ground(1500.0, 20.0),
        ];
        let batch = m.concentrations(&receptors, 0.014);
        assert_eq!(batch.len(), 3);
        for (c, r) in batch.iter().zip(&receptors) {
            assert_eq!(*c, m.concentration(r, 0.014));
        }
        assert_eq!(batch[0], 0.0);
    }

    // ========================================
    // Property Tests
    // ========================================

    proptest! {
        #[test]
        fn test_concentration_never_negative(
            x in -2000.0_f64..5000.0,
            y in -1000.0_f64..1000.0,
            z in 0.0_f64..50.0,
            q in 0.0_f64..1.0,
        ) {
            let m = model(3.0, StabilityClass::D);
            let c = m.concentration(&Receptor::new(x, y, z), q);
            prop_assert!(c >= 0.0);
            prop_assert!(c.is_finite());
        }

        #[test]
        fn test_stable_air_concentrates_centerline(x in 500.0_f64..5000.0) {
            // Narrower spread under stable air means higher centerline
            // concentration at the same distance and emission rate.
            let neutral = model(3.0, StabilityClass::D);
            let stable = model(3.0, StabilityClass::F);
            let r = Receptor::new(x, 0.0, 5.0);
            prop_assert!(stable.unit_concentration(&r) > neutral.unit_concentration(&r));
        }
    }
}
