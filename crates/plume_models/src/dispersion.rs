//! Briggs power-law dispersion coefficients.
//!
//! For a stability class and a downwind distance `x`, the plume spread is
//!
//! ```text
//! σ_y(x) = a · x_km^b · 1000      σ_z(x) = c · x_km^d · 1000
//! ```
//!
//! with class-specific coefficients (distance in km, σ in m). Both spreads
//! grow strictly monotonically with distance, and unstable classes spread
//! wider than stable ones at any fixed distance.

use plume_core::types::StabilityClass;

/// Power-law coefficients for one stability class.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BriggsCoefficients {
    /// Horizontal scale factor.
    pub a: f64,
    /// Horizontal distance exponent.
    pub b: f64,
    /// Vertical scale factor.
    pub c: f64,
    /// Vertical distance exponent.
    pub d: f64,
}

impl BriggsCoefficients {
    /// Coefficients for a Pasquill-Gifford class.
    pub fn for_class(class: StabilityClass) -> Self {
        // a, b, c, d ordered most unstable (A) to most stable (F)
        match class {
            StabilityClass::A => Self::new(0.22, 0.894, 0.20, 0.894),
            StabilityClass::B => Self::new(0.16, 0.894, 0.12, 0.894),
            StabilityClass::C => Self::new(0.11, 0.894, 0.08, 0.894),
            StabilityClass::D => Self::new(0.08, 0.894, 0.06, 0.894),
            StabilityClass::E => Self::new(0.06, 0.894, 0.03, 0.894),
            StabilityClass::F => Self::new(0.04, 0.894, 0.016, 0.894),
        }
    }

    const fn new(a: f64, b: f64, c: f64, d: f64) -> Self {
        Self { a, b, c, d }
    }
}

/// Dispersion coefficient model for a fixed stability class.
///
/// Valid for strictly positive downwind distance; the forward model guards
/// the `x <= 0` case and never evaluates σ there. Distances under
/// [`DispersionModel::MIN_DOWNWIND_M`] are held at the floor value so that
/// σ stays strictly positive even where `x / 1000` would underflow to zero.
///
/// # Examples
/// ```
/// use plume_models::DispersionModel;
/// use plume_core::types::StabilityClass;
///
/// let model = DispersionModel::new(StabilityClass::D);
/// let near = model.sigma_y(200.0);
/// let far = model.sigma_y(2000.0);
/// assert!(near > 0.0 && near < far);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DispersionModel {
    class: StabilityClass,
    coefficients: BriggsCoefficients,
}

impl DispersionModel {
    /// Near-field floor (m). The power law is evaluated at this distance for
    /// anything closer in; the plume formula has no meaning at sub-metre
    /// range and a denormal distance would underflow σ to zero.
    pub const MIN_DOWNWIND_M: f64 = 1.0;

    /// Creates a dispersion model for the given stability class.
    pub fn new(class: StabilityClass) -> Self {
        Self {
            class,
            coefficients: BriggsCoefficients::for_class(class),
        }
    }

    /// The stability class this model was built for.
    #[inline]
    pub fn class(&self) -> StabilityClass {
        self.class
    }

    /// The underlying power-law coefficients.
    #[inline]
    pub fn coefficients(&self) -> &BriggsCoefficients {
        &self.coefficients
    }

    /// Horizontal plume spread σ_y (m) at downwind distance `x` (m, > 0).
    pub fn sigma_y(&self, downwind_m: f64) -> f64 {
        debug_assert!(downwind_m > 0.0, "sigma_y evaluated at x <= 0");
        let x_km = downwind_m.max(Self::MIN_DOWNWIND_M) / 1000.0;
        self.coefficients.a * x_km.powf(self.coefficients.b) * 1000.0
    }

    /// Vertical plume spread σ_z (m) at downwind distance `x` (m, > 0).
    pub fn sigma_z(&self, downwind_m: f64) -> f64 {
        debug_assert!(downwind_m > 0.0, "sigma_z evaluated at x <= 0");
        let x_km = downwind_m.max(Self::MIN_DOWNWIND_M) / 1000.0;
        self.coefficients.c * x_km.powf(self.coefficients.d) * 1000.0
    }
}
