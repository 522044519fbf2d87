//! Pasquill-Gifford stability classification.
//!
//! Maps wind speed and an optional insolation/cloud proxy to a discrete
//! stability class via the classic Pasquill lookup table. There are no
//! learned parameters; the table is fixed.

use plume_core::types::{InputError, Insolation, StabilityClass};

use StabilityClass::{A, B, C, D, E, F};

/// Wind-speed bin edges (m/s) for the Pasquill table.
const SPEED_BINS: [f64; 4] = [2.0, 3.0, 5.0, 6.0];

/// Classification table indexed by `[speed_bin][insolation]`, insolation
/// columns ordered Strong, Moderate, Slight, NightOvercast, NightClear.
/// Dual-class table entries (e.g. A-B) are resolved to the more stable
/// letter so the classifier stays deterministic.
const PASQUILL_TABLE: [[StabilityClass; 5]; 5] = [
    [A, B, B, E, F], // < 2 m/s
    [B, B, C, E, F], // 2-3 m/s
    [B, C, C, D, E], // 3-5 m/s
    [C, D, D, D, D], // 5-6 m/s
    [C, D, D, D, D], // >= 6 m/s
];

/// Classifier from wind speed and insolation to a stability class.
///
/// # Examples
/// ```
/// use plume_models::StabilityClassifier;
/// use plume_core::types::{Insolation, StabilityClass};
///
/// let classifier = StabilityClassifier::default();
///
/// // Low wind under strong sun: very unstable
/// let class = classifier.classify(1.0, Some(Insolation::StrongDaytime)).unwrap();
/// assert_eq!(class, StabilityClass::A);
///
/// // Low wind on a clear night: stable
/// let class = classifier.classify(1.0, Some(Insolation::NightClear)).unwrap();
/// assert_eq!(class, StabilityClass::F);
///
/// // No insolation information: neutral wind-only mapping
/// let class = classifier.classify(4.5, None).unwrap();
/// assert_eq!(class, StabilityClass::D);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct StabilityClassifier;

impl StabilityClassifier {
    /// Classify from wind speed and an optional insolation proxy.
    ///
    /// Very high wind speeds clamp into the top bin rather than erroring,
    /// since extreme wind only changes dispersion smoothly. Negative or
    /// non-finite speed is rejected.
    ///
    /// # Errors
    /// - `InputError::NonFiniteWind` for NaN/Inf speed
    /// - `InputError::NegativeWindSpeed` for speed < 0
    pub fn classify(
        &self,
        wind_speed_ms: f64,
        insolation: Option<Insolation>,
    ) -> Result<StabilityClass, InputError> {
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

        match insolation {
            Some(insolation) => {
                let row = SPEED_BINS
                    .iter()
                    .position(|&edge| wind_speed_ms < edge)
                    .unwrap_or(SPEED_BINS.len());
                let column = match insolation {
                    Insolation::StrongDaytime => 0,
                    Insolation::ModerateDaytime => 1,
                    Insolation::SlightDaytime => 2,
                    Insolation::NightOvercast => 3,
                    Insolation::NightClear => 4,
                };
                Ok(PASQUILL_TABLE[row][column])
            }
            // Neutral wind-only fallback: light winds mix convectively,
            // strong winds shear into stability.
            None => Ok(if wind_speed_ms < 2.0 {
                B
            } else if wind_speed_ms < 4.0 {
                C
            } else if wind_speed_ms < 6.0 {
                D
            } else {
                E
            }),
        }
    }
}
