//! Wind conditions for one inversion run.
//!
//! Meteorology is supplied by an external collaborator; this type validates
//! it once and stays immutable for the duration of the run. A missing wind
//! speed is the caller's error to surface; there is no zero default here.

use super::error::InputError;
use super::stability::StabilityClass;

/// Wind conditions at the source at the observation time.
///
/// Direction follows the meteorological convention: degrees from north that
/// the wind is coming *from*. The stability class is optional; when absent
/// the inversion engine classifies from wind speed.
///
/// # Examples
/// ```
/// use plume_core::types::{StabilityClass, WindData};
///
/// let wind = WindData::new(3.0, 270.0)
///     .unwrap()
///     .with_stability(StabilityClass::D);
/// assert_eq!(wind.speed_ms(), 3.0);
/// assert_eq!(wind.stability_class(), Some(StabilityClass::D));
///
/// // Negative speed is rejected, not defaulted
/// assert!(WindData::new(-1.0, 0.0).is_err());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WindData {
    speed_ms: f64,
    direction_deg: f64,
    stability_class: Option<StabilityClass>,
}

impl WindData {
    /// Creates validated wind data.
    ///
    /// # Arguments
    /// * `speed_ms` - Wind speed in m/s (must be finite and >= 0)
    /// * `direction_deg` - Direction the wind comes from, degrees from north
    ///   (normalised into [0, 360))
    ///
    /// # Errors
    /// - `InputError::NonFiniteWind` if speed or direction is NaN/Inf
    /// - `InputError::NegativeWindSpeed` if speed < 0
    pub fn new(speed_ms: f64, direction_deg: f64) -> Result<Self, InputError> {
        if !speed_ms.is_finite() {
            return Err(InputError::NonFiniteWind { value: speed_ms });
        }
        if !direction_deg.is_finite() {
            return Err(InputError::NonFiniteWind {
                value: direction_deg,
            });
        }
        if speed_ms < 0.0 {
            return Err(InputError::NegativeWindSpeed { speed: speed_ms });
        }

        Ok(Self {
            speed_ms,
            direction_deg: direction_deg.rem_euclid(360.0),
            stability_class: None,
        })
    }

    /// Attaches a pre-determined stability class.
    pub fn with_stability(mut self, class: StabilityClass) -> Self {
        self.stability_class = Some(class);
        self
    }

    /// Wind speed in m/s.
    #[inline]
    pub fn speed_ms(&self) -> f64 {
        self.speed_ms
    }

    /// Direction the wind comes from, degrees from north in [0, 360).
    #[inline]
    pub fn direction_deg(&self) -> f64 {
        self.direction_deg
    }

    /// Stability class, if one was supplied by the meteorology collaborator.
    #[inline]
    pub fn stability_class(&self) -> Option<StabilityClass> {
        self.stability_class
    }

    /// Eastward wind component (m/s).
    pub fn u_component(&self) -> f64 {
        -self.speed_ms * self.direction_deg.to_radians().sin()
    }

    /// Northward wind component (m/s).
    pub fn v_component(&self) -> f64 {
        -self.speed_ms * self.direction_deg.to_radians().cos()
    }
}
