//! Pasquill-Gifford atmospheric stability classes.
//!
//! Stability classes drive the dispersion coefficients of the Gaussian plume
//! model: unstable air (A) spreads a plume quickly, stable air (F) keeps it
//! narrow. The ordering of the enum follows increasing stability, so
//! `StabilityClass::A < StabilityClass::F`.

use std::fmt;
use std::str::FromStr;

use super::error::InputError;

/// Pasquill-Gifford stability class, ordered from most unstable (A) to most
/// stable (F).
///
/// # Examples
/// ```
/// use plume_core::types::StabilityClass;
///
/// assert!(StabilityClass::A.is_unstable());
/// assert!(StabilityClass::F.is_stable());
/// assert!(StabilityClass::B < StabilityClass::E);
/// assert_eq!(format!("{}", StabilityClass::D), "D");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StabilityClass {
    /// Very unstable.
    A,
    /// Unstable.
    B,
    /// Slightly unstable.
    C,
    /// Neutral.
    D,
    /// Slightly stable.
    E,
    /// Stable.
    F,
}

impl StabilityClass {
    /// All classes, most unstable first.
    pub const ALL: [StabilityClass; 6] = [
        StabilityClass::A,
        StabilityClass::B,
        StabilityClass::C,
        StabilityClass::D,
        StabilityClass::E,
        StabilityClass::F,
    ];

    /// Whether this class represents unstable air (A or B).
    pub fn is_unstable(self) -> bool {
        matches!(self, StabilityClass::A | StabilityClass::B)
    }

    /// Whether this class represents stable air (E or F).
    pub fn is_stable(self) -> bool {
        matches!(self, StabilityClass::E | StabilityClass::F)
    }

    /// Single-letter name of the class.
    pub fn as_str(self) -> &'static str {
        match self {
            StabilityClass::A => "A",
            StabilityClass::B => "B",
            StabilityClass::C => "C",
            StabilityClass::D => "D",
            StabilityClass::E => "E",
            StabilityClass::F => "F",
        }
    }
}

impl fmt::Display for StabilityClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StabilityClass {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "A" | "a" => Ok(StabilityClass::A),
            "B" | "b" => Ok(StabilityClass::B),
            "C" | "c" => Ok(StabilityClass::C),
            "D" | "d" => Ok(StabilityClass::D),
            "E" | "e" => Ok(StabilityClass::E),
            "F" | "f" => Ok(StabilityClass::F),
            other => Err(InputError::UnknownStabilityClass(other.to_string())),
        }
    }
}

/// Insolation / cloud-cover proxy for stability classification.
///
/// Daytime variants rank incoming solar radiation; night variants rank cloud
/// cover. A classifier given no insolation information falls back to a
/// neutral wind-speed-only mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Insolation {
    /// Daytime, strong incoming solar radiation.
    StrongDaytime,
    /// Daytime, moderate incoming solar radiation.
    ModerateDaytime,
    /// Daytime, slight incoming solar radiation.
    SlightDaytime,
    /// Night, mostly overcast (>= 4/8 cloud cover).
    NightOvercast,
    /// Night, mostly clear (<= 3/8 cloud cover).
    NightClear,
}

impl Insolation {
    /// Whether this is a daytime condition.
    pub fn is_daytime(self) -> bool {
        matches!(
            self,
            Insolation::StrongDaytime | Insolation::ModerateDaytime | Insolation::SlightDaytime
        )
    }
}
