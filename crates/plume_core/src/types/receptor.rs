//! Receptor points and observed concentration sets.
//!
//! A receptor is a point at which concentration is observed or predicted,
//! expressed in the wind-aligned frame relative to the source. The
//! observation collaborator performs any coordinate rotation; this crate
//! assumes receptors are already wind-aligned.

use super::error::InputError;

/// A single receptor point in the wind-aligned frame.
///
/// All coordinates in metres: `downwind_m` along the wind axis,
/// `crosswind_m` perpendicular to it, `height_m` above ground.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Receptor {
    /// Distance along the downwind axis (m). Non-positive means the point is
    /// upwind of or at the source.
    pub downwind_m: f64,
    /// Crosswind offset from the plume axis (m).
    pub crosswind_m: f64,
    /// Height above ground (m), typically 0 for remote ground-level retrievals.
    pub height_m: f64,
}

impl Receptor {
    /// Creates a receptor point.
    pub fn new(downwind_m: f64, crosswind_m: f64, height_m: f64) -> Self {
        Self {
            downwind_m,
            crosswind_m,
            height_m,
        }
    }

    /// Ground-level receptor at the given downwind/crosswind position.
    pub fn at_ground(downwind_m: f64, crosswind_m: f64) -> Self {
        Self::new(downwind_m, crosswind_m, 0.0)
    }

    fn is_finite(&self) -> bool {
        self.downwind_m.is_finite() && self.crosswind_m.is_finite() && self.height_m.is_finite()
    }
}

/// An ordered, validated set of receptors with observed concentrations.
///
/// The ordering is irrelevant to inversion results but is preserved exactly
/// as supplied so that per-receptor diagnostics are reproducible.
///
/// # Examples
/// ```
/// use plume_core::types::{ObservationSet, Receptor};
///
/// let receptors = vec![Receptor::at_ground(500.0, 0.0), Receptor::at_ground(800.0, 30.0)];
/// let observations = ObservationSet::new(receptors, vec![2.0e-6, 1.1e-6]).unwrap();
/// assert_eq!(observations.len(), 2);
/// assert_eq!(observations.peak(), (0, 2.0e-6));
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObservationSet {
    receptors: Vec<Receptor>,
    concentrations: Vec<f64>,
}

impl ObservationSet {
    /// Creates a validated observation set.
    ///
    /// # Arguments
    /// * `receptors` - Receptor points (non-empty, finite coordinates)
    /// * `concentrations` - Observed concentrations in kg/m³, aligned with
    ///   `receptors` (finite, non-negative)
    ///
    /// # Errors
    /// - `InputError::EmptyReceptorSet` if no receptors are supplied
    /// - `InputError::LengthMismatch` if the vectors differ in length
    /// - `InputError::InvalidReceptor` on a non-finite coordinate
    /// - `InputError::InvalidObservation` on a NaN/Inf/negative concentration
    pub fn new(receptors: Vec<Receptor>, concentrations: Vec<f64>) -> Result<Self, InputError> {
        if receptors.is_empty() {
            return Err(InputError::EmptyReceptorSet);
        }
        if receptors.len() != concentrations.len() {
            return Err(InputError::LengthMismatch {
                receptors: receptors.len(),
                observations: concentrations.len(),
            });
        }
        for (index, receptor) in receptors.iter().enumerate() {
            if !receptor.is_finite() {
                return Err(InputError::InvalidReceptor { index });
            }
        }
        for (index, &value) in concentrations.iter().enumerate() {
            if !value.is_finite() || value < 0.0 {
                return Err(InputError::InvalidObservation { index, value });
            }
        }

        Ok(Self {
            receptors,
            concentrations,
        })
    }

    /// Receptor points in supplied order.
    #[inline]
    pub fn receptors(&self) -> &[Receptor] {
        &self.receptors
    }

    /// Observed concentrations (kg/m³), aligned with [`Self::receptors`].
    #[inline]
    pub fn concentrations(&self) -> &[f64] {
        &self.concentrations
    }

    /// Number of receptor/observation pairs.
    #[inline]
    pub fn len(&self) -> usize {
        self.receptors.len()
    }

    /// Whether the set is empty. Always false for a constructed set.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.receptors.is_empty()
    }

    /// Index and value of the highest observed concentration.
    ///
    /// Ties resolve to the earliest index, keeping results reproducible for
    /// identical inputs.
    pub fn peak(&self) -> (usize, f64) {
        let mut best = (0, self.concentrations[0]);
        for (index, &value) in self.concentrations.iter().enumerate().skip(1) {
            if value > best.1 {
                best = (index, value);
            }
        }
        best
    }
}
