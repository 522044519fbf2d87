//! Source geometry for one inversion run.

use super::error::InputError;

/// Geometry of the emitting source, fixed for one inversion run.
///
/// Receptor coordinates are expressed in the wind-aligned frame relative to
/// this source: the origin shifts the frame, the centerline offset shifts the
/// plume axis in the crosswind direction.
///
/// # Examples
/// ```
/// use plume_core::types::SourceGeometry;
///
/// let geometry = SourceGeometry::new(5.0).unwrap().with_origin(10.0, -20.0);
/// assert_eq!(geometry.stack_height_m(), 5.0);
/// assert_eq!(geometry.origin_x_m(), 10.0);
///
/// // A source at or below ground level is rejected
/// assert!(SourceGeometry::new(0.0).is_err());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SourceGeometry {
    stack_height_m: f64,
    origin_x_m: f64,
    origin_y_m: f64,
    centerline_offset_m: f64,
}

impl SourceGeometry {
    /// Creates a source at the frame origin with the given effective height.
    ///
    /// # Errors
    /// - `InputError::NonPositiveSourceHeight` if the height is not finite
    ///   and strictly positive
    pub fn new(stack_height_m: f64) -> Result<Self, InputError> {
        if !stack_height_m.is_finite() || stack_height_m <= 0.0 {
            return Err(InputError::NonPositiveSourceHeight {
                height: stack_height_m,
            });
        }

        Ok(Self {
            stack_height_m,
            origin_x_m: 0.0,
            origin_y_m: 0.0,
            centerline_offset_m: 0.0,
        })
    }

    /// Sets the source origin in the wind-aligned frame (m).
    pub fn with_origin(mut self, x_m: f64, y_m: f64) -> Self {
        self.origin_x_m = x_m;
        self.origin_y_m = y_m;
        self
    }

    /// Sets the crosswind offset of the plume centerline (m).
    pub fn with_centerline_offset(mut self, offset_m: f64) -> Self {
        self.centerline_offset_m = offset_m;
        self
    }

    /// Effective source height above ground (m).
    #[inline]
    pub fn stack_height_m(&self) -> f64 {
        self.stack_height_m
    }

    /// Source x position along the downwind axis (m).
    #[inline]
    pub fn origin_x_m(&self) -> f64 {
        self.origin_x_m
    }

    /// Source y position along the crosswind axis (m).
    #[inline]
    pub fn origin_y_m(&self) -> f64 {
        self.origin_y_m
    }

    /// Crosswind offset of the plume centerline (m).
    #[inline]
    pub fn centerline_offset_m(&self) -> f64 {
        self.centerline_offset_m
    }
}
