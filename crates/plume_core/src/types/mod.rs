//! Core meteorological, geometric, and observation types.
//!
//! This module provides:
//! - `stability`: Pasquill-Gifford stability classes and insolation proxies
//! - `wind`: Validated wind conditions for one inversion run
//! - `geometry`: Source geometry (stack height, origin, centerline offset)
//! - `receptor`: Receptor points and observed concentration sets
//! - `error`: Structured error types for input validation and solvers
//!
//! # Re-exports
//!
//! For convenience, commonly used types are re-exported at this module level:
//! - [`StabilityClass`], [`Insolation`] from `stability`
//! - [`WindData`] from `wind`
//! - [`SourceGeometry`] from `geometry`
//! - [`Receptor`], [`ObservationSet`] from `receptor`
//! - [`InputError`], [`SolverError`] from `error`

pub mod error;
pub mod geometry;
pub mod receptor;
pub mod stability;
pub mod wind;

// Re-export commonly used types at module level
pub use error::{InputError, SolverError};
pub use geometry::SourceGeometry;
pub use receptor::{ObservationSet, Receptor};
pub use stability::{Insolation, StabilityClass};
pub use wind::WindData;
