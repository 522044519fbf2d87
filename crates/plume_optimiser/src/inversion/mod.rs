//! Emission-rate inversion.
//!
//! The engine in this module fits the logarithm of the emission rate to an
//! observation set with the Adam solver from `plume_core`, then attaches a
//! Gauss-Newton confidence interval. One [`PlumeInverter`] can serve any
//! number of runs; each run is self-contained and side-effect free.

pub mod confidence;
pub mod config;
pub mod engine;
pub mod error;
pub mod result;

pub use confidence::{ConfidenceEstimator, IntervalEstimate};
pub use config::InverterConfig;
pub use engine::{InversionRun, PlumeInverter};
pub use error::InversionError;
pub use result::{InversionDiagnostics, InversionResult};
