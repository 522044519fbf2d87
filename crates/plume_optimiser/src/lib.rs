//! # plume_optimiser
//!
//! Inverse optimisation of gas source emission rates.
//!
//! This crate sits on top of `plume_core` (L1) and `plume_models` (L2),
//! solving the inverse problem: given observed concentrations and live
//! meteorology, recover the single most likely source strength Q together
//! with a defensible uncertainty bound.
//!
//! ## Modules
//!
//! - `inversion`: the inversion engine, confidence estimator, and result
//!   types
//!
//! ## Example
//!
//! ```
//! use plume_core::types::{SourceGeometry, StabilityClass, WindData};
//! use plume_models::observation::SyntheticSceneConfig;
//! use plume_optimiser::inversion::PlumeInverter;
//!
//! let scene = SyntheticSceneConfig::default()
//!     .with_q_kg_hr(50.0)
//!     .noiseless()
//!     .generate()
//!     .unwrap();
//!
//! let wind = WindData::new(3.0, 270.0).unwrap().with_stability(StabilityClass::D);
//! let geometry = SourceGeometry::new(5.0).unwrap();
//!
//! let inverter = PlumeInverter::with_defaults();
//! let result = inverter.invert(&scene.observations, &wind, &geometry).unwrap();
//!
//! assert!(result.converged);
//! assert!((result.q_kg_hr - 50.0).abs() / 50.0 < 0.15);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod inversion;

pub use inversion::{
    InversionDiagnostics, InversionError, InversionResult, InversionRun, InverterConfig,
    PlumeInverter,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::inversion::*;
}
