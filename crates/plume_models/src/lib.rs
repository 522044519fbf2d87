//! # Plume Models (L2: Atmospheric Physics)
//!
//! Atmospheric stability classification, dispersion coefficients, and the
//! Gaussian plume forward model.
//!
//! This crate provides:
//! - Pasquill-Gifford stability classification from live meteorology
//! - Briggs power-law horizontal/vertical dispersion coefficients
//! - The differentiable-by-construction Gaussian plume equation
//! - Observation adapters: point sets, concentration grids, and synthetic
//!   scenes for validating the inversion
//!
//! ## Design Principles
//!
//! - **Linear in Q**: the forward model exposes unit concentrations so the
//!   optimiser exploits `C(Q) = Q · k` with an exact analytic gradient
//! - **Hard upwind guard**: non-positive downwind distance predicts exactly
//!   zero, never a formula evaluation
//! - **Validated construction** for everything that enters an inversion

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod dispersion;
pub mod gaussian;
pub mod observation;
pub mod stability;

pub use dispersion::DispersionModel;
pub use gaussian::GaussianPlumeModel;
pub use observation::{ConcentrationGrid, SyntheticScene, SyntheticSceneConfig};
pub use stability::StabilityClassifier;

#[cfg(test)]
mod tests {
    #[test]
    fn it_works() {
        assert_eq!(2 + 2, 4);
    }
}
