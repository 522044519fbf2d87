//! # plume_core: Foundation for the Plume Inversion Library
//!
//! ## Layer 1 (Foundation) Role
//!
//! plume_core serves as the bottom layer of the 3-layer architecture, providing:
//! - Meteorological and geometric value types (`types::wind`, `types::geometry`)
//! - Pasquill-Gifford stability class enumeration (`types::stability`)
//! - Receptor and observation containers (`types::receptor`)
//! - Error types: `InputError`, `SolverError` (`types::error`)
//! - Scalar gradient solver for inverse problems (`math::solvers`)
//!
//! ## Zero Dependency Principle
//!
//! Layer 1 has no dependencies on other plume_* crates, with minimal external
//! dependencies:
//! - thiserror: Structured error types
//! - serde: Serialisation support (optional)
//!
//! The gradient of the Gaussian plume equation with respect to the emission
//! rate is available in closed form, so no automatic-differentiation layer is
//! carried anywhere in the workspace.
//!
//! ## Usage Examples
//!
//! ```rust
//! use plume_core::types::{Receptor, StabilityClass, WindData};
//!
//! let wind = WindData::new(3.0, 270.0).unwrap();
//! assert_eq!(wind.speed_ms(), 3.0);
//!
//! let receptor = Receptor::new(500.0, 25.0, 0.0);
//! assert_eq!(receptor.downwind_m, 500.0);
//!
//! assert!(StabilityClass::A < StabilityClass::F);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod math;
pub mod types;

#[cfg(test)]
mod tests {
    #[test]
    fn it_works() {
        assert_eq!(2 + 2, 4);
    }
}
