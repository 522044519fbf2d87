//! Numerical building blocks.
//!
//! Currently a single submodule, `solvers`, holding the scalar gradient
//! solver the inversion engine is built on.

pub mod solvers;
