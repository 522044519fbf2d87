//! Inversion error types.

use thiserror::Error;

use plume_core::types::{InputError, SolverError};

/// Errors surfaced by [`PlumeInverter::invert`](super::PlumeInverter::invert).
///
/// Degraded-but-usable outcomes (iteration cap, expired budget, recovered
/// instability) are *not* errors; they come back as an
/// [`InversionResult`](super::InversionResult) with `converged == false`.
/// An error means no estimate could be produced at all.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InversionError {
    /// The observations, wind, or geometry failed validation.
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InputError),

    /// Every receptor sits at or upwind of the source, so the forward model
    /// predicts zero everywhere and the emission rate is unconstrained.
    #[error("no receptor lies downwind of the source")]
    NoDownwindReceptor,

    /// The solver could not start, or its configuration was unusable.
    #[error("solver failure: {0}")]
    Solver(#[from] SolverError),
}
