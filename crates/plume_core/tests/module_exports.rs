//! Integration tests for module exports.
//!
//! Verify that all public modules and types are correctly exported and
//! accessible via absolute paths.

/// Test that the solver module is accessible via absolute path.
#[test]
fn test_solvers_module_exports() {
    use plume_core::math::solvers::{AdamConfig, AdamSolver, StopReason};

    let solver = AdamSolver::new(AdamConfig::fast());
    let result = solver.solve(|x: f64| (x * x, 2.0 * x), 0.0).unwrap();
    assert_eq!(result.stop_reason, StopReason::Converged);
}

/// Test that value types are accessible via absolute paths.
#[test]
fn test_types_module_exports() {
    use plume_core::types::geometry::SourceGeometry;
    use plume_core::types::receptor::{ObservationSet, Receptor};
    use plume_core::types::stability::{Insolation, StabilityClass};
    use plume_core::types::wind::WindData;

    let wind = WindData::new(3.0, 270.0).unwrap();
    assert_eq!(wind.stability_class(), None);
    assert!(Insolation::StrongDaytime.is_daytime());
    assert!(StabilityClass::A.is_unstable());

    let geometry = SourceGeometry::new(5.0).unwrap();
    assert_eq!(geometry.stack_height_m(), 5.0);

    let set = ObservationSet::new(vec![Receptor::at_ground(100.0, 0.0)], vec![1.0]).unwrap();
    assert_eq!(set.len(), 1);
}

/// Test that module-level re-exports match the canonical paths.
#[test]
fn test_type_reexports() {
    use plume_core::types::{InputError, ObservationSet, Receptor, SolverError};

    let err: InputError = ObservationSet::new(vec![], vec![]).unwrap_err();
    assert_eq!(err, InputError::EmptyReceptorSet);

    let _ = Receptor::new(1.0, 2.0, 3.0);
    let _: Option<SolverError> = None;
}
