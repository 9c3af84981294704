//! Reactive recomputation of solid operations.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use approx::assert_relative_eq;
use elemgeo::error::KernelResult;
use elemgeo::geometry::{CurveGeometry, Polygon, Profile, Vector3};
use elemgeo::kernel::{BrepKernel, Kernel, Solid};
use elemgeo::operations::{Extrude, ExtrudeParams, Lamina, LaminaParams};
use elemgeo::validation::ConstructionContext;
use elemgeo::ErrorKind;

/// Delegates to [`BrepKernel`] and counts the calls.
#[derive(Debug, Default)]
struct CountingKernel {
    inner: BrepKernel,
    calls: AtomicUsize,
}

impl CountingKernel {
    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Kernel for CountingKernel {
    fn create_extrude(
        &self,
        profile: &Profile,
        height: f64,
        direction: &Vector3,
        flipped: bool,
    ) -> KernelResult<Solid> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.create_extrude(profile, height, direction, flipped)
    }

    fn create_sweep_along_curve(
        &self,
        profile: &Profile,
        curve: &CurveGeometry,
        start_setback: f64,
        end_setback: f64,
    ) -> KernelResult<Solid> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner
            .create_sweep_along_curve(profile, curve, start_setback, end_setback)
    }

    fn create_lamina(&self, perimeter: &Polygon) -> KernelResult<Solid> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.create_lamina(perimeter)
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn v(x: f64, y: f64, z: f64) -> Vector3 {
    Vector3::new(x, y, z).unwrap()
}

fn rectangle(width: f64, depth: f64) -> Profile {
    Profile::new(Polygon::rectangle(width, depth).unwrap(), None).unwrap()
}

fn counted_extrude(height: f64) -> (Extrude, Arc<CountingKernel>) {
    let kernel = Arc::new(CountingKernel::default());
    let op = Extrude::new(
        ExtrudeParams::new(rectangle(1.0, 1.0), height, Vector3::Z_AXIS),
        Arc::clone(&kernel) as Arc<dyn Kernel>,
    )
    .unwrap();
    (op, kernel)
}

#[test]
fn construction_calls_the_kernel_once() {
    init_tracing();
    let (_op, kernel) = counted_extrude(2.0);
    assert_eq!(kernel.calls(), 1);
}

#[test]
fn resetting_height_is_idempotent() {
    init_tracing();
    let (mut op, kernel) = counted_extrude(2.0);
    let before = op.solid().unwrap().clone();

    op.set_height(2.0).unwrap();

    assert_eq!(kernel.calls(), 1);
    assert_eq!(op.solid().unwrap(), &before);
}

#[test]
fn every_real_change_regenerates_once() {
    init_tracing();
    let (mut op, kernel) = counted_extrude(2.0);
    op.set_height(3.0).unwrap();
    op.set_direction(v(0.0, 1.0, 1.0)).unwrap();
    op.set_flipped(true).unwrap();
    op.set_flipped(true).unwrap();
    assert_eq!(kernel.calls(), 4);
}

#[test]
fn set_void_does_not_regenerate() {
    init_tracing();
    let (mut op, kernel) = counted_extrude(2.0);
    op.set_void(true);
    assert!(op.is_void());
    assert_eq!(kernel.calls(), 1);
}

#[test]
fn invalid_change_never_reaches_the_kernel() {
    init_tracing();
    let (mut op, kernel) = counted_extrude(2.0);
    let err = op.set_height(-4.0).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::OutOfRange);
    assert_eq!(kernel.calls(), 1);
    assert_relative_eq!(op.params().height(), 2.0);
    assert!(op.is_built());
}

#[test]
fn mutated_extrude_matches_fresh_construction() {
    init_tracing();
    let kernel: Arc<dyn Kernel> = Arc::new(BrepKernel::default());
    let mut op = Extrude::new(
        ExtrudeParams::new(rectangle(1.0, 1.0), 1.0, Vector3::Z_AXIS),
        Arc::clone(&kernel),
    )
    .unwrap();

    op.set_profile(rectangle(2.0, 3.0)).unwrap();
    op.set_height(4.0).unwrap();
    op.set_direction(v(1.0, 0.0, 1.0)).unwrap();
    op.set_flipped(true).unwrap();
    op.set_flipped(false).unwrap();
    op.set_height(2.5).unwrap();

    let fresh = Extrude::new(
        ExtrudeParams::new(rectangle(2.0, 3.0), 2.5, v(1.0, 0.0, 1.0)),
        kernel,
    )
    .unwrap();
    assert_eq!(op, fresh);
    assert_eq!(op.solid().unwrap(), fresh.solid().unwrap());
    assert_eq!(op.boolean_geometry().unwrap(), fresh.boolean_geometry().unwrap());
}

#[test]
fn failed_generation_requires_rebuild() {
    init_tracing();
    let (mut op, kernel) = counted_extrude(2.0);

    let err = op.set_direction(Vector3::Y_AXIS).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::GeometryGenerationFailure);
    assert!(op.params().direction().is_almost_equal_to(&Vector3::Z_AXIS));
    assert!(op.solid().is_err());
    assert!(op.boolean_geometry().is_err());

    op.rebuild().unwrap();
    assert_eq!(kernel.calls(), 3);
    assert_relative_eq!(
        op.boolean_geometry().unwrap().signed_volume(),
        2.0,
        epsilon = 1e-9
    );
}

#[test]
fn trusted_operation_still_generates() {
    init_tracing();
    let kernel = Arc::new(CountingKernel::default());
    let op = Extrude::new_in(
        &ConstructionContext::trusted(),
        ExtrudeParams::new(rectangle(1.0, 1.0), 1.0, Vector3::Z_AXIS),
        Arc::clone(&kernel) as Arc<dyn Kernel>,
    )
    .unwrap();
    assert_eq!(kernel.calls(), 1);
    assert!(op.is_built());
}

#[test]
fn voided_profile_loses_hole_volume() {
    init_tracing();
    let hole = Polygon::rectangle(1.0, 1.0).unwrap();
    let profile = Profile::new(Polygon::rectangle(3.0, 3.0).unwrap(), Some(vec![hole])).unwrap();
    let op = Extrude::new(
        ExtrudeParams::new(profile, 2.0, Vector3::Z_AXIS),
        Arc::new(BrepKernel::default()),
    )
    .unwrap();
    assert_relative_eq!(
        op.boolean_geometry().unwrap().signed_volume(),
        16.0,
        epsilon = 1e-9
    );
}

fn square_at(x0: f64, y0: f64, size: f64) -> Polygon {
    Polygon::new(vec![
        v(x0, y0, 0.0),
        v(x0 + size, y0, 0.0),
        v(x0 + size, y0 + size, 0.0),
        v(x0, y0 + size, 0.0),
    ])
    .unwrap()
}

fn slab_with_void(void: Polygon) -> Profile {
    Profile::new(Polygon::rectangle(4.0, 4.0).unwrap(), Some(vec![void])).unwrap()
}

#[test]
fn void_crossing_the_perimeter_fails_construction() {
    init_tracing();
    let err = Extrude::new(
        ExtrudeParams::new(slab_with_void(square_at(-1.0, -3.0, 2.0)), 1.0, Vector3::Z_AXIS),
        Arc::new(BrepKernel::default()),
    )
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::GeometryGenerationFailure);
}

#[test]
fn misplaced_void_leaves_extrude_unbuilt() {
    init_tracing();
    for void in [square_at(-1.0, -3.0, 2.0), square_at(5.0, 5.0, 1.0)] {
        let (mut op, _kernel) = counted_extrude(2.0);
        let err = op.set_profile(slab_with_void(void)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::GeometryGenerationFailure);
        assert!(!op.is_built());
        assert!(op.solid().is_err());
        assert!(op.params().profile().voids().is_empty());
    }
}

#[test]
fn trusted_self_crossing_lamina_fails() {
    init_tracing();
    let trusted = ConstructionContext::trusted();
    let bowtie = Polygon::new_in(
        &trusted,
        vec![v(0.0, 0.0, 0.0), v(4.0, 4.0, 0.0), v(4.0, 0.0, 0.0), v(0.0, 2.0, 0.0)],
    )
    .unwrap();

    let err = Lamina::new_in(
        &trusted,
        LaminaParams::new(bowtie.clone()),
        Arc::new(BrepKernel::default()),
    )
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::GeometryGenerationFailure);

    let mut op = Lamina::new_in(
        &trusted,
        LaminaParams::new(Polygon::rectangle(1.0, 1.0).unwrap()),
        Arc::new(BrepKernel::default()),
    )
    .unwrap();
    let err = op.set_perimeter(bowtie).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::GeometryGenerationFailure);
    assert!(!op.is_built());
}

#[test]
fn edit_normalized_back_to_current_value_is_idempotent() {
    init_tracing();
    let perimeter = Polygon::rectangle(4.0, 4.0).unwrap();
    let hole = Polygon::rectangle(1.0, 1.0).unwrap();
    let kernel = Arc::new(CountingKernel::default());
    let mut op = Extrude::new(
        ExtrudeParams::new(
            Profile::new(perimeter.clone(), Some(vec![hole.clone()])).unwrap(),
            1.0,
            Vector3::Z_AXIS,
        ),
        Arc::clone(&kernel) as Arc<dyn Kernel>,
    )
    .unwrap();

    // Same loops, void still wound like the perimeter.
    let unnormalized =
        Profile::new_in(&ConstructionContext::trusted(), perimeter, Some(vec![hole])).unwrap();
    assert_ne!(&unnormalized, op.params().profile());

    assert!(!op.update(|p| p.set_profile(unnormalized)).unwrap());
    assert_eq!(kernel.calls(), 1);
    assert!(op.is_built());
}
