//! Construction-time validation through the public constructors.

use std::sync::Arc;

use elemgeo::error::ValidationError;
use elemgeo::geometry::{Arc as ArcCurve, BBox3, Color, Line, Polygon, Profile, Vector3};
use elemgeo::material::Material;
use elemgeo::validation::{
    ConstructArgs, ConstructionContext, ConstructionMode, EntityKind, Validator, ValidatorRegistry,
};
use elemgeo::ErrorKind;

fn v(x: f64, y: f64, z: f64) -> Vector3 {
    Vector3::new(x, y, z).unwrap()
}

// ── primitives ──

#[test]
fn non_finite_components_are_out_of_range() {
    for bad in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
        let err = Vector3::new(1.0, bad, 0.0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OutOfRange);
    }
    assert!(Vector3::new(1.0, -2.0, 3.5).is_ok());
}

#[test]
fn arc_rules() {
    assert!(ArcCurve::new(Vector3::ORIGIN, 0.0, 0.0, 90.0).is_err());
    assert!(ArcCurve::new(Vector3::ORIGIN, -1.0, 0.0, 90.0).is_err());
    assert!(ArcCurve::new(Vector3::ORIGIN, 1.0, 45.0, 45.0).is_err());
    assert!(ArcCurve::new(Vector3::ORIGIN, 1.0, 0.0, 361.0).is_err());
    assert!(ArcCurve::new(Vector3::ORIGIN, 1.0, 0.0, 90.0).is_ok());
    assert!(ArcCurve::new(Vector3::ORIGIN, 1.0, 0.0, 360.0).is_ok());
}

#[test]
fn figure_eight_polygon_is_inconsistent() {
    let err = Polygon::new(vec![
        v(0.0, 0.0, 0.0),
        v(2.0, 2.0, 0.0),
        v(2.0, 0.0, 0.0),
        v(0.0, 2.0, 0.0),
    ])
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::GeometricInconsistency);
}

#[test]
fn simple_polygons_construct() {
    assert!(Polygon::rectangle(2.0, 1.0).is_ok());
    let l_shape = Polygon::new(vec![
        v(0.0, 0.0, 0.0),
        v(2.0, 0.0, 0.0),
        v(2.0, 1.0, 0.0),
        v(1.0, 1.0, 0.0),
        v(1.0, 2.0, 0.0),
        v(0.0, 2.0, 0.0),
    ]);
    assert!(l_shape.is_ok());
}

#[test]
fn bounding_box_needs_extent_in_x_and_y() {
    let flat_x = BBox3::new(v(0.0, 0.0, 0.0), v(0.0, 5.0, 5.0)).unwrap_err();
    assert_eq!(flat_x.kind(), ErrorKind::GeometricInconsistency);
    assert!(BBox3::new(v(0.0, 0.0, 0.0), v(5.0, 0.0, 5.0)).is_err());
    assert!(BBox3::new(v(0.0, 0.0, 0.0), v(5.0, 5.0, 5.0)).is_ok());
}

#[test]
fn color_channels_stay_in_unit_interval() {
    assert!(Color::new(0.2, 0.4, 0.6, 1.0).is_ok());
    let err = Color::new(1.2, 0.0, 0.0, 1.0).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::OutOfRange);
}

// ── profiles and materials ──

#[test]
fn profile_without_voids_has_empty_voids() {
    let profile = Profile::new(Polygon::rectangle(1.0, 1.0).unwrap(), None).unwrap();
    assert!(profile.voids().is_empty());
}

#[test]
fn voids_wind_against_the_perimeter() {
    let perimeter = Polygon::rectangle(4.0, 4.0).unwrap();
    let same_winding = Polygon::rectangle(1.0, 1.0).unwrap();
    let profile = Profile::new(perimeter.clone(), Some(vec![same_winding])).unwrap();
    assert!(profile.voids()[0].normal().dot(&perimeter.normal()) < 0.0);
}

#[test]
fn material_factors_are_range_checked() {
    let err = Material::new("shiny", Color::new(1.0, 1.0, 1.0, 1.0).unwrap(), 1.5, 0.5)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::OutOfRange);
}

#[test]
fn missing_texture_is_cleared() {
    let material = Material::builder("brick")
        .specular_factor(0.5)
        .texture("/definitely/not/here/brick.png")
        .build()
        .unwrap();
    assert!(material.texture().is_none());
}

// ── modes and registries ──

#[test]
fn trusted_mode_skips_validation() {
    let ctx = ConstructionContext::trusted();
    assert_eq!(ctx.mode(), ConstructionMode::Trusted);
    assert!(Line::new_in(&ctx, Vector3::ORIGIN, Vector3::ORIGIN).is_ok());
    let err = Line::new(Vector3::ORIGIN, Vector3::ORIGIN).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
}

#[test]
fn empty_registry_checks_nothing() {
    let ctx = ConstructionContext::new(
        Arc::new(ValidatorRegistry::empty()),
        ConstructionMode::Validated,
    );
    assert!(Line::new_in(&ctx, Vector3::ORIGIN, Vector3::ORIGIN).is_ok());
}

struct ShortLinesOnly;

impl Validator for ShortLinesOnly {
    fn validates(&self) -> EntityKind {
        EntityKind::Line
    }

    fn pre_construct(&self, args: &ConstructArgs<'_>) -> Result<(), ValidationError> {
        if let ConstructArgs::Line { start, end } = args {
            if start.distance_to(end) > 10.0 {
                return Err(ValidationError::InvalidArgument("line too long".into()));
            }
        }
        Ok(())
    }
}

#[test]
fn custom_validator_replaces_builtin() {
    let mut registry = ValidatorRegistry::builtin();
    registry.register(Box::new(ShortLinesOnly));
    let ctx = ConstructionContext::new(Arc::new(registry), ConstructionMode::Validated);

    assert!(Line::new_in(&ctx, Vector3::ORIGIN, v(20.0, 0.0, 0.0)).is_err());
    // The replaced validator no longer rejects degenerate lines.
    assert!(Line::new_in(&ctx, Vector3::ORIGIN, Vector3::ORIGIN).is_ok());
}
