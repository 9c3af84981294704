//! The built-in validators.

use tracing::warn;

use crate::error::ValidationError;
use crate::geometry::Vector3;
use crate::material::{BuiltInMaterials, Material};
use crate::math::coplanar::{are_coplanar, fit_plane};
use crate::math::polygon_2d::find_self_intersection;
use crate::math::polygon_3d::PlaneFrame;
use crate::math::{Point2, Point3, EPSILON};

use super::{ConstructArgs, EntityKind, Instance, Validator};

fn to_points(vertices: &[Vector3]) -> Vec<Point3> {
    vertices.iter().map(|v| v.to_point()).collect()
}

fn check_coplanar(points: &[Point3]) -> Result<(), ValidationError> {
    if are_coplanar(points) {
        Ok(())
    } else {
        Err(ValidationError::GeometricInconsistency(
            "the provided vertices are not coplanar".into(),
        ))
    }
}

/// Fails on the first segment no longer than [`EPSILON`], naming it.
fn check_segment_lengths(vertices: &[Vector3], closed: bool) -> Result<(), ValidationError> {
    let n = vertices.len();
    let count = if closed { n } else { n.saturating_sub(1) };
    for i in 0..count {
        let start = &vertices[i];
        let end = &vertices[(i + 1) % n];
        let length = start.distance_to(end);
        if length <= EPSILON {
            return Err(ValidationError::InvalidArgument(format!(
                "segment {i} from {start} to {end} has length {length}, \
                 which is not greater than the minimum of {EPSILON}"
            )));
        }
    }
    Ok(())
}

/// Tests the closed loop for self-intersection in its own plane.
fn check_self_intersection(points: &[Point3]) -> Result<(), ValidationError> {
    let Some((origin, normal)) = fit_plane(points) else {
        return Err(ValidationError::GeometricInconsistency(
            "the polygon's vertices are collinear, so the loop folds onto itself".into(),
        ));
    };
    let Some(frame) = PlaneFrame::from_normal(origin, &normal) else {
        return Err(ValidationError::GeometricInconsistency(
            "the polygon has no plane".into(),
        ));
    };
    let flat: Vec<Point2> = points.iter().map(|p| frame.project(p)).collect();
    match find_self_intersection(&flat) {
        Some((i, j)) => Err(ValidationError::GeometricInconsistency(format!(
            "the polygon is self-intersecting: segments {i} and {j} intersect"
        ))),
        None => Ok(()),
    }
}

fn check_unit_interval(parameter: &'static str, value: f64) -> Result<(), ValidationError> {
    if value < 0.0 {
        return Err(ValidationError::out_of_range(
            parameter,
            format!("{value} must be greater than or equal to 0.0"),
        ));
    }
    if !(value <= 1.0) {
        return Err(ValidationError::out_of_range(
            parameter,
            format!("{value} must be less than or equal to 1.0"),
        ));
    }
    Ok(())
}

/// Rejects NaN and infinite components.
#[derive(Debug, Default)]
pub struct Vector3Validator;

impl Validator for Vector3Validator {
    fn validates(&self) -> EntityKind {
        EntityKind::Vector3
    }

    fn pre_construct(&self, args: &ConstructArgs<'_>) -> Result<(), ValidationError> {
        let ConstructArgs::Vector3 { x, y, z } = *args else {
            return Ok(());
        };
        if x.is_nan() || y.is_nan() || z.is_nan() {
            return Err(ValidationError::out_of_range(
                "component",
                "the vector could not be created; one or more of the components was NaN",
            ));
        }
        if x.is_infinite() || y.is_infinite() || z.is_infinite() {
            return Err(ValidationError::out_of_range(
                "component",
                "the vector could not be created; one or more of the components was infinite",
            ));
        }
        Ok(())
    }
}

/// Rejects channels outside `[0, 1]`.
#[derive(Debug, Default)]
pub struct ColorValidator;

impl Validator for ColorValidator {
    fn validates(&self) -> EntityKind {
        EntityKind::Color
    }

    fn pre_construct(&self, args: &ConstructArgs<'_>) -> Result<(), ValidationError> {
        let ConstructArgs::Color {
            red,
            green,
            blue,
            alpha,
        } = *args
        else {
            return Ok(());
        };
        check_unit_interval("red", red)?;
        check_unit_interval("green", green)?;
        check_unit_interval("blue", blue)?;
        check_unit_interval("alpha", alpha)
    }
}

/// Rejects a zero-length normal.
#[derive(Debug, Default)]
pub struct PlaneValidator;

impl Validator for PlaneValidator {
    fn validates(&self) -> EntityKind {
        EntityKind::Plane
    }

    fn pre_construct(&self, args: &ConstructArgs<'_>) -> Result<(), ValidationError> {
        let ConstructArgs::Plane { normal, .. } = *args else {
            return Ok(());
        };
        if normal.is_zero() {
            return Err(ValidationError::InvalidArgument(format!(
                "the plane could not be constructed; the normal {normal} has zero length"
            )));
        }
        Ok(())
    }
}

/// Rejects coincident start and end points.
#[derive(Debug, Default)]
pub struct LineValidator;

impl Validator for LineValidator {
    fn validates(&self) -> EntityKind {
        EntityKind::Line
    }

    fn pre_construct(&self, args: &ConstructArgs<'_>) -> Result<(), ValidationError> {
        let ConstructArgs::Line { start, end } = *args else {
            return Ok(());
        };
        if start.is_almost_equal_to(end) {
            return Err(ValidationError::InvalidArgument(format!(
                "the line could not be created; the start {start} and end {end} are the same"
            )));
        }
        Ok(())
    }
}

/// Rejects non-coplanar vertices and too-short segments of an open chain.
#[derive(Debug, Default)]
pub struct PolylineValidator;

impl Validator for PolylineValidator {
    fn validates(&self) -> EntityKind {
        EntityKind::Polyline
    }

    fn pre_construct(&self, args: &ConstructArgs<'_>) -> Result<(), ValidationError> {
        let ConstructArgs::Polyline { vertices } = *args else {
            return Ok(());
        };
        if vertices.len() < 2 {
            return Err(ValidationError::InvalidArgument(format!(
                "a polyline needs at least 2 vertices, found {}",
                vertices.len()
            )));
        }
        check_coplanar(&to_points(vertices))?;
        check_segment_lengths(vertices, false)
    }
}

/// Polyline checks on the closed loop, plus self-intersection.
#[derive(Debug, Default)]
pub struct PolygonValidator;

impl Validator for PolygonValidator {
    fn validates(&self) -> EntityKind {
        EntityKind::Polygon
    }

    fn pre_construct(&self, args: &ConstructArgs<'_>) -> Result<(), ValidationError> {
        let ConstructArgs::Polygon { vertices } = *args else {
            return Ok(());
        };
        if vertices.len() < 3 {
            return Err(ValidationError::InvalidArgument(format!(
                "a polygon needs at least 3 vertices, found {}",
                vertices.len()
            )));
        }
        let points = to_points(vertices);
        check_coplanar(&points)?;
        check_segment_lengths(vertices, true)?;
        check_self_intersection(&points)
    }
}

/// Rejects out-of-range angles, an empty sweep and a non-positive radius.
#[derive(Debug, Default)]
pub struct ArcValidator;

impl Validator for ArcValidator {
    fn validates(&self) -> EntityKind {
        EntityKind::Arc
    }

    fn pre_construct(&self, args: &ConstructArgs<'_>) -> Result<(), ValidationError> {
        let ConstructArgs::Arc {
            radius,
            start_angle,
            end_angle,
            ..
        } = *args
        else {
            return Ok(());
        };
        if end_angle > 360.0 || start_angle > 360.0 {
            return Err(ValidationError::out_of_range(
                "angle",
                format!(
                    "the arc could not be created; start ({start_angle}) and end ({end_angle}) \
                     angles must not exceed 360.0"
                ),
            ));
        }
        #[allow(clippy::float_cmp)]
        if end_angle == start_angle {
            return Err(ValidationError::InvalidArgument(format!(
                "the arc could not be created; the start angle ({start_angle}) cannot be equal \
                 to the end angle ({end_angle})"
            )));
        }
        if radius <= 0.0 {
            return Err(ValidationError::out_of_range(
                "radius",
                format!("the arc could not be created; the radius ({radius}) must be greater than 0.0"),
            ));
        }
        Ok(())
    }
}

/// Rejects a component array that is not exactly 12 long.
#[derive(Debug, Default)]
pub struct MatrixValidator;

impl Validator for MatrixValidator {
    fn validates(&self) -> EntityKind {
        EntityKind::Matrix
    }

    fn pre_construct(&self, args: &ConstructArgs<'_>) -> Result<(), ValidationError> {
        let ConstructArgs::Matrix { components } = *args else {
            return Ok(());
        };
        if components.len() != 12 {
            return Err(ValidationError::out_of_range(
                "components",
                format!(
                    "the matrix could not be created; the component array must have 12 values, \
                     found {}",
                    components.len()
                ),
            ));
        }
        Ok(())
    }
}

/// Rejects a box that is flat along X or Y.
#[derive(Debug, Default)]
pub struct BBox3Validator;

impl Validator for BBox3Validator {
    fn validates(&self) -> EntityKind {
        EntityKind::BBox3
    }

    fn pre_construct(&self, args: &ConstructArgs<'_>) -> Result<(), ValidationError> {
        let ConstructArgs::BBox3 { min, max } = *args else {
            return Ok(());
        };
        #[allow(clippy::float_cmp)]
        if min.x() == max.x() || min.y() == max.y() {
            return Err(ValidationError::GeometricInconsistency(format!(
                "the bounding box from {min} to {max} has zero volume; min and max must differ \
                 in x and y"
            )));
        }
        Ok(())
    }
}

/// Requires a coplanar perimeter; orients voids after construction.
#[derive(Debug, Default)]
pub struct ProfileValidator;

impl Validator for ProfileValidator {
    fn validates(&self) -> EntityKind {
        EntityKind::Profile
    }

    fn pre_construct(&self, args: &ConstructArgs<'_>) -> Result<(), ValidationError> {
        let ConstructArgs::Profile { perimeter, .. } = *args else {
            return Ok(());
        };
        if !are_coplanar(&to_points(perimeter.vertices())) {
            return Err(ValidationError::GeometricInconsistency(
                "to construct a profile, all points must lie in the same plane".into(),
            ));
        }
        Ok(())
    }

    fn post_construct(&self, instance: &mut Instance<'_>) -> Result<(), ValidationError> {
        if let Instance::Profile(profile) = instance {
            profile.orient_voids();
        }
        Ok(())
    }
}

/// Range-checks specular and glossiness; clears texture paths that do not
/// exist.
#[derive(Debug, Default)]
pub struct MaterialValidator;

impl MaterialValidator {
    fn clear_missing(slot: &'static str, texture: &mut Option<std::path::PathBuf>) {
        if let Some(path) = texture.as_deref() {
            if !path.exists() {
                warn!(slot, path = %path.display(), "texture not found, clearing it");
                *texture = None;
            }
        }
    }
}

impl Validator for MaterialValidator {
    fn validates(&self) -> EntityKind {
        EntityKind::Material
    }

    fn pre_construct(&self, args: &ConstructArgs<'_>) -> Result<(), ValidationError> {
        let ConstructArgs::Material {
            specular_factor,
            glossiness_factor,
            ..
        } = *args
        else {
            return Ok(());
        };
        check_unit_interval("specular_factor", specular_factor)?;
        check_unit_interval("glossiness_factor", glossiness_factor)
    }

    fn post_construct(&self, instance: &mut Instance<'_>) -> Result<(), ValidationError> {
        if let Instance::Material(material) = instance {
            let material: &mut Material = material;
            Self::clear_missing("texture", &mut material.texture);
            Self::clear_missing("normal_texture", &mut material.normal_texture);
            Self::clear_missing("emissive_texture", &mut material.emissive_texture);
        }
        Ok(())
    }
}

/// Assigns the default material to elements built without one.
#[derive(Debug, Default)]
pub struct GeometricElementValidator;

impl Validator for GeometricElementValidator {
    fn validates(&self) -> EntityKind {
        EntityKind::GeometricElement
    }

    fn pre_construct(&self, _args: &ConstructArgs<'_>) -> Result<(), ValidationError> {
        Ok(())
    }

    fn post_construct(&self, instance: &mut Instance<'_>) -> Result<(), ValidationError> {
        if let Instance::GeometricElement(element) = instance {
            if element.material.is_none() {
                element.material = Some(BuiltInMaterials::default_material());
            }
        }
        Ok(())
    }
}

/// Rejects a zero-length direction and a negative or non-finite height.
#[derive(Debug, Default)]
pub struct ExtrudeValidator;

impl Validator for ExtrudeValidator {
    fn validates(&self) -> EntityKind {
        EntityKind::Extrude
    }

    fn pre_construct(&self, args: &ConstructArgs<'_>) -> Result<(), ValidationError> {
        let ConstructArgs::Extrude {
            height, direction, ..
        } = *args
        else {
            return Ok(());
        };
        if direction.is_zero() {
            return Err(ValidationError::InvalidArgument(
                "the extrude cannot be created; the provided direction has zero length".into(),
            ));
        }
        if !height.is_finite() || height < 0.0 {
            return Err(ValidationError::out_of_range(
                "height",
                format!("the extrusion height ({height}) must be finite and not negative"),
            ));
        }
        Ok(())
    }
}
