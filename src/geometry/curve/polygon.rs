use serde::{Deserialize, Serialize};

use crate::error::{Result, ValidationError};
use crate::geometry::{BBox3, Plane, Transform, Vector3};
use crate::math::polygon_3d::{newell_normal, polygon_area_3d};
use crate::math::Point3;
use crate::validation::{ConstructArgs, ConstructionContext, Entity, Instance};

use super::{chain_length, chain_point_at, Curve, Line};

/// A closed, planar, non-self-intersecting loop of vertices.
///
/// The last vertex connects back to the first; it is not repeated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    vertices: Vec<Vector3>,
}

impl Polygon {
    /// Creates a polygon in the default validated context.
    ///
    /// # Errors
    ///
    /// Returns a `GeometricInconsistency` error if the vertices are not
    /// coplanar or the loop intersects itself, and an `InvalidArgument` error
    /// naming the first segment, closing segment included, that is too short.
    pub fn new(vertices: Vec<Vector3>) -> Result<Self> {
        Self::new_in(&ConstructionContext::default(), vertices)
    }

    /// Creates a polygon in an explicit construction context.
    ///
    /// # Errors
    ///
    /// See [`Polygon::new`]; no check runs in a trusted context.
    pub fn new_in(ctx: &ConstructionContext, vertices: Vec<Vector3>) -> Result<Self> {
        ctx.pre_construct(&ConstructArgs::Polygon {
            vertices: &vertices,
        })?;
        let mut polygon = Self { vertices };
        ctx.post_construct(polygon.as_instance())?;
        Ok(polygon)
    }

    /// An axis-aligned rectangle centered on the origin in the XY plane.
    ///
    /// # Errors
    ///
    /// Returns an `InvalidArgument` error if either side is too short.
    pub fn rectangle(width: f64, depth: f64) -> Result<Self> {
        let (w, d) = (width / 2.0, depth / 2.0);
        Self::new(vec![
            Vector3::new(-w, -d, 0.0)?,
            Vector3::new(w, -d, 0.0)?,
            Vector3::new(w, d, 0.0)?,
            Vector3::new(-w, d, 0.0)?,
        ])
    }

    #[must_use]
    pub fn vertices(&self) -> &[Vector3] {
        &self.vertices
    }

    /// Returns one line per edge, closing edge last.
    #[must_use]
    pub fn segments(&self) -> Vec<Line> {
        let n = self.vertices.len();
        (0..n)
            .map(|i| Line::raw(self.vertices[i], self.vertices[(i + 1) % n]))
            .collect()
    }

    pub(crate) fn points(&self) -> Vec<Point3> {
        self.vertices.iter().map(|v| v.to_point()).collect()
    }

    /// Returns the unit normal by Newell's method, following the winding.
    ///
    /// A degenerate loop reports +Z.
    #[must_use]
    pub fn normal(&self) -> Vector3 {
        newell_normal(&self.points()).map_or(Vector3::Z_AXIS, |n| Vector3::from_vec(&n))
    }

    /// Returns the unsigned enclosed area.
    #[must_use]
    pub fn area(&self) -> f64 {
        polygon_area_3d(&self.points(), &self.normal().to_vec()).abs()
    }

    /// Returns the average of the vertices.
    #[must_use]
    pub fn centroid(&self) -> Vector3 {
        Vector3::average(&self.vertices).unwrap_or(Vector3::ORIGIN)
    }

    /// Returns the same loop wound the other way.
    #[must_use]
    pub fn reversed(&self) -> Self {
        let mut vertices = self.vertices.clone();
        vertices.reverse();
        Self { vertices }
    }

    /// Returns the plane through the first vertex with the polygon's normal.
    #[must_use]
    pub fn plane(&self) -> Plane {
        Plane::raw(
            self.vertices.first().copied().unwrap_or(Vector3::ORIGIN),
            self.normal(),
        )
    }

    /// Returns a transform whose origin is the first vertex, whose X axis
    /// runs along the first edge and whose Z axis is the normal.
    ///
    /// # Errors
    ///
    /// Returns an `InvalidArgument` error if the polygon has fewer than two
    /// vertices or its first edge is parallel to its normal.
    pub fn to_transform(&self) -> Result<Transform> {
        let (Some(first), Some(second)) = (self.vertices.first(), self.vertices.get(1)) else {
            return Err(ValidationError::InvalidArgument(
                "a polygon needs two vertices to define a transform".into(),
            )
            .into());
        };
        Transform::from_axes(*first, *second - *first, self.normal())
    }

    /// Returns the axis-aligned bounds of the vertices, or `None` if empty.
    #[must_use]
    pub fn bounds(&self) -> Option<BBox3> {
        BBox3::from_points(&self.vertices)
    }

    /// Returns a copy with every vertex transformed.
    #[must_use]
    pub fn transformed(&self, transform: &Transform) -> Self {
        Self {
            vertices: self.vertices.iter().map(|v| transform.apply(v)).collect(),
        }
    }
}

impl Curve for Polygon {
    fn point_at(&self, u: f64) -> Vector3 {
        chain_point_at(&self.vertices, true, u)
    }

    fn length(&self) -> f64 {
        chain_length(&self.vertices, true)
    }

    fn is_closed(&self) -> bool {
        true
    }
}

impl Entity for Polygon {
    fn construct_args(&self) -> ConstructArgs<'_> {
        ConstructArgs::Polygon {
            vertices: &self.vertices,
        }
    }

    fn as_instance(&mut self) -> Instance<'_> {
        Instance::Polygon(self)
    }

    fn validate_children(&mut self, ctx: &ConstructionContext) -> Result<(), ValidationError> {
        self.vertices.iter_mut().try_for_each(|v| ctx.validate(v))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::error::ErrorKind;

    fn v(x: f64, y: f64, z: f64) -> Vector3 {
        Vector3::new(x, y, z).unwrap()
    }

    // ── Validation ──

    #[test]
    fn figure_eight_is_inconsistent() {
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
    fn concave_l_shape_is_valid() {
        let polygon = Polygon::new(vec![
            v(0.0, 0.0, 0.0),
            v(4.0, 0.0, 0.0),
            v(4.0, 1.0, 0.0),
            v(1.0, 1.0, 0.0),
            v(1.0, 3.0, 0.0),
            v(0.0, 3.0, 0.0),
        ])
        .unwrap();
        assert_relative_eq!(polygon.area(), 6.0, epsilon = 1e-12);
    }

    #[test]
    fn vertex_touching_an_edge_is_inconsistent() {
        let err = Polygon::new(vec![
            v(0.0, 0.0, 0.0),
            v(4.0, 0.0, 0.0),
            v(4.0, 4.0, 0.0),
            v(2.0, 0.0, 0.0),
            v(0.0, 4.0, 0.0),
        ])
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::GeometricInconsistency);
    }

    #[test]
    fn short_closing_segment_is_invalid() {
        let err = Polygon::new(vec![
            v(0.0, 0.0, 0.0),
            v(1.0, 0.0, 0.0),
            v(1.0, 1.0, 0.0),
            v(0.000_001, 0.0, 0.0),
        ])
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    // ── Derived geometry ──

    #[test]
    fn normal_follows_winding() {
        let square = Polygon::rectangle(2.0, 2.0).unwrap();
        assert!(square.normal().is_almost_equal_to(&Vector3::Z_AXIS));
        assert!(square.reversed().normal().is_almost_equal_to(&-Vector3::Z_AXIS));
    }

    #[test]
    fn rectangle_measurements() {
        let rect = Polygon::rectangle(4.0, 2.0).unwrap();
        assert_relative_eq!(rect.area(), 8.0, epsilon = 1e-12);
        assert_relative_eq!(rect.length(), 12.0, epsilon = 1e-12);
        assert!(rect.centroid().is_zero());
        assert_eq!(rect.segments().len(), 4);
        assert!(rect.is_closed());
    }

    #[test]
    fn to_transform_maps_first_edge_to_x() {
        let polygon = Polygon::new(vec![
            v(1.0, 1.0, 0.0),
            v(1.0, 3.0, 0.0),
            v(-1.0, 3.0, 0.0),
        ])
        .unwrap();
        let t = polygon.to_transform().unwrap();
        let mapped = t.apply(&Vector3::X_AXIS);
        assert!(mapped.is_almost_equal_to(&v(1.0, 2.0, 0.0)));
    }

    #[test]
    fn bounds_cover_vertices() {
        let bounds = Polygon::rectangle(2.0, 4.0).unwrap().bounds().unwrap();
        assert!(bounds.min().is_almost_equal_to(&v(-1.0, -2.0, 0.0)));
        assert!(bounds.max().is_almost_equal_to(&v(1.0, 2.0, 0.0)));
    }
}
