//! Linear dimensions measured in a drawing plane.

use serde::{Deserialize, Serialize};

use crate::error::{Result, ValidationError};
use crate::geometry::{Line, Plane, Vector3};
use crate::math::EPSILON;
use crate::validation::{ConstructArgs, ConstructionContext, Entity, Instance};

/// A distance between two points, measured on a reference plane.
///
/// `start` and `end` are projected onto `reference_plane` to find the ends of
/// the dimension line; `plane` is the plane the dimension is drawn in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearDimension {
    #[serde(default = "Plane::xy")]
    plane: Plane,
    start: Vector3,
    end: Vector3,
    reference_plane: Plane,
}

impl LinearDimension {
    /// Creates a dimension against an explicit reference plane.
    ///
    /// `start` and `end` are kept as given. `plane` defaults to world XY.
    ///
    /// # Errors
    ///
    /// Returns a validation error if a point or plane is invalid.
    pub fn new(
        start: Vector3,
        end: Vector3,
        reference_plane: Plane,
        plane: Option<Plane>,
    ) -> Result<Self> {
        Self::new_in(&ConstructionContext::default(), start, end, reference_plane, plane)
    }

    /// Creates a dimension against an explicit reference plane in an explicit
    /// construction context.
    ///
    /// # Errors
    ///
    /// See [`LinearDimension::new`].
    pub fn new_in(
        ctx: &ConstructionContext,
        start: Vector3,
        end: Vector3,
        reference_plane: Plane,
        plane: Option<Plane>,
    ) -> Result<Self> {
        let plane = plane.unwrap_or_else(Plane::xy);
        ctx.pre_construct(&ConstructArgs::LinearDimension {
            plane: &plane,
            start: &start,
            end: &end,
            reference_plane: &reference_plane,
        })?;
        let mut dimension = Self {
            plane,
            start,
            end,
            reference_plane,
        };
        ctx.post_construct(dimension.as_instance())?;
        Ok(dimension)
    }

    /// Creates a dimension whose reference line runs parallel to the
    /// measured points, offset within the drawing plane.
    ///
    /// Both points are projected onto `plane` (world XY by default). A
    /// positive `offset` moves the reference line to the left of the
    /// start-to-end direction, seen from the plane's normal.
    ///
    /// # Errors
    ///
    /// Returns an `InvalidArgument` error if the points coincide once
    /// projected.
    pub fn with_offset(
        start: &Vector3,
        end: &Vector3,
        plane: Option<Plane>,
        offset: f64,
    ) -> Result<Self> {
        let plane = plane.unwrap_or_else(Plane::xy);
        let start = plane.project(start);
        let end = plane.project(end);
        let offset_direction = offset_direction(&plane, &start, &end)?;
        let reference_plane = Plane::new(start + offset_direction * offset, offset_direction)?;
        Self::new(start, end, reference_plane, Some(plane))
    }

    /// Creates a dimension measured along a reference line.
    ///
    /// Both points and the line are projected onto `plane` (world XY by
    /// default).
    ///
    /// # Errors
    ///
    /// Returns an `InvalidArgument` error if the reference line is
    /// perpendicular to the plane.
    pub fn along_line(
        start: &Vector3,
        end: &Vector3,
        plane: Option<Plane>,
        reference_line: &Line,
    ) -> Result<Self> {
        let plane = plane.unwrap_or_else(Plane::xy);
        let line_start = plane.project(reference_line.start());
        let line_end = plane.project(reference_line.end());
        let offset_direction = offset_direction(&plane, &line_start, &line_end)?;
        let reference_plane = Plane::new(line_start, offset_direction)?;
        Self::new(plane.project(start), plane.project(end), reference_plane, Some(plane))
    }

    /// The plane the dimension is drawn in.
    #[must_use]
    pub fn plane(&self) -> &Plane {
        &self.plane
    }

    #[must_use]
    pub fn start(&self) -> &Vector3 {
        &self.start
    }

    #[must_use]
    pub fn end(&self) -> &Vector3 {
        &self.end
    }

    /// The plane the start and end points are projected onto.
    #[must_use]
    pub fn reference_plane(&self) -> &Plane {
        &self.reference_plane
    }

    /// Direction from the measured points towards the dimension line.
    #[must_use]
    pub fn offset_direction(&self) -> &Vector3 {
        self.reference_plane.normal()
    }

    /// Ends of the dimension line.
    #[must_use]
    pub fn dimension_points(&self) -> (Vector3, Vector3) {
        (
            self.reference_plane.project(&self.start),
            self.reference_plane.project(&self.end),
        )
    }

    /// The measured distance.
    #[must_use]
    pub fn value(&self) -> f64 {
        let (start, end) = self.dimension_points();
        start.distance_to(&end)
    }

    /// The dimension line, or `None` if the points project onto one spot.
    #[must_use]
    pub fn dimension_line(&self) -> Option<Line> {
        let (start, end) = self.dimension_points();
        (start.distance_to(&end) > EPSILON).then(|| Line::raw(start, end))
    }

    /// Lines from the measured points to the dimension line, for points that
    /// do not already lie on it.
    #[must_use]
    pub fn extension_lines(&self) -> Vec<Line> {
        let (dim_start, dim_end) = self.dimension_points();
        [(self.start, dim_start), (self.end, dim_end)]
            .into_iter()
            .filter(|(from, to)| from.distance_to(to) > EPSILON)
            .map(|(from, to)| Line::raw(from, to))
            .collect()
    }

    /// The value formatted with two decimals.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{:.2}", self.value())
    }
}

fn offset_direction(plane: &Plane, start: &Vector3, end: &Vector3) -> Result<Vector3> {
    let along = (*end - *start).unitized();
    let direction = plane.normal().cross(&along);
    if direction.is_zero() {
        return Err(ValidationError::InvalidArgument(
            "the dimension cannot be created; its points coincide in the drawing plane".into(),
        )
        .into());
    }
    Ok(direction)
}

impl Entity for LinearDimension {
    fn construct_args(&self) -> ConstructArgs<'_> {
        ConstructArgs::LinearDimension {
            plane: &self.plane,
            start: &self.start,
            end: &self.end,
            reference_plane: &self.reference_plane,
        }
    }

    fn as_instance(&mut self) -> Instance<'_> {
        Instance::LinearDimension(self)
    }

    fn validate_children(&mut self, ctx: &ConstructionContext) -> Result<(), ValidationError> {
        ctx.validate(&mut self.plane)?;
        ctx.validate(&mut self.start)?;
        ctx.validate(&mut self.end)?;
        ctx.validate(&mut self.reference_plane)
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

    // ── offset ──

    #[test]
    fn offset_dimension_measures_distance() {
        let dim = LinearDimension::with_offset(&v(0.0, 0.0, 0.0), &v(4.0, 0.0, 0.0), None, 1.0)
            .unwrap();
        assert_relative_eq!(dim.value(), 4.0, epsilon = 1e-12);
        assert_eq!(dim.label(), "4.00");
        assert!(dim.offset_direction().is_almost_equal_to(&Vector3::Y_AXIS));
    }

    #[test]
    fn offset_dimension_has_two_extension_lines() {
        let dim = LinearDimension::with_offset(&v(0.0, 0.0, 0.0), &v(4.0, 0.0, 0.0), None, 1.0)
            .unwrap();
        let lines = dim.extension_lines();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].end().is_almost_equal_to(&v(0.0, 1.0, 0.0)));
        assert!(lines[1].end().is_almost_equal_to(&v(4.0, 1.0, 0.0)));
    }

    #[test]
    fn zero_offset_has_no_extension_lines() {
        let dim = LinearDimension::with_offset(&v(0.0, 0.0, 0.0), &v(4.0, 0.0, 0.0), None, 0.0)
            .unwrap();
        assert!(dim.extension_lines().is_empty());
        assert!(dim.dimension_line().is_some());
    }

    #[test]
    fn points_are_projected_into_the_drawing_plane() {
        let dim = LinearDimension::with_offset(&v(0.0, 0.0, 2.0), &v(3.0, 4.0, -1.0), None, 0.5)
            .unwrap();
        assert_relative_eq!(dim.start().z(), 0.0);
        assert_relative_eq!(dim.value(), 5.0, epsilon = 1e-12);
    }

    #[test]
    fn coincident_points_are_rejected() {
        let err = LinearDimension::with_offset(&v(1.0, 1.0, 0.0), &v(1.0, 1.0, 3.0), None, 1.0)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    // ── reference line ──

    #[test]
    fn reference_line_measures_projected_distance() {
        let line = Line::new(v(0.0, -2.0, 0.0), v(1.0, -2.0, 0.0)).unwrap();
        let dim =
            LinearDimension::along_line(&v(0.0, 0.0, 0.0), &v(3.0, 5.0, 0.0), None, &line).unwrap();
        // Only the component along the line is measured.
        assert_relative_eq!(dim.value(), 3.0, epsilon = 1e-12);
        let (a, b) = dim.dimension_points();
        assert_relative_eq!(a.y(), -2.0, epsilon = 1e-12);
        assert_relative_eq!(b.y(), -2.0, epsilon = 1e-12);
    }

    #[test]
    fn vertical_reference_line_is_rejected() {
        let line = Line::new(v(0.0, 0.0, 0.0), v(0.0, 0.0, 1.0)).unwrap();
        assert!(
            LinearDimension::along_line(&v(0.0, 0.0, 0.0), &v(1.0, 0.0, 0.0), None, &line).is_err()
        );
    }

    // ── persistence ──

    #[test]
    fn missing_plane_defaults_to_xy() {
        let dim = LinearDimension::with_offset(&v(0.0, 0.0, 0.0), &v(2.0, 0.0, 0.0), None, 1.0)
            .unwrap();
        let mut value = serde_json::to_value(&dim).unwrap();
        value.as_object_mut().unwrap().remove("plane");
        let restored: LinearDimension = serde_json::from_value(value).unwrap();
        assert_eq!(restored, dim);
    }
}
