use serde::{Deserialize, Serialize};

use crate::error::{Result, ValidationError};
use crate::geometry::Vector3;
use crate::math::EPSILON;
use crate::validation::{ConstructArgs, ConstructionContext, Entity, Instance};

use super::Curve;

/// A circular arc in the XY plane through `center`.
///
/// Angles are in degrees, measured counter-clockwise from +X. The arc runs
/// from `start_angle` to `end_angle`, clockwise when `end_angle` is smaller.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Arc {
    center: Vector3,
    radius: f64,
    start_angle: f64,
    end_angle: f64,
}

impl Arc {
    /// Creates an arc in the default validated context.
    ///
    /// # Errors
    ///
    /// Returns an `OutOfRange` error if an angle exceeds 360 or the radius is
    /// not positive, and an `InvalidArgument` error if the angles are equal.
    pub fn new(center: Vector3, radius: f64, start_angle: f64, end_angle: f64) -> Result<Self> {
        Self::new_in(
            &ConstructionContext::default(),
            center,
            radius,
            start_angle,
            end_angle,
        )
    }

    /// Creates an arc in an explicit construction context.
    ///
    /// # Errors
    ///
    /// See [`Arc::new`]; no check runs in a trusted context.
    pub fn new_in(
        ctx: &ConstructionContext,
        center: Vector3,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
    ) -> Result<Self> {
        ctx.pre_construct(&ConstructArgs::Arc {
            center: &center,
            radius,
            start_angle,
            end_angle,
        })?;
        let mut arc = Self {
            center,
            radius,
            start_angle,
            end_angle,
        };
        ctx.post_construct(arc.as_instance())?;
        Ok(arc)
    }

    /// A full circle.
    ///
    /// # Errors
    ///
    /// Returns an `OutOfRange` error if the radius is not positive.
    pub fn circle(center: Vector3, radius: f64) -> Result<Self> {
        Self::new(center, radius, 0.0, 360.0)
    }

    #[must_use]
    pub fn center(&self) -> &Vector3 {
        &self.center
    }

    #[must_use]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    #[must_use]
    pub fn start_angle(&self) -> f64 {
        self.start_angle
    }

    #[must_use]
    pub fn end_angle(&self) -> f64 {
        self.end_angle
    }

    /// Signed sweep in degrees, negative for clockwise arcs.
    #[must_use]
    pub fn sweep_angle(&self) -> f64 {
        self.end_angle - self.start_angle
    }

    /// Returns the point at `angle` degrees on the arc's circle.
    #[must_use]
    pub fn point_at_angle(&self, angle: f64) -> Vector3 {
        let (sin, cos) = angle.to_radians().sin_cos();
        self.center + Vector3::raw(cos * self.radius, sin * self.radius, 0.0)
    }
}

impl Curve for Arc {
    fn point_at(&self, u: f64) -> Vector3 {
        self.point_at_angle(self.start_angle + self.sweep_angle() * u.clamp(0.0, 1.0))
    }

    fn length(&self) -> f64 {
        self.radius * self.sweep_angle().abs().to_radians()
    }

    fn is_closed(&self) -> bool {
        self.sweep_angle().abs() >= 360.0 - EPSILON
    }
}

impl Entity for Arc {
    fn construct_args(&self) -> ConstructArgs<'_> {
        ConstructArgs::Arc {
            center: &self.center,
            radius: self.radius,
            start_angle: self.start_angle,
            end_angle: self.end_angle,
        }
    }

    fn as_instance(&mut self) -> Instance<'_> {
        Instance::Arc(self)
    }

    fn validate_children(&mut self, ctx: &ConstructionContext) -> Result<(), ValidationError> {
        ctx.validate(&mut self.center)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::f64::consts::PI;

    use approx::assert_relative_eq;

    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn zero_radius_is_out_of_range() {
        let err = Arc::new(Vector3::ORIGIN, 0.0, 0.0, 90.0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OutOfRange);
    }

    #[test]
    fn equal_angles_are_invalid() {
        let err = Arc::new(Vector3::ORIGIN, 1.0, 30.0, 30.0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    #[test]
    fn angle_past_full_turn_is_out_of_range() {
        let err = Arc::new(Vector3::ORIGIN, 1.0, 0.0, 400.0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OutOfRange);
    }

    #[test]
    fn quarter_arc_geometry() {
        let arc = Arc::new(Vector3::ORIGIN, 2.0, 0.0, 90.0).unwrap();
        assert_relative_eq!(arc.length(), PI);
        assert!(arc.start().is_almost_equal_to(&Vector3::new(2.0, 0.0, 0.0).unwrap()));
        assert!(arc.end().is_almost_equal_to(&Vector3::new(0.0, 2.0, 0.0).unwrap()));
        assert!(!arc.is_closed());
    }

    #[test]
    fn full_circle_is_closed() {
        let circle = Arc::circle(Vector3::new(1.0, 1.0, 3.0).unwrap(), 1.0).unwrap();
        assert!(circle.is_closed());
        assert!(circle.start().is_almost_equal_to(&circle.end()));
        assert_relative_eq!(circle.start().z(), 3.0);
    }
}
