use serde::{Deserialize, Serialize};

use crate::error::{Result, ValidationError};
use crate::math::intersect_2d::segment_segment_intersect_2d;
use crate::math::Point2;
use crate::validation::{ConstructArgs, ConstructionContext, Entity, Instance};

use crate::geometry::Vector3;
use super::Curve;

/// A straight segment between two distinct points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Line {
    start: Vector3,
    end: Vector3,
}

impl Line {
    /// Creates a line in the default validated context.
    ///
    /// # Errors
    ///
    /// Returns an `InvalidArgument` error if `start` and `end` are the same
    /// point within tolerance.
    pub fn new(start: Vector3, end: Vector3) -> Result<Self> {
        Self::new_in(&ConstructionContext::default(), start, end)
    }

    /// Creates a line in an explicit construction context.
    ///
    /// # Errors
    ///
    /// Returns an `InvalidArgument` error if validation is on and the end
    /// points coincide.
    pub fn new_in(ctx: &ConstructionContext, start: Vector3, end: Vector3) -> Result<Self> {
        ctx.pre_construct(&ConstructArgs::Line {
            start: &start,
            end: &end,
        })?;
        let mut line = Self { start, end };
        ctx.post_construct(line.as_instance())?;
        Ok(line)
    }

    pub(crate) fn raw(start: Vector3, end: Vector3) -> Self {
        Self { start, end }
    }

    #[must_use]
    pub fn start(&self) -> &Vector3 {
        &self.start
    }

    #[must_use]
    pub fn end(&self) -> &Vector3 {
        &self.end
    }

    /// Returns the unit direction from start to end.
    #[must_use]
    pub fn direction(&self) -> Vector3 {
        (self.end - self.start).unitized()
    }

    /// Returns the line running from end to start.
    #[must_use]
    pub fn reversed(&self) -> Self {
        Self::raw(self.end, self.start)
    }

    /// Intersects the XY projections of two lines.
    ///
    /// The returned point takes its Z from `self`. Parallel lines never
    /// intersect.
    #[must_use]
    pub fn intersects_2d(&self, other: &Self) -> Option<Vector3> {
        let flat = |v: &Vector3| Point2::new(v.x(), v.y());
        let (_, t, _) = segment_segment_intersect_2d(
            &flat(&self.start),
            &flat(&self.end),
            &flat(&other.start),
            &flat(&other.end),
        )?;
        Some(self.point_at(t))
    }
}

impl Curve for Line {
    fn point_at(&self, u: f64) -> Vector3 {
        self.start + (self.end - self.start) * u.clamp(0.0, 1.0)
    }

    fn length(&self) -> f64 {
        self.start.distance_to(&self.end)
    }

    fn is_closed(&self) -> bool {
        false
    }
}

impl Entity for Line {
    fn construct_args(&self) -> ConstructArgs<'_> {
        ConstructArgs::Line {
            start: &self.start,
            end: &self.end,
        }
    }

    fn as_instance(&mut self) -> Instance<'_> {
        Instance::Line(self)
    }

    fn validate_children(&mut self, ctx: &ConstructionContext) -> Result<(), ValidationError> {
        ctx.validate(&mut self.start)?;
        ctx.validate(&mut self.end)
    }
}
