use serde::{Deserialize, Serialize};

use crate::error::{Result, ValidationError};
use crate::math::EPSILON;
use crate::validation::{ConstructArgs, ConstructionContext, Entity, Instance};

use super::Vector3;

/// An axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BBox3 {
    min: Vector3,
    max: Vector3,
}

impl BBox3 {
    /// Creates a box in the default validated context.
    ///
    /// # Errors
    ///
    /// Returns a `GeometricInconsistency` error if `min` and `max` share an
    /// X or a Y coordinate.
    pub fn new(min: Vector3, max: Vector3) -> Result<Self> {
        Self::new_in(&ConstructionContext::default(), min, max)
    }

    /// Creates a box in an explicit construction context.
    ///
    /// # Errors
    ///
    /// See [`BBox3::new`]; no check runs in a trusted context.
    pub fn new_in(ctx: &ConstructionContext, min: Vector3, max: Vector3) -> Result<Self> {
        ctx.pre_construct(&ConstructArgs::BBox3 {
            min: &min,
            max: &max,
        })?;
        let mut bbox = Self { min, max };
        ctx.post_construct(bbox.as_instance())?;
        Ok(bbox)
    }

    /// The tight box around `points`, or `None` if there are none.
    ///
    /// Derived boxes are not validated; a planar point set gives a flat box.
    #[must_use]
    pub fn from_points(points: &[Vector3]) -> Option<Self> {
        let first = points.first()?;
        let (min, max) = points.iter().fold((*first, *first), |(lo, hi), p| {
            (
                Vector3::raw(lo.x().min(p.x()), lo.y().min(p.y()), lo.z().min(p.z())),
                Vector3::raw(hi.x().max(p.x()), hi.y().max(p.y()), hi.z().max(p.z())),
            )
        });
        Some(Self { min, max })
    }

    #[must_use]
    pub fn min(&self) -> &Vector3 {
        &self.min
    }

    #[must_use]
    pub fn max(&self) -> &Vector3 {
        &self.max
    }

    #[must_use]
    pub fn center(&self) -> Vector3 {
        (self.min + self.max) / 2.0
    }

    /// Returns `true` if `point` is inside or within [`EPSILON`] of the box.
    #[must_use]
    pub fn contains(&self, point: &Vector3) -> bool {
        let within = |v: f64, lo: f64, hi: f64| v >= lo - EPSILON && v <= hi + EPSILON;
        within(point.x(), self.min.x(), self.max.x())
            && within(point.y(), self.min.y(), self.max.y())
            && within(point.z(), self.min.z(), self.max.z())
    }
}

impl Entity for BBox3 {
    fn construct_args(&self) -> ConstructArgs<'_> {
        ConstructArgs::BBox3 {
            min: &self.min,
            max: &self.max,
        }
    }

    fn as_instance(&mut self) -> Instance<'_> {
        Instance::BBox3(self)
    }

    fn validate_children(&mut self, ctx: &ConstructionContext) -> Result<(), ValidationError> {
        ctx.validate(&mut self.min)?;
        ctx.validate(&mut self.max)
    }
}
