use serde::{Deserialize, Serialize};

use crate::error::{Result, ValidationError};
use crate::validation::{ConstructArgs, ConstructionContext, Entity, Instance};

use super::Vector3;

/// An infinite plane through `origin` with a unit `normal`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Plane {
    origin: Vector3,
    normal: Vector3,
}

impl Plane {
    /// Creates a plane in the default validated context.
    ///
    /// The normal is unitized.
    ///
    /// # Errors
    ///
    /// Returns an `InvalidArgument` error if the normal has zero length.
    pub fn new(origin: Vector3, normal: Vector3) -> Result<Self> {
        Self::new_in(&ConstructionContext::default(), origin, normal)
    }

    /// Creates a plane in an explicit construction context.
    ///
    /// # Errors
    ///
    /// Returns an `InvalidArgument` error if validation is on and the normal
    /// has zero length.
    pub fn new_in(ctx: &ConstructionContext, origin: Vector3, normal: Vector3) -> Result<Self> {
        ctx.pre_construct(&ConstructArgs::Plane {
            origin: &origin,
            normal: &normal,
        })?;
        let mut plane = Self {
            origin,
            normal: normal.unitized(),
        };
        ctx.post_construct(plane.as_instance())?;
        Ok(plane)
    }

    pub(crate) fn raw(origin: Vector3, normal: Vector3) -> Self {
        Self {
            origin,
            normal: normal.unitized(),
        }
    }

    /// The world XY plane.
    #[must_use]
    pub fn xy() -> Self {
        Self::raw(Vector3::ORIGIN, Vector3::Z_AXIS)
    }

    /// Creates the plane through three points, with normal `(b - a) x (c - a)`.
    ///
    /// # Errors
    ///
    /// Returns an `InvalidArgument` error if the points are collinear.
    pub fn from_points(a: Vector3, b: Vector3, c: Vector3) -> Result<Self> {
        let normal = (b - a).cross(&(c - a));
        if normal.is_zero() {
            return Err(ValidationError::InvalidArgument(format!(
                "the points {a}, {b} and {c} are collinear and do not define a plane"
            ))
            .into());
        }
        Self::new(a, normal)
    }

    #[must_use]
    pub fn origin(&self) -> &Vector3 {
        &self.origin
    }

    #[must_use]
    pub fn normal(&self) -> &Vector3 {
        &self.normal
    }

    /// Signed distance from the plane to `point`, positive on the normal's side.
    #[must_use]
    pub fn distance_to(&self, point: &Vector3) -> f64 {
        self.normal.dot(&(*point - self.origin))
    }

    /// Projects `point` onto the plane along its normal.
    #[must_use]
    pub fn project(&self, point: &Vector3) -> Vector3 {
        *point - self.normal * self.distance_to(point)
    }
}

impl Entity for Plane {
    fn construct_args(&self) -> ConstructArgs<'_> {
        ConstructArgs::Plane {
            origin: &self.origin,
            normal: &self.normal,
        }
    }

    fn as_instance(&mut self) -> Instance<'_> {
        Instance::Plane(self)
    }

    fn validate_children(&mut self, ctx: &ConstructionContext) -> Result<(), ValidationError> {
        ctx.validate(&mut self.origin)?;
        ctx.validate(&mut self.normal)
    }
}
