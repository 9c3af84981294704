use serde::{Deserialize, Serialize};

use crate::error::{Result, ValidationError};
use crate::validation::{ConstructArgs, ConstructionContext, Entity, Instance};

use super::Polygon;

/// A planar region: an outer perimeter minus zero or more voids.
///
/// After validated construction every void winds opposite to the perimeter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    perimeter: Polygon,
    #[serde(default)]
    voids: Vec<Polygon>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
}

impl Profile {
    /// Creates a profile in the default validated context.
    ///
    /// `None` for `voids` means no voids.
    ///
    /// # Errors
    ///
    /// Returns a `GeometricInconsistency` error if the perimeter is not
    /// coplanar.
    pub fn new(perimeter: Polygon, voids: Option<Vec<Polygon>>) -> Result<Self> {
        Self::new_in(&ConstructionContext::default(), perimeter, voids)
    }

    /// Creates a profile in an explicit construction context.
    ///
    /// # Errors
    ///
    /// See [`Profile::new`]; no check runs in a trusted context.
    pub fn new_in(
        ctx: &ConstructionContext,
        perimeter: Polygon,
        voids: Option<Vec<Polygon>>,
    ) -> Result<Self> {
        ctx.pre_construct(&ConstructArgs::Profile {
            perimeter: &perimeter,
            voids: voids.as_deref(),
        })?;
        let mut profile = Self {
            perimeter,
            voids: voids.unwrap_or_default(),
            name: None,
        };
        ctx.post_construct(profile.as_instance())?;
        Ok(profile)
    }

    /// Sets the profile's name.
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn perimeter(&self) -> &Polygon {
        &self.perimeter
    }

    #[must_use]
    pub fn voids(&self) -> &[Polygon] {
        &self.voids
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Perimeter area less the void areas.
    #[must_use]
    pub fn area(&self) -> f64 {
        self.perimeter.area() - self.voids.iter().map(Polygon::area).sum::<f64>()
    }

    /// Reverses every void that winds the same way as the perimeter.
    pub(crate) fn orient_voids(&mut self) {
        let normal = self.perimeter.normal();
        for void in &mut self.voids {
            if void.normal().dot(&normal) > 0.0 {
                *void = void.reversed();
            }
        }
    }
}

impl Entity for Profile {
    fn construct_args(&self) -> ConstructArgs<'_> {
        ConstructArgs::Profile {
            perimeter: &self.perimeter,
            voids: Some(&self.voids),
        }
    }

    fn as_instance(&mut self) -> Instance<'_> {
        Instance::Profile(self)
    }

    fn validate_children(&mut self, ctx: &ConstructionContext) -> Result<(), ValidationError> {
        ctx.validate(&mut self.perimeter)?;
        self.voids.iter_mut().try_for_each(|v| ctx.validate(v))
    }
}
