use serde::{Deserialize, Serialize};

use crate::error::{KernelResult, Result, ValidationError};
use crate::geometry::Polygon;
use crate::kernel::{Kernel, Solid};
use crate::validation::{ConstructArgs, ConstructionContext, Entity, EntityKind, Instance};

use super::{ParametricSolid, SolidParams};

/// Parameters of a lamina: a planar perimeter with no thickness.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaminaParams {
    perimeter: Polygon,
    #[serde(default)]
    is_void: bool,
}

impl LaminaParams {
    #[must_use]
    pub fn new(perimeter: Polygon) -> Self {
        Self {
            perimeter,
            is_void: false,
        }
    }

    /// Marks the lamina as subtractive.
    #[must_use]
    pub fn void(mut self) -> Self {
        self.is_void = true;
        self
    }

    #[must_use]
    pub fn perimeter(&self) -> &Polygon {
        &self.perimeter
    }

    pub fn set_perimeter(&mut self, perimeter: Polygon) {
        self.perimeter = perimeter;
    }
}

impl Entity for LaminaParams {
    fn construct_args(&self) -> ConstructArgs<'_> {
        ConstructArgs::Lamina {
            perimeter: &self.perimeter,
            is_void: self.is_void,
        }
    }

    fn as_instance(&mut self) -> Instance<'_> {
        Instance::Lamina(self)
    }

    fn validate_children(&mut self, ctx: &ConstructionContext) -> Result<(), ValidationError> {
        ctx.validate(&mut self.perimeter)
    }
}

impl SolidParams for LaminaParams {
    const KIND: EntityKind = EntityKind::Lamina;

    fn is_void(&self) -> bool {
        self.is_void
    }

    fn set_void(&mut self, is_void: bool) {
        self.is_void = is_void;
    }

    fn generate(&self, kernel: &dyn Kernel) -> KernelResult<Solid> {
        kernel.create_lamina(&self.perimeter)
    }
}

/// A zero-thickness planar solid, kept in sync with its perimeter.
pub type Lamina = ParametricSolid<LaminaParams>;

impl Lamina {
    /// Replaces the perimeter and regenerates the solid.
    ///
    /// # Errors
    ///
    /// See [`ParametricSolid::update`].
    pub fn set_perimeter(&mut self, perimeter: Polygon) -> Result<()> {
        self.update(|p| p.set_perimeter(perimeter)).map(drop)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::kernel::BrepKernel;

    #[test]
    fn lamina_has_two_opposite_faces() {
        let op = Lamina::new(
            LaminaParams::new(Polygon::rectangle(2.0, 1.0).unwrap()),
            Arc::new(BrepKernel::default()),
        )
        .unwrap();
        let faces = op.solid().unwrap().faces();
        assert_eq!(faces.len(), 2);
        assert!((faces[0].normal() + faces[1].normal()).norm() < 1e-9);
    }

    #[test]
    fn set_perimeter_regenerates() {
        let mut op = Lamina::new(
            LaminaParams::new(Polygon::rectangle(2.0, 1.0).unwrap()),
            Arc::new(BrepKernel::default()),
        )
        .unwrap();
        let before = op.boolean_geometry().unwrap().triangle_count();
        op.set_perimeter(Polygon::rectangle(4.0, 4.0).unwrap()).unwrap();
        assert_eq!(op.boolean_geometry().unwrap().triangle_count(), before);
        assert_eq!(op.params().perimeter(), &Polygon::rectangle(4.0, 4.0).unwrap());
    }
}
