//! Reactive solid operations.
//!
//! Each operation keeps its declared parameters next to the solid a
//! [`Kernel`] derived from them. Changing a parameter validates the new
//! state, regenerates the solid and only then commits, so the cached geometry
//! always matches the parameters it is reported with.

mod extrude;
mod lamina;
mod parametric;
mod sweep;

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

pub use extrude::{Extrude, ExtrudeParams};
pub use lamina::{Lamina, LaminaParams};
pub use parametric::ParametricSolid;
pub use sweep::{Sweep, SweepParams};

use crate::error::{KernelResult, Result};
use crate::kernel::{BooleanGeometry, Kernel, Solid};
use crate::validation::{ConstructionContext, Entity, EntityKind};

/// Parameters a kernel can turn into a solid.
pub trait SolidParams: Entity + Clone + PartialEq + fmt::Debug {
    /// The entity kind validators are looked up under.
    const KIND: EntityKind;

    /// Whether the solid is subtracted from its element.
    fn is_void(&self) -> bool;

    fn set_void(&mut self, is_void: bool);

    /// Generates the solid for these parameters.
    ///
    /// # Errors
    ///
    /// Returns the kernel's error if no solid can be generated.
    fn generate(&self, kernel: &dyn Kernel) -> KernelResult<Solid>;
}

/// Serialized form of a [`SolidOperation`]: parameters only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SolidOperationParams {
    Extrude(ExtrudeParams),
    Sweep(SweepParams),
    Lamina(LaminaParams),
}

/// Any of the solid operations an element can be represented by.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum SolidOperation {
    Extrude(Extrude),
    Sweep(Sweep),
    Lamina(Lamina),
}

impl SolidOperation {
    /// Builds an operation from its parameters, generating its solid.
    ///
    /// # Errors
    ///
    /// Returns a validation error for invalid parameters, or a kernel error
    /// if no solid can be generated.
    pub fn from_params(
        ctx: &ConstructionContext,
        params: SolidOperationParams,
        kernel: Arc<dyn Kernel>,
    ) -> Result<Self> {
        Ok(match params {
            SolidOperationParams::Extrude(p) => Self::Extrude(Extrude::new_in(ctx, p, kernel)?),
            SolidOperationParams::Sweep(p) => Self::Sweep(Sweep::new_in(ctx, p, kernel)?),
            SolidOperationParams::Lamina(p) => Self::Lamina(Lamina::new_in(ctx, p, kernel)?),
        })
    }

    /// Reads an operation from JSON, validating it and regenerating its
    /// solid.
    ///
    /// # Errors
    ///
    /// Returns a serialization error for malformed JSON, otherwise see
    /// [`SolidOperation::from_params`].
    pub fn from_json(json: &str, ctx: &ConstructionContext, kernel: Arc<dyn Kernel>) -> Result<Self> {
        let params: SolidOperationParams = serde_json::from_str(json)?;
        Self::from_params(ctx, params, kernel)
    }

    /// Returns a copy of the declared parameters.
    #[must_use]
    pub fn to_params(&self) -> SolidOperationParams {
        match self {
            Self::Extrude(op) => SolidOperationParams::Extrude(op.params().clone()),
            Self::Sweep(op) => SolidOperationParams::Sweep(op.params().clone()),
            Self::Lamina(op) => SolidOperationParams::Lamina(op.params().clone()),
        }
    }

    #[must_use]
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Extrude(_) => EntityKind::Extrude,
            Self::Sweep(_) => EntityKind::Sweep,
            Self::Lamina(_) => EntityKind::Lamina,
        }
    }

    #[must_use]
    pub fn is_void(&self) -> bool {
        match self {
            Self::Extrude(op) => op.is_void(),
            Self::Sweep(op) => op.is_void(),
            Self::Lamina(op) => op.is_void(),
        }
    }

    /// Returns the derived solid.
    ///
    /// # Errors
    ///
    /// Returns [`KernelError::NotBuilt`](crate::error::KernelError::NotBuilt)
    /// if the last change failed.
    pub fn solid(&self) -> KernelResult<&Solid> {
        match self {
            Self::Extrude(op) => op.solid(),
            Self::Sweep(op) => op.solid(),
            Self::Lamina(op) => op.solid(),
        }
    }

    /// Returns the boolean-ready triangulation of the derived solid.
    ///
    /// # Errors
    ///
    /// Returns [`KernelError::NotBuilt`](crate::error::KernelError::NotBuilt)
    /// if the last change failed.
    pub fn boolean_geometry(&self) -> KernelResult<&BooleanGeometry> {
        match self {
            Self::Extrude(op) => op.boolean_geometry(),
            Self::Sweep(op) => op.boolean_geometry(),
            Self::Lamina(op) => op.boolean_geometry(),
        }
    }

    /// Regenerates the solid from the current parameters.
    ///
    /// # Errors
    ///
    /// Returns the kernel error if generation fails.
    pub fn rebuild(&mut self) -> Result<()> {
        match self {
            Self::Extrude(op) => op.rebuild(),
            Self::Sweep(op) => op.rebuild(),
            Self::Lamina(op) => op.rebuild(),
        }
    }
}

impl From<Extrude> for SolidOperation {
    fn from(op: Extrude) -> Self {
        Self::Extrude(op)
    }
}

impl From<Sweep> for SolidOperation {
    fn from(op: Sweep) -> Self {
        Self::Sweep(op)
    }
}

impl From<Lamina> for SolidOperation {
    fn from(op: Lamina) -> Self {
        Self::Lamina(op)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::{Polygon, Profile, Vector3};
    use crate::kernel::BrepKernel;

    fn kernel() -> Arc<dyn Kernel> {
        Arc::new(BrepKernel::default())
    }

    fn square_extrude() -> SolidOperation {
        let profile = Profile::new(Polygon::rectangle(1.0, 1.0).unwrap(), None).unwrap();
        Extrude::new(ExtrudeParams::new(profile, 2.0, Vector3::Z_AXIS), kernel())
            .unwrap()
            .into()
    }

    // ── serialization ──

    #[test]
    fn serializes_parameters_with_type_tag() {
        let value = serde_json::to_value(square_extrude()).unwrap();
        assert_eq!(value["type"], "Extrude");
        assert_eq!(value["height"], 2.0);
        assert!(value.get("solid").is_none());
    }

    #[test]
    fn json_round_trip_restores_equal_operation() {
        let op = square_extrude();
        let json = serde_json::to_string(&op).unwrap();
        let restored =
            SolidOperation::from_json(&json, &ConstructionContext::default(), kernel()).unwrap();
        assert_eq!(restored, op);
        assert_eq!(
            restored.solid().unwrap().faces().len(),
            op.solid().unwrap().faces().len()
        );
    }

    #[test]
    fn invalid_json_parameters_are_rejected() {
        let op = square_extrude();
        let mut value = serde_json::to_value(&op).unwrap();
        value["height"] = serde_json::json!(-1.0);
        let err = SolidOperation::from_json(
            &value.to_string(),
            &ConstructionContext::default(),
            kernel(),
        )
        .unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::OutOfRange);
    }

    #[test]
    fn malformed_json_is_a_serialization_error() {
        let err = SolidOperation::from_json(
            r#"{"type":"Extrude"}"#,
            &ConstructionContext::default(),
            kernel(),
        )
        .unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Serialization);
    }

    // ── dispatch ──

    #[test]
    fn kind_and_void_dispatch() {
        let op = square_extrude();
        assert_eq!(op.kind(), EntityKind::Extrude);
        assert!(!op.is_void());
        assert!(matches!(op.to_params(), SolidOperationParams::Extrude(_)));
    }
}
