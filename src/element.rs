//! Elements represented by solid operations.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Result, ValidationError};
use crate::geometry::Transform;
use crate::kernel::Kernel;
use crate::material::Material;
use crate::operations::{SolidOperation, SolidOperationParams};
use crate::validation::{ConstructArgs, ConstructionContext, Entity, Instance};

/// An element placed by a transform and represented by solid operations.
///
/// Validated construction assigns the default built-in material when none is
/// given.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeometricElement {
    id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    transform: Transform,
    pub(crate) material: Option<Material>,
    representation: Vec<SolidOperation>,
    is_element_definition: bool,
}

/// Declared fields of a persisted element.
#[derive(Deserialize)]
struct ElementRecord {
    id: Uuid,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    transform: Transform,
    #[serde(default)]
    material: Option<Material>,
    #[serde(default)]
    representation: Vec<SolidOperationParams>,
    #[serde(default)]
    is_element_definition: bool,
}

impl GeometricElement {
    /// Creates an element in the default validated context.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the material or transform is invalid.
    pub fn new(
        transform: Transform,
        material: Option<Material>,
        representation: Vec<SolidOperation>,
    ) -> Result<Self> {
        Self::new_in(&ConstructionContext::default(), transform, material, representation)
    }

    /// Creates an element in an explicit construction context.
    ///
    /// In a trusted context a missing material stays missing.
    ///
    /// # Errors
    ///
    /// See [`GeometricElement::new`].
    pub fn new_in(
        ctx: &ConstructionContext,
        transform: Transform,
        material: Option<Material>,
        representation: Vec<SolidOperation>,
    ) -> Result<Self> {
        ctx.pre_construct(&ConstructArgs::GeometricElement {
            material: material.as_ref(),
        })?;
        let mut element = Self {
            id: Uuid::new_v4(),
            name: None,
            transform,
            material,
            representation,
            is_element_definition: false,
        };
        ctx.post_construct(element.as_instance())?;
        Ok(element)
    }

    /// Reads an element from JSON.
    ///
    /// The element and its nested entities are validated in `ctx`, and every
    /// solid operation regenerates its geometry through `kernel`.
    ///
    /// # Errors
    ///
    /// Returns a serialization error for malformed JSON, a validation error
    /// for invalid data, or a kernel error if a solid cannot be generated.
    pub fn from_json(json: &str, ctx: &ConstructionContext, kernel: &Arc<dyn Kernel>) -> Result<Self> {
        let record: ElementRecord = serde_json::from_str(json)?;
        let representation = record
            .representation
            .into_iter()
            .map(|params| SolidOperation::from_params(ctx, params, Arc::clone(kernel)))
            .collect::<Result<Vec<_>>>()?;
        let mut element = Self {
            id: record.id,
            name: record.name,
            transform: record.transform,
            material: record.material,
            representation,
            is_element_definition: record.is_element_definition,
        };
        ctx.validate(&mut element)?;
        Ok(element)
    }

    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Marks the element as a definition to be placed by instances.
    #[must_use]
    pub fn as_definition(mut self) -> Self {
        self.is_element_definition = true;
        self
    }

    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    #[must_use]
    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    /// The element's material. Always present after validated construction.
    #[must_use]
    pub fn material(&self) -> Option<&Material> {
        self.material.as_ref()
    }

    #[must_use]
    pub fn representation(&self) -> &[SolidOperation] {
        &self.representation
    }

    /// Mutable access to the solid operations. Each operation keeps its own
    /// geometry in sync.
    pub fn representation_mut(&mut self) -> &mut [SolidOperation] {
        &mut self.representation
    }

    pub fn add_operation(&mut self, operation: impl Into<SolidOperation>) {
        self.representation.push(operation.into());
    }

    #[must_use]
    pub fn is_element_definition(&self) -> bool {
        self.is_element_definition
    }

    /// Operations that add material.
    pub fn solids(&self) -> impl Iterator<Item = &SolidOperation> {
        self.representation.iter().filter(|op| !op.is_void())
    }

    /// Operations that subtract material.
    pub fn voids(&self) -> impl Iterator<Item = &SolidOperation> {
        self.representation.iter().filter(|op| op.is_void())
    }

    /// Returns `true` if every operation currently has geometry.
    #[must_use]
    pub fn is_built(&self) -> bool {
        self.representation.iter().all(|op| op.solid().is_ok())
    }
}

impl Entity for GeometricElement {
    fn construct_args(&self) -> ConstructArgs<'_> {
        ConstructArgs::GeometricElement {
            material: self.material.as_ref(),
        }
    }

    fn as_instance(&mut self) -> Instance<'_> {
        Instance::GeometricElement(self)
    }

    fn validate_children(&mut self, ctx: &ConstructionContext) -> Result<(), ValidationError> {
        self.transform.validate_in(ctx)?;
        match &mut self.material {
            Some(material) => ctx.validate(material),
            None => Ok(()),
        }
    }
}
