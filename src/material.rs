//! Surface materials and the built-in material library.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Result, ValidationError};
use crate::geometry::{Color, Colors};
use crate::validation::{ConstructArgs, ConstructionContext, Entity, Instance};

/// The appearance of an element's surfaces.
///
/// Specular and glossiness factors lie in `[0, 1]`. Texture paths that do
/// not name an existing file are cleared during validated construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    id: Uuid,
    name: String,
    color: Color,
    specular_factor: f64,
    glossiness_factor: f64,
    #[serde(default)]
    unlit: bool,
    #[serde(default)]
    pub(crate) texture: Option<PathBuf>,
    #[serde(default = "default_true")]
    repeat_texture: bool,
    #[serde(default = "default_true")]
    interpolate_texture: bool,
    #[serde(default)]
    pub(crate) normal_texture: Option<PathBuf>,
    #[serde(default)]
    pub(crate) emissive_texture: Option<PathBuf>,
    #[serde(default = "default_emissive_factor")]
    emissive_factor: f64,
    #[serde(default)]
    double_sided: bool,
}

fn default_true() -> bool {
    true
}

fn default_emissive_factor() -> f64 {
    1.0
}

impl Material {
    /// Creates a material with default options in the validated context.
    ///
    /// # Errors
    ///
    /// Returns an `OutOfRange` error if either factor is outside `[0, 1]`.
    pub fn new(
        name: impl Into<String>,
        color: Color,
        specular_factor: f64,
        glossiness_factor: f64,
    ) -> Result<Self> {
        MaterialBuilder::new(name)
            .color(color)
            .specular_factor(specular_factor)
            .glossiness_factor(glossiness_factor)
            .build()
    }

    /// Starts a builder for a material named `name`.
    #[must_use]
    pub fn builder(name: impl Into<String>) -> MaterialBuilder {
        MaterialBuilder::new(name)
    }

    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn color(&self) -> &Color {
        &self.color
    }

    #[must_use]
    pub fn specular_factor(&self) -> f64 {
        self.specular_factor
    }

    #[must_use]
    pub fn glossiness_factor(&self) -> f64 {
        self.glossiness_factor
    }

    #[must_use]
    pub fn unlit(&self) -> bool {
        self.unlit
    }

    #[must_use]
    pub fn texture(&self) -> Option<&Path> {
        self.texture.as_deref()
    }

    #[must_use]
    pub fn repeat_texture(&self) -> bool {
        self.repeat_texture
    }

    #[must_use]
    pub fn interpolate_texture(&self) -> bool {
        self.interpolate_texture
    }

    #[must_use]
    pub fn normal_texture(&self) -> Option<&Path> {
        self.normal_texture.as_deref()
    }

    #[must_use]
    pub fn emissive_texture(&self) -> Option<&Path> {
        self.emissive_texture.as_deref()
    }

    #[must_use]
    pub fn emissive_factor(&self) -> f64 {
        self.emissive_factor
    }

    #[must_use]
    pub fn double_sided(&self) -> bool {
        self.double_sided
    }

    /// Returns a builder holding this material's values and id.
    #[must_use]
    pub fn to_builder(&self) -> MaterialBuilder {
        MaterialBuilder {
            id: Some(self.id),
            name: self.name.clone(),
            color: self.color,
            specular_factor: self.specular_factor,
            glossiness_factor: self.glossiness_factor,
            unlit: self.unlit,
            texture: self.texture.clone(),
            repeat_texture: self.repeat_texture,
            interpolate_texture: self.interpolate_texture,
            normal_texture: self.normal_texture.clone(),
            emissive_texture: self.emissive_texture.clone(),
            emissive_factor: self.emissive_factor,
            double_sided: self.double_sided,
        }
    }

    /// Applies `edit` to a copy, validates it, then commits it.
    ///
    /// On error the material is left unchanged.
    ///
    /// # Errors
    ///
    /// Returns the validation error of the edited material.
    pub fn update(
        &mut self,
        ctx: &ConstructionContext,
        edit: impl FnOnce(MaterialBuilder) -> MaterialBuilder,
    ) -> Result<()> {
        *self = edit(self.to_builder()).build_in(ctx)?;
        Ok(())
    }
}

impl Entity for Material {
    fn construct_args(&self) -> ConstructArgs<'_> {
        ConstructArgs::Material {
            name: &self.name,
            color: &self.color,
            specular_factor: self.specular_factor,
            glossiness_factor: self.glossiness_factor,
            emissive_factor: self.emissive_factor,
            texture: self.texture.as_deref(),
            normal_texture: self.normal_texture.as_deref(),
            emissive_texture: self.emissive_texture.as_deref(),
        }
    }

    fn as_instance(&mut self) -> Instance<'_> {
        Instance::Material(self)
    }

    fn validate_children(&mut self, ctx: &ConstructionContext) -> Result<(), ValidationError> {
        ctx.validate(&mut self.color)
    }
}

/// Builds a [`Material`], filling unspecified options with defaults.
#[derive(Debug, Clone)]
pub struct MaterialBuilder {
    id: Option<Uuid>,
    name: String,
    color: Color,
    specular_factor: f64,
    glossiness_factor: f64,
    unlit: bool,
    texture: Option<PathBuf>,
    repeat_texture: bool,
    interpolate_texture: bool,
    normal_texture: Option<PathBuf>,
    emissive_texture: Option<PathBuf>,
    emissive_factor: f64,
    double_sided: bool,
}

impl MaterialBuilder {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            color: Colors::GRAY,
            specular_factor: 0.1,
            glossiness_factor: 0.1,
            unlit: false,
            texture: None,
            repeat_texture: true,
            interpolate_texture: true,
            normal_texture: None,
            emissive_texture: None,
            emissive_factor: 1.0,
            double_sided: false,
        }
    }

    /// Uses a fixed id instead of a fresh random one.
    #[must_use]
    pub fn id(mut self, id: Uuid) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    #[must_use]
    pub fn color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    #[must_use]
    pub fn specular_factor(mut self, value: f64) -> Self {
        self.specular_factor = value;
        self
    }

    #[must_use]
    pub fn glossiness_factor(mut self, value: f64) -> Self {
        self.glossiness_factor = value;
        self
    }

    #[must_use]
    pub fn unlit(mut self, unlit: bool) -> Self {
        self.unlit = unlit;
        self
    }

    #[must_use]
    pub fn texture(mut self, path: impl Into<PathBuf>) -> Self {
        self.texture = Some(path.into());
        self
    }

    #[must_use]
    pub fn repeat_texture(mut self, repeat: bool) -> Self {
        self.repeat_texture = repeat;
        self
    }

    #[must_use]
    pub fn interpolate_texture(mut self, interpolate: bool) -> Self {
        self.interpolate_texture = interpolate;
        self
    }

    #[must_use]
    pub fn normal_texture(mut self, path: impl Into<PathBuf>) -> Self {
        self.normal_texture = Some(path.into());
        self
    }

    #[must_use]
    pub fn emissive_texture(mut self, path: impl Into<PathBuf>) -> Self {
        self.emissive_texture = Some(path.into());
        self
    }

    #[must_use]
    pub fn emissive_factor(mut self, value: f64) -> Self {
        self.emissive_factor = value;
        self
    }

    #[must_use]
    pub fn double_sided(mut self, double_sided: bool) -> Self {
        self.double_sided = double_sided;
        self
    }

    /// Builds the material in the default validated context.
    ///
    /// # Errors
    ///
    /// Returns an `OutOfRange` error if either factor is outside `[0, 1]`.
    pub fn build(self) -> Result<Material> {
        self.build_in(&ConstructionContext::default())
    }

    /// Builds the material in an explicit construction context.
    ///
    /// # Errors
    ///
    /// See [`MaterialBuilder::build`]; no check runs in a trusted context.
    pub fn build_in(self, ctx: &ConstructionContext) -> Result<Material> {
        ctx.pre_construct(&ConstructArgs::Material {
            name: &self.name,
            color: &self.color,
            specular_factor: self.specular_factor,
            glossiness_factor: self.glossiness_factor,
            emissive_factor: self.emissive_factor,
            texture: self.texture.as_deref(),
            normal_texture: self.normal_texture.as_deref(),
            emissive_texture: self.emissive_texture.as_deref(),
        })?;
        let mut material = Material {
            id: self.id.unwrap_or_else(Uuid::new_v4),
            name: self.name,
            color: self.color,
            specular_factor: self.specular_factor,
            glossiness_factor: self.glossiness_factor,
            unlit: self.unlit,
            texture: self.texture,
            repeat_texture: self.repeat_texture,
            interpolate_texture: self.interpolate_texture,
            normal_texture: self.normal_texture,
            emissive_texture: self.emissive_texture,
            emissive_factor: self.emissive_factor,
            double_sided: self.double_sided,
        };
        ctx.post_construct(material.as_instance())?;
        Ok(material)
    }
}

/// Materials shipped with the library. Ids are derived from the names and do
/// not change between runs.
pub struct BuiltInMaterials;

impl BuiltInMaterials {
    fn builtin(name: &str, color: Color, specular_factor: f64, glossiness_factor: f64) -> Material {
        let id = Uuid::new_v5(
            &Uuid::NAMESPACE_OID,
            format!("elemgeo.material.{name}").as_bytes(),
        );
        Material {
            id,
            name: name.to_owned(),
            color,
            specular_factor,
            glossiness_factor,
            unlit: false,
            texture: None,
            repeat_texture: true,
            interpolate_texture: true,
            normal_texture: None,
            emissive_texture: None,
            emissive_factor: default_emissive_factor(),
            double_sided: false,
        }
    }

    /// The material given to elements that have none.
    #[must_use]
    pub fn default_material() -> Material {
        Self::builtin("default", Colors::WHITE, 0.1, 0.1)
    }

    #[must_use]
    pub fn steel() -> Material {
        Self::builtin("steel", Colors::STEEL, 0.9, 0.5)
    }

    #[must_use]
    pub fn concrete() -> Material {
        Self::builtin("concrete", Colors::GRAY, 0.1, 0.1)
    }

    #[must_use]
    pub fn glass() -> Material {
        Self::builtin("glass", Color::raw(0.7, 0.8, 0.9, 0.3), 0.8, 0.9)
    }

    #[must_use]
    pub fn wood() -> Material {
        Self::builtin("wood", Colors::BROWN, 0.1, 0.2)
    }

    #[must_use]
    pub fn black() -> Material {
        Self::builtin("black", Colors::BLACK, 0.1, 0.1)
    }

    /// Translucent material for conceptual masses.
    #[must_use]
    pub fn mass() -> Material {
        Self::builtin("mass", Color::raw(0.5, 0.5, 1.0, 0.2), 0.1, 0.1)
    }
}
