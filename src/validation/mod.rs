//! Construction-time validation.
//!
//! Every entity constructor builds a [`ConstructArgs`] from its borrowed
//! arguments and hands it to a [`ConstructionContext`] before assigning any
//! field, then hands the assigned value back as an [`Instance`] so that
//! defaults can be filled in. The context looks up at most one [`Validator`]
//! per [`EntityKind`] in its [`ValidatorRegistry`]; kinds without a validator
//! construct unchecked.

mod registry;
mod validators;

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use tracing::trace;

use crate::dimension::LinearDimension;
use crate::element::GeometricElement;
use crate::error::ValidationError;
use crate::geometry::{
    Arc as ArcCurve, BBox3, Color, CurveGeometry, Line, Matrix, Plane, Polygon, Polyline, Profile,
    Vector3,
};
use crate::material::Material;
use crate::operations::{ExtrudeParams, LaminaParams, SweepParams};

pub use registry::ValidatorRegistry;
pub use validators::{
    ArcValidator, BBox3Validator, ColorValidator, ExtrudeValidator, GeometricElementValidator,
    LineValidator, MaterialValidator, MatrixValidator, PlaneValidator, PolygonValidator,
    PolylineValidator, ProfileValidator, Vector3Validator,
};

/// The closed set of entity kinds that can carry a validator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Vector3,
    Color,
    Plane,
    Line,
    Polyline,
    Polygon,
    Arc,
    Matrix,
    BBox3,
    Profile,
    Material,
    GeometricElement,
    LinearDimension,
    Extrude,
    Sweep,
    Lamina,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Borrowed constructor arguments, seen by validators before any field of the
/// new entity is assigned.
#[derive(Debug, Clone, Copy)]
pub enum ConstructArgs<'a> {
    Vector3 {
        x: f64,
        y: f64,
        z: f64,
    },
    Color {
        red: f64,
        green: f64,
        blue: f64,
        alpha: f64,
    },
    Plane {
        origin: &'a Vector3,
        normal: &'a Vector3,
    },
    Line {
        start: &'a Vector3,
        end: &'a Vector3,
    },
    Polyline {
        vertices: &'a [Vector3],
    },
    Polygon {
        vertices: &'a [Vector3],
    },
    Arc {
        center: &'a Vector3,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
    },
    Matrix {
        components: &'a [f64],
    },
    BBox3 {
        min: &'a Vector3,
        max: &'a Vector3,
    },
    Profile {
        perimeter: &'a Polygon,
        voids: Option<&'a [Polygon]>,
    },
    Material {
        name: &'a str,
        color: &'a Color,
        specular_factor: f64,
        glossiness_factor: f64,
        emissive_factor: f64,
        texture: Option<&'a Path>,
        normal_texture: Option<&'a Path>,
        emissive_texture: Option<&'a Path>,
    },
    GeometricElement {
        material: Option<&'a Material>,
    },
    LinearDimension {
        plane: &'a Plane,
        start: &'a Vector3,
        end: &'a Vector3,
        reference_plane: &'a Plane,
    },
    Extrude {
        profile: &'a Profile,
        height: f64,
        direction: &'a Vector3,
        is_void: bool,
        flipped: bool,
    },
    Sweep {
        profile: &'a Profile,
        curve: &'a CurveGeometry,
        start_setback: f64,
        end_setback: f64,
        is_void: bool,
    },
    Lamina {
        perimeter: &'a Polygon,
        is_void: bool,
    },
}

impl ConstructArgs<'_> {
    /// Returns the kind of entity these arguments construct.
    #[must_use]
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Vector3 { .. } => EntityKind::Vector3,
            Self::Color { .. } => EntityKind::Color,
            Self::Plane { .. } => EntityKind::Plane,
            Self::Line { .. } => EntityKind::Line,
            Self::Polyline { .. } => EntityKind::Polyline,
            Self::Polygon { .. } => EntityKind::Polygon,
            Self::Arc { .. } => EntityKind::Arc,
            Self::Matrix { .. } => EntityKind::Matrix,
            Self::BBox3 { .. } => EntityKind::BBox3,
            Self::Profile { .. } => EntityKind::Profile,
            Self::Material { .. } => EntityKind::Material,
            Self::GeometricElement { .. } => EntityKind::GeometricElement,
            Self::LinearDimension { .. } => EntityKind::LinearDimension,
            Self::Extrude { .. } => EntityKind::Extrude,
            Self::Sweep { .. } => EntityKind::Sweep,
            Self::Lamina { .. } => EntityKind::Lamina,
        }
    }
}

/// A freshly assigned entity, handed to post-construction hooks.
#[derive(Debug)]
pub enum Instance<'a> {
    Vector3(&'a mut Vector3),
    Color(&'a mut Color),
    Plane(&'a mut Plane),
    Line(&'a mut Line),
    Polyline(&'a mut Polyline),
    Polygon(&'a mut Polygon),
    Arc(&'a mut ArcCurve),
    Matrix(&'a mut Matrix),
    BBox3(&'a mut BBox3),
    Profile(&'a mut Profile),
    Material(&'a mut Material),
    GeometricElement(&'a mut GeometricElement),
    LinearDimension(&'a mut LinearDimension),
    Extrude(&'a mut ExtrudeParams),
    Sweep(&'a mut SweepParams),
    Lamina(&'a mut LaminaParams),
}

impl Instance<'_> {
    /// Returns the kind of the wrapped entity.
    #[must_use]
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Vector3(_) => EntityKind::Vector3,
            Self::Color(_) => EntityKind::Color,
            Self::Plane(_) => EntityKind::Plane,
            Self::Line(_) => EntityKind::Line,
            Self::Polyline(_) => EntityKind::Polyline,
            Self::Polygon(_) => EntityKind::Polygon,
            Self::Arc(_) => EntityKind::Arc,
            Self::Matrix(_) => EntityKind::Matrix,
            Self::BBox3(_) => EntityKind::BBox3,
            Self::Profile(_) => EntityKind::Profile,
            Self::Material(_) => EntityKind::Material,
            Self::GeometricElement(_) => EntityKind::GeometricElement,
            Self::LinearDimension(_) => EntityKind::LinearDimension,
            Self::Extrude(_) => EntityKind::Extrude,
            Self::Sweep(_) => EntityKind::Sweep,
            Self::Lamina(_) => EntityKind::Lamina,
        }
    }
}

/// Invariant checks for one entity kind.
pub trait Validator: Send + Sync {
    /// The entity kind this validator is registered for.
    fn validates(&self) -> EntityKind;

    /// Checks constructor arguments before any field is assigned.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if the proposed state violates an
    /// invariant of the entity.
    fn pre_construct(&self, args: &ConstructArgs<'_>) -> Result<(), ValidationError>;

    /// Fills defaults or normalizes a fully assigned instance.
    ///
    /// Must leave already-correct state unchanged.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if normalization is impossible.
    fn post_construct(&self, _instance: &mut Instance<'_>) -> Result<(), ValidationError> {
        Ok(())
    }
}

/// An entity that can describe itself to the validation hooks.
///
/// Used to re-enter validation for values that were not built through a
/// constructor, such as deserialized data or an edited copy.
pub trait Entity {
    /// Borrows the entity's fields as constructor arguments.
    fn construct_args(&self) -> ConstructArgs<'_>;

    /// Wraps the entity for post-construction hooks.
    fn as_instance(&mut self) -> Instance<'_>;

    /// Validates nested entities before the entity itself.
    ///
    /// # Errors
    ///
    /// Returns the first validator error raised by a nested entity.
    fn validate_children(&mut self, _ctx: &ConstructionContext) -> Result<(), ValidationError> {
        Ok(())
    }
}

/// Whether construction runs validators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConstructionMode {
    /// Run pre- and post-construction hooks.
    #[default]
    Validated,
    /// Skip all hooks. For trusted input such as bulk loads.
    Trusted,
}

/// The validators and mode used by a construction call path.
#[derive(Debug, Clone)]
pub struct ConstructionContext {
    registry: Arc<ValidatorRegistry>,
    mode: ConstructionMode,
}

impl ConstructionContext {
    /// Creates a context over an explicit registry.
    #[must_use]
    pub fn new(registry: Arc<ValidatorRegistry>, mode: ConstructionMode) -> Self {
        Self { registry, mode }
    }

    /// A validating context backed by the built-in registry.
    #[must_use]
    pub fn validated() -> Self {
        Self::new(ValidatorRegistry::global(), ConstructionMode::Validated)
    }

    /// A context that skips every hook.
    #[must_use]
    pub fn trusted() -> Self {
        Self::new(ValidatorRegistry::global(), ConstructionMode::Trusted)
    }

    /// Returns the construction mode.
    #[must_use]
    pub fn mode(&self) -> ConstructionMode {
        self.mode
    }

    /// Returns the registry validators are looked up in.
    #[must_use]
    pub fn registry(&self) -> &ValidatorRegistry {
        &self.registry
    }

    /// Runs the pre-construction hook for `args`, if any.
    ///
    /// # Errors
    ///
    /// Returns the validator's error if the arguments violate an invariant.
    pub fn pre_construct(&self, args: &ConstructArgs<'_>) -> Result<(), ValidationError> {
        if self.mode == ConstructionMode::Trusted {
            return Ok(());
        }
        match self.registry.get(args.kind()) {
            Some(validator) => {
                trace!(kind = %args.kind(), "pre-construct");
                validator.pre_construct(args)
            }
            None => Ok(()),
        }
    }

    /// Runs the post-construction hook for `instance`, if any.
    ///
    /// # Errors
    ///
    /// Returns the validator's error if normalization fails.
    pub fn post_construct(&self, mut instance: Instance<'_>) -> Result<(), ValidationError> {
        if self.mode == ConstructionMode::Trusted {
            return Ok(());
        }
        match self.registry.get(instance.kind()) {
            Some(validator) => {
                trace!(kind = %instance.kind(), "post-construct");
                validator.post_construct(&mut instance)
            }
            None => Ok(()),
        }
    }

    /// Runs both hooks on an existing value, nested entities first.
    ///
    /// # Errors
    ///
    /// Returns the first validator error encountered.
    pub fn validate<T: Entity + ?Sized>(&self, value: &mut T) -> Result<(), ValidationError> {
        if self.mode == ConstructionMode::Trusted {
            return Ok(());
        }
        value.validate_children(self)?;
        self.pre_construct(&value.construct_args())?;
        self.post_construct(value.as_instance())
    }
}

impl Default for ConstructionContext {
    fn default() -> Self {
        Self::validated()
    }
}
