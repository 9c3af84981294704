use serde::{Deserialize, Serialize};

use crate::error::{KernelResult, Result, ValidationError};
use crate::geometry::{Profile, Vector3};
use crate::kernel::{Kernel, Solid};
use crate::validation::{ConstructArgs, ConstructionContext, Entity, EntityKind, Instance};

use super::{ParametricSolid, SolidParams};

/// Parameters of an extrusion: a profile pushed `height` along `direction`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtrudeParams {
    profile: Profile,
    height: f64,
    direction: Vector3,
    #[serde(default)]
    is_void: bool,
    #[serde(default)]
    flipped: bool,
}

impl ExtrudeParams {
    #[must_use]
    pub fn new(profile: Profile, height: f64, direction: Vector3) -> Self {
        Self {
            profile,
            height,
            direction,
            is_void: false,
            flipped: false,
        }
    }

    /// Marks the extrusion as subtractive.
    #[must_use]
    pub fn void(mut self) -> Self {
        self.is_void = true;
        self
    }

    /// Reverses the orientation of the generated solid.
    #[must_use]
    pub fn flipped(mut self) -> Self {
        self.flipped = true;
        self
    }

    #[must_use]
    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.height
    }

    #[must_use]
    pub fn direction(&self) -> &Vector3 {
        &self.direction
    }

    #[must_use]
    pub fn is_flipped(&self) -> bool {
        self.flipped
    }

    pub fn set_profile(&mut self, profile: Profile) {
        self.profile = profile;
    }

    pub fn set_height(&mut self, height: f64) {
        self.height = height;
    }

    pub fn set_direction(&mut self, direction: Vector3) {
        self.direction = direction;
    }

    pub fn set_flipped(&mut self, flipped: bool) {
        self.flipped = flipped;
    }
}

impl Entity for ExtrudeParams {
    fn construct_args(&self) -> ConstructArgs<'_> {
        ConstructArgs::Extrude {
            profile: &self.profile,
            height: self.height,
            direction: &self.direction,
            is_void: self.is_void,
            flipped: self.flipped,
        }
    }

    fn as_instance(&mut self) -> Instance<'_> {
        Instance::Extrude(self)
    }

    fn validate_children(&mut self, ctx: &ConstructionContext) -> Result<(), ValidationError> {
        ctx.validate(&mut self.profile)?;
        ctx.validate(&mut self.direction)
    }
}

impl SolidParams for ExtrudeParams {
    const KIND: EntityKind = EntityKind::Extrude;

    fn is_void(&self) -> bool {
        self.is_void
    }

    fn set_void(&mut self, is_void: bool) {
        self.is_void = is_void;
    }

    fn generate(&self, kernel: &dyn Kernel) -> KernelResult<Solid> {
        kernel.create_extrude(&self.profile, self.height, &self.direction, self.flipped)
    }
}

/// A profile extruded along a direction, kept in sync with its parameters.
pub type Extrude = ParametricSolid<ExtrudeParams>;

impl Extrude {
    /// Replaces the profile and regenerates the solid.
    ///
    /// # Errors
    ///
    /// See [`ParametricSolid::update`].
    pub fn set_profile(&mut self, profile: Profile) -> Result<()> {
        self.update(|p| p.set_profile(profile)).map(drop)
    }

    /// Changes the height and regenerates the solid.
    ///
    /// # Errors
    ///
    /// Returns an `OutOfRange` error for a negative or non-finite height.
    /// See [`ParametricSolid::update`].
    pub fn set_height(&mut self, height: f64) -> Result<()> {
        self.update(|p| p.set_height(height)).map(drop)
    }

    /// Changes the direction and regenerates the solid.
    ///
    /// # Errors
    ///
    /// Returns an `InvalidArgument` error for a zero direction, or a kernel
    /// error for a direction lying in the profile's plane.
    pub fn set_direction(&mut self, direction: Vector3) -> Result<()> {
        self.update(|p| p.set_direction(direction)).map(drop)
    }

    /// Changes the orientation and regenerates the solid.
    ///
    /// # Errors
    ///
    /// See [`ParametricSolid::update`].
    pub fn set_flipped(&mut self, flipped: bool) -> Result<()> {
        self.update(|p| p.set_flipped(flipped)).map(drop)
    }
}
