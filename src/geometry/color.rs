use serde::{Deserialize, Serialize};

use crate::error::{ElemGeoError, Result};
use crate::validation::{ConstructArgs, ConstructionContext, Entity, Instance};

/// An RGBA color with channels in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    red: f64,
    green: f64,
    blue: f64,
    alpha: f64,
}

impl Color {
    /// Creates a color in the default validated context.
    ///
    /// # Errors
    ///
    /// Returns an `OutOfRange` error if any channel is outside `[0, 1]`.
    pub fn new(red: f64, green: f64, blue: f64, alpha: f64) -> Result<Self> {
        Self::new_in(&ConstructionContext::default(), red, green, blue, alpha)
    }

    /// Creates a color in an explicit construction context.
    ///
    /// # Errors
    ///
    /// Returns an `OutOfRange` error if validation is on and any channel is
    /// outside `[0, 1]`.
    pub fn new_in(
        ctx: &ConstructionContext,
        red: f64,
        green: f64,
        blue: f64,
        alpha: f64,
    ) -> Result<Self> {
        ctx.pre_construct(&ConstructArgs::Color {
            red,
            green,
            blue,
            alpha,
        })?;
        let mut color = Self {
            red,
            green,
            blue,
            alpha,
        };
        ctx.post_construct(color.as_instance())?;
        Ok(color)
    }

    pub(crate) const fn raw(red: f64, green: f64, blue: f64, alpha: f64) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    #[must_use]
    pub fn red(&self) -> f64 {
        self.red
    }

    #[must_use]
    pub fn green(&self) -> f64 {
        self.green
    }

    #[must_use]
    pub fn blue(&self) -> f64 {
        self.blue
    }

    #[must_use]
    pub fn alpha(&self) -> f64 {
        self.alpha
    }
}

impl Entity for Color {
    fn construct_args(&self) -> ConstructArgs<'_> {
        ConstructArgs::Color {
            red: self.red,
            green: self.green,
            blue: self.blue,
            alpha: self.alpha,
        }
    }

    fn as_instance(&mut self) -> Instance<'_> {
        Instance::Color(self)
    }
}

/// Opaque color from `(red, green, blue)`.
impl TryFrom<(f64, f64, f64)> for Color {
    type Error = ElemGeoError;

    fn try_from((red, green, blue): (f64, f64, f64)) -> Result<Self> {
        Self::new(red, green, blue, 1.0)
    }
}

impl TryFrom<(f64, f64, f64, f64)> for Color {
    type Error = ElemGeoError;

    fn try_from((red, green, blue, alpha): (f64, f64, f64, f64)) -> Result<Self> {
        Self::new(red, green, blue, alpha)
    }
}

/// Named colors.
pub struct Colors;

impl Colors {
    pub const AQUA: Color = Color::raw(0.3, 0.7, 0.7, 1.0);
    pub const BLACK: Color = Color::raw(0.0, 0.0, 0.0, 1.0);
    pub const BLUE: Color = Color::raw(0.0, 0.0, 1.0, 1.0);
    pub const BROWN: Color = Color::raw(0.5, 0.25, 0.1, 1.0);
    pub const CRIMSON: Color = Color::raw(0.86, 0.08, 0.24, 1.0);
    pub const CYAN: Color = Color::raw(0.0, 1.0, 1.0, 1.0);
    pub const DARK_GRAY: Color = Color::raw(0.2, 0.2, 0.2, 1.0);
    pub const GRAY: Color = Color::raw(0.5, 0.5, 0.5, 1.0);
    pub const GREEN: Color = Color::raw(0.0, 1.0, 0.0, 1.0);
    pub const MAGENTA: Color = Color::raw(1.0, 0.0, 1.0, 1.0);
    pub const MINT: Color = Color::raw(0.6, 0.9, 0.8, 1.0);
    pub const ORANGE: Color = Color::raw(1.0, 0.65, 0.0, 1.0);
    pub const RED: Color = Color::raw(1.0, 0.0, 0.0, 1.0);
    pub const SAND: Color = Color::raw(0.9, 0.85, 0.7, 1.0);
    pub const STEEL: Color = Color::raw(0.6, 0.6, 0.65, 1.0);
    pub const WHITE: Color = Color::raw(1.0, 1.0, 1.0, 1.0);
    pub const YELLOW: Color = Color::raw(1.0, 1.0, 0.0, 1.0);
}
