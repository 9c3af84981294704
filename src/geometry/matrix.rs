use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::math::Matrix4;
use crate::validation::{ConstructArgs, ConstructionContext, Entity, Instance};

use super::Vector3;

/// A 3x4 affine matrix stored as 12 components.
///
/// The layout is three axis rows followed by the translation row:
/// `[xx, xy, xz, yx, yy, yz, zx, zy, zz, tx, ty, tz]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matrix {
    components: Vec<f64>,
}

impl Matrix {
    /// Creates a matrix in the default validated context.
    ///
    /// # Errors
    ///
    /// Returns an `OutOfRange` error unless exactly 12 components are given.
    pub fn new(components: Vec<f64>) -> Result<Self> {
        Self::new_in(&ConstructionContext::default(), components)
    }

    /// Creates a matrix in an explicit construction context.
    ///
    /// # Errors
    ///
    /// See [`Matrix::new`]; no check runs in a trusted context.
    pub fn new_in(ctx: &ConstructionContext, components: Vec<f64>) -> Result<Self> {
        ctx.pre_construct(&ConstructArgs::Matrix {
            components: &components,
        })?;
        let mut matrix = Self { components };
        ctx.post_construct(matrix.as_instance())?;
        Ok(matrix)
    }

    #[must_use]
    pub fn identity() -> Self {
        Self::from_rows(
            Vector3::X_AXIS,
            Vector3::Y_AXIS,
            Vector3::Z_AXIS,
            Vector3::ORIGIN,
        )
    }

    pub(crate) fn from_rows(x: Vector3, y: Vector3, z: Vector3, t: Vector3) -> Self {
        Self {
            components: vec![
                x.x(),
                x.y(),
                x.z(),
                y.x(),
                y.y(),
                y.z(),
                z.x(),
                z.y(),
                z.z(),
                t.x(),
                t.y(),
                t.z(),
            ],
        }
    }

    #[must_use]
    pub fn components(&self) -> &[f64] {
        &self.components
    }

    /// Missing components of an unvalidated matrix read as zero.
    fn row(&self, index: usize) -> Vector3 {
        let c = |i: usize| self.components.get(index * 3 + i).copied().unwrap_or(0.0);
        Vector3::raw(c(0), c(1), c(2))
    }

    #[must_use]
    pub fn x_axis(&self) -> Vector3 {
        self.row(0)
    }

    #[must_use]
    pub fn y_axis(&self) -> Vector3 {
        self.row(1)
    }

    #[must_use]
    pub fn z_axis(&self) -> Vector3 {
        self.row(2)
    }

    #[must_use]
    pub fn translation(&self) -> Vector3 {
        self.row(3)
    }

    #[rustfmt::skip]
    pub(crate) fn to_matrix4(&self) -> Matrix4 {
        let (x, y, z, t) = (self.x_axis(), self.y_axis(), self.z_axis(), self.translation());
        Matrix4::new(
            x.x(), y.x(), z.x(), t.x(),
            x.y(), y.y(), z.y(), t.y(),
            x.z(), y.z(), z.z(), t.z(),
            0.0,   0.0,   0.0,   1.0,
        )
    }

    pub(crate) fn from_matrix4(m: &Matrix4) -> Self {
        Self::from_rows(
            Vector3::raw(m[(0, 0)], m[(1, 0)], m[(2, 0)]),
            Vector3::raw(m[(0, 1)], m[(1, 1)], m[(2, 1)]),
            Vector3::raw(m[(0, 2)], m[(1, 2)], m[(2, 2)]),
            Vector3::raw(m[(0, 3)], m[(1, 3)], m[(2, 3)]),
        )
    }
}

impl Default for Matrix {
    fn default() -> Self {
        Self::identity()
    }
}

impl Entity for Matrix {
    fn construct_args(&self) -> ConstructArgs<'_> {
        ConstructArgs::Matrix {
            components: &self.components,
        }
    }

    fn as_instance(&mut self) -> Instance<'_> {
        Instance::Matrix(self)
    }
}
