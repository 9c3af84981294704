use serde::{Deserialize, Serialize};

use crate::error::{Result, ValidationError};
use crate::math::Point3;
use crate::validation::ConstructionContext;

use super::{Matrix, Plane, Vector3};

/// An affine transform.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Transform {
    matrix: Matrix,
}

impl Transform {
    #[must_use]
    pub fn new(matrix: Matrix) -> Self {
        Self { matrix }
    }

    #[must_use]
    pub fn identity() -> Self {
        Self::new(Matrix::identity())
    }

    /// A pure translation to `origin`.
    #[must_use]
    pub fn from_origin(origin: Vector3) -> Self {
        Self::new(Matrix::from_rows(
            Vector3::X_AXIS,
            Vector3::Y_AXIS,
            Vector3::Z_AXIS,
            origin,
        ))
    }

    /// A right-handed frame at `origin` with the given X and Z directions.
    ///
    /// The X direction is made perpendicular to Z.
    ///
    /// # Errors
    ///
    /// Returns an `InvalidArgument` error if either direction is zero or they
    /// are parallel.
    pub fn from_axes(origin: Vector3, x_axis: Vector3, z_axis: Vector3) -> Result<Self> {
        let z = z_axis.unitized();
        let x = x_axis - z * x_axis.dot(&z);
        if z.is_zero() || x.is_zero() {
            return Err(ValidationError::InvalidArgument(format!(
                "the axes {x_axis} and {z_axis} do not define a frame"
            ))
            .into());
        }
        let x = x.unitized();
        let y = z.cross(&x);
        Ok(Self::new(Matrix::from_rows(x, y, z, origin)))
    }

    /// A frame on `plane` whose Z axis is the plane normal.
    ///
    /// The X axis is world X projected onto the plane, or world Y when the
    /// normal is along X.
    #[must_use]
    pub fn from_plane(plane: &Plane) -> Self {
        let z = plane.normal().unitized();
        let reference = if z.is_parallel_to(&Vector3::X_AXIS) {
            Vector3::Y_AXIS
        } else {
            Vector3::X_AXIS
        };
        let x = (reference - z * reference.dot(&z)).unitized();
        let y = z.cross(&x);
        Self::new(Matrix::from_rows(x, y, z, *plane.origin()))
    }

    #[must_use]
    pub fn matrix(&self) -> &Matrix {
        &self.matrix
    }

    #[must_use]
    pub fn origin(&self) -> Vector3 {
        self.matrix.translation()
    }

    #[must_use]
    pub fn x_axis(&self) -> Vector3 {
        self.matrix.x_axis()
    }

    #[must_use]
    pub fn y_axis(&self) -> Vector3 {
        self.matrix.y_axis()
    }

    #[must_use]
    pub fn z_axis(&self) -> Vector3 {
        self.matrix.z_axis()
    }

    /// Transforms a point.
    #[must_use]
    pub fn apply(&self, point: &Vector3) -> Vector3 {
        let p = self
            .matrix
            .to_matrix4()
            .transform_point(&Point3::new(point.x(), point.y(), point.z()));
        Vector3::from_point(&p)
    }

    /// Transforms a direction, ignoring translation.
    #[must_use]
    pub fn apply_vector(&self, vector: &Vector3) -> Vector3 {
        let v = self.matrix.to_matrix4().transform_vector(&vector.to_vec());
        Vector3::from_vec(&v)
    }

    /// Returns the inverse transform.
    ///
    /// # Errors
    ///
    /// Returns a `GeometricInconsistency` error if the matrix is singular.
    pub fn inverted(&self) -> Result<Self> {
        let inverse = self.matrix.to_matrix4().try_inverse().ok_or_else(|| {
            ValidationError::GeometricInconsistency(
                "the transform is singular and cannot be inverted".into(),
            )
        })?;
        Ok(Self::new(Matrix::from_matrix4(&inverse)))
    }

    /// Returns the transform that applies `self`, then `other`.
    #[must_use]
    pub fn concatenated(&self, other: &Self) -> Self {
        let m = other.matrix.to_matrix4() * self.matrix.to_matrix4();
        Self::new(Matrix::from_matrix4(&m))
    }

    pub(crate) fn validate_in(&mut self, ctx: &ConstructionContext) -> Result<(), ValidationError> {
        ctx.validate(&mut self.matrix)
    }
}

impl From<Matrix> for Transform {
    fn from(matrix: Matrix) -> Self {
        Self::new(matrix)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn v(x: f64, y: f64, z: f64) -> Vector3 {
        Vector3::new(x, y, z).unwrap()
    }

    #[test]
    fn translation_moves_points_not_vectors() {
        let t = Transform::from_origin(v(1.0, 2.0, 3.0));
        assert!(t.apply(&Vector3::ORIGIN).is_almost_equal_to(&v(1.0, 2.0, 3.0)));
        assert!(t.apply_vector(&Vector3::X_AXIS).is_almost_equal_to(&Vector3::X_AXIS));
    }

    #[test]
    fn inverse_undoes_transform() {
        let t = Transform::from_axes(v(5.0, 0.0, 1.0), v(0.0, 1.0, 0.0), Vector3::Z_AXIS).unwrap();
        let p = v(1.0, 2.0, 3.0);
        let back = t.inverted().unwrap().apply(&t.apply(&p));
        assert!(back.is_almost_equal_to(&p));
    }

    #[test]
    fn singular_transform_cannot_invert() {
        let t = Transform::new(Matrix::new(vec![0.0; 12]).unwrap());
        assert_eq!(
            t.inverted().unwrap_err().kind(),
            ErrorKind::GeometricInconsistency
        );
    }

    #[test]
    fn concatenation_applies_in_order() {
        let rotate = Transform::from_axes(Vector3::ORIGIN, Vector3::Y_AXIS, Vector3::Z_AXIS).unwrap();
        let translate = Transform::from_origin(v(10.0, 0.0, 0.0));
        let both = rotate.concatenated(&translate);
        assert!(both.apply(&Vector3::X_AXIS).is_almost_equal_to(&v(10.0, 1.0, 0.0)));
    }

    #[test]
    fn plane_frame_has_plane_normal_as_z() {
        let plane = Plane::new(v(0.0, 0.0, 2.0), Vector3::X_AXIS).unwrap();
        let t = Transform::from_plane(&plane);
        assert!(t.z_axis().is_almost_equal_to(&Vector3::X_AXIS));
        assert!(t.x_axis().is_almost_equal_to(&Vector3::Y_AXIS));
        assert!(t.origin().is_almost_equal_to(&v(0.0, 0.0, 2.0)));
    }

    #[test]
    fn parallel_axes_are_invalid() {
        assert!(Transform::from_axes(Vector3::ORIGIN, Vector3::Z_AXIS, Vector3::Z_AXIS).is_err());
    }
}
