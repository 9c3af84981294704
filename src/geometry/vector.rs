use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::math::{Point3, Vec3, EPSILON};
use crate::validation::{ConstructArgs, ConstructionContext, Entity, Instance};

/// A point or direction in 3D space.
///
/// Components are always finite when built through [`Vector3::new`].
/// Arithmetic operators do not re-validate their result.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vector3 {
    x: f64,
    y: f64,
    z: f64,
}

impl Vector3 {
    /// The origin.
    pub const ORIGIN: Self = Self::raw(0.0, 0.0, 0.0);
    /// The unit X axis.
    pub const X_AXIS: Self = Self::raw(1.0, 0.0, 0.0);
    /// The unit Y axis.
    pub const Y_AXIS: Self = Self::raw(0.0, 1.0, 0.0);
    /// The unit Z axis.
    pub const Z_AXIS: Self = Self::raw(0.0, 0.0, 1.0);

    /// Creates a vector in the default validated context.
    ///
    /// # Errors
    ///
    /// Returns an `OutOfRange` error if any component is NaN or infinite.
    pub fn new(x: f64, y: f64, z: f64) -> Result<Self> {
        Self::new_in(&ConstructionContext::default(), x, y, z)
    }

    /// Creates a vector in an explicit construction context.
    ///
    /// # Errors
    ///
    /// Returns an `OutOfRange` error if validation is on and any component
    /// is NaN or infinite.
    pub fn new_in(ctx: &ConstructionContext, x: f64, y: f64, z: f64) -> Result<Self> {
        ctx.pre_construct(&ConstructArgs::Vector3 { x, y, z })?;
        let mut vector = Self { x, y, z };
        ctx.post_construct(vector.as_instance())?;
        Ok(vector)
    }

    pub(crate) const fn raw(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Returns the X component.
    #[must_use]
    pub fn x(&self) -> f64 {
        self.x
    }

    /// Returns the Y component.
    #[must_use]
    pub fn y(&self) -> f64 {
        self.y
    }

    /// Returns the Z component.
    #[must_use]
    pub fn z(&self) -> f64 {
        self.z
    }

    #[must_use]
    pub fn dot(&self, other: &Self) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    #[must_use]
    pub fn cross(&self, other: &Self) -> Self {
        Self::raw(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    #[must_use]
    pub fn length(&self) -> f64 {
        self.dot(self).sqrt()
    }

    /// Returns a unit vector with the same direction.
    ///
    /// A zero vector is returned unchanged.
    #[must_use]
    pub fn unitized(&self) -> Self {
        let length = self.length();
        if length < crate::math::TOLERANCE {
            *self
        } else {
            *self / length
        }
    }

    #[must_use]
    pub fn distance_to(&self, other: &Self) -> f64 {
        (*self - *other).length()
    }

    /// Returns `true` if every component differs from `other` by less than
    /// [`EPSILON`].
    #[must_use]
    pub fn is_almost_equal_to(&self, other: &Self) -> bool {
        (self.x - other.x).abs() < EPSILON
            && (self.y - other.y).abs() < EPSILON
            && (self.z - other.z).abs() < EPSILON
    }

    /// Returns `true` if the vector is within [`EPSILON`] of the origin on
    /// every axis.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.is_almost_equal_to(&Self::ORIGIN)
    }

    /// Returns `true` if the two vectors point along the same line, in
    /// either direction.
    #[must_use]
    pub fn is_parallel_to(&self, other: &Self) -> bool {
        let a = self.unitized();
        let b = other.unitized();
        (a.dot(&b).abs() - 1.0).abs() < EPSILON
    }

    /// Returns the mean of `points`, or `None` if the slice is empty.
    #[must_use]
    pub fn average(points: &[Self]) -> Option<Self> {
        if points.is_empty() {
            return None;
        }
        let sum = points.iter().fold(Self::ORIGIN, |acc, p| acc + *p);
        #[allow(clippy::cast_precision_loss)]
        Some(sum / points.len() as f64)
    }

    pub(crate) fn to_point(self) -> Point3 {
        Point3::new(self.x, self.y, self.z)
    }

    pub(crate) fn to_vec(self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }

    pub(crate) fn from_point(p: &Point3) -> Self {
        Self::raw(p.x, p.y, p.z)
    }

    pub(crate) fn from_vec(v: &Vec3) -> Self {
        Self::raw(v.x, v.y, v.z)
    }
}

impl fmt::Display for Vector3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

impl Entity for Vector3 {
    fn construct_args(&self) -> ConstructArgs<'_> {
        ConstructArgs::Vector3 {
            x: self.x,
            y: self.y,
            z: self.z,
        }
    }

    fn as_instance(&mut self) -> Instance<'_> {
        Instance::Vector3(self)
    }
}

impl Add for Vector3 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::raw(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vector3 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::raw(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f64> for Vector3 {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        Self::raw(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl Div<f64> for Vector3 {
    type Output = Self;

    fn div(self, rhs: f64) -> Self {
        Self::raw(self.x / rhs, self.y / rhs, self.z / rhs)
    }
}

impl Neg for Vector3 {
    type Output = Self;

    fn neg(self) -> Self {
        Self::raw(-self.x, -self.y, -self.z)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn finite_components_construct() {
        let v = Vector3::new(1.0, -2.5, 3.0).unwrap();
        assert_relative_eq!(v.x(), 1.0);
        assert_relative_eq!(v.y(), -2.5);
        assert_relative_eq!(v.z(), 3.0);
    }

    #[test]
    fn nan_component_is_out_of_range() {
        let err = Vector3::new(0.0, f64::NAN, 0.0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OutOfRange);
    }

    #[test]
    fn infinite_component_is_out_of_range() {
        let err = Vector3::new(f64::INFINITY, 0.0, 0.0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OutOfRange);
    }

    #[test]
    fn trusted_context_accepts_nan() {
        let v = Vector3::new_in(&ConstructionContext::trusted(), f64::NAN, 0.0, 0.0).unwrap();
        assert!(v.x().is_nan());
    }

    #[test]
    fn cross_of_axes() {
        let z = Vector3::X_AXIS.cross(&Vector3::Y_AXIS);
        assert!(z.is_almost_equal_to(&Vector3::Z_AXIS));
    }

    #[test]
    fn unitized_has_unit_length() {
        let v = Vector3::raw(3.0, 4.0, 0.0).unitized();
        assert_relative_eq!(v.length(), 1.0);
        assert!(Vector3::ORIGIN.unitized().is_zero());
    }

    #[test]
    fn almost_equal_within_epsilon() {
        let a = Vector3::raw(1.0, 1.0, 1.0);
        let b = Vector3::raw(1.0 + EPSILON / 2.0, 1.0, 1.0);
        let c = Vector3::raw(1.0 + EPSILON * 2.0, 1.0, 1.0);
        assert!(a.is_almost_equal_to(&b));
        assert!(!a.is_almost_equal_to(&c));
    }

    #[test]
    fn average_of_points() {
        let avg = Vector3::average(&[Vector3::raw(0.0, 0.0, 0.0), Vector3::raw(2.0, 4.0, 6.0)])
            .unwrap();
        assert!(avg.is_almost_equal_to(&Vector3::raw(1.0, 2.0, 3.0)));
        assert!(Vector3::average(&[]).is_none());
    }

    #[test]
    fn parallel_detection() {
        assert!(Vector3::Z_AXIS.is_parallel_to(&Vector3::raw(0.0, 0.0, -3.0)));
        assert!(!Vector3::Z_AXIS.is_parallel_to(&Vector3::X_AXIS));
    }

    #[test]
    fn display_lists_components() {
        assert_eq!(Vector3::raw(1.0, 2.0, 3.5).to_string(), "(1, 2, 3.5)");
    }
}
