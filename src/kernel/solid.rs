use crate::error::{KernelError, KernelResult};
use crate::math::polygon_3d::newell_normal;
use crate::math::{Point3, Vec3};
use crate::tessellation::{TessellateSolid, TriangleMesh};

/// A planar face bounded by an outer loop and zero or more hole loops.
///
/// The normal follows the outer loop's winding and points out of the solid.
#[derive(Debug, Clone, PartialEq)]
pub struct Face {
    outer: Vec<Point3>,
    inner: Vec<Vec<Point3>>,
    normal: Vec3,
}

impl Face {
    /// Creates a face, taking its normal from the outer loop.
    ///
    /// # Errors
    ///
    /// Returns [`KernelError::GeometryGeneration`] if the outer loop has no
    /// area.
    pub fn new(outer: Vec<Point3>, inner: Vec<Vec<Point3>>) -> KernelResult<Self> {
        let normal = newell_normal(&outer).ok_or_else(|| {
            KernelError::GeometryGeneration("degenerate face: loop has no area".into())
        })?;
        Ok(Self {
            outer,
            inner,
            normal,
        })
    }

    #[must_use]
    pub fn outer(&self) -> &[Point3] {
        &self.outer
    }

    #[must_use]
    pub fn inner(&self) -> &[Vec<Point3>] {
        &self.inner
    }

    #[must_use]
    pub fn normal(&self) -> &Vec3 {
        &self.normal
    }

    /// Returns the face with every loop and the normal reversed.
    #[must_use]
    pub fn reversed(&self) -> Self {
        let flip = |points: &Vec<Point3>| points.iter().rev().copied().collect::<Vec<_>>();
        Self {
            outer: flip(&self.outer),
            inner: self.inner.iter().map(flip).collect(),
            normal: -self.normal,
        }
    }
}

/// A boundary representation made of planar faces.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Solid {
    faces: Vec<Face>,
}

impl Solid {
    #[must_use]
    pub fn new(faces: Vec<Face>) -> Self {
        Self { faces }
    }

    #[must_use]
    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    /// Returns the solid with every face turned inside out.
    #[must_use]
    pub fn reversed(&self) -> Self {
        Self::new(self.faces.iter().map(Face::reversed).collect())
    }

    /// Triangulates every face into a mesh suitable for boolean operations.
    ///
    /// # Errors
    ///
    /// Returns [`KernelError::Triangulation`] if a face cannot be
    /// triangulated.
    pub fn to_boolean_representation(&self) -> KernelResult<BooleanGeometry> {
        let mesh = TessellateSolid::new(self).execute()?;
        Ok(BooleanGeometry::from(mesh))
    }
}

/// A triangle soup wound with the faces it came from.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BooleanGeometry {
    vertices: Vec<Point3>,
    triangles: Vec<[u32; 3]>,
}

impl BooleanGeometry {
    #[must_use]
    pub fn vertices(&self) -> &[Point3] {
        &self.vertices
    }

    #[must_use]
    pub fn triangles(&self) -> &[[u32; 3]] {
        &self.triangles
    }

    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Volume enclosed by the mesh, negative when it is inside out.
    #[must_use]
    pub fn signed_volume(&self) -> f64 {
        self.triangles
            .iter()
            .map(|[a, b, c]| {
                let a = self.vertices[*a as usize].coords;
                let b = self.vertices[*b as usize].coords;
                let c = self.vertices[*c as usize].coords;
                a.dot(&b.cross(&c))
            })
            .sum::<f64>()
            / 6.0
    }
}

impl From<TriangleMesh> for BooleanGeometry {
    fn from(mesh: TriangleMesh) -> Self {
        Self {
            vertices: mesh.vertices,
            triangles: mesh.indices,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    #[test]
    fn face_normal_follows_winding() {
        let face = Face::new(
            vec![p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0), p(1.0, 1.0, 0.0)],
            vec![],
        )
        .unwrap();
        assert_relative_eq!(face.normal().z, 1.0);
        assert_relative_eq!(face.reversed().normal().z, -1.0);
    }

    #[test]
    fn collinear_face_fails() {
        let err = Face::new(
            vec![p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0), p(2.0, 0.0, 0.0)],
            vec![],
        )
        .unwrap_err();
        assert!(matches!(err, KernelError::GeometryGeneration(_)));
    }

    #[test]
    fn tetrahedron_volume() {
        let o = p(0.0, 0.0, 0.0);
        let x = p(1.0, 0.0, 0.0);
        let y = p(0.0, 1.0, 0.0);
        let z = p(0.0, 0.0, 1.0);
        let solid = Solid::new(vec![
            Face::new(vec![o, y, x], vec![]).unwrap(),
            Face::new(vec![o, x, z], vec![]).unwrap(),
            Face::new(vec![o, z, y], vec![]).unwrap(),
            Face::new(vec![x, y, z], vec![]).unwrap(),
        ]);
        let geometry = solid.to_boolean_representation().unwrap();
        assert_eq!(geometry.triangle_count(), 4);
        assert_relative_eq!(geometry.signed_volume(), 1.0 / 6.0, epsilon = 1e-12);
        let inside_out = solid.reversed().to_boolean_representation().unwrap();
        assert_relative_eq!(inside_out.signed_volume(), -1.0 / 6.0, epsilon = 1e-12);
    }
}
