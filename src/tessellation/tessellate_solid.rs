use crate::error::KernelResult;
use crate::kernel::Solid;

use super::{TessellateFace, TriangleMesh};

/// Tessellates all faces of a solid into a combined triangle mesh.
pub struct TessellateSolid<'a> {
    solid: &'a Solid,
}

impl<'a> TessellateSolid<'a> {
    #[must_use]
    pub fn new(solid: &'a Solid) -> Self {
        Self { solid }
    }

    /// Executes the tessellation, returning a combined triangle mesh.
    ///
    /// # Errors
    ///
    /// Returns an error if any face cannot be tessellated.
    pub fn execute(&self) -> KernelResult<TriangleMesh> {
        let mut combined = TriangleMesh::default();
        for face in self.solid.faces() {
            let face_mesh = TessellateFace::new(face).execute()?;
            combined.merge(&face_mesh);
        }
        Ok(combined)
    }
}
