use std::collections::{HashMap, HashSet, VecDeque};

use spade::handles::{FixedFaceHandle, InnerTag};
use spade::{
    ConstrainedDelaunayTriangulation, InsertionError, Point2 as SpadePoint2, Triangulation,
};

use crate::error::{KernelError, KernelResult};
use crate::kernel::Face;
use crate::math::polygon_3d::PlaneFrame;
use crate::math::Point3;

use super::TriangleMesh;

type Cdt = ConstrainedDelaunayTriangulation<SpadePoint2<f64>>;

/// Tessellates a planar face into a triangle mesh.
///
/// Triangles wind counter-clockwise about the face normal.
pub struct TessellateFace<'a> {
    face: &'a Face,
}

impl<'a> TessellateFace<'a> {
    #[must_use]
    pub fn new(face: &'a Face) -> Self {
        Self { face }
    }

    /// Executes the tessellation with a constrained Delaunay triangulation in
    /// the face's plane.
    ///
    /// # Errors
    ///
    /// Returns [`KernelError::Triangulation`] if a loop has fewer than three
    /// points or cannot be inserted.
    #[allow(clippy::cast_possible_truncation)]
    pub fn execute(&self) -> KernelResult<TriangleMesh> {
        let outer = self.face.outer();
        let normal = *self.face.normal();
        let origin = *outer
            .first()
            .ok_or_else(|| KernelError::Triangulation("face has no outer loop".into()))?;
        let frame = PlaneFrame::from_normal(origin, &normal)
            .ok_or_else(|| KernelError::Triangulation("face normal has zero length".into()))?;

        let project = |p: &Point3| -> SpadePoint2<f64> {
            let uv = frame.project(p);
            SpadePoint2::new(uv.x, uv.y)
        };

        let mut cdt = Cdt::new();
        let outer_2d: Vec<_> = outer.iter().map(&project).collect();
        insert_constraint_loop(&mut cdt, &outer_2d)?;
        for hole in self.face.inner() {
            let hole_2d: Vec<_> = hole.iter().map(&project).collect();
            insert_constraint_loop(&mut cdt, &hole_2d)?;
        }

        let interior_faces = classify_interior_faces(&cdt);

        let mut mesh = TriangleMesh::default();
        let mut vertex_map: HashMap<usize, u32> = HashMap::new();

        for face_handle in cdt.inner_faces() {
            if !interior_faces.contains(&face_handle.fix().index()) {
                continue;
            }

            let mut tri_indices = [0u32; 3];
            for (i, vh) in face_handle.vertices().iter().enumerate() {
                let idx = vh.fix().index();
                let mesh_idx = if let Some(&existing) = vertex_map.get(&idx) {
                    existing
                } else {
                    let pos = vh.position();
                    let p3 = frame.unproject(&crate::math::Point2::new(pos.x, pos.y));
                    let new_idx = mesh.vertices.len() as u32;
                    mesh.vertices.push(p3);
                    mesh.normals.push(normal);
                    vertex_map.insert(idx, new_idx);
                    new_idx
                };
                tri_indices[i] = mesh_idx;
            }

            // Wind with the face normal.
            let [a, b, c] = tri_indices.map(|i| mesh.vertices[i as usize]);
            if (b - a).cross(&(c - a)).dot(&normal) < 0.0 {
                tri_indices.swap(1, 2);
            }
            mesh.indices.push(tri_indices);
        }

        Ok(mesh)
    }
}

/// Inserts a closed polygon as constraint edges into the CDT.
fn insert_constraint_loop(cdt: &mut Cdt, points: &[SpadePoint2<f64>]) -> KernelResult<()> {
    if points.len() < 3 {
        return Err(KernelError::Triangulation(
            "constraint loop needs at least 3 points".into(),
        ));
    }

    let mut handles = Vec::with_capacity(points.len());
    for &pt in points {
        let h = cdt
            .insert(pt)
            .map_err(|e: InsertionError| KernelError::Triangulation(format!("CDT insert: {e}")))?;
        handles.push(h);
    }

    for i in 0..handles.len() {
        let from = handles[i];
        let to = handles[(i + 1) % handles.len()];
        if from == to {
            continue;
        }
        if !cdt.can_add_constraint(from, to) {
            return Err(KernelError::Triangulation(format!(
                "constraint edge {i} crosses an existing edge"
            )));
        }
        cdt.add_constraint(from, to);
    }

    Ok(())
}

/// Classifies which inner faces of the CDT are inside the polygon using flood-fill.
///
/// Starts from faces adjacent to the outer (infinite) face at depth 0. Each time
/// a constraint edge is crossed, depth increments. Odd depth = interior.
fn classify_interior_faces(cdt: &Cdt) -> HashSet<usize> {
    let mut interior = HashSet::new();
    let mut depth_map: HashMap<usize, u32> = HashMap::new();
    let mut queue: VecDeque<(FixedFaceHandle<InnerTag>, u32)> = VecDeque::new();

    let outer_fix = cdt.outer_face().fix();

    for edge in cdt.directed_edges() {
        if edge.face().fix() == outer_fix {
            if let Some(inner) = edge.rev().face().as_inner() {
                let idx = inner.fix().index();
                if depth_map.contains_key(&idx) {
                    continue;
                }
                let depth = u32::from(cdt.is_constraint_edge(edge.as_undirected().fix()));
                depth_map.insert(idx, depth);
                if depth % 2 == 1 {
                    interior.insert(idx);
                }
                queue.push_back((inner.fix(), depth));
            }
        }
    }

    while let Some((face_fix, depth)) = queue.pop_front() {
        let face = cdt.face(face_fix);
        for edge in face.adjacent_edges() {
            if let Some(inner_neighbor) = edge.rev().face().as_inner() {
                let n_idx = inner_neighbor.fix().index();
                if depth_map.contains_key(&n_idx) {
                    continue;
                }
                let new_depth = if cdt.is_constraint_edge(edge.as_undirected().fix()) {
                    depth + 1
                } else {
                    depth
                };
                depth_map.insert(n_idx, new_depth);
                if new_depth % 2 == 1 {
                    interior.insert(n_idx);
                }
                queue.push_back((inner_neighbor.fix(), new_depth));
            }
        }
    }

    interior
}
