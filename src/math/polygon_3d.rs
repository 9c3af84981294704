use super::{Point2, Point3, Vec3, TOLERANCE};

/// An orthonormal frame on a plane, used to flatten coplanar points into 2D.
#[derive(Debug, Clone, Copy)]
pub struct PlaneFrame {
    origin: Point3,
    u_dir: Vec3,
    v_dir: Vec3,
    normal: Vec3,
}

impl PlaneFrame {
    /// Creates a frame from an origin and a normal vector.
    ///
    /// The U and V directions are computed automatically. Returns `None` if
    /// the normal is zero-length.
    #[must_use]
    pub fn from_normal(origin: Point3, normal: &Vec3) -> Option<Self> {
        let len = normal.norm();
        if len < TOLERANCE {
            return None;
        }
        let normal = normal / len;

        // Choose a reference vector not parallel to the normal
        let reference = if normal.x.abs() < 0.9 {
            Vec3::new(1.0, 0.0, 0.0)
        } else {
            Vec3::new(0.0, 1.0, 0.0)
        };

        let u_dir = normal.cross(&reference).normalize();
        let v_dir = normal.cross(&u_dir);

        Some(Self {
            origin,
            u_dir,
            v_dir,
            normal,
        })
    }

    /// Returns the unit normal of the frame.
    #[must_use]
    pub fn normal(&self) -> &Vec3 {
        &self.normal
    }

    /// Projects a 3D point onto the frame's UV coordinates.
    #[must_use]
    pub fn project(&self, point: &Point3) -> Point2 {
        let diff = point - self.origin;
        Point2::new(diff.dot(&self.u_dir), diff.dot(&self.v_dir))
    }

    /// Maps UV coordinates back onto the plane in 3D.
    #[must_use]
    pub fn unproject(&self, uv: &Point2) -> Point3 {
        self.origin + self.u_dir * uv.x + self.v_dir * uv.y
    }
}

/// Computes the unit normal of a polygon using Newell's method.
///
/// Returns `None` for a degenerate polygon.
#[must_use]
pub fn newell_normal(points: &[Point3]) -> Option<Vec3> {
    let n = points.len();
    let mut normal = Vec3::new(0.0, 0.0, 0.0);
    for i in 0..n {
        let curr = &points[i];
        let next = &points[(i + 1) % n];
        normal.x += (curr.y - next.y) * (curr.z + next.z);
        normal.y += (curr.z - next.z) * (curr.x + next.x);
        normal.z += (curr.x - next.x) * (curr.y + next.y);
    }
    let len = normal.norm();
    (len >= TOLERANCE).then(|| normal / len)
}

/// Compute the area of a 3D polygon (coplanar points).
///
/// Uses the cross-product summation method projected along the polygon normal.
/// The sign is positive when the loop winds counter-clockwise about `normal`.
#[must_use]
pub fn polygon_area_3d(points: &[Point3], normal: &Vec3) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let n = points.len();
    let mut cross_sum = Vec3::new(0.0, 0.0, 0.0);
    let o = &points[0];
    for i in 1..n {
        let a = points[i] - o;
        let b = points[(i + 1) % n] - o;
        cross_sum += a.cross(&b);
    }
    0.5 * cross_sum.dot(normal)
}
