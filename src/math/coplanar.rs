use super::{Point3, Vec3, EPSILON};

/// Finds the plane through the first three non-degenerate points.
///
/// Returns the first point and the unit normal, or `None` when fewer than
/// three distinct, non-collinear points exist.
#[must_use]
pub fn fit_plane(points: &[Point3]) -> Option<(Point3, Vec3)> {
    let a = *points.first()?;
    let b = points.iter().find(|p| (*p - a).norm() > EPSILON)?;
    let ab = b - a;
    let ab_len = ab.norm();

    points.iter().find_map(|c| {
        let n = ab.cross(&(c - a));
        // |ab x ac| / |ab| is the distance of c from the line through a and b.
        let len = n.norm();
        (len / ab_len > EPSILON).then(|| (a, n / len))
    })
}

/// Returns `true` if every point lies within [`EPSILON`] of a single plane.
///
/// Fewer than three points, or points that are all collinear, are coplanar.
#[must_use]
pub fn are_coplanar(points: &[Point3]) -> bool {
    if points.len() < 3 {
        return true;
    }
    let Some((origin, normal)) = fit_plane(points) else {
        return true;
    };
    points
        .iter()
        .all(|p| normal.dot(&(p - origin)).abs() <= EPSILON)
}
