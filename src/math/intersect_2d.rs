use super::{Point2, EPSILON, TOLERANCE};

/// 2D cross product of two vectors given as points relative to the origin.
#[inline]
fn cross_2d(ax: f64, ay: f64, bx: f64, by: f64) -> f64 {
    ax * by - ay * bx
}

/// Bounded segment-segment intersection in 2D.
///
/// Returns `(intersection_point, t, u)` where `t` and `u` are the parameters on
/// the two segments, clamped to `[0, 1]`. Parallel segments return `None`;
/// use [`segments_touch_2d`] to also catch collinear overlap.
#[must_use]
pub fn segment_segment_intersect_2d(
    a0: &Point2,
    a1: &Point2,
    b0: &Point2,
    b1: &Point2,
) -> Option<(Point2, f64, f64)> {
    let da = a1 - a0;
    let db = b1 - b0;

    let cross = cross_2d(da.x, da.y, db.x, db.y);
    if cross.abs() < TOLERANCE {
        return None;
    }

    let dx = b0.x - a0.x;
    let dy = b0.y - a0.y;
    let t = cross_2d(dx, dy, db.x, db.y) / cross;
    let u = cross_2d(dx, dy, da.x, da.y) / cross;

    // Endpoints count as hits.
    let eps = TOLERANCE;
    if t >= -eps && t <= 1.0 + eps && u >= -eps && u <= 1.0 + eps {
        let t = t.clamp(0.0, 1.0);
        Some((a0 + da * t, t, u.clamp(0.0, 1.0)))
    } else {
        None
    }
}

/// Returns `true` if two closed segments share at least one point.
///
/// Unlike [`segment_segment_intersect_2d`] this also reports collinear
/// segments that overlap or touch end to end.
#[must_use]
pub fn segments_touch_2d(a0: &Point2, a1: &Point2, b0: &Point2, b1: &Point2) -> bool {
    segment_segment_intersect_2d(a0, a1, b0, b1).is_some() || collinear_overlap(a0, a1, b0, b1)
}

fn collinear_overlap(a0: &Point2, a1: &Point2, b0: &Point2, b1: &Point2) -> bool {
    let da = a1 - a0;
    let len_sq = da.norm_squared();
    if len_sq < TOLERANCE {
        return false;
    }
    let len = len_sq.sqrt();

    let off_b0 = b0 - a0;
    let off_b1 = b1 - a0;
    if cross_2d(da.x, da.y, off_b0.x, off_b0.y).abs() / len > EPSILON
        || cross_2d(da.x, da.y, off_b1.x, off_b1.y).abs() / len > EPSILON
    {
        return false;
    }

    let t0 = off_b0.dot(&da) / len_sq;
    let t1 = off_b1.dot(&da) / len_sq;
    let (lo, hi) = if t0 <= t1 { (t0, t1) } else { (t1, t0) };
    let eps = EPSILON / len;
    hi >= -eps && lo <= 1.0 + eps
}
