use super::intersect_2d::segments_touch_2d;
use super::Point2;

/// Finds the first pair of non-adjacent segments of a closed loop that touch
/// or cross.
///
/// Segment `i` runs from `points[i]` to `points[(i + 1) % n]`. Returns the
/// segment indices `(i, j)` with `i < j`, or `None` for a simple loop.
#[must_use]
pub fn find_self_intersection(points: &[Point2]) -> Option<(usize, usize)> {
    let n = points.len();
    if n < 4 {
        return None;
    }

    for i in 0..n {
        let a0 = &points[i];
        let a1 = &points[(i + 1) % n];

        for j in (i + 2)..n {
            // Last and first segments share the closing vertex.
            if i == 0 && j == n - 1 {
                continue;
            }
            let b0 = &points[j];
            let b1 = &points[(j + 1) % n];
            if segments_touch_2d(a0, a1, b0, b1) {
                return Some((i, j));
            }
        }
    }

    None
}

/// Winding number of `point` about the closed loop `points`.
///
/// Non-zero means inside.
#[must_use]
pub fn winding_number_2d(point: &Point2, points: &[Point2]) -> i32 {
    let n = points.len();
    let mut winding = 0i32;
    for i in 0..n {
        let a = &points[i];
        let b = &points[(i + 1) % n];
        let side = (b.x - a.x) * (point.y - a.y) - (b.y - a.y) * (point.x - a.x);
        if a.y <= point.y {
            if b.y > point.y && side > 0.0 {
                winding += 1;
            }
        } else if b.y <= point.y && side < 0.0 {
            winding -= 1;
        }
    }
    winding
}

/// Returns `true` if any segment of closed loop `a` touches or crosses any
/// segment of closed loop `b`.
#[must_use]
pub fn loops_touch_2d(a: &[Point2], b: &[Point2]) -> bool {
    let (n, m) = (a.len(), b.len());
    (0..n).any(|i| {
        (0..m).any(|j| segments_touch_2d(&a[i], &a[(i + 1) % n], &b[j], &b[(j + 1) % m]))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    #[test]
    fn figure_eight_intersects() {
        let pts = [p(0.0, 0.0), p(2.0, 2.0), p(2.0, 0.0), p(0.0, 2.0)];
        assert_eq!(find_self_intersection(&pts), Some((0, 2)));
    }

    #[test]
    fn concave_l_shape_is_simple() {
        let pts = [
            p(0.0, 0.0),
            p(4.0, 0.0),
            p(4.0, 2.0),
            p(2.0, 2.0),
            p(2.0, 4.0),
            p(0.0, 4.0),
        ];
        assert_eq!(find_self_intersection(&pts), None);
    }

    #[test]
    fn vertex_touching_far_edge_intersects() {
        // The vertex at (2, 0) lies on the bottom edge's line and touches it.
        let pts = [p(0.0, 0.0), p(4.0, 0.0), p(4.0, 3.0), p(2.0, 0.0), p(0.0, 3.0)];
        assert!(find_self_intersection(&pts).is_some());
    }

    #[test]
    fn triangle_is_simple() {
        let pts = [p(0.0, 0.0), p(1.0, 0.0), p(0.0, 1.0)];
        assert_eq!(find_self_intersection(&pts), None);
    }

    // ── winding_number_2d ──

    #[test]
    fn winding_inside_and_outside() {
        let square = [p(0.0, 0.0), p(2.0, 0.0), p(2.0, 2.0), p(0.0, 2.0)];
        assert_eq!(winding_number_2d(&p(1.0, 1.0), &square), 1);
        assert_eq!(winding_number_2d(&p(3.0, 1.0), &square), 0);
        let clockwise: Vec<_> = square.iter().rev().copied().collect();
        assert_eq!(winding_number_2d(&p(1.0, 1.0), &clockwise), -1);
    }

    // ── loops_touch_2d ──

    #[test]
    fn crossing_loops_touch() {
        let a = [p(0.0, 0.0), p(4.0, 0.0), p(4.0, 4.0), p(0.0, 4.0)];
        let b = [p(1.0, -1.0), p(3.0, -1.0), p(3.0, 1.0), p(1.0, 1.0)];
        assert!(loops_touch_2d(&a, &b));
    }

    #[test]
    fn nested_loops_do_not_touch() {
        let a = [p(0.0, 0.0), p(4.0, 0.0), p(4.0, 4.0), p(0.0, 4.0)];
        let b = [p(1.0, 1.0), p(3.0, 1.0), p(3.0, 3.0), p(1.0, 3.0)];
        assert!(!loops_touch_2d(&a, &b));
    }
}
