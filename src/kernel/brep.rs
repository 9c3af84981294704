use tracing::trace;

use crate::error::{KernelError, KernelResult};
use crate::geometry::{Curve, CurveGeometry, Polygon, Profile, Vector3};
use crate::math::polygon_2d::{loops_touch_2d, winding_number_2d};
use crate::math::polygon_3d::{newell_normal, PlaneFrame};
use crate::math::{Point2, Point3, Vec3, EPSILON, TOLERANCE};

use super::{Face, Kernel, KernelParams, Solid};

/// Reference kernel producing planar-faced boundary solids.
#[derive(Debug, Clone, Default)]
pub struct BrepKernel {
    params: KernelParams,
}

impl BrepKernel {
    #[must_use]
    pub fn new(params: KernelParams) -> Self {
        Self { params }
    }

    #[must_use]
    pub fn params(&self) -> &KernelParams {
        &self.params
    }

    /// Converts a curve to points; closed curves do not repeat their start.
    fn discretize(&self, curve: &CurveGeometry) -> Vec<Point3> {
        let points = match curve {
            CurveGeometry::Line(line) => vec![line.start().to_point(), line.end().to_point()],
            CurveGeometry::Polyline(polyline) => {
                polyline.vertices().iter().map(|v| v.to_point()).collect()
            }
            CurveGeometry::Polygon(polygon) => polygon.points(),
            CurveGeometry::Arc(arc) => {
                let sweep = arc.sweep_angle().abs().to_radians();
                let max_segments = self.params.max_segments.max(self.params.min_segments);
                let n = arc_subdivision_count(arc.radius(), sweep, self.params.tolerance)
                    .clamp(self.params.min_segments.max(1), max_segments.max(1));
                (0..=n)
                    .map(|i| arc.point_at(f64::from(i) / f64::from(n)).to_point())
                    .collect()
            }
        };
        dedupe(points, curve.is_closed())
    }
}

fn fail(message: impl Into<String>) -> KernelError {
    KernelError::GeometryGeneration(message.into())
}

impl Kernel for BrepKernel {
    fn create_extrude(
        &self,
        profile: &Profile,
        height: f64,
        direction: &Vector3,
        flipped: bool,
    ) -> KernelResult<Solid> {
        if !(height > 0.0 && height.is_finite()) {
            return Err(fail(format!(
                "extrusion height must be finite and greater than zero, got {height}"
            )));
        }
        let dir = direction.to_vec();
        let len = dir.norm();
        if len < TOLERANCE {
            return Err(fail("extrusion direction has zero length"));
        }
        let dir = dir / len;

        let base = Loops::from_profile(profile, &dir)?;
        let top = base.map(|p| p + dir * height);

        let mut faces = Vec::with_capacity(base.edge_count() + 2);
        // Bottom faces against the direction, top along it.
        faces.push(base.reversed().into_face()?);
        faces.push(top.clone().into_face()?);
        base.push_side_faces(&top, &mut faces)?;

        let solid = Solid::new(faces);
        trace!(faces = solid.faces().len(), flipped, "extrude generated");
        Ok(if flipped { solid.reversed() } else { solid })
    }

    fn create_sweep_along_curve(
        &self,
        profile: &Profile,
        curve: &CurveGeometry,
        start_setback: f64,
        end_setback: f64,
    ) -> KernelResult<Solid> {
        let closed = curve.is_closed();
        let mut path = self.discretize(curve);
        if !closed {
            path = dedupe(trim_path(path, start_setback, end_setback)?, false);
        }
        let min_points = if closed { 3 } else { 2 };
        if path.len() < min_points {
            return Err(fail("the sweep path is degenerate"));
        }

        let n = path.len();
        let segment_count = if closed { n } else { n - 1 };
        let tangents: Vec<Vec3> = (0..segment_count)
            .map(|k| (path[(k + 1) % n] - path[k]).normalize())
            .collect();

        // Profile XY coordinates placed perpendicular to the first segment.
        let section = Loops::from_profile(profile, &Vec3::z())?;
        let (x_dir, y_dir) = section_axes(&tangents[0]);
        let first = section.map(|p| path[0] + x_dir * p.x + y_dir * p.y);

        let miter = |i: usize| -> KernelResult<Vec3> {
            let (prev, next) = if closed {
                (tangents[(i + segment_count - 1) % segment_count], tangents[i])
            } else if i == 0 {
                (tangents[0], tangents[0])
            } else if i == n - 1 {
                (tangents[segment_count - 1], tangents[segment_count - 1])
            } else {
                (tangents[i - 1], tangents[i])
            };
            let sum = prev + next;
            let len = sum.norm();
            if len < TOLERANCE {
                return Err(fail("the sweep path folds back on itself"));
            }
            Ok(sum / len)
        };

        let mut rings = Vec::with_capacity(n);
        rings.push(first.project_onto(&tangents[0], &path[0], &miter(0)?)?);
        for i in 1..n {
            let ring = rings[i - 1].project_onto(&tangents[i - 1], &path[i], &miter(i)?)?;
            rings.push(ring);
        }

        let mut faces = Vec::with_capacity(segment_count * section.edge_count() + 2);
        for k in 0..segment_count {
            rings[k].push_side_faces(&rings[(k + 1) % n], &mut faces)?;
        }
        if !closed {
            faces.push(rings[0].reversed().into_face()?);
            faces.push(rings[n - 1].clone().into_face()?);
        }

        let solid = Solid::new(faces);
        trace!(faces = solid.faces().len(), closed, "sweep generated");
        Ok(solid)
    }

    fn create_lamina(&self, perimeter: &Polygon) -> KernelResult<Solid> {
        let front = Face::new(perimeter.points(), Vec::new())?;
        let back = front.reversed();
        trace!("lamina generated");
        Ok(Solid::new(vec![front, back]))
    }
}

/// An outer loop and its holes, holes wound opposite to the outer loop.
#[derive(Debug, Clone)]
struct Loops {
    outer: Vec<Point3>,
    holes: Vec<Vec<Point3>>,
}

impl Loops {
    /// Takes the profile's loops, outer loop wound counter-clockwise about
    /// `axis`.
    fn from_profile(profile: &Profile, axis: &Vec3) -> KernelResult<Self> {
        let mut outer = profile.perimeter().points();
        let normal =
            newell_normal(&outer).ok_or_else(|| fail("the profile perimeter has no area"))?;
        let along = normal.dot(axis);
        if along.abs() < TOLERANCE {
            return Err(fail("the profile plane contains the generation direction"));
        }
        if along < 0.0 {
            outer.reverse();
        }
        let outer_normal = normal * along.signum();
        let holes = profile
            .voids()
            .iter()
            .map(|void| {
                let mut points = void.points();
                if newell_normal(&points).is_some_and(|n| n.dot(&outer_normal) > 0.0) {
                    points.reverse();
                }
                points
            })
            .collect();
        let loops = Self { outer, holes };
        loops.check_holes(&outer_normal)?;
        Ok(loops)
    }

    /// Every hole must lie in the outer loop's plane, strictly inside it and
    /// apart from the other holes.
    fn check_holes(&self, normal: &Vec3) -> KernelResult<()> {
        let origin = self.outer[0];
        for (i, hole) in self.holes.iter().enumerate() {
            if hole.len() < 3 {
                return Err(fail(format!("void {i} has fewer than three vertices")));
            }
            if hole.iter().any(|p| normal.dot(&(p - origin)).abs() > EPSILON) {
                return Err(fail(format!("void {i} is not in the perimeter's plane")));
            }
        }

        let frame = PlaneFrame::from_normal(origin, normal)
            .ok_or_else(|| fail("the profile perimeter has no area"))?;
        let flatten = |points: &[Point3]| -> Vec<Point2> {
            points.iter().map(|p| frame.project(p)).collect()
        };
        let outer = flatten(self.outer.as_slice());
        let holes: Vec<_> = self.holes.iter().map(|hole| flatten(hole.as_slice())).collect();

        for (i, hole) in holes.iter().enumerate() {
            if loops_touch_2d(&outer, hole) {
                return Err(fail(format!("void {i} crosses the perimeter")));
            }
            if winding_number_2d(&hole[0], &outer) == 0 {
                return Err(fail(format!("void {i} lies outside the perimeter")));
            }
            for (j, other) in holes.iter().enumerate().skip(i + 1) {
                if loops_touch_2d(hole, other)
                    || winding_number_2d(&hole[0], other) != 0
                    || winding_number_2d(&other[0], hole) != 0
                {
                    return Err(fail(format!("voids {i} and {j} overlap")));
                }
            }
        }
        Ok(())
    }

    fn loops(&self) -> impl Iterator<Item = &Vec<Point3>> {
        std::iter::once(&self.outer).chain(self.holes.iter())
    }

    fn edge_count(&self) -> usize {
        self.loops().map(Vec::len).sum()
    }

    fn map(&self, f: impl Fn(&Point3) -> Point3) -> Self {
        Self {
            outer: self.outer.iter().map(&f).collect(),
            holes: self
                .holes
                .iter()
                .map(|hole| hole.iter().map(&f).collect())
                .collect(),
        }
    }

    fn reversed(&self) -> Self {
        let flip = |points: &Vec<Point3>| points.iter().rev().copied().collect::<Vec<_>>();
        Self {
            outer: flip(&self.outer),
            holes: self.holes.iter().map(flip).collect(),
        }
    }

    fn into_face(self) -> KernelResult<Face> {
        Face::new(self.outer, self.holes)
    }

    /// Moves every point along `along` onto the plane through `origin` with
    /// `normal`.
    fn project_onto(&self, along: &Vec3, origin: &Point3, normal: &Vec3) -> KernelResult<Self> {
        let denom = along.dot(normal);
        if denom.abs() < TOLERANCE {
            return Err(fail("the sweep section cannot be mitered onto the path"));
        }
        Ok(self.map(|q| q + along * ((origin - q).dot(normal) / denom)))
    }

    /// One quad per loop edge between `self` and the matching loop of `other`.
    fn push_side_faces(&self, other: &Self, faces: &mut Vec<Face>) -> KernelResult<()> {
        for (a, b) in self.loops().zip(other.loops()) {
            let n = a.len();
            for i in 0..n {
                let j = (i + 1) % n;
                faces.push(Face::new(vec![a[i], a[j], b[j], b[i]], Vec::new())?);
            }
        }
        Ok(())
    }
}

/// Right-handed section axes for a path tangent, Y leaning towards world Z.
fn section_axes(tangent: &Vec3) -> (Vec3, Vec3) {
    let up = if tangent.cross(&Vec3::z()).norm() < TOLERANCE {
        Vec3::x()
    } else {
        Vec3::z()
    };
    let x_dir = up.cross(tangent).normalize();
    let y_dir = tangent.cross(&x_dir);
    (x_dir, y_dir)
}

/// Drops consecutive points closer than [`EPSILON`], and for closed paths a
/// last point that repeats the first.
fn dedupe(points: Vec<Point3>, closed: bool) -> Vec<Point3> {
    let mut out: Vec<Point3> = Vec::with_capacity(points.len());
    for p in points {
        if !out.last().is_some_and(|last| (p - last).norm() <= EPSILON) {
            out.push(p);
        }
    }
    if closed && out.len() > 1 {
        if let (Some(first), Some(last)) = (out.first(), out.last()) {
            if (last - first).norm() <= EPSILON {
                out.pop();
            }
        }
    }
    out
}

/// Shortens an open path by the setbacks. A negative setback extends the
/// path along its end tangent.
fn trim_path(path: Vec<Point3>, start: f64, end: f64) -> KernelResult<Vec<Point3>> {
    if !start.is_finite() || !end.is_finite() {
        return Err(fail("sweep setbacks must be finite"));
    }
    if path.len() < 2 {
        return Err(fail("the sweep path is degenerate"));
    }
    let total: f64 = path.windows(2).map(|w| (w[1] - w[0]).norm()).sum();
    if start + end >= total - EPSILON {
        return Err(fail(format!(
            "setbacks {start} and {end} consume the whole path of length {total}"
        )));
    }
    let mut reversed = trim_start(path, start);
    reversed.reverse();
    let mut trimmed = trim_start(reversed, end);
    trimmed.reverse();
    Ok(trimmed)
}

fn trim_start(mut path: Vec<Point3>, setback: f64) -> Vec<Point3> {
    if setback < 0.0 {
        let tangent = (path[1] - path[0]).normalize();
        path[0] += tangent * setback;
        return path;
    }
    let mut remaining = setback;
    for i in 0..path.len() - 1 {
        let segment = path[i + 1] - path[i];
        let len = segment.norm();
        if remaining < len {
            let mut out = Vec::with_capacity(path.len() - i);
            out.push(path[i] + segment * (remaining / len));
            out.extend_from_slice(&path[i + 1..]);
            return out;
        }
        remaining -= len;
    }
    path.split_off(path.len() - 1)
}

/// Computes the number of line segments needed to approximate an arc
/// within the given tolerance.
fn arc_subdivision_count(radius: f64, abs_sweep: f64, tolerance: f64) -> u32 {
    if radius < 1e-12 || abs_sweep < 1e-12 || tolerance <= 0.0 {
        return 1;
    }
    // From the sagitta formula: sagitta = r * (1 - cos(θ/2))
    let max_angle = if tolerance >= radius {
        std::f64::consts::PI
    } else {
        2.0 * (1.0 - tolerance / radius).acos()
    };
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let n = (abs_sweep / max_angle).ceil() as u32;
    n.max(1)
}
