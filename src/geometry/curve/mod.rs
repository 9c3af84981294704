mod arc;
mod line;
mod polygon;
mod polyline;

pub use arc::Arc;
pub use line::Line;
pub use polygon::Polygon;
pub use polyline::Polyline;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::validation::ConstructionContext;

use crate::geometry::Vector3;

/// A bounded curve parameterized over `[0, 1]`.
pub trait Curve {
    /// Evaluates the curve at normalized parameter `u`.
    ///
    /// `u` is clamped to `[0, 1]`; for chains it is proportional to arc length.
    fn point_at(&self, u: f64) -> Vector3;

    /// Returns the length of the curve.
    fn length(&self) -> f64;

    /// Returns whether the curve is closed.
    fn is_closed(&self) -> bool;

    /// Returns the start point.
    fn start(&self) -> Vector3 {
        self.point_at(0.0)
    }

    /// Returns the end point.
    fn end(&self) -> Vector3 {
        self.point_at(1.0)
    }
}

/// The curves a sweep can follow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CurveGeometry {
    Line(Line),
    Arc(Arc),
    Polyline(Polyline),
    Polygon(Polygon),
}

impl CurveGeometry {
    pub(crate) fn validate_in(&mut self, ctx: &ConstructionContext) -> Result<(), ValidationError> {
        match self {
            Self::Line(line) => ctx.validate(line),
            Self::Arc(arc) => ctx.validate(arc),
            Self::Polyline(polyline) => ctx.validate(polyline),
            Self::Polygon(polygon) => ctx.validate(polygon),
        }
    }

    fn as_curve(&self) -> &dyn Curve {
        match self {
            Self::Line(line) => line,
            Self::Arc(arc) => arc,
            Self::Polyline(polyline) => polyline,
            Self::Polygon(polygon) => polygon,
        }
    }
}

impl Curve for CurveGeometry {
    fn point_at(&self, u: f64) -> Vector3 {
        self.as_curve().point_at(u)
    }

    fn length(&self) -> f64 {
        self.as_curve().length()
    }

    fn is_closed(&self) -> bool {
        self.as_curve().is_closed()
    }
}

impl From<Line> for CurveGeometry {
    fn from(line: Line) -> Self {
        Self::Line(line)
    }
}

impl From<Arc> for CurveGeometry {
    fn from(arc: Arc) -> Self {
        Self::Arc(arc)
    }
}

impl From<Polyline> for CurveGeometry {
    fn from(polyline: Polyline) -> Self {
        Self::Polyline(polyline)
    }
}

impl From<Polygon> for CurveGeometry {
    fn from(polygon: Polygon) -> Self {
        Self::Polygon(polygon)
    }
}

/// Evaluates a vertex chain at normalized parameter `u`, by length.
pub(crate) fn chain_point_at(vertices: &[Vector3], closed: bool, u: f64) -> Vector3 {
    let Some(first) = vertices.first() else {
        return Vector3::ORIGIN;
    };
    let n = vertices.len();
    let count = if closed { n } else { n - 1 };
    let total = chain_length(vertices, closed);
    if count == 0 || total <= 0.0 {
        return *first;
    }
    let mut remaining = u.clamp(0.0, 1.0) * total;
    for i in 0..count {
        let a = vertices[i];
        let b = vertices[(i + 1) % n];
        let segment = a.distance_to(&b);
        if remaining <= segment || i == count - 1 {
            let t = if segment > 0.0 {
                (remaining / segment).min(1.0)
            } else {
                0.0
            };
            return a + (b - a) * t;
        }
        remaining -= segment;
    }
    *first
}

pub(crate) fn chain_length(vertices: &[Vector3], closed: bool) -> f64 {
    let n = vertices.len();
    if n < 2 {
        return 0.0;
    }
    let open: f64 = vertices.windows(2).map(|w| w[0].distance_to(&w[1])).sum();
    if closed {
        open + vertices[n - 1].distance_to(&vertices[0])
    } else {
        open
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn curve_geometry_dispatches() {
        let line = Line::new(Vector3::ORIGIN, Vector3::new(4.0, 0.0, 0.0).unwrap()).unwrap();
        let curve = CurveGeometry::from(line);
        assert!((curve.length() - 4.0).abs() < 1e-12);
        assert!(curve
            .point_at(0.25)
            .is_almost_equal_to(&Vector3::new(1.0, 0.0, 0.0).unwrap()));
        assert!(!curve.is_closed());
    }

    #[test]
    fn serialized_curve_is_tagged() {
        let line = Line::new(Vector3::ORIGIN, Vector3::X_AXIS).unwrap();
        let json = serde_json::to_string(&CurveGeometry::from(line)).unwrap();
        assert!(json.contains("\"type\":\"Line\""), "{json}");
        let back: CurveGeometry = serde_json::from_str(&json).unwrap();
        assert_eq!(back, CurveGeometry::Line(line));
    }

    #[test]
    fn chain_parameter_follows_length() {
        let vertices = [
            Vector3::ORIGIN,
            Vector3::new(1.0, 0.0, 0.0).unwrap(),
            Vector3::new(1.0, 3.0, 0.0).unwrap(),
        ];
        let p = chain_point_at(&vertices, false, 0.5);
        assert!(p.is_almost_equal_to(&Vector3::new(1.0, 1.0, 0.0).unwrap()));
        assert!((chain_length(&vertices, true) - (4.0 + 10f64.sqrt())).abs() < 1e-12);
    }
}
