mod bbox;
mod color;
pub mod curve;
mod matrix;
mod plane;
mod profile;
mod transform;
mod vector;

pub use bbox::BBox3;
pub use color::{Color, Colors};
pub use curve::{Arc, Curve, CurveGeometry, Line, Polygon, Polyline};
pub use matrix::Matrix;
pub use plane::Plane;
pub use profile::Profile;
pub use transform::Transform;
pub use vector::Vector3;
