pub mod coplanar;
pub mod intersect_2d;
pub mod polygon_2d;
pub mod polygon_3d;

/// 2D point type.
pub type Point2 = nalgebra::Point2<f64>;

/// 3D point type.
pub type Point3 = nalgebra::Point3<f64>;

/// 3D vector type.
pub type Vec3 = nalgebra::Vector3<f64>;

/// 4x4 transformation matrix.
pub type Matrix4 = nalgebra::Matrix4<f64>;

/// Numerical tolerance for floating-point comparisons inside predicates.
pub const TOLERANCE: f64 = 1e-10;

/// Model tolerance. Distances below this are treated as zero when comparing
/// points, measuring segments and testing coplanarity.
pub const EPSILON: f64 = 1e-5;
