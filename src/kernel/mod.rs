//! The kernel facade: turns validated solid parameters into boundary
//! geometry.

mod brep;
mod solid;

use std::fmt;

pub use brep::BrepKernel;
pub use solid::{BooleanGeometry, Face, Solid};

use crate::error::KernelResult;
use crate::geometry::{CurveGeometry, Polygon, Profile, Vector3};

/// Generates solids for the solid operations.
///
/// Implementations receive parameters that have already passed validation
/// and report anything they cannot build as a [`KernelError`](crate::error::KernelError).
pub trait Kernel: Send + Sync + fmt::Debug {
    /// Extrudes `profile` by `height` along `direction`.
    ///
    /// # Errors
    ///
    /// Returns an error if no solid can be generated.
    fn create_extrude(
        &self,
        profile: &Profile,
        height: f64,
        direction: &Vector3,
        flipped: bool,
    ) -> KernelResult<Solid>;

    /// Sweeps `profile` along `curve`, trimmed by the setbacks.
    ///
    /// # Errors
    ///
    /// Returns an error if no solid can be generated.
    fn create_sweep_along_curve(
        &self,
        profile: &Profile,
        curve: &CurveGeometry,
        start_setback: f64,
        end_setback: f64,
    ) -> KernelResult<Solid>;

    /// Creates a zero-thickness solid from a planar perimeter.
    ///
    /// # Errors
    ///
    /// Returns an error if no solid can be generated.
    fn create_lamina(&self, perimeter: &Polygon) -> KernelResult<Solid>;
}

/// Parameters controlling curve discretization.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KernelParams {
    /// Maximum allowed chord deviation from a true arc.
    pub tolerance: f64,
    /// Minimum number of segments for an arc.
    pub min_segments: u32,
    /// Maximum number of segments for an arc.
    pub max_segments: u32,
}

impl Default for KernelParams {
    fn default() -> Self {
        Self {
            tolerance: 0.01,
            min_segments: 4,
            max_segments: 256,
        }
    }
}
