//! Validated geometric primitives and reactive parametric solids for
//! building-element models.
//!
//! Every entity is checked by the validators of a
//! [`ConstructionContext`](validation::ConstructionContext) when it is built.
//! Solid operations keep the geometry a [`Kernel`](kernel::Kernel) derives
//! from their parameters in sync with every change.

pub mod dimension;
pub mod element;
pub mod error;
pub mod geometry;
pub mod kernel;
pub mod material;
pub mod math;
pub mod operations;
pub mod persist;
pub mod tessellation;
pub mod validation;

pub use error::{ElemGeoError, ErrorKind, Result};
