use serde::{Deserialize, Serialize};

use crate::error::{Result, ValidationError};
use crate::geometry::Vector3;
use crate::validation::{ConstructArgs, ConstructionContext, Entity, Instance};

use super::{chain_length, chain_point_at, Curve, Line};

/// An open chain of coplanar vertices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polyline {
    vertices: Vec<Vector3>,
}

impl Polyline {
    /// Creates a polyline in the default validated context.
    ///
    /// # Errors
    ///
    /// Returns a `GeometricInconsistency` error if the vertices are not
    /// coplanar, and an `InvalidArgument` error naming the first segment no
    /// longer than the model tolerance.
    pub fn new(vertices: Vec<Vector3>) -> Result<Self> {
        Self::new_in(&ConstructionContext::default(), vertices)
    }

    /// Creates a polyline in an explicit construction context.
    ///
    /// # Errors
    ///
    /// See [`Polyline::new`]; no check runs in a trusted context.
    pub fn new_in(ctx: &ConstructionContext, vertices: Vec<Vector3>) -> Result<Self> {
        ctx.pre_construct(&ConstructArgs::Polyline {
            vertices: &vertices,
        })?;
        let mut polyline = Self { vertices };
        ctx.post_construct(polyline.as_instance())?;
        Ok(polyline)
    }

    #[must_use]
    pub fn vertices(&self) -> &[Vector3] {
        &self.vertices
    }

    /// Returns one line per consecutive vertex pair.
    #[must_use]
    pub fn segments(&self) -> Vec<Line> {
        self.vertices
            .windows(2)
            .map(|w| Line::raw(w[0], w[1]))
            .collect()
    }

    #[must_use]
    pub fn reversed(&self) -> Self {
        let mut vertices = self.vertices.clone();
        vertices.reverse();
        Self { vertices }
    }
}

impl Curve for Polyline {
    fn point_at(&self, u: f64) -> Vector3 {
        chain_point_at(&self.vertices, false, u)
    }

    fn length(&self) -> f64 {
        chain_length(&self.vertices, false)
    }

    fn is_closed(&self) -> bool {
        false
    }
}

impl Entity for Polyline {
    fn construct_args(&self) -> ConstructArgs<'_> {
        ConstructArgs::Polyline {
            vertices: &self.vertices,
        }
    }

    fn as_instance(&mut self) -> Instance<'_> {
        Instance::Polyline(self)
    }

    fn validate_children(&mut self, ctx: &ConstructionContext) -> Result<(), ValidationError> {
        self.vertices.iter_mut().try_for_each(|v| ctx.validate(v))
    }
}
