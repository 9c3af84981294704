use serde::{Deserialize, Serialize};

use crate::error::{KernelResult, Result, ValidationError};
use crate::geometry::{CurveGeometry, Profile};
use crate::kernel::{Kernel, Solid};
use crate::validation::{ConstructArgs, ConstructionContext, Entity, EntityKind, Instance};

use super::{ParametricSolid, SolidParams};

/// Parameters of a sweep: a profile carried along a curve.
///
/// Setbacks trim an open curve at its start and end; negative setbacks
/// extend it. Closed curves ignore them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepParams {
    profile: Profile,
    curve: CurveGeometry,
    #[serde(default)]
    start_setback: f64,
    #[serde(default)]
    end_setback: f64,
    #[serde(default)]
    is_void: bool,
}

impl SweepParams {
    #[must_use]
    pub fn new(profile: Profile, curve: impl Into<CurveGeometry>) -> Self {
        Self {
            profile,
            curve: curve.into(),
            start_setback: 0.0,
            end_setback: 0.0,
            is_void: false,
        }
    }

    #[must_use]
    pub fn with_setbacks(mut self, start: f64, end: f64) -> Self {
        self.start_setback = start;
        self.end_setback = end;
        self
    }

    /// Marks the sweep as subtractive.
    #[must_use]
    pub fn void(mut self) -> Self {
        self.is_void = true;
        self
    }

    #[must_use]
    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    #[must_use]
    pub fn curve(&self) -> &CurveGeometry {
        &self.curve
    }

    #[must_use]
    pub fn start_setback(&self) -> f64 {
        self.start_setback
    }

    #[must_use]
    pub fn end_setback(&self) -> f64 {
        self.end_setback
    }

    pub fn set_profile(&mut self, profile: Profile) {
        self.profile = profile;
    }

    pub fn set_curve(&mut self, curve: impl Into<CurveGeometry>) {
        self.curve = curve.into();
    }

    pub fn set_start_setback(&mut self, setback: f64) {
        self.start_setback = setback;
    }

    pub fn set_end_setback(&mut self, setback: f64) {
        self.end_setback = setback;
    }
}

impl Entity for SweepParams {
    fn construct_args(&self) -> ConstructArgs<'_> {
        ConstructArgs::Sweep {
            profile: &self.profile,
            curve: &self.curve,
            start_setback: self.start_setback,
            end_setback: self.end_setback,
            is_void: self.is_void,
        }
    }

    fn as_instance(&mut self) -> Instance<'_> {
        Instance::Sweep(self)
    }

    fn validate_children(&mut self, ctx: &ConstructionContext) -> Result<(), ValidationError> {
        ctx.validate(&mut self.profile)?;
        self.curve.validate_in(ctx)
    }
}

impl SolidParams for SweepParams {
    const KIND: EntityKind = EntityKind::Sweep;

    fn is_void(&self) -> bool {
        self.is_void
    }

    fn set_void(&mut self, is_void: bool) {
        self.is_void = is_void;
    }

    fn generate(&self, kernel: &dyn Kernel) -> KernelResult<Solid> {
        kernel.create_sweep_along_curve(
            &self.profile,
            &self.curve,
            self.start_setback,
            self.end_setback,
        )
    }
}

/// A profile swept along a curve, kept in sync with its parameters.
pub type Sweep = ParametricSolid<SweepParams>;

impl Sweep {
    /// Replaces the profile and regenerates the solid.
    ///
    /// # Errors
    ///
    /// See [`ParametricSolid::update`].
    pub fn set_profile(&mut self, profile: Profile) -> Result<()> {
        self.update(|p| p.set_profile(profile)).map(drop)
    }

    /// Replaces the path and regenerates the solid.
    ///
    /// # Errors
    ///
    /// See [`ParametricSolid::update`].
    pub fn set_curve(&mut self, curve: impl Into<CurveGeometry>) -> Result<()> {
        let curve = curve.into();
        self.update(|p| p.set_curve(curve)).map(drop)
    }

    /// Changes the start setback and regenerates the solid.
    ///
    /// # Errors
    ///
    /// Returns a kernel error if the setbacks consume the whole path.
    pub fn set_start_setback(&mut self, setback: f64) -> Result<()> {
        self.update(|p| p.set_start_setback(setback)).map(drop)
    }

    /// Changes the end setback and regenerates the solid.
    ///
    /// # Errors
    ///
    /// Returns a kernel error if the setbacks consume the whole path.
    pub fn set_end_setback(&mut self, setback: f64) -> Result<()> {
        self.update(|p| p.set_end_setback(setback)).map(drop)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use approx::assert_relative_eq;

    use super::*;
    use crate::error::ErrorKind;
    use crate::geometry::{Line, Polygon, Polyline, Vector3};
    use crate::kernel::BrepKernel;

    fn v(x: f64, y: f64, z: f64) -> Vector3 {
        Vector3::new(x, y, z).unwrap()
    }

    fn sweep(length: f64) -> Sweep {
        let profile = Profile::new(Polygon::rectangle(1.0, 1.0).unwrap(), None).unwrap();
        let path = Line::new(Vector3::ORIGIN, v(length, 0.0, 0.0)).unwrap();
        Sweep::new(SweepParams::new(profile, path), Arc::new(BrepKernel::default())).unwrap()
    }

    fn volume(op: &Sweep) -> f64 {
        op.boolean_geometry().unwrap().signed_volume()
    }

    #[test]
    fn construction_generates_solid() {
        assert_relative_eq!(volume(&sweep(10.0)), 10.0, epsilon = 1e-9);
    }

    #[test]
    fn setbacks_regenerate() {
        let mut op = sweep(10.0);
        op.set_start_setback(1.0).unwrap();
        op.set_end_setback(2.0).unwrap();
        assert_relative_eq!(volume(&op), 7.0, epsilon = 1e-9);
    }

    #[test]
    fn set_curve_regenerates() {
        let mut op = sweep(10.0);
        let path = Polyline::new(vec![Vector3::ORIGIN, v(10.0, 0.0, 0.0), v(10.0, 5.0, 0.0)]).unwrap();
        op.set_curve(path).unwrap();
        assert!(matches!(op.params().curve(), CurveGeometry::Polyline(_)));
        assert_relative_eq!(volume(&op), 15.0, epsilon = 1e-9);
    }

    #[test]
    fn consuming_setbacks_leave_operation_unbuilt() {
        let mut op = sweep(10.0);
        op.set_start_setback(6.0).unwrap();
        let err = op.set_end_setback(5.0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::GeometryGenerationFailure);
        assert_relative_eq!(op.params().end_setback(), 0.0);
        assert!(op.solid().is_err());

        op.rebuild().unwrap();
        assert_relative_eq!(volume(&op), 4.0, epsilon = 1e-9);
    }

    #[test]
    fn invalid_path_is_rejected_before_generation() {
        let mut op = sweep(10.0);
        let mut json = serde_json::to_value(op.params()).unwrap();
        json["curve"]["end"] = serde_json::to_value(Vector3::ORIGIN).unwrap();
        let params: SweepParams = serde_json::from_value(json).unwrap();
        let err = op.update(|p| *p = params).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert!(op.is_built());
        assert_relative_eq!(volume(&op), 10.0, epsilon = 1e-9);
    }
}
