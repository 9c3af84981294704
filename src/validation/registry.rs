use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

use super::validators::{
    ArcValidator, BBox3Validator, ColorValidator, ExtrudeValidator, GeometricElementValidator,
    LineValidator, MaterialValidator, MatrixValidator, PlaneValidator, PolygonValidator,
    PolylineValidator, ProfileValidator, Vector3Validator,
};
use super::{EntityKind, Validator};

static GLOBAL: OnceLock<Arc<ValidatorRegistry>> = OnceLock::new();

/// Maps each [`EntityKind`] to at most one [`Validator`].
///
/// Built once and read-only afterwards; share it behind an [`Arc`].
#[derive(Default)]
pub struct ValidatorRegistry {
    validators: HashMap<EntityKind, Box<dyn Validator>>,
}

impl ValidatorRegistry {
    /// Creates a registry with no validators. Every kind constructs unchecked.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Creates a registry holding the built-in validators.
    #[must_use]
    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        registry.register(Box::new(Vector3Validator));
        registry.register(Box::new(ColorValidator));
        registry.register(Box::new(PlaneValidator));
        registry.register(Box::new(LineValidator));
        registry.register(Box::new(PolylineValidator));
        registry.register(Box::new(PolygonValidator));
        registry.register(Box::new(ArcValidator));
        registry.register(Box::new(MatrixValidator));
        registry.register(Box::new(BBox3Validator));
        registry.register(Box::new(ProfileValidator));
        registry.register(Box::new(MaterialValidator));
        registry.register(Box::new(GeometricElementValidator));
        registry.register(Box::new(ExtrudeValidator));
        registry
    }

    /// Returns the process-wide built-in registry, creating it on first use.
    #[must_use]
    pub fn global() -> Arc<Self> {
        Arc::clone(GLOBAL.get_or_init(|| Arc::new(Self::builtin())))
    }

    /// Registers a validator under the kind it validates, returning the one it
    /// replaces.
    pub fn register(&mut self, validator: Box<dyn Validator>) -> Option<Box<dyn Validator>> {
        self.validators.insert(validator.validates(), validator)
    }

    /// Removes the validator for `kind`.
    pub fn unregister(&mut self, kind: EntityKind) -> Option<Box<dyn Validator>> {
        self.validators.remove(&kind)
    }

    /// Looks up the validator for `kind`.
    #[must_use]
    pub fn get(&self, kind: EntityKind) -> Option<&dyn Validator> {
        self.validators.get(&kind).map(AsRef::as_ref)
    }

    /// Returns `true` if a validator is registered for `kind`.
    #[must_use]
    pub fn contains(&self, kind: EntityKind) -> bool {
        self.validators.contains_key(&kind)
    }
}

impl fmt::Debug for ValidatorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut kinds: Vec<String> = self.validators.keys().map(ToString::to_string).collect();
        kinds.sort();
        f.debug_struct("ValidatorRegistry").field("kinds", &kinds).finish()
    }
}
