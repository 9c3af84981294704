use std::sync::Arc;

use serde::{Serialize, Serializer};
use tracing::debug;

use crate::error::{KernelError, KernelResult, Result};
use crate::kernel::{BooleanGeometry, Kernel, Solid};
use crate::validation::ConstructionContext;

use super::SolidParams;

/// Derived geometry of a solid operation.
#[derive(Debug, Clone)]
enum Derived {
    Built {
        solid: Solid,
        boolean: BooleanGeometry,
    },
    /// The last generation attempt failed; nothing is cached.
    Failed,
}

/// A solid operation: declared parameters plus the geometry derived from
/// them.
///
/// The derived solid is regenerated through the kernel on construction and
/// on every parameter change, before the change returns. Equality and
/// serialization only consider the parameters.
#[derive(Debug, Clone)]
pub struct ParametricSolid<P> {
    params: P,
    kernel: Arc<dyn Kernel>,
    ctx: ConstructionContext,
    derived: Derived,
}

impl<P: SolidParams> ParametricSolid<P> {
    /// Builds the operation in the default validated context.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the parameters violate an invariant, or
    /// a kernel error if no geometry can be generated for them.
    pub fn new(params: P, kernel: Arc<dyn Kernel>) -> Result<Self> {
        Self::new_in(&ConstructionContext::default(), params, kernel)
    }

    /// Builds the operation in an explicit construction context.
    ///
    /// Geometry is generated even when the context is trusted.
    ///
    /// # Errors
    ///
    /// See [`ParametricSolid::new`].
    pub fn new_in(ctx: &ConstructionContext, mut params: P, kernel: Arc<dyn Kernel>) -> Result<Self> {
        ctx.validate(&mut params)?;
        let (solid, boolean) = generate(&params, kernel.as_ref())?;
        Ok(Self {
            params,
            kernel,
            ctx: ctx.clone(),
            derived: Derived::Built { solid, boolean },
        })
    }

    /// Returns the declared parameters.
    #[must_use]
    pub fn params(&self) -> &P {
        &self.params
    }

    /// Returns the kernel used to generate geometry.
    #[must_use]
    pub fn kernel(&self) -> &Arc<dyn Kernel> {
        &self.kernel
    }

    /// Returns the context later changes are validated in.
    #[must_use]
    pub fn context(&self) -> &ConstructionContext {
        &self.ctx
    }

    /// Returns `true` unless the last generation failed.
    #[must_use]
    pub fn is_built(&self) -> bool {
        matches!(self.derived, Derived::Built { .. })
    }

    /// Returns the derived solid.
    ///
    /// # Errors
    ///
    /// Returns [`KernelError::NotBuilt`] after a failed change, until
    /// [`rebuild`](Self::rebuild) succeeds.
    pub fn solid(&self) -> KernelResult<&Solid> {
        match &self.derived {
            Derived::Built { solid, .. } => Ok(solid),
            Derived::Failed => Err(KernelError::NotBuilt),
        }
    }

    /// Returns the boolean-ready triangulation of the derived solid.
    ///
    /// # Errors
    ///
    /// Returns [`KernelError::NotBuilt`] after a failed change, until
    /// [`rebuild`](Self::rebuild) succeeds.
    pub fn boolean_geometry(&self) -> KernelResult<&BooleanGeometry> {
        match &self.derived {
            Derived::Built { boolean, .. } => Ok(boolean),
            Derived::Failed => Err(KernelError::NotBuilt),
        }
    }

    #[must_use]
    pub fn is_void(&self) -> bool {
        self.params.is_void()
    }

    /// Marks the operation as subtractive. Geometry is not regenerated.
    pub fn set_void(&mut self, is_void: bool) {
        self.params.set_void(is_void);
    }

    /// Edits a copy of the parameters, then validates, regenerates and
    /// commits it.
    ///
    /// Returns `Ok(false)` without calling the kernel when the edit leaves
    /// the parameters unchanged, before or after validation normalizes it. On a validation error nothing
    /// changes. On a kernel error the edit is discarded and the operation is
    /// left without geometry.
    ///
    /// # Errors
    ///
    /// Returns the validation or kernel error that stopped the change.
    pub fn update(&mut self, edit: impl FnOnce(&mut P)) -> Result<bool> {
        let mut next = self.params.clone();
        edit(&mut next);
        if next == self.params {
            return Ok(false);
        }
        self.ctx.validate(&mut next)?;
        // Validation may normalize the edit back to the current parameters.
        if next == self.params {
            return Ok(false);
        }
        match generate(&next, self.kernel.as_ref()) {
            Ok((solid, boolean)) => {
                self.params = next;
                self.derived = Derived::Built { solid, boolean };
                Ok(true)
            }
            Err(e) => {
                self.derived = Derived::Failed;
                Err(e.into())
            }
        }
    }

    /// Regenerates geometry from the current parameters.
    ///
    /// # Errors
    ///
    /// Returns the kernel error if generation fails again.
    pub fn rebuild(&mut self) -> Result<()> {
        match generate(&self.params, self.kernel.as_ref()) {
            Ok((solid, boolean)) => {
                self.derived = Derived::Built { solid, boolean };
                Ok(())
            }
            Err(e) => {
                self.derived = Derived::Failed;
                Err(e.into())
            }
        }
    }
}

fn generate<P: SolidParams>(params: &P, kernel: &dyn Kernel) -> KernelResult<(Solid, BooleanGeometry)> {
    debug!(kind = %P::KIND, "regenerating solid");
    let result = params
        .generate(kernel)
        .and_then(|solid| solid.to_boolean_representation().map(|boolean| (solid, boolean)));
    if let Err(e) = &result {
        debug!(kind = %P::KIND, error = %e, "solid generation failed");
    }
    result
}

impl<P: PartialEq> PartialEq for ParametricSolid<P> {
    fn eq(&self, other: &Self) -> bool {
        self.params == other.params
    }
}

impl<P: Serialize> Serialize for ParametricSolid<P> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.params.serialize(serializer)
    }
}
