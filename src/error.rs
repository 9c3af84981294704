use thiserror::Error;

/// Top-level error type for elemgeo.
#[derive(Debug, Error)]
pub enum ElemGeoError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Kernel(#[from] KernelError),

    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Broad classification of an [`ElemGeoError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A single argument violates a local invariant.
    InvalidArgument,
    /// A numeric argument falls outside its valid interval.
    OutOfRange,
    /// A structural geometric invariant fails.
    GeometricInconsistency,
    /// The kernel could not produce geometry for valid parameters.
    GeometryGenerationFailure,
    /// Persisted data could not be read or written.
    Serialization,
}

impl ElemGeoError {
    /// Returns the kind of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(ValidationError::InvalidArgument(_)) => ErrorKind::InvalidArgument,
            Self::Validation(ValidationError::OutOfRange { .. }) => ErrorKind::OutOfRange,
            Self::Validation(ValidationError::GeometricInconsistency(_)) => {
                ErrorKind::GeometricInconsistency
            }
            Self::Kernel(_) => ErrorKind::GeometryGenerationFailure,
            Self::Serialization(_) => ErrorKind::Serialization,
        }
    }
}

/// Invariant violations raised by validators.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ValidationError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("{parameter} is out of range: {message}")]
    OutOfRange {
        parameter: &'static str,
        message: String,
    },

    #[error("geometric inconsistency: {0}")]
    GeometricInconsistency(String),
}

impl ValidationError {
    pub(crate) fn out_of_range(parameter: &'static str, message: impl Into<String>) -> Self {
        Self::OutOfRange {
            parameter,
            message: message.into(),
        }
    }
}

/// Errors raised by a kernel while generating geometry.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum KernelError {
    #[error("geometry generation failed: {0}")]
    GeometryGeneration(String),

    #[error("triangulation failed: {0}")]
    Triangulation(String),

    #[error("solid operation has no valid geometry; rebuild required")]
    NotBuilt,
}

/// Convenience type alias for results using [`ElemGeoError`].
pub type Result<T, E = ElemGeoError> = std::result::Result<T, E>;

/// Result type returned by [`Kernel`](crate::kernel::Kernel) implementations.
pub type KernelResult<T> = std::result::Result<T, KernelError>;
