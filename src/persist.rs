//! JSON persistence for validated entities.
//!
//! Entities serialize their declared fields only. Loading goes back through
//! the validation hooks of the given context, nested entities first. Solid
//! operations and elements need a kernel to regenerate their geometry and are
//! loaded with [`SolidOperation::from_json`](crate::operations::SolidOperation::from_json)
//! and [`GeometricElement::from_json`](crate::element::GeometricElement::from_json).

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::error::Result;
use crate::validation::{ConstructionContext, Entity};

/// Reads an entity from JSON and validates it in `ctx`.
///
/// # Errors
///
/// Returns a serialization error for malformed JSON, or the first validation
/// error raised by the entity or one of its nested entities.
pub fn from_json<T: Entity + DeserializeOwned>(json: &str, ctx: &ConstructionContext) -> Result<T> {
    let mut value: T = serde_json::from_str(json)?;
    ctx.validate(&mut value)?;
    debug!(mode = ?ctx.mode(), "loaded entity from json");
    Ok(value)
}

/// Writes an entity's declared fields as JSON.
///
/// # Errors
///
/// Returns a serialization error if the value cannot be represented as JSON.
pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string(value)?)
}

/// Writes an entity's declared fields as indented JSON.
///
/// # Errors
///
/// Returns a serialization error if the value cannot be represented as JSON.
pub fn to_json_pretty<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}
