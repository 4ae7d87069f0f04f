//! Projections of the table model into other schema languages.
//!
//! Every projection borrows the [`Table`] and never mutates it. The compact
//! form is the serde representation of the model itself; the other
//! projections are behind their own cargo features.

use alloc::string::String;

use crate::errors::Error;
use crate::model::Table;

#[cfg(feature = "document-schema")]
mod document;
#[cfg(feature = "json-schema")]
mod json_schema;

#[cfg(feature = "document-schema")]
pub use document::{DocumentField, DocumentSchema, DocumentType, FieldReference, to_document_schema};
#[cfg(feature = "json-schema")]
pub use json_schema::{
    JsonSchema, JsonSchemaOptions, JsonType, JsonTypes, Property, PropertySchema, to_json_schema,
};

/// Serializes a table to its compact JSON form.
///
/// # Errors
///
/// Returns [`Error::Json`] if serialization fails.
pub fn to_compact_json(table: &Table) -> Result<String, Error> {
    Ok(serde_json::to_string(table)?)
}

/// Decodes a table from its compact JSON form and checks its invariants.
///
/// # Errors
///
/// * [`Error::Json`] if the input does not decode.
/// * [`Error::Reference`] if a key or index names a missing column, a
///   column or index name repeats, or a key has no columns.
pub fn from_compact_json(json: &str) -> Result<Table, Error> {
    let table: Table = serde_json::from_str(json)?;
    table.validate()?;
    Ok(table)
}

/// Converts a derived bound to a JSON number, as an integer when it is one.
#[cfg(any(feature = "json-schema", feature = "document-schema"))]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::float_cmp
)]
fn number(value: f64) -> Option<serde_json::Number> {
    let truncated = value as i64;
    if truncated as f64 == value {
        Some(serde_json::Number::from(truncated))
    } else {
        serde_json::Number::from_f64(value)
    }
}
