//! Record type tagging and type erasure.
//!
//! The wire payload carries no type manifest, so each record has to name
//! its own schema in `attributes.type`. [`tag`] writes the name reported by
//! [`SObject::api_name`] into the envelope; [`erase`] then serializes the
//! record into a [`TaggedRecord`], the one shape every record in a batch
//! shares regardless of its Rust type.

use serde::Serialize;
use serde_json::Value;

use crate::error::TagError;
use crate::record::SObject;

/// Stamp the record's canonical type name into its envelope.
///
/// Idempotent. An empty name is written as-is; rejecting unknown types is
/// left to the server.
pub fn tag<R: SObject + ?Sized>(record: &mut R) {
    let name = record.api_name().to_owned();
    record.base_mut().attributes.type_name = name;
}

/// Tag `record` in place and erase it into its wire form.
pub fn erase<R: SObject + ?Sized>(record: &mut R) -> Result<TaggedRecord, TagError> {
    tag(record);
    let type_name = record.api_name();

    let value = serde_json::to_value(&*record).map_err(|source| TagError::Serialize {
        type_name: type_name.to_owned(),
        source,
    })?;

    if !value.is_object() {
        return Err(TagError::NotAnObject {
            type_name: type_name.to_owned(),
            found: json_kind(&value),
        });
    }

    let stamped = value
        .get("attributes")
        .and_then(|attributes| attributes.get("type"))
        .and_then(Value::as_str);
    if stamped != Some(type_name) {
        return Err(TagError::MissingEnvelope {
            type_name: type_name.to_owned(),
        });
    }

    Ok(TaggedRecord(value))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// A tagged, type-erased record: a JSON object whose `attributes.type`
/// names its schema.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(transparent)]
pub struct TaggedRecord(Value);

impl TaggedRecord {
    /// The envelope's `attributes.type`, or `""` when absent.
    pub fn type_name(&self) -> &str {
        self.0
            .get("attributes")
            .and_then(|attributes| attributes.get("type"))
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    /// The record's `Id`, if it carries one.
    pub fn id(&self) -> Option<&str> {
        self.0.get("Id").and_then(Value::as_str)
    }

    /// The record's JSON object.
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Unwrap into the record's JSON object.
    pub fn into_value(self) -> Value {
        self.0
    }
}
