//! Document codec.
//!
//! Converts application documents to the backend's field-list format for
//! writes, and field-oriented result documents back to plain documents for
//! reads. The codec never fails: malformed input degrades to an empty
//! document.
//!
//! # Decode modes
//!
//! | Mode | Field value | Metadata |
//! |------|-------------|----------|
//! | [`DecodeMode::Truncating`] | first value, `null` when empty | dropped |
//! | [`DecodeMode::FullFidelity`] | every value, `[]` when empty | kept under [`INFO_KEY`] |
//!
//! Full-fidelity output can be brought back to scalars with [`flatten`].

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::types::{BackendDocument, Document, FieldEntry, ResultDocument};

/// Reserved key holding document-level metadata in full-fidelity decode.
pub const INFO_KEY: &str = "info";

/// Selects how result documents are decoded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DecodeMode {
    /// Surface the first value of every field.
    #[default]
    Truncating,
    /// Keep every value and expose metadata under [`INFO_KEY`].
    FullFidelity,
}

/// Encodes an application document for writing.
///
/// Every array value becomes one entry per element, in element order; every
/// other value becomes exactly one entry. An empty array contributes no
/// entry.
pub fn encode(document: &Document, lang: &str) -> BackendDocument {
    let mut fields = Vec::with_capacity(document.len());
    for (name, value) in document {
        match value {
            Value::Array(values) => {
                fields.extend(values.iter().map(|v| FieldEntry::new(name.as_str(), v.clone())));
            }
            other => fields.push(FieldEntry::new(name.as_str(), other.clone())),
        }
    }
    BackendDocument {
        lang: lang.to_string(),
        fields,
    }
}

/// Decodes a result document according to `mode`.
pub fn decode(document: &ResultDocument, mode: DecodeMode) -> Document {
    match mode {
        DecodeMode::Truncating => decode_truncating(document),
        DecodeMode::FullFidelity => decode_full(document),
    }
}

/// Decodes keeping only the first value of every field.
///
/// A field appearing twice resolves to the last occurrence.
pub fn decode_truncating(document: &ResultDocument) -> Document {
    document
        .fields
        .iter()
        .map(|field| {
            let value = field.values.first().cloned().unwrap_or(Value::Null);
            (field.field_name.clone(), value)
        })
        .collect()
}

/// Decodes keeping every value of every field.
///
/// Metadata outside the field list is collected under [`INFO_KEY`]; a real
/// field with that name is dropped so the two never collide.
pub fn decode_full(document: &ResultDocument) -> Document {
    let mut out: Document = document
        .fields
        .iter()
        .filter(|field| field.field_name != INFO_KEY)
        .map(|field| (field.field_name.clone(), Value::Array(field.values.clone())))
        .collect();
    out.insert(
        INFO_KEY.to_string(),
        Value::Object(document.metadata.clone()),
    );
    out
}

/// Brings a full-fidelity document back to scalars.
///
/// Drops [`INFO_KEY`], replaces arrays by their first element (`null` when
/// empty) and keeps scalars as they are.
pub fn flatten(document: Document) -> Document {
    document
        .into_iter()
        .filter(|(key, _)| key != INFO_KEY)
        .map(|(key, value)| {
            let value = match value {
                Value::Array(values) => values.into_iter().next().unwrap_or(Value::Null),
                other => other,
            };
            (key, value)
        })
        .collect()
}

/// Interprets an arbitrary JSON value as a document.
///
/// Anything but an object yields an empty document.
pub fn document_from_value(value: Value) -> Document {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}
