//! # Message Builder
//!
//! Populates a [`DynamicMessage`] from the `name=value` assignments of a call.
//!
//! ## Coercion rules
//!
//! Values always arrive as strings. How they reach the field depends on its type:
//!
//! * `uint64`: parsed as a base-10 unsigned integer, without sign.
//! * `string`: assigned verbatim.
//! * everything else goes through the protobuf JSON mapping, with the raw text as a JSON
//!   string. That covers quoted numbers, enum names, base64 bytes, and the string forms
//!   of well-known types such as `google.protobuf.Timestamp`.
//! * `bool` and message fields first try the raw text as a JSON literal (`true`, `{"a": 1}`).
//! * repeated fields accept a JSON array, or a single element. Map fields take a JSON object.
use std::collections::{BTreeMap, HashMap};

use prost_reflect::{DynamicMessage, FieldDescriptor, Kind, MessageDescriptor, Value};

use crate::BoxError;

#[derive(Debug, thiserror::Error)]
pub enum MessageBuildError {
    #[error("Failed to create a message of type '{0}'")]
    MessageCreationFailed(String),
    #[error("Field '{field}' not found in message '{message}'")]
    FieldNotFound { message: String, field: String },
    #[error("Invalid value '{value}' for field '{field}': {source}")]
    FieldCoercionFailed {
        field: String,
        value: String,
        #[source]
        source: BoxError,
    },
    #[error("Fields '{first}' and '{second}' are both members of oneof '{oneof}'")]
    ConflictingOneofFields {
        oneof: String,
        first: String,
        second: String,
    },
}

/// Builds a message of type `input` with every assignment in `fields` applied.
///
/// Nothing is returned unless every field was applied.
pub fn build_message(
    input: &MessageDescriptor,
    fields: &BTreeMap<String, String>,
) -> Result<DynamicMessage, MessageBuildError> {
    if input.is_map_entry() {
        return Err(MessageBuildError::MessageCreationFailed(
            input.full_name().to_string(),
        ));
    }

    let mut message = DynamicMessage::new(input.clone());
    let mut claimed_oneofs: HashMap<String, &str> = HashMap::new();

    for (name, raw) in fields {
        let field = input
            .get_field_by_name(name)
            .ok_or_else(|| MessageBuildError::FieldNotFound {
                message: input.full_name().to_string(),
                field: name.clone(),
            })?;

        if let Some(oneof) = field.containing_oneof()
            && let Some(first) = claimed_oneofs.insert(oneof.full_name().to_string(), name)
        {
            return Err(MessageBuildError::ConflictingOneofFields {
                oneof: oneof.full_name().to_string(),
                first: first.to_string(),
                second: name.clone(),
            });
        }

        let coercion_failed = |source: BoxError| MessageBuildError::FieldCoercionFailed {
            field: name.clone(),
            value: raw.clone(),
            source,
        };

        let value = coerce(input, &field, raw).map_err(coercion_failed)?;
        message
            .try_set_field(&field, value)
            .map_err(|e| coercion_failed(e.into()))?;

        tracing::trace!(field = field.full_name(), "field assigned");
    }

    Ok(message)
}

fn coerce(
    input: &MessageDescriptor,
    field: &FieldDescriptor,
    raw: &str,
) -> Result<Value, BoxError> {
    let kind = field.kind();

    if field.is_map() {
        let json = json_literal(raw).unwrap_or_else(|| json_string(raw));
        return from_json_mapping(input, field, json);
    }

    if field.is_list() {
        let json = match json_literal(raw) {
            Some(array @ serde_json::Value::Array(_)) => array,
            _ => serde_json::Value::Array(vec![json_element(&kind, raw)]),
        };
        return from_json_mapping(input, field, json);
    }

    match kind {
        Kind::Uint64 => parse_uint64(raw).map(Value::U64),
        Kind::String => Ok(Value::String(raw.to_string())),
        _ => from_json_mapping(input, field, json_element(&kind, raw)),
    }
}

/// Base-10 digits only. `str::parse` would also take a leading `+`.
fn parse_uint64(raw: &str) -> Result<u64, BoxError> {
    if raw.starts_with('+') {
        return Err(format!("unexpected sign in '{raw}'").into());
    }
    Ok(raw.parse::<u64>()?)
}

/// Decodes `json` as the value of `field` using the protobuf JSON mapping of `input`.
fn from_json_mapping(
    input: &MessageDescriptor,
    field: &FieldDescriptor,
    json: serde_json::Value,
) -> Result<Value, BoxError> {
    let mut object = serde_json::Map::new();
    object.insert(field.name().to_string(), json);

    let carrier = DynamicMessage::deserialize(input.clone(), serde_json::Value::Object(object))?;
    Ok(carrier.get_field(field).into_owned())
}

fn json_element(kind: &Kind, raw: &str) -> serde_json::Value {
    match kind {
        Kind::Bool | Kind::Message(_) => json_literal(raw).unwrap_or_else(|| json_string(raw)),
        _ => json_string(raw),
    }
}

fn json_literal(raw: &str) -> Option<serde_json::Value> {
    serde_json::from_str(raw).ok()
}

fn json_string(raw: &str) -> serde_json::Value {
    serde_json::Value::String(raw.to_string())
}
