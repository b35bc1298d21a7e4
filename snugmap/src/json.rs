//! JSON codec: entity data to and from a nested document.
//!
//! Each field lives at its JSON path. Numbers and booleans keep their native JSON
//! types; dates are epoch milliseconds, points are `"lon,lat"` strings (the same form
//! the Hash codec uses) and string lists are real arrays.

use chrono::DateTime;
use serde_json::{Map, Number, Value};

use crate::codec::Encoded;
use crate::entity::{EntityData, EntityValue, Point};
use crate::errors::{CodecError, CodecResult};
use crate::path::Location;
use crate::schema::Schema;
use crate::types::{FieldDescriptor, FieldType};

/// Largest integer an `f64` holds exactly.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Encode `data` as a JSON document.
///
/// Intermediate objects and arrays along each field's path are created as needed.
/// Absent and null fields are omitted; fields the schema does not declare are written
/// at the top level under their own name.
pub fn to_json(schema: &Schema, data: &EntityData) -> CodecResult<Encoded<Value>> {
    let mut document = Value::Object(Map::new());

    for field in schema.fields() {
        let Some(value) = data.get(field.name()) else {
            continue;
        };
        let encoded = encode_field(field, value)?;
        field
            .json_path()
            .assign(&mut document, encoded)
            .map_err(|reason| CodecError::PathConflict {
                field: field.name().to_string(),
                path: field.json_path().to_string(),
                reason: reason.to_string(),
            })?;
    }

    let Value::Object(mut members) = document else {
        unreachable!("document root is always an object");
    };
    for (name, value) in data.iter() {
        if schema.owns_document_member(name) {
            continue;
        }
        if let Some(value) = value {
            members.insert(name.to_string(), encode_unknown(name, value)?);
        }
    }

    Ok(Encoded::from_document(members))
}

/// Decode a JSON document into entity data, leaving `document` untouched.
pub fn from_json(schema: &Schema, document: &Value) -> CodecResult<EntityData> {
    let mut working = document.clone();
    decode_document(schema, &mut working)
}

/// Decode a JSON document into entity data, rewriting every matched location in place
/// with its decoded form (list elements become strings, dates become RFC 3339 strings,
/// points become `{longitude, latitude}` objects).
pub fn decode_document(schema: &Schema, document: &mut Value) -> CodecResult<EntityData> {
    let mut data = EntityData::new();

    for field in schema.fields() {
        match resolve_field(field, document)? {
            Resolved::Absent => {}
            Resolved::Null => data.set_null(field.name()),
            Resolved::Value(value) => data.set(field.name(), value),
        }
    }

    if let Value::Object(members) = document {
        for (name, value) in members.iter() {
            if schema.owns_document_member(name) {
                continue;
            }
            match passthrough_value(value) {
                Resolved::Absent => {}
                Resolved::Null => data.set_null(name.as_str()),
                Resolved::Value(value) => data.set(name.as_str(), value),
            }
        }
    }

    Ok(data)
}

enum Resolved {
    Absent,
    Null,
    Value(EntityValue),
}

fn resolve_field(field: &FieldDescriptor, document: &mut Value) -> CodecResult<Resolved> {
    let path = field.json_path();
    let locations = path.resolve(document);

    if path.is_element_wise() {
        if locations.is_empty() {
            return resolve_empty_container(field, document);
        }
        return collect_elements(field, document, &locations).map(Resolved::Value);
    }

    match locations.as_slice() {
        [] => Ok(Resolved::Absent),
        [location] => decode_single(field, document, location),
        _ if field.field_type() == FieldType::StringArray => {
            collect_elements(field, document, &locations).map(Resolved::Value)
        }
        many => Err(CodecError::mismatch(
            field.name(),
            field.field_type(),
            format!("{} matches for {}", many.len(), path),
        )),
    }
}

/// An element-wise path with no matches still tells an empty list apart from a missing one.
fn resolve_empty_container(field: &FieldDescriptor, document: &Value) -> CodecResult<Resolved> {
    let Some(container) = field.json_path().container() else {
        return Ok(Resolved::Absent);
    };
    let resolved = match container.resolve(document).as_slice() {
        [location] => match location.get(document) {
            Some(Value::Array(items)) if items.is_empty() => Resolved::Value(EntityValue::Strings(Vec::new())),
            Some(Value::Null) => Resolved::Null,
            Some(scalar @ (Value::String(_) | Value::Number(_) | Value::Bool(_))) => {
                return Err(CodecError::mismatch(field.name(), field.field_type(), scalar.to_string()));
            }
            _ => Resolved::Absent,
        },
        _ => Resolved::Absent,
    };
    Ok(resolved)
}

fn decode_single(field: &FieldDescriptor, document: &mut Value, location: &Location) -> CodecResult<Resolved> {
    let value = match location.get(document) {
        None => return Ok(Resolved::Absent),
        Some(Value::Null) => return Ok(Resolved::Null),
        Some(raw) => decode_value(field, raw)?,
    };
    location.replace(document, decoded_form(&value));
    Ok(Resolved::Value(value))
}

fn collect_elements(field: &FieldDescriptor, document: &mut Value, locations: &[Location]) -> CodecResult<EntityValue> {
    let mut values = Vec::with_capacity(locations.len());
    for location in locations {
        let text = match location.get(document) {
            None => continue,
            Some(Value::Null) => {
                let received = location.parent(document).map(Value::to_string).unwrap_or_default();
                return Err(CodecError::UnexpectedNullInArray {
                    field: field.name().to_string(),
                    received,
                });
            }
            Some(raw) => stringify_element(field, raw)?,
        };
        location.replace(document, Value::String(text.clone()));
        values.push(text);
    }
    Ok(EntityValue::Strings(values))
}

fn decode_value(field: &FieldDescriptor, raw: &Value) -> CodecResult<EntityValue> {
    let field_type = field.field_type();
    let mismatch = || CodecError::mismatch(field.name(), field_type, raw.to_string());

    let value = match (field_type, raw) {
        (FieldType::Boolean, Value::Bool(flag)) => EntityValue::Boolean(*flag),
        (FieldType::Number, Value::Number(number)) => EntityValue::Number(number.as_f64().ok_or_else(mismatch)?),
        (FieldType::Date, Value::Number(number)) => {
            let millis = number.as_f64().ok_or_else(mismatch)?;
            DateTime::from_timestamp_millis(millis as i64)
                .map(EntityValue::Date)
                .ok_or_else(|| CodecError::malformed(field.name(), field_type, raw.to_string()))?
        }
        (FieldType::Point, Value::String(text)) => Point::parse(text).map(EntityValue::Point).ok_or_else(mismatch)?,
        (FieldType::String | FieldType::Text, Value::String(text)) => EntityValue::String(text.clone()),
        (FieldType::String | FieldType::Text, Value::Bool(flag)) => EntityValue::String(flag.to_string()),
        (FieldType::String | FieldType::Text, Value::Number(number)) => EntityValue::String(number.to_string()),
        (FieldType::StringArray, Value::Array(items)) => {
            let mut values = Vec::with_capacity(items.len());
            for item in items {
                if item.is_null() {
                    return Err(CodecError::UnexpectedNullInArray {
                        field: field.name().to_string(),
                        received: raw.to_string(),
                    });
                }
                values.push(stringify_element(field, item)?);
            }
            EntityValue::Strings(values)
        }
        _ => return Err(mismatch()),
    };
    Ok(value)
}

fn stringify_element(field: &FieldDescriptor, raw: &Value) -> CodecResult<String> {
    match raw {
        Value::String(text) => Ok(text.clone()),
        Value::Bool(flag) => Ok(flag.to_string()),
        Value::Number(number) => Ok(number.to_string()),
        other => Err(CodecError::mismatch(field.name(), field.field_type(), other.to_string())),
    }
}

/// JSON form written back at a decoded location.
fn decoded_form(value: &EntityValue) -> Value {
    match value {
        EntityValue::String(text) => Value::String(text.clone()),
        EntityValue::Number(number) => Number::from_f64(*number).map(Value::Number).unwrap_or(Value::Null),
        EntityValue::Boolean(flag) => Value::Bool(*flag),
        EntityValue::Date(date) => Value::String(date.to_rfc3339()),
        EntityValue::Point(point) => serde_json::json!({
            "longitude": point.longitude,
            "latitude": point.latitude,
        }),
        EntityValue::Strings(values) => Value::Array(values.iter().cloned().map(Value::String).collect()),
    }
}

fn encode_field(field: &FieldDescriptor, value: &EntityValue) -> CodecResult<Value> {
    let encoded = match (field.field_type(), value) {
        (FieldType::Boolean, EntityValue::Boolean(flag)) => Value::Bool(*flag),
        (FieldType::Number, EntityValue::Number(number)) => number_value(field.name(), field.field_type(), *number)?,
        (FieldType::Date, EntityValue::Date(date)) => Value::from(date.timestamp_millis()),
        (FieldType::Point, EntityValue::Point(point)) => Value::String(point.to_string()),
        (FieldType::String | FieldType::Text, EntityValue::String(text)) => Value::String(text.clone()),
        (FieldType::String | FieldType::Text, EntityValue::Number(number)) => Value::String(number.to_string()),
        (FieldType::String | FieldType::Text, EntityValue::Boolean(flag)) => Value::String(flag.to_string()),
        (FieldType::StringArray, EntityValue::Strings(values)) => {
            Value::Array(values.iter().cloned().map(Value::String).collect())
        }
        (expected, other) => {
            return Err(CodecError::mismatch(
                field.name(),
                expected,
                format!("{} {other}", other.kind()),
            ));
        }
    };
    Ok(encoded)
}

fn encode_unknown(name: &str, value: &EntityValue) -> CodecResult<Value> {
    let encoded = match value {
        EntityValue::String(text) => Value::String(text.clone()),
        EntityValue::Number(number) => number_value(name, FieldType::Number, *number)?,
        EntityValue::Boolean(flag) => Value::Bool(*flag),
        EntityValue::Date(date) => Value::from(date.timestamp_millis()),
        EntityValue::Point(point) => Value::String(point.to_string()),
        EntityValue::Strings(values) => Value::Array(values.iter().cloned().map(Value::String).collect()),
    };
    Ok(encoded)
}

/// Integral values are written as JSON integers so `42` does not come back as `42.0`.
fn number_value(field: &str, field_type: FieldType, number: f64) -> CodecResult<Value> {
    if number.fract() == 0.0 && number.abs() <= MAX_SAFE_INTEGER {
        return Ok(Value::from(number as i64));
    }
    Number::from_f64(number)
        .map(Value::Number)
        .ok_or_else(|| CodecError::malformed(field, field_type, number.to_string()))
}

/// Top-level members outside the schema: scalars and lists of scalars are carried over.
fn passthrough_value(value: &Value) -> Resolved {
    match value {
        Value::Null => Resolved::Null,
        Value::String(text) => Resolved::Value(EntityValue::String(text.clone())),
        Value::Bool(flag) => Resolved::Value(EntityValue::Boolean(*flag)),
        Value::Number(number) => number
            .as_f64()
            .map(|number| Resolved::Value(EntityValue::Number(number)))
            .unwrap_or(Resolved::Absent),
        Value::Array(items) => {
            let strings: Option<Vec<String>> = items
                .iter()
                .map(|item| match item {
                    Value::String(text) => Some(text.clone()),
                    Value::Bool(flag) => Some(flag.to_string()),
                    Value::Number(number) => Some(number.to_string()),
                    _ => None,
                })
                .collect();
            strings
                .map(|strings| Resolved::Value(EntityValue::Strings(strings)))
                .unwrap_or(Resolved::Absent)
        }
        Value::Object(_) => Resolved::Absent,
    }
}
