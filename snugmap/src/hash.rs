//! Hash codec: entity data to and from a flat string map.
//!
//! Every stored value is a string. Booleans are `"1"`/`"0"`, dates are epoch
//! milliseconds, points are `"lon,lat"` and string lists are joined with the field's
//! separator. The separator is not escaped inside elements, so a list element that
//! contains it comes back split.

use std::collections::BTreeMap;

use chrono::DateTime;

use crate::codec::{Encoded, encode_bool, join_strings};
use crate::entity::{EntityData, EntityValue, Point};
use crate::errors::{CodecError, CodecResult};
use crate::schema::Schema;
use crate::types::{DEFAULT_SEPARATOR, FieldDescriptor, FieldType};

/// Member name to stored string, as written with `HSET`.
pub type HashPayload = BTreeMap<String, String>;

/// Encode `data` as a Hash payload.
///
/// Absent and null fields are omitted. Fields the schema does not declare pass through
/// with the encoding their value kind implies.
pub fn to_hash(schema: &Schema, data: &EntityData) -> CodecResult<Encoded<HashPayload>> {
    let mut payload = HashPayload::new();

    for field in schema.fields() {
        let Some(value) = data.get(field.name()) else {
            continue;
        };
        payload.insert(field.hash_field().to_string(), encode_field(field, value)?);
    }

    for (name, value) in data.iter() {
        if schema.field(name).is_some() || schema.owns_hash_member(name) {
            continue;
        }
        if let Some(value) = value {
            payload.insert(name.to_string(), encode_unknown(name, value)?);
        }
    }

    Ok(Encoded::from_hash(payload))
}

/// Decode a Hash payload into entity data.
///
/// Members the schema does not declare are carried over as strings.
pub fn from_hash(schema: &Schema, payload: &HashPayload) -> CodecResult<EntityData> {
    let mut data = EntityData::new();

    for field in schema.fields() {
        if let Some(raw) = payload.get(field.hash_field()) {
            data.set(field.name(), decode_field(field, raw)?);
        }
    }

    for (member, raw) in payload {
        if schema.field(member).is_some() || schema.owns_hash_member(member) {
            continue;
        }
        data.set(member.as_str(), raw.as_str());
    }

    Ok(data)
}

fn encode_field(field: &FieldDescriptor, value: &EntityValue) -> CodecResult<String> {
    let encoded = match (field.field_type(), value) {
        (FieldType::Boolean, EntityValue::Boolean(flag)) => encode_bool(*flag).to_string(),
        (FieldType::Number, EntityValue::Number(number)) => finite_number(field.name(), *number)?,
        (FieldType::Date, EntityValue::Date(date)) => date.timestamp_millis().to_string(),
        (FieldType::Point, EntityValue::Point(point)) => point.to_string(),
        (FieldType::String | FieldType::Text, EntityValue::String(text)) => text.clone(),
        (FieldType::String | FieldType::Text, EntityValue::Number(number)) => number.to_string(),
        (FieldType::String | FieldType::Text, EntityValue::Boolean(flag)) => flag.to_string(),
        (FieldType::StringArray, EntityValue::Strings(values)) => join_strings(values, field.separator()),
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

fn encode_unknown(name: &str, value: &EntityValue) -> CodecResult<String> {
    let encoded = match value {
        EntityValue::String(text) => text.clone(),
        EntityValue::Number(number) => finite_number(name, *number)?,
        EntityValue::Boolean(flag) => encode_bool(*flag).to_string(),
        EntityValue::Date(date) => date.timestamp_millis().to_string(),
        EntityValue::Point(point) => point.to_string(),
        EntityValue::Strings(values) => join_strings(values, DEFAULT_SEPARATOR),
    };
    Ok(encoded)
}

/// `NaN` and the infinities would be written as text RediSearch cannot index.
fn finite_number(field: &str, number: f64) -> CodecResult<String> {
    if number.is_finite() {
        Ok(number.to_string())
    } else {
        Err(CodecError::malformed(field, FieldType::Number, number.to_string()))
    }
}

fn decode_field(field: &FieldDescriptor, raw: &str) -> CodecResult<EntityValue> {
    let field_type = field.field_type();
    let malformed = || CodecError::malformed(field.name(), field_type, raw);

    let value = match field_type {
        FieldType::Boolean => match raw {
            "1" => EntityValue::Boolean(true),
            "0" => EntityValue::Boolean(false),
            _ => return Err(malformed()),
        },
        // `parse` also accepts "NaN", "inf" and "infinity".
        FieldType::Number => raw
            .parse::<f64>()
            .ok()
            .filter(|number| number.is_finite())
            .map(EntityValue::Number)
            .ok_or_else(malformed)?,
        FieldType::Date => raw
            .parse::<i64>()
            .ok()
            .and_then(DateTime::from_timestamp_millis)
            .map(EntityValue::Date)
            .ok_or_else(malformed)?,
        FieldType::Point => Point::parse(raw).map(EntityValue::Point).ok_or_else(malformed)?,
        FieldType::String | FieldType::Text => EntityValue::String(raw.to_string()),
        // An empty member splits into a single empty element, not an empty list.
        FieldType::StringArray => EntityValue::Strings(raw.split(field.separator()).map(str::to_string).collect()),
    };
    Ok(value)
}
