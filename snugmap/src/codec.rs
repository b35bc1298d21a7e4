//! Representation dispatch shared by the Hash and JSON codecs.

use serde_json::{Map, Value};

use crate::entity::EntityData;
use crate::errors::CodecResult;
use crate::hash::{self, HashPayload};
use crate::json;
use crate::schema::Schema;
use crate::types::DataStructure;

/// Result of encoding an entity.
///
/// `Empty` means every field was absent or null. The store layer must then delete the
/// key instead of writing an empty payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Encoded<P> {
    Populated(P),
    Empty,
}

impl<P> Encoded<P> {
    #[inline]
    pub fn is_empty(&self) -> bool {
        matches!(self, Encoded::Empty)
    }

    pub fn payload(&self) -> Option<&P> {
        match self {
            Encoded::Populated(payload) => Some(payload),
            Encoded::Empty => None,
        }
    }

    pub fn into_payload(self) -> Option<P> {
        match self {
            Encoded::Populated(payload) => Some(payload),
            Encoded::Empty => None,
        }
    }

    pub fn map<Q, F: FnOnce(P) -> Q>(self, f: F) -> Encoded<Q> {
        match self {
            Encoded::Populated(payload) => Encoded::Populated(f(payload)),
            Encoded::Empty => Encoded::Empty,
        }
    }
}

impl Encoded<HashPayload> {
    pub(crate) fn from_hash(payload: HashPayload) -> Self {
        if payload.is_empty() {
            Encoded::Empty
        } else {
            Encoded::Populated(payload)
        }
    }
}

impl Encoded<Value> {
    pub(crate) fn from_document(document: Map<String, Value>) -> Self {
        if document.is_empty() {
            Encoded::Empty
        } else {
            Encoded::Populated(Value::Object(document))
        }
    }
}

/// A stored payload in either representation.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Hash(HashPayload),
    Json(Value),
}

impl Payload {
    pub fn data_structure(&self) -> DataStructure {
        match self {
            Payload::Hash(_) => DataStructure::Hash,
            Payload::Json(_) => DataStructure::Json,
        }
    }
}

impl Schema {
    /// Encode `data` with the codec matching this schema's representation.
    pub fn encode(&self, data: &EntityData) -> CodecResult<Encoded<Payload>> {
        match self.data_structure() {
            DataStructure::Hash => Ok(hash::to_hash(self, data)?.map(Payload::Hash)),
            DataStructure::Json => Ok(json::to_json(self, data)?.map(Payload::Json)),
        }
    }

    /// Decode a stored payload with the codec matching its representation.
    pub fn decode(&self, payload: &Payload) -> CodecResult<EntityData> {
        match payload {
            Payload::Hash(fields) => hash::from_hash(self, fields),
            Payload::Json(document) => json::from_json(self, document),
        }
    }
}

#[inline]
pub(crate) fn encode_bool(flag: bool) -> &'static str {
    if flag { "1" } else { "0" }
}

pub(crate) fn join_strings(values: &[String], separator: char) -> String {
    let mut buffer = [0u8; 4];
    values.join(&*separator.encode_utf8(&mut buffer))
}
