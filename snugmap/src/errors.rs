use thiserror::Error;

use crate::types::FieldType;

/// Error raised while converting a single field between entity data and a stored payload.
///
/// A codec error aborts only the conversion in progress. Callers decide whether to
/// drop the whole entity or substitute a default.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CodecError {
    /// A raw stored value could not be parsed as the field's declared type.
    #[error("malformed value for {expected} field '{field}': {value:?}")]
    MalformedFieldValue {
        field: String,
        expected: FieldType,
        value: String,
    },

    /// The value's kind is incompatible with the field's declared type.
    #[error("expected a {expected} for field '{field}' but received: {received}")]
    TypeMismatch {
        field: String,
        expected: FieldType,
        received: String,
    },

    /// A `string[]` field met a null element.
    #[error("expected a string[] for field '{field}' but received an array or object containing null: {received}")]
    UnexpectedNullInArray { field: String, received: String },

    /// Writing the field's value would have to traverse a non-container value.
    #[error("cannot write field '{field}' at {path}: {reason}")]
    PathConflict {
        field: String,
        path: String,
        reason: String,
    },
}

impl CodecError {
    pub(crate) fn malformed(field: &str, expected: FieldType, value: impl Into<String>) -> Self {
        Self::MalformedFieldValue {
            field: field.to_string(),
            expected,
            value: value.into(),
        }
    }

    pub(crate) fn mismatch(field: &str, expected: FieldType, received: impl Into<String>) -> Self {
        Self::TypeMismatch {
            field: field.to_string(),
            expected,
            received: received.into(),
        }
    }

    /// Name of the field whose conversion failed.
    pub fn field(&self) -> &str {
        match self {
            CodecError::MalformedFieldValue { field, .. }
            | CodecError::TypeMismatch { field, .. }
            | CodecError::UnexpectedNullInArray { field, .. }
            | CodecError::PathConflict { field, .. } => field,
        }
    }
}

/// Configuration error raised while constructing a [`Schema`](crate::Schema).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SchemaError {
    /// The declared semantic type is not one the codecs understand.
    #[error("field '{field}' has unsupported type '{type_name}'")]
    UnsupportedFieldType { field: String, type_name: String },

    /// Two fields share a name.
    #[error("field '{name}' is declared more than once")]
    DuplicateField { name: String },

    /// A JSON path could not be parsed or cannot be used for the field's type.
    #[error("invalid path {path:?} for field '{field}': {reason}")]
    InvalidPath {
        field: String,
        path: String,
        reason: String,
    },

    #[error("entity name must not be empty")]
    EmptyEntityName,

    /// A schema definition file could not be read or parsed.
    #[error("invalid schema definition: {message}")]
    Definition { message: String },
}

pub type CodecResult<T> = Result<T, CodecError>;
pub type SchemaResult<T> = Result<T, SchemaError>;
