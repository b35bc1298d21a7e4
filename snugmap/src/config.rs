//! Schema definition files.
//!
//! A schema can be declared in TOML or JSON instead of code:
//!
//! ```toml
//! entity = "Bigfoot"
//! data_structure = "HASH"
//! stop_words = ["the", "a"]
//!
//! [[fields]]
//! name = "title"
//! type = "text"
//! weight = 2.0
//!
//! [[fields]]
//! name = "tags"
//! type = "string[]"
//! separator = ";"
//! ```
//!
//! Fields keep the order they are listed in, which is also the order of the index
//! arguments.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{SchemaError, SchemaResult};
use crate::schema::{Schema, SchemaOptions, StopWords};
use crate::types::{DataStructure, FieldDefinition, FieldOptions, FieldType, PhoneticMatcher};

/// Top level of a schema definition file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SchemaDocument {
    pub entity: String,
    #[serde(default)]
    pub data_structure: DataStructure,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index_hash_name: Option<String>,
    /// Missing keeps the RediSearch defaults, an empty list disables stop words.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_words: Option<Vec<String>>,
    #[serde(default)]
    pub fields: Vec<FieldConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldConfig {
    pub name: String,
    /// Semantic type name, e.g. `string[]`.
    #[serde(rename = "type")]
    pub field_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash_field: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub sortable: bool,
    #[serde(default = "default_true", skip_serializing_if = "is_true")]
    pub indexed: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub case_sensitive: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub separator: Option<char>,
    #[serde(default = "default_true", skip_serializing_if = "is_true")]
    pub normalized: bool,
    #[serde(default = "default_true", skip_serializing_if = "is_true")]
    pub stemming: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matcher: Option<PhoneticMatcher>,
}

fn default_true() -> bool {
    true
}

fn is_true(value: &bool) -> bool {
    *value
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl FieldConfig {
    pub fn into_definition(self) -> SchemaResult<FieldDefinition> {
        let field_type = self.field_type.parse::<FieldType>().map_err(|_| SchemaError::UnsupportedFieldType {
            field: self.name.clone(),
            type_name: self.field_type.clone(),
        })?;

        let defaults = FieldOptions::default();
        let options = FieldOptions {
            sortable: self.sortable,
            indexed: self.indexed,
            case_sensitive: self.case_sensitive,
            separator: self.separator.unwrap_or(defaults.separator),
            normalized: self.normalized,
            stemming: self.stemming,
            weight: self.weight,
            matcher: self.matcher,
        };

        let mut definition = FieldDefinition::new(self.name, field_type).with_options(options);
        if let Some(hash_field) = self.hash_field {
            definition = definition.with_hash_field(hash_field);
        }
        if let Some(path) = self.path {
            definition = definition.with_path(path);
        }
        Ok(definition)
    }
}

impl SchemaDocument {
    pub fn into_schema(self) -> SchemaResult<Schema> {
        let stop_words = match self.stop_words {
            None => StopWords::Default,
            Some(words) if words.is_empty() => StopWords::Off,
            Some(words) => StopWords::Custom(words),
        };
        let options = SchemaOptions {
            data_structure: self.data_structure,
            prefix: self.prefix,
            index_name: self.index_name,
            index_hash_name: self.index_hash_name,
            stop_words,
            id_strategy: None,
        };
        let fields = self
            .fields
            .into_iter()
            .map(FieldConfig::into_definition)
            .collect::<SchemaResult<Vec<_>>>()?;
        Schema::new(self.entity, fields, options)
    }
}

impl Schema {
    pub fn from_toml_str(source: &str) -> SchemaResult<Self> {
        let document: SchemaDocument = toml::from_str(source).map_err(|err| SchemaError::Definition {
            message: err.to_string(),
        })?;
        document.into_schema()
    }

    pub fn from_json_str(source: &str) -> SchemaResult<Self> {
        let document: SchemaDocument = serde_json::from_str(source).map_err(|err| SchemaError::Definition {
            message: err.to_string(),
        })?;
        document.into_schema()
    }

    /// Load a definition file, choosing the format from the `.toml` or `.json` extension.
    pub fn from_path(path: impl AsRef<Path>) -> SchemaResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|err| SchemaError::Definition {
            message: format!("failed to read {}: {err}", path.display()),
        })?;
        match path.extension().and_then(|extension| extension.to_str()) {
            Some("toml") => Self::from_toml_str(&source),
            Some("json") => Self::from_json_str(&source),
            _ => Err(SchemaError::Definition {
                message: format!("{} is neither a .toml nor a .json file", path.display()),
            }),
        }
    }
}
