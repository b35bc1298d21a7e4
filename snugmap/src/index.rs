//! # RediSearch index compilation
//!
//! Turns a [`Schema`] into the `SCHEMA` arguments of `FT.CREATE`. Each field
//! contributes one token group, in declaration order:
//!
//! | Type               | HASH                                              | JSON                                  |
//! |--------------------|---------------------------------------------------|---------------------------------------|
//! | `string`, `string[]` | `TAG [CASESENSITIVE] SEPARATOR <sep> [SORTABLE [UNF]]` | `TAG [CASESENSITIVE] SEPARATOR <sep>` |
//! | `boolean`          | `TAG [SORTABLE]`                                  | `TAG`                                 |
//! | `number`, `date`   | `NUMERIC [SORTABLE]`                              | `NUMERIC [SORTABLE]`                  |
//! | `point`            | `GEO`                                             | `GEO`                                 |
//! | `text`             | `TEXT [NOSTEM] [WEIGHT w] [PHONETIC m] [SORTABLE [UNF]]` | same                           |
//!
//! Every group starts with `<locator> AS <name>` and ends with `NOINDEX` when the field
//! is not indexed. Options that make no sense for a type or representation never fail
//! compilation; they are dropped and described in [`IndexCompilation::warnings`].

use sha2::{Digest, Sha256};

use crate::schema::{Schema, StopWords};
use crate::types::{DataStructure, FieldDescriptor, FieldOptions, FieldType};

/// Ordered `SCHEMA` arguments plus the warnings for options that were ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexCompilation {
    pub arguments: Vec<String>,
    pub warnings: Vec<String>,
}

impl IndexCompilation {
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Forward every warning to the `log` facade.
    pub fn log_warnings(&self) {
        for warning in &self.warnings {
            log::warn!("{warning}");
        }
    }
}

/// Compile the `SCHEMA` arguments for every field of `schema`.
pub fn compile_schema(schema: &Schema) -> IndexCompilation {
    let mut compilation = IndexCompilation::default();
    for field in schema.fields() {
        let IndexCompilation { arguments, warnings } = compile_field(field, schema.data_structure());
        compilation.arguments.extend(arguments);
        compilation.warnings.extend(warnings);
    }
    compilation
}

/// Token group for a single field.
pub fn compile_field(field: &FieldDescriptor, data_structure: DataStructure) -> IndexCompilation {
    let field_type = field.field_type();
    let options = field.options();
    let mut arguments = Vec::new();
    let mut warnings = Vec::new();

    arguments.push(field.storage_path(data_structure).to_string());
    arguments.push("AS".to_string());
    arguments.push(field.name().to_string());
    arguments.push(field_type.index_type().as_str().to_string());

    match field_type {
        FieldType::String | FieldType::StringArray => {
            if options.case_sensitive {
                arguments.push("CASESENSITIVE".to_string());
            }
            arguments.push("SEPARATOR".to_string());
            arguments.push(options.separator.to_string());
            if options.sortable {
                match data_structure {
                    DataStructure::Hash => push_sortable(&mut arguments, options),
                    DataStructure::Json => warnings.push(sortable_tag_on_json(field_type)),
                }
            }
        }
        FieldType::Boolean => {
            if options.sortable {
                match data_structure {
                    DataStructure::Hash => arguments.push("SORTABLE".to_string()),
                    DataStructure::Json => warnings.push(sortable_tag_on_json(field_type)),
                }
            }
        }
        FieldType::Number | FieldType::Date => {
            if options.sortable {
                arguments.push("SORTABLE".to_string());
            }
        }
        FieldType::Point => {
            if options.sortable {
                warnings.push(
                    "You have marked a point field as sortable but RediSearch doesn't support the SORTABLE argument on a GEO. Ignored."
                        .to_string(),
                );
            }
        }
        FieldType::Text => {
            if !options.stemming {
                arguments.push("NOSTEM".to_string());
            }
            if let Some(weight) = options.weight {
                arguments.push("WEIGHT".to_string());
                arguments.push(weight.to_string());
            }
            if let Some(matcher) = options.matcher {
                arguments.push("PHONETIC".to_string());
                arguments.push(matcher.as_str().to_string());
            }
            if options.sortable {
                push_sortable(&mut arguments, options);
            }
        }
    }

    warnings.extend(ignored_options(field_type, options));

    if !options.indexed {
        arguments.push("NOINDEX".to_string());
    }

    IndexCompilation { arguments, warnings }
}

fn push_sortable(arguments: &mut Vec<String>, options: &FieldOptions) {
    arguments.push("SORTABLE".to_string());
    if !options.normalized {
        arguments.push("UNF".to_string());
    }
}

fn sortable_tag_on_json(field_type: FieldType) -> String {
    format!(
        "You have marked a {field_type} field as sortable but RediSearch doesn't support the SORTABLE argument on a TAG for JSON. Ignored."
    )
}

/// Options set on a type that has no use for them.
fn ignored_options(field_type: FieldType, options: &FieldOptions) -> Vec<String> {
    let mut warnings = Vec::new();
    if options.case_sensitive && !matches!(field_type, FieldType::String | FieldType::StringArray) {
        warnings.push(format!(
            "You have marked a {field_type} field as case sensitive but only string and string[] fields support CASESENSITIVE. Ignored."
        ));
    }
    if field_type != FieldType::Text {
        if options.weight.is_some() {
            warnings.push(format!(
                "You have given a {field_type} field a weight but only text fields support WEIGHT. Ignored."
            ));
        }
        if options.matcher.is_some() {
            warnings.push(format!(
                "You have given a {field_type} field a phonetic matcher but only text fields support PHONETIC. Ignored."
            ));
        }
        if !options.stemming {
            warnings.push(format!(
                "You have given a {field_type} field disabled stemming but only text fields support NOSTEM. Ignored."
            ));
        }
    }
    warnings
}

/// Everything needed to create, or decide to rebuild, the index for a schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexDefinition {
    pub name: String,
    /// Key storing the fingerprint of the index currently deployed.
    pub hash_name: String,
    pub data_structure: DataStructure,
    pub prefixes: Vec<String>,
    pub stop_words: StopWords,
    pub schema: Vec<String>,
    pub warnings: Vec<String>,
}

impl IndexDefinition {
    pub fn from_schema(schema: &Schema) -> Self {
        let IndexCompilation { arguments, warnings } = compile_schema(schema);
        Self {
            name: schema.index_name().to_string(),
            hash_name: schema.index_hash_name().to_string(),
            data_structure: schema.data_structure(),
            prefixes: vec![schema.key_context().index_prefix()],
            stop_words: schema.stop_words().clone(),
            schema: arguments,
            warnings,
        }
    }

    /// Arguments following `FT.CREATE`.
    pub fn arguments(&self) -> Vec<String> {
        let mut arguments = vec![
            self.name.clone(),
            "ON".to_string(),
            self.data_structure.as_str().to_string(),
            "PREFIX".to_string(),
            self.prefixes.len().to_string(),
        ];
        arguments.extend(self.prefixes.iter().cloned());

        match &self.stop_words {
            StopWords::Default => {}
            StopWords::Off => {
                arguments.push("STOPWORDS".to_string());
                arguments.push("0".to_string());
            }
            StopWords::Custom(words) => {
                arguments.push("STOPWORDS".to_string());
                arguments.push(words.len().to_string());
                arguments.extend(words.iter().cloned());
            }
        }

        arguments.push("SCHEMA".to_string());
        arguments.extend(self.schema.iter().cloned());
        arguments
    }

    pub fn create_command(&self) -> redis::Cmd {
        crate::commands::create_index_command(self)
    }

    /// SHA-256 of the creation arguments, hex encoded.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        for argument in self.arguments() {
            hasher.update(argument.as_bytes());
            hasher.update([0u8]);
        }
        format!("{:x}", hasher.finalize())
    }

    /// True when the deployed index (identified by its stored fingerprint) no longer
    /// matches this definition.
    pub fn needs_rebuild(&self, stored_fingerprint: Option<&str>) -> bool {
        stored_fingerprint != Some(self.fingerprint().as_str())
    }

    pub fn log_warnings(&self) {
        for warning in &self.warnings {
            log::warn!("{warning}");
        }
    }
}

impl Schema {
    pub fn index_definition(&self) -> IndexDefinition {
        IndexDefinition::from_schema(self)
    }
}
