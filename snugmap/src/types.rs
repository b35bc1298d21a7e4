use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{SchemaError, SchemaResult};
use crate::path::JsonPath;

/// Separator used to join `string[]` values and declared on TAG indexes by default.
pub const DEFAULT_SEPARATOR: char = '|';

/// Physical representation an entity is stored as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum DataStructure {
    /// Flat field/value map (`HSET`).
    #[serde(alias = "hash")]
    Hash,
    /// Nested document (`JSON.SET`).
    #[default]
    #[serde(alias = "json")]
    Json,
}

impl DataStructure {
    #[inline]
    pub const fn as_str(self) -> &'static str {
        match self {
            DataStructure::Hash => "HASH",
            DataStructure::Json => "JSON",
        }
    }
}

impl fmt::Display for DataStructure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Semantic type of a schema field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    /// Exact-match string, indexed as a TAG.
    String,
    /// Free text, indexed as TEXT.
    Text,
    Number,
    Boolean,
    /// Point in time, stored as epoch milliseconds.
    Date,
    /// Longitude/latitude pair, stored as `"lon,lat"`.
    Point,
    /// Ordered list of strings (`string[]`).
    StringArray,
}

impl FieldType {
    pub const ALL: [FieldType; 7] = [
        FieldType::String,
        FieldType::Text,
        FieldType::Number,
        FieldType::Boolean,
        FieldType::Date,
        FieldType::Point,
        FieldType::StringArray,
    ];

    #[inline]
    pub const fn as_str(self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Text => "text",
            FieldType::Number => "number",
            FieldType::Boolean => "boolean",
            FieldType::Date => "date",
            FieldType::Point => "point",
            FieldType::StringArray => "string[]",
        }
    }

    /// RediSearch field type this semantic type is indexed as.
    #[inline]
    pub const fn index_type(self) -> IndexFieldType {
        match self {
            FieldType::String | FieldType::StringArray | FieldType::Boolean => IndexFieldType::Tag,
            FieldType::Text => IndexFieldType::Text,
            FieldType::Number | FieldType::Date => IndexFieldType::Numeric,
            FieldType::Point => IndexFieldType::Geo,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldType {
    type Err = SchemaError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        FieldType::ALL
            .into_iter()
            .find(|candidate| candidate.as_str() == value)
            .ok_or_else(|| SchemaError::UnsupportedFieldType {
                field: String::new(),
                type_name: value.to_string(),
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexFieldType {
    Tag,
    Text,
    Numeric,
    Geo,
}

impl IndexFieldType {
    #[inline]
    pub const fn as_str(self) -> &'static str {
        match self {
            IndexFieldType::Tag => "TAG",
            IndexFieldType::Text => "TEXT",
            IndexFieldType::Numeric => "NUMERIC",
            IndexFieldType::Geo => "GEO",
        }
    }
}

/// Double Metaphone matcher used for phonetic TEXT search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PhoneticMatcher {
    #[serde(rename = "dm:en")]
    English,
    #[serde(rename = "dm:fr")]
    French,
    #[serde(rename = "dm:pt")]
    Portuguese,
    #[serde(rename = "dm:es")]
    Spanish,
}

impl PhoneticMatcher {
    #[inline]
    pub const fn as_str(self) -> &'static str {
        match self {
            PhoneticMatcher::English => "dm:en",
            PhoneticMatcher::French => "dm:fr",
            PhoneticMatcher::Portuguese => "dm:pt",
            PhoneticMatcher::Spanish => "dm:es",
        }
    }
}

/// Per-field storage and indexing options.
///
/// Not every option is meaningful for every type and representation; the index
/// compiler reports and ignores the ones that are not.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldOptions {
    pub sortable: bool,
    pub indexed: bool,
    pub case_sensitive: bool,
    pub separator: char,
    /// When false, sortable values keep their original form (`UNF`).
    pub normalized: bool,
    pub stemming: bool,
    pub weight: Option<f64>,
    pub matcher: Option<PhoneticMatcher>,
}

impl Default for FieldOptions {
    fn default() -> Self {
        Self {
            sortable: false,
            indexed: true,
            case_sensitive: false,
            separator: DEFAULT_SEPARATOR,
            normalized: true,
            stemming: true,
            weight: None,
            matcher: None,
        }
    }
}

/// Builder for a field, consumed by [`Schema::new`](crate::Schema::new).
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDefinition {
    name: String,
    field_type: FieldType,
    hash_field: Option<String>,
    json_path: Option<String>,
    options: FieldOptions,
}

impl FieldDefinition {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            hash_field: None,
            json_path: None,
            options: FieldOptions::default(),
        }
    }

    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::String)
    }

    pub fn text(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Text)
    }

    pub fn number(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Number)
    }

    pub fn boolean(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Boolean)
    }

    pub fn date(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Date)
    }

    pub fn point(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Point)
    }

    pub fn string_array(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::StringArray)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Store the field under a different Hash member name.
    pub fn with_hash_field(mut self, hash_field: impl Into<String>) -> Self {
        self.hash_field = Some(hash_field.into());
        self
    }

    /// Store the field at a JSON path instead of `$.name`.
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.json_path = Some(path.into());
        self
    }

    pub fn with_options(mut self, options: FieldOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_sortable(mut self, sortable: bool) -> Self {
        self.options.sortable = sortable;
        self
    }

    pub fn with_indexed(mut self, indexed: bool) -> Self {
        self.options.indexed = indexed;
        self
    }

    pub fn with_case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.options.case_sensitive = case_sensitive;
        self
    }

    pub fn with_separator(mut self, separator: char) -> Self {
        self.options.separator = separator;
        self
    }

    pub fn with_normalized(mut self, normalized: bool) -> Self {
        self.options.normalized = normalized;
        self
    }

    pub fn with_stemming(mut self, stemming: bool) -> Self {
        self.options.stemming = stemming;
        self
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.options.weight = Some(weight);
        self
    }

    pub fn with_matcher(mut self, matcher: PhoneticMatcher) -> Self {
        self.options.matcher = Some(matcher);
        self
    }
}

/// Immutable description of one schema field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    name: String,
    field_type: FieldType,
    hash_field: String,
    json_path: JsonPath,
    options: FieldOptions,
}

impl FieldDescriptor {
    pub(crate) fn from_definition(definition: FieldDefinition) -> SchemaResult<Self> {
        let FieldDefinition {
            name,
            field_type,
            hash_field,
            json_path,
            options,
        } = definition;

        let json_path = match json_path {
            Some(raw) => JsonPath::parse(&raw).map_err(|err| SchemaError::InvalidPath {
                field: name.clone(),
                path: raw.clone(),
                reason: err.to_string(),
            })?,
            None => JsonPath::for_member(&name, field_type == FieldType::StringArray),
        };

        if json_path.has_inner_wildcard() {
            return Err(SchemaError::InvalidPath {
                field: name,
                path: json_path.as_str().to_string(),
                reason: "wildcards are only supported as the final segment".to_string(),
            });
        }
        if json_path.is_element_wise() && field_type != FieldType::StringArray {
            return Err(SchemaError::InvalidPath {
                field: name,
                path: json_path.as_str().to_string(),
                reason: format!("a {field_type} field cannot use an element-wise path"),
            });
        }

        Ok(Self {
            hash_field: hash_field.unwrap_or_else(|| name.clone()),
            name,
            field_type,
            json_path,
            options,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn field_type(&self) -> FieldType {
        self.field_type
    }

    /// Member name used in the Hash representation.
    pub fn hash_field(&self) -> &str {
        &self.hash_field
    }

    pub fn json_path(&self) -> &JsonPath {
        &self.json_path
    }

    pub fn options(&self) -> &FieldOptions {
        &self.options
    }

    pub fn separator(&self) -> char {
        self.options.separator
    }

    /// Storage locator for the given representation.
    pub fn storage_path(&self, data_structure: DataStructure) -> &str {
        match data_structure {
            DataStructure::Hash => &self.hash_field,
            DataStructure::Json => self.json_path.as_str(),
        }
    }
}
