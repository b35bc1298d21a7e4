use std::collections::HashMap;

use crate::errors::{SchemaError, SchemaResult};
use crate::keys::{KeyContext, generate_entity_id};
use crate::types::{DataStructure, FieldDefinition, FieldDescriptor};

/// Stop-word handling declared on the search index.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StopWords {
    /// Use RediSearch's built-in list (no `STOPWORDS` clause).
    #[default]
    Default,
    /// Disable stop words (`STOPWORDS 0`).
    Off,
    /// Replace the built-in list.
    Custom(Vec<String>),
}

/// Optional settings for a [`Schema`]. Unset names derive from the entity name.
#[derive(Debug, Clone, Default)]
pub struct SchemaOptions {
    pub data_structure: DataStructure,
    /// Key prefix; defaults to the entity name.
    pub prefix: Option<String>,
    /// Defaults to `<entity>:index`.
    pub index_name: Option<String>,
    /// Key holding the fingerprint of the current index; defaults to `<entity>:index:hash`.
    pub index_hash_name: Option<String>,
    pub stop_words: StopWords,
    pub id_strategy: Option<fn() -> String>,
}

impl SchemaOptions {
    pub fn hash() -> Self {
        Self {
            data_structure: DataStructure::Hash,
            ..Self::default()
        }
    }

    pub fn json() -> Self {
        Self {
            data_structure: DataStructure::Json,
            ..Self::default()
        }
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    pub fn with_index_name(mut self, index_name: impl Into<String>) -> Self {
        self.index_name = Some(index_name.into());
        self
    }

    pub fn with_index_hash_name(mut self, index_hash_name: impl Into<String>) -> Self {
        self.index_hash_name = Some(index_hash_name.into());
        self
    }

    pub fn with_stop_words(mut self, stop_words: StopWords) -> Self {
        self.stop_words = stop_words;
        self
    }

    pub fn with_id_strategy(mut self, id_strategy: fn() -> String) -> Self {
        self.id_strategy = Some(id_strategy);
        self
    }
}

/// Ordered set of field descriptors for one entity type plus its storage settings.
///
/// A schema is immutable once built and is shared read-only between codec calls.
#[derive(Debug, Clone)]
pub struct Schema {
    entity_name: String,
    data_structure: DataStructure,
    prefix: String,
    index_name: String,
    index_hash_name: String,
    stop_words: StopWords,
    id_strategy: fn() -> String,
    fields: Vec<FieldDescriptor>,
    by_name: HashMap<String, usize>,
}

impl Schema {
    pub fn new<I>(entity_name: impl Into<String>, fields: I, options: SchemaOptions) -> SchemaResult<Self>
    where
        I: IntoIterator<Item = FieldDefinition>,
    {
        let entity_name = entity_name.into();
        if entity_name.trim().is_empty() {
            return Err(SchemaError::EmptyEntityName);
        }

        let mut descriptors = Vec::new();
        let mut by_name = HashMap::new();
        for definition in fields {
            if by_name.contains_key(definition.name()) {
                return Err(SchemaError::DuplicateField {
                    name: definition.name().to_string(),
                });
            }
            let descriptor = FieldDescriptor::from_definition(definition)?;
            by_name.insert(descriptor.name().to_string(), descriptors.len());
            descriptors.push(descriptor);
        }

        let SchemaOptions {
            data_structure,
            prefix,
            index_name,
            index_hash_name,
            stop_words,
            id_strategy,
        } = options;

        Ok(Self {
            prefix: prefix.unwrap_or_else(|| entity_name.clone()),
            index_name: index_name.unwrap_or_else(|| format!("{entity_name}:index")),
            index_hash_name: index_hash_name.unwrap_or_else(|| format!("{entity_name}:index:hash")),
            entity_name,
            data_structure,
            stop_words,
            id_strategy: id_strategy.unwrap_or(generate_entity_id),
            fields: descriptors,
            by_name,
        })
    }

    pub fn entity_name(&self) -> &str {
        &self.entity_name
    }

    pub fn data_structure(&self) -> DataStructure {
        self.data_structure
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn index_name(&self) -> &str {
        &self.index_name
    }

    pub fn index_hash_name(&self) -> &str {
        &self.index_hash_name
    }

    pub fn stop_words(&self) -> &StopWords {
        &self.stop_words
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.by_name.get(name).map(|&index| &self.fields[index])
    }

    pub fn key_context(&self) -> KeyContext<'_> {
        KeyContext::new(&self.prefix)
    }

    pub fn entity_key(&self, entity_id: &str) -> String {
        self.key_context().entity(entity_id)
    }

    pub fn generate_id(&self) -> String {
        (self.id_strategy)()
    }

    /// True when a Hash member is owned by a schema field.
    pub(crate) fn owns_hash_member(&self, member: &str) -> bool {
        self.fields.iter().any(|field| field.hash_field() == member)
    }

    /// True when a top-level document member is named like a field or is the root of a field path.
    pub(crate) fn owns_document_member(&self, member: &str) -> bool {
        self.by_name.contains_key(member)
            || self
                .fields
                .iter()
                .any(|field| field.json_path().root_key() == Some(member))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn schema_is_shareable_across_threads() {
        assert_send_sync::<Schema>();
    }

    #[test]
    fn derives_names_from_the_entity() {
        let schema = Schema::new("Bigfoot", [FieldDefinition::string("title")], SchemaOptions::hash()).unwrap();
        assert_eq!(schema.prefix(), "Bigfoot");
        assert_eq!(schema.index_name(), "Bigfoot:index");
        assert_eq!(schema.index_hash_name(), "Bigfoot:index:hash");
        assert_eq!(schema.entity_key("42"), "Bigfoot:42");
        assert_eq!(schema.data_structure(), DataStructure::Hash);
        assert_eq!(SchemaOptions::default().data_structure, DataStructure::Json);
    }

    #[test]
    fn honours_explicit_names_and_id_strategy() {
        fn fixed_id() -> String {
            "fixed".to_string()
        }
        let options = SchemaOptions::json()
            .with_prefix("sightings")
            .with_index_name("sightings-idx")
            .with_index_hash_name("sightings-idx:hash")
            .with_id_strategy(fixed_id);
        let schema = Schema::new("Bigfoot", [FieldDefinition::string("title")], options).unwrap();
        assert_eq!(schema.entity_key(&schema.generate_id()), "sightings:fixed");
        assert_eq!(schema.index_name(), "sightings-idx");
        assert_eq!(schema.index_hash_name(), "sightings-idx:hash");
    }

    #[test]
    fn preserves_declaration_order() {
        let schema = Schema::new(
            "Ordered",
            [
                FieldDefinition::number("z"),
                FieldDefinition::string("a"),
                FieldDefinition::point("m"),
            ],
            SchemaOptions::default(),
        )
        .unwrap();
        let names: Vec<&str> = schema.fields().iter().map(|field| field.name()).collect();
        assert_eq!(names, ["z", "a", "m"]);
        assert_eq!(schema.field("a").map(|field| field.name()), Some("a"));
    }

    #[test]
    fn rejects_duplicates_and_blank_entity_names() {
        let err = Schema::new(
            "Dup",
            [FieldDefinition::string("a"), FieldDefinition::number("a")],
            SchemaOptions::default(),
        )
        .unwrap_err();
        assert_eq!(err, SchemaError::DuplicateField { name: "a".to_string() });

        let err = Schema::new("  ", Vec::<FieldDefinition>::new(), SchemaOptions::default()).unwrap_err();
        assert_eq!(err, SchemaError::EmptyEntityName);
    }

    #[test]
    fn tracks_storage_ownership() {
        let schema = Schema::new(
            "Owner",
            [
                FieldDefinition::string("name").with_hash_field("n"),
                FieldDefinition::number("age").with_path("$.person.age"),
            ],
            SchemaOptions::default(),
        )
        .unwrap();
        assert!(schema.owns_hash_member("n"));
        assert!(!schema.owns_hash_member("name"));
        assert!(schema.owns_document_member("person"));
        assert!(schema.owns_document_member("age"));
        assert!(!schema.owns_document_member("other"));
    }
}
