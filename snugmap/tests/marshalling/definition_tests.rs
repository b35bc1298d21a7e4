use std::io::Write;

use crate::support::*;

const BIGFOOT_TOML: &str = r#"
entity = "Bigfoot"
data_structure = "HASH"

[[fields]]
name = "title"
type = "text"

[[fields]]
name = "county"
type = "string"

[[fields]]
name = "state"
type = "string"

[[fields]]
name = "eyewitness"
type = "boolean"

[[fields]]
name = "temperature"
type = "number"

[[fields]]
name = "tags"
type = "string[]"

[[fields]]
name = "moreTags"
type = "string[]"
separator = "&"
"#;

fn write_definition(suffix: &str, contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn toml_definitions_match_code_definitions() {
    let file = write_definition(".toml", BIGFOOT_TOML);
    let loaded = Schema::from_path(file.path()).unwrap();
    let built = bigfoot_schema(DataStructure::Hash);

    assert_eq!(loaded.fields(), built.fields());
    assert_eq!(loaded.index_definition(), built.index_definition());
    assert_eq!(
        populated(loaded.encode(&a_bigfoot_sighting()).unwrap()),
        Payload::Hash(a_bigfoot_hash())
    );
}

#[test]
fn json_definitions_are_read_by_extension() {
    let file = write_definition(
        ".json",
        r#"{
            "entity": "Bigfoot",
            "prefix": "sightings",
            "stop_words": ["the", "a"],
            "fields": [
                { "name": "county", "type": "string", "path": "$.location.county", "sortable": true },
                { "name": "seen", "type": "date", "indexed": false }
            ]
        }"#,
    );
    let schema = Schema::from_path(file.path()).unwrap();

    assert_eq!(schema.data_structure(), DataStructure::Json);
    assert_eq!(schema.prefix(), "sightings");
    assert_eq!(schema.stop_words(), &StopWords::Custom(vec!["the".into(), "a".into()]));
    assert_eq!(schema.field("county").unwrap().json_path().as_str(), "$.location.county");
    assert_eq!(schema.field("seen").unwrap().field_type(), FieldType::Date);
    assert!(!schema.field("seen").unwrap().options().indexed);

    let definition = schema.index_definition();
    assert_eq!(definition.warnings.len(), 1);
}

#[test]
fn other_extensions_are_rejected() {
    let file = write_definition(".yaml", "entity: Bigfoot");
    let err = Schema::from_path(file.path()).unwrap_err();
    assert!(matches!(err, SchemaError::Definition { .. }));
}

#[test]
fn missing_files_are_definition_errors() {
    let dir = tempfile::tempdir().unwrap();
    let err = Schema::from_path(dir.path().join("missing.toml")).unwrap_err();
    assert!(matches!(err, SchemaError::Definition { ref message } if message.contains("missing.toml")));
}

#[test]
fn duplicate_and_unknown_fields_fail_construction() {
    let err = Schema::from_toml_str(
        r#"
entity = "Bigfoot"
[[fields]]
name = "state"
type = "string"
[[fields]]
name = "state"
type = "text"
"#,
    )
    .unwrap_err();
    assert_eq!(err, SchemaError::DuplicateField { name: "state".into() });

    let err = Schema::from_toml_str(
        r#"
entity = "Bigfoot"
[[fields]]
name = "sightedAt"
type = "datetime"
"#,
    )
    .unwrap_err();
    assert!(matches!(err, SchemaError::UnsupportedFieldType { ref field, ref type_name }
        if field == "sightedAt" && type_name == "datetime"));
}

#[test]
fn keys_and_ids_follow_the_prefix() {
    let schema = bigfoot_schema(DataStructure::Json);
    assert_eq!(schema.entity_key(AN_ENTITY_ID), format!("Bigfoot:{AN_ENTITY_ID}"));
    assert_eq!(schema.key_context().entity_id(&schema.entity_key("42")), Some("42"));

    let id = schema.generate_id();
    assert!(!id.is_empty());
    assert_ne!(id, schema.generate_id());
}
