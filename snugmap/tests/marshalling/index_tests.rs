use crate::support::*;
use snugmap::{IndexDefinition, compile_schema};

fn compile_one(field: FieldDefinition, data_structure: DataStructure) -> (Vec<String>, Vec<String>) {
    let schema = Schema::new("TestEntity", [field], options(data_structure)).unwrap();
    let compiled = compile_schema(&schema);
    (compiled.arguments, compiled.warnings)
}

#[test]
fn json_string_fields() {
    let (arguments, warnings) = compile_one(FieldDefinition::string("aField"), DataStructure::Json);
    assert_eq!(arguments, ["$.aField", "AS", "aField", "TAG", "SEPARATOR", "|"]);
    assert!(warnings.is_empty());

    let (arguments, _) = compile_one(FieldDefinition::string("aField").with_case_sensitive(true), DataStructure::Json);
    assert_eq!(arguments, ["$.aField", "AS", "aField", "TAG", "CASESENSITIVE", "SEPARATOR", "|"]);

    let (arguments, _) = compile_one(FieldDefinition::string("aField").with_indexed(false), DataStructure::Json);
    assert_eq!(arguments, ["$.aField", "AS", "aField", "TAG", "SEPARATOR", "|", "NOINDEX"]);

    let (arguments, _) = compile_one(
        FieldDefinition::string("aField").with_path("$.foo.bar").with_separator(';'),
        DataStructure::Json,
    );
    assert_eq!(arguments, ["$.foo.bar", "AS", "aField", "TAG", "SEPARATOR", ";"]);
}

#[test]
fn sortable_json_tags_are_ignored_with_a_warning() {
    let (arguments, warnings) = compile_one(FieldDefinition::string("aField").with_sortable(true), DataStructure::Json);
    assert_eq!(arguments, ["$.aField", "AS", "aField", "TAG", "SEPARATOR", "|"]);
    assert_eq!(
        warnings,
        ["You have marked a string field as sortable but RediSearch doesn't support the SORTABLE argument on a TAG for JSON. Ignored."]
    );

    let (_, warnings) = compile_one(FieldDefinition::string_array("aField").with_sortable(true), DataStructure::Json);
    assert!(warnings[0].starts_with("You have marked a string[] field as sortable"));
}

#[test]
fn sortable_hash_tags_are_honoured() {
    let (arguments, warnings) = compile_one(FieldDefinition::string("aField").with_sortable(true), DataStructure::Hash);
    assert_eq!(arguments, ["aField", "AS", "aField", "TAG", "SEPARATOR", "|", "SORTABLE"]);
    assert!(warnings.is_empty());
}

#[test]
fn string_lists_index_their_elements() {
    let (arguments, _) = compile_one(FieldDefinition::string_array("aField"), DataStructure::Json);
    assert_eq!(arguments, ["$.aField[*]", "AS", "aField", "TAG", "SEPARATOR", "|"]);

    let (arguments, _) = compile_one(FieldDefinition::string_array("aField").with_hash_field("af"), DataStructure::Hash);
    assert_eq!(arguments, ["af", "AS", "aField", "TAG", "SEPARATOR", "|"]);
}

#[test]
fn schema_order_is_argument_order() {
    let schema = bigfoot_schema(DataStructure::Hash);
    let compiled = compile_schema(&schema);
    assert_eq!(
        compiled.arguments,
        [
            "title", "AS", "title", "TEXT",
            "county", "AS", "county", "TAG", "SEPARATOR", "|",
            "state", "AS", "state", "TAG", "SEPARATOR", "|",
            "eyewitness", "AS", "eyewitness", "TAG",
            "temperature", "AS", "temperature", "NUMERIC",
            "tags", "AS", "tags", "TAG", "SEPARATOR", "|",
            "moreTags", "AS", "moreTags", "TAG", "SEPARATOR", "&",
        ]
    );
    assert!(!compiled.has_warnings());
}

#[test]
fn definitions_describe_the_whole_index() {
    let schema = Schema::new(
        "Bigfoot",
        bigfoot_fields(),
        SchemaOptions::json()
            .with_prefix("sightings")
            .with_index_name("sightings-idx")
            .with_stop_words(StopWords::Off),
    )
    .unwrap();
    let definition = IndexDefinition::from_schema(&schema);
    let arguments = definition.arguments();

    assert_eq!(
        &arguments[..8],
        ["sightings-idx", "ON", "JSON", "PREFIX", "1", "sightings:", "STOPWORDS", "0"]
    );
    assert_eq!(arguments[8], "SCHEMA");
    assert_eq!(&arguments[9..13], ["$.title", "AS", "title", "TEXT"]);
    assert_eq!(definition.hash_name, "Bigfoot:index:hash");
}

#[test]
fn fingerprint_changes_with_the_schema() {
    let before = bigfoot_schema(DataStructure::Hash).index_definition();
    let mut fields = bigfoot_fields();
    fields[4] = FieldDefinition::number("temperature").with_sortable(true);
    let after = Schema::new("Bigfoot", fields, SchemaOptions::hash()).unwrap().index_definition();

    let stored = before.fingerprint();
    assert!(!before.needs_rebuild(Some(&stored)));
    assert!(after.needs_rebuild(Some(&stored)));

    let command = commands::store_fingerprint_command(&after);
    let packed = String::from_utf8(command.get_packed_command()).unwrap();
    assert!(packed.contains(&after.fingerprint()));
}
