pub(crate) use chrono::{TimeZone, Utc};
pub(crate) use serde_json::json;
pub(crate) use snugmap::{
    CodecError, DataStructure, Encoded, EntityData, EntityValue, FieldDefinition, FieldType, HashPayload, Payload,
    Point, Schema, SchemaError, SchemaOptions, StopWords, commands, from_hash, from_json, to_hash, to_json,
};

pub(crate) const AN_ENTITY_ID: &str = "01FYQJJ8ZZN6JYQB1CZ7XJ0H4W";

pub(crate) fn options(data_structure: DataStructure) -> SchemaOptions {
    match data_structure {
        DataStructure::Hash => SchemaOptions::hash(),
        DataStructure::Json => SchemaOptions::json(),
    }
}

pub(crate) fn bigfoot_fields() -> Vec<FieldDefinition> {
    vec![
        FieldDefinition::text("title"),
        FieldDefinition::string("county"),
        FieldDefinition::string("state"),
        FieldDefinition::boolean("eyewitness"),
        FieldDefinition::number("temperature"),
        FieldDefinition::string_array("tags"),
        FieldDefinition::string_array("moreTags").with_separator('&'),
    ]
}

pub(crate) fn bigfoot_schema(data_structure: DataStructure) -> Schema {
    Schema::new("Bigfoot", bigfoot_fields(), options(data_structure)).unwrap()
}

pub(crate) fn a_bigfoot_sighting() -> EntityData {
    EntityData::new()
        .with("title", "Bigfoot by the river")
        .with("county", "Allen")
        .with("state", "OH")
        .with("eyewitness", true)
        .with("temperature", 75)
        .with("tags", vec!["cloudy", "fresh"])
        .with("moreTags", vec!["noisy", "loud"])
}

pub(crate) fn a_bigfoot_hash() -> HashPayload {
    hash_payload(&[
        ("title", "Bigfoot by the river"),
        ("county", "Allen"),
        ("state", "OH"),
        ("eyewitness", "1"),
        ("temperature", "75"),
        ("tags", "cloudy|fresh"),
        ("moreTags", "noisy&loud"),
    ])
}

pub(crate) fn hash_payload(members: &[(&str, &str)]) -> HashPayload {
    members
        .iter()
        .map(|(member, value)| (member.to_string(), value.to_string()))
        .collect()
}

pub(crate) fn populated<P: std::fmt::Debug>(encoded: Encoded<P>) -> P {
    match encoded {
        Encoded::Populated(payload) => payload,
        Encoded::Empty => panic!("expected a populated payload"),
    }
}
