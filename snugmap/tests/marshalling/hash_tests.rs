use crate::support::*;

#[test]
fn saves_a_simple_entity() {
    let schema = bigfoot_schema(DataStructure::Hash);
    let payload = populated(to_hash(&schema, &a_bigfoot_sighting()).unwrap());
    assert_eq!(payload, a_bigfoot_hash());
}

#[test]
fn saves_a_sparsely_populated_entity() {
    let schema = bigfoot_schema(DataStructure::Hash);
    let data = EntityData::new()
        .with("state", "OH")
        .with("eyewitness", true)
        .with("temperature", 75);

    let payload = populated(to_hash(&schema, &data).unwrap());
    assert_eq!(
        payload,
        hash_payload(&[("state", "OH"), ("eyewitness", "1"), ("temperature", "75")])
    );
}

#[test]
fn omits_explicit_nulls() {
    let schema = bigfoot_schema(DataStructure::Hash);
    let data = EntityData::new()
        .with("title", "Bigfoot by the river")
        .with_null("county")
        .with_null("eyewitness")
        .with_null("tags");

    let payload = populated(to_hash(&schema, &data).unwrap());
    assert_eq!(payload, hash_payload(&[("title", "Bigfoot by the river")]));
}

#[test]
fn an_all_null_entity_deletes_the_key() {
    let schema = bigfoot_schema(DataStructure::Hash);
    let data = EntityData::new().with_null("county").with_null("eyewitness").with_null("tags");

    let encoded = schema.encode(&data).unwrap();
    assert!(encoded.is_empty());

    let key = schema.entity_key(AN_ENTITY_ID);
    let command = commands::write_command(&key, &encoded);
    let packed = String::from_utf8(command.get_packed_command()).unwrap();
    assert!(packed.contains("DEL"));
    assert!(packed.contains("Bigfoot:01FYQJJ8ZZN6JYQB1CZ7XJ0H4W"));
}

#[test]
fn reads_a_stored_hash() {
    let schema = bigfoot_schema(DataStructure::Hash);
    let data = from_hash(&schema, &a_bigfoot_hash()).unwrap();
    assert_eq!(data, a_bigfoot_sighting());
}

#[test]
fn reads_members_outside_the_schema_as_strings() {
    let schema = bigfoot_schema(DataStructure::Hash);
    let mut stored = a_bigfoot_hash();
    stored.insert("anotherNumber".into(), "23".into());
    stored.insert("anotherBoolean".into(), "0".into());
    stored.insert("someOtherStrings".into(), "alfa|bravo".into());

    let data = from_hash(&schema, &stored).unwrap();
    assert_eq!(data.get("anotherNumber"), Some(&EntityValue::from("23")));
    assert_eq!(data.get("anotherBoolean"), Some(&EntityValue::from("0")));
    assert_eq!(data.get("someOtherStrings"), Some(&EntityValue::from("alfa|bravo")));
    assert_eq!(data.get("eyewitness"), Some(&EntityValue::Boolean(true)));
}

#[test]
fn dates_and_points_use_their_flat_forms() {
    let schema = Schema::new(
        "Sighting",
        [FieldDefinition::date("seenAt"), FieldDefinition::point("location")],
        SchemaOptions::hash(),
    )
    .unwrap();
    let seen_at = Utc.with_ymd_and_hms(2022, 7, 25, 0, 0, 0).unwrap();
    let data = EntityData::new()
        .with("seenAt", seen_at)
        .with("location", Point::new(-84.125, 40.5));

    let payload = populated(to_hash(&schema, &data).unwrap());
    assert_eq!(payload, hash_payload(&[("location", "-84.125,40.5"), ("seenAt", "1658707200000")]));
    assert_eq!(from_hash(&schema, &payload).unwrap(), data);
}

#[test]
fn separator_inside_an_element_splits_it_on_read() {
    let schema = bigfoot_schema(DataStructure::Hash);
    let data = EntityData::new().with("tags", vec!["cloudy|grey", "fresh"]);

    let payload = populated(to_hash(&schema, &data).unwrap());
    assert_eq!(payload["tags"], "cloudy|grey|fresh");

    let read = from_hash(&schema, &payload).unwrap();
    assert_eq!(read.get("tags"), Some(&EntityValue::from(vec!["cloudy", "grey", "fresh"])));
}

#[test]
fn malformed_members_name_the_field() {
    let schema = bigfoot_schema(DataStructure::Hash);
    let err = from_hash(&schema, &hash_payload(&[("temperature", "warm")])).unwrap_err();
    assert_eq!(err.field(), "temperature");
    assert!(matches!(
        err,
        CodecError::MalformedFieldValue { expected: FieldType::Number, ref value, .. } if value == "warm"
    ));
}
