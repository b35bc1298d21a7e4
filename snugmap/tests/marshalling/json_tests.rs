use crate::support::*;

#[test]
fn saves_native_json_types() {
    let schema = bigfoot_schema(DataStructure::Json);
    let document = populated(to_json(&schema, &a_bigfoot_sighting()).unwrap());
    assert_eq!(
        document,
        json!({
            "title": "Bigfoot by the river",
            "county": "Allen",
            "state": "OH",
            "eyewitness": true,
            "temperature": 75,
            "tags": ["cloudy", "fresh"],
            "moreTags": ["noisy", "loud"]
        })
    );
}

#[test]
fn omits_nulls_and_collapses_to_empty() {
    let schema = bigfoot_schema(DataStructure::Json);
    let data = EntityData::new().with("state", "OH").with_null("county");
    assert_eq!(populated(to_json(&schema, &data).unwrap()), json!({ "state": "OH" }));

    let blank = EntityData::new().with_null("state").with_null("tags");
    assert_eq!(to_json(&schema, &blank).unwrap(), Encoded::Empty);
}

#[test]
fn reads_back_what_it_wrote() {
    let schema = bigfoot_schema(DataStructure::Json);
    let document = populated(to_json(&schema, &a_bigfoot_sighting()).unwrap());
    assert_eq!(from_json(&schema, &document).unwrap(), a_bigfoot_sighting());
}

#[test]
fn null_members_decode_as_null() {
    let schema = bigfoot_schema(DataStructure::Json);
    let data = from_json(&schema, &json!({ "title": null, "tags": null })).unwrap();
    assert!(data.is_null("title"));
    assert!(data.is_null("tags"));
    assert!(!data.contains("county"));
}

#[test]
fn empty_lists_survive_a_round_trip() {
    let schema = bigfoot_schema(DataStructure::Json);
    let data = EntityData::new().with("tags", Vec::<String>::new());
    let document = populated(to_json(&schema, &data).unwrap());
    assert_eq!(document, json!({ "tags": [] }));
    assert_eq!(from_json(&schema, &document).unwrap(), data);
}

#[test]
fn wildcards_must_end_a_string_list_path() {
    for field in [
        FieldDefinition::string_array("names").with_path("$.witnesses[*].name"),
        FieldDefinition::string("name").with_path("$.witnesses[*]"),
    ] {
        let err = Schema::new("Sighting", [field], SchemaOptions::json()).unwrap_err();
        assert!(matches!(err, SchemaError::InvalidPath { .. }), "got {err:?}");
    }
}

#[test]
fn huge_array_indexes_are_rejected_when_the_schema_is_built() {
    let field = FieldDefinition::number("rank").with_path("$.ranks[99999999999]");
    let err = Schema::new("Sighting", [field], SchemaOptions::json()).unwrap_err();
    assert!(matches!(err, SchemaError::InvalidPath { ref field, .. } if field == "rank"), "got {err:?}");
}

#[test]
fn nested_paths_are_created_on_write() {
    let schema = Schema::new(
        "Sighting",
        [
            FieldDefinition::string("county").with_path("$.location.county"),
            FieldDefinition::point("position").with_path("$.location.position"),
            FieldDefinition::date("seenAt").with_path("$.observations[0]"),
        ],
        SchemaOptions::json(),
    )
    .unwrap();
    let seen_at = Utc.timestamp_millis_opt(1_658_707_200_000).unwrap();
    let data = EntityData::new()
        .with("county", "Allen")
        .with("position", Point::new(-84.125, 40.5))
        .with("seenAt", seen_at);

    let document = populated(to_json(&schema, &data).unwrap());
    assert_eq!(
        document,
        json!({
            "location": { "county": "Allen", "position": "-84.125,40.5" },
            "observations": [1_658_707_200_000_i64]
        })
    );
    assert_eq!(from_json(&schema, &document).unwrap(), data);
}

#[test]
fn wildcard_paths_collect_every_match() {
    let schema = Schema::new(
        "Sighting",
        [FieldDefinition::string_array("witnesses").with_path("$.reports[*]")],
        SchemaOptions::json(),
    )
    .unwrap();
    let document = json!({ "reports": ["Ann", 42, true] });

    let data = from_json(&schema, &document).unwrap();
    assert_eq!(data.get("witnesses"), Some(&EntityValue::from(vec!["Ann", "42", "true"])));
}

#[test]
fn nulls_inside_lists_are_rejected() {
    let schema = bigfoot_schema(DataStructure::Json);
    let err = from_json(&schema, &json!({ "tags": ["cloudy", null] })).unwrap_err();
    assert_eq!(
        err,
        CodecError::UnexpectedNullInArray {
            field: "tags".to_string(),
            received: r#"["cloudy",null]"#.to_string(),
        }
    );
}

#[test]
fn wrong_json_types_are_mismatches() {
    let schema = bigfoot_schema(DataStructure::Json);
    for document in [
        json!({ "eyewitness": "yes" }),
        json!({ "temperature": "75" }),
        json!({ "title": { "text": "nested" } }),
        json!({ "title": ["a", "b"] }),
        json!({ "tags": "cloudy" }),
    ] {
        let err = from_json(&schema, &document).unwrap_err();
        assert!(matches!(err, CodecError::TypeMismatch { .. }), "{document} gave {err:?}");
    }
}

#[test]
fn text_fields_do_not_take_lists() {
    let schema = bigfoot_schema(DataStructure::Json);
    let data = EntityData::new().with("title", vec!["a", "b"]);
    let err = to_json(&schema, &data).unwrap_err();
    assert!(matches!(err, CodecError::TypeMismatch { ref field, expected: FieldType::Text, .. } if field == "title"));
}

#[test]
fn scalars_are_stringified_for_string_fields() {
    let schema = bigfoot_schema(DataStructure::Json);
    let data = from_json(&schema, &json!({ "county": 12, "state": false })).unwrap();
    assert_eq!(data.get("county"), Some(&EntityValue::from("12")));
    assert_eq!(data.get("state"), Some(&EntityValue::from("false")));
}

#[test]
fn members_outside_the_schema_pass_through() {
    let schema = bigfoot_schema(DataStructure::Json);
    let document = json!({
        "state": "OH",
        "anotherNumber": 23,
        "anotherBoolean": false,
        "someOtherStrings": ["alfa", "bravo"],
        "nested": { "ignored": true }
    });

    let data = from_json(&schema, &document).unwrap();
    assert_eq!(data.get("anotherNumber"), Some(&EntityValue::Number(23.0)));
    assert_eq!(data.get("anotherBoolean"), Some(&EntityValue::Boolean(false)));
    assert_eq!(data.get("someOtherStrings"), Some(&EntityValue::from(vec!["alfa", "bravo"])));
    assert!(!data.contains("nested"));

    let rewritten = populated(to_json(&schema, &data).unwrap());
    assert_eq!(rewritten["anotherNumber"], json!(23));
    assert_eq!(rewritten["someOtherStrings"], json!(["alfa", "bravo"]));
}

#[test]
fn payload_dispatch_matches_the_schema() {
    let schema = bigfoot_schema(DataStructure::Json);
    let Some(Payload::Json(document)) = schema.encode(&a_bigfoot_sighting()).unwrap().into_payload() else {
        panic!("expected a JSON payload");
    };
    let command = commands::write_command("Bigfoot:1", &Encoded::Populated(Payload::Json(document)));
    let packed = String::from_utf8(command.get_packed_command()).unwrap();
    assert!(packed.contains("JSON.SET"));
    assert!(packed.contains(r#""eyewitness":true"#));
}
