use fedi_entities::{federation_schemas, Person, SchemaError, PERSON, PROFILE};
use serde_json::json;

fn person_json() -> serde_json::Value {
    json!({
        "guid": "abcdef0123456789",
        "handle": "alice@pod.example",
        "url": "https://pod.example/",
        "public_key": "-----BEGIN PUBLIC KEY-----\nMIIB\n-----END PUBLIC KEY-----\n",
        "profile": {
            "handle": "alice@pod.example",
            "first_name": "Alice",
            "image_url": "https://pod.example/uploads/l_alice.jpg"
        }
    })
}

#[test]
fn registry_contains_person_and_profile() {
    let registry = federation_schemas().expect("built-in schemas are consistent");
    assert_eq!(registry.entity_names(), vec![PERSON, PROFILE]);

    let names: Vec<&str> = registry
        .nested_class_props(PERSON)
        .unwrap()
        .iter()
        .map(|p| p.name())
        .collect();
    assert!(names.contains(&"profile"));
    assert!(names.contains(&"first_name"));
    assert!(names.contains(&"searchable"));
}

#[test]
fn person_view_reads_record_values() {
    let registry = federation_schemas().unwrap();
    let record = registry.construct(PERSON, person_json()).unwrap();
    registry.validate(&record).expect("complete person");

    let person = Person::from_record(record).unwrap();
    assert_eq!(person.guid(), Some("abcdef0123456789"));
    assert_eq!(person.handle(), Some("alice@pod.example"));
    assert_eq!(person.url(), Some("https://pod.example/"));
    assert!(person.public_key().unwrap().starts_with("-----BEGIN"));

    let profile = person.profile().expect("profile embedded");
    assert_eq!(profile.handle(), Some("alice@pod.example"));
    assert_eq!(profile.first_name(), Some("Alice"));
    assert_eq!(profile.last_name(), None);
    assert_eq!(
        profile.image_url(),
        Some("https://pod.example/uploads/l_alice.jpg")
    );
    assert!(profile.searchable(), "searchable defaults to true");
}

#[test]
fn person_requires_guid_and_key() {
    let registry = federation_schemas().unwrap();
    let mut data = person_json();
    let obj = data.as_object_mut().unwrap();
    obj.remove("guid");
    obj.insert("public_key".to_string(), serde_json::Value::Null);

    let record = registry.construct(PERSON, data).unwrap();
    let err = registry.validate(&record).unwrap_err();
    assert_eq!(
        err,
        SchemaError::MissingProperties {
            entity: PERSON.to_string(),
            properties: vec!["guid".to_string(), "public_key".to_string()],
        }
    );
}

#[test]
fn person_view_rejects_other_records() {
    let registry = federation_schemas().unwrap();
    let profile = registry
        .construct(PROFILE, json!({ "handle": "alice@pod.example" }))
        .unwrap();

    let err = Person::from_record(profile).unwrap_err();
    assert!(matches!(err, SchemaError::EntityMismatch { .. }));
}

#[test]
fn person_serializes_as_plain_object() {
    let registry = federation_schemas().unwrap();
    let person = Person::from_record(registry.construct(PERSON, person_json()).unwrap()).unwrap();

    let value = serde_json::to_value(&person).unwrap();
    assert_eq!(value["handle"], "alice@pod.example");
    assert_eq!(value["profile"]["first_name"], "Alice");
    assert_eq!(value["profile"]["searchable"], true);
    assert!(value["profile"].get("last_name").is_none());
}
