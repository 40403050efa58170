//! Unit tests for schema declaration, registry queries and construction.

use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::{
    DefaultValue, EntitySchema, FieldValue, PropertyType, ScalarType, SchemaError,
    SchemaRegistry,
};

fn test_entity() -> EntitySchema {
    let mut schema = EntitySchema::new("TestEntity").expect("valid name");
    schema
        .declare_property("test", ScalarType::String, None)
        .expect("should declare");
    schema
}

fn other_entity() -> EntitySchema {
    let mut schema = EntitySchema::new("OtherEntity").expect("valid name");
    schema
        .declare_property("asdf", ScalarType::String, None)
        .expect("should declare");
    schema
}

fn nested_entity() -> EntitySchema {
    let mut schema = EntitySchema::new("TestNestedEntity").expect("valid name");
    schema
        .declare_property("asdf", ScalarType::String, None)
        .and_then(|s| s.declare_entity("test", "TestEntity", Some(DefaultValue::optional())))
        .and_then(|s| s.declare_entity("multi", ["OtherEntity"], None))
        .expect("should declare");
    schema
}

fn default_entity() -> EntitySchema {
    let mut schema = EntitySchema::new("TestDefaultEntity").expect("valid name");
    schema
        .declare_property("test1", ScalarType::String, None)
        .and_then(|s| s.declare_property("test2", ScalarType::String, None))
        .and_then(|s| {
            s.declare_property("test3", ScalarType::Boolean, Some(DefaultValue::value(true)))
        })
        .and_then(|s| {
            s.declare_property(
                "test4",
                ScalarType::String,
                Some(DefaultValue::producer(|| json!("default"))),
            )
        })
        .expect("should declare");
    schema
}

/// Registry with the fixture types, registered parent-first.
fn test_registry() -> SchemaRegistry {
    let mut builder = SchemaRegistry::builder();
    builder
        .register(nested_entity())
        .and_then(|b| b.register(test_entity()))
        .and_then(|b| b.register(other_entity()))
        .and_then(|b| b.register(default_entity()))
        .expect("should register");
    builder.build().expect("registry should build")
}

// ── declaration ──────────────────────────────────────────────────────

#[test]
fn simple_property_defaults_to_declared_scalar() {
    let mut schema = EntitySchema::new("Anon").unwrap();
    schema
        .declare_property("test", ScalarType::String, None)
        .unwrap();

    let props = schema.class_props();
    assert_eq!(props.len(), 1);
    assert_eq!(props[0].name(), "test");
    assert_eq!(
        props[0].property_type(),
        &PropertyType::Scalar(ScalarType::String)
    );
    assert!(props[0].is_required());
}

#[test]
fn declare_string_is_a_string_property() {
    let mut schema = EntitySchema::new("Anon").unwrap();
    schema
        .declare_string("test", None)
        .unwrap()
        .declare_string("opt", Some(DefaultValue::optional()))
        .unwrap();

    let test = schema.property("test").unwrap();
    assert_eq!(
        test.property_type(),
        &PropertyType::Scalar(ScalarType::String)
    );
    assert!(test.is_required());
    assert!(!schema.property("opt").unwrap().is_required());

    assert!(matches!(
        schema.declare_string("42", None),
        Err(SchemaError::InvalidName(_))
    ));
}

#[test]
fn multiple_properties_keep_declaration_order() {
    let mut schema = EntitySchema::new("Anon").unwrap();
    schema
        .declare_property("test", ScalarType::String, None)
        .unwrap()
        .declare_property("asdf", ScalarType::String, None)
        .unwrap()
        .declare_property("zzzz", ScalarType::String, None)
        .unwrap();

    assert_eq!(schema.class_prop_names(), vec!["test", "asdf", "zzzz"]);
}

#[test]
fn non_identifier_names_are_rejected() {
    let mut schema = EntitySchema::new("Anon").unwrap();
    for name in ["42", "1234", "", "{}", "first name", "true!"] {
        let err = schema
            .declare_property(name, ScalarType::String, None)
            .unwrap_err();
        assert_eq!(err, SchemaError::InvalidName(name.to_string()));
    }
    assert!(schema.class_props().is_empty());
}

#[test]
fn entity_target_must_be_an_entity_type_name() {
    let mut schema = EntitySchema::new("Anon").unwrap();
    for target in ["1234", "", "{}"] {
        let err = schema.declare_entity("other", target, None).unwrap_err();
        assert!(
            matches!(err, SchemaError::InvalidType { target: ref t, .. } if t == target),
            "unexpected error: {err:?}"
        );

        let err = schema.declare_entity("other", [target], None).unwrap_err();
        assert!(matches!(err, SchemaError::InvalidType { .. }));
    }
}

#[test]
fn entity_declarations_record_nested_types() {
    let mut schema = EntitySchema::new("Anon").unwrap();
    schema.declare_entity("other", "TestEntity", None).unwrap();
    schema.declare_entity("many", ["TestEntity"], None).unwrap();

    let props = schema.class_props();
    assert_eq!(
        props[0].property_type(),
        &PropertyType::Entity("TestEntity".to_string())
    );
    assert_eq!(
        props[1].property_type(),
        &PropertyType::EntityArray("TestEntity".to_string())
    );
    assert!(props.iter().all(|p| p.property_type().is_entity()));
}

#[test]
fn duplicate_property_is_rejected() {
    let mut schema = EntitySchema::new("Anon").unwrap();
    schema
        .declare_property("test", ScalarType::String, None)
        .unwrap();
    let err = schema
        .declare_property("test", ScalarType::Boolean, None)
        .unwrap_err();
    assert!(matches!(err, SchemaError::DuplicateProperty { .. }));
}

#[test]
fn invalid_entity_name_is_rejected() {
    let err = EntitySchema::new("1234").unwrap_err();
    assert_eq!(err, SchemaError::InvalidEntityName("1234".to_string()));
}

// ── registry ─────────────────────────────────────────────────────────

#[test]
fn dangling_reference_fails_at_build() {
    let mut builder = SchemaRegistry::builder();
    builder.register(nested_entity()).unwrap();
    let err = builder.build().unwrap_err();
    assert!(
        matches!(err, SchemaError::InvalidType { ref target, .. } if target == "TestEntity"),
        "unexpected error: {err:?}"
    );
}

#[test]
fn duplicate_entity_is_rejected() {
    let mut builder = SchemaRegistry::builder();
    builder.register(test_entity()).unwrap();
    let err = builder.register(test_entity()).unwrap_err();
    assert_eq!(err, SchemaError::DuplicateEntity("TestEntity".to_string()));
}

#[test]
fn class_prop_names_lists_own_properties() {
    let registry = test_registry();
    assert_eq!(
        registry.class_prop_names("TestDefaultEntity").unwrap(),
        vec!["test1", "test2", "test3", "test4"]
    );
    assert_eq!(
        registry.class_prop_names("TestNestedEntity").unwrap(),
        vec!["asdf", "test", "multi"]
    );
}

#[test]
fn nested_class_props_include_nested_types() {
    let registry = test_registry();
    let props = registry.nested_class_props("TestNestedEntity").unwrap();

    let entries: Vec<(&str, String)> = props
        .iter()
        .map(|p| (p.name(), p.property_type().label()))
        .collect();
    assert_eq!(
        entries,
        vec![
            ("asdf", "string".to_string()),
            ("test", "TestEntity".to_string()),
            ("multi", "[OtherEntity]".to_string()),
            // TestEntity's own
            ("test", "string".to_string()),
            // OtherEntity's own
            ("asdf", "string".to_string()),
        ]
    );
}

#[test]
fn nested_class_props_terminate_on_cycles() {
    let mut node = EntitySchema::new("Node").unwrap();
    node.declare_property("label", ScalarType::String, None)
        .unwrap()
        .declare_entity("parent", "Node", Some(DefaultValue::optional()))
        .unwrap()
        .declare_entity("edges", ["Edge"], Some(DefaultValue::optional()))
        .unwrap();
    let mut edge = EntitySchema::new("Edge").unwrap();
    edge.declare_entity("target", "Node", None).unwrap();

    let mut builder = SchemaRegistry::builder();
    builder.register(node).unwrap().register(edge).unwrap();
    let registry = builder.build().unwrap();

    let names: Vec<&str> = registry
        .nested_class_props("Node")
        .unwrap()
        .iter()
        .map(|p| p.name())
        .collect();
    assert_eq!(names, vec!["label", "parent", "edges", "target"]);
}

#[test]
fn unknown_entity_queries_fail() {
    let registry = test_registry();
    assert_eq!(
        registry.class_props("Missing").unwrap_err(),
        SchemaError::UnknownEntity("Missing".to_string())
    );
    assert!(registry.nested_class_props("Missing").is_err());
    assert!(registry.construct("Missing", json!({})).is_err());
}

// ── defaults ─────────────────────────────────────────────────────────

#[test]
fn default_values_resolve_static_and_producer_defaults() {
    let registry = test_registry();
    let defaults = registry.default_values("TestDefaultEntity").unwrap();

    assert_eq!(defaults.get("test3"), Some(&json!(true)));
    assert_eq!(defaults.get("test4"), Some(&json!("default")));
    assert!(!defaults.contains_key("test1"));
}

#[test]
fn producer_default_is_fresh_for_every_construction() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);

    let mut schema = EntitySchema::new("Counted").unwrap();
    schema
        .declare_property(
            "tags",
            ScalarType::String,
            Some(DefaultValue::producer(move || {
                json!(format!("tag-{}", counter.fetch_add(1, Ordering::SeqCst)))
            })),
        )
        .unwrap();
    let mut builder = SchemaRegistry::builder();
    builder.register(schema).unwrap();
    let registry = builder.build().unwrap();

    let first = registry.construct("Counted", json!({})).unwrap();
    let second = registry.construct("Counted", json!({})).unwrap();

    assert_eq!(first.get_str("tags"), Some("tag-0"));
    assert_eq!(second.get_str("tags"), Some("tag-1"));
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

// ── construction ─────────────────────────────────────────────────────

#[test]
fn construct_merges_supplied_values_over_defaults() {
    let registry = test_registry();
    let record = registry
        .construct(
            "TestDefaultEntity",
            json!({ "test1": "one", "test3": false, "unknown": 5 }),
        )
        .unwrap();

    assert_eq!(record.entity(), "TestDefaultEntity");
    assert_eq!(record.get_str("test1"), Some("one"));
    assert_eq!(record.get_bool("test3"), Some(false));
    assert_eq!(record.get_str("test4"), Some("default"));
    assert!(!record.contains("test2"), "no value and no default stays absent");
    assert!(!record.contains("unknown"));
}

#[test]
fn null_counts_as_not_supplied() {
    let registry = test_registry();
    let record = registry
        .construct("TestDefaultEntity", json!({ "test3": null, "test2": null }))
        .unwrap();
    assert_eq!(record.get_bool("test3"), Some(true));
    assert!(!record.contains("test2"));
}

#[test]
fn construct_builds_nested_records() {
    let registry = test_registry();
    let record = registry
        .construct(
            "TestNestedEntity",
            json!({
                "asdf": "parent",
                "test": { "test": "child" },
                "multi": [{ "asdf": "a" }, { "asdf": "b" }]
            }),
        )
        .unwrap();

    let child = record.get_entity("test").unwrap();
    assert_eq!(child.entity(), "TestEntity");
    assert_eq!(child.get_str("test"), Some("child"));

    let multi = record.get_entities("multi").unwrap();
    assert_eq!(multi.len(), 2);
    assert_eq!(multi[1].entity(), "OtherEntity");
    assert_eq!(multi[1].get_str("asdf"), Some("b"));

    assert_eq!(
        serde_json::to_value(&record).unwrap(),
        json!({
            "asdf": "parent",
            "multi": [{ "asdf": "a" }, { "asdf": "b" }],
            "test": { "test": "child" }
        })
    );
    assert_eq!(serde_json::to_value(&record).unwrap(), record.to_json());
}

#[test]
fn construct_rejects_type_mismatches() {
    let registry = test_registry();

    let err = registry
        .construct("TestDefaultEntity", json!({ "test1": 12 }))
        .unwrap_err();
    assert_eq!(
        err,
        SchemaError::TypeMismatch {
            entity: "TestDefaultEntity".to_string(),
            property: "test1".to_string(),
            expected: "string".to_string(),
            found: "number",
        }
    );

    let err = registry
        .construct("TestNestedEntity", json!({ "test": "not an object" }))
        .unwrap_err();
    assert!(matches!(err, SchemaError::TypeMismatch { .. }));

    let err = registry
        .construct("TestNestedEntity", json!({ "multi": [{ "asdf": "a" }, 3] }))
        .unwrap_err();
    assert!(matches!(err, SchemaError::TypeMismatch { found: "number", .. }));
}

#[test]
fn construct_requires_an_object() {
    let registry = test_registry();
    let err = registry.construct("TestEntity", json!(["x"])).unwrap_err();
    assert_eq!(
        err,
        SchemaError::NotAnObject {
            entity: "TestEntity".to_string(),
            found: "array",
        }
    );
}

#[test]
fn self_referential_defaults_stop_at_depth_limit() {
    let mut node = EntitySchema::new("Loop").unwrap();
    node.declare_entity("next", "Loop", Some(DefaultValue::value(json!({}))))
        .unwrap();
    let mut builder = SchemaRegistry::builder();
    builder.register(node).unwrap();
    let registry = builder.build().unwrap();

    let err = registry.construct("Loop", json!({})).unwrap_err();
    assert!(matches!(err, SchemaError::NestingTooDeep { .. }));
}

// ── validation ───────────────────────────────────────────────────────

#[test]
fn validate_reports_missing_required_properties() {
    let registry = test_registry();
    let record = registry
        .construct("TestDefaultEntity", json!({ "test1": "one" }))
        .unwrap();

    let err = registry.validate(&record).unwrap_err();
    assert_eq!(
        err,
        SchemaError::MissingProperties {
            entity: "TestDefaultEntity".to_string(),
            properties: vec!["test2".to_string()],
        }
    );
    assert_eq!(
        err.to_string(),
        "TestDefaultEntity is missing required properties: test2"
    );
}

#[test]
fn validate_recurses_into_nested_records() {
    let registry = test_registry();
    let record = registry
        .construct(
            "TestNestedEntity",
            json!({ "asdf": "x", "test": {}, "multi": [] }),
        )
        .unwrap();

    let err = registry.validate(&record).unwrap_err();
    assert_eq!(
        err,
        SchemaError::MissingProperties {
            entity: "TestEntity".to_string(),
            properties: vec!["test".to_string()],
        }
    );
}

#[test]
fn validate_accepts_optional_absent_properties() {
    let registry = test_registry();
    let record = registry
        .construct("TestNestedEntity", json!({ "asdf": "x", "multi": [] }))
        .unwrap();

    assert!(!record.contains("test"));
    assert!(matches!(
        record.get("multi"),
        Some(FieldValue::Entities(items)) if items.is_empty()
    ));
    registry.validate(&record).expect("optional entity may be absent");
}
