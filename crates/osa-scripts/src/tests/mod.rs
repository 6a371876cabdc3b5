//! Catalog-wide checks over every registered template.

use osa_catalog::Registry;
use rstest::{fixture, rstest};
use serde_json::{Map, Value, json};

use crate::{HIERARCHICAL_SOURCE, catalog, categories};

#[fixture]
fn registry() -> Registry {
    catalog().build()
}

/// Placeholder for a required property, chosen from its declared type.
fn sample_value(name: &str, schema: &Value) -> Value {
    match schema.get("type").and_then(Value::as_str) {
        Some("number") => json!(1),
        Some("boolean") => json!(false),
        Some("array") => json!([]),
        _ if name.ends_with("Date") => json!("2024-01-01 09:00:00"),
        _ => json!("sample"),
    }
}

fn minimal_arguments(schema: &Value) -> Value {
    let properties = schema.get("properties").and_then(Value::as_object);
    let required = schema
        .get("required")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();
    let mut arguments = Map::new();
    for name in required.iter().filter_map(Value::as_str) {
        let property = properties
            .and_then(|props| props.get(name))
            .cloned()
            .unwrap_or(Value::Null);
        arguments.insert(name.to_owned(), sample_value(name, &property));
    }
    Value::Object(arguments)
}

#[rstest]
fn categories_register_in_catalog_order() {
    let names: Vec<String> = categories()
        .iter()
        .map(|category| category.name().to_owned())
        .collect();
    assert_eq!(
        names,
        [
            "system",
            "calendar",
            "finder",
            "clipboard",
            "notifications",
            "iterm",
            "mail",
            "pages",
            "shortcuts",
            "messages",
            "notes",
            "omnifocus",
        ]
    );
}

#[rstest]
fn category_names_are_addressable(registry: Registry) {
    for category in registry.categories() {
        assert!(
            !category.name().contains('_'),
            "category {} cannot be resolved",
            category.name()
        );
    }
}

#[rstest]
fn every_listed_tool_resolves_to_itself(registry: Registry) {
    for descriptor in registry.list_all() {
        let resolved = registry
            .resolve(&descriptor.name)
            .unwrap_or_else(|error| panic!("{}: {error}", descriptor.name));
        let round_trip = format!(
            "{}_{}",
            resolved.category.name(),
            resolved.operation.name()
        );
        assert_eq!(round_trip, descriptor.name);
    }
}

#[rstest]
fn every_tool_declares_an_object_schema(registry: Registry) {
    for descriptor in registry.list_all() {
        assert_eq!(
            descriptor.input_schema.get("type"),
            Some(&json!("object")),
            "{}",
            descriptor.name
        );
    }
}

#[rstest]
fn every_producer_accepts_its_minimal_arguments(registry: Registry) {
    for category in registry.categories() {
        for operation in category.operations() {
            let arguments = minimal_arguments(operation.input().as_value());
            let script = operation
                .producer()
                .produce(Some(&arguments))
                .unwrap_or_else(|error| {
                    panic!("{}_{}: {error}", category.name(), operation.name())
                });
            assert!(!script.trim().is_empty());
        }
    }
}

#[rstest]
fn hierarchical_source_is_registered(registry: Registry) {
    let (category, operation) = HIERARCHICAL_SOURCE;
    let resolved = registry
        .resolve(&format!("{category}_{operation}"))
        .expect("hierarchical source");
    assert!(resolved.operation.producer().is_computed());
}

#[rstest]
#[case::system("system", 6)]
#[case::calendar("calendar", 2)]
#[case::finder("finder", 3)]
#[case::clipboard("clipboard", 3)]
#[case::notifications("notifications", 2)]
#[case::iterm("iterm", 2)]
#[case::mail("mail", 3)]
#[case::pages("pages", 1)]
#[case::shortcuts("shortcuts", 2)]
#[case::messages("messages", 4)]
#[case::notes("notes", 5)]
#[case::omnifocus("omnifocus", 2)]
fn categories_carry_expected_operations(
    registry: Registry,
    #[case] name: &str,
    #[case] expected: usize,
) {
    let category = registry
        .categories()
        .iter()
        .find(|category| category.name() == name)
        .expect("category");
    assert_eq!(category.operations().len(), expected);
}
