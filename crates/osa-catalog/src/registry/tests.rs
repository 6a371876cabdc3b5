//! Unit tests for registry construction, enumeration, and lookup.

use rstest::{fixture, rstest};
use serde_json::json;

use super::*;
use crate::operation::{InputShape, Producer};

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

fn fixed(name: &str, script: &'static str) -> Operation {
    Operation::new(name, format!("{name} operation"), Producer::Fixed(script))
}

#[fixture]
fn registry() -> Registry {
    let mut builder = RegistryBuilder::new();
    builder
        .register(
            Category::new("system", "System control")
                .with_operation(fixed("volume", "set volume 3"))
                .with_operation(fixed("get_frontmost_app", "frontmost")),
        )
        .register(
            Category::new("clipboard", "Clipboard management")
                .with_operation(fixed("get_clipboard", "get"))
                .with_operation(
                    fixed("set_clipboard", "set").with_input(InputShape::object(
                        json!({ "content": { "type": "string" } }),
                        &["content"],
                    )),
                ),
        );
    builder.build()
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

#[rstest]
#[case::plain("system_volume", "system", "volume")]
#[case::underscored("system_get_frontmost_app", "system", "get_frontmost_app")]
#[case::underscored_clipboard("clipboard_get_clipboard", "clipboard", "get_clipboard")]
fn resolve_finds_registered_operations(
    registry: Registry,
    #[case] tool: &str,
    #[case] category: &str,
    #[case] operation: &str,
) {
    let resolved = registry.resolve(tool).expect("tool should resolve");
    assert_eq!(resolved.category.name(), category);
    assert_eq!(resolved.operation.name(), operation);
}

#[rstest]
#[case::unknown_category("finder_search", ResolveError::category_not_found("finder"))]
#[case::unknown_operation(
    "system_reboot",
    ResolveError::operation_not_found("system", "reboot")
)]
#[case::bare_category("system", ResolveError::operation_not_found("system", ""))]
#[case::empty_name("", ResolveError::category_not_found(""))]
#[case::case_sensitive("System_volume", ResolveError::category_not_found("System"))]
fn resolve_reports_not_found(
    registry: Registry,
    #[case] tool: &str,
    #[case] expected: ResolveError,
) {
    let error = registry.resolve(tool).expect_err("tool should not resolve");
    assert_eq!(error, expected);
}

#[rstest]
fn every_listed_tool_resolves_to_itself(registry: Registry) {
    for descriptor in registry.list_all() {
        let resolved = registry
            .resolve(&descriptor.name)
            .expect("listed tool resolves");
        assert_eq!(
            compose(resolved.category.name(), resolved.operation.name()),
            descriptor.name
        );
    }
}

// ---------------------------------------------------------------------------
// Enumeration
// ---------------------------------------------------------------------------

#[rstest]
fn list_all_yields_one_descriptor_per_operation(registry: Registry) {
    let names: Vec<String> = registry.list_all().map(|tool| tool.name).collect();
    assert_eq!(
        names,
        vec![
            "system_volume",
            "system_get_frontmost_app",
            "clipboard_get_clipboard",
            "clipboard_set_clipboard",
        ]
    );
    assert_eq!(registry.tool_count(), names.len());
}

#[rstest]
fn list_all_is_stable_across_calls(registry: Registry) {
    let first: Vec<ToolDescriptor<'_>> = registry.list_all().collect();
    let second: Vec<ToolDescriptor<'_>> = registry.list_all().collect();
    assert_eq!(first, second);
}

#[rstest]
fn descriptors_prefix_the_category_description(registry: Registry) {
    let descriptor = registry.list_all().next().expect("at least one tool");
    assert_eq!(descriptor.description, "[System control] volume operation");
}

#[rstest]
fn descriptors_serialise_with_input_schema(registry: Registry) {
    let descriptors: Vec<ToolDescriptor<'_>> = registry.list_all().collect();
    let value = serde_json::to_value(&descriptors).expect("serialise descriptors");
    assert_eq!(
        value[0]["inputSchema"],
        json!({ "type": "object", "properties": {} })
    );
    assert_eq!(value[3]["inputSchema"]["required"], json!(["content"]));
}

// ---------------------------------------------------------------------------
// Duplicates
// ---------------------------------------------------------------------------

#[rstest]
fn duplicate_categories_resolve_to_the_first_registration() {
    let mut builder = RegistryBuilder::new();
    builder
        .register(Category::new("mail", "First").with_operation(fixed("send", "first")))
        .register(Category::new("mail", "Second").with_operation(fixed("send", "second")));
    let registry = builder.build();

    let resolved = registry.resolve("mail_send").expect("resolves");
    let script = resolved.operation.producer().produce(None).expect("script");
    assert_eq!(script, "first");
    assert_eq!(registry.list_all().count(), 2);
}

#[rstest]
fn duplicate_operations_resolve_to_the_first_registration() {
    let mut builder = RegistryBuilder::new();
    builder.register(
        Category::new("notes", "Notes")
            .with_operation(fixed("list", "first"))
            .with_operation(fixed("list", "second")),
    );
    let registry = builder.build();

    let resolved = registry.resolve("notes_list").expect("resolves");
    let script = resolved.operation.producer().produce(None).expect("script");
    assert_eq!(script, "first");
}

#[rstest]
fn underscored_category_is_registered_but_unreachable() {
    let mut builder = RegistryBuilder::new();
    builder.register(Category::new("my_app", "Mine").with_operation(fixed("run", "x")));
    assert_eq!(builder.len(), 1);
    let registry = builder.build();

    assert_eq!(
        registry.resolve("my_app_run").expect_err("unreachable"),
        ResolveError::category_not_found("my")
    );
}

#[rstest]
fn empty_builder_yields_empty_registry() {
    let builder = RegistryBuilder::new();
    assert!(builder.is_empty());
    let registry = builder.build();
    assert_eq!(registry.list_all().count(), 0);
    assert_eq!(registry.tool_count(), 0);
}
