use super::*;
use crate::context::{tokens, RenderContext};
use sc_core::sql_utils::data_block;
use std::fs;

fn table_values() -> PlaceholderValues {
    RenderContext::fixed("dev", "2024-01-02 03:04:05")
        .placeholders()
        .raw(tokens::TESTCLASS, "SchemaTests")
        .raw(tokens::TESTNAME, "test If table Sales.Orders has the correct columns")
        .literal(tokens::SCHEMA, "Sales")
        .literal(tokens::NAME, "Orders")
}

fn folder_with(name: &str, text: &str) -> (tempfile::TempDir, TemplateRenderer) {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join(name), text).unwrap();
    let renderer = TemplateRenderer::from_folder(dir.path()).unwrap();
    (dir, renderer)
}

#[test]
fn test_render_builtin_column_test() {
    let block = data_block(["('Id', 'int', 4, 10, 0)", "('Name', 'nvarchar', 100, 0, 0)"]);
    let values = table_values().raw(tokens::COLUMNS, block);

    let sql = TemplateRenderer::builtin()
        .render("TableColumnTest.template", &values)
        .unwrap();

    assert!(sql.contains("\t('Id', 'int', 4, 10, 0),\n\t('Name', 'nvarchar', 100, 0, 0);"));
    assert!(sql.contains("CREATE PROCEDURE [SchemaTests].[test If table Sales.Orders has the correct columns]"));
    assert!(sql.contains("WHERE s.name = 'Sales'"));
    assert!(sql.contains("2024-01-02 03:04:05  dev"));
    assert!(!sql.contains("___"));
    assert!(sql.ends_with("GO\n"));
}

#[test]
fn test_every_occurrence_is_replaced() {
    let (_dir, renderer) = folder_with("T.template", "___NAME___-___NAME___-___NAME___");
    let values = PlaceholderValues::new().raw("NAME", "x");
    assert_eq!(renderer.render("T.template", &values).unwrap(), "x-x-x");
}

#[test]
fn test_unused_values_are_ignored() {
    let (_dir, renderer) = folder_with("T.template", "SELECT ___NAME___;");
    let values = PlaceholderValues::new()
        .raw("NAME", "1")
        .raw("SCHEMA", "unused");
    assert_eq!(renderer.render("T.template", &values).unwrap(), "SELECT 1;");
}

#[test]
fn test_missing_placeholder() {
    let (_dir, renderer) = folder_with("T.template", "___SCHEMA___.___NAME___");
    let values = PlaceholderValues::new().raw("SCHEMA", "dbo");
    let err = renderer.render("T.template", &values).unwrap_err();
    match err {
        TemplateError::MissingPlaceholder { template, token } => {
            assert_eq!(template, "T.template");
            assert_eq!(token, "NAME");
        }
        other => panic!("expected MissingPlaceholder, got {other:?}"),
    }
}

#[test]
fn test_unknown_template() {
    let err = TemplateRenderer::builtin()
        .render("NoSuchTest.template", &PlaceholderValues::new())
        .unwrap_err();
    assert!(matches!(err, TemplateError::TemplateNotFound { name } if name == "NoSuchTest.template"));
}

#[test]
fn test_template_text_is_never_interpreted() {
    let text = "SELECT '{{ x }}', '{% if %}', '{# c #}' FROM ___NAME___;\n-- }} ok\n\n";
    let (_dir, renderer) = folder_with("T.template", text);
    let values = PlaceholderValues::new().raw("NAME", "t");
    assert_eq!(
        renderer.render("T.template", &values).unwrap(),
        "SELECT '{{ x }}', '{% if %}', '{# c #}' FROM t;\n-- }} ok\n\n"
    );
}

#[test]
fn test_values_are_not_interpreted() {
    let (_dir, renderer) = folder_with("T.template", "___NAME___");
    let values = PlaceholderValues::new().raw("NAME", "{{ other }}");
    assert_eq!(renderer.render("T.template", &values).unwrap(), "{{ other }}");
}

#[test]
fn test_literal_values_are_escaped_in_output() {
    let (_dir, renderer) = folder_with("T.template", "WHERE name = '___NAME___'");
    let values = PlaceholderValues::new().literal("NAME", "O'Brien");
    assert_eq!(
        renderer.render("T.template", &values).unwrap(),
        "WHERE name = 'O''Brien'"
    );
}

#[test]
fn test_render_is_idempotent() {
    let renderer = TemplateRenderer::builtin();
    let values = table_values();
    let first = renderer.render("TableTest.template", &values).unwrap();
    let second = renderer.render("TableTest.template", &values).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_folder_overrides_builtin() {
    let (_dir, renderer) = folder_with("TableTest.template", "custom ___NAME___\n");
    let values = PlaceholderValues::new().raw("NAME", "Orders");
    assert_eq!(
        renderer.render("TableTest.template", &values).unwrap(),
        "custom Orders\n"
    );
    // Templates missing from the folder are not taken from the built-in set
    assert!(matches!(
        renderer.render("ViewTest.template", &values),
        Err(TemplateError::TemplateNotFound { .. })
    ));
}

#[test]
fn test_folder_missing() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope");
    assert!(matches!(
        TemplateRenderer::from_folder(&missing),
        Err(TemplateError::TemplateFolderMissing { .. })
    ));
}

#[test]
fn test_for_folder_defaults_to_builtin() {
    let renderer = TemplateRenderer::for_folder(None).unwrap();
    assert_eq!(renderer.source(), &TemplateSource::Builtin);
}

#[test]
fn test_path_names_are_not_loaded() {
    let dir = tempfile::tempdir().unwrap();
    let inner = dir.path().join("templates");
    fs::create_dir(&inner).unwrap();
    fs::write(dir.path().join("Secret.template"), "secret").unwrap();
    let renderer = TemplateRenderer::from_folder(&inner).unwrap();
    assert!(matches!(
        renderer.render("../Secret.template", &PlaceholderValues::new()),
        Err(TemplateError::TemplateNotFound { .. })
    ));
}

#[test]
fn test_template_tokens_in_order() {
    assert_eq!(
        template_tokens("___B___ ___A___ ___B___ __C__ ___lower___"),
        vec!["B", "A"]
    );
}

#[test]
fn test_tokens_of_builtin() {
    let tokens = TemplateRenderer::builtin()
        .tokens("DatabaseCollationTest.template")
        .unwrap();
    assert!(tokens.contains(&"DATABASE".to_string()));
    assert!(tokens.contains(&"COLLATION".to_string()));
    assert!(!tokens.contains(&"SCHEMA".to_string()));
}

#[test]
fn test_translate() {
    assert_eq!(translate("a ___X___ b"), "a {{ X }} b");
    assert_eq!(
        translate("{x} ___X___"),
        "{% raw %}{x} {% endraw %}{{ X }}"
    );
}
