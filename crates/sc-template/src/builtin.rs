//! Built-in tSQLt test templates compiled into the binary

/// Built-in templates as (file name, text)
const BUILTIN_TEMPLATES: &[(&str, &str)] = &[
    (
        "DatabaseCollationTest.template",
        include_str!("templates/DatabaseCollationTest.template"),
    ),
    ("TableTest.template", include_str!("templates/TableTest.template")),
    ("ViewTest.template", include_str!("templates/ViewTest.template")),
    (
        "FunctionTest.template",
        include_str!("templates/FunctionTest.template"),
    ),
    (
        "ProcedureTest.template",
        include_str!("templates/ProcedureTest.template"),
    ),
    (
        "ExtendedProcedureTest.template",
        include_str!("templates/ExtendedProcedureTest.template"),
    ),
    (
        "SequenceTest.template",
        include_str!("templates/SequenceTest.template"),
    ),
    (
        "UserDefinedDataTypeTest.template",
        include_str!("templates/UserDefinedDataTypeTest.template"),
    ),
    (
        "UserDefinedTableTypeTest.template",
        include_str!("templates/UserDefinedTableTypeTest.template"),
    ),
    (
        "FunctionParameterTest.template",
        include_str!("templates/FunctionParameterTest.template"),
    ),
    (
        "ProcedureParameterTest.template",
        include_str!("templates/ProcedureParameterTest.template"),
    ),
    (
        "TableColumnTest.template",
        include_str!("templates/TableColumnTest.template"),
    ),
    (
        "ViewColumnTest.template",
        include_str!("templates/ViewColumnTest.template"),
    ),
    (
        "TableIndexTest.template",
        include_str!("templates/TableIndexTest.template"),
    ),
    (
        "IndexColumnTest.template",
        include_str!("templates/IndexColumnTest.template"),
    ),
    (
        "TableConstraintTest.template",
        include_str!("templates/TableConstraintTest.template"),
    ),
    (
        "ForeignKeyTest.template",
        include_str!("templates/ForeignKeyTest.template"),
    ),
];

/// Text of a built-in template
pub fn get(name: &str) -> Option<&'static str> {
    BUILTIN_TEMPLATES
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, text)| *text)
}

/// Names of all built-in templates
pub fn names() -> impl Iterator<Item = &'static str> {
    BUILTIN_TEMPLATES.iter().map(|(n, _)| *n)
}

/// Write every built-in template into a directory, creating it if needed.
///
/// Existing files are left alone unless `overwrite` is set. Returns the
/// names of the files written.
pub fn export(dir: &std::path::Path, overwrite: bool) -> std::io::Result<Vec<&'static str>> {
    std::fs::create_dir_all(dir)?;
    let mut written = Vec::new();
    for (name, text) in BUILTIN_TEMPLATES {
        let path = dir.join(name);
        if path.exists() && !overwrite {
            log::debug!("Keeping existing template {}", path.display());
            continue;
        }
        std::fs::write(&path, text)?;
        written.push(*name);
    }
    Ok(written)
}
