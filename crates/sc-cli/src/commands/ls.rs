//! List command implementation

use anyhow::{bail, Context, Result};
use sc_core::{select_objects, ObjectKind, SchemaObject};
use sc_db::Catalog;

use crate::cli::{GlobalArgs, LsArgs, LsOutput};
use crate::commands::common;

/// Execute the ls command
pub async fn execute(args: &LsArgs, global: &GlobalArgs) -> Result<()> {
    let (config, root) = common::load_config(global)?;
    let Some(catalog) = common::open_catalog(&args.connection, &config, global, &root)? else {
        bail!("ls needs a catalog: pass --instance or set database.path in the config");
    };

    let exclusions = catalog
        .excluded_schemas(&config.framework)
        .await
        .context("Failed to read framework schemas")?;
    if global.verbose {
        eprintln!(
            "[verbose] Excluding schemas: {}",
            exclusions.schemas().collect::<Vec<_>>().join(", ")
        );
    }

    let filters = common::merge_filters(config.filters.clone(), &args.filters);
    let kinds: Vec<ObjectKind> = if args.kind.is_empty() {
        ObjectKind::ALL.to_vec()
    } else {
        args.kind.clone()
    };

    let mut objects: Vec<SchemaObject> = Vec::new();
    for kind in kinds {
        let universe = catalog
            .list_objects(kind)
            .await
            .with_context(|| format!("Failed to list {} objects", kind.phrase()))?;
        let filter = filters.get(&kind).cloned().unwrap_or_default();
        let selected = select_objects(
            kind,
            Some(universe.as_slice()),
            &exclusions,
            &filter,
            None,
        )?;
        objects.extend(selected);
    }

    match args.output {
        LsOutput::Table => print_table(&objects),
        LsOutput::Json => print_json(&objects)?,
    }

    Ok(())
}

/// Print objects in table format
fn print_table(objects: &[SchemaObject]) {
    let kind_width = objects
        .iter()
        .map(|o| o.object_type.as_str().len())
        .max()
        .unwrap_or(4)
        .max(4);
    let schema_width = objects
        .iter()
        .map(|o| o.schema.len())
        .max()
        .unwrap_or(6)
        .max(6);

    println!("{:<kind_width$}  {:<schema_width$}  NAME", "KIND", "SCHEMA");
    println!("{:-<kind_width$}  {:-<schema_width$}  {}", "", "", "-".repeat(30));

    for object in objects {
        let schema = if object.schema.is_empty() {
            "-"
        } else {
            object.schema.as_str()
        };
        println!(
            "{:<kind_width$}  {:<schema_width$}  {}",
            object.object_type.as_str(),
            schema,
            object.name
        );
    }

    println!();
    println!("{} objects found", objects.len());
}

/// Print objects as a JSON array
fn print_json(objects: &[SchemaObject]) -> Result<()> {
    let json = serde_json::to_string_pretty(objects).context("Failed to serialize to JSON")?;
    println!("{}", json);
    Ok(())
}
