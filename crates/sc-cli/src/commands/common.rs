//! Shared utilities for CLI commands

use anyhow::{bail, Context, Result};
use sc_core::{Config, ObjectFilter, ObjectKind, SchemaObject};
use sc_db::DuckDbCatalog;
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use tokio::io::AsyncReadExt;

use crate::cli::{ConnectionArgs, FilterArgs, GlobalArgs};

/// Error type representing a non-zero process exit code.
///
/// Use `return Err(ExitCode(N).into())` instead of `std::process::exit(N)`
/// so that RAII destructors run and cleanup happens properly.
#[derive(Debug)]
pub(crate) struct ExitCode(pub(crate) i32);

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Control flow only; main.rs exits with the code and prints nothing
        write!(f, "")
    }
}

impl std::error::Error for ExitCode {}

/// Exit code when the run completed but at least one phase failed
pub(crate) const EXIT_PHASE_FAILED: i32 = 2;

/// Load the project configuration.
///
/// `--config` must point at an existing file; otherwise the project
/// directory is searched and defaults are used when it has no config file.
pub(crate) fn load_config(global: &GlobalArgs) -> Result<(Config, PathBuf)> {
    let root = PathBuf::from(&global.project_dir);
    let config = match &global.config {
        Some(path) => Config::load(Path::new(path))
            .with_context(|| format!("Failed to load config from {path}"))?,
        None => Config::load_from_dir(&root).context("Failed to load project config")?,
    };
    if global.verbose {
        eprintln!("[verbose] Project directory: {}", root.display());
    }
    Ok((config, root))
}

/// Catalog instance and database to connect to, command line first.
///
/// Instance paths from the config file are relative to the project root.
pub(crate) fn resolve_connection(
    args: &ConnectionArgs,
    config: &Config,
    root: &Path,
) -> Option<(String, Option<String>)> {
    let from_config = config.database.as_ref();
    let instance = match &args.instance {
        Some(instance) => instance.clone(),
        None => {
            let path = &from_config?.path;
            if path == ":memory:" {
                path.clone()
            } else {
                root.join(path).display().to_string()
            }
        }
    };
    let database = args
        .database
        .clone()
        .or_else(|| from_config.and_then(|db| db.name.clone()));
    Some((instance, database))
}

/// Open the catalog, or `None` when no instance is configured
pub(crate) fn open_catalog(
    args: &ConnectionArgs,
    config: &Config,
    global: &GlobalArgs,
    root: &Path,
) -> Result<Option<DuckDbCatalog>> {
    let Some((instance, database)) = resolve_connection(args, config, root) else {
        if global.verbose {
            eprintln!("[verbose] No catalog instance configured");
        }
        return Ok(None);
    };

    if instance != ":memory:" && !Path::new(&instance).exists() {
        bail!("Catalog instance not found: {instance}");
    }
    if global.verbose {
        eprintln!(
            "[verbose] Connecting to {}{}",
            instance,
            database
                .as_deref()
                .map(|d| format!(" (database {d})"))
                .unwrap_or_default()
        );
    }

    log::debug!("Opening catalog {instance}");
    let catalog = DuckDbCatalog::open(&instance, database.as_deref())
        .with_context(|| format!("Failed to connect to catalog {instance}"))?;
    Ok(Some(catalog))
}

/// Config file filters with command-line lists layered on top.
///
/// A non-empty command-line list replaces the config list for that kind.
pub(crate) fn merge_filters(
    mut filters: BTreeMap<ObjectKind, ObjectFilter>,
    args: &FilterArgs,
) -> BTreeMap<ObjectKind, ObjectFilter> {
    for (kind, schemas, names) in args.by_kind() {
        if schemas.is_empty() && names.is_empty() {
            continue;
        }
        let filter = filters.entry(kind).or_default();
        if !schemas.is_empty() {
            filter.schemas = schemas.to_vec();
        }
        if !names.is_empty() {
            filter.names = names.to_vec();
        }
    }
    filters
}

/// Author for generated tests: flag, then config, then the current user
pub(crate) fn resolve_creator(flag: Option<&str>, config: Option<&str>) -> String {
    flag.or(config)
        .map(str::to_string)
        .or_else(|| std::env::var("USER").ok())
        .or_else(|| std::env::var("USERNAME").ok())
        .filter(|c| !c.trim().is_empty())
        .unwrap_or_else(|| "schemacheck".to_string())
}

/// Read objects from a file, or stdin for `-`
pub(crate) async fn read_objects(source: &str) -> Result<Vec<SchemaObject>> {
    let text = if source == "-" {
        let mut text = String::new();
        tokio::io::stdin()
            .read_to_string(&mut text)
            .await
            .context("Failed to read objects from stdin")?;
        text
    } else {
        tokio::fs::read_to_string(source)
            .await
            .with_context(|| format!("Failed to read objects from {source}"))?
    };
    parse_objects(&text).with_context(|| format!("Invalid object list in {source}"))
}

/// Parse a JSON array of objects, or one JSON object per line
pub(crate) fn parse_objects(text: &str) -> Result<Vec<SchemaObject>> {
    let trimmed = text.trim_start();
    if trimmed.starts_with('[') {
        return Ok(serde_json::from_str(trimmed)?);
    }

    let mut objects = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let object: SchemaObject =
            serde_json::from_str(line).with_context(|| format!("line {}", idx + 1))?;
        objects.push(object);
    }
    Ok(objects)
}

#[cfg(test)]
#[path = "common_test.rs"]
mod tests;
