//! Configuration types and parsing for schemacheck.yml

use crate::error::{CoreError, CoreResult};
use crate::object::ObjectKind;
use crate::selector::ObjectFilter;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Project configuration from schemacheck.yml.
///
/// Every field is optional in the file; command-line flags override
/// whatever the file provides.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Catalog connection
    #[serde(default)]
    pub database: Option<DatabaseConfig>,

    /// Directory the generated test files are written to
    #[serde(default = "default_output_path")]
    pub output_path: String,

    /// Directory with `*.template` files; built-in templates when absent
    #[serde(default)]
    pub template_folder: Option<String>,

    /// tSQLt test class the generated tests belong to
    #[serde(default = "default_test_class")]
    pub test_class: String,

    /// Author recorded in every generated test
    #[serde(default)]
    pub creator: Option<String>,

    /// Test framework schema detection
    #[serde(default)]
    pub framework: FrameworkConfig,

    /// Generation phases to skip
    #[serde(default)]
    pub skip: Vec<Phase>,

    /// Per-kind schema and name filters
    #[serde(default)]
    pub filters: BTreeMap<ObjectKind, ObjectFilter>,
}

/// Database type selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DbType {
    /// DuckDB (default)
    #[default]
    DuckDb,
}

impl fmt::Display for DbType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DbType::DuckDb => write!(f, "duckdb"),
        }
    }
}

/// Catalog connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    /// Database type
    #[serde(rename = "type", default)]
    pub db_type: DbType,

    /// Instance to connect to (the DuckDB file path)
    pub path: String,

    /// Database (catalog) name; the instance default when absent
    #[serde(default)]
    pub name: Option<String>,
}

/// How framework-owned schemas are recognized
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FrameworkConfig {
    /// The framework's own schema, always excluded
    #[serde(default = "default_framework_schema")]
    pub schema: String,

    /// Extended-property (schema comment) value marking a test-class schema
    #[serde(default = "default_framework_marker")]
    pub marker: String,
}

impl Default for FrameworkConfig {
    fn default() -> Self {
        Self {
            schema: default_framework_schema(),
            marker: default_framework_marker(),
        }
    }
}

/// A generation phase. Phases run in [`Phase::ALL`] order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Collation,
    Functions,
    Procedures,
    Tables,
    TableIndexes,
    IndexColumns,
    Views,
    Constraints,
    ForeignKeys,
    Sequences,
    UserTypes,
}

impl Phase {
    pub const ALL: [Phase; 11] = [
        Phase::Collation,
        Phase::Functions,
        Phase::Procedures,
        Phase::Tables,
        Phase::TableIndexes,
        Phase::IndexColumns,
        Phase::Views,
        Phase::Constraints,
        Phase::ForeignKeys,
        Phase::Sequences,
        Phase::UserTypes,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Collation => "collation",
            Phase::Functions => "functions",
            Phase::Procedures => "procedures",
            Phase::Tables => "tables",
            Phase::TableIndexes => "table_indexes",
            Phase::IndexColumns => "index_columns",
            Phase::Views => "views",
            Phase::Constraints => "constraints",
            Phase::ForeignKeys => "foreign_keys",
            Phase::Sequences => "sequences",
            Phase::UserTypes => "user_types",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Phase {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        Phase::ALL
            .into_iter()
            .find(|p| p.as_str() == normalized)
            .ok_or_else(|| CoreError::UnknownName {
                what: "phase",
                value: s.to_string(),
                valid: Phase::ALL
                    .iter()
                    .map(|p| p.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
            })
    }
}

const CONFIG_FILE_NAMES: [&str; 2] = ["schemacheck.yml", "schemacheck.yaml"];

fn default_output_path() -> String {
    "tests".to_string()
}

fn default_test_class() -> String {
    "SchemaTests".to_string()
}

fn default_framework_schema() -> String {
    "tSQLt".to_string()
}

fn default_framework_marker() -> String {
    "tSQLt.TestClass".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: None,
            output_path: default_output_path(),
            template_folder: None,
            test_class: default_test_class(),
            creator: None,
            framework: FrameworkConfig::default(),
            skip: Vec::new(),
            filters: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Load configuration from a file path
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        let config: Config = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Find the config file in a project directory, if there is one
    pub fn find_in_dir(dir: &Path) -> Option<PathBuf> {
        CONFIG_FILE_NAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|p| p.exists())
    }

    /// Load configuration from a project directory.
    ///
    /// A directory without a config file yields the defaults.
    pub fn load_from_dir(dir: &Path) -> CoreResult<Self> {
        match Self::find_in_dir(dir) {
            Some(path) => Self::load(&path),
            None => {
                log::debug!("No config file in {}, using defaults", dir.display());
                Ok(Self::default())
            }
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> CoreResult<()> {
        if self.test_class.trim().is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "test_class cannot be empty".to_string(),
            });
        }

        if self.output_path.trim().is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "output_path cannot be empty".to_string(),
            });
        }

        if self.framework.schema.trim().is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "framework.schema cannot be empty".to_string(),
            });
        }

        if let Some(db) = &self.database {
            if db.path.trim().is_empty() {
                return Err(CoreError::ConfigInvalid {
                    message: "database.path cannot be empty".to_string(),
                });
            }
        }

        Ok(())
    }

    /// Whether a phase is enabled
    pub fn runs_phase(&self, phase: Phase) -> bool {
        !self.skip.contains(&phase)
    }

    /// Filter configured for an object kind (empty when none)
    pub fn filter_for(&self, kind: ObjectKind) -> ObjectFilter {
        self.filters.get(&kind).cloned().unwrap_or_default()
    }

    /// Output directory resolved against a project root
    pub fn output_path_absolute(&self, root: &Path) -> PathBuf {
        root.join(&self.output_path)
    }

    /// Template folder resolved against a project root
    pub fn template_folder_absolute(&self, root: &Path) -> Option<PathBuf> {
        self.template_folder.as_ref().map(|p| root.join(p))
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
