//! CLI argument definitions using clap derive API

use clap::{Args, Parser, Subcommand, ValueEnum};
use sc_core::{ObjectKind, Phase};

/// Schemacheck - generate tSQLt tests that pin a database schema
#[derive(Parser, Debug)]
#[command(name = "schemacheck")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all commands
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to project directory
    #[arg(short = 'p', long, global = true, default_value = ".")]
    pub project_dir: String,

    /// Override config file path
    #[arg(short, long, global = true)]
    pub config: Option<String>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate test files from the catalog
    Generate(GenerateArgs),

    /// List the objects tests would be generated for
    Ls(LsArgs),

    /// List or export the built-in templates
    Templates(TemplatesArgs),
}

/// Catalog connection arguments
#[derive(Args, Debug, Clone, Default)]
pub struct ConnectionArgs {
    /// Catalog instance (DuckDB database file, or :memory:)
    #[arg(short, long, env = "SCHEMACHECK_INSTANCE")]
    pub instance: Option<String>,

    /// Database (catalog) name inside the instance
    #[arg(short, long)]
    pub database: Option<String>,
}

/// Per-kind object filters (comma-separated; names may be schema-qualified)
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Only tables in these schemas
    #[arg(long, value_delimiter = ',')]
    pub table_schemas: Vec<String>,

    /// Only these tables
    #[arg(long, value_delimiter = ',')]
    pub table_names: Vec<String>,

    /// Only views in these schemas
    #[arg(long, value_delimiter = ',')]
    pub view_schemas: Vec<String>,

    /// Only these views
    #[arg(long, value_delimiter = ',')]
    pub view_names: Vec<String>,

    /// Only functions in these schemas
    #[arg(long, value_delimiter = ',')]
    pub function_schemas: Vec<String>,

    /// Only these functions
    #[arg(long, value_delimiter = ',')]
    pub function_names: Vec<String>,

    /// Only procedures in these schemas
    #[arg(long, value_delimiter = ',')]
    pub procedure_schemas: Vec<String>,

    /// Only these procedures
    #[arg(long, value_delimiter = ',')]
    pub procedure_names: Vec<String>,
}

impl FilterArgs {
    /// Command-line (schemas, names) lists for each kind that has flags
    pub fn by_kind(&self) -> [(ObjectKind, &[String], &[String]); 4] {
        [
            (
                ObjectKind::Table,
                self.table_schemas.as_slice(),
                self.table_names.as_slice(),
            ),
            (
                ObjectKind::View,
                self.view_schemas.as_slice(),
                self.view_names.as_slice(),
            ),
            (
                ObjectKind::Function,
                self.function_schemas.as_slice(),
                self.function_names.as_slice(),
            ),
            (
                ObjectKind::Procedure,
                self.procedure_schemas.as_slice(),
                self.procedure_names.as_slice(),
            ),
        ]
    }
}

/// Arguments for the generate command
#[derive(Args, Debug)]
pub struct GenerateArgs {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    #[command(flatten)]
    pub filters: FilterArgs,

    /// Directory test files are written to (created if missing)
    #[arg(long)]
    pub output_path: Option<String>,

    /// Directory with *.template files (default: built-in templates)
    #[arg(long)]
    pub template_folder: Option<String>,

    /// tSQLt test class the tests are created in
    #[arg(long)]
    pub test_class: Option<String>,

    /// Author recorded in the tests (default: current user)
    #[arg(long)]
    pub creator: Option<String>,

    /// Phase to skip (repeatable): collation, functions, procedures, tables,
    /// table_indexes, index_columns, views, constraints, foreign_keys,
    /// sequences, user_types
    #[arg(long = "skip", value_name = "PHASE")]
    pub skip: Vec<Phase>,

    /// Objects to generate tests for, as JSON (file path or - for stdin)
    #[arg(long, value_name = "FILE")]
    pub objects_from: Option<String>,

    /// Render tests without writing files
    #[arg(long)]
    pub dry_run: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: GenerateOutput,
}

/// Generate output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerateOutput {
    /// Human-readable summary
    Text,
    /// JSON report
    Json,
}

/// Arguments for the ls command
#[derive(Args, Debug)]
pub struct LsArgs {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    #[command(flatten)]
    pub filters: FilterArgs,

    /// Object kinds to list (comma-separated, default: all)
    #[arg(short, long, value_delimiter = ',')]
    pub kind: Vec<ObjectKind>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub output: LsOutput,
}

/// Ls output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LsOutput {
    /// Aligned table
    Table,
    /// JSON array, accepted by `generate --objects-from`
    Json,
}

/// Arguments for the templates command
#[derive(Args, Debug)]
pub struct TemplatesArgs {
    /// Write the built-in templates into this directory
    #[arg(long, value_name = "DIR")]
    pub export: Option<String>,

    /// Overwrite templates that already exist in the export directory
    #[arg(long, requires = "export")]
    pub force: bool,
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
