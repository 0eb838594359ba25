//! DuckDB catalog backend
//!
//! Reads object metadata from DuckDB's `duckdb_*()` catalog functions. The
//! schema `comment` plays the role of the extended-property marker that
//! flags test-class schemas.

use crate::error::{DbError, DbResult};
use crate::traits::Catalog;
use async_trait::async_trait;
use duckdb::{params, Connection};
use sc_core::{AttributeKind, AttributeRow, ExclusionSet, FrameworkConfig, ObjectKind, SchemaObject};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

const DATABASE_NAME_SQL: &str = "SELECT current_database()";

const COLLATION_SQL: &str = "SELECT CAST(current_setting('default_collation') AS VARCHAR)";

const EXCLUDED_SCHEMAS_SQL: &str = "\
SELECT schema_name FROM duckdb_schemas()
WHERE database_name = current_database() AND comment = ?
UNION
SELECT CAST(? AS VARCHAR)";

const TABLES_SQL: &str = "\
SELECT schema_name, table_name FROM duckdb_tables()
WHERE database_name = current_database() AND NOT internal AND NOT temporary
ORDER BY schema_name, table_name";

const VIEWS_SQL: &str = "\
SELECT schema_name, view_name FROM duckdb_views()
WHERE database_name = current_database() AND NOT internal AND NOT temporary
ORDER BY schema_name, view_name";

const FUNCTIONS_SQL: &str = "\
SELECT DISTINCT schema_name, function_name FROM duckdb_functions()
WHERE database_name = current_database() AND NOT internal
  AND function_type IN ('macro', 'table_macro')
ORDER BY schema_name, function_name";

const SEQUENCES_SQL: &str = "\
SELECT schema_name, sequence_name FROM duckdb_sequences()
WHERE database_name = current_database() AND NOT temporary
ORDER BY schema_name, sequence_name";

const TYPES_SQL: &str = "\
SELECT schema_name, type_name FROM duckdb_types()
WHERE database_name = current_database()
ORDER BY schema_name, type_name";

const COLUMNS_SQL: &str = "\
SELECT column_name,
       data_type,
       CAST(COALESCE(character_maximum_length, 0) AS BIGINT),
       CAST(COALESCE(numeric_precision, 0) AS BIGINT),
       CAST(COALESCE(numeric_scale, 0) AS BIGINT)
FROM duckdb_columns()
WHERE database_name = current_database() AND NOT internal
  AND schema_name = ? AND table_name = ?
ORDER BY table_name, column_name";

const PARAMETERS_SQL: &str = "\
SELECT parameter_name, COALESCE(parameter_type, 'ANY')
FROM (
    SELECT UNNEST(parameters) AS parameter_name,
           UNNEST(parameter_types) AS parameter_type
    FROM duckdb_functions()
    WHERE database_name = current_database() AND NOT internal
      AND schema_name = ? AND function_name = ?
)
WHERE parameter_name IS NOT NULL";

const INDEXES_SQL: &str = "\
SELECT index_name FROM duckdb_indexes()
WHERE database_name = current_database() AND schema_name = ? AND table_name = ?
ORDER BY index_name";

const INDEX_DEFINITION_SQL: &str = "\
SELECT sql FROM duckdb_indexes()
WHERE database_name = current_database() AND schema_name = ? AND table_name = ?
  AND index_name = ?";

const CONSTRAINTS_SQL: &str = "\
SELECT schema_name, table_name, constraint_name, constraint_type
FROM duckdb_constraints()
WHERE database_name = current_database() AND schema_name = ? AND table_name = ?
ORDER BY constraint_index";

const FOREIGN_KEYS_SQL: &str = "\
SELECT schema_name,
       table_name,
       constraint_name,
       UNNEST(constraint_column_names),
       UNNEST(referenced_column_names),
       referenced_table
FROM duckdb_constraints()
WHERE database_name = current_database() AND constraint_type = 'FOREIGN KEY'
  AND schema_name = ? AND table_name = ?
ORDER BY constraint_index";

/// DuckDB has no foreign key options; report SQL Server's defaults
const FK_DEFAULT_ACTION: &str = "NO_ACTION";

/// DuckDB catalog backend
#[derive(Debug)]
pub struct DuckDbCatalog {
    conn: Mutex<Connection>,
}

impl DuckDbCatalog {
    /// Create a new in-memory DuckDB catalog
    pub fn in_memory() -> DbResult<Self> {
        let conn =
            Connection::open_in_memory().map_err(|e| DbError::ConnectionError(e.to_string()))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open a DuckDB instance and switch to `database` when given.
    ///
    /// `:memory:` opens an in-memory instance.
    pub fn open(instance: &str, database: Option<&str>) -> DbResult<Self> {
        let catalog = if instance == ":memory:" {
            Self::in_memory()?
        } else {
            let conn = Connection::open(Path::new(instance))
                .map_err(|e| DbError::ConnectionError(format!("{instance}: {e}")))?;
            Self {
                conn: Mutex::new(conn),
            }
        };

        if let Some(db) = database {
            catalog
                .execute_batch(&format!("USE {}", quote_ident(db)))
                .map_err(|e| DbError::ConnectionError(format!("cannot use database '{db}': {e}")))?;
        }

        Ok(catalog)
    }

    /// Execute SQL statements (fixture setup and `USE`)
    pub fn execute_batch(&self, sql: &str) -> DbResult<()> {
        let conn = self.lock()?;
        conn.execute_batch(sql)
            .map_err(|e| DbError::ExecutionError(e.to_string()))
    }

    fn lock(&self) -> DbResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| DbError::MutexPoisoned(e.to_string()))
    }

    fn query_single_string(&self, sql: &str) -> DbResult<String> {
        let conn = self.lock()?;
        let value: Option<String> = conn.query_row(sql, [], |row| row.get(0))?;
        Ok(value.unwrap_or_default())
    }

    fn list_objects_sync(&self, kind: ObjectKind) -> DbResult<Vec<SchemaObject>> {
        let sql = match kind {
            ObjectKind::Table => TABLES_SQL,
            ObjectKind::View => VIEWS_SQL,
            ObjectKind::Function => FUNCTIONS_SQL,
            ObjectKind::Sequence => SEQUENCES_SQL,
            ObjectKind::UserDefinedDataType => TYPES_SQL,
            ObjectKind::Procedure
            | ObjectKind::ExtendedProcedure
            | ObjectKind::UserDefinedTableType => {
                log::debug!("DuckDB has no {} objects", kind.phrase());
                return Ok(Vec::new());
            }
        };

        let conn = self.lock()?;
        let mut stmt = conn.prepare(sql)?;
        let rows = stmt.query_map([], |row| {
            Ok(SchemaObject::new(
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                kind,
            ))
        })?;
        let collected = rows.collect::<Result<Vec<_>, _>>()?;
        Ok(collected)
    }

    fn excluded_schemas_sync(&self, framework: &FrameworkConfig) -> DbResult<ExclusionSet> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(EXCLUDED_SCHEMAS_SQL)?;
        let rows = stmt.query_map(
            params![framework.marker.as_str(), framework.schema.as_str()],
            |row| row.get::<_, String>(0),
        )?;
        let schemas = rows.collect::<Result<Vec<_>, _>>()?;
        Ok(ExclusionSet::from_schemas(schemas))
    }

    fn columns_sync(&self, object: &SchemaObject) -> DbResult<Vec<AttributeRow>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(COLUMNS_SQL)?;
        let rows = stmt.query_map(params![object.schema.as_str(), object.name.as_str()], |row| {
            Ok(AttributeRow::Column {
                name: row.get(0)?,
                data_type: row.get(1)?,
                max_length: row.get(2)?,
                precision: row.get(3)?,
                scale: row.get(4)?,
            })
        })?;
        let collected = rows.collect::<Result<Vec<_>, _>>()?;
        Ok(collected)
    }

    fn parameters_sync(&self, object: &SchemaObject) -> DbResult<Vec<AttributeRow>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(PARAMETERS_SQL)?;
        let rows = stmt.query_map(params![object.schema.as_str(), object.name.as_str()], |row| {
            Ok(AttributeRow::Parameter {
                name: row.get(0)?,
                data_type: row.get(1)?,
                max_length: 0,
                precision: 0,
                scale: 0,
            })
        })?;
        let collected = rows.collect::<Result<Vec<_>, _>>()?;
        Ok(collected)
    }

    fn indexes_sync(&self, object: &SchemaObject) -> DbResult<Vec<AttributeRow>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(INDEXES_SQL)?;
        let rows = stmt.query_map(params![object.schema.as_str(), object.name.as_str()], |row| {
            Ok(AttributeRow::Index { name: row.get(0)? })
        })?;
        let collected = rows.collect::<Result<Vec<_>, _>>()?;
        Ok(collected)
    }

    fn index_columns_sync(&self, object: &SchemaObject, index: &str) -> DbResult<Vec<AttributeRow>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(INDEX_DEFINITION_SQL)?;
        let rows = stmt.query_map(
            params![object.schema.as_str(), object.name.as_str(), index],
            |row| row.get::<_, Option<String>>(0),
        )?;
        let definitions = rows.collect::<Result<Vec<_>, _>>()?;
        Ok(definitions
            .into_iter()
            .flatten()
            .next()
            .map(|sql| parse_index_columns(&sql))
            .unwrap_or_default())
    }

    fn constraints_sync(&self, object: &SchemaObject) -> DbResult<Vec<AttributeRow>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(CONSTRAINTS_SQL)?;
        let rows = stmt.query_map(params![object.schema.as_str(), object.name.as_str()], |row| {
            Ok(AttributeRow::Constraint {
                schema: row.get(0)?,
                table: row.get(1)?,
                name: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
                constraint_type: row.get(3)?,
            })
        })?;
        let collected = rows.collect::<Result<Vec<_>, _>>()?;
        Ok(collected)
    }

    fn foreign_keys_sync(&self, object: &SchemaObject) -> DbResult<Vec<AttributeRow>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(FOREIGN_KEYS_SQL)?;
        let rows = stmt.query_map(params![object.schema.as_str(), object.name.as_str()], |row| {
            let source_schema: String = row.get(0)?;
            Ok(AttributeRow::ForeignKey {
                target_schema: source_schema.clone(),
                source_schema,
                source_table: row.get(1)?,
                fk_name: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
                source_column: row.get(3)?,
                is_disabled: false,
                is_not_for_replication: false,
                is_published: false,
                update_action: FK_DEFAULT_ACTION.to_string(),
                delete_action: FK_DEFAULT_ACTION.to_string(),
                target_column: row.get(4)?,
                target_table: row.get(5)?,
            })
        })?;
        let collected = rows.collect::<Result<Vec<_>, _>>()?;
        Ok(collected)
    }
}

#[async_trait]
impl Catalog for DuckDbCatalog {
    fn backend(&self) -> &'static str {
        "duckdb"
    }

    async fn database_name(&self) -> DbResult<String> {
        self.query_single_string(DATABASE_NAME_SQL)
    }

    async fn database_collation(&self) -> DbResult<String> {
        self.query_single_string(COLLATION_SQL)
    }

    async fn excluded_schemas(&self, framework: &FrameworkConfig) -> DbResult<ExclusionSet> {
        self.excluded_schemas_sync(framework)
    }

    async fn list_objects(&self, kind: ObjectKind) -> DbResult<Vec<SchemaObject>> {
        self.list_objects_sync(kind)
    }

    async fn fetch_attributes(
        &self,
        kind: &AttributeKind,
        object: &SchemaObject,
    ) -> DbResult<Vec<AttributeRow>> {
        match kind {
            AttributeKind::Columns => self.columns_sync(object),
            AttributeKind::Parameters => self.parameters_sync(object),
            AttributeKind::Indexes => self.indexes_sync(object),
            AttributeKind::IndexColumns { index } => self.index_columns_sync(object, index),
            AttributeKind::Constraints => self.constraints_sync(object),
            AttributeKind::ForeignKeys => self.foreign_keys_sync(object),
        }
    }
}

fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

/// Extract key columns from a `CREATE INDEX ... ON t(a, b DESC)` statement.
///
/// DuckDB exposes index columns only through the stored definition.
pub(crate) fn parse_index_columns(sql: &str) -> Vec<AttributeRow> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;
    let mut in_quotes = false;
    let mut closed = false;

    // Parentheses and commas inside "quoted" identifiers are not structure
    for c in sql.chars() {
        if in_quotes {
            in_quotes = c != '"';
            if depth > 0 {
                current.push(c);
            }
            continue;
        }
        match c {
            '"' => {
                in_quotes = true;
                if depth > 0 {
                    current.push(c);
                }
            }
            '(' => {
                if depth > 0 {
                    current.push(c);
                }
                depth += 1;
            }
            ')' if depth == 1 => {
                parts.push(std::mem::take(&mut current));
                closed = true;
                break;
            }
            ')' if depth > 1 => {
                depth -= 1;
                current.push(c);
            }
            ',' if depth == 1 => parts.push(std::mem::take(&mut current)),
            _ if depth > 0 => current.push(c),
            _ => {}
        }
    }
    if !closed {
        return Vec::new();
    }

    parts
        .iter()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .enumerate()
        .map(|(i, part)| {
            let upper = part.to_ascii_uppercase();
            let (expr, is_descending) = if upper.ends_with(" DESC") {
                (&part[..part.len() - 5], true)
            } else if upper.ends_with(" ASC") {
                (&part[..part.len() - 4], false)
            } else {
                (part, false)
            };
            AttributeRow::IndexColumn {
                name: unquote_ident(expr.trim()),
                key_ordinal: i as i64 + 1,
                is_descending,
                is_included: false,
            }
        })
        .collect()
}

fn unquote_ident(expr: &str) -> String {
    match expr.strip_prefix('"').and_then(|e| e.strip_suffix('"')) {
        Some(inner) => inner.replace("\"\"", "\""),
        None => expr.to_string(),
    }
}

#[cfg(test)]
#[path = "duckdb_test.rs"]
mod tests;
