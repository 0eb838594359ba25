//! Structural facts fetched from the catalog for one object

use crate::sql_utils::{literal_tuple, SqlValue};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which structural facts to fetch for an object.
///
/// Each kind maps to one fixed catalog query.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AttributeKind {
    Columns,
    Parameters,
    Indexes,
    /// Key and included columns of one index on a table
    IndexColumns { index: String },
    Constraints,
    ForeignKeys,
}

impl fmt::Display for AttributeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeKind::Columns => f.write_str("columns"),
            AttributeKind::Parameters => f.write_str("parameters"),
            AttributeKind::Indexes => f.write_str("indexes"),
            AttributeKind::IndexColumns { index } => write!(f, "columns of index {index}"),
            AttributeKind::Constraints => f.write_str("constraints"),
            AttributeKind::ForeignKeys => f.write_str("foreign keys"),
        }
    }
}

/// One structural fact about an object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AttributeRow {
    Column {
        name: String,
        data_type: String,
        max_length: i64,
        precision: i64,
        scale: i64,
    },
    Parameter {
        name: String,
        data_type: String,
        max_length: i64,
        precision: i64,
        scale: i64,
    },
    Index {
        name: String,
    },
    IndexColumn {
        name: String,
        key_ordinal: i64,
        is_descending: bool,
        is_included: bool,
    },
    Constraint {
        schema: String,
        table: String,
        name: String,
        constraint_type: String,
    },
    ForeignKey {
        source_schema: String,
        source_table: String,
        fk_name: String,
        source_column: String,
        is_disabled: bool,
        is_not_for_replication: bool,
        is_published: bool,
        update_action: String,
        delete_action: String,
        target_column: String,
        target_schema: String,
        target_table: String,
    },
}

impl AttributeRow {
    /// Shorthand for a column row
    pub fn column(name: &str, data_type: &str, max_length: i64, precision: i64, scale: i64) -> Self {
        AttributeRow::Column {
            name: name.to_string(),
            data_type: data_type.to_string(),
            max_length,
            precision,
            scale,
        }
    }

    /// Shorthand for a parameter row
    pub fn parameter(
        name: &str,
        data_type: &str,
        max_length: i64,
        precision: i64,
        scale: i64,
    ) -> Self {
        AttributeRow::Parameter {
            name: name.to_string(),
            data_type: data_type.to_string(),
            max_length,
            precision,
            scale,
        }
    }

    /// Shorthand for an index row
    pub fn index(name: &str) -> Self {
        AttributeRow::Index {
            name: name.to_string(),
        }
    }

    /// Name of the column, parameter, index or constraint this row describes
    pub fn name(&self) -> &str {
        match self {
            AttributeRow::Column { name, .. }
            | AttributeRow::Parameter { name, .. }
            | AttributeRow::Index { name }
            | AttributeRow::IndexColumn { name, .. }
            | AttributeRow::Constraint { name, .. } => name,
            AttributeRow::ForeignKey { fk_name, .. } => fk_name,
        }
    }

    /// Values of this row in template column order
    pub fn values(&self) -> Vec<SqlValue> {
        match self {
            AttributeRow::Column {
                name,
                data_type,
                max_length,
                precision,
                scale,
            }
            | AttributeRow::Parameter {
                name,
                data_type,
                max_length,
                precision,
                scale,
            } => vec![
                name.into(),
                data_type.into(),
                (*max_length).into(),
                (*precision).into(),
                (*scale).into(),
            ],
            AttributeRow::Index { name } => vec![name.into()],
            AttributeRow::IndexColumn {
                name,
                key_ordinal,
                is_descending,
                is_included,
            } => vec![
                name.into(),
                (*key_ordinal).into(),
                (*is_descending).into(),
                (*is_included).into(),
            ],
            AttributeRow::Constraint {
                schema,
                table,
                name,
                constraint_type,
            } => vec![
                schema.into(),
                table.into(),
                name.into(),
                constraint_type.into(),
            ],
            AttributeRow::ForeignKey {
                source_schema,
                source_table,
                fk_name,
                source_column,
                is_disabled,
                is_not_for_replication,
                is_published,
                update_action,
                delete_action,
                target_column,
                target_schema,
                target_table,
            } => vec![
                source_schema.into(),
                source_table.into(),
                fk_name.into(),
                source_column.into(),
                (*is_disabled).into(),
                (*is_not_for_replication).into(),
                (*is_published).into(),
                update_action.into(),
                delete_action.into(),
                target_column.into(),
                target_schema.into(),
                target_table.into(),
            ],
        }
    }

    /// Parenthesized SQL literal tuple for this row
    pub fn to_literal_tuple(&self) -> String {
        literal_tuple(&self.values())
    }
}

#[cfg(test)]
#[path = "attribute_test.rs"]
mod tests;
