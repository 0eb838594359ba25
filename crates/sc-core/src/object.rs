//! Schema objects and the framework exclusion set

use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Kind of database object a test can be generated for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectKind {
    Table,
    View,
    Function,
    Procedure,
    ExtendedProcedure,
    Sequence,
    UserDefinedDataType,
    UserDefinedTableType,
}

impl ObjectKind {
    /// Every object kind, in declaration order
    pub const ALL: [ObjectKind; 8] = [
        ObjectKind::Table,
        ObjectKind::View,
        ObjectKind::Function,
        ObjectKind::Procedure,
        ObjectKind::ExtendedProcedure,
        ObjectKind::Sequence,
        ObjectKind::UserDefinedDataType,
        ObjectKind::UserDefinedTableType,
    ];

    /// Identifier used in config files, CLI flags and JSON
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectKind::Table => "table",
            ObjectKind::View => "view",
            ObjectKind::Function => "function",
            ObjectKind::Procedure => "procedure",
            ObjectKind::ExtendedProcedure => "extended_procedure",
            ObjectKind::Sequence => "sequence",
            ObjectKind::UserDefinedDataType => "user_defined_data_type",
            ObjectKind::UserDefinedTableType => "user_defined_table_type",
        }
    }

    /// Words used for this kind inside generated test names
    pub fn phrase(&self) -> &'static str {
        match self {
            ObjectKind::Table => "table",
            ObjectKind::View => "view",
            ObjectKind::Function => "function",
            ObjectKind::Procedure => "procedure",
            ObjectKind::ExtendedProcedure => "extended procedure",
            ObjectKind::Sequence => "sequence",
            ObjectKind::UserDefinedDataType => "user defined data type",
            ObjectKind::UserDefinedTableType => "user defined table type",
        }
    }

    /// Extended stored procedures are resolved without a schema
    pub fn has_schema(&self) -> bool {
        !matches!(self, ObjectKind::ExtendedProcedure)
    }

    /// Template used for the object existence test of this kind
    pub fn existence_template(&self) -> &'static str {
        match self {
            ObjectKind::Table => "TableTest.template",
            ObjectKind::View => "ViewTest.template",
            ObjectKind::Function => "FunctionTest.template",
            ObjectKind::Procedure => "ProcedureTest.template",
            ObjectKind::ExtendedProcedure => "ExtendedProcedureTest.template",
            ObjectKind::Sequence => "SequenceTest.template",
            ObjectKind::UserDefinedDataType => "UserDefinedDataTypeTest.template",
            ObjectKind::UserDefinedTableType => "UserDefinedTableTypeTest.template",
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ObjectKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        ObjectKind::ALL
            .into_iter()
            .find(|k| k.as_str() == normalized)
            .ok_or_else(|| CoreError::UnknownName {
                what: "object kind",
                value: s.to_string(),
                valid: ObjectKind::ALL
                    .iter()
                    .map(|k| k.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
            })
    }
}

/// A database object identified by schema, name and kind.
///
/// Ordering is (schema, name, kind) so sorted selections are stable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SchemaObject {
    /// Owning schema; empty for kinds resolved without one
    #[serde(default)]
    pub schema: String,

    /// Object name
    pub name: String,

    /// Object kind
    pub object_type: ObjectKind,
}

impl SchemaObject {
    /// Create a schema object
    pub fn new(schema: impl Into<String>, name: impl Into<String>, object_type: ObjectKind) -> Self {
        Self {
            schema: schema.into(),
            name: name.into(),
            object_type,
        }
    }

    /// `schema.name`, or just `name` when the kind or object has no schema
    pub fn qualified_name(&self) -> String {
        if !self.object_type.has_schema() || self.schema.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.schema, self.name)
        }
    }
}

impl fmt::Display for SchemaObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.object_type.phrase(), self.qualified_name())
    }
}

/// Schemas whose objects never get tests generated.
///
/// Built once per run from the framework schema literal plus every schema
/// carrying the framework's test-class marker.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionSet {
    schemas: BTreeSet<String>,
}

impl ExclusionSet {
    /// Exclusion set containing only the framework schema itself
    pub fn framework_only(framework_schema: &str) -> Self {
        Self::from_schemas([framework_schema.to_string()])
    }

    /// Exclusion set from an explicit list of schema names
    pub fn from_schemas(schemas: impl IntoIterator<Item = String>) -> Self {
        Self {
            schemas: schemas.into_iter().filter(|s| !s.is_empty()).collect(),
        }
    }

    /// Whether objects of this schema must be skipped
    pub fn is_excluded(&self, schema: &str) -> bool {
        self.schemas.contains(schema)
    }

    /// Excluded schema names in sorted order
    pub fn schemas(&self) -> impl Iterator<Item = &str> {
        self.schemas.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}

#[cfg(test)]
#[path = "object_test.rs"]
mod tests;
