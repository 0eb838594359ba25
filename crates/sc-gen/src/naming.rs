//! Test categories and deterministic test names

use sc_core::{AttributeKind, ObjectKind, SchemaObject};
use serde::Serialize;
use std::fmt;

/// Longest test name the test framework accepts
pub const MAX_TEST_NAME_LEN: usize = 128;

/// What a generated test asserts
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TestCategory {
    DatabaseCollation,
    Existence(ObjectKind),
    TableColumns,
    ViewColumns,
    FunctionParameters,
    ProcedureParameters,
    TableIndexes,
    IndexColumns { index: String },
    TableConstraints,
    ForeignKeys,
}

impl TestCategory {
    /// Template the test is rendered from
    pub fn template(&self) -> &'static str {
        match self {
            TestCategory::DatabaseCollation => "DatabaseCollationTest.template",
            TestCategory::Existence(kind) => kind.existence_template(),
            TestCategory::TableColumns => "TableColumnTest.template",
            TestCategory::ViewColumns => "ViewColumnTest.template",
            TestCategory::FunctionParameters => "FunctionParameterTest.template",
            TestCategory::ProcedureParameters => "ProcedureParameterTest.template",
            TestCategory::TableIndexes => "TableIndexTest.template",
            TestCategory::IndexColumns { .. } => "IndexColumnTest.template",
            TestCategory::TableConstraints => "TableConstraintTest.template",
            TestCategory::ForeignKeys => "ForeignKeyTest.template",
        }
    }

    /// Metadata the test is built from; `None` for tests that need none
    pub fn attribute_kind(&self) -> Option<AttributeKind> {
        match self {
            TestCategory::DatabaseCollation | TestCategory::Existence(_) => None,
            TestCategory::TableColumns | TestCategory::ViewColumns => Some(AttributeKind::Columns),
            TestCategory::FunctionParameters | TestCategory::ProcedureParameters => {
                Some(AttributeKind::Parameters)
            }
            TestCategory::TableIndexes => Some(AttributeKind::Indexes),
            TestCategory::IndexColumns { index } => Some(AttributeKind::IndexColumns {
                index: index.clone(),
            }),
            TestCategory::TableConstraints => Some(AttributeKind::Constraints),
            TestCategory::ForeignKeys => Some(AttributeKind::ForeignKeys),
        }
    }

    /// Data-block token filled from the metadata rows
    pub fn data_token(&self) -> Option<&'static str> {
        use sc_template::tokens;
        match self {
            TestCategory::DatabaseCollation | TestCategory::Existence(_) => None,
            TestCategory::TableColumns
            | TestCategory::ViewColumns
            | TestCategory::IndexColumns { .. } => Some(tokens::COLUMNS),
            TestCategory::FunctionParameters | TestCategory::ProcedureParameters => {
                Some(tokens::PARAMETERS)
            }
            TestCategory::TableIndexes => Some(tokens::INDEXES),
            TestCategory::TableConstraints => Some(tokens::CONSTRAINTS),
            TestCategory::ForeignKeys => Some(tokens::FOREIGNKEYS),
        }
    }

    /// Short label used in results and reports
    pub fn label(&self) -> &'static str {
        match self {
            TestCategory::DatabaseCollation => "collation",
            TestCategory::Existence(_) => "existence",
            TestCategory::TableColumns | TestCategory::ViewColumns => "columns",
            TestCategory::FunctionParameters | TestCategory::ProcedureParameters => "parameters",
            TestCategory::TableIndexes => "indexes",
            TestCategory::IndexColumns { .. } => "index columns",
            TestCategory::TableConstraints => "constraints",
            TestCategory::ForeignKeys => "foreign keys",
        }
    }

    fn predicate(&self) -> &'static str {
        match self {
            TestCategory::Existence(_) => "exists",
            TestCategory::DatabaseCollation => "has the correct collation",
            TestCategory::TableColumns
            | TestCategory::ViewColumns
            | TestCategory::IndexColumns { .. } => "has the correct columns",
            TestCategory::FunctionParameters | TestCategory::ProcedureParameters => {
                "has the correct parameters"
            }
            TestCategory::TableIndexes => "has the correct indexes",
            TestCategory::TableConstraints => "has the correct constraints",
            TestCategory::ForeignKeys => "has the correct foreign keys",
        }
    }
}

impl fmt::Display for TestCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// What a generated test is about
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "target", rename_all = "snake_case")]
pub enum TestTarget {
    Database { name: String },
    Object(SchemaObject),
}

impl TestTarget {
    pub fn object(&self) -> Option<&SchemaObject> {
        match self {
            TestTarget::Object(object) => Some(object),
            TestTarget::Database { .. } => None,
        }
    }
}

impl fmt::Display for TestTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TestTarget::Database { name } => write!(f, "database {name}"),
            TestTarget::Object(object) => write!(f, "{object}"),
        }
    }
}

/// Test name for a category and target:
/// `test If <subject> <qualified name> <predicate>`.
pub fn test_name(category: &TestCategory, target: &TestTarget) -> String {
    let subject = match (category, target) {
        (_, TestTarget::Database { name }) => format!("database {name}"),
        (TestCategory::IndexColumns { index }, TestTarget::Object(object)) => {
            format!("index {}.{}", object.qualified_name(), index)
        }
        (_, TestTarget::Object(object)) => {
            format!("{} {}", object.object_type.phrase(), object.qualified_name())
        }
    };
    format!("test If {} {}", subject, category.predicate())
}

#[cfg(test)]
#[path = "naming_test.rs"]
mod tests;
