//! Catalog trait definition

use crate::error::DbResult;
use async_trait::async_trait;
use sc_core::{AttributeKind, AttributeRow, ExclusionSet, FrameworkConfig, ObjectKind, SchemaObject};

/// Read-only access to a database engine's catalog.
///
/// Every method runs one fixed query. Implementations must be Send + Sync
/// so a single connection can be shared for the whole run.
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Backend identifier for logging
    fn backend(&self) -> &'static str;

    /// Name of the connected database
    async fn database_name(&self) -> DbResult<String>;

    /// Default collation of the connected database
    async fn database_collation(&self) -> DbResult<String>;

    /// Schemas owned by the test framework: every schema carrying the
    /// framework's marker plus the framework schema itself
    async fn excluded_schemas(&self, framework: &FrameworkConfig) -> DbResult<ExclusionSet>;

    /// All non-system objects of a kind
    async fn list_objects(&self, kind: ObjectKind) -> DbResult<Vec<SchemaObject>>;

    /// Structural facts of one object.
    ///
    /// An object with no facts of the requested kind yields an empty
    /// vector, not an error.
    async fn fetch_attributes(
        &self,
        kind: &AttributeKind,
        object: &SchemaObject,
    ) -> DbResult<Vec<AttributeRow>>;
}
