//! In-memory catalog for tests
//!
//! Holds a fixed set of objects and attribute rows, and can be told to fail
//! specific fetches so partial-failure handling can be exercised.

use crate::error::{DbError, DbResult};
use crate::traits::Catalog;
use async_trait::async_trait;
use sc_core::{AttributeKind, AttributeRow, ExclusionSet, FrameworkConfig, ObjectKind, SchemaObject};
use std::collections::{HashMap, HashSet};

/// Catalog backed by in-memory fixtures
#[derive(Debug, Default)]
pub struct MemoryCatalog {
    database: String,
    collation: String,
    objects: Vec<SchemaObject>,
    marked_schemas: Vec<String>,
    attributes: HashMap<(SchemaObject, AttributeKind), Vec<AttributeRow>>,
    failures: HashSet<(SchemaObject, AttributeKind)>,
    fail_listing: HashSet<ObjectKind>,
    fail_connection: bool,
}

impl MemoryCatalog {
    /// Empty catalog for a database name
    pub fn new(database: &str) -> Self {
        Self {
            database: database.to_string(),
            collation: "SQL_Latin1_General_CP1_CI_AS".to_string(),
            ..Self::default()
        }
    }

    pub fn with_collation(mut self, collation: &str) -> Self {
        self.collation = collation.to_string();
        self
    }

    /// Register an object
    pub fn with_object(mut self, object: SchemaObject) -> Self {
        if !self.objects.contains(&object) {
            self.objects.push(object);
        }
        self
    }

    /// Mark a schema with the framework's test-class marker
    pub fn with_marked_schema(mut self, schema: &str) -> Self {
        self.marked_schemas.push(schema.to_string());
        self
    }

    /// Register an object along with its rows of one attribute kind.
    ///
    /// Column rows are kept ordered by name, like the catalog query orders
    /// them.
    pub fn with_attributes(
        mut self,
        object: SchemaObject,
        kind: AttributeKind,
        mut rows: Vec<AttributeRow>,
    ) -> Self {
        if kind == AttributeKind::Columns {
            rows.sort_by(|a, b| a.name().cmp(b.name()));
        }
        self = self.with_object(object.clone());
        self.attributes.insert((object, kind), rows);
        self
    }

    /// Make fetching `kind` for `object` fail
    pub fn with_failure(mut self, object: SchemaObject, kind: AttributeKind) -> Self {
        self = self.with_object(object.clone());
        self.failures.insert((object, kind));
        self
    }

    /// Make every database-level query fail as if the server were unreachable
    pub fn with_connection_failure(mut self) -> Self {
        self.fail_connection = true;
        self
    }

    /// Make listing objects of `kind` fail
    pub fn with_listing_failure(mut self, kind: ObjectKind) -> Self {
        self.fail_listing.insert(kind);
        self
    }

    fn check_connection(&self) -> DbResult<()> {
        if self.fail_connection {
            return Err(DbError::ConnectionError(format!(
                "cannot reach database {}",
                self.database
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl Catalog for MemoryCatalog {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn database_name(&self) -> DbResult<String> {
        self.check_connection()?;
        Ok(self.database.clone())
    }

    async fn database_collation(&self) -> DbResult<String> {
        self.check_connection()?;
        Ok(self.collation.clone())
    }

    async fn excluded_schemas(&self, framework: &FrameworkConfig) -> DbResult<ExclusionSet> {
        self.check_connection()?;
        Ok(ExclusionSet::from_schemas(
            self.marked_schemas
                .iter()
                .cloned()
                .chain(std::iter::once(framework.schema.clone())),
        ))
    }

    async fn list_objects(&self, kind: ObjectKind) -> DbResult<Vec<SchemaObject>> {
        if self.fail_listing.contains(&kind) {
            return Err(DbError::ExecutionError(format!(
                "listing {} objects failed",
                kind.phrase()
            )));
        }
        Ok(self
            .objects
            .iter()
            .filter(|o| o.object_type == kind)
            .cloned()
            .collect())
    }

    async fn fetch_attributes(
        &self,
        kind: &AttributeKind,
        object: &SchemaObject,
    ) -> DbResult<Vec<AttributeRow>> {
        let key = (object.clone(), kind.clone());
        if self.failures.contains(&key) {
            return Err(DbError::ExecutionError(format!(
                "fetching {kind} of {object} failed"
            )));
        }
        Ok(self.attributes.get(&key).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_catalog_roundtrip() {
        let orders = SchemaObject::new("Sales", "Orders", ObjectKind::Table);
        let catalog = MemoryCatalog::new("DB1")
            .with_marked_schema("SalesTests")
            .with_attributes(
                orders.clone(),
                AttributeKind::Columns,
                vec![
                    AttributeRow::column("Name", "nvarchar", 100, 0, 0),
                    AttributeRow::column("Id", "int", 4, 10, 0),
                ],
            );

        assert_eq!(catalog.database_name().await.unwrap(), "DB1");
        assert_eq!(
            catalog.list_objects(ObjectKind::Table).await.unwrap(),
            vec![orders.clone()]
        );
        let columns = catalog
            .fetch_attributes(&AttributeKind::Columns, &orders)
            .await
            .unwrap();
        assert_eq!(columns[0].name(), "Id");
        assert!(catalog
            .fetch_attributes(&AttributeKind::Indexes, &orders)
            .await
            .unwrap()
            .is_empty());

        let excluded = catalog
            .excluded_schemas(&FrameworkConfig::default())
            .await
            .unwrap();
        assert!(excluded.is_excluded("SalesTests"));
        assert!(excluded.is_excluded("tSQLt"));
    }

    #[tokio::test]
    async fn test_memory_catalog_failure() {
        let orders = SchemaObject::new("Sales", "Orders", ObjectKind::Table);
        let catalog = MemoryCatalog::new("DB1").with_failure(orders.clone(), AttributeKind::Columns);
        let err = catalog
            .fetch_attributes(&AttributeKind::Columns, &orders)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("table Sales.Orders"));
    }
}
