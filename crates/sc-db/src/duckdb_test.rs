use super::*;

fn sales_catalog() -> DuckDbCatalog {
    let catalog = DuckDbCatalog::in_memory().unwrap();
    catalog
        .execute_batch(
            "CREATE SCHEMA Sales;
             CREATE TABLE Sales.Orders (Name VARCHAR, Id INTEGER, Amount DECIMAL(10, 2));
             CREATE TABLE Sales.Customers (Id INTEGER);
             CREATE INDEX IX_Orders_Name ON Sales.Orders (Name);
             CREATE VIEW Sales.vOrders AS SELECT Id FROM Sales.Orders;
             CREATE SCHEMA tSQLt;
             CREATE TABLE tSQLt.Private_Configurations (Name VARCHAR);",
        )
        .unwrap();
    catalog
}

#[tokio::test]
async fn test_in_memory() {
    let catalog = DuckDbCatalog::in_memory().unwrap();
    assert_eq!(catalog.backend(), "duckdb");
    assert_eq!(catalog.database_name().await.unwrap(), "memory");
}

#[tokio::test]
async fn test_open_unknown_database_is_connection_error() {
    let result = DuckDbCatalog::open(":memory:", Some("no_such_db"));
    assert!(matches!(result, Err(DbError::ConnectionError(_))));
}

#[tokio::test]
async fn test_list_tables_excludes_views() {
    let catalog = sales_catalog();
    let tables = catalog.list_objects(ObjectKind::Table).await.unwrap();
    let names: Vec<String> = tables.iter().map(|t| t.qualified_name()).collect();
    assert_eq!(
        names,
        vec![
            "Sales.Customers",
            "Sales.Orders",
            "tSQLt.Private_Configurations"
        ]
    );
    assert!(tables.iter().all(|t| t.object_type == ObjectKind::Table));
}

#[tokio::test]
async fn test_list_views() {
    let catalog = sales_catalog();
    let views = catalog.list_objects(ObjectKind::View).await.unwrap();
    assert_eq!(views, vec![SchemaObject::new("Sales", "vOrders", ObjectKind::View)]);
}

#[tokio::test]
async fn test_list_procedures_is_empty() {
    let catalog = sales_catalog();
    assert!(catalog
        .list_objects(ObjectKind::Procedure)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_excluded_schemas_contains_framework_schema() {
    let catalog = sales_catalog();
    let excluded = catalog
        .excluded_schemas(&FrameworkConfig::default())
        .await
        .unwrap();
    assert!(excluded.is_excluded("tSQLt"));
    assert!(!excluded.is_excluded("Sales"));
}

#[tokio::test]
async fn test_columns_ordered_by_name() {
    let catalog = sales_catalog();
    let orders = SchemaObject::new("Sales", "Orders", ObjectKind::Table);
    let columns = catalog
        .fetch_attributes(&AttributeKind::Columns, &orders)
        .await
        .unwrap();
    let names: Vec<&str> = columns.iter().map(|c| c.name()).collect();
    assert_eq!(names, vec!["Amount", "Id", "Name"]);

    match &columns[0] {
        AttributeRow::Column {
            precision, scale, ..
        } => {
            assert_eq!(*precision, 10);
            assert_eq!(*scale, 2);
        }
        other => panic!("expected column row, got {other:?}"),
    }
}

#[tokio::test]
async fn test_view_columns() {
    let catalog = sales_catalog();
    let view = SchemaObject::new("Sales", "vOrders", ObjectKind::View);
    let columns = catalog
        .fetch_attributes(&AttributeKind::Columns, &view)
        .await
        .unwrap();
    assert_eq!(columns.len(), 1);
    assert_eq!(columns[0].name(), "Id");
}

#[tokio::test]
async fn test_columns_of_missing_object_is_empty() {
    let catalog = sales_catalog();
    let missing = SchemaObject::new("Sales", "Nope", ObjectKind::Table);
    assert!(catalog
        .fetch_attributes(&AttributeKind::Columns, &missing)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_indexes_and_index_columns() {
    let catalog = sales_catalog();
    let orders = SchemaObject::new("Sales", "Orders", ObjectKind::Table);
    let indexes = catalog
        .fetch_attributes(&AttributeKind::Indexes, &orders)
        .await
        .unwrap();
    assert_eq!(indexes, vec![AttributeRow::index("IX_Orders_Name")]);

    let columns = catalog
        .fetch_attributes(
            &AttributeKind::IndexColumns {
                index: "IX_Orders_Name".to_string(),
            },
            &orders,
        )
        .await
        .unwrap();
    assert_eq!(columns.len(), 1);
    assert_eq!(columns[0].name(), "Name");
}

#[tokio::test]
async fn test_macro_without_parameters_has_no_parameter_rows() {
    let catalog = DuckDbCatalog::in_memory().unwrap();
    catalog
        .execute_batch("CREATE MACRO answer() AS 42; CREATE MACRO add_one(x) AS x + 1;")
        .unwrap();

    let functions = catalog.list_objects(ObjectKind::Function).await.unwrap();
    let names: Vec<&str> = functions.iter().map(|f| f.name.as_str()).collect();
    assert!(names.contains(&"answer"));
    assert!(names.contains(&"add_one"));

    let answer = SchemaObject::new("main", "answer", ObjectKind::Function);
    assert!(catalog
        .fetch_attributes(&AttributeKind::Parameters, &answer)
        .await
        .unwrap()
        .is_empty());

    let add_one = SchemaObject::new("main", "add_one", ObjectKind::Function);
    let params = catalog
        .fetch_attributes(&AttributeKind::Parameters, &add_one)
        .await
        .unwrap();
    assert_eq!(params.len(), 1);
    assert_eq!(params[0].name(), "x");
}

fn keys_catalog() -> DuckDbCatalog {
    let catalog = DuckDbCatalog::in_memory().unwrap();
    catalog
        .execute_batch(
            "CREATE TABLE parent (id INTEGER PRIMARY KEY);
             CREATE TABLE child (cid INTEGER PRIMARY KEY, pid INTEGER REFERENCES parent(id));",
        )
        .unwrap();
    catalog
}

#[tokio::test]
async fn test_foreign_keys() {
    let catalog = keys_catalog();
    let child = SchemaObject::new("main", "child", ObjectKind::Table);
    let keys = catalog
        .fetch_attributes(&AttributeKind::ForeignKeys, &child)
        .await
        .unwrap();
    assert_eq!(
        keys,
        vec![AttributeRow::ForeignKey {
            source_schema: "main".to_string(),
            source_table: "child".to_string(),
            fk_name: "child_pid_id_fkey".to_string(),
            source_column: "pid".to_string(),
            is_disabled: false,
            is_not_for_replication: false,
            is_published: false,
            update_action: "NO_ACTION".to_string(),
            delete_action: "NO_ACTION".to_string(),
            target_column: "id".to_string(),
            target_schema: "main".to_string(),
            target_table: "parent".to_string(),
        }]
    );
}

#[tokio::test]
async fn test_constraints() {
    let catalog = keys_catalog();
    let child = SchemaObject::new("main", "child", ObjectKind::Table);
    let constraints = catalog
        .fetch_attributes(&AttributeKind::Constraints, &child)
        .await
        .unwrap();

    let mut types = Vec::new();
    for row in &constraints {
        match row {
            AttributeRow::Constraint {
                schema,
                table,
                constraint_type,
                ..
            } => {
                assert_eq!(schema, "main");
                assert_eq!(table, "child");
                types.push(constraint_type.as_str());
            }
            other => panic!("expected constraint row, got {other:?}"),
        }
    }
    for expected in ["PRIMARY KEY", "FOREIGN KEY", "NOT NULL"] {
        assert!(types.contains(&expected), "{expected} missing from {types:?}");
    }
}

#[test]
fn test_parse_index_columns() {
    let cols = parse_index_columns("CREATE INDEX ix ON t(a, \"b\" DESC, lower(c));");
    assert_eq!(
        cols,
        vec![
            AttributeRow::IndexColumn {
                name: "a".to_string(),
                key_ordinal: 1,
                is_descending: false,
                is_included: false,
            },
            AttributeRow::IndexColumn {
                name: "b".to_string(),
                key_ordinal: 2,
                is_descending: true,
                is_included: false,
            },
            AttributeRow::IndexColumn {
                name: "lower(c)".to_string(),
                key_ordinal: 3,
                is_descending: false,
                is_included: false,
            },
        ]
    );
}

#[test]
fn test_parse_index_columns_without_parens() {
    assert!(parse_index_columns("CREATE INDEX ix").is_empty());
}

#[test]
fn test_parse_index_columns_skips_quoted_names() {
    let cols = parse_index_columns("CREATE INDEX \"ix(1\" ON \"t(x)\"(a, \"b,\"\"c\" DESC);");
    assert_eq!(
        cols,
        vec![
            AttributeRow::IndexColumn {
                name: "a".to_string(),
                key_ordinal: 1,
                is_descending: false,
                is_included: false,
            },
            AttributeRow::IndexColumn {
                name: "b,\"c".to_string(),
                key_ordinal: 2,
                is_descending: true,
                is_included: false,
            },
        ]
    );
}
