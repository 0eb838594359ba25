use super::*;

#[test]
fn test_qualified_name_with_schema() {
    let obj = SchemaObject::new("Sales", "Orders", ObjectKind::Table);
    assert_eq!(obj.qualified_name(), "Sales.Orders");
    assert_eq!(obj.to_string(), "table Sales.Orders");
}

#[test]
fn test_qualified_name_extended_procedure_drops_schema() {
    let obj = SchemaObject::new("dbo", "xp_cmdshell", ObjectKind::ExtendedProcedure);
    assert_eq!(obj.qualified_name(), "xp_cmdshell");
}

#[test]
fn test_qualified_name_empty_schema() {
    let obj = SchemaObject::new("", "Orders", ObjectKind::Table);
    assert_eq!(obj.qualified_name(), "Orders");
}

#[test]
fn test_object_kind_from_str() {
    assert_eq!("table".parse::<ObjectKind>().unwrap(), ObjectKind::Table);
    assert_eq!(
        "Extended-Procedure".parse::<ObjectKind>().unwrap(),
        ObjectKind::ExtendedProcedure
    );
    let err = "trigger".parse::<ObjectKind>().unwrap_err();
    assert!(err.to_string().contains("trigger"));
    assert!(err.to_string().contains("user_defined_table_type"));
}

#[test]
fn test_object_kind_serde_names() {
    let obj = SchemaObject::new("dbo", "F1", ObjectKind::UserDefinedDataType);
    let json = serde_json::to_string(&obj).unwrap();
    assert_eq!(
        json,
        r#"{"schema":"dbo","name":"F1","object_type":"user_defined_data_type"}"#
    );
    let back: SchemaObject = serde_json::from_str(&json).unwrap();
    assert_eq!(back, obj);
}

#[test]
fn test_schema_object_deserialize_without_schema() {
    let obj: SchemaObject =
        serde_json::from_str(r#"{"name":"xp_msver","object_type":"extended_procedure"}"#).unwrap();
    assert_eq!(obj.schema, "");
    assert_eq!(obj.qualified_name(), "xp_msver");
}

#[test]
fn test_ordering_is_schema_then_name() {
    let mut objs = vec![
        SchemaObject::new("b", "a", ObjectKind::Table),
        SchemaObject::new("a", "z", ObjectKind::Table),
        SchemaObject::new("a", "b", ObjectKind::Table),
    ];
    objs.sort();
    let names: Vec<String> = objs.iter().map(|o| o.qualified_name()).collect();
    assert_eq!(names, vec!["a.b", "a.z", "b.a"]);
}

#[test]
fn test_exclusion_set() {
    let set = ExclusionSet::from_schemas(vec![
        "tSQLt".to_string(),
        "SalesTests".to_string(),
        String::new(),
    ]);
    assert_eq!(set.len(), 2);
    assert!(set.is_excluded("tSQLt"));
    assert!(set.is_excluded("SalesTests"));
    assert!(!set.is_excluded("Sales"));
    assert!(!set.is_excluded(""));
}

#[test]
fn test_exclusion_set_framework_only() {
    let set = ExclusionSet::framework_only("tSQLt");
    assert_eq!(set.schemas().collect::<Vec<_>>(), vec!["tSQLt"]);
}
