use pretty_assertions::assert_eq;
use resultmap::{
    dynamic::{DynamicResultBuilderEntityCalculated, RootReturn},
    ResultSetMapping,
};
use resultmap_core::stmt::{LockMode, Value};
use tests::*;

#[test]
fn calculated_entity_reads_columns_by_name() {
    let schema = order_schema();
    let metadata = order_columns();

    let mut mapping = ResultSetMapping::new();
    mapping
        .add_entity(&schema, "o", "Order", Some(LockMode::PessimisticWrite))
        .unwrap();

    let resolved = mapping.resolve(&schema, &metadata).unwrap();
    let order = resolved.results[0].expect_entity();

    assert_eq!(order.identifier.positions(), [0]);
    assert_eq!(order.lock_mode, LockMode::PessimisticWrite);
    assert_eq!(resolved.lock_modes.get("o"), Some(&LockMode::PessimisticWrite));

    let row = [Value::I64(9), Value::from("1.00"), Value::Null];
    assert_eq!(
        resolved.assemble(&row).unwrap(),
        [Value::Record(vec![
            Value::I64(9),
            Value::from("1.00"),
            Value::Null,
            Value::I64(9),
            Value::I64(9),
            Value::I64(9),
        ])]
    );
}

#[test]
fn calculated_entity_can_own_joins() {
    let schema = order_schema();
    let metadata = metadata(&[
        ("ORDER_ID", resultmap_core::schema::db::Type::BigInt),
        ("TOTAL", resultmap_core::schema::db::Type::Numeric),
        ("CUST_ID", resultmap_core::schema::db::Type::BigInt),
        ("NAME", resultmap_core::schema::db::Type::VarChar),
        ("STREET", resultmap_core::schema::db::Type::VarChar),
        ("CITY", resultmap_core::schema::db::Type::VarChar),
    ]);

    let mut mapping = ResultSetMapping::new();
    mapping.add_entity(&schema, "o", "Order", None).unwrap();
    mapping.add_join(&schema, "c", "o", "customer").unwrap();

    let resolved = mapping.resolve(&schema, &metadata).unwrap();
    assert_eq!(resolved.joins.len(), 1);
    assert!(resolved.lock_modes.is_empty());
}

#[test]
fn calculated_entity_rejects_customization() {
    let schema = order_schema();

    let mut builder = DynamicResultBuilderEntityCalculated::new(&schema, "Order", "o", None).unwrap();

    assert_eq!(builder.navigable_path().to_string(), "Order(o)");
    assert_eq!(RootReturn::table_alias(&builder), "o");

    let err = assert_err!(builder.try_add_property(&schema, "total", &["X_COL"]));
    assert!(err.is_unsupported_operation());
    assert_eq!(
        err.to_string(),
        "unsupported operation: declaring properties is not supported for calculated entity `Order` (alias `o`)"
    );

    assert!(builder
        .try_set_lock_mode(LockMode::Read)
        .unwrap_err()
        .is_unsupported_operation());
    assert!(builder
        .try_add_id_column_aliases(&["OID"])
        .unwrap_err()
        .is_unsupported_operation());
    assert!(builder
        .try_set_discriminator_alias("KIND")
        .unwrap_err()
        .is_unsupported_operation());

    assert_eq!(builder.lock_mode(), None);
}

#[test]
fn standard_root_accepts_customization_through_root_return() {
    let schema = order_schema();
    let metadata = metadata(&[
        ("OID", resultmap_core::schema::db::Type::BigInt),
        ("X_COL", resultmap_core::schema::db::Type::Numeric),
        ("CUST_ID", resultmap_core::schema::db::Type::BigInt),
    ]);

    let mut mapping = ResultSetMapping::new();
    let root = mapping.add_root(&schema, "o", "Order").unwrap();

    let root: &mut dyn RootReturn = root;
    root.try_add_id_column_aliases(&["OID"]).unwrap();
    root.try_add_property(&schema, "total", &["X_COL"]).unwrap();
    root.try_set_lock_mode(LockMode::Optimistic).unwrap();
    assert_eq!(root.lock_mode(), Some(LockMode::Optimistic));

    let resolved = mapping.resolve(&schema, &metadata).unwrap();
    let order = resolved.results[0].expect_entity();
    assert_eq!(order.identifier.positions(), [0]);
    assert_eq!(resolved.lock_modes.get("o"), Some(&LockMode::Optimistic));
    assert_selections!(resolved, ["OID", "X_COL", "CUST_ID"]);
}

#[test]
fn unknown_calculated_entity_is_rejected() {
    let schema = order_schema();

    let mut mapping = ResultSetMapping::new();
    let err = assert_err!(mapping.add_entity(&schema, "a", "Address", None));
    assert!(err.is_unknown_model());
}
