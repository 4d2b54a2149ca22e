use pretty_assertions::assert_eq;
use resultmap::{
    dynamic::FetchContainer,
    results::{DomainResult, Fetch},
    ResultSetMapping,
};
use resultmap_core::{
    schema::db,
    stmt::{self, LockMode, Value},
    Schema,
};
use tests::*;

#[test]
fn order_root_reads_columns_by_name() {
    let schema = order_schema();
    let metadata = order_columns();

    let mut mapping = ResultSetMapping::new();
    mapping.add_root(&schema, "o", "Order").unwrap();

    let resolved = mapping.resolve(&schema, &metadata).unwrap();

    assert!(resolved.joins.is_empty());
    assert_eq!(resolved.table_groups.len(), 1);
    assert_eq!(resolved.table_groups[0].alias.as_deref(), Some("o"));
    assert_selections!(resolved, ["ORDER_ID", "TOTAL", "CUST_ID"]);

    let order = resolved.results[0].expect_entity();
    assert_eq!(order.alias.as_deref(), Some("o"));
    assert_eq!(order.path.to_string(), "Order(o)");
    assert_eq!(order.identifier.positions(), [0]);
    assert_eq!(order.discriminator, None);

    let total = order.fetch(fetchable(&schema, "Order", "total").id).unwrap();
    assert_eq!(total.positions(), [1]);

    // Not joined, so only the foreign key is read
    let customer = order
        .fetch(fetchable(&schema, "Order", "customer").id)
        .and_then(Fetch::as_delayed)
        .unwrap();
    assert_eq!(customer.key_positions, [2]);
    assert_eq!(customer.path.to_string(), "Order(o).customer");

    for name in ["lines", "tags", "notes"] {
        let plural = order
            .fetch(fetchable(&schema, "Order", name).id)
            .and_then(Fetch::as_plural)
            .unwrap();
        assert_eq!(plural.key_positions, [0]);
        assert!(plural.table_group.is_none());
        assert!(plural.element.is_none());
    }

    let row = [Value::I64(1), Value::from("9.99"), Value::I64(7)];
    assert_eq!(
        resolved.assemble(&row).unwrap(),
        [Value::Record(vec![
            Value::I64(1),
            Value::from("9.99"),
            Value::I64(7),
            Value::I64(1),
            Value::I64(1),
            Value::I64(1),
        ])]
    );
}

#[test]
fn declared_identifier_alias_adds_no_joins() {
    let schema = order_schema();
    let metadata = order_columns();

    let mut mapping = ResultSetMapping::new();
    mapping
        .add_root(&schema, "o", "Order")
        .unwrap()
        .add_id_column_aliases(["ORDER_ID"]);

    let resolved = mapping.resolve(&schema, &metadata).unwrap();
    let order = resolved.results[0].expect_entity();

    let identifier = order.identifier.as_basic().unwrap();
    let selection = &resolved.selections[identifier.values_array_position];
    assert_eq!(selection.column_name, "ORDER_ID");
    assert_eq!(selection.jdbc_position, 1);

    assert!(resolved.joins.is_empty());
    assert_eq!(resolved.table_groups.len(), 1);
}

#[test]
fn null_identifier_assembles_to_null() {
    let schema = order_schema();
    let metadata = order_columns();

    let mut mapping = ResultSetMapping::new();
    mapping.add_root(&schema, "o", "Order").unwrap();
    let resolved = mapping.resolve(&schema, &metadata).unwrap();

    let row = [Value::Null, Value::Null, Value::Null];
    assert_eq!(resolved.assemble(&row).unwrap(), [Value::Null]);
}

#[test]
fn explicit_id_aliases_take_precedence_over_id_builder() {
    let schema = order_schema();
    let order = schema.entity_named("Order").unwrap().id;
    let metadata = metadata(&[
        ("ORDER_ID", db::Type::BigInt),
        ("OID", db::Type::BigInt),
        ("TOTAL", db::Type::Numeric),
        ("CUST_ID", db::Type::BigInt),
    ]);

    let mut mapping = ResultSetMapping::new();
    let root = mapping.add_root(&schema, "o", "Order").unwrap();
    root.add_id_column_aliases(["OID"]);
    root.add_property_with_columns(schema.identifier_fetchable(order), &["ORDER_ID"])
        .unwrap();

    let resolved = mapping.resolve(&schema, &metadata).unwrap();
    let result = resolved.results[0].expect_entity();

    assert_eq!(result.identifier.positions(), [1]);

    // The collection key is the identifier column, already resolved
    let lines = result
        .fetch(fetchable(&schema, "Order", "lines").id)
        .unwrap();
    assert_eq!(lines.positions(), [1]);
}

#[test]
fn id_builder_aliases_apply_without_explicit_aliases() {
    let schema = order_schema();
    let order = schema.entity_named("Order").unwrap().id;
    let metadata = metadata(&[
        ("OID", db::Type::BigInt),
        ("TOTAL", db::Type::Numeric),
        ("CUST_ID", db::Type::BigInt),
    ]);

    let mut mapping = ResultSetMapping::new();
    mapping
        .add_root(&schema, "o", "Order")
        .unwrap()
        .add_property_with_columns(schema.identifier_fetchable(order), &["OID"])
        .unwrap();

    let resolved = mapping.resolve(&schema, &metadata).unwrap();
    assert_eq!(resolved.results[0].expect_entity().identifier.positions(), [0]);
}

#[test]
fn missing_identifier_column_fails() {
    let schema = order_schema();
    let metadata = metadata(&[("TOTAL", db::Type::Numeric)]);

    let mut mapping = ResultSetMapping::new();
    mapping.add_root(&schema, "o", "Order").unwrap();

    let err = assert_err!(mapping.resolve(&schema, &metadata));
    assert!(err.is_unknown_column());
}

#[test]
fn unknown_entity_is_rejected() {
    let schema = order_schema();

    let mut mapping = ResultSetMapping::new();
    let err = assert_err!(mapping.add_root(&schema, "x", "Invoice"));
    assert!(err.is_unknown_model());
    assert_eq!(mapping.number_of_result_builders(), 0);
}

#[test]
fn lock_mode_is_registered_for_the_alias() {
    let schema = order_schema();
    let metadata = order_columns();

    let mut mapping = ResultSetMapping::new();
    mapping
        .add_root(&schema, "o", "Order")
        .unwrap()
        .set_lock_mode(LockMode::PessimisticWrite);

    let resolved = mapping.resolve(&schema, &metadata).unwrap();

    assert_eq!(resolved.lock_modes.get("o"), Some(&LockMode::PessimisticWrite));
    assert_eq!(
        resolved.results[0].expect_entity().lock_mode,
        LockMode::PessimisticWrite
    );
}

fn payment_schema() -> Schema {
    let mut builder = Schema::builder();

    builder
        .entity("Payment", "PAYMENT")
        .identifier("id", stmt::Type::I64, "PAY_ID")
        .discriminator("KIND", stmt::Type::String)
        .basic("amount", stmt::Type::Decimal, "AMOUNT");

    builder.build().unwrap()
}

#[test]
fn discriminator_is_read_by_alias() {
    let schema = payment_schema();
    let metadata = metadata(&[
        ("PAY_ID", db::Type::BigInt),
        ("P_KIND", db::Type::VarChar),
        ("AMOUNT", db::Type::Numeric),
    ]);

    let mut mapping = ResultSetMapping::new();
    mapping
        .add_root(&schema, "p", "Payment")
        .unwrap()
        .set_discriminator_alias("P_KIND");

    let resolved = mapping.resolve(&schema, &metadata).unwrap();
    let payment = resolved.results[0].expect_entity();
    assert_eq!(payment.discriminator, Some(1));

    let row = [Value::I64(3), Value::from("CARD"), Value::from("10")];
    assert_eq!(
        resolved.assemble(&row).unwrap(),
        [Value::Record(vec![
            Value::I64(3),
            Value::from("CARD"),
            Value::from("10"),
        ])]
    );
}

#[test]
fn discriminator_defaults_to_its_column_name() {
    let schema = payment_schema();
    let metadata = metadata(&[
        ("KIND", db::Type::VarChar),
        ("PAY_ID", db::Type::BigInt),
        ("AMOUNT", db::Type::Numeric),
    ]);

    let mut mapping = ResultSetMapping::new();
    mapping.add_root(&schema, "p", "Payment").unwrap();

    let resolved = mapping.resolve(&schema, &metadata).unwrap();
    assert_eq!(resolved.results[0].expect_entity().discriminator, Some(0));
}

#[test]
fn discriminator_alias_without_discriminator_fails() {
    let schema = order_schema();
    let metadata = order_columns();

    let mut mapping = ResultSetMapping::new();
    mapping
        .add_root(&schema, "o", "Order")
        .unwrap()
        .set_discriminator_alias("KIND");

    let err = assert_err!(mapping.resolve(&schema, &metadata));
    assert!(err.is_illegal_state());
}

#[test]
fn result_types_follow_the_projection() {
    let schema = order_schema();
    let metadata = order_columns();
    let order = schema.entity_named("Order").unwrap().id;

    let mut mapping = ResultSetMapping::new();
    mapping.add_root(&schema, "o", "Order").unwrap();
    mapping.add_scalar("TOTAL");

    let resolved = mapping.resolve(&schema, &metadata).unwrap();
    assert_eq!(
        resolved.result_types(),
        [stmt::Type::Model(order), stmt::Type::Decimal]
    );
    assert!(matches!(resolved.results[1], DomainResult::Basic(_)));
}
