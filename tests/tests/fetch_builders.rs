use pretty_assertions::assert_eq;
use resultmap::{
    dynamic::{
        DynamicFetchBuilderStandard, DynamicResultBuilderEntityStandard, FetchBuilder,
        FetchContainer,
    },
    results::Fetch,
    ResultSetMapping,
};
use resultmap_core::{
    schema::db,
    stmt::{NavigablePath, Value},
};
use tests::*;

fn customer_columns(street: &str, city: &str) -> resultmap::engine::ResultSetMetadata {
    metadata(&[
        ("CUST_ID", db::Type::BigInt),
        ("NAME", db::Type::VarChar),
        (street, db::Type::VarChar),
        (city, db::Type::VarChar),
    ])
}

#[test]
fn basic_property_reads_its_alias() {
    let schema = order_schema();
    let metadata = metadata(&[
        ("ORDER_ID", db::Type::BigInt),
        ("X_COL", db::Type::Numeric),
        ("CUST_ID", db::Type::BigInt),
    ]);

    let mut mapping = ResultSetMapping::new();
    mapping
        .add_root(&schema, "o", "Order")
        .unwrap()
        .add_property_path(&schema, "total")
        .unwrap()
        .add_column_alias("X_COL");

    let resolved = mapping.resolve(&schema, &metadata).unwrap();
    let order = resolved.results[0].expect_entity();

    let total = order
        .fetch(fetchable(&schema, "Order", "total").id)
        .and_then(Fetch::as_basic)
        .unwrap();
    assert_eq!(total.values_array_position, 1);
    assert_selections!(resolved, ["ORDER_ID", "X_COL", "CUST_ID"]);
}

#[test]
fn embedded_property_pairs_aliases_positionally() {
    let schema = order_schema();
    let metadata = customer_columns("C_STREET", "C_CITY");

    let mut mapping = ResultSetMapping::new();
    mapping
        .add_root(&schema, "c", "Customer")
        .unwrap()
        .add_property_with_columns(fetchable(&schema, "Customer", "address"), &["C_STREET", "C_CITY"])
        .unwrap();

    let resolved = mapping.resolve(&schema, &metadata).unwrap();
    let customer = resolved.results[0].expect_entity();

    let address = customer
        .fetch(fetchable(&schema, "Customer", "address").id)
        .and_then(Fetch::as_embedded)
        .unwrap();
    let positions: Vec<_> = address.fetches.iter().flat_map(Fetch::positions).collect();
    assert_eq!(positions, [2, 3]);
    assert_eq!(address.fetches[1].path().to_string(), "Customer(c).address.city");

    let row = [
        Value::I64(5),
        Value::from("Ada"),
        Value::from("Main St"),
        Value::from("Springfield"),
    ];
    assert_eq!(
        resolved.assemble(&row).unwrap(),
        [Value::Record(vec![
            Value::I64(5),
            Value::from("Ada"),
            Value::Record(vec![Value::from("Main St"), Value::from("Springfield")]),
        ])]
    );
}

#[test]
fn too_few_aliases_fail() {
    let schema = order_schema();
    let metadata = customer_columns("C_STREET", "C_CITY");

    let mut mapping = ResultSetMapping::new();
    mapping
        .add_root(&schema, "c", "Customer")
        .unwrap()
        .add_property_with_columns(fetchable(&schema, "Customer", "address"), &["C_STREET"])
        .unwrap();

    let err = assert_err!(mapping.resolve(&schema, &metadata));
    assert!(err.is_column_index_out_of_range());
}

#[test]
fn duplicate_property_is_rejected() {
    let schema = order_schema();
    let total = fetchable(&schema, "Order", "total");

    let mut mapping = ResultSetMapping::new();
    let root = mapping.add_root(&schema, "o", "Order").unwrap();
    root.add_property_with_columns(total, &["X_COL"]).unwrap();

    let err = assert_err!(root.add_property(total));
    assert!(err.is_duplicate_fetch_builder());
    assert_eq!(
        err.to_string(),
        "fetch builder for `Order.total` already exists: standard(total, [X_COL])"
    );

    // The first declaration is intact
    assert_eq!(
        root.find_fetch_builder(total.id).unwrap().column_aliases(),
        Some(&["X_COL".to_string()][..])
    );
}

#[test]
fn add_fetch_builder_replaces_the_previous_builder() {
    let schema = order_schema();
    let total = fetchable(&schema, "Order", "total");
    let metadata = metadata(&[
        ("ORDER_ID", db::Type::BigInt),
        ("X_COL", db::Type::Numeric),
        ("Y_COL", db::Type::Numeric),
        ("CUST_ID", db::Type::BigInt),
    ]);

    let mut mapping = ResultSetMapping::new();
    let root = mapping.add_root(&schema, "o", "Order").unwrap();
    root.add_property_with_columns(total, &["X_COL"]).unwrap();

    let mut replacement = DynamicFetchBuilderStandard::new(total);
    replacement.add_column_alias("Y_COL");
    root.add_fetch_builder(total.id, replacement);

    let mut count = 0;
    root.visit_fetch_builders(|_, _| count += 1);
    assert_eq!(count, 1);

    let resolved = mapping.resolve(&schema, &metadata).unwrap();
    let total = resolved.results[0]
        .expect_entity()
        .fetch(total.id)
        .unwrap();
    assert_eq!(total.positions(), [2]);
}

#[test]
fn nested_embedded_path_declares_a_join_builder() {
    let schema = order_schema();
    let address = fetchable(&schema, "Customer", "address");
    let metadata = customer_columns("STREET", "C_CITY");

    let mut mapping = ResultSetMapping::new();
    let root = mapping.add_root(&schema, "c", "Customer").unwrap();
    root.add_property_path(&schema, "address.city")
        .unwrap()
        .add_column_alias("C_CITY");

    let join = root
        .find_fetch_builder(address.id)
        .and_then(FetchBuilder::as_legacy)
        .unwrap();
    assert_eq!(join.role(), "Customer.address");
    assert_eq!(join.owner_table_alias(), "c");
    assert_eq!(join.fetch_builders().len(), 1);

    let resolved = mapping.resolve(&schema, &metadata).unwrap();
    let address = resolved.results[0]
        .expect_entity()
        .fetch(address.id)
        .unwrap();
    assert_eq!(address.positions(), [2, 3]);

    // Embeddables never join
    assert!(resolved.joins.is_empty());
}

#[test]
fn nested_path_through_a_basic_attribute_is_unsupported() {
    let schema = order_schema();

    let mut mapping = ResultSetMapping::new();
    let root = mapping.add_root(&schema, "c", "Customer").unwrap();

    let err = assert_err!(root.add_property_path(&schema, "name.first"));
    assert!(err.is_unsupported_operation());
}

#[test]
fn unknown_property_is_rejected() {
    let schema = order_schema();

    let mut mapping = ResultSetMapping::new();
    let root = mapping.add_root(&schema, "c", "Customer").unwrap();

    let err = assert_err!(root.add_property_path(&schema, "email"));
    assert!(err.is_unknown_attribute());

    let err = assert_err!(root.add_property_path(&schema, "address.zip"));
    assert!(err.is_unknown_attribute());
}

#[test]
fn to_one_property_reads_the_foreign_key_alias() {
    let schema = order_schema();
    let metadata = metadata(&[
        ("ORDER_ID", db::Type::BigInt),
        ("TOTAL", db::Type::Numeric),
        ("BUYER", db::Type::BigInt),
    ]);

    let mut mapping = ResultSetMapping::new();
    mapping
        .add_root(&schema, "o", "Order")
        .unwrap()
        .add_property_with_columns(fetchable(&schema, "Order", "customer"), &["BUYER"])
        .unwrap();

    let resolved = mapping.resolve(&schema, &metadata).unwrap();
    let customer = resolved.results[0]
        .expect_entity()
        .fetch(fetchable(&schema, "Order", "customer").id)
        .and_then(Fetch::as_delayed)
        .unwrap();
    assert_eq!(customer.key_positions, [2]);
}

#[test]
fn entity_builder_on_to_one_joins_its_target() {
    let schema = order_schema();
    let customer = schema.entity_named("Customer").unwrap().id;
    let metadata = metadata(&[
        ("ORDER_ID", db::Type::BigInt),
        ("TOTAL", db::Type::Numeric),
        ("CUST_ID", db::Type::BigInt),
        ("C_ID", db::Type::BigInt),
        ("C_NAME", db::Type::VarChar),
        ("STREET", db::Type::VarChar),
        ("CITY", db::Type::VarChar),
    ]);

    let mut target =
        DynamicResultBuilderEntityStandard::with_path(NavigablePath::new("Customer"), customer, "Customer", "c");
    target.add_id_column_aliases(["C_ID"]);
    target
        .add_property_with_columns(fetchable(&schema, "Customer", "name"), &["C_NAME"])
        .unwrap();

    let mut mapping = ResultSetMapping::new();
    mapping
        .add_root(&schema, "o", "Order")
        .unwrap()
        .add_fetch_builder(fetchable(&schema, "Order", "customer").id, target);

    let resolved = mapping.resolve(&schema, &metadata).unwrap();

    assert_eq!(resolved.joins.len(), 1);
    assert!(resolved
        .table_groups
        .iter()
        .any(|group| group.id == resolved.joins[0].group && group.alias.as_deref() == Some("c")));

    let fetch = resolved.results[0]
        .expect_entity()
        .fetch(fetchable(&schema, "Order", "customer").id)
        .and_then(Fetch::as_entity)
        .unwrap();
    assert_eq!(fetch.path.to_string(), "Order(o).customer");
    assert_eq!(fetch.identifier.positions(), [3]);

    // Declared on the nested builder, applied while it is resolved
    let name = fetch.fetch(fetchable(&schema, "Customer", "name").id).unwrap();
    assert_eq!(name.positions(), [4]);
}

#[test]
fn standard_builder_on_plural_reads_the_owner_key() {
    let schema = order_schema();
    let metadata = order_columns();

    let mut mapping = ResultSetMapping::new();
    mapping
        .add_root(&schema, "o", "Order")
        .unwrap()
        .add_property_with_columns(fetchable(&schema, "Order", "lines"), &["ORDER_ID"])
        .unwrap();

    let resolved = mapping.resolve(&schema, &metadata).unwrap();

    let lines = resolved.results[0]
        .expect_entity()
        .fetch(fetchable(&schema, "Order", "lines").id)
        .and_then(Fetch::as_plural)
        .unwrap();
    assert_eq!(lines.key_positions, [0]);
    assert!(lines.table_group.is_none());
    assert!(resolved.joins.is_empty());
}

#[test]
fn standard_builder_on_plural_without_aliases_fails() {
    let schema = order_schema();
    let metadata = order_columns();

    let mut mapping = ResultSetMapping::new();
    mapping
        .add_root(&schema, "o", "Order")
        .unwrap()
        .add_property(fetchable(&schema, "Order", "lines"))
        .unwrap();

    let err = assert_err!(mapping.resolve(&schema, &metadata));
    assert!(err.is_column_index_out_of_range());
}
