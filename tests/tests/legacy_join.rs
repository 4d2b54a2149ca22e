use pretty_assertions::assert_eq;
use resultmap::{
    dynamic::{DynamicFetchBuilderLegacy, DynamicResultBuilderEntityStandard, FetchContainer},
    engine::{CreationState, FetchParent, JoinType, TableGroupId},
    results::Fetch,
    JdbcValuesMapping, ResultSetMapping,
};
use resultmap_core::{
    schema::db,
    stmt::{LockMode, NavigablePath, Value},
};
use tests::*;

fn alias_of(mapping: &JdbcValuesMapping, table_group: TableGroupId) -> Option<&str> {
    mapping
        .table_groups
        .iter()
        .find(|group| group.id == table_group)
        .and_then(|group| group.alias.as_deref())
}

#[test]
fn customer_join_creates_one_join() {
    let schema = order_schema();
    let metadata = metadata(&[
        ("ORDER_ID", db::Type::BigInt),
        ("TOTAL", db::Type::Numeric),
        ("CUST_ID", db::Type::BigInt),
        ("NAME", db::Type::VarChar),
        ("STREET", db::Type::VarChar),
        ("CITY", db::Type::VarChar),
    ]);

    let mut mapping = ResultSetMapping::new();
    mapping.add_root(&schema, "o", "Order").unwrap();
    let join = mapping.add_join(&schema, "c", "o", "customer").unwrap();
    assert_eq!(join.role(), "Order.customer");

    let resolved = mapping.resolve(&schema, &metadata).unwrap();

    assert_eq!(resolved.joins.len(), 1);
    let customer = fetchable(&schema, "Order", "customer");
    let join = &resolved.joins[0];
    assert_eq!(join.fetchable, customer.id);
    assert_eq!(join.join_type, JoinType::Inner);
    assert_eq!(alias_of(&resolved, join.parent), Some("o"));
    assert_eq!(alias_of(&resolved, join.group), Some("c"));

    let fetch = resolved.results[0]
        .expect_entity()
        .fetch(customer.id)
        .and_then(Fetch::as_entity)
        .unwrap();
    assert_eq!(fetch.path.to_string(), "Order(o).customer");
    assert_eq!(fetch.identifier.positions(), [2]);
    assert_eq!(fetch.fetches.len(), 2);

    let row = [
        Value::I64(1),
        Value::from("12.50"),
        Value::I64(5),
        Value::from("Ada"),
        Value::from("Main St"),
        Value::from("Springfield"),
    ];
    assert_eq!(
        resolved.assemble(&row).unwrap(),
        [Value::Record(vec![
            Value::I64(1),
            Value::from("12.50"),
            Value::Record(vec![
                Value::I64(5),
                Value::from("Ada"),
                Value::Record(vec![Value::from("Main St"), Value::from("Springfield")]),
            ]),
            Value::I64(1),
            Value::I64(1),
            Value::I64(1),
        ])]
    );
}

#[test]
fn join_key_aliases_pair_with_the_owner_foreign_key() {
    let schema = order_schema();
    let metadata = metadata(&[
        ("ORDER_ID", db::Type::BigInt),
        ("TOTAL", db::Type::Numeric),
        ("O_CUST", db::Type::BigInt),
        ("CUST_ID", db::Type::BigInt),
        ("NAME", db::Type::VarChar),
        ("STREET", db::Type::VarChar),
        ("CITY", db::Type::VarChar),
    ]);

    let mut mapping = ResultSetMapping::new();
    mapping.add_root(&schema, "o", "Order").unwrap();
    mapping
        .add_join(&schema, "c", "o", "customer")
        .unwrap()
        .add_column_alias("O_CUST")
        .set_lock_mode(LockMode::PessimisticRead);

    let resolved = mapping.resolve(&schema, &metadata).unwrap();

    assert_selections!(
        resolved,
        ["ORDER_ID", "TOTAL", "O_CUST", "CUST_ID", "NAME", "STREET", "CITY"]
    );
    assert_eq!(resolved.lock_modes.get("c"), Some(&LockMode::PessimisticRead));
    assert_eq!(resolved.row_size(), 7);
}

#[test]
fn unknown_owner_alias_is_rejected() {
    let schema = order_schema();

    let mut mapping = ResultSetMapping::new();
    mapping.add_root(&schema, "o", "Order").unwrap();

    let err = assert_err!(mapping.add_join(&schema, "c", "x", "customer"));
    assert!(err.is_illegal_state());
    assert_eq!(
        err.to_string(),
        "illegal state: Owner alias [x] is unknown for alias [c]"
    );
}

#[test]
fn unknown_owner_alias_is_rejected_on_resolve() {
    let schema = order_schema();
    let metadata = order_columns();
    let customer = fetchable(&schema, "Order", "customer");

    let mut mapping = ResultSetMapping::new();
    mapping.add_root(&schema, "o", "Order").unwrap();
    mapping.add_legacy_fetch_builder(DynamicFetchBuilderLegacy::new(
        "c",
        "x",
        customer,
        "Order.customer",
    ));

    let err = assert_err!(mapping.resolve(&schema, &metadata));
    assert!(err.is_illegal_state());
}

#[test]
fn join_before_its_owner_is_resolved_fails() {
    let schema = order_schema();
    let metadata = order_columns();
    let customer = fetchable(&schema, "Order", "customer");

    let join = DynamicFetchBuilderLegacy::new("c", "o", customer, "Order.customer");
    let mut state = CreationState::new(&schema, &metadata);

    let parent = FetchParent {
        path: NavigablePath::with_alias("Order", "o"),
        table_group: TableGroupId::new(0),
    };
    let path = parent.path.append("customer");

    let err = assert_err!(join.build_fetch(&parent, customer, path, &mut state));
    assert!(err.is_unknown_table_group());
}

#[test]
fn joined_collection_uses_its_key_and_element_builders() {
    let schema = order_schema();
    let metadata = metadata(&[
        ("ORDER_ID", db::Type::BigInt),
        ("TOTAL", db::Type::Numeric),
        ("CUST_ID", db::Type::BigInt),
        ("LINE_ID", db::Type::BigInt),
        ("L_NO", db::Type::Integer),
        ("L_QTY", db::Type::Integer),
    ]);

    let mut mapping = ResultSetMapping::new();
    mapping.add_root(&schema, "o", "Order").unwrap();
    let join = mapping.add_join(&schema, "l", "o", "lines").unwrap();
    join.add_property(&schema, "key").unwrap().add_column_alias("L_NO");
    join.add_property(&schema, "element.quantity")
        .unwrap()
        .add_column_alias("L_QTY");

    let resolved = mapping.resolve(&schema, &metadata).unwrap();
    assert_eq!(resolved.joins.len(), 1);

    let lines = resolved.results[0]
        .expect_entity()
        .fetch(fetchable(&schema, "Order", "lines").id)
        .and_then(Fetch::as_plural)
        .unwrap();

    assert_eq!(lines.key_positions, [0]);
    assert_eq!(lines.collection_key_positions, [0]);
    assert!(lines.table_group.is_some());

    let index = lines.index.as_deref().unwrap();
    assert_eq!(index.positions(), [4]);
    assert_eq!(index.path().to_string(), "Order(o).lines.key");

    let element = lines
        .element
        .as_deref()
        .and_then(Fetch::as_entity)
        .unwrap();
    assert_eq!(element.identifier.positions(), [3]);

    let quantity = element
        .fetch(fetchable(&schema, "OrderLine", "quantity").id)
        .unwrap();
    assert_eq!(quantity.positions(), [5]);
}

#[test]
fn one_to_many_entity_builder_aliases_the_collection_key() {
    let schema = order_schema();
    let line = schema.entity_named("OrderLine").unwrap().id;
    let metadata = metadata(&[
        ("ORDER_ID", db::Type::BigInt),
        ("TOTAL", db::Type::Numeric),
        ("CUST_ID", db::Type::BigInt),
        ("LINE_ID", db::Type::BigInt),
        ("L_ORDER", db::Type::BigInt),
        ("LINE_NO", db::Type::Integer),
        ("QTY", db::Type::Integer),
    ]);

    let mut element =
        DynamicResultBuilderEntityStandard::with_path(NavigablePath::new("OrderLine"), line, "OrderLine", "l");
    element.add_id_column_aliases(["L_ORDER"]);

    let mut mapping = ResultSetMapping::new();
    mapping.add_root(&schema, "o", "Order").unwrap();
    mapping
        .add_join(&schema, "l", "o", "lines")
        .unwrap()
        .set_result_builder_entity(element);

    let resolved = mapping.resolve(&schema, &metadata).unwrap();
    assert_eq!(resolved.joins.len(), 1);

    let lines = resolved.results[0]
        .expect_entity()
        .fetch(fetchable(&schema, "Order", "lines").id)
        .and_then(Fetch::as_plural)
        .unwrap();

    assert_eq!(lines.key_positions, [0]);
    assert_eq!(lines.collection_key_positions, [4]);
    assert_eq!(lines.index.as_deref().unwrap().positions(), [5]);

    let element = lines
        .element
        .as_deref()
        .and_then(Fetch::as_entity)
        .unwrap();
    assert_eq!(element.identifier.positions(), [3]);

    let quantity = element
        .fetch(fetchable(&schema, "OrderLine", "quantity").id)
        .unwrap();
    assert_eq!(quantity.positions(), [6]);

    // The back reference shares the aliased key column
    let order = element
        .fetch(fetchable(&schema, "OrderLine", "order").id)
        .and_then(Fetch::as_delayed)
        .unwrap();
    assert_eq!(order.key_positions, [4]);
}

#[test]
fn collection_key_property_requires_an_index() {
    let schema = order_schema();

    let mut mapping = ResultSetMapping::new();
    mapping.add_root(&schema, "o", "Order").unwrap();
    let join = mapping.add_join(&schema, "t", "o", "tags").unwrap();

    let err = assert_err!(join.add_property(&schema, "key"));
    assert!(err.is_unknown_attribute());

    assert_ok!(join.add_property(&schema, "label"));
}

fn tag_columns(order_key: &str, tag_id: &str) -> resultmap::engine::ResultSetMetadata {
    metadata(&[
        ("ORDER_ID", db::Type::BigInt),
        ("TOTAL", db::Type::Numeric),
        ("CUST_ID", db::Type::BigInt),
        (order_key, db::Type::BigInt),
        (tag_id, db::Type::BigInt),
        ("LABEL", db::Type::VarChar),
    ])
}

#[test]
fn many_to_many_join_reads_columns_by_name() {
    let schema = order_schema();
    let metadata = tag_columns("OT_ORDER", "TAG_ID");

    let mut mapping = ResultSetMapping::new();
    mapping.add_root(&schema, "o", "Order").unwrap();
    mapping.add_join(&schema, "t", "o", "tags").unwrap();

    let resolved = mapping.resolve(&schema, &metadata).unwrap();

    let group = resolved
        .table_groups
        .iter()
        .find(|group| group.id == resolved.joins[0].group)
        .unwrap();
    assert_eq!(group.tables.len(), 2);

    let tags = resolved.results[0]
        .expect_entity()
        .fetch(fetchable(&schema, "Order", "tags").id)
        .and_then(Fetch::as_plural)
        .unwrap();
    let element = tags.element.as_deref().and_then(Fetch::as_entity).unwrap();
    assert_eq!(element.identifier.positions(), [4]);
}

#[test]
fn many_to_many_element_pairs_key_and_identifier_aliases() {
    let schema = order_schema();
    let tag = schema.entity_named("Tag").unwrap().id;
    let metadata = tag_columns("OT_ORDER", "T_ID");

    let mut element =
        DynamicResultBuilderEntityStandard::with_path(NavigablePath::new("Tag"), tag, "Tag", "t");
    element.add_id_column_aliases(["OT_ORDER"]);
    element
        .add_property_with_columns(schema.identifier_fetchable(tag), &["T_ID"])
        .unwrap();

    let mut mapping = ResultSetMapping::new();
    mapping.add_root(&schema, "o", "Order").unwrap();
    mapping
        .add_join(&schema, "t", "o", "tags")
        .unwrap()
        .set_result_builder_entity(element);

    let resolved = mapping.resolve(&schema, &metadata).unwrap();

    let tags = resolved.results[0]
        .expect_entity()
        .fetch(fetchable(&schema, "Order", "tags").id)
        .and_then(Fetch::as_plural)
        .unwrap();
    assert_eq!(tags.key_positions, [0]);
    assert_eq!(tags.collection_key_positions, [3]);

    let element = tags.element.as_deref().and_then(Fetch::as_entity).unwrap();
    assert_eq!(element.identifier.positions(), [4]);
    assert_selections!(resolved, ["ORDER_ID", "TOTAL", "CUST_ID", "OT_ORDER", "T_ID", "LABEL"]);
}

#[test]
fn many_to_many_element_without_identifier_builder_fails() {
    let schema = order_schema();
    let tag = schema.entity_named("Tag").unwrap().id;
    let metadata = tag_columns("OT_ORDER", "TAG_ID");

    let mut element =
        DynamicResultBuilderEntityStandard::with_path(NavigablePath::new("Tag"), tag, "Tag", "t");
    element.add_id_column_aliases(["OT_ORDER"]);

    let mut mapping = ResultSetMapping::new();
    mapping.add_root(&schema, "o", "Order").unwrap();
    mapping
        .add_join(&schema, "t", "o", "tags")
        .unwrap()
        .set_result_builder_entity(element);

    let err = assert_err!(mapping.resolve(&schema, &metadata));
    assert!(err.is_invariant_violation());
}
