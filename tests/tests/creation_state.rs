use pretty_assertions::assert_eq;
use resultmap::{
    dynamic::{DynamicResultBuilderEntityStandard, FetchBuilderMap},
    engine::{CreationState, ExplicitFetchResolver, SelectionKey},
    Error,
};
use resultmap_core::schema::db;
use tests::*;

#[test]
fn fetch_resolvers_nest_and_unwind() {
    let schema = order_schema();
    let metadata = order_columns();
    let outer = FetchBuilderMap::new();
    let inner = FetchBuilderMap::new();

    let mut state = CreationState::new(&schema, &metadata);
    assert_eq!(state.fetch_resolver_depth(), 0);

    let depth = state
        .with_fetch_resolver(ExplicitFetchResolver::new(Some(&outer), Some("o")), |state| {
            state.with_fetch_resolver(ExplicitFetchResolver::new(Some(&inner), None), |state| {
                Ok(state.fetch_resolver_depth())
            })
        })
        .unwrap();

    assert_eq!(depth, 2);
    assert_eq!(state.fetch_resolver_depth(), 0);
}

#[test]
fn fetch_resolver_is_popped_on_error() {
    let schema = order_schema();
    let metadata = order_columns();

    let mut state = CreationState::new(&schema, &metadata);

    let err = assert_err!(state.with_fetch_resolver(
        ExplicitFetchResolver::new(None, Some("o")),
        |_| -> resultmap::Result<()> { Err(Error::illegal_state("boom")) },
    ));
    assert!(err.is_illegal_state());
    assert_eq!(state.fetch_resolver_depth(), 0);
}

#[test]
fn entity_build_leaves_no_resolver_behind() {
    let schema = order_schema();
    let metadata = order_columns();
    let builder = DynamicResultBuilderEntityStandard::new(&schema, "Order", "o").unwrap();

    let mut state = CreationState::new(&schema, &metadata);
    let result = builder.build_result(&mut state).unwrap();

    assert_eq!(state.fetch_resolver_depth(), 0);
    assert_eq!(state.from_clause().find_by_alias("o"), Some(result.table_group));
}

#[test]
fn explicit_selections_win_over_later_lookups() {
    let schema = order_schema();
    let order = schema.entity_named("Order").unwrap();
    let metadata = metadata(&[
        ("ORDER_ID", db::Type::BigInt),
        ("OID", db::Type::BigInt),
    ]);

    let mut state = CreationState::new(&schema, &metadata);
    let path = resultmap_core::stmt::NavigablePath::with_alias("Order", "o");
    let group = state.create_root_table_group(&path, order.id, Some("o"));

    // Creating the same path again returns the existing group
    assert_eq!(state.create_root_table_group(&path, order.id, Some("o")), group);

    let column = order_id_column(&schema);
    assert_eq!(state.resolve_explicit_selection(group, column, "OID").unwrap(), 1);
    assert_eq!(state.resolve_column_selection(group, column).unwrap(), 1);

    let selection = state
        .find_selection(&SelectionKey::Column {
            table_group: group,
            column,
        })
        .unwrap();
    assert_eq!(selection.column_name, "OID");
    assert_eq!(selection.jdbc_position, 2);
}

#[test]
fn aliased_columns_report_the_missing_index() {
    let schema = order_schema();
    let order = schema.entity_named("Order").unwrap();
    let metadata = order_columns();

    let mut state = CreationState::new(&schema, &metadata);
    let path = resultmap_core::stmt::NavigablePath::with_alias("Order", "o");
    let group = state.create_root_table_group(&path, order.id, Some("o"));

    let column = order_id_column(&schema);
    let err = assert_err!(state.resolve_aliased_columns(group, &[column, column], &["ORDER_ID".to_string()], "id"));
    assert!(err.is_column_index_out_of_range());
}

fn order_id_column(schema: &resultmap_core::Schema) -> db::ColumnId {
    match &fetchable(schema, "Order", "id").kind {
        resultmap_core::schema::FetchableKind::Basic(basic) => basic.column,
        kind => panic!("unexpected identifier kind {kind:?}"),
    }
}
