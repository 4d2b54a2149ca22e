#[macro_use]
mod macros;

use resultmap::engine::ResultSetMetadata;
use resultmap_core::{
    schema::{db, Fetchable},
    stmt, Schema,
};
use std::sync::Once;

/// Installs a test subscriber honoring `RUST_LOG`. Safe to call from every
/// test.
pub fn init_tracing() {
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Orders with a nullable customer, ordered lines, tags and free-text
/// notes. Customers carry an embedded address.
pub fn order_schema() -> Schema {
    init_tracing();

    let mut builder = Schema::builder();
    let customer = builder.model_id("Customer");
    let order = builder.model_id("Order");
    let line = builder.model_id("OrderLine");
    let tag = builder.model_id("Tag");

    builder
        .entity("Order", "ORDERS")
        .identifier("id", stmt::Type::I64, "ORDER_ID")
        .basic("total", stmt::Type::Decimal, "TOTAL")
        .to_one("customer", customer, &["CUST_ID"])
        .nullable()
        .one_to_many("lines", line, &["ORDER_ID"])
        .list_index("LINE_NO", stmt::Type::I32)
        .many_to_many("tags", tag, "ORDER_TAGS", &["ORDER_ID"], &["TAG_ID"])
        .element_collection("notes", "ORDER_NOTES", &["ORDER_ID"], stmt::Type::String, "NOTE");

    builder
        .entity("Customer", "CUSTOMER")
        .identifier("id", stmt::Type::I64, "CUST_ID")
        .basic("name", stmt::Type::String, "NAME")
        .embedded("address", |address| {
            address
                .basic("street", stmt::Type::String, "STREET")
                .basic("city", stmt::Type::String, "CITY");
        });

    builder
        .entity("OrderLine", "ORDER_LINE")
        .identifier("id", stmt::Type::I64, "LINE_ID")
        .basic("quantity", stmt::Type::I32, "QTY")
        .to_one("order", order, &["ORDER_ID"]);

    builder
        .entity("Tag", "TAG")
        .identifier("id", stmt::Type::I64, "TAG_ID")
        .basic("label", stmt::Type::String, "LABEL");

    builder.build().unwrap()
}

/// Result-set metadata listing `columns` in order.
pub fn metadata(columns: &[(&str, db::Type)]) -> ResultSetMetadata {
    columns
        .iter()
        .fold(ResultSetMetadata::new(), |metadata, (name, ty)| {
            metadata.column(*name, *ty)
        })
}

/// The columns a plain `select * from ORDERS` returns.
pub fn order_columns() -> ResultSetMetadata {
    metadata(&[
        ("ORDER_ID", db::Type::BigInt),
        ("TOTAL", db::Type::Numeric),
        ("CUST_ID", db::Type::BigInt),
    ])
}

/// Resolves a dotted attribute path of the entity named `entity`.
#[track_caller]
pub fn fetchable<'a>(schema: &'a Schema, entity: &str, path: &str) -> &'a Fetchable {
    let model = schema.entity_named(entity).unwrap();
    schema.resolve_fetchable_path(model.id, path).unwrap()
}
