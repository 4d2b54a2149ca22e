mod cache;
pub use cache::{CacheStats, ResultSetMappingCache};

pub mod converter;
pub use converter::{Converter, ConverterRegistry, ValueConverter};

pub mod dynamic;

pub mod engine;

mod result_set_mapping;
pub use result_set_mapping::{JdbcValuesMapping, ResultSetMapping, ResultSetMappingKey};

pub mod results;

pub use resultmap_core::{schema, stmt, Error, Result, Schema};
