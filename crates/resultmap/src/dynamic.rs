//! Builders describing, at runtime, how the columns of a native query map
//! onto entities, embeddables, collections, scalars and constructor calls.

mod basic;
pub use basic::{BasicType, DynamicResultBuilderBasic, ExplicitType};

mod basic_converted;
pub use basic_converted::DynamicResultBuilderBasicConverted;

mod container;
pub use container::{FetchBuilderContainer, FetchBuilderMap, FetchContainer};

mod entity_calculated;
pub use entity_calculated::DynamicResultBuilderEntityCalculated;

mod entity_standard;
pub use entity_standard::DynamicResultBuilderEntityStandard;

mod fetch_builder;
pub use fetch_builder::FetchBuilder;

mod fetch_legacy;
pub use fetch_legacy::DynamicFetchBuilderLegacy;

mod fetch_standard;
pub use fetch_standard::DynamicFetchBuilderStandard;

mod instantiation;
pub use instantiation::DynamicResultBuilderInstantiation;

mod result_builder;
pub use result_builder::ResultBuilder;

mod root_return;
pub use root_return::RootReturn;
