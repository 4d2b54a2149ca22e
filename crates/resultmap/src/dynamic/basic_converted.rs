use crate::{
    converter::{Converter, ConverterRegistry, ValueConverter},
    engine::CreationState,
    results::BasicResult,
};
use resultmap_core::Result;

/// A scalar read from one column and passed through a value converter.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DynamicResultBuilderBasicConverted {
    column_name: String,
    converter: Converter,
}

impl DynamicResultBuilderBasicConverted {
    pub fn new(column_name: impl Into<String>, converter: Converter) -> Self {
        Self {
            column_name: column_name.into(),
            converter,
        }
    }

    /// Uses the registry's shared instance of `C`.
    pub fn with_registry<C>(column_name: impl Into<String>, registry: &ConverterRegistry) -> Self
    where
        C: ValueConverter + Default,
    {
        Self::new(column_name, registry.get_or_create::<C>())
    }

    pub fn column_name(&self) -> &str {
        &self.column_name
    }

    pub fn converter(&self) -> &Converter {
        &self.converter
    }

    pub fn build_result(&self, position: usize, state: &mut CreationState<'_>) -> Result<BasicResult> {
        let selection = state.resolve_raw_selection(&self.column_name, None)?;

        Ok(BasicResult {
            result_position: position,
            values_array_position: selection.values_array_position,
            alias: Some(selection.column_name),
            ty: self.converter.domain_type(),
            converter: Some(self.converter.clone()),
        })
    }
}
