use super::{
    DynamicResultBuilderBasic, DynamicResultBuilderBasicConverted, DynamicResultBuilderEntityCalculated,
    DynamicResultBuilderEntityStandard, DynamicResultBuilderInstantiation,
};
use crate::{engine::CreationState, results::DomainResult};
use resultmap_core::Result;
use std::sync::Arc;

/// A top-level result declared on a result-set mapping.
///
/// Builders without nested state are held behind an `Arc` so cache keys
/// share them instead of copying.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ResultBuilder {
    Basic(Arc<DynamicResultBuilderBasic>),
    Converted(Arc<DynamicResultBuilderBasicConverted>),
    Entity(DynamicResultBuilderEntityStandard),
    EntityCalculated(Arc<DynamicResultBuilderEntityCalculated>),
    Instantiation(DynamicResultBuilderInstantiation),
}

impl ResultBuilder {
    /// Builds the result found at `position` in the projection.
    pub fn build_result<'m>(&'m self, position: usize, state: &mut CreationState<'m>) -> Result<DomainResult> {
        Ok(match self {
            Self::Basic(builder) => DomainResult::Basic(builder.build_result(position, state)?),
            Self::Converted(builder) => DomainResult::Basic(builder.build_result(position, state)?),
            Self::Entity(builder) => DomainResult::Entity(builder.build_result(state)?),
            Self::EntityCalculated(builder) => DomainResult::Entity(builder.build_result(state)?),
            Self::Instantiation(builder) => {
                DomainResult::Instantiation(builder.build_result(state)?)
            }
        })
    }

    pub fn cache_key_instance(&self) -> Self {
        match self {
            Self::Basic(builder) => Self::Basic(Arc::clone(builder)),
            Self::Converted(builder) => Self::Converted(Arc::clone(builder)),
            Self::Entity(builder) => Self::Entity(builder.cache_key_instance()),
            Self::EntityCalculated(builder) => Self::EntityCalculated(Arc::clone(builder)),
            Self::Instantiation(builder) => Self::Instantiation(builder.cache_key_instance()),
        }
    }

    /// Table alias of an entity result.
    pub fn table_alias(&self) -> Option<&str> {
        match self {
            Self::Entity(builder) => Some(builder.table_alias()),
            Self::EntityCalculated(builder) => Some(builder.table_alias()),
            _ => None,
        }
    }

    pub fn as_entity(&self) -> Option<&DynamicResultBuilderEntityStandard> {
        match self {
            Self::Entity(builder) => Some(builder),
            _ => None,
        }
    }

    pub fn as_entity_mut(&mut self) -> Option<&mut DynamicResultBuilderEntityStandard> {
        match self {
            Self::Entity(builder) => Some(builder),
            _ => None,
        }
    }
}

impl From<DynamicResultBuilderBasic> for ResultBuilder {
    fn from(value: DynamicResultBuilderBasic) -> Self {
        Self::Basic(Arc::new(value))
    }
}

impl From<DynamicResultBuilderBasicConverted> for ResultBuilder {
    fn from(value: DynamicResultBuilderBasicConverted) -> Self {
        Self::Converted(Arc::new(value))
    }
}

impl From<DynamicResultBuilderEntityStandard> for ResultBuilder {
    fn from(value: DynamicResultBuilderEntityStandard) -> Self {
        Self::Entity(value)
    }
}

impl From<DynamicResultBuilderEntityCalculated> for ResultBuilder {
    fn from(value: DynamicResultBuilderEntityCalculated) -> Self {
        Self::EntityCalculated(Arc::new(value))
    }
}

impl From<DynamicResultBuilderInstantiation> for ResultBuilder {
    fn from(value: DynamicResultBuilderInstantiation) -> Self {
        Self::Instantiation(value)
    }
}
