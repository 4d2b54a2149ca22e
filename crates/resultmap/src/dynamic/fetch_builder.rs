use super::{DynamicFetchBuilderLegacy, DynamicFetchBuilderStandard, DynamicResultBuilderEntityStandard};
use crate::{
    engine::{CreationState, FetchParent},
    results::Fetch,
};
use resultmap_core::{schema::Fetchable, stmt::NavigablePath, Result};

/// A builder declared for one fetchable of a parent.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FetchBuilder {
    /// Explicit column aliases for the fetchable
    Standard(DynamicFetchBuilderStandard),

    /// The fetchable resolves to a fully customized entity
    Entity(DynamicResultBuilderEntityStandard),

    /// A free-standing join declared by table alias
    Legacy(DynamicFetchBuilderLegacy),
}

impl FetchBuilder {
    pub fn build_fetch<'m>(
        &'m self,
        parent: &FetchParent,
        fetchable: &'m Fetchable,
        path: NavigablePath,
        state: &mut CreationState<'m>,
    ) -> Result<Fetch> {
        match self {
            Self::Standard(builder) => builder.build_fetch(parent, fetchable, path, state),
            Self::Entity(builder) => builder.build_fetch(parent, fetchable, path, state),
            Self::Legacy(builder) => builder.build_fetch(parent, fetchable, path, state),
        }
    }

    /// Column aliases declared for the fetchable's own selectables.
    pub fn column_aliases(&self) -> Option<&[String]> {
        match self {
            Self::Standard(builder) => Some(builder.column_aliases()),
            Self::Entity(_) => None,
            Self::Legacy(builder) => builder.column_aliases(),
        }
    }

    pub fn as_standard(&self) -> Option<&DynamicFetchBuilderStandard> {
        match self {
            Self::Standard(builder) => Some(builder),
            _ => None,
        }
    }

    pub fn as_entity(&self) -> Option<&DynamicResultBuilderEntityStandard> {
        match self {
            Self::Entity(builder) => Some(builder),
            _ => None,
        }
    }

    pub fn as_legacy(&self) -> Option<&DynamicFetchBuilderLegacy> {
        match self {
            Self::Legacy(builder) => Some(builder),
            _ => None,
        }
    }

    pub fn cache_key_instance(&self) -> Self {
        self.cache_key_instance_for(None)
    }

    pub(crate) fn cache_key_instance_for(&self, owner: Option<&str>) -> Self {
        match self {
            Self::Standard(builder) => Self::Standard(builder.cache_key_instance_for(owner)),
            Self::Entity(builder) => Self::Entity(builder.cache_key_instance()),
            Self::Legacy(builder) => Self::Legacy(builder.cache_key_instance()),
        }
    }

    /// Short description used in error messages.
    pub fn describe(&self) -> String {
        match self {
            Self::Standard(builder) => format!(
                "standard({}, [{}])",
                builder.fetchable_name(),
                builder.column_aliases().join(", ")
            ),
            Self::Entity(builder) => format!(
                "entity({} as {})",
                builder.entity_name(),
                builder.table_alias()
            ),
            Self::Legacy(builder) => format!(
                "join({} as {})",
                builder.role(),
                builder.table_alias()
            ),
        }
    }
}

impl From<DynamicFetchBuilderStandard> for FetchBuilder {
    fn from(value: DynamicFetchBuilderStandard) -> Self {
        Self::Standard(value)
    }
}

impl From<DynamicResultBuilderEntityStandard> for FetchBuilder {
    fn from(value: DynamicResultBuilderEntityStandard) -> Self {
        Self::Entity(value)
    }
}

impl From<DynamicFetchBuilderLegacy> for FetchBuilder {
    fn from(value: DynamicFetchBuilderLegacy) -> Self {
        Self::Legacy(value)
    }
}
