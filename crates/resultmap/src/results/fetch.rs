use super::{read_record, BasicFetch, EntityFetch};
use crate::engine::TableGroupId;
use resultmap_core::{
    schema::{app::ModelId, FetchableId},
    stmt::{FetchTiming, NavigablePath, Value},
    Result,
};

/// A nested value attached to a fetch parent.
#[derive(Debug, Clone)]
pub enum Fetch {
    Basic(BasicFetch),
    Embedded(EmbeddedFetch),
    Entity(EntityFetch),
    Delayed(DelayedFetch),
    Plural(PluralFetch),
}

/// An embeddable value read from its owner's table group. Always immediate
/// and never null as a whole.
#[derive(Debug, Clone)]
pub struct EmbeddedFetch {
    pub path: NavigablePath,
    pub fetchable: FetchableId,
    pub fetches: Vec<Fetch>,
}

/// A to-one association loaded later by key.
#[derive(Debug, Clone)]
pub struct DelayedFetch {
    pub path: NavigablePath,
    pub fetchable: FetchableId,
    pub target: ModelId,

    /// Values-array positions of the join columns
    pub key_positions: Vec<usize>,

    pub timing: FetchTiming,
}

/// A collection attribute.
#[derive(Debug, Clone)]
pub struct PluralFetch {
    pub path: NavigablePath,
    pub fetchable: FetchableId,

    /// Values-array positions of the owner's identifier, the collection key
    pub key_positions: Vec<usize>,

    /// Set when the collection's rows are joined into the result
    pub table_group: Option<TableGroupId>,

    /// Values-array positions of the key columns in the collection table,
    /// when joined
    pub collection_key_positions: Vec<usize>,

    pub index: Option<Box<Fetch>>,
    pub element: Option<Box<Fetch>>,
    pub timing: FetchTiming,
}

impl Fetch {
    pub fn path(&self) -> &NavigablePath {
        match self {
            Self::Basic(fetch) => &fetch.path,
            Self::Embedded(fetch) => &fetch.path,
            Self::Entity(fetch) => &fetch.path,
            Self::Delayed(fetch) => &fetch.path,
            Self::Plural(fetch) => &fetch.path,
        }
    }

    pub fn fetchable(&self) -> FetchableId {
        match self {
            Self::Basic(fetch) => fetch.fetchable,
            Self::Embedded(fetch) => fetch.fetchable,
            Self::Entity(fetch) => fetch.fetchable,
            Self::Delayed(fetch) => fetch.fetchable,
            Self::Plural(fetch) => fetch.fetchable,
        }
    }

    pub fn timing(&self) -> FetchTiming {
        match self {
            Self::Basic(fetch) => fetch.timing,
            Self::Embedded(_) => FetchTiming::Immediate,
            Self::Entity(fetch) => fetch.timing,
            Self::Delayed(fetch) => fetch.timing,
            Self::Plural(fetch) => fetch.timing,
        }
    }

    pub fn as_basic(&self) -> Option<&BasicFetch> {
        match self {
            Self::Basic(fetch) => Some(fetch),
            _ => None,
        }
    }

    pub fn as_embedded(&self) -> Option<&EmbeddedFetch> {
        match self {
            Self::Embedded(fetch) => Some(fetch),
            _ => None,
        }
    }

    pub fn as_entity(&self) -> Option<&EntityFetch> {
        match self {
            Self::Entity(fetch) => Some(fetch),
            _ => None,
        }
    }

    pub fn as_delayed(&self) -> Option<&DelayedFetch> {
        match self {
            Self::Delayed(fetch) => Some(fetch),
            _ => None,
        }
    }

    pub fn as_plural(&self) -> Option<&PluralFetch> {
        match self {
            Self::Plural(fetch) => Some(fetch),
            _ => None,
        }
    }

    /// Values-array positions read directly by this fetch, not counting
    /// nested fetches.
    pub fn positions(&self) -> Vec<usize> {
        match self {
            Self::Basic(fetch) => vec![fetch.values_array_position],
            Self::Embedded(fetch) => fetch.fetches.iter().flat_map(Fetch::positions).collect(),
            Self::Entity(fetch) => fetch.identifier.positions(),
            Self::Delayed(fetch) => fetch.key_positions.clone(),
            Self::Plural(fetch) => fetch.key_positions.clone(),
        }
    }

    /// Assembles the fetch's value from one row. Delayed associations and
    /// collections assemble to their key.
    pub fn assemble(&self, row: &[Value]) -> Result<Value> {
        match self {
            Self::Basic(fetch) => fetch.assemble(row),
            Self::Embedded(fetch) => Ok(Value::Record(
                fetch
                    .fetches
                    .iter()
                    .map(|fetch| fetch.assemble(row))
                    .collect::<Result<_>>()?,
            )),
            Self::Entity(fetch) => fetch.assemble(row),
            Self::Delayed(fetch) => read_record(row, &fetch.key_positions),
            Self::Plural(fetch) => read_record(row, &fetch.key_positions),
        }
    }
}
