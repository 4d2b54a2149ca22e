//! The typed result graph produced by resolving a result-set mapping.
//!
//! Every leaf reads from the row's values array by position. Positions are
//! those of the [`SqlSelection`](crate::engine::SqlSelection)s registered
//! while resolving.

mod basic;
pub use basic::{BasicFetch, BasicResult};

mod entity;
pub use entity::{EntityFetch, EntityResult};

mod fetch;
pub use fetch::{DelayedFetch, EmbeddedFetch, Fetch, PluralFetch};

mod instantiation;
pub use instantiation::{InstantiationArgument, InstantiationResult};

use resultmap_core::{
    stmt::{self, Value},
    Error, Result,
};

/// A top-level projection of the query.
#[derive(Debug, Clone)]
pub enum DomainResult {
    Basic(BasicResult),
    Entity(EntityResult),
    Instantiation(InstantiationResult),
}

impl DomainResult {
    pub fn result_type(&self) -> stmt::Type {
        match self {
            Self::Basic(result) => result.ty.clone(),
            Self::Entity(result) => stmt::Type::Model(result.model),
            Self::Instantiation(result) => result.target.clone(),
        }
    }

    pub fn as_basic(&self) -> Option<&BasicResult> {
        match self {
            Self::Basic(result) => Some(result),
            _ => None,
        }
    }

    pub fn as_entity(&self) -> Option<&EntityResult> {
        match self {
            Self::Entity(result) => Some(result),
            _ => None,
        }
    }

    pub fn as_instantiation(&self) -> Option<&InstantiationResult> {
        match self {
            Self::Instantiation(result) => Some(result),
            _ => None,
        }
    }

    #[track_caller]
    pub fn expect_entity(&self) -> &EntityResult {
        match self {
            Self::Entity(result) => result,
            _ => panic!("expected entity result, but was {self:?}"),
        }
    }

    /// Assembles the result's value from one row.
    pub fn assemble(&self, row: &[Value]) -> Result<Value> {
        match self {
            Self::Basic(result) => result.assemble(row),
            Self::Entity(result) => result.assemble(row),
            Self::Instantiation(result) => result.assemble(row),
        }
    }
}

/// Reads the value at `position`, failing if the row is too short.
fn read(row: &[Value], position: usize) -> Result<Value> {
    row.get(position).cloned().ok_or_else(|| {
        Error::illegal_state(format!(
            "row has {} value(s), no value at position {position}",
            row.len()
        ))
    })
}

fn read_record(row: &[Value], positions: &[usize]) -> Result<Value> {
    match positions {
        [position] => read(row, *position),
        _ => Ok(Value::Record(
            positions
                .iter()
                .map(|position| read(row, *position))
                .collect::<Result<_>>()?,
        )),
    }
}
