use super::{Fetch, read};
use crate::engine::TableGroupId;
use resultmap_core::{
    schema::{app::ModelId, FetchableId},
    stmt::{FetchTiming, LockMode, NavigablePath, Value},
    Result,
};

/// An entity projected at the top level of the query.
#[derive(Debug, Clone)]
pub struct EntityResult {
    pub path: NavigablePath,
    pub model: ModelId,
    pub table_group: TableGroupId,

    /// Alias the result is exposed under, the root's table alias
    pub alias: Option<String>,

    pub identifier: Box<Fetch>,

    /// Values-array position of the discriminator, if the entity has one
    pub discriminator: Option<usize>,

    /// Attributes other than the identifier, in declaration order
    pub fetches: Vec<Fetch>,

    pub lock_mode: LockMode,
}

/// An entity reached through a to-one association or as a collection
/// element.
#[derive(Debug, Clone)]
pub struct EntityFetch {
    pub path: NavigablePath,
    pub fetchable: FetchableId,
    pub model: ModelId,
    pub table_group: TableGroupId,
    pub identifier: Box<Fetch>,
    pub discriminator: Option<usize>,
    pub fetches: Vec<Fetch>,
    pub timing: FetchTiming,
}

impl EntityResult {
    /// Finds the fetch generated for `fetchable`.
    pub fn fetch(&self, fetchable: FetchableId) -> Option<&Fetch> {
        find(&self.identifier, &self.fetches, fetchable)
    }

    /// Assembles `[identifier, discriminator?, fetches...]`. A null
    /// identifier means no entity is present in the row.
    pub fn assemble(&self, row: &[Value]) -> Result<Value> {
        assemble(&self.identifier, self.discriminator, &self.fetches, row)
    }
}

impl EntityFetch {
    pub fn fetch(&self, fetchable: FetchableId) -> Option<&Fetch> {
        find(&self.identifier, &self.fetches, fetchable)
    }

    pub fn assemble(&self, row: &[Value]) -> Result<Value> {
        assemble(&self.identifier, self.discriminator, &self.fetches, row)
    }
}

fn find<'a>(identifier: &'a Fetch, fetches: &'a [Fetch], fetchable: FetchableId) -> Option<&'a Fetch> {
    std::iter::once(identifier)
        .chain(fetches)
        .find(|fetch| fetch.fetchable() == fetchable)
}

fn assemble(
    identifier: &Fetch,
    discriminator: Option<usize>,
    fetches: &[Fetch],
    row: &[Value],
) -> Result<Value> {
    let id = identifier.assemble(row)?;
    if id.is_null() {
        return Ok(Value::Null);
    }

    let mut values = Vec::with_capacity(fetches.len() + 2);
    values.push(id);

    if let Some(position) = discriminator {
        values.push(read(row, position)?);
    }

    for fetch in fetches {
        values.push(fetch.assemble(row)?);
    }

    Ok(Value::Record(values))
}
