use super::{DynamicFetchBuilderStandard, FetchBuilder};
use resultmap_core::{schema::Fetchable, schema::FetchableId, Error, Result};
use std::{
    collections::{btree_map::Entry, BTreeMap},
    hash::{Hash, Hasher},
};

/// Fetch builders declared on a parent, keyed by fetchable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FetchBuilderMap {
    builders: BTreeMap<FetchableId, FetchBuilder>,
}

/// The fetch builders of an entity builder.
///
/// The map is allocated on first write. A container that never had a fetch
/// declared is not equal to one whose map exists but is empty, though both
/// hash the same.
#[derive(Debug, Clone, Default)]
pub struct FetchBuilderContainer {
    /// Name of the entity owning the container, for messages
    owner: String,

    map: Option<FetchBuilderMap>,
}

/// Declaration API shared by builders that carry fetch builders.
pub trait FetchContainer {
    fn fetch_builder_container(&self) -> &FetchBuilderContainer;

    fn fetch_builder_container_mut(&mut self) -> &mut FetchBuilderContainer;

    /// Returns the builder declared for `fetchable`, if any.
    fn find_fetch_builder(&self, fetchable: FetchableId) -> Option<&FetchBuilder> {
        self.fetch_builder_container().find(fetchable)
    }

    /// Declares a standard fetch builder for `fetchable`. Fails if one was
    /// already declared.
    fn add_property(&mut self, fetchable: &Fetchable) -> Result<&mut DynamicFetchBuilderStandard> {
        self.fetch_builder_container_mut().add_property(fetchable)
    }

    /// Declares a standard fetch builder for `fetchable` reading the given
    /// column aliases, in selectable order.
    fn add_property_with_columns(
        &mut self,
        fetchable: &Fetchable,
        column_aliases: &[&str],
    ) -> Result<&mut DynamicFetchBuilderStandard> {
        let builder = self.add_property(fetchable)?;
        for alias in column_aliases {
            builder.add_column_alias(*alias);
        }
        Ok(builder)
    }

    /// Registers `builder` for `fetchable`, replacing any previous one.
    fn add_fetch_builder(&mut self, fetchable: FetchableId, builder: impl Into<FetchBuilder>) {
        self.fetch_builder_container_mut()
            .add_fetch_builder(fetchable, builder.into());
    }

    fn visit_fetch_builders(&self, f: impl FnMut(FetchableId, &FetchBuilder)) {
        self.fetch_builder_container().visit_fetch_builders(f);
    }
}

impl FetchBuilderMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, fetchable: FetchableId) -> Option<&FetchBuilder> {
        self.builders.get(&fetchable)
    }

    pub fn get_mut(&mut self, fetchable: FetchableId) -> Option<&mut FetchBuilder> {
        self.builders.get_mut(&fetchable)
    }

    /// Inserts `builder`, returning the one it replaced.
    pub fn insert(&mut self, fetchable: FetchableId, builder: FetchBuilder) -> Option<FetchBuilder> {
        self.builders.insert(fetchable, builder)
    }

    pub fn contains(&self, fetchable: FetchableId) -> bool {
        self.builders.contains_key(&fetchable)
    }

    pub fn len(&self) -> usize {
        self.builders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.builders.is_empty()
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = (FetchableId, &FetchBuilder)> + '_ {
        self.builders.iter().map(|(fetchable, builder)| (*fetchable, builder))
    }

    /// Inserts a new standard builder for `fetchable`, refusing to replace an
    /// existing one. `owner` names the declaring parent in the error.
    pub(crate) fn add_standard(
        &mut self,
        owner: &str,
        fetchable: &Fetchable,
        container: Option<&str>,
    ) -> Result<&mut DynamicFetchBuilderStandard> {
        match self.builders.entry(fetchable.id) {
            Entry::Occupied(entry) => Err(Error::duplicate_fetch_builder(
                owner,
                &fetchable.name,
                entry.get().describe(),
            )),
            Entry::Vacant(entry) => {
                let mut builder = DynamicFetchBuilderStandard::new(fetchable);
                if let Some(container) = container {
                    builder.set_container(container);
                }

                match entry.insert(FetchBuilder::Standard(builder)) {
                    FetchBuilder::Standard(builder) => Ok(builder),
                    _ => unreachable!(),
                }
            }
        }
    }

    /// Copies the map, replacing each builder with its cache key instance.
    /// Standard builders are re-parented to `owner`.
    pub fn cache_key_instance(&self, owner: Option<&str>) -> Self {
        Self {
            builders: self
                .builders
                .iter()
                .map(|(fetchable, builder)| (*fetchable, builder.cache_key_instance_for(owner)))
                .collect(),
        }
    }
}

impl<'a> IntoIterator for &'a FetchBuilderMap {
    type Item = (&'a FetchableId, &'a FetchBuilder);
    type IntoIter = std::collections::btree_map::Iter<'a, FetchableId, FetchBuilder>;

    fn into_iter(self) -> Self::IntoIter {
        self.builders.iter()
    }
}

impl FetchBuilderContainer {
    pub fn new(owner: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            map: None,
        }
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// The backing map, `None` until a fetch builder is declared.
    pub fn map(&self) -> Option<&FetchBuilderMap> {
        self.map.as_ref()
    }

    pub fn find(&self, fetchable: FetchableId) -> Option<&FetchBuilder> {
        self.map.as_ref()?.get(fetchable)
    }

    pub(crate) fn find_mut(&mut self, fetchable: FetchableId) -> Option<&mut FetchBuilder> {
        self.map.as_mut()?.get_mut(fetchable)
    }

    pub fn add_property(&mut self, fetchable: &Fetchable) -> Result<&mut DynamicFetchBuilderStandard> {
        let Self { owner, map } = self;
        let owner = owner.as_str();
        map.get_or_insert_with(FetchBuilderMap::default)
            .add_standard(owner, fetchable, Some(owner))
    }

    pub fn add_fetch_builder(&mut self, fetchable: FetchableId, builder: FetchBuilder) {
        if let Some(previous) = self
            .map
            .get_or_insert_with(FetchBuilderMap::default)
            .insert(fetchable, builder)
        {
            tracing::trace!(owner = %self.owner, ?fetchable, previous = %previous.describe(), "replaced fetch builder");
        }
    }

    pub fn visit_fetch_builders(&self, mut f: impl FnMut(FetchableId, &FetchBuilder)) {
        if let Some(map) = &self.map {
            for (fetchable, builder) in map.iter() {
                f(fetchable, builder);
            }
        }
    }

    /// Deep copy whose standard builders point back at the new container.
    pub fn cache_key_instance(&self) -> Self {
        Self {
            owner: self.owner.clone(),
            map: self
                .map
                .as_ref()
                .map(|map| map.cache_key_instance(Some(&self.owner))),
        }
    }
}

impl FetchContainer for FetchBuilderContainer {
    fn fetch_builder_container(&self) -> &FetchBuilderContainer {
        self
    }

    fn fetch_builder_container_mut(&mut self) -> &mut FetchBuilderContainer {
        self
    }
}

impl PartialEq for FetchBuilderContainer {
    fn eq(&self, other: &Self) -> bool {
        self.map == other.map
    }
}

impl Eq for FetchBuilderContainer {}

impl Hash for FetchBuilderContainer {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match &self.map {
            Some(map) => map.hash(state),
            // Same contribution as an empty map
            None => 0usize.hash(state),
        }
    }
}
