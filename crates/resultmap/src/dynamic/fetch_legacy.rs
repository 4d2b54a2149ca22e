use super::{
    DynamicFetchBuilderStandard, DynamicResultBuilderEntityStandard, FetchBuilder, FetchBuilderMap,
};
use crate::{
    engine::{CreationState, ExplicitFetchResolver, FetchParent},
    results::Fetch,
};
use resultmap_core::{
    schema::{Fetchable, FetchableId, FetchableKind},
    stmt::{FetchTiming, LockMode, NavigablePath},
    Error, Result, Schema,
};

/// A fetch declared as a free-standing join: its own table alias, the alias
/// of the owner it hangs off, and optionally the columns of its key.
///
/// The owner's table group must be resolved before this builder is; the
/// mapping resolves roots first to guarantee it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DynamicFetchBuilderLegacy {
    table_alias: String,
    owner_table_alias: String,
    fetchable: FetchableId,
    fetchable_name: String,

    /// Owner entity and attribute, e.g. `Order.customer`
    role: String,

    column_names: Option<Vec<String>>,
    fetch_builders: FetchBuilderMap,

    /// Set when the joined target is itself mapped as a customized entity
    result_builder_entity: Option<Box<DynamicResultBuilderEntityStandard>>,

    lock_mode: Option<LockMode>,
}

impl DynamicFetchBuilderLegacy {
    pub fn new(
        table_alias: impl Into<String>,
        owner_table_alias: impl Into<String>,
        fetchable: &Fetchable,
        role: impl Into<String>,
    ) -> Self {
        Self {
            table_alias: table_alias.into(),
            owner_table_alias: owner_table_alias.into(),
            fetchable: fetchable.id,
            fetchable_name: fetchable.name.clone(),
            role: role.into(),
            column_names: None,
            fetch_builders: FetchBuilderMap::new(),
            result_builder_entity: None,
            lock_mode: None,
        }
    }

    pub fn table_alias(&self) -> &str {
        &self.table_alias
    }

    pub fn owner_table_alias(&self) -> &str {
        &self.owner_table_alias
    }

    pub fn fetchable(&self) -> FetchableId {
        self.fetchable
    }

    pub fn fetchable_name(&self) -> &str {
        &self.fetchable_name
    }

    pub fn role(&self) -> &str {
        &self.role
    }

    pub fn column_aliases(&self) -> Option<&[String]> {
        self.column_names.as_deref()
    }

    pub fn lock_mode(&self) -> Option<LockMode> {
        self.lock_mode
    }

    pub fn fetch_builders(&self) -> &FetchBuilderMap {
        &self.fetch_builders
    }

    pub fn result_builder_entity(&self) -> Option<&DynamicResultBuilderEntityStandard> {
        self.result_builder_entity.as_deref()
    }

    /// Appends a key column alias.
    pub fn add_column_alias(&mut self, alias: impl Into<String>) -> &mut Self {
        self.column_names
            .get_or_insert_with(Vec::new)
            .push(alias.into());
        self
    }

    pub fn set_lock_mode(&mut self, lock_mode: LockMode) -> &mut Self {
        self.lock_mode = Some(lock_mode);
        self
    }

    /// Maps the joined target as a customized entity. Building the fetch is
    /// then delegated to `builder`.
    pub fn set_result_builder_entity(&mut self, builder: DynamicResultBuilderEntityStandard) -> &mut Self {
        self.result_builder_entity = Some(Box::new(builder));
        self
    }

    pub fn find_fetch_builder(&self, fetchable: FetchableId) -> Option<&FetchBuilder> {
        self.fetch_builders.get(fetchable)
    }

    pub fn add_fetch_builder(&mut self, fetchable: FetchableId, builder: impl Into<FetchBuilder>) {
        self.fetch_builders.insert(fetchable, builder.into());
    }

    pub fn visit_fetch_builders(&self, mut f: impl FnMut(FetchableId, &FetchBuilder)) {
        for (fetchable, builder) in self.fetch_builders.iter() {
            f(fetchable, builder);
        }
    }

    /// Declares a standard fetch builder for the attribute named `name`,
    /// relative to the joined fetchable.
    ///
    /// For an association the name is a dotted path on the target entity.
    /// For a plural attribute `key` and `element` name the collection's index
    /// and element; any other name is resolved on the element entity, with an
    /// optional leading `element.`.
    pub fn add_property(&mut self, schema: &Schema, name: &str) -> Result<&mut DynamicFetchBuilderStandard> {
        let fetchable = self.resolve_property(schema, name)?;
        self.fetch_builders.add_standard(&self.role, fetchable, None)
    }

    fn resolve_property<'s>(&self, schema: &'s Schema, name: &str) -> Result<&'s Fetchable> {
        let joined = schema.fetchable(self.fetchable);

        match &joined.kind {
            FetchableKind::ToOne(to_one) => schema.resolve_fetchable_path(to_one.target, name),
            FetchableKind::Plural(plural) => match name {
                "key" => plural
                    .index
                    .map(|index| schema.fetchable(index))
                    .ok_or_else(|| Error::unknown_attribute(&self.role, name)),
                "element" => Ok(schema.fetchable(plural.element)),
                _ => {
                    let name = name.strip_prefix("element.").unwrap_or(name);
                    let target = plural
                        .element_kind
                        .target()
                        .ok_or_else(|| Error::unknown_attribute(&self.role, name))?;
                    schema.resolve_fetchable_path(target, name)
                }
            },
            FetchableKind::Embedded(_) => {
                let mut current = joined;
                for segment in name.split('.') {
                    current = schema
                        .find_sub_fetchable(current, segment)
                        .ok_or_else(|| Error::unknown_attribute(&self.role, name))?;
                }
                Ok(current)
            }
            FetchableKind::Basic(_) => Err(Error::unknown_attribute(&self.role, name)),
        }
    }

    pub fn cache_key_instance(&self) -> Self {
        Self {
            table_alias: self.table_alias.clone(),
            owner_table_alias: self.owner_table_alias.clone(),
            fetchable: self.fetchable,
            fetchable_name: self.fetchable_name.clone(),
            role: self.role.clone(),
            column_names: self.column_names.clone(),
            fetch_builders: self.fetch_builders.cache_key_instance(None),
            result_builder_entity: self
                .result_builder_entity
                .as_ref()
                .map(|builder| Box::new(builder.cache_key_instance())),
            lock_mode: self.lock_mode,
        }
    }

    pub fn build_fetch<'m>(
        &'m self,
        parent: &FetchParent,
        fetchable: &'m Fetchable,
        path: NavigablePath,
        state: &mut CreationState<'m>,
    ) -> Result<Fetch> {
        let owner = state.from_clause().expect_by_alias(&self.owner_table_alias)?;

        let joined = if fetchable.is_joinable() {
            Some(state.create_table_group_join(owner, fetchable, &path, Some(self.table_alias.as_str()))?)
        } else {
            None
        };

        if let Some(lock_mode) = self.lock_mode {
            state.register_lock_mode(&self.table_alias, lock_mode);
        }

        if let Some(columns) = &self.column_names {
            let (table_group, selectables) = match &fetchable.kind {
                FetchableKind::Embedded(embedded) => (owner, &embedded.selectables),
                FetchableKind::ToOne(to_one) => (owner, &to_one.foreign_key.key),
                FetchableKind::Plural(plural) => (joined.unwrap_or(owner), &plural.key.key),
                FetchableKind::Basic(_) => {
                    return Err(Error::invariant_violation(format!(
                        "join `{}` cannot pair columns with basic attribute `{}`",
                        self.table_alias, fetchable.name
                    )))
                }
            };

            state.resolve_aliased_columns(table_group, selectables, columns, &self.fetchable_name)?;
        }

        if let Some(entity) = &self.result_builder_entity {
            return entity.build_fetch(parent, fetchable, path, state);
        }

        let owner_parent = FetchParent {
            path: parent.path.clone(),
            table_group: owner,
        };

        state.with_fetch_resolver(
            ExplicitFetchResolver::new(Some(&self.fetch_builders), Some(self.table_alias.as_str())),
            |state| state.generate_fetchable_fetch(&owner_parent, fetchable, path, FetchTiming::Immediate),
        )
    }
}
