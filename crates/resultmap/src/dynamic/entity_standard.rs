use super::{
    DynamicFetchBuilderLegacy, DynamicFetchBuilderStandard, FetchBuilder, FetchBuilderContainer,
    FetchContainer, RootReturn,
};
use crate::{
    engine::{CreationState, ExplicitFetchResolver, FetchParent, TableGroupId},
    results::{EntityResult, Fetch},
};
use resultmap_core::{
    schema::{app::ModelId, db::ColumnId, Fetchable, FetchableId},
    stmt::{FetchTiming, LockMode, NavigablePath},
    Error, Result, Schema,
};

/// Maps an entity, either as a query root or as the target of a fetch,
/// onto explicitly aliased columns.
///
/// Identifier and discriminator aliases may be declared directly. Any other
/// attribute is customized through the builder's fetch builders; attributes
/// without one are read by their column names.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DynamicResultBuilderEntityStandard {
    navigable_path: NavigablePath,
    entity: ModelId,
    entity_name: String,
    table_alias: String,
    lock_mode: Option<LockMode>,

    /// Takes precedence over the identifier's fetch builder
    id_column_aliases: Option<Vec<String>>,

    discriminator_column_alias: Option<String>,
    fetch_builders: FetchBuilderContainer,
}

impl DynamicResultBuilderEntityStandard {
    /// A root builder for the entity named `entity` under `table_alias`.
    pub fn new(schema: &Schema, entity: &str, table_alias: impl Into<String>) -> Result<Self> {
        let model = schema.entity_named(entity)?;
        let table_alias = table_alias.into();

        Ok(Self::with_path(
            NavigablePath::with_alias(&model.name, &table_alias),
            model.id,
            &model.name,
            table_alias,
        ))
    }

    /// A builder rooted at an arbitrary path, used for fetched entities.
    pub fn with_path(
        navigable_path: NavigablePath,
        entity: ModelId,
        entity_name: &str,
        table_alias: impl Into<String>,
    ) -> Self {
        Self {
            navigable_path,
            entity,
            entity_name: entity_name.to_string(),
            table_alias: table_alias.into(),
            lock_mode: None,
            id_column_aliases: None,
            discriminator_column_alias: None,
            fetch_builders: FetchBuilderContainer::new(entity_name),
        }
    }

    pub fn navigable_path(&self) -> &NavigablePath {
        &self.navigable_path
    }

    pub fn entity(&self) -> ModelId {
        self.entity
    }

    pub fn entity_name(&self) -> &str {
        &self.entity_name
    }

    pub fn table_alias(&self) -> &str {
        &self.table_alias
    }

    pub fn lock_mode(&self) -> Option<LockMode> {
        self.lock_mode
    }

    pub fn id_column_aliases(&self) -> Option<&[String]> {
        self.id_column_aliases.as_deref()
    }

    pub fn discriminator_column_alias(&self) -> Option<&str> {
        self.discriminator_column_alias.as_deref()
    }

    pub fn set_lock_mode(&mut self, lock_mode: LockMode) -> &mut Self {
        self.lock_mode = Some(lock_mode);
        self
    }

    /// Appends identifier column aliases, in identifier column order.
    pub fn add_id_column_aliases<I>(&mut self, aliases: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.id_column_aliases
            .get_or_insert_with(Vec::new)
            .extend(aliases.into_iter().map(Into::into));
        self
    }

    pub fn set_discriminator_alias(&mut self, alias: impl Into<String>) -> &mut Self {
        self.discriminator_column_alias = Some(alias.into());
        self
    }

    /// Declares a fetch builder for the attribute at `path`.
    ///
    /// A plain name declares a standard builder on this entity. A dotted
    /// path must start with an embedded attribute; the remainder is declared
    /// on a join builder for that attribute, created on first use.
    pub fn add_property_path(
        &mut self,
        schema: &Schema,
        path: &str,
    ) -> Result<&mut DynamicFetchBuilderStandard> {
        let Some((head, tail)) = path.split_once('.') else {
            let fetchable = schema.resolve_fetchable_path(self.entity, path)?;
            return self.add_property(fetchable);
        };

        let fetchable = schema.resolve_fetchable_path(self.entity, head)?;
        if !fetchable.is_embedded() {
            return Err(Error::unsupported_operation(format!(
                "nested property `{path}` of `{}` must start with an embedded attribute",
                self.entity_name
            )));
        }

        if self.find_fetch_builder(fetchable.id).is_none() {
            let role = format!("{}.{}", self.entity_name, fetchable.name);
            let join = DynamicFetchBuilderLegacy::new("", &self.table_alias, fetchable, role);
            self.add_fetch_builder(fetchable.id, join);
        }

        let owner = self.entity_name.clone();
        match self.fetch_builders.find_mut(fetchable.id) {
            Some(FetchBuilder::Legacy(join)) => join.add_property(schema, tail),
            Some(existing) => Err(Error::duplicate_fetch_builder(
                owner,
                &fetchable.name,
                existing.describe(),
            )),
            None => unreachable!(),
        }
    }

    pub fn cache_key_instance(&self) -> Self {
        Self {
            navigable_path: self.navigable_path.clone(),
            entity: self.entity,
            entity_name: self.entity_name.clone(),
            table_alias: self.table_alias.clone(),
            lock_mode: self.lock_mode,
            id_column_aliases: self.id_column_aliases.clone(),
            discriminator_column_alias: self.discriminator_column_alias.clone(),
            fetch_builders: self.fetch_builders.cache_key_instance(),
        }
    }

    /// Builds the entity as a query root.
    pub fn build_result<'m>(&'m self, state: &mut CreationState<'m>) -> Result<EntityResult> {
        let path = self.navigable_path.clone();
        let lock_mode = self.lock_mode.unwrap_or_default();

        self.resolve(None, path.clone(), state, |state, table_group| {
            state.create_entity_result(path, self.entity, table_group, lock_mode)
        })
    }

    /// Builds the entity as the target of `fetchable`, a to-one association
    /// or the element of a plural attribute.
    pub fn build_fetch<'m>(
        &'m self,
        parent: &FetchParent,
        fetchable: &'m Fetchable,
        path: NavigablePath,
        state: &mut CreationState<'m>,
    ) -> Result<Fetch> {
        self.resolve(Some((parent, fetchable)), path.clone(), state, |state, _| {
            state.generate_fetchable_fetch(parent, fetchable, path, FetchTiming::Immediate)
        })
    }

    fn resolve<'m, R>(
        &'m self,
        fetch: Option<(&FetchParent, &'m Fetchable)>,
        path: NavigablePath,
        state: &mut CreationState<'m>,
        build: impl FnOnce(&mut CreationState<'m>, TableGroupId) -> Result<R>,
    ) -> Result<R> {
        let schema = state.schema();

        let table_group = match fetch {
            None => state.create_root_table_group(&path, self.entity, Some(self.table_alias.as_str())),
            Some((parent, fetchable)) => state.create_table_group_join(
                parent.table_group,
                fetchable,
                &path,
                Some(self.table_alias.as_str()),
            )?,
        };

        if let Some(lock_mode) = self.lock_mode {
            state.register_lock_mode(&self.table_alias, lock_mode);
        }

        let id_builder = self
            .fetch_builders
            .find(FetchableId::Identifier(self.entity));

        let key_column_aliases = self
            .id_column_aliases
            .as_deref()
            .or_else(|| id_builder.and_then(FetchBuilder::column_aliases));

        if let Some(aliases) = key_column_aliases {
            match fetch.and_then(|(_, fetchable)| fetchable.as_plural()) {
                Some(plural) if plural.element_kind.is_many_to_many() => {
                    // Join table columns referencing the owner
                    state.resolve_aliased_columns(
                        table_group,
                        &plural.key.key,
                        aliases,
                        &self.entity_name,
                    )?;

                    let id_aliases = match id_builder {
                        Some(builder @ (FetchBuilder::Standard(_) | FetchBuilder::Legacy(_))) => {
                            builder.column_aliases().unwrap_or_default()
                        }
                        Some(builder) => {
                            return Err(Error::invariant_violation(format!(
                                "unexpected identifier fetch builder for `{}`: {}",
                                self.entity_name,
                                builder.describe()
                            )))
                        }
                        None => {
                            return Err(Error::invariant_violation(format!(
                                "no identifier fetch builder declared for many-to-many element `{}`",
                                self.entity_name
                            )))
                        }
                    };

                    let columns = identifier_columns(schema, self.entity)?;
                    state.resolve_aliased_columns(
                        table_group,
                        &columns,
                        id_aliases,
                        &self.entity_name,
                    )?;
                }
                Some(plural) => {
                    state.resolve_aliased_columns(
                        table_group,
                        &plural.key.key,
                        aliases,
                        &self.entity_name,
                    )?;
                }
                None => {
                    let columns = identifier_columns(schema, self.entity)?;
                    state.resolve_aliased_columns(table_group, &columns, aliases, &self.entity_name)?;
                }
            }
        }

        if let Some(alias) = &self.discriminator_column_alias {
            let discriminator = schema
                .model(self.entity)
                .as_entity()
                .and_then(|entity| entity.discriminator.as_ref())
                .ok_or_else(|| {
                    Error::illegal_state(format!(
                        "entity `{}` has no discriminator column",
                        self.entity_name
                    ))
                })?;

            state.resolve_explicit_selection(table_group, discriminator.column, alias)?;
        }

        state.with_fetch_resolver(
            ExplicitFetchResolver::new(self.fetch_builders.map(), Some(self.table_alias.as_str())),
            |state| build(state, table_group),
        )
    }
}

fn identifier_columns(schema: &Schema, entity: ModelId) -> Result<Vec<ColumnId>> {
    let mut columns = vec![];
    schema
        .identifier_fetchable(entity)
        .for_each_selectable(|_, column| {
            columns.push(column);
            Ok(())
        })?;
    Ok(columns)
}

impl FetchContainer for DynamicResultBuilderEntityStandard {
    fn fetch_builder_container(&self) -> &FetchBuilderContainer {
        &self.fetch_builders
    }

    fn fetch_builder_container_mut(&mut self) -> &mut FetchBuilderContainer {
        &mut self.fetch_builders
    }
}

impl RootReturn for DynamicResultBuilderEntityStandard {
    fn table_alias(&self) -> &str {
        &self.table_alias
    }

    fn entity(&self) -> ModelId {
        self.entity
    }

    fn navigable_path(&self) -> &NavigablePath {
        &self.navigable_path
    }

    fn lock_mode(&self) -> Option<LockMode> {
        self.lock_mode
    }

    fn try_set_lock_mode(&mut self, lock_mode: LockMode) -> Result<()> {
        self.set_lock_mode(lock_mode);
        Ok(())
    }

    fn try_add_id_column_aliases(&mut self, aliases: &[&str]) -> Result<()> {
        self.add_id_column_aliases(aliases.iter().copied());
        Ok(())
    }

    fn try_set_discriminator_alias(&mut self, alias: &str) -> Result<()> {
        self.set_discriminator_alias(alias);
        Ok(())
    }

    fn try_add_property(
        &mut self,
        schema: &Schema,
        path: &str,
        column_aliases: &[&str],
    ) -> Result<()> {
        let builder = self.add_property_path(schema, path)?;
        for alias in column_aliases {
            builder.add_column_alias(*alias);
        }
        Ok(())
    }
}
