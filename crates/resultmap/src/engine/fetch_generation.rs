use super::{CreationState, FetchParent, TableGroupId};
use crate::results::{
    BasicFetch, DelayedFetch, EmbeddedFetch, EntityFetch, EntityResult, Fetch, PluralFetch,
};
use resultmap_core::{
    schema::{app::ModelId, Fetchable, FetchableKind},
    stmt::{FetchTiming, LockMode, NavigablePath},
    Result,
};

/// Identifier, discriminator and attribute fetches of an entity.
struct EntityParts {
    identifier: Box<Fetch>,
    discriminator: Option<usize>,
    fetches: Vec<Fetch>,
}

impl<'m> CreationState<'m> {
    /// Generates the fetch of `fetchable` from the metamodel alone, reading
    /// columns by their own names from `parent`'s table group.
    ///
    /// Sub-fetches are still resolved through [`CreationState::resolve_fetch`],
    /// so builders declared for nested attributes apply.
    pub fn generate_fetchable_fetch(
        &mut self,
        parent: &FetchParent,
        fetchable: &'m Fetchable,
        path: NavigablePath,
        timing: FetchTiming,
    ) -> Result<Fetch> {
        match &fetchable.kind {
            FetchableKind::Basic(basic) => {
                let values_array_position =
                    self.resolve_column_selection(parent.table_group, basic.column)?;

                Ok(Fetch::Basic(BasicFetch {
                    path,
                    fetchable: fetchable.id,
                    values_array_position,
                    ty: basic.ty.clone(),
                    nullable: fetchable.nullable,
                    timing,
                }))
            }
            FetchableKind::Embedded(embedded) => {
                let schema = self.schema;
                let embedded_parent = FetchParent {
                    path: path.clone(),
                    table_group: parent.table_group,
                };

                let mut fetches = Vec::with_capacity(embedded.parts.len());
                for part in &embedded.parts {
                    fetches.push(self.resolve_fetch(&embedded_parent, schema.fetchable(*part))?);
                }

                Ok(Fetch::Embedded(EmbeddedFetch {
                    path,
                    fetchable: fetchable.id,
                    fetches,
                }))
            }
            FetchableKind::ToOne(to_one) => match self.from_clause.find_by_path(&path) {
                Some(table_group) => Ok(Fetch::Entity(self.create_entity_fetch(
                    path,
                    fetchable,
                    to_one.target,
                    table_group,
                    timing,
                )?)),
                None => {
                    let mut key_positions = Vec::with_capacity(to_one.foreign_key.column_span());
                    to_one.foreign_key.visit_key_selectables(|_, column| {
                        key_positions.push(self.resolve_column_selection(parent.table_group, column)?);
                        Ok(())
                    })?;

                    Ok(Fetch::Delayed(DelayedFetch {
                        path,
                        fetchable: fetchable.id,
                        target: to_one.target,
                        key_positions,
                        timing,
                    }))
                }
            },
            FetchableKind::Plural(plural) => {
                let schema = self.schema;

                let mut key_positions = Vec::with_capacity(plural.key.column_span());
                plural.key.visit_target_selectables(|_, column| {
                    key_positions.push(self.resolve_column_selection(parent.table_group, column)?);
                    Ok(())
                })?;

                let table_group = self.from_clause.find_by_path(&path);

                let mut collection_key_positions = vec![];
                let mut index = None;
                let mut element = None;

                if let Some(table_group) = table_group {
                    plural.key.visit_key_selectables(|_, column| {
                        collection_key_positions.push(self.resolve_column_selection(table_group, column)?);
                        Ok(())
                    })?;

                    let collection = FetchParent {
                        path: path.clone(),
                        table_group,
                    };

                    if let Some(id) = plural.index {
                        let fetch = self.resolve_fetch_at(
                            &collection,
                            schema.fetchable(id),
                            path.index(),
                            FetchTiming::Immediate,
                        )?;
                        index = Some(Box::new(fetch));
                    }

                    let fetch = self.resolve_fetch_at(
                        &collection,
                        schema.fetchable(plural.element),
                        path.element(),
                        FetchTiming::Immediate,
                    )?;
                    element = Some(Box::new(fetch));
                }

                Ok(Fetch::Plural(PluralFetch {
                    path,
                    fetchable: fetchable.id,
                    key_positions,
                    table_group,
                    collection_key_positions,
                    index,
                    element,
                    timing,
                }))
            }
        }
    }

    /// Builds a top-level entity result over `table_group`.
    pub fn create_entity_result(
        &mut self,
        path: NavigablePath,
        model: ModelId,
        table_group: TableGroupId,
        lock_mode: LockMode,
    ) -> Result<EntityResult> {
        let parts = self.create_entity_parts(&path, model, table_group)?;
        let alias = self.from_clause.table_group(table_group).alias.clone();

        Ok(EntityResult {
            path,
            model,
            table_group,
            alias,
            identifier: parts.identifier,
            discriminator: parts.discriminator,
            fetches: parts.fetches,
            lock_mode,
        })
    }

    /// Builds the fetch of an entity reached through `fetchable`.
    pub fn create_entity_fetch(
        &mut self,
        path: NavigablePath,
        fetchable: &Fetchable,
        model: ModelId,
        table_group: TableGroupId,
        timing: FetchTiming,
    ) -> Result<EntityFetch> {
        let parts = self.create_entity_parts(&path, model, table_group)?;

        Ok(EntityFetch {
            path,
            fetchable: fetchable.id,
            model,
            table_group,
            identifier: parts.identifier,
            discriminator: parts.discriminator,
            fetches: parts.fetches,
            timing,
        })
    }

    fn create_entity_parts(
        &mut self,
        path: &NavigablePath,
        model: ModelId,
        table_group: TableGroupId,
    ) -> Result<EntityParts> {
        let schema = self.schema;
        let parent = FetchParent {
            path: path.clone(),
            table_group,
        };

        let identifier = self.resolve_fetch(&parent, schema.identifier_fetchable(model))?;

        let discriminator = match schema
            .model(model)
            .as_entity()
            .and_then(|entity| entity.discriminator.as_ref())
        {
            Some(discriminator) => {
                Some(self.resolve_column_selection(table_group, discriminator.column)?)
            }
            None => None,
        };

        // The identifier comes first and was resolved above
        let mut fetches = vec![];
        for fetchable in schema.fetchables_of(model).skip(1) {
            fetches.push(self.resolve_fetch(&parent, fetchable)?);
        }

        tracing::trace!(%path, fetches = fetches.len(), "generated entity fetches");

        Ok(EntityParts {
            identifier: Box::new(identifier),
            discriminator,
            fetches,
        })
    }
}
