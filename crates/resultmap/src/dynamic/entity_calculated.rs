use super::RootReturn;
use crate::{engine::CreationState, results::EntityResult};
use resultmap_core::{
    schema::app::ModelId,
    stmt::{LockMode, NavigablePath},
    Error, Result, Schema,
};

/// An entity root read entirely by its own column names.
///
/// Immutable once created; shared by reference in cache keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DynamicResultBuilderEntityCalculated {
    navigable_path: NavigablePath,
    entity: ModelId,
    entity_name: String,
    table_alias: String,
    lock_mode: Option<LockMode>,
}

impl DynamicResultBuilderEntityCalculated {
    pub fn new(
        schema: &Schema,
        entity: &str,
        table_alias: impl Into<String>,
        lock_mode: Option<LockMode>,
    ) -> Result<Self> {
        let model = schema.entity_named(entity)?;
        let table_alias = table_alias.into();

        Ok(Self {
            navigable_path: NavigablePath::with_alias(&model.name, &table_alias),
            entity: model.id,
            entity_name: model.name.clone(),
            table_alias,
            lock_mode,
        })
    }

    pub fn entity_name(&self) -> &str {
        &self.entity_name
    }

    pub fn entity(&self) -> ModelId {
        self.entity
    }

    pub fn table_alias(&self) -> &str {
        &self.table_alias
    }

    pub fn build_result(&self, state: &mut CreationState<'_>) -> Result<EntityResult> {
        let table_group = state.create_root_table_group(
            &self.navigable_path,
            self.entity,
            Some(self.table_alias.as_str()),
        );

        if let Some(lock_mode) = self.lock_mode {
            state.register_lock_mode(&self.table_alias, lock_mode);
        }

        state.create_entity_result(
            self.navigable_path.clone(),
            self.entity,
            table_group,
            self.lock_mode.unwrap_or_default(),
        )
    }

    fn unsupported(&self, operation: &str) -> Error {
        Error::unsupported_operation(format!(
            "{operation} is not supported for calculated entity `{}` (alias `{}`)",
            self.entity_name, self.table_alias
        ))
    }
}

impl RootReturn for DynamicResultBuilderEntityCalculated {
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

    fn try_set_lock_mode(&mut self, _lock_mode: LockMode) -> Result<()> {
        Err(self.unsupported("setting the lock mode"))
    }

    fn try_add_id_column_aliases(&mut self, _aliases: &[&str]) -> Result<()> {
        Err(self.unsupported("declaring identifier columns"))
    }

    fn try_set_discriminator_alias(&mut self, _alias: &str) -> Result<()> {
        Err(self.unsupported("declaring the discriminator column"))
    }

    fn try_add_property(
        &mut self,
        _schema: &Schema,
        _path: &str,
        _column_aliases: &[&str],
    ) -> Result<()> {
        Err(self.unsupported("declaring properties"))
    }
}
