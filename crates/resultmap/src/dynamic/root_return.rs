use resultmap_core::{
    schema::app::ModelId,
    stmt::{LockMode, NavigablePath},
    Result, Schema,
};

/// An entity returned at the root of a native query.
///
/// Implemented by both entity root builders. The calculated builder maps
/// columns by their own names only, so every customization fails with an
/// unsupported-operation error.
pub trait RootReturn {
    fn table_alias(&self) -> &str;

    fn entity(&self) -> ModelId;

    fn navigable_path(&self) -> &NavigablePath;

    fn lock_mode(&self) -> Option<LockMode>;

    fn try_set_lock_mode(&mut self, lock_mode: LockMode) -> Result<()>;

    fn try_add_id_column_aliases(&mut self, aliases: &[&str]) -> Result<()>;

    fn try_set_discriminator_alias(&mut self, alias: &str) -> Result<()>;

    /// Maps the attribute at the dotted `path` onto `column_aliases`.
    fn try_add_property(&mut self, schema: &Schema, path: &str, column_aliases: &[&str])
        -> Result<()>;
}
