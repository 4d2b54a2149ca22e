use crate::{
    schema::db::{ColumnId, TableId},
    Result,
};

/// Pairs referring columns with the columns they reference.
///
/// For a to-one association the key side holds the join columns on the
/// owning table and the target side holds the associated entity's
/// identifier columns. For a plural attribute the key side lives in the
/// collection table and the target side is the owner's identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ForeignKey {
    /// Referring columns
    pub key: Vec<ColumnId>,

    /// Referenced columns, positionally paired with `key`
    pub target: Vec<ColumnId>,
}

impl ForeignKey {
    pub fn key_table(&self) -> TableId {
        self.key[0].table
    }

    pub fn target_table(&self) -> TableId {
        self.target[0].table
    }

    pub fn column_span(&self) -> usize {
        self.key.len()
    }

    pub fn visit_key_selectables(
        &self,
        mut f: impl FnMut(usize, ColumnId) -> Result<()>,
    ) -> Result<()> {
        for (index, column) in self.key.iter().enumerate() {
            f(index, *column)?;
        }
        Ok(())
    }

    pub fn visit_target_selectables(
        &self,
        mut f: impl FnMut(usize, ColumnId) -> Result<()>,
    ) -> Result<()> {
        for (index, column) in self.target.iter().enumerate() {
            f(index, *column)?;
        }
        Ok(())
    }

    /// Iterates `(key, target)` column pairs, the join predicate of the
    /// association.
    pub fn pairs(&self) -> impl Iterator<Item = (ColumnId, ColumnId)> + '_ {
        self.key.iter().copied().zip(self.target.iter().copied())
    }
}
