use super::TableGroupId;
use indexmap::IndexMap;
use resultmap_core::{
    schema::db::{self, ColumnId},
    Result,
};

/// What a selection was registered for.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SelectionKey {
    /// A column of a table in a table group
    Column {
        table_group: TableGroupId,
        column: ColumnId,
    },

    /// A scalar column not tied to the metamodel, keyed by its label
    Raw(String),

    /// A scalar column addressed by its 1-based position
    Position(usize),
}

/// A result-set column the mapping reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlSelection {
    /// Index into the row's values array, 0-based
    pub values_array_position: usize,

    /// JDBC position, 1-based
    pub jdbc_position: usize,

    /// Label reported by the result set
    pub column_name: String,

    pub jdbc_type: db::Type,
}

/// Registry of resolved selections.
///
/// The first registration for a key wins. Later requests for the same key
/// return the existing selection without consulting their column alias, so
/// explicitly declared aliases take precedence over anything resolved
/// afterwards.
#[derive(Debug, Default)]
pub(crate) struct Selections {
    by_key: IndexMap<SelectionKey, SqlSelection>,
}

impl Selections {
    pub(crate) fn resolve(
        &mut self,
        key: SelectionKey,
        create: impl FnOnce() -> Result<SqlSelection>,
    ) -> Result<&SqlSelection> {
        if !self.by_key.contains_key(&key) {
            let selection = create()?;
            tracing::trace!(
                ?key,
                column = %selection.column_name,
                position = selection.jdbc_position,
                "registered sql selection"
            );
            self.by_key.insert(key.clone(), selection);
        }

        Ok(&self.by_key[&key])
    }

    pub(crate) fn get(&self, key: &SelectionKey) -> Option<&SqlSelection> {
        self.by_key.get(key)
    }

    /// Distinct selections ordered by JDBC position.
    pub(crate) fn to_sorted_vec(&self) -> Vec<SqlSelection> {
        let mut selections: Vec<_> = self.by_key.values().cloned().collect();
        selections.sort_by_key(|selection| selection.jdbc_position);
        selections.dedup_by_key(|selection| selection.jdbc_position);
        selections
    }
}
