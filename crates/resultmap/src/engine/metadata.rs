use resultmap_core::{schema::db, Error, Result};

/// Describes the columns of the result set a mapping is resolved against.
///
/// Positions are 1-based, as JDBC reports them.
pub trait JdbcValuesMetadata {
    fn column_count(&self) -> usize;

    /// Position of the column labeled `name`. Labels are matched ignoring
    /// case.
    fn resolve_column_position(&self, name: &str) -> Result<usize>;

    fn resolve_column_name(&self, position: usize) -> Result<&str>;

    fn resolve_column_type(&self, position: usize) -> Result<db::Type>;
}

/// In-memory result-set metadata.
#[derive(Debug, Clone, Default)]
pub struct ResultSetMetadata {
    columns: Vec<(String, db::Type)>,
}

impl ResultSetMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a column, returning `self` for chaining.
    pub fn column(mut self, name: impl Into<String>, ty: db::Type) -> Self {
        self.columns.push((name.into(), ty));
        self
    }

    fn entry(&self, position: usize) -> Result<&(String, db::Type)> {
        position
            .checked_sub(1)
            .and_then(|index| self.columns.get(index))
            .ok_or_else(|| Error::unknown_column(format!("#{position}")))
    }
}

impl JdbcValuesMetadata for ResultSetMetadata {
    fn column_count(&self) -> usize {
        self.columns.len()
    }

    fn resolve_column_position(&self, name: &str) -> Result<usize> {
        self.columns
            .iter()
            .position(|(column, _)| column.eq_ignore_ascii_case(name))
            .map(|index| index + 1)
            .ok_or_else(|| Error::unknown_column(name))
    }

    fn resolve_column_name(&self, position: usize) -> Result<&str> {
        self.entry(position).map(|(name, _)| name.as_str())
    }

    fn resolve_column_type(&self, position: usize) -> Result<db::Type> {
        self.entry(position).map(|(_, ty)| *ty)
    }
}
