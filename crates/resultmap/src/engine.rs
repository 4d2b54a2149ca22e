//! Resolution of builders against the metamodel and the result set.

mod fetch_generation;

mod from_clause;
pub use from_clause::{FromClause, JoinType, TableGroup, TableGroupId, TableGroupJoin};

mod metadata;
pub use metadata::{JdbcValuesMetadata, ResultSetMetadata};

mod selection;
use selection::Selections;
pub use selection::{SelectionKey, SqlSelection};

use crate::{
    dynamic::{DynamicFetchBuilderLegacy, FetchBuilder, FetchBuilderMap},
    results::{DomainResult, Fetch},
    JdbcValuesMapping,
};
use indexmap::IndexMap;
use resultmap_core::{
    schema::{app::ModelId, db::ColumnId, Fetchable, FetchableId},
    stmt::{FetchTiming, LockMode, NavigablePath},
    Error, Result, Schema,
};
use std::collections::HashMap;

/// Where a fetch is attached: the parent's path and the table group its
/// columns are read from.
#[derive(Debug, Clone)]
pub struct FetchParent {
    pub path: NavigablePath,
    pub table_group: TableGroupId,
}

/// Finds the fetch builders a container declared, while that container's
/// fetches are being generated.
#[derive(Debug, Clone, Copy)]
pub struct ExplicitFetchResolver<'m> {
    container: Option<&'m FetchBuilderMap>,
    table_alias: Option<&'m str>,
}

/// A fetch builder found for a fetchable.
#[derive(Debug, Clone, Copy)]
pub(crate) enum ExplicitFetch<'m> {
    Builder(&'m FetchBuilder),
    Legacy(&'m DynamicFetchBuilderLegacy),
}

/// State shared by every builder while one result-set mapping is resolved.
///
/// Owns the table groups, the SQL selections and the lock modes the mapping
/// needs, and knows which fetch builders were declared for the parent
/// currently generating its fetches.
pub struct CreationState<'m> {
    schema: &'m Schema,
    metadata: &'m dyn JdbcValuesMetadata,
    from_clause: FromClause,
    selections: Selections,
    lock_modes: IndexMap<String, LockMode>,

    /// Innermost resolver last
    resolvers: Vec<ExplicitFetchResolver<'m>>,

    /// Free-standing joins, keyed by owner table alias and fetchable name
    legacy: HashMap<(String, String), &'m DynamicFetchBuilderLegacy>,
}

impl<'m> ExplicitFetchResolver<'m> {
    pub fn new(container: Option<&'m FetchBuilderMap>, table_alias: Option<&'m str>) -> Self {
        Self {
            container,
            table_alias,
        }
    }

    pub fn find(&self, fetchable: FetchableId) -> Option<&'m FetchBuilder> {
        self.container?.get(fetchable)
    }
}

impl<'m> CreationState<'m> {
    pub fn new(schema: &'m Schema, metadata: &'m dyn JdbcValuesMetadata) -> Self {
        Self {
            schema,
            metadata,
            from_clause: FromClause::default(),
            selections: Selections::default(),
            lock_modes: IndexMap::new(),
            resolvers: vec![],
            legacy: HashMap::new(),
        }
    }

    pub fn schema(&self) -> &'m Schema {
        self.schema
    }

    pub fn metadata(&self) -> &'m dyn JdbcValuesMetadata {
        self.metadata
    }

    pub fn from_clause(&self) -> &FromClause {
        &self.from_clause
    }

    pub fn create_root_table_group(
        &mut self,
        path: &NavigablePath,
        model: ModelId,
        alias: Option<&str>,
    ) -> TableGroupId {
        self.from_clause
            .create_root_table_group(self.schema, path, model, alias)
    }

    /// Joins the group of `fetchable` to `parent` with an inner join.
    pub fn create_table_group_join(
        &mut self,
        parent: TableGroupId,
        fetchable: &Fetchable,
        path: &NavigablePath,
        alias: Option<&str>,
    ) -> Result<TableGroupId> {
        self.from_clause.create_table_group_join(
            self.schema,
            parent,
            fetchable,
            path,
            alias,
            JoinType::Inner,
        )
    }

    pub fn register_lock_mode(&mut self, alias: &str, lock_mode: LockMode) {
        tracing::trace!(alias, ?lock_mode, "registered lock mode");
        self.lock_modes.insert(alias.to_string(), lock_mode);
    }

    /// Resolves `column` of `table_group` to the result-set column labeled
    /// `alias`.
    pub fn resolve_explicit_selection(
        &mut self,
        table_group: TableGroupId,
        column: ColumnId,
        alias: &str,
    ) -> Result<usize> {
        let metadata = self.metadata;
        let selection = self.selections.resolve(
            SelectionKey::Column {
                table_group,
                column,
            },
            || sql_selection(metadata, metadata.resolve_column_position(alias)?),
        )?;
        Ok(selection.values_array_position)
    }

    /// Resolves `column` of `table_group` to the result-set column carrying
    /// the column's own name, unless it was already resolved explicitly.
    pub fn resolve_column_selection(
        &mut self,
        table_group: TableGroupId,
        column: ColumnId,
    ) -> Result<usize> {
        let metadata = self.metadata;
        let name = &self.schema.column(column).name;
        let selection = self.selections.resolve(
            SelectionKey::Column {
                table_group,
                column,
            },
            || sql_selection(metadata, metadata.resolve_column_position(name)?),
        )?;
        Ok(selection.values_array_position)
    }

    /// Pairs `columns` positionally with `aliases`. Fails if fewer aliases
    /// than columns were declared.
    pub fn resolve_aliased_columns(
        &mut self,
        table_group: TableGroupId,
        columns: &[ColumnId],
        aliases: &[String],
        fetchable: &str,
    ) -> Result<Vec<usize>> {
        let mut positions = Vec::with_capacity(columns.len());

        for (index, column) in columns.iter().enumerate() {
            let alias = aliases
                .get(index)
                .ok_or_else(|| Error::column_index_out_of_range(index, aliases.len(), fetchable))?;
            positions.push(self.resolve_explicit_selection(table_group, *column, alias)?);
        }

        Ok(positions)
    }

    /// Resolves a scalar column by label, or by 1-based position when given.
    pub fn resolve_raw_selection(
        &mut self,
        name: &str,
        position: Option<usize>,
    ) -> Result<SqlSelection> {
        let metadata = self.metadata;

        let selection = match position {
            Some(position) => self
                .selections
                .resolve(SelectionKey::Position(position), || sql_selection(metadata, position))?,
            None => self.selections.resolve(SelectionKey::Raw(name.to_string()), || {
                sql_selection(metadata, metadata.resolve_column_position(name)?)
            })?,
        };
        Ok(selection.clone())
    }

    pub fn find_selection(&self, key: &SelectionKey) -> Option<&SqlSelection> {
        self.selections.get(key)
    }

    /// Makes `resolver` the innermost explicit-fetch resolver while `f`
    /// runs. The previous resolver is restored on every exit path.
    pub fn with_fetch_resolver<R>(
        &mut self,
        resolver: ExplicitFetchResolver<'m>,
        f: impl FnOnce(&mut Self) -> Result<R>,
    ) -> Result<R> {
        tracing::trace!(
            table_alias = resolver.table_alias,
            depth = self.resolvers.len() + 1,
            "push fetch resolver"
        );
        self.resolvers.push(resolver);

        let result = f(self);

        self.resolvers.pop();
        tracing::trace!(depth = self.resolvers.len(), "pop fetch resolver");

        result
    }

    /// Number of resolvers currently pushed.
    pub fn fetch_resolver_depth(&self) -> usize {
        self.resolvers.len()
    }

    pub(crate) fn register_legacy_fetch_builder(&mut self, builder: &'m DynamicFetchBuilderLegacy) {
        self.legacy.insert(
            (
                builder.owner_table_alias().to_string(),
                builder.fetchable_name().to_string(),
            ),
            builder,
        );
    }

    /// Finds a declared fetch builder for `fetchable`: first from the
    /// innermost resolver, then among the free-standing joins owned by the
    /// parent's table alias.
    pub(crate) fn find_explicit_fetch(
        &self,
        parent: &FetchParent,
        fetchable: &Fetchable,
    ) -> Option<ExplicitFetch<'m>> {
        if let Some(builder) = self
            .resolvers
            .last()
            .and_then(|resolver| resolver.find(fetchable.id))
        {
            return Some(ExplicitFetch::Builder(builder));
        }

        let alias = self
            .from_clause
            .table_group(parent.table_group)
            .alias
            .as_deref()?;

        self.legacy
            .get(&(alias.to_string(), fetchable.name.clone()))
            .copied()
            .map(ExplicitFetch::Legacy)
    }

    /// Produces the fetch of `fetchable` under `parent`, through its declared
    /// builder if there is one.
    pub fn resolve_fetch(&mut self, parent: &FetchParent, fetchable: &'m Fetchable) -> Result<Fetch> {
        let path = parent.path.append(&fetchable.name);
        self.resolve_fetch_at(parent, fetchable, path, fetchable.timing)
    }

    /// Like [`CreationState::resolve_fetch`], at an explicit path. Used for
    /// the index and element of collections, whose paths are not named
    /// after their fetchables.
    pub(crate) fn resolve_fetch_at(
        &mut self,
        parent: &FetchParent,
        fetchable: &'m Fetchable,
        path: NavigablePath,
        timing: FetchTiming,
    ) -> Result<Fetch> {
        match self.find_explicit_fetch(parent, fetchable) {
            Some(ExplicitFetch::Builder(builder)) => builder.build_fetch(parent, fetchable, path, self),
            Some(ExplicitFetch::Legacy(builder)) => builder.build_fetch(parent, fetchable, path, self),
            None => self.generate_fetchable_fetch(parent, fetchable, path, timing),
        }
    }

    pub(crate) fn into_values_mapping(self, results: Vec<DomainResult>) -> JdbcValuesMapping {
        JdbcValuesMapping {
            selections: self.selections.to_sorted_vec(),
            results,
            table_groups: self.from_clause.table_groups().cloned().collect(),
            joins: self.from_clause.joins().to_vec(),
            lock_modes: self.lock_modes,
        }
    }
}

fn sql_selection(metadata: &dyn JdbcValuesMetadata, jdbc_position: usize) -> Result<SqlSelection> {
    let column_name = metadata.resolve_column_name(jdbc_position)?.to_string();
    let jdbc_type = metadata.resolve_column_type(jdbc_position)?;

    // JDBC positions start at 1
    let values_array_position = jdbc_position
        .checked_sub(1)
        .ok_or_else(|| Error::unknown_column(format!("#{jdbc_position}")))?;

    Ok(SqlSelection {
        values_array_position,
        jdbc_position,
        column_name,
        jdbc_type,
    })
}
