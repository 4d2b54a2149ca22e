use crate::{
    converter::Converter,
    dynamic::{
        DynamicFetchBuilderLegacy, DynamicResultBuilderBasic, DynamicResultBuilderBasicConverted,
        DynamicResultBuilderEntityCalculated, DynamicResultBuilderEntityStandard,
        DynamicResultBuilderInstantiation, ResultBuilder,
    },
    engine::{CreationState, JdbcValuesMetadata, SqlSelection, TableGroup, TableGroupJoin},
    results::DomainResult,
};
use indexmap::IndexMap;
use resultmap_core::{
    schema::app::ModelId,
    stmt::{self, LockMode, Value},
    Error, Result, Schema,
};
use std::{ops::Deref, sync::Arc};

/// The results and joins declared for one native query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ResultSetMapping {
    result_builders: Vec<ResultBuilder>,
    legacy_fetch_builders: Vec<DynamicFetchBuilderLegacy>,
}

/// An immutable snapshot of a [`ResultSetMapping`], safe to share between
/// threads and usable as a cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResultSetMappingKey(Arc<ResultSetMapping>);

/// A result-set mapping resolved against a schema and a result set: the
/// columns to read and the results to assemble from them.
#[derive(Debug, Clone)]
pub struct JdbcValuesMapping {
    /// Columns read, ordered by JDBC position
    pub selections: Vec<SqlSelection>,

    pub results: Vec<DomainResult>,

    pub table_groups: Vec<TableGroup>,

    /// Joins the mapping implies, in creation order
    pub joins: Vec<TableGroupJoin>,

    /// Lock modes by table alias
    pub lock_modes: IndexMap<String, LockMode>,
}

impl ResultSetMapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_result_builder(&mut self, builder: impl Into<ResultBuilder>) -> &mut Self {
        self.result_builders.push(builder.into());
        self
    }

    pub fn add_legacy_fetch_builder(&mut self, builder: DynamicFetchBuilderLegacy) -> &mut Self {
        self.legacy_fetch_builders.push(builder);
        self
    }

    pub fn number_of_result_builders(&self) -> usize {
        self.result_builders.len()
    }

    pub fn visit_result_builders(&self, mut f: impl FnMut(usize, &ResultBuilder)) {
        for (index, builder) in self.result_builders.iter().enumerate() {
            f(index, builder);
        }
    }

    pub fn visit_legacy_fetch_builders(&self, mut f: impl FnMut(&DynamicFetchBuilderLegacy)) {
        for builder in &self.legacy_fetch_builders {
            f(builder);
        }
    }

    /// Declares a customizable entity root.
    pub fn add_root(
        &mut self,
        schema: &Schema,
        table_alias: &str,
        entity: &str,
    ) -> Result<&mut DynamicResultBuilderEntityStandard> {
        let builder = DynamicResultBuilderEntityStandard::new(schema, entity, table_alias)?;
        self.result_builders.push(ResultBuilder::Entity(builder));

        match self.result_builders.last_mut() {
            Some(ResultBuilder::Entity(builder)) => Ok(builder),
            _ => unreachable!(),
        }
    }

    /// Declares an entity root read by its own column names.
    pub fn add_entity(
        &mut self,
        schema: &Schema,
        table_alias: &str,
        entity: &str,
        lock_mode: Option<LockMode>,
    ) -> Result<&mut Self> {
        let builder = DynamicResultBuilderEntityCalculated::new(schema, entity, table_alias, lock_mode)?;
        Ok(self.add_result_builder(builder))
    }

    pub fn add_scalar(&mut self, column: &str) -> &mut Self {
        self.add_result_builder(DynamicResultBuilderBasic::new(column))
    }

    pub fn add_scalar_with_type(&mut self, column: &str, ty: stmt::Type) -> &mut Self {
        self.add_result_builder(DynamicResultBuilderBasic::new(column).with_domain_type(ty))
    }

    /// Declares a scalar read from the column at 1-based `position`.
    pub fn add_scalar_at(&mut self, position: usize) -> &mut Self {
        self.add_result_builder(DynamicResultBuilderBasic::by_position(position))
    }

    pub fn add_converted_scalar(&mut self, column: &str, converter: Converter) -> &mut Self {
        self.add_result_builder(DynamicResultBuilderBasicConverted::new(column, converter))
    }

    pub fn add_instantiation(&mut self, target: stmt::Type) -> &mut DynamicResultBuilderInstantiation {
        self.result_builders
            .push(ResultBuilder::Instantiation(DynamicResultBuilderInstantiation::new(target)));

        match self.result_builders.last_mut() {
            Some(ResultBuilder::Instantiation(builder)) => builder,
            _ => unreachable!(),
        }
    }

    /// Declares a join: the attribute `fetchable` of the entity aliased
    /// `owner_alias`, read under `table_alias`.
    pub fn add_join(
        &mut self,
        schema: &Schema,
        table_alias: &str,
        owner_alias: &str,
        fetchable: &str,
    ) -> Result<&mut DynamicFetchBuilderLegacy> {
        let owner = self
            .find_alias_model(schema, owner_alias)
            .ok_or_else(|| unknown_owner(owner_alias, table_alias))?;

        let attribute = schema.resolve_fetchable_path(owner, fetchable)?;
        let role = format!("{}.{}", schema.model(owner).name, fetchable);

        self.legacy_fetch_builders.push(DynamicFetchBuilderLegacy::new(
            table_alias,
            owner_alias,
            attribute,
            role,
        ));

        match self.legacy_fetch_builders.last_mut() {
            Some(builder) => Ok(builder),
            None => unreachable!(),
        }
    }

    /// Entity read under `alias`, by a root or by a join.
    fn find_alias_model(&self, schema: &Schema, alias: &str) -> Option<ModelId> {
        for builder in &self.result_builders {
            match builder {
                ResultBuilder::Entity(builder) if builder.table_alias() == alias => {
                    return Some(builder.entity())
                }
                ResultBuilder::EntityCalculated(builder) if builder.table_alias() == alias => {
                    return Some(builder.entity())
                }
                _ => {}
            }
        }

        self.legacy_fetch_builders
            .iter()
            .find(|builder| builder.table_alias() == alias)
            .and_then(|builder| schema.fetchable(builder.fetchable()).entity_target())
    }

    /// Every join must hang off an alias declared by a root or another join.
    fn validate_aliases(&self) -> Result<()> {
        for builder in &self.legacy_fetch_builders {
            let owner = builder.owner_table_alias();

            let known = self
                .result_builders
                .iter()
                .any(|result| result.table_alias() == Some(owner))
                || self
                    .legacy_fetch_builders
                    .iter()
                    .any(|other| other.table_alias() == owner);

            if !known {
                return Err(unknown_owner(owner, builder.table_alias()));
            }
        }

        Ok(())
    }

    /// Resolves the mapping against `schema` and the columns described by
    /// `metadata`.
    ///
    /// A mapping without results maps every column as a scalar, in column
    /// order.
    pub fn resolve<'m>(
        &'m self,
        schema: &'m Schema,
        metadata: &'m dyn JdbcValuesMetadata,
    ) -> Result<JdbcValuesMapping> {
        self.validate_aliases()?;

        let mut state = CreationState::new(schema, metadata);

        for builder in &self.legacy_fetch_builders {
            state.register_legacy_fetch_builder(builder);
        }

        let mut results = Vec::with_capacity(self.result_builders.len());

        if self.result_builders.is_empty() {
            for position in 1..=metadata.column_count() {
                let builder = DynamicResultBuilderBasic::by_position(position);
                results.push(DomainResult::Basic(builder.build_result(position - 1, &mut state)?));
            }
        } else {
            for (position, builder) in self.result_builders.iter().enumerate() {
                results.push(builder.build_result(position, &mut state)?);
            }
        }

        let mapping = state.into_values_mapping(results);

        tracing::debug!(
            results = mapping.results.len(),
            selections = mapping.selections.len(),
            joins = mapping.joins.len(),
            "resolved result-set mapping"
        );

        Ok(mapping)
    }

    /// Freezes the mapping into an immutable snapshot.
    pub fn cache_key(&self) -> ResultSetMappingKey {
        ResultSetMappingKey(Arc::new(Self {
            result_builders: self
                .result_builders
                .iter()
                .map(ResultBuilder::cache_key_instance)
                .collect(),
            legacy_fetch_builders: self
                .legacy_fetch_builders
                .iter()
                .map(DynamicFetchBuilderLegacy::cache_key_instance)
                .collect(),
        }))
    }
}

fn unknown_owner(owner: &str, alias: &str) -> Error {
    Error::illegal_state(format!("Owner alias [{owner}] is unknown for alias [{alias}]"))
}

impl ResultSetMappingKey {
    pub fn mapping(&self) -> &ResultSetMapping {
        &self.0
    }
}

impl Deref for ResultSetMappingKey {
    type Target = ResultSetMapping;

    fn deref(&self) -> &ResultSetMapping {
        &self.0
    }
}

impl JdbcValuesMapping {
    /// Number of values each row must carry.
    pub fn row_size(&self) -> usize {
        self.selections
            .last()
            .map(|selection| selection.values_array_position + 1)
            .unwrap_or(0)
    }

    /// Assembles every result from one row.
    pub fn assemble(&self, row: &[Value]) -> Result<Vec<Value>> {
        self.results.iter().map(|result| result.assemble(row)).collect()
    }

    pub fn result_types(&self) -> Vec<stmt::Type> {
        self.results.iter().map(DomainResult::result_type).collect()
    }
}
