use crate::{
    engine::{CreationState, FetchParent},
    results::Fetch,
};
use resultmap_core::{
    schema::{db::ColumnId, Fetchable, FetchableId, FetchableKind},
    stmt::{FetchTiming, NavigablePath},
    Error, Result,
};
use std::hash::{Hash, Hasher};

/// Maps one fetchable onto explicitly named result-set columns.
///
/// The Nth column alias pairs with the Nth selectable of the fetchable, in
/// the order the metamodel enumerates them.
#[derive(Debug, Clone)]
pub struct DynamicFetchBuilderStandard {
    fetchable: FetchableId,
    fetchable_name: String,
    column_names: Vec<String>,

    /// Owner of the container holding this builder. Not part of equality.
    container: Option<String>,
}

impl DynamicFetchBuilderStandard {
    pub fn new(fetchable: &Fetchable) -> Self {
        Self {
            fetchable: fetchable.id,
            fetchable_name: fetchable.name.clone(),
            column_names: vec![],
            container: None,
        }
    }

    pub fn fetchable(&self) -> FetchableId {
        self.fetchable
    }

    pub fn fetchable_name(&self) -> &str {
        &self.fetchable_name
    }

    /// Appends the alias of the next selectable.
    pub fn add_column_alias(&mut self, alias: impl Into<String>) -> &mut Self {
        self.column_names.push(alias.into());
        self
    }

    pub fn column_aliases(&self) -> &[String] {
        &self.column_names
    }

    pub fn container(&self) -> Option<&str> {
        self.container.as_deref()
    }

    pub(crate) fn set_container(&mut self, owner: &str) {
        self.container = Some(owner.to_string());
    }

    pub fn cache_key_instance(&self) -> Self {
        self.clone()
    }

    /// Cache key instance re-parented to the container that holds it.
    pub fn cache_key_instance_for(&self, owner: Option<&str>) -> Self {
        Self {
            container: owner.map(str::to_string).or_else(|| self.container.clone()),
            ..self.clone()
        }
    }

    pub fn build_fetch<'m>(
        &self,
        parent: &FetchParent,
        fetchable: &'m Fetchable,
        path: NavigablePath,
        state: &mut CreationState<'m>,
    ) -> Result<Fetch> {
        if fetchable.id != self.fetchable {
            return Err(Error::invariant_violation(format!(
                "fetch builder for `{}` asked to build `{}`",
                self.fetchable_name, fetchable.name
            )));
        }

        let mut columns = Vec::with_capacity(fetchable.column_span());
        let mut collect = |_: usize, column: ColumnId| -> Result<()> {
            columns.push(column);
            Ok(())
        };

        let timing = match &fetchable.kind {
            FetchableKind::Basic(_) => {
                fetchable.for_each_selectable(&mut collect)?;
                fetchable.timing
            }
            FetchableKind::Embedded(_) => {
                fetchable.for_each_selectable(&mut collect)?;
                FetchTiming::Immediate
            }
            FetchableKind::ToOne(to_one) => {
                to_one.foreign_key.visit_key_selectables(&mut collect)?;
                fetchable.timing
            }
            FetchableKind::Plural(plural) => {
                plural.key.visit_target_selectables(&mut collect)?;
                fetchable.timing
            }
        };

        state.resolve_aliased_columns(
            parent.table_group,
            &columns,
            &self.column_names,
            &self.fetchable_name,
        )?;

        state.generate_fetchable_fetch(parent, fetchable, path, timing)
    }
}

impl PartialEq for DynamicFetchBuilderStandard {
    fn eq(&self, other: &Self) -> bool {
        self.fetchable == other.fetchable && self.column_names == other.column_names
    }
}

impl Eq for DynamicFetchBuilderStandard {}

impl Hash for DynamicFetchBuilderStandard {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.fetchable.hash(state);
        self.column_names.hash(state);
    }
}
