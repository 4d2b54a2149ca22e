use index_vec::IndexVec;
use resultmap_core::{
    schema::{app::ModelId, app::CollectionElement, db::ColumnId, db::TableId, Fetchable, FetchableId, FetchableKind},
    stmt::NavigablePath,
    Error, Result, Schema,
};
use std::collections::HashMap;

index_vec::define_index_type! {
    pub struct TableGroupId = u32;
}

/// The tables a navigable path reads from, as seen by the SQL the caller
/// wrote.
#[derive(Debug, Clone)]
pub struct TableGroup {
    pub id: TableGroupId,

    /// Path the group was created for
    pub path: NavigablePath,

    /// Table alias used in the SQL, if the mapping declared one
    pub alias: Option<String>,

    /// Entity read from the group, if any. Groups of basic-valued collections
    /// have none.
    pub model: Option<ModelId>,

    /// Tables in join order. The last table holds the model's columns; a
    /// many-to-many group starts with the join table.
    pub tables: Vec<TableId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinType {
    Inner,
    Left,
}

/// A join synthesized between two table groups.
#[derive(Debug, Clone)]
pub struct TableGroupJoin {
    pub parent: TableGroupId,
    pub group: TableGroupId,
    pub join_type: JoinType,

    /// Fetchable producing the join
    pub fetchable: FetchableId,

    /// `(left, right)` column pairs, compared for equality
    pub predicate: Vec<(ColumnId, ColumnId)>,
}

/// Table groups created while resolving one result-set mapping.
///
/// Groups are created at most once per navigable path: asking again returns
/// the existing group.
#[derive(Debug, Default)]
pub struct FromClause {
    groups: IndexVec<TableGroupId, TableGroup>,
    by_path: HashMap<NavigablePath, TableGroupId>,
    by_alias: HashMap<String, TableGroupId>,
    joins: Vec<TableGroupJoin>,
}

impl FromClause {
    pub fn table_group(&self, id: TableGroupId) -> &TableGroup {
        &self.groups[id]
    }

    pub fn table_groups(&self) -> impl ExactSizeIterator<Item = &TableGroup> + '_ {
        self.groups.iter()
    }

    pub fn joins(&self) -> &[TableGroupJoin] {
        &self.joins
    }

    pub fn find_by_path(&self, path: &NavigablePath) -> Option<TableGroupId> {
        self.by_path.get(path).copied()
    }

    pub fn find_by_alias(&self, alias: &str) -> Option<TableGroupId> {
        self.by_alias.get(alias).copied()
    }

    /// Returns the group registered under `alias`, failing if the alias has
    /// not been resolved yet.
    pub fn expect_by_alias(&self, alias: &str) -> Result<TableGroupId> {
        self.find_by_alias(alias)
            .ok_or_else(|| Error::unknown_table_group(alias))
    }

    /// Resolves the root group of an entity.
    pub fn create_root_table_group(
        &mut self,
        schema: &Schema,
        path: &NavigablePath,
        model: ModelId,
        alias: Option<&str>,
    ) -> TableGroupId {
        if let Some(id) = self.find_by_path(path) {
            return id;
        }

        let id = self.push(path, alias, Some(model), vec![schema.model(model).table()]);
        tracing::trace!(%path, ?alias, ?id, "created root table group");
        id
    }

    /// Resolves the group joined through `fetchable` from `parent`.
    ///
    /// For plural attributes the element path `<path>.element` is mapped to
    /// the same group.
    pub fn create_table_group_join(
        &mut self,
        schema: &Schema,
        parent: TableGroupId,
        fetchable: &Fetchable,
        path: &NavigablePath,
        alias: Option<&str>,
        join_type: JoinType,
    ) -> Result<TableGroupId> {
        if let Some(id) = self.find_by_path(path) {
            return Ok(id);
        }

        let (model, tables, predicate) = match &fetchable.kind {
            FetchableKind::ToOne(to_one) => (
                Some(to_one.target),
                vec![schema.model(to_one.target).table()],
                to_one.foreign_key.pairs().collect(),
            ),
            FetchableKind::Plural(plural) => {
                let mut predicate: Vec<_> = plural.key.pairs().collect();

                let (model, tables) = match &plural.element_kind {
                    CollectionElement::Basic { .. } => (None, vec![plural.collection_table]),
                    CollectionElement::OneToMany { target } => (Some(*target), vec![plural.collection_table]),
                    CollectionElement::ManyToMany {
                        target,
                        foreign_key,
                    } => {
                        predicate.extend(foreign_key.pairs());
                        (
                            Some(*target),
                            vec![plural.collection_table, schema.model(*target).table()],
                        )
                    }
                };

                (model, tables, predicate)
            }
            _ => {
                return Err(Error::invariant_violation(format!(
                    "`{}` is not joinable",
                    fetchable.name
                )))
            }
        };

        let id = self.push(path, alias, model, tables);

        if fetchable.is_plural() {
            self.by_path.insert(path.element(), id);
        }

        self.joins.push(TableGroupJoin {
            parent,
            group: id,
            join_type,
            fetchable: fetchable.id,
            predicate,
        });

        tracing::trace!(%path, ?alias, ?parent, ?id, ?join_type, "created table group join");
        Ok(id)
    }

    fn push(
        &mut self,
        path: &NavigablePath,
        alias: Option<&str>,
        model: Option<ModelId>,
        tables: Vec<TableId>,
    ) -> TableGroupId {
        let alias = alias.filter(|alias| !alias.is_empty());
        let id = self.groups.next_idx();

        self.groups.push(TableGroup {
            id,
            path: path.clone(),
            alias: alias.map(str::to_string),
            model,
            tables,
        });
        self.by_path.insert(path.clone(), id);

        if let Some(alias) = alias {
            self.by_alias.insert(alias.to_string(), id);
        }

        id
    }
}
