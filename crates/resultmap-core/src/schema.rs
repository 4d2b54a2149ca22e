pub mod app;

mod builder;
pub use builder::{Builder, EmbeddableBuilder, EntityBuilder};

pub mod db;

mod fetchable;
pub use fetchable::{
    BasicValued, EmbeddedValued, Fetchable, FetchableId, FetchableKind, PluralValued, ToOneValued,
};

use crate::{Error, Result};
use app::{Field, FieldId, Model, ModelId};
use db::{Column, ColumnId, Table};
use indexmap::IndexMap;
use std::sync::Arc;

/// The read-only metamodel result mappings are resolved against.
#[derive(Debug)]
pub struct Schema {
    /// Application-level schema
    pub app: app::Schema,

    /// Database-level schema
    pub db: Arc<db::Schema>,

    /// Fetchables of every model, computed once when the schema is built
    fetchables: IndexMap<FetchableId, Fetchable>,
}

impl Schema {
    pub fn builder() -> Builder {
        Builder::default()
    }

    pub fn model(&self, id: impl Into<ModelId>) -> &Model {
        self.app.model(id)
    }

    pub fn model_named(&self, name: &str) -> Option<&Model> {
        self.app.model_named(name)
    }

    /// Looks up an entity by name, failing if there is none.
    pub fn entity_named(&self, name: &str) -> Result<&Model> {
        match self.app.model_named(name) {
            Some(model) if model.is_entity() => Ok(model),
            _ => Err(Error::unknown_model(name)),
        }
    }

    pub fn field(&self, id: FieldId) -> &Field {
        self.app.field(id)
    }

    pub fn table(&self, id: impl Into<db::TableId>) -> &Table {
        self.db.table(id)
    }

    pub fn table_for(&self, id: impl Into<ModelId>) -> &Table {
        self.db.table(self.model(id).table())
    }

    pub fn column(&self, id: impl Into<ColumnId>) -> &Column {
        self.db.column(id)
    }

    #[track_caller]
    pub fn fetchable(&self, id: FetchableId) -> &Fetchable {
        self.fetchables.get(&id).expect("invalid fetchable ID")
    }

    /// The identifier of an entity as a single fetchable. Composite
    /// identifiers are embedded-valued, with the identifier fields as parts.
    #[track_caller]
    pub fn identifier_fetchable(&self, model: impl Into<ModelId>) -> &Fetchable {
        self.fetchable(FetchableId::Identifier(model.into()))
    }

    /// Fetchables of a model in the order results are generated: the
    /// identifier first, then every other attribute in declaration order.
    pub fn fetchables_of(&self, model: impl Into<ModelId>) -> impl Iterator<Item = &Fetchable> + '_ {
        let model = self.model(model);
        let identifier = model
            .as_entity()
            .map(|_| self.identifier_fetchable(model.id));

        identifier.into_iter().chain(
            model
                .fields
                .iter()
                .filter(move |field| !model.is_primary_key_field(field.id))
                .map(move |field| self.fetchable(FetchableId::Field(field.id))),
        )
    }

    /// Finds the fetchable named `name` directly on `model`.
    pub fn find_fetchable(&self, model: impl Into<ModelId>, name: &str) -> Option<&Fetchable> {
        let model = self.model(model);

        if model.is_entity() {
            let identifier = self.identifier_fetchable(model.id);
            if identifier.name == name {
                return Some(identifier);
            }
        }

        model
            .field_by_name(name)
            .map(|field| self.fetchable(FetchableId::Field(field.id)))
    }

    /// Finds a fetchable one step below `parent`: a part of an embedded
    /// value, an attribute of a to-one target, or for plural attributes the
    /// reserved `key` and `element` parts, or an attribute of the element
    /// entity.
    pub fn find_sub_fetchable(&self, parent: &Fetchable, name: &str) -> Option<&Fetchable> {
        match &parent.kind {
            FetchableKind::Basic(_) => None,
            FetchableKind::Embedded(embedded) => embedded
                .parts
                .iter()
                .map(|part| self.fetchable(*part))
                .find(|part| part.name == name),
            FetchableKind::ToOne(to_one) => self.find_fetchable(to_one.target, name),
            FetchableKind::Plural(plural) => match name {
                "key" => plural.index.map(|index| self.fetchable(index)),
                "element" => Some(self.fetchable(plural.element)),
                _ => plural
                    .element_kind
                    .target()
                    .and_then(|target| self.find_fetchable(target, name)),
            },
        }
    }

    /// Resolves a dotted attribute path, such as `customer.address.city`,
    /// starting at `model`.
    pub fn resolve_fetchable_path(&self, model: impl Into<ModelId>, path: &str) -> Result<&Fetchable> {
        let model = self.model(model);
        let mut segments = path.split('.');

        let first = segments.next().unwrap_or_default();
        let mut current = self
            .find_fetchable(model.id, first)
            .ok_or_else(|| Error::unknown_attribute(&model.name, first))?;
        let mut walked = format!("{}.{}", model.name, first);

        for segment in segments {
            current = self
                .find_sub_fetchable(current, segment)
                .ok_or_else(|| Error::unknown_attribute(&walked, segment))?;
            walked.push('.');
            walked.push_str(segment);
        }

        Ok(current)
    }

    /// Name of the model a fetchable is declared on, for messages.
    pub fn owner_name(&self, fetchable: &Fetchable) -> &str {
        &self.model(fetchable.owner).name
    }
}
