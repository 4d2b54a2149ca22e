use super::{Field, FieldId};
use crate::{
    schema::db::{ColumnId, TableId},
    stmt,
};
use std::fmt;

#[derive(Debug, Clone)]
pub struct Model {
    /// Uniquely identifies the model within the schema
    pub id: ModelId,

    /// Name of the model. Embeddables are named after the attribute that
    /// declares them, e.g. `Customer.address`.
    pub name: String,

    /// Distinguishes entities (with tables and identifiers) from embeddables
    pub kind: ModelKind,

    /// Fields contained by the model
    pub fields: Vec<Field>,
}

#[derive(Debug, Clone)]
pub enum ModelKind {
    /// Entity mapped to its own table and addressable by identifier
    Entity(EntityModel),

    /// Component whose columns live in the owning entity's table
    Embeddable(EmbeddableModel),
}

#[derive(Debug, Clone)]
pub struct EntityModel {
    /// Primary table of the entity
    pub table: TableId,

    pub primary_key: PrimaryKey,

    /// Set when rows of the table can belong to more than one entity type
    pub discriminator: Option<Discriminator>,
}

#[derive(Debug, Clone)]
pub struct EmbeddableModel {
    /// Table the embeddable's columns are stored in
    pub table: TableId,

    /// Model declaring the embedded attribute
    pub owner: ModelId,
}

#[derive(Debug, Clone)]
pub struct PrimaryKey {
    /// Fields composing the identifier
    pub fields: Vec<FieldId>,

    /// Identifier columns, in field order
    pub columns: Vec<ColumnId>,
}

#[derive(Debug, Clone)]
pub struct Discriminator {
    pub column: ColumnId,
    pub ty: stmt::Type,
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct ModelId(pub usize);

impl Model {
    pub fn is_entity(&self) -> bool {
        matches!(self.kind, ModelKind::Entity(_))
    }

    pub fn is_embeddable(&self) -> bool {
        matches!(self.kind, ModelKind::Embeddable(_))
    }

    pub fn as_entity(&self) -> Option<&EntityModel> {
        match &self.kind {
            ModelKind::Entity(entity) => Some(entity),
            ModelKind::Embeddable(_) => None,
        }
    }

    #[track_caller]
    pub fn expect_entity(&self) -> &EntityModel {
        match &self.kind {
            ModelKind::Entity(entity) => entity,
            ModelKind::Embeddable(_) => panic!("expected entity, but `{}` is embeddable", self.name),
        }
    }

    /// Table holding the model's columns.
    pub fn table(&self) -> TableId {
        match &self.kind {
            ModelKind::Entity(entity) => entity.table,
            ModelKind::Embeddable(embeddable) => embeddable.table,
        }
    }

    pub fn field(&self, field: impl Into<FieldId>) -> &Field {
        let field_id = field.into();
        assert_eq!(self.id, field_id.model);
        &self.fields[field_id.index]
    }

    pub fn field_by_name(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Returns `true` if `field` is one of the identifier fields.
    pub fn is_primary_key_field(&self, field: FieldId) -> bool {
        self.as_entity()
            .map(|entity| entity.primary_key.fields.contains(&field))
            .unwrap_or(false)
    }
}

impl ModelId {
    /// Create a `FieldId` representing the current model's field at index
    /// `index`.
    pub const fn field(self, index: usize) -> FieldId {
        FieldId { model: self, index }
    }
}

impl From<&Model> for ModelId {
    fn from(value: &Model) -> Self {
        value.id
    }
}

impl From<&Self> for ModelId {
    fn from(src: &Self) -> Self {
        *src
    }
}

impl fmt::Debug for ModelId {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "ModelId({})", self.0)
    }
}
