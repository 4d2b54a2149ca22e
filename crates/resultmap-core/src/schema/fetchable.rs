use super::{
    app::{CollectionElement, FieldId, ForeignKey, ModelId},
    db::{ColumnId, TableId},
};
use crate::{stmt, Result};
use std::fmt;

/// Identifies something a result mapping can attach a fetch builder to.
///
/// Used as the key of fetch-builder maps, so it is `Copy` and totally
/// ordered.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FetchableId {
    /// The identifier of an entity, whether it is one field or several
    Identifier(ModelId),

    /// A declared attribute
    Field(FieldId),

    /// The index part (`key`) of an indexed plural attribute
    CollectionIndex(FieldId),

    /// The element part (`element`) of a plural attribute
    CollectionElement(FieldId),
}

/// The metamodel's view of a fetchable, computed once when the schema is
/// built.
#[derive(Debug, Clone)]
pub struct Fetchable {
    pub id: FetchableId,

    /// Attribute name, or `key`/`element` for collection parts
    pub name: String,

    /// Model the fetchable is declared on
    pub owner: ModelId,

    pub kind: FetchableKind,

    pub nullable: bool,

    /// Configured fetch timing
    pub timing: stmt::FetchTiming,
}

/// The four shapes of fetchable the builders know how to resolve.
#[derive(Debug, Clone)]
pub enum FetchableKind {
    Basic(BasicValued),
    Embedded(EmbeddedValued),
    ToOne(ToOneValued),
    Plural(PluralValued),
}

#[derive(Debug, Clone)]
pub struct BasicValued {
    pub column: ColumnId,
    pub ty: stmt::Type,
}

#[derive(Debug, Clone)]
pub struct EmbeddedValued {
    /// Embeddable model. `None` for a composite identifier, which groups the
    /// entity's own identifier fields.
    pub target: Option<ModelId>,

    /// Sub-fetchables in declaration order
    pub parts: Vec<FetchableId>,

    /// All columns of the parts, flattened in declaration order
    pub selectables: Vec<ColumnId>,
}

#[derive(Debug, Clone)]
pub struct ToOneValued {
    pub target: ModelId,
    pub foreign_key: ForeignKey,
}

#[derive(Debug, Clone)]
pub struct PluralValued {
    pub collection_table: TableId,

    /// Key columns in the collection table referencing the owner's identifier
    pub key: ForeignKey,

    pub index: Option<FetchableId>,
    pub element: FetchableId,
    pub element_kind: CollectionElement,
}

impl Fetchable {
    /// Visits the fetchable's own selectables in the fixed order pairing
    /// uses. To-one attributes expose their join columns; plural attributes
    /// have no selectables of their own, their key is visited through
    /// [`ForeignKey::visit_target_selectables`].
    pub fn for_each_selectable(
        &self,
        mut f: impl FnMut(usize, ColumnId) -> Result<()>,
    ) -> Result<()> {
        match &self.kind {
            FetchableKind::Basic(basic) => f(0, basic.column),
            FetchableKind::Embedded(embedded) => {
                for (index, column) in embedded.selectables.iter().enumerate() {
                    f(index, *column)?;
                }
                Ok(())
            }
            FetchableKind::ToOne(to_one) => to_one.foreign_key.visit_key_selectables(f),
            FetchableKind::Plural(_) => Ok(()),
        }
    }

    pub fn column_span(&self) -> usize {
        match &self.kind {
            FetchableKind::Basic(_) => 1,
            FetchableKind::Embedded(embedded) => embedded.selectables.len(),
            FetchableKind::ToOne(to_one) => to_one.foreign_key.column_span(),
            FetchableKind::Plural(_) => 0,
        }
    }

    /// Associations produce a table group join when fetched.
    pub fn is_joinable(&self) -> bool {
        matches!(self.kind, FetchableKind::ToOne(_) | FetchableKind::Plural(_))
    }

    pub fn is_basic(&self) -> bool {
        matches!(self.kind, FetchableKind::Basic(_))
    }

    pub fn is_embedded(&self) -> bool {
        matches!(self.kind, FetchableKind::Embedded(_))
    }

    pub fn is_plural(&self) -> bool {
        matches!(self.kind, FetchableKind::Plural(_))
    }

    pub fn as_plural(&self) -> Option<&PluralValued> {
        match &self.kind {
            FetchableKind::Plural(plural) => Some(plural),
            _ => None,
        }
    }

    /// The entity reached through this fetchable: the target of a to-one or
    /// the element entity of a plural attribute.
    pub fn entity_target(&self) -> Option<ModelId> {
        match &self.kind {
            FetchableKind::ToOne(to_one) => Some(to_one.target),
            FetchableKind::Plural(plural) => plural.element_kind.target(),
            _ => None,
        }
    }
}

impl fmt::Display for Fetchable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl From<FieldId> for FetchableId {
    fn from(value: FieldId) -> Self {
        Self::Field(value)
    }
}

impl From<&Fetchable> for FetchableId {
    fn from(value: &Fetchable) -> Self {
        value.id
    }
}

impl fmt::Debug for FetchableId {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Identifier(model) => write!(fmt, "Identifier({})", model.0),
            Self::Field(field) => write!(fmt, "Field({}/{})", field.model.0, field.index),
            Self::CollectionIndex(field) => {
                write!(fmt, "CollectionIndex({}/{})", field.model.0, field.index)
            }
            Self::CollectionElement(field) => {
                write!(fmt, "CollectionElement({}/{})", field.model.0, field.index)
            }
        }
    }
}
