use super::{ModelId, Plural, ToOne};
use crate::{schema::db::ColumnId, stmt};
use std::fmt;

#[derive(Debug, Clone)]
pub struct Field {
    /// Uniquely identifies the field within the containing model.
    pub id: FieldId,

    /// The attribute name
    pub name: String,

    /// Basic, embedded, to-one or plural
    pub ty: FieldTy,

    /// True if the attribute may be absent
    pub nullable: bool,

    /// Configured fetch timing. Plural attributes default to delayed.
    pub fetch_timing: stmt::FetchTiming,
}

#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldId {
    pub model: ModelId,
    pub index: usize,
}

#[derive(Debug, Clone)]
pub enum FieldTy {
    Basic(Basic),
    Embedded(Embedded),
    ToOne(ToOne),
    Plural(Plural),
}

/// A single-column attribute
#[derive(Debug, Clone)]
pub struct Basic {
    pub ty: stmt::Type,
    pub column: ColumnId,
}

/// An attribute whose value is an embeddable model
#[derive(Debug, Clone)]
pub struct Embedded {
    pub target: ModelId,
}

impl Field {
    pub fn is_relation(&self) -> bool {
        matches!(self.ty, FieldTy::ToOne(_) | FieldTy::Plural(_))
    }

    /// If the field is an association, the entity it points at. For plural
    /// attributes this is the element entity, if the elements are entities.
    pub fn relation_target(&self) -> Option<ModelId> {
        match &self.ty {
            FieldTy::ToOne(to_one) => Some(to_one.target),
            FieldTy::Plural(plural) => plural.element.target(),
            _ => None,
        }
    }
}

impl FieldTy {
    pub fn as_basic(&self) -> Option<&Basic> {
        match self {
            Self::Basic(basic) => Some(basic),
            _ => None,
        }
    }

    pub fn as_embedded(&self) -> Option<&Embedded> {
        match self {
            Self::Embedded(embedded) => Some(embedded),
            _ => None,
        }
    }

    pub fn as_to_one(&self) -> Option<&ToOne> {
        match self {
            Self::ToOne(to_one) => Some(to_one),
            _ => None,
        }
    }

    pub fn as_plural(&self) -> Option<&Plural> {
        match self {
            Self::Plural(plural) => Some(plural),
            _ => None,
        }
    }

    #[track_caller]
    pub fn expect_plural(&self) -> &Plural {
        match self {
            Self::Plural(plural) => plural,
            _ => panic!("expected plural field, but was {self:?}"),
        }
    }
}

impl From<&Field> for FieldId {
    fn from(value: &Field) -> Self {
        value.id
    }
}

impl fmt::Debug for FieldId {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "FieldId({}/{})", self.model.0, self.index)
    }
}
