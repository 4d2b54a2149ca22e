use super::{ForeignKey, ModelId};
use crate::{
    schema::db::{ColumnId, TableId},
    stmt,
};

/// Association to at most one entity.
#[derive(Debug, Clone)]
pub struct ToOne {
    /// Associated entity
    pub target: ModelId,

    /// Join columns on the owning table referencing the target's identifier
    pub foreign_key: ForeignKey,
}

/// Collection-valued attribute.
#[derive(Debug, Clone)]
pub struct Plural {
    /// Table holding one row per collection element. For one-to-many this is
    /// the element entity's table, for many-to-many the join table.
    pub collection_table: TableId,

    /// Key columns in the collection table referencing the owner's identifier
    pub key: ForeignKey,

    /// List position or map key, if the collection is indexed
    pub index: Option<CollectionIndex>,

    pub element: CollectionElement,
}

#[derive(Debug, Clone)]
pub struct CollectionIndex {
    pub column: ColumnId,
    pub ty: stmt::Type,
}

#[derive(Debug, Clone)]
pub enum CollectionElement {
    /// Basic values stored in the collection table
    Basic { column: ColumnId, ty: stmt::Type },

    /// Entities whose own table holds the collection key
    OneToMany { target: ModelId },

    /// Entities reached through a join table
    ManyToMany {
        target: ModelId,

        /// Element columns in the join table referencing the element's identifier
        foreign_key: ForeignKey,
    },
}

impl CollectionElement {
    pub fn target(&self) -> Option<ModelId> {
        match self {
            Self::Basic { .. } => None,
            Self::OneToMany { target } | Self::ManyToMany { target, .. } => Some(*target),
        }
    }

    pub fn is_many_to_many(&self) -> bool {
        matches!(self, Self::ManyToMany { .. })
    }

    pub fn is_one_to_many(&self) -> bool {
        matches!(self, Self::OneToMany { .. })
    }
}
