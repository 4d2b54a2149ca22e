//! Application-level schema: entities, embeddables and their attributes.

mod field;
pub use field::{Basic, Embedded, Field, FieldId, FieldTy};

mod fk;
pub use fk::ForeignKey;

mod model;
pub use model::{Discriminator, EmbeddableModel, EntityModel, Model, ModelId, ModelKind, PrimaryKey};

mod relation;
pub use relation::{CollectionElement, CollectionIndex, Plural, ToOne};

mod schema;
pub use schema::Schema;
