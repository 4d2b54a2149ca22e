use super::{
    app::{self, CollectionElement, CollectionIndex, FieldId, FieldTy, ForeignKey, ModelId},
    db::{self, Column, ColumnId, Table, TableId},
    fetchable::{BasicValued, EmbeddedValued, PluralValued, ToOneValued},
    Fetchable, FetchableId, FetchableKind, Schema,
};
use crate::{stmt, Error, Result};
use indexmap::IndexMap;
use std::sync::Arc;

/// Declares entities and their attributes, then validates them into a
/// [`Schema`].
///
/// Models may be referenced before they are declared: [`Builder::model_id`]
/// reserves an identifier by name and [`Builder::entity`] later fills it in.
#[derive(Debug, Default)]
pub struct Builder {
    /// Entity names in reservation order. The index is the `ModelId`.
    names: IndexMap<String, ModelId>,

    entities: IndexMap<ModelId, EntityDecl>,
}

/// Declares the attributes of one entity.
pub struct EntityBuilder<'a> {
    decl: &'a mut EntityDecl,
}

/// Declares the attributes of an embeddable.
#[derive(Debug, Default)]
pub struct EmbeddableBuilder {
    attributes: Vec<AttributeDecl>,
    errors: Vec<String>,
}

#[derive(Debug)]
struct EntityDecl {
    name: String,
    table: String,
    attributes: Vec<AttributeDecl>,
    discriminator: Option<(String, stmt::Type)>,
    errors: Vec<String>,
}

#[derive(Debug)]
struct AttributeDecl {
    name: String,
    kind: AttributeKind,
    identifier: bool,
    nullable: bool,
    timing: Option<stmt::FetchTiming>,
}

#[derive(Debug)]
enum AttributeKind {
    Basic {
        ty: stmt::Type,
        column: String,
    },
    Embedded {
        attributes: Vec<AttributeDecl>,
    },
    ToOne {
        target: ModelId,
        columns: Vec<String>,
    },
    Plural {
        table: CollectionTable,
        key: Vec<String>,
        index: Option<(String, stmt::Type)>,
        element: ElementDecl,
    },
}

#[derive(Debug)]
enum CollectionTable {
    /// The element entity's own table
    Element,

    Named(String),
}

#[derive(Debug)]
enum ElementDecl {
    Basic { ty: stmt::Type, column: String },
    OneToMany { target: ModelId },
    ManyToMany { target: ModelId, columns: Vec<String> },
}

/// Used to track state during the build process
struct BuildSchema<'a> {
    builder: &'a Builder,

    /// Maps table names to identifiers
    table_lookup: IndexMap<String, TableId>,

    /// Tables as they are built
    tables: Vec<Table>,

    models: IndexMap<ModelId, app::Model>,

    /// Next identifier handed to an embeddable
    next_model_id: usize,
}

impl Builder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the identifier of the entity named `name`, reserving one if
    /// the entity has not been seen yet.
    pub fn model_id(&mut self, name: &str) -> ModelId {
        if let Some(id) = self.names.get(name) {
            return *id;
        }

        let id = ModelId(self.names.len());
        self.names.insert(name.to_string(), id);
        id
    }

    /// Declares an entity stored in `table`.
    pub fn entity(&mut self, name: &str, table: &str) -> EntityBuilder<'_> {
        let id = self.model_id(name);
        let decl = self.entities.entry(id).or_insert_with(|| EntityDecl {
            name: name.to_string(),
            table: table.to_string(),
            attributes: vec![],
            discriminator: None,
            errors: vec![],
        });

        EntityBuilder { decl }
    }

    pub fn build(&self) -> Result<Schema> {
        for (name, id) in &self.names {
            let Some(decl) = self.entities.get(id) else {
                return Err(Error::invalid_schema(format!(
                    "entity `{name}` is referenced but never declared"
                )));
            };

            if let Some(error) = decl.errors.first() {
                return Err(Error::invalid_schema(format!("{name}: {error}")));
            }

            if !decl.attributes.iter().any(|attribute| attribute.identifier) {
                return Err(Error::invalid_schema(format!(
                    "entity `{name}` declares no identifier"
                )));
            }

            verify_unique_names(name, &decl.attributes)?;
        }

        let mut build = BuildSchema {
            builder: self,
            table_lookup: IndexMap::new(),
            tables: vec![],
            models: IndexMap::new(),
            next_model_id: self.names.len(),
        };

        // Entity tables and their own columns first, so that relations can
        // type their foreign key columns from the referenced identifiers.
        for decl in self.entities.values() {
            build.build_entity_columns(decl)?;
        }

        for decl in self.entities.values() {
            build.build_relation_columns(decl)?;
        }

        for (id, decl) in &self.entities {
            build.build_entity_model(*id, decl)?;
        }

        let app = app::Schema {
            models: build.models,
        };
        let db = db::Schema {
            tables: build.tables,
        };
        let fetchables = build_fetchables(&app);

        tracing::debug!(
            models = app.models.len(),
            tables = db.tables.len(),
            fetchables = fetchables.len(),
            "built schema"
        );

        Ok(Schema {
            app,
            db: Arc::new(db),
            fetchables,
        })
    }
}

impl EntityBuilder<'_> {
    /// Declares an identifier attribute. Calling this more than once
    /// declares a composite identifier.
    pub fn identifier(&mut self, name: &str, ty: stmt::Type, column: &str) -> &mut Self {
        let mut attribute = AttributeDecl::basic(name, ty, column);
        attribute.identifier = true;
        self.decl.attributes.push(attribute);
        self
    }

    pub fn basic(&mut self, name: &str, ty: stmt::Type, column: &str) -> &mut Self {
        self.decl
            .attributes
            .push(AttributeDecl::basic(name, ty, column));
        self
    }

    pub fn embedded(&mut self, name: &str, f: impl FnOnce(&mut EmbeddableBuilder)) -> &mut Self {
        let mut embeddable = EmbeddableBuilder::default();
        f(&mut embeddable);
        self.decl.errors.extend(embeddable.errors);
        self.decl.attributes.push(AttributeDecl::new(
            name,
            AttributeKind::Embedded {
                attributes: embeddable.attributes,
            },
        ));
        self
    }

    /// Declares a to-one association. `columns` are the join columns on this
    /// entity's table, one per identifier column of `target`.
    pub fn to_one(&mut self, name: &str, target: ModelId, columns: &[&str]) -> &mut Self {
        self.decl.attributes.push(AttributeDecl::new(
            name,
            AttributeKind::ToOne {
                target,
                columns: to_strings(columns),
            },
        ));
        self
    }

    /// Declares a one-to-many collection. `key` are the columns in the
    /// element entity's table referencing this entity's identifier.
    pub fn one_to_many(&mut self, name: &str, target: ModelId, key: &[&str]) -> &mut Self {
        self.decl.attributes.push(AttributeDecl::plural(
            name,
            CollectionTable::Element,
            key,
            ElementDecl::OneToMany { target },
        ));
        self
    }

    /// Declares a many-to-many collection through `join_table`. `key`
    /// references this entity's identifier and `element` references the
    /// target's identifier.
    pub fn many_to_many(
        &mut self,
        name: &str,
        target: ModelId,
        join_table: &str,
        key: &[&str],
        element: &[&str],
    ) -> &mut Self {
        self.decl.attributes.push(AttributeDecl::plural(
            name,
            CollectionTable::Named(join_table.to_string()),
            key,
            ElementDecl::ManyToMany {
                target,
                columns: to_strings(element),
            },
        ));
        self
    }

    /// Declares a collection of basic values stored in `table`.
    pub fn element_collection(
        &mut self,
        name: &str,
        table: &str,
        key: &[&str],
        ty: stmt::Type,
        column: &str,
    ) -> &mut Self {
        self.decl.attributes.push(AttributeDecl::plural(
            name,
            CollectionTable::Named(table.to_string()),
            key,
            ElementDecl::Basic {
                ty,
                column: column.to_string(),
            },
        ));
        self
    }

    /// Makes the last declared collection indexed by `column`.
    pub fn list_index(&mut self, column: &str, ty: stmt::Type) -> &mut Self {
        match self.decl.attributes.last_mut().map(|attribute| &mut attribute.kind) {
            Some(AttributeKind::Plural { index, .. }) => {
                *index = Some((column.to_string(), ty));
            }
            _ => self
                .decl
                .errors
                .push(format!("list index `{column}` declared without a collection")),
        }
        self
    }

    /// Adds a discriminator column to the entity's table.
    pub fn discriminator(&mut self, column: &str, ty: stmt::Type) -> &mut Self {
        self.decl.discriminator = Some((column.to_string(), ty));
        self
    }

    /// Marks the last declared attribute as nullable.
    pub fn nullable(&mut self) -> &mut Self {
        with_last(&mut self.decl.attributes, &mut self.decl.errors, "nullable", |attribute| {
            attribute.nullable = true;
        });
        self
    }

    /// Marks the last declared attribute as delayed.
    pub fn lazy(&mut self) -> &mut Self {
        with_last(&mut self.decl.attributes, &mut self.decl.errors, "lazy", |attribute| {
            attribute.timing = Some(stmt::FetchTiming::Delayed);
        });
        self
    }

    /// Marks the last declared attribute as immediate.
    pub fn eager(&mut self) -> &mut Self {
        with_last(&mut self.decl.attributes, &mut self.decl.errors, "eager", |attribute| {
            attribute.timing = Some(stmt::FetchTiming::Immediate);
        });
        self
    }
}

impl EmbeddableBuilder {
    pub fn basic(&mut self, name: &str, ty: stmt::Type, column: &str) -> &mut Self {
        self.attributes.push(AttributeDecl::basic(name, ty, column));
        self
    }

    pub fn embedded(&mut self, name: &str, f: impl FnOnce(&mut EmbeddableBuilder)) -> &mut Self {
        let mut embeddable = EmbeddableBuilder::default();
        f(&mut embeddable);
        self.errors.extend(embeddable.errors);
        self.attributes.push(AttributeDecl::new(
            name,
            AttributeKind::Embedded {
                attributes: embeddable.attributes,
            },
        ));
        self
    }

    pub fn nullable(&mut self) -> &mut Self {
        with_last(&mut self.attributes, &mut self.errors, "nullable", |attribute| {
            attribute.nullable = true;
        });
        self
    }
}

impl AttributeDecl {
    fn new(name: &str, kind: AttributeKind) -> Self {
        Self {
            name: name.to_string(),
            kind,
            identifier: false,
            nullable: false,
            timing: None,
        }
    }

    fn basic(name: &str, ty: stmt::Type, column: &str) -> Self {
        Self::new(
            name,
            AttributeKind::Basic {
                ty,
                column: column.to_string(),
            },
        )
    }

    fn plural(name: &str, table: CollectionTable, key: &[&str], element: ElementDecl) -> Self {
        Self::new(
            name,
            AttributeKind::Plural {
                table,
                key: to_strings(key),
                index: None,
                element,
            },
        )
    }

    fn default_timing(&self) -> stmt::FetchTiming {
        match self.kind {
            AttributeKind::Plural { .. } => stmt::FetchTiming::Delayed,
            _ => stmt::FetchTiming::Immediate,
        }
    }
}

impl<'a> BuildSchema<'a> {
    fn entity(&self, id: ModelId) -> Result<&'a EntityDecl> {
        self.builder
            .entities
            .get(&id)
            .ok_or_else(|| Error::invalid_schema(format!("no entity with {id:?}")))
    }

    fn table(&mut self, name: &str) -> TableId {
        if let Some(id) = self.table_lookup.get(name) {
            return *id;
        }

        let id = TableId(self.tables.len());
        self.tables.push(Table::new(id, name.to_string()));
        self.table_lookup.insert(name.to_string(), id);
        id
    }

    /// Adds a column to `table`, or returns the existing column of that name.
    /// Columns are shared when several attributes map the same name, such as
    /// a one-to-many key that is also the element's to-one join column.
    fn column(
        &mut self,
        table: TableId,
        name: &str,
        ty: &stmt::Type,
        nullable: bool,
        primary_key: bool,
    ) -> ColumnId {
        let table = &mut self.tables[table.0];

        if let Some(column) = table.columns.iter_mut().find(|column| column.name == name) {
            column.primary_key |= primary_key;
            return column.id;
        }

        let id = ColumnId {
            table: table.id,
            index: table.columns.len(),
        };
        table.columns.push(Column {
            id,
            name: name.to_string(),
            ty: db::Type::from_app(ty),
            nullable,
            primary_key,
        });
        id
    }

    fn column_id(&self, table: TableId, name: &str) -> Result<ColumnId> {
        self.tables[table.0]
            .column_named(name)
            .map(|column| column.id)
            .ok_or_else(|| {
                Error::invariant_violation(format!(
                    "column `{name}` missing from table `{}`",
                    self.tables[table.0].name
                ))
            })
    }

    fn column_ids(&self, table: TableId, names: &[String]) -> Result<Vec<ColumnId>> {
        names.iter().map(|name| self.column_id(table, name)).collect()
    }

    fn build_entity_columns(&mut self, decl: &EntityDecl) -> Result<()> {
        let table = self.table(&decl.table);
        self.build_basic_columns(table, &decl.attributes);

        if let Some((column, ty)) = &decl.discriminator {
            self.column(table, column, ty, false, false);
        }

        Ok(())
    }

    fn build_basic_columns(&mut self, table: TableId, attributes: &[AttributeDecl]) {
        for attribute in attributes {
            match &attribute.kind {
                AttributeKind::Basic { ty, column } => {
                    self.column(table, column, ty, attribute.nullable, attribute.identifier);
                }
                AttributeKind::Embedded { attributes } => {
                    self.build_basic_columns(table, attributes);
                }
                _ => {}
            }
        }
    }

    fn build_relation_columns(&mut self, decl: &EntityDecl) -> Result<()> {
        let owner_table = self.table(&decl.table);
        let owner_identifier = identifier_types(decl);

        for attribute in &decl.attributes {
            match &attribute.kind {
                AttributeKind::ToOne { target, columns } => {
                    let target_identifier = identifier_types(self.entity(*target)?);
                    verify_span(decl, attribute, columns, &target_identifier)?;

                    for (column, ty) in columns.iter().zip(&target_identifier) {
                        self.column(owner_table, column, ty, attribute.nullable, false);
                    }
                }
                AttributeKind::Plural {
                    table,
                    key,
                    index,
                    element,
                } => {
                    let collection_table = match table {
                        CollectionTable::Named(name) => self.table(name),
                        CollectionTable::Element => {
                            let ElementDecl::OneToMany { target } = element else {
                                return Err(Error::invariant_violation(
                                    "only one-to-many collections live in the element table",
                                ));
                            };
                            self.table(&self.entity(*target)?.table)
                        }
                    };

                    verify_span(decl, attribute, key, &owner_identifier)?;
                    for (column, ty) in key.iter().zip(&owner_identifier) {
                        self.column(collection_table, column, ty, true, false);
                    }

                    match element {
                        ElementDecl::Basic { ty, column } => {
                            self.column(collection_table, column, ty, true, false);
                        }
                        ElementDecl::OneToMany { .. } => {}
                        ElementDecl::ManyToMany { target, columns } => {
                            let target_identifier = identifier_types(self.entity(*target)?);
                            verify_span(decl, attribute, columns, &target_identifier)?;

                            for (column, ty) in columns.iter().zip(&target_identifier) {
                                self.column(collection_table, column, ty, false, false);
                            }
                        }
                    }

                    if let Some((column, ty)) = index {
                        self.column(collection_table, column, ty, false, false);
                    }
                }
                _ => {}
            }
        }

        Ok(())
    }

    fn build_entity_model(&mut self, id: ModelId, decl: &EntityDecl) -> Result<()> {
        let table = self.table(&decl.table);
        let fields = self.build_fields(id, &decl.name, table, &decl.attributes)?;

        let mut primary_key = app::PrimaryKey {
            fields: vec![],
            columns: vec![],
        };

        for (field, attribute) in fields.iter().zip(&decl.attributes) {
            if attribute.identifier {
                primary_key.fields.push(field.id);
                if let FieldTy::Basic(basic) = &field.ty {
                    primary_key.columns.push(basic.column);
                }
            }
        }

        let discriminator = match &decl.discriminator {
            Some((column, ty)) => Some(app::Discriminator {
                column: self.column_id(table, column)?,
                ty: ty.clone(),
            }),
            None => None,
        };

        self.models.insert(
            id,
            app::Model {
                id,
                name: decl.name.clone(),
                kind: app::ModelKind::Entity(app::EntityModel {
                    table,
                    primary_key,
                    discriminator,
                }),
                fields,
            },
        );

        Ok(())
    }

    fn build_fields(
        &mut self,
        model: ModelId,
        model_name: &str,
        table: TableId,
        attributes: &[AttributeDecl],
    ) -> Result<Vec<app::Field>> {
        let mut fields = Vec::with_capacity(attributes.len());

        for (index, attribute) in attributes.iter().enumerate() {
            let id = model.field(index);
            let ty = self.build_field_ty(model, model_name, table, attribute)?;

            fields.push(app::Field {
                id,
                name: attribute.name.clone(),
                ty,
                nullable: attribute.nullable,
                fetch_timing: attribute.timing.unwrap_or_else(|| attribute.default_timing()),
            });
        }

        Ok(fields)
    }

    fn build_field_ty(
        &mut self,
        model: ModelId,
        model_name: &str,
        table: TableId,
        attribute: &AttributeDecl,
    ) -> Result<FieldTy> {
        Ok(match &attribute.kind {
            AttributeKind::Basic { ty, column } => FieldTy::Basic(app::Basic {
                ty: ty.clone(),
                column: self.column_id(table, column)?,
            }),
            AttributeKind::Embedded { attributes } => {
                let target = ModelId(self.next_model_id);
                self.next_model_id += 1;

                // Embeddables are named after the attribute declaring them,
                // e.g. `Customer.address`.
                let name = format!("{model_name}.{}", attribute.name);
                let fields = self.build_fields(target, &name, table, attributes)?;

                self.models.insert(
                    target,
                    app::Model {
                        id: target,
                        name,
                        kind: app::ModelKind::Embeddable(app::EmbeddableModel {
                            table,
                            owner: model,
                        }),
                        fields,
                    },
                );

                FieldTy::Embedded(app::Embedded { target })
            }
            AttributeKind::ToOne { target, columns } => {
                let target_table = self.table(&self.entity(*target)?.table);
                FieldTy::ToOne(app::ToOne {
                    target: *target,
                    foreign_key: ForeignKey {
                        key: self.column_ids(table, columns)?,
                        target: self.identifier_columns(*target, target_table)?,
                    },
                })
            }
            AttributeKind::Plural {
                table: collection_table,
                key,
                index,
                element,
            } => {
                let collection_table = match collection_table {
                    CollectionTable::Named(name) => self.table(name),
                    CollectionTable::Element => {
                        let target = element_target(element).ok_or_else(|| {
                            Error::invariant_violation("element table without element entity")
                        })?;
                        self.table(&self.entity(target)?.table)
                    }
                };

                let key = ForeignKey {
                    key: self.column_ids(collection_table, key)?,
                    target: self.identifier_columns(model, table)?,
                };

                let index = match index {
                    Some((column, ty)) => Some(CollectionIndex {
                        column: self.column_id(collection_table, column)?,
                        ty: ty.clone(),
                    }),
                    None => None,
                };

                let element = match element {
                    ElementDecl::Basic { ty, column } => CollectionElement::Basic {
                        column: self.column_id(collection_table, column)?,
                        ty: ty.clone(),
                    },
                    ElementDecl::OneToMany { target } => {
                        CollectionElement::OneToMany { target: *target }
                    }
                    ElementDecl::ManyToMany { target, columns } => {
                        let target_table = self.table(&self.entity(*target)?.table);
                        CollectionElement::ManyToMany {
                            target: *target,
                            foreign_key: ForeignKey {
                                key: self.column_ids(collection_table, columns)?,
                                target: self.identifier_columns(*target, target_table)?,
                            },
                        }
                    }
                };

                FieldTy::Plural(app::Plural {
                    collection_table,
                    key,
                    index,
                    element,
                })
            }
        })
    }

    fn identifier_columns(&self, entity: ModelId, table: TableId) -> Result<Vec<ColumnId>> {
        let decl = self.entity(entity)?;
        decl.attributes
            .iter()
            .filter(|attribute| attribute.identifier)
            .map(|attribute| match &attribute.kind {
                AttributeKind::Basic { column, .. } => self.column_id(table, column),
                _ => Err(Error::invalid_schema(format!(
                    "identifier `{}` of `{}` must be basic",
                    attribute.name, decl.name
                ))),
            })
            .collect()
    }
}

fn build_fetchables(app: &app::Schema) -> IndexMap<FetchableId, Fetchable> {
    let mut fetchables = IndexMap::new();

    for model in app.models() {
        if let Some(entity) = model.as_entity() {
            let fetchable = identifier_fetchable(app, model, entity);
            fetchables.insert(fetchable.id, fetchable);
        }

        for field in &model.fields {
            let kind = match &field.ty {
                FieldTy::Basic(basic) => FetchableKind::Basic(BasicValued {
                    column: basic.column,
                    ty: basic.ty.clone(),
                }),
                FieldTy::Embedded(embedded) => FetchableKind::Embedded(EmbeddedValued {
                    target: Some(embedded.target),
                    parts: app
                        .model(embedded.target)
                        .fields
                        .iter()
                        .map(|part| FetchableId::Field(part.id))
                        .collect(),
                    selectables: embedded_selectables(app, embedded.target),
                }),
                FieldTy::ToOne(to_one) => FetchableKind::ToOne(ToOneValued {
                    target: to_one.target,
                    foreign_key: to_one.foreign_key.clone(),
                }),
                FieldTy::Plural(plural) => {
                    if let Some(index) = &plural.index {
                        let fetchable = Fetchable {
                            id: FetchableId::CollectionIndex(field.id),
                            name: "key".to_string(),
                            owner: model.id,
                            kind: FetchableKind::Basic(BasicValued {
                                column: index.column,
                                ty: index.ty.clone(),
                            }),
                            nullable: false,
                            timing: stmt::FetchTiming::Immediate,
                        };
                        fetchables.insert(fetchable.id, fetchable);
                    }

                    let element = element_fetchable(app, model.id, field.id, &plural.element);
                    fetchables.insert(element.id, element);

                    FetchableKind::Plural(PluralValued {
                        collection_table: plural.collection_table,
                        key: plural.key.clone(),
                        index: plural
                            .index
                            .as_ref()
                            .map(|_| FetchableId::CollectionIndex(field.id)),
                        element: FetchableId::CollectionElement(field.id),
                        element_kind: plural.element.clone(),
                    })
                }
            };

            fetchables.insert(
                FetchableId::Field(field.id),
                Fetchable {
                    id: FetchableId::Field(field.id),
                    name: field.name.clone(),
                    owner: model.id,
                    kind,
                    nullable: field.nullable,
                    timing: field.fetch_timing,
                },
            );
        }
    }

    fetchables
}

fn identifier_fetchable(app: &app::Schema, model: &app::Model, entity: &app::EntityModel) -> Fetchable {
    let pk = &entity.primary_key;

    let (name, kind) = match &pk.fields[..] {
        [field] => {
            let field = app.field(*field);
            let basic = field.ty.as_basic();
            (
                field.name.clone(),
                FetchableKind::Basic(BasicValued {
                    column: pk.columns[0],
                    ty: basic.map(|basic| basic.ty.clone()).unwrap_or(stmt::Type::Unknown),
                }),
            )
        }
        fields => (
            "id".to_string(),
            FetchableKind::Embedded(EmbeddedValued {
                target: None,
                parts: fields.iter().map(|field| FetchableId::Field(*field)).collect(),
                selectables: pk.columns.clone(),
            }),
        ),
    };

    Fetchable {
        id: FetchableId::Identifier(model.id),
        name,
        owner: model.id,
        kind,
        nullable: false,
        timing: stmt::FetchTiming::Immediate,
    }
}

fn element_fetchable(
    app: &app::Schema,
    owner: ModelId,
    field: FieldId,
    element: &CollectionElement,
) -> Fetchable {
    let kind = match element {
        CollectionElement::Basic { column, ty } => FetchableKind::Basic(BasicValued {
            column: *column,
            ty: ty.clone(),
        }),
        CollectionElement::OneToMany { target } => {
            // The element row is the target's own row: its key is its
            // identifier.
            let columns = target_identifier_columns(app, *target);
            FetchableKind::ToOne(ToOneValued {
                target: *target,
                foreign_key: ForeignKey {
                    key: columns.clone(),
                    target: columns,
                },
            })
        }
        CollectionElement::ManyToMany {
            target,
            foreign_key,
        } => FetchableKind::ToOne(ToOneValued {
            target: *target,
            foreign_key: foreign_key.clone(),
        }),
    };

    Fetchable {
        id: FetchableId::CollectionElement(field),
        name: "element".to_string(),
        owner,
        kind,
        nullable: false,
        timing: stmt::FetchTiming::Immediate,
    }
}

fn target_identifier_columns(app: &app::Schema, target: ModelId) -> Vec<ColumnId> {
    app.model(target)
        .as_entity()
        .map(|entity| entity.primary_key.columns.clone())
        .unwrap_or_default()
}

fn embedded_selectables(app: &app::Schema, embeddable: ModelId) -> Vec<ColumnId> {
    let mut columns = vec![];

    for field in &app.model(embeddable).fields {
        match &field.ty {
            FieldTy::Basic(basic) => columns.push(basic.column),
            FieldTy::Embedded(embedded) => columns.extend(embedded_selectables(app, embedded.target)),
            _ => {}
        }
    }

    columns
}

fn identifier_types(decl: &EntityDecl) -> Vec<stmt::Type> {
    decl.attributes
        .iter()
        .filter(|attribute| attribute.identifier)
        .filter_map(|attribute| match &attribute.kind {
            AttributeKind::Basic { ty, .. } => Some(ty.clone()),
            _ => None,
        })
        .collect()
}

fn element_target(element: &ElementDecl) -> Option<ModelId> {
    match element {
        ElementDecl::Basic { .. } => None,
        ElementDecl::OneToMany { target } | ElementDecl::ManyToMany { target, .. } => Some(*target),
    }
}

fn verify_span(
    decl: &EntityDecl,
    attribute: &AttributeDecl,
    columns: &[String],
    identifier: &[stmt::Type],
) -> Result<()> {
    if columns.len() != identifier.len() {
        return Err(Error::invalid_schema(format!(
            "`{}.{}` declares {} join column(s) for an identifier of {}",
            decl.name,
            attribute.name,
            columns.len(),
            identifier.len()
        )));
    }

    Ok(())
}

fn verify_unique_names(owner: &str, attributes: &[AttributeDecl]) -> Result<()> {
    for (index, attribute) in attributes.iter().enumerate() {
        if attributes[..index]
            .iter()
            .any(|other| other.name == attribute.name)
        {
            return Err(Error::invalid_schema(format!(
                "attribute `{}` declared twice on `{owner}`",
                attribute.name
            )));
        }
    }

    Ok(())
}

fn with_last(
    attributes: &mut [AttributeDecl],
    errors: &mut Vec<String>,
    modifier: &str,
    f: impl FnOnce(&mut AttributeDecl),
) {
    match attributes.last_mut() {
        Some(attribute) => f(attribute),
        None => errors.push(format!("`{modifier}` declared before any attribute")),
    }
}

fn to_strings(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| name.to_string()).collect()
}
