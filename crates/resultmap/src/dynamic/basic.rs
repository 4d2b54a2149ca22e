use crate::{engine::CreationState, results::BasicResult};
use resultmap_core::{schema::db, stmt, Result};

/// A scalar read from one result-set column, by label or by position.
///
/// Immutable once built: cache keys share the instance.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DynamicResultBuilderBasic {
    /// Column label. Columns addressed by position are labeled `c<position>`,
    /// a label that is never looked up in the result set.
    column_name: String,

    /// 1-based position, when the column is addressed by position
    column_position: Option<usize>,

    result_alias: Option<String>,

    /// Overrides the type reported by the result set
    explicit_type: Option<ExplicitType>,
}

/// A type supplied by the mapping instead of inferred from the column.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ExplicitType {
    /// Only the domain type is given
    Domain(stmt::Type),

    /// Both sides of the mapping are given
    Basic(BasicType),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BasicType {
    pub jdbc: db::Type,
    pub domain: stmt::Type,
}

impl DynamicResultBuilderBasic {
    pub fn new(column_name: impl Into<String>) -> Self {
        Self {
            column_name: column_name.into(),
            column_position: None,
            result_alias: None,
            explicit_type: None,
        }
    }

    pub fn by_position(position: usize) -> Self {
        Self {
            column_name: format!("c{position}"),
            column_position: Some(position),
            result_alias: None,
            explicit_type: None,
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.result_alias = Some(alias.into());
        self
    }

    pub fn with_domain_type(mut self, ty: stmt::Type) -> Self {
        self.explicit_type = Some(ExplicitType::Domain(ty));
        self
    }

    pub fn with_basic_type(mut self, ty: BasicType) -> Self {
        self.explicit_type = Some(ExplicitType::Basic(ty));
        self
    }

    pub fn column_name(&self) -> &str {
        &self.column_name
    }

    pub fn column_position(&self) -> Option<usize> {
        self.column_position
    }

    pub fn result_alias(&self) -> Option<&str> {
        self.result_alias.as_deref()
    }

    pub fn explicit_type(&self) -> Option<&ExplicitType> {
        self.explicit_type.as_ref()
    }

    /// Builds the scalar as result number `position` of the projection.
    pub fn build_result(&self, position: usize, state: &mut CreationState<'_>) -> Result<BasicResult> {
        let selection = state.resolve_raw_selection(&self.column_name, self.column_position)?;

        let ty = match &self.explicit_type {
            Some(ExplicitType::Domain(ty)) => ty.clone(),
            Some(ExplicitType::Basic(ty)) => ty.domain.clone(),
            None => selection.jdbc_type.domain_type(),
        };

        Ok(BasicResult {
            result_position: position,
            values_array_position: selection.values_array_position,
            alias: Some(
                self.result_alias
                    .clone()
                    .unwrap_or_else(|| selection.column_name.clone()),
            ),
            ty,
            converter: None,
        })
    }
}
