use super::DynamicResultBuilderBasic;
use crate::{
    engine::CreationState,
    results::{InstantiationArgument, InstantiationResult},
};
use resultmap_core::{stmt, Error, Result};
use std::sync::Arc;

/// Projects columns into a constructor call on `target`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DynamicResultBuilderInstantiation {
    target: stmt::Type,
    arguments: Vec<InstantiationArgumentBuilder>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct InstantiationArgumentBuilder {
    builder: Arc<DynamicResultBuilderBasic>,
    alias: Option<String>,
}

impl DynamicResultBuilderInstantiation {
    pub fn new(target: stmt::Type) -> Self {
        Self {
            target,
            arguments: vec![],
        }
    }

    pub fn target(&self) -> &stmt::Type {
        &self.target
    }

    pub fn argument_count(&self) -> usize {
        self.arguments.len()
    }

    /// Appends a scalar argument read from `column_alias`.
    pub fn add_basic_argument(&mut self, column_alias: &str, argument_alias: Option<&str>) -> &mut Self {
        self.arguments.push(InstantiationArgumentBuilder {
            builder: Arc::new(DynamicResultBuilderBasic::new(column_alias)),
            alias: argument_alias.map(str::to_string),
        });
        self
    }

    pub fn build_result(&self, state: &mut CreationState<'_>) -> Result<InstantiationResult> {
        if self.arguments.is_empty() {
            return Err(Error::illegal_state(format!(
                "cannot instantiate `{}` without arguments",
                self.target
            )));
        }

        let mut arguments = Vec::with_capacity(self.arguments.len());
        for (index, argument) in self.arguments.iter().enumerate() {
            arguments.push(InstantiationArgument {
                alias: argument.alias.clone(),
                result: argument.builder.build_result(index, state)?,
            });
        }

        Ok(InstantiationResult {
            target: self.target.clone(),
            arguments,
        })
    }

    pub fn cache_key_instance(&self) -> Self {
        Self {
            target: self.target.clone(),
            arguments: self
                .arguments
                .iter()
                .map(|argument| InstantiationArgumentBuilder {
                    builder: Arc::clone(&argument.builder),
                    alias: argument.alias.clone(),
                })
                .collect(),
        }
    }

    /// Argument builders in declaration order.
    pub fn arguments(&self) -> impl ExactSizeIterator<Item = (&Arc<DynamicResultBuilderBasic>, Option<&str>)> + '_ {
        self.arguments
            .iter()
            .map(|argument| (&argument.builder, argument.alias.as_deref()))
    }
}
