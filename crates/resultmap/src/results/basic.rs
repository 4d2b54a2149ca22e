use super::read;
use crate::converter::Converter;
use resultmap_core::{
    schema::FetchableId,
    stmt::{self, FetchTiming, NavigablePath, Value},
    Result,
};

/// A scalar read from a single column.
#[derive(Debug, Clone)]
pub struct BasicResult {
    /// Index of the result in the query's projection
    pub result_position: usize,

    /// Index into the row's values array
    pub values_array_position: usize,

    pub alias: Option<String>,

    pub ty: stmt::Type,

    /// Applied to the raw value before it is cast to `ty`
    pub converter: Option<Converter>,
}

/// A basic-valued attribute of a fetch parent.
#[derive(Debug, Clone)]
pub struct BasicFetch {
    pub path: NavigablePath,
    pub fetchable: FetchableId,
    pub values_array_position: usize,
    pub ty: stmt::Type,
    pub nullable: bool,
    pub timing: FetchTiming,
}

impl BasicResult {
    pub fn assemble(&self, row: &[Value]) -> Result<Value> {
        let mut value = read(row, self.values_array_position)?;

        if let Some(converter) = &self.converter {
            value = converter.to_domain(value)?;
        }

        value.cast(&self.ty)
    }
}

impl BasicFetch {
    pub fn assemble(&self, row: &[Value]) -> Result<Value> {
        read(row, self.values_array_position)?.cast(&self.ty)
    }
}
