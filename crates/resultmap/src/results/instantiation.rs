use super::BasicResult;
use resultmap_core::{
    stmt::{self, Value},
    Result,
};

/// A constructor projection: each row becomes one call to `target`.
#[derive(Debug, Clone)]
pub struct InstantiationResult {
    pub target: stmt::Type,

    /// Constructor arguments in declaration order
    pub arguments: Vec<InstantiationArgument>,
}

#[derive(Debug, Clone)]
pub struct InstantiationArgument {
    pub alias: Option<String>,
    pub result: BasicResult,
}

impl InstantiationResult {
    /// Assembles the constructor arguments as a record.
    pub fn assemble(&self, row: &[Value]) -> Result<Value> {
        Ok(Value::Record(
            self.arguments
                .iter()
                .map(|argument| argument.result.assemble(row))
                .collect::<Result<_>>()?,
        ))
    }
}
