use super::Type;
use crate::{Error, Result};

/// A single value read from, or assembled out of, a result-set row.
#[derive(Debug, Default, Clone, PartialEq)]
pub enum Value {
    /// Null value
    #[default]
    Null,

    /// Boolean value
    Bool(bool),

    /// Signed 16-bit integer
    I16(i16),

    /// Signed 32-bit integer
    I32(i32),

    /// Signed 64-bit integer
    I64(i64),

    /// 64-bit floating point
    F64(f64),

    /// String value
    String(String),

    /// Byte array
    Bytes(Vec<u8>),

    /// Ordered values, such as the arguments of a constructor projection
    Record(Vec<Value>),
}

impl Value {
    pub const fn null() -> Self {
        Self::Null
    }

    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Name of the variant, used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Null => "Null",
            Self::Bool(_) => "Bool",
            Self::I16(_) => "I16",
            Self::I32(_) => "I32",
            Self::I64(_) => "I64",
            Self::F64(_) => "F64",
            Self::String(_) => "String",
            Self::Bytes(_) => "Bytes",
            Self::Record(_) => "Record",
        }
    }

    /// Widens or reinterprets the value as `ty`. Nulls pass through
    /// unchanged.
    pub fn cast(self, ty: &Type) -> Result<Value> {
        Ok(match (self, ty) {
            (Value::Null, _) => Value::Null,
            (value, Type::Unknown | Type::Named(_) | Type::Model(_)) => value,
            (Value::Bool(v), Type::Bool) => Value::Bool(v),
            (Value::I16(v), Type::I16) => Value::I16(v),
            (Value::I16(v), Type::I32) => Value::I32(v.into()),
            (Value::I16(v), Type::I64) => Value::I64(v.into()),
            (Value::I32(v), Type::I32) => Value::I32(v),
            (Value::I32(v), Type::I64) => Value::I64(v.into()),
            (Value::I32(v), Type::I16) => Value::I16(
                i16::try_from(v).map_err(|_| Error::type_conversion(Value::I32(v), "i16"))?,
            ),
            (Value::I64(v), Type::I64) => Value::I64(v),
            (Value::I64(v), Type::I32) => Value::I32(
                i32::try_from(v).map_err(|_| Error::type_conversion(Value::I64(v), "i32"))?,
            ),
            (Value::I64(v), Type::Bool) => Value::Bool(v != 0),
            (Value::I32(v), Type::F64) => Value::F64(v.into()),
            (Value::I64(v), Type::F64) => Value::F64(v as f64),
            (Value::F64(v), Type::F64) => Value::F64(v),
            (Value::String(v), Type::String | Type::Decimal | Type::Timestamp) => {
                Value::String(v)
            }
            (Value::I64(v), Type::String) => Value::String(v.to_string()),
            (Value::Bytes(v), Type::Bytes) => Value::Bytes(v),
            (Value::Record(v), _) => Value::Record(v),
            (value, ty) => return Err(Error::type_conversion(value, type_name(ty))),
        })
    }
}

fn type_name(ty: &Type) -> &'static str {
    match ty {
        Type::Bool => "bool",
        Type::I16 => "i16",
        Type::I32 => "i32",
        Type::I64 => "i64",
        Type::F64 => "f64",
        Type::Decimal => "decimal",
        Type::String => "string",
        Type::Bytes => "bytes",
        Type::Timestamp => "timestamp",
        Type::Model(_) => "model",
        Type::Named(_) => "named",
        Type::Unknown => "unknown",
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::I32(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::I64(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::F64(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Value::Null)
    }
}
