use std::fmt;

/// A domain-level type: the type a value has once it leaves the result set
/// and enters the application.
///
/// [`db::Type`](crate::schema::db::Type) is the relational counterpart. Basic
/// builders infer a `Type` from the column's `db::Type` unless an explicit
/// one is supplied.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Type {
    /// Boolean value
    Bool,

    /// Signed 16-bit integer
    I16,

    /// Signed 32-bit integer
    I32,

    /// Signed 64-bit integer
    I64,

    /// 64-bit floating point
    F64,

    /// Arbitrary precision decimal, carried as text
    Decimal,

    /// String type
    String,

    /// Byte array
    Bytes,

    /// Point in time, carried as text
    Timestamp,

    /// An instance of a model
    Model(crate::schema::app::ModelId),

    /// A user-defined type known only by name, such as the target of a
    /// constructor projection.
    Named(String),

    /// A type that could not be inferred
    Unknown,
}

impl Type {
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            Self::I16 | Self::I32 | Self::I64 | Self::F64 | Self::Decimal
        )
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool => f.write_str("bool"),
            Self::I16 => f.write_str("i16"),
            Self::I32 => f.write_str("i32"),
            Self::I64 => f.write_str("i64"),
            Self::F64 => f.write_str("f64"),
            Self::Decimal => f.write_str("decimal"),
            Self::String => f.write_str("string"),
            Self::Bytes => f.write_str("bytes"),
            Self::Timestamp => f.write_str("timestamp"),
            Self::Model(id) => write!(f, "model({})", id.0),
            Self::Named(name) => f.write_str(name),
            Self::Unknown => f.write_str("unknown"),
        }
    }
}
