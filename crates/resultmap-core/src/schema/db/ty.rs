use crate::stmt;

/// Relational type of a column, as reported by result-set metadata.
///
/// `db::Type` is what the driver sees. Basic results convert it to a
/// [`stmt::Type`] with [`Type::domain_type`] unless the mapping supplies an
/// explicit type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Type {
    Boolean,
    SmallInt,
    Integer,
    BigInt,
    Double,
    Numeric,
    VarChar,
    Text,
    Blob,
    Timestamp,

    /// Reported when the driver does not know the column's type
    Other,
}

impl Type {
    /// The domain type a value of this relational type is read as when no
    /// explicit type is given.
    pub fn domain_type(self) -> stmt::Type {
        match self {
            Self::Boolean => stmt::Type::Bool,
            Self::SmallInt => stmt::Type::I16,
            Self::Integer => stmt::Type::I32,
            Self::BigInt => stmt::Type::I64,
            Self::Double => stmt::Type::F64,
            Self::Numeric => stmt::Type::Decimal,
            Self::VarChar | Self::Text => stmt::Type::String,
            Self::Blob => stmt::Type::Bytes,
            Self::Timestamp => stmt::Type::Timestamp,
            Self::Other => stmt::Type::Unknown,
        }
    }

    /// The relational type used to store values of a domain type.
    pub fn from_app(ty: &stmt::Type) -> Self {
        match ty {
            stmt::Type::Bool => Self::Boolean,
            stmt::Type::I16 => Self::SmallInt,
            stmt::Type::I32 => Self::Integer,
            stmt::Type::I64 => Self::BigInt,
            stmt::Type::F64 => Self::Double,
            stmt::Type::Decimal => Self::Numeric,
            stmt::Type::String => Self::VarChar,
            stmt::Type::Bytes => Self::Blob,
            stmt::Type::Timestamp => Self::Timestamp,
            _ => Self::Other,
        }
    }
}
