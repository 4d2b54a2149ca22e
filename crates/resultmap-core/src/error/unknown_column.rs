use super::Error;

/// Error when a column name or position is absent from the result set
/// metadata.
#[derive(Debug)]
pub(super) struct UnknownColumn {
    column: Box<str>,
}

impl std::error::Error for UnknownColumn {}

impl core::fmt::Display for UnknownColumn {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "column `{}` was not found in the result set", self.column)
    }
}

impl Error {
    /// Creates an unknown column error.
    pub fn unknown_column(column: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::UnknownColumn(UnknownColumn {
            column: column.into().into(),
        }))
    }

    /// Returns `true` if this error is an unknown column error.
    pub fn is_unknown_column(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::UnknownColumn(_))
    }
}
