use super::Error;

/// Error when a fetchable has more selectables than declared column aliases.
///
/// Column aliases pair positionally with the selectables of a fetchable. The
/// pairing is only checked when the mapping is resolved against a result set,
/// so declaring too few aliases surfaces here rather than at declaration time.
#[derive(Debug)]
pub(super) struct ColumnIndexOutOfRange {
    index: usize,
    len: usize,
    fetchable: Box<str>,
}

impl std::error::Error for ColumnIndexOutOfRange {}

impl core::fmt::Display for ColumnIndexOutOfRange {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "column alias index {} out of range for `{}` ({} alias{} declared)",
            self.index,
            self.fetchable,
            self.len,
            if self.len == 1 { "" } else { "es" }
        )
    }
}

impl Error {
    /// Creates a column index out of range error.
    pub fn column_index_out_of_range(index: usize, len: usize, fetchable: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::ColumnIndexOutOfRange(ColumnIndexOutOfRange {
            index,
            len,
            fetchable: fetchable.into().into(),
        }))
    }

    /// Returns `true` if this error is a column index out of range error.
    pub fn is_column_index_out_of_range(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::ColumnIndexOutOfRange(_))
    }
}
