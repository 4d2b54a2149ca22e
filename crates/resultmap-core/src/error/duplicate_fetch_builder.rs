use super::Error;

/// Error when a fetchable is declared twice on the same container.
///
/// `add_property` refuses to replace an existing fetch builder. Callers that
/// want last-write-wins semantics use `add_fetch_builder` instead.
#[derive(Debug)]
pub(super) struct DuplicateFetchBuilder {
    owner: Box<str>,
    fetchable: Box<str>,
    existing: Box<str>,
}

impl std::error::Error for DuplicateFetchBuilder {}

impl core::fmt::Display for DuplicateFetchBuilder {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "fetch builder for `{}.{}` already exists: {}",
            self.owner, self.fetchable, self.existing
        )
    }
}

impl Error {
    /// Creates a duplicate fetch builder error naming the owner, the
    /// fetchable and the builder already registered for it.
    pub fn duplicate_fetch_builder(
        owner: impl Into<String>,
        fetchable: impl Into<String>,
        existing: impl Into<String>,
    ) -> Error {
        Error::from(super::ErrorKind::DuplicateFetchBuilder(DuplicateFetchBuilder {
            owner: owner.into().into(),
            fetchable: fetchable.into().into(),
            existing: existing.into().into(),
        }))
    }

    /// Returns `true` if this error is a duplicate fetch builder error.
    pub fn is_duplicate_fetch_builder(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::DuplicateFetchBuilder(_))
    }
}
