use super::Error;

/// Error when a table alias has no registered table group.
///
/// Legacy fetch builders look their owner up by alias. The owner must have
/// been resolved first; the order in which builders are declared is what
/// guarantees this, so a miss is only detected at the point of use.
#[derive(Debug)]
pub(super) struct UnknownTableGroup {
    alias: Box<str>,
}

impl std::error::Error for UnknownTableGroup {}

impl core::fmt::Display for UnknownTableGroup {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "no table group registered for alias `{}`", self.alias)
    }
}

impl Error {
    /// Creates an unknown table group error.
    pub fn unknown_table_group(alias: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::UnknownTableGroup(UnknownTableGroup {
            alias: alias.into().into(),
        }))
    }

    /// Returns `true` if this error is an unknown table group error.
    pub fn is_unknown_table_group(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::UnknownTableGroup(_))
    }
}
