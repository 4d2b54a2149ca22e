use super::Error;

/// Error when an attribute path does not resolve against a model.
#[derive(Debug)]
pub(super) struct UnknownAttribute {
    owner: Box<str>,
    name: Box<str>,
}

impl std::error::Error for UnknownAttribute {}

impl core::fmt::Display for UnknownAttribute {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "unknown attribute `{}` on `{}`", self.name, self.owner)
    }
}

impl Error {
    /// Creates an unknown attribute error.
    pub fn unknown_attribute(owner: impl Into<String>, name: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::UnknownAttribute(UnknownAttribute {
            owner: owner.into().into(),
            name: name.into().into(),
        }))
    }

    /// Returns `true` if this error is an unknown attribute error.
    pub fn is_unknown_attribute(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::UnknownAttribute(_))
    }
}
