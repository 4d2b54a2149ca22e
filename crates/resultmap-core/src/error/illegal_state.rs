use super::Error;

/// Error when a builder is asked to do something its current state does not
/// allow, such as building a constructor projection with no arguments.
#[derive(Debug)]
pub(super) struct IllegalState {
    message: Box<str>,
}

impl std::error::Error for IllegalState {}

impl core::fmt::Display for IllegalState {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "illegal state: {}", self.message)
    }
}

impl Error {
    /// Creates an illegal state error.
    pub fn illegal_state(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::IllegalState(IllegalState {
            message: message.into().into(),
        }))
    }

    /// Returns `true` if this error is an illegal state error.
    pub fn is_illegal_state(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::IllegalState(_))
    }
}
