use std::fmt;

#[derive(Debug)]
pub enum ErrorKind {
    /// `set_score` (or `increment`/`decrement`) referenced a key not present in the entry store.
    UnknownKey,
    /// A config setter rejected an out-of-range value; no state was changed.
    InvalidConfig,
}

#[derive(Debug)]
pub struct Error {
    pub kind: ErrorKind,
    pub context: String,
}

impl Error {
    pub fn new(kind: ErrorKind, context: String) -> Self {
        Error { kind, context }
    }

    pub fn unknown_key(context: impl Into<String>) -> Self {
        Error::new(ErrorKind::UnknownKey, context.into())
    }

    pub fn invalid_config(context: impl Into<String>) -> Self {
        Error::new(ErrorKind::InvalidConfig, context.into())
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.context)
    }
}

impl std::error::Error for Error {}

pub type Result<T> = std::result::Result<T, Error>;
