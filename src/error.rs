use std::error::Error;
use std::fmt::{self, Display, Formatter};
use std::result;

/// ErrorKind describes the various failure modes of trie construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    IllegalArgument,
    NoWritePermission,
    MemoryAllocation,
    IndexOutOfBounds,
    InvalidFormat,
}

/// TrieError encapsulates an `ErrorKind` and an error message. It can be
/// displayed, and also implements `Error`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TrieError {
    pub kind: ErrorKind,
    pub err: String,
}

impl Display for TrieError {
    fn fmt(&self, fmt: &mut Formatter) -> result::Result<(), fmt::Error> {
        fmt.write_str(&self.err)
    }
}

impl Error for TrieError {
    fn description(&self) -> &str {
        &self.err
    }
}

impl TrieError {
    pub fn new(kind: ErrorKind, msg: &str) -> TrieError {
        let err = if msg.is_empty() {
            format!("{:?}", kind)
        } else {
            format!("{:?}: {}", kind, msg)
        };
        TrieError { kind, err }
    }

    pub fn annotate<S: AsRef<str>>(self, msg: S) -> TrieError {
        TrieError {
            kind: self.kind,
            err: format!("{}: {}", msg.as_ref(), self.err),
        }
    }
}

/// The trie crate's result type.
pub type Result<T> = result::Result<T, TrieError>;

pub(crate) fn illegal_argument<T>(msg: &str) -> Result<T> {
    Err(TrieError::new(ErrorKind::IllegalArgument, msg))
}

pub(crate) fn no_write_permission<T>(msg: &str) -> Result<T> {
    Err(TrieError::new(ErrorKind::NoWritePermission, msg))
}

pub(crate) fn index_out_of_bounds<T>(msg: &str) -> Result<T> {
    Err(TrieError::new(ErrorKind::IndexOutOfBounds, msg))
}

pub(crate) fn invalid_format<T>(msg: &str) -> Result<T> {
    Err(TrieError::new(ErrorKind::InvalidFormat, msg))
}
