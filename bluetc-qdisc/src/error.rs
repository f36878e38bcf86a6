use bluetc_common::ParseNumError;
use bluetc_wire::WireError;
use thiserror::Error;

/// A command line that a qdisc module could not turn into options.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// A token that is not one of the module's keywords.
    #[error("What is \"{0}\"?")]
    UnknownKeyword(String),
    /// A keyword at the end of the command line, without its value.
    #[error("Command line is not complete: \"{0}\" needs a value")]
    MissingValue(&'static str),
    /// A keyword whose value does not parse.
    #[error("Illegal \"{keyword}\": {source}")]
    InvalidValue { keyword: &'static str, source: ParseNumError },
}

/// Errors returned by [`QdiscUtil`](crate::QdiscUtil) operations.
#[derive(Debug, Error)]
pub enum QdiscError {
    /// The command line was rejected.
    #[error(transparent)]
    ParseFailed(#[from] ParseError),
    /// Encoding overflowed the builder, or received attributes were malformed.
    #[error(transparent)]
    Wire(#[from] WireError),
    /// Writing rendered output failed.
    #[error("IO error: {0:?}")]
    Io(#[from] std::io::Error),
    /// No module is registered under this identifier.
    #[error("unknown qdisc \"{0}\"")]
    UnknownQdisc(String),
}

impl QdiscError {
    /// Returns `true` if the input attributes or statistics were missing or too short.
    pub const fn is_malformed(&self) -> bool {
        matches!(self, Self::Wire(WireError::Malformed(_)))
    }

    /// Returns `true` if encoding ran past the message builder's bound.
    pub const fn is_overflow(&self) -> bool {
        matches!(self, Self::Wire(WireError::BufferOverflow { .. } | WireError::AttrTooLong(_)))
    }
}
