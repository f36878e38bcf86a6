use thiserror::Error;

/// Errors raised while building or walking netlink attributes.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WireError {
    /// Appending would grow the message past the builder's bound.
    #[error("message exceeded bound of {capacity} bytes (needs {needed})")]
    BufferOverflow { needed: usize, capacity: usize },
    /// The attribute length does not fit the 16-bit length field.
    #[error("attribute of {0} bytes is too long for a netlink attribute")]
    AttrTooLong(usize),
    /// The input is missing a required attribute or is too short.
    #[error("malformed attribute: {0}")]
    Malformed(&'static str),
}
