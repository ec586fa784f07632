//! Decode error type.

use thiserror::Error;

/// Error raised when binary input cannot be decoded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("unexpected end of input: needed {needed} more bytes, {remaining} remaining")]
    UnexpectedEof { needed: usize, remaining: usize },

    #[error("unknown {kind} tag {tag}")]
    UnknownTag { kind: &'static str, tag: u8 },

    #[error("{0} trailing bytes after decoding")]
    TrailingBytes(usize),

    #[error("invalid {field}: {reason}")]
    InvalidValue {
        field: &'static str,
        reason: &'static str,
    },
}
