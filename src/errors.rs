//! A module to handle all errors

use crate::wire::WireType;
use thiserror::Error;

/// An error enum
#[derive(Error, Debug)]
pub enum Error {
    /// A read needed more bytes than the buffer had left
    #[error("unexpected end of buffer")]
    UnexpectedEndOfBuffer,
    /// A field key carried the reserved tag 0
    #[error("illegal field tag 0")]
    IllegalTag,
    /// Group wire types, or a 3-bit code outside the known set
    #[error("unsupported wire type {0}")]
    UnsupportedWireType(u8),
    /// A known field arrived with a different wire type than its schema declares
    #[error("field {tag}: expected wire type {expected}, found {found}")]
    WireTypeMismatch {
        /// Field tag
        tag: u64,
        /// Wire type declared by the schema
        expected: WireType,
        /// Wire type found on the wire
        found: WireType,
    },
    /// A varint does not fit in 64 bits
    #[error("varint exceeds 64 bits")]
    VarintOverflow,
    /// Nested messages went deeper than the configured limit
    #[error("message nesting exceeds maximum depth of {0}")]
    NestingTooDeep(usize),
    /// A `string` field is not valid UTF-8
    #[error("invalid utf8 in string field: {0}")]
    Utf8(#[from] core::str::Utf8Error),
    /// Io error
    #[cfg(feature = "std")]
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// A wrapper for `Result<T, Error>`
pub type Result<T> = core::result::Result<T, Error>;
