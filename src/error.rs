use crate::{snbt::SnbtError, TagId};
use std::{
    error::Error,
    fmt::{self, Display, Formatter},
    io,
};

/// Describes an error which occurred while building, reading or writing NBT data.
#[derive(Debug)]
pub enum NbtError {
    /// A native I/O error, usually raised by the compression layer.
    StdIo(io::Error),
    /// A tag name was longer than 65535 bytes once encoded as UTF-8.
    NameTooLong(usize),
    /// A string payload was longer than 65535 bytes once encoded as UTF-8.
    StringTooLong(usize),
    /// A root tag must hold a compound and have an empty name.
    InvalidRootTag,
    /// An invalid tag ID was encountered.
    UnknownTagId(u8),
    /// Compressed input started with a byte which is neither a gzip header nor a tag ID.
    UnknownCompressionType(u8),
    /// A literal could not be parsed as the given tag type.
    InvalidLiteral {
        /// The tag type the literal was parsed as.
        kind: TagId,
        /// The offending literal.
        literal: Box<str>,
    },
    /// The SNBT input is not well formed.
    MalformedSnbt(SnbtError),
    /// An array or list had 2^31 or more elements, or a negative length on the wire.
    ContainerTooLong {
        /// The container type.
        kind: TagId,
        /// The offending length.
        len: i64,
    },
    /// A list would contain elements of two different types.
    ListTypeMismatch {
        /// The type of the list's existing elements.
        expected: TagId,
        /// The type of the rejected element.
        found: TagId,
    },
    /// A JSON value has no NBT counterpart.
    InvalidJsonValue(&'static str),
    /// The JSON text could not be parsed.
    #[cfg(feature = "json")]
    Json(serde_json::Error),
    /// The binary input ended before a complete value could be read.
    UnexpectedEndOfData {
        /// The number of bytes the next read required.
        needed: usize,
        /// The number of bytes left in the input.
        remaining: usize,
    },
    /// A binary string was not valid UTF-8.
    InvalidString,
    /// Lists and compounds were nested deeper than [`MAX_DEPTH`](crate::MAX_DEPTH).
    DepthLimitExceeded(usize),
    /// A list position was past the end of the list.
    IndexOutOfRange {
        /// The requested position.
        index: usize,
        /// The length of the list.
        len: usize,
    },
}

impl From<io::Error> for NbtError {
    fn from(error: io::Error) -> Self {
        NbtError::StdIo(error)
    }
}

impl From<SnbtError> for NbtError {
    fn from(error: SnbtError) -> Self {
        NbtError::MalformedSnbt(error)
    }
}

#[cfg(feature = "json")]
impl From<serde_json::Error> for NbtError {
    fn from(error: serde_json::Error) -> Self {
        NbtError::Json(error)
    }
}

impl Display for NbtError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            NbtError::StdIo(error) => write!(f, "{}", error),
            &NbtError::NameTooLong(len) =>
                write!(f, "Tag name is {} bytes long, the limit is 65535", len),
            &NbtError::StringTooLong(len) =>
                write!(f, "String is {} bytes long, the limit is 65535", len),
            NbtError::InvalidRootTag =>
                write!(f, "Root tag must be a compound and its name must be empty"),
            &NbtError::UnknownTagId(id) => write!(f, "Encountered invalid tag ID 0x{:X}", id),
            &NbtError::UnknownCompressionType(byte) => write!(
                f,
                "Unknown compression type: data starts with byte 0x{:X}",
                byte
            ),
            NbtError::InvalidLiteral { kind, literal } =>
                write!(f, "Invalid {} literal: '{}'", kind.name(), literal),
            NbtError::MalformedSnbt(error) => Display::fmt(error, f),
            NbtError::ContainerTooLong { kind, len } =>
                write!(f, "Invalid {} length: {}", kind.name(), len),
            NbtError::ListTypeMismatch { expected, found } => write!(
                f,
                "List contains different types: expected {} but found {}",
                expected.name(),
                found.name()
            ),
            NbtError::InvalidJsonValue(kind) => write!(f, "JSON {} has no NBT representation", kind),
            #[cfg(feature = "json")]
            NbtError::Json(error) => write!(f, "{}", error),
            &NbtError::UnexpectedEndOfData { needed, remaining } => write!(
                f,
                "Unexpected end of data: needed {} bytes but only {} remain",
                needed, remaining
            ),
            NbtError::InvalidString => write!(f, "Invalid string encoding"),
            &NbtError::DepthLimitExceeded(limit) =>
                write!(f, "Lists and compounds are nested deeper than {} levels", limit),
            &NbtError::IndexOutOfRange { index, len } =>
                write!(f, "Index out of range: {} > {}", index, len),
        }
    }
}

impl Error for NbtError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            NbtError::StdIo(error) => Some(error),
            NbtError::MalformedSnbt(error) => Some(error),
            #[cfg(feature = "json")]
            NbtError::Json(error) => Some(error),
            _ => None,
        }
    }
}
