use std::{
    error::Error,
    fmt::{self, Debug, Display, Formatter},
};

/// An error raised while reading a typed value out of a compound or list. This is either a
/// structure error, meaning the tree does not have the requested shape, or a custom error
/// produced by a user-provided conversion.
///
/// [`NbtCompound::get`](crate::NbtCompound::get) and [`NbtList::get`](crate::NbtList::get)
/// return this type.
#[derive(Debug)]
pub enum NbtReprError {
    /// A structure error in the tag tree.
    Structure(Box<NbtStructureError>),
    /// A custom conversion error.
    Custom(anyhow::Error),
}

impl NbtReprError {
    /// Creates a new representation error from the given structure error.
    pub fn structure(error: NbtStructureError) -> Self {
        NbtReprError::Structure(Box::new(error))
    }

    /// Creates a `NbtReprError` from any error. Structure errors, including those wrapped in
    /// another `NbtReprError`, become the `Structure` variant; every other error is custom.
    ///
    /// ```
    /// # use nbtkit::*;
    /// let payload = Payload::Byte(0);
    /// let structure_error = NbtReprError::from_any(i32::try_from(&payload).unwrap_err());
    /// assert!(matches!(structure_error, NbtReprError::Structure(..)));
    ///
    /// let nested_error = NbtReprError::from_any(structure_error);
    /// assert!(matches!(nested_error, NbtReprError::Structure(..)));
    ///
    /// let custom_error = "abc".parse::<i32>().unwrap_err();
    /// assert!(matches!(NbtReprError::from_any(custom_error), NbtReprError::Custom(..)));
    /// ```
    pub fn from_any<E: Into<anyhow::Error>>(error: E) -> Self {
        let error = match error.into().downcast::<Self>() {
            Ok(error) => return error,
            Err(error) => error,
        };

        match error.downcast::<NbtStructureError>() {
            Ok(error) => NbtReprError::structure(error),
            Err(error) => NbtReprError::Custom(error),
        }
    }
}

impl From<NbtStructureError> for NbtReprError {
    fn from(error: NbtStructureError) -> Self {
        NbtReprError::structure(error)
    }
}

impl Display for NbtReprError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            NbtReprError::Structure(error) => Display::fmt(error, f),
            NbtReprError::Custom(custom) => Display::fmt(custom, f),
        }
    }
}

impl Error for NbtReprError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            NbtReprError::Structure(error) => Some(error),
            NbtReprError::Custom(custom) => Some(&**custom),
        }
    }
}

/// A conflict between the expected and actual structure of a tag tree: a missing name, an
/// index past the end of a list, or a payload of the wrong type.
#[repr(transparent)]
pub struct NbtStructureError {
    repr: StructureErrorRepr,
}

impl NbtStructureError {
    pub(crate) fn missing_tag<T: Into<String>>(tag_name: T) -> Self {
        NbtStructureError {
            repr: StructureErrorRepr::MissingTag {
                tag_name: tag_name.into().into_boxed_str(),
            },
        }
    }

    pub(crate) fn invalid_index(index: usize, length: usize) -> Self {
        NbtStructureError {
            repr: StructureErrorRepr::InvalidIndex { index, length },
        }
    }

    pub(crate) fn type_mismatch(expected: &'static str, found: &'static str) -> Self {
        NbtStructureError {
            repr: StructureErrorRepr::TypeMismatch {
                expected: Box::new(expected),
                found: Box::new(found),
            },
        }
    }

    /// Returns true if this error was caused by a payload of the wrong type.
    pub fn is_type_mismatch(&self) -> bool {
        matches!(self.repr, StructureErrorRepr::TypeMismatch { .. })
    }
}

impl Debug for NbtStructureError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Debug::fmt(&self.repr, f)
    }
}

impl Display for NbtStructureError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match &self.repr {
            StructureErrorRepr::MissingTag { tag_name } =>
                write!(f, "Missing tag \"{}\"", tag_name),
            StructureErrorRepr::InvalidIndex { index, length } =>
                write!(f, "Index out of range: {} >= {}", index, length),
            StructureErrorRepr::TypeMismatch { expected, found } => write!(
                f,
                "Tag type mismatch: expected {} but found {}",
                expected, found
            ),
        }
    }
}

impl Error for NbtStructureError {}

#[derive(Debug)]
enum StructureErrorRepr {
    MissingTag {
        tag_name: Box<str>,
    },
    InvalidIndex {
        index: usize,
        length: usize,
    },
    // Keep the size of this type down to that of a wide pointer
    TypeMismatch {
        expected: Box<&'static str>,
        found: Box<&'static str>,
    },
}
