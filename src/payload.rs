use crate::{
    raw,
    snbt::{self, SnbtStyle, Styled},
    NbtError,
    NbtReprError,
    NbtStructureError,
    Tag,
    TagId,
};
use std::{
    convert::{AsRef, TryFrom},
    fmt::{self, Debug, Display, Formatter},
    ops::Index,
    slice,
    str::FromStr,
    vec,
};

/// Lists and arrays hold at most `i32::MAX` elements.
pub(crate) const MAX_CONTAINER_LEN: usize = i32::MAX as usize;

/// The value held by a [`Tag`], one variant per NBT payload type.
///
/// Numeric variants always hold a value of exactly their width. The wrapping constructors
/// [`byte`](Payload::byte), [`long`](Payload::long), etc. and the setters
/// [`set_integer`](Payload::set_integer) and [`set_float`](Payload::set_float) accept wider
/// values and truncate them the way a two's complement cast does.
#[derive(Clone, PartialEq)]
pub enum Payload {
    /// A signed, one-byte integer.
    Byte(i8),
    /// A signed, two-byte integer.
    Short(i16),
    /// A signed, four-byte integer.
    Int(i32),
    /// A signed, eight-byte integer.
    Long(i64),
    /// A 32-bit floating point value.
    Float(f32),
    /// A 64-bit floating point value.
    Double(f64),
    /// An array of signed bytes.
    ByteArray(Vec<i8>),
    /// A UTF-8 string of at most 65535 bytes.
    String(String),
    /// A homogenous list of payloads.
    List(NbtList),
    /// An ordered sequence of named tags.
    Compound(NbtCompound),
    /// An array of signed, four-byte integers.
    IntArray(Vec<i32>),
    /// An array of signed, eight-byte integers.
    LongArray(Vec<i64>),
}

impl Payload {
    /// Returns the tag type of this payload.
    pub const fn id(&self) -> TagId {
        match self {
            Payload::Byte(_) => TagId::Byte,
            Payload::Short(_) => TagId::Short,
            Payload::Int(_) => TagId::Int,
            Payload::Long(_) => TagId::Long,
            Payload::Float(_) => TagId::Float,
            Payload::Double(_) => TagId::Double,
            Payload::ByteArray(_) => TagId::ByteArray,
            Payload::String(_) => TagId::String,
            Payload::List(_) => TagId::List,
            Payload::Compound(_) => TagId::Compound,
            Payload::IntArray(_) => TagId::IntArray,
            Payload::LongArray(_) => TagId::LongArray,
        }
    }

    #[inline]
    pub(crate) const fn type_name(&self) -> &'static str {
        self.id().name()
    }

    /// Creates a byte from the low eight bits of the given integer.
    ///
    /// ```
    /// # use nbtkit::Payload;
    /// assert_eq!(Payload::byte(300), Payload::Byte(44));
    /// assert_eq!(Payload::byte(-1), Payload::Byte(-1));
    /// ```
    #[inline]
    pub const fn byte(value: i128) -> Self {
        Payload::Byte(value as i8)
    }

    /// Creates a short from the low sixteen bits of the given integer.
    #[inline]
    pub const fn short(value: i128) -> Self {
        Payload::Short(value as i16)
    }

    /// Creates an int from the low 32 bits of the given integer.
    #[inline]
    pub const fn int(value: i128) -> Self {
        Payload::Int(value as i32)
    }

    /// Creates a long from the low 64 bits of the given integer.
    ///
    /// ```
    /// # use nbtkit::Payload;
    /// assert_eq!(Payload::long(1 << 64 | 5), Payload::Long(5));
    /// ```
    #[inline]
    pub const fn long(value: i128) -> Self {
        Payload::Long(value as i64)
    }

    /// Creates a float by rounding the given value to single precision.
    #[inline]
    pub fn float(value: f64) -> Self {
        Payload::Float(value as f32)
    }

    /// Creates a double holding the given value.
    #[inline]
    pub fn double(value: f64) -> Self {
        Payload::Double(value)
    }

    /// Replaces the value of an integer payload, truncating the new value to the payload's
    /// width.
    ///
    /// ```
    /// # use nbtkit::Payload;
    /// let mut payload = Payload::Short(0);
    /// payload.set_integer(70_000).unwrap();
    /// assert_eq!(payload, Payload::Short(4464));
    ///
    /// assert!(Payload::Float(0.0).set_integer(1).is_err());
    /// ```
    pub fn set_integer(&mut self, value: i128) -> Result<(), NbtStructureError> {
        *self = match self {
            Payload::Byte(_) => Payload::byte(value),
            Payload::Short(_) => Payload::short(value),
            Payload::Int(_) => Payload::int(value),
            Payload::Long(_) => Payload::long(value),
            _ =>
                return Err(NbtStructureError::type_mismatch(
                    "Byte, Short, Int, or Long",
                    self.type_name(),
                )),
        };

        Ok(())
    }

    /// Replaces the value of a float or double payload. Floats round the new value to single
    /// precision.
    pub fn set_float(&mut self, value: f64) -> Result<(), NbtStructureError> {
        *self = match self {
            Payload::Float(_) => Payload::float(value),
            Payload::Double(_) => Payload::double(value),
            _ =>
                return Err(NbtStructureError::type_mismatch(
                    "Float or Double",
                    self.type_name(),
                )),
        };

        Ok(())
    }

    /// Converts this payload into SNBT.
    ///
    /// # Examples
    ///
    /// ```
    /// # use nbtkit::*;
    /// assert_eq!(Payload::Byte(5).to_snbt(SnbtStyle::Compact), "5b");
    /// assert_eq!(Payload::Double(5.5).to_snbt(SnbtStyle::Compact), "5.5d");
    /// assert_eq!(
    ///     Payload::String("say \"hi\"".to_owned()).to_snbt(SnbtStyle::Compact),
    ///     r#""say \"hi\"""#
    /// );
    /// assert_eq!(Payload::IntArray(vec![1, 2]).to_snbt(SnbtStyle::Compact), "[I;1,2]");
    /// assert_eq!(Payload::LongArray(vec![1, 2]).to_snbt(SnbtStyle::Formatted), "[L; 1l, 2l]");
    /// ```
    pub fn to_snbt(&self, style: SnbtStyle) -> String {
        Styled(self, style).to_string()
    }
}

fn write_array<T: Display>(
    f: &mut Formatter<'_>,
    kind: TagId,
    values: &[T],
    suffix: &str,
    style: SnbtStyle,
) -> fmt::Result
{
    write!(f, "[{}", kind.type_specifier())?;
    if values.is_empty() {
        return f.write_str(";]");
    }

    f.write_str(style.array_separator())?;
    for (index, value) in values.iter().enumerate() {
        if index > 0 {
            f.write_str(style.element_separator())?;
        }
        write!(f, "{}{}", value, suffix)?;
    }
    f.write_str("]")
}

impl Display for Styled<'_, Payload> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let Styled(payload, style) = *self;

        match payload {
            Payload::Byte(value) => write!(f, "{}b", value),
            Payload::Short(value) => write!(f, "{}s", value),
            Payload::Int(value) => write!(f, "{}", value),
            Payload::Long(value) => write!(f, "{}l", value),
            // Debug output keeps the decimal point and round-trips exactly
            Payload::Float(value) => write!(f, "{:?}f", value),
            Payload::Double(value) => write!(f, "{:?}d", value),
            Payload::ByteArray(values) => write_array(f, TagId::ByteArray, values, "b", style),
            Payload::String(value) => snbt::write_quoted(f, value),
            Payload::List(list) => Display::fmt(&Styled(list, style), f),
            Payload::Compound(compound) => Display::fmt(&Styled(compound, style), f),
            Payload::IntArray(values) => write_array(f, TagId::IntArray, values, "", style),
            Payload::LongArray(values) => write_array(f, TagId::LongArray, values, "l", style),
        }
    }
}

impl Display for Payload {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&Styled(self, SnbtStyle::Compact), f)
    }
}

impl Debug for Payload {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Debug::fmt(&self.to_snbt(SnbtStyle::Compact), f)
    }
}

// Implement the from trait for all the payload's internal types
macro_rules! payload_from {
    ($($type:ty, $payload:ident);*) => {
        $(
            impl From<$type> for Payload {
                fn from(value: $type) -> Payload {
                    Payload::$payload(value)
                }
            }
        )*
    };
}

payload_from!(
    i8, Byte;
    i16, Short;
    i32, Int;
    i64, Long;
    f32, Float;
    f64, Double;
    Vec<i8>, ByteArray;
    String, String;
    NbtList, List;
    NbtCompound, Compound;
    Vec<i32>, IntArray;
    Vec<i64>, LongArray
);

impl From<&str> for Payload {
    fn from(value: &str) -> Payload {
        Payload::String(value.to_owned())
    }
}

impl From<&String> for Payload {
    fn from(value: &String) -> Payload {
        Payload::String(value.clone())
    }
}

impl From<bool> for Payload {
    fn from(value: bool) -> Payload {
        Payload::Byte(if value { 1 } else { 0 })
    }
}

impl From<u8> for Payload {
    fn from(value: u8) -> Self {
        Payload::Byte(value as i8)
    }
}

impl From<Vec<u8>> for Payload {
    fn from(value: Vec<u8>) -> Self {
        Payload::ByteArray(value.into_iter().map(|byte| byte as i8).collect())
    }
}

macro_rules! prim_from_payload {
    ($($type:ty, $payload:ident);*) => {
        $(
            impl TryFrom<&Payload> for $type {
                type Error = NbtStructureError;

                fn try_from(payload: &Payload) -> Result<Self, Self::Error> {
                    if let Payload::$payload(value) = payload {
                        Ok(*value)
                    } else {
                        Err(NbtStructureError::type_mismatch(
                            stringify!($payload),
                            payload.type_name(),
                        ))
                    }
                }
            }
        )*
    };
}

prim_from_payload!(
    i8, Byte;
    i16, Short;
    i32, Int;
    i64, Long;
    f32, Float;
    f64, Double
);

impl TryFrom<&Payload> for bool {
    type Error = NbtStructureError;

    fn try_from(payload: &Payload) -> Result<Self, Self::Error> {
        match payload {
            &Payload::Byte(value) => Ok(value != 0),
            &Payload::Short(value) => Ok(value != 0),
            &Payload::Int(value) => Ok(value != 0),
            &Payload::Long(value) => Ok(value != 0),
            _ => Err(NbtStructureError::type_mismatch(
                "Byte, Short, Int, or Long",
                payload.type_name(),
            )),
        }
    }
}

impl TryFrom<&Payload> for u8 {
    type Error = NbtStructureError;

    fn try_from(payload: &Payload) -> Result<Self, Self::Error> {
        match payload {
            &Payload::Byte(value) => Ok(value as u8),
            _ => Err(NbtStructureError::type_mismatch("Byte", payload.type_name())),
        }
    }
}

macro_rules! ref_from_payload {
    ($($type:ty, $payload:ident);*) => {
        $(
            impl<'a> TryFrom<&'a Payload> for &'a $type {
                type Error = NbtStructureError;

                fn try_from(payload: &'a Payload) -> Result<Self, Self::Error> {
                    if let Payload::$payload(value) = payload {
                        Ok(value)
                    } else {
                        Err(NbtStructureError::type_mismatch(
                            stringify!($payload),
                            payload.type_name(),
                        ))
                    }
                }
            }

            impl<'a> TryFrom<&'a mut Payload> for &'a mut $type {
                type Error = NbtStructureError;

                fn try_from(payload: &'a mut Payload) -> Result<Self, Self::Error> {
                    let found = payload.type_name();
                    if let Payload::$payload(value) = payload {
                        Ok(value)
                    } else {
                        Err(NbtStructureError::type_mismatch(stringify!($payload), found))
                    }
                }
            }

            impl sealed::Sealed for &mut $type {}

            impl<'a> ElementMut<'a> for &'a mut $type {
                fn from_element(payload: &'a mut Payload) -> Result<Self, NbtStructureError> {
                    Self::try_from(payload)
                }
            }
        )*
    };
}

mod sealed {
    pub trait Sealed {}
}

/// A mutable view into a list element which cannot change the element's payload type.
///
/// Implemented for mutable references to the value held by each payload variant, but not for
/// `&mut Payload`, so [`NbtList::get_mut`] can never break the homogeneity of a list. Use
/// [`NbtList::set`] to replace an element wholesale.
pub trait ElementMut<'a>: Sized + sealed::Sealed {
    /// Borrows the value held by the given payload, or returns an error if the variant differs.
    fn from_element(payload: &'a mut Payload) -> Result<Self, NbtStructureError>;
}

ref_from_payload!(
    i8, Byte;
    i16, Short;
    i32, Int;
    i64, Long;
    f32, Float;
    f64, Double;
    Vec<i8>, ByteArray;
    [i8], ByteArray;
    String, String;
    str, String;
    NbtList, List;
    NbtCompound, Compound;
    Vec<i32>, IntArray;
    [i32], IntArray;
    Vec<i64>, LongArray;
    [i64], LongArray
);

impl<'a> TryFrom<&'a Payload> for &'a [u8] {
    type Error = NbtStructureError;

    fn try_from(payload: &'a Payload) -> Result<Self, Self::Error> {
        if let Payload::ByteArray(value) = payload {
            Ok(raw::cast_bytes_to_unsigned(value.as_slice()))
        } else {
            Err(NbtStructureError::type_mismatch(
                "ByteArray",
                payload.type_name(),
            ))
        }
    }
}

macro_rules! from_payload {
    ($($type:ty, $payload:ident);*) => {
        $(
            impl TryFrom<Payload> for $type {
                type Error = NbtStructureError;

                fn try_from(payload: Payload) -> Result<Self, Self::Error> {
                    if let Payload::$payload(value) = payload {
                        Ok(value)
                    } else {
                        Err(NbtStructureError::type_mismatch(
                            stringify!($payload),
                            payload.type_name(),
                        ))
                    }
                }
            }
        )*
    };
}

from_payload!(
    i8, Byte;
    i16, Short;
    i32, Int;
    i64, Long;
    f32, Float;
    f64, Double;
    Vec<i8>, ByteArray;
    String, String;
    NbtList, List;
    NbtCompound, Compound;
    Vec<i32>, IntArray;
    Vec<i64>, LongArray
);

/// A list of payloads which all share one tag type.
///
/// Every method which adds elements checks the new element against the type of the existing
/// ones and fails with [`NbtError::ListTypeMismatch`] if they differ. An empty list has no
/// element type.
#[repr(transparent)]
#[derive(Clone, PartialEq, Default)]
pub struct NbtList(Vec<Payload>);

impl NbtList {
    /// Returns a new, empty list.
    pub const fn new() -> Self {
        NbtList(Vec::new())
    }

    /// Returns a new, empty list with the given initial capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        NbtList(Vec::with_capacity(capacity))
    }

    /// Builds a list from the given payloads, making sure they all have the same type.
    ///
    /// ```
    /// # use nbtkit::*;
    /// let list = NbtList::from_values(vec![Payload::Int(1), Payload::Int(2)]).unwrap();
    /// assert_eq!(list.element_id(), Some(TagId::Int));
    ///
    /// assert!(matches!(
    ///     NbtList::from_values(vec![Payload::Int(1), Payload::Byte(2)]),
    ///     Err(NbtError::ListTypeMismatch { expected: TagId::Int, found: TagId::Byte })
    /// ));
    /// ```
    pub fn from_values(values: Vec<Payload>) -> Result<Self, NbtError> {
        if values.len() > MAX_CONTAINER_LEN {
            return Err(NbtError::ContainerTooLong {
                kind: TagId::List,
                len: values.len() as i64,
            });
        }

        if let Some(first) = values.first() {
            let expected = first.id();
            if let Some(other) = values.iter().find(|value| value.id() != expected) {
                return Err(NbtError::ListTypeMismatch {
                    expected,
                    found: other.id(),
                });
            }
        }

        Ok(NbtList(values))
    }

    // Lists built by the crate's own decoders are homogenous by construction
    #[inline]
    pub(crate) fn from_values_unchecked(values: Vec<Payload>) -> Self {
        NbtList(values)
    }

    /// Returns the tag type of the elements, or `None` if the list is empty.
    pub fn element_id(&self) -> Option<TagId> {
        self.0.first().map(Payload::id)
    }

    fn check_element(&self, value: &Payload, others: usize) -> Result<(), NbtError> {
        match self.element_id() {
            Some(expected) if others > 0 && expected != value.id() =>
                Err(NbtError::ListTypeMismatch {
                    expected,
                    found: value.id(),
                }),
            _ => Ok(()),
        }
    }

    fn check_len(&self) -> Result<(), NbtError> {
        if self.0.len() >= MAX_CONTAINER_LEN {
            Err(NbtError::ContainerTooLong {
                kind: TagId::List,
                len: self.0.len() as i64 + 1,
            })
        } else {
            Ok(())
        }
    }

    /// Appends the given value after wrapping it in a [`Payload`].
    ///
    /// ```
    /// # use nbtkit::*;
    /// let mut list = NbtList::new();
    ///
    /// list.push(10i32).unwrap();
    /// assert!(list.push("ten").is_err());
    ///
    /// assert_eq!(list.get::<i32>(0).unwrap(), 10);
    /// assert_eq!(list.len(), 1);
    /// ```
    pub fn push<T: Into<Payload>>(&mut self, value: T) -> Result<(), NbtError> {
        let value = value.into();
        self.check_element(&value, self.0.len())?;
        self.check_len()?;
        self.0.push(value);
        Ok(())
    }

    /// Inserts the given value at `index`, shifting later elements back.
    pub fn insert<T: Into<Payload>>(&mut self, index: usize, value: T) -> Result<(), NbtError> {
        if index > self.0.len() {
            return Err(NbtError::IndexOutOfRange {
                index,
                len: self.0.len(),
            });
        }

        let value = value.into();
        self.check_element(&value, self.0.len())?;
        self.check_len()?;
        self.0.insert(index, value);
        Ok(())
    }

    /// Replaces the element at `index`, returning the old element. Replacing the only element
    /// of a list may change the list's element type.
    pub fn set<T: Into<Payload>>(&mut self, index: usize, value: T) -> Result<Payload, NbtError> {
        if index >= self.0.len() {
            return Err(NbtError::IndexOutOfRange {
                index,
                len: self.0.len(),
            });
        }

        let value = value.into();
        self.check_element(&value, self.0.len() - 1)?;
        Ok(std::mem::replace(&mut self.0[index], value))
    }

    /// Removes and returns the last element.
    pub fn pop(&mut self) -> Option<Payload> {
        self.0.pop()
    }

    /// Removes and returns the element at `index`, or `None` if the index is out of bounds.
    pub fn remove(&mut self, index: usize) -> Option<Payload> {
        if index < self.0.len() {
            Some(self.0.remove(index))
        } else {
            None
        }
    }

    /// Returns the internal vector of this list.
    pub fn into_inner(self) -> Vec<Payload> {
        self.0
    }

    /// Iterates over the payloads in this list.
    pub fn iter(&self) -> slice::Iter<'_, Payload> {
        self.0.iter()
    }

    /// Iterates over this list, converting each payload reference into the specified type.
    ///
    /// ```
    /// # use nbtkit::*;
    /// let list = NbtList::from_values(vec![Payload::Int(0), Payload::Int(1)]).unwrap();
    ///
    /// let mut iter = list.iter_map::<i32>();
    /// assert!(matches!(iter.next(), Some(Ok(0i32))));
    /// assert!(matches!(iter.next(), Some(Ok(1i32))));
    /// assert!(iter.next().is_none());
    ///
    /// assert!(list.iter_map::<f64>().all(|value| value.is_err()));
    /// ```
    pub fn iter_map<'a, T: TryFrom<&'a Payload>>(
        &'a self,
    ) -> impl Iterator<Item = Result<T, <T as TryFrom<&'a Payload>>::Error>> + 'a {
        self.0.iter().map(|payload| T::try_from(payload))
    }

    /// Converts this list into SNBT.
    pub fn to_snbt(&self, style: SnbtStyle) -> String {
        Styled(self, style).to_string()
    }

    /// Returns the length of this list.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if this list has a length of zero, false otherwise.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the value of the payload at the given index, or an error if the index is out of
    /// bounds or the payload type does not match the type specified.
    ///
    /// ```
    /// # use nbtkit::*;
    /// let list = NbtList::from_values(vec![Payload::Int(1), Payload::Int(2)]).unwrap();
    ///
    /// assert!(matches!(list.get::<i32>(0), Ok(1)));
    /// assert!(list.get::<f64>(0).is_err()); // Type mismatch
    /// assert!(list.get::<i32>(10).is_err()); // Invalid index
    /// ```
    pub fn get<'a, T>(&'a self, index: usize) -> Result<T, NbtReprError>
    where
        T: TryFrom<&'a Payload>,
        T::Error: Into<anyhow::Error>,
    {
        T::try_from(
            self.0
                .get(index)
                .ok_or_else(|| NbtStructureError::invalid_index(index, self.len()))?,
        )
        .map_err(NbtReprError::from_any)
    }

    /// Returns a mutable reference to the payload at the given index, or an error if the index
    /// is out of bounds or the payload type does not match the type specified.
    ///
    /// ```
    /// # use nbtkit::*;
    /// let mut list = NbtList::from_values(vec![Payload::Int(1), Payload::Int(2)]).unwrap();
    ///
    /// *list.get_mut::<&mut i32>(0).unwrap() += 1;
    ///
    /// assert!(matches!(list.get::<i32>(0), Ok(2)));
    /// ```
    ///
    /// Borrowing an element as a whole payload is rejected, since writing through it could
    /// change the element's type.
    ///
    /// ```compile_fail
    /// # use nbtkit::*;
    /// let mut list = NbtList::from_values(vec![Payload::Int(1), Payload::Int(2)]).unwrap();
    ///
    /// *list.get_mut::<&mut Payload>(0).unwrap() = Payload::from("oops");
    /// ```
    pub fn get_mut<'a, T>(&'a mut self, index: usize) -> Result<T, NbtReprError>
    where
        T: ElementMut<'a>,
    {
        let len = self.len();
        T::from_element(
            self.0
                .get_mut(index)
                .ok_or_else(|| NbtStructureError::invalid_index(index, len))?,
        )
        .map_err(NbtReprError::from_any)
    }
}

impl Display for Styled<'_, NbtList> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let Styled(list, style) = *self;

        f.write_str("[")?;
        for (index, payload) in list.0.iter().enumerate() {
            if index > 0 {
                f.write_str(style.element_separator())?;
            }
            Display::fmt(&Styled(payload, style), f)?;
        }
        f.write_str("]")
    }
}

impl TryFrom<Vec<Payload>> for NbtList {
    type Error = NbtError;

    fn try_from(values: Vec<Payload>) -> Result<Self, Self::Error> {
        NbtList::from_values(values)
    }
}

impl AsRef<[Payload]> for NbtList {
    fn as_ref(&self) -> &[Payload] {
        &self.0
    }
}

impl IntoIterator for NbtList {
    type IntoIter = vec::IntoIter<Payload>;
    type Item = Payload;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a NbtList {
    type IntoIter = slice::Iter<'a, Payload>;
    type Item = &'a Payload;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl Display for NbtList {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&Styled(self, SnbtStyle::Compact), f)
    }
}

impl Debug for NbtList {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Debug::fmt(&self.to_snbt(SnbtStyle::Compact), f)
    }
}

impl Index<usize> for NbtList {
    type Output = Payload;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

/// An ordered sequence of named tags.
///
/// Names are not required to be unique. Lookups by name return the first tag with that name,
/// and [`insert`](NbtCompound::insert) replaces the first match.
#[repr(transparent)]
#[derive(Clone, PartialEq, Default)]
pub struct NbtCompound(Vec<Tag>);

impl NbtCompound {
    /// Returns a new, empty compound.
    pub const fn new() -> Self {
        NbtCompound(Vec::new())
    }

    /// Returns a new, empty compound with the given initial capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        NbtCompound(Vec::with_capacity(capacity))
    }

    /// Builds a compound holding the given tags in order.
    pub fn from_tags(tags: Vec<Tag>) -> Self {
        let mut compound = NbtCompound(tags);
        for tag in &mut compound.0 {
            tag.root = false;
        }
        compound
    }

    /// Returns the tags of this compound in order.
    pub fn tags(&self) -> &[Tag] {
        &self.0
    }

    /// Returns the tags of this compound, which may be renamed or given new payloads in place.
    pub fn tags_mut(&mut self) -> &mut [Tag] {
        &mut self.0
    }

    /// Returns the internal vector of this compound.
    pub fn into_tags(self) -> Vec<Tag> {
        self.0
    }

    /// Appends the given tag, even if a tag with the same name is already present.
    pub fn push_tag(&mut self, mut tag: Tag) {
        tag.root = false;
        self.0.push(tag);
    }

    /// Sets the payload of the first tag with the given name, appending a new tag if there is
    /// none, and returns the previous payload.
    ///
    /// ```
    /// # use nbtkit::*;
    /// let mut compound = NbtCompound::new();
    /// assert!(compound.insert("test", 1.0f64).unwrap().is_none());
    /// assert_eq!(compound.insert("test", 2.0f64).unwrap(), Some(Payload::Double(1.0)));
    ///
    /// assert_eq!(compound.get::<f64>("test").unwrap(), 2.0);
    /// assert_eq!(compound.len(), 1);
    /// ```
    pub fn insert<K, T>(&mut self, name: K, value: T) -> Result<Option<Payload>, NbtError>
    where
        K: Into<String>,
        T: Into<Payload>,
    {
        let name = name.into();
        match self.0.iter_mut().find(|tag| tag.name == name) {
            Some(tag) => Ok(Some(std::mem::replace(&mut tag.payload, value.into()))),
            None => {
                self.0.push(Tag::new(name, value)?);
                Ok(None)
            }
        }
    }

    /// Returns the first tag with the given name.
    pub fn get_tag(&self, name: &str) -> Option<&Tag> {
        self.0.iter().find(|tag| tag.name == name)
    }

    /// Returns the payload of the first tag with the given name.
    pub fn get_payload(&self, name: &str) -> Option<&Payload> {
        self.get_tag(name).map(Tag::payload)
    }

    /// Returns the value of the first tag with the given name, or an error if no tag exists
    /// with the given name or its payload is not of the specified type.
    ///
    /// ```
    /// # use nbtkit::*;
    /// let mut compound = NbtCompound::new();
    /// compound.insert("test", 1.0f64).unwrap();
    ///
    /// assert!((compound.get::<f64>("test").unwrap() - 1.0f64).abs() < 1e-5);
    /// assert!(compound.get::<i32>("test").is_err()); // Type mismatch
    /// assert!(compound.get::<f64>("foo").is_err()); // Missing tag
    /// ```
    pub fn get<'a, T>(&'a self, name: &str) -> Result<T, NbtReprError>
    where
        T: TryFrom<&'a Payload>,
        T::Error: Into<anyhow::Error>,
    {
        T::try_from(
            self.get_payload(name)
                .ok_or_else(|| NbtStructureError::missing_tag(name))?,
        )
        .map_err(NbtReprError::from_any)
    }

    /// Returns a mutable reference into the first tag with the given name, or an error if no
    /// tag exists with the given name or its payload is not of the specified type.
    ///
    /// ```
    /// # use nbtkit::*;
    /// let mut compound = NbtCompound::new();
    /// compound.insert("test", 1.0f64).unwrap();
    ///
    /// *compound.get_mut::<&mut f64>("test").unwrap() *= 2.0;
    ///
    /// assert!((compound.get::<f64>("test").unwrap() - 2.0f64).abs() < 1e-5);
    /// ```
    pub fn get_mut<'a, T>(&'a mut self, name: &str) -> Result<T, NbtReprError>
    where
        T: TryFrom<&'a mut Payload>,
        T::Error: Into<anyhow::Error>,
    {
        T::try_from(
            self.0
                .iter_mut()
                .find(|tag| tag.name == name)
                .map(|tag| &mut tag.payload)
                .ok_or_else(|| NbtStructureError::missing_tag(name))?,
        )
        .map_err(NbtReprError::from_any)
    }

    /// Returns whether or not this compound has a tag with the given name.
    #[inline]
    pub fn contains_key(&self, name: &str) -> bool {
        self.get_tag(name).is_some()
    }

    /// Removes and returns the first tag with the given name.
    pub fn remove(&mut self, name: &str) -> Option<Tag> {
        let index = self.0.iter().position(|tag| tag.name == name)?;
        Some(self.0.remove(index))
    }

    /// Iterates over the names and payloads of this compound in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Payload)> + '_ {
        self.0.iter().map(|tag| (tag.name(), tag.payload()))
    }

    /// Iterates over this compound, converting each payload reference into the specified type.
    /// Each name is paired with the result of the attempted conversion. The iterator does not
    /// stop when a conversion fails.
    pub fn iter_map<'a, T: TryFrom<&'a Payload>>(
        &'a self,
    ) -> impl Iterator<Item = (&'a str, Result<T, <T as TryFrom<&'a Payload>>::Error>)> + 'a {
        self.0
            .iter()
            .map(|tag| (tag.name(), T::try_from(tag.payload())))
    }

    /// Converts this compound into SNBT.
    ///
    /// ```
    /// # use nbtkit::*;
    /// let mut compound = NbtCompound::new();
    /// compound.insert("foo", vec![-1_i64, -3, -5]).unwrap();
    /// compound.insert("bar baz", 1i8).unwrap();
    ///
    /// assert_eq!(compound.to_snbt(SnbtStyle::Compact), r#"{foo:[L;-1l,-3l,-5l],"bar baz":1b}"#);
    /// assert_eq!(
    ///     compound.to_snbt(SnbtStyle::Formatted),
    ///     r#"{foo: [L; -1l, -3l, -5l], "bar baz": 1b}"#
    /// );
    /// ```
    pub fn to_snbt(&self, style: SnbtStyle) -> String {
        Styled(self, style).to_string()
    }

    /// Returns the number of tags in this compound.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the length of this compound is zero, false otherwise.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Parses a compound from SNBT.
    ///
    /// ```
    /// # use nbtkit::NbtCompound;
    /// let compound = NbtCompound::from_snbt(r#"{string:Stuff, list:[I;1,2,3,4,5]}"#).unwrap();
    /// assert!(matches!(compound.get::<&str>("string"), Ok("Stuff")));
    /// assert_eq!(compound.get::<&[i32]>("list").unwrap(), [1, 2, 3, 4, 5].as_slice());
    /// ```
    pub fn from_snbt(input: &str) -> Result<Self, NbtError> {
        snbt::parse(input)
    }
}

impl Display for Styled<'_, NbtCompound> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let Styled(compound, style) = *self;

        f.write_str("{")?;
        for (index, tag) in compound.0.iter().enumerate() {
            if index > 0 {
                f.write_str(style.element_separator())?;
            }
            snbt::write_key(f, tag.name())?;
            f.write_str(style.key_separator())?;
            Display::fmt(&Styled(tag.payload(), style), f)?;
        }
        f.write_str("}")
    }
}

impl FromStr for NbtCompound {
    type Err = NbtError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_snbt(s)
    }
}

impl<'a> IntoIterator for &'a NbtCompound {
    type IntoIter = slice::Iter<'a, Tag>;
    type Item = &'a Tag;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl Display for NbtCompound {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&Styled(self, SnbtStyle::Compact), f)
    }
}

impl Debug for NbtCompound {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Debug::fmt(&self.to_snbt(SnbtStyle::Compact), f)
    }
}
