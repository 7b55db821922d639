use crate::{snbt, NbtError};
use std::fmt::{self, Display, Formatter};

/// The one-byte wire discriminator of every payload type.
///
/// `TAG_End` is not a payload type; it only terminates compounds and types empty lists on the
/// wire, so it is exposed as the raw byte [`TagId::END`] instead of a variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TagId {
    /// A signed, one-byte integer.
    Byte = 0x1,
    /// A signed, two-byte integer.
    Short = 0x2,
    /// A signed, four-byte integer.
    Int = 0x3,
    /// A signed, eight-byte integer.
    Long = 0x4,
    /// A 32-bit floating point value.
    Float = 0x5,
    /// A 64-bit floating point value.
    Double = 0x6,
    /// An array of signed bytes.
    ByteArray = 0x7,
    /// A UTF-8 string.
    String = 0x8,
    /// A homogenous list of payloads.
    List = 0x9,
    /// An ordered sequence of named tags.
    Compound = 0xA,
    /// An array of signed, four-byte integers.
    IntArray = 0xB,
    /// An array of signed, eight-byte integers.
    LongArray = 0xC,
}

impl TagId {
    /// The `TAG_End` sentinel.
    pub const END: u8 = 0x0;

    /// Returns the wire byte of this tag type.
    #[inline]
    pub const fn id(self) -> u8 {
        self as u8
    }

    /// Looks up the tag type for the given wire byte.
    ///
    /// ```
    /// # use nbtkit::TagId;
    /// assert_eq!(TagId::from_id(0xA).unwrap(), TagId::Compound);
    /// assert!(TagId::from_id(TagId::END).is_err());
    /// assert!(TagId::from_id(13).is_err());
    /// ```
    pub fn from_id(id: u8) -> Result<Self, NbtError> {
        let tag_id = match id {
            0x1 => TagId::Byte,
            0x2 => TagId::Short,
            0x3 => TagId::Int,
            0x4 => TagId::Long,
            0x5 => TagId::Float,
            0x6 => TagId::Double,
            0x7 => TagId::ByteArray,
            0x8 => TagId::String,
            0x9 => TagId::List,
            0xA => TagId::Compound,
            0xB => TagId::IntArray,
            0xC => TagId::LongArray,
            _ => return Err(NbtError::UnknownTagId(id)),
        };

        Ok(tag_id)
    }

    /// Returns the human readable name of this tag type.
    pub const fn name(self) -> &'static str {
        match self {
            TagId::Byte => "Byte",
            TagId::Short => "Short",
            TagId::Int => "Int",
            TagId::Long => "Long",
            TagId::Float => "Float",
            TagId::Double => "Double",
            TagId::ByteArray => "ByteArray",
            TagId::String => "String",
            TagId::List => "List",
            TagId::Compound => "Compound",
            TagId::IntArray => "IntArray",
            TagId::LongArray => "LongArray",
        }
    }

    /// Returns the single character denoting this type in SNBT, or an empty string if this type
    /// has no type specifier.
    ///
    /// ```
    /// # use nbtkit::TagId;
    /// assert_eq!(TagId::Long.type_specifier(), "L");
    /// assert_eq!(TagId::IntArray.type_specifier(), "I");
    /// assert_eq!(TagId::String.type_specifier(), "");
    /// ```
    pub const fn type_specifier(self) -> &'static str {
        match self {
            TagId::Byte | TagId::ByteArray => "B",
            TagId::Short => "S",
            TagId::Int | TagId::IntArray => "I",
            TagId::Long | TagId::LongArray => "L",
            TagId::Float => "F",
            TagId::Double => "D",
            TagId::String | TagId::List | TagId::Compound => "",
        }
    }

    /// The smallest number of bytes a payload of this type occupies on the wire.
    pub(crate) const fn min_payload_len(self) -> usize {
        match self {
            TagId::Byte | TagId::Compound => 1,
            TagId::Short | TagId::String => 2,
            TagId::Int | TagId::Float | TagId::ByteArray | TagId::IntArray | TagId::LongArray =>
                4,
            TagId::List => 5,
            TagId::Long | TagId::Double => 8,
        }
    }

    /// Decides which payload type should parse the given SNBT fragment.
    ///
    /// The first matching rule wins: braces make a compound, brackets make a typed array when
    /// prefixed by `B;`, `I;` or `L;` and a list otherwise, `true` and `false` are bytes, a
    /// numeric literal with a `b`, `s`, `l`, `f` or `d` suffix takes the suffix's type, an
    /// unsuffixed decimal or exponent literal is a double, an unsuffixed integer in the `i32`
    /// range is an int, and anything else is a string.
    ///
    /// ```
    /// # use nbtkit::TagId;
    /// assert_eq!(TagId::classify_snbt("{a: 1}"), TagId::Compound);
    /// assert_eq!(TagId::classify_snbt("[I; 1, 2]"), TagId::IntArray);
    /// assert_eq!(TagId::classify_snbt("[1, 2]"), TagId::List);
    /// assert_eq!(TagId::classify_snbt("true"), TagId::Byte);
    /// assert_eq!(TagId::classify_snbt("12s"), TagId::Short);
    /// assert_eq!(TagId::classify_snbt("1.5"), TagId::Double);
    /// assert_eq!(TagId::classify_snbt("-7"), TagId::Int);
    /// assert_eq!(TagId::classify_snbt("3000000000"), TagId::String);
    /// assert_eq!(TagId::classify_snbt("\"quoted\""), TagId::String);
    /// ```
    pub fn classify_snbt(text: &str) -> TagId {
        let text = text.trim();

        if text.starts_with('{') && text.ends_with('}') {
            return TagId::Compound;
        }

        if text.starts_with('[') && text.ends_with(']') {
            return match snbt::typed_array_body(text) {
                Some((kind, _)) => kind,
                None => TagId::List,
            };
        }

        if text == "true" || text == "false" {
            return TagId::Byte;
        }

        if let Some(last) = text.chars().next_back() {
            let body = &text[.. text.len() - last.len_utf8()];
            let suffixed = match last {
                'b' | 'B' => Some(TagId::Byte),
                's' | 'S' => Some(TagId::Short),
                'l' | 'L' => Some(TagId::Long),
                'f' | 'F' => Some(TagId::Float),
                'd' | 'D' => Some(TagId::Double),
                _ => None,
            };

            match suffixed {
                Some(kind @ (TagId::Float | TagId::Double)) if snbt::is_float_literal(body) =>
                    return kind,
                Some(kind) if snbt::is_integer_literal(body) => return kind,
                _ => {}
            }
        }

        if snbt::is_decimal_literal(text) {
            TagId::Double
        } else if snbt::is_integer_literal(text) && text.parse::<i32>().is_ok() {
            TagId::Int
        } else {
            TagId::String
        }
    }
}

impl Display for TagId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<u8> for TagId {
    type Error = NbtError;

    fn try_from(id: u8) -> Result<Self, Self::Error> {
        TagId::from_id(id)
    }
}

impl From<TagId> for u8 {
    fn from(id: TagId) -> Self {
        id.id()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_bytes_round_trip() {
        for id in 1 ..= 12u8 {
            assert_eq!(TagId::from_id(id).unwrap().id(), id);
        }
        assert!(matches!(
            TagId::from_id(0),
            Err(NbtError::UnknownTagId(0))
        ));
        assert!(matches!(
            TagId::from_id(0xFF),
            Err(NbtError::UnknownTagId(0xFF))
        ));
    }

    #[test]
    fn classification_order() {
        assert_eq!(TagId::classify_snbt("  {}  "), TagId::Compound);
        assert_eq!(TagId::classify_snbt("[B;]"), TagId::ByteArray);
        assert_eq!(TagId::classify_snbt("[ L; 1l ]"), TagId::LongArray);
        assert_eq!(TagId::classify_snbt("[]"), TagId::List);
        assert_eq!(TagId::classify_snbt("[\"B;\"]"), TagId::List);
        assert_eq!(TagId::classify_snbt("false"), TagId::Byte);
        assert_eq!(TagId::classify_snbt("5b"), TagId::Byte);
        assert_eq!(TagId::classify_snbt("5L"), TagId::Long);
        assert_eq!(TagId::classify_snbt("5.0f"), TagId::Float);
        assert_eq!(TagId::classify_snbt("5D"), TagId::Double);
        assert_eq!(TagId::classify_snbt("5.0"), TagId::Double);
        assert_eq!(TagId::classify_snbt("1e5"), TagId::Double);
        assert_eq!(TagId::classify_snbt("5"), TagId::Int);
        assert_eq!(TagId::classify_snbt("2147483647"), TagId::Int);
        assert_eq!(TagId::classify_snbt("2147483648"), TagId::String);
        assert_eq!(TagId::classify_snbt("bread"), TagId::String);
        assert_eq!(TagId::classify_snbt("1.5b"), TagId::String);
        assert_eq!(TagId::classify_snbt("NaNf"), TagId::Float);
    }
}
