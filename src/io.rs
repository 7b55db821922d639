//! Binary encoding and decoding, with optional gzip or zlib compression.

use crate::{
    payload::MAX_CONTAINER_LEN,
    raw::{self, Reader},
    NbtCompound,
    NbtError,
    NbtList,
    Payload,
    Tag,
    TagId,
    MAX_DEPTH,
};
use byteorder::{BigEndian, ByteOrder, LittleEndian};
use flate2::{
    read::{GzDecoder, ZlibDecoder},
    write::{GzEncoder, ZlibEncoder},
    Compression,
};
use std::{
    borrow::Cow,
    io::{self, Read, Write},
    slice,
};

/// The two variants of the binary format. They only differ in byte order, which applies to
/// every multi-byte number and every length prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Edition {
    /// Big-endian data.
    Java,
    /// Little-endian data.
    Bedrock,
}

/// Describes the flavors of NBT data: uncompressed, Zlib compressed and Gz compressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flavor {
    /// Uncompressed NBT data.
    Uncompressed,
    /// Zlib compressed NBT data. When writing, the default compression level will be used.
    ZlibCompressed,
    /// Zlib compressed NBT data with the given compression level.
    ZlibCompressedWith(Compression),
    /// Gz compressed NBT data. When writing, the default compression level will be used.
    GzCompressed,
    /// Gz compressed NBT data with the given compression level.
    GzCompressedWith(Compression),
}

/// Guesses the flavor of the given data from its first bytes. Data starting with the gzip magic
/// number is gzip compressed, data starting with a tag ID is uncompressed, and anything else
/// is rejected.
///
/// ```
/// # use nbtkit::{io::{self, Flavor}, NbtError};
/// assert_eq!(io::sniff_flavor(&[0x1F, 0x8B, 0x08]).unwrap(), Flavor::GzCompressed);
/// assert_eq!(io::sniff_flavor(&[0x0A, 0x00, 0x00]).unwrap(), Flavor::Uncompressed);
/// assert!(matches!(io::sniff_flavor(&[0x78, 0x9C]), Err(NbtError::UnknownCompressionType(0x78))));
/// ```
pub fn sniff_flavor(data: &[u8]) -> Result<Flavor, NbtError> {
    match data {
        [] => Err(NbtError::UnexpectedEndOfData {
            needed: 1,
            remaining: 0,
        }),
        [0x1F, 0x8B, ..] => Ok(Flavor::GzCompressed),
        &[first, ..] if first <= TagId::LongArray.id() => Ok(Flavor::Uncompressed),
        &[first, ..] => Err(NbtError::UnknownCompressionType(first)),
    }
}

/// Reads one tag from the given reader. If no flavor is given, it is guessed with
/// [`sniff_flavor`]. A compound with an empty name comes back as a root tag.
///
/// The whole input is read into memory before decoding. Bytes after the end of the tag are
/// ignored.
pub fn read_nbt<R: Read>(
    reader: &mut R,
    edition: Edition,
    flavor: Option<Flavor>,
) -> Result<Tag, NbtError>
{
    let mut data = Vec::new();
    reader.read_to_end(&mut data)?;
    read_nbt_from_slice(&data, edition, flavor)
}

/// Reads one tag from the given bytes. See [`read_nbt`].
pub fn read_nbt_from_slice(
    data: &[u8],
    edition: Edition,
    flavor: Option<Flavor>,
) -> Result<Tag, NbtError>
{
    let flavor = match flavor {
        Some(flavor) => flavor,
        None => sniff_flavor(data)?,
    };

    let data: Cow<'_, [u8]> = match flavor {
        Flavor::Uncompressed => Cow::Borrowed(data),
        Flavor::ZlibCompressed | Flavor::ZlibCompressedWith(_) =>
            Cow::Owned(decompress(ZlibDecoder::new(data))?),
        Flavor::GzCompressed | Flavor::GzCompressedWith(_) =>
            Cow::Owned(decompress(GzDecoder::new(data))?),
    };

    let (mut tag, _) = Tag::from_bytes(&data, edition)?;
    if tag.name.is_empty() && tag.id() == TagId::Compound {
        tag.root = true;
    }

    Ok(tag)
}

fn decompress<R: Read>(mut decoder: R) -> io::Result<Vec<u8>> {
    let mut data = Vec::new();
    decoder.read_to_end(&mut data)?;
    Ok(data)
}

/// Writes the given tag to the given writer using the given flavor of compression.
pub fn write_nbt<W: Write>(
    writer: &mut W,
    tag: &Tag,
    edition: Edition,
    flavor: Flavor,
) -> Result<(), NbtError>
{
    let compression = match flavor {
        Flavor::Uncompressed => return write_tag(writer, tag, edition),
        Flavor::ZlibCompressed | Flavor::GzCompressed => Compression::default(),
        Flavor::ZlibCompressedWith(compression) | Flavor::GzCompressedWith(compression) =>
            compression,
    };

    if let Flavor::GzCompressed | Flavor::GzCompressedWith(_) = flavor {
        let mut encoder = GzEncoder::new(writer, compression);
        write_tag(&mut encoder, tag, edition)?;
        encoder.finish()?;
    } else {
        let mut encoder = ZlibEncoder::new(writer, compression);
        write_tag(&mut encoder, tag, edition)?;
        encoder.finish()?;
    }

    Ok(())
}

fn write_tag<W: Write>(writer: &mut W, tag: &Tag, edition: Edition) -> Result<(), NbtError> {
    match edition {
        Edition::Java => encode_tag::<BigEndian, _>(writer, tag),
        Edition::Bedrock => encode_tag::<LittleEndian, _>(writer, tag),
    }
}

impl Payload {
    /// Encodes this payload without a tag ID or name.
    ///
    /// ```
    /// # use nbtkit::{*, io::Edition};
    /// assert_eq!(Payload::Short(1).to_bytes(Edition::Java).unwrap(), [0x00, 0x01]);
    /// assert_eq!(Payload::Short(1).to_bytes(Edition::Bedrock).unwrap(), [0x01, 0x00]);
    /// ```
    pub fn to_bytes(&self, edition: Edition) -> Result<Vec<u8>, NbtError> {
        let mut bytes = Vec::new();
        match edition {
            Edition::Java => encode_payload::<BigEndian, _>(&mut bytes, self, 0)?,
            Edition::Bedrock => encode_payload::<LittleEndian, _>(&mut bytes, self, 0)?,
        }
        Ok(bytes)
    }

    /// Decodes a payload of the given type from the start of `data`, returning the payload and
    /// the number of bytes it occupied.
    pub fn from_bytes(id: TagId, data: &[u8], edition: Edition) -> Result<(Self, usize), NbtError> {
        match edition {
            Edition::Java => {
                let mut reader = Reader::<BigEndian>::new(data);
                let payload = decode_payload(&mut reader, id, 0)?;
                Ok((payload, reader.position()))
            }
            Edition::Bedrock => {
                let mut reader = Reader::<LittleEndian>::new(data);
                let payload = decode_payload(&mut reader, id, 0)?;
                Ok((payload, reader.position()))
            }
        }
    }
}

impl Tag {
    /// Encodes this tag as its tag ID, name and payload.
    pub fn to_bytes(&self, edition: Edition) -> Result<Vec<u8>, NbtError> {
        let mut bytes = Vec::new();
        write_tag(&mut bytes, self, edition)?;
        Ok(bytes)
    }

    /// Decodes a tag from the start of `data`, returning the tag and the number of bytes it
    /// occupied. The returned tag is never a root tag.
    pub fn from_bytes(data: &[u8], edition: Edition) -> Result<(Self, usize), NbtError> {
        match edition {
            Edition::Java => {
                let mut reader = Reader::<BigEndian>::new(data);
                let tag = decode_tag(&mut reader)?;
                Ok((tag, reader.position()))
            }
            Edition::Bedrock => {
                let mut reader = Reader::<LittleEndian>::new(data);
                let tag = decode_tag(&mut reader)?;
                Ok((tag, reader.position()))
            }
        }
    }
}

fn decode_tag<B: ByteOrder>(reader: &mut Reader<'_, B>) -> Result<Tag, NbtError> {
    let id = TagId::from_id(reader.read_u8()?)?;
    let name = reader.read_string()?;
    let payload = decode_payload(reader, id, 0)?;

    Ok(Tag {
        name,
        payload,
        root: false,
    })
}

// Reads the ID and name of the next compound entry, or `None` at TAG_End
fn read_entry_header<B: ByteOrder>(
    reader: &mut Reader<'_, B>,
) -> Result<Option<(TagId, String)>, NbtError>
{
    let id = reader.read_u8()?;
    if id == TagId::END {
        return Ok(None);
    }

    let id = TagId::from_id(id)?;
    Ok(Some((id, reader.read_string()?)))
}

// A list or compound which is still being filled in
enum OpenContainer {
    List {
        element: TagId,
        len: usize,
        values: Vec<Payload>,
    },
    Compound {
        compound: NbtCompound,
        name: String,
    },
}

// Containers are tracked on an explicit stack, so nesting never grows the call stack.
// `depth` is the number of lists and compounds enclosing the payload.
fn decode_payload<B: ByteOrder>(
    reader: &mut Reader<'_, B>,
    id: TagId,
    depth: usize,
) -> Result<Payload, NbtError>
{
    let mut open: Vec<OpenContainer> = Vec::new();
    let mut next = id;

    loop {
        let mut value = match next {
            TagId::Byte => Payload::Byte(reader.read_i8()?),
            TagId::Short => Payload::Short(reader.read_i16()?),
            TagId::Int => Payload::Int(reader.read_i32()?),
            TagId::Long => Payload::Long(reader.read_i64()?),
            TagId::Float => Payload::Float(reader.read_f32()?),
            TagId::Double => Payload::Double(reader.read_f64()?),
            TagId::ByteArray => {
                let len = reader.read_len(TagId::ByteArray, 1)?;
                let bytes = reader.take(len)?;
                Payload::ByteArray(bytes.iter().map(|&byte| byte as i8).collect())
            }
            TagId::String => Payload::String(reader.read_string()?),
            TagId::List => {
                if depth + open.len() >= MAX_DEPTH {
                    return Err(NbtError::DepthLimitExceeded(MAX_DEPTH));
                }

                let element = TagId::from_id(reader.read_u8()?);
                let element_len = element.as_ref().map_or(0, |element| element.min_payload_len());
                let len = reader.read_len(TagId::List, element_len)?;

                // Empty lists may carry any element ID, usually TAG_End
                if len == 0 {
                    Payload::List(NbtList::new())
                } else {
                    let element = element?;
                    open.push(OpenContainer::List {
                        element,
                        len,
                        values: Vec::with_capacity(len),
                    });
                    next = element;
                    continue;
                }
            }
            TagId::Compound => {
                if depth + open.len() >= MAX_DEPTH {
                    return Err(NbtError::DepthLimitExceeded(MAX_DEPTH));
                }

                match read_entry_header(reader)? {
                    Some((id, name)) => {
                        open.push(OpenContainer::Compound {
                            compound: NbtCompound::new(),
                            name,
                        });
                        next = id;
                        continue;
                    }
                    None => Payload::Compound(NbtCompound::new()),
                }
            }
            TagId::IntArray => {
                let len = reader.read_len(TagId::IntArray, 4)?;
                let mut array = Vec::with_capacity(len);

                for _ in 0 .. len {
                    array.push(reader.read_i32()?);
                }

                Payload::IntArray(array)
            }
            TagId::LongArray => {
                let len = reader.read_len(TagId::LongArray, 8)?;
                let mut array = Vec::with_capacity(len);

                for _ in 0 .. len {
                    array.push(reader.read_i64()?);
                }

                Payload::LongArray(array)
            }
        };

        // Hand the finished value to its parent, closing every container it completes
        loop {
            value = match open.pop() {
                None => return Ok(value),
                Some(OpenContainer::List {
                    element,
                    len,
                    mut values,
                }) => {
                    values.push(value);
                    if values.len() < len {
                        open.push(OpenContainer::List {
                            element,
                            len,
                            values,
                        });
                        next = element;
                        break;
                    }

                    Payload::List(NbtList::from_values_unchecked(values))
                }
                Some(OpenContainer::Compound { mut compound, name }) => {
                    compound.push_tag(Tag {
                        name,
                        payload: value,
                        root: false,
                    });

                    match read_entry_header(reader)? {
                        Some((id, name)) => {
                            open.push(OpenContainer::Compound { compound, name });
                            next = id;
                            break;
                        }
                        None => Payload::Compound(compound),
                    }
                }
            };
        }
    }
}

fn encode_tag<B: ByteOrder, W: Write>(writer: &mut W, tag: &Tag) -> Result<(), NbtError> {
    write_tag_header::<B, _>(writer, tag)?;
    encode_payload::<B, _>(writer, &tag.payload, 0)
}

fn write_tag_header<B: ByteOrder, W: Write>(writer: &mut W, tag: &Tag) -> Result<(), NbtError> {
    if tag.root && (!tag.name.is_empty() || tag.id() != TagId::Compound) {
        return Err(NbtError::InvalidRootTag);
    }

    raw::write_u8(writer, tag.id().id())?;
    write_checked_string::<B, _>(writer, &tag.name, NbtError::NameTooLong)
}

// A list or compound whose remaining children are still to be written
enum PendingChildren<'a> {
    List {
        element: TagId,
        values: slice::Iter<'a, Payload>,
    },
    Compound(slice::Iter<'a, Tag>),
}

// Mirrors `decode_payload`: containers are walked with an explicit stack
fn encode_payload<B: ByteOrder, W: Write>(
    writer: &mut W,
    payload: &Payload,
    depth: usize,
) -> Result<(), NbtError>
{
    let mut pending: Vec<PendingChildren<'_>> = Vec::new();
    let mut current = payload;

    loop {
        match current {
            &Payload::Byte(value) => raw::write_i8(writer, value)?,
            &Payload::Short(value) => raw::write_i16::<B, _>(writer, value)?,
            &Payload::Int(value) => raw::write_i32::<B, _>(writer, value)?,
            &Payload::Long(value) => raw::write_i64::<B, _>(writer, value)?,
            &Payload::Float(value) => raw::write_f32::<B, _>(writer, value)?,
            &Payload::Double(value) => raw::write_f64::<B, _>(writer, value)?,
            Payload::ByteArray(value) => {
                write_len::<B, _>(writer, TagId::ByteArray, value.len())?;
                writer.write_all(raw::cast_bytes_to_unsigned(value.as_slice()))?;
            }
            Payload::String(value) =>
                write_checked_string::<B, _>(writer, value, NbtError::StringTooLong)?,
            Payload::List(list) => {
                if depth + pending.len() >= MAX_DEPTH {
                    return Err(NbtError::DepthLimitExceeded(MAX_DEPTH));
                }

                match list.element_id() {
                    None => {
                        raw::write_u8(writer, TagId::END)?;
                        raw::write_i32::<B, _>(writer, 0)?;
                    }
                    Some(element) => {
                        raw::write_u8(writer, element.id())?;
                        write_len::<B, _>(writer, TagId::List, list.len())?;
                        pending.push(PendingChildren::List {
                            element,
                            values: list.iter(),
                        });
                    }
                }
            }
            Payload::Compound(compound) => {
                if depth + pending.len() >= MAX_DEPTH {
                    return Err(NbtError::DepthLimitExceeded(MAX_DEPTH));
                }

                pending.push(PendingChildren::Compound(compound.tags().iter()));
            }
            Payload::IntArray(value) => {
                write_len::<B, _>(writer, TagId::IntArray, value.len())?;

                for &int in value.iter() {
                    raw::write_i32::<B, _>(writer, int)?;
                }
            }
            Payload::LongArray(value) => {
                write_len::<B, _>(writer, TagId::LongArray, value.len())?;

                for &long in value.iter() {
                    raw::write_i64::<B, _>(writer, long)?;
                }
            }
        }

        current = loop {
            match pending.last_mut() {
                None => return Ok(()),
                Some(PendingChildren::List { element, values }) => match values.next() {
                    Some(value) => {
                        if value.id() != *element {
                            return Err(NbtError::ListTypeMismatch {
                                expected: *element,
                                found: value.id(),
                            });
                        }

                        break value;
                    }
                    None => {
                        pending.pop();
                    }
                },
                Some(PendingChildren::Compound(tags)) => match tags.next() {
                    Some(tag) => {
                        write_tag_header::<B, _>(writer, tag)?;
                        break &tag.payload;
                    }
                    None => {
                        raw::write_u8(writer, TagId::END)?;
                        pending.pop();
                    }
                },
            }
        };
    }
}

fn write_len<B: ByteOrder, W: Write>(writer: &mut W, kind: TagId, len: usize) -> Result<(), NbtError> {
    if len > MAX_CONTAINER_LEN {
        return Err(NbtError::ContainerTooLong {
            kind,
            len: len as i64,
        });
    }

    raw::write_i32::<B, _>(writer, len as i32)?;
    Ok(())
}

fn write_checked_string<B: ByteOrder, W: Write>(
    writer: &mut W,
    string: &str,
    too_long: fn(usize) -> NbtError,
) -> Result<(), NbtError>
{
    if string.len() > u16::MAX as usize {
        return Err(too_long(string.len()));
    }

    raw::write_string::<B, _>(writer, string)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_lists_accept_any_element_id() {
        // element ID 0x03, zero elements
        let data = [0x03, 0x00, 0x00, 0x00, 0x00];
        let (payload, len) = Payload::from_bytes(TagId::List, &data, Edition::Java).unwrap();
        assert_eq!(payload, Payload::List(NbtList::new()));
        assert_eq!(len, 5);

        let data = [0x00, 0x02, 0x00, 0x00, 0x00, 0x01];
        assert!(matches!(
            Payload::from_bytes(TagId::List, &data, Edition::Bedrock),
            Err(NbtError::UnknownTagId(0))
        ));

        let data = [0x01, 0xFF, 0xFF, 0xFF, 0xFF];
        assert!(matches!(
            Payload::from_bytes(TagId::List, &data, Edition::Java),
            Err(NbtError::ContainerTooLong { len: -1, .. })
        ));
    }

    #[test]
    fn empty_list_encodes_end_element_id() {
        let bytes = Payload::List(NbtList::new()).to_bytes(Edition::Java).unwrap();
        assert_eq!(bytes, [TagId::END, 0, 0, 0, 0]);
    }

    #[test]
    fn strings_use_the_edition_byte_order() {
        let tag = Tag::new("ab", "c").unwrap();
        assert_eq!(tag.to_bytes(Edition::Java).unwrap(), [
            0x08, 0x00, 0x02, b'a', b'b', 0x00, 0x01, b'c'
        ]);
        assert_eq!(tag.to_bytes(Edition::Bedrock).unwrap(), [
            0x08, 0x02, 0x00, b'a', b'b', 0x01, 0x00, b'c'
        ]);
    }

    #[test]
    fn encoding_rechecks_list_homogeneity() {
        let list = NbtList::from_values_unchecked(vec![Payload::Int(1), Payload::Byte(2)]);

        assert!(matches!(
            Payload::List(list).to_bytes(Edition::Java),
            Err(NbtError::ListTypeMismatch {
                expected: TagId::Int,
                found: TagId::Byte
            })
        ));
    }

    #[test]
    fn oversized_strings_are_rejected() {
        let payload = Payload::String("a".repeat(u16::MAX as usize + 1));
        assert!(matches!(
            payload.to_bytes(Edition::Java),
            Err(NbtError::StringTooLong(65536))
        ));
    }
}
