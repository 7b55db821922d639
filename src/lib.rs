#![deny(rust_2018_idioms)]
#![warn(missing_debug_implementations, missing_docs)]

/*!
Provides support for encoding and decoding NBT (Named Binary Tag) data. This crate reads and
writes both the big-endian Java edition and the little-endian Bedrock edition of the binary
format, with optional zlib or gzip compression, and converts documents to and from stringified
NBT (SNBT) and JSON.

# Basic Usage

The basic unit of NBT data is the [`Payload`], a closed enum over the twelve NBT types. A
[`Tag`] pairs a payload with a name, and an [`Nbt`] document owns the root tag, which is an
unnamed compound.

## Creating NBT Data

```
# use nbtkit::*;
let mut compound = NbtCompound::new();
compound.insert("foo", 123).unwrap();
compound.insert("bar", -3.6f32).unwrap();

let mut list = NbtList::with_capacity(3);
for x in 1i64 ..= 3 {
    list.push(x).unwrap();
}
compound.insert("list", list).unwrap();

*compound.get_mut::<&mut i32>("foo").unwrap() += 1;

assert!(matches!(compound.get::<i32>("foo"), Ok(124)));
assert!(compound.get::<f64>("bar").is_err());
assert!(compound.get::<&NbtList>("list").is_ok());
```

Lists are homogeneous, so pushing a value of another type fails:

```
# use nbtkit::*;
let mut list = NbtList::new();
list.push(1i8).unwrap();
assert!(matches!(list.push("text"), Err(NbtError::ListTypeMismatch { .. })));
```

Integer payloads keep only the bits which fit their width:

```
# use nbtkit::*;
assert_eq!(Payload::byte(300), Payload::Byte(44));
assert_eq!(Payload::long((1 << 64) | 5), Payload::Long(5));
```

## Reading and Writing NBT

```
# use nbtkit::*;
use nbtkit::io::{self, Edition, Flavor};
use std::io::Cursor;

let mut compound = NbtCompound::new();
compound.insert("foo", 123).unwrap();
compound.insert("bar", -3.6f32).unwrap();
let tag = Tag::new("level", compound).unwrap();

let mut binary: Vec<u8> = Vec::new();
io::write_nbt(&mut binary, &tag, Edition::Bedrock, Flavor::ZlibCompressed).unwrap();

let read = io::read_nbt(&mut Cursor::new(binary), Edition::Bedrock, Some(Flavor::ZlibCompressed))
    .unwrap();
assert_eq!(read, tag);
```

The [`Nbt`] document type wraps these functions for whole documents, and can guess gzip
compression by itself:

```
# use nbtkit::*;
use nbtkit::io::{Edition, Flavor};

let nbt = Nbt::from_snbt("{x: 1, y: 64s, z: -3L}").unwrap();
let bytes = nbt.to_bytes(Edition::Java, Flavor::GzCompressed).unwrap();
assert_eq!(Nbt::from_bytes(&bytes, Edition::Java, None).unwrap(), nbt);
```

# Querying Tags

Generics are used to make querying as seamless as possible, however this allows for two types
of errors to occur: missing tags (invalid name or index) and type mismatches. Thus, accessors
that would normally return an [`Option`](Option) in `std` collection equivalents return a
[`Result`](Result) in this crate.

An error converting payloads directly into unwrapped values via
[`TryFrom`](std::convert::TryFrom) is represented by an [`NbtStructureError`]. An error querying
an [`NbtCompound`] or [`NbtList`] is represented by an [`NbtReprError`], which is short for
"NBT representation error."

```
# use nbtkit::*;
let payload1: Payload = vec![1i8, 2, 3].into();
let payload2: Payload = "abcde".into();

assert_eq!(Vec::<i8>::try_from(payload1).unwrap(), vec![1i8, 2, 3]);
assert!(i16::try_from(&payload2).is_err()); // Type mismatch

let mut compound = NbtCompound::new();
compound.insert("foo", 123).unwrap();
assert!(compound.get::<i32>("fooz").is_err()); // Missing tag
```

# Stringified NBT (SNBT)

SNBT is a textual notation for NBT with typed numeric suffixes. See the [`snbt`] module
documentation for the grammar.

```
# use nbtkit::*;
let mut compound = NbtCompound::new();
compound.insert("short", -10i16).unwrap();
compound.insert("string", "fizzbuzz").unwrap();
compound.insert("array", vec![1i64, 1, 2, 3, 5]).unwrap();

const SNBT: &str = "{short: -10s, string: fizzbuzz, array: [L; 1, 1, 2, 3, 5]}";
assert_eq!(compound, snbt::parse(SNBT).unwrap());
assert_eq!(
    compound.to_snbt(SnbtStyle::Compact),
    r#"{short:-10s,string:"fizzbuzz",array:[L;1l,1l,2l,3l,5l]}"#
);
```

# JSON

With the default `json` feature, documents convert to and from [`serde_json::Value`]s. Each
JSON number becomes the narrowest numeric payload which holds it exactly.

```
# #[cfg(feature = "json")] {
# use nbtkit::*;
use serde_json::json;

let nbt = Nbt::from_json(&json!({"small": 100, "wide": 40000, "half": 1.5})).unwrap();
assert_eq!(nbt.root().get_payload("small"), Some(&Payload::Byte(100)));
assert_eq!(nbt.root().get_payload("wide"), Some(&Payload::Int(40000)));
assert_eq!(nbt.root().get_payload("half"), Some(&Payload::Float(1.5)));
# }
```

[`serde_json::Value`]: https://docs.rs/serde_json/1/serde_json/enum.Value.html
*/

mod document;
mod error;
/// Binary encoding and decoding, with optional zlib or gzip compression.
///
/// Both editions share one layout and differ only in byte order: Java data is big-endian and
/// Bedrock data is little-endian. Every length prefix, including the `u16` prefix of names and
/// strings, follows the edition's byte order.
pub mod io;
#[cfg(feature = "json")]
mod json;
mod payload;
mod raw;
mod repr;
mod tag;
mod tag_id;

/// Provides support for parsing and rendering stringified NBT data.
///
/// SNBT resembles JSON, with typed numeric literals and looser rules about quoting.
///
/// # Numbers
///
/// Numbers carry a one-character suffix naming their type, in either case. A number without a
/// suffix is an int if it has no fraction or exponent, and a double otherwise:
///  - Byte (`i8`): `2B`, `-3b`, `true`, `false`
///  - Short (`i16`): `17S`, `-1024s`
///  - Int (`i32`): `123`
///  - Long (`i64`): `43046721L`
///  - Float (`f32`): `3.141F`, `0.0f`, `NaNf`
///  - Double (`f64`): `18932.214`, `10.2D`, `1e3`
///
/// Suffixed integer literals outside the range of their type are rejected. An unsuffixed integer
/// too large for an int is read as a string.
///
/// # Strings
///
/// Strings may be enclosed in single or double quotes. Inside quotes, `\\`, `\"` and `\'` stand
/// for the escaped character and any other escape sequence is kept verbatim. Unquoted strings
/// may only contain ASCII letters, digits, `_`, `-`, `.` and `+`. Strings are always rendered
/// in double quotes.
///
/// # Arrays and Lists
///
/// The three array types start with their element type followed by a semicolon: `[B; 1, 2]`,
/// `[I; 3, 4]` and `[L; 5, 6]`. Lists use plain brackets, such as `[foo, bar, baz]`, and must
/// hold a single type.
///
/// # Compounds
///
/// Every SNBT document is a compound of the form `{key: value, ...}`. Keys follow the same
/// quoting rules as strings.
pub mod snbt;

pub use document::Nbt;
pub use error::NbtError;
pub use io::{Edition, Flavor};
pub use payload::{ElementMut, NbtCompound, NbtList, Payload};
pub use repr::{NbtReprError, NbtStructureError};
pub use snbt::SnbtStyle;
pub use tag::Tag;
pub use tag_id::TagId;

/// The maximum number of nested lists and compounds accepted by every decoder and encoder.
pub const MAX_DEPTH: usize = 512;

/// A utility macro for constructing `NbtCompound`s.
///
/// With exceptions for arrays and compounds, all keys and values must be well-formed rust
/// expressions. The benefit of this is that local variables can be included in the generated
/// compound.
/// ```
/// # use nbtkit::NbtCompound;
/// let product = 87235i32 * 932i32;
///
/// let compound = nbtkit::compound! {
///     "product": product,
///     "foo": "bar"
/// };
///
/// let mut manual_compound = NbtCompound::new();
/// manual_compound.insert("product", 81303020i32).unwrap();
/// manual_compound.insert("foo", "bar").unwrap();
///
/// assert_eq!(compound, manual_compound);
/// ```
///
/// Similar to SNBT, the specialized array types can be opted-into with a type specifier:
/// ```
/// # use nbtkit::Payload;
/// let compound = nbtkit::compound! {
///     "byte_array": [B; 1, 2, 3],
///     "int_array": [I; 4, 5, 6],
///     "long_array": [L; 7, 8, 9],
///     "list": [10, 11, 12]
/// };
///
/// assert!(matches!(compound.get::<&Payload>("byte_array"), Ok(Payload::ByteArray(_))));
/// assert!(matches!(compound.get::<&Payload>("int_array"), Ok(Payload::IntArray(_))));
/// assert!(matches!(compound.get::<&Payload>("long_array"), Ok(Payload::LongArray(_))));
/// assert!(matches!(compound.get::<&Payload>("list"), Ok(Payload::List(_))));
///
/// assert_eq!(compound.get::<&[i64]>("long_array").unwrap().iter().sum::<i64>(), 24);
/// ```
///
/// Just like in SNBT, compounds are enclosed by braces:
/// ```
/// # use nbtkit::{NbtCompound, NbtList};
/// let compound = nbtkit::compound! {
///     "nested": {
///         "a": [I;],
///         "b": []
///     }
/// };
///
/// let mut outer = NbtCompound::new();
/// let mut nested = NbtCompound::new();
/// nested.insert("a", Vec::<i32>::new()).unwrap();
/// nested.insert("b", NbtList::new()).unwrap();
/// outer.insert("nested", nested).unwrap();
///
/// assert_eq!(compound, outer);
/// ```
///
/// Keys longer than 65535 bytes are rejected at compile time, but list element types are only
/// known once the expressions are evaluated. A list mixing payload types therefore panics at
/// runtime. Build such values through [`NbtList::from_values`] to handle the error instead.
/// ```should_panic
/// let _ = nbtkit::compound! {
///     "mixed": [1i8, "two"]
/// };
/// ```
pub use nbtkit_macros::compound;
