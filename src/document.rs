use crate::{
    io::{self, Edition, Flavor},
    snbt::{self, SnbtStyle},
    NbtCompound,
    NbtError,
    Tag,
    TagId,
};
use std::fmt::{self, Display, Formatter};

/// An NBT document anchored by a root tag.
///
/// The root tag always has an empty name and holds a compound. Documents can be read from and
/// written to the binary format, SNBT and JSON.
///
/// ```
/// # use nbtkit::*;
/// use nbtkit::io::{Edition, Flavor};
///
/// let nbt = Nbt::from_snbt("{name: Steve, health: 20s}").unwrap();
/// let bytes = nbt.to_bytes(Edition::Java, Flavor::GzCompressed).unwrap();
///
/// let read = Nbt::from_bytes(&bytes, Edition::Java, None).unwrap();
/// assert_eq!(read, nbt);
/// assert_eq!(read.root().get::<i16>("health").unwrap(), 20);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Nbt {
    root: Tag,
}

impl Nbt {
    /// Creates a document from the given tag, which must have an empty name and hold a
    /// compound.
    ///
    /// ```
    /// # use nbtkit::*;
    /// assert!(Nbt::new(Tag::root(NbtCompound::new())).is_ok());
    /// assert!(Nbt::new(Tag::new("", NbtCompound::new()).unwrap()).is_ok());
    /// assert!(matches!(Nbt::new(Tag::new("", 1i8).unwrap()), Err(NbtError::InvalidRootTag)));
    /// ```
    pub fn new(root_tag: Tag) -> Result<Self, NbtError> {
        Ok(Nbt {
            root: into_root(root_tag)?,
        })
    }

    /// Reads a document from its binary form. If no flavor is given, it is guessed from the
    /// first bytes of the data.
    pub fn from_bytes(data: &[u8], edition: Edition, flavor: Option<Flavor>) -> Result<Self, NbtError> {
        Nbt::new(io::read_nbt_from_slice(data, edition, flavor)?)
    }

    /// Encodes this document into its binary form.
    ///
    /// ```
    /// # use nbtkit::*;
    /// use nbtkit::io::{Edition, Flavor};
    ///
    /// let nbt = Nbt::default();
    /// assert_eq!(nbt.to_bytes(Edition::Java, Flavor::Uncompressed).unwrap(), [10, 0, 0, 0]);
    /// ```
    pub fn to_bytes(&self, edition: Edition, flavor: Flavor) -> Result<Vec<u8>, NbtError> {
        let mut data = Vec::new();
        io::write_nbt(&mut data, &self.root, edition, flavor)?;
        Ok(data)
    }

    /// Parses a document from SNBT. The text must describe a compound.
    pub fn from_snbt(text: &str) -> Result<Self, NbtError> {
        Ok(Nbt {
            root: Tag::root(snbt::parse(text)?),
        })
    }

    /// Renders this document as SNBT.
    ///
    /// ```
    /// # use nbtkit::*;
    /// let nbt = Nbt::from_snbt("{a: 1b, b: [1s, 2s]}").unwrap();
    /// assert_eq!(nbt.to_snbt(SnbtStyle::Compact), "{a:1b,b:[1s,2s]}");
    /// assert_eq!(nbt.to_snbt(SnbtStyle::Formatted), "{a: 1b, b: [1s, 2s]}");
    /// ```
    pub fn to_snbt(&self, style: SnbtStyle) -> String {
        self.root.to_snbt(style)
    }

    /// Builds a document from a JSON object. Every key of the object becomes a tag of the root
    /// compound.
    ///
    /// ```
    /// # use nbtkit::*;
    /// use serde_json::json;
    ///
    /// let nbt = Nbt::from_json(&json!({"x": 1, "name": "Steve"})).unwrap();
    /// assert_eq!(nbt.root().get::<i8>("x").unwrap(), 1);
    /// assert_eq!(nbt.to_json(), json!({"x": 1, "name": "Steve"}));
    ///
    /// assert!(matches!(Nbt::from_json(&json!([1, 2])), Err(NbtError::InvalidRootTag)));
    /// ```
    #[cfg(feature = "json")]
    pub fn from_json(value: &serde_json::Value) -> Result<Self, NbtError> {
        let payload = crate::json::payload_from_json(value, 0)?;
        Ok(Nbt {
            root: Tag::with_root_flag("", payload, true)?,
        })
    }

    /// Parses JSON text and builds a document from it. See [`from_json`](Nbt::from_json).
    #[cfg(feature = "json")]
    pub fn from_json_str(text: &str) -> Result<Self, NbtError> {
        let value: serde_json::Value = serde_json::from_str(text)?;
        Nbt::from_json(&value)
    }

    /// Converts this document into a JSON object.
    #[cfg(feature = "json")]
    pub fn to_json(&self) -> serde_json::Value {
        self.root.to_json()
    }

    /// Converts this document into JSON text.
    ///
    /// ```
    /// # use nbtkit::*;
    /// let nbt = Nbt::from_snbt("{big: 9007199254740993L}").unwrap();
    /// assert_eq!(nbt.to_json_string().unwrap(), r#"{"big":9007199254740993}"#);
    /// ```
    #[cfg(feature = "json")]
    pub fn to_json_string(&self) -> Result<String, NbtError> {
        Ok(serde_json::to_string(&self.to_json())?)
    }

    /// Returns the root tag.
    #[inline]
    pub fn root_tag(&self) -> &Tag {
        &self.root
    }

    /// Returns the compound held by the root tag.
    pub fn root(&self) -> &NbtCompound {
        match self.root.payload() {
            crate::Payload::Compound(compound) => compound,
            // Every constructor checks the root invariant
            _ => unreachable!("root tag without a compound"),
        }
    }

    /// Returns the compound held by the root tag mutably.
    pub fn root_mut(&mut self) -> &mut NbtCompound {
        match &mut self.root.payload {
            crate::Payload::Compound(compound) => compound,
            _ => unreachable!("root tag without a compound"),
        }
    }

    /// Replaces the root tag, returning the old one. The new tag must satisfy the same
    /// requirements as in [`new`](Nbt::new).
    pub fn set_root_tag(&mut self, root_tag: Tag) -> Result<Tag, NbtError> {
        let root = into_root(root_tag)?;
        Ok(std::mem::replace(&mut self.root, root))
    }

    /// Consumes this document, returning its root tag.
    pub fn into_root_tag(self) -> Tag {
        self.root
    }
}

fn into_root(mut tag: Tag) -> Result<Tag, NbtError> {
    if !tag.name.is_empty() || tag.id() != TagId::Compound {
        return Err(NbtError::InvalidRootTag);
    }

    tag.root = true;
    Ok(tag)
}

impl Default for Nbt {
    fn default() -> Self {
        Nbt {
            root: Tag::root(NbtCompound::new()),
        }
    }
}

impl From<NbtCompound> for Nbt {
    fn from(compound: NbtCompound) -> Self {
        Nbt {
            root: Tag::root(compound),
        }
    }
}

impl Display for Nbt {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.root, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replacing_the_root_checks_the_invariant() {
        let mut nbt = Nbt::default();
        assert!(matches!(
            nbt.set_root_tag(Tag::new("level", NbtCompound::new()).unwrap()),
            Err(NbtError::InvalidRootTag)
        ));

        let mut compound = NbtCompound::new();
        compound.insert("a", 1i8).unwrap();
        let old = nbt.set_root_tag(Tag::new("", compound.clone()).unwrap()).unwrap();
        assert!(old.is_root());
        assert!(nbt.root_tag().is_root());
        assert_eq!(nbt.root(), &compound);

        nbt.root_mut().insert("b", 2i8).unwrap();
        assert_eq!(nbt.into_root_tag().value::<&NbtCompound>().unwrap().len(), 2);
    }

    #[test]
    fn named_binary_roots_are_rejected() {
        let tag = Tag::new("level", NbtCompound::new()).unwrap();
        let data = tag.to_bytes(Edition::Java).unwrap();
        assert!(matches!(
            Nbt::from_bytes(&data, Edition::Java, Some(Flavor::Uncompressed)),
            Err(NbtError::InvalidRootTag)
        ));
    }
}
