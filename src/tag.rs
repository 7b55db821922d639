use crate::{
    snbt::{self, SnbtStyle, Styled},
    NbtCompound,
    NbtError,
    NbtReprError,
    Payload,
    TagId,
};
use std::fmt::{self, Debug, Display, Formatter};

/// A named payload.
///
/// A root tag anchors a document: its payload is always a compound and its name is always
/// empty. Tags stored inside a compound are never roots.
#[derive(Clone)]
pub struct Tag {
    pub(crate) name: String,
    pub(crate) payload: Payload,
    pub(crate) root: bool,
}

impl Tag {
    /// Creates a named, non-root tag.
    ///
    /// ```
    /// # use nbtkit::*;
    /// let tag = Tag::new("health", 20i16).unwrap();
    /// assert_eq!(tag.name(), "health");
    /// assert_eq!(tag.id(), TagId::Short);
    ///
    /// assert!(matches!(Tag::new("x".repeat(70_000), 0i8), Err(NbtError::NameTooLong(70_000))));
    /// ```
    pub fn new<N, P>(name: N, payload: P) -> Result<Self, NbtError>
    where
        N: Into<String>,
        P: Into<Payload>,
    {
        let name = name.into();
        check_name(&name)?;

        Ok(Tag {
            name,
            payload: payload.into(),
            root: false,
        })
    }

    /// Creates a root tag holding the given compound.
    pub fn root(compound: NbtCompound) -> Self {
        Tag {
            name: String::new(),
            payload: Payload::Compound(compound),
            root: true,
        }
    }

    /// Creates a tag with an explicit root flag, validating the root invariant.
    ///
    /// ```
    /// # use nbtkit::*;
    /// assert!(Tag::with_root_flag("", NbtCompound::new(), true).unwrap().is_root());
    /// assert!(matches!(
    ///     Tag::with_root_flag("", 5i32, true),
    ///     Err(NbtError::InvalidRootTag)
    /// ));
    /// assert!(matches!(
    ///     Tag::with_root_flag("level", NbtCompound::new(), true),
    ///     Err(NbtError::InvalidRootTag)
    /// ));
    /// ```
    pub fn with_root_flag<N, P>(name: N, payload: P, root: bool) -> Result<Self, NbtError>
    where
        N: Into<String>,
        P: Into<Payload>,
    {
        let mut tag = Tag::new(name, payload)?;
        if root {
            if !tag.name.is_empty() || tag.id() != TagId::Compound {
                return Err(NbtError::InvalidRootTag);
            }
            tag.root = true;
        }

        Ok(tag)
    }

    /// Returns the name of this tag.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Renames this tag. Root tags can only have an empty name.
    pub fn set_name<N: Into<String>>(&mut self, name: N) -> Result<(), NbtError> {
        let name = name.into();
        check_name(&name)?;
        if self.root && !name.is_empty() {
            return Err(NbtError::InvalidRootTag);
        }

        self.name = name;
        Ok(())
    }

    /// Returns the payload of this tag.
    #[inline]
    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    /// Replaces the payload of this tag, returning the old one. Root tags can only hold a
    /// compound.
    pub fn set_payload<P: Into<Payload>>(&mut self, payload: P) -> Result<Payload, NbtError> {
        let payload = payload.into();
        if self.root && payload.id() != TagId::Compound {
            return Err(NbtError::InvalidRootTag);
        }

        Ok(std::mem::replace(&mut self.payload, payload))
    }

    /// Returns the tag type of this tag's payload.
    #[inline]
    pub fn id(&self) -> TagId {
        self.payload.id()
    }

    /// Returns whether this is a root tag.
    #[inline]
    pub fn is_root(&self) -> bool {
        self.root
    }

    /// Returns this tag's payload converted into the specified type.
    ///
    /// ```
    /// # use nbtkit::*;
    /// let tag = Tag::new("name", "Steve").unwrap();
    /// assert_eq!(tag.value::<&str>().unwrap(), "Steve");
    /// assert!(tag.value::<i32>().is_err());
    /// ```
    pub fn value<'a, T>(&'a self) -> Result<T, NbtReprError>
    where
        T: TryFrom<&'a Payload>,
        T::Error: Into<anyhow::Error>,
    {
        T::try_from(&self.payload).map_err(NbtReprError::from_any)
    }

    /// Returns a mutable reference into this tag's payload.
    ///
    /// ```
    /// # use nbtkit::*;
    /// let mut tag = Tag::new("count", 1i32).unwrap();
    /// *tag.value_mut::<&mut i32>().unwrap() += 1;
    /// assert_eq!(tag.value::<i32>().unwrap(), 2);
    /// ```
    pub fn value_mut<'a, T>(&'a mut self) -> Result<T, NbtReprError>
    where
        T: TryFrom<&'a mut Payload>,
        T::Error: Into<anyhow::Error>,
    {
        T::try_from(&mut self.payload).map_err(NbtReprError::from_any)
    }

    /// Consumes this tag, returning its payload.
    pub fn into_payload(self) -> Payload {
        self.payload
    }

    /// Consumes this tag, returning its name and payload.
    pub fn into_parts(self) -> (String, Payload) {
        (self.name, self.payload)
    }

    /// Converts this tag into SNBT. A root tag renders as its compound alone, any other tag as
    /// `name:value`.
    ///
    /// ```
    /// # use nbtkit::*;
    /// let tag = Tag::new("pos", vec![1i32, 2, 3]).unwrap();
    /// assert_eq!(tag.to_snbt(SnbtStyle::Compact), "pos:[I;1,2,3]");
    /// assert_eq!(tag.to_snbt(SnbtStyle::Formatted), "pos: [I; 1, 2, 3]");
    ///
    /// let root = Tag::root(NbtCompound::new());
    /// assert_eq!(root.to_snbt(SnbtStyle::Compact), "{}");
    /// ```
    pub fn to_snbt(&self, style: SnbtStyle) -> String {
        Styled(self, style).to_string()
    }
}

fn check_name(name: &str) -> Result<(), NbtError> {
    if name.len() > u16::MAX as usize {
        Err(NbtError::NameTooLong(name.len()))
    } else {
        Ok(())
    }
}

impl Display for Styled<'_, Tag> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let Styled(tag, style) = *self;

        if !tag.root {
            snbt::write_key(f, &tag.name)?;
            f.write_str(style.key_separator())?;
        }
        Display::fmt(&Styled(&tag.payload, style), f)
    }
}

/// Tags are equal when their names and payloads are equal. Whether a tag is a root does not
/// take part in the comparison.
impl PartialEq for Tag {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.payload == other.payload
    }
}

impl Display for Tag {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&Styled(self, SnbtStyle::Compact), f)
    }
}

impl Debug for Tag {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Debug::fmt(&self.to_snbt(SnbtStyle::Compact), f)
    }
}

impl From<NbtCompound> for Tag {
    fn from(compound: NbtCompound) -> Self {
        Tag::root(compound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_invariant_is_kept_by_setters() {
        let mut root = Tag::root(NbtCompound::new());
        assert!(matches!(root.set_name("level"), Err(NbtError::InvalidRootTag)));
        assert!(matches!(root.set_payload(1i8), Err(NbtError::InvalidRootTag)));
        assert!(root.set_payload(NbtCompound::new()).is_ok());
        assert!(root.set_name("").is_ok());

        let mut child = Tag::new("child", 1i8).unwrap();
        assert_eq!(child.set_payload("text").unwrap(), Payload::Byte(1));
        child.set_name("renamed").unwrap();
        assert_eq!(child.into_parts(), ("renamed".to_owned(), Payload::from("text")));
    }

    #[test]
    fn equality_ignores_the_root_flag() {
        let root = Tag::root(NbtCompound::new());
        let named = Tag::new("", NbtCompound::new()).unwrap();
        assert!(root.is_root());
        assert!(!named.is_root());
        assert_eq!(root, named);
        assert_ne!(named, Tag::new("a", NbtCompound::new()).unwrap());
    }

    #[test]
    fn children_are_never_roots() {
        let mut compound = NbtCompound::new();
        compound.push_tag(Tag::root(NbtCompound::new()));
        assert!(!compound.tags()[0].is_root());
        assert_eq!(compound.to_snbt(SnbtStyle::Compact), r#"{"":{}}"#);
    }
}
