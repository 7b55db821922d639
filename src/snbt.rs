use crate::{NbtCompound, NbtError, NbtList, Payload, Tag, TagId, MAX_DEPTH};
use std::{
    error::Error,
    fmt::{self, Debug, Display, Formatter},
    str::FromStr,
};

/// Controls the whitespace emitted when rendering SNBT.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SnbtStyle {
    /// No whitespace at all, for example `{a:1,b:[I;1,2]}`.
    Compact,
    /// One space after every `:`, `,` and typed array `;`, for example `{a: 1, b: [I; 1, 2]}`.
    Formatted,
}

impl SnbtStyle {
    pub(crate) const fn key_separator(self) -> &'static str {
        match self {
            SnbtStyle::Compact => ":",
            SnbtStyle::Formatted => ": ",
        }
    }

    pub(crate) const fn element_separator(self) -> &'static str {
        match self {
            SnbtStyle::Compact => ",",
            SnbtStyle::Formatted => ", ",
        }
    }

    pub(crate) const fn array_separator(self) -> &'static str {
        match self {
            SnbtStyle::Compact => ";",
            SnbtStyle::Formatted => "; ",
        }
    }
}

impl Default for SnbtStyle {
    fn default() -> Self {
        SnbtStyle::Compact
    }
}

/// Parses the given string into an NBT compound.
///
/// # Examples
///
/// ```
/// # use nbtkit::*;
/// use nbtkit::snbt;
///
/// let compound = snbt::parse("{short: -10s, string: fizzbuzz, array: [L; 1l, 1l, 2l, 3l, 5l]}")
///     .unwrap();
///
/// assert_eq!(compound.get::<i16>("short").unwrap(), -10);
/// assert_eq!(compound.get::<&str>("string").unwrap(), "fizzbuzz");
/// assert_eq!(compound.get::<&[i64]>("array").unwrap(), &[1, 1, 2, 3, 5]);
/// ```
///
/// The parser stops at the first syntax error. Displaying the error shows where it occurred
/// and what went wrong.
///
/// ```
/// use nbtkit::snbt;
///
/// let result = snbt::parse("{a: [1, 2}");
/// assert_eq!(
///     result.unwrap_err().to_string(),
///     "Unmatched bracket at column 4 near '{a: [1, 2}'"
/// );
/// ```
pub fn parse<T: AsRef<str> + ?Sized>(string_nbt: &T) -> Result<NbtCompound, NbtError> {
    let raw = string_nbt.as_ref();
    let parser = Parser { raw };
    let text = raw.trim();

    parser.check_brackets(text)?;
    if TagId::classify_snbt(text) != TagId::Compound {
        return Err(SnbtError::new(raw, offset_in(raw, text), 1, SnbtErrorKind::ExpectedCompound).into());
    }

    parser.parse_compound(text, 1)
}

/// Parses any single SNBT value, such as `5b`, `"text"` or `[I; 1, 2]`.
///
/// ```
/// # use nbtkit::*;
/// assert_eq!(snbt::parse_payload("5b").unwrap(), Payload::Byte(5));
/// assert_eq!(snbt::parse_payload("5").unwrap(), Payload::Int(5));
/// assert_eq!(snbt::parse_payload("5.0").unwrap(), Payload::Double(5.0));
/// assert_eq!(snbt::parse_payload("5.0f").unwrap(), Payload::Float(5.0));
/// ```
pub fn parse_payload<T: AsRef<str> + ?Sized>(string_nbt: &T) -> Result<Payload, NbtError> {
    let raw = string_nbt.as_ref();
    Parser { raw }.parse_value(raw, 0)
}

struct Parser<'a> {
    raw: &'a str,
}

impl<'a> Parser<'a> {
    // `depth` is the number of lists and compounds enclosing the fragment
    fn parse_value(&self, fragment: &'a str, depth: usize) -> Result<Payload, NbtError> {
        let text = fragment.trim();
        if text.is_empty() {
            return Err(SnbtError::new(
                self.raw,
                offset_in(self.raw, fragment),
                1,
                SnbtErrorKind::EmptyElement,
            )
            .into());
        }

        self.check_brackets(text)?;

        match TagId::classify_snbt(text) {
            TagId::Compound => self.parse_compound(text, depth + 1).map(Payload::Compound),
            TagId::List => self.parse_list(text, depth + 1).map(Payload::List),
            kind @ (TagId::ByteArray | TagId::IntArray | TagId::LongArray) =>
                self.parse_array(kind, text),
            TagId::String => self.parse_string(text).map(Payload::String),
            TagId::Byte => parse_byte(text).map(Payload::Byte),
            TagId::Short => parse_integer(text, TagId::Short, i16::MIN.into(), i16::MAX.into())
                .map(|value| Payload::Short(value as i16)),
            TagId::Int => parse_integer(text, TagId::Int, i32::MIN.into(), i32::MAX.into())
                .map(|value| Payload::Int(value as i32)),
            TagId::Long => parse_integer(text, TagId::Long, i64::MIN.into(), i64::MAX.into())
                .map(|value| Payload::Long(value as i64)),
            TagId::Float => parse_float(text, TagId::Float, f32::is_finite).map(Payload::Float),
            TagId::Double => parse_float(text, TagId::Double, f64::is_finite).map(Payload::Double),
        }
    }

    // Catches unbalanced outer brackets before classification turns them into strings
    fn check_brackets(&self, text: &'a str) -> Result<(), SnbtError> {
        let index = offset_in(self.raw, text);
        match text.chars().next() {
            Some('{') if !text.ends_with('}') =>
                Err(SnbtError::new(self.raw, index, 1, SnbtErrorKind::UnmatchedBracket)),
            Some('[') if !text.ends_with(']') =>
                Err(SnbtError::new(self.raw, index, 1, SnbtErrorKind::UnmatchedBracket)),
            Some('}' | ']') =>
                Err(SnbtError::new(self.raw, index, 1, SnbtErrorKind::UnexpectedBracket)),
            _ => Ok(()),
        }
    }

    fn parse_compound(&self, text: &'a str, depth: usize) -> Result<NbtCompound, NbtError> {
        if depth > MAX_DEPTH {
            return Err(NbtError::DepthLimitExceeded(MAX_DEPTH));
        }

        let mut scanner = Scanner::new(self.raw, &text[1 .. text.len() - 1]);
        let mut compound = NbtCompound::new();
        if scanner.is_exhausted() {
            return Ok(compound);
        }

        loop {
            let name = scanner.key()?;
            let payload = self.parse_value(scanner.value()?, depth)?;
            compound.push_tag(Tag::new(name, payload)?);

            if !scanner.separator()? {
                return Ok(compound);
            }
        }
    }

    fn parse_list(&self, text: &'a str, depth: usize) -> Result<NbtList, NbtError> {
        if depth > MAX_DEPTH {
            return Err(NbtError::DepthLimitExceeded(MAX_DEPTH));
        }

        let mut scanner = Scanner::new(self.raw, &text[1 .. text.len() - 1]);
        let mut values = Vec::new();
        if !scanner.is_exhausted() {
            loop {
                values.push(self.parse_value(scanner.value()?, depth)?);
                if !scanner.separator()? {
                    break;
                }
            }
        }

        NbtList::from_values(values)
    }

    fn parse_array(&self, kind: TagId, text: &'a str) -> Result<Payload, NbtError> {
        let body = match typed_array_body(text) {
            Some((_, body)) => body,
            None =>
                return Err(NbtError::InvalidLiteral {
                    kind,
                    literal: text.into(),
                }),
        };

        let mut scanner = Scanner::new(self.raw, body);
        let mut elements = Vec::new();
        if !scanner.is_exhausted() {
            loop {
                elements.push(scanner.value()?.trim());
                if !scanner.separator()? {
                    break;
                }
            }
        }

        let elements = elements.into_iter();
        let payload = match kind {
            TagId::ByteArray => Payload::ByteArray(elements.map(parse_byte).collect::<Result<_, _>>()?),
            TagId::IntArray => Payload::IntArray(
                elements
                    .map(|element| {
                        parse_integer(element, TagId::Int, i32::MIN.into(), i32::MAX.into())
                            .map(|value| value as i32)
                    })
                    .collect::<Result<_, _>>()?,
            ),
            _ => Payload::LongArray(
                elements
                    .map(|element| {
                        parse_integer(element, TagId::Long, i64::MIN.into(), i64::MAX.into())
                            .map(|value| value as i64)
                    })
                    .collect::<Result<_, _>>()?,
            ),
        };

        Ok(payload)
    }

    fn parse_string(&self, text: &'a str) -> Result<String, NbtError> {
        let string = match text.chars().next() {
            Some(quote @ ('"' | '\'')) => {
                let (string, len) = unquote(self.raw, text, quote)?;
                if len != text.len() {
                    return Err(SnbtError::new(
                        self.raw,
                        offset_in(self.raw, text) + len,
                        1,
                        SnbtErrorKind::TrailingCharacters,
                    )
                    .into());
                }
                string
            }
            _ if text.chars().all(is_bare_char) => text.to_owned(),
            _ =>
                return Err(NbtError::InvalidLiteral {
                    kind: TagId::String,
                    literal: text.into(),
                }),
        };

        if string.len() > u16::MAX as usize {
            return Err(NbtError::StringTooLong(string.len()));
        }

        Ok(string)
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Context {
    Compound,
    List,
    DoubleQuoted,
    SingleQuoted,
}

// Splits the body of a list, compound or typed array into its elements. Compound bodies
// alternate between `key` and `value`, lists and arrays only call `value`.
struct Scanner<'a> {
    raw: &'a str,
    body: &'a str,
    position: usize,
    contexts: Vec<(Context, usize)>,
}

impl<'a> Scanner<'a> {
    fn new(raw: &'a str, body: &'a str) -> Self {
        Scanner {
            raw,
            body,
            position: 0,
            contexts: Vec::new(),
        }
    }

    #[inline]
    fn rest(&self) -> &'a str {
        &self.body[self.position ..]
    }

    // Position in the raw input
    #[inline]
    fn index(&self, position: usize) -> usize {
        offset_in(self.raw, self.body) + position
    }

    fn error(&self, position: usize, kind: SnbtErrorKind) -> SnbtError {
        SnbtError::new(self.raw, self.index(position), 1, kind)
    }

    fn skip_whitespace(&mut self) {
        let rest = self.rest();
        self.position += rest.len() - rest.trim_start().len();
    }

    fn is_exhausted(&self) -> bool {
        self.rest().trim().is_empty()
    }

    fn key(&mut self) -> Result<String, SnbtError> {
        self.skip_whitespace();
        let rest = self.rest();

        let key = match rest.chars().next() {
            Some(quote @ ('"' | '\'')) => {
                let (key, len) = unquote(self.raw, rest, quote)?;
                self.position += len;
                key
            }
            _ => {
                let len = rest.find(|ch| !is_bare_char(ch)).unwrap_or(rest.len());
                if len == 0 {
                    return Err(self.error(self.position, SnbtErrorKind::InvalidKey));
                }
                self.position += len;
                rest[.. len].to_owned()
            }
        };

        self.skip_whitespace();
        if self.rest().starts_with(':') {
            self.position += 1;
            Ok(key)
        } else {
            Err(self.error(self.position, SnbtErrorKind::ExpectedColon))
        }
    }

    fn value(&mut self) -> Result<&'a str, SnbtError> {
        let rest = self.rest();
        let mut end = rest.len();
        let mut escaped = false;
        self.contexts.clear();

        for (index, ch) in rest.char_indices() {
            let position = self.position + index;

            match self.contexts.last() {
                Some(&(quoted @ (Context::DoubleQuoted | Context::SingleQuoted), _)) =>
                    if escaped {
                        escaped = false;
                    } else if ch == '\\' {
                        escaped = true;
                    } else if (ch == '"' && quoted == Context::DoubleQuoted)
                        || (ch == '\'' && quoted == Context::SingleQuoted)
                    {
                        self.contexts.pop();
                    },
                _ => match ch {
                    '{' => self.contexts.push((Context::Compound, position)),
                    '[' => self.contexts.push((Context::List, position)),
                    '"' => self.contexts.push((Context::DoubleQuoted, position)),
                    '\'' => self.contexts.push((Context::SingleQuoted, position)),
                    '}' | ']' => match self.contexts.pop() {
                        Some((Context::Compound, _)) if ch == '}' => {}
                        Some((Context::List, _)) if ch == ']' => {}
                        _ => return Err(self.error(position, SnbtErrorKind::UnexpectedBracket)),
                    },
                    ',' if self.contexts.is_empty() => {
                        end = index;
                        break;
                    }
                    _ => {}
                },
            }
        }

        if let Some(&(context, position)) = self.contexts.last() {
            let kind = match context {
                Context::Compound | Context::List => SnbtErrorKind::UnmatchedBracket,
                Context::DoubleQuoted | Context::SingleQuoted => SnbtErrorKind::UnmatchedQuote,
            };
            return Err(self.error(position, kind));
        }

        let value = &rest[.. end];
        if value.trim().is_empty() {
            return Err(self.error(self.position, SnbtErrorKind::EmptyElement));
        }

        self.position += end;
        Ok(value)
    }

    // Consumes the comma after an element, returning false once the body is used up
    fn separator(&mut self) -> Result<bool, SnbtError> {
        self.skip_whitespace();
        let comma = self.position;

        match self.rest().chars().next() {
            None => Ok(false),
            Some(',') => {
                self.position += 1;
                if self.is_exhausted() {
                    Err(self.error(comma, SnbtErrorKind::TrailingComma))
                } else {
                    Ok(true)
                }
            }
            Some(_) => Err(self.error(comma, SnbtErrorKind::ExpectedComma)),
        }
    }
}

// Reads the quoted string at the start of `text`, returning the unescaped contents and the
// number of bytes consumed including both quotes.
fn unquote(raw: &str, text: &str, quote: char) -> Result<(String, usize), SnbtError> {
    let mut string = String::with_capacity(text.len());
    let mut chars = text.char_indices().skip(1);

    while let Some((index, ch)) = chars.next() {
        match ch {
            '\\' => match chars.next() {
                Some((_, escaped @ ('\\' | '"' | '\''))) => string.push(escaped),
                Some((_, other)) => {
                    string.push('\\');
                    string.push(other);
                }
                None => break,
            },
            _ if ch == quote => return Ok((string, index + ch.len_utf8())),
            _ => string.push(ch),
        }
    }

    Err(SnbtError::new(
        raw,
        offset_in(raw, text),
        1,
        SnbtErrorKind::UnmatchedQuote,
    ))
}

fn parse_byte(text: &str) -> Result<i8, NbtError> {
    match text {
        "true" => Ok(1),
        "false" => Ok(0),
        _ => parse_integer(text, TagId::Byte, i8::MIN.into(), i8::MAX.into()).map(|value| value as i8),
    }
}

fn parse_integer(text: &str, kind: TagId, min: i128, max: i128) -> Result<i128, NbtError> {
    let body = strip_suffix(text, kind);

    if is_integer_literal(body) {
        if let Ok(value) = body.parse::<i128>() {
            if (min ..= max).contains(&value) {
                return Ok(value);
            }
        }
    }

    Err(NbtError::InvalidLiteral {
        kind,
        literal: text.into(),
    })
}

fn parse_float<F: FromStr + Copy>(
    text: &str,
    kind: TagId,
    is_finite: impl Fn(F) -> bool,
) -> Result<F, NbtError>
{
    let body = strip_suffix(text, kind);

    if is_float_literal(body) {
        if let Ok(value) = body.parse::<F>() {
            // Literals too large for the target width overflow to infinity
            if is_non_finite_literal(body) || is_finite(value) {
                return Ok(value);
            }
        }
    }

    Err(NbtError::InvalidLiteral {
        kind,
        literal: text.into(),
    })
}

fn strip_suffix(text: &str, kind: TagId) -> &str {
    // Ints are written bare; `I` only names the int array prefix
    if kind == TagId::Int {
        return text;
    }

    match (text.chars().next_back(), kind.type_specifier().chars().next()) {
        (Some(last), Some(suffix)) if last.eq_ignore_ascii_case(&suffix) =>
            &text[.. text.len() - 1],
        _ => text,
    }
}

pub(crate) fn is_integer_literal(text: &str) -> bool {
    let digits = text.strip_prefix(['-', '+']).unwrap_or(text);
    !digits.is_empty() && digits.bytes().all(|byte| byte.is_ascii_digit())
}

/// Matches literals with a fractional part or an exponent, such as `1.5`, `.5`, `2.` or `1e-3`.
pub(crate) fn is_decimal_literal(text: &str) -> bool {
    let text = text.strip_prefix(['-', '+']).unwrap_or(text);

    let (mantissa, exponent) = match text.find(['e', 'E']) {
        Some(index) => (&text[.. index], Some(&text[index + 1 ..])),
        None => (text, None),
    };

    let (whole, fraction) = match mantissa.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (mantissa, None),
    };

    let all_digits = |part: &str| part.bytes().all(|byte| byte.is_ascii_digit());
    let mantissa_ok = all_digits(whole)
        && fraction.map_or(true, all_digits)
        && whole.len() + fraction.map_or(0, str::len) > 0;
    let exponent_ok = match exponent {
        Some(exponent) => {
            let digits = exponent.strip_prefix(['-', '+']).unwrap_or(exponent);
            !digits.is_empty() && all_digits(digits)
        }
        None => true,
    };

    mantissa_ok && exponent_ok && (fraction.is_some() || exponent.is_some())
}

fn is_non_finite_literal(text: &str) -> bool {
    matches!(text, "NaN" | "inf" | "-inf" | "+inf")
}

pub(crate) fn is_float_literal(text: &str) -> bool {
    is_integer_literal(text) || is_decimal_literal(text) || is_non_finite_literal(text)
}

/// Splits a typed array such as `[I; 1, 2]` into its array type and the text between the `;`
/// and the closing bracket.
pub(crate) fn typed_array_body(text: &str) -> Option<(TagId, &str)> {
    let inner = text.strip_prefix('[')?.strip_suffix(']')?.trim_start();

    let kind = match inner.as_bytes() {
        [b'B', b';', ..] => TagId::ByteArray,
        [b'I', b';', ..] => TagId::IntArray,
        [b'L', b';', ..] => TagId::LongArray,
        _ => return None,
    };

    Some((kind, &inner[2 ..]))
}

/// Returns whether the character may appear in an unquoted key or string.
#[inline]
pub(crate) fn is_bare_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || matches!(ch, '_' | '.' | '+' | '-')
}

/// Writes the string wrapped in double quotes, escaping quotes and backslashes.
pub(crate) fn write_quoted<W: fmt::Write>(out: &mut W, string: &str) -> fmt::Result {
    out.write_char('"')?;
    for ch in string.chars() {
        if ch == '"' || ch == '\\' {
            out.write_char('\\')?;
        }
        out.write_char(ch)?;
    }
    out.write_char('"')
}

pub(crate) fn write_key<W: fmt::Write>(out: &mut W, key: &str) -> fmt::Result {
    if !key.is_empty() && key.chars().all(is_bare_char) {
        out.write_str(key)
    } else {
        write_quoted(out, key)
    }
}

/// Renders the wrapped value as SNBT in the given style through its `Display` implementation.
pub(crate) struct Styled<'a, T: ?Sized>(pub(crate) &'a T, pub(crate) SnbtStyle);

#[inline]
fn offset_in(raw: &str, slice: &str) -> usize {
    slice.as_ptr() as usize - raw.as_ptr() as usize
}

/// An error that occurs while parsing SNBT. It carries the column where the error occurred,
/// a copy of the surrounding input and the kind of error. See [`SnbtErrorKind`] for the
/// different kinds.
pub struct SnbtError {
    column: usize,
    segment: String,
    kind: SnbtErrorKind,
}

impl SnbtError {
    fn new(input: &str, index: usize, width: usize, kind: SnbtErrorKind) -> Self {
        SnbtError {
            column: input[.. index].chars().count(),
            segment: Self::snippet(input, index, width, 15, 10),
            kind,
        }
    }

    fn snippet(input: &str, index: usize, width: usize, before: usize, after: usize) -> String {
        let mut start = index - usize::min(before, index);
        while !input.is_char_boundary(start) {
            start -= 1;
        }

        let mut end = usize::min(index + width.min(20) + after, input.len());
        while !input.is_char_boundary(end) {
            end += 1;
        }

        input[start .. end].to_owned()
    }

    /// The zero-based character column at which the error occurred.
    pub fn column(&self) -> usize {
        self.column
    }

    /// The input surrounding the error.
    pub fn segment(&self) -> &str {
        &self.segment
    }

    /// The kind of error.
    pub fn kind(&self) -> SnbtErrorKind {
        self.kind
    }
}

impl Display for SnbtError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} at column {} near '{}'",
            self.kind, self.column, self.segment
        )
    }
}

impl Debug for SnbtError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("SnbtError")
            .field("kind", &self.kind)
            .field("column", &self.column)
            .finish()
    }
}

impl Error for SnbtError {}

/// A specific kind of SNBT syntax error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SnbtErrorKind {
    /// A quoted string or key was never closed.
    UnmatchedQuote,
    /// Text followed the closing quote of a quoted string.
    TrailingCharacters,
    /// A `{` or `[` was never closed.
    UnmatchedBracket,
    /// A `}` or `]` had no matching opening bracket.
    UnexpectedBracket,
    /// A list, compound or array element was blank.
    EmptyElement,
    /// A list, compound or array ended with a comma.
    TrailingComma,
    /// Two elements were not separated by a comma.
    ExpectedComma,
    /// A compound entry did not start with a valid key.
    InvalidKey,
    /// A compound key was not followed by `:`.
    ExpectedColon,
    /// The input was not a compound.
    ExpectedCompound,
}

impl Display for SnbtErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let message = match self {
            SnbtErrorKind::UnmatchedQuote => "Unmatched quote",
            SnbtErrorKind::TrailingCharacters => "Unexpected text after closing quote",
            SnbtErrorKind::UnmatchedBracket => "Unmatched bracket",
            SnbtErrorKind::UnexpectedBracket => "Unexpected closing bracket",
            SnbtErrorKind::EmptyElement => "Empty element",
            SnbtErrorKind::TrailingComma => "Trailing comma",
            SnbtErrorKind::ExpectedComma => "Expected ','",
            SnbtErrorKind::InvalidKey => "Expected compound key",
            SnbtErrorKind::ExpectedColon => "Expected ':'",
            SnbtErrorKind::ExpectedCompound => "Expected compound",
        };

        f.write_str(message)
    }
}
