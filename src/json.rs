use crate::{NbtCompound, NbtError, NbtList, Payload, Tag, MAX_DEPTH};
use serde_json::{Map, Number, Value};

impl Payload {
    /// Converts a JSON value into a payload, picking the narrowest numeric type which holds each
    /// number exactly.
    ///
    /// Integral numbers become a byte, short, int or long, whichever fits first. Other numbers
    /// become a float if they survive a round trip through `f32`, or a double otherwise. Booleans
    /// become bytes, arrays become lists and objects become compounds. `null` has no NBT
    /// counterpart.
    ///
    /// ```
    /// # use nbtkit::*;
    /// use serde_json::json;
    ///
    /// assert_eq!(Payload::from_json(&json!(100)).unwrap(), Payload::Byte(100));
    /// assert_eq!(Payload::from_json(&json!(200)).unwrap(), Payload::Short(200));
    /// assert_eq!(Payload::from_json(&json!(40000)).unwrap(), Payload::Int(40000));
    /// assert_eq!(Payload::from_json(&json!(3000000000u64)).unwrap(), Payload::Long(3000000000));
    /// assert_eq!(Payload::from_json(&json!(1.5)).unwrap(), Payload::Float(1.5));
    /// assert_eq!(Payload::from_json(&json!(0.1)).unwrap(), Payload::Double(0.1));
    /// assert!(Payload::from_json(&json!(null)).is_err());
    /// ```
    pub fn from_json(value: &Value) -> Result<Self, NbtError> {
        payload_from_json(value, 0)
    }

    /// Converts this payload into plain JSON. Arrays and lists become JSON arrays, compounds
    /// become objects and non-finite floats become `null`. When a compound holds several tags
    /// with the same name, the last one wins.
    pub fn to_json(&self) -> Value {
        match self {
            &Payload::Byte(value) => Value::from(value),
            &Payload::Short(value) => Value::from(value),
            &Payload::Int(value) => Value::from(value),
            &Payload::Long(value) => Value::from(value),
            &Payload::Float(value) => float_to_json(value.into()),
            &Payload::Double(value) => float_to_json(value),
            Payload::ByteArray(values) => values.iter().copied().map(Value::from).collect(),
            Payload::String(value) => Value::String(value.clone()),
            Payload::List(list) => list.iter().map(Payload::to_json).collect(),
            Payload::Compound(compound) => Value::Object(compound_to_json(compound)),
            Payload::IntArray(values) => values.iter().copied().map(Value::from).collect(),
            Payload::LongArray(values) => values.iter().copied().map(Value::from).collect(),
        }
    }
}

impl Tag {
    /// Converts a JSON value into a tag. An object with exactly one key becomes a tag with that
    /// name. Any other value becomes a tag with an empty name.
    ///
    /// ```
    /// # use nbtkit::*;
    /// use serde_json::json;
    ///
    /// let tag = Tag::from_json(&json!({"health": 20})).unwrap();
    /// assert_eq!(tag, Tag::new("health", 20i8).unwrap());
    ///
    /// let tag = Tag::from_json(&json!({"x": 1, "y": 2})).unwrap();
    /// assert_eq!(tag.name(), "");
    /// assert_eq!(tag.value::<&NbtCompound>().unwrap().len(), 2);
    /// ```
    pub fn from_json(value: &Value) -> Result<Self, NbtError> {
        match value {
            Value::Object(map) if map.len() == 1 => {
                let (name, value) = map.iter().next().ok_or(NbtError::InvalidJsonValue("object"))?;
                Tag::new(name.as_str(), payload_from_json(value, 0)?)
            }
            _ => Tag::new("", payload_from_json(value, 0)?),
        }
    }

    /// Converts this tag into JSON. A root tag becomes the plain value of its compound, any
    /// other tag becomes an object holding its name and value.
    pub fn to_json(&self) -> Value {
        if self.root {
            self.payload.to_json()
        } else {
            let mut map = Map::with_capacity(1);
            map.insert(self.name.clone(), self.payload.to_json());
            Value::Object(map)
        }
    }
}

// `depth` is the number of arrays and objects enclosing the value
pub(crate) fn payload_from_json(value: &Value, depth: usize) -> Result<Payload, NbtError> {
    let payload = match value {
        Value::Null => return Err(NbtError::InvalidJsonValue("null")),
        &Value::Bool(value) => Payload::from(value),
        Value::Number(number) => number_to_payload(number),
        Value::String(string) => {
            if string.len() > u16::MAX as usize {
                return Err(NbtError::StringTooLong(string.len()));
            }
            Payload::String(string.clone())
        }
        Value::Array(values) => {
            if depth >= MAX_DEPTH {
                return Err(NbtError::DepthLimitExceeded(MAX_DEPTH));
            }

            let values = values
                .iter()
                .map(|value| payload_from_json(value, depth + 1))
                .collect::<Result<Vec<_>, _>>()?;
            Payload::List(NbtList::from_values(values)?)
        }
        Value::Object(map) => {
            if depth >= MAX_DEPTH {
                return Err(NbtError::DepthLimitExceeded(MAX_DEPTH));
            }

            let mut compound = NbtCompound::with_capacity(map.len());
            for (name, value) in map {
                compound.push_tag(Tag::new(name.as_str(), payload_from_json(value, depth + 1)?)?);
            }
            Payload::Compound(compound)
        }
    };

    Ok(payload)
}

fn number_to_payload(number: &Number) -> Payload {
    if let Some(value) = number.as_i64() {
        return integer_to_payload(value);
    }

    // Numbers which don't fit an i64 fall back to floating point like any other non-integer
    let value = number.as_f64().unwrap_or(f64::NAN);
    if value.fract() == 0.0 && value >= i64::MIN as f64 && value < i64::MAX as f64 {
        return integer_to_payload(value as i64);
    }

    if (value as f32) as f64 == value {
        Payload::Float(value as f32)
    } else {
        Payload::Double(value)
    }
}

fn integer_to_payload(value: i64) -> Payload {
    if let Ok(value) = i8::try_from(value) {
        Payload::Byte(value)
    } else if let Ok(value) = i16::try_from(value) {
        Payload::Short(value)
    } else if let Ok(value) = i32::try_from(value) {
        Payload::Int(value)
    } else {
        Payload::Long(value)
    }
}

fn float_to_json(value: f64) -> Value {
    Number::from_f64(value).map_or(Value::Null, Value::Number)
}

fn compound_to_json(compound: &NbtCompound) -> Map<String, Value> {
    let mut map = Map::with_capacity(compound.len());
    for (name, payload) in compound.iter() {
        map.insert(name.to_owned(), payload.to_json());
    }
    map
}
