//! Typed value representation for GBLN data.
//!
//! This module provides the [`Value`] enum, one variant per GBLN type. Unlike
//! loosely typed formats, a GBLN value remembers its exact declared width:
//! an `i8` stays an `i8`, and a string remembers the maximum byte length it
//! was declared with.
//!
//! ## Core Types
//!
//! - [`Value`]: any GBLN node (null, bool, sized integer, float, bounded string, object, array)
//! - [`BoundedString`]: UTF-8 text together with its declared maximum byte length
//! - [`ScalarTag`]: a parsed type tag such as `i8`, `f64` or `s32`
//! - [`ValueType`]: the variant of a [`Value`], without its payload
//!
//! ## Usage Patterns
//!
//! ### Creating Values
//!
//! ```rust
//! use gbln::Value;
//!
//! let age = Value::from(25i8);
//! let name = Value::string("Alice", 32).unwrap();
//! let mut user = Value::object();
//! user.insert("age", age).unwrap();
//! user.insert("name", name).unwrap();
//! assert_eq!(user.object_len(), Some(2));
//! ```
//!
//! ### Extracting Values
//!
//! Accessors only succeed on an exact variant match; there is no implicit
//! widening between integer types.
//!
//! ```rust
//! use gbln::Value;
//!
//! let value = Value::from(25i8);
//! assert_eq!(value.as_i8(), Some(25));
//! assert_eq!(value.as_i32(), None);
//! ```

use crate::{Error, ObjectMap, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A string together with the maximum byte length declared for it.
///
/// The invariant `text.len() <= max_len` is checked on construction and
/// cannot be broken afterwards: the fields are private and there is no
/// mutable access to the text.
///
/// # Examples
///
/// ```rust
/// use gbln::BoundedString;
///
/// let city = BoundedString::new("北京", 16).unwrap();
/// assert_eq!(city.len(), 6);
/// assert!(BoundedString::new("abc", 2).is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct BoundedString {
    text: String,
    max_len: usize,
}

impl BoundedString {
    /// Creates a bounded string, failing if `text` is longer than `max_len` bytes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StringTooLong`] when the byte length exceeds `max_len`.
    pub fn new(text: impl Into<String>, max_len: usize) -> Result<Self> {
        let text = text.into();
        if text.len() > max_len {
            return Err(Error::StringTooLong {
                max_len,
                actual: text.len(),
            });
        }
        Ok(BoundedString { text, max_len })
    }

    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// The declared maximum length in bytes.
    #[inline]
    #[must_use]
    pub const fn max_len(&self) -> usize {
        self.max_len
    }

    /// The actual length in bytes.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.text.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    #[must_use]
    pub fn into_string(self) -> String {
        self.text
    }
}

impl fmt::Display for BoundedString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// A parsed type tag: the `<...>` annotation in front of a scalar or typed array.
///
/// Bit-width tags and the string tag are distinct grammar branches: the `N`
/// in `sN` is a maximum byte length, not a width.
///
/// # Examples
///
/// ```rust
/// use gbln::ScalarTag;
///
/// assert_eq!(ScalarTag::parse("u16"), Some(ScalarTag::U16));
/// assert_eq!(ScalarTag::parse("s32"), Some(ScalarTag::Str(32)));
/// assert_eq!(ScalarTag::parse("s"), None);
/// assert_eq!(ScalarTag::Str(8).to_string(), "s8");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScalarTag {
    Bool,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
    Str(usize),
}

impl ScalarTag {
    /// Parses a tag word (the text between `<` and `>`).
    ///
    /// Returns `None` for unknown words, `s` without digits, and lengths that
    /// overflow `usize`.
    #[must_use]
    pub fn parse(word: &str) -> Option<Self> {
        let tag = match word {
            "b" => ScalarTag::Bool,
            "i8" => ScalarTag::I8,
            "i16" => ScalarTag::I16,
            "i32" => ScalarTag::I32,
            "i64" => ScalarTag::I64,
            "u8" => ScalarTag::U8,
            "u16" => ScalarTag::U16,
            "u32" => ScalarTag::U32,
            "u64" => ScalarTag::U64,
            "f32" => ScalarTag::F32,
            "f64" => ScalarTag::F64,
            _ => {
                let digits = word.strip_prefix('s')?;
                if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                    return None;
                }
                ScalarTag::Str(digits.parse().ok()?)
            }
        };
        Some(tag)
    }
}

impl fmt::Display for ScalarTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarTag::Bool => f.write_str("b"),
            ScalarTag::I8 => f.write_str("i8"),
            ScalarTag::I16 => f.write_str("i16"),
            ScalarTag::I32 => f.write_str("i32"),
            ScalarTag::I64 => f.write_str("i64"),
            ScalarTag::U8 => f.write_str("u8"),
            ScalarTag::U16 => f.write_str("u16"),
            ScalarTag::U32 => f.write_str("u32"),
            ScalarTag::U64 => f.write_str("u64"),
            ScalarTag::F32 => f.write_str("f32"),
            ScalarTag::F64 => f.write_str("f64"),
            ScalarTag::Str(max_len) => write!(f, "s{}", max_len),
        }
    }
}

/// The variant of a [`Value`], without its payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValueType {
    Null,
    Bool,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
    Str,
    Object,
    Array,
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueType::Null => "null",
            ValueType::Bool => "b",
            ValueType::I8 => "i8",
            ValueType::I16 => "i16",
            ValueType::I32 => "i32",
            ValueType::I64 => "i64",
            ValueType::U8 => "u8",
            ValueType::U16 => "u16",
            ValueType::U32 => "u32",
            ValueType::U64 => "u64",
            ValueType::F32 => "f32",
            ValueType::F64 => "f64",
            ValueType::Str => "str",
            ValueType::Object => "object",
            ValueType::Array => "array",
        };
        f.write_str(name)
    }
}

/// A typed GBLN value.
///
/// Containers exclusively own their children, so a `Value` is always a tree.
/// Equality is structural: variant, payload (including a string's maximum
/// length), object key order and array element order all take part.
///
/// # Examples
///
/// ```rust
/// use gbln::{Value, ValueType};
///
/// let doc = gbln::from_str("tags<s16>[kotlin jvm android]").unwrap();
/// let tags = doc.get("tags").unwrap();
/// assert_eq!(tags.value_type(), ValueType::Array);
/// assert_eq!(tags.array_len(), Some(3));
/// assert_eq!(tags.get_index(0).and_then(Value::as_str), Some("kotlin"));
/// ```
#[derive(Clone, Debug, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
    Str(BoundedString),
    Object(ObjectMap),
    Array(Vec<Value>),
}

macro_rules! scalar_accessors {
    ($($variant:ident, $ty:ty, $is:ident, $as:ident;)*) => {
        $(
            #[doc = concat!("Returns `true` if the value is an `", stringify!($ty), "`.")]
            #[inline]
            #[must_use]
            pub const fn $is(&self) -> bool {
                matches!(self, Value::$variant(_))
            }

            #[doc = concat!("If the value is an `", stringify!($ty), "`, returns it. Otherwise returns `None`.")]
            #[inline]
            #[must_use]
            pub fn $as(&self) -> Option<$ty> {
                match self {
                    Value::$variant(v) => Some(*v),
                    _ => None,
                }
            }
        )*
    };
}

impl Value {
    /// Creates a string value with the given maximum byte length.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StringTooLong`] when `text` is longer than `max_len` bytes.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use gbln::Value;
    ///
    /// assert!(Value::string("abc", 3).is_ok());
    /// assert!(Value::string("abc", 2).is_err());
    /// ```
    pub fn string(text: impl Into<String>, max_len: usize) -> Result<Self> {
        BoundedString::new(text, max_len).map(Value::Str)
    }

    /// Creates an empty object.
    #[must_use]
    pub fn object() -> Self {
        Value::Object(ObjectMap::new())
    }

    /// Creates an empty array.
    #[must_use]
    pub fn array() -> Self {
        Value::Array(Vec::new())
    }

    /// Returns the variant of this value.
    #[must_use]
    pub const fn value_type(&self) -> ValueType {
        match self {
            Value::Null => ValueType::Null,
            Value::Bool(_) => ValueType::Bool,
            Value::I8(_) => ValueType::I8,
            Value::I16(_) => ValueType::I16,
            Value::I32(_) => ValueType::I32,
            Value::I64(_) => ValueType::I64,
            Value::U8(_) => ValueType::U8,
            Value::U16(_) => ValueType::U16,
            Value::U32(_) => ValueType::U32,
            Value::U64(_) => ValueType::U64,
            Value::F32(_) => ValueType::F32,
            Value::F64(_) => ValueType::F64,
            Value::Str(_) => ValueType::Str,
            Value::Object(_) => ValueType::Object,
            Value::Array(_) => ValueType::Array,
        }
    }

    /// Returns the type tag this value is written with, or `None` for null
    /// and containers.
    #[must_use]
    pub const fn scalar_tag(&self) -> Option<ScalarTag> {
        let tag = match self {
            Value::Bool(_) => ScalarTag::Bool,
            Value::I8(_) => ScalarTag::I8,
            Value::I16(_) => ScalarTag::I16,
            Value::I32(_) => ScalarTag::I32,
            Value::I64(_) => ScalarTag::I64,
            Value::U8(_) => ScalarTag::U8,
            Value::U16(_) => ScalarTag::U16,
            Value::U32(_) => ScalarTag::U32,
            Value::U64(_) => ScalarTag::U64,
            Value::F32(_) => ScalarTag::F32,
            Value::F64(_) => ScalarTag::F64,
            Value::Str(s) => ScalarTag::Str(s.max_len()),
            Value::Null | Value::Object(_) | Value::Array(_) => return None,
        };
        Some(tag)
    }

    #[inline]
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    #[inline]
    #[must_use]
    pub const fn is_bool(&self) -> bool {
        matches!(self, Value::Bool(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_str(&self) -> bool {
        matches!(self, Value::Str(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_object(&self) -> bool {
        matches!(self, Value::Object(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }

    /// If the value is a boolean, returns it. Otherwise returns `None`.
    #[inline]
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    scalar_accessors! {
        I8, i8, is_i8, as_i8;
        I16, i16, is_i16, as_i16;
        I32, i32, is_i32, as_i32;
        I64, i64, is_i64, as_i64;
        U8, u8, is_u8, as_u8;
        U16, u16, is_u16, as_u16;
        U32, u32, is_u32, as_u32;
        U64, u64, is_u64, as_u64;
        F32, f32, is_f32, as_f32;
        F64, f64, is_f64, as_f64;
    }

    /// If the value is a string, returns a reference to its text. Otherwise returns `None`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use gbln::Value;
    ///
    /// assert_eq!(Value::string("hello", 8).unwrap().as_str(), Some("hello"));
    /// assert_eq!(Value::from(42u8).as_str(), None);
    /// ```
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_bounded_str(&self) -> Option<&BoundedString> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_object(&self) -> Option<&ObjectMap> {
        match self {
            Value::Object(obj) => Some(obj),
            _ => None,
        }
    }

    #[inline]
    pub fn as_object_mut(&mut self) -> Option<&mut ObjectMap> {
        match self {
            Value::Object(obj) => Some(obj),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_array(&self) -> Option<&Vec<Value>> {
        match self {
            Value::Array(arr) => Some(arr),
            _ => None,
        }
    }

    #[inline]
    pub fn as_array_mut(&mut self) -> Option<&mut Vec<Value>> {
        match self {
            Value::Array(arr) => Some(arr),
            _ => None,
        }
    }

    /// Looks up `key` if this value is an object.
    ///
    /// Returns `None` when the key is absent or the value is not an object.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_object().and_then(|obj| obj.get(key))
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.as_object_mut().and_then(|obj| obj.get_mut(key))
    }

    /// Sets `key` to `value` if this value is an object, returning the value it replaced.
    ///
    /// An existing key keeps its position in the key order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TypeMismatch`] if this value is not an object.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Result<Option<Value>> {
        let found = self.value_type();
        match self.as_object_mut() {
            Some(obj) => Ok(obj.insert(key.into(), value)),
            None => Err(Error::type_mismatch("object", found)),
        }
    }

    /// Number of entries if this value is an object.
    #[must_use]
    pub fn object_len(&self) -> Option<usize> {
        self.as_object().map(ObjectMap::len)
    }

    /// Keys in insertion order if this value is an object.
    ///
    /// # Examples
    ///
    /// ```rust
    /// let doc = gbln::from_str("b<i8>(1) a<i8>(2)").unwrap();
    /// let keys: Vec<&str> = doc.keys().unwrap().collect();
    /// assert_eq!(keys, ["b", "a"]);
    /// ```
    pub fn keys(&self) -> Option<impl Iterator<Item = &str>> {
        self.as_object().map(|obj| obj.keys().map(String::as_str))
    }

    /// Appends `value` if this value is an array.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TypeMismatch`] if this value is not an array.
    pub fn push(&mut self, value: Value) -> Result<()> {
        let found = self.value_type();
        match self.as_array_mut() {
            Some(arr) => {
                arr.push(value);
                Ok(())
            }
            None => Err(Error::type_mismatch("array", found)),
        }
    }

    /// Element at `index` if this value is an array.
    #[must_use]
    pub fn get_index(&self, index: usize) -> Option<&Value> {
        self.as_array().and_then(|arr| arr.get(index))
    }

    /// Number of elements if this value is an array.
    #[must_use]
    pub fn array_len(&self) -> Option<usize> {
        self.as_array().map(Vec::len)
    }
}

/// Writes the value as GBLN text: compact with `{}`, pretty with `{:#}`.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = if f.alternate() {
            crate::to_string_pretty(self)
        } else {
            crate::to_string(self)
        };
        f.write_str(&text)
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::I8(v) => serializer.serialize_i8(*v),
            Value::I16(v) => serializer.serialize_i16(*v),
            Value::I32(v) => serializer.serialize_i32(*v),
            Value::I64(v) => serializer.serialize_i64(*v),
            Value::U8(v) => serializer.serialize_u8(*v),
            Value::U16(v) => serializer.serialize_u16(*v),
            Value::U32(v) => serializer.serialize_u32(*v),
            Value::U64(v) => serializer.serialize_u64(*v),
            Value::F32(v) => serializer.serialize_f32(*v),
            Value::F64(v) => serializer.serialize_f64(*v),
            Value::Str(s) => serializer.serialize_str(s.as_str()),
            Value::Array(arr) => {
                use serde::ser::SerializeSeq;
                let mut seq = serializer.serialize_seq(Some(arr.len()))?;
                for element in arr {
                    seq.serialize_element(element)?;
                }
                seq.end()
            }
            Value::Object(obj) => {
                use serde::ser::SerializeMap;
                let mut map = serializer.serialize_map(Some(obj.len()))?;
                for (k, v) in obj.iter() {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
        }
    }
}

/// Builds a value from any self-describing serde format.
///
/// Integer widths reported by the format are kept; strings get a maximum
/// length equal to their byte length.
impl<'de> Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::{self, Visitor};

        struct ValueVisitor;

        impl<'de> Visitor<'de> for ValueVisitor {
            type Value = Value;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("any valid GBLN value")
            }

            fn visit_bool<E>(self, value: bool) -> std::result::Result<Self::Value, E> {
                Ok(Value::Bool(value))
            }

            fn visit_i8<E>(self, value: i8) -> std::result::Result<Self::Value, E> {
                Ok(Value::I8(value))
            }

            fn visit_i16<E>(self, value: i16) -> std::result::Result<Self::Value, E> {
                Ok(Value::I16(value))
            }

            fn visit_i32<E>(self, value: i32) -> std::result::Result<Self::Value, E> {
                Ok(Value::I32(value))
            }

            fn visit_i64<E>(self, value: i64) -> std::result::Result<Self::Value, E> {
                Ok(Value::I64(value))
            }

            fn visit_u8<E>(self, value: u8) -> std::result::Result<Self::Value, E> {
                Ok(Value::U8(value))
            }

            fn visit_u16<E>(self, value: u16) -> std::result::Result<Self::Value, E> {
                Ok(Value::U16(value))
            }

            fn visit_u32<E>(self, value: u32) -> std::result::Result<Self::Value, E> {
                Ok(Value::U32(value))
            }

            fn visit_u64<E>(self, value: u64) -> std::result::Result<Self::Value, E> {
                Ok(Value::U64(value))
            }

            fn visit_f32<E>(self, value: f32) -> std::result::Result<Self::Value, E> {
                Ok(Value::F32(value))
            }

            fn visit_f64<E>(self, value: f64) -> std::result::Result<Self::Value, E> {
                Ok(Value::F64(value))
            }

            fn visit_str<E>(self, value: &str) -> std::result::Result<Self::Value, E> {
                Ok(Value::from(value))
            }

            fn visit_string<E>(self, value: String) -> std::result::Result<Self::Value, E> {
                Ok(Value::from(value))
            }

            fn visit_unit<E>(self) -> std::result::Result<Self::Value, E> {
                Ok(Value::Null)
            }

            fn visit_none<E>(self) -> std::result::Result<Self::Value, E> {
                Ok(Value::Null)
            }

            fn visit_some<D>(self, deserializer: D) -> std::result::Result<Self::Value, D::Error>
            where
                D: Deserializer<'de>,
            {
                Deserialize::deserialize(deserializer)
            }

            fn visit_seq<A>(self, mut seq: A) -> std::result::Result<Self::Value, A::Error>
            where
                A: de::SeqAccess<'de>,
            {
                let mut vec = Vec::new();
                while let Some(elem) = seq.next_element()? {
                    vec.push(elem);
                }
                Ok(Value::Array(vec))
            }

            fn visit_map<A>(self, mut map: A) -> std::result::Result<Self::Value, A::Error>
            where
                A: de::MapAccess<'de>,
            {
                let mut values = ObjectMap::new();
                while let Some((key, value)) = map.next_entry()? {
                    values.insert(key, value);
                }
                Ok(Value::Object(values))
            }
        }

        deserializer.deserialize_any(ValueVisitor)
    }
}

macro_rules! from_scalar {
    ($($ty:ty => $variant:ident),*) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Value::$variant(value)
                }
            }
        )*
    };
}

from_scalar! {
    bool => Bool,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    f32 => F32,
    f64 => F64
}

/// The maximum length is set to the string's own byte length.
impl From<String> for Value {
    fn from(value: String) -> Self {
        let max_len = value.len();
        Value::Str(BoundedString {
            text: value,
            max_len,
        })
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::from(value.to_string())
    }
}

impl From<BoundedString> for Value {
    fn from(value: BoundedString) -> Self {
        Value::Str(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::Array(value)
    }
}

impl From<ObjectMap> for Value {
    fn from(value: ObjectMap) -> Self {
        Value::Object(value)
    }
}
