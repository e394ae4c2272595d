//! GBLN serialization.
//!
//! This module provides the [`Serializer`] that writes a [`Value`] tree back
//! to GBLN text, in one of two renderings:
//!
//! - **Compact**: members separated by a single space, no other whitespace
//! - **Pretty**: one member per line, indented per nesting level
//!
//! Every scalar is written with its type tag, so the output parses back to an
//! identical tree. Arrays whose elements all share one scalar tag use the
//! typed form `<tag>[a b c]`; any other array (empty, mixed, nested, holding
//! objects or nulls) lists each element in its own tagged form.
//!
//! ## Usage
//!
//! ```rust
//! use gbln::{from_str, to_string, to_string_pretty};
//!
//! let doc = from_str("user{id<u32>(7) tags<s8>[a b]}").unwrap();
//! assert_eq!(to_string(&doc), "user{id<u32>(7) tags<s8>[a b]}");
//! assert_eq!(
//!     to_string_pretty(&doc),
//!     "user{\n  id<u32>(7)\n  tags<s8>[a b]\n}"
//! );
//! ```
//!
//! ## Direct Serializer Usage
//!
//! ```rust
//! use gbln::{Serializer, SerializeOptions, Value};
//!
//! let mut serializer = Serializer::new(SerializeOptions::new());
//! serializer.serialize(&Value::from(-3i16));
//! assert_eq!(serializer.into_inner(), "<i16>(-3)");
//! ```

use crate::lexer::{is_separator, is_structural};
use crate::{ObjectMap, ScalarTag, SerializeOptions, Value};

/// The GBLN serializer.
///
/// Created via [`Serializer::new`]; call [`Serializer::serialize`] and then
/// [`Serializer::into_inner`] for the text.
pub struct Serializer {
    output: String,
    options: SerializeOptions,
    depth: usize,
}

impl Serializer {
    /// Creates a serializer with an empty output buffer.
    pub fn new(options: SerializeOptions) -> Self {
        Serializer {
            output: String::with_capacity(256),
            options,
            depth: 0,
        }
    }

    /// Consumes the serializer, returning the text written so far.
    pub fn into_inner(self) -> String {
        self.output
    }

    /// Writes `value` as a document.
    ///
    /// An object is written as the document's members without surrounding
    /// braces. Any other value is written in its element form, e.g.
    /// `<i8>(5)`, which is not itself a parseable document.
    pub fn serialize(&mut self, value: &Value) {
        match value {
            Value::Object(obj) => self.write_members(obj),
            other => self.write_value(other),
        }
    }

    fn write_line_break(&mut self) {
        self.output.push('\n');
        let width = self.depth * self.options.indent;
        self.output.extend(std::iter::repeat(' ').take(width));
    }

    fn write_separator(&mut self) {
        if self.options.pretty {
            self.write_line_break();
        } else {
            self.output.push(' ');
        }
    }

    fn write_members(&mut self, obj: &ObjectMap) {
        for (i, (key, value)) in obj.iter().enumerate() {
            if i > 0 {
                self.write_separator();
            }
            self.write_word(key);
            self.write_value(value);
        }
    }

    /// Writes the part after a key; array elements use the same forms.
    fn write_value(&mut self, value: &Value) {
        match value {
            Value::Null => self.output.push_str("()"),
            Value::Object(obj) => self.write_object(obj),
            Value::Array(arr) => self.write_array(arr),
            scalar => {
                // Only null and containers lack a tag, and they are handled above.
                if let Some(tag) = scalar.scalar_tag() {
                    self.write_tag(tag);
                    self.output.push('(');
                    self.write_paren_literal(scalar);
                    self.output.push(')');
                }
            }
        }
    }

    fn write_tag(&mut self, tag: ScalarTag) {
        self.output.push('<');
        self.output.push_str(&tag.to_string());
        self.output.push('>');
    }

    fn write_object(&mut self, obj: &ObjectMap) {
        if obj.is_empty() {
            self.output.push_str("{}");
            return;
        }
        self.output.push('{');
        self.depth += 1;
        if self.options.pretty {
            self.write_line_break();
        }
        self.write_members(obj);
        self.depth -= 1;
        if self.options.pretty {
            self.write_line_break();
        }
        self.output.push('}');
    }

    fn write_array(&mut self, arr: &[Value]) {
        if let Some(tag) = uniform_tag(arr) {
            self.write_tag(tag);
            self.output.push('[');
            for (i, element) in arr.iter().enumerate() {
                if i > 0 {
                    self.output.push(' ');
                }
                match element {
                    Value::Str(s) => self.write_word(s.as_str()),
                    other => self.write_plain_literal(other),
                }
            }
            self.output.push(']');
            return;
        }

        let multiline = self.options.pretty
            && arr
                .iter()
                .any(|v| matches!(v, Value::Object(_) | Value::Array(_)));

        self.output.push('[');
        if multiline {
            self.depth += 1;
            for element in arr {
                self.write_line_break();
                self.write_value(element);
            }
            self.depth -= 1;
            self.write_line_break();
        } else {
            for (i, element) in arr.iter().enumerate() {
                if i > 0 {
                    self.output.push(' ');
                }
                self.write_value(element);
            }
        }
        self.output.push(']');
    }

    /// Writes a non-string scalar literal.
    fn write_plain_literal(&mut self, value: &Value) {
        match value {
            Value::Bool(b) => self.output.push(if *b { 't' } else { 'f' }),
            Value::I8(v) => self.output.push_str(&v.to_string()),
            Value::I16(v) => self.output.push_str(&v.to_string()),
            Value::I32(v) => self.output.push_str(&v.to_string()),
            Value::I64(v) => self.output.push_str(&v.to_string()),
            Value::U8(v) => self.output.push_str(&v.to_string()),
            Value::U16(v) => self.output.push_str(&v.to_string()),
            Value::U32(v) => self.output.push_str(&v.to_string()),
            Value::U64(v) => self.output.push_str(&v.to_string()),
            // Display is the shortest text that parses back to the same bits.
            Value::F32(v) => self.output.push_str(&v.to_string()),
            Value::F64(v) => self.output.push_str(&v.to_string()),
            Value::Null | Value::Str(_) | Value::Object(_) | Value::Array(_) => {}
        }
    }

    /// Writes the literal between `(` and `)`.
    fn write_paren_literal(&mut self, value: &Value) {
        match value {
            Value::Str(s) => {
                for ch in s.as_str().chars() {
                    match ch {
                        '\\' => self.output.push_str("\\\\"),
                        ')' => self.output.push_str("\\)"),
                        _ => self.output.push(ch),
                    }
                }
            }
            other => self.write_plain_literal(other),
        }
    }

    /// Writes a key or typed-array string, quoting it when a bare word
    /// would not read back the same.
    fn write_word(&mut self, s: &str) {
        if needs_quotes(s) {
            self.output.push('"');
            for ch in s.chars() {
                match ch {
                    '"' => self.output.push_str("\\\""),
                    '\\' => self.output.push_str("\\\\"),
                    _ => self.output.push(ch),
                }
            }
            self.output.push('"');
        } else {
            self.output.push_str(s);
        }
    }
}

#[inline]
fn needs_quotes(s: &str) -> bool {
    s.is_empty() || s.starts_with('"') || s.chars().any(|c| is_separator(c) || is_structural(c))
}

/// The shared tag of a non-empty array of same-tagged scalars.
fn uniform_tag(arr: &[Value]) -> Option<ScalarTag> {
    let tag = arr.first()?.scalar_tag()?;
    arr.iter()
        .all(|v| v.scalar_tag() == Some(tag))
        .then_some(tag)
}
