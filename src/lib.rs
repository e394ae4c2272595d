//! # gbln
//!
//! A parser and serializer for GBLN, a typed, human-readable, self-describing
//! data format.
//!
//! ## What is GBLN?
//!
//! Every scalar in a GBLN document carries an explicit type tag: a bit width
//! for integers, a precision for floats, a maximum byte length for strings.
//! Values compose into objects and arrays:
//!
//! ```text
//! user{
//!   id<u32>(12345)
//!   name<s64>(Alice)
//!   active<b>(t)
//!   tags<s16>[kotlin jvm android]
//! }
//! ```
//!
//! ## Key Features
//!
//! - **Strict validation**: `age<i8>(999)` is rejected while parsing, not when read
//! - **Exact types**: an `i8` stays an `i8`; accessors never widen silently
//! - **Ordered objects**: members keep the order they were written in
//! - **Lossless**: compact and pretty output both parse back to the same tree
//! - **No Unsafe Code**: written entirely in safe Rust
//!
//! ## Quick Start
//!
//! ```rust
//! use gbln::{from_str, to_string};
//!
//! let doc = from_str("response{status<u16>(200) data{user{name<s32>(Alice)}}}").unwrap();
//!
//! let status = doc.get("response").and_then(|r| r.get("status"));
//! assert_eq!(status.and_then(|s| s.as_u16()), Some(200));
//!
//! assert_eq!(
//!     to_string(&doc),
//!     "response{status<u16>(200) data{user{name<s32>(Alice)}}}"
//! );
//! ```
//!
//! ### Building Values
//!
//! ```rust
//! use gbln::{to_string, Value};
//!
//! let mut tags = Value::array();
//! tags.push(Value::string("rust", 8).unwrap()).unwrap();
//! tags.push(Value::string("gbln", 8).unwrap()).unwrap();
//!
//! let mut doc = Value::object();
//! doc.insert("age", Value::from(25i8)).unwrap();
//! doc.insert("tags", tags).unwrap();
//!
//! assert_eq!(to_string(&doc), "age<i8>(25) tags<s8>[rust gbln]");
//! ```
//!
//! ## Grammar
//!
//! ```text
//! document     := member*                       // the root object
//! member       := key ( scalarAssign | arrayAssign | objectBody
//!                     | untypedArray | '(' ')' )
//! scalarAssign := '<' tag '>' '(' literal ')'
//! arrayAssign  := '<' tag '>' '[' literal* ']'
//! objectBody   := '{' member* '}'
//! untypedArray := '[' element* ']'
//! element      := '<' tag '>' ( '(' literal ')' | '[' literal* ']' )
//!               | objectBody | untypedArray | '(' ')'
//! tag          := i8 | i16 | i32 | i64 | u8 | u16 | u32 | u64 | f32 | f64 | b | sN
//! ```
//!
//! `()` is null. Keys and array literals are bare words or `"quoted"`;
//! a literal in parentheses runs up to the first unescaped `)`. Objects and
//! arrays nest at most [`de::MAX_DEPTH`] levels deep.
//!
//! ## Errors
//!
//! All fallible functions return [`Result`]. Parse errors report a
//! [`Position`](error::Position) and an [`ErrorKind`]. Callers that prefer a
//! "null result plus last error message" convention can use [`last_error`].
//!
//! ## Logging
//!
//! Parse and serialize entry points emit `tracing` events at `debug` level
//! (and token counts at `trace`). Install any `tracing` subscriber to see
//! them; none is installed by this crate.

pub mod de;
pub mod error;
pub mod last_error;
pub mod lexer;
pub mod map;
pub mod options;
pub mod ser;
pub mod value;

pub use de::Parser;
pub use error::{Error, ErrorKind, Position, Result};
pub use map::ObjectMap;
pub use options::SerializeOptions;
pub use ser::Serializer;
pub use value::{BoundedString, ScalarTag, Value, ValueType};

use std::io;

/// Serialize a value to compact GBLN text.
///
/// # Examples
///
/// ```rust
/// use gbln::{from_str, to_string};
///
/// let doc = from_str("a<i8>(1)\n\nb{ c<b>(t) }").unwrap();
/// assert_eq!(to_string(&doc), "a<i8>(1) b{c<b>(t)}");
/// ```
#[must_use]
pub fn to_string(value: &Value) -> String {
    to_string_with_options(value, SerializeOptions::default())
}

/// Serialize a value to pretty-printed GBLN text, one member per line.
///
/// # Examples
///
/// ```rust
/// use gbln::{from_str, to_string_pretty};
///
/// let doc = from_str("a<i8>(1) b{c<b>(t)}").unwrap();
/// assert_eq!(to_string_pretty(&doc), "a<i8>(1)\nb{\n  c<b>(t)\n}");
/// ```
#[must_use]
pub fn to_string_pretty(value: &Value) -> String {
    to_string_with_options(value, SerializeOptions::pretty())
}

/// Serialize a value to GBLN text with custom options.
#[must_use]
pub fn to_string_with_options(value: &Value, options: SerializeOptions) -> String {
    let pretty = options.pretty;
    let mut serializer = Serializer::new(options);
    serializer.serialize(value);
    let output = serializer.into_inner();
    tracing::debug!(bytes = output.len(), pretty, "serialized GBLN value");
    output
}

/// Serialize a value to a writer as compact GBLN text.
///
/// # Examples
///
/// ```rust
/// use gbln::{from_str, to_writer};
///
/// let doc = from_str("name<s32>(Bob)").unwrap();
/// let mut buffer = Vec::new();
/// to_writer(&mut buffer, &doc).unwrap();
/// assert_eq!(buffer, b"name<s32>(Bob)");
/// ```
///
/// # Errors
///
/// Returns [`Error::Io`] if writing to the writer fails.
pub fn to_writer<W>(writer: W, value: &Value) -> Result<()>
where
    W: io::Write,
{
    to_writer_with_options(writer, value, SerializeOptions::default())
}

/// Serialize a value to a writer as pretty-printed GBLN text.
///
/// # Errors
///
/// Returns [`Error::Io`] if writing to the writer fails.
pub fn to_writer_pretty<W>(writer: W, value: &Value) -> Result<()>
where
    W: io::Write,
{
    to_writer_with_options(writer, value, SerializeOptions::pretty())
}

/// Serialize a value to a writer with custom options.
///
/// # Errors
///
/// Returns [`Error::Io`] if writing to the writer fails.
pub fn to_writer_with_options<W>(mut writer: W, value: &Value, options: SerializeOptions) -> Result<()>
where
    W: io::Write,
{
    let text = to_string_with_options(value, options);
    writer
        .write_all(text.as_bytes())
        .and_then(|()| writer.flush())
        .map_err(|e| Error::io(&e.to_string()))?;
    Ok(())
}

/// Parse a GBLN document.
///
/// The result is always a [`Value::Object`]: the document's top-level members.
///
/// # Examples
///
/// ```rust
/// use gbln::{from_str, ErrorKind};
///
/// let doc = from_str("age<i8>(25)").unwrap();
/// assert!(doc.is_object());
/// assert_eq!(doc.get("age").and_then(|v| v.as_i8()), Some(25));
///
/// let err = from_str("age<i8>(-129)").unwrap_err();
/// assert_eq!(err.kind(), ErrorKind::Range);
/// ```
///
/// # Errors
///
/// Returns the first lexical, syntax or validation error. No partial tree is
/// returned.
pub fn from_str(s: &str) -> Result<Value> {
    tracing::debug!(bytes = s.len(), "parsing GBLN document");
    let result = Parser::new(s).and_then(Parser::parse_document);
    match &result {
        Ok(doc) => tracing::debug!(members = doc.object_len().unwrap_or(0), "parsed GBLN document"),
        Err(err) => tracing::debug!(error = %err, "GBLN parse failed"),
    }
    result
}

/// Parse a GBLN document from bytes.
///
/// # Examples
///
/// ```rust
/// use gbln::from_slice;
///
/// let doc = from_slice("city<s16>(北京)".as_bytes()).unwrap();
/// assert_eq!(doc.get("city").and_then(|v| v.as_str()), Some("北京"));
/// ```
///
/// # Errors
///
/// Returns [`Error::Lex`] if the bytes are not valid UTF-8, otherwise as
/// [`from_str`].
pub fn from_slice(v: &[u8]) -> Result<Value> {
    match std::str::from_utf8(v) {
        Ok(s) => from_str(s),
        Err(e) => {
            let valid = &v[..e.valid_up_to()];
            // The prefix is valid UTF-8 by definition of `valid_up_to`.
            let prefix = std::str::from_utf8(valid).unwrap_or_default();
            Err(Error::Lex {
                at: Position::locate(prefix, prefix.len()),
                msg: "invalid UTF-8".to_string(),
            })
        }
    }
}

/// Parse a GBLN document from an I/O stream.
///
/// The reader is drained completely before parsing starts.
///
/// # Examples
///
/// ```rust
/// use gbln::from_reader;
/// use std::io::Cursor;
///
/// let doc = from_reader(Cursor::new(b"ok<b>(t)")).unwrap();
/// assert_eq!(doc.get("ok").and_then(|v| v.as_bool()), Some(true));
/// ```
///
/// # Errors
///
/// Returns [`Error::Io`] if reading fails, otherwise as [`from_slice`].
pub fn from_reader<R>(mut reader: R) -> Result<Value>
where
    R: io::Read,
{
    let mut bytes = Vec::new();
    reader
        .read_to_end(&mut bytes)
        .map_err(|e| Error::io(&e.to_string()))?;
    from_slice(&bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_serialize_roundtrip() {
        let input = "user{id<u32>(12345) name<s64>(Alice)} tags<s16>[kotlin jvm android]";
        let doc = from_str(input).unwrap();
        assert_eq!(to_string(&doc), input);
        assert_eq!(from_str(&to_string_pretty(&doc)).unwrap(), doc);
    }

    #[test]
    fn test_display_matches_serializers() {
        let doc = from_str("a{b<i8>(1)}").unwrap();
        assert_eq!(format!("{}", doc), to_string(&doc));
        assert_eq!(format!("{:#}", doc), to_string_pretty(&doc));
    }

    #[test]
    fn test_invalid_utf8_position() {
        let err = from_slice(b"a<s8>(\xff)").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Lex);
        assert_eq!(err.position().map(|p| p.offset), Some(6));
    }

    #[test]
    fn test_reader_failure_is_io() {
        struct Failing;

        impl io::Read for Failing {
            fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::Other, "device gone"))
            }
        }

        let err = from_reader(Failing).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
        assert!(err.to_string().contains("device gone"));
    }

    #[test]
    fn test_pretty_writer() {
        let doc = from_str("a{b<i8>(1)}").unwrap();
        let mut buffer = Vec::new();
        to_writer_pretty(&mut buffer, &doc).unwrap();
        assert_eq!(String::from_utf8(buffer).unwrap(), "a{\n  b<i8>(1)\n}");
    }
}
