//! GBLN parsing.
//!
//! This module turns GBLN text into a [`Value`] tree. Parsing is a recursive
//! descent over the token stream produced by [`crate::lexer`], and every
//! literal is validated against its type tag as soon as it is read:
//!
//! - integers must be decimal and fit the declared width (`Range` otherwise)
//! - strings must fit the declared maximum byte length (`Length` otherwise)
//! - bools must be `t`, `f`, `true` or `false`
//!
//! Parsing is all-or-nothing: the first error aborts the parse and no partial
//! tree is returned. Objects and arrays nest at most [`MAX_DEPTH`] levels
//! deep.
//!
//! ## Usage
//!
//! Most users should use the high-level functions in the crate root:
//!
//! ```rust
//! use gbln::from_str;
//!
//! let doc = from_str("response{status<u16>(200) data{user{name<s32>(Alice)}}}").unwrap();
//! let name = doc
//!     .get("response")
//!     .and_then(|v| v.get("data"))
//!     .and_then(|v| v.get("user"))
//!     .and_then(|v| v.get("name"))
//!     .and_then(|v| v.as_str());
//! assert_eq!(name, Some("Alice"));
//! ```

use crate::error::Position;
use crate::lexer::{tokenize, Token, TokenKind};
use crate::{BoundedString, Error, ObjectMap, Result, ScalarTag, Value};

/// Deepest nesting of objects and arrays the parser accepts.
pub const MAX_DEPTH: usize = 128;

/// Recursive-descent parser over a token list.
///
/// Created via [`Parser::new`]; [`Parser::parse_document`] consumes it.
pub struct Parser<'a> {
    input: &'a str,
    tokens: Vec<Token>,
    index: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    /// Tokenizes `input` and prepares a parser over it.
    ///
    /// # Errors
    ///
    /// Returns the lexer's error if `input` cannot be tokenized.
    pub fn new(input: &'a str) -> Result<Self> {
        Ok(Parser {
            input,
            tokens: tokenize(input)?,
            index: 0,
            depth: 0,
        })
    }

    /// Parses the whole input as a document: a sequence of members forming
    /// the root object.
    ///
    /// # Errors
    ///
    /// Returns the first lexical, syntax or validation error in the input.
    pub fn parse_document(mut self) -> Result<Value> {
        let root = self.parse_members(None)?;
        Ok(Value::Object(root))
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.index)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.index).cloned();
        if token.is_some() {
            self.index += 1;
        }
        token
    }

    fn at(&self, offset: usize) -> Position {
        Position::locate(self.input, offset)
    }

    fn end(&self) -> Position {
        self.at(self.input.len())
    }

    /// Enters the container opened at `open`.
    fn descend(&mut self, open: usize) -> Result<()> {
        if self.depth >= MAX_DEPTH {
            return Err(Error::syntax(
                self.at(open),
                &format!("nesting too deep (limit is {} levels)", MAX_DEPTH),
            ));
        }
        self.depth += 1;
        Ok(())
    }

    fn parse_object(&mut self, open: usize) -> Result<ObjectMap> {
        self.descend(open)?;
        let members = self.parse_members(Some(open))?;
        self.depth -= 1;
        Ok(members)
    }

    /// Parses members until `}` (for a nested body, whose `{` was at
    /// `open`) or end of input (for the root).
    fn parse_members(&mut self, open: Option<usize>) -> Result<ObjectMap> {
        let mut members = ObjectMap::new();
        loop {
            let Some(token) = self.next() else {
                return match open {
                    // The lexer rejects unbalanced braces, this is a safety net.
                    Some(offset) => Err(Error::Unterminated {
                        at: self.at(offset),
                        delimiter: '{',
                    }),
                    None => Ok(members),
                };
            };

            let key = match token.kind {
                TokenKind::RBrace if open.is_some() => return Ok(members),
                TokenKind::Identifier(key) => key,
                _ => {
                    return Err(Error::syntax(
                        self.at(token.offset),
                        "expected a key",
                    ))
                }
            };

            if members.contains_key(&key) {
                return Err(Error::DuplicateKey {
                    at: self.at(token.offset),
                    key,
                });
            }
            let value = self.parse_assignment(&key, token.offset)?;
            members.insert(key, value);
        }
    }

    /// Parses what follows a key.
    fn parse_assignment(&mut self, key: &str, key_offset: usize) -> Result<Value> {
        let Some(token) = self.next() else {
            return Err(Error::syntax(
                self.end(),
                &format!("expected a value after key `{}`", key),
            ));
        };
        match token.kind {
            TokenKind::TypeTag(tag) => self.parse_tagged(tag, token.offset),
            TokenKind::LBrace => self.parse_object(token.offset).map(Value::Object),
            TokenKind::LBracket => self.parse_untyped_array(token.offset),
            TokenKind::LParen => self.parse_null(),
            _ => Err(Error::syntax(
                self.at(key_offset),
                &format!("expected `<`, `{{`, `[` or `(` after key `{}`", key),
            )),
        }
    }

    /// Parses `(literal)` or `[literal*]` after a type tag.
    fn parse_tagged(&mut self, tag: ScalarTag, tag_offset: usize) -> Result<Value> {
        match self.next().map(|t| t.kind) {
            Some(TokenKind::LParen) => {
                let (literal, offset) = self.expect_literal()?;
                self.expect(TokenKind::RParen, "`)`")?;
                decode_scalar(tag, &literal, self.input, offset)
            }
            Some(TokenKind::LBracket) => self.parse_typed_array(tag),
            _ => Err(Error::syntax(
                self.at(tag_offset),
                &format!("expected `(` or `[` after type tag `<{}>`", tag),
            )),
        }
    }

    fn parse_typed_array(&mut self, tag: ScalarTag) -> Result<Value> {
        let mut elements = Vec::new();
        loop {
            let Some(token) = self.next() else {
                return Err(Error::syntax(self.end(), "expected `]`"));
            };
            match token.kind {
                TokenKind::RBracket => return Ok(Value::Array(elements)),
                TokenKind::Literal(literal) => {
                    elements.push(decode_scalar(tag, &literal, self.input, token.offset)?);
                }
                _ => {
                    return Err(Error::syntax(
                        self.at(token.offset),
                        &format!("expected a `{}` literal or `]`", tag),
                    ))
                }
            }
        }
    }

    fn parse_untyped_array(&mut self, open: usize) -> Result<Value> {
        self.descend(open)?;
        let mut elements = Vec::new();
        loop {
            let Some(token) = self.next() else {
                return Err(Error::syntax(self.end(), "expected `]`"));
            };
            let element = match token.kind {
                TokenKind::RBracket => {
                    self.depth -= 1;
                    return Ok(Value::Array(elements));
                }
                TokenKind::TypeTag(tag) => self.parse_tagged(tag, token.offset)?,
                TokenKind::LBrace => Value::Object(self.parse_object(token.offset)?),
                TokenKind::LBracket => self.parse_untyped_array(token.offset)?,
                TokenKind::LParen => self.parse_null()?,
                _ => {
                    return Err(Error::syntax(
                        self.at(token.offset),
                        "array element needs a type tag",
                    ))
                }
            };
            elements.push(element);
        }
    }

    /// Parses the rest of `()` after an untagged `(`.
    fn parse_null(&mut self) -> Result<Value> {
        let (literal, offset) = self.expect_literal()?;
        self.expect(TokenKind::RParen, "`)`")?;
        if literal.is_empty() {
            Ok(Value::Null)
        } else {
            Err(Error::format(self.at(offset), "untagged", &literal))
        }
    }

    fn expect_literal(&mut self) -> Result<(String, usize)> {
        match self.next() {
            Some(Token {
                kind: TokenKind::Literal(literal),
                offset,
            }) => Ok((literal, offset)),
            Some(token) => Err(Error::syntax(self.at(token.offset), "expected a literal")),
            None => Err(Error::syntax(self.end(), "expected a literal")),
        }
    }

    fn expect(&mut self, kind: TokenKind, what: &str) -> Result<()> {
        match self.peek() {
            Some(token) if token.kind == kind => {
                self.index += 1;
                Ok(())
            }
            Some(token) => Err(Error::syntax(
                self.at(token.offset),
                &format!("expected {}", what),
            )),
            None => Err(Error::syntax(self.end(), &format!("expected {}", what))),
        }
    }
}

/// Decodes `literal` according to `tag`.
///
/// `offset` is where `literal` starts in `input`. It is only resolved to a
/// line and column when decoding fails.
///
/// # Errors
///
/// - [`Error::Format`] for a malformed number
/// - [`Error::Range`] for an integer outside the tag's width
/// - [`Error::Length`] for a string longer than the tag's maximum
/// - [`Error::Type`] for an unrecognized bool literal
pub(crate) fn decode_scalar(
    tag: ScalarTag,
    literal: &str,
    input: &str,
    offset: usize,
) -> Result<Value> {
    let at = || Position::locate(input, offset);
    let value = match tag {
        ScalarTag::Bool => match literal {
            "t" | "true" => Value::Bool(true),
            "f" | "false" => Value::Bool(false),
            _ => {
                return Err(Error::Type {
                    at: at(),
                    msg: format!("`{}` is not a bool literal (expected `t` or `f`)", literal),
                })
            }
        },
        ScalarTag::I8 => Value::I8(decode_int(tag, literal, at)?),
        ScalarTag::I16 => Value::I16(decode_int(tag, literal, at)?),
        ScalarTag::I32 => Value::I32(decode_int(tag, literal, at)?),
        ScalarTag::I64 => Value::I64(decode_int(tag, literal, at)?),
        ScalarTag::U8 => Value::U8(decode_int(tag, literal, at)?),
        ScalarTag::U16 => Value::U16(decode_int(tag, literal, at)?),
        ScalarTag::U32 => Value::U32(decode_int(tag, literal, at)?),
        ScalarTag::U64 => Value::U64(decode_int(tag, literal, at)?),
        ScalarTag::F32 => Value::F32(
            literal
                .parse()
                .map_err(|_| Error::format(at(), tag, literal))?,
        ),
        ScalarTag::F64 => Value::F64(
            literal
                .parse()
                .map_err(|_| Error::format(at(), tag, literal))?,
        ),
        ScalarTag::Str(max_len) => {
            let text = BoundedString::new(literal, max_len).map_err(|_| Error::Length {
                at: at(),
                max_len,
                actual: literal.len(),
            })?;
            Value::Str(text)
        }
    };
    Ok(value)
}

/// Parses a `[+-]?[0-9]+` literal and narrows it to `T`.
fn decode_int<T, F>(tag: ScalarTag, literal: &str, at: F) -> Result<T>
where
    T: TryFrom<i128>,
    F: Fn() -> Position,
{
    let digits = literal
        .strip_prefix(|c: char| c == '+' || c == '-')
        .unwrap_or(literal);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::format(at(), tag, literal));
    }
    // Digits are validated, so the only remaining failure is overflow.
    let wide: i128 = literal
        .parse()
        .map_err(|_| Error::range(at(), tag, literal))?;
    T::try_from(wide).map_err(|_| Error::range(at(), tag, literal))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    fn decode(tag: ScalarTag, literal: &str) -> Result<Value> {
        decode_scalar(tag, literal, literal, 0)
    }

    #[test]
    fn test_integer_bounds() {
        assert_eq!(decode(ScalarTag::I8, "127").unwrap(), Value::I8(127));
        assert_eq!(decode(ScalarTag::I8, "-128").unwrap(), Value::I8(-128));
        assert_eq!(decode(ScalarTag::I8, "+5").unwrap(), Value::I8(5));
        assert_eq!(decode(ScalarTag::U8, "+255").unwrap(), Value::U8(255));
        assert_eq!(decode(ScalarTag::U8, "-0").unwrap(), Value::U8(0));
        assert_eq!(
            decode(ScalarTag::U64, "18446744073709551615").unwrap(),
            Value::U64(u64::MAX)
        );
        assert_eq!(
            decode(ScalarTag::I64, "-9223372036854775808").unwrap(),
            Value::I64(i64::MIN)
        );

        for (tag, literal) in [
            (ScalarTag::I8, "128"),
            (ScalarTag::I8, "-129"),
            (ScalarTag::U8, "256"),
            (ScalarTag::U8, "-1"),
            (ScalarTag::U16, "65536"),
            (ScalarTag::I32, "2147483648"),
            (ScalarTag::U64, "18446744073709551616"),
            (ScalarTag::I64, "99999999999999999999999999999999999999999999"),
        ] {
            let err = decode(tag, literal).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Range, "{} {}", tag, literal);
        }
    }

    #[test]
    fn test_integer_format() {
        for literal in ["", "+", "-", "1.0", "1e3", "0x10", " 1", "1 ", "--1", "abc"] {
            let err = decode(ScalarTag::I32, literal).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Format, "literal: {:?}", literal);
        }
    }

    #[test]
    fn test_floats() {
        assert_eq!(decode(ScalarTag::F32, "19.99").unwrap(), Value::F32(19.99));
        assert_eq!(decode(ScalarTag::F64, "-1e-3").unwrap(), Value::F64(-0.001));
        assert_eq!(decode(ScalarTag::F64, "+2").unwrap(), Value::F64(2.0));
        let err = decode(ScalarTag::F64, "1.2.3").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Format);
        let err = decode(ScalarTag::F32, "").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Format);
    }

    #[test]
    fn test_bools() {
        assert_eq!(decode(ScalarTag::Bool, "t").unwrap(), Value::Bool(true));
        assert_eq!(decode(ScalarTag::Bool, "false").unwrap(), Value::Bool(false));
        for literal in ["yes", "1", "T", ""] {
            let err = decode(ScalarTag::Bool, literal).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Type);
        }
    }

    #[test]
    fn test_string_length_in_bytes() {
        assert!(decode(ScalarTag::Str(6), "北京").is_ok());
        match decode(ScalarTag::Str(5), "北京").unwrap_err() {
            Error::Length {
                max_len, actual, ..
            } => {
                assert_eq!(max_len, 5);
                assert_eq!(actual, 6);
            }
            other => panic!("expected length error, got {:?}", other),
        }
        assert!(decode(ScalarTag::Str(0), "").is_ok());
        assert!(decode(ScalarTag::Str(0), "a").is_err());
    }

    #[test]
    fn test_document_shapes() {
        let doc = Parser::new("a<i8>(1) b{} c[] d()")
            .unwrap()
            .parse_document()
            .unwrap();
        assert_eq!(doc.get("a"), Some(&Value::I8(1)));
        assert_eq!(doc.get("b"), Some(&Value::object()));
        assert_eq!(doc.get("c"), Some(&Value::array()));
        assert_eq!(doc.get("d"), Some(&Value::Null));
    }

    #[test]
    fn test_untyped_array_elements() {
        let doc = Parser::new("xs[<i8>(1) {k<b>(t)} [()] <u8>[1 2] ()]")
            .unwrap()
            .parse_document()
            .unwrap();
        let xs = doc.get("xs").unwrap();
        assert_eq!(xs.array_len(), Some(5));
        assert_eq!(xs.get_index(0), Some(&Value::I8(1)));
        assert_eq!(
            xs.get_index(1).and_then(|v| v.get("k")),
            Some(&Value::Bool(true))
        );
        assert_eq!(
            xs.get_index(2),
            Some(&Value::Array(vec![Value::Null]))
        );
        assert_eq!(
            xs.get_index(3),
            Some(&Value::Array(vec![Value::U8(1), Value::U8(2)]))
        );
        assert_eq!(xs.get_index(4), Some(&Value::Null));
    }

    #[test]
    fn test_syntax_errors() {
        for input in [
            "a",
            "a b",
            "a<i8>",
            "a<i8>{}",
            "a<i8>(1)(2)",
            "<i8>(1)",
            "a[b]",
            "a<i8>[{}]",
            "{a<i8>(1)}",
        ] {
            let err = Parser::new(input)
                .and_then(Parser::parse_document)
                .unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Syntax, "input: {}", input);
        }
    }

    #[test]
    fn test_null_with_content_is_format_error() {
        let err = Parser::new("a(x)")
            .and_then(Parser::parse_document)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Format);
    }

    #[test]
    fn test_duplicate_key_position() {
        let err = Parser::new("a<i8>(1)\na<i8>(2)")
            .and_then(Parser::parse_document)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DuplicateKey);
        let at = err.position().unwrap();
        assert_eq!((at.line, at.column), (2, 1));
    }

    #[test]
    fn test_nesting_limit() {
        let nested = |depth: usize| {
            format!("{}{}", "a{".repeat(depth), "}".repeat(depth))
        };
        assert!(Parser::new(&nested(MAX_DEPTH))
            .and_then(Parser::parse_document)
            .is_ok());

        let err = Parser::new(&nested(MAX_DEPTH + 1))
            .and_then(Parser::parse_document)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Syntax);
        // Reported at the first opener past the limit.
        assert_eq!(err.position().map(|p| p.offset), Some(MAX_DEPTH * 2 + 1));
    }

    #[test]
    fn test_nesting_limit_counts_arrays_and_objects() {
        let half = MAX_DEPTH / 2;
        let mixed = format!("{}(){}", "[{k".repeat(half), "}]".repeat(half));
        let input = format!("a{}", mixed);
        assert!(Parser::new(&input).and_then(Parser::parse_document).is_ok());

        let input = format!("a[{}]", mixed);
        let err = Parser::new(&input)
            .and_then(Parser::parse_document)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Syntax);
    }

    #[test]
    fn test_error_position_resolved_from_offset() {
        let err = Parser::new("xs<u8>[1 2\n 3 999]")
            .and_then(Parser::parse_document)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Range);
        let at = err.position().unwrap();
        assert_eq!((at.offset, at.line, at.column), (14, 2, 4));
    }

    #[test]
    fn test_same_key_in_different_scopes() {
        let doc = Parser::new("a{a<i8>(1)} b{a<i8>(2)}")
            .unwrap()
            .parse_document()
            .unwrap();
        assert_eq!(doc.get("b").and_then(|b| b.get("a")), Some(&Value::I8(2)));
    }
}
