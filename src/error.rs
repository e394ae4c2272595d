//! Error types for GBLN parsing, serialization and value manipulation.
//!
//! Every fallible operation in this crate returns [`Result`]. Malformed input is
//! an expected outcome, never a panic.
//!
//! ## Error Categories
//!
//! - **Lexical / syntax errors**: malformed type tags, unbalanced delimiters,
//!   unexpected tokens
//! - **Validation errors**: a literal that does not fit its declared type
//!   (format, integer range, string byte length, bool token)
//! - **Structural errors**: duplicate keys inside one object body
//! - **I/O errors**: failures reported by a reader or writer supplied by the caller
//!
//! Parse errors carry a [`Position`] so messages point at the offending input.
//!
//! ## Examples
//!
//! ```rust
//! use gbln::{from_str, ErrorKind};
//!
//! let err = from_str("age<i8>(999)").unwrap_err();
//! assert_eq!(err.kind(), ErrorKind::Range);
//! assert!(err.to_string().contains("line 1"));
//! ```

use std::fmt;
use thiserror::Error;

/// A location in the parsed input.
///
/// `offset` is a byte offset; `line` and `column` are 1-based, with columns
/// counted in characters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Position {
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

impl Position {
    /// Computes the position of byte `offset` within `input`.
    ///
    /// Offsets past the end of `input` are clamped to its length.
    #[must_use]
    pub fn locate(input: &str, offset: usize) -> Self {
        let offset = offset.min(input.len());
        let mut line = 1;
        let mut column = 1;
        for (idx, ch) in input.char_indices() {
            if idx >= offset {
                break;
            }
            if ch == '\n' {
                line += 1;
                column = 1;
            } else {
                column += 1;
            }
        }
        Position {
            offset,
            line,
            column,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// The category of an [`Error`], independent of the data it carries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Lex,
    Syntax,
    Format,
    Range,
    Length,
    Type,
    DuplicateKey,
    Unterminated,
    Io,
}

/// Represents all possible errors produced by this crate.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Malformed token: bad type tag, stray or mismatched delimiter, invalid UTF-8
    #[error("Lex error at {at}: {msg}")]
    Lex { at: Position, msg: String },

    /// Well-formed tokens in an order the grammar does not allow
    #[error("Syntax error at {at}: {msg}")]
    Syntax { at: Position, msg: String },

    /// Literal is not a valid textual form for its declared type
    #[error("Format error at {at}: invalid {tag} literal `{literal}`")]
    Format {
        at: Position,
        tag: String,
        literal: String,
    },

    /// Integer literal outside the range of its declared width
    #[error("Range error at {at}: `{literal}` does not fit in {tag}")]
    Range {
        at: Position,
        tag: String,
        literal: String,
    },

    /// String literal longer (in bytes) than its declared maximum
    #[error("Length error at {at}: string is {actual} bytes, maximum is {max_len}")]
    Length {
        at: Position,
        max_len: usize,
        actual: usize,
    },

    /// Bool literal that is not one of `t`, `f`, `true`, `false`
    #[error("Type error at {at}: {msg}")]
    Type { at: Position, msg: String },

    /// The same key appears twice in one object body
    #[error("Duplicate key `{key}` at {at}")]
    DuplicateKey { at: Position, key: String },

    /// An opening delimiter is never closed
    #[error("Unterminated `{delimiter}` opened at {at}")]
    Unterminated { at: Position, delimiter: char },

    /// A string value was constructed with more bytes than its maximum
    #[error("Length error: string is {actual} bytes, maximum is {max_len}")]
    StringTooLong { max_len: usize, actual: usize },

    /// A container operation was applied to the wrong kind of value
    #[error("Type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: String,
    },

    /// IO error reported by a caller-supplied reader or writer
    #[error("IO error: {0}")]
    Io(String),
}

impl Error {
    pub(crate) fn lex(at: Position, msg: &str) -> Self {
        Error::Lex {
            at,
            msg: msg.to_string(),
        }
    }

    pub(crate) fn syntax(at: Position, msg: &str) -> Self {
        Error::Syntax {
            at,
            msg: msg.to_string(),
        }
    }

    pub(crate) fn format(at: Position, tag: impl fmt::Display, literal: &str) -> Self {
        Error::Format {
            at,
            tag: tag.to_string(),
            literal: literal.to_string(),
        }
    }

    pub(crate) fn range(at: Position, tag: impl fmt::Display, literal: &str) -> Self {
        Error::Range {
            at,
            tag: tag.to_string(),
            literal: literal.to_string(),
        }
    }

    pub(crate) fn type_mismatch(expected: &'static str, found: impl fmt::Display) -> Self {
        Error::TypeMismatch {
            expected,
            found: found.to_string(),
        }
    }

    /// Creates an I/O error from the message of a reader or writer failure.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use gbln::{Error, ErrorKind};
    ///
    /// let err = Error::io("disk full");
    /// assert_eq!(err.kind(), ErrorKind::Io);
    /// assert!(err.to_string().contains("disk full"));
    /// ```
    pub fn io(msg: &str) -> Self {
        Error::Io(msg.to_string())
    }

    /// Returns the category of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Error::Lex { .. } => ErrorKind::Lex,
            Error::Syntax { .. } => ErrorKind::Syntax,
            Error::Format { .. } => ErrorKind::Format,
            Error::Range { .. } => ErrorKind::Range,
            Error::Length { .. } | Error::StringTooLong { .. } => ErrorKind::Length,
            Error::Type { .. } | Error::TypeMismatch { .. } => ErrorKind::Type,
            Error::DuplicateKey { .. } => ErrorKind::DuplicateKey,
            Error::Unterminated { .. } => ErrorKind::Unterminated,
            Error::Io(_) => ErrorKind::Io,
        }
    }

    /// Returns where in the input the error was detected, for parse errors.
    #[must_use]
    pub const fn position(&self) -> Option<Position> {
        match self {
            Error::Lex { at, .. }
            | Error::Syntax { at, .. }
            | Error::Format { at, .. }
            | Error::Range { at, .. }
            | Error::Length { at, .. }
            | Error::Type { at, .. }
            | Error::DuplicateKey { at, .. }
            | Error::Unterminated { at, .. } => Some(*at),
            Error::StringTooLong { .. } | Error::TypeMismatch { .. } | Error::Io(_) => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locate_counts_lines_and_chars() {
        let input = "a<i8>(1)\nb<s8>(北京)";
        let pos = Position::locate(input, input.find("北").unwrap());
        assert_eq!(pos.line, 2);
        assert_eq!(pos.column, 7);

        let after = Position::locate(input, input.len() - 1);
        assert_eq!(after.line, 2);
        assert_eq!(after.column, 9);
    }

    #[test]
    fn test_locate_clamps_offset() {
        let pos = Position::locate("ab", 10);
        assert_eq!(pos.offset, 2);
        assert_eq!(pos.column, 3);
    }

    #[test]
    fn test_kind_and_position() {
        let at = Position::locate("x", 0);
        let err = Error::range(at, "i8", "300");
        assert_eq!(err.kind(), ErrorKind::Range);
        assert_eq!(err.position(), Some(at));
        assert!(err.to_string().contains("does not fit in i8"));

        let err = Error::StringTooLong {
            max_len: 2,
            actual: 3,
        };
        assert_eq!(err.kind(), ErrorKind::Length);
        assert_eq!(err.position(), None);
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "boom");
        let err: Error = io.into();
        assert_eq!(err.kind(), ErrorKind::Io);
        assert!(err.to_string().contains("boom"));
    }
}
