//! Configuration options for GBLN serialization.
//!
//! [`SerializeOptions`] selects between the two textual renderings of a value
//! tree. Both parse back to the same tree; they differ only in whitespace.
//!
//! ## Examples
//!
//! ```rust
//! use gbln::{from_str, to_string_with_options, SerializeOptions};
//!
//! let doc = from_str("user{name<s32>(Alice)}").unwrap();
//!
//! let compact = to_string_with_options(&doc, SerializeOptions::new());
//! assert_eq!(compact, "user{name<s32>(Alice)}");
//!
//! let pretty = to_string_with_options(&doc, SerializeOptions::pretty().with_indent(4));
//! assert_eq!(pretty, "user{\n    name<s32>(Alice)\n}");
//! ```

/// Configuration options for GBLN serialization.
///
/// # Examples
///
/// ```rust
/// use gbln::SerializeOptions;
///
/// // Compact: one space between members, nothing else
/// let options = SerializeOptions::new();
/// assert!(!options.pretty);
///
/// // One member per line, 2-space indentation per nesting level
/// let options = SerializeOptions::pretty();
/// assert_eq!(options.indent, 2);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SerializeOptions {
    pub indent: usize,
    pub pretty: bool,
}

impl Default for SerializeOptions {
    fn default() -> Self {
        SerializeOptions {
            indent: 2,
            pretty: false,
        }
    }
}

impl SerializeOptions {
    /// Creates default options (compact format, 2-space indent if switched to pretty).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates options for pretty-printed output with newlines and indentation.
    #[must_use]
    pub fn pretty() -> Self {
        SerializeOptions {
            pretty: true,
            ..Default::default()
        }
    }

    /// Sets the indentation size (number of spaces per level).
    ///
    /// Default is 2. Only affects pretty-printed output.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use gbln::SerializeOptions;
    ///
    /// let options = SerializeOptions::pretty().with_indent(4);
    /// assert_eq!(options.indent, 4);
    /// ```
    #[must_use]
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }
}
