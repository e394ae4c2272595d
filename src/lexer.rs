//! Tokenizer for GBLN text.
//!
//! The lexer walks the input one `char` at a time, so multi-byte UTF-8 code
//! points are never split, and produces a flat [`Token`] list for the parser.
//!
//! Some decisions depend on context, which the lexer tracks with a stack of
//! open delimiters:
//!
//! - Everything between `(` and the next unescaped `)` is one raw literal,
//!   spaces included.
//! - Words directly inside `[...]` are array element literals. Elsewhere
//!   they are keys.
//! - `<...>` is read as a whole and becomes a single [`TokenKind::TypeTag`].
//!
//! ```rust
//! use gbln::lexer::{tokenize, TokenKind};
//! use gbln::ScalarTag;
//!
//! let tokens = tokenize("age<i8>(25)").unwrap();
//! let kinds: Vec<TokenKind> = tokens.into_iter().map(|t| t.kind).collect();
//! assert_eq!(
//!     kinds,
//!     vec![
//!         TokenKind::Identifier("age".to_string()),
//!         TokenKind::TypeTag(ScalarTag::I8),
//!         TokenKind::LParen,
//!         TokenKind::Literal("25".to_string()),
//!         TokenKind::RParen,
//!     ]
//! );
//! ```

use crate::error::Position;
use crate::{Error, Result, ScalarTag};

#[derive(Clone, Debug, PartialEq)]
pub enum TokenKind {
    Identifier(String),
    TypeTag(ScalarTag),
    Literal(String),
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
}

/// A token and the byte offset where it starts.
#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub offset: usize,
}

/// Whitespace that separates tokens.
#[inline]
pub(crate) fn is_separator(ch: char) -> bool {
    matches!(ch, ' ' | '\t' | '\n' | '\r')
}

/// Characters that end a bare word.
#[inline]
pub(crate) fn is_structural(ch: char) -> bool {
    matches!(ch, '<' | '>' | '(' | ')' | '{' | '}' | '[' | ']')
}

/// Splits `input` into tokens.
///
/// # Errors
///
/// - [`Error::Lex`] for a malformed type tag or a stray/mismatched closing delimiter
/// - [`Error::Unterminated`] when `(`, `{`, `[` or `"` is still open at end of input
pub fn tokenize(input: &str) -> Result<Vec<Token>> {
    let tokens = Lexer::new(input).run()?;
    tracing::trace!(tokens = tokens.len(), bytes = input.len(), "tokenized");
    Ok(tokens)
}

struct Lexer<'a> {
    input: &'a str,
    position: usize,
    /// Unclosed `{` / `[` and their offsets.
    open: Vec<(char, usize)>,
    tokens: Vec<Token>,
}

impl<'a> Lexer<'a> {
    fn new(input: &'a str) -> Self {
        Lexer {
            input,
            position: 0,
            open: Vec::new(),
            tokens: Vec::new(),
        }
    }

    fn peek_char(&self) -> Option<char> {
        self.input[self.position..].chars().next()
    }

    fn next_char(&mut self) -> Option<char> {
        let ch = self.peek_char()?;
        self.position += ch.len_utf8();
        Some(ch)
    }

    fn at(&self, offset: usize) -> Position {
        Position::locate(self.input, offset)
    }

    fn push(&mut self, kind: TokenKind, offset: usize) {
        self.tokens.push(Token { kind, offset });
    }

    fn in_array(&self) -> bool {
        matches!(self.open.last(), Some(('[', _)))
    }

    fn run(mut self) -> Result<Vec<Token>> {
        loop {
            while self.peek_char().is_some_and(is_separator) {
                self.next_char();
            }

            let start = self.position;
            let Some(ch) = self.next_char() else {
                break;
            };

            match ch {
                '<' => {
                    let tag = self.type_tag(start)?;
                    self.push(TokenKind::TypeTag(tag), start);
                }
                '(' => {
                    self.push(TokenKind::LParen, start);
                    let literal_start = self.position;
                    let literal = self.paren_literal(start)?;
                    self.push(TokenKind::Literal(literal), literal_start);
                    self.push(TokenKind::RParen, self.position - 1);
                }
                '{' => {
                    self.open.push(('{', start));
                    self.push(TokenKind::LBrace, start);
                }
                '[' => {
                    self.open.push(('[', start));
                    self.push(TokenKind::LBracket, start);
                }
                '}' | ']' => {
                    let opener = if ch == '}' { '{' } else { '[' };
                    match self.open.pop() {
                        Some((open, _)) if open == opener => {}
                        _ => {
                            return Err(Error::lex(
                                self.at(start),
                                &format!("unmatched `{}`", ch),
                            ))
                        }
                    }
                    let kind = if ch == '}' {
                        TokenKind::RBrace
                    } else {
                        TokenKind::RBracket
                    };
                    self.push(kind, start);
                }
                '>' | ')' => {
                    return Err(Error::lex(self.at(start), &format!("unexpected `{}`", ch)));
                }
                '"' => {
                    let word = self.quoted_word(start)?;
                    self.push_word(word, start);
                }
                _ => {
                    while self
                        .peek_char()
                        .is_some_and(|c| !is_separator(c) && !is_structural(c))
                    {
                        self.next_char();
                    }
                    let word = self.input[start..self.position].to_string();
                    self.push_word(word, start);
                }
            }
        }

        if let Some(&(delimiter, offset)) = self.open.last() {
            return Err(Error::Unterminated {
                at: self.at(offset),
                delimiter,
            });
        }
        Ok(self.tokens)
    }

    fn push_word(&mut self, word: String, offset: usize) {
        let kind = if self.in_array() {
            TokenKind::Literal(word)
        } else {
            TokenKind::Identifier(word)
        };
        self.push(kind, offset);
    }

    /// Reads the tag word after `<` up to and including `>`.
    fn type_tag(&mut self, start: usize) -> Result<ScalarTag> {
        let word_start = self.position;
        while self
            .peek_char()
            .is_some_and(|c| !is_separator(c) && !is_structural(c))
        {
            self.next_char();
        }
        let word = &self.input[word_start..self.position];

        if self.peek_char() != Some('>') {
            return Err(Error::lex(
                self.at(start),
                &format!("type tag `<{}` is missing `>`", word),
            ));
        }
        self.next_char();

        ScalarTag::parse(word).ok_or_else(|| {
            Error::lex(self.at(start), &format!("unknown type tag `<{}>`", word))
        })
    }

    /// Reads a raw literal after `(` up to the first unescaped `)`, which is consumed.
    ///
    /// `\)` and `\\` are escapes; any other backslash is kept as written.
    fn paren_literal(&mut self, open: usize) -> Result<String> {
        let mut literal = String::new();
        while let Some(ch) = self.next_char() {
            match ch {
                ')' => return Ok(literal),
                '\\' => match self.peek_char() {
                    Some(escaped @ (')' | '\\')) => {
                        self.next_char();
                        literal.push(escaped);
                    }
                    _ => literal.push('\\'),
                },
                other => literal.push(other),
            }
        }
        Err(Error::Unterminated {
            at: self.at(open),
            delimiter: '(',
        })
    }

    /// Reads a `"..."` word; the opening quote is already consumed.
    ///
    /// `\"` and `\\` are escapes; any other backslash is kept as written.
    fn quoted_word(&mut self, open: usize) -> Result<String> {
        let mut word = String::new();
        while let Some(ch) = self.next_char() {
            match ch {
                '"' => return Ok(word),
                '\\' => match self.peek_char() {
                    Some(escaped @ ('"' | '\\')) => {
                        self.next_char();
                        word.push(escaped);
                    }
                    _ => word.push('\\'),
                },
                other => word.push(other),
            }
        }
        Err(Error::Unterminated {
            at: self.at(open),
            delimiter: '"',
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    fn kinds(input: &str) -> Vec<TokenKind> {
        tokenize(input)
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    fn ident(s: &str) -> TokenKind {
        TokenKind::Identifier(s.to_string())
    }

    fn lit(s: &str) -> TokenKind {
        TokenKind::Literal(s.to_string())
    }

    #[test]
    fn test_nested_object_tokens() {
        assert_eq!(
            kinds("user{id<u32>(1)}"),
            vec![
                ident("user"),
                TokenKind::LBrace,
                ident("id"),
                TokenKind::TypeTag(ScalarTag::U32),
                TokenKind::LParen,
                lit("1"),
                TokenKind::RParen,
                TokenKind::RBrace,
            ]
        );
    }

    #[test]
    fn test_words_inside_brackets_are_literals() {
        assert_eq!(
            kinds("tags<s16>[kotlin  jvm\n\tandroid]"),
            vec![
                ident("tags"),
                TokenKind::TypeTag(ScalarTag::Str(16)),
                TokenKind::LBracket,
                lit("kotlin"),
                lit("jvm"),
                lit("android"),
                TokenKind::RBracket,
            ]
        );
    }

    #[test]
    fn test_paren_literal_keeps_spaces_and_escapes() {
        assert_eq!(
            kinds(r"s<s32>( a b \) \\ \n )"),
            vec![
                ident("s"),
                TokenKind::TypeTag(ScalarTag::Str(32)),
                TokenKind::LParen,
                lit(r" a b ) \ \n "),
                TokenKind::RParen,
            ]
        );
    }

    #[test]
    fn test_quoted_words() {
        assert_eq!(
            kinds(r#""my key"<s8>["" "a \"b\""]"#),
            vec![
                ident("my key"),
                TokenKind::TypeTag(ScalarTag::Str(8)),
                TokenKind::LBracket,
                lit(""),
                lit("a \"b\""),
                TokenKind::RBracket,
            ]
        );
    }

    #[test]
    fn test_utf8_is_not_split() {
        assert_eq!(
            kinds("城市<s16>(北京)"),
            vec![
                ident("城市"),
                TokenKind::TypeTag(ScalarTag::Str(16)),
                TokenKind::LParen,
                lit("北京"),
                TokenKind::RParen,
            ]
        );
    }

    #[test]
    fn test_offsets() {
        let tokens = tokenize("a{b()}").unwrap();
        let offsets: Vec<usize> = tokens.iter().map(|t| t.offset).collect();
        assert_eq!(offsets, vec![0, 1, 2, 3, 4, 4, 5]);
    }

    #[test]
    fn test_malformed_tags() {
        for input in ["a<s>(x)", "a<x8>(1)", "a<i8 >(1)", "a<i8", "a<>(1)"] {
            let err = tokenize(input).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Lex, "input: {}", input);
            assert_eq!(err.position().unwrap().offset, 1);
        }
    }

    #[test]
    fn test_unterminated_delimiters() {
        let cases = [
            ("a<i8>(1", '('),
            ("a{b<i8>(1)", '{'),
            ("a<i8>[1 2", '['),
            ("\"abc", '"'),
        ];
        for (input, expected) in cases {
            match tokenize(input).unwrap_err() {
                Error::Unterminated { delimiter, .. } => assert_eq!(delimiter, expected),
                other => panic!("expected unterminated error, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_unterminated_points_at_innermost_opener() {
        let err = tokenize("a{b{c<i8>(1)}").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unterminated);
        assert_eq!(err.position().unwrap().offset, 1);

        let err = tokenize("a{b[").unwrap_err();
        assert_eq!(err.position().unwrap().offset, 3);
    }

    #[test]
    fn test_stray_and_mismatched_closers() {
        for input in ["a}", "a{]", "a>", "a)", "a[}"] {
            let err = tokenize(input).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Lex, "input: {}", input);
        }
    }

    #[test]
    fn test_empty_input() {
        assert!(tokenize("").unwrap().is_empty());
        assert!(tokenize(" \n\t\r ").unwrap().is_empty());
    }
}
