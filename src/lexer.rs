// Copyright 2018 Steven Bosnick
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE-2.0 or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms

//! The scanner for the pattern language.
//!
//! The lexer turns rule lines into a stream of single-character tokens.
//! Macro references and quoted strings are handled here, so the parser sees
//! the same kind of token whether a character came from the rule line, from
//! a macro body or from inside quotes.
//!
//! Macro bodies are scanned in place. Expanding `{name}` saves the position
//! just after the reference on a bounded stack and continues with the body;
//! reaching the end of a body pops back to the saved position. Unquoted
//! whitespace inside a macro body is an error, since the rest of the body
//! would otherwise be taken as the accept action.
//!
//! Lines are scanned as bytes, so a pattern may hold any of the 256
//! characters whether or not the line is valid UTF-8.

use std::borrow::Cow;

use arrayvec::ArrayVec;

use error::{Error, ErrorKind, Result};
use input::LineSource;
use location::Location;
use macros::MacroTable;
use token::{decode_escape, Token};

/// The maximum nesting depth of macro references.
pub const MAX_MACRO_DEPTH: usize = 32;

/// A scanning position in either the current line (`text` is `None`) or
/// a macro body.
#[derive(Clone, Copy, Debug)]
struct Cursor<'m> {
    text: Option<&'m str>,
    pos: usize,
}

impl<'m> Cursor<'m> {
    fn line(pos: usize) -> Cursor<'m> {
        Cursor { text: None, pos }
    }
}

/// The pattern scanner.
///
/// After `advance()` the current token is available from `token()` and, for
/// literals, the decoded character from `lexeme()`.
pub struct Lexer<'m, S> {
    source: S,
    macros: &'m MacroTable,
    line: Vec<u8>,
    line_number: usize,
    cursor: Cursor<'m>,
    stack: ArrayVec<[Cursor<'m>; MAX_MACRO_DEPTH]>,
    in_quote: bool,
    token: Token,
    lexeme: u8,
    column: usize,
}

impl<'m, S: LineSource> Lexer<'m, S> {
    /// Create a new `Lexer` for the lines from `source`.
    ///
    /// No line is read until the first call to `advance()`.
    pub fn new(source: S, macros: &'m MacroTable) -> Lexer<'m, S> {
        Lexer {
            source,
            macros,
            line: Vec::new(),
            line_number: 0,
            cursor: Cursor::line(0),
            stack: ArrayVec::new(),
            in_quote: false,
            token: Token::EndOfString,
            lexeme: 0,
            column: 0,
        }
    }

    /// Gets the current token.
    pub fn token(&self) -> Token {
        self.token
    }

    /// Gets the character value of the current token.
    pub fn lexeme(&self) -> u8 {
        self.lexeme
    }

    /// Gets the number of the line being scanned.
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Gets the text of the line being scanned.
    pub fn line(&self) -> &[u8] {
        &self.line
    }

    /// Gets the column in the line at which the current token starts.
    ///
    /// For a token from a macro body this is the position just after the
    /// outermost macro reference.
    pub fn column(&self) -> usize {
        self.column
    }

    /// Move to the next token.
    ///
    /// Advancing past the end of a pattern reads the next line from the
    /// source. Once the source is exhausted the token is
    /// `Token::EndOfInput`.
    pub fn advance(&mut self) -> Result<Token> {
        match self.token {
            Token::EndOfInput => return Ok(Token::EndOfInput),
            Token::EndOfString => {
                if !self.next_line()? {
                    self.column = 0;
                    return Ok(self.set(Token::EndOfInput, 0));
                }
            }
            _ => {}
        }

        loop {
            match self.peek() {
                None => match self.stack.pop() {
                    Some(cursor) => self.cursor = cursor,
                    None if self.in_quote => return Err(self.fail(ErrorKind::UnterminatedString)),
                    None => {
                        self.column = self.base_position();
                        return Ok(self.set(Token::EndOfString, 0));
                    }
                },
                Some(b'{') if !self.in_quote => self.expand_macro()?,
                Some(b'"') => {
                    self.in_quote = !self.in_quote;
                    self.cursor.pos += 1;
                }
                Some(_) => break,
            }
        }

        self.column = self.base_position();

        let (lexeme, len, escaped) = {
            let rest = &self.text()[self.cursor.pos..];
            let c = rest[0];
            if self.in_quote {
                if c == b'\\' && rest.get(1) == Some(&b'"') {
                    (b'"', 2, true)
                } else {
                    (c, 1, false)
                }
            } else if c.is_ascii_whitespace() {
                if !self.stack.is_empty() {
                    return Err(self.fail(ErrorKind::MalformedExpression));
                }
                return Ok(self.set(Token::EndOfString, 0));
            } else if c == b'\\' {
                let (value, used) = decode_escape(&rest[1..]);
                (value, 1 + used, true)
            } else {
                (c, 1, false)
            }
        };

        self.cursor.pos += len;
        let token = if self.in_quote || escaped {
            Token::Literal
        } else {
            Token::classify(lexeme)
        };
        Ok(self.set(token, lexeme))
    }

    /// Take the accept action that follows the pattern on the current line.
    ///
    /// The action is the rest of the line with surrounding whitespace
    /// removed. The rest of the line is consumed, so the next call to
    /// `advance()` reads a new line. Bytes that are not UTF-8 are replaced
    /// by U+FFFD.
    pub fn action(&mut self) -> Cow<str> {
        let base = self.base_position();
        self.stack.clear();
        self.in_quote = false;
        self.cursor = Cursor::line(self.line.len());
        self.token = Token::EndOfString;

        let rest = self.line.get(base..).unwrap_or(&[]);
        String::from_utf8_lossy(trim(rest))
    }

    /// Create an `Error` located at the current token.
    pub fn error(&self, kind: ErrorKind) -> Error {
        Error::at(
            kind,
            Location::new(self.line_number, self.column),
            self.line.clone(),
        )
    }

    fn fail(&mut self, kind: ErrorKind) -> Error {
        self.column = self.base_position();
        self.error(kind)
    }

    fn set(&mut self, token: Token, lexeme: u8) -> Token {
        self.token = token;
        self.lexeme = lexeme;
        token
    }

    fn next_line(&mut self) -> Result<bool> {
        self.stack.clear();
        self.in_quote = false;

        loop {
            let line = match self.source.next_line() {
                Ok(Some(line)) => line,
                Ok(None) => return Ok(false),
                Err(err) => return Err(err.or_at_line(self.line_number)),
            };
            let indent = match line.text.iter().position(|c| !c.is_ascii_whitespace()) {
                Some(indent) => indent,
                None => continue,
            };

            self.cursor = Cursor::line(indent);
            self.line_number = line.number;
            self.line = line.text;
            return Ok(true);
        }
    }

    fn text(&self) -> &[u8] {
        match self.cursor.text {
            Some(text) => text.as_bytes(),
            None => &self.line,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.text().get(self.cursor.pos).cloned()
    }

    fn base_position(&self) -> usize {
        self.stack
            .first()
            .map(|cursor| cursor.pos)
            .unwrap_or(self.cursor.pos)
    }

    fn expand_macro(&mut self) -> Result<()> {
        let start = self.cursor.pos + 1;
        let close = match self.text()[start..].iter().position(|&c| c == b'}') {
            Some(offset) => start + offset,
            None => return Err(self.fail(ErrorKind::MalformedMacroReference)),
        };

        let macros = self.macros;
        let name = String::from_utf8_lossy(&self.text()[start..close]).into_owned();
        trace!("expand macro {{{}}}", name);
        let body = match macros.expand(&name) {
            Ok(body) => body,
            Err(kind) => return Err(self.fail(kind)),
        };

        let resume = Cursor {
            text: self.cursor.text,
            pos: close + 1,
        };
        if self.stack.try_push(resume).is_err() {
            return Err(self.fail(ErrorKind::MacroTooDeep));
        }
        self.cursor = Cursor {
            text: Some(body),
            pos: 0,
        };
        Ok(())
    }
}

fn trim(bytes: &[u8]) -> &[u8] {
    let start = bytes
        .iter()
        .position(|c| !c.is_ascii_whitespace())
        .unwrap_or_else(|| bytes.len());
    let end = bytes
        .iter()
        .rposition(|c| !c.is_ascii_whitespace())
        .map_or(start, |i| i + 1);
    &bytes[start..end]
}
