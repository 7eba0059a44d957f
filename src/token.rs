// Copyright 2018 Steven Bosnick
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE-2.0 or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms

//! The tokens of the pattern language and the escape sequences that can
//! appear in a pattern.

/// The kind of a single token of a pattern.
///
/// Every token is exactly one (decoded) input character.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Token {
    /// The end of the pattern on the current line.
    EndOfString,
    /// A character that stands for itself.
    Literal,
    /// `.`
    Any,
    /// `[`
    ClassStart,
    /// `]`
    ClassEnd,
    /// `(`
    OpenParen,
    /// `)`
    CloseParen,
    /// `{`
    OpenCurly,
    /// `}`
    CloseCurly,
    /// `*`
    Closure,
    /// `+`
    PlusClosure,
    /// `?`
    Optional,
    /// `|`
    Or,
    /// `^`
    AtBol,
    /// `$`
    AtEol,
    /// `-`
    Dash,
    /// There are no more rules.
    EndOfInput,
}

lazy_static! {
    static ref TOKEN_MAP: [Token; 256] = {
        let mut map = [Token::Literal; 256];
        map[b'$' as usize] = Token::AtEol;
        map[b'(' as usize] = Token::OpenParen;
        map[b')' as usize] = Token::CloseParen;
        map[b'*' as usize] = Token::Closure;
        map[b'+' as usize] = Token::PlusClosure;
        map[b'-' as usize] = Token::Dash;
        map[b'.' as usize] = Token::Any;
        map[b'?' as usize] = Token::Optional;
        map[b'[' as usize] = Token::ClassStart;
        map[b']' as usize] = Token::ClassEnd;
        map[b'^' as usize] = Token::AtBol;
        map[b'{' as usize] = Token::OpenCurly;
        map[b'|' as usize] = Token::Or;
        map[b'}' as usize] = Token::CloseCurly;
        map
    };
}

impl Token {
    /// Classify an unescaped, unquoted character.
    pub fn classify(c: u8) -> Token {
        TOKEN_MAP[c as usize]
    }
}

/// Decode the escape sequence at the start of `input`.
///
/// `input` starts just after a backslash. Returns the decoded character and
/// the number of bytes of `input` it used. An empty `input` (a backslash at
/// the end of the text) decodes to a backslash.
pub fn decode_escape(input: &[u8]) -> (u8, usize) {
    let c = match input.first() {
        Some(&c) => c,
        None => return (b'\\', 0),
    };

    match c {
        b'b' => (0x08, 1),
        b'f' => (0x0c, 1),
        b'n' => (b'\n', 1),
        b'r' => (b'\r', 1),
        b's' => (b' ', 1),
        b't' => (b'\t', 1),
        b'e' => (0x1b, 1),
        b'^' => match input.get(1) {
            Some(&ctrl) => (ctrl & 0x1f, 2),
            None => (b'^', 1),
        },
        b'x' | b'X' => {
            let digits = input[1..]
                .iter()
                .take(2)
                .take_while(|c| c.is_ascii_hexdigit())
                .count();
            let value = input[1..1 + digits]
                .iter()
                .fold(0_u32, |acc, &c| acc * 16 + hex_value(c));
            (value as u8, 1 + digits)
        }
        b'0'..=b'7' => {
            let digits = input
                .iter()
                .take(3)
                .take_while(|&&c| c >= b'0' && c <= b'7')
                .count();
            let value = input[..digits]
                .iter()
                .fold(0_u32, |acc, &c| acc * 8 + u32::from(c - b'0'));
            (value as u8, digits)
        }
        other => (other, 1),
    }
}

fn hex_value(c: u8) -> u32 {
    match c {
        b'0'..=b'9' => u32::from(c - b'0'),
        b'a'..=b'f' => u32::from(c - b'a' + 10),
        b'A'..=b'F' => u32::from(c - b'A' + 10),
        _ => 0,
    }
}
