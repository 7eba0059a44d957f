// Copyright 2018 Steven Bosnick
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE-2.0 or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms

//! Suppliers of logical rule lines.

use std::io::BufRead;

use error::{Error, ErrorKind, Result};
use location::Location;

/// The default limit on the length of a logical rule line, in bytes.
pub const DEFAULT_MAX_LINE_LEN: usize = 2048;

/// One logical line of the rules section.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct SourceLine {
    /// The number of the first physical line that makes up this line.
    pub number: usize,

    /// The bytes of the line, with continuation lines joined by `\n`.
    ///
    /// Patterns work on a byte alphabet so the text need not be UTF-8.
    pub text: Vec<u8>,
}

impl SourceLine {
    /// Create a new `SourceLine`.
    pub fn new<S: Into<Vec<u8>>>(number: usize, text: S) -> SourceLine {
        SourceLine {
            number,
            text: text.into(),
        }
    }
}

/// A supplier of logical rule lines.
///
/// Each call yields the next line of the rules section, or `None` once the
/// section is finished.
pub trait LineSource {
    /// Gets the next logical line.
    fn next_line(&mut self) -> Result<Option<SourceLine>>;
}

impl<'a, S: LineSource + ?Sized> LineSource for &'a mut S {
    fn next_line(&mut self) -> Result<Option<SourceLine>> {
        (**self).next_line()
    }
}

/// A `LineSource` that reads the rules section from a `BufRead`.
///
/// A physical line that starts with whitespace continues the previous
/// logical line. Blank lines are skipped, and a line starting with `%` ends
/// the rules section.
#[derive(Debug)]
pub struct RuleLines<R> {
    reader: R,
    lookahead: Option<SourceLine>,
    next_number: usize,
    max_len: usize,
    done: bool,
}

impl<R: BufRead> RuleLines<R> {
    /// Create a new `RuleLines` that numbers the first line it reads as
    /// line 1.
    pub fn new(reader: R) -> RuleLines<R> {
        RuleLines {
            reader,
            lookahead: None,
            next_number: 1,
            max_len: DEFAULT_MAX_LINE_LEN,
            done: false,
        }
    }

    /// Set the number of the first line to be read.
    pub fn first_line(mut self, number: usize) -> RuleLines<R> {
        self.next_number = number;
        self
    }

    /// Set the limit on the length of a logical line.
    pub fn max_len(mut self, max_len: usize) -> RuleLines<R> {
        self.max_len = max_len;
        self
    }

    fn physical_line(&mut self) -> Result<Option<SourceLine>> {
        if let Some(line) = self.lookahead.take() {
            return Ok(Some(line));
        }
        if self.done {
            return Ok(None);
        }

        let mut text = Vec::new();
        let read = self.reader.read_until(b'\n', &mut text)?;
        if read == 0 {
            self.done = true;
            return Ok(None);
        }

        while text.last() == Some(&b'\n') || text.last() == Some(&b'\r') {
            text.pop();
        }

        let number = self.next_number;
        self.next_number += 1;
        Ok(Some(SourceLine::new(number, text)))
    }
}

fn is_blank(text: &[u8]) -> bool {
    text.iter().all(u8::is_ascii_whitespace)
}

fn is_continuation(text: &[u8]) -> bool {
    text.first().map_or(false, u8::is_ascii_whitespace) && !is_blank(text)
}

impl<R: BufRead> LineSource for RuleLines<R> {
    fn next_line(&mut self) -> Result<Option<SourceLine>> {
        let mut line = loop {
            match self.physical_line()? {
                None => return Ok(None),
                Some(ref line) if line.text.first() == Some(&b'%') => {
                    self.done = true;
                    return Ok(None);
                }
                Some(ref line) if is_blank(&line.text) => continue,
                Some(line) => break line,
            }
        };

        loop {
            match self.physical_line()? {
                Some(ref next) if is_continuation(&next.text) => {
                    line.text.push(b'\n');
                    line.text.extend_from_slice(&next.text);
                }
                next => {
                    self.lookahead = next;
                    break;
                }
            }
        }

        if line.text.len() > self.max_len {
            let location = Location::new(line.number, self.max_len);
            return Err(Error::at(ErrorKind::PatternTooLong, location, line.text));
        }

        trace!("rule line {}: {}", line.number, String::from_utf8_lossy(&line.text));
        Ok(Some(line))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn lines(input: &str) -> Vec<SourceLine> {
        let mut sut = RuleLines::new(input.as_bytes());
        let mut lines = Vec::new();
        while let Some(line) = sut.next_line().unwrap() {
            lines.push(line);
        }
        lines
    }

    #[test]
    fn yields_each_rule_line_with_its_number() {
        let result = lines("a  A;\nb  B;\n");

        assert_eq!(
            result,
            vec![SourceLine::new(1, "a  A;"), SourceLine::new(2, "b  B;")]
        );
    }

    #[test]
    fn skips_blank_lines() {
        let result = lines("\n  \na  A;\n\n\nb  B;");

        assert_eq!(
            result,
            vec![SourceLine::new(3, "a  A;"), SourceLine::new(6, "b  B;")]
        );
    }

    #[test]
    fn joins_continuation_lines() {
        let result = lines("a  {\n    x();\n  }\nb  B;\n");

        assert_eq!(
            result,
            vec![
                SourceLine::new(1, "a  {\n    x();\n  }"),
                SourceLine::new(4, "b  B;"),
            ]
        );
    }

    #[test]
    fn percent_line_ends_rules() {
        let mut sut = RuleLines::new("a  A;\n%%\nb  B;\n".as_bytes());

        assert_matches!(sut.next_line(), Ok(Some(_)));
        assert_matches!(sut.next_line(), Ok(None));
        assert_matches!(sut.next_line(), Ok(None));
    }

    #[test]
    fn first_line_offsets_numbering() {
        let mut sut = RuleLines::new("a  A;\n".as_bytes()).first_line(10);

        let line = sut.next_line().unwrap().unwrap();

        assert_eq!(line.number, 10);
    }

    #[test]
    fn strips_carriage_returns() {
        let result = lines("a  A;\r\n");

        assert_eq!(result, vec![SourceLine::new(1, "a  A;")]);
    }

    #[test]
    fn keeps_bytes_that_are_not_utf8() {
        let mut sut = RuleLines::new(&b"caf\xe9  CAFE;\n"[..]);

        let line = sut.next_line().unwrap().unwrap();

        assert_eq!(line.text, b"caf\xe9  CAFE;".to_vec());
    }

    #[test]
    fn long_line_is_error() {
        let mut sut = RuleLines::new("abcdefgh  X;\n".as_bytes()).max_len(8);

        let err = sut.next_line().unwrap_err();

        assert_matches!(*err.kind(), ErrorKind::PatternTooLong);
        assert_eq!(err.location(), Some(Location::new(1, 8)));
    }
}
