// Copyright 2018 Steven Bosnick
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE-2.0 or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms

use std::borrow::Cow;
use std::fmt::{self, Display};
use std::{io, result};

use failure::Fail;
use location::Location;

/// The exit status a driver uses after reporting an `Error`.
pub const EXIT_FAILURE: i32 = 1;

/// The kinds of failure that can occur while building an NFA.
///
/// Every one of these is fatal for the compilation run in which it occurs.
#[derive(Debug, Fail)]
pub enum ErrorKind {
    /// The state arena has no room for another NFA state.
    #[fail(display = "automaton too large: not enough memory for NFA")]
    AutomatonTooLarge,

    /// An internal consistency check failed.
    #[fail(display = "internal error: {}", _0)]
    Internal(&'static str),

    /// A logical rule line is longer than the input supplier allows.
    #[fail(display = "too many regular expressions or expression too long")]
    PatternTooLong,

    /// The accept-text pool is exhausted.
    #[fail(display = "accept-action text exhausted: too many characters in accept actions")]
    TooMuchAcceptText,

    /// A `|` action was given with no earlier action to share.
    #[fail(display = "the | action must follow a rule with an action")]
    NoPreviousAction,

    /// The regular expression does not follow the pattern grammar.
    #[fail(display = "malformed regular expression")]
    MalformedExpression,

    /// A parenthesized sub-expression has no closing `)`.
    #[fail(display = "missing close parenthesis")]
    MissingCloseParen,

    /// A `]` was found outside of a character class.
    #[fail(display = "missing [ in character class")]
    MissingClassOpen,

    /// A character class has no closing `]`.
    #[fail(display = "missing ] in character class")]
    MissingClassClose,

    /// A `^` was found somewhere other than the start of a pattern.
    #[fail(display = "^ must be at start of expression or after [")]
    MisplacedBol,

    /// A closure operator has nothing to repeat.
    #[fail(display = "+ ? or * must follow an expression or subexpression")]
    ClosureWithoutOperand,

    /// The end of a line was reached inside a quoted string.
    #[fail(display = "newline in quoted string, use \\n to get newline into expression")]
    UnterminatedString,

    /// A `{` macro reference has no closing `}`.
    #[fail(display = "missing }} in macro expansion")]
    MalformedMacroReference,

    /// A macro reference names a macro that has not been defined.
    #[fail(display = "macro {} doesn't exist", _0)]
    UndefinedMacro(String),

    /// Macro references are nested more deeply than the expansion stack allows.
    #[fail(display = "macro expansion nested too deeply")]
    MacroTooDeep,

    /// A macro definition line has no name.
    #[fail(display = "macro definition has no name")]
    MalformedMacroDefinition,

    /// The rules section contained no rules.
    #[fail(display = "no regular expressions were given")]
    NoRules,

    /// The input supplier failed to read a line.
    #[fail(display = "unable to read the input")]
    Io(#[cause] io::Error),
}

impl From<io::Error> for ErrorKind {
    fn from(err: io::Error) -> ErrorKind {
        ErrorKind::Io(err)
    }
}

/// The error type for building an NFA.
///
/// An `Error` is an `ErrorKind` together with the place in the input where
/// it was detected, when that is known. The source line is kept so that a
/// diagnostic can echo it with a caret under the offending column.
#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    location: Option<Location>,
    source_line: Vec<u8>,
}

impl Error {
    /// Create a new `Error` that is not tied to a place in the input.
    pub fn new(kind: ErrorKind) -> Error {
        Error {
            kind,
            location: None,
            source_line: Vec::new(),
        }
    }

    /// Create a new `Error` detected at `location` within `source_line`.
    pub fn at<S: Into<Vec<u8>>>(kind: ErrorKind, location: Location, source_line: S) -> Error {
        Error {
            kind,
            location: Some(location),
            source_line: source_line.into(),
        }
    }

    /// Gets the kind of the error.
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// Gets the location at which the error was detected.
    pub fn location(&self) -> Option<Location> {
        self.location
    }

    /// Gets the logical source line in which the error was detected.
    ///
    /// This is empty when the error has no location. Bytes that are not
    /// UTF-8 are shown as U+FFFD.
    pub fn source_line(&self) -> Cow<str> {
        String::from_utf8_lossy(&self.source_line)
    }

    pub(crate) fn source_bytes(&self) -> &[u8] {
        &self.source_line
    }

    /// Locate an error that has no location at the start of line `line`.
    pub(crate) fn or_at_line(mut self, line: usize) -> Error {
        if self.location.is_none() {
            self.location = Some(Location::new(line, 0));
        }
        self
    }

    /// The process exit status for a driver that stops on this error.
    ///
    /// Every error is fatal so this is always non-zero.
    pub fn exit_status(&self) -> i32 {
        EXIT_FAILURE
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Error {
        Error::new(kind)
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Error {
        Error::new(err.into())
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.location {
            Some(location) => write!(f, "line {}: {}", location.line(), self.kind),
            None => write!(f, "{}", self.kind),
        }
    }
}

impl Fail for Error {
    fn cause(&self) -> Option<&Fail> {
        self.kind.cause()
    }
}

/// A specialized Result type for building an NFA.
pub type Result<T> = result::Result<T, Error>;

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn error_display_includes_line_when_located() {
        let sut = Error::at(ErrorKind::MissingCloseParen, Location::new(7, 3), "(ab x");

        assert_eq!(sut.to_string(), "line 7: missing close parenthesis");
    }

    #[test]
    fn error_display_is_kind_without_location() {
        let sut: Error = ErrorKind::UndefinedMacro("DIGIT".into()).into();

        assert_eq!(sut.to_string(), "macro DIGIT doesn't exist");
        assert_eq!(sut.source_line(), "");
    }

    #[test]
    fn io_error_is_the_cause() {
        let io = io::Error::new(io::ErrorKind::Other, "disk on fire");
        let sut = Error::new(io.into());

        assert!(sut.cause().is_some());
    }

    #[test]
    fn or_at_line_keeps_an_existing_location() {
        let located = Error::at(ErrorKind::MissingClassClose, Location::new(3, 4), "[ab");
        let unlocated = Error::new(ErrorKind::NoRules);

        assert_eq!(located.or_at_line(9).location(), Some(Location::new(3, 4)));
        assert_eq!(unlocated.or_at_line(9).location(), Some(Location::new(9, 0)));
    }

    #[test]
    fn source_line_shows_raw_bytes_lossily() {
        let sut = Error::at(ErrorKind::MalformedExpression, Location::new(1, 3), &b"caf\xe9)"[..]);

        assert_eq!(sut.source_line(), "caf\u{fffd})");
        assert_eq!(sut.source_bytes(), b"caf\xe9)");
    }

    #[test]
    fn every_error_has_nonzero_exit_status() {
        let sut = Error::new(ErrorKind::MalformedMacroReference);

        assert_ne!(sut.exit_status(), 0);
    }
}
