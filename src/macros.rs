// Copyright 2018 Steven Bosnick
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE-2.0 or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms

//! Named pattern fragments that are referenced as `{name}` in a rule.
//!
//! A macro body is not checked or expanded when it is defined. A reference
//! to another macro inside a body is resolved when the referencing rule is
//! scanned, so within the definitions section macros may be defined in any
//! order.

use std::collections::BTreeMap;
use std::fmt::{self, Display};
use std::result;

use error::ErrorKind;

/// A table of macro definitions, keyed (case-sensitively) by name.
#[derive(Clone, Debug, Default)]
pub struct MacroTable {
    macros: BTreeMap<String, String>,
}

impl MacroTable {
    /// Create an empty `MacroTable`.
    pub fn new() -> MacroTable {
        MacroTable {
            macros: BTreeMap::new(),
        }
    }

    /// Define (or redefine) the macro `name`.
    ///
    /// Whitespace around `text` is removed; whitespace inside it is kept.
    pub fn define<N, T>(&mut self, name: N, text: T)
    where
        N: Into<String>,
        T: AsRef<str>,
    {
        let name = name.into();
        let text = text.as_ref().trim();
        trace!("define macro {} as \"{}\"", name, text);
        self.macros.insert(name, text.to_string());
    }

    /// Define a macro from a definition line of the form `name replacement`.
    ///
    /// The name runs up to the first whitespace and the replacement is the
    /// rest of the line.
    pub fn define_line(&mut self, line: &str) -> result::Result<(), ErrorKind> {
        let line = line.trim_start();
        let split = line.find(char::is_whitespace).unwrap_or_else(|| line.len());
        let (name, text) = line.split_at(split);

        if name.is_empty() {
            return Err(ErrorKind::MalformedMacroDefinition);
        }

        self.define(name, text);
        Ok(())
    }

    /// Gets the replacement text of the macro `name`.
    pub fn expand(&self, name: &str) -> result::Result<&str, ErrorKind> {
        self.macros
            .get(name)
            .map(|text| text.as_str())
            .ok_or_else(|| ErrorKind::UndefinedMacro(name.to_string()))
    }

    /// Check if the macro `name` is defined.
    pub fn contains(&self, name: &str) -> bool {
        self.macros.contains_key(name)
    }

    /// The number of macros defined.
    pub fn len(&self) -> usize {
        self.macros.len()
    }

    /// Check if no macros are defined.
    pub fn is_empty(&self) -> bool {
        self.macros.is_empty()
    }

    /// Iterate over the definitions in name order.
    pub fn iter<'a>(&'a self) -> impl Iterator<Item = (&'a str, &'a str)> + 'a {
        self.macros
            .iter()
            .map(|(name, text)| (name.as_str(), text.as_str()))
    }
}

impl Display for MacroTable {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "--------------- MACRO TABLE ---------------")?;
        for (name, text) in self.iter() {
            writeln!(f, "{:<16}--[{}]--", name, text)?;
        }
        writeln!(f, "-------------------------------------------")
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn expand_returns_definition() {
        let mut sut = MacroTable::new();
        sut.define("DIGIT", "[0-9]");

        assert_eq!(sut.expand("DIGIT").unwrap(), "[0-9]");
    }

    #[test]
    fn define_strips_surrounding_whitespace_only() {
        let mut sut = MacroTable::new();
        sut.define("WS", "  \t[ ]  x \t ");

        assert_eq!(sut.expand("WS").unwrap(), "[ ]  x");
    }

    #[test]
    fn last_definition_wins() {
        let mut sut = MacroTable::new();
        sut.define("D", "[0-9]");
        sut.define("D", "[0-7]");

        assert_eq!(sut.expand("D").unwrap(), "[0-7]");
        assert_eq!(sut.len(), 1);
    }

    #[test]
    fn names_are_case_sensitive() {
        let mut sut = MacroTable::new();
        sut.define("digit", "[0-9]");

        assert!(sut.contains("digit"));
        assert!(!sut.contains("DIGIT"));
    }

    #[test]
    fn expand_undefined_is_error() {
        let sut = MacroTable::new();

        let result = sut.expand("NOPE");

        assert_matches!(result, Err(ErrorKind::UndefinedMacro(ref name)) if name == "NOPE");
    }

    #[test]
    fn define_line_splits_name_and_replacement() {
        let mut sut = MacroTable::new();

        sut.define_line("LETTER\t\t[a-zA-Z_]").unwrap();

        assert_eq!(sut.expand("LETTER").unwrap(), "[a-zA-Z_]");
    }

    #[test]
    fn define_line_without_body_defines_empty_macro() {
        let mut sut = MacroTable::new();

        sut.define_line("EMPTY").unwrap();

        assert_eq!(sut.expand("EMPTY").unwrap(), "");
    }

    #[test]
    fn define_line_without_name_is_error() {
        let mut sut = MacroTable::new();

        assert_matches!(sut.define_line("   "), Err(ErrorKind::MalformedMacroDefinition));
        assert!(sut.is_empty());
    }

    #[test]
    fn display_lists_macros_in_name_order() {
        let mut sut = MacroTable::new();
        sut.define("B", "b");
        sut.define("A", "a");

        let listing = sut.to_string();

        let a = listing.find("--[a]--").unwrap();
        let b = listing.find("--[b]--").unwrap();
        assert!(a < b);
    }
}
