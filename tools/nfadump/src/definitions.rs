// Copyright 2018 Steven Bosnick
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE-2.0 or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms

use quicli::prelude::*;
use lexnfa::{self, Context};

/// The rules section of a lex specification.
#[derive(Debug, PartialEq)]
pub struct Rules {
    pub first_line: usize,
    pub text: String,
}

/// Define the macros from the definitions section of `text` and return the
/// rules section, or `None` if there is no `%%` line.
///
/// Blank lines, `%` directives and code to be copied to the output are
/// skipped. Code is either a line starting with whitespace or any line of a
/// `%{ ... %}` block.
pub fn read_definitions(ctx: &mut Context, text: &str) -> lexnfa::Result<Option<Rules>> {
    let mut lines = text.lines().enumerate();
    let mut in_code_block = false;

    while let Some((i, line)) = lines.next() {
        if in_code_block {
            in_code_block = !line.starts_with("%}");
            continue;
        }
        if line.starts_with("%{") {
            in_code_block = true;
            continue;
        }

        if line.starts_with("%%") {
            let rules: Vec<_> = lines.by_ref().map(|(_, line)| line).collect();
            return Ok(Some(Rules {
                first_line: i + 2,
                text: rules.join("\n"),
            }));
        }

        if line.trim().is_empty() || line.starts_with(char::is_whitespace) || line.starts_with('%') {
            continue;
        }

        debug!("macro definition on line {}", i + 1);
        ctx.define_macro(i + 1, line)?;
    }

    Ok(None)
}
