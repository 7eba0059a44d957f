// Copyright 2018 Steven Bosnick
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE-2.0 or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms

//! Reporting of fatal errors.
//!
//! A report names the line of the error, echoes the offending source line
//! and marks the error column with a caret:
//!
//! ```text
//! ERROR (line 12) missing close parenthesis
//! (ab|cd  return(X);
//! ______^
//! ```

use std::io::{self, Write};
use std::process;

use failure::Fail;

use error::Error;

/// Write a report of `error` to `out`.
pub fn report<W: Write>(error: &Error, out: &mut W) -> io::Result<()> {
    match error.location() {
        Some(location) => {
            writeln!(out, "ERROR (line {}) {}", location.line(), error.kind())?;

            if !error.source_bytes().is_empty() {
                let (text, column) = physical_line(error.source_bytes(), location.column());
                writeln!(out, "{}", text)?;
                writeln!(out, "{}^", "_".repeat(column))?;
            }
        }
        None => writeln!(out, "ERROR {}", error.kind())?,
    }

    if let Some(cause) = error.cause() {
        writeln!(out, "caused by: {}", cause)?;
    }
    Ok(())
}

/// Report `error` on standard error and terminate the process.
///
/// The exit status is the error's `exit_status()`, which is never zero.
pub fn fatal(error: &Error) -> ! {
    let stderr = io::stderr();
    let mut out = stderr.lock();
    if let Err(err) = report(error, &mut out) {
        error!("unable to report error: {}", err);
    }
    process::exit(error.exit_status())
}

// A logical line may span several physical lines. Find the physical line
// that holds the byte offset `column` and the character column of that
// offset within it.
fn physical_line(bytes: &[u8], column: usize) -> (String, usize) {
    let column = column.min(bytes.len());

    let start = bytes[..column]
        .iter()
        .rposition(|&c| c == b'\n')
        .map(|i| i + 1)
        .unwrap_or(0);
    let end = bytes[column..]
        .iter()
        .position(|&c| c == b'\n')
        .map(|i| column + i)
        .unwrap_or_else(|| bytes.len());

    (
        String::from_utf8_lossy(&bytes[start..end]).into_owned(),
        String::from_utf8_lossy(&bytes[start..column]).chars().count(),
    )
}
