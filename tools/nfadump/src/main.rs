// Copyright 2018 Steven Bosnick
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE-2.0 or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms

#[macro_use]
extern crate quicli;

extern crate lexnfa;

mod definitions;

use std::path::PathBuf;
use quicli::prelude::*;
use quicli::fs;
use lexnfa::{diagnostics, Config, Context, RuleLines};

/// Build the NFA for the rules of a lex specification and print it.
#[derive(Debug, StructOpt)]
struct Cli {
    /// The lex specification to read.
    #[structopt(parse(from_os_str))]
    input: PathBuf,

    /// The maximum number of NFA states.
    #[structopt(long = "max-states")]
    max_states: Option<usize>,

    /// The number of bytes available for accept actions.
    #[structopt(long = "max-accept-text")]
    max_accept_text: Option<usize>,

    /// The maximum length of a rule, in bytes.
    #[structopt(long = "max-rule-len")]
    max_rule_len: Option<usize>,

    /// Print the macro table before the NFA.
    #[structopt(short = "m", long = "macros")]
    macros: bool,

    /// Pass many times for more log output.
    #[structopt(long = "verbose", short = "v", parse(from_occurrences))]
    verbosity: u8,
}

impl Cli {
    fn config(&self) -> Config {
        let mut config = Config::new();
        if let Some(limit) = self.max_states {
            config = config.max_states(limit);
        }
        if let Some(limit) = self.max_accept_text {
            config = config.max_accept_text(limit);
        }
        config
    }
}

main!(|args: Cli, log_level: verbosity| {
    let text = fs::read_file(&args.input)?;
    let mut ctx = Context::with_config(args.config());

    let rules = match definitions::read_definitions(&mut ctx, &text) {
        Ok(Some(rules)) => rules,
        Ok(None) => bail!("no %% line in {}", args.input.display()),
        Err(err) => diagnostics::fatal(&err),
    };

    if args.macros {
        print!("{}", ctx.macros());
    }

    let mut source = RuleLines::new(rules.text.as_bytes()).first_line(rules.first_line);
    if let Some(limit) = args.max_rule_len {
        source = source.max_len(limit);
    }

    match ctx.thompson(source) {
        Ok(nfa) => {
            info!(
                "{} rules, {} live states",
                nfa.rules().count(),
                nfa.live_states()
            );
            print!("{}", nfa);
        }
        Err(err) => diagnostics::fatal(&err),
    }
});
