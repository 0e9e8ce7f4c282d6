// Copyright (c) 2021 James O. D. Hunt.
//
// SPDX-License-Identifier: Apache-2.0
//

#![deny(missing_docs)]
#![forbid(unsafe_code)]

//! Runtime engine for generated command-line argument parsers.
//!
//! A parser generator knows everything about a program's command line ahead
//! of time: the option names, which of them take values, the types of the
//! values and the help text. What it emits is data (an option table and a
//! help markup string) plus one handler function. This crate is everything
//! else: the code that every generated parser shares.
//!
//! ---
//!
//! Table of contents:
//!
//! * [Overview](#overview)
//! * [Quickstart](#quickstart)
//! * [Details](#details)
//! * [Terminology](#terminology)
//! * [Option tables](#option-tables)
//! * [Help markup](#help-markup)
//! * [Summary of features and behaviour](#summary-of-features-and-behaviour)
//! * [Limitations](#limitations)
//!
//! ---
//!
//! # Overview
//!
//! The parse is driven by [App]. It splits the command line into [Token]s,
//! resolves each option to a code through an [OptionTable] and calls a
//! [Handler] with that code. The handler reads and converts the option
//! value (see the [values] module), stores it and tells the dispatcher how
//! to carry on with an [Outcome].
//!
//! Problems are reported the way command-line users expect: the brief usage
//! text followed by a one-line diagnostic on the error stream. Help requests
//! write the full help text, word wrapped to the console width by the
//! [help] module.
//!
//! # Quickstart
//!
//! 1. Create an `enum` with one code per option, and the option tables.
//!
//!    Long option patterns mark where the mandatory part of the name ends
//!    with [ABBREVIATION_MARKER], so `--jobs` may be given as `--j`, `--jo`,
//!    `--job` or `--jobs`.
//!
//! 1. Create a `struct` holding the default value of every option and
//!    implement the [Handler] trait for it.
//!
//! 1. Create an [App] and parse the command line.
//!
//! ```rust
//! use argen::values::{parse_value, read_value};
//! use argen::{
//!     App, AutoTerminate, Handler, OptionTable, Outcome, Result, Status, Token, Tokenizer,
//! };
//!
//! #[derive(Clone, Copy, Debug, PartialEq)]
//! enum Code {
//!     Help,
//!     Jobs,
//!     Verbose,
//! }
//!
//! const LONG: &[(&str, Code)] = &[
//!     ("--h\u{1}elp", Code::Help),
//!     ("--j\u{1}obs", Code::Jobs),
//!     ("--v\u{1}erbose", Code::Verbose),
//! ];
//!
//! const SHORT: &[(char, Code)] = &[('h', Code::Help), ('j', Code::Jobs), ('v', Code::Verbose)];
//!
//! #[derive(Debug, Default)]
//! struct Arguments {
//!     jobs: u32,
//!     verbose: bool,
//!     files: Vec<String>,
//! }
//!
//! impl Handler for Arguments {
//!     type Code = Code;
//!
//!     fn handle<'a>(
//!         &mut self,
//!         code: Code,
//!         token: &Token<'a>,
//!         tokens: &mut Tokenizer<'a>,
//!     ) -> Result<Outcome> {
//!         match code {
//!             Code::Help => return Ok(Outcome::Abort(Status::HelpRequested)),
//!             Code::Jobs => self.jobs = parse_value(read_value(tokens, token)?, token)?,
//!             Code::Verbose => self.verbose = true,
//!         }
//!
//!         Ok(Outcome::Normal)
//!     }
//!
//!     fn arguments(&mut self, values: Vec<&str>) -> Result<()> {
//!         self.files = values.into_iter().map(String::from).collect();
//!
//!         Ok(())
//!     }
//! }
//!
//! fn main() {
//!     let app = App::new(OptionTable::new(LONG, SHORT))
//!         .usage("usage: ${PROGRAM} \u{1}[-h] [-j\u{2}N] [-v] FILE...\n")
//!         .arguments(1, None);
//!
//!     let parsed = app.parse_with_args(
//!         &["/usr/bin/prog", "-vj4", "a.txt", "b.txt"],
//!         Arguments::default(),
//!         &mut std::io::stdout(),
//!         &mut std::io::stderr(),
//!     );
//!
//!     if let Some(code) = parsed.exit_code(AutoTerminate::AfterHelpOrError) {
//!         std::process::exit(code);
//!     }
//!
//!     assert!(parsed.values.verbose);
//!     assert_eq!(parsed.values.jobs, 4);
//!     assert_eq!(parsed.values.files, vec!["a.txt", "b.txt"]);
//! }
//! ```
//!
//! For a complete program, try out the demo in the `demos/` directory:
//!
//! ```bash
//! $ cargo run --example unit-test-runner -- --help
//! $ cargo run --example unit-test-runner -- -ev --size=3x4 --host example.com suite1 suite2
//! ```
//!
//! # Details
//!
//! ## Terminology
//!
//! - A "long option" starts with two dashes (`--verbose`). Its value may be
//!   attached (`--file=FILE`) or given as the next argument (`--file FILE`).
//!   Long options may be abbreviated as far as the option table allows.
//!
//! - A "short option" is a dash followed by one character (`-v`). Short
//!   options may be clustered (`-ev` is `-e -v`) and the last one of a
//!   cluster may take the rest of the argument as its value (`-lFILE`).
//!
//! - A "positional argument" is any argument that is not an option,
//!   including the empty string.
//!
//! - The special option `--` is reserved to mean "end of all options": all
//!   arguments that follow it are positional arguments, even if they start
//!   with a dash. The lone `-` is an option by convention meaning "standard
//!   input"; it is looked up in the long option table.
//!
//! ## Option tables
//!
//! An [OptionTable] holds two sorted slices:
//!
//! - `(pattern, code)` pairs for long options, sorted under
//!   [compare_flag()].
//! - `(character, code)` pairs for short options, sorted by upper-cased
//!   character.
//!
//! Lookup is a binary search, so the tables must be sorted and no two
//! patterns may accept the same abbreviation. [OptionTable::validate()]
//! checks this and [OptionTable::new()] asserts it in debug builds.
//!
//! ## Help markup
//!
//! Help and usage text are plain text with a few control characters, see the
//! [help] module. `${PROGRAM}` is replaced by the base name of `argv[0]`.
//!
//! # Summary of features and behaviour
//!
//! - Arguments are parsed in order and each option is handled immediately.
//! - Options and positional arguments may be intermingled.
//! - Long option abbreviations are resolved with a single binary search.
//! - Option values are converted with [FromStr](std::str::FromStr), split
//!   into fixed-size tuples or lists, accumulated, and checked against legal
//!   values or [ValueRange](values::ValueRange)s.
//! - Options can be declared as mandatory ([App::required()]) and the number
//!   of positional arguments can be bounded ([App::arguments()]).
//! - Unknown options are errors by default, but can be ignored or passed on
//!   as positional arguments ([UnknownOptionMode]).
//! - The first error stops the parse. The brief usage text and a diagnostic
//!   are written to the error stream.
//! - The parser never terminates the process: [Parsed::exit_code()] tells
//!   the caller which exit code to use, if any.
//! - Parser activity is logged with [tracing](https://crates.io/crates/tracing)
//!   at `debug` and `trace` level.
//!
//! # Limitations
//!
//! - Option names are compared ignoring ASCII case only.
//! - Options with optional values are not supported.
//!
//!   **Explanation:** An option either always reads a value or never does.
//!   `--flag=VALUE` for an option that never reads a value is an error.
//!
//! - The option tables are static data. Options cannot be added while
//!   parsing.

mod args;
mod error;
pub mod help;
mod matcher;
mod tokenizer;
pub mod values;

pub use error::{Error, Result};

pub use args::{
    get_args, App, AutoTerminate, Handler, Outcome, Parsed, Settings, Status, UnknownOptionMode,
    EINVAL,
};

pub use matcher::{compare_flag, find_flag, find_short_flag, OptionTable, ABBREVIATION_MARKER};

pub use tokenizer::{Cursor, Token, Tokenizer};
