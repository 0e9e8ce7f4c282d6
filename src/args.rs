// Copyright (c) 2021 James O. D. Hunt.
//
// SPDX-License-Identifier: Apache-2.0
//

use std::borrow::Cow;
use std::env;
use std::fmt;
use std::io::{self, Write};

use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::help::write_help_text;
use crate::matcher::OptionTable;
use crate::tokenizer::{Token, Tokenizer};

/// Exit code for a failed parse ("invalid argument").
pub const EINVAL: i32 = 22;

/// What the dispatcher should do after a handler dealt with an option.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Outcome {
    /// Carry on scanning.
    Normal,
    /// Stop looking for options: everything left on the command line is a
    /// positional argument (`--`).
    Final,
    /// Stop parsing with the given terminal status (help, version...).
    Abort(Status),
}

/// The terminal status of a parse.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Status {
    /// All arguments were parsed.
    Ok,
    /// An error was reported on the error stream.
    Error,
    /// The help text was written to the output stream.
    HelpRequested,
    /// The version was requested.
    VersionRequested,
    /// Some other option ended the parse early.
    Aborted(&'static str),
}

impl Default for Status {
    fn default() -> Self {
        Status::Ok
    }
}

/// How to deal with options that are not in the option table.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum UnknownOptionMode {
    /// Fail the parse.
    TreatAsError,
    /// Skip the option (and any value attached to it).
    Ignore,
    /// Pass the argument on as a positional argument. For a short option
    /// clustered behind known ones (`-ex`) only the unknown letter and the
    /// letters after it are passed on (`-x`).
    TreatAsArgument,
}

impl Default for UnknownOptionMode {
    fn default() -> Self {
        UnknownOptionMode::TreatAsError
    }
}

/// When the caller should terminate the process after a parse.
///
/// See [Parsed::exit_code()].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AutoTerminate {
    /// Always return to the caller.
    Never,
    /// Exit after help, version or another aborting option.
    AfterHelp,
    /// Exit after an error.
    AfterError,
    /// Exit after either.
    AfterHelpOrError,
}

impl AutoTerminate {
    fn after_help(&self) -> bool {
        matches!(self, AutoTerminate::AfterHelp | AutoTerminate::AfterHelpOrError)
    }

    fn after_error(&self) -> bool {
        matches!(self, AutoTerminate::AfterError | AutoTerminate::AfterHelpOrError)
    }
}

/// Trait that an argument handler must implement.
///
/// The handler is the result structure of the parse: it starts out holding
/// the default value of every option and the dispatcher hands it back, in
/// [Parsed], once the parse is over.
pub trait Handler {
    /// The option codes used in the [OptionTable].
    type Code: Copy + PartialEq + fmt::Debug;

    /// Function that will handle all options found in the option table.
    ///
    /// # Parameters
    ///
    /// - `code`: The code the option resolved to.
    /// - `token`: The option as typed by the user, to be named in
    ///   diagnostics.
    /// - `tokens`: The tokenizer, positioned just after the option. Options
    ///   that take a value read it from here (see
    ///   [read_value()](crate::values::read_value)).
    ///
    /// # Return value
    ///
    /// - If the option was handled, return the [Outcome] telling the
    ///   dispatcher how to continue.
    /// - If the option or its value is invalid, return one of the [Error]
    ///   values. If none of them fits, use [Error::HandlerError].
    ///
    /// # Notes
    ///
    /// If a handler call fails, the parse stops and the error is reported on
    /// the error stream. The contents of the handler are then undefined.
    fn handle<'a>(
        &mut self,
        code: Self::Code,
        token: &Token<'a>,
        tokens: &mut Tokenizer<'a>,
    ) -> Result<Outcome>;

    /// Called once, after all options were handled, with the positional
    /// arguments in the order they were given.
    fn arguments(&mut self, _values: Vec<&str>) -> Result<()> {
        Ok(())
    }
}

/// Settings used to control the parsers behaviour.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Settings {
    unknown_options: UnknownOptionMode,

    /// Width help and usage text is wrapped to; zero selects the console
    /// width.
    line_width: usize,
}

impl Settings {
    /// Create a new settings object.
    pub fn new() -> Self {
        Settings::default()
    }

    /// Specify how unknown options are dealt with (by default, the first
    /// unknown option will generate an error).
    pub fn unknown_options(self, unknown_options: UnknownOptionMode) -> Self {
        Settings {
            unknown_options,
            ..self
        }
    }

    /// Wrap help and usage text to `line_width` columns.
    pub fn line_width(self, line_width: usize) -> Self {
        Settings { line_width, ..self }
    }
}

/// The result of a parse: the handler holding the option values, and the
/// status.
///
/// Unless the status is [Status::Ok], [Parsed::values] only holds whatever
/// the handler had stored when the parse stopped.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Parsed<H> {
    /// The handler passed to the parse.
    pub values: H,
    /// The terminal status.
    pub status: Status,
}

impl<H> Parsed<H> {
    /// Returns true if every argument was parsed successfully.
    pub fn is_ok(&self) -> bool {
        self.status == Status::Ok
    }

    /// The code to exit the process with under the `mode` policy, or [None]
    /// if the program should carry on.
    ///
    /// Help, version and other aborting options exit with `0`, errors with
    /// [EINVAL].
    pub fn exit_code(&self, mode: AutoTerminate) -> Option<i32> {
        match self.status {
            Status::Ok => None,
            Status::Error if mode.after_error() => Some(EINVAL),
            Status::Error => None,
            _ if mode.after_help() => Some(0),
            _ => None,
        }
    }
}

/// Get all command-line arguments specified to the program, including the
/// program name.
///
/// # Note
///
/// Used with [App::parse_with_args()]. However, this isn't usually
/// required: just call [App::parse()].
pub fn get_args() -> Vec<String> {
    env::args().collect()
}

/// The base name of a program path.
fn program_name(path: &str) -> &str {
    path.rsplit(|c: char| c == '/' || c == '\\')
        .next()
        .unwrap_or(path)
}

/// The main object used to represent the program.
///
/// It ties together the option table, the help texts and the settings that
/// a generated parser is made of.
#[derive(Clone, Debug)]
pub struct App<'t, C> {
    table: OptionTable<'t, C>,
    help: &'t str,
    usage: &'t str,
    version: &'t str,
    settings: Settings,
    required: &'t [C],
    min_args: usize,
    max_args: Option<usize>,
}

impl<'t, C> App<'t, C>
where
    C: Copy + PartialEq + fmt::Debug,
{
    /// Create a new application object.
    pub fn new(table: OptionTable<'t, C>) -> Self {
        App {
            table,
            help: "",
            usage: "",
            version: "",
            settings: Settings::default(),
            required: &[],
            min_args: 0,
            max_args: None,
        }
    }

    /// Specify the full help text, written when help is requested.
    pub fn help(self, help: &'t str) -> Self {
        App { help, ..self }
    }

    /// Specify the brief usage text, written in front of every error.
    pub fn usage(self, usage: &'t str) -> Self {
        App { usage, ..self }
    }

    /// Specify the version text, written when the version is requested.
    pub fn version(self, version: &'t str) -> Self {
        App { version, ..self }
    }

    /// Specify the settings.
    pub fn settings(self, settings: Settings) -> Self {
        App { settings, ..self }
    }

    /// Specify how unknown options are dealt with.
    ///
    /// # Note
    ///
    /// This is a convenience method that replaces the need to create a
    /// [Settings] object.
    pub fn unknown_options(self, mode: UnknownOptionMode) -> Self {
        App {
            settings: self.settings.unknown_options(mode),
            ..self
        }
    }

    /// Wrap help and usage text to `line_width` columns.
    pub fn line_width(self, line_width: usize) -> Self {
        App {
            settings: self.settings.line_width(line_width),
            ..self
        }
    }

    /// Specify the codes of the options that must be given.
    pub fn required(self, required: &'t [C]) -> Self {
        App { required, ..self }
    }

    /// Specify how many positional arguments the program takes.
    pub fn arguments(self, min_args: usize, max_args: Option<usize>) -> Self {
        App {
            min_args,
            max_args,
            ..self
        }
    }

    /// Write the full help text.
    pub fn write_help<W: Write + ?Sized>(&self, writer: &mut W, program: &str) -> Result<()> {
        write_help_text(writer, self.help, program, self.settings.line_width)?;

        Ok(())
    }

    /// Write the brief usage text (if any) followed by the diagnostic for
    /// `error`.
    pub fn write_error<W: Write + ?Sized>(
        &self,
        writer: &mut W,
        program: &str,
        error: &Error,
    ) -> Result<()> {
        if !self.usage.is_empty() {
            write_help_text(writer, self.usage, program, self.settings.line_width)?;
            writeln!(writer)?;
        }

        writeln!(writer, "{}", error)?;

        Ok(())
    }

    fn scan<'a, H>(&self, args: &'a [&'a str], handler: &mut H) -> Result<Status>
    where
        H: Handler<Code = C>,
    {
        let mut tokens = Tokenizer::new(args);
        let mut positionals: Vec<Cow<'a, str>> = Vec::new();
        let mut seen: Vec<C> = Vec::new();

        while let Some(token) = tokens.next_argument() {
            trace!(token = %token, option = token.is_option, short = token.is_short_option, "token");

            if !token.is_option {
                positionals.push(Cow::Borrowed(token.text));
                continue;
            }

            let code = match self.table.find(&token) {
                Some(code) => code,
                None => {
                    match self.settings.unknown_options {
                        UnknownOptionMode::TreatAsError => {
                            return Err(Error::UnknownOpt(token.to_string()))
                        }
                        UnknownOptionMode::Ignore => {
                            if tokens.has_attached_value() {
                                tokens.skip_argument();
                            }
                        }
                        UnknownOptionMode::TreatAsArgument => {
                            if let Some(rest) = tokens.skip_rest() {
                                if token.is_clustered() {
                                    positionals.push(Cow::Owned(format!("-{}", rest)));
                                } else {
                                    positionals.push(Cow::Borrowed(rest));
                                }
                            }
                        }
                    }

                    debug!(token = %token, mode = ?self.settings.unknown_options, "unknown option");
                    continue;
                }
            };

            let outcome = handler.handle(code, &token, &mut tokens)?;

            debug!(token = %token, code = ?code, outcome = ?outcome, "option");

            seen.push(code);

            match outcome {
                Outcome::Normal | Outcome::Final if tokens.has_attached_value() => {
                    return Err(Error::UnwantedOptArg(token.to_string()))
                }
                Outcome::Normal => (),
                Outcome::Final => {
                    positionals.extend(tokens.rest().into_iter().map(Cow::Borrowed));
                    break;
                }
                Outcome::Abort(status) => return Ok(status),
            }
        }

        for code in self.required {
            if !seen.contains(code) {
                let name = self
                    .table
                    .flag_name(*code)
                    .unwrap_or_else(|| format!("{:?}", code));

                return Err(Error::MissingReqOpt(name));
            }
        }

        let received = positionals.len();

        if received < self.min_args {
            return Err(Error::TooFewArgs {
                min: self.min_args,
                received,
            });
        }

        if let Some(max) = self.max_args {
            if received > max {
                return Err(Error::TooManyArgs { max, received });
            }
        }

        handler.arguments(positionals.iter().map(|p| p.as_ref()).collect())?;

        Ok(Status::Ok)
    }

    /// Parse a command line.
    ///
    /// # Arguments
    ///
    /// - `argv`: The arguments, the first of which is the program path
    ///   (as returned by [get_args()]).
    /// - `handler`: The handler, holding the default option values.
    /// - `out`: Where help and version text is written.
    /// - `err`: Where usage and diagnostics are written.
    ///
    /// # Notes
    ///
    /// - An empty `argv` returns `handler` untouched with [Status::Ok].
    /// - The process is never terminated; see [Parsed::exit_code()].
    pub fn parse_with_args<H>(
        &self,
        argv: &[&str],
        mut handler: H,
        out: &mut dyn Write,
        err: &mut dyn Write,
    ) -> Parsed<H>
    where
        H: Handler<Code = C>,
    {
        let (program, args) = match argv.split_first() {
            Some((path, args)) => (program_name(path), args),
            None => {
                return Parsed {
                    values: handler,
                    status: Status::Ok,
                }
            }
        };

        debug!(program = %program, args = args.len(), "parsing arguments");

        let result = self.scan(args, &mut handler).and_then(|status| {
            match status {
                Status::HelpRequested => self.write_help(out, program)?,
                Status::VersionRequested if !self.version.is_empty() => {
                    writeln!(out, "{}", self.version)?
                }
                _ => (),
            }

            Ok(status)
        });

        let status = match result {
            Ok(status) => status,
            Err(e) => {
                if let Err(write_error) = self.write_error(err, program, &e) {
                    debug!(error = %write_error, "failed to report error");
                }

                Status::Error
            }
        };

        debug!(status = ?status, "parse finished");

        Parsed {
            values: handler,
            status,
        }
    }

    /// Simplest interface to the parser: parse the program's own command
    /// line, writing to standard output and standard error.
    pub fn parse<H>(&self, handler: H) -> Parsed<H>
    where
        H: Handler<Code = C>,
    {
        let args = get_args();
        let argv: Vec<&str> = args.iter().map(String::as_str).collect();

        let stdout = io::stdout();
        let stderr = io::stderr();

        self.parse_with_args(&argv, handler, &mut stdout.lock(), &mut stderr.lock())
    }
}
