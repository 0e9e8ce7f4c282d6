// Copyright (c) 2021 James O. D. Hunt.
//
// SPDX-License-Identifier: Apache-2.0
//

//! The command line of a unit test runner, written the way a parser
//! generator would emit it: option codes, sorted option tables, help markup
//! and one handler.

use argen::values::{
    check_ranges, check_value, parse_and_append, parse_and_assign, parse_array, parse_value,
    read_value, split_value, ValueRange,
};
use argen::{
    App, AutoTerminate, Error, Handler, OptionTable, Outcome, Result, Status, Token, Tokenizer,
};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Code {
    Stdin,
    EndOfOptions,
    Exclude,
    Foo,
    Help,
    Host,
    Include,
    LogFile,
    Month,
    Percentage,
    Quiet,
    Size,
    User,
    Verbose,
    Version,
}

const LONG: &[(&str, Code)] = &[
    ("-", Code::Stdin),
    ("--", Code::EndOfOptions),
    ("--e\u{1}xclude", Code::Exclude),
    ("--f\u{1}oo", Code::Foo),
    ("--he\u{1}lp", Code::Help),
    ("--ho\u{1}st", Code::Host),
    ("--i\u{1}nclude", Code::Include),
    ("--l\u{1}og-file", Code::LogFile),
    ("--m\u{1}onth", Code::Month),
    ("--p\u{1}ercentage", Code::Percentage),
    ("--q\u{1}uiet", Code::Quiet),
    ("--s\u{1}ize", Code::Size),
    ("--u\u{1}ser", Code::User),
    ("--verb\u{1}ose", Code::Verbose),
    ("--vers\u{1}ion", Code::Version),
];

const SHORT: &[(char, Code)] = &[
    ('%', Code::Percentage),
    ('e', Code::Exclude),
    ('h', Code::Help),
    ('i', Code::Include),
    ('l', Code::LogFile),
    ('m', Code::Month),
    ('q', Code::Quiet),
    ('u', Code::User),
    ('v', Code::Verbose),
];

const PERCENTAGE: &[ValueRange<u32>] = &[ValueRange::between(0, 100), ValueRange::at_least(200)];

const MONTHS: &[&str] = &[
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];

const USAGE: &str = "usage: ${PROGRAM} \u{1}[-e] [-h] [-l\u{2}FILE] [-q] [-v] [--version] \
    [--host=HOST] [--foo=N1,N2,...] [--size=ROWSxCOLS] [-%\u{2}N] [-m\u{2}MONTH] \
    [-i\u{2}PATH] [-u\u{2}NAME:ID] [-] [--] [TEST ...]\n";

const HELP: &str = "usage: ${PROGRAM} \u{1}[-e] [-h] [-l\u{2}FILE] [-q] [-v] [--version] \
    [--host=HOST] [--foo=N1,N2,...] [--size=ROWSxCOLS] [-%\u{2}N] [-m\u{2}MONTH] \
    [-i\u{2}PATH] [-u\u{2}NAME:ID] [-] [--] [TEST ...]\n\
    \n\
    Runs the unit tests.\n\
    \n\
    POSITIONAL ARGUMENTS\n\
    \x20 \u{1}TEST                      \u{1}The name of a test or test suite to run. \
    All tests are run if no names are given.\n\
    \n\
    OPTIONS\n\
    \x20 \u{1}-e, --exclude             \u{1}Exclude the tests whose names appear after \
    the options and run everything else. This is the opposite of the default behavior.\n\
    \x20 \u{1}-h, --help                \u{1}Show program help.\n\
    \x20 \u{1}-l FILE, --log-file=FILE  \u{1}Redirect all the output the tests normally \
    write to stdout or stderr to a file named FILE instead.\n\
    \x20 \u{1}-q, --quiet               \u{1}Don't display the function names of the \
    failed tests.\n\
    \x20 \u{1}-v, --verbose             \u{1}Show the function names of the failed \
    tests. This is the default.\n\
    \x20 \u{1}--version                 \u{1}Show the program version.\n\
    \x20 \u{1}--host=HOST               \u{1}Set the host name. This option has no effect \
    on tests, it is only used in the export.\n\
    \x20 \u{1}--foo=N1,N2,...           \u{1}A list of numbers.\n\
    \x20 \u{1}--size=ROWSxCOLS          \u{1}The size of the test grid.\n\
    \x20 \u{1}-% N, --percentage=N      \u{1}A percentage, or anything from 200 and up.\n\
    \x20 \u{1}-m MONTH, --month=MONTH   \u{1}The month, as a number or a three letter \
    name.\n\
    \x20 \u{1}-i PATH, --include=PATH   \u{1}Add PATH to the include path. This option \
    may be repeated.\n\
    \x20 \u{1}-u NAME:ID, --user=NAME:ID\u{1}The user name and numeric id.\n\
    \x20 \u{1}-                         \u{1}Read test names from stdin.\n\
    \x20 \u{1}--                        \u{1}End of options.\n";

const VERSION: &str = concat!("unit-test-runner ", env!("CARGO_PKG_VERSION"));

#[derive(Clone, Debug, Default)]
struct Arguments {
    exclude: bool,
    foo: Vec<i64>,
    host: String,
    include: Vec<String>,
    log_file: String,
    month: u32,
    percentage: u32,
    quiet: bool,
    size: [u32; 2],
    stdin: bool,
    user: Option<(String, u32)>,
    tests: Vec<String>,
}

fn parse_month(value: &str, token: &Token) -> Result<u32> {
    let lower = value.to_ascii_lowercase();

    if let Some(index) = MONTHS.iter().position(|m| *m == lower) {
        return Ok(index as u32 + 1);
    }

    let month = parse_value(value, token)?;

    check_value(&month, |m| (1..=12).contains(m), "1...12, jan...dec", token)?;

    Ok(month)
}

impl Handler for Arguments {
    type Code = Code;

    fn handle<'a>(
        &mut self,
        code: Code,
        token: &Token<'a>,
        tokens: &mut Tokenizer<'a>,
    ) -> Result<Outcome> {
        match code {
            Code::Stdin => self.stdin = true,
            Code::EndOfOptions => return Ok(Outcome::Final),
            Code::Exclude => self.exclude = true,
            Code::Foo => parse_and_assign(&mut self.foo, read_value(tokens, token)?, ',', token)?,
            Code::Help => return Ok(Outcome::Abort(Status::HelpRequested)),
            Code::Host => self.host = read_value(tokens, token)?.into(),
            Code::Include => parse_and_append(&mut self.include, read_value(tokens, token)?, token)?,
            Code::LogFile => self.log_file = read_value(tokens, token)?.into(),
            Code::Month => self.month = parse_month(read_value(tokens, token)?, token)?,
            Code::Percentage => {
                let value = parse_value(read_value(tokens, token)?, token)?;

                check_ranges(&value, PERCENTAGE, token)?;

                self.percentage = value;
            }
            Code::Quiet => self.quiet = true,
            Code::Size => self.size = parse_array(read_value(tokens, token)?, 'x', token)?,
            Code::User => {
                let value = read_value(tokens, token)?;
                let parts = split_value(value, ':', 1, Some(1), token)?;

                if parts[0].is_empty() {
                    return Err(Error::HandlerError(format!(
                        "{}: the user name cannot be empty.",
                        token
                    )));
                }

                self.user = Some((parts[0].into(), parse_value(parts[1], token)?));
            }
            Code::Verbose => self.quiet = false,
            Code::Version => return Ok(Outcome::Abort(Status::VersionRequested)),
        }

        Ok(Outcome::Normal)
    }

    fn arguments(&mut self, values: Vec<&str>) -> Result<()> {
        self.tests = values.into_iter().map(String::from).collect();

        Ok(())
    }
}

fn main() {
    let app = App::new(OptionTable::new(LONG, SHORT))
        .help(HELP)
        .usage(USAGE)
        .version(VERSION);

    let parsed = app.parse(Arguments::default());

    if let Some(code) = parsed.exit_code(AutoTerminate::AfterHelpOrError) {
        std::process::exit(code);
    }

    println!("{:#?}", parsed.values);
}
