// Copyright (c) 2021 James O. D. Hunt.
//
// SPDX-License-Identifier: Apache-2.0
//

use thiserror::Error;

/// The error type.
///
/// The `Display` text of the runtime variants is the one-line diagnostic
/// shown to the user after the brief usage text.
#[derive(Error, Debug, Clone, Eq, PartialEq)]
pub enum Error {
    //------------------------------
    // Incorrect API usage errors (programmer error)
    //------------------------------
    /// Two neighbouring long option patterns are out of order.
    #[error("option table is not sorted: {0:?} must come before {1:?}")]
    UnsortedTable(String, String),

    /// Two long option patterns accept the same abbreviation, or two short
    /// options use the same character.
    #[error("option table is ambiguous: {0:?} and {1:?} overlap")]
    AmbiguousTable(String, String),

    //------------------------------
    // Runtime errors (user error)
    //------------------------------
    /// User specified an unknown option.
    #[error("{0}: unknown option.")]
    UnknownOpt(String),

    /// Option argument was not specified.
    #[error("{0}: no value given.")]
    MissingOptArg(String),

    /// A value was attached (`--flag=value`) to an option that takes none.
    #[error("{0}: option does not take a value.")]
    UnwantedOptArg(String),

    /// The value could not be converted to the option's type.
    #[error("{option}: invalid value \"{value}\".")]
    InvalidValue {
        /// The option as typed by the user.
        option: String,
        /// The offending text.
        value: String,
    },

    /// A delimited value had too few parts.
    #[error(
        "{option}: incorrect number of parts in value \"{value}\".\nIt must have {} {parts} parts separated by {separator}'s.",
        quantifier(.exact)
    )]
    MalformedValue {
        /// The option as typed by the user.
        option: String,
        /// The offending text.
        value: String,
        /// The separator the value is split on.
        separator: char,
        /// The minimum number of parts.
        parts: usize,
        /// Set if the number of parts is fixed.
        exact: bool,
    },

    /// The value was parsed but lies outside the option's legal domain.
    #[error("{option}: illegal value: {value}. (Legal values: {legal})")]
    IllegalValue {
        /// The option as typed by the user.
        option: String,
        /// The parsed value.
        value: String,
        /// Description of the legal values.
        legal: String,
    },

    /// An option that must be specified was not specified.
    #[error("missing required option: {0}")]
    MissingReqOpt(String),

    /// Fewer positional arguments than the program requires.
    #[error("too few arguments (expected at least {min}, but received {received}).")]
    TooFewArgs {
        /// Minimum number of positional arguments.
        min: usize,
        /// Number actually given.
        received: usize,
    },

    /// More positional arguments than the program accepts.
    #[error("too many arguments (expected at most {max}, but received {received}).")]
    TooManyArgs {
        /// Maximum number of positional arguments.
        max: usize,
        /// Number actually given.
        received: usize,
    },

    /// A handler rejected an option for its own reasons.
    #[error("{0}")]
    HandlerError(String),

    /// Writing help or diagnostic text failed.
    #[error("i/o error: {0}")]
    Io(String),
}

fn quantifier(exact: &bool) -> &'static str {
    if *exact {
        "exactly"
    } else {
        "at least"
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e.to_string())
    }
}

/// Convenience type that allows a function to be defined as returning a
/// [Result], but which only requires the success type to be specified,
/// defaulting the error type to this crates `Error` type.
pub type Result<T, E = Error> = std::result::Result<T, E>;
