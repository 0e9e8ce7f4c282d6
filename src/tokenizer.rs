// Copyright (c) 2021 James O. D. Hunt.
//
// SPDX-License-Identifier: Apache-2.0
//

use std::fmt;

const OPT_PREFIX: char = '-';
const VALUE_SEPARATOR: char = '=';

/// One classified lexeme of the command line.
///
/// The text always borrows from the argument list, nothing is copied.
///
/// # Note
///
/// - All members are public for handler convenience.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Token<'a> {
    /// The option or positional text.
    ///
    /// - Long options keep their dashes but lose any `=value` part.
    /// - A short option at the start of an argument is `-x`; a short option
    ///   clustered behind another one (`-abc`) is the bare letter.
    /// - A positional argument is the whole argument.
    pub text: &'a str,
    /// Set for long and short options, including `--` and `-`.
    pub is_option: bool,
    /// Set for short options (`-x` or a clustered letter).
    pub is_short_option: bool,
}

impl<'a> Token<'a> {
    /// Returns the option character of a short option.
    pub fn short_name(&self) -> Option<char> {
        if self.is_short_option {
            self.text.chars().last()
        } else {
            None
        }
    }

    /// Returns true if this is a short option clustered behind another one
    /// (the `b` of `-ab`).
    pub fn is_clustered(&self) -> bool {
        self.is_short_option && self.text.chars().count() == 1
    }

    /// Returns true if this is a long option (or one of the `-` / `--`
    /// sentinels).
    pub fn is_long_option(&self) -> bool {
        self.is_option && !self.is_short_option
    }
}

impl<'a> fmt::Display for Token<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        // Clustered letters are stored without their dash.
        if self.is_clustered() {
            write!(f, "{}{}", OPT_PREFIX, self.text)
        } else {
            write!(f, "{}", self.text)
        }
    }
}

/// Position of the tokenizer: the argument index and the byte offset within
/// that argument.
///
/// An offset of zero means the cursor sits at the start of a fresh argument.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Ord, PartialOrd)]
pub struct Cursor {
    /// Index of the current argument.
    pub arg: usize,
    /// Byte offset within the current argument.
    pub offset: usize,
}

/// Walks a list of arguments, splitting it into [Token]s and option values.
///
/// The cursor only ever moves forward.
#[derive(Clone, Debug)]
pub struct Tokenizer<'a> {
    args: &'a [&'a str],
    cursor: Cursor,
    // Where the last token was taken from.
    last: Cursor,
    // Set when the last long option ended at '=' and its value is still
    // waiting to be read.
    attached_value: bool,
}

fn resembles_short_option(arg: &str) -> bool {
    let mut chars = arg.chars();

    chars.next() == Some(OPT_PREFIX) && matches!(chars.next(), Some(c) if c != OPT_PREFIX)
}

fn resembles_option(arg: &str) -> bool {
    arg.starts_with(OPT_PREFIX)
}

impl<'a> Tokenizer<'a> {
    /// Create a tokenizer over the arguments (without the program name).
    pub fn new(args: &'a [&'a str]) -> Self {
        Tokenizer {
            args,
            cursor: Cursor::default(),
            last: Cursor::default(),
            attached_value: false,
        }
    }

    /// The current position.
    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Returns true if any argument text remains.
    pub fn has_next(&self) -> bool {
        self.cursor.arg < self.args.len()
    }

    /// Returns true if the last long option was written as `--name=value`
    /// and the value has not been consumed yet.
    pub fn has_attached_value(&self) -> bool {
        self.attached_value
    }

    fn advance(&mut self, length: usize) {
        self.cursor.offset += length;

        if self.cursor.offset >= self.args[self.cursor.arg].len() {
            self.next_arg();
        }
    }

    fn next_arg(&mut self) {
        self.cursor.arg += 1;
        self.cursor.offset = 0;
    }

    /// Returns the next classified token, or [None] once all arguments have
    /// been consumed.
    pub fn next_argument(&mut self) -> Option<Token<'a>> {
        let arg: &'a str = self.args.get(self.cursor.arg)?;

        self.last = self.cursor;
        self.attached_value = false;

        if self.cursor.offset != 0 {
            // Part of a cluster of short options (`-abc`).
            let rest = &arg[self.cursor.offset..];
            let length = rest.chars().next().map_or(0, char::len_utf8);
            let text = &rest[..length];

            // A dangling '=' left by a long option is skipped with it.
            if length == 0 {
                self.next_arg();
                return self.next_argument();
            }

            self.advance(length);

            return Some(Token {
                text,
                is_option: true,
                is_short_option: true,
            });
        }

        if resembles_short_option(arg) {
            let length = arg
                .char_indices()
                .nth(2)
                .map_or(arg.len(), |(index, _)| index);

            self.advance(length);

            return Some(Token {
                text: &arg[..length],
                is_option: true,
                is_short_option: true,
            });
        }

        if resembles_option(arg) {
            let length = arg[1..]
                .find(VALUE_SEPARATOR)
                .map_or(arg.len(), |index| index + 1);

            if length < arg.len() {
                // Leave the cursor on the value.
                self.cursor.offset = length + 1;
                self.attached_value = true;
            } else {
                self.next_arg();
            }

            return Some(Token {
                text: &arg[..length],
                is_option: true,
                is_short_option: false,
            });
        }

        self.next_arg();

        Some(Token {
            text: arg,
            is_option: false,
            is_short_option: false,
        })
    }

    /// Returns the remainder of the current argument as a value, moving on to
    /// the next argument.
    ///
    /// This covers the attached forms (`--name=value`, `-nvalue`) as well as
    /// a value given as the following argument (`--name value`).
    pub fn next_value(&mut self) -> Option<&'a str> {
        let arg: &'a str = self.args.get(self.cursor.arg)?;
        let value = &arg[self.cursor.offset..];

        self.attached_value = false;
        self.next_arg();

        Some(value)
    }

    /// Skips the rest of the argument that held the last token and returns
    /// that argument in full.
    pub fn skip_argument(&mut self) -> Option<&'a str> {
        let arg = self.args.get(self.last.arg).copied();

        self.skip_last();

        arg
    }

    /// Like [Tokenizer::skip_argument()], but returns the argument starting
    /// at the last token: for the `x` of `-exv` this is `xv`.
    pub fn skip_rest(&mut self) -> Option<&'a str> {
        let rest = self
            .args
            .get(self.last.arg)
            .copied()
            .and_then(|arg| arg.get(self.last.offset..));

        self.skip_last();

        rest
    }

    fn skip_last(&mut self) {
        if self.cursor.arg == self.last.arg {
            self.next_arg();
        }

        self.attached_value = false;
    }

    /// Consumes everything that is left, each remaining argument (or
    /// remainder of the current argument) becoming one value.
    pub fn rest(&mut self) -> Vec<&'a str> {
        let mut values = Vec::new();

        while let Some(value) = self.next_value() {
            values.push(value);
        }

        values
    }
}
