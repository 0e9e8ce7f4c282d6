// Copyright (c) 2021 James O. D. Hunt.
//
// SPDX-License-Identifier: Apache-2.0
//

use std::cmp::Ordering;

use crate::error::{Error, Result};
use crate::tokenizer::Token;

/// Separates the mandatory prefix of a long option pattern from its optional
/// suffix: `"--verb\u{1}ose"` matches `--verb`, `--verbo`, `--verbos` and
/// `--verbose`.
///
/// A pattern without the marker only matches its full text.
pub const ABBREVIATION_MARKER: char = '\u{1}';

const MARKER: u8 = ABBREVIATION_MARKER as u8;

fn upper(c: u8) -> u8 {
    c.to_ascii_uppercase()
}

fn compare_byte(flag: u8, pattern: u8) -> Ordering {
    upper(flag).cmp(&upper(pattern))
}

/// Compare a user-typed long option with a pattern, ignoring ASCII case.
///
/// Returns [Ordering::Equal] if `flag` is the mandatory prefix of the
/// pattern, optionally followed by a prefix of its optional suffix.
/// Otherwise the result says on which side of the pattern the flag sorts: a
/// flag that stops before the mandatory prefix is complete sorts before the
/// pattern, a flag running past the end of the pattern sorts after it.
pub fn compare_flag(flag: &str, pattern: &str) -> Ordering {
    let flag = flag.as_bytes();
    let pattern = pattern.as_bytes();

    let mut i = 0;

    loop {
        if i == flag.len() {
            return match pattern.get(i) {
                Some(&MARKER) | None => Ordering::Equal,
                Some(_) => Ordering::Less,
            };
        }

        match pattern.get(i) {
            Some(&MARKER) => break,
            Some(&p) => match compare_byte(flag[i], p) {
                Ordering::Equal => (),
                other => return other,
            },
            None => return Ordering::Greater,
        }

        i += 1;
    }

    // Past the marker the pattern is one byte ahead of the flag.
    for (j, &f) in flag.iter().enumerate().skip(i) {
        match pattern.get(j + 1) {
            Some(&p) => match compare_byte(f, p) {
                Ordering::Equal => (),
                other => return other,
            },
            None => return Ordering::Greater,
        }
    }

    Ordering::Equal
}

/// Binary search `table` (sorted under [compare_flag]) for the pattern
/// matched by `flag`, returning its index.
pub fn find_flag<T>(table: &[(&str, T)], flag: &str) -> Option<usize> {
    table
        .binary_search_by(|(pattern, _)| compare_flag(flag, pattern).reverse())
        .ok()
}

/// Binary search `table` (sorted by upper-cased character) for `c`,
/// ignoring ASCII case.
pub fn find_short_flag<T>(table: &[(char, T)], c: char) -> Option<usize> {
    let c = c.to_ascii_uppercase();

    table
        .binary_search_by(|(entry, _)| entry.to_ascii_uppercase().cmp(&c))
        .ok()
}

/// The mandatory part of a pattern.
fn mandatory(pattern: &str) -> &str {
    pattern
        .split(ABBREVIATION_MARKER)
        .next()
        .unwrap_or(pattern)
}

/// The full option name a pattern stands for.
fn full_name(pattern: &str) -> String {
    pattern.replace(ABBREVIATION_MARKER, "")
}

/// Human readable form of a pattern: `--verb[ose]`.
fn display_pattern(pattern: &str) -> String {
    match pattern.find(ABBREVIATION_MARKER) {
        Some(index) => format!(
            "{}[{}]",
            &pattern[..index],
            &pattern[index + ABBREVIATION_MARKER.len_utf8()..]
        ),
        None => pattern.into(),
    }
}

/// Maps user-typed options to option codes.
///
/// Both tables are produced ahead of time together with the code that
/// handles each option:
///
/// - `long` holds `(pattern, code)` pairs sorted under [compare_flag]. It
///   also carries the sentinels `-` and `--` if the program supports them.
/// - `short` holds `(character, code)` pairs sorted by upper-cased character.
///
/// Sortedness and freedom from ambiguity are preconditions; a malformed
/// table silently misroutes options. [OptionTable::validate] checks them and
/// [OptionTable::new] asserts them in debug builds.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct OptionTable<'t, C> {
    long: &'t [(&'t str, C)],
    short: &'t [(char, C)],
}

impl<'t, C: Copy + PartialEq> OptionTable<'t, C> {
    /// Create a new option table.
    pub fn new(long: &'t [(&'t str, C)], short: &'t [(char, C)]) -> Self {
        let table = OptionTable { long, short };

        debug_assert_eq!(table.validate(), Ok(()));

        table
    }

    /// Check that both tables are sorted and that no two entries can match
    /// the same user input.
    pub fn validate(&self) -> Result<()> {
        // Overlapping patterns need not be neighbours.
        for (i, (a, _)) in self.long.iter().enumerate() {
            for (b, _) in &self.long[i + 1..] {
                if compare_flag(mandatory(a), b) == Ordering::Equal
                    || compare_flag(mandatory(b), a) == Ordering::Equal
                {
                    return Err(Error::AmbiguousTable(
                        display_pattern(a),
                        display_pattern(b),
                    ));
                }
            }
        }

        for pair in self.long.windows(2) {
            let (a, b) = (pair[0].0, pair[1].0);

            if compare_flag(&full_name(b), a) != Ordering::Greater
                || compare_flag(&full_name(a), b) != Ordering::Less
            {
                return Err(Error::UnsortedTable(
                    display_pattern(b),
                    display_pattern(a),
                ));
            }
        }

        for pair in self.short.windows(2) {
            let (a, b) = (pair[0].0, pair[1].0);

            match a.to_ascii_uppercase().cmp(&b.to_ascii_uppercase()) {
                Ordering::Less => (),
                Ordering::Equal => {
                    return Err(Error::AmbiguousTable(format!("-{}", a), format!("-{}", b)))
                }
                Ordering::Greater => {
                    return Err(Error::UnsortedTable(format!("-{}", b), format!("-{}", a)))
                }
            }
        }

        Ok(())
    }

    /// Resolve an option token to its code.
    pub fn find(&self, token: &Token) -> Option<C> {
        if let Some(c) = token.short_name() {
            return find_short_flag(self.short, c).map(|i| self.short[i].1);
        }

        find_flag(self.long, token.text).map(|i| self.long[i].1)
    }

    /// The name to show for `code` in diagnostics: its full long option if it
    /// has one, otherwise its short option.
    pub fn flag_name(&self, code: C) -> Option<String> {
        if let Some((pattern, _)) = self.long.iter().find(|(_, c)| *c == code) {
            return Some(full_name(pattern));
        }

        self.short
            .iter()
            .find(|(_, c)| *c == code)
            .map(|(ch, _)| format!("-{}", ch))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Copy, Debug, Eq, PartialEq)]
    enum Code {
        Stdin,
        EndOfOptions,
        Antiflag,
        Exclude,
        File,
        Flag,
        Help,
        Host,
        Verbose,
        Version,
        Version2,
    }

    const LONG: &[(&str, Code)] = &[
        ("-", Code::Stdin),
        ("--", Code::EndOfOptions),
        ("--a\u{1}ntiflag", Code::Antiflag),
        ("--e\u{1}xclude", Code::Exclude),
        ("--fi\u{1}le", Code::File),
        ("--fl\u{1}ag", Code::Flag),
        ("--he\u{1}lp", Code::Help),
        ("--ho\u{1}st", Code::Host),
        ("--verb\u{1}ose", Code::Verbose),
        ("--version", Code::Version),
        ("--version2", Code::Version2),
    ];

    const SHORT: &[(char, Code)] = &[
        ('e', Code::Exclude),
        ('f', Code::File),
        ('h', Code::Help),
        ('v', Code::Verbose),
    ];

    fn long(text: &str) -> Token {
        Token {
            text,
            is_option: true,
            is_short_option: false,
        }
    }

    fn short(text: &str) -> Token {
        Token {
            text,
            is_option: true,
            is_short_option: true,
        }
    }

    #[test]
    fn test_compare_flag() {
        #[derive(Debug)]
        struct TestData<'a> {
            flag: &'a str,
            pattern: &'a str,
            result: Ordering,
        }

        let tests = &[
            TestData {
                flag: "--verb",
                pattern: "--verb\u{1}ose",
                result: Ordering::Equal,
            },
            TestData {
                flag: "--VERBO",
                pattern: "--verb\u{1}ose",
                result: Ordering::Equal,
            },
            TestData {
                flag: "--verbose",
                pattern: "--verb\u{1}ose",
                result: Ordering::Equal,
            },
            TestData {
                flag: "--ver",
                pattern: "--verb\u{1}ose",
                result: Ordering::Less,
            },
            TestData {
                flag: "--verbosely",
                pattern: "--verb\u{1}ose",
                result: Ordering::Greater,
            },
            TestData {
                flag: "--verbx",
                pattern: "--verb\u{1}ose",
                result: Ordering::Greater,
            },
            TestData {
                flag: "--a",
                pattern: "--verb\u{1}ose",
                result: Ordering::Less,
            },
            TestData {
                flag: "--version",
                pattern: "--version",
                result: Ordering::Equal,
            },
            TestData {
                flag: "--versio",
                pattern: "--version",
                result: Ordering::Less,
            },
            TestData {
                flag: "--version2",
                pattern: "--version",
                result: Ordering::Greater,
            },
            TestData {
                flag: "--",
                pattern: "-",
                result: Ordering::Greater,
            },
            TestData {
                flag: "-",
                pattern: "--",
                result: Ordering::Less,
            },
        ];

        for (i, d) in tests.iter().enumerate() {
            let msg = format!("test[{}]: {:?}", i, d);

            assert_eq!(compare_flag(d.flag, d.pattern), d.result, "{}", msg);
        }
    }

    #[test]
    fn test_find() {
        #[derive(Debug)]
        struct TestData<'a> {
            token: Token<'a>,
            result: Option<Code>,
        }

        let table = OptionTable::new(LONG, SHORT);

        let tests = &[
            TestData {
                token: long("-"),
                result: Some(Code::Stdin),
            },
            TestData {
                token: long("--"),
                result: Some(Code::EndOfOptions),
            },
            TestData {
                token: long("--a"),
                result: Some(Code::Antiflag),
            },
            TestData {
                token: long("--Fi"),
                result: Some(Code::File),
            },
            TestData {
                token: long("--f"),
                result: None,
            },
            TestData {
                token: long("--flag"),
                result: Some(Code::Flag),
            },
            TestData {
                token: long("--hel"),
                result: Some(Code::Help),
            },
            TestData {
                token: long("--h"),
                result: None,
            },
            TestData {
                token: long("--verb"),
                result: Some(Code::Verbose),
            },
            TestData {
                token: long("--ver"),
                result: None,
            },
            TestData {
                token: long("--version"),
                result: Some(Code::Version),
            },
            TestData {
                token: long("--version2"),
                result: Some(Code::Version2),
            },
            TestData {
                token: long("--version3"),
                result: None,
            },
            TestData {
                token: long("--zzz"),
                result: None,
            },
            TestData {
                token: short("-e"),
                result: Some(Code::Exclude),
            },
            TestData {
                token: short("V"),
                result: Some(Code::Verbose),
            },
            TestData {
                token: short("-g"),
                result: None,
            },
            TestData {
                token: short("-z"),
                result: None,
            },
        ];

        for (i, d) in tests.iter().enumerate() {
            let msg = format!("test[{}]: {:?}", i, d);

            assert_eq!(table.find(&d.token), d.result, "{}", msg);
        }
    }

    #[test]
    fn test_every_abbreviation_resolves() {
        let table = OptionTable::new(LONG, SHORT);

        for (pattern, code) in LONG {
            let full = full_name(pattern);

            for end in mandatory(pattern).len()..=full.len() {
                let flag = &full[..end];

                assert_eq!(table.find(&long(flag)), Some(*code), "flag: {:?}", flag);
            }
        }
    }

    #[test]
    fn test_validate() {
        #[derive(Debug)]
        struct TestData<'a> {
            long: &'a [(&'a str, u8)],
            short: &'a [(char, u8)],
            result: Result<()>,
        }

        let tests = &[
            TestData {
                long: &[],
                short: &[],
                result: Ok(()),
            },
            TestData {
                long: &[("--a\u{1}lpha", 1), ("--b\u{1}eta", 2)],
                short: &[('a', 1), ('B', 2)],
                result: Ok(()),
            },
            TestData {
                long: &[("--b\u{1}eta", 2), ("--a\u{1}lpha", 1)],
                short: &[],
                result: Err(Error::UnsortedTable(
                    "--a[lpha]".into(),
                    "--b[eta]".into(),
                )),
            },
            TestData {
                long: &[("--al\u{1}pha", 1), ("--a\u{1}ll", 2)],
                short: &[],
                result: Err(Error::AmbiguousTable(
                    "--al[pha]".into(),
                    "--a[ll]".into(),
                )),
            },
            TestData {
                long: &[("--a\u{1}aa", 1), ("--aab", 2), ("--a\u{1}bb", 3)],
                short: &[],
                result: Err(Error::AmbiguousTable(
                    "--a[aa]".into(),
                    "--a[bb]".into(),
                )),
            },
            TestData {
                long: &[],
                short: &[('b', 1), ('a', 2)],
                result: Err(Error::UnsortedTable("-a".into(), "-b".into())),
            },
            TestData {
                long: &[],
                short: &[('a', 1), ('A', 2)],
                result: Err(Error::AmbiguousTable("-a".into(), "-A".into())),
            },
        ];

        for (i, d) in tests.iter().enumerate() {
            let msg = format!("test[{}]: {:?}", i, d);

            let table = OptionTable {
                long: d.long,
                short: d.short,
            };

            assert_eq!(table.validate(), d.result, "{}", msg);
        }
    }

    #[test]
    fn test_flag_name() {
        let table = OptionTable::new(LONG, SHORT);

        assert_eq!(table.flag_name(Code::Verbose), Some("--verbose".into()));
        assert_eq!(table.flag_name(Code::EndOfOptions), Some("--".into()));

        let short_only = OptionTable::new(&[], SHORT);

        assert_eq!(short_only.flag_name(Code::File), Some("-f".into()));
        assert_eq!(short_only.flag_name(Code::Host), None);
    }
}
