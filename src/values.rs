// Copyright (c) 2021 James O. D. Hunt.
//
// SPDX-License-Identifier: Apache-2.0
//

//! Conversion and validation of option values.
//!
//! Every function reports the first problem it finds as an [Error] naming
//! the option; nothing is retried.

use std::convert::TryInto;
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::tokenizer::{Token, Tokenizer};

/// Read the value of the option `token`, either attached to it or from the
/// following argument.
pub fn read_value<'a>(tokens: &mut Tokenizer<'a>, token: &Token) -> Result<&'a str> {
    if !tokens.has_next() {
        return Err(Error::MissingOptArg(token.to_string()));
    }

    tokens
        .next_value()
        .ok_or_else(|| Error::MissingOptArg(token.to_string()))
}

/// Convert the whole of `text` to a `T`.
pub fn parse_value<T: FromStr>(text: &str, token: &Token) -> Result<T> {
    text.parse::<T>().map_err(|_| Error::InvalidValue {
        option: token.to_string(),
        value: text.into(),
    })
}

/// Split `value` on `separator` into at least `min_splits + 1` parts.
///
/// At most `max_splits` splits are made (unlimited if [None]); any further
/// separators stay in the last part.
pub fn split_value<'v>(
    value: &'v str,
    separator: char,
    min_splits: usize,
    max_splits: Option<usize>,
    token: &Token,
) -> Result<Vec<&'v str>> {
    let parts: Vec<&str> = match max_splits {
        Some(max) => value.splitn(max + 1, separator).collect(),
        None => value.split(separator).collect(),
    };

    if parts.len() < min_splits + 1 {
        return Err(Error::MalformedValue {
            option: token.to_string(),
            value: value.into(),
            separator,
            parts: min_splits + 1,
            exact: max_splits == Some(min_splits),
        });
    }

    Ok(parts)
}

/// Convert each of `parts` to a `T`.
pub fn parse_values<T: FromStr>(parts: &[&str], token: &Token) -> Result<Vec<T>> {
    parts.iter().map(|part| parse_value(part, token)).collect()
}

/// Split `value` into exactly `N` parts and convert each of them.
pub fn parse_array<T: FromStr, const N: usize>(
    value: &str,
    separator: char,
    token: &Token,
) -> Result<[T; N]> {
    let splits = N.saturating_sub(1);
    let parts = split_value(value, separator, splits, Some(splits), token)?;
    let values: Vec<T> = parse_values(&parts, token)?;

    values.try_into().map_err(|_| Error::MalformedValue {
        option: token.to_string(),
        value: value.into(),
        separator,
        parts: N,
        exact: true,
    })
}

/// Split `value` on `separator` and convert every part, replacing the
/// contents of `dest`.
///
/// `dest` is left untouched if any part is invalid.
pub fn parse_and_assign<T: FromStr>(
    dest: &mut Vec<T>,
    value: &str,
    separator: char,
    token: &Token,
) -> Result<()> {
    let parts = split_value(value, separator, 0, None, token)?;

    *dest = parse_values(&parts, token)?;

    Ok(())
}

/// Split `value` on `separator` and append every converted part to `dest`.
pub fn parse_and_extend<T: FromStr>(
    dest: &mut Vec<T>,
    value: &str,
    separator: char,
    token: &Token,
) -> Result<()> {
    let parts = split_value(value, separator, 0, None, token)?;
    let values: Vec<T> = parse_values(&parts, token)?;

    dest.extend(values);

    Ok(())
}

/// Convert `text` and append it to `dest`, keeping the earlier values.
///
/// Used for options that may be repeated.
pub fn parse_and_append<T: FromStr>(dest: &mut Vec<T>, text: &str, token: &Token) -> Result<()> {
    let value = parse_value(text, token)?;

    dest.push(value);

    Ok(())
}

/// Fail unless `check` accepts `value`. `legal` describes the legal values
/// in the diagnostic.
pub fn check_value<T, F>(value: &T, check: F, legal: &str, token: &Token) -> Result<()>
where
    T: fmt::Display,
    F: Fn(&T) -> bool,
{
    if check(value) {
        return Ok(());
    }

    Err(Error::IllegalValue {
        option: token.to_string(),
        value: value.to_string(),
        legal: legal.into(),
    })
}

/// [check_value] for every element of `values`.
pub fn check_values<T, F>(values: &[T], check: F, legal: &str, token: &Token) -> Result<()>
where
    T: fmt::Display,
    F: Fn(&T) -> bool,
{
    values
        .iter()
        .try_for_each(|value| check_value(value, &check, legal, token))
}

/// One interval of legal values. Either end may be open.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ValueRange<T> {
    lo: Option<T>,
    hi: Option<T>,
}

impl<T> ValueRange<T> {
    /// Only `value` itself.
    pub const fn exactly(value: T) -> Self
    where
        T: Copy,
    {
        ValueRange {
            lo: Some(value),
            hi: Some(value),
        }
    }

    /// `lo` to `hi`, both included.
    pub const fn between(lo: T, hi: T) -> Self {
        ValueRange {
            lo: Some(lo),
            hi: Some(hi),
        }
    }

    /// `lo` and everything above it.
    pub const fn at_least(lo: T) -> Self {
        ValueRange { lo: Some(lo), hi: None }
    }

    /// `hi` and everything below it.
    pub const fn at_most(hi: T) -> Self {
        ValueRange { lo: None, hi: Some(hi) }
    }
}

impl<T: PartialOrd> ValueRange<T> {
    /// Returns true if `value` lies within the range.
    pub fn contains(&self, value: &T) -> bool {
        self.lo.as_ref().map_or(true, |lo| lo <= value)
            && self.hi.as_ref().map_or(true, |hi| value <= hi)
    }
}

impl<T: fmt::Display + PartialEq> fmt::Display for ValueRange<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match (&self.lo, &self.hi) {
            (Some(lo), Some(hi)) if lo == hi => write!(f, "{}", lo),
            (Some(lo), Some(hi)) => write!(f, "{}...{}", lo, hi),
            (Some(lo), None) => write!(f, "{}...", lo),
            (None, Some(hi)) => write!(f, "...{}", hi),
            (None, None) => Ok(()),
        }
    }
}

/// The legal-values text for `ranges`: `0...100, 200...`.
pub fn describe_ranges<T: fmt::Display + PartialEq>(ranges: &[ValueRange<T>]) -> String {
    ranges
        .iter()
        .map(|range| range.to_string())
        .filter(|text| !text.is_empty())
        .collect::<Vec<String>>()
        .join(", ")
}

/// Fail unless `value` lies within one of `ranges`.
pub fn check_ranges<T>(value: &T, ranges: &[ValueRange<T>], token: &Token) -> Result<()>
where
    T: fmt::Display + PartialOrd,
{
    check_value(
        value,
        |v| ranges.iter().any(|range| range.contains(v)),
        &describe_ranges(ranges),
        token,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const LONG: Token = Token {
        text: "--size",
        is_option: true,
        is_short_option: false,
    };

    const SHORT: Token = Token {
        text: "u",
        is_option: true,
        is_short_option: true,
    };

    const PERCENTAGE: &[ValueRange<i32>] = &[ValueRange::between(0, 100), ValueRange::at_least(200)];

    #[test]
    fn test_read_value() {
        let args = ["--host=example.com", "--host", "next", "--host"];
        let mut tokenizer = Tokenizer::new(&args);

        let token = tokenizer.next_argument().unwrap();
        assert_eq!(read_value(&mut tokenizer, &token), Ok("example.com"));

        let token = tokenizer.next_argument().unwrap();
        assert_eq!(read_value(&mut tokenizer, &token), Ok("next"));

        let token = tokenizer.next_argument().unwrap();
        assert_eq!(
            read_value(&mut tokenizer, &token),
            Err(Error::MissingOptArg("--host".into()))
        );
    }

    #[test]
    fn test_parse_value() {
        assert_eq!(parse_value::<i32>("150", &LONG), Ok(150));
        assert_eq!(parse_value::<f64>("2.5", &LONG), Ok(2.5));
        assert_eq!(parse_value::<String>("Two words", &LONG), Ok("Two words".into()));
        assert_eq!(
            parse_value::<i32>("15x", &LONG),
            Err(Error::InvalidValue {
                option: "--size".into(),
                value: "15x".into(),
            })
        );
        assert_eq!(
            parse_value::<u64>("-1", &SHORT),
            Err(Error::InvalidValue {
                option: "-u".into(),
                value: "-1".into(),
            })
        );
    }

    #[test]
    fn test_split_value() {
        #[derive(Debug)]
        struct TestData<'a> {
            value: &'a str,
            min_splits: usize,
            max_splits: Option<usize>,
            result: Result<Vec<&'a str>>,
        }

        let tests = &[
            TestData {
                value: "",
                min_splits: 0,
                max_splits: None,
                result: Ok(vec![""]),
            },
            TestData {
                value: "1x2",
                min_splits: 1,
                max_splits: Some(1),
                result: Ok(vec!["1", "2"]),
            },
            TestData {
                value: "1x2x3",
                min_splits: 1,
                max_splits: Some(1),
                result: Ok(vec!["1", "2x3"]),
            },
            TestData {
                value: "1x2x3",
                min_splits: 0,
                max_splits: None,
                result: Ok(vec!["1", "2", "3"]),
            },
            TestData {
                value: "1",
                min_splits: 1,
                max_splits: Some(1),
                result: Err(Error::MalformedValue {
                    option: "--size".into(),
                    value: "1".into(),
                    separator: 'x',
                    parts: 2,
                    exact: true,
                }),
            },
            TestData {
                value: "1",
                min_splits: 1,
                max_splits: None,
                result: Err(Error::MalformedValue {
                    option: "--size".into(),
                    value: "1".into(),
                    separator: 'x',
                    parts: 2,
                    exact: false,
                }),
            },
        ];

        for (i, d) in tests.iter().enumerate() {
            let msg = format!("test[{}]: {:?}", i, d);

            let result = split_value(d.value, 'x', d.min_splits, d.max_splits, &LONG);

            assert_eq!(result, d.result, "{}", msg);
        }
    }

    #[test]
    fn test_parse_array() {
        assert_eq!(parse_array::<i32, 2>("800x600", 'x', &LONG), Ok([800, 600]));
        assert_eq!(parse_array::<i32, 3>("1x2x3", 'x', &LONG), Ok([1, 2, 3]));
        assert_eq!(
            parse_array::<i32, 2>("1x2x3", 'x', &LONG),
            Err(Error::InvalidValue {
                option: "--size".into(),
                value: "2x3".into(),
            })
        );
        assert!(matches!(
            parse_array::<i32, 3>("1x2", 'x', &LONG),
            Err(Error::MalformedValue { parts: 3, exact: true, .. })
        ));
    }

    #[test]
    fn test_list_operations() {
        let mut dest = vec![9];

        assert_eq!(parse_and_assign(&mut dest, "1,2,3", ',', &LONG), Ok(()));
        assert_eq!(dest, vec![1, 2, 3]);

        assert_eq!(parse_and_extend(&mut dest, "4,5", ',', &LONG), Ok(()));
        assert_eq!(dest, vec![1, 2, 3, 4, 5]);

        assert_eq!(parse_and_append(&mut dest, "6", &LONG), Ok(()));
        assert_eq!(dest, vec![1, 2, 3, 4, 5, 6]);

        // A bad part leaves the destination alone.
        assert!(parse_and_assign(&mut dest, "7,x", ',', &LONG).is_err());
        assert!(parse_and_extend(&mut dest, "7,x", ',', &LONG).is_err());
        assert!(parse_and_append(&mut dest, "x", &LONG).is_err());
        assert_eq!(dest, vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_check_value() {
        let in_range = |v: &i32| (1..=12).contains(v);

        assert_eq!(check_value(&5, in_range, "1...12", &SHORT), Ok(()));
        assert_eq!(
            check_value(&13, in_range, "1...12", &SHORT),
            Err(Error::IllegalValue {
                option: "-u".into(),
                value: "13".into(),
                legal: "1...12".into(),
            })
        );

        assert_eq!(check_values(&[1, 12], in_range, "1...12", &SHORT), Ok(()));
        assert!(matches!(
            check_values(&[1, 0, 13], in_range, "1...12", &SHORT),
            Err(Error::IllegalValue { ref value, .. }) if value == "0"
        ));
    }

    #[test]
    fn test_ranges() {
        #[derive(Debug)]
        struct TestData {
            value: i32,
            legal: bool,
        }

        let tests = &[
            TestData {
                value: -1,
                legal: false,
            },
            TestData {
                value: 0,
                legal: true,
            },
            TestData {
                value: 100,
                legal: true,
            },
            TestData {
                value: 150,
                legal: false,
            },
            TestData {
                value: 200,
                legal: true,
            },
            TestData {
                value: i32::MAX,
                legal: true,
            },
        ];

        for (i, d) in tests.iter().enumerate() {
            let msg = format!("test[{}]: {:?}", i, d);

            let result = check_ranges(&d.value, PERCENTAGE, &LONG);

            assert_eq!(result.is_ok(), d.legal, "{}", msg);
        }

        assert_eq!(describe_ranges(PERCENTAGE), "0...100, 200...");
        assert_eq!(
            describe_ranges(&[
                ValueRange::exactly(-9999),
                ValueRange::between(-1000, -500),
                ValueRange::at_most(-10),
            ]),
            "-9999, -1000...-500, ...-10"
        );
        assert_eq!(
            check_ranges(&150, PERCENTAGE, &LONG).unwrap_err().to_string(),
            "--size: illegal value: 150. (Legal values: 0...100, 200...)"
        );
    }
}
