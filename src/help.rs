// Copyright (c) 2021 James O. D. Hunt.
//
// SPDX-License-Identifier: Apache-2.0
//

//! Word wrapping and alignment of help text.
//!
//! Help text is written as a markup string. Apart from ordinary characters
//! it may contain:
//!
//! - [ALIGN_MARKER]: wrapped continuation lines are indented to the column
//!   where the marker appears (if that column is less than half the line
//!   width).
//! - [NON_BREAKING_SPACE]: a space that never starts a new line.
//! - [PROGRAM_NAME]: replaced by the program name. It also sets an
//!   alignment column where the name starts.
//! - `'\n'`: ends the paragraph and discards all alignment columns.

use std::env;
use std::io::{self, Write};

/// Marks the column wrapped lines are aligned with.
pub const ALIGN_MARKER: char = '\u{1}';

/// A space that does not allow a line break.
pub const NON_BREAKING_SPACE: char = '\u{2}';

/// Placeholder for the program name.
pub const PROGRAM_NAME: &str = "${PROGRAM}";

const MIN_LINE_WIDTH: usize = 40;
const MAX_LINE_WIDTH: usize = 99;
const FALLBACK_CONSOLE_WIDTH: usize = 80;

/// The width of the console, from the `COLUMNS` environment variable.
pub fn console_width() -> usize {
    env::var("COLUMNS")
        .ok()
        .and_then(|v| v.trim().parse::<usize>().ok())
        .filter(|v| *v > 0)
        .unwrap_or(FALLBACK_CONSOLE_WIDTH)
}

/// The console width, clamped to a readable range.
pub fn default_line_width() -> usize {
    console_width().max(MIN_LINE_WIDTH).min(MAX_LINE_WIDTH)
}

/// Streams text to `stream`, breaking lines at whitespace.
///
/// Only the current word and the whitespace in front of it are buffered.
struct HelpTextWriter<'w, W: Write + ?Sized> {
    stream: &'w mut W,
    line_width: usize,
    column: usize,
    // Number of leading bytes of `buffer` that are whitespace.
    whitespace_size: usize,
    buffer: String,
    // Never empty; the first entry is the base alignment.
    alignment_columns: Vec<usize>,
    // Set until something other than whitespace is written on the line.
    empty_line: bool,
}

impl<'w, W: Write + ?Sized> HelpTextWriter<'w, W> {
    fn new(stream: &'w mut W, line_width: usize) -> Self {
        HelpTextWriter {
            stream,
            line_width,
            column: 0,
            whitespace_size: 0,
            buffer: String::new(),
            alignment_columns: vec![0],
            empty_line: true,
        }
    }

    fn alignment(&self) -> usize {
        self.alignment_columns.last().copied().unwrap_or(0)
    }

    fn write_character(&mut self, c: char) -> io::Result<()> {
        self.buffer.push(c);
        self.column += 1;

        if self.column >= self.line_width && !self.empty_line {
            // The buffered word moves to the next line, the whitespace in
            // front of it is dropped.
            self.stream.write_all(b"\n")?;
            self.empty_line = true;

            if self.whitespace_size != 0 {
                self.buffer.drain(..self.whitespace_size);
                self.whitespace_size = 0;
            }

            let indent = self.alignment();

            self.column = indent + self.buffer.chars().count();
            write!(self.stream, "{:indent$}", "", indent = indent)?;
        }

        Ok(())
    }

    fn write_whitespace(&mut self, c: char) -> io::Result<()> {
        if self.whitespace_size != self.buffer.len() {
            self.stream.write_all(self.buffer.as_bytes())?;
            self.buffer.clear();
            self.whitespace_size = 0;
            self.empty_line = false;
        }

        self.buffer.push(c);
        self.whitespace_size += c.len_utf8();
        self.column += 1;

        Ok(())
    }

    fn align(&mut self) {
        if self.column < self.line_width / 2 {
            self.alignment_columns.push(self.column);
        }
    }

    fn new_line(&mut self) -> io::Result<()> {
        self.stream.write_all(self.buffer.as_bytes())?;
        self.stream.write_all(b"\n")?;
        self.buffer.clear();
        self.column = 0;
        self.alignment_columns.truncate(1);
        self.whitespace_size = 0;
        self.empty_line = true;

        Ok(())
    }

    fn finish(&mut self) -> io::Result<()> {
        self.stream.write_all(self.buffer.as_bytes())?;
        self.buffer.clear();
        self.stream.flush()
    }
}

/// Write the markup `text` to `stream`, wrapped to `line_width` columns.
///
/// A `line_width` of zero selects [default_line_width()].
pub fn write_help_text<W>(
    stream: &mut W,
    text: &str,
    program_name: &str,
    line_width: usize,
) -> io::Result<()>
where
    W: Write + ?Sized,
{
    let line_width = if line_width == 0 {
        default_line_width()
    } else {
        line_width
    };

    let mut writer = HelpTextWriter::new(stream, line_width);
    let mut chars = text.char_indices();

    while let Some((i, c)) = chars.next() {
        match c {
            '\n' => writer.new_line()?,
            ' ' => writer.write_whitespace(' ')?,
            ALIGN_MARKER => writer.align(),
            NON_BREAKING_SPACE => writer.write_character(' ')?,
            '$' if text[i..].starts_with(PROGRAM_NAME) => {
                writer.align();

                for c in program_name.chars() {
                    writer.write_character(c)?;
                }

                // Skip the rest of the placeholder.
                for _ in 1..PROGRAM_NAME.len() {
                    chars.next();
                }
            }
            _ => writer.write_character(c)?,
        }
    }

    writer.finish()
}
