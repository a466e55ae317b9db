// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! Line-oriented text buffer.
//!
//! Every value occupies either a single line or a block. A block starts with
//! a line ending in `{`, optionally carrying an element count before the
//! brace, and ends with a lone `}`. Indentation is written for humans and
//! ignored on read, as are blank lines and lines starting with `#`.

use std::str::Lines;

use crate::error::Error;
use crate::types::NULL;

pub const DEFAULT_INDENT: usize = 4;

const BLOCK_OPEN: char = '{';
const BLOCK_CLOSE: &str = "}";
const COMMENT: char = '#';

/// Whether a value opens a block rather than being a single-line scalar.
#[inline(always)]
pub fn is_block(text: &str) -> bool {
    text.ends_with(BLOCK_OPEN)
}

#[inline(always)]
pub fn is_null(text: &str) -> bool {
    text == NULL
}

#[derive(Debug)]
pub struct Writer {
    buf: String,
    depth: usize,
    indent: usize,
}

impl Default for Writer {
    fn default() -> Self {
        Writer::new(DEFAULT_INDENT)
    }
}

impl Writer {
    pub fn new(indent: usize) -> Writer {
        Writer {
            buf: String::with_capacity(256),
            depth: 0,
            indent,
        }
    }

    #[inline(always)]
    pub fn depth(&self) -> usize {
        self.depth
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.buf
    }

    pub fn into_string(self) -> String {
        self.buf
    }

    #[inline(always)]
    fn pad(&mut self) {
        let width = self.depth * self.indent;
        self.buf.extend(std::iter::repeat(' ').take(width));
    }

    /// Starts a `name=` line. The value follows through a scalar or block call.
    pub fn write_field_name(&mut self, name: &str) {
        self.pad();
        self.buf.push_str(name);
        self.buf.push('=');
    }

    /// Starts an element line inside an array, collection or map block.
    pub fn begin_element(&mut self) {
        self.pad();
    }

    /// Ends the current line with a single-line value.
    pub fn write_scalar(&mut self, text: &str) {
        self.buf.push_str(text);
        self.buf.push('\n');
    }

    pub fn write_null(&mut self) {
        self.write_scalar(NULL);
    }

    /// Ends the current line with a block header and descends one level.
    pub fn open_block(&mut self, type_name: &str, count: Option<usize>) {
        self.buf.push_str(type_name);
        if let Some(count) = count {
            self.buf.push(' ');
            self.buf.push_str(&count.to_string());
        }
        self.buf.push(' ');
        self.buf.push(BLOCK_OPEN);
        self.buf.push('\n');
        self.depth += 1;
    }

    pub fn close_block(&mut self) {
        self.depth = self.depth.saturating_sub(1);
        self.pad();
        self.buf.push_str(BLOCK_CLOSE);
        self.buf.push('\n');
    }
}

/// The parsed head of a block: `<type> [count] {`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Header<'t> {
    pub type_name: &'t str,
    pub count: Option<usize>,
}

pub struct Reader<'a> {
    lines: Lines<'a>,
    line: usize,
    depth: usize,
}

impl<'a> Reader<'a> {
    pub fn new(text: &'a str) -> Reader<'a> {
        Reader {
            lines: text.lines(),
            line: 0,
            depth: 0,
        }
    }

    /// The 1-based number of the line read last.
    #[inline(always)]
    pub fn line(&self) -> usize {
        self.line
    }

    /// The number of blocks currently open.
    #[inline(always)]
    pub fn depth(&self) -> usize {
        self.depth
    }

    fn next_significant(&mut self) -> Option<&'a str> {
        for raw in self.lines.by_ref() {
            self.line += 1;
            let line = raw.trim();
            if line.is_empty() || line.starts_with(COMMENT) {
                continue;
            }
            return Some(line);
        }
        None
    }

    fn require_line(&mut self) -> Result<&'a str, Error> {
        match self.next_significant() {
            Some(line) => Ok(line),
            None => Err(Error::unexpected_end_of_input(self.line, self.depth)),
        }
    }

    /// Reads the line holding the top-level value.
    pub fn read_root(&mut self) -> Result<&'a str, Error> {
        self.require_line()
    }

    /// Reads the next `name=value` line of a record block.
    ///
    /// Returns `Ok(None)` once the closing `}` of the block is consumed.
    pub fn read_field(&mut self) -> Result<Option<(&'a str, &'a str)>, Error> {
        let line = self.require_line()?;
        if line == BLOCK_CLOSE {
            self.depth = self.depth.saturating_sub(1);
            return Ok(None);
        }
        let Some((name, value)) = line.split_once('=') else {
            return Err(Error::malformed_line(
                self.line,
                format!("expected `name=value` but found `{line}`"),
            ));
        };
        let (name, value) = (name.trim_end(), value.trim_start());
        if name.is_empty() {
            return Err(Error::malformed_line(self.line, "missing field name"));
        }
        if value.is_empty() {
            return Err(Error::malformed_line(
                self.line,
                format!("missing value for field `{name}`"),
            ));
        }
        Ok(Some((name, value)))
    }

    /// Reads element `index` of a block that declared `expected` elements.
    pub fn read_element(&mut self, expected: usize, index: usize) -> Result<&'a str, Error> {
        let line = self.require_line()?;
        if line == BLOCK_CLOSE {
            return Err(Error::count_mismatch(self.line, expected, index));
        }
        Ok(line)
    }

    /// Consumes the `}` that must close the current block.
    pub fn end_block(&mut self) -> Result<(), Error> {
        let line = self.require_line()?;
        if line != BLOCK_CLOSE {
            return Err(Error::unclosed_block(self.line, line));
        }
        self.depth = self.depth.saturating_sub(1);
        Ok(())
    }

    /// Parses a block header and descends into the block.
    pub fn open_block<'t>(&mut self, text: &'t str) -> Result<Header<'t>, Error> {
        let Some(head) = text.strip_suffix(BLOCK_OPEN) else {
            return Err(Error::malformed_line(
                self.line,
                format!("expected a block but found `{text}`"),
            ));
        };
        let head = head.trim_end();
        let header = match head.rsplit_once(' ') {
            None => Header {
                type_name: head,
                count: None,
            },
            Some((type_name, count)) => {
                if count.is_empty() || !count.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(Error::malformed_line(
                        self.line,
                        format!("expected an element count but found `{count}`"),
                    ));
                }
                let count = count
                    .parse::<usize>()
                    .map_err(|e| Error::invalid_value(self.line, count, e.to_string()))?;
                Header {
                    type_name: type_name.trim_end(),
                    count: Some(count),
                }
            }
        };
        if header.type_name.is_empty() {
            return Err(Error::malformed_line(self.line, "block without a type name"));
        }
        self.depth += 1;
        Ok(header)
    }

    /// Consumes a value without interpreting it, nested blocks included.
    pub fn skip_value(&mut self, text: &str) -> Result<(), Error> {
        if !is_block(text) {
            return Ok(());
        }
        let outer = self.depth;
        self.depth += 1;
        while self.depth > outer {
            let line = self.require_line()?;
            if line == BLOCK_CLOSE {
                self.depth -= 1;
            } else if is_block(line) {
                self.depth += 1;
            }
        }
        Ok(())
    }

    /// Fails if anything but blanks and comments follows the top-level value.
    pub fn finish(&mut self) -> Result<(), Error> {
        match self.next_significant() {
            None => Ok(()),
            Some(line) => Err(Error::malformed_line(
                self.line,
                format!("unexpected `{line}` after the top-level value"),
            )),
        }
    }
}
