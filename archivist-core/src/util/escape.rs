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

//! Quoting of string values.
//!
//! A quoted value always sits on one line. `%` starts a two-digit hex escape
//! and a backslash starts `\n` or `\t`, so `%`, `"` and `\` themselves are
//! percent-escaped together with every other control character.

const HEX: &[u8; 16] = b"0123456789ABCDEF";

/// Escapes `s` so that it fits on a single line.
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    escape_into(s, &mut out);
    out
}

fn escape_into(s: &str, out: &mut String) {
    for c in s.chars() {
        match c {
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '%' | '"' | '\\' => push_percent(out, c as u32),
            c if c.is_control() => push_percent(out, c as u32),
            c => out.push(c),
        }
    }
}

#[inline]
fn push_percent(out: &mut String, code: u32) {
    // Control characters all sit below U+0100.
    debug_assert!(code < 0x100);
    out.push('%');
    out.push(HEX[(code >> 4) as usize & 0xF] as char);
    out.push(HEX[code as usize & 0xF] as char);
}

/// Reverses [`escape`]. The error names what is wrong with the input.
pub fn unescape(s: &str) -> Result<String, String> {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some('n') => out.push('\n'),
                Some('t') => out.push('\t'),
                Some(other) => return Err(format!("unknown escape sequence `\\{other}`")),
                None => return Err("dangling `\\` at end of string".to_string()),
            },
            '%' => {
                let high = chars.next().and_then(|c| c.to_digit(16));
                let low = chars.next().and_then(|c| c.to_digit(16));
                match (high, low) {
                    (Some(high), Some(low)) => match char::from_u32(high << 4 | low) {
                        Some(decoded) => out.push(decoded),
                        None => return Err("invalid percent escape".to_string()),
                    },
                    _ => return Err("`%` must be followed by two hex digits".to_string()),
                }
            }
            c => out.push(c),
        }
    }
    Ok(out)
}

/// Escapes `s` and wraps it in double quotes.
pub fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    escape_into(s, &mut out);
    out.push('"');
    out
}

/// Strips the surrounding double quotes from `text` and unescapes the rest.
pub fn unquote(text: &str) -> Result<String, String> {
    let inner = text
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .ok_or_else(|| "expected a double-quoted string".to_string())?;
    unescape(inner)
}

/// Renders `s` for log messages, cut to `max` characters.
pub fn preview(s: &str, max: usize) -> String {
    let mut out = String::new();
    for (i, c) in s.chars().enumerate() {
        if i == max {
            out.push_str("...");
            break;
        }
        out.push(c);
    }
    out
}
