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

//! Error type shared by every archivist operation.
//!
//! Data errors (anything raised while reading text) carry the 1-based line
//! number they originate from so that a failing archive can be located with
//! an editor. Programmer errors (bad registrations, unrelated diff operands)
//! carry no line.

use std::borrow::Cow;

use thiserror::Error;

/// Set `ARCHIVIST_PANIC_ON_ERROR` at compile time to panic where an error is created.
pub const PANIC_ON_ERROR: bool = option_env!("ARCHIVIST_PANIC_ON_ERROR").is_some();

/// Check if `ARCHIVIST_PANIC_ON_ERROR` was set when the crate was compiled.
#[inline(always)]
pub const fn should_panic_on_error() -> bool {
    PANIC_ON_ERROR
}

/// Error type for archiving, merging and diffing operations.
///
/// # Always use the constructor functions
///
/// Do not build variants with the enum syntax. The snake_case constructor
/// functions convert their arguments, and they honour `ARCHIVIST_PANIC_ON_ERROR`:
///
/// ```bash
/// RUST_BACKTRACE=1 ARCHIVIST_PANIC_ON_ERROR=1 cargo test
/// ```
///
/// With the flag set, every error panics at the exact place it is created,
/// which gives a full stack trace for corrupted archives.
///
/// ```rust
/// use archivist_core::error::Error;
///
/// let err = Error::malformed_line(3, "expected `name=value`");
/// assert_eq!(err.line(), Some(3));
/// ```
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// A line does not follow the grammar.
    #[error("line {line}: malformed line: {message}")]
    MalformedLine {
        line: usize,
        message: Cow<'static, str>,
    },

    /// A type name in the text is neither built in nor registered.
    #[error("line {line}: type `{type_name}` is not registered")]
    TypeNotFound { line: usize, type_name: String },

    /// The input ended while blocks were still open.
    #[error("line {line}: unexpected end of input with {depth} unclosed block(s)")]
    UnexpectedEndOfInput { line: usize, depth: usize },

    /// A block holds more lines than its header declared.
    #[error("line {line}: expected `}}` but found `{found}`")]
    UnclosedBlock { line: usize, found: String },

    /// A field name has no binding and strict mode is on.
    #[error("line {line}: unknown field `{field}` for type `{type_name}`")]
    UnknownField {
        line: usize,
        type_name: String,
        field: String,
    },

    /// The stored version counter is below the reading type's minimum.
    #[error(
        "line {line}: `{type_name}` was archived with version {found}, \
         the minimum supported version is {minimum}"
    )]
    VersionTooOld {
        line: usize,
        type_name: String,
        found: u32,
        minimum: u32,
    },

    /// Diff operands are neither the same type nor ancestor and descendant.
    #[error("cannot diff unrelated types `{left}` and `{right}`")]
    IncompatibleTypes { left: String, right: String },

    /// One declaring type registers the same field name twice.
    #[error("field `{field}` is registered twice for type `{type_name}`")]
    DuplicateFieldRegistration { type_name: String, field: String },

    /// A statically typed slot received a block of another type.
    #[error("line {line}: expected type `{expected}` but found `{found}`")]
    TypeMismatch {
        line: usize,
        expected: String,
        found: String,
    },

    /// A block closed before all declared elements were read.
    #[error("line {line}: block declares {expected} element(s) but closes after {found}")]
    CountMismatch {
        line: usize,
        expected: usize,
        found: usize,
    },

    /// A scalar, escape sequence or enum variant could not be parsed.
    #[error("line {line}: invalid value `{value}`: {reason}")]
    InvalidValue {
        line: usize,
        value: String,
        reason: Cow<'static, str>,
    },

    /// A type or field declaration is unusable.
    #[error("{0}")]
    InvalidType(Cow<'static, str>),

    /// Blocks are nested deeper than the configured limit.
    #[error("line {line}: nesting depth exceeds the limit of {limit}")]
    DepthExceeded { line: usize, limit: usize },

    /// Reading or writing a file or stream failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

macro_rules! raise {
    ($err:expr) => {{
        let err = $err;
        if PANIC_ON_ERROR {
            panic!("ARCHIVIST_PANIC_ON_ERROR: {}", err);
        }
        err
    }};
}

impl Error {
    /// Creates a new [`Error::MalformedLine`].
    ///
    /// ```
    /// use archivist_core::error::Error;
    ///
    /// let err = Error::malformed_line(12, "missing `=`");
    /// let err = Error::malformed_line(12, format!("unexpected `{}`", "}"));
    /// ```
    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn malformed_line<S: Into<Cow<'static, str>>>(line: usize, message: S) -> Self {
        raise!(Error::MalformedLine {
            line,
            message: message.into(),
        })
    }

    /// Creates a new [`Error::TypeNotFound`].
    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn type_not_found<S: Into<String>>(line: usize, type_name: S) -> Self {
        raise!(Error::TypeNotFound {
            line,
            type_name: type_name.into(),
        })
    }

    /// Creates a new [`Error::UnexpectedEndOfInput`].
    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn unexpected_end_of_input(line: usize, depth: usize) -> Self {
        raise!(Error::UnexpectedEndOfInput { line, depth })
    }

    /// Creates a new [`Error::UnclosedBlock`].
    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn unclosed_block<S: Into<String>>(line: usize, found: S) -> Self {
        raise!(Error::UnclosedBlock {
            line,
            found: found.into(),
        })
    }

    /// Creates a new [`Error::UnknownField`].
    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn unknown_field<T: Into<String>, F: Into<String>>(
        line: usize,
        type_name: T,
        field: F,
    ) -> Self {
        raise!(Error::UnknownField {
            line,
            type_name: type_name.into(),
            field: field.into(),
        })
    }

    /// Creates a new [`Error::VersionTooOld`].
    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn version_too_old<S: Into<String>>(
        line: usize,
        type_name: S,
        found: u32,
        minimum: u32,
    ) -> Self {
        raise!(Error::VersionTooOld {
            line,
            type_name: type_name.into(),
            found,
            minimum,
        })
    }

    /// Creates a new [`Error::IncompatibleTypes`].
    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn incompatible_types<L: Into<String>, R: Into<String>>(left: L, right: R) -> Self {
        raise!(Error::IncompatibleTypes {
            left: left.into(),
            right: right.into(),
        })
    }

    /// Creates a new [`Error::DuplicateFieldRegistration`].
    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn duplicate_field_registration<T: Into<String>, F: Into<String>>(
        type_name: T,
        field: F,
    ) -> Self {
        raise!(Error::DuplicateFieldRegistration {
            type_name: type_name.into(),
            field: field.into(),
        })
    }

    /// Creates a new [`Error::TypeMismatch`].
    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn type_mismatch<E: Into<String>, F: Into<String>>(
        line: usize,
        expected: E,
        found: F,
    ) -> Self {
        raise!(Error::TypeMismatch {
            line,
            expected: expected.into(),
            found: found.into(),
        })
    }

    /// Creates a new [`Error::CountMismatch`].
    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn count_mismatch(line: usize, expected: usize, found: usize) -> Self {
        raise!(Error::CountMismatch {
            line,
            expected,
            found,
        })
    }

    /// Creates a new [`Error::InvalidValue`].
    ///
    /// ```
    /// use archivist_core::error::Error;
    ///
    /// let err = Error::invalid_value(4, "12x", "invalid digit found in string");
    /// ```
    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn invalid_value<V: Into<String>, R: Into<Cow<'static, str>>>(
        line: usize,
        value: V,
        reason: R,
    ) -> Self {
        raise!(Error::InvalidValue {
            line,
            value: value.into(),
            reason: reason.into(),
        })
    }

    /// Creates a new [`Error::InvalidType`].
    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn invalid_type<S: Into<Cow<'static, str>>>(s: S) -> Self {
        raise!(Error::InvalidType(s.into()))
    }

    /// Creates a new [`Error::DepthExceeded`].
    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn depth_exceeded(line: usize, limit: usize) -> Self {
        raise!(Error::DepthExceeded { line, limit })
    }

    /// The 1-based input line the error originates from, for data errors.
    pub fn line(&self) -> Option<usize> {
        match self {
            Error::MalformedLine { line, .. }
            | Error::TypeNotFound { line, .. }
            | Error::UnexpectedEndOfInput { line, .. }
            | Error::UnclosedBlock { line, .. }
            | Error::UnknownField { line, .. }
            | Error::VersionTooOld { line, .. }
            | Error::TypeMismatch { line, .. }
            | Error::CountMismatch { line, .. }
            | Error::InvalidValue { line, .. }
            | Error::DepthExceeded { line, .. } => Some(*line),
            Error::IncompatibleTypes { .. }
            | Error::DuplicateFieldRegistration { .. }
            | Error::InvalidType(_)
            | Error::Io(_) => None,
        }
    }
}

/// Ensures a condition is true; otherwise returns an [`enum@Error`].
///
/// The message forms produce [`Error::InvalidType`].
///
/// # Examples
/// ```
/// use archivist_core::ensure;
/// use archivist_core::error::Error;
///
/// fn check_indent(n: usize) -> Result<(), Error> {
///     ensure!(n <= 16, "indent {} is too wide", n);
///     ensure!(n % 2 == 0, Error::invalid_type("indent must be even"));
///     Ok(())
/// }
/// ```
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $msg:literal) => {
        if !$cond {
            return Err($crate::error::Error::invalid_type($msg));
        }
    };
    ($cond:expr, $err:expr) => {
        if !$cond {
            return Err($err);
        }
    };
    ($cond:expr, $fmt:expr, $($arg:tt)*) => {
        if !$cond {
            return Err($crate::error::Error::invalid_type(format!($fmt, $($arg)*)));
        }
    };
}
