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

use std::borrow::Cow;
use std::sync::Arc;

use crate::buffer::{Header, Reader, Writer};
use crate::config::Config;
use crate::error::Error;
use crate::resolver::type_resolver::{registry, RecordInfo};

pub struct WriteContext {
    pub writer: Writer,
}

impl WriteContext {
    pub fn new(config: &Config) -> WriteContext {
        WriteContext {
            writer: Writer::new(config.indent()),
        }
    }

    pub fn into_string(self) -> String {
        self.writer.into_string()
    }
}

pub struct ReadContext<'a> {
    pub reader: Reader<'a>,
    strict: bool,
    max_depth: usize,
    patching: bool,
}

impl<'a> ReadContext<'a> {
    pub fn new(text: &'a str, config: &Config) -> ReadContext<'a> {
        ReadContext {
            reader: Reader::new(text),
            strict: config.is_strict(),
            max_depth: config.max_depth(),
            patching: false,
        }
    }

    /// A context reading a patch: records without a version counter are
    /// not version checked.
    pub fn for_patch(text: &'a str, config: &Config) -> ReadContext<'a> {
        ReadContext {
            patching: true,
            ..ReadContext::new(text, config)
        }
    }

    #[inline(always)]
    pub fn is_patching(&self) -> bool {
        self.patching
    }

    #[inline(always)]
    pub fn is_strict(&self) -> bool {
        self.strict
    }

    #[inline(always)]
    pub fn line(&self) -> usize {
        self.reader.line()
    }

    /// Opens a block, enforcing the nesting limit.
    pub fn open_block<'t>(&mut self, text: &'t str) -> Result<Header<'t>, Error> {
        let header = self.reader.open_block(text)?;
        if self.reader.depth() > self.max_depth {
            return Err(Error::depth_exceeded(self.line(), self.max_depth));
        }
        Ok(header)
    }

    /// Opens the block of a single record, which never carries an element count.
    pub fn open_record_block<'t>(&mut self, text: &'t str) -> Result<Header<'t>, Error> {
        let header = self.open_block(text)?;
        if header.count.is_some() {
            return Err(Error::malformed_line(
                self.line(),
                format!("record `{}` takes no element count", header.type_name),
            ));
        }
        Ok(header)
    }

    /// Opens a block whose type is known statically.
    pub fn open_typed_block<'t>(
        &mut self,
        text: &'t str,
        expected: &str,
    ) -> Result<Header<'t>, Error> {
        let header = self.open_block(text)?;
        self.check_type(expected, header.type_name)?;
        Ok(header)
    }

    /// Opens an array, collection or map block and returns its element count.
    pub fn open_counted_block(&mut self, text: &str, expected: &str) -> Result<usize, Error> {
        let header = self.open_typed_block(text, expected)?;
        header.count.ok_or_else(|| {
            Error::malformed_line(
                self.line(),
                format!("`{expected}` block requires an element count"),
            )
        })
    }

    /// `TypeNotFound` when `found` names nothing known, `TypeMismatch` otherwise.
    pub fn check_type(&self, expected: &str, found: &str) -> Result<(), Error> {
        if expected == found {
            return Ok(());
        }
        if registry().lookup(found).is_some() {
            Err(Error::type_mismatch(self.line(), expected, found))
        } else {
            Err(Error::type_not_found(self.line(), found))
        }
    }

    /// Looks up a record type by the name found in a block header.
    pub fn resolve_record(&self, type_name: &str) -> Result<Arc<RecordInfo>, Error> {
        registry()
            .record_by_name(type_name)
            .ok_or_else(|| Error::type_not_found(self.line(), type_name))
    }

    #[cold]
    pub fn invalid_value<R: Into<Cow<'static, str>>>(&self, value: &str, reason: R) -> Error {
        Error::invalid_value(self.line(), value, reason)
    }

    #[cold]
    pub fn unexpected_null(&self, type_name: &str) -> Error {
        Error::invalid_value(
            self.line(),
            crate::types::NULL,
            format!("`{type_name}` is not nullable"),
        )
    }
}
