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

use crate::buffer::is_null;
use crate::error::Error;
use crate::resolver::context::{ReadContext, WriteContext};
use crate::serializer::Archive;
use crate::types::{FieldType, ScalarKind};
use crate::util::escape::{quote, unquote};

impl Archive for String {
    #[inline(always)]
    fn field_type() -> FieldType {
        FieldType::Str
    }

    fn write_value(&self, context: &mut WriteContext) -> Result<(), Error> {
        context.writer.write_scalar(&quote(self));
        Ok(())
    }

    fn read_value(context: &mut ReadContext<'_>, text: &str) -> Result<Self, Error> {
        if is_null(text) {
            return Err(context.unexpected_null("String"));
        }
        unquote(text).map_err(|reason| context.invalid_value(text, reason))
    }

    #[inline(always)]
    fn archive_eq(&self, other: &Self) -> bool {
        self == other
    }

    fn deep_copy(&self) -> Self {
        self.clone()
    }
}

impl Archive for char {
    #[inline(always)]
    fn field_type() -> FieldType {
        FieldType::Scalar(ScalarKind::Char)
    }

    fn write_value(&self, context: &mut WriteContext) -> Result<(), Error> {
        let mut buf = [0u8; 4];
        context.writer.write_scalar(&quote(self.encode_utf8(&mut buf)));
        Ok(())
    }

    fn read_value(context: &mut ReadContext<'_>, text: &str) -> Result<Self, Error> {
        if is_null(text) {
            return Err(context.unexpected_null("char"));
        }
        let value = unquote(text).map_err(|reason| context.invalid_value(text, reason))?;
        let mut chars = value.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(c),
            _ => Err(context.invalid_value(text, "expected exactly one character")),
        }
    }

    #[inline(always)]
    fn archive_eq(&self, other: &Self) -> bool {
        self == other
    }

    #[inline(always)]
    fn deep_copy(&self) -> Self {
        *self
    }
}
