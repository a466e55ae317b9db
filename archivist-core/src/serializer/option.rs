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
use crate::types::FieldType;

impl<T: Archive> Archive for Option<T> {
    fn field_type() -> FieldType {
        FieldType::Optional(Box::new(T::field_type()))
    }

    fn type_name() -> String {
        T::type_name()
    }

    fn write_value(&self, context: &mut WriteContext) -> Result<(), Error> {
        match self {
            Some(value) => value.write_value(context),
            None => {
                context.writer.write_null();
                Ok(())
            }
        }
    }

    fn read_value(context: &mut ReadContext<'_>, text: &str) -> Result<Self, Error> {
        if is_null(text) {
            return Ok(None);
        }
        T::read_value(context, text).map(Some)
    }

    fn merge_value(&mut self, context: &mut ReadContext<'_>, text: &str) -> Result<(), Error> {
        if is_null(text) {
            *self = None;
            return Ok(());
        }
        match self {
            Some(value) => value.merge_value(context, text),
            None => {
                *self = Some(T::read_value(context, text)?);
                Ok(())
            }
        }
    }

    fn diff_value(&self, target: &Self, context: &mut WriteContext) -> Result<(), Error> {
        match (self, target) {
            (Some(source), Some(target)) => source.diff_value(target, context),
            (None, Some(target)) => target.write_value(context),
            (_, None) => {
                context.writer.write_null();
                Ok(())
            }
        }
    }

    fn archive_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Some(a), Some(b)) => a.archive_eq(b),
            (None, None) => true,
            _ => false,
        }
    }

    fn deep_copy(&self) -> Self {
        self.as_ref().map(T::deep_copy)
    }

    fn shallow_copy(&self) -> Self {
        self.as_ref().map(T::shallow_copy)
    }

    fn share(&self) -> Self {
        self.as_ref().map(T::share)
    }
}
