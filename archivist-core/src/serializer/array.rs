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

//! Fixed-length arrays, `Box<[T]>`. Nesting gives multi-dimensional arrays:
//! `Box<[Box<[i32]>]>` is written as an `i32[] <n> {` block of `i32 <m> {` rows.

use log::trace;

use crate::buffer::is_null;
use crate::error::Error;
use crate::resolver::context::{ReadContext, WriteContext};
use crate::serializer::collection::{
    merge_elements, read_elements, sequence_eq, write_sequence,
};
use crate::serializer::Archive;
use crate::types::FieldType;

impl<T: Archive> Archive for Box<[T]> {
    fn field_type() -> FieldType {
        FieldType::Array(Box::new(T::field_type()))
    }

    fn write_value(&self, context: &mut WriteContext) -> Result<(), Error> {
        write_sequence(&T::type_name(), self.iter(), context)
    }

    fn read_value(context: &mut ReadContext<'_>, text: &str) -> Result<Self, Error> {
        if is_null(text) {
            return Ok(Box::default());
        }
        let count = context.open_counted_block(text, &T::type_name())?;
        read_elements(context, count).map(Vec::into_boxed_slice)
    }

    /// Keeps the array only when the incoming length matches.
    fn merge_value(&mut self, context: &mut ReadContext<'_>, text: &str) -> Result<(), Error> {
        if is_null(text) {
            *self = Box::default();
            return Ok(());
        }
        let count = context.open_counted_block(text, &T::type_name())?;
        if count != self.len() {
            trace!(
                "line {}: array length changed from {} to {}, reallocating",
                context.line(),
                self.len(),
                count
            );
            *self = read_elements(context, count)?.into_boxed_slice();
            return Ok(());
        }
        merge_elements(self.iter_mut(), count, context, |_: T| {})
    }

    fn archive_eq(&self, other: &Self) -> bool {
        sequence_eq(self.iter(), other.iter())
    }

    fn deep_copy(&self) -> Self {
        self.iter().map(T::deep_copy).collect()
    }

    fn shallow_copy(&self) -> Self {
        self.iter().map(T::share).collect()
    }
}
