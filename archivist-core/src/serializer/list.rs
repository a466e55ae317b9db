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

use std::collections::VecDeque;

use crate::buffer::is_null;
use crate::error::Error;
use crate::resolver::context::{ReadContext, WriteContext};
use crate::serializer::collection::{
    initial_capacity, merge_elements, read_elements, sequence_eq, write_sequence,
};
use crate::serializer::Archive;
use crate::types::FieldType;

macro_rules! impl_list_archive {
    ($list:ident, $name:literal) => {
        impl<T: Archive> Archive for $list<T> {
            fn field_type() -> FieldType {
                FieldType::Collection($name, Box::new(T::field_type()))
            }

            fn write_value(&self, context: &mut WriteContext) -> Result<(), Error> {
                write_sequence(&Self::type_name(), self.iter(), context)
            }

            fn read_value(context: &mut ReadContext<'_>, text: &str) -> Result<Self, Error> {
                if is_null(text) {
                    return Ok($list::new());
                }
                let count = context.open_counted_block(text, &Self::type_name())?;
                Ok(read_elements::<T>(context, count)?.into_iter().collect())
            }

            /// Positional merge: elements past the incoming count are dropped,
            /// existing positions are reused, new trailing elements appended.
            fn merge_value(
                &mut self,
                context: &mut ReadContext<'_>,
                text: &str,
            ) -> Result<(), Error> {
                if is_null(text) {
                    self.clear();
                    return Ok(());
                }
                let count = context.open_counted_block(text, &Self::type_name())?;
                self.truncate(count);
                let mut appended = Vec::with_capacity(initial_capacity(count - self.len()));
                merge_elements(self.iter_mut(), count, context, |value| {
                    appended.push(value)
                })?;
                self.extend(appended);
                Ok(())
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
    };
}

impl_list_archive!(Vec, "Vec");
impl_list_archive!(VecDeque, "VecDeque");
