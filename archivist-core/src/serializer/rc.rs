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

use std::rc::Rc;

use log::trace;

use crate::error::Error;
use crate::resolver::context::{ReadContext, WriteContext};
use crate::serializer::Archive;
use crate::types::FieldType;

impl<T: Archive> Archive for Rc<T> {
    fn field_type() -> FieldType {
        T::field_type()
    }

    fn write_value(&self, context: &mut WriteContext) -> Result<(), Error> {
        (**self).write_value(context)
    }

    fn read_value(context: &mut ReadContext<'_>, text: &str) -> Result<Self, Error> {
        T::read_value(context, text).map(Rc::new)
    }

    /// Merges in place when this is the only handle, otherwise merges into a
    /// private copy so that other holders keep seeing the old value.
    fn merge_value(&mut self, context: &mut ReadContext<'_>, text: &str) -> Result<(), Error> {
        if let Some(value) = Rc::get_mut(self) {
            return value.merge_value(context, text);
        }
        trace!(
            "line {}: shared `{}` copied before merge",
            context.line(),
            T::type_name()
        );
        let mut copy = (**self).deep_copy();
        copy.merge_value(context, text)?;
        *self = Rc::new(copy);
        Ok(())
    }

    fn diff_value(&self, target: &Self, context: &mut WriteContext) -> Result<(), Error> {
        (**self).diff_value(&**target, context)
    }

    fn archive_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(self, other) || (**self).archive_eq(&**other)
    }

    fn deep_copy(&self) -> Self {
        Rc::new((**self).deep_copy())
    }

    fn shallow_copy(&self) -> Self {
        Rc::clone(self)
    }

    fn share(&self) -> Self {
        Rc::clone(self)
    }
}
