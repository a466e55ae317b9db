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

use log::trace;

use crate::buffer::is_null;
use crate::error::Error;
use crate::resolver::context::{ReadContext, WriteContext};
use crate::serializer::{record, Archive, Record};
use crate::types::{FieldType, DYN_RECORD_NAME};

impl<T: Archive> Archive for Box<T> {
    fn field_type() -> FieldType {
        T::field_type()
    }

    fn write_value(&self, context: &mut WriteContext) -> Result<(), Error> {
        (**self).write_value(context)
    }

    fn read_value(context: &mut ReadContext<'_>, text: &str) -> Result<Self, Error> {
        T::read_value(context, text).map(Box::new)
    }

    /// Merges behind the pointer, so the allocation survives.
    fn merge_value(&mut self, context: &mut ReadContext<'_>, text: &str) -> Result<(), Error> {
        (**self).merge_value(context, text)
    }

    fn diff_value(&self, target: &Self, context: &mut WriteContext) -> Result<(), Error> {
        (**self).diff_value(&**target, context)
    }

    fn archive_eq(&self, other: &Self) -> bool {
        (**self).archive_eq(&**other)
    }

    fn deep_copy(&self) -> Self {
        Box::new((**self).deep_copy())
    }

    fn shallow_copy(&self) -> Self {
        Box::new((**self).shallow_copy())
    }

    fn share(&self) -> Self {
        Box::new((**self).share())
    }
}

/// Reads the body of a block of runtime type `type_name` into a new instance.
fn read_dynamic(
    context: &mut ReadContext<'_>,
    type_name: &str,
) -> Result<Box<dyn Record>, Error> {
    let info = context.resolve_record(type_name)?;
    let mut value = info.instantiate();
    record::read_fields(&mut *value, &info, context, false)?;
    Ok(value)
}

impl Archive for Box<dyn Record> {
    fn field_type() -> FieldType {
        FieldType::DynRecord
    }

    fn write_value(&self, context: &mut WriteContext) -> Result<(), Error> {
        let info = self.record_info()?;
        record::write_record(&**self, &info, context)
    }

    fn read_value(context: &mut ReadContext<'_>, text: &str) -> Result<Self, Error> {
        if is_null(text) {
            return Err(context.unexpected_null(DYN_RECORD_NAME));
        }
        let header = context.open_record_block(text)?;
        read_dynamic(context, header.type_name)
    }

    /// Reuses the instance when the incoming block has its runtime type.
    fn merge_value(&mut self, context: &mut ReadContext<'_>, text: &str) -> Result<(), Error> {
        if is_null(text) {
            return Err(context.unexpected_null(DYN_RECORD_NAME));
        }
        let header = context.open_record_block(text)?;
        if header.type_name == self.record_type_name() {
            trace!(
                "line {}: merging into existing `{}`",
                context.line(),
                header.type_name
            );
            let info = self.record_info()?;
            return record::read_fields(&mut **self, &info, context, true);
        }
        trace!(
            "line {}: replacing `{}` with a new `{}`",
            context.line(),
            self.record_type_name(),
            header.type_name
        );
        *self = read_dynamic(context, header.type_name)?;
        Ok(())
    }

    fn diff_value(&self, target: &Self, context: &mut WriteContext) -> Result<(), Error> {
        if self.record_type_name() != target.record_type_name() {
            return target.write_value(context);
        }
        let info = self.record_info()?;
        context.writer.open_block(info.type_name(), None);
        record::diff_fields(&**self, &info, &**target, &info, context)?;
        context.writer.close_block();
        Ok(())
    }

    fn archive_eq(&self, other: &Self) -> bool {
        if self.record_type_name() != other.record_type_name() {
            return false;
        }
        record::fields_equal(&**self, &**other, &record::expect_info(&**self))
    }

    fn deep_copy(&self) -> Self {
        record::copy_record(&**self, true)
    }

    fn shallow_copy(&self) -> Self {
        record::copy_record(&**self, false)
    }
}
