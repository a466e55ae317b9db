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

use std::any::Any;
use std::sync::Arc;

use crate::error::Error;
use crate::resolver::context::{ReadContext, WriteContext};
use crate::resolver::type_resolver::{FieldsBuilder, RecordInfo};
use crate::types::FieldType;

mod arc;
pub mod array;
mod box_;
pub mod collection;
mod datetime;
pub mod enum_;
mod list;
pub mod map;
mod number;
mod option;
mod rc;
pub mod record;
pub mod skip;
mod string;

/// A value that can be archived as text, merged, diffed, compared and copied.
///
/// `text` arguments are the value part of a line as produced by
/// [`Archive::write_value`]: a scalar, `null`, or the header line of a block
/// whose body is still to be read from the context.
pub trait Archive: Sized + 'static {
    fn field_type() -> FieldType;

    /// The name written in block headers.
    fn type_name() -> String {
        Self::field_type().type_name()
    }

    fn write_value(&self, context: &mut WriteContext) -> Result<(), Error>;

    /// Parses a fresh value.
    fn read_value(context: &mut ReadContext<'_>, text: &str) -> Result<Self, Error>;

    /// Parses a value into `self`, reusing what can be reused.
    ///
    /// Value types have nothing to reuse and are replaced.
    fn merge_value(&mut self, context: &mut ReadContext<'_>, text: &str) -> Result<(), Error> {
        *self = Self::read_value(context, text)?;
        Ok(())
    }

    /// Writes what `self.merge_value` needs to become equal to `target`.
    fn diff_value(&self, target: &Self, context: &mut WriteContext) -> Result<(), Error> {
        target.write_value(context)
    }

    /// Structural equality over archived state.
    fn archive_eq(&self, other: &Self) -> bool;

    fn deep_copy(&self) -> Self;

    /// A new value whose contained elements are shared with `self` where the
    /// element type allows sharing.
    fn shallow_copy(&self) -> Self {
        self.deep_copy()
    }

    /// The value placed in a shallow-copied container: a pointer clone for
    /// `Rc`/`Arc`, a copy for anything owned.
    fn share(&self) -> Self {
        self.deep_copy()
    }
}

/// Object-safe view of a record, used wherever the concrete type is only
/// known at runtime.
pub trait Record: Any {
    fn record_info(&self) -> Result<Arc<RecordInfo>, Error>;

    fn record_type_name(&self) -> &'static str;

    /// The bound field called `name`, including inherited ones.
    fn field_ref(&self, name: &str) -> Option<&dyn Any>;

    fn field_mut(&mut self, name: &str) -> Option<&mut dyn Any>;

    /// A default-constructed instance of the same type.
    fn boxed_default(&self) -> Box<dyn Record>;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Static description of a record type. Usually generated by
/// `#[derive(Archive)]`.
pub trait RecordType: Record + Archive + Default {
    const TYPE_NAME: &'static str;
    const VERSION: u32 = 0;
    const MIN_VERSION: u32 = 0;

    fn declare_fields(fields: &mut FieldsBuilder) -> Result<(), Error>;
}

impl dyn Record {
    pub fn is<T: Record>(&self) -> bool {
        self.as_any().is::<T>()
    }

    pub fn downcast_ref<T: Record>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    pub fn downcast_mut<T: Record>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut::<T>()
    }
}
